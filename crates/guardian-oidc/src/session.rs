//! Console authentication state.
//!
//! There is a single transition that matters: unauthenticated to
//! authenticated, triggered either by a local (mock) login or by a return
//! from the identity provider carrying a `code`. Nothing is verified.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::callback::{CallbackOutcome, CallbackParams};

/// How the operator got authenticated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoginMethod {
    /// Local mock login without the identity provider.
    Local,
    /// Return from the identity provider's authorization endpoint.
    Redirect,
}

/// Authentication state of the console.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthState {
    /// Nobody is logged in.
    #[default]
    Unauthenticated,
    /// An operator is logged in.
    Authenticated {
        /// How the login happened.
        method: LoginMethod,
        /// When the login happened.
        since: DateTime<Utc>,
    },
}

impl AuthState {
    /// Whether an operator is logged in.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }

    /// The login method, when authenticated.
    #[must_use]
    pub const fn method(&self) -> Option<LoginMethod> {
        match self {
            Self::Authenticated { method, .. } => Some(*method),
            Self::Unauthenticated => None,
        }
    }

    /// The login time, when authenticated.
    #[must_use]
    pub const fn since(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Authenticated { since, .. } => Some(*since),
            Self::Unauthenticated => None,
        }
    }

    /// Local login. Always succeeds.
    #[must_use]
    pub const fn login_local(self, now: DateTime<Utc>) -> Self {
        Self::Authenticated {
            method: LoginMethod::Local,
            since: now,
        }
    }

    /// Return from the identity provider.
    ///
    /// Authenticates when a code is present and no error was reported;
    /// otherwise the state is unchanged. The code itself is not used.
    #[must_use]
    pub fn complete_redirect(self, params: &CallbackParams, now: DateTime<Utc>) -> Self {
        match params.outcome() {
            CallbackOutcome::Code => Self::Authenticated {
                method: LoginMethod::Redirect,
                since: now,
            },
            CallbackOutcome::Error { .. } | CallbackOutcome::None => self,
        }
    }

    /// Logout. Always ends unauthenticated.
    #[must_use]
    pub const fn logout(self) -> Self {
        Self::Unauthenticated
    }
}
