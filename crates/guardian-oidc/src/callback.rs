//! Return-URL handling.
//!
//! After login the identity provider sends the browser back with
//! `?code=...` (plus `state`, `session_state` and `iss` when it has them).
//! The code is not exchanged: its presence is the only signal used, and the
//! parameters are stripped from the URL afterwards.

use url::form_urlencoded;

use crate::error::OidcResult;

/// Parameters the identity provider appends to the return URL.
const CALLBACK_KEYS: &[&str] = &[
    "code",
    "state",
    "session_state",
    "iss",
    "error",
    "error_description",
];

/// Parameters found on a return URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallbackParams {
    /// Authorization code.
    pub code: Option<String>,
    /// Session state reported by the provider.
    pub session_state: Option<String>,
    /// Error code, when the provider refused the login.
    pub error: Option<String>,
    /// Error description.
    pub error_description: Option<String>,
}

/// Classification of a return URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackOutcome {
    /// An authorization code was present.
    Code,
    /// The provider returned an error.
    Error {
        /// Error code.
        error: String,
        /// Error description.
        description: Option<String>,
    },
    /// Not a return from the provider.
    None,
}

impl CallbackParams {
    /// Parses a raw query string (without the leading `?`).
    #[must_use]
    pub fn from_query(query: &str) -> Self {
        let mut params = Self::default();
        for (key, value) in form_urlencoded::parse(query.trim_start_matches('?').as_bytes()) {
            let value = value.into_owned();
            match key.as_ref() {
                "code" if !value.is_empty() => params.code = Some(value),
                "session_state" => params.session_state = Some(value),
                "error" if !value.is_empty() => params.error = Some(value),
                "error_description" => params.error_description = Some(value),
                _ => {}
            }
        }
        params
    }

    /// Parses the query of an absolute URL.
    pub fn from_url(url: &str) -> OidcResult<Self> {
        let parsed = url::Url::parse(url)?;
        Ok(Self::from_query(parsed.query().unwrap_or_default()))
    }

    /// Whether an authorization code was returned.
    #[must_use]
    pub const fn has_code(&self) -> bool {
        self.code.is_some()
    }

    /// Classifies the return. An error takes precedence over a code.
    #[must_use]
    pub fn outcome(&self) -> CallbackOutcome {
        if let Some(error) = &self.error {
            return CallbackOutcome::Error {
                error: error.clone(),
                description: self.error_description.clone(),
            };
        }
        if self.has_code() {
            CallbackOutcome::Code
        } else {
            CallbackOutcome::None
        }
    }
}

/// Removes the callback parameters from a query string.
///
/// Returns `None` when nothing else remains.
#[must_use]
pub fn strip_callback_query(query: &str) -> Option<String> {
    let kept: Vec<(String, String)> = form_urlencoded::parse(query.trim_start_matches('?').as_bytes())
        .filter(|(k, _)| !CALLBACK_KEYS.contains(&k.as_ref()))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    if kept.is_empty() {
        return None;
    }

    Some(
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(kept)
            .finish(),
    )
}

/// Removes the callback parameters from an absolute URL.
pub fn strip_callback_params(url: &str) -> OidcResult<String> {
    let mut parsed = url::Url::parse(url)?;
    let remaining = parsed.query().and_then(strip_callback_query);
    parsed.set_query(remaining.as_deref());
    Ok(parsed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_is_detected() {
        let params = CallbackParams::from_query("code=abc123&session_state=xyz");
        assert!(params.has_code());
        assert_eq!(params.session_state.as_deref(), Some("xyz"));
        assert_eq!(params.outcome(), CallbackOutcome::Code);
    }

    #[test]
    fn empty_code_is_ignored() {
        let params = CallbackParams::from_query("?code=");
        assert!(!params.has_code());
        assert_eq!(params.outcome(), CallbackOutcome::None);
    }

    #[test]
    fn error_takes_precedence() {
        let params =
            CallbackParams::from_query("error=access_denied&error_description=User%20cancelled&code=x");
        assert_eq!(
            params.outcome(),
            CallbackOutcome::Error {
                error: "access_denied".to_string(),
                description: Some("User cancelled".to_string()),
            }
        );
    }

    #[test]
    fn from_url_reads_query() {
        let params = CallbackParams::from_url("http://app/?code=abc").unwrap();
        assert_eq!(params.code.as_deref(), Some("abc"));
        assert!(CallbackParams::from_url("not a url").is_err());
    }

    #[test]
    fn strip_removes_callback_params_only() {
        assert_eq!(
            strip_callback_params("http://app/?tab=users&code=abc&session_state=s&iss=http%3A%2F%2Fx")
                .unwrap(),
            "http://app/?tab=users"
        );
        assert_eq!(
            strip_callback_params("http://app/?code=abc").unwrap(),
            "http://app/"
        );
    }

    #[test]
    fn strip_query_returns_none_when_empty() {
        assert_eq!(strip_callback_query("code=abc&state=1"), None);
        assert_eq!(strip_callback_query("code=abc&q=joao"), Some("q=joao".to_string()));
    }
}
