//! # guardian-oidc
//!
//! `OpenID` Connect redirect flow helpers for the Guardian console.
//!
//! The console only performs the front half of the authorization-code flow:
//! it sends the operator to the identity provider and notices the returning
//! `code`. The code is never exchanged for tokens and no PKCE, `state` or
//! `nonce` handling takes place.
//!
//! ## Modules
//!
//! - [`redirect`] - authorization, logout and discovery URL construction
//! - [`callback`] - parsing and stripping the parameters of the return URL
//! - [`session`] - the authentication state and its transitions
//! - [`connectivity`] - HTTP probe of the provider's discovery document
//! - [`error`] - error types

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod callback;
pub mod connectivity;
pub mod error;
pub mod redirect;
pub mod session;

pub use callback::{strip_callback_params, strip_callback_query, CallbackOutcome, CallbackParams};
pub use connectivity::{ConnectionReport, ConnectivityProbe, ProviderInfo, TestStatus};
pub use error::{OidcError, OidcResult};
pub use redirect::OidcEndpoints;
pub use session::{AuthState, LoginMethod};
