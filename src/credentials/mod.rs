//! Credential acquisition
//!
//! A declarative schema engine (`schema`) drives interactive credential
//! entry; `android` and `ios` declare the concrete bundles; `local`
//! reads the non-interactive `credentials.json` fallback.

pub mod android;
pub mod ios;
pub mod local;
pub mod schema;

pub use schema::{ask_for_user_provided, collect_from_user, Answers, CredentialSchema};
