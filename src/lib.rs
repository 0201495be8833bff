//! Refresh AWS MFA session credentials in the shared credentials file.
//!
//! A run loads the credentials file into an [`ini::Document`], asks a
//! [`aws::CredentialProvider`] for session credentials, writes them into the
//! target section and saves the file atomically.

pub mod aws;
pub mod credentials;
mod error;
pub mod ini;
pub mod refresh;

pub use error::{Error, Result};
