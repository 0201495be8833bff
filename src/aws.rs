use async_trait::async_trait;
use aws_config::SdkConfig;
use chrono::{DateTime, Local};
use thiserror::Error;

pub mod awscli;
pub mod sts;

pub use awscli::AwsCliProvider;
pub use sts::StsProvider;

/// Temporary credentials returned by STS `GetSessionToken`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: String,
    pub expiration: DateTime<Local>,
}

#[derive(Debug, Error)]
pub enum ProviderError {
    /// STS is not enabled in the region the request was sent to.
    #[error("RegionDisabledException: {0}")]
    RegionDisabled(String),

    /// Any other failure reported by the service; message kept as-is.
    #[error("{0}")]
    Rejected(String),

    #[error("aws cli not available in $PATH")]
    ToolMissing(#[source] which::Error),

    #[error("failed to run aws cli")]
    Launch(#[source] std::io::Error),

    #[error("failed to decode aws cli output")]
    Decode(#[from] serde_json::Error),

    #[error("session token response has no {0}")]
    Incomplete(&'static str),

    #[error("invalid expiration timestamp in session token response")]
    Expiration(#[from] chrono::ParseError),
}

/// Source of MFA session credentials.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Exchanges the long-lived credentials of `profile` plus the MFA `serial_number`
    /// and one-time `token_code` for session credentials.
    async fn fetch(
        &self,
        profile: &str,
        serial_number: &str,
        token_code: &str,
    ) -> Result<SessionCredentials, ProviderError>;
}

/// SDK configuration reading the shared credentials of `profile`.
pub async fn profile_config(profile: &str) -> SdkConfig {
    aws_config::from_env().profile_name(profile).load().await
}
