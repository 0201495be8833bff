use async_trait::async_trait;
use chrono::{DateTime, Local};
use log::{debug, info};
use serde::Deserialize;
use std::{
    path::{Path, PathBuf},
    process::Stdio,
};
use tokio::process::Command;

use super::{CredentialProvider, ProviderError, SessionCredentials};

const REGION_DISABLED: &str = "RegionDisabledException";

/// Fetches session credentials by shelling out to `aws sts get-session-token`.
#[derive(Debug, Clone)]
pub struct AwsCliProvider {
    program: PathBuf,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct GetSessionTokenOutput {
    credentials: Credentials,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Credentials {
    access_key_id: String,
    secret_access_key: String,
    session_token: String,
    expiration: String,
}

impl AwsCliProvider {
    /// Locates `aws` on the search path.
    pub fn from_path() -> Result<Self, ProviderError> {
        let program = which::which("aws").map_err(ProviderError::ToolMissing)?;
        debug!("using aws cli at {}", program.display());
        Ok(Self { program })
    }

    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

#[async_trait]
impl CredentialProvider for AwsCliProvider {
    async fn fetch(
        &self,
        profile: &str,
        serial_number: &str,
        token_code: &str,
    ) -> Result<SessionCredentials, ProviderError> {
        info!("requesting session token for {serial_number} with profile {profile} via aws cli");
        let output = Command::new(&self.program)
            .args(["sts", "get-session-token", "--output", "json"])
            .args(["--profile", profile])
            .args(["--serial-number", serial_number])
            .args(["--token-code", token_code])
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(ProviderError::Launch)?;

        if !output.status.success() {
            return Err(classify(&String::from_utf8_lossy(&output.stderr)));
        }
        decode(&output.stdout)
    }
}

fn classify(stderr: &str) -> ProviderError {
    let message = stderr.trim().to_string();
    if message.contains(REGION_DISABLED) {
        ProviderError::RegionDisabled(message)
    } else {
        ProviderError::Rejected(message)
    }
}

fn decode(stdout: &[u8]) -> Result<SessionCredentials, ProviderError> {
    let GetSessionTokenOutput { credentials } = serde_json::from_slice(stdout)?;
    let expiration = DateTime::parse_from_rfc3339(&credentials.expiration)?;

    Ok(SessionCredentials {
        access_key_id: credentials.access_key_id,
        secret_access_key: credentials.secret_access_key,
        session_token: credentials.session_token,
        expiration: expiration.with_timezone(&Local),
    })
}
