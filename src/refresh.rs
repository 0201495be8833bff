use chrono::{DateTime, FixedOffset, Local};
use log::info;
use std::path::{Path, PathBuf};

use crate::{
    aws::{CredentialProvider, SessionCredentials},
    credentials::CredentialsFile,
    Error, Result,
};

/// Everything one refresh run needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshConfig {
    /// Profile holding the long-lived credentials to authenticate with.
    pub profile: String,
    /// Section that receives the session credentials.
    pub mfa_profile: String,
    /// ARN or serial number of the MFA device.
    pub serial_number: String,
    /// One-time code shown by the MFA device.
    pub token_code: String,
    pub credentials_path: PathBuf,
}

impl RefreshConfig {
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("profile", &self.profile),
            ("mfa profile", &self.mfa_profile),
            ("serial number", &self.serial_number),
            ("token code", &self.token_code),
        ];
        if let Some((name, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(Error::InvalidInput(format!("you must specify a {name}")));
        }
        for (name, value) in [("profile", &self.profile), ("mfa profile", &self.mfa_profile)] {
            if value.contains(['\n', '\r']) {
                return Err(Error::InvalidInput(format!(
                    "{name} {value:?} must be a single line"
                )));
            }
        }
        if self.token_code.len() != 6 || !self.token_code.chars().all(|c| c.is_ascii_digit()) {
            return Err(Error::InvalidInput(format!(
                "token code {:?} is not a 6 digit code",
                self.token_code
            )));
        }
        if self.profile == self.mfa_profile {
            return Err(Error::InvalidInput(format!(
                "refusing to overwrite the long-lived credentials in [{}]",
                self.profile
            )));
        }
        Ok(())
    }
}

/// Fetches session credentials and stores them in the configured section.
///
/// The file is parsed before the provider is called and only written after
/// both succeed, so any earlier failure leaves it untouched.
pub async fn refresh(
    config: &RefreshConfig,
    provider: &dyn CredentialProvider,
) -> Result<SessionCredentials> {
    config.validate()?;
    let mut file = CredentialsFile::load(&config.credentials_path)?;

    let creds = provider
        .fetch(&config.profile, &config.serial_number, &config.token_code)
        .await?;

    file.apply(&config.mfa_profile, &creds);
    file.save()?;
    info!(
        "Updated [{}] with credentials expiring at {}",
        config.mfa_profile,
        creds.expiration.to_rfc3339()
    );
    Ok(creds)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Valid { expires: DateTime<FixedOffset> },
    Expired { expired: DateTime<FixedOffset> },
    /// No expiration recorded in the section.
    Missing,
}

impl SessionStatus {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid { .. })
    }
}

/// Reports whether `section` holds a session that is still valid.
pub fn check_session(path: &Path, section: &str) -> Result<SessionStatus> {
    let file = CredentialsFile::load(path)?;
    let now = Local::now();

    Ok(match file.session_expiry(section)? {
        Some(dt) if dt > now => SessionStatus::Valid { expires: dt },
        Some(dt) => SessionStatus::Expired { expired: dt },
        None => SessionStatus::Missing,
    })
}
