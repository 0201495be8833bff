use async_trait::async_trait;
use aws_sdk_sts::{
    error::{DisplayErrorContext, SdkError},
    operation::get_session_token::GetSessionTokenError,
    Config,
};
use chrono::{DateTime, Local};
use log::info;
use std::time::SystemTime;

use super::{profile_config, CredentialProvider, ProviderError, SessionCredentials};

/// Fetches session credentials through the native STS client.
#[derive(Debug, Default, Clone, Copy)]
pub struct StsProvider;

impl StsProvider {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CredentialProvider for StsProvider {
    async fn fetch(
        &self,
        profile: &str,
        serial_number: &str,
        token_code: &str,
    ) -> Result<SessionCredentials, ProviderError> {
        // The session token must be requested with the long-lived profile, not the mfa one
        let sdk_config = profile_config(profile).await;
        let client = aws_sdk_sts::Client::from_conf(Config::new(&sdk_config));

        info!("requesting session token for {serial_number} with profile {profile}");
        let token = client
            .get_session_token()
            .set_serial_number(Some(serial_number.to_string()))
            .set_token_code(Some(token_code.to_string()))
            .send()
            .await
            .map_err(|err| {
                let message = DisplayErrorContext(&err).to_string();
                match &err {
                    SdkError::ServiceError(e) => service_failure(e.err(), message),
                    _ => ProviderError::Rejected(message),
                }
            })?;

        let cred = token
            .credentials()
            .ok_or(ProviderError::Incomplete("credentials"))?;
        let expiry: SystemTime = cred
            .expiration()
            .ok_or(ProviderError::Incomplete("expiration"))?
            .clone()
            .try_into()
            .map_err(|_| ProviderError::Incomplete("expiration"))?;
        let expiry: DateTime<Local> = expiry.into();

        let field = |value: Option<&str>, name| {
            value
                .map(ToString::to_string)
                .ok_or(ProviderError::Incomplete(name))
        };
        Ok(SessionCredentials {
            access_key_id: field(cred.access_key_id(), "access_key_id")?,
            secret_access_key: field(cred.secret_access_key(), "secret_access_key")?,
            session_token: field(cred.session_token(), "session_token")?,
            expiration: expiry,
        })
    }
}

fn service_failure(err: &GetSessionTokenError, message: String) -> ProviderError {
    if err.is_region_disabled_exception() {
        ProviderError::RegionDisabled(message)
    } else {
        ProviderError::Rejected(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_sts::types::error::RegionDisabledException;

    #[test]
    fn region_disabled_is_told_apart() {
        let err = GetSessionTokenError::RegionDisabledException(
            RegionDisabledException::builder()
                .message("STS is not activated in this region")
                .build(),
        );
        assert!(matches!(
            service_failure(&err, "disabled".to_string()),
            ProviderError::RegionDisabled(ref m) if m == "disabled"
        ));

        let err = GetSessionTokenError::unhandled("expired");
        assert!(matches!(
            service_failure(&err, "expired".to_string()),
            ProviderError::Rejected(ref m) if m == "expired"
        ));
    }

    #[tokio::test]
    #[ignore = "needs aws credentials and a live mfa code"]
    async fn test_session() {
        let serial = std::env::var("MFA_SERIAL").unwrap();
        let code = std::env::var("MFA_CODE").unwrap();
        let creds = StsProvider::new()
            .fetch("default", &serial, &code)
            .await
            .unwrap();
        assert!(creds.expiration > Local::now());
    }
}
