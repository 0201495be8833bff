use anyhow::{Context, Result};
use clap::Args;
use log::debug;
use mfa_rs::{
    aws::{AwsCliProvider, CredentialProvider, StsProvider},
    refresh::{refresh, RefreshConfig},
};
use std::path::PathBuf;

use super::settings::{ProviderKind, Settings};

#[derive(Args)]
pub struct RefreshArgs {
    /// Multi-factor OTP token
    token: String,

    /// Device serial arn (default: use from configuration)
    #[arg(long, short = 'd')]
    device: Option<String>,

    /// Profile to authenticate against (default: use from configuration)
    #[arg(long, short = 'p')]
    profile: Option<String>,

    /// Section to store the session credentials in (default: use from configuration)
    #[arg(long, short = 'm')]
    mfa_profile: Option<String>,

    /// AWS credentials file (default: ~/.aws/credentials)
    #[arg(long, short = 'f')]
    file: Option<PathBuf>,

    /// How to request the session token (default: use from configuration)
    #[arg(long, value_enum)]
    provider: Option<ProviderKind>,
}

impl RefreshArgs {
    pub async fn main(self) -> Result<()> {
        let settings = Settings::load()?;

        let provider: Box<dyn CredentialProvider> =
            match self.provider.unwrap_or(settings.provider) {
                ProviderKind::Sdk => Box::new(StsProvider::new()),
                ProviderKind::Cli => {
                    let cli = AwsCliProvider::from_path()?;
                    debug!("aws cli found at {}", cli.program().display());
                    Box::new(cli)
                }
            };

        let config = RefreshConfig {
            credentials_path: settings.credentials_path(self.file)?,
            profile: self.profile.unwrap_or(settings.profile),
            mfa_profile: self.mfa_profile.unwrap_or(settings.mfa_profile),
            serial_number: self.device.unwrap_or(settings.device),
            token_code: self.token,
        };

        refresh(&config, provider.as_ref())
            .await
            .with_context(|| format!("failed to refresh [{}]", config.mfa_profile))?;

        println!(
            "Successfully updated aws MFA credentials in [{}]",
            config.mfa_profile
        );
        Ok(())
    }
}
