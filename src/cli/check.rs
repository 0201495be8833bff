use anyhow::{bail, Result};
use clap::Args;
use mfa_rs::refresh::{check_session, SessionStatus};
use std::path::PathBuf;

use super::settings::Settings;

#[derive(Args)]
pub struct CheckArgs {
    /// Section holding the session credentials (default: use from configuration)
    #[arg(long, short = 'm')]
    mfa_profile: Option<String>,

    /// AWS credentials file (default: ~/.aws/credentials)
    #[arg(long, short = 'f')]
    file: Option<PathBuf>,
}

impl CheckArgs {
    pub async fn main(self) -> Result<()> {
        let settings = Settings::load()?;
        let path = settings.credentials_path(self.file)?;
        let section = self.mfa_profile.unwrap_or(settings.mfa_profile);

        match check_session(&path, &section)? {
            SessionStatus::Valid { expires } => {
                println!("[{section}] valid until {}", expires.to_rfc3339());
                Ok(())
            }
            SessionStatus::Expired { expired } => bail!(
                "session in [{section}] expired at {}; pls use token to create new session",
                expired.to_rfc3339()
            ),
            SessionStatus::Missing => {
                bail!("no session in [{section}]; pls use token to create new session")
            }
        }
    }
}
