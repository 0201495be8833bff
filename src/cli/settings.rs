use anyhow::{Context, Result};
use clap::ValueEnum;
use mfa_rs::credentials::default_path;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const APP_NAME: &str = "mfa-rs";
const CONFIG_NAME: &str = "mfa";

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Native STS client
    #[default]
    Sdk,
    /// `aws sts get-session-token` from the aws cli
    Cli,
}

/// Defaults stored with `confy`, overridden by command line flags.
#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub device: String,
    pub profile: String,
    pub mfa_profile: String,
    pub credentials: Option<PathBuf>,
    pub provider: ProviderKind,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            device: String::new(),
            profile: "default".to_string(),
            mfa_profile: "mfa".to_string(),
            credentials: None,
            provider: ProviderKind::default(),
        }
    }
}

impl Settings {
    pub fn load() -> Result<Self> {
        confy::load(APP_NAME, Some(CONFIG_NAME)).context("failed to load mfa-rs settings")
    }

    /// `file` if given, else the configured path, else `~/.aws/credentials`.
    pub fn credentials_path(&self, file: Option<PathBuf>) -> Result<PathBuf> {
        match file.or_else(|| self.credentials.clone()) {
            Some(path) => Ok(path),
            None => Ok(default_path()?),
        }
    }
}
