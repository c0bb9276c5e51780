//! Command-line surface of the contract runner binary
//!
//! `cargo test` forwards its filter and libtest flags (`--nocapture`,
//! `--test-threads 1`, ...) to every test binary, this one included. Those
//! are dropped here instead of failing the run.

use std::path::{Path, PathBuf};

use clap::error::{ContextKind, ContextValue, ErrorKind};
use clap::Parser;

use crate::config::{ENV_BASE_URL, ENV_EMAIL, ENV_PASSWORD, ENV_TOKEN};

pub const ENV_CONFIG: &str = "IDEACENTER_CONFIG";

#[derive(Parser, Debug)]
#[command(name = "ideacenter-contract")]
#[command(about = "Ordered contract tests for the IdeaCenter idea API")]
pub struct ContractArgs {
    /// Path to a TOML config file
    #[arg(short, long, env = ENV_CONFIG, default_value = "ideacenter.toml")]
    pub config: PathBuf,

    /// Run only this case (see --list)
    #[arg(long)]
    pub case: Option<String>,

    /// Print the ordered cases and exit
    #[arg(long)]
    pub list: bool,

    /// Output directory for results (overrides config)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl ContractArgs {
    /// Parse our own flags and return whatever clap did not recognise.
    ///
    /// Each unknown argument is removed and parsing retried, so a libtest
    /// flag followed by its value drops both. Any other clap error (a flag of
    /// ours missing its value, `--help`) is returned unchanged.
    pub fn parse_lenient<I, T>(args: I) -> Result<(Self, Vec<String>), clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let mut argv: Vec<String> = args.into_iter().map(Into::into).collect();
        let mut ignored = Vec::new();

        loop {
            let err = match Self::try_parse_from(&argv) {
                Ok(parsed) => return Ok((parsed, ignored)),
                Err(e) if e.kind() == ErrorKind::UnknownArgument => e,
                Err(e) => return Err(e),
            };

            let Some(ContextValue::String(invalid)) = err.get(ContextKind::InvalidArg) else {
                return Err(err);
            };
            let attached = format!("{invalid}=");
            let Some(index) = argv
                .iter()
                .skip(1)
                .position(|a| a == invalid || a.starts_with(&attached))
            else {
                return Err(err);
            };
            ignored.push(argv.remove(index + 1));
        }
    }
}

/// Whether anything points the runner at a deployment: an existing config
/// file, `IDEACENTER_CONFIG`, or any `IDEACENTER_*` endpoint/credential
/// variable. When nothing does, the live suite has nothing to run against.
pub fn deployment_configured<F>(config_path: &Path, lookup: F) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    config_path.exists()
        || [ENV_CONFIG, ENV_BASE_URL, ENV_TOKEN, ENV_EMAIL, ENV_PASSWORD]
            .iter()
            .any(|key| lookup(key).is_some_and(|v| !v.trim().is_empty()))
}
