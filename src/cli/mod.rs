//! Command-line interface definitions for the `vultr-provision` binary.
//!
//! This module centralises the clap parser structures so both the main binary
//! and the build script can reuse them when generating the manual page.

use clap::Parser;

/// Create a Vultr instance and wait until it is running.
#[derive(Debug, Parser)]
#[command(
    name = "vultr-provision",
    about = "Create a Vultr instance and wait until it is running",
    arg_required_else_help = true
)]
pub(crate) struct Cli {
    /// Label for the new instance.
    pub(crate) name: String,
    /// Name of the SSH key, as registered on the account, to install.
    #[arg(long, value_name = "KEY_NAME", required = true)]
    pub(crate) ssh: String,
    /// API key; overrides `VULTR_API_KEY` and the configuration file.
    #[arg(long, value_name = "API_KEY")]
    pub(crate) api: Option<String>,
    /// City of the target region (default `Paris`).
    #[arg(long, value_name = "CITY")]
    pub(crate) city: Option<String>,
    /// Plan identifier (default `vc2-1c-1gb`).
    #[arg(long, value_name = "PLAN")]
    pub(crate) plan: Option<String>,
    /// Operating system name (default `Debian 11 x64 (bullseye)`).
    #[arg(long, value_name = "OS")]
    pub(crate) os: Option<String>,
    /// Give up waiting for the instance after this many seconds.
    #[arg(long, value_name = "SECONDS")]
    pub(crate) wait_timeout: Option<u64>,
}
