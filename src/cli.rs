use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use declarative::Mode;

use crate::config::DeviceConfig;

#[derive(Parser)]
#[command(name = "srlctl")]
#[command(author = "Alberto Cavalcante")]
#[command(version)]
#[command(about = "Declarative configuration for SR Linux devices", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(flatten)]
    pub device: DeviceArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Converge the device to a desired-state file
    Apply(ApplyArgs),

    /// Show what apply would change, without changing anything
    Diff(DiffArgs),

    /// Read one resource path from the device
    Get {
        /// Resource path, e.g. /network-instance[name="default"]
        path: String,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

// ============================================================================
// Device connection
// ============================================================================

/// Connection flags; each one overrides the matching `device.toml` field
#[derive(Args, Debug, Default)]
pub struct DeviceArgs {
    /// Device settings file (defaults to ~/.config/srlctl/device.toml)
    #[arg(long, global = true, value_name = "FILE")]
    pub device_config: Option<String>,

    /// Device hostname or address
    #[arg(long, env = "SRL_HOST", global = true)]
    pub host: Option<String>,

    /// JSON-RPC server port
    #[arg(long, env = "SRL_PORT", global = true)]
    pub port: Option<u16>,

    #[arg(long, env = "SRL_USERNAME", global = true)]
    pub username: Option<String>,

    #[arg(long, env = "SRL_PASSWORD", hide_env_values = true, global = true)]
    pub password: Option<String>,

    /// Use plain HTTP instead of HTTPS
    #[arg(long, global = true)]
    pub no_tls: bool,

    /// Skip TLS certificate verification
    #[arg(long, global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,
}

impl DeviceArgs {
    /// Flags that were given, as a partial device config
    pub fn overrides(&self) -> DeviceConfig {
        DeviceConfig {
            host: self.host.clone(),
            port: self.port,
            username: self.username.clone(),
            password: self.password.clone(),
            tls: self.no_tls.then_some(false),
            insecure: self.insecure.then_some(true),
            timeout_secs: self.timeout,
        }
    }
}

// ============================================================================
// Apply / Diff
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StateArg {
    Merged,
    Deleted,
}

impl From<StateArg> for Mode {
    fn from(state: StateArg) -> Self {
        match state {
            StateArg::Merged => Mode::Merged,
            StateArg::Deleted => Mode::Deleted,
        }
    }
}

#[derive(Parser)]
pub struct ApplyArgs {
    /// Desired-state file (.toml or .json)
    #[arg(short, long, value_name = "FILE")]
    pub file: String,

    /// Override the state recorded in the file
    #[arg(short, long, value_enum)]
    pub state: Option<StateArg>,

    /// Check mode - report what would change without sending it
    #[arg(long)]
    pub check: bool,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser)]
pub struct DiffArgs {
    /// Desired-state file (.toml or .json)
    #[arg(short, long, value_name = "FILE")]
    pub file: String,

    /// Override the state recorded in the file
    #[arg(short, long, value_enum)]
    pub state: Option<StateArg>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_apply() {
        let cli = Cli::try_parse_from([
            "srlctl", "apply", "-f", "leaf1.toml", "--state", "deleted", "--check", "--host",
            "clab-leaf1",
        ])
        .unwrap();
        assert_eq!(cli.device.host.as_deref(), Some("clab-leaf1"));
        match cli.command {
            Command::Apply(args) => {
                assert_eq!(args.file, "leaf1.toml");
                assert_eq!(args.state.map(Mode::from), Some(Mode::Deleted));
                assert!(args.check);
                assert!(!args.yes);
            }
            _ => panic!("expected apply"),
        }
    }

    #[test]
    fn test_overrides_only_carry_given_flags() {
        let args = DeviceArgs {
            port: Some(8080),
            no_tls: true,
            ..Default::default()
        };
        let overrides = args.overrides();
        assert_eq!(overrides.port, Some(8080));
        assert_eq!(overrides.tls, Some(false));
        assert_eq!(overrides.insecure, None);
        assert_eq!(overrides.host, None);
    }
}
