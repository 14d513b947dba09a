//! Command-line argument definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// permitlens - linked Vega-Lite dashboard over building permits
#[derive(Parser, Debug)]
#[command(name = "permitlens", author, version, about, long_about = None)]
pub struct Args {
    /// Configuration file path
    #[arg(short, long, global = true, env = "PERMITLENS_CONFIG")]
    pub config: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the dashboard spec as JSON
    Spec {
        /// Year to filter on, or "all"
        #[arg(short, long)]
        year: Option<String>,

        /// Single-line output
        #[arg(long)]
        compact: bool,
    },

    /// Render the dashboard into a spec file
    Render {
        /// Year to filter on, or "all"
        #[arg(short, long)]
        year: Option<String>,

        /// Output file, replaced on every render
        #[arg(short, long)]
        out: PathBuf,
    },

    /// Write a standalone HTML page with the year selector
    Page {
        /// Year initially selected, or "all"
        #[arg(short, long)]
        year: Option<String>,

        /// Output file
        #[arg(short, long)]
        out: PathBuf,
    },

    /// Validate the selection graph and print the interaction order
    Validate {
        /// Spec JSON file; the built spec is checked when omitted
        file: Option<PathBuf>,

        /// Also check the records file header in this directory
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },

    /// Serve the live dashboard over HTTP
    Serve {
        /// Bind address (overrides server.host)
        #[arg(long)]
        host: Option<String>,

        /// Bind port (overrides server.port)
        #[arg(short, long)]
        port: Option<u16>,

        /// Directory holding the data files (overrides server.data_dir)
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// `config` subcommands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ConfigAction {
    /// Show the resolved config file path
    Path,

    /// Get a value by dotted key, e.g. `layout.scatter_width`
    Get {
        /// Dotted key
        key: String,
    },

    /// Set a value by dotted key in the config file
    Set {
        /// Dotted key
        key: String,
        /// New value (bool, integer, float, or string)
        value: String,
    },

    /// Create a config file with default values
    Init {
        /// Where to write it (defaults to the platform config dir)
        #[arg(short, long)]
        file: Option<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the configuration as environment variables
    Export {
        /// Format as `--env KEY=VALUE` for docker run
        #[arg(long)]
        docker_env: bool,
    },
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_spec_command() {
        let args = Args::try_parse_from(["permitlens", "spec", "--year", "2019", "--compact"]).unwrap();
        let Command::Spec { year, compact } = args.command else {
            unreachable!("expected spec command");
        };
        assert_eq!(year.as_deref(), Some("2019"));
        assert!(compact);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args =
            Args::try_parse_from(["permitlens", "validate", "-v", "--config", "x.toml"]).unwrap();
        assert!(args.verbose);
        assert_eq!(args.config.as_deref(), Some("x.toml"));
    }

    #[test]
    fn test_render_requires_out() {
        assert!(Args::try_parse_from(["permitlens", "render"]).is_err());
    }

    #[test]
    fn test_parse_config_set() {
        let args =
            Args::try_parse_from(["permitlens", "config", "set", "cost.max_bins", "30"]).unwrap();
        assert!(matches!(
            args.command,
            Command::Config {
                action: ConfigAction::Set { ref key, ref value }
            } if key == "cost.max_bins" && value == "30"
        ));
    }

    #[test]
    fn test_parse_serve_overrides() {
        let args = Args::try_parse_from([
            "permitlens",
            "serve",
            "--port",
            "9000",
            "--data-dir",
            "/srv/permits",
        ])
        .unwrap();
        let Command::Serve { host, port, data_dir } = args.command else {
            unreachable!("expected serve command");
        };
        assert_eq!(host, None);
        assert_eq!(port, Some(9000));
        assert_eq!(data_dir, Some(PathBuf::from("/srv/permits")));
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
