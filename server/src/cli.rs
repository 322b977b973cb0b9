//! CLI command definitions

use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for newsroom
#[derive(Parser, Debug)]
#[command(name = "newsroom")]
#[command(author, version, about = "AI editorial sessions for a radio team")]
#[command(long_about = r#"
Newsroom runs editorial sessions between the AI personas of a radio team
and serves the results over a JSON HTTP API.

Configuration files are loaded from (in priority order):
1. NEWSROOM_* environment variables (e.g. NEWSROOM_SERVER__BIND)
2. --config <path>      Explicit config file
3. ./newsroom.toml      Project-level config
4. ~/.config/newsroom/config.toml   Global config

Example:
  newsroom --bind 0.0.0.0:8787 -v
  newsroom --seed-default-team
  curl -X POST localhost:8787/autopilot/tick
"#)]
pub struct Cli {
    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", env = "NEWSROOM_CONFIG")]
    pub config: Option<PathBuf>,

    /// Listen address, overriding `[server] bind`
    #[arg(long, value_name = "ADDR")]
    pub bind: Option<String>,

    /// Seed the built-in team when the stored roster is empty
    #[arg(long)]
    pub seed_default_team: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    pub print_config: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_counts() {
        let cli = Cli::parse_from(["newsroom", "-vv", "--bind", "0.0.0.0:1"]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.bind.as_deref(), Some("0.0.0.0:1"));
        assert!(!cli.seed_default_team);
    }
}
