use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Scripted globe presentation sessions.
///
/// CLI values override settings loaded from the config file.
#[derive(Parser, Debug)]
#[command(name = "presenter", about = "Globe presentation toolkit")]
pub struct CliArgs {
    /// Path to a JSON config file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory exports are written to.
    #[arg(long, global = true)]
    pub out_dir: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Canvas width in pixels.
    #[arg(long, global = true)]
    pub width: Option<u32>,

    /// Canvas height in pixels.
    #[arg(long, global = true)]
    pub height: Option<u32>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Replay a session script and print the resulting scene as JSON.
    Run {
        /// Session script (JSON).
        session: PathBuf,
    },
    /// Print the configured model catalog.
    Catalog,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_flags_parse_after_subcommand() {
        let args = CliArgs::try_parse_from([
            "presenter",
            "run",
            "demo.json",
            "--width",
            "800",
            "--out-dir",
            "out",
        ])
        .expect("parse");
        assert_eq!(
            args.command,
            Command::Run {
                session: PathBuf::from("demo.json")
            }
        );
        assert_eq!(args.width, Some(800));
        assert_eq!(args.out_dir, Some(PathBuf::from("out")));
        assert_eq!(args.height, None);
    }

    #[test]
    fn subcommand_is_required() {
        assert!(CliArgs::try_parse_from(["presenter"]).is_err());
    }
}
