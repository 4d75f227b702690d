//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `sync`: Add missing keys to the resource tables
//! - `minify`: Rewrite mature lookup keys to numeric indices
//! - `translate`: Fill untranslated entries through a translation service
//! - `init`: Write a default configuration file

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    /// Get the verbose flag from the command's common args.
    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Sync(cmd)) => cmd.common.verbose,
            Some(Command::Minify(cmd)) => cmd.common.verbose,
            Some(Command::Translate(cmd)) => cmd.common.verbose,
            Some(Command::Init) | None => false,
        }
    }
}

/// Common arguments shared by all commands.
#[derive(Debug, Clone, Default, Args)]
pub struct CommonArgs {
    /// Project root directory (default: current directory)
    #[arg(long)]
    pub source_root: Option<PathBuf>,

    /// Resource table directory (overrides config file)
    #[arg(long)]
    pub resource_dir: Option<PathBuf>,

    /// Source language, never machine-translated (overrides config file)
    #[arg(long)]
    pub default_language: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Args)]
pub struct SyncCommand {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Report what would change without writing; fail if anything would
    #[arg(long)]
    pub check: bool,
}

#[derive(Debug, Args)]
pub struct MinifyCommand {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Write rewritten sources and tables here (default is dry-run)
    #[arg(long)]
    pub out_dir: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct TranslateCommand {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Translate this identity again even if it has a translation
    /// (`namespace.key`, repeatable)
    #[arg(long, value_name = "IDENTITY")]
    pub retranslate: Vec<String>,

    /// List what would be translated without calling the service
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Add missing keys to the resource tables and report unused ones
    Sync(SyncCommand),
    /// Replace fully translated lookup keys with numeric indices
    Minify(MinifyCommand),
    /// Machine-translate untranslated table entries
    Translate(TranslateCommand),
    /// Initialize a new .loctextrc.json configuration file
    Init,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_translate_flags() {
        let args = Arguments::parse_from([
            "loctext",
            "translate",
            "--retranslate",
            "default.Hello",
            "--retranslate",
            "menu.Open",
            "--dry-run",
            "-v",
        ]);
        let Some(Command::Translate(cmd)) = &args.command else {
            panic!("expected translate");
        };
        assert_eq!(cmd.retranslate, vec!["default.Hello", "menu.Open"]);
        assert!(cmd.dry_run);
        assert!(args.verbose());
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Arguments::command().debug_assert();
    }
}
