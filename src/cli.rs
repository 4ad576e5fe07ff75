//! CLI definition and parsing.
//! Defines Args/Command and provides parse() for command-line handling.
//!
//! Notes:
//! - --debug is a shorthand for --log-level debug.
//! - Global flags override values from the XML config file.

use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand, ValueHint};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::{Path, PathBuf};

use crate::config::types::{Config, LogLevel};

/// Copy, move, delete and list file trees.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Copy, move, delete and list file trees")]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Enable debug logging (equivalent to `--log-level debug`).
    #[arg(short = 'd', long, global = true, help = "Enable debug logging (shorthand for --log-level debug)")]
    pub debug: bool,

    /// Set log level. One of: quiet, normal, info, debug.
    #[arg(long, global = true, help = "Set log level: quiet, normal, info, debug")]
    pub log_level: Option<String>,

    /// Also write logs to this file.
    #[arg(long, global = true, value_hint = ValueHint::FilePath, help = "Also write logs to this file")]
    pub log_file: Option<PathBuf>,

    /// Emit logs in structured JSON.
    #[arg(long, global = true, help = "Emit logs in structured JSON")]
    pub json: bool,

    /// Print where fstree will look for the config file, then exit.
    #[arg(long, help = "Print the config file location used by fstree and exit")]
    pub print_config: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Copy a file or directory tree.
    Copy(CopyArgs),
    /// Move (rename) a file or directory.
    Move(MoveArgs),
    /// Delete files or directory trees; missing paths are ignored.
    Delete {
        #[arg(required = true, value_hint = ValueHint::AnyPath)]
        paths: Vec<PathBuf>,
    },
    /// Create directories and any missing parents.
    Mkdir {
        #[arg(required = true, value_hint = ValueHint::DirPath)]
        paths: Vec<PathBuf>,
    },
    /// List a tree, root first.
    Find(FindArgs),
}

#[derive(ClapArgs, Debug, Clone)]
pub struct CopyArgs {
    #[arg(value_hint = ValueHint::AnyPath)]
    pub from: PathBuf,
    #[arg(value_hint = ValueHint::AnyPath)]
    pub to: PathBuf,
    /// Treat TO as a directory and copy FROM into it.
    #[arg(long)]
    pub into: bool,
    /// Skip entries whose path relative to FROM matches this glob; a matching
    /// directory skips its whole subtree. Repeatable.
    #[arg(long = "exclude", value_name = "GLOB")]
    pub exclude: Vec<String>,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct MoveArgs {
    #[arg(value_hint = ValueHint::AnyPath)]
    pub from: PathBuf,
    #[arg(value_hint = ValueHint::AnyPath)]
    pub to: PathBuf,
    /// Treat TO as a directory and move FROM into it.
    #[arg(long)]
    pub into: bool,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct FindArgs {
    #[arg(value_hint = ValueHint::DirPath)]
    pub root: PathBuf,
    /// Do not list or descend into directories matching this glob. Repeatable.
    #[arg(long = "prune", value_name = "GLOB")]
    pub prune: Vec<String>,
}

impl Args {
    /// Effective log level derived from flags.
    /// Precedence: --debug > --log-level value > None (use config default).
    pub fn effective_log_level(&self) -> Option<LogLevel> {
        if self.debug {
            return Some(LogLevel::Debug);
        }
        self.log_level.as_deref().and_then(LogLevel::parse)
    }

    /// Apply CLI overrides to a loaded Config (in-place). No-ops for unset flags.
    pub fn apply_overrides(&self, cfg: &mut Config) {
        if let Some(level) = self.effective_log_level() {
            cfg.log_level = level;
        }
        if let Some(lf) = &self.log_file {
            cfg.log_file = Some(lf.clone());
        }
        if self.json {
            cfg.json_logs = true;
        }
    }
}

/// Compile repeatable `--exclude`/`--prune` globs. Empty input yields `None`.
pub fn build_globset(patterns: &[String]) -> Result<Option<GlobSet>> {
    if patterns.is_empty() {
        return Ok(None);
    }
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        builder.add(Glob::new(pat).with_context(|| format!("invalid glob '{pat}'"))?);
    }
    Ok(Some(builder.build().context("compile glob set")?))
}

/// Match a path against a glob set, ignoring a trailing separator.
pub fn glob_matches(set: &GlobSet, path: &Path) -> bool {
    let s = path.to_string_lossy();
    let trimmed = s.trim_end_matches(std::path::is_separator);
    set.is_match(trimmed) || path.file_name().is_some_and(|name| set.is_match(name))
}

pub fn parse() -> Args {
    Args::parse()
}
