//! Application orchestrator.
//! Loads/merges config, initializes logging, and dispatches the subcommand to
//! the library's FileSystem operations.

use anyhow::{Result, bail};
use globset::GlobSet;
use std::path::Path;
use tracing::{debug, error, warn};

use fstree::cli::{Args, Command, CopyArgs, FindArgs, MoveArgs, build_globset, glob_matches};
use fstree::config::{CONFIG_ENV_VAR, load_config};
use fstree::output as out;
use fstree::{
    FileSystem, FsTreeError, InclusionPredicate, RelativePath, TraversalPredicate, default_config_path,
};

use crate::logging::init_tracing;

/// Run the CLI application.
pub fn run(args: Args) -> Result<()> {
    // Handle --print-config before logging init
    if args.print_config {
        print_config_location();
        return Ok(());
    }

    let mut cfg = load_config().inspect_err(|e| out::print_error(&format!("{e:#}")))?;
    args.apply_overrides(&mut cfg);

    // Held until return so the file appender flushes.
    let _guard = init_tracing(&cfg.log_level, cfg.log_file.as_deref(), cfg.json_logs)
        .inspect_err(|e| out::print_error(&format!("Failed to initialize logging: {e}")))?;

    let Some(command) = args.command.as_ref() else {
        out::print_error("no command given; run with --help to see the available commands");
        bail!("no command given");
    };
    debug!(?command, ?cfg, "Starting fstree");

    let fs = FileSystem::new();
    let result = execute(&fs, command);
    if let Err(e) = &result {
        log_failure(e);
    }
    result
}

fn print_config_location() {
    if let Some(p) = std::env::var_os(CONFIG_ENV_VAR) {
        out::print_info(&format!("Using {} (explicit):\n  {}", CONFIG_ENV_VAR, Path::new(&p).display()));
        return;
    }
    match default_config_path() {
        Ok(p) => {
            out::print_info(&format!("Default fstree config path:\n  {}", p.display()));
            if p.exists() {
                out::print_info("A config file exists at that location.");
            } else {
                out::print_info("No config file exists there; built-in defaults are used.");
            }
        }
        Err(e) => out::print_error(&format!("Could not determine a default config path: {e}")),
    }
}

fn execute(fs: &FileSystem, command: &Command) -> Result<()> {
    match command {
        Command::Copy(args) => run_copy(fs, args),
        Command::Move(MoveArgs { from, to, into }) => {
            if *into {
                fs.move_to_directory(from, to)?;
            } else {
                fs.move_path(from, to)?;
            }
            Ok(())
        }
        Command::Delete { paths } => {
            for p in paths {
                fs.delete(p)?;
            }
            Ok(())
        }
        Command::Mkdir { paths } => {
            for p in paths {
                fs.create_directory(p)?;
            }
            Ok(())
        }
        Command::Find(args) => run_find(fs, args),
    }
}

fn run_copy(fs: &FileSystem, args: &CopyArgs) -> Result<()> {
    let excludes = build_globset(&args.exclude)?;
    let keep = |rel: &RelativePath| excludes.as_ref().is_none_or(|set| !glob_matches(set, rel));
    let include: Option<InclusionPredicate<'_>> = if excludes.is_some() { Some(&keep) } else { None };

    if args.into {
        fs.copy_to_directory(&args.from, &args.to, include)?;
    } else {
        fs.copy(&args.from, &args.to, include)?;
    }
    Ok(())
}

fn run_find(fs: &FileSystem, args: &FindArgs) -> Result<()> {
    let prune = build_globset(&args.prune)?;
    let traversal = prune.map(prune_predicate);

    let mut failures = 0usize;
    for item in fs.find(&args.root, traversal) {
        match item {
            Ok(path) => out::print_user(&path.display().to_string()),
            Err(e) => {
                failures += 1;
                warn!(code = e.code(), path = %e.path().display(), error = %e, "Skipping unreadable entry");
            }
        }
    }
    if failures > 0 {
        bail!("{failures} entries under {} could not be read", args.root.display());
    }
    Ok(())
}

fn prune_predicate<'a>(set: GlobSet) -> TraversalPredicate<'a> {
    Box::new(move |dir: &Path| !glob_matches(&set, dir))
}

fn log_failure(e: &anyhow::Error) {
    if let Some(fe) = e.downcast_ref::<FsTreeError>() {
        let code = fe.code();
        match fe {
            FsTreeError::NotFound(path) => {
                error!(code, kind = "not_found", path = %path.display(), "Operation failed")
            }
            FsTreeError::AlreadyExists(path) => {
                error!(code, kind = "already_exists", path = %path.display(), "Operation failed")
            }
            FsTreeError::Io { op, path, source, .. } => {
                error!(code, kind = "io", op = *op, path = %path.display(), error = %source, "Operation failed")
            }
        }
    } else {
        error!(error = %e, "Operation failed");
    }
    out::print_error(&format!("{e:#}"));
}
