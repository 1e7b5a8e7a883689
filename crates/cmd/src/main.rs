use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use diagnostics::log_error;

use cmd::commands;
use cmd::common::FsContext;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(name = "verbosefs")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Append audit records to this file instead of stdout
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
    /// YAML configuration file (defaults to the VERBOSEFS_LOGFILE environment)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a directory
    Mkdir {
        path: PathBuf,
        /// Create missing parent directories
        #[arg(short, long)]
        parents: bool,
    },
    /// Delete a file or empty directory
    Rm {
        path: PathBuf,
        /// Succeed quietly when the path does not exist
        #[arg(long)]
        if_exists: bool,
    },
    /// Copy a file or directory entry
    Cp {
        source: PathBuf,
        dest: PathBuf,
        /// Replace an existing destination
        #[arg(short, long)]
        force: bool,
    },
    /// Move or rename
    Mv {
        source: PathBuf,
        dest: PathBuf,
        /// Replace an existing destination
        #[arg(short, long)]
        force: bool,
    },
    /// Create a link to TARGET named LINK
    Ln {
        target: PathBuf,
        link: PathBuf,
        /// Make a symbolic link instead of a hard link
        #[arg(short, long)]
        symbolic: bool,
    },
    /// Write stdin to a file
    Write {
        path: PathBuf,
        /// Append instead of truncating
        #[arg(short, long)]
        append: bool,
    },
    /// Update the modification time, creating the file if needed
    Touch { path: PathBuf },
    /// Change permission bits
    Chmod {
        /// Octal mode, e.g. 644
        mode: String,
        path: PathBuf,
    },
    /// Print a file (not recorded)
    Cat { path: PathBuf },
    /// List a directory (not recorded)
    Ls {
        #[arg(default_value = ".")]
        dir: PathBuf,
    },
}

fn run(cli: Cli) -> Result<()> {
    let ctx = FsContext::new(cli.log_file, cli.config);
    let fs = ctx.open_fs()?;

    match cli.command {
        Commands::Mkdir { path, parents } => commands::mkdir_command(&fs, &path, parents)?,
        Commands::Rm { path, if_exists } => {
            let _ = commands::remove_command(&fs, &path, if_exists)?;
        }
        Commands::Cp {
            source,
            dest,
            force,
        } => commands::copy_command(&fs, &source, &dest, force)?,
        Commands::Mv {
            source,
            dest,
            force,
        } => commands::move_command(&fs, &source, &dest, force)?,
        Commands::Ln {
            target,
            link,
            symbolic,
        } => commands::link_command(&fs, &target, &link, symbolic)?,
        Commands::Write { path, append } => {
            let _ = commands::write_command(&fs, &path, append, &mut std::io::stdin().lock())?;
        }
        Commands::Touch { path } => commands::touch_command(&fs, &path)?,
        Commands::Chmod { mode, path } => commands::chmod_command(&fs, &mode, &path)?,
        Commands::Cat { path } => {
            let _ = commands::cat_command(&fs, &path, &mut std::io::stdout().lock())?;
        }
        Commands::Ls { dir } => {
            let mut out = std::io::stdout().lock();
            let mut write_result = Ok(());
            commands::list_command(&fs, &dir, |line| {
                if write_result.is_ok() {
                    write_result = writeln!(out, "{line}");
                }
            })?;
            write_result?;
        }
    }

    fs.close()?;
    Ok(())
}

fn main() -> Result<()> {
    diagnostics::init();

    let cli = Cli::parse();
    run(cli).inspect_err(|e| {
        let message = format!("{e:#}");
        log_error!("verbosefs failed: {message}", message: message.as_str());
    })
}
