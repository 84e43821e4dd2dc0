use std::path::PathBuf;

use clap::{Parser, Subcommand};

use ghclone::git::libgit2_version;
use ghclone::types::repo_name_from_url;
use ghclone::{Config, GitCli, RepositoryCloneService};

#[derive(Parser)]
#[command(
    name = "ghclone",
    about = "Clone repositories into a sensible default location"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Clone a repository
    Clone {
        /// Repository URL
        url: String,

        /// Directory name for the working copy (default: derived from the URL)
        #[arg(long)]
        name: Option<String>,

        /// Parent directory (default: the default clone path)
        #[arg(long)]
        into: Option<PathBuf>,
    },

    /// Print the default clone path
    DefaultPath,

    /// Check dependencies
    Doctor,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Clone { url, name, into } => cmd_clone(&url, name, into),
        Commands::DefaultPath => cmd_default_path(),
        Commands::Doctor => cmd_doctor(),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn cmd_clone(
    url: &str,
    name: Option<String>,
    into: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let name = match name {
        Some(name) => name,
        None => repo_name_from_url(url)
            .ok_or_else(|| format!("cannot derive a repository name from {}; use --name", url))?
            .to_string(),
    };

    let config = Config::load()?;
    let service = RepositoryCloneService::from_config(&config)?;
    let parent = into.unwrap_or_else(|| service.default_clone_path().to_path_buf());

    let handle = service.clone_repository(url, &name, &parent)?;
    let destination = handle.destination().to_path_buf();

    println!("Cloning {} into {}...", url, destination.display());
    handle.wait()?;
    println!("Cloned successfully");

    Ok(())
}

fn cmd_default_path() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let service = RepositoryCloneService::from_config(&config)?;
    println!("{}", service.default_clone_path().display());
    Ok(())
}

fn cmd_doctor() -> Result<(), Box<dyn std::error::Error>> {
    println!("ghclone System Check\n");

    let config_path = Config::default_path();
    let config = match Config::load_from(&config_path) {
        Ok(config) => {
            println!(
                "[{}] Config: {}",
                if config_path.exists() { "OK" } else { "INFO" },
                if config_path.exists() {
                    config_path.display().to_string()
                } else {
                    format!("{} (not found, using defaults)", config_path.display())
                }
            );
            config
        }
        Err(e) => {
            println!("[FAIL] Config: {}: {}", config_path.display(), e);
            Config::default()
        }
    };

    let git = GitCli::with_path(&config.git_path);
    let git_version = git.version();
    println!(
        "[{}] git: {}",
        if git_version.is_ok() { "OK" } else { "FAIL" },
        match &git_version {
            Ok(version) => version.clone(),
            Err(e) => format!("not usable ({})", e),
        }
    );

    println!("[OK] libgit2: {}", libgit2_version());

    let service = RepositoryCloneService::from_config(&config)?;
    let default_path = service.default_clone_path();
    println!(
        "[{}] Default clone path: {}",
        if default_path.exists() { "OK" } else { "INFO" },
        if default_path.exists() {
            default_path.display().to_string()
        } else {
            format!("{} (will be created on first clone)", default_path.display())
        }
    );

    if git_version.is_err() {
        std::process::exit(1);
    }

    Ok(())
}
