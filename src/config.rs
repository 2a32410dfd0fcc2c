//! Configuration management for the content store.
//!
//! Handles:
//! - Command-line argument parsing
//! - TOML configuration files (explicit, project, user-global)
//! - Merging with command-line values taking precedence

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use serde::Deserialize;

use crate::store::DEFAULT_EXTENSIONS;

/// Project configuration file looked up in the working directory
pub const PROJECT_CONFIG_FILE: &str = ".content-store.toml";

/// User-global configuration file inside the global config directory
pub const GLOBAL_CONFIG_FILE: &str = "config.toml";

/// Overrides the user-global configuration directory
pub const CONFIG_DIR_ENV: &str = "CONTENT_STORE_CONFIG_DIR";

/// Number of documents shown by `list --recent`
pub const DEFAULT_RECENT_LIMIT: usize = 40;

const LOG_LEVELS: &[&str] = &["off", "error", "warn", "info", "debug", "trace"];

/// Command-line arguments
#[derive(Debug, Parser)]
#[command(name = "content-store")]
#[command(about = "Read-only store over a directory of Markdown articles")]
#[command(version)]
pub struct Args {
    /// Content root directory
    #[arg(long, env = "CONTENT_STORE_ROOT", help = "Directory holding the articles")]
    pub root: Option<PathBuf>,

    /// Explicit configuration file
    #[arg(long, help = "Configuration file (TOML)")]
    pub config: Option<PathBuf>,

    /// Log level
    #[arg(long, help = "Log level (off, error, warn, info, debug, trace)")]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands
#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum Command {
    /// List document identifiers
    List {
        /// Show the most recently modified documents with their titles
        #[arg(long)]
        recent: bool,
        /// How many documents `--recent` shows
        #[arg(long, requires = "recent")]
        limit: Option<usize>,
        #[arg(long)]
        json: bool,
    },
    /// Show one document
    Show {
        /// Document identifier, e.g. blog/post.md
        id: String,
        /// Print the raw Markdown
        #[arg(long, conflicts_with = "json")]
        raw: bool,
        #[arg(long)]
        json: bool,
    },
    /// Check every document for structural problems
    Check {
        #[arg(long)]
        json: bool,
    },
    /// Print the file-name slug for a title
    Slug {
        #[arg(required = true, num_args = 1..)]
        title: Vec<String>,
    },
    /// Watch the content root and report reloads
    Watch,
}

/// Contents of a TOML configuration file
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub root: Option<PathBuf>,
    pub extensions: Option<Vec<String>>,
    pub recent_limit: Option<usize>,
    pub log_level: Option<String>,
}

impl FileConfig {
    /// Load a configuration file
    ///
    /// A relative `root` is resolved against the file's directory.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let mut config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        if let Some(root) = config.root.take() {
            config.root = Some(match path.parent() {
                Some(base) if root.is_relative() => base.join(root),
                _ => root,
            });
        }

        Ok(config)
    }
}

/// Combined configuration from all sources
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub root: PathBuf,
    pub extensions: Vec<String>,
    pub recent_limit: usize,
    pub log_level: String,
    /// Configuration file that was applied, if any
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            extensions: DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            recent_limit: DEFAULT_RECENT_LIMIT,
            log_level: "info".to_string(),
            config_path: None,
        }
    }
}

impl Config {
    /// Create configuration from parsed arguments and the working directory
    pub fn from_args(args: &Args) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to determine working directory")?;
        Self::resolve(args, &cwd, global_config_dir().as_deref())
    }

    /// Create configuration with explicit working and global config directories
    pub fn resolve(args: &Args, cwd: &Path, global_dir: Option<&Path>) -> Result<Self> {
        let config_path = match &args.config {
            Some(path) => {
                if !path.is_file() {
                    bail!("Config file not found: {}", path.display());
                }
                Some(path.clone())
            }
            None => Self::discover_config_file(cwd, global_dir),
        };

        let file = match &config_path {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };

        let mut config = Self::default().merge_file(file);
        config.config_path = config_path;

        if let Some(root) = &args.root {
            config.root = root.clone();
        }
        if let Some(level) = &args.log_level {
            config.log_level = level.clone();
        }

        config.validate()?;
        Ok(config)
    }

    /// Project file in the working directory, else the user-global file
    fn discover_config_file(cwd: &Path, global_dir: Option<&Path>) -> Option<PathBuf> {
        let project = cwd.join(PROJECT_CONFIG_FILE);
        if project.is_file() {
            return Some(project);
        }

        global_dir
            .map(|dir| dir.join(GLOBAL_CONFIG_FILE))
            .filter(|path| path.is_file())
    }

    fn merge_file(mut self, file: FileConfig) -> Self {
        if let Some(root) = file.root {
            self.root = root;
        }
        if let Some(extensions) = file.extensions {
            self.extensions = extensions;
        }
        if let Some(limit) = file.recent_limit {
            self.recent_limit = limit;
        }
        if let Some(level) = file.log_level {
            self.log_level = level;
        }
        self
    }

    fn validate(&self) -> Result<()> {
        if self.extensions.is_empty() {
            bail!("At least one document extension must be configured");
        }
        if !LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            bail!(
                "Unknown log level '{}', expected one of: {}",
                self.log_level,
                LOG_LEVELS.join(", ")
            );
        }
        Ok(())
    }

    /// Whether a configuration file was found and applied
    pub fn has_config_file(&self) -> bool {
        self.config_path.is_some()
    }
}

/// Directory holding the user-global configuration file
///
/// `CONTENT_STORE_CONFIG_DIR` wins over the platform config directory.
pub fn global_config_dir() -> Option<PathBuf> {
    match std::env::var_os(CONFIG_DIR_ENV) {
        Some(dir) if !dir.is_empty() => Some(PathBuf::from(dir)),
        _ => dirs::config_dir().map(|dir| dir.join("content-store")),
    }
}
