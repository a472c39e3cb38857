use crate::error::{GitLogError, Result};
use clap::ValueEnum;
use serde::Deserialize;
use std::path::{Path, PathBuf};

const CONFIG_DIR_NAME: &str = "git-log-source";
const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CommitOrder {
    /// Commit timestamp order, children before parents
    Date,
    /// Author timestamp order, children before parents
    AuthorDate,
    /// Topological order, no interleaving of parallel histories
    #[default]
    Topo,
}

impl CommitOrder {
    pub fn flag(self) -> &'static str {
        match self {
            CommitOrder::Date => "--date-order",
            CommitOrder::AuthorDate => "--author-date-order",
            CommitOrder::Topo => "--topo-order",
        }
    }
}

/// Parameters for one gather, before the working directory is known.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryConfig {
    pub cwd: Option<PathBuf>,
    pub graph: bool,
    pub all: bool,
    pub reverse: bool,
    pub order: CommitOrder,
    /// Raw arguments appended after the structured flags
    pub extra_args: Vec<String>,
    pub git_program: PathBuf,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            cwd: None,
            graph: false,
            all: false,
            reverse: false,
            order: CommitOrder::default(),
            extra_args: Vec::new(),
            git_program: PathBuf::from("git"),
        }
    }
}

impl QueryConfig {
    /// Graph mode is on when requested explicitly or through raw arguments.
    /// Raw `--graph`/`--no-graph` flags override the explicit setting.
    pub fn graph_enabled(&self) -> bool {
        graph_flag(&self.extra_args).unwrap_or(self.graph)
    }

    /// Fixes the working directory, falling back to the current directory.
    pub fn resolve(self) -> Result<ResolvedQuery> {
        let graph = self.graph_enabled();
        let cwd = match self.cwd {
            Some(cwd) => cwd,
            None => std::env::current_dir()?,
        };

        Ok(ResolvedQuery {
            cwd,
            graph,
            all: self.all,
            reverse: self.reverse,
            order: self.order,
            extra_args: self.extra_args,
            git_program: self.git_program,
        })
    }
}

/// The last `--graph` or `--no-graph` among options, ignoring pathspecs
/// after `--`.
pub fn graph_flag(args: &[String]) -> Option<bool> {
    args.iter()
        .take_while(|arg| *arg != "--")
        .filter_map(|arg| match arg.as_str() {
            "--graph" => Some(true),
            "--no-graph" => Some(false),
            _ => None,
        })
        .last()
}

/// Immutable parameters of a running gather.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedQuery {
    pub cwd: PathBuf,
    pub graph: bool,
    pub all: bool,
    pub reverse: bool,
    pub order: CommitOrder,
    pub extra_args: Vec<String>,
    pub git_program: PathBuf,
}

/// Defaults read from the user's config file. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub graph: Option<bool>,
    pub all: Option<bool>,
    pub reverse: Option<bool>,
    pub order: Option<CommitOrder>,
    pub extra_args: Option<Vec<String>>,
    pub git_program: Option<PathBuf>,
}

impl FileConfig {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Loads an explicit config file, or the default one if it exists.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::read(path),
            None => match Self::default_path() {
                Some(path) if path.is_file() => Self::read(&path),
                _ => {
                    log::debug!("No config file found, using defaults");
                    Ok(Self::default())
                }
            },
        }
    }

    fn read(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| GitLogError::ConfigRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        log::debug!("Loaded config from {}", path.display());
        Self::parse(&content).map_err(|reason| GitLogError::ConfigParse {
            path: path.to_path_buf(),
            reason,
        })
    }

    pub fn parse(content: &str) -> std::result::Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }
}
