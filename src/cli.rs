use crate::config::{CommitOrder, FileConfig, QueryConfig};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Clone, Copy, Debug, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// One display line per item
    Plain,
    /// One JSON object per item
    Json,
}

#[derive(Parser, Debug)]
#[command(
    name = "git-log-source",
    version,
    about = "Streams git log entries as selectable items",
    long_about = None
)]
pub struct Args {
    /// Directory to run git in (defaults to the current directory)
    #[arg(short = 'C', long = "cwd", value_name = "DIR")]
    pub cwd: Option<PathBuf>,

    /// Draw the commit graph
    #[arg(long = "graph")]
    pub graph: bool,

    /// Show commits reachable from all refs
    #[arg(long = "all")]
    pub all: bool,

    /// Show commits oldest first
    #[arg(long = "reverse")]
    pub reverse: bool,

    /// Commit ordering
    #[arg(long = "order", value_enum)]
    pub order: Option<CommitOrder>,

    /// Output format for items
    #[arg(long = "format", value_enum, default_value = "plain")]
    pub format: OutputFormat,

    /// Git executable to run
    #[arg(long = "git", value_name = "PROGRAM", env = "GIT_LOG_SOURCE_GIT")]
    pub git_program: Option<PathBuf>,

    /// Config file (defaults to the user config directory)
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long = "debug")]
    pub debug: bool,

    /// Extra arguments passed to `git log` verbatim
    #[arg(last = true, value_name = "GIT_ARGS")]
    pub extra_args: Vec<String>,
}

impl Args {
    pub fn validate(&self) -> Result<(), String> {
        if let Some(program) = &self.git_program {
            if program.as_os_str().is_empty() {
                return Err("Git program must not be empty".to_string());
            }
        }

        if let Some(cwd) = &self.cwd {
            if !cwd.is_dir() {
                return Err(format!("Not a directory: {}", cwd.display()));
            }
        }

        Ok(())
    }

    /// Merges command-line flags over config file values.
    pub fn query_config(&self, file: FileConfig) -> QueryConfig {
        let defaults = QueryConfig::default();

        let mut extra_args = file.extra_args.unwrap_or_default();
        extra_args.extend(self.extra_args.iter().cloned());

        QueryConfig {
            cwd: self.cwd.clone(),
            graph: self.graph || file.graph.unwrap_or(defaults.graph),
            all: self.all || file.all.unwrap_or(defaults.all),
            reverse: self.reverse || file.reverse.unwrap_or(defaults.reverse),
            order: self.order.or(file.order).unwrap_or(defaults.order),
            extra_args,
            git_program: self
                .git_program
                .clone()
                .or(file.git_program)
                .unwrap_or(defaults.git_program),
        }
    }
}
