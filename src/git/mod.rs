pub mod commands;
pub mod parser;
pub mod process;

pub use commands::{build_log_args, log_format};
pub use parser::parse_log_line;
pub use process::GitProcess;
