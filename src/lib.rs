pub mod batch;
pub mod cli;
pub mod config;
pub mod error;
pub mod git;
pub mod item;
pub mod sink;
pub mod source;

pub use config::{CommitOrder, QueryConfig};
pub use error::{GitLogError, Result};
pub use item::{ActionData, DisplayItem};
pub use sink::{LogSink, MessageSink};
pub use source::{gather, GatherOutcome, LogStream};
