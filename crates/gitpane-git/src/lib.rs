//! # gitpane-git
//!
//! Command boundary for gitpane. Describes git operations as command
//! lines, executes them through an asynchronous [`CommandChannel`], and
//! parses working tree status into [`FileChange`] values.

mod channel;
mod command;
mod error;
mod status;

pub use channel::{CommandChannel, ProcessChannel};
pub use command::{CommandLine, GitCommands, parse_version};
pub use error::{Error, Result};
pub use status::{FileChange, StatusFlag, parse_porcelain};
