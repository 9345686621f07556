//! Ember Toolchain - external compiler invocation
//!
//! This crate shells out to an existing toolchain to build and run the
//! editor's buffer. It owns no compiler logic of its own:
//! - Writes the buffer to a fixed source file
//! - Runs the compiler with stderr captured to a fixed error log
//! - Runs the produced binary with fixed input/output files
//! - Turns both logs into display lines for the output panel
//!
//! Everything is synchronous: the caller blocks until the subprocess exits.
//! There is no timeout and no sandbox around the executed program.

mod error;
mod listing;
mod output;
mod terminal;
mod toolchain;

pub use error::{Error, Result};
pub use listing::{numbered_lines, numbered_listing};
pub use output::{BuildReport, BuildStage, ERROR_MARKER, OUTPUT_MARKER};
pub use terminal::{run_in_terminal, terminal_command};
pub use toolchain::{CompileResult, RunResult, Toolchain, ToolchainConfig};
