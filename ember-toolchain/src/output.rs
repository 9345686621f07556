//! Display lines for the output panel

use crate::error::Error;
use crate::toolchain::CompileResult;

/// Prefix for every line of compiler diagnostics
pub const ERROR_MARKER: &str = "Error: ";

/// Prefix for every line the program printed
pub const OUTPUT_MARKER: &str = " ";

/// How far a compile/run cycle got
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStage {
    /// The compiler wrote diagnostics; the program was not run
    CompileFailed,
    /// The compiler wrote nothing but exited unsuccessfully; not run
    CompilerExited(Option<i32>),
    /// The program ran and exited with this code (None if killed by a signal)
    Ran(Option<i32>),
    /// Something could not be started or written
    Aborted,
}

/// Result of one compile/run cycle, ready for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    pub stage: BuildStage,
    pub lines: Vec<String>,
}

impl BuildReport {
    pub fn new(stage: BuildStage) -> Self {
        Self {
            stage,
            lines: Vec::new(),
        }
    }

    /// Report for a cycle that failed before producing any log
    pub fn from_error(error: &Error) -> Self {
        let mut report = Self::new(BuildStage::Aborted);
        report.push_error(&error.to_string());
        report
    }

    /// Report for a compile that must stop the cycle, or `None` when the
    /// binary may run
    ///
    /// Diagnostics take precedence; a silent unsuccessful exit gets a single
    /// line naming `compiler`.
    pub fn from_compile(compiled: &CompileResult, compiler: &str) -> Option<Self> {
        if !compiled.errors.is_empty() {
            let mut report = Self::new(BuildStage::CompileFailed);
            for line in &compiled.errors {
                report.push_error(line);
            }
            return Some(report);
        }
        if !compiled.status.success() {
            let mut report = Self::new(BuildStage::CompilerExited(compiled.status.code()));
            report.push_error(&format!("{} exited with {}", compiler, compiled.status));
            return Some(report);
        }
        None
    }

    pub fn push_error(&mut self, line: &str) {
        self.lines.push(format!("{}{}", ERROR_MARKER, line));
    }

    pub fn push_output(&mut self, line: &str) {
        self.lines.push(format!("{}{}", OUTPUT_MARKER, line));
    }

    /// Whether the program itself ran
    pub fn ran(&self) -> bool {
        matches!(self.stage, BuildStage::Ran(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_markers() {
        let mut report = BuildReport::new(BuildStage::Ran(Some(0)));
        report.push_error("expected ';'");
        report.push_output("hello");
        assert_eq!(report.lines, vec!["Error: expected ';'", " hello"]);
        assert!(report.ran());
    }

    #[test]
    fn test_from_error() {
        let err = Error::Spawn {
            program: "g++".to_string(),
            source: io::Error::new(io::ErrorKind::NotFound, "not found"),
        };
        let report = BuildReport::from_error(&err);
        assert_eq!(report.stage, BuildStage::Aborted);
        assert_eq!(report.lines.len(), 1);
        assert!(report.lines[0].starts_with("Error: Failed to start g++"));
        assert!(!report.ran());
    }

    #[cfg(unix)]
    mod compile {
        use super::*;
        use std::os::unix::process::ExitStatusExt;
        use std::process::ExitStatus;

        fn compiled(code: i32, errors: &[&str]) -> CompileResult {
            CompileResult {
                status: ExitStatus::from_raw(code << 8),
                errors: errors.iter().map(|s| s.to_string()).collect(),
            }
        }

        #[test]
        fn test_clean_compile_lets_binary_run() {
            assert_eq!(BuildReport::from_compile(&compiled(0, &[]), "g++"), None);
        }

        #[test]
        fn test_diagnostics_stop_the_cycle() {
            let report = BuildReport::from_compile(&compiled(0, &["warning: unused x"]), "g++").unwrap();
            assert_eq!(report.stage, BuildStage::CompileFailed);
            assert_eq!(report.lines, vec!["Error: warning: unused x"]);

            let report = BuildReport::from_compile(&compiled(1, &["a.cpp:1: error"]), "g++").unwrap();
            assert_eq!(report.stage, BuildStage::CompileFailed);
            assert_eq!(report.lines, vec!["Error: a.cpp:1: error"]);
        }

        #[test]
        fn test_silent_failure_names_compiler() {
            let report = BuildReport::from_compile(&compiled(3, &[]), "clang++").unwrap();
            assert_eq!(report.stage, BuildStage::CompilerExited(Some(3)));
            assert_eq!(report.lines.len(), 1);
            assert!(report.lines[0].starts_with("Error: clang++ exited with"));
        }
    }
}
