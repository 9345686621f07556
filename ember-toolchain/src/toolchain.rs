//! Compiler and program invocation
//!
//! The toolchain works through a fixed set of files in its working
//! directory. Every cycle overwrites them:
//!
//! ```text
//! buffer --> temp_code.cpp --[compiler]--> temp_output
//!                              |
//!                              +-- stderr --> compile_errors.txt
//!
//! input.txt --stdin--> temp_output --stdout+stderr--> program_output.txt
//! ```

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::output::{BuildReport, BuildStage};

#[cfg(windows)]
const DEFAULT_BINARY: &str = "temp_output.exe";
#[cfg(not(windows))]
const DEFAULT_BINARY: &str = "temp_output";

/// Where and how to build
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolchainConfig {
    /// Compiler program, looked up on PATH
    pub compiler: String,
    /// Compiler arguments; `{source}` and `{binary}` are substituted
    pub args: Vec<String>,
    /// Directory holding all work files
    pub work_dir: PathBuf,
    pub source_file: String,
    pub binary_file: String,
    pub error_log: String,
    pub input_file: String,
    pub output_log: String,
    /// Written to the input file before every run
    pub stdin: String,
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        Self {
            compiler: "g++".to_string(),
            args: vec![
                "{source}".to_string(),
                "-o".to_string(),
                "{binary}".to_string(),
            ],
            work_dir: PathBuf::from("."),
            source_file: "temp_code.cpp".to_string(),
            binary_file: DEFAULT_BINARY.to_string(),
            error_log: "compile_errors.txt".to_string(),
            input_file: "input.txt".to_string(),
            output_log: "program_output.txt".to_string(),
            stdin: String::new(),
        }
    }
}

/// Outcome of the compile step
#[derive(Debug)]
pub struct CompileResult {
    pub status: ExitStatus,
    /// Raw lines of the error log
    pub errors: Vec<String>,
}

impl CompileResult {
    /// Whether the binary should be run
    pub fn succeeded(&self) -> bool {
        self.errors.is_empty() && self.status.success()
    }
}

/// Outcome of the run step
#[derive(Debug)]
pub struct RunResult {
    pub status: ExitStatus,
    /// Raw lines of the output log
    pub output: Vec<String>,
}

/// Delegates compile and run to external processes
#[derive(Debug, Clone, Default)]
pub struct Toolchain {
    config: ToolchainConfig,
}

impl Toolchain {
    pub fn new(config: ToolchainConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ToolchainConfig {
        &self.config
    }

    pub fn set_stdin(&mut self, text: impl Into<String>) {
        self.config.stdin = text.into();
    }

    pub fn source_path(&self) -> PathBuf {
        self.config.work_dir.join(&self.config.source_file)
    }

    pub fn binary_path(&self) -> PathBuf {
        self.config.work_dir.join(&self.config.binary_file)
    }

    pub fn error_log_path(&self) -> PathBuf {
        self.config.work_dir.join(&self.config.error_log)
    }

    pub fn input_path(&self) -> PathBuf {
        self.config.work_dir.join(&self.config.input_file)
    }

    pub fn output_log_path(&self) -> PathBuf {
        self.config.work_dir.join(&self.config.output_log)
    }

    /// Compiler arguments with placeholders filled in
    pub fn compiler_args(&self) -> Vec<String> {
        let source = self.source_path();
        let binary = self.binary_path();
        let source = source.to_string_lossy();
        let binary = binary.to_string_lossy();
        self.config
            .args
            .iter()
            .map(|arg| arg.replace("{source}", &source).replace("{binary}", &binary))
            .collect()
    }

    /// Write the lines to the source file, each newline-terminated
    pub fn write_source(&self, lines: &[String]) -> Result<PathBuf> {
        let path = self.source_path();
        let file = File::create(&path).map_err(Error::file(&path))?;
        let mut writer = BufWriter::new(file);
        for line in lines {
            writeln!(writer, "{}", line).map_err(Error::file(&path))?;
        }
        writer.flush().map_err(Error::file(&path))?;
        Ok(path)
    }

    /// Write the source and run the compiler with stderr sent to the error log
    pub fn compile(&self, lines: &[String]) -> Result<CompileResult> {
        self.write_source(lines)?;

        let log_path = self.error_log_path();
        let log = File::create(&log_path).map_err(Error::file(&log_path))?;

        let args = self.compiler_args();
        log::info!("Compiling: {} {}", self.config.compiler, args.join(" "));

        let status = Command::new(&self.config.compiler)
            .args(&args)
            .stdin(Stdio::null())
            .stderr(Stdio::from(log))
            .status()
            .map_err(|source| Error::Spawn {
                program: self.config.compiler.clone(),
                source,
            })?;

        let errors = read_lines(&log_path)?;
        log::debug!(
            "Compiler exited with {}, {} diagnostic lines",
            status,
            errors.len()
        );

        Ok(CompileResult { status, errors })
    }

    /// Run the built binary with the input file on stdin and both output
    /// streams sent to the output log
    pub fn run(&self) -> Result<RunResult> {
        let input_path = self.input_path();
        fs::write(&input_path, &self.config.stdin).map_err(Error::file(&input_path))?;
        let input = File::open(&input_path).map_err(Error::file(&input_path))?;

        let output_path = self.output_log_path();
        let stdout = File::create(&output_path).map_err(Error::file(&output_path))?;
        let stderr = stdout.try_clone().map_err(Error::file(&output_path))?;

        let binary = self.binary_path();
        log::info!("Running {}", binary.display());

        let status = Command::new(&binary)
            .stdin(Stdio::from(input))
            .stdout(Stdio::from(stdout))
            .stderr(Stdio::from(stderr))
            .status()
            .map_err(|source| Error::Spawn {
                program: binary.display().to_string(),
                source,
            })?;

        let output = read_lines(&output_path)?;
        log::debug!("Program exited with {}", status);

        Ok(RunResult { status, output })
    }

    /// Full cycle: compile, and run only if the compiler was silent and
    /// exited successfully
    pub fn compile_and_run(&self, lines: &[String]) -> Result<BuildReport> {
        let compiled = self.compile(lines)?;
        if let Some(report) = BuildReport::from_compile(&compiled, &self.config.compiler) {
            return Ok(report);
        }

        let ran = self.run()?;
        let mut report = BuildReport::new(BuildStage::Ran(ran.status.code()));
        for line in &ran.output {
            report.push_output(line);
        }
        Ok(report)
    }
}

fn read_lines(path: &Path) -> Result<Vec<String>> {
    let bytes = fs::read(path).map_err(Error::file(path))?;
    Ok(String::from_utf8_lossy(&bytes)
        .lines()
        .map(str::to_string)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ToolchainConfig::default();
        assert_eq!(config.compiler, "g++");
        assert_eq!(config.source_file, "temp_code.cpp");
        assert_eq!(config.error_log, "compile_errors.txt");
        assert_eq!(config.input_file, "input.txt");
        assert_eq!(config.output_log, "program_output.txt");
        assert!(config.stdin.is_empty());
    }

    #[test]
    fn test_compiler_args_substitution() {
        let toolchain = Toolchain::new(ToolchainConfig {
            work_dir: PathBuf::from("build"),
            ..Default::default()
        });
        let args = toolchain.compiler_args();
        assert_eq!(args.len(), 3);
        assert_eq!(
            PathBuf::from(&args[0]),
            Path::new("build").join("temp_code.cpp")
        );
        assert_eq!(args[1], "-o");
        assert_eq!(PathBuf::from(&args[2]), toolchain.binary_path());
    }

    #[test]
    fn test_config_from_partial_toml_fields() {
        let config: ToolchainConfig =
            serde_json::from_str(r#"{"compiler": "clang++", "stdin": "5\n"}"#).unwrap();
        assert_eq!(config.compiler, "clang++");
        assert_eq!(config.stdin, "5\n");
        assert_eq!(config.source_file, "temp_code.cpp");
    }
}
