//! Launching the built program in its own terminal window
//!
//! The editor's output panel cannot feed interactive input, so programs
//! that read from the keyboard are started in a separate terminal. The
//! launch is fire-and-forget: the child is not waited on.

use std::path::Path;
use std::process::{Child, Command};

use crate::error::{Error, Result};

/// Build the platform's terminal launch command for a binary
pub fn terminal_command(binary: &Path) -> Option<Command> {
    let binary = binary.display().to_string();

    if cfg!(target_os = "macos") {
        let script = format!(
            "tell application \"Terminal\" to do script \"'{}'\"",
            binary.replace('"', "\\\"")
        );
        let mut cmd = Command::new("osascript");
        cmd.args(["-e", &script]);
        Some(cmd)
    } else if cfg!(windows) {
        let mut cmd = Command::new("cmd");
        cmd.args(["/c", "start", "cmd", "/c", &format!("{} & pause", binary)]);
        Some(cmd)
    } else if cfg!(unix) {
        let script = format!(
            "'{}'; printf '\\nPress Enter to close...'; read _",
            binary.replace('\'', "'\\''")
        );
        let mut cmd = Command::new("x-terminal-emulator");
        cmd.args(["-e", "sh", "-c", &script]);
        Some(cmd)
    } else {
        None
    }
}

/// Start the binary in a new terminal window without waiting for it
pub fn run_in_terminal(binary: &Path) -> Result<Child> {
    let mut cmd = terminal_command(binary).ok_or(Error::UnsupportedPlatform)?;
    let program = cmd.get_program().to_string_lossy().into_owned();
    log::info!("Launching {} in {}", binary.display(), program);

    cmd.spawn()
        .map_err(|source| Error::Spawn { program, source })
}
