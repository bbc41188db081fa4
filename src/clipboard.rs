//! Copying a citation block to the clipboard.
//!
//! A copy either succeeds or it doesn't; failures only change the button
//! label and never propagate.

use std::io::Write as _;
use std::path::Path;
use std::process::{Command, Stdio};

use tracing::debug;

use crate::error::{Error, Result};

/// A place text can be copied to.
pub trait Clipboard {
    /// Replace the clipboard contents with `text`.
    fn write_text(&self, text: &str) -> Result<()>;
}

/// Clipboard for platforms without clipboard access. Every write fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unsupported;

impl Clipboard for Unsupported {
    fn write_text(&self, _text: &str) -> Result<()> {
        Err(Error::Clipboard("clipboard not available".to_string()))
    }
}

/// Clipboard backed by an external program reading the text on stdin
/// (`pbcopy`, `wl-copy`, `xclip`).
#[derive(Debug, Clone)]
pub struct CommandClipboard {
    program: String,
    args: Vec<String>,
}

/// Candidate programs, tried in order.
const CANDIDATES: &[(&str, &[&str])] = &[
    ("pbcopy", &[]),
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard"]),
    ("xsel", &["--clipboard", "--input"]),
];

impl CommandClipboard {
    /// Use a specific program and arguments.
    #[must_use]
    pub fn new(program: impl Into<String>, args: &[&str]) -> Self {
        Self {
            program: program.into(),
            args: args.iter().map(|a| (*a).to_string()).collect(),
        }
    }

    /// Find the first clipboard program available on `PATH`.
    #[must_use]
    pub fn detect() -> Option<Self> {
        let path = std::env::var_os("PATH")?;
        let dirs: Vec<_> = std::env::split_paths(&path).collect();
        CANDIDATES
            .iter()
            .find(|(program, _)| dirs.iter().any(|dir| is_file(&dir.join(program))))
            .map(|(program, args)| Self::new(*program, args))
    }
}

fn is_file(path: &Path) -> bool {
    path.metadata().map(|m| m.is_file()).unwrap_or(false)
}

impl Clipboard for CommandClipboard {
    fn write_text(&self, text: &str) -> Result<()> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| Error::Clipboard(format!("{}: {e}", self.program)))?;

        // Stdin is dropped (closed) before waiting so the child sees EOF.
        let written = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(text.as_bytes()),
            None => Ok(()),
        };

        // Always reap the child, even when the write failed.
        let status = child.wait()?;
        written.map_err(|e| Error::Clipboard(format!("{}: {e}", self.program)))?;
        if status.success() {
            Ok(())
        } else {
            Err(Error::Clipboard(format!("{} exited with {status}", self.program)))
        }
    }
}

/// The system clipboard, or [`Unsupported`] when none is found.
#[must_use]
pub fn system_clipboard() -> Box<dyn Clipboard> {
    match CommandClipboard::detect() {
        Some(clipboard) => Box::new(clipboard),
        None => Box::new(Unsupported),
    }
}

/// Copy `text`, returning whether it worked.
pub fn copy_text(clipboard: &dyn Clipboard, text: &str) -> bool {
    match clipboard.write_text(text) {
        Ok(()) => true,
        Err(e) => {
            debug!(error = %e, "copy failed");
            false
        }
    }
}

/// Label shown on a copy button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyLabel {
    /// Idle.
    Copy,
    /// Last copy succeeded.
    Copied,
    /// Last copy failed.
    CopyFailed,
}

impl CopyLabel {
    /// Label after a copy attempt.
    #[must_use]
    pub fn after(copied: bool) -> Self {
        if copied { Self::Copied } else { Self::CopyFailed }
    }
}

impl std::fmt::Display for CopyLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Copy => write!(f, "Copy"),
            Self::Copied => write!(f, "Copied!"),
            Self::CopyFailed => write!(f, "Copy failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    #[derive(Default)]
    struct MemoryClipboard {
        contents: RefCell<Option<String>>,
    }

    impl Clipboard for MemoryClipboard {
        fn write_text(&self, text: &str) -> Result<()> {
            *self.contents.borrow_mut() = Some(text.to_string());
            Ok(())
        }
    }

    #[test]
    fn test_unsupported_resolves_false() {
        assert!(!copy_text(&Unsupported, "@article{x}"));
    }

    #[test]
    fn test_copy_success() {
        let clipboard = MemoryClipboard::default();
        assert!(copy_text(&clipboard, "@article{x}"));
        assert_eq!(clipboard.contents.borrow().as_deref(), Some("@article{x}"));
    }

    #[test]
    fn test_missing_program_resolves_false() {
        let clipboard = CommandClipboard::new("definitely-not-a-clipboard-program", &[]);
        assert!(!copy_text(&clipboard, "text"));
    }

    #[cfg(unix)]
    #[test]
    fn test_program_reading_stdin_succeeds() {
        let clipboard = CommandClipboard::new("sh", &["-c", "cat > /dev/null"]);
        assert!(clipboard.write_text("@article{x}").is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn test_program_closing_stdin_reports_write_error() {
        // Larger than a pipe buffer, so the write fails once the child exits.
        let text = "x".repeat(1 << 20);
        let clipboard = CommandClipboard::new("true", &[]);

        let err = clipboard.write_text(&text).unwrap_err();
        assert!(matches!(err, Error::Clipboard(ref msg) if msg.starts_with("true:")));
        assert!(!copy_text(&clipboard, &text));
    }

    #[test]
    fn test_labels() {
        assert_eq!(CopyLabel::after(true), CopyLabel::Copied);
        assert_eq!(CopyLabel::after(false).to_string(), "Copy failed");
        assert_eq!(CopyLabel::Copy.to_string(), "Copy");
    }
}
