//! Document converters.
//!
//! The heavy lifting between markup dialects is done by `pandoc`, run as a
//! child process per conversion. A small built-in converter covers the
//! Markdown to HTML direction when pandoc is not installed.

use std::fmt;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;

use log::debug;
use pulldown_cmark::{html as md_html, Options, Parser};
use thiserror::Error;

/// Markup dialects the transcoders move between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// Markdown with PHP Markdown Extra extensions.
    MarkdownExtra,
    Html,
    DokuWiki,
}

impl Dialect {
    /// The dialect's name on the pandoc command line.
    pub fn pandoc_name(self) -> &'static str {
        match self {
            Dialect::MarkdownExtra => "markdown_phpextra",
            Dialect::Html => "html",
            Dialect::DokuWiki => "dokuwiki",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.pandoc_name())
    }
}

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Failed to start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to talk to `{program}`: {source}")]
    Io {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("`{program}` exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("`{program}` produced output that is not valid UTF-8")]
    Decode {
        program: String,
        #[source]
        source: std::string::FromUtf8Error,
    },

    #[error("The {converter} converter cannot convert {from} to {to}")]
    Unsupported {
        converter: &'static str,
        from: Dialect,
        to: Dialect,
    },
}

/// Converts text from one markup dialect to another.
pub trait Converter {
    fn convert(&self, from: Dialect, to: Dialect, text: &str) -> Result<String, ConvertError>;
}

/// Converter backed by the `pandoc` executable.
#[derive(Debug, Clone)]
pub struct Pandoc {
    program: PathBuf,
}

impl Pandoc {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn program_name(&self) -> String {
        self.program.to_string_lossy().to_string()
    }
}

impl Default for Pandoc {
    fn default() -> Self {
        Self::new("pandoc")
    }
}

impl Converter for Pandoc {
    fn convert(&self, from: Dialect, to: Dialect, text: &str) -> Result<String, ConvertError> {
        let name = self.program_name();
        debug!("running {} -f {} -t {} ({} bytes)", name, from, to, text.len());

        let mut command = Command::new(&self.program);
        command.args(["-f", from.pandoc_name(), "-t", to.pandoc_name()]);

        let (status, stdout, stderr) = run_scoped(command, text.as_bytes()).map_err(|e| match e {
            ScopedError::Spawn(source) => ConvertError::Spawn {
                program: name.clone(),
                source,
            },
            ScopedError::Io(source) => ConvertError::Io {
                program: name.clone(),
                source,
            },
        })?;

        if !status.success() {
            return Err(ConvertError::Failed {
                program: name,
                status,
                stderr: String::from_utf8_lossy(&stderr).trim().to_string(),
            });
        }

        String::from_utf8(stdout).map_err(|source| ConvertError::Decode {
            program: name,
            source,
        })
    }
}

/// In-process Markdown to HTML conversion with pulldown-cmark.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinMarkdown;

impl Converter for BuiltinMarkdown {
    fn convert(&self, from: Dialect, to: Dialect, text: &str) -> Result<String, ConvertError> {
        match (from, to) {
            (Dialect::MarkdownExtra, Dialect::Html) => {
                let options = Options::ENABLE_TABLES | Options::ENABLE_FOOTNOTES;
                let parser = Parser::new_ext(text, options);
                let mut html = String::new();
                md_html::push_html(&mut html, parser);
                Ok(html)
            }
            _ => Err(ConvertError::Unsupported {
                converter: "builtin",
                from,
                to,
            }),
        }
    }
}

enum ScopedError {
    Spawn(io::Error),
    Io(io::Error),
}

/// Owns a running child and reaps it when dropped.
///
/// If the child is still held on drop (an error path), it is killed first.
struct ChildGuard {
    child: Option<Child>,
}

impl ChildGuard {
    fn wait(mut self) -> io::Result<ExitStatus> {
        match self.child.take() {
            Some(mut child) => child.wait(),
            None => Err(io::Error::other("child already reaped")),
        }
    }
}

impl Drop for ChildGuard {
    fn drop(&mut self) {
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

/// Run a command to completion, feeding `input` on stdin and collecting
/// stdout and stderr.
///
/// stdin is written from a scoped thread while both output pipes are
/// drained, so a child that writes a lot before reading all its input cannot
/// deadlock. The child is reaped on every path.
fn run_scoped(
    mut command: Command,
    input: &[u8],
) -> Result<(ExitStatus, Vec<u8>, Vec<u8>), ScopedError> {
    let child = command
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(ScopedError::Spawn)?;

    let mut guard = ChildGuard { child: Some(child) };
    let (stdin, stdout, stderr) = match guard.child.as_mut() {
        Some(child) => (child.stdin.take(), child.stdout.take(), child.stderr.take()),
        None => (None, None, None),
    };

    let (written, out, err) = thread::scope(|scope| {
        let writer = scope.spawn(move || -> io::Result<()> {
            if let Some(mut stdin) = stdin {
                match stdin.write_all(input) {
                    // The child stopped reading; its exit status tells why.
                    Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {}
                    other => other?,
                }
            }
            Ok(())
        });

        let err_reader = scope.spawn(move || -> io::Result<Vec<u8>> {
            let mut buf = Vec::new();
            if let Some(mut stderr) = stderr {
                stderr.read_to_end(&mut buf)?;
            }
            Ok(buf)
        });

        let mut out = Vec::new();
        let out_result = match stdout {
            Some(mut stdout) => stdout.read_to_end(&mut out).map(|_| out),
            None => Ok(out),
        };

        let written = writer
            .join()
            .unwrap_or_else(|_| Err(io::Error::other("stdin writer panicked")));
        let err = err_reader
            .join()
            .unwrap_or_else(|_| Err(io::Error::other("stderr reader panicked")));

        (written, out_result, err)
    });

    written.map_err(ScopedError::Io)?;
    let stdout = out.map_err(ScopedError::Io)?;
    let stderr = err.map_err(ScopedError::Io)?;
    let status = guard.wait().map_err(ScopedError::Io)?;

    Ok((status, stdout, stderr))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pandoc_names() {
        assert_eq!(Dialect::MarkdownExtra.pandoc_name(), "markdown_phpextra");
        assert_eq!(Dialect::Html.to_string(), "html");
        assert_eq!(Dialect::DokuWiki.to_string(), "dokuwiki");
    }

    #[test]
    fn test_builtin_markdown_to_html() {
        let html = BuiltinMarkdown
            .convert(Dialect::MarkdownExtra, Dialect::Html, "# Title #\n\nHello *there*\n")
            .unwrap();
        assert_eq!(html, "<h1>Title</h1>\n<p>Hello <em>there</em></p>\n");
    }

    #[test]
    fn test_builtin_rejects_other_directions() {
        let err = BuiltinMarkdown
            .convert(Dialect::Html, Dialect::DokuWiki, "<p>x</p>")
            .unwrap_err();
        assert!(matches!(err, ConvertError::Unsupported { .. }));
    }

    #[test]
    fn test_missing_program_is_a_spawn_error() {
        let pandoc = Pandoc::new("/nonexistent/ta-sync-test/pandoc");
        let err = pandoc
            .convert(Dialect::Html, Dialect::DokuWiki, "<p>x</p>")
            .unwrap_err();
        assert!(matches!(err, ConvertError::Spawn { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_scoped_run_pipes_through_cat() {
        let (status, stdout, _) = match run_scoped(Command::new("cat"), "héllo\n".as_bytes()) {
            Ok(output) => output,
            Err(_) => panic!("cat should run"),
        };
        assert!(status.success());
        assert_eq!(String::from_utf8(stdout).unwrap(), "héllo\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_scoped_run_reports_failure_status() {
        let mut command = Command::new("sh");
        command.args(["-c", "echo oops >&2; exit 3"]);
        let (status, _, stderr) = match run_scoped(command, b"ignored") {
            Ok(output) => output,
            Err(_) => panic!("sh should run"),
        };
        assert_eq!(status.code(), Some(3));
        assert_eq!(String::from_utf8(stderr).unwrap(), "oops\n");
    }
}
