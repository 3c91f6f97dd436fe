//! Text-extraction collaborators.
//!
//! A [`TextSource`] turns a certificate reference into document text. OCR is
//! not done here: [`CommandTextSource`] delegates to an external program and
//! [`FileTextSource`] reads text that was extracted beforehand.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TextSourceError {
    #[error("cannot read {reference}: {source}")]
    Io {
        reference: String,
        #[source]
        source: std::io::Error,
    },

    #[error("text extraction for {reference} timed out after {after:?}")]
    Timeout { reference: String, after: Duration },

    #[error("text extraction for {reference} failed: {reason}")]
    Failed { reference: String, reason: String },
}

/// Supplies the textual content of a certificate document.
pub trait TextSource: Send + Sync {
    fn read_text(&self, reference: &str) -> Result<String, TextSourceError>;
}

fn resolve(base_dir: Option<&Path>, reference: &str) -> PathBuf {
    let path = Path::new(reference);
    match base_dir {
        Some(base) if path.is_relative() => base.join(path),
        _ => path.to_path_buf(),
    }
}

/// Reads the referenced file as text. Invalid UTF-8 is replaced, not rejected.
#[derive(Clone, Debug, Default)]
pub struct FileTextSource {
    base_dir: Option<PathBuf>,
}

impl FileTextSource {
    pub fn new(base_dir: Option<PathBuf>) -> Self {
        Self { base_dir }
    }
}

impl TextSource for FileTextSource {
    fn read_text(&self, reference: &str) -> Result<String, TextSourceError> {
        let path = resolve(self.base_dir.as_deref(), reference);
        let bytes = std::fs::read(&path).map_err(|source| TextSourceError::Io {
            reference: reference.to_string(),
            source,
        })?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// Runs an external text extractor (e.g. `tesseract {input} stdout`) and
/// returns its standard output.
///
/// The process is killed once `timeout` elapses.
#[derive(Clone, Debug)]
pub struct CommandTextSource {
    program: String,
    args: Vec<String>,
    timeout: Duration,
    base_dir: Option<PathBuf>,
}

impl CommandTextSource {
    /// Placeholder in `args` replaced by the document path. When no argument
    /// contains it, the path is appended as the last argument.
    pub const INPUT_PLACEHOLDER: &'static str = "{input}";

    pub fn new(program: impl Into<String>, args: Vec<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args,
            timeout,
            base_dir: None,
        }
    }

    pub fn with_base_dir(mut self, base_dir: Option<PathBuf>) -> Self {
        self.base_dir = base_dir;
        self
    }

    fn command_args(&self, input: &str) -> Vec<String> {
        let mut args: Vec<String> = self
            .args
            .iter()
            .map(|a| a.replace(Self::INPUT_PLACEHOLDER, input))
            .collect();
        if !self.args.iter().any(|a| a.contains(Self::INPUT_PLACEHOLDER)) {
            args.push(input.to_string());
        }
        args
    }
}

impl TextSource for CommandTextSource {
    fn read_text(&self, reference: &str) -> Result<String, TextSourceError> {
        let input = resolve(self.base_dir.as_deref(), reference);
        let args = self.command_args(&input.to_string_lossy());
        let io_err = |source| TextSourceError::Io {
            reference: reference.to_string(),
            source,
        };

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(io_err)?;

        let output = runtime.block_on(async {
            let mut cmd = tokio::process::Command::new(&self.program);
            cmd.args(&args)
                .stdin(Stdio::null())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .kill_on_drop(true);
            tokio::time::timeout(self.timeout, cmd.output()).await
        });

        let output = match output {
            Err(_elapsed) => {
                return Err(TextSourceError::Timeout {
                    reference: reference.to_string(),
                    after: self.timeout,
                })
            }
            Ok(result) => result.map_err(io_err)?,
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(TextSourceError::Failed {
                reference: reference.to_string(),
                reason: format!("{}: {}", output.status, stderr.trim()),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_source_reads_relative_to_base_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("cert.txt"), "Date of Birth: 12/05/1990").unwrap();
        let source = FileTextSource::new(Some(dir.path().to_path_buf()));
        assert_eq!(
            source.read_text("cert.txt").unwrap(),
            "Date of Birth: 12/05/1990"
        );
    }

    #[test]
    fn file_source_decodes_invalid_utf8_lossily() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.txt");
        std::fs::write(&path, b"DOB \xff\xfe 01/02/2003").unwrap();
        let text = FileTextSource::default()
            .read_text(path.to_str().unwrap())
            .unwrap();
        assert!(text.contains("01/02/2003"));
        assert!(text.contains('\u{FFFD}'));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = FileTextSource::default()
            .read_text("/definitely/not/here.txt")
            .unwrap_err();
        assert!(matches!(err, TextSourceError::Io { .. }));
    }

    #[test]
    fn input_placeholder_substitution() {
        let with = CommandTextSource::new(
            "tesseract",
            vec!["{input}".to_string(), "stdout".to_string()],
            Duration::from_secs(1),
        );
        assert_eq!(with.command_args("a.png"), vec!["a.png", "stdout"]);

        let without = CommandTextSource::new("pdftotext", vec!["-layout".to_string()], Duration::from_secs(1));
        assert_eq!(without.command_args("a.pdf"), vec!["-layout", "a.pdf"]);
    }

    #[cfg(unix)]
    #[test]
    fn command_source_captures_stdout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ocr.txt");
        std::fs::write(&path, "born on 3rd March 1975").unwrap();
        let source = CommandTextSource::new("cat", vec![], Duration::from_secs(10));
        let text = source.read_text(path.to_str().unwrap()).unwrap();
        assert_eq!(text, "born on 3rd March 1975");
    }

    #[cfg(unix)]
    #[test]
    fn command_source_times_out() {
        let source = CommandTextSource::new(
            "sh",
            vec!["-c".to_string(), "sleep 5 # {input}".to_string()],
            Duration::from_millis(100),
        );
        let err = source.read_text("ignored.png").unwrap_err();
        assert!(matches!(err, TextSourceError::Timeout { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn command_failure_is_reported() {
        let source = CommandTextSource::new(
            "sh",
            vec!["-c".to_string(), "echo broken >&2; exit 3 # {input}".to_string()],
            Duration::from_secs(10),
        );
        let err = source.read_text("x.png").unwrap_err();
        assert!(matches!(err, TextSourceError::Failed { ref reason, .. } if reason.contains("broken")));
    }
}
