// Where a document comes from, and the temp-file guard around fetched input
use std::fmt;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use tempfile::TempPath;

use crate::config::FetchConfig;
use crate::types::{FormsiftError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSource {
    File(PathBuf),
    Url(String),
    Stdin,
}

impl DocumentSource {
    /// Interpret a command-line argument: `-` is stdin, http(s) is remote,
    /// anything else a local path.
    pub fn parse(arg: &str) -> Self {
        if arg == "-" {
            DocumentSource::Stdin
        } else if arg.starts_with("http://") || arg.starts_with("https://") {
            DocumentSource::Url(arg.to_string())
        } else {
            DocumentSource::File(PathBuf::from(arg))
        }
    }
}

impl fmt::Display for DocumentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentSource::File(path) => write!(f, "{}", path.display()),
            DocumentSource::Url(url) => f.write_str(url),
            DocumentSource::Stdin => f.write_str("<stdin>"),
        }
    }
}

/// A document on disk for the duration of one extraction.
///
/// Caller-owned files are borrowed as-is. Anything we had to write ourselves
/// (downloads, stdin) lives in a temp file that is removed when this value is
/// dropped, whichever way extraction ended. A failed removal is logged only.
pub struct ScopedDocument {
    label: String,
    path: PathBuf,
    temp: Option<TempPath>,
}

impl ScopedDocument {
    pub fn open(source: &DocumentSource, fetch: &FetchConfig) -> Result<Self> {
        match source {
            DocumentSource::File(path) => Ok(Self::borrowed(path)),
            DocumentSource::Url(url) => Self::fetch(url, fetch),
            DocumentSource::Stdin => Self::from_reader("<stdin>", io::stdin().lock()),
        }
    }

    pub fn borrowed(path: &Path) -> Self {
        Self {
            label: path.display().to_string(),
            path: path.to_path_buf(),
            temp: None,
        }
    }

    /// Download `url` into a temp file. No retries.
    pub fn fetch(url: &str, fetch: &FetchConfig) -> Result<Self> {
        log::info!("Fetching: {}", url);
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(fetch.timeout_secs))
            .user_agent(fetch.user_agent.as_str())
            .build()?;
        let response = client.get(url).send()?.error_for_status()?;
        Self::from_reader(url, response)
    }

    /// Spill a byte stream to a temp file
    pub fn from_reader(label: &str, mut reader: impl Read) -> Result<Self> {
        let mut file = tempfile::Builder::new()
            .prefix("formsift-")
            .suffix(".pdf")
            .tempfile()?;
        // On error `file` drops here and takes the partial download with it
        let written = io::copy(&mut reader, &mut file)?;
        file.flush()?;
        let temp = file.into_temp_path();
        log::debug!("spooled {} bytes of {} to {}", written, label, temp.display());
        Ok(Self {
            label: label.to_string(),
            path: temp.to_path_buf(),
            temp: Some(temp),
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_temporary(&self) -> bool {
        self.temp.is_some()
    }

    pub fn read(&self) -> Result<Vec<u8>> {
        fs::read(&self.path).map_err(|e| FormsiftError::Unreadable {
            document: self.label.clone(),
            reason: e.to_string(),
        })
    }
}

impl Drop for ScopedDocument {
    fn drop(&mut self) {
        if let Some(temp) = self.temp.take() {
            if let Err(e) = temp.close() {
                log::warn!("could not remove temporary file {}: {}", self.path.display(), e);
            }
        }
    }
}
