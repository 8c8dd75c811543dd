use crate::error::{Result, TrackerError};
use crate::io;
use crate::types::Action;
use serde_json::Value;
use std::path::Path;

// ---------------------------------------------------------------------------
// LineEnding
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    #[default]
    Lf,
    Crlf,
}

impl LineEnding {
    /// CRLF if the content contains any `\r\n`, LF otherwise.
    pub fn detect(content: &str) -> Self {
        if content.contains("\r\n") {
            LineEnding::Crlf
        } else {
            LineEnding::Lf
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::Crlf => "\r\n",
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset
// ---------------------------------------------------------------------------

/// The persisted action list together with the formatting details needed to
/// write it back the way it was found.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub actions: Vec<Action>,
    pub line_ending: LineEnding,
    /// Whether `actions` were decoded from a readable store on disk. False
    /// for a missing or unparseable file, which the next save must replace.
    pub parsed: bool,
}

impl Dataset {
    pub fn new(actions: Vec<Action>, line_ending: LineEnding) -> Self {
        Self {
            actions,
            line_ending,
            parsed: false,
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = read_store(path)?;
        let value: Value = serde_json::from_str(&content)?;
        Self::decode(value, LineEnding::detect(&content))
    }

    /// Load for the sync flow: a missing store, or one that is not JSON at
    /// all, reads as empty. The line ending of an unparseable file is still
    /// honoured. Valid JSON that does not hold action records is an error,
    /// so curated data is never replaced by an empty list.
    pub fn load_or_empty(path: &Path) -> Result<Self> {
        let content = match read_store(path) {
            Ok(c) => c,
            Err(TrackerError::DatasetNotFound(_)) => {
                tracing::info!(path = %path.display(), "no existing dataset, starting empty");
                return Ok(Self::default());
            }
            Err(e) => return Err(e),
        };
        let line_ending = LineEnding::detect(&content);
        match serde_json::from_str::<Value>(&content) {
            Ok(value) => Self::decode(value, line_ending),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "existing dataset is not valid JSON, starting empty");
                Ok(Self::new(Vec::new(), line_ending))
            }
        }
    }

    fn decode(value: Value, line_ending: LineEnding) -> Result<Self> {
        let records: Vec<Value> = serde_json::from_value(value)?;
        let actions = records
            .into_iter()
            .enumerate()
            .map(|(index, raw)| {
                Action::from_stored(raw)
                    .map_err(|source| TrackerError::InvalidRecord { index, source })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            actions,
            line_ending,
            parsed: true,
        })
    }

    /// Two-space indented JSON, non-ASCII left unescaped, terminated by the
    /// dataset's line ending.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let records = self
            .actions
            .iter()
            .map(Action::to_stored)
            .collect::<serde_json::Result<Vec<_>>>()?;
        let json = serde_json::to_string_pretty(&records)?;
        let mut out = match self.line_ending {
            LineEnding::Lf => json,
            LineEnding::Crlf => json.replace('\n', "\r\n"),
        };
        out.push_str(self.line_ending.as_str());
        Ok(out.into_bytes())
    }

    /// Write the dataset atomically. Returns false, without touching the file,
    /// when the serialised bytes equal what is already on disk.
    pub fn save(&self, path: &Path) -> Result<bool> {
        let data = self.to_bytes()?;
        io::write_if_changed(path, &data)
    }
}

fn read_store(path: &Path) -> Result<String> {
    match std::fs::read_to_string(path) {
        Ok(c) => Ok(c),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(TrackerError::DatasetNotFound(path.to_path_buf()))
        }
        Err(e) => Err(e.into()),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
