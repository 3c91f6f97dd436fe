//! Nullable text source: documents held in memory.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use dobverify_verification::{TextSource, TextSourceError};

enum Document {
    Text(String),
    Fails(String),
    TimesOut(Duration),
}

/// An in-memory text source. Unknown references fail like a missing file.
#[derive(Default)]
pub struct NullTextSource {
    documents: Mutex<HashMap<String, Document>>,
    reads: AtomicU64,
}

impl NullTextSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `text` for `reference`.
    pub fn with_document(self, reference: &str, text: &str) -> Self {
        self.set_document(reference, text);
        self
    }

    pub fn set_document(&self, reference: &str, text: &str) {
        self.documents
            .lock()
            .unwrap()
            .insert(reference.to_string(), Document::Text(text.to_string()));
    }

    /// Make reads of `reference` fail with `reason`.
    pub fn with_failure(self, reference: &str, reason: &str) -> Self {
        self.documents
            .lock()
            .unwrap()
            .insert(reference.to_string(), Document::Fails(reason.to_string()));
        self
    }

    /// Make reads of `reference` report a timeout after `after`, immediately.
    pub fn with_timeout(self, reference: &str, after: Duration) -> Self {
        self.documents
            .lock()
            .unwrap()
            .insert(reference.to_string(), Document::TimesOut(after));
        self
    }

    /// Number of `read_text` calls so far.
    pub fn reads(&self) -> u64 {
        self.reads.load(Ordering::Relaxed)
    }
}

impl TextSource for NullTextSource {
    fn read_text(&self, reference: &str) -> Result<String, TextSourceError> {
        self.reads.fetch_add(1, Ordering::Relaxed);
        match self.documents.lock().unwrap().get(reference) {
            Some(Document::Text(text)) => Ok(text.clone()),
            Some(Document::Fails(reason)) => Err(TextSourceError::Failed {
                reference: reference.to_string(),
                reason: reason.clone(),
            }),
            Some(Document::TimesOut(after)) => Err(TextSourceError::Timeout {
                reference: reference.to_string(),
                after: *after,
            }),
            None => Err(TextSourceError::Io {
                reference: reference.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such document"),
            }),
        }
    }
}
