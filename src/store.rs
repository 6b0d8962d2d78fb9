//! Storage sinks for normalized image records
//!
//! The harvester talks to storage through the [`ImageStore`] trait:
//! `add_item` forwards one record and returns the running total,
//! `commit` finalizes the run and returns the final total. Two
//! implementations are provided: an in-memory sink for tests and
//! embedding, and a buffered tab-separated file sink matching the
//! loader format the upstream catalog ingests.

use crate::error::{Error, Result};
use crate::records::ImageRecord;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

/// Default number of buffered records before a flush to disk
pub const DEFAULT_FLUSH_THRESHOLD: usize = 100;

/// Storage sink for normalized image records
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Forward one record to the sink
    ///
    /// Returns the running total of records added so far.
    async fn add_item(&self, record: ImageRecord) -> Result<usize>;

    /// Finalize the sink, flushing any buffered records
    ///
    /// Returns the total number of records added over the sink's
    /// lifetime.
    async fn commit(&self) -> Result<usize>;
}

/// In-memory sink that keeps every record
///
/// Intended for tests and for embedders that post-process records
/// themselves.
#[derive(Debug, Default)]
pub struct MemoryImageStore {
    records: Mutex<Vec<ImageRecord>>,
}

impl MemoryImageStore {
    /// Create an empty in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all records added so far
    pub async fn records(&self) -> Vec<ImageRecord> {
        self.records.lock().await.clone()
    }
}

#[async_trait]
impl ImageStore for MemoryImageStore {
    async fn add_item(&self, record: ImageRecord) -> Result<usize> {
        let mut records = self.records.lock().await;
        records.push(record);
        Ok(records.len())
    }

    async fn commit(&self) -> Result<usize> {
        Ok(self.records.lock().await.len())
    }
}

/// Buffered tab-separated file sink
///
/// Records are buffered in memory and appended to a timestamped
/// `image_{provider}_{timestamp}.tsv` file whenever the buffer reaches
/// the flush threshold, and once more on commit. Absent optional
/// fields are written as `\N` (the loader's NULL marker); tags are
/// written as a JSON array.
pub struct TsvImageStore {
    path: PathBuf,
    flush_threshold: usize,
    state: Mutex<TsvState>,
}

#[derive(Default)]
struct TsvState {
    buffer: Vec<ImageRecord>,
    total: usize,
}

impl TsvImageStore {
    /// Create a TSV store writing into `output_dir`
    ///
    /// The output filename embeds the provider name and the current
    /// UTC timestamp, so repeated runs never collide.
    pub fn new(output_dir: impl AsRef<Path>, provider: &str) -> Self {
        let timestamp = chrono::Utc::now().format("%Y%m%d%H%M%S");
        let path = output_dir
            .as_ref()
            .join(format!("image_{provider}_{timestamp}.tsv"));
        Self {
            path,
            flush_threshold: DEFAULT_FLUSH_THRESHOLD,
            state: Mutex::new(TsvState::default()),
        }
    }

    /// Override the flush threshold (records buffered before a write)
    pub fn with_flush_threshold(mut self, threshold: usize) -> Self {
        self.flush_threshold = threshold.max(1);
        self
    }

    /// Path of the output file
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn flush(&self, buffer: &mut Vec<ImageRecord>) -> Result<()> {
        if buffer.is_empty() {
            return Ok(());
        }

        let mut lines = String::new();
        for record in buffer.iter() {
            lines.push_str(&tsv_line(record)?);
            lines.push('\n');
        }

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| Error::Storage(format!("open {}: {e}", self.path.display())))?;
        file.write_all(lines.as_bytes())
            .await
            .map_err(|e| Error::Storage(format!("write {}: {e}", self.path.display())))?;
        file.flush()
            .await
            .map_err(|e| Error::Storage(format!("flush {}: {e}", self.path.display())))?;

        tracing::debug!(records = buffer.len(), path = %self.path.display(), "flushed buffer");
        buffer.clear();
        Ok(())
    }
}

#[async_trait]
impl ImageStore for TsvImageStore {
    async fn add_item(&self, record: ImageRecord) -> Result<usize> {
        let mut state = self.state.lock().await;
        state.buffer.push(record);
        state.total += 1;

        if state.buffer.len() >= self.flush_threshold {
            let TsvState { buffer, .. } = &mut *state;
            self.flush(buffer).await?;
        }

        Ok(state.total)
    }

    async fn commit(&self) -> Result<usize> {
        let mut state = self.state.lock().await;
        let TsvState { buffer, .. } = &mut *state;
        self.flush(buffer).await?;
        Ok(state.total)
    }
}

fn tsv_line(record: &ImageRecord) -> Result<String> {
    let tags = serde_json::to_string(&record.raw_tags)?;
    Ok([
        tsv_field(record.license_url.as_deref()),
        tsv_field(Some(&record.foreign_identifier)),
        tsv_field(Some(&record.foreign_landing_url)),
        tsv_field(Some(&record.image_url)),
        tsv_field(record.title.as_deref()),
        tsv_field(Some(&record.source)),
        tsv_field(Some(&tags)),
    ]
    .join("\t"))
}

// NULLs as \N, embedded separators replaced so lines stay parseable
fn tsv_field(value: Option<&str>) -> String {
    match value {
        None => "\\N".to_string(),
        Some(v) => v.replace(['\t', '\n', '\r'], " "),
    }
}
