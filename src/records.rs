//! Normalized record schema and mapping
//!
//! Raw API records carry one metadata block for any number of image
//! files; normalization fans them out into one [`ImageRecord`] per
//! image path, with absolute URLs and a resolved `source` bucket.
//! Mapping is best-effort: a record missing its identifier or images
//! is skipped, never an error.

use crate::api::{ApiRecord, SubjectEntry};
use crate::providers::SubProviderTable;
use serde::{Deserialize, Serialize};

/// A normalized output image record
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecord {
    /// License URL from the record's image rights, if present
    pub license_url: Option<String>,

    /// Upstream record identifier
    pub foreign_identifier: String,

    /// Landing page URL for the record
    pub foreign_landing_url: String,

    /// Absolute URL of the image file
    pub image_url: String,

    /// Record title, if present
    pub title: Option<String>,

    /// Sub-provider bucket (or default provider) the record belongs to
    pub source: String,

    /// Flattened subject headings
    pub raw_tags: Vec<String>,
}

/// Map one raw API record into zero or more normalized image records
///
/// Produces one [`ImageRecord`] per entry in the record's `images`
/// list. Returns an empty vec (and logs at debug level) when the
/// record has no identifier or no images.
pub fn normalize(
    record: &ApiRecord,
    table: &SubProviderTable,
    api_base: &str,
    landing_base: &str,
) -> Vec<ImageRecord> {
    let Some(id) = record.id.as_deref() else {
        tracing::debug!("skipping record without id");
        return Vec::new();
    };

    if record.images.is_empty() {
        tracing::debug!(id, "skipping record without images");
        return Vec::new();
    }

    let source = record
        .buildings
        .first()
        .map(|b| table.classify(&b.value))
        .unwrap_or_else(|| table.default_provider())
        .to_string();

    let license_url = record
        .image_rights
        .as_ref()
        .and_then(|rights| rights.link.clone());

    let foreign_landing_url = format!("{landing_base}{id}");
    let raw_tags = flatten_subjects(&record.subjects);

    record
        .images
        .iter()
        .map(|path| ImageRecord {
            license_url: license_url.clone(),
            foreign_identifier: id.to_string(),
            foreign_landing_url: foreign_landing_url.clone(),
            image_url: format!("{api_base}{path}"),
            title: record.title.clone(),
            source: source.clone(),
            raw_tags: raw_tags.clone(),
        })
        .collect()
}

fn flatten_subjects(subjects: &[SubjectEntry]) -> Vec<String> {
    subjects
        .iter()
        .flat_map(|entry| match entry {
            SubjectEntry::Flat(s) => vec![s.clone()],
            SubjectEntry::Nested(list) => list.clone(),
        })
        .collect()
}
