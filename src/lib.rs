//! # finna-harvest
//!
//! Batch harvester for image metadata from the Finna museum-aggregator
//! search API (<https://api.finna.fi>).
//!
//! The harvester pages through the search endpoint one institution
//! ("building") at a time, normalizes each result into a flat
//! [`ImageRecord`](records::ImageRecord), classifies it into a
//! sub-provider bucket, and forwards it to an [`ImageStore`](store::ImageStore)
//! sink which buffers records and commits them at the end of the run.
//!
//! ## Design Philosophy
//!
//! - **Sequential by design** - one request at a time with a fixed
//!   inter-request delay, out of courtesy to the upstream API
//! - **Sensible defaults** - the default [`Config`] harvests the same
//!   institutions the upstream catalog does
//! - **Library-first** - no CLI or UI, purely a Rust crate for embedding
//! - **Pluggable sink** - bring your own storage by implementing
//!   [`ImageStore`](store::ImageStore)
//!
//! ## Quick Start
//!
//! ```no_run
//! use finna_harvest::{Config, Harvester, MemoryImageStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let store = MemoryImageStore::new();
//!
//!     let harvester = Harvester::new(config, store)?;
//!     let total = harvester.run().await?;
//!
//!     println!("harvested {total} image records");
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Search API client and wire types
pub mod api;
/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// Harvest orchestration (the fetch-map-forward loop)
pub mod harvester;
/// Sub-provider classification
pub mod providers;
/// Normalized record schema and mapping
pub mod records;
/// Retry logic with exponential backoff
pub mod retry;
/// Storage sinks
pub mod store;

// Re-export commonly used types
pub use api::{ApiRecord, SearchClient, SearchResponse};
pub use config::{Config, RetryConfig, SubProvider};
pub use error::{Error, Result};
pub use harvester::Harvester;
pub use providers::SubProviderTable;
pub use records::ImageRecord;
pub use store::{ImageStore, MemoryImageStore, TsvImageStore};
