//! Harvest orchestration
//!
//! [`Harvester`] runs the whole batch: for each configured building it
//! pages through the search API until a page comes back empty, maps
//! every raw record into normalized image records, and forwards them
//! to the storage sink. A single commit at the end returns the total.

use crate::api::SearchClient;
use crate::config::Config;
use crate::error::Result;
use crate::providers::SubProviderTable;
use crate::records::normalize;
use crate::store::ImageStore;

/// The fetch-map-forward harvest loop
pub struct Harvester<S: ImageStore> {
    config: Config,
    client: SearchClient,
    table: SubProviderTable,
    store: S,
}

impl<S: ImageStore> Harvester<S> {
    /// Create a harvester from a configuration and a storage sink
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the endpoint URL is invalid.
    pub fn new(config: Config, store: S) -> Result<Self> {
        let client = SearchClient::new(&config)?;
        let table = SubProviderTable::new(config.provider.clone(), config.sub_providers.clone());
        Ok(Self {
            config,
            client,
            table,
            store,
        })
    }

    /// The storage sink, for inspecting results after a run
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Harvest every configured building and commit the sink
    ///
    /// Buildings are processed sequentially in configuration order. A
    /// building whose pages stop fetching (after retries) is logged
    /// and skipped; it does not abort the run. Returns the committed
    /// total record count.
    pub async fn run(&self) -> Result<usize> {
        tracing::info!("beginning Finna harvest");

        for building in &self.config.buildings {
            tracing::info!(building, "harvesting building");
            self.harvest_building(building).await?;
        }

        let total = self.store.commit().await?;
        tracing::info!(total, "harvest complete");
        Ok(total)
    }

    /// Harvest a single building, paging until the first empty page
    ///
    /// Returns the store's running total after this building. Storage
    /// failures propagate; fetch failures end pagination for the
    /// building with a warning.
    pub async fn harvest_building(&self, building: &str) -> Result<usize> {
        let mut page = 1;
        let mut total = 0;

        loop {
            let response = match self.client.search_page(building, page).await {
                Ok(response) => response,
                Err(e) => {
                    tracing::warn!(building, page, error = %e, "page fetch failed, ending pagination");
                    break;
                }
            };

            let Some(records) = response.records() else {
                tracing::info!(building, page, "no more records");
                break;
            };

            for record in records {
                for image in normalize(
                    record,
                    &self.table,
                    &self.config.api_base,
                    &self.config.landing_base,
                ) {
                    total = self.store.add_item(image).await?;
                }
            }

            page += 1;
        }

        tracing::info!(building, total, "building done");
        Ok(total)
    }
}
