//! High-level inventory collection API

use std::sync::Arc;

use fortinv_api::{DeviceRecord, Endpoint};
use fortinv_client::DeviceSource;
use tracing::{debug, info, instrument};

use crate::error::InventoryError;
use crate::mapper::DeviceMapper;
use crate::sink::{Inventory, InventorySink};

/// Inventory collector
///
/// Fetches every endpoint from a [`DeviceSource`], then maps the devices. Nothing
/// is retried; the first error ends the run.
pub struct InventoryCollector {
    source: Arc<dyn DeviceSource>,
    mapper: DeviceMapper,
}

impl InventoryCollector {
    /// Create a new inventory collector
    pub fn new(source: Arc<dyn DeviceSource>, mapper: DeviceMapper) -> Self {
        Self { source, mapper }
    }

    /// Fetch devices from every endpoint, in [`Endpoint::ALL`] order
    ///
    /// # Errors
    /// Returns an error if any endpoint cannot be fetched.
    #[instrument(skip(self), fields(source = self.source.source_type()))]
    pub async fn fetch_all(&self) -> Result<Vec<(Endpoint, Vec<DeviceRecord>)>, InventoryError> {
        let mut fetched = Vec::with_capacity(Endpoint::ALL.len());

        for endpoint in Endpoint::ALL {
            let devices = self
                .source
                .fetch(endpoint)
                .await
                .map_err(|source| InventoryError::Source { endpoint, source })?;
            debug!(%endpoint, count = devices.len(), "fetched devices");
            fetched.push((endpoint, devices));
        }

        Ok(fetched)
    }

    /// Collect devices into an existing sink
    ///
    /// # Errors
    /// Returns an error if fetching fails or, under strict parsing, a device
    /// field cannot be parsed.
    pub async fn collect_into<S: InventorySink + ?Sized>(
        &self,
        sink: &mut S,
    ) -> Result<usize, InventoryError> {
        let fetched = self.fetch_all().await?;
        let total = fetched.iter().map(|(_, devices)| devices.len()).sum();

        for (endpoint, devices) in fetched {
            self.mapper.map_devices(endpoint, devices, sink)?;
        }

        Ok(total)
    }

    /// Collect a fresh inventory
    ///
    /// # Errors
    /// Returns an error if fetching fails or, under strict parsing, a device
    /// field cannot be parsed.
    #[instrument(skip(self))]
    pub async fn collect(&self) -> Result<Inventory, InventoryError> {
        info!("collecting inventory");

        let mut inventory = Inventory::new();
        let devices = self.collect_into(&mut inventory).await?;

        info!(
            devices,
            hosts = inventory.host_count(),
            groups = inventory.groups().count(),
            "inventory collection completed"
        );

        Ok(inventory)
    }
}
