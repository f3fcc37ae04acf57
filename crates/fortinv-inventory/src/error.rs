//! Error types for fortinv-inventory

use fortinv_client::ClientError;
use thiserror::Error;

/// Errors that abort an inventory run
#[derive(Error, Debug)]
pub enum InventoryError {
    /// Fetching devices from the controller failed
    #[error("failed to fetch {endpoint}: {source}")]
    Source {
        /// Endpoint being fetched
        endpoint: fortinv_api::Endpoint,
        /// Underlying client error
        #[source]
        source: ClientError,
    },

    /// A present field did not have the expected format (strict parsing only)
    #[error("Failed to extract_{target} on host {host}: unexpected value {value:?}")]
    FieldParse {
        /// Host being mapped
        host: String,
        /// What was being extracted, e.g. `os_version`
        target: &'static str,
        /// Offending field value
        value: String,
    },
}

impl InventoryError {
    /// Check if the error came from the controller rather than the device data
    #[must_use]
    pub fn is_source_error(&self) -> bool {
        matches!(self, InventoryError::Source { .. })
    }
}
