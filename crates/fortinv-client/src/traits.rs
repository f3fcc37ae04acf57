//! Device source trait

use async_trait::async_trait;
use fortinv_api::{DeviceRecord, Endpoint};

use crate::error::Result;

/// Anything that can produce the device list of a controller endpoint
#[async_trait]
pub trait DeviceSource: Send + Sync {
    /// Fetch every device reported by `endpoint`
    async fn fetch(&self, endpoint: Endpoint) -> Result<Vec<DeviceRecord>>;

    /// Short name of the source, used in logs
    fn source_type(&self) -> &'static str;
}
