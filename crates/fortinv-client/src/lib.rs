//! fortinv-client: FortiGate monitor API client
//!
//! Fetches managed switches and access points from a FortiGate switch and wifi
//! controller.
//!
//! # Example
//!
//! ```no_run
//! use fortinv_api::Endpoint;
//! use fortinv_client::{ClientSettings, DeviceSource, HttpClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = ClientSettings::new("fortigate.example.net", "api-token")
//!     .with_validate_certs(false);
//! let client = HttpClient::new(&settings)?;
//!
//! for switch in client.fetch(Endpoint::Switches).await? {
//!     println!("{}", switch.name);
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod http;
pub mod settings;
pub mod traits;

pub use error::{ClientError, Result};
pub use http::{HttpClient, USER_AGENT};
pub use settings::ClientSettings;
pub use traits::DeviceSource;
