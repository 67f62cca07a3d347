//! Sidecar Client - state, pub/sub and service invocation through a sidecar
//!
//! Wraps the sidecar's HTTP API with an in-memory mirror so services keep
//! working when the sidecar is absent (in-memory mode) or temporarily
//! unreachable.
//!
//! - [`StateStore`]: get/save/delete JSON documents by `(store, key)`
//! - [`EventPublisher`]: publish events and inspect the publish log
//! - [`ServiceInvoker`]: call another service, falling back to a direct URL
//!
//! # Example
//!
//! ```no_run
//! use sidecar_client::{ClientConfig, Deadline, SidecarClient};
//!
//! # async fn example() -> Result<(), sidecar_client::SidecarError> {
//! let client = SidecarClient::new(&ClientConfig::from_env())?;
//! client
//!     .save_state("cartstore", "cart:u1", &serde_json::json!({"items": []}), Deadline::Default)
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod invoke;
pub mod mirror;
pub mod pubsub;
pub mod state;
mod transport;

pub use client::SidecarClient;
pub use config::{ClientConfig, ClientMode, WritePolicy};
pub use error::{Origin, SidecarError, SidecarResult};
pub use invoke::{InvokeOptions, ServiceInvoker};
pub use mirror::{Mirror, PublishedEvent};
pub use pubsub::{EventPublisher, LocalOnlyPublisher, RemotePublisher};
pub use state::{LocalOnlyStore, RemoteBackedStore, StateStore};
pub use transport::Deadline;
