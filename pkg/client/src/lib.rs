//! Typed client for namespaced k3rs resources.
//!
//! One generic client serves every kind that implements
//! [`pkg_types::Resource`]: list, get, create, optimistic-concurrency
//! update, delete, and selector-filtered watch.
//!
//! ```ignore
//! let client = Client::new(&ClientConfig::new("http://127.0.0.1:6443"))?;
//! let quotas = client.resource_quotas("team-a");
//! let mut quota = quotas.get("compute").await?;
//! quota.hard.max_pods = Some(20);
//! let quota = quotas.update(&quota).await?;
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod request;
pub mod resource;
pub mod transport;
pub mod watcher;

#[cfg(test)]
mod fake;

pub use client::{Client, ConfigMapsNamespacer, ResourceQuotasNamespacer};
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use resource::{NamespacedClient, ResourceInterface};
pub use transport::{EventStream, Request, Response, Transport, Verb};
pub use watcher::{WatchStopper, Watcher};
