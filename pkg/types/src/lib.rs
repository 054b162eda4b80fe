//! Wire types shared by the k3rs API client and its tools.

pub mod config;
pub mod configmap;
pub mod list;
pub mod meta;
pub mod quota;
pub mod resource;
pub mod selector;
pub mod status;
pub mod watch;

pub use list::ResourceList;
pub use meta::ObjectMeta;
pub use resource::Resource;
pub use selector::Selector;
pub use status::{Status, StatusReason};
pub use watch::WatchEvent;
