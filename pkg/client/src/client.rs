use pkg_types::Resource;
use pkg_types::configmap::ConfigMap;
use pkg_types::quota::ResourceQuota;
use std::sync::Arc;

use crate::config::ClientConfig;
use crate::error::Result;
use crate::http::HttpTransport;
use crate::request::RequestBuilder;
use crate::resource::NamespacedClient;
use crate::transport::{Transport, Verb};

/// A connection to the control plane.
///
/// Cheap to clone; clones share one transport. Namespaced clients are
/// handed out per kind and carry a clone.
#[derive(Clone)]
pub struct Client {
    transport: Arc<dyn Transport>,
}

impl Client {
    /// Connect over HTTP.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Ok(Self::with_transport(HttpTransport::new(config)?))
    }

    pub fn with_transport<T: Transport + 'static>(transport: T) -> Self {
        Self {
            transport: Arc::new(transport),
        }
    }

    pub fn verb(&self, verb: Verb) -> RequestBuilder {
        RequestBuilder::new(self.transport.clone(), verb)
    }

    pub fn get(&self) -> RequestBuilder {
        self.verb(Verb::Get)
    }

    pub fn post(&self) -> RequestBuilder {
        self.verb(Verb::Post)
    }

    pub fn put(&self) -> RequestBuilder {
        self.verb(Verb::Put)
    }

    pub fn delete(&self) -> RequestBuilder {
        self.verb(Verb::Delete)
    }

    /// Client for kind `K` in `namespace`. An empty namespace is passed
    /// through and resolved by the server.
    pub fn namespaced<K: Resource>(&self, namespace: &str) -> NamespacedClient<K> {
        NamespacedClient::new(self.clone(), namespace)
    }
}

pub trait ResourceQuotasNamespacer {
    fn resource_quotas(&self, namespace: &str) -> NamespacedClient<ResourceQuota>;
}

impl ResourceQuotasNamespacer for Client {
    fn resource_quotas(&self, namespace: &str) -> NamespacedClient<ResourceQuota> {
        self.namespaced(namespace)
    }
}

pub trait ConfigMapsNamespacer {
    fn config_maps(&self, namespace: &str) -> NamespacedClient<ConfigMap>;
}

impl ConfigMapsNamespacer for Client {
    fn config_maps(&self, namespace: &str) -> NamespacedClient<ConfigMap> {
        self.namespaced(namespace)
    }
}
