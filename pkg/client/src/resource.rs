use async_trait::async_trait;
use pkg_constants::api::{FIELDS_PARAM, LABELS_PARAM, RESOURCE_VERSION_PARAM, WATCH_PREFIX};
use pkg_types::{Resource, ResourceList, Selector};
use std::marker::PhantomData;

use crate::client::Client;
use crate::error::{Error, Result};
use crate::watcher::Watcher;

/// Uniform access to one resource kind within one namespace.
///
/// Every call is a single attempt: errors are returned as they occurred
/// and nothing is retried or cached.
#[async_trait]
pub trait ResourceInterface<K: Resource>: Send + Sync {
    /// List the objects whose labels match `selector`.
    async fn list(&self, selector: &Selector) -> Result<ResourceList<K>>;

    /// Fetch one object. An empty name is rejected without a request.
    async fn get(&self, name: &str) -> Result<K>;

    /// Delete one object. Deleting a missing object is the server's
    /// NotFound error.
    async fn delete(&self, name: &str) -> Result<()>;

    /// Create `obj`. Returns the server's representation, which carries
    /// the assigned resourceVersion and any defaulted fields.
    async fn create(&self, obj: &K) -> Result<K>;

    /// Replace the stored object with `obj`.
    ///
    /// `obj` must carry the resourceVersion the caller last observed; an
    /// empty one is rejected without a request. A stale one comes back
    /// from the server as a conflict.
    async fn update(&self, obj: &K) -> Result<K>;

    /// Open a change feed filtered by both selectors, starting after
    /// `resource_version` (empty means "from now").
    async fn watch(
        &self,
        label: &Selector,
        field: &Selector,
        resource_version: &str,
    ) -> Result<Watcher<K>>;
}

/// The `ResourceInterface` for kind `K`, bound to a namespace.
pub struct NamespacedClient<K> {
    client: Client,
    namespace: String,
    _kind: PhantomData<fn() -> K>,
}

impl<K> Clone for NamespacedClient<K> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            namespace: self.namespace.clone(),
            _kind: PhantomData,
        }
    }
}

impl<K: Resource> NamespacedClient<K> {
    pub(crate) fn new(client: Client, namespace: &str) -> Self {
        Self {
            client,
            namespace: namespace.to_string(),
            _kind: PhantomData,
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }
}

#[async_trait]
impl<K: Resource> ResourceInterface<K> for NamespacedClient<K> {
    async fn list(&self, selector: &Selector) -> Result<ResourceList<K>> {
        self.client
            .get()
            .namespace(&self.namespace)
            .resource(K::PLURAL)
            .selector_param(LABELS_PARAM, selector)
            .send()
            .await?
            .decode()
    }

    async fn get(&self, name: &str) -> Result<K> {
        if name.is_empty() {
            return Err(Error::InvalidArgument(
                "name is required parameter to get".to_string(),
            ));
        }
        self.client
            .get()
            .namespace(&self.namespace)
            .resource(K::PLURAL)
            .name(name)
            .send()
            .await?
            .decode()
    }

    async fn delete(&self, name: &str) -> Result<()> {
        if name.is_empty() {
            return Err(Error::InvalidArgument(
                "name is required parameter to delete".to_string(),
            ));
        }
        self.client
            .delete()
            .namespace(&self.namespace)
            .resource(K::PLURAL)
            .name(name)
            .send()
            .await?
            .error()
    }

    async fn create(&self, obj: &K) -> Result<K> {
        self.client
            .post()
            .namespace(&self.namespace)
            .resource(K::PLURAL)
            .body(obj)
            .send()
            .await?
            .decode()
    }

    async fn update(&self, obj: &K) -> Result<K> {
        if obj.resource_version().is_empty() {
            return Err(Error::InvalidArgument(format!(
                "invalid update object, missing resourceVersion: {} '{}'",
                K::KIND,
                obj.name()
            )));
        }
        self.client
            .put()
            .namespace(&self.namespace)
            .resource(K::PLURAL)
            .name(obj.name())
            .body(obj)
            .send()
            .await?
            .decode()
    }

    async fn watch(
        &self,
        label: &Selector,
        field: &Selector,
        resource_version: &str,
    ) -> Result<Watcher<K>> {
        let events = self
            .client
            .get()
            .prefix(WATCH_PREFIX)
            .namespace(&self.namespace)
            .resource(K::PLURAL)
            .param(RESOURCE_VERSION_PARAM, resource_version)
            .param(LABELS_PARAM, label.to_string())
            .param(FIELDS_PARAM, field.to_string())
            .watch()
            .await?;
        Ok(Watcher::new(events))
    }
}
