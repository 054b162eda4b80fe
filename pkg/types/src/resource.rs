use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;

use crate::meta::ObjectMeta;

/// A namespaced object kind served by the control plane.
///
/// Implementing this trait is all a kind needs to get the full
/// list/get/create/update/delete/watch client.
pub trait Resource:
    Serialize + DeserializeOwned + Clone + Send + Sync + Unpin + 'static
{
    /// Type tag, e.g. `ResourceQuota`.
    const KIND: &'static str;
    /// Collection path segment, e.g. `resourceQuotas`.
    const PLURAL: &'static str;

    fn metadata(&self) -> &ObjectMeta;
    fn metadata_mut(&mut self) -> &mut ObjectMeta;

    fn name(&self) -> &str {
        &self.metadata().name
    }

    fn namespace(&self) -> &str {
        &self.metadata().namespace
    }

    fn resource_version(&self) -> &str {
        &self.metadata().resource_version
    }

    fn labels(&self) -> &BTreeMap<String, String> {
        &self.metadata().labels
    }

    /// Values matched by field selectors. Kinds with extra selectable
    /// fields override this and extend the metadata set.
    fn field_set(&self) -> BTreeMap<String, String> {
        self.metadata().fields()
    }
}

/// Bind a struct with a `meta: ObjectMeta` field to a kind and path segment.
#[macro_export]
macro_rules! impl_resource {
    ($ty:ty, kind = $kind:literal, plural = $plural:literal) => {
        impl $crate::resource::Resource for $ty {
            const KIND: &'static str = $kind;
            const PLURAL: &'static str = $plural;

            fn metadata(&self) -> &$crate::meta::ObjectMeta {
                &self.meta
            }

            fn metadata_mut(&mut self) -> &mut $crate::meta::ObjectMeta {
                &mut self.meta
            }
        }
    };
}
