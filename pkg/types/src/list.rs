use serde::{Deserialize, Serialize};

/// A collection read: the matching items plus the version the read was served at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceList<K> {
    /// Pass this to a watch to receive every change after the list.
    #[serde(default)]
    pub resource_version: String,
    #[serde(default = "Vec::new")]
    pub items: Vec<K>,
}

impl<K> Default for ResourceList<K> {
    fn default() -> Self {
        Self {
            resource_version: String::new(),
            items: Vec::new(),
        }
    }
}

impl<K> ResourceList<K> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<K> IntoIterator for ResourceList<K> {
    type Item = K;
    type IntoIter = std::vec::IntoIter<K>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}
