use serde::{Deserialize, Serialize};

use crate::impl_resource;
use crate::list::ResourceList;
use crate::meta::ObjectMeta;

/// Resource quota for a namespace: caps on pod count, CPU and memory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceQuota {
    #[serde(flatten)]
    pub meta: ObjectMeta,
    pub hard: QuotaLimits,
    #[serde(default)]
    pub used: QuotaUsage,
}

impl_resource!(ResourceQuota, kind = "ResourceQuota", plural = "resourceQuotas");

pub type ResourceQuotaList = ResourceList<ResourceQuota>;

impl ResourceQuota {
    pub fn new(name: impl Into<String>, hard: QuotaLimits) -> Self {
        Self {
            meta: ObjectMeta::new(name),
            hard,
            used: QuotaUsage::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuotaLimits {
    /// Maximum number of pods allowed
    #[serde(default)]
    pub max_pods: Option<u32>,
    /// Maximum total CPU in millicores
    #[serde(default)]
    pub max_cpu_millis: Option<u64>,
    /// Maximum total memory in bytes
    #[serde(default)]
    pub max_memory_bytes: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuotaUsage {
    pub pods: u32,
    pub cpu_millis: u64,
    pub memory_bytes: u64,
}
