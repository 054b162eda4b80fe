//! REST API layout constants shared by every resource kind.

/// Path prefix of the versioned control-plane API.
pub const API_PREFIX: &str = "/api/v1";

/// Path segment that precedes a namespace name.
pub const NAMESPACES_SEGMENT: &str = "namespaces";

/// Prefix segment that turns a collection read into a change feed.
pub const WATCH_PREFIX: &str = "watch";

/// Query parameter carrying an encoded label selector.
pub const LABELS_PARAM: &str = "labels";

/// Query parameter carrying an encoded field selector.
pub const FIELDS_PARAM: &str = "fields";

/// Query parameter carrying the resourceVersion a watch resumes from.
pub const RESOURCE_VERSION_PARAM: &str = "resourceVersion";

/// Namespace used by the CLI when neither a flag nor the config names one.
pub const DEFAULT_NAMESPACE: &str = "default";

/// Longest watch event line a client buffers before giving up on the feed.
pub const MAX_WATCH_LINE_BYTES: usize = 4 * 1024 * 1024;
