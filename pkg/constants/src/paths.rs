//! Filesystem path constants.

/// Default config file path for the client CLI.
pub const DEFAULT_CLIENT_CONFIG: &str = "/etc/k3rs/client-config.yaml";
