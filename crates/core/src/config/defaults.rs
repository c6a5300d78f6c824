//! Default values and functions for configuration

// Default constants
pub(crate) const DEFAULT_ENTITY_RESOURCE: &str = "pokemon";
pub(crate) const DEFAULT_USER_AGENT: &str = concat!("dexter/", env!("CARGO_PKG_VERSION"));
pub(crate) const DEFAULT_SERVER_HOST: &str = "127.0.0.1";

pub(crate) fn default_entity_resource() -> String {
    DEFAULT_ENTITY_RESOURCE.to_string()
}

pub(crate) fn default_upstream_timeout_secs() -> u64 {
    30
}

pub(crate) fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

pub(crate) fn default_batch_size() -> usize {
    100
}

pub(crate) fn default_page_size() -> usize {
    18
}

pub(crate) fn default_max_concurrent_joins() -> usize {
    20
}

pub(crate) fn default_max_chain_depth() -> usize {
    50
}

/// Only used for progress reporting; loading stops on a short batch
pub(crate) fn default_expected_total() -> usize {
    1302
}

pub(crate) fn default_server_host() -> String {
    DEFAULT_SERVER_HOST.to_string()
}

pub(crate) fn default_server_port() -> u16 {
    8680
}

pub(crate) fn default_allowed_origins() -> Vec<String> {
    Vec::new()
}
