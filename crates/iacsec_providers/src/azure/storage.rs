//! Azure storage accounts.

use serde::Serialize;

use iacsec_graph::{BoolValue, Metadata, StringValue};

use crate::walk::Walk;

/// `container_access_type = "private"` and anything unrecognised.
pub const PUBLIC_ACCESS_OFF: &str = "off";
pub const PUBLIC_ACCESS_BLOB: &str = "blob";
pub const PUBLIC_ACCESS_CONTAINER: &str = "container";

pub const DEFAULT_ENFORCE_HTTPS: bool = false;
pub const DEFAULT_MINIMUM_TLS_VERSION: &str = "";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Storage {
    pub accounts: Vec<Account>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Account {
    pub metadata: Metadata,
    pub network_rules: Vec<NetworkRule>,
    pub enforce_https: BoolValue,
    pub containers: Vec<Container>,
    pub queue_properties: QueueProperties,
    pub minimum_tls_version: StringValue,
}

impl Account {
    /// Placeholder for an account that satellites refer to but nobody declared.
    pub fn unmanaged() -> Self {
        Self {
            metadata: Metadata::unmanaged(),
            network_rules: Vec::new(),
            enforce_https: BoolValue::unmanaged(DEFAULT_ENFORCE_HTTPS),
            containers: Vec::new(),
            queue_properties: QueueProperties::unmanaged(),
            minimum_tls_version: StringValue::unmanaged(DEFAULT_MINIMUM_TLS_VERSION),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkRule {
    pub metadata: Metadata,
    pub bypass: Vec<StringValue>,
    pub allow_by_default: BoolValue,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueueProperties {
    pub metadata: Metadata,
    pub enable_logging: BoolValue,
}

impl QueueProperties {
    /// The account exists but declares no `queue_properties` block.
    pub fn defaulted() -> Self {
        Self {
            metadata: Metadata::defaulted(),
            enable_logging: BoolValue::defaulted(false),
        }
    }

    pub fn unmanaged() -> Self {
        Self {
            metadata: Metadata::unmanaged(),
            enable_logging: BoolValue::unmanaged(false),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Container {
    pub metadata: Metadata,
    pub public_access: StringValue,
}

impl Walk for Storage {
    fn walk(&self, visit: &mut dyn FnMut(&Metadata)) {
        self.accounts.walk(visit);
    }
}

impl Walk for Account {
    fn walk(&self, visit: &mut dyn FnMut(&Metadata)) {
        visit(&self.metadata);
        self.network_rules.walk(visit);
        self.enforce_https.walk(visit);
        self.containers.walk(visit);
        self.queue_properties.walk(visit);
        self.minimum_tls_version.walk(visit);
    }
}

impl Walk for NetworkRule {
    fn walk(&self, visit: &mut dyn FnMut(&Metadata)) {
        visit(&self.metadata);
        self.bypass.walk(visit);
        self.allow_by_default.walk(visit);
    }
}

impl Walk for QueueProperties {
    fn walk(&self, visit: &mut dyn FnMut(&Metadata)) {
        visit(&self.metadata);
        self.enable_logging.walk(visit);
    }
}

impl Walk for Container {
    fn walk(&self, visit: &mut dyn FnMut(&Metadata)) {
        visit(&self.metadata);
        self.public_access.walk(visit);
    }
}
