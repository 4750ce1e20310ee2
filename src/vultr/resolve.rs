//! Selector resolution: human-readable names to provider identifiers.

use tracing::debug;

use super::types::{OperatingSystem, Region, ResourceId, SshKey};
use super::VultrClient;
use crate::error::VultrError;
use crate::transport::Transport;

/// A record that can be looked up by a human-readable label.
pub trait Labelled {
    /// Stable provider identifier.
    fn id(&self) -> &ResourceId;
    /// Label compared against the selector.
    fn label(&self) -> &str;
}

impl Labelled for Region {
    fn id(&self) -> &ResourceId {
        &self.id
    }

    fn label(&self) -> &str {
        &self.city
    }
}

impl Labelled for OperatingSystem {
    fn id(&self) -> &ResourceId {
        &self.id
    }

    fn label(&self) -> &str {
        &self.name
    }
}

impl Labelled for SshKey {
    fn id(&self) -> &ResourceId {
        &self.id
    }

    fn label(&self) -> &str {
        &self.name
    }
}

/// Returns the first record, in list order, whose label equals `selector`
/// exactly (case-sensitive).
#[must_use]
pub fn first_match<'a, R: Labelled>(records: &'a [R], selector: &str) -> Option<&'a R> {
    records.iter().find(|record| record.label() == selector)
}

fn resolve_id<R: Labelled>(records: &[R], selector: &str, kind: &str) -> Option<ResourceId> {
    let id = first_match(records, selector).map(|record| record.id().clone());
    debug!(kind, selector, candidates = records.len(), resolved = ?id, "resolved selector");
    id
}

impl<T: Transport> VultrClient<T> {
    /// Resolves a city name to a region identifier.
    ///
    /// # Errors
    ///
    /// Returns [`VultrError`] when the region list cannot be fetched. A
    /// missing city is `Ok(None)`.
    pub async fn resolve_region(&self, city: &str) -> Result<Option<ResourceId>, VultrError> {
        Ok(resolve_id(&self.list_regions().await?, city, "region"))
    }

    /// Resolves an operating system name to its identifier.
    ///
    /// # Errors
    ///
    /// Returns [`VultrError`] when the OS list cannot be fetched. A missing
    /// name is `Ok(None)`.
    pub async fn resolve_os(&self, name: &str) -> Result<Option<ResourceId>, VultrError> {
        Ok(resolve_id(&self.list_os().await?, name, "os"))
    }

    /// Resolves an SSH key name to its identifier.
    ///
    /// # Errors
    ///
    /// Returns [`VultrError`] when the key list cannot be fetched. A missing
    /// name is `Ok(None)`.
    pub async fn resolve_ssh_key(&self, name: &str) -> Result<Option<ResourceId>, VultrError> {
        Ok(resolve_id(&self.list_ssh_keys().await?, name, "ssh_key"))
    }
}
