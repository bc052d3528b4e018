//! Document-format registry.
//!
//! Maps a format identifier (e.g. "tei", "folia") to a descriptor of the
//! indexer that handles it. Pure lookup: no loading, no classpath scanning,
//! no ambient global state. Callers construct a registry explicitly and
//! share it; registration is thread-safe.

use dashmap::DashMap;

/// Describes an indexer for one input format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexerDescriptor {
    /// Canonical (lowercase) format name.
    pub name: String,
    /// Human-readable name for listings.
    pub display_name: String,
    /// Short description of the format.
    pub description: String,
}

/// Thread-safe format name to indexer-descriptor lookup.
///
/// Format names are case-insensitive and stored lowercased, matching how
/// identifiers arrive from request parameters.
pub struct FormatRegistry {
    formats: DashMap<String, IndexerDescriptor>,
}

impl FormatRegistry {
    pub fn new() -> Self {
        Self {
            formats: DashMap::new(),
        }
    }

    /// Registers a descriptor under its (lowercased) name. Re-registering a
    /// name replaces the previous descriptor.
    pub fn register(&self, descriptor: IndexerDescriptor) {
        let key = descriptor.name.to_lowercase();
        if self.formats.insert(key.clone(), descriptor).is_some() {
            tracing::warn!("Replaced existing format registration: {}", key);
        } else {
            tracing::info!("Registered document format: {}", key);
        }
    }

    /// Looks up a format by identifier; `None` when unknown.
    pub fn lookup(&self, identifier: &str) -> Option<IndexerDescriptor> {
        self.formats
            .get(&identifier.to_lowercase())
            .map(|entry| entry.value().clone())
    }

    pub fn exists(&self, identifier: &str) -> bool {
        self.formats.contains_key(&identifier.to_lowercase())
    }

    /// Sorted list of registered format names.
    pub fn list(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .formats
            .iter()
            .map(|entry| entry.key().clone())
            .collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.formats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formats.is_empty()
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::new()
    }
}
