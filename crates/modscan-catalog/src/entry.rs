use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::record::ModuleRecord;

/// Identity and metadata of the plugin that owns a module, as reported by the
/// host for the build currently loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginMetadata {
    pub slug: String,
    pub version: String,
    pub license: String,
    pub name: String,
    pub author: String,
    pub author_email: String,
}

impl PluginMetadata {
    pub fn new(slug: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            version: version.into(),
            ..Self::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_license(mut self, license: impl Into<String>) -> Self {
        self.license = license.into();
        self
    }

    pub fn with_author(mut self, author: impl Into<String>, email: impl Into<String>) -> Self {
        self.author = author.into();
        self.author_email = email.into();
        self
    }
}

/// Catalog section for one plugin. The slug is the key in [`Catalog`] and is
/// not repeated here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginEntry {
    pub version: String,
    pub license: String,
    pub name: String,
    pub author: String,
    pub author_email: String,
    #[serde(default)]
    pub modules: IndexMap<String, ModuleRecord>,
}

impl PluginEntry {
    /// Overwrites every metadata field with the freshly scanned values.
    /// Modules are left alone.
    pub fn apply_metadata(&mut self, plugin: &PluginMetadata) {
        self.version.clone_from(&plugin.version);
        self.license.clone_from(&plugin.license);
        self.name.clone_from(&plugin.name);
        self.author.clone_from(&plugin.author);
        self.author_email.clone_from(&plugin.author_email);
    }

    pub fn module(&self, slug: &str) -> Option<&ModuleRecord> {
        self.modules.get(slug)
    }
}

/// The whole persisted document, keyed by plugin slug then module slug.
///
/// Both levels are maps, so a second record for the same
/// `(plugin, module)` pair can only replace the first. Insertion order is
/// kept, and replacing a key keeps its position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    plugins: IndexMap<String, PluginEntry>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `record` under `plugin.slug`, replacing any prior record with
    /// the same module slug. Returns the replaced record, if any.
    pub fn upsert(
        &mut self,
        plugin: &PluginMetadata,
        record: ModuleRecord,
    ) -> Option<ModuleRecord> {
        let entry = self.plugins.entry(plugin.slug.clone()).or_default();
        entry.apply_metadata(plugin);
        entry.modules.insert(record.slug.clone(), record)
    }

    pub fn plugin(&self, slug: &str) -> Option<&PluginEntry> {
        self.plugins.get(slug)
    }

    pub fn module(&self, plugin: &str, module: &str) -> Option<&ModuleRecord> {
        self.plugin(plugin).and_then(|entry| entry.module(module))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PluginEntry)> {
        self.plugins.iter().map(|(slug, entry)| (slug.as_str(), entry))
    }

    /// Number of plugins.
    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    pub fn module_count(&self) -> usize {
        self.plugins.values().map(|entry| entry.modules.len()).sum()
    }
}
