//! Version-keyed allele lookup tables.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use serde::Serialize;

use super::version::DbVersion;
use crate::error::GlError;

/// Stable database accession for an allele or G-group, e.g. `HLA00053`.
///
/// Names change between releases; the ID does not.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct AlleleId(String);

impl AlleleId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AlleleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Bidirectional `(version, name) <-> id` lookup built once from history data.
///
/// Names are stored without a namespace prefix (`A*24:03:01`, not
/// `HLA-A*24:03:01`). The index is immutable and can be shared across
/// threads; a new release means building a new index with
/// [`AlleleHistoryBuilder`].
#[derive(Debug, Clone, Default)]
pub struct AlleleHistoryIndex {
    versions: BTreeSet<DbVersion>,
    ids: HashMap<DbVersion, HashMap<String, AlleleId>>,
    names: HashMap<AlleleId, HashMap<DbVersion, String>>,
}

impl AlleleHistoryIndex {
    /// ID of `name` at `version`, `None` if the name does not exist there
    pub fn lookup_id(&self, version: DbVersion, name: &str) -> Option<&AlleleId> {
        self.ids.get(&version)?.get(name)
    }

    /// Name of `id` at `version`, `None` if the allele is absent there
    pub fn lookup_name(&self, id: &AlleleId, version: DbVersion) -> Option<&str> {
        self.names.get(id)?.get(&version).map(String::as_str)
    }

    /// Convenience: map a name straight from one release to another
    pub fn translate(&self, name: &str, source: DbVersion, target: DbVersion) -> Option<&str> {
        let id = self.lookup_id(source, name)?;
        self.lookup_name(id, target)
    }

    /// Returns true if the history has a column for `version`
    pub fn contains_version(&self, version: DbVersion) -> bool {
        self.versions.contains(&version)
    }

    /// All known versions, oldest first
    pub fn versions(&self) -> impl Iterator<Item = DbVersion> + '_ {
        self.versions.iter().copied()
    }

    /// Most recent version in the history
    pub fn latest_version(&self) -> Option<DbVersion> {
        self.versions.last().copied()
    }

    /// Number of distinct IDs
    pub fn id_count(&self) -> usize {
        self.names.len()
    }

    /// Every name an ID has carried, oldest version first
    pub fn history_of(&self, id: &AlleleId) -> Vec<(DbVersion, &str)> {
        let mut entries: Vec<(DbVersion, &str)> = self
            .names
            .get(id)
            .map(|by_version| {
                by_version
                    .iter()
                    .map(|(v, name)| (*v, name.as_str()))
                    .collect()
            })
            .unwrap_or_default();
        entries.sort_by_key(|(v, _)| *v);
        entries
    }

    /// Find the ID for `name` at any version, newest first
    pub fn find_id(&self, name: &str) -> Option<(DbVersion, &AlleleId)> {
        self.versions
            .iter()
            .rev()
            .find_map(|v| self.lookup_id(*v, name).map(|id| (*v, id)))
    }
}

/// Accumulates history rows and produces an [`AlleleHistoryIndex`]
#[derive(Debug, Default)]
pub struct AlleleHistoryBuilder {
    index: AlleleHistoryIndex,
}

impl AlleleHistoryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a version column, even if no allele exists in it
    pub fn add_version(&mut self, version: DbVersion) -> &mut Self {
        self.index.versions.insert(version);
        self
    }

    /// Record that `id` was named `name` at `version`.
    ///
    /// A name can only belong to one ID per version, and an ID can only
    /// carry one name per version.
    pub fn insert(
        &mut self,
        id: &AlleleId,
        version: DbVersion,
        name: &str,
    ) -> Result<&mut Self, GlError> {
        if let Some(existing) = self.index.lookup_name(id, version) {
            if existing != name {
                return Err(GlError::History {
                    msg: format!(
                        "{} has more than one name at {}: {}, {}",
                        id, version, existing, name
                    ),
                });
            }
        }
        if let Some(existing) = self.index.lookup_id(version, name) {
            if existing != id {
                return Err(GlError::History {
                    msg: format!(
                        "{} has more than one id at {}: {}, {}",
                        name, version, existing, id
                    ),
                });
            }
        }

        // Only mutate once both checks pass
        self.index.versions.insert(version);
        self.index
            .ids
            .entry(version)
            .or_default()
            .entry(name.to_string())
            .or_insert_with(|| id.clone());
        self.index
            .names
            .entry(id.clone())
            .or_default()
            .insert(version, name.to_string());
        Ok(self)
    }

    pub fn build(self) -> AlleleHistoryIndex {
        self.index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(label: &str) -> DbVersion {
        label.parse().unwrap()
    }

    fn sample() -> AlleleHistoryIndex {
        let mut builder = AlleleHistoryBuilder::new();
        let id = AlleleId::new("HLA00053");
        builder
            .insert(&id, v("3.20.0"), "A*24:03:01")
            .unwrap()
            .insert(&id, v("3.25.0"), "A*24:03:01:01")
            .unwrap();
        builder.add_version(v("3.30.0"));
        builder.build()
    }

    #[test]
    fn test_lookup_both_directions() {
        let index = sample();
        let id = index.lookup_id(v("3.20.0"), "A*24:03:01").unwrap();
        assert_eq!(id.as_str(), "HLA00053");
        assert_eq!(index.lookup_name(id, v("3.25.0")), Some("A*24:03:01:01"));
    }

    #[test]
    fn test_absence_is_none() {
        let index = sample();
        assert!(index.lookup_id(v("3.25.0"), "A*24:03:01").is_none());
        assert!(index.lookup_id(v("3.99.0"), "A*24:03:01").is_none());
        let id = AlleleId::new("HLA00053");
        assert!(index.lookup_name(&id, v("3.30.0")).is_none());
    }

    #[test]
    fn test_translate() {
        let index = sample();
        assert_eq!(
            index.translate("A*24:03:01", v("3.20.0"), v("3.25.0")),
            Some("A*24:03:01:01")
        );
        assert_eq!(index.translate("A*24:03:01", v("3.20.0"), v("3.30.0")), None);
    }

    #[test]
    fn test_versions() {
        let index = sample();
        assert!(index.contains_version(v("3.30.0")));
        assert!(!index.contains_version(v("3.0.0")));
        assert_eq!(index.latest_version(), Some(v("3.30.0")));
        assert_eq!(index.versions().count(), 3);
    }

    #[test]
    fn test_duplicate_name_conflict() {
        let mut builder = AlleleHistoryBuilder::new();
        builder
            .insert(&AlleleId::new("HLA00001"), v("3.20.0"), "A*01:01")
            .unwrap();
        let err = builder
            .insert(&AlleleId::new("HLA00002"), v("3.20.0"), "A*01:01")
            .unwrap_err();
        assert!(err.to_string().contains("more than one id"));
    }

    #[test]
    fn test_duplicate_id_conflict() {
        let mut builder = AlleleHistoryBuilder::new();
        let id = AlleleId::new("HLA00001");
        builder.insert(&id, v("3.20.0"), "A*01:01").unwrap();
        let err = builder.insert(&id, v("3.20.0"), "A*01:02").unwrap_err();
        assert!(err.to_string().contains("more than one name"));
    }

    #[test]
    fn test_rejected_insert_leaves_index_unchanged() {
        let mut builder = AlleleHistoryBuilder::new();
        let id = AlleleId::new("HLA00001");
        builder.insert(&id, v("3.20.0"), "A*01:01").unwrap();
        assert!(builder.insert(&id, v("3.20.0"), "A*01:02").is_err());
        assert!(builder
            .insert(&AlleleId::new("HLA00002"), v("3.20.0"), "A*01:01")
            .is_err());

        let index = builder.build();
        assert_eq!(index.versions().count(), 1);
        assert_eq!(index.id_count(), 1);
        assert!(index.lookup_id(v("3.20.0"), "A*01:02").is_none());
    }

    #[test]
    fn test_reinsert_same_id_is_idempotent() {
        let mut builder = AlleleHistoryBuilder::new();
        let id = AlleleId::new("HLA00001");
        builder.insert(&id, v("3.20.0"), "A*01:01").unwrap();
        assert!(builder.insert(&id, v("3.20.0"), "A*01:01").is_ok());
        assert_eq!(builder.build().id_count(), 1);
    }

    #[test]
    fn test_history_of_sorted() {
        let index = sample();
        let history = index.history_of(&AlleleId::new("HLA00053"));
        assert_eq!(
            history,
            vec![(v("3.20.0"), "A*24:03:01"), (v("3.25.0"), "A*24:03:01:01")]
        );
        assert!(index.history_of(&AlleleId::new("HLA99999")).is_empty());
    }

    #[test]
    fn test_find_id_prefers_newest() {
        let index = sample();
        let (version, id) = index.find_id("A*24:03:01:01").unwrap();
        assert_eq!(version, v("3.25.0"));
        assert_eq!(id.as_str(), "HLA00053");
    }

    #[test]
    fn test_index_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AlleleHistoryIndex>();
    }
}
