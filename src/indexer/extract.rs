use crate::model::RelationKind;
use serde::Serialize;
use std::collections::BTreeMap;

/// Namespace separator in PHP class references.
pub const NS_SEP: char = '\\';

/// The first namespace + class pair declared by a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassIdentity {
    pub namespace: String,
    pub name: String,
}

impl ClassIdentity {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    pub fn qualname(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}{NS_SEP}{}", self.namespace, self.name)
        }
    }
}

/// Alias -> fully-qualified name for one file's `use` declarations.
///
/// A later declaration for the same alias replaces the earlier one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ImportTable {
    aliases: BTreeMap<String, String>,
}

impl ImportTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an imported path under its last segment. Returns the alias used,
    /// or `None` when the path has no usable final segment.
    pub fn insert_path(&mut self, path: &str) -> Option<String> {
        let path = path.trim().trim_start_matches(NS_SEP);
        let alias = last_segment(path);
        if alias.is_empty() {
            return None;
        }
        let alias = alias.to_string();
        self.aliases.insert(alias.clone(), path.to_string());
        Some(alias)
    }

    pub fn get(&self, alias: &str) -> Option<&str> {
        self.aliases.get(alias).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}

impl<'a> FromIterator<&'a str> for ImportTable {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut table = ImportTable::new();
        for path in iter {
            table.insert_path(path);
        }
        table
    }
}

/// A relationship call as written in source, before target resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawRelation {
    pub method: String,
    pub kind: RelationKind,
    pub target: String,
}

/// Everything pulled out of one model file.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractedModel {
    pub class: ClassIdentity,
    pub imports: ImportTable,
    pub relations: Vec<RawRelation>,
}

pub fn last_segment(path: &str) -> &str {
    path.rsplit(NS_SEP).next().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qualname_joins_with_backslash() {
        let class = ClassIdentity::new("App\\Models", "Post");
        assert_eq!(class.qualname(), "App\\Models\\Post");
    }

    #[test]
    fn import_table_last_wins_and_drops_empty() {
        let table: ImportTable = ["App\\Models\\User", "\\Legacy\\User", "App\\"]
            .into_iter()
            .collect();
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("User"), Some("Legacy\\User"));
    }
}
