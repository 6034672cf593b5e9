use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Relationship helpers recognised on a model method body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RelationKind {
    HasOne,
    HasMany,
    BelongsTo,
    BelongsToMany,
    MorphTo,
    MorphOne,
    MorphMany,
    MorphToMany,
    HasOneThrough,
    HasManyThrough,
}

impl RelationKind {
    pub const ALL: [RelationKind; 10] = [
        RelationKind::HasOne,
        RelationKind::HasMany,
        RelationKind::BelongsTo,
        RelationKind::BelongsToMany,
        RelationKind::MorphTo,
        RelationKind::MorphOne,
        RelationKind::MorphMany,
        RelationKind::MorphToMany,
        RelationKind::HasOneThrough,
        RelationKind::HasManyThrough,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RelationKind::HasOne => "hasOne",
            RelationKind::HasMany => "hasMany",
            RelationKind::BelongsTo => "belongsTo",
            RelationKind::BelongsToMany => "belongsToMany",
            RelationKind::MorphTo => "morphTo",
            RelationKind::MorphOne => "morphOne",
            RelationKind::MorphMany => "morphMany",
            RelationKind::MorphToMany => "morphToMany",
            RelationKind::HasOneThrough => "hasOneThrough",
            RelationKind::HasManyThrough => "hasManyThrough",
        }
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RelationKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        RelationKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == value)
            .ok_or_else(|| format!("unknown relation kind: {value}"))
    }
}

/// One discovered model class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelNode {
    /// Fully-qualified class name, e.g. `App\Models\Post`.
    pub id: String,
    /// Simple class name.
    pub label: String,
    #[serde(rename = "path")]
    pub source_path: String,
}

/// One relationship declaration, directed from the declaring model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipEdge {
    pub from: String,
    /// Resolved target; not guaranteed to be a scanned node.
    pub to: String,
    #[serde(rename = "label")]
    pub relation_name: String,
    #[serde(rename = "title")]
    pub relation_kind: RelationKind,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelGraph {
    pub nodes: Vec<ModelNode>,
    pub edges: Vec<RelationshipEdge>,
}

impl ModelGraph {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: &str) -> Option<&ModelNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn edges_from<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a RelationshipEdge> {
        self.edges.iter().filter(move |edge| edge.from == id)
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanStats {
    pub candidates: usize,
    pub parsed: usize,
    pub skipped: usize,
    pub unreadable: usize,
    pub nodes: usize,
    pub edges: usize,
    pub duration_ms: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScanOutcome {
    pub graph: ModelGraph,
    pub stats: ScanStats,
}
