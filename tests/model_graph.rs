use ormgraph::error::ScanError;
use ormgraph::indexer::GraphBuilder;
use ormgraph::model::{ModelGraph, RelationKind, RelationshipEdge};
use std::path::Path;

const POST_IMPORTED: &str = r#"<?php

namespace App\Models;

use App\Models\Comment;
use Illuminate\Database\Eloquent\Model;

class Post extends Model
{
    public function comments()
    {
        return $this->hasMany(Comment::class);
    }
}
"#;

const POST_BARE: &str = r#"<?php

namespace App\Models;

use Illuminate\Database\Eloquent\Model;

class Post extends Model
{
    public function comments()
    {
        return $this->hasMany(Comment::class);
    }
}
"#;

const NO_NAMESPACE: &str = r#"<?php

class Legacy
{
    public function things()
    {
        return $this->hasMany(Thing::class);
    }
}
"#;

fn build(files: &[(&str, &str)]) -> ModelGraph {
    let builder = GraphBuilder::new().unwrap();
    builder.build_from_sources(files.iter().map(|(path, source)| (Path::new(*path), *source)))
}

fn comments_edge() -> RelationshipEdge {
    RelationshipEdge {
        from: "App\\Models\\Post".to_string(),
        to: "App\\Models\\Comment".to_string(),
        relation_name: "comments".to_string(),
        relation_kind: RelationKind::HasMany,
    }
}

#[test]
fn imported_target_resolves_through_alias() {
    let graph = build(&[("/repo/app/Models/Post.php", POST_IMPORTED)]);

    assert_eq!(graph.nodes.len(), 1);
    let node = &graph.nodes[0];
    assert_eq!(node.id, "App\\Models\\Post");
    assert_eq!(node.label, "Post");
    assert_eq!(node.source_path, "/repo/app/Models/Post.php");
    assert_eq!(graph.edges, vec![comments_edge()]);
}

#[test]
fn bare_target_falls_back_to_same_namespace() {
    let graph = build(&[("/repo/app/Models/Post.php", POST_BARE)]);
    assert_eq!(graph.edges, vec![comments_edge()]);
}

#[test]
fn rooted_target_resolves_to_itself() {
    let source = r#"<?php
namespace App\Models;

use Other\Invoice;

class Order
{
    public function invoice()
    {
        return $this->hasOne(\Billing\Invoice::class);
    }
}
"#;
    let graph = build(&[("/repo/app/Models/Order.php", source)]);
    assert_eq!(graph.edges.len(), 1);
    assert_eq!(graph.edges[0].to, "Billing\\Invoice");
    assert_eq!(graph.edges[0].relation_kind, RelationKind::HasOne);
}

#[test]
fn self_reference_resolves_to_declaring_class() {
    let source = r#"<?php
namespace App\Models;

class Category
{
    public function parent()
    {
        return $this->belongsTo(self::class, 'parent_id');
    }

    public function children()
    {
        return $this->hasMany(static::class, 'parent_id');
    }
}
"#;
    let graph = build(&[("/repo/app/Models/Category.php", source)]);
    let targets: Vec<_> = graph.edges.iter().map(|e| e.to.as_str()).collect();
    assert_eq!(targets, vec!["App\\Models\\Category", "App\\Models\\Category"]);
}

#[test]
fn file_without_namespace_is_skipped_but_scan_continues() {
    let graph = build(&[
        ("/repo/app/Legacy.php", NO_NAMESPACE),
        ("/repo/app/Models/Post.php", POST_IMPORTED),
    ]);

    assert_eq!(graph.nodes.len(), 1);
    assert_eq!(graph.nodes[0].id, "App\\Models\\Post");
    assert!(graph.nodes.iter().all(|n| n.source_path != "/repo/app/Legacy.php"));
    assert!(graph.edges.iter().all(|e| e.from == "App\\Models\\Post"));
}

#[test]
fn parallel_edges_between_same_pair_are_kept() {
    let source = r#"<?php
namespace App\Models;

class Post
{
    public function author()
    {
        return $this->belongsTo(User::class, 'author_id');
    }

    public function editor()
    {
        return $this->belongsTo(User::class, 'editor_id');
    }
}
"#;
    let graph = build(&[("/repo/app/Models/Post.php", source)]);
    let labels: Vec<_> = graph
        .edges
        .iter()
        .filter(|e| e.from == "App\\Models\\Post" && e.to == "App\\Models\\User")
        .map(|e| e.relation_name.as_str())
        .collect();
    assert_eq!(labels, vec!["author", "editor"]);
}

#[test]
fn edges_may_point_at_unscanned_classes() {
    let graph = build(&[("/repo/app/Models/Post.php", POST_IMPORTED)]);
    assert!(graph.node("App\\Models\\Comment").is_none());
    assert_eq!(graph.edges_from("App\\Models\\Post").count(), 1);
}

#[test]
fn every_edge_originates_from_its_file_class() {
    let user = r#"<?php
namespace App\Models;

use App\Models\Post;

class User
{
    public function posts() { return $this->hasMany(Post::class); }
    public function profile() { return $this->hasOne(Profile::class); }
}
"#;
    let builder = GraphBuilder::new().unwrap();
    for (path, source, id) in [
        ("/repo/User.php", user, "App\\Models\\User"),
        ("/repo/Post.php", POST_IMPORTED, "App\\Models\\Post"),
    ] {
        let model = builder.model_from_source(Path::new(path), source).unwrap();
        assert_eq!(model.node.id, id);
        assert!(!model.edges.is_empty());
        assert!(model.edges.iter().all(|e| e.from == id));
    }
}

#[test]
fn missing_class_reports_class_pattern_not_found() {
    let builder = GraphBuilder::new().unwrap();
    let err = builder
        .model_from_source(Path::new("/repo/Legacy.php"), NO_NAMESPACE)
        .unwrap_err();
    assert!(matches!(err, ScanError::ClassPatternNotFound { .. }));
    assert_eq!(err.path(), Path::new("/repo/Legacy.php"));
}

#[test]
fn duplicate_class_ids_keep_first_node() {
    let graph = build(&[
        ("/repo/a/Post.php", POST_IMPORTED),
        ("/repo/b/Post.php", POST_BARE),
    ]);
    assert_eq!(graph.nodes.len(), 1);
    assert_eq!(graph.nodes[0].source_path, "/repo/a/Post.php");
    assert_eq!(graph.edges.len(), 2);
}

#[test]
fn empty_input_gives_empty_graph() {
    let graph = build(&[]);
    assert!(graph.is_empty());
    assert!(graph.edges.is_empty());
}

#[test]
fn build_reads_files_and_counts_failures() {
    let dir = tempfile::tempdir().unwrap();
    let post = dir.path().join("Post.php");
    let legacy = dir.path().join("Legacy.php");
    let missing = dir.path().join("Missing.php");
    std::fs::write(&post, POST_IMPORTED).unwrap();
    std::fs::write(&legacy, NO_NAMESPACE).unwrap();

    let builder = GraphBuilder::new().unwrap();
    let (graph, stats) = builder.build(&[missing, legacy, post.clone()]);

    assert_eq!(graph.nodes.len(), 1);
    assert_eq!(graph.nodes[0].source_path, post.to_string_lossy());
    assert_eq!(graph.edges, vec![comments_edge()]);
    assert_eq!(stats.candidates, 3);
    assert_eq!(stats.parsed, 1);
    assert_eq!(stats.skipped, 1);
    assert_eq!(stats.unreadable, 1);
    assert_eq!(stats.nodes, 1);
    assert_eq!(stats.edges, 1);
}

#[test]
fn graph_serializes_to_handoff_shape() {
    let graph = build(&[("/repo/app/Models/Post.php", POST_IMPORTED)]);
    let value = serde_json::to_value(&graph).unwrap();
    assert_eq!(
        value,
        serde_json::json!({
            "nodes": [{
                "id": "App\\Models\\Post",
                "label": "Post",
                "path": "/repo/app/Models/Post.php",
            }],
            "edges": [{
                "from": "App\\Models\\Post",
                "to": "App\\Models\\Comment",
                "label": "comments",
                "title": "hasMany",
            }],
        })
    );

    let parsed: ModelGraph = serde_json::from_value(value).unwrap();
    assert_eq!(parsed, graph);
}
