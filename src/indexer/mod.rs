use crate::error::ScanError;
use crate::model::{ModelGraph, ModelNode, RelationshipEdge, ScanOutcome, ScanStats};
use anyhow::Result;
use rayon::prelude::*;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Instant;

pub mod extract;
pub mod php;
pub mod resolve;
pub mod scan;

/// A model node together with the edges its file declares.
#[derive(Debug, Clone)]
pub struct FileModel {
    pub node: ModelNode,
    pub edges: Vec<RelationshipEdge>,
}

/// Turns model source files into a [`ModelGraph`].
///
/// Holds no state between calls; every build starts from an empty graph.
pub struct GraphBuilder {
    extractor: php::PhpExtractor,
}

impl GraphBuilder {
    pub fn new() -> Result<Self> {
        Ok(Self {
            extractor: php::PhpExtractor::new()?,
        })
    }

    pub fn extractor(&self) -> &php::PhpExtractor {
        &self.extractor
    }

    /// Extract one file's node and resolved edges.
    pub fn model_from_source(&self, path: &Path, source: &str) -> Result<FileModel, ScanError> {
        let Some(extracted) = self.extractor.extract(source) else {
            return Err(ScanError::ClassPatternNotFound {
                path: path.to_path_buf(),
            });
        };
        let from = extracted.class.qualname();
        let edges = extracted
            .relations
            .iter()
            .map(|relation| RelationshipEdge {
                from: from.clone(),
                to: resolve::resolve_for_class(
                    &relation.target,
                    &extracted.class,
                    &extracted.imports,
                ),
                relation_name: relation.method.clone(),
                relation_kind: relation.kind,
            })
            .collect();
        Ok(FileModel {
            node: ModelNode {
                id: from,
                label: extracted.class.name,
                source_path: path.to_string_lossy().to_string(),
            },
            edges,
        })
    }

    /// Build a graph from already-read sources, in the given order.
    pub fn build_from_sources<'a, I>(&self, sources: I) -> ModelGraph
    where
        I: IntoIterator<Item = (&'a Path, &'a str)>,
    {
        let results: Vec<_> = sources
            .into_iter()
            .map(|(path, source)| self.model_from_source(path, source))
            .collect();
        let mut stats = ScanStats::default();
        merge_results(results, &mut stats)
    }

    /// Read and extract every path. Unreadable or non-model files are
    /// skipped; the scan always runs to completion.
    pub fn build(&self, paths: &[PathBuf]) -> (ModelGraph, ScanStats) {
        let started = Instant::now();
        let results: Vec<_> = paths
            .par_iter()
            .map(|path| self.process_file(path))
            .collect();
        let mut stats = ScanStats {
            candidates: paths.len(),
            ..ScanStats::default()
        };
        let graph = merge_results(results, &mut stats);
        stats.duration_ms = started.elapsed().as_millis() as u64;
        (graph, stats)
    }

    fn process_file(&self, path: &Path) -> Result<FileModel, ScanError> {
        let source = crate::util::read_source(path).map_err(|source| ScanError::FileUnreadable {
            path: path.to_path_buf(),
            source,
        })?;
        self.model_from_source(path, &source)
    }
}

fn merge_results(results: Vec<Result<FileModel, ScanError>>, stats: &mut ScanStats) -> ModelGraph {
    let mut graph = ModelGraph::default();
    let mut seen = HashSet::new();
    for result in results {
        match result {
            Ok(model) => {
                stats.parsed += 1;
                if seen.insert(model.node.id.clone()) {
                    graph.nodes.push(model.node);
                } else {
                    tracing::debug!(
                        "duplicate model {} in {}, keeping first declaration",
                        model.node.id,
                        model.node.source_path
                    );
                }
                graph.edges.extend(model.edges);
            }
            Err(err @ ScanError::ClassPatternNotFound { .. }) => {
                tracing::debug!("skip {}: {err}", err.path().display());
                stats.skipped += 1;
            }
            Err(err @ ScanError::FileUnreadable { .. }) => {
                tracing::warn!("{err}");
                stats.unreadable += 1;
            }
        }
    }
    stats.nodes = graph.nodes.len();
    stats.edges = graph.edges.len();
    graph
}

/// Scans one repository for model files and builds their graph.
pub struct Indexer {
    repo_root: PathBuf,
    scan_options: scan::ScanOptions,
    builder: GraphBuilder,
}

impl Indexer {
    pub fn new(repo_root: PathBuf, scan_options: scan::ScanOptions) -> Result<Self> {
        let repo_root = std::fs::canonicalize(&repo_root).unwrap_or(repo_root);
        Ok(Self {
            repo_root,
            scan_options,
            builder: GraphBuilder::new()?,
        })
    }

    pub fn repo_root(&self) -> &Path {
        &self.repo_root
    }

    pub fn candidates(&self) -> Result<Vec<scan::ScannedFile>> {
        scan::scan_candidates(&self.repo_root, &self.scan_options)
    }

    pub fn scan(&self) -> Result<ScanOutcome> {
        let candidates = self.candidates()?;
        let paths: Vec<PathBuf> = candidates.into_iter().map(|file| file.abs_path).collect();
        let (graph, stats) = self.builder.build(&paths);
        if graph.is_empty() {
            tracing::info!(
                "no model classes found under {} ({} candidate files)",
                self.repo_root.display(),
                stats.candidates
            );
        } else {
            tracing::info!(
                "scanned {} files: {} models, {} relationships",
                stats.candidates,
                stats.nodes,
                stats.edges
            );
        }
        Ok(ScanOutcome { graph, stats })
    }
}
