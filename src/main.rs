use anyhow::{Context, Result};
use clap::Parser;
use ormgraph::config::Config;
use ormgraph::indexer::{self, resolve, scan};
use ormgraph::{cli, logging, util};
use serde_json::{Value, json};

fn scan_options(args: cli::ScanArgs) -> scan::ScanOptions {
    let mut options = scan::ScanOptions::from_config(Config::get())
        .with_model_dirs(args.model_dirs)
        .with_exclude_dirs(args.exclude_dirs);
    options.no_ignore = args.no_ignore;
    options
}

fn to_json(value: &impl serde::Serialize, compact: bool) -> Result<String> {
    Ok(if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    })
}

fn main() -> Result<()> {
    let args = cli::Args::parse();
    logging::init(args.verbose)?;

    match args.command {
        cli::Command::Scan {
            scan,
            output,
            compact,
            stats,
        } => {
            let repo = scan.repo.clone();
            let indexer = indexer::Indexer::new(repo, scan_options(scan))?;
            let outcome = indexer.scan()?;
            if outcome.graph.is_empty() {
                eprintln!(
                    "ormgraph: no model classes found in {}",
                    indexer.repo_root().display()
                );
            }
            let rendered = to_json(&outcome.graph, compact)?;
            match output {
                Some(path) => {
                    util::ensure_parent_dir(&path)?;
                    std::fs::write(&path, rendered + "\n")
                        .with_context(|| format!("write {}", path.display()))?;
                }
                None => println!("{rendered}"),
            }
            if stats {
                eprintln!("{}", serde_json::to_string_pretty(&outcome.stats)?);
            }
            Ok(())
        }
        cli::Command::Files { scan } => {
            let repo = scan.repo.clone();
            let indexer = indexer::Indexer::new(repo, scan_options(scan))?;
            let files = indexer.candidates()?;
            println!("{}", serde_json::to_string_pretty(&files)?);
            Ok(())
        }
        cli::Command::Inspect { path } => {
            let source =
                util::read_source(&path).with_context(|| format!("read {}", path.display()))?;
            let builder = indexer::GraphBuilder::new()?;
            let model = match builder.extractor().extract(&source) {
                Some(extracted) => {
                    let resolved: Vec<Value> = extracted
                        .relations
                        .iter()
                        .map(|relation| {
                            json!({
                                "method": relation.method,
                                "kind": relation.kind,
                                "target": relation.target,
                                "resolved": resolve::resolve_for_class(
                                    &relation.target,
                                    &extracted.class,
                                    &extracted.imports,
                                ),
                            })
                        })
                        .collect();
                    json!({
                        "id": extracted.class.qualname(),
                        "class": extracted.class,
                        "imports": extracted.imports,
                        "relations": resolved,
                    })
                }
                None => Value::Null,
            };
            let result = json!({
                "path": path.to_string_lossy(),
                "model": model,
            });
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(())
        }
    }
}
