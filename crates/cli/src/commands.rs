use crate::print_stdout;
use anyhow::{Context, Result};
use codemap_graph::{CallableId, GraphBuilder};
use codemap_indexer::SourceFetcher;
use codemap_meaning::{SourceFetch, Summarizer};
use codemap_oracle::Oracle;
use codemap_parser::{ParseTree, SourceParser};
use codemap_solver::{SolverConfig, TaskSolver};
use codemap_vector_store::VectorStore;
use serde_json::json;
use std::path::Path;

struct FetchAdapter<'a>(&'a SourceFetcher);

impl SourceFetch for FetchAdapter<'_> {
    fn fetch_body(&self, id: &CallableId) -> String {
        self.0.fetch(id.as_str())
    }
}

pub fn run_map(
    root: &Path,
    store_path: Option<&Path>,
    json_output: bool,
    oracle: &dyn Oracle,
) -> Result<()> {
    let fetcher = SourceFetcher::from_root(root)?;
    let mut parser = SourceParser::new()?;

    let mut tree = ParseTree::default();
    let mut skipped = 0usize;
    for (path, source) in fetcher.files() {
        match parser.parse(source) {
            Ok(parsed) => tree.merge(parsed),
            Err(e) => {
                log::warn!("Skipping {}: {e}", path.display());
                skipped += 1;
            }
        }
    }
    if skipped > 0 {
        log::info!("Skipped {skipped} unparseable files");
    }

    let graph = GraphBuilder::new().build(&tree);
    log::info!("Built call graph with {} nodes", graph.len());

    let adapter = FetchAdapter(&fetcher);
    let summaries = Summarizer::new(&graph, oracle, &adapter).summarize()?;

    if json_output {
        let output = json!({ "graph": &graph, "summaries": &summaries });
        print_stdout(&serde_json::to_string_pretty(&output)?)?;
    } else {
        for (id, callees) in graph.iter() {
            let rendered: Vec<String> = callees.iter().map(ToString::to_string).collect();
            print_stdout(&format!("{id} -> [{}]", rendered.join(", ")))?;
        }
        for (id, summary) in summaries.summaries() {
            print_stdout(&format!("{id} : {summary}"))?;
        }
    }

    if let Some(path) = store_path {
        let mut records = VectorStore::new();
        for (id, summary) in summaries.summaries() {
            let vector = oracle
                .embed(summary)
                .with_context(|| format!("embedding summary for '{id}'"))?;
            records.add(id.as_str(), summary, vector)?;
        }
        records.save(path)?;
        print_stdout(&format!("stored {} records at {}", records.len(), path.display()))?;
    }

    Ok(())
}

pub fn run_solve(
    task: &str,
    config: SolverConfig,
    json_output: bool,
    oracle: &dyn Oracle,
) -> Result<()> {
    let solver = TaskSolver::new(oracle, config);
    let tree = solver.solve(task)?;

    if json_output {
        print_stdout(&serde_json::to_string_pretty(&tree)?)?;
        return Ok(());
    }

    for (index, level) in tree.levels().iter().enumerate() {
        print_stdout(&format!("level {index}: {}", level.join(" ; ")))?;
    }
    if let Some(result) = &tree.result {
        print_stdout(&format!("result: {result}"))?;
    }
    Ok(())
}

pub fn run_search(query: &str, store_path: &Path, limit: usize, oracle: &dyn Oracle) -> Result<()> {
    let store = VectorStore::load(store_path)
        .with_context(|| format!("loading records from {}", store_path.display()))?;
    let vector = oracle.embed(query).context("embedding query")?;

    let results = store.search(&vector, limit)?;
    if results.is_empty() {
        print_stdout("no results")?;
        return Ok(());
    }
    for hit in results {
        print_stdout(&format!(
            "{:.4}  {} : {}",
            hit.score, hit.record.callable, hit.record.summary
        ))?;
    }
    Ok(())
}
