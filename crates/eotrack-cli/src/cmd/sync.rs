use crate::output::print_json;
use anyhow::Context;
use eotrack_core::{
    config::Config,
    dataset::Dataset,
    merge::merge_actions,
    registry::{format_documents, FederalRegisterClient, RegistrySource},
};
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct SyncOutput<'a> {
    path: &'a Path,
    fetched: usize,
    added: &'a [String],
    retained: usize,
    total: usize,
    written: bool,
}

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    config.ensure_valid()?;
    let client = FederalRegisterClient::new(config.registry.clone(), &config.http)
        .context("failed to build HTTP client")?;
    sync_from(root, &config, &client, json)
}

/// Fetch, merge, persist. The fetch runs before the store is read so a
/// failed fetch never reaches the write.
fn sync_from(
    root: &Path,
    config: &Config,
    source: &dyn RegistrySource,
    json: bool,
) -> anyhow::Result<()> {
    let documents = source
        .fetch_documents()
        .context("failed to fetch Federal Register documents")?;
    let fresh = format_documents(documents);
    let fetched = fresh.len();

    let path = config.data_path(root);
    let existing = Dataset::load_or_empty(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let line_ending = existing.line_ending;
    let parsed = existing.parsed;

    let outcome = merge_actions(fresh, existing.actions);
    let total = outcome.actions.len();
    let written = if outcome.changed || !parsed {
        Dataset::new(outcome.actions, line_ending)
            .save(&path)
            .with_context(|| format!("failed to write {}", path.display()))?
    } else {
        tracing::debug!(path = %path.display(), "merge changed nothing, skipping write");
        false
    };

    if json {
        return print_json(&SyncOutput {
            path: &path,
            fetched,
            added: &outcome.added,
            retained: outcome.retained,
            total,
            written,
        });
    }

    println!(
        "Fetched {fetched} documents: {} new, {} retained from the existing dataset",
        outcome.added.len(),
        outcome.retained
    );
    for id in &outcome.added {
        println!("  + {id}");
    }
    if written {
        println!("Saved {total} actions to {}", path.display());
    } else {
        println!("No changes; {} left untouched", path.display());
    }
    Ok(())
}
