use crate::output::print_json;
use anyhow::Context;
use eotrack_core::{
    backfill::{backfill_docket_ids, BackfillPolicy},
    config::Config,
    dataset::Dataset,
};
use std::path::Path;

pub fn run(root: &Path, keep_existing: bool, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    let path = config.data_path(root);
    let dataset =
        Dataset::load(&path).with_context(|| format!("failed to read {}", path.display()))?;

    let policy = if keep_existing {
        BackfillPolicy::KeepExisting
    } else {
        BackfillPolicy::Recompute
    };
    let out = backfill_docket_ids(dataset.actions, policy);

    let written = if out.changed > 0 {
        Dataset::new(out.actions, dataset.line_ending)
            .save(&path)
            .with_context(|| format!("failed to write {}", path.display()))?
    } else {
        false
    };

    if json {
        return print_json(&serde_json::json!({
            "path": path,
            "changed": out.changed,
            "written": written,
        }));
    }

    if written {
        println!("Set docket ids on {} challenges in {}", out.changed, path.display());
    } else {
        println!("All docket ids up to date.");
    }
    Ok(())
}
