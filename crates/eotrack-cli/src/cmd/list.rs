use crate::output::{print_json, print_table, truncate};
use anyhow::Context;
use eotrack_core::{config::Config, dataset::Dataset, types::Action};
use std::path::Path;

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    let path = config.data_path(root);
    let dataset =
        Dataset::load(&path).with_context(|| format!("failed to read {}", path.display()))?;

    if json {
        return print_json(&dataset.actions);
    }

    if dataset.actions.is_empty() {
        println!("No actions tracked yet. Run: eotrack sync");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = dataset.actions.iter().map(action_row).collect();
    print_table(&["ID", "DATE", "STATUS", "CHALLENGES", "TITLE"], rows);

    let challenged = dataset
        .actions
        .iter()
        .filter(|a| a.challenge_count() > 0)
        .count();
    println!(
        "\n{} actions, {} with legal challenges",
        dataset.actions.len(),
        challenged
    );
    Ok(())
}

fn action_row(a: &Action) -> Vec<String> {
    vec![
        a.id.to_string(),
        a.date.clone(),
        a.status.clone(),
        a.challenge_count().to_string(),
        truncate(&a.title, 60),
    ]
}
