use crate::output::print_json;
use anyhow::Context;
use eotrack_core::{
    config::Config,
    dataset::Dataset,
    docket::{ApiKey, CourtListenerClient},
    refresh::{refresh_dockets, RefreshReport, Refreshed},
};
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct RefreshOutput<'a> {
    path: &'a Path,
    target: Option<&'a str>,
    #[serde(flatten)]
    report: RefreshReport,
    written: bool,
}

pub fn run(
    root: &Path,
    docket_id: Option<&str>,
    api_key: Option<String>,
    json: bool,
) -> anyhow::Result<()> {
    // Checked before anything else: no key, no network.
    let api_key = ApiKey::new(api_key)?;

    let config = Config::load(root).context("failed to load config")?;
    config.ensure_valid()?;

    let path = config.data_path(root);
    let dataset =
        Dataset::load(&path).with_context(|| format!("failed to read {}", path.display()))?;
    let line_ending = dataset.line_ending;

    let client = CourtListenerClient::new(&config.court_listener, &config.http, api_key)
        .context("failed to build HTTP client")?;
    let Refreshed { actions, report } = refresh_dockets(dataset.actions, &client, docket_id)?;

    let written = if report.any_updated() {
        Dataset::new(actions, line_ending)
            .save(&path)
            .with_context(|| format!("failed to write {}", path.display()))?
    } else {
        false
    };

    if json {
        return print_json(&RefreshOutput {
            path: &path,
            target: docket_id,
            report,
            written,
        });
    }

    println!(
        "Processed {} dockets, updated {}",
        report.examined, report.updated
    );
    if written {
        println!("Saved changes to {}", path.display());
    } else {
        println!("No updates were needed.");
    }
    Ok(())
}
