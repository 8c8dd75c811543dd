use crate::types::Action;
use regex::Regex;
use std::sync::OnceLock;

static DOCKET_RE: OnceLock<Regex> = OnceLock::new();

fn docket_re() -> &'static Regex {
    DOCKET_RE.get_or_init(|| Regex::new(r"/docket/(\d+)/").unwrap())
}

/// The digits between `/docket/` and the next `/` in a docket URL.
pub fn extract_docket_id(url: &str) -> Option<&str> {
    docket_re()
        .captures(url)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BackfillPolicy {
    /// Recompute from the URL on every run, replacing whatever is stored.
    #[default]
    Recompute,
    /// Leave challenges that already carry a docket id alone.
    KeepExisting,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Backfilled {
    pub actions: Vec<Action>,
    /// Challenges whose docket id was set or replaced.
    pub changed: usize,
}

/// Derive `docketId` from each challenge URL.
pub fn backfill_docket_ids(mut actions: Vec<Action>, policy: BackfillPolicy) -> Backfilled {
    let mut changed = 0;
    for challenge in actions.iter_mut().flat_map(|a| a.challenges.iter_mut()) {
        if policy == BackfillPolicy::KeepExisting && challenge.docket_id().is_some() {
            continue;
        }
        let Some(id) = challenge.url.as_deref().and_then(extract_docket_id) else {
            continue;
        };
        if challenge.docket_id.as_deref() != Some(id) {
            tracing::debug!(docket = %id, "derived docket id");
            challenge.docket_id = Some(id.to_string());
            changed += 1;
        }
    }
    Backfilled { actions, changed }
}
