use crate::error::{Result, TrackerError};
use crate::types::Action;
use chrono::{DateTime, Utc};
use serde::Serialize;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Source of the most recent filing date for a docket.
///
/// Implementations swallow their own failures: `None` means "no usable date",
/// whatever the reason.
pub trait DocketLookup {
    fn latest_filing(&self, docket_id: &str) -> Option<DateTime<Utc>>;
}

impl<F> DocketLookup for F
where
    F: Fn(&str) -> Option<DateTime<Utc>>,
{
    fn latest_filing(&self, docket_id: &str) -> Option<DateTime<Utc>> {
        self(docket_id)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RefreshReport {
    /// Challenges with a docket id that were looked up.
    pub examined: usize,
    /// Lookups that returned a date.
    pub updated: usize,
    /// Updates whose date differs from the stored `lastUpdated`.
    pub changed: usize,
}

impl RefreshReport {
    pub fn any_updated(&self) -> bool {
        self.updated > 0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Refreshed {
    pub actions: Vec<Action>,
    pub report: RefreshReport,
}

/// Look up every challenge that carries a docket id and stamp `lastUpdated`
/// with the latest filing date.
///
/// With `target`, only the challenge whose docket id equals it is looked up
/// and traversal stops right after it. A target that matches nothing is
/// [`TrackerError::DocketNotFound`].
pub fn refresh_dockets(
    mut actions: Vec<Action>,
    lookup: &dyn DocketLookup,
    target: Option<&str>,
) -> Result<Refreshed> {
    let mut report = RefreshReport::default();
    let mut target_found = false;

    'actions: for action in &mut actions {
        for challenge in &mut action.challenges {
            let Some(docket_id) = challenge.docket_id() else {
                continue;
            };
            if target.is_some_and(|t| t != docket_id) {
                continue;
            }
            let docket_id = docket_id.to_string();

            report.examined += 1;
            tracing::info!(docket = %docket_id, action = %action.id, "processing docket");
            match lookup.latest_filing(&docket_id) {
                Some(ts) => {
                    let stamp = ts.format(TIMESTAMP_FORMAT).to_string();
                    if challenge.last_updated.as_deref() != Some(stamp.as_str()) {
                        report.changed += 1;
                    }
                    tracing::info!(docket = %docket_id, date = %stamp, "updated docket");
                    challenge.last_updated = Some(stamp);
                    report.updated += 1;
                }
                None => {
                    tracing::warn!(docket = %docket_id, "no filing date, leaving challenge untouched");
                }
            }

            if target.is_some() {
                target_found = true;
                break 'actions;
            }
        }
    }

    if let Some(t) = target {
        if !target_found {
            return Err(TrackerError::DocketNotFound(t.to_string()));
        }
    }

    Ok(Refreshed { actions, report })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
