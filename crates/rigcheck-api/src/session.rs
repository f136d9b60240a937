use rigcheck_core::{Category, Selection};

use crate::{BuildReport, RigcheckApi};

/// Snapshot handed to whoever recomputes a report off the interactive path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshTicket {
    pub generation: u64,
    pub fingerprint: String,
    pub selection: Selection,
}

/// One user's in-progress build.
///
/// Every change to the picks bumps the generation. Reports computed for an
/// older generation are dropped on arrival, so the last change always wins.
#[derive(Debug, Clone)]
pub struct BuildSession {
    api: RigcheckApi,
    selection: Selection,
    generation: u64,
    latest: Option<BuildReport>,
}

impl BuildSession {
    #[must_use]
    pub fn new(api: RigcheckApi) -> Self {
        Self { api, selection: Selection::new(), generation: 0, latest: None }
    }

    #[must_use]
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn select(&mut self, category: Category, name: Option<&str>) {
        self.selection.set(category, name);
        self.generation += 1;
    }

    #[must_use]
    pub fn begin_refresh(&self) -> RefreshTicket {
        RefreshTicket {
            generation: self.generation,
            fingerprint: self.api.fingerprint(&self.selection),
            selection: self.selection.clone(),
        }
    }

    /// Publish `report` if `ticket` is still current. Returns whether it was kept.
    pub fn complete(&mut self, ticket: &RefreshTicket, report: BuildReport) -> bool {
        if ticket.generation != self.generation || report.fingerprint != ticket.fingerprint {
            tracing::debug!(
                ticket_generation = ticket.generation,
                current_generation = self.generation,
                "discarded stale build report"
            );
            return false;
        }
        self.latest = Some(report);
        true
    }

    /// Latest report for the current picks, recomputed in place when the picks
    /// changed since it was published.
    pub fn report(&mut self) -> &BuildReport {
        let fingerprint = self.api.fingerprint(&self.selection);
        match self.latest.take() {
            Some(report) if report.fingerprint == fingerprint => self.latest.insert(report),
            _ => self.latest.insert(self.api.check(&self.selection)),
        }
    }

    #[must_use]
    pub fn cached_report(&self) -> Option<&BuildReport> {
        self.latest.as_ref()
    }
}
