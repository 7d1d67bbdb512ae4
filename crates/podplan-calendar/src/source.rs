use podplan_core::{DateRange, Episode};
use tracing::debug;

use crate::error::SourceError;

/// Read access to scheduled episodes.
pub trait EpisodeSource {
    /// Episodes whose scheduled date falls within `range`, in store order.
    fn episodes_in(&self, range: &DateRange) -> Result<Vec<Episode>, SourceError>;
}

impl EpisodeSource for [Episode] {
    fn episodes_in(&self, range: &DateRange) -> Result<Vec<Episode>, SourceError> {
        Ok(self
            .iter()
            .filter(|e| e.scheduled().is_some_and(|sd| range.contains(sd.date)))
            .cloned()
            .collect())
    }
}

impl EpisodeSource for Vec<Episode> {
    fn episodes_in(&self, range: &DateRange) -> Result<Vec<Episode>, SourceError> {
        self.as_slice().episodes_in(range)
    }
}

/// Fetch from `source`, treating a not-yet-created collection as empty.
pub(crate) fn fetch_or_empty<S: EpisodeSource + ?Sized>(
    source: &S,
    range: &DateRange,
) -> Result<Vec<Episode>, SourceError> {
    match source.episodes_in(range) {
        Err(SourceError::MissingCollection) => {
            debug!(start = %range.start, end = %range.end, "episode collection missing; using empty result");
            Ok(Vec::new())
        }
        other => other,
    }
}
