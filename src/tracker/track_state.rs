use serde::Serialize;

/// Track lifecycle state.
///
/// `Tentative -> Confirmed -> Deleted`, with `Tentative -> Deleted` also
/// reachable. `Deleted` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum TrackState {
    /// Accumulating evidence, not reported downstream
    #[default]
    Tentative,
    /// Matched often enough to be reported
    Confirmed,
    /// Unmatched for too long; removed from the active set
    Deleted,
}
