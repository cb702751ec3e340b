// Application layer: what the results area shows for a loaded snapshot.

pub mod presenter;

use crate::core::engine::Snapshot;
use crate::domain::model::Selection;
use presenter::{present, ViewState};

/// Runs one query and maps it to a view state (`NoResults` when nothing matched).
pub fn leaderboard(snapshot: &Snapshot, selection: &Selection) -> ViewState {
    ViewState::from_rows(present(&snapshot.query(selection)))
}
