//! Client state and the in-flight gate.

use std::sync::{Mutex, MutexGuard, PoisonError};

use uuid::Uuid;

/// UI state kept consistent with the server across operation cycles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientState {
    pub current_page: u32,
    pub total_pages: u32,
    pub search_term: Option<String>,
    /// True while an operation cycle is in flight.
    pub is_loading: bool,
}

impl Default for ClientState {
    fn default() -> Self {
        Self {
            current_page: 1,
            total_pages: 1,
            search_term: None,
            is_loading: false,
        }
    }
}

/// Result of trying to open the gate.
pub(crate) enum Begin<'a> {
    Started(CycleGuard<'a>),
    /// Another cycle is in flight; nothing was changed.
    Busy,
    /// The precondition refused; nothing was changed.
    Refused,
}

/// State cell with check-and-set entry into a cycle.
///
/// The lock is only ever held for short synchronous sections, never across
/// an `.await`.
#[derive(Debug, Default)]
pub(crate) struct StateCell(Mutex<ClientState>);

impl StateCell {
    fn lock(&self) -> MutexGuard<'_, ClientState> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn snapshot(&self) -> ClientState {
        self.lock().clone()
    }

    pub(crate) fn update<R>(&self, f: impl FnOnce(&mut ClientState) -> R) -> R {
        f(&mut self.lock())
    }

    /// Open the gate if it is closed.
    ///
    /// `prepare` runs under the same lock as the busy check. It returns
    /// `false` to refuse, and must leave the state untouched when it does.
    pub(crate) fn begin(&self, prepare: impl FnOnce(&mut ClientState) -> bool) -> Begin<'_> {
        let mut state = self.lock();
        if state.is_loading {
            return Begin::Busy;
        }
        if !prepare(&mut state) {
            return Begin::Refused;
        }
        state.is_loading = true;
        Begin::Started(CycleGuard {
            cell: self,
            cycle_id: Uuid::now_v7(),
        })
    }
}

/// Proof that the current task owns the in-flight cycle.
///
/// Dropping it closes the cycle, on every exit path.
pub(crate) struct CycleGuard<'a> {
    cell: &'a StateCell,
    cycle_id: Uuid,
}

impl CycleGuard<'_> {
    pub(crate) fn cycle_id(&self) -> Uuid {
        self.cycle_id
    }
}

impl Drop for CycleGuard<'_> {
    fn drop(&mut self) {
        self.cell.lock().is_loading = false;
    }
}
