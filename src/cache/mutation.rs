use leptos::prelude::*;

/// Transactional apply over a piece of signal-held state.
///
/// `apply` snapshots the current value, applies the optimistic change, and
/// returns a guard. Once the remote operation settles, the caller either
/// `commit`s (drops the snapshot) or `rollback`s (restores it verbatim).
///
/// The guard holds the state by signal handle, so it can cross an `await`
/// and still restore after the component that started the mutation is gone.
pub(crate) struct MutationGuard<T>
where
    T: Clone + Send + Sync + 'static,
{
    state: RwSignal<T>,
    snapshot: T,
}

impl<T> MutationGuard<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn apply(state: RwSignal<T>, change: impl FnOnce(&mut T)) -> Self {
        let snapshot = state.get_untracked();
        state.update(change);
        Self { state, snapshot }
    }

    pub fn commit(self) {}

    pub fn rollback(self) {
        self.state.set(self.snapshot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rollback_restores_pre_mutation_state() {
        let state: RwSignal<Vec<i32>> = RwSignal::new(vec![1, 2, 3]);

        let guard = MutationGuard::apply(state, |xs| xs.insert(0, 0));
        assert_eq!(state.get_untracked(), vec![0, 1, 2, 3]);

        guard.rollback();
        assert_eq!(state.get_untracked(), vec![1, 2, 3]);
    }

    #[test]
    fn test_commit_keeps_applied_state() {
        let state: RwSignal<Vec<i32>> = RwSignal::new(vec![1, 2, 3]);

        let guard = MutationGuard::apply(state, |xs| xs.retain(|x| *x != 2));
        guard.commit();

        assert_eq!(state.get_untracked(), vec![1, 3]);
    }

    #[test]
    fn test_rollback_ignores_interleaved_writes() {
        // Restore is by snapshot, not by inverse change: writes that land
        // between apply and rollback are overwritten by the snapshot. The
        // settle-refetch converges afterwards; this just pins the contract.
        let state: RwSignal<Vec<i32>> = RwSignal::new(vec![1]);

        let guard = MutationGuard::apply(state, |xs| xs.push(2));
        state.update(|xs| xs.push(3));

        guard.rollback();
        assert_eq!(state.get_untracked(), vec![1]);
    }
}
