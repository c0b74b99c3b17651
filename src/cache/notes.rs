use crate::api::{ApiClient, ApiError, DeleteNoteRequest, UpdateNoteRequest};
use crate::cache::MutationGuard;
use crate::models::Note;
use leptos::prelude::*;
use leptos::task::spawn_local;

/// The one client-side source of truth for the session owner's notes.
///
/// Created once in `AppState::new` and handed around by context; every note
/// mutation in the crate goes through `create`/`update`/`delete` here, so the
/// list has a single writer. Mutations apply optimistically under a
/// `MutationGuard` and every settle triggers a re-fetch, which papers over
/// any optimistic edge case the guard missed.
///
/// Same-note races are not serialized: two in-flight mutations on one id
/// settle in arrival order and the trailing re-fetch decides the outcome.
#[derive(Clone, Copy)]
pub(crate) struct NoteCache {
    api_client: RwSignal<ApiClient>,
    notes: RwSignal<Vec<Note>>,
    loading: RwSignal<bool>,
    loaded: RwSignal<bool>,
    error: RwSignal<Option<ApiError>>,
    /// Monotonic fetch id; responses that lost the race are dropped.
    request_id: RwSignal<u64>,
}

impl NoteCache {
    pub fn new(api_client: RwSignal<ApiClient>) -> Self {
        Self {
            api_client,
            notes: RwSignal::new(vec![]),
            loading: RwSignal::new(false),
            loaded: RwSignal::new(false),
            error: RwSignal::new(None),
            request_id: RwSignal::new(0),
        }
    }

    pub fn notes(&self) -> ReadSignal<Vec<Note>> {
        self.notes.read_only()
    }

    pub fn loading(&self) -> ReadSignal<bool> {
        self.loading.read_only()
    }

    /// True once any fetch has succeeded; gates the first paint of the list.
    pub fn loaded(&self) -> ReadSignal<bool> {
        self.loaded.read_only()
    }

    pub fn error(&self) -> ReadSignal<Option<ApiError>> {
        self.error.read_only()
    }

    /// Initial load. Deduplicates: a call while a fetch is in flight is a
    /// no-op. Not retried automatically on failure; calling again is the
    /// user's re-attempt.
    pub fn load(&self) {
        if self.loading.get_untracked() {
            return;
        }
        self.error.set(None);
        self.fetch();
    }

    /// Settle hook: unconditionally refresh from the server. Does not clear
    /// a surfaced mutation error; only `load` and new mutations do that.
    fn refetch(&self) {
        self.fetch();
    }

    fn fetch(&self) {
        let req_id = self.request_id.get_untracked().saturating_add(1);
        self.request_id.set(req_id);
        self.loading.set(true);

        let cache = *self;
        let api_client = self.api_client.get_untracked();
        spawn_local(async move {
            let result = api_client.list_notes().await;

            // Ignore stale responses.
            if cache.request_id.get_untracked() != req_id {
                return;
            }

            match result {
                Ok(mut notes) => {
                    sort_newest_first(&mut notes);
                    cache.notes.set(notes);
                    cache.loaded.set(true);
                }
                Err(e) => cache.error.set(Some(e)),
            }
            cache.loading.set(false);
        });
    }

    /// Optimistically prepend `note`, then persist it. `on_settled` runs
    /// once the outcome is known, after any rollback.
    pub fn create(&self, note: Note, on_settled: impl FnOnce(bool) + 'static) {
        self.error.set(None);

        let guard = MutationGuard::apply(self.notes, {
            let note = note.clone();
            move |xs| xs.insert(0, note)
        });

        let cache = *self;
        let api_client = self.api_client.get_untracked();
        spawn_local(async move {
            let ok = match api_client.create_note(&note).await {
                Ok(_) => {
                    guard.commit();
                    true
                }
                Err(e) => {
                    guard.rollback();
                    cache.error.set(Some(e));
                    false
                }
            };
            on_settled(ok);
            cache.refetch();
        });
    }

    /// Optimistically replace the entry with `note.id`, then persist the
    /// editable fields.
    pub fn update(&self, note: Note, on_settled: impl FnOnce(bool) + 'static) {
        self.error.set(None);

        let guard = MutationGuard::apply(self.notes, {
            let note = note.clone();
            move |xs| {
                replace_by_id(xs, &note);
            }
        });

        let cache = *self;
        let api_client = self.api_client.get_untracked();
        spawn_local(async move {
            let req = UpdateNoteRequest::from(&note);
            let ok = match api_client.update_note(&req).await {
                Ok(_) => {
                    guard.commit();
                    true
                }
                Err(e) => {
                    guard.rollback();
                    cache.error.set(Some(e));
                    false
                }
            };
            on_settled(ok);
            cache.refetch();
        });
    }

    /// Optimistically remove the entry with `note.id`, then persist the
    /// deletion.
    pub fn delete(&self, note: Note, on_settled: impl FnOnce(bool) + 'static) {
        self.error.set(None);

        let guard = MutationGuard::apply(self.notes, {
            let id = note.id.clone();
            move |xs| {
                remove_by_id(xs, &id);
            }
        });

        let cache = *self;
        let api_client = self.api_client.get_untracked();
        spawn_local(async move {
            let req = DeleteNoteRequest {
                id: note.id.clone(),
            };
            let ok = match api_client.delete_note(&req).await {
                Ok(_) => {
                    guard.commit();
                    true
                }
                Err(e) => {
                    guard.rollback();
                    cache.error.set(Some(e));
                    false
                }
            };
            on_settled(ok);
            cache.refetch();
        });
    }
}

/// The list invariant: `created_at` descending. RFC 3339 strings compare
/// correctly as text.
fn sort_newest_first(notes: &mut [Note]) {
    notes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

fn replace_by_id(notes: &mut [Note], updated: &Note) -> bool {
    match notes.iter_mut().find(|n| n.id == updated.id) {
        Some(slot) => {
            *slot = updated.clone();
            true
        }
        None => false,
    }
}

fn remove_by_id(notes: &mut Vec<Note>, id: &str) -> bool {
    let before = notes.len();
    notes.retain(|n| n.id != id);
    notes.len() != before
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(id: &str, title: &str, created_at: &str) -> Note {
        Note {
            id: id.to_string(),
            owner_id: "u@example.com".to_string(),
            title: title.to_string(),
            body: "b".to_string(),
            created_at: created_at.to_string(),
        }
    }

    #[test]
    fn test_sort_newest_first() {
        let mut notes = vec![
            note("1", "old", "2026-01-01T00:00:00.000Z"),
            note("2", "new", "2026-03-01T00:00:00.000Z"),
            note("3", "mid", "2026-02-01T00:00:00.000Z"),
        ];
        sort_newest_first(&mut notes);
        let ids: Vec<&str> = notes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "3", "1"]);
    }

    #[test]
    fn test_replace_by_id_touches_only_the_match() {
        let mut notes = vec![
            note("1", "X", "2026-01-02T00:00:00.000Z"),
            note("2", "Y", "2026-01-01T00:00:00.000Z"),
        ];

        let mut updated = notes[0].clone();
        updated.title = "Z".to_string();
        assert!(replace_by_id(&mut notes, &updated));

        assert_eq!(notes[0].title, "Z");
        // Write-once fields survive the replace by construction.
        assert_eq!(notes[0].id, "1");
        assert_eq!(notes[0].owner_id, "u@example.com");
        assert_eq!(notes[0].created_at, "2026-01-02T00:00:00.000Z");
        assert_eq!(notes[1].title, "Y");

        let missing = note("9", "?", "2026-01-03T00:00:00.000Z");
        assert!(!replace_by_id(&mut notes, &missing));
        assert_eq!(notes.len(), 2);
    }

    #[test]
    fn test_remove_by_id_removes_exactly_one_entry() {
        let mut notes = vec![
            note("1", "X", "2026-01-02T00:00:00.000Z"),
            note("2", "Y", "2026-01-01T00:00:00.000Z"),
        ];

        assert!(remove_by_id(&mut notes, "1"));
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].id, "2");

        assert!(!remove_by_id(&mut notes, "1"));
        assert_eq!(notes.len(), 1);
    }

    #[test]
    fn test_create_rollback_returns_to_empty_list() {
        // Scenario: [] -> optimistic create -> server failure -> [].
        let state: RwSignal<Vec<Note>> = RwSignal::new(vec![]);
        let n = note("1", "A", "2026-01-01T00:00:00.000Z");

        let guard = MutationGuard::apply(state, {
            let n = n.clone();
            move |xs| xs.insert(0, n)
        });
        assert_eq!(state.get_untracked(), vec![n]);

        guard.rollback();
        assert_eq!(state.get_untracked(), Vec::<Note>::new());
    }

    #[test]
    fn test_create_prepends_to_head() {
        let existing = note("1", "old", "2026-01-01T00:00:00.000Z");
        let state: RwSignal<Vec<Note>> = RwSignal::new(vec![existing.clone()]);
        let fresh = note("2", "new", "2026-02-01T00:00:00.000Z");

        let guard = MutationGuard::apply(state, {
            let fresh = fresh.clone();
            move |xs| xs.insert(0, fresh)
        });
        guard.commit();

        assert_eq!(state.get_untracked(), vec![fresh, existing]);
    }

    #[test]
    fn test_update_rollback_restores_snapshot() {
        // Scenario: [{id:1,title:"X"}, ...] -> optimistic update to "Z" ->
        // server failure -> list equals the pre-update snapshot.
        let a = note("1", "X", "2026-01-02T00:00:00.000Z");
        let b = note("2", "Y", "2026-01-01T00:00:00.000Z");
        let state: RwSignal<Vec<Note>> = RwSignal::new(vec![a.clone(), b.clone()]);

        let mut updated = a.clone();
        updated.title = "Z".to_string();

        let guard = MutationGuard::apply(state, {
            let updated = updated.clone();
            move |xs| {
                replace_by_id(xs, &updated);
            }
        });
        assert_eq!(state.get_untracked(), vec![updated, b.clone()]);

        guard.rollback();
        assert_eq!(state.get_untracked(), vec![a, b]);
    }

    #[test]
    fn test_delete_rollback_restores_snapshot() {
        let a = note("1", "X", "2026-01-02T00:00:00.000Z");
        let b = note("2", "Y", "2026-01-01T00:00:00.000Z");
        let state: RwSignal<Vec<Note>> = RwSignal::new(vec![a.clone(), b.clone()]);

        let guard = MutationGuard::apply(state, |xs| {
            remove_by_id(xs, "1");
        });
        assert_eq!(state.get_untracked(), vec![b.clone()]);

        guard.rollback();
        assert_eq!(state.get_untracked(), vec![a, b]);
    }
}
