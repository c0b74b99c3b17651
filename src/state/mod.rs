use crate::api::ApiClient;
use crate::cache::NoteCache;
use crate::models::SessionUser;
use crate::storage::load_session_user;
use leptos::prelude::*;

#[derive(Clone, Copy)]
pub(crate) struct AppState {
    pub api_client: RwSignal<ApiClient>,

    /// Identity restored from localStorage for instant paint; revalidated
    /// against the provider on every NotesPage mount.
    pub current_user: RwSignal<Option<SessionUser>>,

    /// True once the provider has confirmed (or denied) the session this
    /// page load.
    pub session_checked: RwSignal<bool>,

    /// The one note cache; created here, torn down with the app.
    pub notes: NoteCache,
}

impl AppState {
    pub fn new() -> Self {
        let api_client = RwSignal::new(ApiClient::from_env());

        Self {
            api_client,
            current_user: RwSignal::new(load_session_user()),
            session_checked: RwSignal::new(false),
            notes: NoteCache::new(api_client),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Copy)]
pub(crate) struct AppContext(pub AppState);
