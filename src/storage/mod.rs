use crate::models::SessionUser;
use serde::{Deserialize, Serialize};

pub(crate) const SESSION_USER_KEY: &str = "notewall_session_user";

pub(crate) fn load_json_from_storage<T: for<'de> Deserialize<'de>>(key: &str) -> Option<T> {
    let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten())?;
    let json = storage.get_item(key).ok().flatten()?;
    serde_json::from_str(&json).ok()
}

pub(crate) fn save_json_to_storage<T: Serialize>(key: &str, value: &T) {
    if let Ok(json) = serde_json::to_string(value) {
        if let Some(storage) = web_sys::window().and_then(|w| w.local_storage().ok().flatten()) {
            let _ = storage.set_item(key, &json);
        }
    }
}

pub(crate) fn remove_from_storage(key: &str) {
    if let Some(storage) = web_sys::window().and_then(|w| w.local_storage().ok().flatten()) {
        let _ = storage.remove_item(key);
    }
}

/// Cache the identity the provider last reported, so a returning visitor
/// gets a first paint without waiting on the session round-trip. The session
/// check on mount revalidates it.
pub(crate) fn save_session_user(user: &SessionUser) {
    save_json_to_storage(SESSION_USER_KEY, user);
}

pub(crate) fn load_session_user() -> Option<SessionUser> {
    load_json_from_storage::<SessionUser>(SESSION_USER_KEY)
}

pub(crate) fn clear_session_user() {
    remove_from_storage(SESSION_USER_KEY);
}
