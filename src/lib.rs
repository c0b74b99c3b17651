mod api;
mod app;
mod cache;
mod components;
mod models;
mod pages;
mod state;
mod storage;
mod util;

pub use app::App;

use leptos::prelude::*;

// Needed for `#[wasm_bindgen(start)]` on the wasm entrypoint.
#[cfg(all(target_arch = "wasm32", not(test)))]
use wasm_bindgen::prelude::wasm_bindgen;

// Only register the WASM start function for normal builds (not for tests),
// otherwise wasm-bindgen-test will end up with multiple entry symbols.
#[cfg_attr(all(target_arch = "wasm32", not(test)), wasm_bindgen(start))]
pub fn main() {
    console_error_panic_hook::set_once();
    mount_to_body(App);
}

// WASM-only tests (run with `cargo test --target wasm32-unknown-unknown` + wasm-bindgen-test-runner)
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use crate::models::SessionUser;
    use crate::storage::{clear_session_user, load_session_user, save_session_user};
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_session_user_storage_roundtrip() {
        clear_session_user();
        assert!(load_session_user().is_none());

        let user = SessionUser {
            name: Some("Ada".to_string()),
            email: "ada@example.com".to_string(),
        };
        save_session_user(&user);

        let loaded = load_session_user().expect("should load user from localStorage");
        assert_eq!(loaded, user);

        clear_session_user();
        assert!(load_session_user().is_none());
    }
}
