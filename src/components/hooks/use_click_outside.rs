use leptos::ev;
use leptos::html;
use leptos::prelude::*;
use leptos_dom::helpers::window_event_listener;
use wasm_bindgen::JsCast;

/// Hit-test between a pointer event and a rendered region.
///
/// Wraps the region's node ref so callers ask "did this event land inside?"
/// without touching event targets themselves.
#[derive(Clone, Copy)]
pub(crate) struct ClickBoundary {
    node_ref: NodeRef<html::Div>,
}

impl ClickBoundary {
    pub fn new(node_ref: NodeRef<html::Div>) -> Self {
        Self { node_ref }
    }

    /// True when the event target lies inside the tracked region. An
    /// unmounted region contains nothing.
    pub fn contains_event(&self, ev: &web_sys::Event) -> bool {
        let Some(root) = self.node_ref.get_untracked() else {
            return false;
        };
        let Some(target) = ev.target().and_then(|t| t.dyn_into::<web_sys::Node>().ok()) else {
            return false;
        };
        root.contains(Some(&target))
    }
}

/// Run `on_outside` for every pointerdown that misses `boundary`.
///
/// pointerdown (not click) so the miss is handled before the pressed
/// element reacts, matching how focus leaves a widget. The window listener
/// is removed when the owning component is disposed.
pub(crate) fn use_click_outside(boundary: ClickBoundary, on_outside: impl Fn() + 'static) {
    let handle = window_event_listener(ev::pointerdown, move |ev: web_sys::PointerEvent| {
        if !boundary.contains_event(&ev) {
            on_outside();
        }
    });

    on_cleanup(move || handle.remove());
}
