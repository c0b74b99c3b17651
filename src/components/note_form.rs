use crate::components::autosize;
use crate::components::hooks::{use_click_outside, ClickBoundary};
use crate::models::{validate_note_input, Note};
use crate::state::AppContext;
use crate::util::{new_note_id, now_iso};
use leptos::html;
use leptos::prelude::*;
use wasm_bindgen::JsCast;

/// Collapsed one-line prompt that expands into the new-note composer.
///
/// The draft lives only in local signals: an outside pointerdown or the
/// cancel control throws it away. Submit stamps identity and timestamp on
/// the client and collapses before the create settles.
#[component]
pub fn NoteForm() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let cache = app_state.0.notes;

    let expanded: RwSignal<bool> = RwSignal::new(false);
    let title_value: RwSignal<String> = RwSignal::new(String::new());
    let body_value: RwSignal<String> = RwSignal::new(String::new());
    let validation_error: RwSignal<Option<String>> = RwSignal::new(None);

    let form_ref: NodeRef<html::Div> = NodeRef::new();

    let close_composer = move || {
        expanded.set(false);
        title_value.set(String::new());
        body_value.set(String::new());
        validation_error.set(None);
    };

    use_click_outside(ClickBoundary::new(form_ref), move || {
        if expanded.get_untracked() {
            close_composer();
        }
    });

    let on_title_input = move |ev: web_sys::Event| {
        title_value.set(event_target_value(&ev));
        validation_error.set(None);
    };

    let on_body_input = move |ev: web_sys::Event| {
        body_value.set(event_target_value(&ev));
        validation_error.set(None);

        if let Some(el) = ev
            .target()
            .and_then(|t| t.dyn_into::<web_sys::HtmlTextAreaElement>().ok())
        {
            autosize(&el);
        }
    };

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();

        let input = match validate_note_input(
            &title_value.get_untracked(),
            &body_value.get_untracked(),
        ) {
            Ok(input) => input,
            Err(e) => {
                // An Enter press in the collapsed prompt lands here too;
                // make sure the missing field is on screen.
                expanded.set(true);
                validation_error.set(Some(e.to_string()));
                return;
            }
        };

        let owner = app_state
            .0
            .current_user
            .get_untracked()
            .map(|u| u.email)
            .unwrap_or_default();

        let note = Note {
            id: new_note_id(),
            owner_id: owner,
            title: input.title,
            body: input.body,
            created_at: now_iso(),
        };

        // Collapse now; the optimistic prepend shows the note on the wall
        // whatever the persistence outcome.
        close_composer();
        cache.create(note, |_| {});
    };

    view! {
        <div class="flex flex-col items-center pt-10">
            <span
                class="pb-2 text-sm font-semibold text-destructive transition-opacity duration-200"
                class=("opacity-0", move || validation_error.get().is_none())
            >
                {move || validation_error.get().unwrap_or_default()}
            </span>

            <div node_ref=form_ref class="w-full px-4 sm:w-1/3 sm:px-0">
                <form class="flex flex-col" on:submit=on_submit>
                    <div
                        class="flex rounded-md border bg-card pr-3"
                        class=("rounded-b-none", move || expanded.get())
                        class=("border-b-0", move || expanded.get())
                    >
                        <input
                            class="flex-1 bg-transparent px-5 py-2 outline-none"
                            type="text"
                            autocomplete="off"
                            placeholder=move || if expanded.get() { "Title" } else { "Take a note..." }
                            prop:value=move || title_value.get()
                            on:click=move |_| expanded.set(true)
                            on:input=on_title_input
                        />
                        <Show when=move || expanded.get() fallback=|| ().into_view()>
                            <button
                                type="button"
                                class="text-destructive hover:opacity-80"
                                aria-label="Discard draft"
                                on:click=move |_| close_composer()
                            >
                                <icons::X class="size-4" />
                            </button>
                        </Show>
                    </div>

                    <Show when=move || expanded.get() fallback=|| ().into_view()>
                        <div class="border border-y-0 bg-card">
                            <textarea
                                class="min-h-[100px] w-full resize-none overflow-hidden bg-transparent px-5 pt-2 outline-none"
                                placeholder="Take a note..."
                                prop:value=move || body_value.get()
                                on:input=on_body_input
                            ></textarea>
                        </div>
                        <div class="flex justify-end rounded-b-md border border-t-0 bg-card p-2">
                            <button
                                type="submit"
                                class="pr-2 text-primary hover:opacity-80"
                                aria-label="Add note"
                            >
                                <icons::ArrowRight class="size-4" />
                            </button>
                        </div>
                    </Show>
                </form>
            </div>
        </div>
    }
}
