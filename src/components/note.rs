use crate::components::autosize;
use crate::components::hooks::{use_click_outside, ClickBoundary};
use crate::models::{validate_note_input, Note};
use crate::state::AppContext;
use leptos::html;
use leptos::prelude::*;
use wasm_bindgen::JsCast;

/// Lifecycle of one card's inline editor.
///
/// ReadOnly -> Editing on a click inside the card; Editing -> ReadOnly on an
/// outside pointerdown (discarding edits) or a valid submit (via Submitting
/// until the mutation settles).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub(crate) enum EditorMode {
    #[default]
    ReadOnly,
    Editing,
    Submitting,
}

#[component]
pub fn NoteCard(note_id: String) -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let cache = app_state.0.notes;

    let note_id = StoredValue::new(note_id);

    // The card only receives its id; fields derive from the shared list so
    // settle-refetches land on screen even while the row's key survives.
    let server_note = move || {
        cache
            .notes()
            .get()
            .into_iter()
            .find(|n| n.id == note_id.get_value())
    };

    let server_note_untracked = move || {
        cache
            .notes()
            .get_untracked()
            .into_iter()
            .find(|n| n.id == note_id.get_value())
    };

    let mode: RwSignal<EditorMode> = RwSignal::new(EditorMode::ReadOnly);

    let initial = server_note_untracked();
    let initial_title = initial.as_ref().map(|n| n.title.clone()).unwrap_or_default();
    let initial_body = initial.map(|n| n.body).unwrap_or_default();

    let title_value: RwSignal<String> = RwSignal::new(initial_title.clone());
    let body_value: RwSignal<String> = RwSignal::new(initial_body.clone());
    // Last-committed field values; discarded edits revert to these.
    let committed_title: RwSignal<String> = RwSignal::new(initial_title);
    let committed_body: RwSignal<String> = RwSignal::new(initial_body);

    let validation_error: RwSignal<Option<String>> = RwSignal::new(None);

    let card_ref: NodeRef<html::Div> = NodeRef::new();
    let body_ref: NodeRef<html::Textarea> = NodeRef::new();

    // Follow the cache while idle, so a re-fetch (or another session's write
    // arriving through it) updates the card; never clobber an edit in
    // progress.
    Effect::new(move |_| {
        let Some(n) = server_note() else {
            return;
        };

        if mode.get_untracked() != EditorMode::ReadOnly {
            return;
        }

        title_value.set(n.title.clone());
        body_value.set(n.body.clone());
        committed_title.set(n.title);
        committed_body.set(n.body);
    });

    // Size the body to its content, on mount and whenever it changes.
    Effect::new(move |_| {
        let _ = body_value.get();
        if let Some(el) = body_ref.get() {
            autosize(&el);
        }
    });

    // Outside pointerdown while editing: drop in-progress edits and go
    // read-only. A submit already in flight settles on its own.
    use_click_outside(ClickBoundary::new(card_ref), move || {
        if mode.get_untracked() != EditorMode::Editing {
            return;
        }
        title_value.set(committed_title.get_untracked());
        body_value.set(committed_body.get_untracked());
        validation_error.set(None);
        mode.set(EditorMode::ReadOnly);
    });

    let on_card_click = move |_: web_sys::MouseEvent| {
        if mode.get_untracked() == EditorMode::ReadOnly {
            mode.set(EditorMode::Editing);
        }
    };

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

        if mode.get_untracked() != EditorMode::Editing {
            return;
        }

        // The id/owner/timestamp travel from the cached entry; a card whose
        // note vanished from the cache has nothing to update.
        let Some(current) = server_note_untracked() else {
            return;
        };

        let input = match validate_note_input(
            &title_value.get_untracked(),
            &body_value.get_untracked(),
        ) {
            Ok(input) => input,
            Err(e) => {
                validation_error.set(Some(e.to_string()));
                return;
            }
        };
        validation_error.set(None);

        // Nothing changed since the last commit: skip the round-trip.
        if input.title == committed_title.get_untracked()
            && input.body == committed_body.get_untracked()
        {
            title_value.set(input.title);
            body_value.set(input.body);
            mode.set(EditorMode::ReadOnly);
            return;
        }

        title_value.set(input.title.clone());
        body_value.set(input.body.clone());
        mode.set(EditorMode::Submitting);

        let updated = Note {
            title: input.title,
            body: input.body,
            ..current
        };

        cache.update(updated.clone(), move |ok| {
            if ok {
                committed_title.set(updated.title.clone());
                committed_body.set(updated.body.clone());
            } else {
                // The cache rolled the list back; mirror that in the fields.
                title_value.set(committed_title.get_untracked());
                body_value.set(committed_body.get_untracked());
            }
            mode.set(EditorMode::ReadOnly);
        });
    };

    let on_delete = move |ev: web_sys::MouseEvent| {
        // Keep the press from re-arming the select transition.
        ev.stop_propagation();

        if mode.get_untracked() != EditorMode::Editing {
            return;
        }

        let Some(doomed) = server_note_untracked() else {
            return;
        };
        cache.delete(doomed, |_| {});
    };

    let read_only = move || mode.get() != EditorMode::Editing;

    view! {
        <div
            node_ref=card_ref
            data-mode=move || mode.get().to_string()
            class="flex flex-col overflow-hidden rounded-xl border bg-card text-card-foreground shadow-sm"
            on:click=on_card_click
        >
            <form class="flex flex-col" on:submit=on_submit>
                <input
                    class="bg-transparent px-3 py-2 font-semibold outline-none read-only:cursor-default"
                    type="text"
                    prop:value=move || title_value.get()
                    readonly=read_only
                    on:input=on_title_input
                />
                <textarea
                    node_ref=body_ref
                    class="resize-none overflow-hidden bg-transparent px-3 pb-2 text-sm outline-none read-only:cursor-default"
                    prop:value=move || body_value.get()
                    readonly=read_only
                    on:input=on_body_input
                ></textarea>

                <Show when=move || validation_error.get().is_some() fallback=|| ().into_view()>
                    <div class="px-3 pb-1 text-xs font-semibold text-destructive">
                        {move || validation_error.get().unwrap_or_default()}
                    </div>
                </Show>

                <div
                    class="flex items-center justify-between px-2 py-1 transition-opacity"
                    class=("opacity-0", move || mode.get() == EditorMode::ReadOnly)
                    class=("pointer-events-none", move || mode.get() == EditorMode::ReadOnly)
                >
                    <button
                        type="button"
                        class="p-1 text-destructive hover:opacity-80"
                        aria-label="Delete note"
                        on:click=on_delete
                    >
                        <icons::Trash2 class="size-4" />
                    </button>
                    <button
                        type="submit"
                        class="p-1 text-primary hover:opacity-80"
                        aria-label="Save note"
                        disabled=move || mode.get() == EditorMode::Submitting
                    >
                        <icons::Save class="size-4" />
                    </button>
                </div>
            </form>
        </div>
    }
}
