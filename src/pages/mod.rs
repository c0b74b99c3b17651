use crate::api::{ApiErrorKind, AuthProvider};
use crate::components::hooks::{use_click_outside, ClickBoundary};
use crate::components::ui::{
    Alert, AlertDescription, AlertTitle, Button, ButtonSize, Card, CardContent, CardDescription,
    CardHeader, CardTitle, Spinner,
};
use crate::components::{NoteCard, NoteForm};
use crate::models::Note;
use crate::state::AppContext;
use crate::storage::{clear_session_user, save_session_user};
use leptos::html;
use leptos::prelude::*;
use leptos::task::spawn_local;

/// Authenticated home: header, composer, and the wall of note cards.
#[component]
pub fn NotesPage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let cache = app_state.0.notes;

    let session_error: RwSignal<Option<String>> = RwSignal::new(None);

    Effect::new(move |_| {
        document().set_title("Notes");
    });

    // Resolve the session against the identity provider once per page load.
    // A cached identity renders immediately; this confirms or evicts it.
    Effect::new(move |_| {
        if app_state.0.session_checked.get() {
            return;
        }

        let api_client = app_state.0.api_client.get_untracked();
        spawn_local(async move {
            match api_client.get_session().await {
                Ok(Some(user)) => {
                    save_session_user(&user);
                    app_state.0.current_user.set(Some(user));
                    app_state.0.session_checked.set(true);
                    cache.load();
                }
                Ok(None) => {
                    clear_session_user();
                    app_state.0.current_user.set(None);
                    let _ = window().location().set_href("/signin");
                }
                Err(e) => {
                    if e.kind == ApiErrorKind::Unauthorized {
                        clear_session_user();
                        app_state.0.current_user.set(None);
                        let _ = window().location().set_href("/signin");
                    } else {
                        session_error.set(Some(e.to_string()));
                    }
                }
            }
        });
    });

    // A rejected note request means the session expired mid-visit.
    Effect::new(move |_| {
        if let Some(e) = cache.error().get() {
            if e.kind == ApiErrorKind::Unauthorized {
                clear_session_user();
                app_state.0.current_user.set(None);
                let _ = window().location().set_href("/signin");
            }
        }
    });

    // Header dropdown.
    let menu_open: RwSignal<bool> = RwSignal::new(false);
    let menu_ref: NodeRef<html::Div> = NodeRef::new();
    use_click_outside(ClickBoundary::new(menu_ref), move || menu_open.set(false));

    let on_sign_out = move |_: web_sys::MouseEvent| {
        menu_open.set(false);
        clear_session_user();
        let api_client = app_state.0.api_client.get_untracked();
        let _ = window().location().set_href(&api_client.sign_out_url());
    };

    let avatar_initial = move || {
        app_state
            .0
            .current_user
            .get()
            .map(|u| u.initial())
            .unwrap_or_default()
    };

    let cache_error_message = move || {
        cache
            .error()
            .get()
            .map(|e| e.to_string())
            .or_else(|| session_error.get())
            .unwrap_or_default()
    };

    let has_error = move || cache.error().get().is_some() || session_error.get().is_some();

    view! {
        <Show
            when=move || app_state.0.current_user.get().is_some()
            fallback=move || view! {
                <main class="flex min-h-screen w-full items-center justify-center bg-background text-foreground">
                    <p class="text-sm text-muted-foreground">
                        {move || session_error.get().unwrap_or_else(|| "Loading...".to_string())}
                    </p>
                </main>
            }
        >
            <main class="flex min-h-screen w-full flex-col bg-background text-foreground">
                <div class="flex justify-end">
                    <div node_ref=menu_ref class="relative mr-5 mt-2 sm:mr-20 sm:mt-10">
                        <button
                            class="rounded bg-primary px-8 py-1 text-2xl font-bold text-primary-foreground shadow-sm hover:opacity-90"
                            aria-label="Account menu"
                            on:click=move |_| menu_open.set(true)
                        >
                            {avatar_initial}
                        </button>
                        <Show when=move || menu_open.get() fallback=|| ().into_view()>
                            <div class="absolute right-0 z-10 mt-1 w-40 rounded-md border bg-card py-1 shadow-md">
                                <button
                                    class="flex w-full items-center gap-2 px-4 py-2 text-left text-sm hover:bg-accent"
                                    on:click=on_sign_out
                                >
                                    <icons::LogOut class="size-4" />
                                    "Sign out"
                                </button>
                            </div>
                        </Show>
                    </div>
                </div>

                <NoteForm />

                <Show when=has_error fallback=|| ().into_view()>
                    <div class="container mx-auto mt-6 px-4">
                        <Alert class="border-destructive/30">
                            <AlertTitle class="text-destructive">"Something went wrong"</AlertTitle>
                            <AlertDescription class="text-destructive">
                                {cache_error_message}
                            </AlertDescription>
                            <Show when=move || !cache.loaded().get() fallback=|| ().into_view()>
                                <div class="mt-2">
                                    <Button size=ButtonSize::Sm on:click=move |_| cache.load()>
                                        "Retry"
                                    </Button>
                                </div>
                            </Show>
                        </Alert>
                    </div>
                </Show>

                <Show
                    when=move || cache.loaded().get()
                    fallback=move || view! {
                        <Show when=move || !has_error() fallback=|| ().into_view()>
                            <div class="mt-10 flex items-center justify-center gap-2 text-sm text-muted-foreground">
                                <Spinner />
                                "Loading..."
                            </div>
                        </Show>
                    }
                >
                    <div class="container mx-auto mt-10 columns-1 gap-4 px-4 pb-10 sm:columns-3 xl:columns-5">
                        <For
                            each=move || cache.notes().get()
                            key=|n| n.id.clone()
                            children=move |n: Note| {
                                view! {
                                    <div class="mb-4 break-inside-avoid">
                                        <NoteCard note_id=n.id />
                                    </div>
                                }
                            }
                        />
                    </div>
                </Show>
            </main>
        </Show>
    }
}

/// External identity provider hand-off.
#[component]
pub fn SignInPage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();

    let providers: RwSignal<Vec<AuthProvider>> = RwSignal::new(vec![]);
    let loading: RwSignal<bool> = RwSignal::new(true);
    let error: RwSignal<Option<String>> = RwSignal::new(None);

    Effect::new(move |_| {
        document().set_title("Sign in");
    });

    // Already signed in: bounce home.
    Effect::new(move |_| {
        if app_state.0.current_user.get().is_some() {
            let _ = window().location().set_href("/");
        }
    });

    Effect::new(move |_| {
        let api_client = app_state.0.api_client.get_untracked();
        spawn_local(async move {
            match api_client.get_providers().await {
                Ok(list) => providers.set(list),
                Err(e) => error.set(Some(e.to_string())),
            }
            loading.set(false);
        });
    });

    let on_provider_click = move |provider_id: String| {
        let api_client = app_state.0.api_client.get_untracked();
        let callback = window().location().origin().unwrap_or_default();
        let _ = window()
            .location()
            .set_href(&api_client.sign_in_url(&provider_id, &callback));
    };

    view! {
        <main class="flex min-h-screen w-full flex-col items-center justify-center bg-background text-foreground">
            <Show
                when=move || app_state.0.current_user.get().is_none()
                fallback=|| view! { <h1 class="text-3xl font-bold">"Redirecting..."</h1> }
            >
                <h1 class="mb-10 text-3xl font-bold">"Notes"</h1>

                <Card class="w-full max-w-sm">
                    <CardHeader>
                        <CardTitle class="text-lg">"Sign in"</CardTitle>
                        <CardDescription class="text-xs">
                            "Your notes live behind your account."
                        </CardDescription>
                    </CardHeader>

                    <CardContent>
                        <Show
                            when=move || !loading.get()
                            fallback=|| view! {
                                <div class="flex items-center gap-2 text-xs text-muted-foreground">
                                    <Spinner />
                                    "Loading sign-in options..."
                                </div>
                            }
                        >
                            <Show when=move || error.get().is_some() fallback=|| ().into_view()>
                                {move || {
                                    error.get().map(|e| view! {
                                        <Alert class="border-destructive/30">
                                            <AlertDescription class="text-xs text-destructive">{e}</AlertDescription>
                                        </Alert>
                                    })
                                }}
                            </Show>

                            <div class="flex flex-col gap-3">
                                {move || {
                                    providers
                                        .get()
                                        .into_iter()
                                        .map(|p| {
                                            let id = p.id.clone();
                                            view! {
                                                <Button
                                                    class="w-full"
                                                    on:click=move |_| on_provider_click(id.clone())
                                                >
                                                    {format!("Sign in with {}", p.name)}
                                                </Button>
                                            }
                                        })
                                        .collect_view()
                                }}
                            </div>
                        </Show>
                    </CardContent>
                </Card>
            </Show>
        </main>
    }
}
