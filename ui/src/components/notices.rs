//! Success and error banners shown above the management forms

use leptos::prelude::*;

/// Shows `message` and clears it again after three seconds.
pub fn flash_success(set_message: WriteSignal<Option<String>>, message: impl Into<String>) {
    set_message.set(Some(message.into()));
    let handle = gloo_timers::callback::Timeout::new(3000, move || {
        set_message.set(None);
    });
    handle.forget();
}

#[component]
pub fn SuccessNotice(#[prop(into)] message: Signal<Option<String>>) -> impl IntoView {
    move || {
        message.get().map(|msg| {
            view! {
                <div class="mb-4 p-3 bg-green-50 border border-green-200 rounded text-green-800 text-sm">
                    {msg}
                </div>
            }
        })
    }
}

/// Dismissible error banner
#[component]
pub fn ErrorBanner(#[prop(into)] message: Signal<Option<String>>, on_dismiss: Callback<()>) -> impl IntoView {
    move || {
        message.get().map(|msg| {
            view! {
                <div class="mb-4 p-3 bg-red-50 border border-red-200 rounded text-red-800 text-sm flex justify-between items-start gap-4">
                    <span>{msg}</span>
                    <button class="text-red-600 hover:text-red-800" on:click=move |_| on_dismiss.run(())>
                        "Dismiss"
                    </button>
                </div>
            }
        })
    }
}
