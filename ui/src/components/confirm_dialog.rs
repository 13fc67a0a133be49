use crate::resource::PendingDelete;
use leptos::prelude::*;

/// Modal asking the user to confirm a pending delete
#[component]
pub fn ConfirmDeleteDialog(
    #[prop(into)] pending: Signal<Option<PendingDelete>>,
    kind: &'static str,
    #[prop(into)] deleting: Signal<bool>,
    on_cancel: Callback<()>,
    on_confirm: Callback<()>,
) -> impl IntoView {
    move || {
        pending.get().map(|target| {
            view! {
                <div class="fixed inset-0 bg-gray-600 bg-opacity-50 overflow-y-auto h-full w-full z-50">
                    <div class="relative top-20 mx-auto p-5 border w-96 shadow-lg rounded-md bg-white">
                        <div class="mt-3 text-center">
                            <h3 class="text-lg leading-6 font-medium text-gray-900">"Delete " {kind}</h3>
                            <div class="mt-2 px-7 py-3">
                                <p class="text-sm text-gray-500">
                                    "Are you sure you want to delete " {kind} " \"" {target.label.clone()}
                                    "\"? This action cannot be undone."
                                </p>
                            </div>
                            <div class="flex justify-center space-x-4 mt-4">
                                <button
                                    class="px-4 py-2 bg-gray-200 text-gray-800 rounded-md hover:bg-gray-300"
                                    on:click=move |_| on_cancel.run(())
                                    disabled=move || deleting.get()
                                >
                                    "Cancel"
                                </button>
                                <button
                                    class="px-4 py-2 bg-red-600 text-white rounded-md hover:bg-red-700 disabled:opacity-50"
                                    on:click=move |_| on_confirm.run(())
                                    disabled=move || deleting.get()
                                >
                                    {move || if deleting.get() { "Deleting..." } else { "Delete" }}
                                </button>
                            </div>
                        </div>
                    </div>
                </div>
            }
        })
    }
}
