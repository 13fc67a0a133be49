//! Trigger management tab

use super::confirm_dialog::ConfirmDeleteDialog;
use super::fields::{form_actions, status_select, text_area, text_input};
use super::notices::{flash_success, ErrorBanner, SuccessNotice};
use super::{listing_notice, status_badge, use_clients, DANGER_ROW_BUTTON, ROW_BUTTON};
use crate::types::Trigger;
use leptos::prelude::*;

#[component]
pub fn TriggersTab() -> impl IntoView {
    let triggers = use_clients().triggers;
    let (saving, set_saving) = signal(false);
    let (deleting, set_deleting) = signal(false);
    let (success, set_success) = signal(None::<String>);
    let editing = triggers.is_editing();

    Effect::new(move || {
        triggers.refresh();
    });

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        set_saving.set(true);
        triggers.spawn(move |client| async move {
            if let Ok(trigger) = client.submit(&[]).await {
                flash_success(set_success, format!("Trigger \"{}\" saved", trigger.name));
            }
            set_saving.set(false);
        });
    };

    let on_cancel = Callback::new(move |_| triggers.update(|c| c.reset_draft()));

    view! {
        <div class="space-y-6">
            <SuccessNotice message=success />
            <ErrorBanner message=triggers.error_message() on_dismiss=triggers.dismiss_error() />

            <form class="bg-white p-4 rounded-lg shadow space-y-3" on:submit=on_submit>
                <h3 class="text-lg font-semibold text-gray-700">
                    {move || if editing.get() { "Edit Trigger" } else { "New Trigger" }}
                </h3>
                <div class="grid grid-cols-1 md:grid-cols-2 gap-3">
                    {text_input(triggers, "name", "Name", |t: &Trigger| t.name.clone())}
                    {text_input(triggers, "trigger_type", "Trigger Type", |t: &Trigger| t.trigger_type.clone())}
                    {status_select(triggers, |t: &Trigger| t.status)}
                </div>
                {text_area(triggers, "description", "Description", |t: &Trigger| t.description.clone().unwrap_or_default())}
                {form_actions(triggers, saving, on_cancel)}
            </form>

            <div class="bg-white rounded-lg shadow divide-y">
                {move || {
                    let listing = triggers.with(|c| c.listing());
                    if let Some(notice) = listing_notice(&listing, "triggers") {
                        return notice;
                    }
                    listing
                        .items()
                        .iter()
                        .cloned()
                        .map(|trigger| {
                            let id = trigger.id.clone().unwrap_or_default();
                            let id_for_delete = id.clone();
                            let name_for_delete = trigger.name.clone();
                            view! {
                                <div class="flex items-center justify-between p-3">
                                    <div class="flex items-center gap-3">
                                        <span class="font-medium">{trigger.name.clone()}</span>
                                        <span class="text-sm text-gray-500">{trigger.trigger_type.clone()}</span>
                                        {status_badge(trigger.status)}
                                    </div>
                                    <div class="flex gap-1">
                                        <button class=ROW_BUTTON on:click=move |_| {
                                            triggers.update(|c| c.start_edit(&id));
                                        }>"Edit"</button>
                                        <button class=DANGER_ROW_BUTTON on:click=move |_| {
                                            triggers.update(|c| c.request_delete(id_for_delete.clone(), name_for_delete.clone()));
                                        }>"Delete"</button>
                                    </div>
                                </div>
                            }
                        })
                        .collect::<Vec<_>>()
                        .into_any()
                }}
            </div>

            <ConfirmDeleteDialog
                pending=triggers.pending_delete()
                kind="trigger"
                deleting=deleting
                on_cancel=triggers.cancel_delete()
                on_confirm=triggers.confirm_delete(set_deleting)
            />
        </div>
    }
}
