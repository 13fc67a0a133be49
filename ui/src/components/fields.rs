//! Form controls bound to a resource editor field

use super::{ClientHandle, INPUT_CLASS};
use crate::api::Resource;
use crate::editor::FieldValue;
use crate::types::RecordStatus;
use leptos::prelude::*;

impl<T: Resource> ClientHandle<T> {
    /// Writes one editor field. Rejected writes are logged and ignored.
    pub fn set_field(&self, field: &str, value: FieldValue) {
        self.update(|client| {
            if let Err(e) = client.edit_draft(|editor| editor.set_field(field, value)) {
                log::error!("{}: {}", T::KIND, e);
            }
        });
    }

    pub fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.with(|client| f(client.editor().buffer()))
    }

    pub fn is_editing(&self) -> Signal<bool> {
        let handle = *self;
        Signal::derive(move || handle.with(|client| client.editor().is_editing()))
    }
}

/// Text input for one editor field, marked `required` when the record demands it.
pub fn text_input<T: Resource>(
    handle: ClientHandle<T>,
    field: &'static str,
    placeholder: &'static str,
    read: fn(&T) -> String,
) -> impl IntoView {
    let required = T::REQUIRED.contains(&field);
    view! {
        <input
            type="text"
            class=INPUT_CLASS
            placeholder=placeholder
            required=required
            prop:value=move || handle.read(read)
            on:input=move |ev| handle.set_field(field, FieldValue::Text(event_target_value(&ev)))
        />
    }
}

pub fn password_input<T: Resource>(
    handle: ClientHandle<T>,
    field: &'static str,
    placeholder: &'static str,
    read: fn(&T) -> String,
) -> impl IntoView {
    let required = T::REQUIRED.contains(&field);
    view! {
        <input
            type="password"
            class=INPUT_CLASS
            placeholder=placeholder
            required=required
            prop:value=move || handle.read(read)
            on:input=move |ev| handle.set_field(field, FieldValue::Text(event_target_value(&ev)))
        />
    }
}

pub fn text_area<T: Resource>(
    handle: ClientHandle<T>,
    field: &'static str,
    placeholder: &'static str,
    read: fn(&T) -> String,
) -> impl IntoView {
    let required = T::REQUIRED.contains(&field);
    view! {
        <textarea
            class=INPUT_CLASS
            rows=3
            placeholder=placeholder
            required=required
            prop:value=move || handle.read(read)
            on:input=move |ev| handle.set_field(field, FieldValue::Text(event_target_value(&ev)))
        ></textarea>
    }
}

pub fn status_select<T: Resource>(handle: ClientHandle<T>, read: fn(&T) -> RecordStatus) -> impl IntoView {
    view! {
        <select
            class=INPUT_CLASS
            prop:value=move || handle.read(read).as_str()
            on:change=move |ev| handle.set_field("status", FieldValue::Text(event_target_value(&ev)))
        >
            <option value="active">"Active"</option>
            <option value="inactive">"Inactive"</option>
        </select>
    }
}

/// Submit and cancel buttons shared by every management form
pub fn form_actions<T: Resource>(handle: ClientHandle<T>, saving: ReadSignal<bool>, on_cancel: Callback<()>) -> impl IntoView {
    let editing = handle.is_editing();
    view! {
        <div class="flex gap-2">
            <button type="submit" class=super::PRIMARY_BUTTON disabled=move || saving.get()>
                {move || match (saving.get(), editing.get()) {
                    (true, _) => "Saving...".to_string(),
                    (false, true) => format!("Update {}", T::KIND),
                    (false, false) => format!("Create {}", T::KIND),
                }}
            </button>
            {move || editing.get().then(|| view! {
                <button type="button" class=super::SECONDARY_BUTTON on:click=move |_| on_cancel.run(())>
                    "Cancel"
                </button>
            })}
        </div>
    }
}
