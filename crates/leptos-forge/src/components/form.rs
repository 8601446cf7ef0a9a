//! Form Component

use leptos::prelude::*;
use serde::de::DeserializeOwned;

use crate::components::ForgeField;
use crate::form::FormState;

/// Renders every top-level field of `form` and submits typed values.
///
/// `on_submit` only runs when the schema passes; otherwise the field errors
/// stay on the form and nothing else happens.
#[component]
pub fn ForgeForm<T>(
    form: RwSignal<FormState>,
    on_submit: Callback<T>,
    #[prop(into, default = "Submit".to_string())] submit_label: String,
    #[prop(into, default = Signal::stored(false))] pending: Signal<bool>,
    #[prop(optional)] children: Option<Children>,
) -> impl IntoView
where
    T: DeserializeOwned + 'static,
{
    let field_names = form.with_untracked(|f| f.fields().iter().map(|d| d.name.clone()).collect::<Vec<_>>());

    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if pending.get_untracked() {
            return;
        }
        let mut outcome = None;
        form.update(|f| outcome = Some(f.submit::<T>()));
        match outcome {
            Some(Ok(values)) => on_submit.run(values),
            Some(Err(err)) => log::debug!("[forge] submit blocked: {err}"),
            None => {}
        }
    };

    view! {
        <form class="forge-form" on:submit=submit novalidate=true>
            {field_names
                .into_iter()
                .map(|name| view! { <ForgeField form=form path=name /> })
                .collect_view()}
            {move || form.with(|f| f.form_error().map(str::to_owned)).map(|e| view! {
                <p class="forge-form-error">{e}</p>
            })}
            <div class="forge-actions">
                {children.map(|c| c())}
                <button type="submit" class="primary" disabled=move || pending.get()>
                    {move || if pending.get() { "Saving...".to_string() } else { submit_label.clone() }}
                </button>
            </div>
        </form>
    }
}
