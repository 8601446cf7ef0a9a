//! Dialog and Wizard Shells

use leptos::prelude::*;
use serde_json::{Map, Value};

use crate::components::ForgeField;
use crate::form::FormState;
use crate::wizard::{StepOutcome, WizardState};

/// Close the dialog on Escape while it is open
fn bind_escape_to_close(open: RwSignal<bool>) {
    let handle = window_event_listener(leptos::ev::keydown, move |ev| {
        if ev.key() == "Escape" && open.try_get_untracked() == Some(true) {
            let _ = open.try_set(false);
        }
    });
    on_cleanup(move || handle.remove());
}

/// Modal overlay; clicking the backdrop or pressing Escape closes it
#[component]
pub fn Dialog(
    open: RwSignal<bool>,
    #[prop(into)] title: String,
    #[prop(into, optional)] description: Option<String>,
    children: ChildrenFn,
) -> impl IntoView {
    bind_escape_to_close(open);

    view! {
        <Show when=move || open.get()>
            <div class="dialog-backdrop" on:click=move |_| open.set(false)>
                <div class="dialog" role="dialog" on:click=|ev| ev.stop_propagation()>
                    <header class="dialog-header">
                        <h2>{title.clone()}</h2>
                        <button type="button" class="dialog-close" on:click=move |_| open.set(false)>"×"</button>
                    </header>
                    {description.clone().map(|d| view! { <p class="dialog-description">{d}</p> })}
                    {children()}
                </div>
            </div>
        </Show>
    }
}

/// Multi-step dialog: one form per step, payloads merged on the last step.
///
/// The forms outlive step changes, so going back shows what was entered.
#[component]
pub fn WizardDialog(
    open: RwSignal<bool>,
    #[prop(into)] title: String,
    wizard: RwSignal<WizardState>,
    forms: Vec<RwSignal<FormState>>,
    #[prop(into)] on_complete: Callback<Map<String, Value>>,
    #[prop(into, default = Signal::stored(false))] pending: Signal<bool>,
) -> impl IntoView {
    if forms.len() != wizard.with_untracked(|w| w.steps().len()) {
        log::error!("[wizard] {} forms for {} steps", forms.len(), wizard.with_untracked(|w| w.steps().len()));
    }
    let forms = StoredValue::new(forms);
    let current_form = move || {
        let idx = wizard.with(WizardState::current);
        forms.with_value(|f| f.get(idx).copied())
    };

    let on_next = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if pending.get_untracked() {
            return;
        }
        let idx = wizard.with_untracked(WizardState::current);
        let Some(form) = forms.with_value(|f| f.get(idx).copied()) else {
            return;
        };
        let mut state = wizard.get_untracked();
        let mut outcome = None;
        form.update(|f| outcome = Some(state.advance(f)));
        wizard.set(state);
        match outcome {
            Some(StepOutcome::Complete(payload)) => on_complete.run(payload),
            Some(StepOutcome::Blocked(errors)) => log::debug!("[wizard] step {idx} blocked by {} error(s)", errors.len()),
            _ => {}
        }
    };

    view! {
        <Dialog open=open title=title>
            <ol class="wizard-steps">
                {move || wizard.with(|w| {
                    let current = w.current();
                    w.steps()
                        .iter()
                        .enumerate()
                        .map(|(i, step)| {
                            let title = step.title.clone();
                            view! {
                                <li class:active={i == current} class:done={i < current}>
                                    <span class="wizard-step-index">{i + 1}</span>
                                    {title}
                                </li>
                            }
                        })
                        .collect_view()
                })}
            </ol>
            <form class="forge-form" on:submit=on_next novalidate=true>
                {move || current_form().map(|form| {
                    form.with_untracked(|f| f.fields().iter().map(|d| d.name.clone()).collect::<Vec<_>>())
                        .into_iter()
                        .map(|name| view! { <ForgeField form=form path=name /> })
                        .collect_view()
                })}
                <div class="forge-actions">
                    <button
                        type="button"
                        disabled=move || wizard.with(WizardState::is_first)
                        on:click=move |_| {
                            wizard.update(|w| {
                                w.back();
                            });
                        }
                    >
                        "Back"
                    </button>
                    <button type="submit" class="primary" disabled=move || pending.get()>
                        {move || match (wizard.with(WizardState::is_last), pending.get()) {
                            (true, true) => "Saving...",
                            (true, false) => "Submit",
                            _ => "Next",
                        }}
                    </button>
                </div>
            </form>
        </Dialog>
    }
}
