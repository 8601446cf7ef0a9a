//! Field Renderer
//!
//! Turns a field descriptor into a bound input. Value and error state are read
//! from the form signal, so option lists of dependent selects recompute as
//! soon as a watched field changes.

use leptos::prelude::*;
use serde_json::Value;

use crate::field::FieldKind;
use crate::form::FormState;

/// Bound input for the field at `path` (`name` or `group.2.name`)
#[component]
pub fn ForgeField(form: RwSignal<FormState>, #[prop(into)] path: String) -> AnyView {
    let descriptor = form.with_untracked(|f| f.descriptor(&path).cloned());
    if descriptor.is_none() {
        log::warn!("[forge] no descriptor for field {path}");
    }
    let path = StoredValue::new(path);

    descriptor.map(|descriptor| {
        if descriptor.is_group() {
            return view! { <ForgeFieldArray form=form path=path.get_value() /> }.into_any();
        }

        let id = path.get_value().replace('.', "-");
        let error = move || path.with_value(|p| form.with(|f| f.error(p).map(str::to_owned)));
        let text = move || path.with_value(|p| form.with(|f| f.text(p)));
        let write_text = move |raw: String| {
            path.with_value(|p| {
                form.update(|f| {
                    f.set_value(p, Value::String(raw));
                })
            })
        };
        let placeholder = descriptor.placeholder.clone().unwrap_or_default();
        let disabled = descriptor.disabled;

        let control = match descriptor.kind {
            FieldKind::TextArea => view! {
                <textarea
                    id=id.clone()
                    placeholder=placeholder
                    disabled=disabled
                    prop:value=text
                    on:input=move |ev| write_text(event_target_value(&ev))
                ></textarea>
            }
            .into_any(),
            FieldKind::Select => {
                let placeholder = if placeholder.is_empty() { format!("Select {}", descriptor.label.to_lowercase()) } else { placeholder };
                view! {
                    <select
                        id=id.clone()
                        disabled=disabled
                        on:change=move |ev| write_text(event_target_value(&ev))
                    >
                        <option value="">{placeholder}</option>
                        {move || {
                            let current = text();
                            path.with_value(|p| form.with(|f| f.options(p)))
                                .into_iter()
                                .map(|opt| {
                                    let selected = opt.value == current;
                                    view! { <option value=opt.value prop:selected=selected>{opt.label}</option> }
                                })
                                .collect_view()
                        }}
                    </select>
                }
                .into_any()
            }
            FieldKind::Checkbox => view! {
                <input
                    id=id.clone()
                    type="checkbox"
                    disabled=disabled
                    prop:checked=move || path.with_value(|p| form.with(|f| f.checked(p)))
                    on:change=move |ev| {
                        let checked = event_target_checked(&ev);
                        path.with_value(|p| form.update(|f| {
                            f.set_value(p, Value::Bool(checked));
                        }));
                    }
                />
            }
            .into_any(),
            ref kind => {
                let input_type = kind.input_type();
                view! {
                    <input
                        id=id.clone()
                        type=input_type
                        placeholder=placeholder
                        disabled=disabled
                        prop:value=text
                        on:input=move |ev| write_text(event_target_value(&ev))
                    />
                }
                .into_any()
            }
        };

        view! {
            <div class="forge-field" class:has-error=move || error().is_some()>
                <label for=id>{descriptor.label.clone()}</label>
                {control}
                {descriptor.description.clone().map(|d| view! { <p class="forge-description">{d}</p> })}
                {move || error().map(|e| view! { <p class="forge-error">{e}</p> })}
            </div>
        }
        .into_any()
    })
    .unwrap_or_else(|| ().into_any())
}

/// Repeating group with add/remove controls
#[component]
pub fn ForgeFieldArray(form: RwSignal<FormState>, #[prop(into)] path: String) -> AnyView {
    let descriptor = form.with_untracked(|f| f.descriptor(&path).cloned());
    let path = StoredValue::new(path);

    descriptor.map(|descriptor| {
        let sub_fields = StoredValue::new(
            descriptor.group_fields().iter().map(|f| f.name.clone()).collect::<Vec<_>>(),
        );
        // Rows re-render only when the count changes, not on every keystroke
        let row_count = Memo::new(move |_| path.with_value(|p| form.with(|f| f.row_count(p))));
        let error = move || path.with_value(|p| form.with(|f| f.error(p).map(str::to_owned)));
        let label = descriptor.label.clone();

        view! {
            <fieldset class="forge-array">
                <legend>{label.clone()}</legend>
                {move || {
                    (0..row_count.get())
                        .map(|idx| {
                            let group = path.get_value();
                            view! {
                                <div class="forge-array-row">
                                    {sub_fields
                                        .get_value()
                                        .into_iter()
                                        .map(|name| view! { <ForgeField form=form path=format!("{group}.{idx}.{name}") /> })
                                        .collect_view()}
                                    <button
                                        type="button"
                                        class="forge-array-remove"
                                        on:click=move |_| path.with_value(|p| form.update(|f| {
                                            f.remove(p, idx);
                                        }))
                                    >
                                        "Remove"
                                    </button>
                                </div>
                            }
                        })
                        .collect_view()
                }}
                <button
                    type="button"
                    class="forge-array-add"
                    on:click=move |_| path.with_value(|p| form.update(|f| f.append(p, None)))
                >
                    {format!("Add {}", label.to_lowercase())}
                </button>
                {move || error().map(|e| view! { <p class="forge-error">{e}</p> })}
            </fieldset>
        }
        .into_any()
    })
    .unwrap_or_else(|| ().into_any())
}
