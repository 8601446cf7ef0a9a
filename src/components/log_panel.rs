//! Log Panel Component
//!
//! Collapsible view of the most recent log records kept by the rolling
//! logger. Useful on devices without developer tools.

use leptos::prelude::*;

#[component]
pub fn LogPanel() -> impl IntoView {
    let (expanded, set_expanded) = signal(false);
    let (entries, set_entries) = signal(Vec::<String>::new());

    let refresh = move || set_entries.set(rolling_logger::recent().iter().rev().map(ToString::to_string).collect());

    view! {
        <footer class="log-panel">
            <button
                type="button"
                class="log-toggle"
                on:click=move |_| {
                    if !expanded.get_untracked() {
                        refresh();
                    }
                    set_expanded.update(|v| *v = !*v);
                }
            >
                {move || if expanded.get() { "Hide log" } else { "Show log" }}
            </button>
            <Show when=move || expanded.get()>
                <div class="log-actions">
                    <button type="button" on:click=move |_| refresh()>"Refresh"</button>
                    <button
                        type="button"
                        on:click=move |_| {
                            rolling_logger::clear();
                            set_entries.set(Vec::new());
                        }
                    >
                        "Clear"
                    </button>
                </div>
                <pre class="log-lines">
                    {move || entries.get().join("\n")}
                </pre>
            </Show>
        </footer>
    }
}
