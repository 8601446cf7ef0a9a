//! Data Table Component

use leptos::prelude::*;

use crate::components::ConfirmButton;
use crate::table::{
    compute_view, ColumnDef, PaginationState, RowSelection, SortDirection, SortState, TableBody, TableOptions,
};

/// Per-row button rendered in the trailing actions column
pub struct RowAction<T: 'static> {
    pub label: String,
    /// Ask for confirmation before running
    pub confirm: bool,
    pub on_run: Callback<T>,
}

impl<T: 'static> Clone for RowAction<T> {
    fn clone(&self) -> Self {
        Self { label: self.label.clone(), confirm: self.confirm, on_run: self.on_run }
    }
}

impl<T: 'static> RowAction<T> {
    pub fn new(label: impl Into<String>, on_run: impl Fn(T) + Send + Sync + 'static) -> Self {
        Self { label: label.into(), confirm: false, on_run: Callback::new(on_run) }
    }

    pub fn confirmed(label: impl Into<String>, on_run: impl Fn(T) + Send + Sync + 'static) -> Self {
        Self { confirm: true, ..Self::new(label, on_run) }
    }
}

#[derive(Clone, Debug, PartialEq)]
struct PageSummary {
    indices: Vec<usize>,
    total: usize,
    page_count: usize,
    page_index: usize,
}

/// Generic table bound to column descriptors and a row signal.
///
/// `pagination` doubles as the setter: screens with server paging watch it
/// and refetch when it changes.
#[component]
pub fn DataTable<T>(
    columns: Vec<ColumnDef<T>>,
    #[prop(into)] rows: Signal<Vec<T>>,
    #[prop(into, default = Signal::stored(TableOptions::default()))] options: Signal<TableOptions>,
    #[prop(optional)] pagination: Option<RwSignal<PaginationState>>,
    #[prop(optional)] row_actions: Vec<RowAction<T>>,
    #[prop(into, optional)] filter_placeholder: Option<String>,
) -> impl IntoView
where
    T: Clone + Send + Sync + 'static,
{
    let pagination = pagination.unwrap_or_else(|| RwSignal::new(PaginationState::default()));
    let sort = RwSignal::new(None::<SortState>);
    let filter = RwSignal::new(String::new());
    let selection = RwSignal::new(RowSelection::default());

    let has_actions = !row_actions.is_empty();
    let columns = StoredValue::new(columns);
    let row_actions = StoredValue::new(row_actions);

    let selectable = move || !options.with(|o| o.disable_selection);
    let col_span = move || {
        columns.with_value(Vec::len) + usize::from(selectable()) + usize::from(has_actions)
    };

    let summary = Memo::new(move |_| {
        let opts = options.get();
        let pag = pagination.get();
        let sort_state = sort.get();
        let needle = filter.get();
        rows.with(|data| {
            columns.with_value(|cols| {
                let view = compute_view(cols, data, &opts, &pag, sort_state.as_ref(), &needle);
                let indices = match &view.body {
                    TableBody::Rows(visible) => visible.iter().map(|(i, _)| *i).collect(),
                    _ => Vec::new(),
                };
                PageSummary { indices, total: view.total, page_count: view.page_count, page_index: view.page_index }
            })
        })
    });

    // Typing a filter starts from the first page
    let on_filter = move |ev: web_sys::Event| {
        filter.set(event_target_value(&ev));
        pagination.update(|p| p.page_index = 0);
    };

    let header = move || {
        columns.with_value(|cols| {
            cols.iter()
                .map(|col| {
                    let id = col.id.clone();
                    let header = col.header.clone();
                    if !col.is_sortable() {
                        return view! { <th>{header}</th> }.into_any();
                    }
                    let indicator_id = id.clone();
                    let indicator = move || match sort.get() {
                        Some(s) if s.column == indicator_id => match s.direction {
                            SortDirection::Asc => " ▲",
                            SortDirection::Desc => " ▼",
                        },
                        _ => "",
                    };
                    view! {
                        <th class="sortable" on:click=move |_| sort.update(|s| *s = SortState::toggle(s.take(), &id))>
                            {header}
                            <span class="sort-indicator">{indicator}</span>
                        </th>
                    }
                    .into_any()
                })
                .collect_view()
        })
    };

    let body = move || {
        let opts = options.get();
        let pag = pagination.get();
        let sort_state = sort.get();
        let needle = filter.get();
        let span = col_span();
        rows.with(|data| {
            columns.with_value(|cols| {
                match compute_view(cols, data, &opts, &pag, sort_state.as_ref(), &needle).body {
                    TableBody::Skeleton(count) => (0..count)
                        .map(|_| {
                            view! {
                                <tr class="skeleton-row">
                                    {(0..span).map(|_| view! { <td><div class="skeleton"></div></td> }).collect_view()}
                                </tr>
                            }
                        })
                        .collect_view()
                        .into_any(),
                    TableBody::Empty => view! {
                        <tr>
                            <td class="no-results" colspan=span.to_string()>"No results."</td>
                        </tr>
                    }
                    .into_any(),
                    TableBody::Rows(visible) => visible
                        .into_iter()
                        .map(|(idx, row)| {
                            let cells = cols.iter().map(|c| view! { <td>{c.render(row)}</td> }).collect_view();
                            let row = row.clone();
                            view! {
                                <tr class:selected=move || selection.with(|s| s.is_selected(idx))>
                                    {(!opts.disable_selection).then(|| view! {
                                        <td class="select-cell">
                                            <input
                                                type="checkbox"
                                                prop:checked=move || selection.with(|s| s.is_selected(idx))
                                                on:change=move |_| selection.update(|s| s.toggle(idx))
                                            />
                                        </td>
                                    })}
                                    {cells}
                                    {has_actions.then(|| view! {
                                        <td class="row-actions">{render_actions(row_actions.get_value(), row)}</td>
                                    })}
                                </tr>
                            }
                        })
                        .collect_view()
                        .into_any(),
                }
            })
        })
    };

    view! {
        <div class="data-table">
            {(filter_placeholder.is_some() && !options.with_untracked(|o| o.manual_pagination)).then(|| view! {
                <input
                    class="table-filter"
                    type="search"
                    placeholder=filter_placeholder.clone().unwrap_or_default()
                    prop:value=move || filter.get()
                    on:input=on_filter
                />
            })}
            <table>
                <thead>
                    <tr>
                        {move || selectable().then(|| view! {
                            <th class="select-cell">
                                <input
                                    type="checkbox"
                                    prop:checked=move || summary.with(|p| selection.with(|s| s.all_selected(&p.indices)))
                                    on:change=move |_| {
                                        let page = summary.with_untracked(|p| p.indices.clone());
                                        selection.update(|s| s.toggle_page(&page));
                                    }
                                />
                            </th>
                        })}
                        {header}
                        {has_actions.then(|| view! { <th class="row-actions">"Actions"</th> })}
                    </tr>
                </thead>
                <tbody>{body}</tbody>
            </table>
            <Show when=move || !options.with(|o| o.disable_pagination)>
                <div class="table-pager">
                    <span class="table-count">
                        {move || {
                            let selected = selection.with(RowSelection::len);
                            let total = summary.with(|p| p.total);
                            if selected > 0 {
                                format!("{selected} of {total} row(s) selected")
                            } else {
                                format!("{total} row(s)")
                            }
                        }}
                    </span>
                    <button
                        type="button"
                        disabled=move || !pagination.with(PaginationState::can_previous)
                        on:click=move |_| pagination.update(PaginationState::previous)
                    >
                        "Previous"
                    </button>
                    <span class="table-page">
                        {move || summary.with(|p| format!("Page {} of {}", p.page_index + 1, p.page_count))}
                    </span>
                    <button
                        type="button"
                        disabled=move || {
                            let total = summary.with(|p| p.total);
                            !pagination.with(|p| p.can_next(total))
                        }
                        on:click=move |_| {
                            let total = summary.with_untracked(|p| p.total);
                            pagination.update(|p| p.next(total));
                        }
                    >
                        "Next"
                    </button>
                </div>
            </Show>
        </div>
    }
}

fn render_actions<T: Clone + Send + Sync + 'static>(actions: Vec<RowAction<T>>, row: T) -> impl IntoView {
    actions
        .into_iter()
        .map(|action| {
            let row = row.clone();
            let run = action.on_run;
            if action.confirm {
                view! {
                    <ConfirmButton
                        label=action.label
                        button_class="row-action danger"
                        on_confirm=Callback::new(move |_| run.run(row.clone()))
                    />
                }
                .into_any()
            } else {
                view! {
                    <button type="button" class="row-action" on:click=move |_| run.run(row.clone())>
                        {action.label}
                    </button>
                }
                .into_any()
            }
        })
        .collect_view()
}
