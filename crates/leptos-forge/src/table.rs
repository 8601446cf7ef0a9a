//! Data Table Model
//!
//! Column descriptors, pagination, sorting, filtering and selection for the
//! generic table. [`compute_view`] decides what the body shows: skeleton
//! rows while loading, a single empty row, or the visible data rows.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Comparable key extracted from a row for sorting
#[derive(Clone, Debug, PartialEq)]
pub enum SortKey {
    Text(String),
    Number(f64),
}

impl SortKey {
    fn compare(&self, other: &SortKey) -> Ordering {
        match (self, other) {
            (SortKey::Number(a), SortKey::Number(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
            (SortKey::Text(a), SortKey::Text(b)) => a.to_lowercase().cmp(&b.to_lowercase()),
            (SortKey::Number(_), SortKey::Text(_)) => Ordering::Less,
            (SortKey::Text(_), SortKey::Number(_)) => Ordering::Greater,
        }
    }
}

type CellFn<T> = Arc<dyn Fn(&T) -> String + Send + Sync>;
type SortFn<T> = Arc<dyn Fn(&T) -> SortKey + Send + Sync>;

/// Column descriptor: header plus how to read a cell from a row
pub struct ColumnDef<T> {
    pub id: String,
    pub header: String,
    cell: CellFn<T>,
    sort_key: Option<SortFn<T>>,
}

impl<T> Clone for ColumnDef<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            header: self.header.clone(),
            cell: self.cell.clone(),
            sort_key: self.sort_key.clone(),
        }
    }
}

impl<T> ColumnDef<T> {
    pub fn new<F>(id: impl Into<String>, header: impl Into<String>, cell: F) -> Self
    where
        F: Fn(&T) -> String + Send + Sync + 'static,
    {
        Self {
            id: id.into(),
            header: header.into(),
            cell: Arc::new(cell),
            sort_key: None,
        }
    }

    /// Sort by the rendered cell text
    pub fn sortable(mut self) -> Self
    where
        T: 'static,
    {
        let cell = self.cell.clone();
        self.sort_key = Some(Arc::new(move |row| SortKey::Text(cell(row))));
        self
    }

    /// Sort numerically by `key`
    pub fn sort_by_number<F>(mut self, key: F) -> Self
    where
        F: Fn(&T) -> f64 + Send + Sync + 'static,
    {
        self.sort_key = Some(Arc::new(move |row| SortKey::Number(key(row))));
        self
    }

    pub fn is_sortable(&self) -> bool {
        self.sort_key.is_some()
    }

    pub fn render(&self, row: &T) -> String {
        (self.cell)(row)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SortState {
    pub column: String,
    pub direction: SortDirection,
}

impl SortState {
    /// Header click cycle: ascending, descending, unsorted
    pub fn toggle(current: Option<SortState>, column: &str) -> Option<SortState> {
        match current {
            Some(s) if s.column == column && s.direction == SortDirection::Asc => Some(SortState {
                column: column.to_string(),
                direction: SortDirection::Desc,
            }),
            Some(s) if s.column == column => None,
            _ => Some(SortState { column: column.to_string(), direction: SortDirection::Asc }),
        }
    }
}

pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PaginationState {
    pub page_index: usize,
    pub page_size: usize,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self { page_index: 0, page_size: DEFAULT_PAGE_SIZE }
    }
}

impl PaginationState {
    pub fn new(page_size: usize) -> Self {
        Self { page_index: 0, page_size: page_size.max(1) }
    }

    /// Number of pages for `total` rows, never less than one
    pub fn page_count(&self, total: usize) -> usize {
        total.div_ceil(self.page_size.max(1)).max(1)
    }

    pub fn can_previous(&self) -> bool {
        self.page_index > 0
    }

    pub fn can_next(&self, total: usize) -> bool {
        self.page_index + 1 < self.page_count(total)
    }

    pub fn next(&mut self, total: usize) {
        if self.can_next(total) {
            self.page_index += 1;
        }
    }

    pub fn previous(&mut self) {
        self.page_index = self.page_index.saturating_sub(1);
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.page_index = 0;
    }

    /// First row offset, as sent to a paged backend
    pub fn offset(&self) -> usize {
        self.page_index * self.page_size
    }
}

/// Search term plus pagination for search-driven list screens
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchQuery {
    pub search: String,
    pub pagination: PaginationState,
}

impl SearchQuery {
    pub fn new(page_size: usize) -> Self {
        Self { search: String::new(), pagination: PaginationState::new(page_size) }
    }

    /// Change the term; a new term always starts from the first page
    pub fn set_search(&mut self, term: impl Into<String>) -> bool {
        let term = term.into();
        if term == self.search {
            return false;
        }
        self.search = term;
        self.pagination.page_index = 0;
        true
    }
}

/// Options bag passed by screens to the table
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TableOptions {
    pub is_loading: bool,
    /// Rows are already one server page; `total_count` drives the pager
    pub manual_pagination: bool,
    pub total_count: Option<usize>,
    pub disable_selection: bool,
    pub disable_pagination: bool,
    /// Placeholder rows while loading, defaults to the page size
    pub skeleton_rows: Option<usize>,
}

/// What the table body renders
#[derive(Debug, PartialEq)]
pub enum TableBody<'a, T> {
    Skeleton(usize),
    Empty,
    /// Visible rows with their index in the source slice
    Rows(Vec<(usize, &'a T)>),
}

impl<T> TableBody<'_, T> {
    /// Number of `<tr>` elements the body produces
    pub fn rendered_row_count(&self) -> usize {
        match self {
            TableBody::Skeleton(n) => *n,
            TableBody::Empty => 1,
            TableBody::Rows(rows) => rows.len(),
        }
    }
}

#[derive(Debug, PartialEq)]
pub struct TableView<'a, T> {
    pub body: TableBody<'a, T>,
    /// Rows across all pages after filtering
    pub total: usize,
    pub page_count: usize,
    /// Page actually shown, clamped into range
    pub page_index: usize,
}

/// Work out the visible body for the current options and view state
pub fn compute_view<'a, T>(
    columns: &[ColumnDef<T>],
    rows: &'a [T],
    options: &TableOptions,
    pagination: &PaginationState,
    sort: Option<&SortState>,
    filter: &str,
) -> TableView<'a, T> {
    if options.is_loading {
        let total = options.total_count.unwrap_or(0);
        return TableView {
            body: TableBody::Skeleton(options.skeleton_rows.unwrap_or(pagination.page_size)),
            total,
            page_count: pagination.page_count(total),
            page_index: pagination.page_index,
        };
    }

    let mut visible: Vec<(usize, &'a T)> = rows.iter().enumerate().collect();

    let needle = filter.trim().to_lowercase();
    if !options.manual_pagination && !needle.is_empty() {
        visible.retain(|(_, row)| columns.iter().any(|c| c.render(row).to_lowercase().contains(&needle)));
    }

    if let Some(sort) = sort {
        if let Some(key) = columns.iter().find(|c| c.id == sort.column).and_then(|c| c.sort_key.clone()) {
            visible.sort_by(|(_, a), (_, b)| {
                let ord = key(a).compare(&key(b));
                match sort.direction {
                    SortDirection::Asc => ord,
                    SortDirection::Desc => ord.reverse(),
                }
            });
        }
    }

    let (total, page_count, page_index) = if options.manual_pagination {
        let total = options.total_count.unwrap_or(visible.len());
        (total, pagination.page_count(total), pagination.page_index)
    } else if options.disable_pagination {
        (visible.len(), 1, 0)
    } else {
        let total = visible.len();
        let page_count = pagination.page_count(total);
        let page_index = pagination.page_index.min(page_count - 1);
        let start = page_index * pagination.page_size;
        visible = visible.into_iter().skip(start).take(pagination.page_size).collect();
        (total, page_count, page_index)
    };

    let body = if visible.is_empty() { TableBody::Empty } else { TableBody::Rows(visible) };
    TableView { body, total, page_count, page_index }
}

/// Selected rows by source index
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RowSelection(BTreeSet<usize>);

impl RowSelection {
    pub fn toggle(&mut self, index: usize) {
        if !self.0.remove(&index) {
            self.0.insert(index);
        }
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.0.contains(&index)
    }

    /// Select every index in `page`, or clear them all if already selected
    pub fn toggle_page(&mut self, page: &[usize]) {
        if self.all_selected(page) {
            for idx in page {
                self.0.remove(idx);
            }
        } else {
            self.0.extend(page.iter().copied());
        }
    }

    pub fn all_selected(&self, page: &[usize]) -> bool {
        !page.is_empty() && page.iter().all(|i| self.0.contains(i))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Row {
        name: &'static str,
        amount: f64,
    }

    fn columns() -> Vec<ColumnDef<Row>> {
        vec![
            ColumnDef::new("name", "Name", |r: &Row| r.name.to_string()).sortable(),
            ColumnDef::new("amount", "Amount", |r: &Row| format!("{:.2}", r.amount))
                .sort_by_number(|r: &Row| r.amount),
        ]
    }

    fn rows(n: usize) -> Vec<Row> {
        const NAMES: [&str; 5] = ["Chidi", "Amaka", "Bola", "Emeka", "Dayo"];
        (0..n).map(|i| Row { name: NAMES[i % 5], amount: (n - i) as f64 }).collect()
    }

    #[test]
    fn loading_renders_skeleton_rows_regardless_of_data() {
        let cols = columns();
        let pagination = PaginationState::new(10);
        for data in [rows(0), rows(3), rows(40)] {
            let options = TableOptions { is_loading: true, skeleton_rows: Some(6), ..Default::default() };
            let view = compute_view(&cols, &data, &options, &pagination, None, "");
            assert_eq!(view.body, TableBody::Skeleton(6));
            assert_eq!(view.body.rendered_row_count(), 6);
        }
    }

    #[test]
    fn skeleton_defaults_to_page_size() {
        let options = TableOptions { is_loading: true, ..Default::default() };
        let data = rows(2);
        let view = compute_view(&columns(), &data, &options, &PaginationState::new(5), None, "");
        assert_eq!(view.body.rendered_row_count(), 5);
    }

    #[test]
    fn empty_rows_render_single_placeholder() {
        let data: Vec<Row> = Vec::new();
        let view = compute_view(&columns(), &data, &TableOptions::default(), &PaginationState::default(), None, "");
        assert_eq!(view.body, TableBody::Empty);
        assert_eq!(view.body.rendered_row_count(), 1);
        assert_eq!(view.page_count, 1);
    }

    #[test]
    fn client_pagination_slices_pages() {
        let data = rows(23);
        let mut pagination = PaginationState::new(10);
        pagination.next(23);
        pagination.next(23);
        let view = compute_view(&columns(), &data, &TableOptions::default(), &pagination, None, "");
        assert_eq!(view.page_count, 3);
        assert_eq!(view.total, 23);
        assert_eq!(view.body.rendered_row_count(), 3);
        assert!(!pagination.can_next(23));
    }

    #[test]
    fn client_pagination_clamps_out_of_range_page() {
        let data = rows(4);
        let pagination = PaginationState { page_index: 7, page_size: 10 };
        let view = compute_view(&columns(), &data, &TableOptions::default(), &pagination, None, "");
        assert_eq!(view.page_index, 0);
        assert_eq!(view.body.rendered_row_count(), 4);
    }

    #[test]
    fn manual_pagination_shows_rows_as_given() {
        let data = rows(10);
        let options = TableOptions { manual_pagination: true, total_count: Some(95), ..Default::default() };
        let pagination = PaginationState { page_index: 4, page_size: 10 };
        let view = compute_view(&columns(), &data, &options, &pagination, None, "amaka");
        assert_eq!(view.body.rendered_row_count(), 10);
        assert_eq!(view.page_count, 10);
        assert_eq!(view.page_index, 4);
    }

    #[test]
    fn disable_pagination_shows_everything() {
        let data = rows(25);
        let options = TableOptions { disable_pagination: true, ..Default::default() };
        let view = compute_view(&columns(), &data, &options, &PaginationState::new(10), None, "");
        assert_eq!(view.body.rendered_row_count(), 25);
    }

    #[test]
    fn filter_matches_any_column_case_insensitive() {
        let data = rows(10);
        let view = compute_view(&columns(), &data, &TableOptions::default(), &PaginationState::default(), None, "BOLA");
        assert_eq!(view.total, 2);
    }

    #[test]
    fn numeric_sort_both_directions() {
        let data = rows(4);
        let cols = columns();
        let asc = SortState { column: "amount".into(), direction: SortDirection::Asc };
        let view = compute_view(&cols, &data, &TableOptions::default(), &PaginationState::default(), Some(&asc), "");
        let TableBody::Rows(visible) = view.body else { panic!("expected rows") };
        let amounts: Vec<f64> = visible.iter().map(|(_, r)| r.amount).collect();
        assert_eq!(amounts, vec![1.0, 2.0, 3.0, 4.0]);

        let desc = SortState { column: "name".into(), direction: SortDirection::Desc };
        let view = compute_view(&cols, &data, &TableOptions::default(), &PaginationState::default(), Some(&desc), "");
        let TableBody::Rows(visible) = view.body else { panic!("expected rows") };
        assert_eq!(visible[0].1.name, "Emeka");
    }

    #[test]
    fn sort_toggle_cycles() {
        let s = SortState::toggle(None, "name");
        assert_eq!(s.as_ref().map(|s| s.direction), Some(SortDirection::Asc));
        let s = SortState::toggle(s, "name");
        assert_eq!(s.as_ref().map(|s| s.direction), Some(SortDirection::Desc));
        assert_eq!(SortState::toggle(s, "name"), None);
    }

    #[test]
    fn new_search_term_resets_page_index() {
        let mut query = SearchQuery::new(10);
        query.pagination.page_index = 3;
        assert!(query.set_search("ade"));
        assert_eq!(query.pagination.page_index, 0);

        query.pagination.page_index = 2;
        assert!(!query.set_search("ade"));
        assert_eq!(query.pagination.page_index, 2);
    }

    #[test]
    fn page_size_change_returns_to_first_page() {
        let mut pagination = PaginationState { page_index: 4, page_size: 10 };
        pagination.set_page_size(25);
        assert_eq!(pagination, PaginationState { page_index: 0, page_size: 25 });
        assert_eq!(pagination.offset(), 0);
    }

    #[test]
    fn selection_toggle_page() {
        let mut selection = RowSelection::default();
        selection.toggle(1);
        selection.toggle_page(&[0, 1, 2]);
        assert!(selection.all_selected(&[0, 1, 2]));
        selection.toggle_page(&[0, 1, 2]);
        assert!(selection.is_empty());
    }
}
