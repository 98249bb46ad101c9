//! Filterable row model behind every list view
//!
//! Each item is projected into a row of cell strings when it is added. The
//! filter runs against those cached strings, never against the live item.

type Projection<T> = Box<dyn Fn(&T) -> String>;

struct Column<T> {
    label: String,
    projection: Projection<T>,
}

/// Items with their projected rows and the indices that pass the filter
pub struct SearchableTable<T> {
    columns: Vec<Column<T>>,
    items: Vec<T>,
    rows: Vec<Vec<String>>,
    filtered: Vec<usize>,
    filter: String,
}

impl<T> Default for SearchableTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for SearchableTable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchableTable")
            .field("columns", &self.columns())
            .field("rows", &self.rows.len())
            .field("visible", &self.filtered.len())
            .field("filter", &self.filter)
            .finish()
    }
}

impl<T> SearchableTable<T> {
    pub fn new() -> Self {
        Self {
            columns: Vec::new(),
            items: Vec::new(),
            rows: Vec::new(),
            filtered: Vec::new(),
            filter: String::new(),
        }
    }

    /// Append a column; rows that already exist are not extended
    pub fn add_column(
        &mut self,
        label: impl Into<String>,
        projection: impl Fn(&T) -> String + 'static,
    ) {
        self.columns.push(Column {
            label: label.into(),
            projection: Box::new(projection),
        });
    }

    /// Add an item, checking only its own row against the active filter
    pub fn add(&mut self, item: T) {
        let row: Vec<String> = self
            .columns
            .iter()
            .map(|column| (column.projection)(&item))
            .collect();

        if matches_any(&self.filter, &row) {
            self.filtered.push(self.rows.len());
        }
        self.items.push(item);
        self.rows.push(row);
    }

    pub fn add_all(&mut self, items: impl IntoIterator<Item = T>) {
        for item in items {
            self.add(item);
        }
    }

    /// Replace the filter and re-scan every row
    pub fn set_filter(&mut self, term: &str) {
        self.filter = term.to_string();
        self.filtered = self
            .rows
            .iter()
            .enumerate()
            .filter(|(_, row)| matches_any(&self.filter, row))
            .map(|(idx, _)| idx)
            .collect();
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// Column labels in display order
    pub fn columns(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.label.as_str()).collect()
    }

    /// Visible rows in insertion order
    pub fn rows(&self) -> Vec<&[String]> {
        self.filtered
            .iter()
            .map(|&idx| self.rows[idx].as_slice())
            .collect()
    }

    /// Item behind the `index`-th visible row
    pub fn get_row_item(&self, index: usize) -> Option<&T> {
        self.filtered.get(index).map(|&idx| &self.items[idx])
    }

    /// Drop every item, row and the filter; columns are kept
    pub fn clear(&mut self) {
        self.items.clear();
        self.rows.clear();
        self.filtered.clear();
        self.filter.clear();
    }

    /// Total number of items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Number of rows passing the filter
    pub fn visible_len(&self) -> usize {
        self.filtered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

fn matches_any(term: &str, row: &[String]) -> bool {
    if term.is_empty() {
        return true;
    }
    let needle = term.to_lowercase();
    row.iter().any(|cell| cell.to_lowercase().contains(&needle))
}
