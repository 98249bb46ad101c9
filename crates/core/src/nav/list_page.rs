//! Table with a selection cursor, shared by every list page

use crate::nav::key::{KeyCode, KeyEvent};
use crate::nav::page::PageView;
use crate::table::SearchableTable;

const PAGE_STEP: usize = 10;

/// A [`SearchableTable`] plus the selected visible row
#[derive(Debug)]
pub struct ListPage<T> {
    table: SearchableTable<T>,
    selected: usize,
}

impl<T> ListPage<T> {
    pub fn new() -> Self {
        Self {
            table: SearchableTable::new(),
            selected: 0,
        }
    }

    pub fn add_column(
        &mut self,
        label: impl Into<String>,
        projection: impl Fn(&T) -> String + 'static,
    ) {
        self.table.add_column(label, projection);
    }

    pub fn add(&mut self, item: T) {
        self.table.add(item);
    }

    pub fn add_all(&mut self, items: impl IntoIterator<Item = T>) {
        self.table.add_all(items);
    }

    /// Swap the rows for `items`, keeping the current search term
    pub fn replace_all(&mut self, items: impl IntoIterator<Item = T>) {
        let filter = self.table.filter().to_string();
        self.table.clear();
        self.table.set_filter(&filter);
        self.table.add_all(items);
        self.clamp_selection();
    }

    pub fn set_search(&mut self, term: &str) {
        self.table.set_filter(term);
        self.selected = 0;
    }

    pub fn table(&self) -> &SearchableTable<T> {
        &self.table
    }

    pub fn selected_index(&self) -> Option<usize> {
        let visible = self.table.visible_len();
        (self.selected < visible).then_some(self.selected)
    }

    /// The item under the cursor
    pub fn selected(&self) -> Option<&T> {
        self.table.get_row_item(self.selected)
    }

    pub fn select(&mut self, index: usize) {
        self.selected = index;
        self.clamp_selection();
    }

    /// Move the cursor; returns whether the key was a movement key
    pub fn move_cursor(&mut self, key: &KeyEvent) -> bool {
        let last = self.table.visible_len().saturating_sub(1);
        self.selected = match key.code {
            KeyCode::Up => self.selected.saturating_sub(1),
            KeyCode::Down => (self.selected + 1).min(last),
            KeyCode::PageUp => self.selected.saturating_sub(PAGE_STEP),
            KeyCode::PageDown => (self.selected + PAGE_STEP).min(last),
            KeyCode::Home => 0,
            KeyCode::End => last,
            _ => return false,
        };
        true
    }

    pub fn view(&self) -> PageView {
        PageView {
            columns: self
                .table
                .columns()
                .into_iter()
                .map(str::to_string)
                .collect(),
            rows: self
                .table
                .rows()
                .into_iter()
                .map(<[String]>::to_vec)
                .collect(),
            selected: self.selected_index(),
        }
    }

    fn clamp_selection(&mut self) {
        let last = self.table.visible_len().saturating_sub(1);
        self.selected = self.selected.min(last);
    }
}
