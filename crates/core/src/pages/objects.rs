//! Object listing below one prefix of a bucket

use std::collections::VecDeque;
use std::rc::Rc;

use crate::context::Context;
use crate::editor::Editor;
use crate::error::{Error, Result};
use crate::format::{format_size, format_time};
use crate::nav::key::{KeyCode, KeyEvent};
use crate::nav::list_page::ListPage;
use crate::nav::modal::{confirm_modal, form_modal};
use crate::nav::page::{
    EventResult, Hotkey, HotkeyInfo, PageContent, PageView, describe_hotkeys, dispatch_hotkey,
};
use crate::object::{DELIMITER, ObjectEntry};
use crate::pages::object::ObjectPage;
use crate::paginator::collect_pages;
use crate::tree::ObjectKeyTree;

const HOTKEYS: &[Hotkey<ObjectsPage>] = &[
    Hotkey {
        chord: KeyEvent::char('n'),
        title: "New Object",
        run: ObjectsPage::new_object,
    },
    Hotkey {
        chord: KeyEvent::char('v'),
        title: "View Object",
        run: ObjectsPage::view_object,
    },
    Hotkey {
        chord: KeyEvent::char('e'),
        title: "Edit Object",
        run: ObjectsPage::edit_object,
    },
    Hotkey {
        chord: KeyEvent::char('d'),
        title: "Delete Object",
        run: ObjectsPage::delete_object,
    },
    Hotkey {
        chord: KeyEvent::char('r'),
        title: "Toggle Recursive",
        run: ObjectsPage::toggle_recursive,
    },
];

/// A listing row: the name relative to the page prefix and its entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectRow {
    pub name: String,
    pub entry: ObjectEntry,
}

pub struct ObjectsPage {
    ctx: Context,
    editor: Rc<Editor>,
    recursive: bool,
    list: ListPage<ObjectRow>,
}

impl ObjectsPage {
    /// Page for the bucket and prefix of `ctx`
    pub fn new(ctx: Context, editor: Rc<Editor>) -> Self {
        let mut list = ListPage::new();
        list.add_column("Name", |row: &ObjectRow| row.name.clone());
        list.add_column("Size", |row: &ObjectRow| {
            row.entry
                .as_file()
                .map(|file| format_size(file.size))
                .unwrap_or_default()
        });
        list.add_column("Last Modified", |row: &ObjectRow| match row.entry.as_file() {
            Some(file) => format_time(file.last_modified),
            None => String::new(),
        });
        Self {
            ctx,
            editor,
            recursive: false,
            list,
        }
    }

    fn prefix(&self) -> &str {
        self.ctx.object_key()
    }

    pub fn is_recursive(&self) -> bool {
        self.recursive
    }

    fn selected_file(&self, action: &str) -> Result<Option<String>> {
        match self.list.selected() {
            Some(ObjectRow {
                entry: ObjectEntry::File(file),
                ..
            }) => Ok(Some(file.key.clone())),
            Some(_) => Err(Error::Validation(format!("cannot {action} a directory"))),
            None => Ok(None),
        }
    }

    fn new_object(&mut self) -> Result<()> {
        let ctx = self.ctx.clone();
        let editor = Rc::clone(&self.editor);
        self.ctx.modal(form_modal(
            "New Object",
            &["Name"],
            "Create",
            move |values| {
                let name = values.get("Name").map(String::as_str).unwrap_or_default();
                match editor.create_object(&ctx, name) {
                    Ok(true) => ctx.reload(),
                    Ok(false) => {}
                    Err(err) => ctx.set_error(err),
                }
            },
        ));
        Ok(())
    }

    fn view_object(&mut self) -> Result<()> {
        if let Some(key) = self.selected_file("view")? {
            self.editor.view_object(&self.ctx.with_object_key(key))?;
        }
        Ok(())
    }

    fn edit_object(&mut self) -> Result<()> {
        if let Some(key) = self.selected_file("edit")? {
            if self.editor.edit_object(&self.ctx.with_object_key(key))? {
                self.load()?;
            }
        }
        Ok(())
    }

    fn delete_object(&mut self) -> Result<()> {
        let Some(key) = self.selected_file("delete")? else {
            return Ok(());
        };
        let ctx = self.ctx.clone();
        let client = ctx.client()?;
        self.ctx.modal(confirm_modal(
            format!("Delete object '{key}'?"),
            move || match client.delete_object(ctx.bucket(), &key) {
                Ok(()) => {
                    tracing::info!(bucket = ctx.bucket(), key = %key, "deleted object");
                    ctx.reload();
                }
                Err(err) => ctx.set_error(err),
            },
        ));
        Ok(())
    }

    fn toggle_recursive(&mut self) -> Result<()> {
        self.recursive = !self.recursive;
        tracing::debug!(recursive = self.recursive, "toggled recursive listing");
        self.load()
    }

    fn open_selected(&self) {
        let Some(row) = self.list.selected() else {
            return;
        };
        let ctx = self.ctx.with_object_key(row.entry.key());
        let editor = Rc::clone(&self.editor);
        match &row.entry {
            ObjectEntry::Directory { .. } => {
                let mut page = ObjectsPage::new(ctx, editor);
                page.recursive = self.recursive;
                self.ctx.open_page(Box::new(page));
            }
            ObjectEntry::File(_) => self.ctx.open_page(Box::new(ObjectPage::new(ctx, editor))),
        }
    }

    /// Every entry below the prefix, walking sub-prefixes breadth first
    fn list_recursive(&self) -> Result<Vec<ObjectEntry>> {
        let client = self.ctx.client()?;
        let mut files = Vec::new();
        let mut pending = VecDeque::from([self.prefix().to_string()]);
        while let Some(prefix) = pending.pop_front() {
            let mut paginator = client.list_objects(self.ctx.bucket(), &prefix);
            for entry in collect_pages(paginator.as_mut())? {
                match entry {
                    ObjectEntry::Directory { key } => pending.push_back(key),
                    file => files.push(file),
                }
            }
        }
        Ok(files)
    }

    fn build_rows(&self, entries: Vec<ObjectEntry>) -> Vec<ObjectRow> {
        let prefix = self.prefix();
        let mut tree = ObjectKeyTree::new();
        for entry in entries {
            let name = entry
                .key()
                .strip_prefix(prefix)
                .unwrap_or(entry.key())
                .to_string();
            tree.add_object(&name, entry);
        }
        tree.list_root_items()
            .into_iter()
            .map(|item| {
                // folder rows may carry a zero-byte marker object as their item
                let entry = match item.item {
                    Some(entry) if !item.name.ends_with(DELIMITER) => entry.clone(),
                    _ => ObjectEntry::directory(format!("{prefix}{}", item.name)),
                };
                ObjectRow {
                    name: item.name,
                    entry,
                }
            })
            .collect()
    }
}

impl PageContent for ObjectsPage {
    fn title(&self) -> String {
        match self.prefix() {
            "" => format!("Objects in {}", self.ctx.bucket()),
            prefix => format!("Objects in {} - {}", self.ctx.bucket(), prefix),
        }
    }

    fn hotkeys(&self) -> Vec<HotkeyInfo> {
        describe_hotkeys(HOTKEYS)
    }

    fn run_hotkey(&mut self, key: &KeyEvent) -> Result<EventResult> {
        dispatch_hotkey(HOTKEYS, self, key)
    }

    fn set_search(&mut self, term: &str) {
        self.list.set_search(term);
    }

    fn view(&self) -> PageView {
        self.list.view()
    }

    fn load(&mut self) -> Result<()> {
        let entries = if self.recursive {
            self.list_recursive()?
        } else {
            let client = self.ctx.client()?;
            let mut paginator = client.list_objects(self.ctx.bucket(), self.prefix());
            collect_pages(paginator.as_mut())?
        };
        tracing::debug!(
            bucket = self.ctx.bucket(),
            prefix = self.prefix(),
            count = entries.len(),
            "listed objects"
        );
        let rows = self.build_rows(entries);
        self.list.replace_all(rows);
        Ok(())
    }

    fn context(&self) -> &Context {
        &self.ctx
    }

    fn handle_key(&mut self, key: &KeyEvent) -> Result<EventResult> {
        if self.list.move_cursor(key) {
            return Ok(EventResult::Consumed);
        }
        if key.code == KeyCode::Enter {
            self.open_selected();
            return Ok(EventResult::Consumed);
        }
        Ok(EventResult::Ignored)
    }
}
