//! Metadata of a single object

use std::rc::Rc;

use crate::context::Context;
use crate::editor::Editor;
use crate::error::Result;
use crate::format::{format_size, format_time};
use crate::nav::key::KeyEvent;
use crate::nav::list_page::ListPage;
use crate::nav::page::{
    EventResult, Hotkey, HotkeyInfo, PageContent, PageView, describe_hotkeys, dispatch_hotkey,
};
use crate::object::{DELIMITER, ObjectMetadata};

const HOTKEYS: &[Hotkey<ObjectPage>] = &[
    Hotkey {
        chord: KeyEvent::char('v'),
        title: "View Object",
        run: ObjectPage::view_object,
    },
    Hotkey {
        chord: KeyEvent::char('e'),
        title: "Edit Object",
        run: ObjectPage::edit_object,
    },
];

type Property = (String, String);

pub struct ObjectPage {
    ctx: Context,
    editor: Rc<Editor>,
    list: ListPage<Property>,
}

impl ObjectPage {
    /// Page for the object named by the key of `ctx`
    pub fn new(ctx: Context, editor: Rc<Editor>) -> Self {
        let mut list = ListPage::new();
        list.add_column("Property", |(name, _): &Property| name.clone());
        list.add_column("Value", |(_, value): &Property| value.clone());
        Self { ctx, editor, list }
    }

    fn view_object(&mut self) -> Result<()> {
        self.editor.view_object(&self.ctx)
    }

    fn edit_object(&mut self) -> Result<()> {
        if self.editor.edit_object(&self.ctx)? {
            self.load()?;
        }
        Ok(())
    }
}

/// Rows shown for an object; absent values are skipped
fn properties(meta: ObjectMetadata) -> Vec<Property> {
    let name = meta
        .key
        .trim_end_matches(DELIMITER)
        .rsplit(DELIMITER)
        .next()
        .unwrap_or_default()
        .to_string();

    let last_modified = meta.last_modified.map(|t| format_time(Some(t)));
    let optional = [
        ("Region", meta.region),
        ("Owner", meta.owner),
        ("Type", meta.content_type),
        ("Size", meta.size.map(format_size)),
        ("ETag", meta.etag),
        ("Storage Class", meta.storage_class),
        ("Legal Hold", meta.legal_hold),
        ("Last Modified", last_modified),
    ];

    let mut rows = vec![
        ("Bucket".to_string(), meta.bucket),
        ("Name".to_string(), name),
    ];
    rows.extend(
        optional
            .into_iter()
            .filter_map(|(label, value)| value.map(|v| (label.to_string(), v))),
    );
    rows.extend(meta.metadata);
    if !meta.tags.is_empty() {
        let tags: Vec<String> = meta.tags.iter().map(|(k, v)| format!("{k}={v}")).collect();
        rows.push(("Tags".to_string(), tags.join(", ")));
    }
    rows
}

impl PageContent for ObjectPage {
    fn title(&self) -> String {
        format!(
            "Objects in {} - {}",
            self.ctx.bucket(),
            self.ctx.object_key()
        )
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
        let meta = self
            .ctx
            .client()?
            .get_object_metadata(self.ctx.bucket(), self.ctx.object_key())?;
        self.list.replace_all(properties(meta));
        Ok(())
    }

    fn context(&self) -> &Context {
        &self.ctx
    }

    fn handle_key(&mut self, key: &KeyEvent) -> Result<EventResult> {
        if self.list.move_cursor(key) {
            return Ok(EventResult::Consumed);
        }
        Ok(EventResult::Ignored)
    }
}
