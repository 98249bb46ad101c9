//! Bucket list of one storage client

use std::rc::Rc;

use crate::context::Context;
use crate::editor::Editor;
use crate::error::{Error, Result};
use crate::format::format_time;
use crate::nav::key::{KeyCode, KeyEvent};
use crate::nav::list_page::ListPage;
use crate::nav::modal::{FormValues, confirm_modal, form_modal};
use crate::nav::page::{
    EventResult, Hotkey, HotkeyInfo, PageContent, PageView, describe_hotkeys, dispatch_hotkey,
};
use crate::object::Bucket;
use crate::pages::objects::ObjectsPage;
use crate::paginator::collect_pages;

const HOTKEYS: &[Hotkey<BucketsPage>] = &[
    Hotkey {
        chord: KeyEvent::char('n'),
        title: "New Bucket",
        run: BucketsPage::new_bucket,
    },
    Hotkey {
        chord: KeyEvent::char('d'),
        title: "Delete Bucket",
        run: BucketsPage::delete_bucket,
    },
];

pub struct BucketsPage {
    ctx: Context,
    editor: Rc<Editor>,
    list: ListPage<Bucket>,
}

impl BucketsPage {
    pub fn new(ctx: Context, editor: Rc<Editor>) -> Self {
        let mut list = ListPage::new();
        list.add_column("Bucket Name", |b: &Bucket| b.name.clone());
        list.add_column("Region", |b: &Bucket| b.region.clone().unwrap_or_default());
        list.add_column("Created At", |b: &Bucket| format_time(b.creation_date));
        Self { ctx, editor, list }
    }

    fn new_bucket(&mut self) -> Result<()> {
        let ctx = self.ctx.clone();
        self.ctx.modal(form_modal(
            "New Bucket",
            &["Region", "Name"],
            "Create",
            move |values| match create_bucket(&ctx, values) {
                Ok(()) => ctx.reload(),
                Err(err) => ctx.set_error(err),
            },
        ));
        Ok(())
    }

    fn delete_bucket(&mut self) -> Result<()> {
        let Some(bucket) = self.list.selected() else {
            return Ok(());
        };
        let name = bucket.name.clone();
        let ctx = self.ctx.clone();
        let client = ctx.client()?;
        self.ctx.modal(confirm_modal(
            format!("Delete bucket '{name}'?"),
            move || match client.delete_bucket(&name) {
                Ok(()) => {
                    tracing::info!(bucket = %name, "deleted bucket");
                    ctx.reload();
                }
                Err(err) => ctx.set_error(err),
            },
        ));
        Ok(())
    }

    fn open_selected(&self) {
        if let Some(bucket) = self.list.selected() {
            let ctx = self
                .ctx
                .with_bucket(bucket.name.clone())
                .with_object_key("");
            self.ctx
                .open_page(Box::new(ObjectsPage::new(ctx, Rc::clone(&self.editor))));
        }
    }
}

/// Validate the New Bucket form and create the bucket
fn create_bucket(ctx: &Context, values: &FormValues) -> Result<()> {
    let field = |label: &str| values.get(label).map(|v| v.trim()).unwrap_or_default();
    let name = field("Name");
    if name.is_empty() {
        return Err(Error::Validation("bucket name cannot be empty".to_string()));
    }
    ctx.client()?.create_bucket(name, field("Region"))?;
    tracing::info!(bucket = name, "created bucket");
    Ok(())
}

impl PageContent for BucketsPage {
    fn title(&self) -> String {
        "Buckets".to_string()
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
        let buckets = collect_pages(self.ctx.client()?.list_buckets().as_mut())?;
        tracing::debug!(count = buckets.len(), "listed buckets");
        self.list.replace_all(buckets);
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockStorageClient;
    use crate::pages::testing::{press_after_tabs, recording_context, type_text};
    use crate::paginator::MemoryPaginator;
    use mockall::predicate::eq;
    use std::sync::Arc;

    fn bucket(name: &str, region: &str) -> Bucket {
        Bucket {
            name: name.to_string(),
            region: Some(region.to_string()),
            creation_date: None,
        }
    }

    fn listing_mock() -> MockStorageClient {
        let mut mock = MockStorageClient::new();
        mock.expect_list_buckets().returning(|| {
            Box::new(MemoryPaginator::new(vec![
                bucket("demo", "us-east-1"),
                bucket("archive", "eu-west-1"),
            ]))
        });
        mock
    }

    fn page_with(mock: MockStorageClient) -> (BucketsPage, Rc<crate::pages::testing::Recorder>) {
        let (ctx, recorder) = recording_context();
        let page = BucketsPage::new(
            ctx.with_client(Arc::new(mock)),
            Rc::new(Editor::new("true", "true")),
        );
        (page, recorder)
    }

    #[test]
    fn test_load_lists_buckets() {
        let (mut page, _) = page_with(listing_mock());
        page.load().unwrap();

        let view = page.view();
        assert_eq!(view.columns, vec!["Bucket Name", "Region", "Created At"]);
        assert_eq!(view.rows[0][..2], ["demo", "us-east-1"]);
        assert_eq!(view.rows[1][..2], ["archive", "eu-west-1"]);
        assert_eq!(view.selected, Some(0));
    }

    #[test]
    fn test_listing_error_keeps_rows() {
        let mut mock = MockStorageClient::new();
        let mut calls = 0;
        mock.expect_list_buckets().returning(move || {
            calls += 1;
            if calls == 1 {
                Box::new(MemoryPaginator::new(vec![bucket("demo", "us-east-1")]))
            } else {
                Box::new(MemoryPaginator::not_found("endpoint gone"))
            }
        });
        let (mut page, _) = page_with(mock);
        page.load().unwrap();

        assert!(matches!(page.load(), Err(Error::NotFound(_))));
        assert_eq!(page.view().rows.len(), 1);
    }

    #[test]
    fn test_hotkeys_declared() {
        let (page, _) = page_with(MockStorageClient::new());
        let titles: Vec<_> = page.hotkeys().into_iter().map(|h| h.title).collect();
        assert_eq!(titles, vec!["New Bucket", "Delete Bucket"]);
    }

    #[test]
    fn test_new_bucket_form_creates_and_reloads() {
        let mut mock = listing_mock();
        mock.expect_create_bucket()
            .with(eq("photos"), eq("eu-west-1"))
            .times(1)
            .returning(|_, _| Ok(()));
        let (mut page, recorder) = page_with(mock);

        let result = page.run_hotkey(&KeyEvent::char('n')).unwrap();
        assert_eq!(result, EventResult::Consumed);

        let mut modal = recorder.take_modal();
        assert_eq!(modal.view().title, "New Bucket");
        type_text(modal.as_mut(), "eu-west-1");
        modal.handle_key(&KeyEvent::plain(KeyCode::Tab));
        type_text(modal.as_mut(), " photos ");
        // Name -> Cancel -> Create
        press_after_tabs(modal.as_mut(), 2);

        assert_eq!(*recorder.reloads.borrow(), 1);
        assert!(recorder.errors.borrow().is_empty());
    }

    #[test]
    fn test_empty_bucket_name_rejected_before_backend() {
        let mut mock = MockStorageClient::new();
        mock.expect_create_bucket().times(0);
        let (ctx, _) = recording_context();
        let ctx = ctx.with_client(Arc::new(mock));

        let values = FormValues::from([
            ("Region".to_string(), "us-east-1".to_string()),
            ("Name".to_string(), "   ".to_string()),
        ]);
        let result = create_bucket(&ctx, &values);
        assert!(
            matches!(result, Err(Error::Validation(ref m)) if m == "bucket name cannot be empty")
        );
    }

    #[test]
    fn test_create_failure_reported() {
        let mut mock = MockStorageClient::new();
        mock.expect_create_bucket()
            .returning(|_, _| Err(Error::Conflict("bucket already exists".to_string())));
        let (mut page, recorder) = page_with(mock);

        page.run_hotkey(&KeyEvent::char('n')).unwrap();
        let mut modal = recorder.take_modal();
        modal.handle_key(&KeyEvent::plain(KeyCode::Tab));
        type_text(modal.as_mut(), "demo");
        press_after_tabs(modal.as_mut(), 2);

        assert!(matches!(recorder.errors.borrow()[0], Error::Conflict(_)));
        assert_eq!(*recorder.reloads.borrow(), 0);
    }

    #[test]
    fn test_delete_bucket_after_confirmation() {
        let mut mock = listing_mock();
        mock.expect_delete_bucket()
            .with(eq("archive"))
            .times(1)
            .returning(|_| Ok(()));
        let (mut page, recorder) = page_with(mock);
        page.load().unwrap();
        page.handle_key(&KeyEvent::plain(KeyCode::Down)).unwrap();

        page.run_hotkey(&KeyEvent::char('d')).unwrap();
        let mut modal = recorder.take_modal();
        assert_eq!(modal.view().text, "Delete bucket 'archive'?");
        press_after_tabs(modal.as_mut(), 1);

        assert_eq!(*recorder.reloads.borrow(), 1);
    }

    #[test]
    fn test_delete_cancelled() {
        let mut mock = listing_mock();
        mock.expect_delete_bucket().times(0);
        let (mut page, recorder) = page_with(mock);
        page.load().unwrap();

        page.run_hotkey(&KeyEvent::char('d')).unwrap();
        let mut modal = recorder.take_modal();
        modal.handle_key(&KeyEvent::plain(KeyCode::Enter));
        assert_eq!(*recorder.reloads.borrow(), 0);
    }

    #[test]
    fn test_enter_opens_objects_page() {
        let (mut page, recorder) = page_with(listing_mock());
        page.load().unwrap();
        page.handle_key(&KeyEvent::plain(KeyCode::Enter)).unwrap();

        let pages = recorder.pages.borrow();
        assert_eq!(pages[0].title(), "Objects in demo");
        assert_eq!(pages[0].context().bucket(), "demo");
        assert_eq!(pages[0].context().object_key(), "");
    }
}
