//! Profile selection page, the first page on the stack

use std::rc::Rc;
use std::sync::Arc;

use crate::connector::{Connector, ConnectorLoader};
use crate::context::Context;
use crate::editor::Editor;
use crate::error::Result;
use crate::nav::key::{KeyCode, KeyEvent};
use crate::nav::list_page::ListPage;
use crate::nav::page::{EventResult, PageContent, PageView};
use crate::pages::buckets::BucketsPage;

/// Lists the connectors of every loader
pub struct ProfilesPage {
    ctx: Context,
    editor: Rc<Editor>,
    loaders: Vec<Box<dyn ConnectorLoader>>,
    list: ListPage<Arc<dyn Connector>>,
}

impl ProfilesPage {
    pub fn new(ctx: Context, editor: Rc<Editor>, loaders: Vec<Box<dyn ConnectorLoader>>) -> Self {
        let mut list = ListPage::new();
        list.add_column("Type", |c: &Arc<dyn Connector>| c.kind().to_string());
        list.add_column("Name", |c: &Arc<dyn Connector>| c.name().to_string());
        Self {
            ctx,
            editor,
            loaders,
            list,
        }
    }

    fn open_selected(&mut self) -> Result<()> {
        let Some(connector) = self.list.selected().cloned() else {
            return Ok(());
        };
        let client = connector.create_client()?;
        tracing::info!(
            profile = connector.name(),
            kind = connector.kind(),
            "connected"
        );
        self.ctx.open_page(Box::new(BucketsPage::new(
            self.ctx.with_client(client),
            Rc::clone(&self.editor),
        )));
        Ok(())
    }
}

impl PageContent for ProfilesPage {
    fn title(&self) -> String {
        "Profiles".to_string()
    }

    fn set_search(&mut self, term: &str) {
        self.list.set_search(term);
    }

    fn view(&self) -> PageView {
        self.list.view()
    }

    /// A failing loader is reported after the others were listed
    fn load(&mut self) -> Result<()> {
        let mut connectors = Vec::new();
        let mut first_error = None;
        for loader in &self.loaders {
            match loader.load() {
                Ok(found) => connectors.extend(found),
                Err(err) => {
                    tracing::warn!(error = %err, "connector loader failed");
                    first_error.get_or_insert(err);
                }
            }
        }
        tracing::debug!(count = connectors.len(), "loaded connectors");
        self.list.replace_all(connectors);

        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn context(&self) -> &Context {
        &self.ctx
    }

    fn handle_key(&mut self, key: &KeyEvent) -> Result<EventResult> {
        if self.list.move_cursor(key) {
            return Ok(EventResult::Consumed);
        }
        if key.code == KeyCode::Enter {
            self.open_selected()?;
            return Ok(EventResult::Consumed);
        }
        Ok(EventResult::Ignored)
    }
}
