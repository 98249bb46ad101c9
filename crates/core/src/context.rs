//! Navigation context handed down through pages
//!
//! A [`Context`] is an immutable value: every `with_*` method returns a new
//! context with one field replaced. Pages derive the context of the page they
//! open from their own, so a bucket page never sees changes made further down.
//! The UI callbacks are installed once by the navigation controller.

use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use crate::client::StorageClient;
use crate::error::{Error, Result};
use crate::nav::modal::{Geometry, ModalBuilder};
use crate::nav::page::PageContent;

/// Suspends the UI while `task` runs and resumes it afterwards
///
/// Implementations must resume even when `task` fails and must reject a
/// nested suspension with [`Error::Suspend`].
pub trait Suspend {
    fn suspend(&self, task: &mut dyn FnMut() -> Result<()>) -> Result<()>;
}

type OpenPageFn = Rc<dyn Fn(Box<dyn PageContent>)>;
type SetErrorFn = Rc<dyn Fn(Error)>;
type OpenModalFn = Rc<dyn Fn(ModalBuilder, Option<String>, Geometry)>;
type CloseModalFn = Rc<dyn Fn(&str)>;
type ReloadFn = Rc<dyn Fn()>;

#[derive(Clone, Default)]
struct Callbacks {
    open_page: Option<OpenPageFn>,
    set_error: Option<SetErrorFn>,
    open_modal: Option<OpenModalFn>,
    close_modal: Option<CloseModalFn>,
    reload: Option<ReloadFn>,
    suspend: Option<Rc<dyn Suspend>>,
}

/// Client, bucket, key and UI callbacks of a page
#[derive(Clone, Default)]
pub struct Context {
    client: Option<Arc<dyn StorageClient>>,
    bucket: String,
    object_key: String,
    callbacks: Callbacks,
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("has_client", &self.client.is_some())
            .field("bucket", &self.bucket)
            .field("object_key", &self.object_key)
            .finish_non_exhaustive()
    }
}

impl Context {
    /// A context with no client and no callbacks
    pub fn new() -> Self {
        Self::default()
    }

    /// The storage client, failing if none was selected yet
    pub fn client(&self) -> Result<Arc<dyn StorageClient>> {
        self.client
            .clone()
            .ok_or_else(|| Error::General("no storage client selected".to_string()))
    }

    pub fn has_client(&self) -> bool {
        self.client.is_some()
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn object_key(&self) -> &str {
        &self.object_key
    }

    pub fn with_client(&self, client: Arc<dyn StorageClient>) -> Self {
        let mut ctx = self.clone();
        ctx.client = Some(client);
        ctx
    }

    pub fn with_bucket(&self, bucket: impl Into<String>) -> Self {
        let mut ctx = self.clone();
        ctx.bucket = bucket.into();
        ctx
    }

    pub fn with_object_key(&self, key: impl Into<String>) -> Self {
        let mut ctx = self.clone();
        ctx.object_key = key.into();
        ctx
    }

    pub fn with_open_page_fn(&self, f: impl Fn(Box<dyn PageContent>) + 'static) -> Self {
        let mut ctx = self.clone();
        ctx.callbacks.open_page = Some(Rc::new(f));
        ctx
    }

    pub fn with_error_fn(&self, f: impl Fn(Error) + 'static) -> Self {
        let mut ctx = self.clone();
        ctx.callbacks.set_error = Some(Rc::new(f));
        ctx
    }

    pub fn with_modal_fn(
        &self,
        open: impl Fn(ModalBuilder, Option<String>, Geometry) + 'static,
        close: impl Fn(&str) + 'static,
    ) -> Self {
        let mut ctx = self.clone();
        ctx.callbacks.open_modal = Some(Rc::new(open));
        ctx.callbacks.close_modal = Some(Rc::new(close));
        ctx
    }

    pub fn with_reload_fn(&self, f: impl Fn() + 'static) -> Self {
        let mut ctx = self.clone();
        ctx.callbacks.reload = Some(Rc::new(f));
        ctx
    }

    pub fn with_suspender(&self, suspender: Rc<dyn Suspend>) -> Self {
        let mut ctx = self.clone();
        ctx.callbacks.suspend = Some(suspender);
        ctx
    }

    /// Push a page on top of the navigation stack
    pub fn open_page(&self, page: Box<dyn PageContent>) {
        if let Some(f) = &self.callbacks.open_page {
            f(page);
        }
    }

    /// Show an error dialog
    pub fn set_error(&self, err: Error) {
        match &self.callbacks.set_error {
            Some(f) => f(err),
            None => tracing::warn!(error = %err, "error reported without a UI"),
        }
    }

    /// Open an anonymous modal with the default geometry
    pub fn modal(&self, builder: ModalBuilder) {
        self.open_modal(builder, None, Geometry::default());
    }

    /// Open a modal; a named modal replaces an open one of the same name
    pub fn open_modal(&self, builder: ModalBuilder, name: Option<&str>, geometry: Geometry) {
        if let Some(f) = &self.callbacks.open_modal {
            f(builder, name.map(str::to_string), geometry);
        }
    }

    pub fn close_modal(&self, name: &str) {
        if let Some(f) = &self.callbacks.close_modal {
            f(name);
        }
    }

    /// Ask for the active page to be loaded again
    pub fn reload(&self) {
        if let Some(f) = &self.callbacks.reload {
            f();
        }
    }

    /// Run `task` with the UI suspended
    pub fn suspend_app(&self, task: &mut dyn FnMut() -> Result<()>) -> Result<()> {
        match &self.callbacks.suspend {
            Some(suspender) => suspender.suspend(task),
            None => Err(Error::Suspend("no terminal attached".to_string())),
        }
    }
}
