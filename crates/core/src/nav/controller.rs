//! Page stack, modal stack and key routing
//!
//! Pages never hold a reference to the controller. Everything they ask for
//! through their [`Context`] is queued as a [`Command`] and executed after the
//! current key has been routed, so no page is ever borrowed twice.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::context::{Context, Suspend};
use crate::error::Error;
use crate::nav::key::{KeyCode, KeyEvent};
use crate::nav::modal::{Geometry, ModalBuilder, ModalCloser, ModalContent, ModalView, error_modal};
use crate::nav::page::{EventResult, HotkeyInfo, PageContent, PageView};

/// A request queued by a page through its context
pub enum Command {
    OpenPage(Box<dyn PageContent>),
    SetError(Error),
    OpenModal {
        builder: ModalBuilder,
        name: Option<String>,
        geometry: Geometry,
    },
    CloseModal(String),
    ReloadPage,
}

type CommandQueue = Rc<RefCell<VecDeque<Command>>>;

/// Search input state of one page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchState {
    pub active: bool,
    pub term: String,
}

struct PageFrame {
    content: Box<dyn PageContent>,
    search: SearchState,
}

struct ModalEntry {
    name: String,
    content: Box<dyn ModalContent>,
    geometry: Geometry,
}

#[derive(Debug, Clone, Default)]
struct Header {
    connection: Vec<(String, String)>,
    hotkeys: Vec<HotkeyInfo>,
}

/// Search bar as rendered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchBar {
    pub term: String,
    pub active: bool,
}

/// An open modal as rendered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalFrame {
    pub name: String,
    pub view: ModalView,
    pub geometry: Geometry,
}

/// Everything the renderer needs for one frame
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Screen {
    /// Label/value rows describing the active connection
    pub connection: Vec<(String, String)>,
    pub hotkeys: Vec<HotkeyInfo>,
    pub title: String,
    pub search: Option<SearchBar>,
    pub body: PageView,
    /// Open modals, bottom to top
    pub modals: Vec<ModalFrame>,
}

/// Owns the page stack and the modal overlay stack
pub struct NavigationController {
    pages: Vec<PageFrame>,
    modals: Vec<ModalEntry>,
    queue: CommandQueue,
    context: Context,
    next_modal_id: u64,
    header: Header,
}

impl Default for NavigationController {
    fn default() -> Self {
        Self::new()
    }
}

impl NavigationController {
    pub fn new() -> Self {
        let queue: CommandQueue = Rc::new(RefCell::new(VecDeque::new()));

        let open_page = Rc::clone(&queue);
        let set_error = Rc::clone(&queue);
        let open_modal = Rc::clone(&queue);
        let close_modal = Rc::clone(&queue);
        let reload = Rc::clone(&queue);
        let context = Context::new()
            .with_open_page_fn(move |page| {
                open_page.borrow_mut().push_back(Command::OpenPage(page));
            })
            .with_error_fn(move |err| {
                set_error.borrow_mut().push_back(Command::SetError(err));
            })
            .with_modal_fn(
                move |builder, name, geometry| {
                    open_modal.borrow_mut().push_back(Command::OpenModal {
                        builder,
                        name,
                        geometry,
                    });
                },
                move |name| {
                    close_modal
                        .borrow_mut()
                        .push_back(Command::CloseModal(name.to_string()));
                },
            )
            .with_reload_fn(move || {
                reload.borrow_mut().push_back(Command::ReloadPage);
            });

        Self {
            pages: Vec::new(),
            modals: Vec::new(),
            queue,
            context,
            next_modal_id: 0,
            header: Header::default(),
        }
    }

    /// Install the handler used by [`Context::suspend_app`]
    pub fn with_suspender(mut self, suspender: Rc<dyn Suspend>) -> Self {
        self.context = self.context.with_suspender(suspender);
        self
    }

    /// Root context carrying the controller's callbacks
    pub fn context(&self) -> Context {
        self.context.clone()
    }

    pub fn open_page(&mut self, content: Box<dyn PageContent>) {
        self.push_page(content);
        self.drain();
    }

    /// Pop the active page; the last page is never closed
    pub fn close_page(&mut self) {
        self.pop_page();
        self.drain();
    }

    /// Open a modal and return the name it is registered under
    pub fn open_modal(
        &mut self,
        builder: ModalBuilder,
        name: Option<&str>,
        geometry: Geometry,
    ) -> String {
        let name = self.push_modal(builder, name.map(str::to_string), geometry);
        self.drain();
        name
    }

    pub fn close_modal(&mut self, name: &str) {
        self.remove_modal(name);
        self.drain();
    }

    pub fn set_error(&mut self, err: Error) {
        self.show_error(err);
        self.drain();
    }

    pub fn reload_page(&mut self) {
        self.reload_active();
        self.drain();
    }

    /// Route one key press, then run every command it queued
    pub fn handle_key(&mut self, key: &KeyEvent) -> EventResult {
        let result = self.route_key(key);
        self.drain();
        result
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn active_title(&self) -> Option<String> {
        self.pages.last().map(|frame| frame.content.title())
    }

    pub fn search(&self) -> Option<&SearchState> {
        self.pages.last().map(|frame| &frame.search)
    }

    /// Names of the open modals, bottom to top
    pub fn modal_names(&self) -> Vec<&str> {
        self.modals.iter().map(|m| m.name.as_str()).collect()
    }

    pub fn screen(&self) -> Screen {
        let Some(frame) = self.pages.last() else {
            return Screen::default();
        };
        let searching = frame.search.active || !frame.search.term.is_empty();
        let search = searching.then(|| SearchBar {
            term: frame.search.term.clone(),
            active: frame.search.active,
        });

        Screen {
            connection: self.header.connection.clone(),
            hotkeys: self.header.hotkeys.clone(),
            title: frame.content.title(),
            search,
            body: frame.content.view(),
            modals: self
                .modals
                .iter()
                .map(|modal| ModalFrame {
                    name: modal.name.clone(),
                    view: modal.content.view(),
                    geometry: modal.geometry,
                })
                .collect(),
        }
    }

    fn route_key(&mut self, key: &KeyEvent) -> EventResult {
        if let Some(modal) = self.modals.last_mut() {
            if key.code == KeyCode::Esc {
                let name = modal.name.clone();
                self.remove_modal(&name);
            } else {
                modal.content.handle_key(key);
            }
            return EventResult::Consumed;
        }

        let Some(frame) = self.pages.last_mut() else {
            return EventResult::Ignored;
        };

        if frame.search.active {
            route_search(frame, key);
            return EventResult::Consumed;
        }

        if key.code == KeyCode::Esc {
            if frame.search.term.is_empty() {
                self.pop_page();
            } else {
                frame.search.term.clear();
                frame.content.set_search("");
            }
            return EventResult::Consumed;
        }

        if *key == KeyEvent::char('/') {
            frame.search.active = true;
            return EventResult::Consumed;
        }

        let result = match frame.content.run_hotkey(key) {
            Ok(EventResult::Ignored) => frame.content.handle_key(key),
            consumed_or_error => consumed_or_error,
        };
        match result {
            Ok(result) => result,
            Err(err) => {
                self.show_error(err);
                EventResult::Consumed
            }
        }
    }

    fn push_page(&mut self, content: Box<dyn PageContent>) {
        tracing::info!(title = %content.title(), depth = self.pages.len() + 1, "opening page");
        self.pages.push(PageFrame {
            content,
            search: SearchState::default(),
        });
        self.reload_active();
    }

    fn pop_page(&mut self) {
        if self.pages.len() <= 1 {
            return;
        }
        if let Some(frame) = self.pages.pop() {
            tracing::info!(title = %frame.content.title(), "closing page");
        }
        self.refresh_header();
    }

    fn reload_active(&mut self) {
        let Some(frame) = self.pages.last_mut() else {
            return;
        };
        if let Err(err) = frame.content.load() {
            self.show_error(err);
        }
        self.refresh_header();
    }

    fn push_modal(
        &mut self,
        builder: ModalBuilder,
        name: Option<String>,
        geometry: Geometry,
    ) -> String {
        let name = name.unwrap_or_else(|| {
            self.next_modal_id += 1;
            format!("modal-{}", self.next_modal_id)
        });
        self.modals.retain(|m| m.name != name);

        let queue = Rc::clone(&self.queue);
        let close_name = name.clone();
        let closer: ModalCloser = Rc::new(move || {
            queue
                .borrow_mut()
                .push_back(Command::CloseModal(close_name.clone()));
        });

        tracing::debug!(modal = %name, "opening modal");
        self.modals.push(ModalEntry {
            name: name.clone(),
            content: builder(closer),
            geometry,
        });
        name
    }

    fn remove_modal(&mut self, name: &str) {
        let before = self.modals.len();
        self.modals.retain(|m| m.name != name);
        if self.modals.len() != before {
            tracing::debug!(modal = %name, "closed modal");
        }
    }

    fn show_error(&mut self, err: Error) {
        tracing::warn!(error = %err, "showing error");
        self.push_modal(
            error_modal(err.title(), err.to_string()),
            None,
            Geometry::default(),
        );
    }

    fn refresh_header(&mut self) {
        self.header = match self.pages.last() {
            Some(frame) => Header {
                connection: connection_rows(frame.content.context()),
                hotkeys: frame.content.hotkeys(),
            },
            None => Header::default(),
        };
    }

    fn drain(&mut self) {
        loop {
            let command = self.queue.borrow_mut().pop_front();
            let Some(command) = command else {
                break;
            };
            match command {
                Command::OpenPage(page) => self.push_page(page),
                Command::SetError(err) => self.show_error(err),
                Command::OpenModal {
                    builder,
                    name,
                    geometry,
                } => {
                    self.push_modal(builder, name, geometry);
                }
                Command::CloseModal(name) => self.remove_modal(&name),
                Command::ReloadPage => self.reload_active(),
            }
        }
    }
}

fn route_search(frame: &mut PageFrame, key: &KeyEvent) {
    let search = &mut frame.search;
    match key.code {
        KeyCode::Enter => {
            search.active = false;
            return;
        }
        KeyCode::Esc => {
            search.active = false;
            search.term.clear();
        }
        KeyCode::Backspace => {
            search.term.pop();
        }
        _ => match key.text() {
            Some(c) => search.term.push(c),
            None => return,
        },
    }
    frame.content.set_search(&frame.search.term);
}

fn connection_rows(ctx: &Context) -> Vec<(String, String)> {
    let Ok(client) = ctx.client() else {
        return Vec::new();
    };
    let params = client.connection_parameters(ctx.bucket());

    let mut rows = Vec::new();
    if let Some(endpoint) = params.endpoint {
        rows.push(("Endpoint".to_string(), endpoint));
    }
    if let Some(region) = params.region {
        rows.push(("Region".to_string(), region));
    }
    if !ctx.bucket().is_empty() {
        rows.push(("Bucket".to_string(), ctx.bucket().to_string()));
    }
    rows
}
