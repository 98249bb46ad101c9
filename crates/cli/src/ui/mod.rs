//! Terminal front end: session, event loop, rendering and key translation

pub mod input;
pub mod render;
pub mod terminal;

use std::rc::Rc;

use anyhow::Context as _;
use crossterm::event::{self, Event};
use s3nav_core::pages::ProfilesPage;
use s3nav_core::{ConnectorLoader, Editor, NavigationController, Suspend};

use terminal::{TerminalSession, TerminalSuspender};

/// Open the profiles page and run until Ctrl+C
pub fn run(editor: Rc<Editor>, loaders: Vec<Box<dyn ConnectorLoader>>) -> anyhow::Result<()> {
    let terminal = TerminalSession::enter().context("failed to initialize terminal")?;
    let session = Rc::new(terminal);
    let suspender: Rc<dyn Suspend> = Rc::new(TerminalSuspender::new(Rc::clone(&session)));

    let mut controller = NavigationController::new().with_suspender(suspender);
    let ctx = controller.context();
    controller.open_page(Box::new(ProfilesPage::new(ctx, editor, loaders)));

    event_loop(&session, &mut controller)
}

fn event_loop(
    session: &TerminalSession,
    controller: &mut NavigationController,
) -> anyhow::Result<()> {
    loop {
        let screen = controller.screen();
        session
            .draw(|frame| render::draw(frame, &screen))
            .context("failed to draw")?;

        if let Event::Key(key) = event::read().context("failed to read terminal event")? {
            if input::is_quit(&key) {
                tracing::info!("quit requested");
                return Ok(());
            }
            if let Some(key) = input::translate(&key) {
                controller.handle_key(&key);
            }
        }
    }
}
