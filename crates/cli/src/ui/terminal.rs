//! Terminal session and UI suspension for external programs

use std::cell::{Cell, RefCell};
use std::io::{self, Stdout};
use std::rc::Rc;

use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::backend::CrosstermBackend;
use ratatui::{Frame, Terminal};
use s3nav_core::{Error, Result, Suspend};

/// Hands the terminal over to another program and takes it back
pub trait TerminalControl {
    fn release(&self) -> io::Result<()>;

    fn restore(&self) -> io::Result<()>;
}

/// Raw mode plus alternate screen, restored on drop
pub struct TerminalSession {
    terminal: RefCell<Terminal<CrosstermBackend<Stdout>>>,
}

impl TerminalSession {
    pub fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        match Self::open() {
            Ok(terminal) => Ok(Self {
                terminal: RefCell::new(terminal),
            }),
            Err(e) => {
                let _ = disable_raw_mode();
                Err(e)
            }
        }
    }

    fn open() -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        terminal.hide_cursor()?;
        Ok(terminal)
    }

    pub fn draw(&self, render: impl FnOnce(&mut Frame)) -> io::Result<()> {
        self.terminal.borrow_mut().draw(render)?;
        Ok(())
    }
}

impl TerminalControl for TerminalSession {
    fn release(&self) -> io::Result<()> {
        let mut terminal = self.terminal.borrow_mut();
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()
    }

    fn restore(&self) -> io::Result<()> {
        let mut terminal = self.terminal.borrow_mut();
        enable_raw_mode()?;
        execute!(terminal.backend_mut(), EnterAlternateScreen)?;
        terminal.hide_cursor()?;
        terminal.clear()
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            tracing::warn!(error = %e, "failed to restore terminal");
        }
    }
}

/// [`Suspend`] over a terminal; one suspension at a time
pub struct TerminalSuspender<T> {
    terminal: Rc<T>,
    active: Cell<bool>,
}

impl<T: TerminalControl> TerminalSuspender<T> {
    pub fn new(terminal: Rc<T>) -> Self {
        Self {
            terminal,
            active: Cell::new(false),
        }
    }

    fn run(&self, task: &mut dyn FnMut() -> Result<()>) -> Result<()> {
        self.terminal
            .release()
            .map_err(|e| Error::Suspend(e.to_string()))?;
        tracing::debug!("terminal suspended");

        let result = task();

        let restored = self
            .terminal
            .restore()
            .map_err(|e| Error::Suspend(e.to_string()));
        tracing::debug!(ok = result.is_ok(), "terminal resumed");
        result.and(restored)
    }
}

impl<T: TerminalControl> Suspend for TerminalSuspender<T> {
    fn suspend(&self, task: &mut dyn FnMut() -> Result<()>) -> Result<()> {
        if self.active.replace(true) {
            return Err(Error::Suspend("another program is already running".into()));
        }
        let result = self.run(task);
        self.active.set(false);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct FakeTerminal {
        events: RefCell<Vec<&'static str>>,
        fail_restore: bool,
    }

    impl TerminalControl for FakeTerminal {
        fn release(&self) -> io::Result<()> {
            self.events.borrow_mut().push("release");
            Ok(())
        }

        fn restore(&self) -> io::Result<()> {
            self.events.borrow_mut().push("restore");
            if self.fail_restore {
                return Err(io::Error::other("tty gone"));
            }
            Ok(())
        }
    }

    #[test]
    fn test_suspend_releases_and_restores() {
        let terminal = Rc::new(FakeTerminal::default());
        let suspender = TerminalSuspender::new(Rc::clone(&terminal));
        let recorded = Rc::clone(&terminal);

        suspender
            .suspend(&mut || {
                recorded.events.borrow_mut().push("task");
                Ok(())
            })
            .unwrap();
        assert_eq!(
            *terminal.events.borrow(),
            vec!["release", "task", "restore"]
        );
    }

    #[test]
    fn test_restores_when_task_fails() {
        let terminal = Rc::new(FakeTerminal::default());
        let suspender = TerminalSuspender::new(Rc::clone(&terminal));

        let err = suspender
            .suspend(&mut || Err(Error::Process("vim exited with status 1".into())))
            .unwrap_err();
        assert!(matches!(err, Error::Process(_)));
        assert_eq!(*terminal.events.borrow(), vec!["release", "restore"]);

        suspender.suspend(&mut || Ok(())).unwrap();
    }

    #[test]
    fn test_nested_suspension_rejected() {
        let terminal = Rc::new(FakeTerminal::default());
        let suspender = Rc::new(TerminalSuspender::new(Rc::clone(&terminal)));
        let inner = Rc::clone(&suspender);

        let mut nested = None;
        suspender
            .suspend(&mut || {
                nested = Some(inner.suspend(&mut || Ok(())));
                Ok(())
            })
            .unwrap();
        assert!(matches!(nested, Some(Err(Error::Suspend(_)))));
        assert_eq!(*terminal.events.borrow(), vec!["release", "restore"]);
    }

    #[test]
    fn test_restore_failure_reported() {
        let terminal = Rc::new(FakeTerminal {
            fail_restore: true,
            ..FakeTerminal::default()
        });
        let suspender = TerminalSuspender::new(terminal);

        let err = suspender.suspend(&mut || Ok(())).unwrap_err();
        assert!(matches!(err, Error::Suspend(_)));
    }
}
