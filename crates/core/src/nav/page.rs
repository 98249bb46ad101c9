//! Page contract and hotkey tables

use crate::context::Context;
use crate::error::Result;
use crate::nav::key::KeyEvent;

/// Whether a key was handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    Consumed,
    Ignored,
}

/// A hotkey as shown in the header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HotkeyInfo {
    pub chord: String,
    pub title: String,
}

/// A page's declared hotkey
pub struct Hotkey<P: ?Sized> {
    pub chord: KeyEvent,
    pub title: &'static str,
    pub run: fn(&mut P) -> Result<()>,
}

/// Header entries for a hotkey table
pub fn describe_hotkeys<P: ?Sized>(hotkeys: &[Hotkey<P>]) -> Vec<HotkeyInfo> {
    hotkeys
        .iter()
        .map(|hotkey| HotkeyInfo {
            chord: hotkey.chord.to_string(),
            title: hotkey.title.to_string(),
        })
        .collect()
}

/// Run the hotkey bound to `key`, if any
pub fn dispatch_hotkey<P: ?Sized>(
    hotkeys: &[Hotkey<P>],
    page: &mut P,
    key: &KeyEvent,
) -> Result<EventResult> {
    match hotkeys.iter().find(|hotkey| hotkey.chord == *key) {
        Some(hotkey) => {
            tracing::debug!(hotkey = hotkey.title, "running hotkey");
            (hotkey.run)(page)?;
            Ok(EventResult::Consumed)
        }
        None => Ok(EventResult::Ignored),
    }
}

/// What a page body looks like: a header row plus cells
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageView {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub selected: Option<usize>,
}

/// A screen on the navigation stack
pub trait PageContent {
    fn title(&self) -> String;

    /// Hotkeys shown in the header and offered to [`PageContent::run_hotkey`]
    fn hotkeys(&self) -> Vec<HotkeyInfo> {
        Vec::new()
    }

    fn run_hotkey(&mut self, _key: &KeyEvent) -> Result<EventResult> {
        Ok(EventResult::Ignored)
    }

    /// Apply the search term typed by the user
    fn set_search(&mut self, term: &str);

    fn view(&self) -> PageView;

    /// Fetch the page's data; called when the page is opened or reloaded
    fn load(&mut self) -> Result<()>;

    fn context(&self) -> &Context;

    /// Keys left over after search and hotkeys
    fn handle_key(&mut self, _key: &KeyEvent) -> Result<EventResult> {
        Ok(EventResult::Ignored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    struct Counter {
        hits: u32,
    }

    fn bump(counter: &mut Counter) -> Result<()> {
        counter.hits += 1;
        Ok(())
    }

    fn fail(_: &mut Counter) -> Result<()> {
        Err(Error::General("boom".into()))
    }

    const HOTKEYS: &[Hotkey<Counter>] = &[
        Hotkey {
            chord: KeyEvent::char('b'),
            title: "Bump",
            run: bump,
        },
        Hotkey {
            chord: KeyEvent::ctrl('f'),
            title: "Fail",
            run: fail,
        },
    ];

    #[test]
    fn test_describe_hotkeys() {
        let info = describe_hotkeys(HOTKEYS);
        assert_eq!(info[0].chord, "b");
        assert_eq!(info[0].title, "Bump");
        assert_eq!(info[1].chord, "Ctrl+f");
    }

    #[test]
    fn test_dispatch_hotkey() {
        let mut counter = Counter { hits: 0 };
        let result = dispatch_hotkey(HOTKEYS, &mut counter, &KeyEvent::char('b')).unwrap();
        assert_eq!(result, EventResult::Consumed);
        assert_eq!(counter.hits, 1);

        let result = dispatch_hotkey(HOTKEYS, &mut counter, &KeyEvent::char('x')).unwrap();
        assert_eq!(result, EventResult::Ignored);
        assert_eq!(counter.hits, 1);
    }

    #[test]
    fn test_dispatch_propagates_errors() {
        let mut counter = Counter { hits: 0 };
        let result = dispatch_hotkey(HOTKEYS, &mut counter, &KeyEvent::ctrl('f'));
        assert!(result.is_err());
    }
}
