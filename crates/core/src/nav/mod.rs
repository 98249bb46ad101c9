//! Navigation engine: pages, modals and the controller routing keys to them

pub mod controller;
pub mod key;
pub mod list_page;
pub mod modal;
pub mod page;

pub use controller::{Command, ModalFrame, NavigationController, Screen, SearchBar, SearchState};
pub use key::{KeyCode, KeyEvent, Modifiers};
pub use list_page::ListPage;
pub use modal::{
    ButtonView, Dialog, FieldView, FormValues, Geometry, ModalBuilder, ModalCloser, ModalContent,
    ModalView, confirm_modal, error_modal, form_modal,
};
pub use page::{
    EventResult, Hotkey, HotkeyInfo, PageContent, PageView, describe_hotkeys, dispatch_hotkey,
};
