//! Overlay dialogs
//!
//! A modal is built lazily: the controller hands the builder a closer that
//! removes exactly this modal, and the builder returns the content.

use std::collections::BTreeMap;
use std::rc::Rc;

use crate::nav::key::{KeyCode, KeyEvent};
use crate::nav::page::EventResult;

/// Closes the modal it was created for
pub type ModalCloser = Rc<dyn Fn()>;

/// Produces modal content once the controller has registered it
pub type ModalBuilder = Box<dyn FnOnce(ModalCloser) -> Box<dyn ModalContent>>;

/// Values of a dialog's input fields keyed by label
pub type FormValues = BTreeMap<String, String>;

type DoneFn = Box<dyn FnMut(&str, &FormValues)>;

/// Requested size of a modal in terminal cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    pub width: u16,
    pub height: u16,
}

impl Default for Geometry {
    fn default() -> Self {
        Self {
            width: 60,
            height: 9,
        }
    }
}

/// An input field as rendered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldView {
    pub label: String,
    pub value: String,
    pub focused: bool,
}

/// A button as rendered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonView {
    pub label: String,
    pub focused: bool,
}

/// Renderable state of a modal
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModalView {
    pub title: String,
    pub text: String,
    pub error: bool,
    pub fields: Vec<FieldView>,
    pub buttons: Vec<ButtonView>,
}

/// Content shown in the modal overlay
pub trait ModalContent {
    fn view(&self) -> ModalView;

    fn handle_key(&mut self, key: &KeyEvent) -> EventResult;
}

/// Message box with optional input fields and a row of buttons
///
/// Focus cycles over the fields first, then the buttons. Pressing Enter on a
/// button reports its label together with the field values.
pub struct Dialog {
    title: String,
    text: String,
    error: bool,
    fields: Vec<(String, String)>,
    buttons: Vec<String>,
    focus: usize,
    on_done: Option<DoneFn>,
}

impl Dialog {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            text: String::new(),
            error: false,
            fields: Vec::new(),
            buttons: Vec::new(),
            focus: 0,
            on_done: None,
        }
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Render with the error style
    pub fn error(mut self) -> Self {
        self.error = true;
        self
    }

    pub fn input(mut self, label: impl Into<String>, initial: impl Into<String>) -> Self {
        self.fields.push((label.into(), initial.into()));
        self
    }

    pub fn buttons<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.buttons.extend(labels.into_iter().map(Into::into));
        self
    }

    pub fn on_done(mut self, f: impl FnMut(&str, &FormValues) + 'static) -> Self {
        self.on_done = Some(Box::new(f));
        self
    }

    pub fn values(&self) -> FormValues {
        self.fields.iter().cloned().collect()
    }

    fn focus_count(&self) -> usize {
        self.fields.len() + self.buttons.len()
    }

    fn move_focus(&mut self, forward: bool) {
        let count = self.focus_count();
        if count == 0 {
            return;
        }
        self.focus = if forward {
            (self.focus + 1) % count
        } else {
            (self.focus + count - 1) % count
        };
    }

    fn focused_field(&mut self) -> Option<&mut String> {
        self.fields.get_mut(self.focus).map(|(_, value)| value)
    }

    fn press(&mut self) {
        let Some(label) = self
            .focus
            .checked_sub(self.fields.len())
            .and_then(|idx| self.buttons.get(idx))
            .cloned()
        else {
            // Enter in a field moves on like Tab
            self.move_focus(true);
            return;
        };
        let values = self.values();
        if let Some(done) = self.on_done.as_mut() {
            done(&label, &values);
        }
    }
}

impl ModalContent for Dialog {
    fn view(&self) -> ModalView {
        ModalView {
            title: self.title.clone(),
            text: self.text.clone(),
            error: self.error,
            fields: self
                .fields
                .iter()
                .enumerate()
                .map(|(idx, (label, value))| FieldView {
                    label: label.clone(),
                    value: value.clone(),
                    focused: idx == self.focus,
                })
                .collect(),
            buttons: self
                .buttons
                .iter()
                .enumerate()
                .map(|(idx, label)| ButtonView {
                    label: label.clone(),
                    focused: self.fields.len() + idx == self.focus,
                })
                .collect(),
        }
    }

    fn handle_key(&mut self, key: &KeyEvent) -> EventResult {
        if let Some(c) = key.text() {
            if let Some(value) = self.focused_field() {
                value.push(c);
            }
            return EventResult::Consumed;
        }

        match key.code {
            KeyCode::Tab | KeyCode::Down | KeyCode::Right => self.move_focus(true),
            KeyCode::BackTab | KeyCode::Up | KeyCode::Left => self.move_focus(false),
            KeyCode::Backspace => {
                if let Some(value) = self.focused_field() {
                    value.pop();
                }
            }
            KeyCode::Enter => self.press(),
            _ => return EventResult::Ignored,
        }
        EventResult::Consumed
    }
}

/// Cancel/Confirm dialog running `on_confirm` after it closes
pub fn confirm_modal(
    message: impl Into<String>,
    on_confirm: impl FnOnce() + 'static,
) -> ModalBuilder {
    let message = message.into();
    Box::new(move |close: ModalCloser| {
        let mut on_confirm = Some(on_confirm);
        Box::new(
            Dialog::new("Confirm")
                .text(message)
                .buttons(["Cancel", "Confirm"])
                .on_done(move |button, _| {
                    close();
                    if button == "Confirm" {
                        if let Some(f) = on_confirm.take() {
                            f();
                        }
                    }
                }),
        ) as Box<dyn ModalContent>
    })
}

/// Input form with Cancel and `submit` buttons
///
/// The form closes on either button; `on_submit` receives the field values
/// after it closed.
pub fn form_modal(
    title: impl Into<String>,
    fields: &[&str],
    submit: &'static str,
    mut on_submit: impl FnMut(&FormValues) + 'static,
) -> ModalBuilder {
    let dialog = fields
        .iter()
        .fold(Dialog::new(title), |dialog, label| dialog.input(*label, ""))
        .buttons(["Cancel", submit]);
    Box::new(move |close: ModalCloser| {
        Box::new(dialog.on_done(move |button, values| {
            close();
            if button == submit {
                on_submit(values);
            }
        })) as Box<dyn ModalContent>
    })
}

/// Error dialog with a single OK button
pub fn error_modal(title: impl Into<String>, message: impl Into<String>) -> ModalBuilder {
    let title = format!("Error: {}", title.into());
    let message = message.into();
    Box::new(move |close: ModalCloser| {
        Box::new(
            Dialog::new(title)
                .text(message)
                .error()
                .buttons(["OK"])
                .on_done(move |_, _| close()),
        ) as Box<dyn ModalContent>
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn type_text(dialog: &mut Dialog, text: &str) {
        for c in text.chars() {
            dialog.handle_key(&KeyEvent::char(c));
        }
    }

    #[test]
    fn test_form_collects_values() {
        let submitted = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&submitted);
        let mut dialog = Dialog::new("New Bucket")
            .input("Region", "")
            .input("Name", "")
            .buttons(["Create", "Cancel"])
            .on_done(move |button, values| {
                *sink.borrow_mut() = Some((button.to_string(), values.clone()));
            });

        type_text(&mut dialog, "eu-west-1");
        dialog.handle_key(&KeyEvent::plain(KeyCode::Tab));
        type_text(&mut dialog, "photoz");
        dialog.handle_key(&KeyEvent::plain(KeyCode::Backspace));
        type_text(&mut dialog, "s");
        dialog.handle_key(&KeyEvent::plain(KeyCode::Tab));
        dialog.handle_key(&KeyEvent::plain(KeyCode::Enter));

        let (button, values) = submitted.borrow_mut().take().unwrap();
        assert_eq!(button, "Create");
        assert_eq!(values["Region"], "eu-west-1");
        assert_eq!(values["Name"], "photos");
    }

    #[test]
    fn test_focus_wraps() {
        let mut dialog = Dialog::new("t").input("A", "").buttons(["OK"]);
        dialog.handle_key(&KeyEvent::plain(KeyCode::BackTab));
        let view = dialog.view();
        assert!(view.buttons[0].focused);
        assert!(!view.fields[0].focused);

        dialog.handle_key(&KeyEvent::plain(KeyCode::Tab));
        assert!(dialog.view().fields[0].focused);
    }

    #[test]
    fn test_enter_in_field_moves_to_buttons() {
        let mut dialog = Dialog::new("t").input("A", "x").buttons(["OK"]);
        dialog.handle_key(&KeyEvent::plain(KeyCode::Enter));
        assert!(dialog.view().buttons[0].focused);
    }

    #[test]
    fn test_confirm_modal() {
        let closed = Rc::new(RefCell::new(0));
        let confirmed = Rc::new(RefCell::new(false));

        let closed_sink = Rc::clone(&closed);
        let confirmed_sink = Rc::clone(&confirmed);
        let builder = confirm_modal("Delete?", move || *confirmed_sink.borrow_mut() = true);
        let closer: ModalCloser = Rc::new(move || *closed_sink.borrow_mut() += 1);
        let mut modal = builder(closer);

        assert_eq!(modal.view().text, "Delete?");
        // focus starts on Cancel
        modal.handle_key(&KeyEvent::plain(KeyCode::Right));
        modal.handle_key(&KeyEvent::plain(KeyCode::Enter));
        assert_eq!(*closed.borrow(), 1);
        assert!(*confirmed.borrow());
    }

    #[test]
    fn test_confirm_modal_cancel() {
        let confirmed = Rc::new(RefCell::new(false));
        let sink = Rc::clone(&confirmed);
        let builder = confirm_modal("Delete?", move || *sink.borrow_mut() = true);
        let closer: ModalCloser = Rc::new(|| {});
        let mut modal = builder(closer);
        modal.handle_key(&KeyEvent::plain(KeyCode::Enter));
        assert!(!*confirmed.borrow());
    }

    #[test]
    fn test_form_modal_submits_after_close() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let closed = Rc::clone(&events);
        let submitted = Rc::clone(&events);
        let builder = form_modal("New Object", &["Name"], "Create", move |values| {
            submitted.borrow_mut().push(format!("submit {}", values["Name"]));
        });
        let closer: ModalCloser = Rc::new(move || closed.borrow_mut().push("close".to_string()));
        let mut modal = builder(closer);

        for c in "a.txt".chars() {
            modal.handle_key(&KeyEvent::char(c));
        }
        modal.handle_key(&KeyEvent::plain(KeyCode::Tab));
        modal.handle_key(&KeyEvent::plain(KeyCode::Tab));
        modal.handle_key(&KeyEvent::plain(KeyCode::Enter));

        assert_eq!(*events.borrow(), vec!["close", "submit a.txt"]);
    }

    #[test]
    fn test_form_modal_cancel() {
        let submitted = Rc::new(RefCell::new(false));
        let sink = Rc::clone(&submitted);
        let builder = form_modal("New Bucket", &["Region", "Name"], "Create", move |_| {
            *sink.borrow_mut() = true;
        });
        let closer: ModalCloser = Rc::new(|| {});
        let mut modal = builder(closer);
        assert_eq!(modal.view().fields.len(), 2);

        modal.handle_key(&KeyEvent::plain(KeyCode::BackTab));
        modal.handle_key(&KeyEvent::plain(KeyCode::BackTab));
        modal.handle_key(&KeyEvent::plain(KeyCode::Enter));
        assert!(!*submitted.borrow());
    }

    #[test]
    fn test_error_modal() {
        let builder = error_modal("Not Found", "bucket not found");
        let closer: ModalCloser = Rc::new(|| {});
        let modal = builder(closer);
        let view = modal.view();
        assert_eq!(view.title, "Error: Not Found");
        assert_eq!(view.text, "bucket not found");
        assert!(view.error);
        assert_eq!(view.buttons.len(), 1);
    }
}
