use gtk::prelude::*;
use gtk::{Box as GtkBox, Button, Entry, Label, Orientation};
use gtk::glib;
use gtk::glib::source::Continue;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

/// Creates a box with consistent margins
pub fn create_padded_box(orientation: Orientation, spacing: i32) -> GtkBox {
    let box_widget = GtkBox::new(orientation, spacing);
    box_widget.set_margin_start(16);
    box_widget.set_margin_end(16);
    box_widget.set_margin_top(16);
    box_widget.set_margin_bottom(16);

    box_widget
}

/// Creates a button with consistent styling
pub fn create_button(label: &str, is_primary: bool, is_destructive: bool) -> Button {
    let button = Button::with_label(label);

    if is_primary {
        button.add_css_class("suggested-action");
    }

    if is_destructive {
        button.add_css_class("destructive-action");
    }

    button
}

/// Helper to create a standard form field
pub fn create_form_field(label_text: &str, placeholder: Option<&str>) -> (GtkBox, Entry) {
    let field_box = GtkBox::new(Orientation::Horizontal, 10);

    let label = Label::new(Some(label_text));
    label.set_halign(gtk::Align::Start);
    label.set_width_chars(15);

    let entry = Entry::new();
    entry.set_hexpand(true);

    if let Some(placeholder_text) = placeholder {
        entry.set_placeholder_text(Some(placeholder_text));
    }

    field_box.append(&label);
    field_box.append(&entry);

    (field_box, entry)
}

/// Helper to run a task in the background and update UI when done
pub fn spawn_local_task<F, Fut>(task: F)
where
    F: FnOnce() -> Fut + 'static,
    Fut: std::future::Future<Output = ()> + 'static,
{
    let context = glib::MainContext::default();
    context.spawn_local(async move {
        task().await;
    });
}

/// A label whose text expires after a fixed delay.
///
/// Each `flash` cancels the previous clear timer before arming a new one, so
/// the last message always gets its full time on screen.
#[derive(Clone)]
pub struct TransientLabel {
    label: Label,
    pending: Rc<RefCell<Option<glib::SourceId>>>,
}

impl TransientLabel {
    pub fn new() -> Self {
        let label = Label::new(None);
        label.add_css_class("notification-label");

        TransientLabel {
            label,
            pending: Rc::new(RefCell::new(None)),
        }
    }

    pub fn widget(&self) -> &Label {
        &self.label
    }

    /// Show `text`, clearing it again after `linger`.
    pub fn flash(&self, text: &str, linger: Duration) {
        if let Some(source) = self.pending.borrow_mut().take() {
            source.remove();
        }

        self.label.set_text(text);

        let label = self.label.clone();
        let pending = self.pending.clone();
        let source = glib::source::timeout_add_local(linger, move || {
            label.set_text("");
            *pending.borrow_mut() = None;
            Continue(false)
        });
        *self.pending.borrow_mut() = Some(source);
    }

    /// Clear the label immediately, cancelling any pending timer.
    pub fn clear(&self) {
        if let Some(source) = self.pending.borrow_mut().take() {
            source.remove();
        }
        self.label.set_text("");
    }
}
