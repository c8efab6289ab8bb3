mod clipboard;
mod config;
mod translator;
mod ui_helpers;

use gtk::prelude::*;
use gtk::{Application, ApplicationWindow, Box as GtkBox, Button, Entry, Frame};
use gtk::{Orientation, ScrolledWindow, TextBuffer, TextView};
use tokio::runtime::Runtime;
use tracing::{error, info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use config::Config;
use translator::Translator;
use ui_helpers::*;

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

const WINDOW_TITLE: &str = "Polyglot";
const APP_ID: &str = "org.polyglot.app";

/// How long a notification stays on screen before it clears itself.
const NOTIFICATION_LINGER: Duration = Duration::from_secs(3);

/// Structure to hold all the shared state and reduce cloning
struct AppState {
    translator: Translator,
    source_entry: Entry,
    target_entry: Entry,
    input_buffer: TextBuffer,
    output_buffer: TextBuffer,
    translate_button: Button,
    notification: TransientLabel,
}

impl AppState {
    fn input_text(&self) -> String {
        self.input_buffer
            .text(
                &self.input_buffer.start_iter(),
                &self.input_buffer.end_iter(),
                false,
            )
            .to_string()
    }

    fn output_text(&self) -> String {
        self.output_buffer
            .text(
                &self.output_buffer.start_iter(),
                &self.output_buffer.end_iter(),
                false,
            )
            .to_string()
    }
}

/// Gather the form fields and run one translation round trip.
///
/// The network call is dispatched onto the main loop, so the window stays
/// responsive; only the Translate button is disabled until the call settles.
fn perform_translation(app_state: &Rc<RefCell<AppState>>) {
    // The service accepts empty fields verbatim, so no validation happens
    // here.
    let (source, target, text) = {
        let state = app_state.borrow();
        (
            state.source_entry.text().to_string(),
            state.target_entry.text().to_string(),
            state.input_text(),
        )
    };

    {
        let state = app_state.borrow();
        state.output_buffer.set_text("Translating...");
        state.translate_button.set_sensitive(false);
    }

    let app_state_clone = app_state.clone();
    spawn_local_task(move || async move {
        let result = {
            let state = app_state_clone.borrow();
            state.translator.translate(&source, &target, &text).await
        };

        // A failed request is shown in the result region; the interface
        // stays usable for another attempt.
        let state = app_state_clone.borrow();
        match result {
            Ok(translation) => state.output_buffer.set_text(&translation),
            Err(e) => {
                warn!("translation failed: {}", e);
                state
                    .output_buffer
                    .set_text(&format!("Translation error: {}", e));
            }
        }
        state.translate_button.set_sensitive(true);
    });
}

/// Builds the GTK user interface and wires the three form actions.
fn build_ui(app: &Application, translator: Translator) {
    let window = ApplicationWindow::builder()
        .application(app)
        .title(WINDOW_TITLE)
        .default_width(700)
        .default_height(560)
        .build();

    let root = create_padded_box(Orientation::Vertical, 16);

    // Language entries
    let lang_frame = Frame::new(Some("Languages"));

    let lang_box = GtkBox::new(Orientation::Vertical, 8);
    lang_box.set_margin_start(16);
    lang_box.set_margin_end(16);
    lang_box.set_margin_top(16);
    lang_box.set_margin_bottom(16);

    let (source_row, source_entry) = create_form_field("Source language", Some("e.g. French"));
    let (target_row, target_entry) = create_form_field("Target language", Some("e.g. English"));
    lang_box.append(&source_row);
    lang_box.append(&target_row);

    lang_frame.set_child(Some(&lang_box));
    root.append(&lang_frame);

    // Input text area
    let input_frame = Frame::new(Some("Text to Translate"));
    input_frame.set_vexpand(true);

    let input_scroll = ScrolledWindow::new();
    input_scroll.set_vexpand(true);
    input_scroll.set_hexpand(true);

    let input_buffer = TextBuffer::new(None);
    let input_view = TextView::with_buffer(&input_buffer);
    input_view.set_wrap_mode(gtk::WrapMode::Word);
    input_view.add_css_class("text-area");
    input_scroll.set_child(Some(&input_view));
    input_frame.set_child(Some(&input_scroll));

    root.append(&input_frame);

    // Action buttons
    let button_box = GtkBox::new(Orientation::Horizontal, 8);
    button_box.set_halign(gtk::Align::End);

    let translate_button = create_button("Translate", true, false);
    let copy_button = create_button("Copy", false, false);
    let reset_button = create_button("Reset", false, true);

    button_box.append(&translate_button);
    button_box.append(&copy_button);
    button_box.append(&reset_button);

    root.append(&button_box);

    // Result area
    let output_frame = Frame::new(Some("Translation"));
    output_frame.set_vexpand(true);

    let output_scroll = ScrolledWindow::new();
    output_scroll.set_vexpand(true);
    output_scroll.set_hexpand(true);

    let output_buffer = TextBuffer::new(None);
    let output_view = TextView::with_buffer(&output_buffer);
    output_view.set_wrap_mode(gtk::WrapMode::Word);
    output_view.set_editable(false);
    output_view.set_cursor_visible(false);
    output_view.add_css_class("text-area");
    output_view.add_css_class("output-area");
    output_scroll.set_child(Some(&output_view));
    output_frame.set_child(Some(&output_scroll));

    root.append(&output_frame);

    // Notification region at the bottom
    let notification = TransientLabel::new();
    root.append(notification.widget());

    window.set_child(Some(&root));

    let app_state = Rc::new(RefCell::new(AppState {
        translator,
        source_entry,
        target_entry,
        input_buffer,
        output_buffer,
        translate_button: translate_button.clone(),
        notification,
    }));

    // Connect translate button signal
    let app_state_clone = app_state.clone();
    translate_button.connect_clicked(move |_| {
        perform_translation(&app_state_clone);
    });

    // Connect copy button
    let app_state_clone = app_state.clone();
    copy_button.connect_clicked(move |_| {
        let (text, notification) = {
            let state = app_state_clone.borrow();
            (state.output_text(), state.notification.clone())
        };

        if text.is_empty() || text == "Translating..." {
            notification.flash("Nothing to copy", NOTIFICATION_LINGER);
            return;
        }

        if clipboard::set_clipboard_text(&text) {
            notification.flash("Copied to clipboard!", NOTIFICATION_LINGER);
        } else {
            notification.flash("Failed to copy to clipboard", NOTIFICATION_LINGER);
        }
    });

    // Connect reset button
    let app_state_clone = app_state.clone();
    reset_button.connect_clicked(move |_| {
        let state = app_state_clone.borrow();
        state.source_entry.set_text("");
        state.target_entry.set_text("");
        state.input_buffer.set_text("");
        state.output_buffer.set_text("");
        state.notification.clear();
    });

    window.present();
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{}=info", env!("CARGO_PKG_NAME")).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Both failures are fatal: no request can be authorized without the
    // credential, so there is nothing useful to show.
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            error!("could not load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let credential = match config.load_credential() {
        Ok(credential) => credential,
        Err(e) => {
            error!("could not load the API credential: {}", e);
            std::process::exit(1);
        }
    };
    info!("credential loaded, starting interface");

    let app = Application::builder().application_id(APP_ID).build();

    // Create a Tokio runtime for async tasks.
    let rt = Runtime::new().expect("Unable to create Runtime");
    let _enter = rt.enter();

    app.connect_activate(move |app| {
        build_ui(app, Translator::new(credential.clone()));
    });

    app.run();
}
