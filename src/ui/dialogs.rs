use gtk4 as gtk;
use libadwaita as adw;

use adw::prelude::*;

pub fn show_instructions_dialog(app: &adw::Application) -> adw::AlertDialog {
    let dialog = adw::AlertDialog::new(
        Some("Instructions"),
        Some(
            "Flip two cards per turn and find every matching pair.\n\
Each pair is worth 3 points.\n\
Clear the board before the clock runs out.",
        ),
    );
    dialog.add_response("ok", "Got it");
    dialog.set_default_response(Some("ok"));
    dialog.set_close_response("ok");
    dialog.present(app.active_window().as_ref());
    dialog
}

pub fn show_about_dialog(app: &adw::Application) -> adw::AboutDialog {
    let dialog = adw::AboutDialog::builder()
        .application_name("Magic Match")
        .application_icon("applications-games-symbolic")
        .version(env!("CARGO_PKG_VERSION"))
        .comments("A memory game against the clock.")
        .build();
    dialog.add_legal_section("Magic Match", None, gtk::License::MitX11, None);
    dialog.present(app.active_window().as_ref());
    dialog
}
