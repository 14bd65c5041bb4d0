use std::cell::RefCell;
use std::rc::Rc;

use gtk4 as gtk;
use gtk4::prelude::*;

use super::board::build_board_grid;
use super::state::AppState;

pub(super) fn rebuild_board(state: &Rc<RefCell<AppState>>) {
    let board_container = state.borrow().board_container.clone();
    let Some(board_container) = board_container else {
        return;
    };

    while let Some(child) = board_container.first_child() {
        board_container.remove(&child);
    }
    let grid = build_board_grid(state);
    let (grid_cols, grid_rows) = {
        let st = state.borrow();
        (st.grid_cols(), st.grid_rows())
    };
    let grid_ratio = if grid_rows > 0 {
        grid_cols as f32 / grid_rows as f32
    } else {
        1.0
    };
    let grid_frame = gtk::AspectFrame::new(0.5, 0.5, grid_ratio, false);
    grid_frame.set_halign(gtk::Align::Fill);
    grid_frame.set_valign(gtk::Align::Fill);
    grid_frame.set_hexpand(true);
    grid_frame.set_vexpand(true);
    grid_frame.set_child(Some(&grid));
    board_container.append(&grid_frame);
}

pub(super) fn build_banner(state: &Rc<RefCell<AppState>>) -> gtk::Revealer {
    let revealer = gtk::Revealer::builder()
        .transition_type(gtk::RevealerTransitionType::Crossfade)
        .transition_duration(300)
        .halign(gtk::Align::Center)
        .valign(gtk::Align::Center)
        .can_target(false)
        .build();

    let content = gtk::Box::new(gtk::Orientation::Vertical, 8);
    content.add_css_class("victory-card");
    content.set_margin_top(24);
    content.set_margin_bottom(24);
    content.set_margin_start(28);
    content.set_margin_end(28);

    let title = gtk::Label::new(None);
    title.add_css_class("victory-title");
    title.add_css_class("title-1");

    let message = gtk::Label::new(None);
    message.add_css_class("victory-message");
    message.add_css_class("body");
    message.set_wrap(true);
    message.set_justify(gtk::Justification::Center);
    message.set_max_width_chars(36);

    content.append(&title);
    content.append(&message);
    revealer.set_child(Some(&content));

    {
        let mut st = state.borrow_mut();
        st.banner = Some(revealer.clone());
        st.banner_title_label = Some(title);
        st.banner_message_label = Some(message);
    }

    revealer
}
