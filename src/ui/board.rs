use std::cell::RefCell;
use std::rc::Rc;

use gtk4 as gtk;
use gtk4::pango;
use gtk4::prelude::*;

use super::app::handle_card_click;
use super::state::AppState;

pub const CONTENT_MARGIN: i32 = 12;
pub const CARD_GAP: i32 = 8;

pub fn build_board_grid(state: &Rc<RefCell<AppState>>) -> gtk::Grid {
    let grid = gtk::Grid::new();
    grid.add_css_class("match-board");
    grid.set_row_spacing(CARD_GAP as u32);
    grid.set_column_spacing(CARD_GAP as u32);
    grid.set_halign(gtk::Align::Fill);
    grid.set_valign(gtk::Align::Fill);
    grid.set_hexpand(true);
    grid.set_vexpand(true);

    let (css_provider, grid_cols, grid_rows, card_ids) = {
        let st = state.borrow();
        (
            st.dynamic_css_provider.clone(),
            st.grid_cols(),
            st.grid_rows(),
            st.game.board().iter().map(|card| card.id).collect::<Vec<_>>(),
        )
    };

    let update_styles = move |grid: &gtk::Grid| {
        let width = grid.width();
        let height = grid.height();
        if width <= 0 || height <= 0 {
            return;
        }
        let cell_width = (width - (grid_cols - 1) * CARD_GAP) / grid_cols;
        let cell_height = (height - (grid_rows - 1) * CARD_GAP) / grid_rows.max(1);
        let card_radius = (cell_width.min(cell_height) as f64 * 0.12) as i32;
        if let Some(provider) = &css_provider {
            provider.load_from_data(&format!(
                ".match-card {{ border-radius: {card_radius}px; }}"
            ));
        }
    };

    let update_styles_clone = update_styles.clone();
    grid.connect_closure(
        "notify::width",
        false,
        glib::closure_local!(move |grid: gtk::Grid, _: glib::ParamSpec| {
            update_styles_clone(&grid);
        }),
    );
    grid.connect_closure(
        "notify::height",
        false,
        glib::closure_local!(move |grid: gtk::Grid, _: glib::ParamSpec| {
            update_styles(&grid);
        }),
    );

    let mut buttons = Vec::with_capacity(card_ids.len());

    for (index, card_id) in card_ids.into_iter().enumerate() {
        let aspect_frame = gtk::AspectFrame::builder()
            .ratio(1.0)
            .obey_child(false)
            .halign(gtk::Align::Fill)
            .valign(gtk::Align::Fill)
            .hexpand(true)
            .vexpand(true)
            .build();

        let button = gtk::Button::builder()
            .css_classes(vec!["match-card"])
            .hexpand(true)
            .vexpand(true)
            .build();

        let drawing_area = gtk::DrawingArea::builder()
            .hexpand(true)
            .vexpand(true)
            .build();
        drawing_area.add_css_class("match-card-face");

        let state_draw = state.clone();
        drawing_area.set_draw_func(move |area, cr, width, height| {
            let st = state_draw.borrow();
            let Some(card) = st.game.board().get(index) else {
                return;
            };
            let face_up = st.game.is_flipped(card);
            let text = if face_up { card.symbol.glyph() } else { "?" };

            let min_dim = width.min(height) as f64;
            let font_size = if face_up { min_dim * 0.42 } else { min_dim * 0.34 };

            cr.set_antialias(cairo::Antialias::Best);

            let layout = pangocairo::functions::create_layout(cr);
            let mut font_desc = pango::FontDescription::new();
            if face_up {
                font_desc.set_family("Noto Color Emoji, Apple Color Emoji, Segoe UI Emoji, sans");
            } else {
                font_desc.set_family("Cantarell, Noto Sans, sans");
                font_desc.set_weight(pango::Weight::Bold);
            }
            font_desc.set_size((font_size * pango::SCALE as f64) as i32);
            layout.set_font_description(Some(&font_desc));
            layout.set_text(text);

            let fg = area.style_context().color();
            cr.set_source_rgba(
                fg.red() as f64,
                fg.green() as f64,
                fg.blue() as f64,
                fg.alpha() as f64,
            );

            let (text_width, text_height) = layout.pixel_size();
            cr.move_to(
                (width as f64 - text_width as f64) / 2.0,
                (height as f64 - text_height as f64) / 2.0,
            );

            pangocairo::functions::show_layout(cr, &layout);
        });

        button.set_child(Some(&drawing_area));

        let state_click = state.clone();
        button.connect_clicked(move |_| {
            handle_card_click(&state_click, card_id);
        });

        aspect_frame.set_child(Some(&button));

        let i = index as i32;
        grid.attach(&aspect_frame, i % grid_cols, i / grid_cols, 1, 1);
        buttons.push(button);
    }

    state.borrow_mut().grid_buttons = buttons;

    grid
}

/// Mirrors face-up and matched state onto the card buttons.
pub fn refresh_cards(st: &AppState) {
    for (button, card) in st.grid_buttons.iter().zip(st.game.board()) {
        if card.matched {
            button.add_css_class("matched");
            button.remove_css_class("active");
        } else if st.game.is_flipped(card) {
            button.add_css_class("active");
            button.remove_css_class("matched");
        } else {
            button.remove_css_class("active");
            button.remove_css_class("matched");
        }
        if let Some(child) = button.child() {
            child.queue_draw();
        }
    }
}
