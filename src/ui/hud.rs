use std::cell::RefCell;
use std::rc::Rc;

use gtk4::glib;
use gtk4::prelude::*;

use super::app::sync_view;
use super::state::AppState;
use crate::game::{RoundStatus, TICK_INTERVAL, Tick};

pub(super) fn update_hud(st: &AppState) {
    let game = &st.game;
    if let Some(label) = &st.turns_label {
        label.set_text(&format!("Turns: {}", game.turns()));
    }
    if let Some(label) = &st.time_label {
        label.set_text(&format!("Time left: {} seconds", game.time_left()));
        if game.time_left() <= 5 && game.status() == RoundStatus::Playing {
            label.add_css_class("time-low");
        } else {
            label.remove_css_class("time-low");
        }
    }
    if let Some(label) = &st.score_label {
        label.set_text(&format!("Score: {}", game.score()));
    }
    if let Some(subtitle) = &st.title_game_subtitle {
        let secs = game.time_left();
        subtitle.set_text(&format!(
            "{} | {:02}:{:02}",
            game.difficulty().name(),
            secs / 60,
            secs % 60
        ));
    }
    for (difficulty, button) in &st.difficulty_buttons {
        if *difficulty == game.difficulty() {
            button.add_css_class("suggested-action");
        } else {
            button.remove_css_class("suggested-action");
        }
    }
}

pub(super) fn update_banner(st: &AppState) {
    let (show, title, message) = match st.game.status() {
        RoundStatus::Won => (true, "Congratulations!", "You have won the game!"),
        RoundStatus::TimedOut => (true, "Time's up!", "Start a new game to try again."),
        RoundStatus::Playing => (false, "", ""),
    };
    if let Some(label) = &st.banner_title_label {
        label.set_text(title);
    }
    if let Some(label) = &st.banner_message_label {
        label.set_text(message);
    }
    if let Some(banner) = &st.banner {
        banner.set_reveal_child(show);
    }
}

pub(super) fn stop_timer(st: &mut AppState) {
    if let Some(handle) = st.timer_handle.take() {
        handle.remove();
    }
}

pub(super) fn start_timer(state: &Rc<RefCell<AppState>>) {
    let mut st = state.borrow_mut();
    stop_timer(&mut st);

    let state_clone = state.clone();
    let handle = glib::timeout_add_local(TICK_INTERVAL, move || {
        let tick = state_clone.borrow_mut().game.tick();
        match tick {
            Tick::Idle => glib::ControlFlow::Continue,
            Tick::Counted { .. } => {
                update_hud(&state_clone.borrow());
                glib::ControlFlow::Continue
            }
            Tick::Restarted => {
                sync_view(&state_clone, false);
                glib::ControlFlow::Continue
            }
            Tick::Expired => {
                // The source ends itself by returning Break.
                state_clone.borrow_mut().timer_handle = None;
                sync_view(&state_clone, false);
                glib::ControlFlow::Break
            }
        }
    });
    st.timer_handle = Some(handle);
}
