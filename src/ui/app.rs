use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Once;

use adw::prelude::*;
use gio::SimpleAction;
use gtk4 as gtk;
use gtk4::glib;
use gtk4::prelude::*;
use libadwaita as adw;
use tracing::{debug, info, warn};

use super::board::{CONTENT_MARGIN, refresh_cards};
use super::dialogs::{show_about_dialog, show_instructions_dialog};
use super::hud::{start_timer, stop_timer, update_banner, update_hud};
use super::scene::{build_banner, rebuild_board};
use super::state::AppState;
use crate::config::Settings;
use crate::game::{CardId, Difficulty, GameController, ScheduledTask, Selection, TaskOutcome};

const APP_ID: &str = "io.github.magicmatch.MagicMatch";

pub fn run(settings: Settings) -> glib::ExitCode {
    glib::set_prgname(Some(APP_ID));
    let app = adw::Application::builder().application_id(APP_ID).build();

    app.connect_activate(move |app| {
        load_css();

        let state = Rc::new(RefCell::new(AppState::new(GameController::from_settings(
            &settings,
        ))));

        let instructions_action = SimpleAction::new("instructions", None);
        instructions_action.connect_activate({
            let app = app.clone();
            move |_, _| {
                show_instructions_dialog(&app);
            }
        });
        app.add_action(&instructions_action);

        let about_action = SimpleAction::new("about", None);
        about_action.connect_activate({
            let app = app.clone();
            move |_, _| {
                show_about_dialog(&app);
            }
        });
        app.add_action(&about_action);

        let new_game_action = SimpleAction::new("new-game", None);
        new_game_action.connect_activate({
            let state = state.clone();
            move |_, _| {
                restart_game(&state);
            }
        });
        app.add_action(&new_game_action);
        app.set_accels_for_action("app.new-game", &["<Control>n"]);

        let quit_action = SimpleAction::new("quit", None);
        quit_action.connect_activate({
            let app = app.clone();
            move |_, _| app.quit()
        });
        app.add_action(&quit_action);
        app.set_accels_for_action("app.quit", &["<Control>q"]);

        let dynamic_css_provider = gtk::CssProvider::new();
        if let Some(display) = gtk::gdk::Display::default() {
            gtk::style_context_add_provider_for_display(
                &display,
                &dynamic_css_provider,
                gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
            );
        }

        let title_game_box = gtk::Box::new(gtk::Orientation::Vertical, 0);
        title_game_box.set_valign(gtk::Align::Center);
        title_game_box.set_halign(gtk::Align::Center);
        title_game_box.set_hexpand(true);

        let title_game_main = gtk::Label::builder()
            .label("Magic Match")
            .halign(gtk::Align::Center)
            .css_classes(vec!["game-title-main"])
            .build();

        let title_game_subtitle = gtk::Label::builder()
            .label("")
            .halign(gtk::Align::Center)
            .css_classes(vec!["game-title-subtitle", "caption"])
            .build();

        title_game_box.append(&title_game_main);
        title_game_box.append(&title_game_subtitle);

        let header = adw::HeaderBar::builder()
            .title_widget(&title_game_box)
            .build();
        header.add_css_class("app-header");
        header.add_css_class("flat");

        let menu_model = gio::Menu::new();
        menu_model.append(Some("New Game"), Some("app.new-game"));
        menu_model.append(Some("Instructions"), Some("app.instructions"));
        menu_model.append(Some("About Magic Match"), Some("app.about"));
        menu_model.append(Some("Quit"), Some("app.quit"));
        let menu_button = gtk::MenuButton::builder()
            .icon_name("open-menu-symbolic")
            .menu_model(&menu_model)
            .build();

        let restart_button = gtk::Button::builder()
            .icon_name("view-refresh-symbolic")
            .action_name("app.new-game")
            .build();
        restart_button.set_tooltip_text(Some("New Game"));

        let end_box = gtk::Box::new(gtk::Orientation::Horizontal, 6);
        end_box.append(&restart_button);
        end_box.append(&menu_button);
        header.pack_end(&end_box);

        {
            let mut st = state.borrow_mut();
            st.header = Some(header.clone());
            st.title_game_subtitle = Some(title_game_subtitle);
            st.dynamic_css_provider = Some(dynamic_css_provider);
        }

        let game_view = build_game_view(&state);

        let toolbar = adw::ToolbarView::new();
        toolbar.set_hexpand(true);
        toolbar.set_vexpand(true);
        toolbar.add_top_bar(&header);
        toolbar.set_content(Some(&game_view));

        let win = adw::ApplicationWindow::builder()
            .application(app)
            .title("Magic Match")
            .default_width(760)
            .default_height(640)
            .content(&toolbar)
            .build();
        win.set_size_request(360, 520);
        win.add_css_class("app-window");

        let style_manager = adw::StyleManager::default();
        if style_manager.is_dark() {
            win.add_css_class("theme-dark");
        } else {
            win.add_css_class("theme-light");
        }
        style_manager.connect_notify_local(Some("dark"), {
            let win = win.clone();
            move |manager, _| {
                if manager.is_dark() {
                    win.remove_css_class("theme-light");
                    win.add_css_class("theme-dark");
                } else {
                    win.remove_css_class("theme-dark");
                    win.add_css_class("theme-light");
                }
            }
        });

        win.connect_close_request({
            let state = state.clone();
            move |_| {
                stop_timer(&mut state.borrow_mut());
                gtk::glib::Propagation::Proceed
            }
        });

        sync_view(&state, true);
        win.present();
    });

    // Flags were already consumed by clap; keep GApplication from re-parsing them.
    app.run_with_args(&[APP_ID])
}

fn load_css() {
    static RESOURCES_INIT: Once = Once::new();
    RESOURCES_INIT.call_once(|| {
        if let Err(err) = gio::resources_register_include!("magic-match.gresource") {
            warn!(%err, "failed to register embedded resources");
        }
    });

    let Some(display) = gtk::gdk::Display::default() else {
        return;
    };

    let provider = gtk::CssProvider::new();
    provider.load_from_resource("/io/github/magicmatch/MagicMatch/style.css");
    gtk::style_context_add_provider_for_display(
        &display,
        &provider,
        gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
    );
}

fn build_difficulty_row(state: &Rc<RefCell<AppState>>) -> gtk::Box {
    let row = gtk::Box::new(gtk::Orientation::Horizontal, 8);
    row.set_halign(gtk::Align::Center);
    row.add_css_class("difficulty-row");

    let mut buttons = Vec::with_capacity(Difficulty::ALL.len());
    for difficulty in Difficulty::ALL {
        let button = gtk::Button::with_label(difficulty.name());
        button.add_css_class("difficulty-button");
        button.connect_clicked({
            let state = state.clone();
            move |_| {
                apply_difficulty_change(&state, difficulty);
            }
        });
        row.append(&button);
        buttons.push((difficulty, button));
    }

    let new_game = gtk::Button::with_label("New Game");
    new_game.add_css_class("pill");
    new_game.set_action_name(Some("app.new-game"));
    row.append(&new_game);

    state.borrow_mut().difficulty_buttons = buttons;
    row
}

fn build_stats_row(state: &Rc<RefCell<AppState>>) -> gtk::Box {
    let row = gtk::Box::new(gtk::Orientation::Horizontal, 24);
    row.set_halign(gtk::Align::Center);
    row.add_css_class("stats-row");

    let turns = gtk::Label::new(None);
    let time = gtk::Label::new(None);
    let score = gtk::Label::new(None);
    for label in [&turns, &time, &score] {
        label.add_css_class("stat-label");
        label.add_css_class("numeric");
        row.append(label);
    }

    let mut st = state.borrow_mut();
    st.turns_label = Some(turns);
    st.time_label = Some(time);
    st.score_label = Some(score);
    row
}

fn build_game_view(state: &Rc<RefCell<AppState>>) -> gtk::Box {
    let root = gtk::Box::new(gtk::Orientation::Vertical, 12);
    root.set_hexpand(true);
    root.set_vexpand(true);
    root.add_css_class("game-root");
    root.set_margin_top(CONTENT_MARGIN);
    root.set_margin_bottom(CONTENT_MARGIN);
    root.set_margin_start(CONTENT_MARGIN);
    root.set_margin_end(CONTENT_MARGIN);

    root.append(&build_difficulty_row(state));

    let board_card = gtk::Box::new(gtk::Orientation::Vertical, 0);
    board_card.set_halign(gtk::Align::Fill);
    board_card.set_valign(gtk::Align::Fill);
    board_card.set_hexpand(true);
    board_card.set_vexpand(true);
    board_card.add_css_class("match-card-container");

    let overlay = gtk::Overlay::new();
    overlay.set_hexpand(true);
    overlay.set_vexpand(true);
    overlay.set_child(Some(&board_card));
    overlay.add_overlay(&build_banner(state));
    root.append(&overlay);

    root.append(&build_stats_row(state));

    state.borrow_mut().board_container = Some(board_card);
    root
}

/// Brings widgets in line with the controller. A new round gets a fresh grid
/// and, when `restart_clock` is set, a fresh one-second tick source.
pub(super) fn sync_view(state: &Rc<RefCell<AppState>>, restart_clock: bool) {
    let round_changed = {
        let st = state.borrow();
        st.rendered_round != Some(st.game.round())
    };

    if round_changed {
        rebuild_board(state);
        let mut st = state.borrow_mut();
        let round = st.game.round();
        st.rendered_round = Some(round);
        debug!(round = round.0, "board rebuilt");
    }
    if round_changed && restart_clock {
        start_timer(state);
    }

    let st = state.borrow();
    refresh_cards(&st);
    update_hud(&st);
    update_banner(&st);
}

fn schedule_task(state: &Rc<RefCell<AppState>>, task: ScheduledTask) {
    let state_task = state.clone();
    glib::timeout_add_local_once(task.delay, move || {
        let outcome = state_task.borrow_mut().game.run_task(task);
        if outcome != TaskOutcome::Stale {
            sync_view(&state_task, true);
        }
    });
}

pub fn handle_card_click(state: &Rc<RefCell<AppState>>, id: CardId) {
    let selection = state.borrow_mut().game.select_card(id);

    match selection {
        Selection::Ignored(reason) => {
            debug!(card = id.0, ?reason, "selection ignored");
            return;
        }
        Selection::FirstChoice => {}
        Selection::Matched { victory, .. } => {
            if let Some(restart) = victory {
                stop_timer(&mut state.borrow_mut());
                schedule_task(state, restart);
            }
        }
        Selection::Mismatched { clear } => schedule_task(state, clear),
    }

    sync_view(state, true);
}

fn restart_game(state: &Rc<RefCell<AppState>>) {
    let round = state.borrow_mut().game.new_game();
    info!(round = round.0, "new game requested");
    sync_view(state, true);
}

pub(super) fn apply_difficulty_change(state: &Rc<RefCell<AppState>>, difficulty: Difficulty) {
    let round = state.borrow_mut().game.change_difficulty(difficulty);
    info!(round = round.0, %difficulty, "difficulty changed");
    sync_view(state, true);
}
