use gtk4 as gtk;
use libadwaita as adw;

use crate::game::{Difficulty, GameController, RoundId};

pub struct AppState {
    pub header: Option<adw::HeaderBar>,
    pub title_game_subtitle: Option<gtk::Label>,
    pub turns_label: Option<gtk::Label>,
    pub time_label: Option<gtk::Label>,
    pub score_label: Option<gtk::Label>,
    pub banner: Option<gtk::Revealer>,
    pub banner_title_label: Option<gtk::Label>,
    pub banner_message_label: Option<gtk::Label>,
    pub board_container: Option<gtk::Box>,
    pub dynamic_css_provider: Option<gtk::CssProvider>,
    pub difficulty_buttons: Vec<(Difficulty, gtk::Button)>,

    // Game state
    pub game: GameController,
    pub grid_buttons: Vec<gtk::Button>,
    pub rendered_round: Option<RoundId>,
    pub timer_handle: Option<glib::SourceId>,
}

impl AppState {
    pub fn new(game: GameController) -> Self {
        AppState {
            header: None,
            title_game_subtitle: None,
            turns_label: None,
            time_label: None,
            score_label: None,
            banner: None,
            banner_title_label: None,
            banner_message_label: None,
            board_container: None,
            dynamic_css_provider: None,
            difficulty_buttons: Vec::new(),
            game,
            grid_buttons: Vec::new(),
            rendered_round: None,
            timer_handle: None,
        }
    }

    /// Columns of the card grid for the current board.
    pub fn grid_cols(&self) -> i32 {
        if self.game.board().len() > 12 { 7 } else { 4 }
    }

    pub fn grid_rows(&self) -> i32 {
        let cols = self.grid_cols() as usize;
        self.game.board().len().div_ceil(cols) as i32
    }
}
