//! GTK4/libadwaita front end. Widgets only mirror the controller; every
//! timer it needs is a glib source.

mod app;
mod board;
mod dialogs;
mod hud;
mod scene;
mod state;

pub use app::run;
