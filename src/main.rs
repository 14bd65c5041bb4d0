use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use magic_match::config::{Cli, load_settings};

fn main() -> glib::ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    let settings = match load_settings(&cli) {
        Ok(settings) => settings,
        Err(err) => {
            error!(error = %err, "failed to load settings");
            return glib::ExitCode::FAILURE;
        }
    };

    magic_match::ui::run(settings)
}
