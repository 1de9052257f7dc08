use std::time::Duration;

use anyhow::Result;

mod app;
mod config;
mod error;
mod handler;
mod openai;
mod session;
mod tui;
mod ui;

use app::App;
use config::Config;
use openai::OpenAIClient;

/// The TUI owns the terminal, so logs go to a file under the user data
/// dir, and only when `RUST_LOG` asks for them.
fn init_logging() -> Result<()> {
    use std::sync::Arc;
    use tracing_subscriber::EnvFilter;

    if std::env::var("RUST_LOG").is_err() {
        return Ok(());
    }

    let dir = dirs::data_local_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?
        .join("chatter");
    std::fs::create_dir_all(&dir)?;
    let file = std::fs::File::create(dir.join("chatter.log"))?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging()?;

    let config = Config::load().unwrap_or_default();
    // Injected here so a missing credential is a submit-time notice, not a
    // startup failure.
    let client = config
        .api_key()
        .map(|key| OpenAIClient::new(&config.api_url(), &key));

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut events = tui::EventHandler::new(Duration::from_millis(300));
    let mut app = App::new(client);

    while !app.should_quit {
        terminal.draw(|frame| ui::render(&mut app, frame))?;

        match events.next().await {
            Some(event) => handler::handle_event(&mut app, event),
            None => break,
        }
        app.poll_response().await;
    }

    tui::restore()?;
    Ok(())
}
