use gldef_rs::api::{GlDefinitionApi, InMemoryApi, JsonFileApi};
use gldef_rs::app::AppState;
use gldef_rs::config::{default_data_file, load_config, CliArgs};
use gldef_rs::{actions, demo, event, logging, ui, view};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use tracing::{error, info};

fn main() -> Result<()> {
    // Parse command line arguments
    let args = CliArgs::parse();

    // Load configuration
    let mut config = load_config(&args)?;

    if args.debug_config {
        println!("Configuration:");
        println!("{:#?}", config);
        return Ok(());
    }

    logging::init_logging(&config)?;

    let api: Box<dyn GlDefinitionApi> = if args.demo {
        info!("starting with the built-in demo chart");
        Box::new(InMemoryApi::from_snapshot(demo::demo_snapshot(), config.max_depth)?)
    } else {
        let path = match config.data_file.clone() {
            Some(path) => path,
            None => default_data_file()?,
        };
        let api = JsonFileApi::open(&path, config.max_depth)
            .with_context(|| format!("opening data file {}", path.display()))?;
        config.data_file = Some(path);
        Box::new(api)
    };

    // Create application state
    let mut app = AppState::new(config, api);
    app.refresh().context("loading grouping tree")?;

    if args.print {
        if args.expand_all {
            actions::expand_all(&mut app);
        }
        print!("{}", view::outline(&app.tree, &app.expansion));
        return Ok(());
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Clear the terminal
    terminal.clear()?;

    // Run the main loop
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    // Handle any errors from the main loop
    if let Err(err) = res {
        error!(%err, "event loop failed");
        eprintln!("Error: {}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut AppState,
) -> Result<()> {
    while app.running {
        // Draw the UI
        terminal.draw(|frame| ui::render(frame, app))?;

        // Handle events
        if let Some(action) = event::handle_events(app)? {
            // Any key or click dismisses the previous notification.
            app.clear_message();
            actions::execute_action(action, app)?;
        }

        // Send whatever the last action queued
        actions::dispatch_pending(app);
    }

    Ok(())
}
