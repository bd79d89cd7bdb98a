use anyhow::Context;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, read},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::{LevelFilter, info};
use pine::cli;
use pine::config::EditorConfig;
use pine::editor::Editor;
use pine::ui::TuiRenderer;
use std::fs::OpenOptions;

/// Application entry point: parse command-line arguments, load the config
/// file, set up logging and the terminal, run the event loop, and restore
/// the terminal on exit.
fn main() -> anyhow::Result<()> {
    let cli_args = cli::parse_args();

    // A broken config is reported before the terminal switches to raw mode
    let mut config = EditorConfig::load().unwrap_or_else(|err| {
        eprintln!("pine: {}, using defaults", err);
        EditorConfig::default()
    });
    config.debug = cli_args.debug;

    init_logger(&config);

    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = std::io::stdout();
    crossterm::execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let result = run(&cli_args, config);

    crossterm::execute!(stdout, DisableMouseCapture, LeaveAlternateScreen)?;
    disable_raw_mode()?;
    result
}

/// Log to the configured file; the terminal itself is busy drawing.
/// Logging is switched off when the file cannot be opened.
fn init_logger(config: &EditorConfig) {
    let level = if config.debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    let path = config.log_path();
    match OpenOptions::new().create(true).append(true).open(&path) {
        Ok(file) => {
            env_logger::Builder::new()
                .filter_level(level)
                .parse_default_env()
                .target(env_logger::Target::Pipe(Box::new(file)))
                .init();
        }
        Err(err) => {
            eprintln!("pine: cannot open log file {}: {}", path.display(), err);
            log::set_max_level(LevelFilter::Off);
        }
    }
}

fn run(cli_args: &cli::CliArgs, config: EditorConfig) -> anyhow::Result<()> {
    let mut renderer = TuiRenderer::new().context("failed to create renderer")?;
    let mut editor = Editor::new(config);

    let (cols, rows) = renderer.size()?;
    editor.resize(cols, rows);
    editor.open(cli_args.file.as_deref());
    info!("started in {:?} mode with {} buffer(s)", editor.mode, editor.session.len());

    loop {
        renderer.draw(&editor)?;
        let event = read()?;
        if editor.handle_event(&event) {
            break;
        }
    }
    info!("exiting");
    Ok(())
}
