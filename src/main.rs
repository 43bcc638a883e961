//! portterm - A portfolio terminal in your terminal
//!
//! portterm is a small command terminal: type a command, get its output in
//! the transcript. Commands come either from a built-in table or from an
//! external engine process configured in `config.toml`.
//!
//! # Features
//!
//! - **Built-in Commands**: help, clear, echo, date, whoami, uname, pwd, ls, cat, open, theme
//! - **Command History**: ↑/↓ recall of the last 100 lines
//! - **Tab Completion**: complete command names
//! - **Themes**: matrix, classic and light
//! - **External Engine**: delegate commands to any program speaking JSON
//!
//! # Quick Start
//!
//! ```text
//! portterm                   # Interactive terminal
//! portterm -t light          # Start with the light theme
//! portterm -c ls -c whoami   # Run commands and print the transcript
//! ```

mod config;
mod core;
mod history;
mod opener;
mod ui;

use std::env;

use anyhow::Context;
use crossterm::event::{self, Event, KeyEventKind};
use tracing::{debug, error, info, Level};
use tracing_subscriber::FmtSubscriber;

use crate::config::{config_dir, Config, Theme};
use crate::core::controller::InputEvent;
use crate::core::dispatcher::Backend;
use crate::core::terminal::Terminal;
use crate::opener::SystemOpener;
use crate::ui::{KeyAction, KeyMapper, Renderer};

/// Command line options
#[derive(Debug, Default)]
struct Options {
    /// Theme override
    theme: Option<Theme>,
    /// Engine program override
    engine: Option<String>,
    /// Lines to run non-interactively
    commands: Vec<String>,
    /// Log at DEBUG instead of INFO
    debug: bool,
    /// Write the config file and exit
    init_config: bool,
}

/// Version string from Cargo.toml
const VERSION: &str = env!("CARGO_PKG_VERSION");

fn print_version() {
    eprintln!("portterm {}", VERSION);
}

fn print_help() {
    eprintln!("portterm {} - A portfolio terminal in your terminal", VERSION);
    eprintln!();
    eprintln!("Usage: portterm [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -t, --theme <NAME>    Start with a theme (matrix, classic, light)");
    eprintln!("  -e, --engine <PROG>   Delegate commands to an external engine");
    eprintln!("  -c, --command <LINE>  Run a line and print the transcript (repeatable)");
    eprintln!("  --init-config         Write ~/.portterm/config.toml and exit");
    eprintln!("  --debug               Verbose logging");
    eprintln!("  -v, --version         Show version");
    eprintln!("  -h, --help            Show this help");
    eprintln!();
    eprintln!("Keys:");
    eprintln!("  Enter                 Run the current line");
    eprintln!("  ↑/↓, Ctrl+P/N         Recall history");
    eprintln!("  Tab                   Complete command name");
    eprintln!("  Esc, Ctrl+U           Clear the line");
    eprintln!("  Ctrl+V                Paste");
    eprintln!("  PageUp/PageDown       Scroll the transcript");
    eprintln!("  Ctrl+C, Ctrl+D        Quit");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  portterm -t classic");
    eprintln!("  portterm -c \"echo hello\" -c ls");
    eprintln!("  portterm -e ./engine");
    eprintln!();
    eprintln!("Configuration: ~/.portterm/config.toml");
    eprintln!("Log file:      ~/.portterm/portterm.log");
}

fn parse_args() -> Result<Options, String> {
    let args: Vec<String> = env::args().collect();
    let mut options = Options::default();
    let mut i = 1;

    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-v" | "--version" => {
                print_version();
                std::process::exit(0);
            }
            "-t" | "--theme" => {
                i += 1;
                let name = args.get(i).ok_or("Missing theme argument")?;
                options.theme = Some(name.parse()?);
            }
            "-e" | "--engine" => {
                i += 1;
                let program = args.get(i).ok_or("Missing engine argument")?;
                options.engine = Some(program.clone());
            }
            "-c" | "--command" => {
                i += 1;
                let line = args.get(i).ok_or("Missing command argument")?;
                options.commands.push(line.clone());
            }
            "--debug" => {
                options.debug = true;
            }
            "--init-config" => {
                options.init_config = true;
            }
            arg => {
                return Err(format!("Unknown argument: {}. Use -h for help.", arg));
            }
        }
        i += 1;
    }

    Ok(options)
}

/// Log to `~/.portterm/portterm.log`; no file, no logging
fn init_logging(debug: bool) {
    let log_path = config_dir()
        .map(|dir| dir.join("portterm.log"))
        .unwrap_or_else(|| std::path::PathBuf::from("portterm.log"));

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .ok();

    if let Some(file) = log_file {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(if debug { Level::DEBUG } else { Level::INFO })
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }
}

fn main() -> anyhow::Result<()> {
    let options = match parse_args() {
        Ok(o) => o,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Use --help for usage information");
            std::process::exit(1);
        }
    };

    init_logging(options.debug);
    info!("portterm starting...");

    // Command line overrides the config file
    let mut config = Config::load();
    if let Some(theme) = options.theme {
        config.theme = theme;
    }
    if let Some(program) = options.engine.clone() {
        config.engine.program = Some(program);
    }

    if options.init_config {
        let path = config.save().context("failed to write config")?;
        eprintln!("Wrote {}", path.display());
        return Ok(());
    }

    match &config.engine.program {
        Some(program) => info!("Engine: {}", program),
        None => info!("Engine: built-in commands"),
    }

    if !options.commands.is_empty() {
        run_batch(config, &options.commands);
        return Ok(());
    }

    run_interactive(config)
}

/// Run each line through a fresh terminal and print the transcript
fn run_batch(mut config: Config, commands: &[String]) {
    config.welcome.clear();
    let backend = Backend::from_config(&config);
    let mut terminal = Terminal::from_config(1, &config, backend);
    let mut opener = SystemOpener;

    for line in commands {
        terminal.submit(line, &mut opener);
    }

    for line in terminal.session().lines() {
        println!("{}", line.text);
    }
}

/// Full-screen terminal
fn run_interactive(config: Config) -> anyhow::Result<()> {
    let backend = Backend::from_config(&config);
    let mut terminal = Terminal::from_config(1, &config, backend);

    let (cols, rows) = Renderer::size()?;
    info!("Terminal size: {}x{}", cols, rows);

    // Initialize renderer and run with guaranteed cleanup
    let mut renderer = Renderer::new();
    renderer.init()?;

    let result = run_main_loop(&mut terminal, &mut renderer);

    let _ = renderer.cleanup();
    if let Err(e) = &result {
        error!("Exited with error: {}", e);
    }
    info!("portterm exiting");
    result
}

/// Main event loop
fn run_main_loop(terminal: &mut Terminal, renderer: &mut Renderer) -> anyhow::Result<()> {
    let mut opener = SystemOpener;
    renderer.render(terminal)?;

    loop {
        match event::read()? {
            Event::Key(key_event) => {
                // Only process key press events
                if key_event.kind != KeyEventKind::Press {
                    continue;
                }

                match KeyMapper::map(&key_event) {
                    Some(KeyAction::Quit) => break,
                    Some(KeyAction::Input(input)) => {
                        terminal.handle_event(input, &mut opener);
                    }
                    Some(KeyAction::PasteClipboard) => {
                        if let Some(text) = clipboard_first_line() {
                            terminal.handle_event(InputEvent::Paste(text), &mut opener);
                        }
                    }
                    Some(KeyAction::ScrollUp) => renderer.scroll_up(page_rows()),
                    Some(KeyAction::ScrollDown) => renderer.scroll_down(page_rows()),
                    None => continue,
                }
            }

            Event::Paste(text) => {
                if let Some(line) = text.lines().next() {
                    terminal.handle_event(InputEvent::Paste(line.to_string()), &mut opener);
                }
            }

            Event::Resize(cols, rows) => {
                debug!("Resize: {}x{}", cols, rows);
            }

            _ => continue,
        }

        renderer.render(terminal)?;
    }

    Ok(())
}

/// Transcript rows between the title bar and the input row
fn page_rows() -> usize {
    Renderer::size()
        .map(|(_, rows)| rows.saturating_sub(2) as usize)
        .unwrap_or(10)
        .max(1)
}

fn clipboard_first_line() -> Option<String> {
    let mut clipboard = match arboard::Clipboard::new() {
        Ok(c) => c,
        Err(e) => {
            error!("Clipboard unavailable: {}", e);
            return None;
        }
    };
    let text = clipboard.get_text().ok()?;
    text.lines().next().map(str::to_string)
}
