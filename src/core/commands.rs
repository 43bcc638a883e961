//! Built-in command table
//!
//! Each handler gets the arguments (command word excluded) and a
//! [`CommandContext`]. It returns the text of one output line, or `None` when
//! its only effect is on the session (`clear`, or nothing to say).

use std::collections::BTreeMap;

use chrono::Local;
use thiserror::Error;

use crate::config::Theme;
use crate::opener::{normalize_url, UrlOpener};

use super::engine::EngineError;
use super::session::Session;

#[derive(Error, Debug)]
pub enum CommandError {
    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// What a handler may touch
pub struct CommandContext<'a> {
    pub session: &'a mut Session,
    pub opener: &'a mut dyn UrlOpener,
    pub files: &'a BTreeMap<String, String>,
}

pub type Handler = fn(&[String], &mut CommandContext<'_>) -> Result<Option<String>, CommandError>;

/// A registered command
#[derive(Clone, Copy)]
pub struct Builtin {
    pub name: &'static str,
    /// Shown in `help`
    pub usage: &'static str,
    pub summary: &'static str,
    pub handler: Handler,
}

pub const BUILTINS: &[Builtin] = &[
    Builtin { name: "help", usage: "help", summary: "Show this help", handler: help },
    Builtin { name: "clear", usage: "clear", summary: "Clear the screen", handler: clear },
    Builtin { name: "echo", usage: "echo <text>", summary: "Print text", handler: echo },
    Builtin { name: "date", usage: "date", summary: "Show local time", handler: date },
    Builtin { name: "whoami", usage: "whoami", summary: "Print user", handler: whoami },
    Builtin { name: "uname", usage: "uname", summary: "Print system info", handler: uname },
    Builtin { name: "pwd", usage: "pwd", summary: "Print directory", handler: pwd },
    Builtin { name: "ls", usage: "ls", summary: "List demo files", handler: ls },
    Builtin { name: "cat", usage: "cat <file>", summary: "Show file (about.txt)", handler: cat },
    Builtin { name: "open", usage: "open <url>", summary: "Open link in new tab", handler: open },
    Builtin { name: "theme", usage: "theme <name>", summary: "matrix | classic | light", handler: theme },
];

/// Immutable name → handler map plus the demo files
pub struct CommandTable {
    commands: BTreeMap<&'static str, Builtin>,
    names: Vec<String>,
    files: BTreeMap<String, String>,
}

impl CommandTable {
    /// The fixed built-in set
    pub fn builtin(files: BTreeMap<String, String>) -> Self {
        Self::from_builtins(BUILTINS.iter().copied(), files)
    }

    fn from_builtins(builtins: impl Iterator<Item = Builtin>, files: BTreeMap<String, String>) -> Self {
        let commands: BTreeMap<_, _> = builtins.map(|b| (b.name, b)).collect();
        let names = commands.keys().map(|name| name.to_string()).collect();
        Self {
            commands,
            names,
            files,
        }
    }

    /// Built-ins plus extra commands
    #[cfg(test)]
    pub fn with_extra(extra: &[Builtin], files: BTreeMap<String, String>) -> Self {
        Self::from_builtins(BUILTINS.iter().chain(extra).copied(), files)
    }

    pub fn get(&self, name: &str) -> Option<Handler> {
        self.commands.get(name).map(|b| b.handler)
    }

    /// Registered names, sorted
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn files(&self) -> &BTreeMap<String, String> {
        &self.files
    }
}

pub fn not_found(name: &str) -> String {
    format!("{}: command not found (try `help`)", name)
}

pub fn help_text() -> String {
    let mut text = String::from("Available commands:");
    for builtin in BUILTINS {
        text.push_str(&format!("\n  {:<15}{}", builtin.usage, builtin.summary));
    }
    text
}

fn help(_args: &[String], _ctx: &mut CommandContext<'_>) -> Result<Option<String>, CommandError> {
    Ok(Some(help_text()))
}

fn clear(_args: &[String], ctx: &mut CommandContext<'_>) -> Result<Option<String>, CommandError> {
    ctx.session.clear();
    Ok(None)
}

fn echo(args: &[String], _ctx: &mut CommandContext<'_>) -> Result<Option<String>, CommandError> {
    Ok(Some(args.join(" ")))
}

/// Browser `Date` style, e.g. `Sat Oct 17 2026 14:03:09 GMT+0900`
fn date(_args: &[String], _ctx: &mut CommandContext<'_>) -> Result<Option<String>, CommandError> {
    Ok(Some(Local::now().format("%a %b %d %Y %H:%M:%S GMT%z").to_string()))
}

fn whoami(_args: &[String], _ctx: &mut CommandContext<'_>) -> Result<Option<String>, CommandError> {
    Ok(Some("guest".to_string()))
}

fn uname(_args: &[String], _ctx: &mut CommandContext<'_>) -> Result<Option<String>, CommandError> {
    Ok(Some(format!(
        "portfolio {} {} (rust)",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::ARCH
    )))
}

fn pwd(_args: &[String], _ctx: &mut CommandContext<'_>) -> Result<Option<String>, CommandError> {
    Ok(Some("~/".to_string()))
}

fn ls(_args: &[String], ctx: &mut CommandContext<'_>) -> Result<Option<String>, CommandError> {
    let names: Vec<&str> = ctx.files.keys().map(String::as_str).collect();
    Ok(Some(names.join(" ")))
}

fn cat(args: &[String], ctx: &mut CommandContext<'_>) -> Result<Option<String>, CommandError> {
    let Some(name) = args.first() else {
        return Ok(Some("cat: missing file name".to_string()));
    };
    Ok(Some(match ctx.files.get(name) {
        Some(content) => content.clone(),
        None => format!("cat: {}: No such file or directory", name),
    }))
}

fn open(args: &[String], ctx: &mut CommandContext<'_>) -> Result<Option<String>, CommandError> {
    let Some(raw) = args.first() else {
        return Ok(Some("open: missing url".to_string()));
    };
    let url = normalize_url(raw);
    Ok(Some(match ctx.opener.open(&url) {
        Ok(()) => format!("Opening {}", url),
        Err(e) => format!("open: failed to open {}: {}", url, e),
    }))
}

/// `theme` alone goes back to the default
fn theme(args: &[String], ctx: &mut CommandContext<'_>) -> Result<Option<String>, CommandError> {
    let name = args.first().map(String::as_str).unwrap_or("matrix");
    match Theme::parse(name) {
        Some(theme) => {
            ctx.session.set_theme(theme);
            Ok(Some(format!("Theme changed to {}", theme)))
        }
        None => Ok(Some("theme: supported -> matrix | classic | light".to_string())),
    }
}
