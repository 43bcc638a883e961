//! Command dispatcher
//!
//! One entry point for both ways of running a command: the built-in
//! [`CommandTable`] or a [`DelegatedEngine`]. The backend is picked once when
//! the terminal is built; everything else is shared.

use tracing::{debug, warn};

use crate::config::{Config, Theme};
use crate::opener::UrlOpener;

use super::action::Action;
use super::commands::{not_found, CommandContext, CommandError, CommandTable};
use super::engine::{DelegatedEngine, ProcessEngine};
use super::session::Session;
use super::tokenizer::split_command;

/// Where commands are resolved
pub enum Backend {
    Local(CommandTable),
    Delegated(DelegatedEngine),
}

impl Backend {
    /// External engine when one is configured, built-in commands otherwise
    pub fn from_config(config: &Config) -> Self {
        match &config.engine.program {
            Some(program) => Backend::Delegated(DelegatedEngine::start(Box::new(
                ProcessEngine::new(program.clone(), config.engine.args.clone()),
            ))),
            None => Backend::Local(CommandTable::builtin(config.files.clone())),
        }
    }

    /// Names offered by tab completion
    pub fn command_names(&self) -> &[String] {
        match self {
            Backend::Local(table) => table.names(),
            Backend::Delegated(engine) => engine.commands(),
        }
    }
}

pub struct Dispatcher {
    prompt: String,
    backend: Backend,
}

impl Dispatcher {
    pub fn new(prompt: impl Into<String>, backend: Backend) -> Self {
        Self {
            prompt: prompt.into(),
            backend,
        }
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn completions(&self) -> &[String] {
        self.backend.command_names()
    }

    /// Echo `raw` into the transcript and run it. Never fails: problems end up
    /// as output lines.
    pub fn dispatch(&mut self, session: &mut Session, opener: &mut dyn UrlOpener, raw: &str) {
        let line = raw.trim();
        if line.is_empty() {
            return;
        }

        session.push_input(format!("{} {}", self.prompt, line));

        let result = match &mut self.backend {
            Backend::Local(table) => run_local(table, session, opener, line),
            Backend::Delegated(engine) => run_delegated(engine, session, opener, line),
        };

        if let Err(e) = result {
            warn!("Command failed: {}", e);
            session.push_output(e.to_string());
        }
    }
}

fn run_local(
    table: &CommandTable,
    session: &mut Session,
    opener: &mut dyn UrlOpener,
    line: &str,
) -> Result<(), CommandError> {
    let Some((name, args)) = split_command(line) else {
        return Ok(());
    };

    let Some(handler) = table.get(&name) else {
        debug!("Unknown command: {}", name);
        session.push_output(not_found(&name));
        return Ok(());
    };

    debug!("Running {} ({} args)", name, args.len());
    let mut ctx = CommandContext {
        session,
        opener,
        files: table.files(),
    };
    if let Some(text) = handler(&args, &mut ctx)? {
        ctx.session.push_output(text);
    }
    Ok(())
}

fn run_delegated(
    engine: &mut DelegatedEngine,
    session: &mut Session,
    opener: &mut dyn UrlOpener,
    line: &str,
) -> Result<(), CommandError> {
    if !engine.is_ready() {
        session.push_output("engine: not ready");
        return Ok(());
    }

    for action in engine.handle(line)? {
        apply(action, session, opener);
    }
    Ok(())
}

fn apply(action: Action, session: &mut Session, opener: &mut dyn UrlOpener) {
    match action {
        Action::Print { text } => session.push_output(text),
        Action::Clear => session.clear(),
        Action::Open { url } => {
            if let Err(e) = opener.open(&url) {
                warn!("open {} failed: {}", url, e);
                session.push_output("open failed");
            }
        }
        Action::Theme { value } => match Theme::parse(&value) {
            Some(theme) => session.set_theme(theme),
            None => debug!("Ignoring unknown theme {:?}", value),
        },
    }
}
