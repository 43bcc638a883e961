//! Input controller
//!
//! A reducer over the input line: `(state, event) -> (state', effects)`. It
//! owns the draft buffer, the caret and the command history, and never talks
//! to the dispatcher or the screen itself. Whatever must happen outside the
//! input line comes back as an [`Effect`].

use crate::history::{CommandHistory, Recall};

/// Editing and navigation events for the input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// Enter
    Submit,
    /// ↑
    RecallPrevious,
    /// ↓
    RecallNext,
    /// Tab
    Complete,
    Insert(char),
    Paste(String),
    Backspace,
    Delete,
    CursorLeft,
    CursorRight,
    Home,
    End,
    /// Esc
    ClearDraft,
}

/// Work for the owner of the input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Run a submitted line (untrimmed)
    Dispatch(String),
    /// Append an output line
    EmitLine(String),
}

/// What a single event produced
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Reaction {
    pub effects: Vec<Effect>,
    /// The key was consumed; the host must not apply its own default for it
    pub prevent_default: bool,
}

impl Reaction {
    fn intercepted() -> Self {
        Self {
            effects: Vec::new(),
            prevent_default: true,
        }
    }

    fn with(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Draft buffer, caret (in chars) and history
#[derive(Debug, Clone)]
pub struct InputState {
    draft: String,
    caret: usize,
    history: CommandHistory,
}

impl InputState {
    pub fn new(history_limit: usize) -> Self {
        Self {
            draft: String::new(),
            caret: 0,
            history: CommandHistory::with_limit(history_limit),
        }
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Caret position, counted in chars
    pub fn caret(&self) -> usize {
        self.caret
    }

    pub fn history(&self) -> &CommandHistory {
        &self.history
    }

    /// Replace the draft and put the caret at its end
    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
        self.caret = self.draft.chars().count();
    }

    fn byte_index(&self, caret: usize) -> usize {
        self.draft
            .char_indices()
            .nth(caret)
            .map(|(i, _)| i)
            .unwrap_or(self.draft.len())
    }

    fn insert_str(&mut self, text: &str) {
        let at = self.byte_index(self.caret);
        self.draft.insert_str(at, text);
        self.caret += text.chars().count();
    }
}

/// Apply one event to the input line
pub fn reduce(state: &mut InputState, event: InputEvent, completions: &[String]) -> Reaction {
    match event {
        InputEvent::Submit => submit(state),
        InputEvent::RecallPrevious => {
            let recalled = recalled_draft(state.history.recall_previous());
            if let Some(draft) = recalled {
                state.set_draft(draft);
            }
            Reaction::intercepted()
        }
        InputEvent::RecallNext => {
            let recalled = recalled_draft(state.history.recall_next());
            if let Some(draft) = recalled {
                state.set_draft(draft);
            }
            Reaction::intercepted()
        }
        InputEvent::Complete => complete(state, completions),
        InputEvent::Insert(ch) => {
            if !ch.is_control() {
                let mut buf = [0u8; 4];
                state.insert_str(ch.encode_utf8(&mut buf));
            }
            Reaction::default()
        }
        InputEvent::Paste(text) => {
            let clean: String = text.chars().filter(|c| !c.is_control()).collect();
            state.insert_str(&clean);
            Reaction::default()
        }
        InputEvent::Backspace => {
            if state.caret > 0 {
                state.caret -= 1;
                let at = state.byte_index(state.caret);
                state.draft.remove(at);
            }
            Reaction::default()
        }
        InputEvent::Delete => {
            if state.caret < state.draft.chars().count() {
                let at = state.byte_index(state.caret);
                state.draft.remove(at);
            }
            Reaction::default()
        }
        InputEvent::CursorLeft => {
            state.caret = state.caret.saturating_sub(1);
            Reaction::default()
        }
        InputEvent::CursorRight => {
            state.caret = (state.caret + 1).min(state.draft.chars().count());
            Reaction::default()
        }
        InputEvent::Home => {
            state.caret = 0;
            Reaction::default()
        }
        InputEvent::End => {
            state.caret = state.draft.chars().count();
            Reaction::default()
        }
        InputEvent::ClearDraft => {
            state.set_draft(String::new());
            Reaction::default()
        }
    }
}

/// The new draft after a recall step, if it changes
fn recalled_draft(recall: Recall<'_>) -> Option<String> {
    match recall {
        Recall::Keep => None,
        Recall::Show(entry) => Some(entry.to_string()),
        Recall::Blank => Some(String::new()),
    }
}

fn submit(state: &mut InputState) -> Reaction {
    if state.draft.trim().is_empty() {
        return Reaction::intercepted();
    }

    let raw = std::mem::take(&mut state.draft);
    state.caret = 0;
    state.history.add(raw.clone());
    Reaction::intercepted().with(Effect::Dispatch(raw))
}

fn complete(state: &mut InputState, completions: &[String]) -> Reaction {
    let prefix = state
        .draft
        .split_whitespace()
        .next()
        .unwrap_or("")
        .to_lowercase();
    if prefix.is_empty() {
        return Reaction::intercepted();
    }

    let matches: Vec<&str> = completions
        .iter()
        .map(String::as_str)
        .filter(|name| name.starts_with(&prefix))
        .collect();

    match matches.as_slice() {
        [] => Reaction::intercepted(),
        [only] => {
            let mut completed = only.to_string();
            if !state.draft.ends_with(' ') {
                completed.push(' ');
            }
            state.set_draft(completed);
            Reaction::intercepted()
        }
        many => Reaction::intercepted().with(Effect::EmitLine(many.join(" "))),
    }
}
