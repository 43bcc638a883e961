//! Session state
//!
//! Everything one terminal instance owns: the transcript, the input line
//! (draft + history), and the current theme. Nothing here is global, so any
//! number of sessions can live side by side.

use crate::config::Theme;

use super::controller::InputState;

/// Which side of the conversation a transcript line came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Echo of a submitted command, prompt included
    Input,
    /// Command output
    Output,
}

/// One transcript entry. `text` may span several lines and is shown verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub kind: LineKind,
    pub text: String,
}

impl Line {
    pub fn input(text: impl Into<String>) -> Self {
        Self {
            kind: LineKind::Input,
            text: text.into(),
        }
    }

    pub fn output(text: impl Into<String>) -> Self {
        Self {
            kind: LineKind::Output,
            text: text.into(),
        }
    }
}

/// A terminal session
#[derive(Debug)]
pub struct Session {
    /// Session ID
    pub id: u64,
    /// Transcript, oldest first
    lines: Vec<Line>,
    /// Draft buffer and command history
    input: InputState,
    /// Current theme
    theme: Theme,
    /// Bumped on every transcript change
    revision: u64,
}

impl Session {
    /// Create a new session
    pub fn new(id: u64, theme: Theme, history_limit: usize) -> Self {
        Self {
            id,
            lines: Vec::new(),
            input: InputState::new(history_limit),
            theme,
            revision: 0,
        }
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn push_input(&mut self, text: impl Into<String>) {
        self.push(Line::input(text));
    }

    pub fn push_output(&mut self, text: impl Into<String>) {
        self.push(Line::output(text));
    }

    fn push(&mut self, line: Line) {
        self.lines.push(line);
        self.revision += 1;
    }

    /// Empty the transcript
    pub fn clear(&mut self) {
        self.lines.clear();
        self.revision += 1;
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut InputState {
        &mut self.input
    }

    /// Transcript revision, for change detection (auto-scroll)
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_keep_insertion_order() {
        let mut session = Session::new(1, Theme::Matrix, 100);
        session.push_input("$ ls");
        session.push_output("about.txt");

        assert_eq!(
            session.lines(),
            [Line::input("$ ls"), Line::output("about.txt")]
        );
    }

    #[test]
    fn test_revision_tracks_transcript_changes() {
        let mut session = Session::new(1, Theme::Matrix, 100);
        assert_eq!(session.revision(), 0);

        session.push_output("a");
        session.clear();
        assert!(session.lines().is_empty());
        assert_eq!(session.revision(), 2);

        // Theme changes are presentational only
        session.set_theme(Theme::Light);
        assert_eq!(session.revision(), 2);
        assert_eq!(session.theme(), Theme::Light);
    }
}
