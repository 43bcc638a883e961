//! A terminal instance: session state, dispatcher and the input reducer.

use tracing::debug;

use crate::config::Config;
use crate::opener::UrlOpener;

use super::controller::{self, Effect, InputEvent};
use super::dispatcher::{Backend, Dispatcher};
use super::session::Session;

pub struct Terminal {
    session: Session,
    dispatcher: Dispatcher,
}

impl Terminal {
    pub fn new(session: Session, dispatcher: Dispatcher) -> Self {
        Self {
            session,
            dispatcher,
        }
    }

    /// Build a terminal from the config; the welcome banner is its first line
    pub fn from_config(id: u64, config: &Config, backend: Backend) -> Self {
        let mut session = Session::new(id, config.theme, config.history_limit);
        if !config.welcome.is_empty() {
            session.push_output(config.welcome.clone());
        }
        Self::new(session, Dispatcher::new(config.prompt.clone(), backend))
    }

    /// Feed one input event. Returns whether the event was intercepted.
    pub fn handle_event(&mut self, event: InputEvent, opener: &mut dyn UrlOpener) -> bool {
        let reaction = controller::reduce(
            self.session.input_mut(),
            event,
            self.dispatcher.completions(),
        );

        for effect in reaction.effects {
            match effect {
                Effect::Dispatch(raw) => {
                    debug!("Session {}: submit {:?}", self.session.id, raw);
                    self.dispatcher.dispatch(&mut self.session, opener, &raw);
                }
                Effect::EmitLine(text) => self.session.push_output(text),
            }
        }

        reaction.prevent_default
    }

    /// Type `line` into the draft and press Enter
    pub fn submit(&mut self, line: &str, opener: &mut dyn UrlOpener) {
        self.session.input_mut().set_draft(line);
        self.handle_event(InputEvent::Submit, opener);
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn prompt(&self) -> &str {
        self.dispatcher.prompt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Theme;
    use crate::core::session::{Line, LineKind};
    use crate::opener::testing::RecordingOpener;

    fn terminal() -> Terminal {
        let config = Config {
            welcome: String::new(),
            ..Config::default()
        };
        Terminal::from_config(1, &config, Backend::from_config(&config))
    }

    fn type_text(term: &mut Terminal, text: &str, opener: &mut RecordingOpener) {
        for ch in text.chars() {
            term.handle_event(InputEvent::Insert(ch), opener);
        }
    }

    #[test]
    fn test_welcome_banner() {
        let config = Config::default();
        let term = Terminal::from_config(1, &config, Backend::from_config(&config));
        assert_eq!(term.session().lines(), [Line::output(crate::config::WELCOME)]);
    }

    #[test]
    fn test_submit_emits_one_input_line() {
        let mut term = terminal();
        let mut opener = RecordingOpener::default();
        for (i, line) in ["ls", "  echo x", "foo", "theme light"].iter().enumerate() {
            let before = term.session().lines().len();
            term.submit(line, &mut opener);
            let new = &term.session().lines()[before..];
            let inputs: Vec<&Line> = new.iter().filter(|l| l.kind == LineKind::Input).collect();
            assert_eq!(inputs.len(), 1, "submission {}", i);
            assert_eq!(inputs[0].text, format!("guest@portfolio:~$ {}", line.trim()));
        }
    }

    #[test]
    fn test_blank_submit_changes_nothing() {
        let mut term = terminal();
        let mut opener = RecordingOpener::default();
        term.submit("   ", &mut opener);
        assert!(term.session().lines().is_empty());
        assert!(term.session().input().history().is_empty());
    }

    #[test]
    fn test_history_cap_through_submissions() {
        let mut term = terminal();
        let mut opener = RecordingOpener::default();
        for i in 1..=101 {
            term.submit(&format!("echo {}", i), &mut opener);
        }
        let history = term.session().input().history();
        assert_eq!(history.len(), 100);
        assert!(!history.entries().contains(&"echo 1".to_string()));
        assert!(history.entries().contains(&"echo 101".to_string()));
    }

    #[test]
    fn test_tab_completion_then_submit() {
        let mut term = terminal();
        let mut opener = RecordingOpener::default();
        type_text(&mut term, "th", &mut opener);
        assert!(term.handle_event(InputEvent::Complete, &mut opener));
        assert_eq!(term.session().input().draft(), "theme ");

        type_text(&mut term, "classic", &mut opener);
        term.handle_event(InputEvent::Submit, &mut opener);
        assert_eq!(term.session().theme(), Theme::Classic);
    }

    #[test]
    fn test_bare_theme_resets_to_matrix() {
        let mut term = terminal();
        let mut opener = RecordingOpener::default();
        term.submit("theme light", &mut opener);
        term.submit("theme", &mut opener);

        assert_eq!(term.session().theme(), Theme::Matrix);
        assert_eq!(
            term.session().lines().last(),
            Some(&Line::output("Theme changed to matrix"))
        );
    }

    #[test]
    fn test_ambiguous_completion_prints_matches() {
        let mut term = terminal();
        let mut opener = RecordingOpener::default();
        type_text(&mut term, "c", &mut opener);
        term.handle_event(InputEvent::Complete, &mut opener);

        assert_eq!(term.session().lines(), [Line::output("cat clear")]);
        assert_eq!(term.session().input().draft(), "c");
    }

    #[test]
    fn test_recall_round_trip() {
        let mut term = terminal();
        let mut opener = RecordingOpener::default();
        term.handle_event(InputEvent::RecallPrevious, &mut opener);
        assert_eq!(term.session().input().draft(), "");

        term.submit("pwd", &mut opener);
        term.handle_event(InputEvent::RecallPrevious, &mut opener);
        assert_eq!(term.session().input().draft(), "pwd");
        term.handle_event(InputEvent::RecallNext, &mut opener);
        assert_eq!(term.session().input().draft(), "");
    }

    #[test]
    fn test_instances_are_independent() {
        let mut a = terminal();
        let mut b = terminal();
        let mut opener = RecordingOpener::default();

        a.submit("theme light", &mut opener);
        a.submit("open example.com", &mut opener);

        assert_eq!(a.session().theme(), Theme::Light);
        assert_eq!(b.session().theme(), Theme::Matrix);
        assert!(b.session().lines().is_empty());
        assert!(b.session().input().history().is_empty());

        b.submit("whoami", &mut opener);
        assert_eq!(a.session().input().history().len(), 2);
        assert_eq!(opener.opened, vec!["https://example.com".to_string()]);
    }
}
