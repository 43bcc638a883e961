//! Terminal renderer using crossterm
//!
//! Draws one terminal instance full-screen:
//!
//! ```text
//!  ● ● ●                         guest@portfolio:~   <- title bar
//! Welcome! Type 'help' ...                          <- transcript
//! guest@portfolio:~$ ls
//! about.txt
//! $ _                                               <- input row
//! ```

use std::io::{self, Write};

use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{DisableBracketedPaste, EnableBracketedPaste},
    execute, queue,
    style::{Attribute, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal::{
        self, Clear, ClearType, DisableLineWrap, EnableLineWrap, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::config::{Color, ColorScheme};
use crate::core::session::{Line, LineKind};
use crate::core::terminal::Terminal;

const PLACEHOLDER: &str = "type 'help' and hit Enter";

/// Width of the `$ ` in front of the draft
const INPUT_PREFIX_WIDTH: usize = 2;

// Title bar dots
const DOT_RED: Color = Color::new(248, 113, 113);
const DOT_AMBER: Color = Color::new(251, 191, 36);
const DOT_GREEN: Color = Color::new(52, 211, 153);

/// Terminal renderer
pub struct Renderer {
    /// Whether the terminal has been initialized
    initialized: bool,
    /// Rows scrolled back from the newest transcript row
    scroll_offset: usize,
    /// Transcript revision seen by the last render
    last_revision: Option<u64>,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer {
    pub fn new() -> Self {
        Self {
            initialized: false,
            scroll_offset: 0,
            last_revision: None,
        }
    }

    /// Get terminal size
    pub fn size() -> io::Result<(u16, u16)> {
        terminal::size()
    }

    /// Initialize the terminal for rendering
    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;

        let mut stdout = io::stdout();
        execute!(
            stdout,
            EnterAlternateScreen,
            EnableBracketedPaste,
            DisableLineWrap,
            Clear(ClearType::All),
            MoveTo(0, 0)
        )?;

        self.initialized = true;
        Ok(())
    }

    /// Cleanup the terminal
    pub fn cleanup(&mut self) -> io::Result<()> {
        if !self.initialized {
            return Ok(());
        }
        self.initialized = false;

        let mut stdout = io::stdout();
        let _ = execute!(stdout, ResetColor, SetAttribute(Attribute::Reset));
        let _ = execute!(
            stdout,
            Show,
            EnableLineWrap,
            DisableBracketedPaste,
            LeaveAlternateScreen
        );
        let _ = stdout.flush();

        terminal::disable_raw_mode()
    }

    pub fn scroll_up(&mut self, rows: usize) {
        self.scroll_offset = self.scroll_offset.saturating_add(rows);
    }

    pub fn scroll_down(&mut self, rows: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(rows);
    }

    /// Render the whole screen
    pub fn render(&mut self, term: &Terminal) -> io::Result<()> {
        let session = term.session();

        // Any transcript change snaps the view back to the newest line
        if self.last_revision != Some(session.revision()) {
            self.last_revision = Some(session.revision());
            self.scroll_offset = 0;
        }

        let scheme = ColorScheme::for_theme(session.theme());
        let (cols, rows) = Self::size()?;
        let width = cols as usize;

        let stdout = io::stdout();
        let mut out = io::BufWriter::with_capacity(65536, stdout.lock());

        // Begin synchronized update (reduces flicker)
        write!(out, "\x1b[?2026h")?;
        queue!(out, Hide)?;

        let body_rows = rows.saturating_sub(2) as usize;
        if body_rows > 0 {
            let transcript = transcript_rows(session.lines(), width);
            let max_offset = transcript.len().saturating_sub(body_rows);
            self.scroll_offset = self.scroll_offset.min(max_offset);

            self.draw_title_bar(&mut out, term, &scheme, width)?;

            let end = transcript.len() - self.scroll_offset;
            let start = end.saturating_sub(body_rows);
            for i in 0..body_rows {
                let y = (i + 1) as u16;
                let row = transcript[start..end].get(i);
                let (fg, text) = match row {
                    Some((LineKind::Input, text)) => (scheme.dim, text.as_str()),
                    Some((LineKind::Output, text)) => (scheme.foreground, text.as_str()),
                    None => (scheme.foreground, ""),
                };
                queue!(
                    out,
                    MoveTo(0, y),
                    SetBackgroundColor(scheme.background.to_crossterm()),
                    SetForegroundColor(fg.to_crossterm()),
                    Print(pad(text, width))
                )?;
            }
        }

        let cursor_col = self.draw_input_row(&mut out, term, &scheme, width, rows.saturating_sub(1))?;

        queue!(out, ResetColor, MoveTo(cursor_col, rows.saturating_sub(1)), Show)?;

        // End synchronized update
        write!(out, "\x1b[?2026l")?;
        out.flush()
    }

    fn draw_title_bar<W: Write>(
        &self,
        out: &mut W,
        term: &Terminal,
        scheme: &ColorScheme,
        width: usize,
    ) -> io::Result<()> {
        queue!(
            out,
            MoveTo(0, 0),
            SetBackgroundColor(scheme.title_bar_bg.to_crossterm())
        )?;

        let mut used = 0;
        for dot in [DOT_RED, DOT_AMBER, DOT_GREEN] {
            if used + 2 > width {
                break;
            }
            queue!(out, SetForegroundColor(dot.to_crossterm()), Print(" ●"))?;
            used += 2;
        }

        queue!(out, SetForegroundColor(scheme.title_bar_fg.to_crossterm()))?;

        let history = term.session().input().history();
        let mut indicators = Vec::new();
        if let Some(index) = history.cursor() {
            indicators.push(format!("  [history {}/{}]", index + 1, history.len()));
        }
        // Show scroll indicator if scrolled
        if self.scroll_offset > 0 {
            indicators.push(format!("  [↑ {} lines]", self.scroll_offset));
        }
        for indicator in indicators {
            if used + indicator.width() <= width {
                queue!(out, Print(&indicator))?;
                used += indicator.width();
            }
        }

        let title = format!("{} ", term.prompt().replace(":$", ""));
        let rest = width.saturating_sub(used);
        let title_width = title.width();
        if title_width <= rest {
            queue!(out, Print(" ".repeat(rest - title_width)), Print(title))?;
        } else {
            queue!(out, Print(" ".repeat(rest)))?;
        }
        Ok(())
    }

    /// Draw `$ draft`; returns the cursor column
    fn draw_input_row<W: Write>(
        &self,
        out: &mut W,
        term: &Terminal,
        scheme: &ColorScheme,
        width: usize,
        y: u16,
    ) -> io::Result<u16> {
        let input = term.session().input();
        let avail = width.saturating_sub(INPUT_PREFIX_WIDTH);

        queue!(
            out,
            MoveTo(0, y),
            SetBackgroundColor(scheme.background.to_crossterm()),
            SetForegroundColor(scheme.prompt.to_crossterm()),
            Print("$ ")
        )?;

        if input.draft().is_empty() {
            queue!(
                out,
                SetForegroundColor(scheme.dim.to_crossterm()),
                Print(pad(PLACEHOLDER, avail))
            )?;
            return Ok(INPUT_PREFIX_WIDTH as u16);
        }

        let (visible, caret_col) = input_view(input.draft(), input.caret(), avail);
        queue!(
            out,
            SetForegroundColor(scheme.foreground.to_crossterm()),
            Print(pad(&visible, avail))
        )?;
        Ok((INPUT_PREFIX_WIDTH + caret_col) as u16)
    }
}

/// Flatten the transcript into screen rows: split on `\n`, then wrap
pub fn transcript_rows(lines: &[Line], width: usize) -> Vec<(LineKind, String)> {
    let mut rows = Vec::new();
    for line in lines {
        for segment in line.text.split('\n') {
            for row in wrap_line(segment, width) {
                rows.push((line.kind, row));
            }
        }
    }
    rows
}

/// Wrap text to `width` display columns. Always yields at least one row.
pub fn wrap_line(text: &str, width: usize) -> Vec<String> {
    let text = text.replace('\t', "    ");
    let width = width.max(1);
    let mut rows = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;

    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if current_width + w > width && !current.is_empty() {
            rows.push(std::mem::take(&mut current));
            current_width = 0;
        }
        current.push(ch);
        current_width += w;
    }
    rows.push(current);
    rows
}

/// The slice of the draft that fits in `avail` columns with the caret
/// visible, and the caret's column within that slice
pub fn input_view(draft: &str, caret: usize, avail: usize) -> (String, usize) {
    let chars: Vec<char> = draft.chars().collect();
    let caret = caret.min(chars.len());
    let width_of = |slice: &[char]| -> usize { slice.iter().map(|c| c.width().unwrap_or(0)).sum() };

    // Keep one column free for the cursor itself
    let mut start = 0;
    while start < caret && width_of(&chars[start..caret]) >= avail.max(1) {
        start += 1;
    }

    let mut visible = String::new();
    let mut used = 0;
    for &ch in &chars[start..] {
        let w = ch.width().unwrap_or(0);
        if used + w > avail {
            break;
        }
        visible.push(ch);
        used += w;
    }

    (visible, width_of(&chars[start..caret]))
}

/// Pad (or cut) to exactly `width` display columns
fn pad(text: &str, width: usize) -> String {
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push_str(&" ".repeat(width - used));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_line() {
        assert_eq!(wrap_line("abcdef", 4), ["abcd", "ef"]);
        assert_eq!(wrap_line("", 4), [""]);
        assert_eq!(wrap_line("abcd", 4), ["abcd"]);
    }

    #[test]
    fn test_wrap_wide_chars() {
        // Each of these takes two columns
        assert_eq!(wrap_line("日本語", 4), ["日本", "語"]);
    }

    #[test]
    fn test_transcript_rows_split_embedded_newlines() {
        let lines = vec![
            Line::output("Welcome!\nsecond"),
            Line::input("guest@portfolio:~$ ls"),
        ];
        let rows = transcript_rows(&lines, 80);
        assert_eq!(
            rows,
            vec![
                (LineKind::Output, "Welcome!".to_string()),
                (LineKind::Output, "second".to_string()),
                (LineKind::Input, "guest@portfolio:~$ ls".to_string()),
            ]
        );
    }

    #[test]
    fn test_input_view_fits() {
        assert_eq!(input_view("echo", 2, 10), ("echo".to_string(), 2));
    }

    #[test]
    fn test_input_view_scrolls_to_caret() {
        let (visible, col) = input_view("abcdefghij", 10, 5);
        assert_eq!(visible, "ghij");
        assert_eq!(col, 4);
    }

    #[test]
    fn test_pad() {
        assert_eq!(pad("ab", 4), "ab  ");
        assert_eq!(pad("abcdef", 3), "abc");
        assert_eq!(pad("日本", 3), "日 ");
    }

    #[test]
    fn test_scroll_offset_saturates() {
        let mut renderer = Renderer::new();
        renderer.scroll_down(3);
        assert_eq!(renderer.scroll_offset, 0);
        renderer.scroll_up(5);
        renderer.scroll_down(2);
        assert_eq!(renderer.scroll_offset, 3);
    }
}
