//! Command history for portterm
//!
//! Stores submitted lines (newest last) with FIFO eviction and tracks the
//! ↑/↓ recall cursor.

/// Maximum number of history entries
pub const HISTORY_LIMIT: usize = 100;

/// Result of moving the recall cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recall<'a> {
    /// Leave the draft buffer as it is
    Keep,
    /// Replace the draft buffer with this entry
    Show(&'a str),
    /// Walked past the newest entry; the draft becomes empty
    Blank,
}

/// Command history storage
#[derive(Debug, Clone)]
pub struct CommandHistory {
    /// All submitted lines (newest last)
    entries: Vec<String>,
    /// Maximum entries
    max_entries: usize,
    /// Position during recall, `None` when not navigating
    cursor: Option<usize>,
}

impl Default for CommandHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandHistory {
    /// Create an empty history with the default limit
    pub fn new() -> Self {
        Self::with_limit(HISTORY_LIMIT)
    }

    /// Create an empty history keeping at most `max_entries` lines
    pub fn with_limit(max_entries: usize) -> Self {
        Self {
            entries: Vec::new(),
            max_entries: max_entries.max(1),
            cursor: None,
        }
    }

    /// Add a submitted line. The raw text is stored untouched.
    ///
    /// Returns `false` (and changes nothing) for empty or whitespace-only lines.
    pub fn add(&mut self, command: String) -> bool {
        if command.trim().is_empty() {
            return false;
        }

        self.entries.push(command);

        // Trim if exceeding limit
        while self.entries.len() > self.max_entries {
            self.entries.remove(0);
        }

        self.cursor = None;
        true
    }

    /// Step towards older entries (↑)
    pub fn recall_previous(&mut self) -> Recall<'_> {
        if self.entries.is_empty() {
            return Recall::Keep;
        }

        let index = match self.cursor {
            None => self.entries.len() - 1,
            Some(index) => index.saturating_sub(1),
        };
        self.cursor = Some(index);

        match self.entries.get(index) {
            Some(entry) => Recall::Show(entry),
            None => Recall::Keep,
        }
    }

    /// Step towards newer entries (↓)
    pub fn recall_next(&mut self) -> Recall<'_> {
        let Some(index) = self.cursor else {
            return Recall::Keep;
        };

        let next = index + 1;
        if next >= self.entries.len() {
            self.cursor = None;
            return Recall::Blank;
        }

        self.cursor = Some(next);
        Recall::Show(&self.entries[next])
    }

    /// Current recall position
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// All entries, oldest first
    #[cfg(test)]
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Get entry count
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
