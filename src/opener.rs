//! URL opening for the `open` command
//!
//! The terminal never touches the browser directly; it goes through
//! [`UrlOpener`] so sessions can run without a desktop (and in tests).

use std::io;

use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
#[error("{0}")]
pub struct OpenError(#[from] io::Error);

pub trait UrlOpener {
    /// Open `url` in a new browser tab/window
    fn open(&mut self, url: &str) -> Result<(), OpenError>;
}

/// Opens URLs with the desktop's default browser
#[derive(Debug, Default)]
pub struct SystemOpener;

impl UrlOpener for SystemOpener {
    fn open(&mut self, url: &str) -> Result<(), OpenError> {
        info!("Opening {}", url);
        open::that(url)?;
        Ok(())
    }
}

/// Prepend `https://` unless the URL already names http or https
pub fn normalize_url(raw: &str) -> String {
    if raw.starts_with("http://") || raw.starts_with("https://") {
        raw.to_string()
    } else {
        format!("https://{}", raw)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_url() {
        assert_eq!(normalize_url("example.com"), "https://example.com");
        assert_eq!(normalize_url("http://example.com"), "http://example.com");
        assert_eq!(normalize_url("https://example.com/x"), "https://example.com/x");
        assert_eq!(normalize_url("ftp://host"), "https://ftp://host");
    }
}
