//! Command line tokenizer
//!
//! Splits on whitespace. A token that starts with `"` or `'` and has a
//! matching closing quote later in the line is taken verbatim without the
//! quotes. Anything else is a run of non-whitespace characters, so stray or
//! unmatched quotes stay in the token as literal characters. No escapes.

/// Split a raw line into tokens
pub fn tokenize(line: &str) -> Vec<String> {
    let chars: Vec<char> = line.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];

        if ch.is_whitespace() {
            i += 1;
            continue;
        }

        if ch == '"' || ch == '\'' {
            if let Some(len) = chars[i + 1..].iter().position(|&c| c == ch) {
                tokens.push(chars[i + 1..i + 1 + len].iter().collect());
                i += len + 2;
                continue;
            }
        }

        let start = i;
        while i < chars.len() && !chars[i].is_whitespace() {
            i += 1;
        }
        tokens.push(chars[start..i].iter().collect());
    }

    tokens
}

/// Split a line into the command word and its arguments
pub fn split_command(line: &str) -> Option<(String, Vec<String>)> {
    let mut tokens = tokenize(line).into_iter();
    let name = tokens.next()?;
    Some((name, tokens.collect()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(line: &str) -> Vec<String> {
        tokenize(line)
    }

    #[test]
    fn test_whitespace_split() {
        assert_eq!(toks("echo  a\tb "), ["echo", "a", "b"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(toks("").is_empty());
        assert!(toks("   \t ").is_empty());
    }

    #[test]
    fn test_double_quotes() {
        assert_eq!(toks(r#"echo a "b c" d"#), ["echo", "a", "b c", "d"]);
    }

    #[test]
    fn test_single_quotes_keep_interior_verbatim() {
        assert_eq!(toks("echo '  x \"y\" '"), ["echo", "  x \"y\" "]);
    }

    #[test]
    fn test_empty_quotes_make_an_empty_token() {
        assert_eq!(toks(r#"echo "" x"#), ["echo", "", "x"]);
    }

    #[test]
    fn test_unmatched_quote_is_literal() {
        assert_eq!(toks(r#"echo "abc def"#), ["echo", "\"abc", "def"]);
    }

    #[test]
    fn test_quote_inside_word_is_literal() {
        assert_eq!(toks(r#"a"b c""#), ["a\"b", "c\""]);
    }

    #[test]
    fn test_quoted_token_ends_at_closing_quote() {
        assert_eq!(toks(r#""ab"cd"#), ["ab", "cd"]);
    }

    #[test]
    fn test_split_command() {
        assert_eq!(
            split_command("cat about.txt"),
            Some(("cat".to_string(), vec!["about.txt".to_string()]))
        );
        assert_eq!(split_command("  "), None);
    }
}
