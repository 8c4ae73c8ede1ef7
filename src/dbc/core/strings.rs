// Utilities for tokenizing DBC statements.
//
// Quoted strings support escaped quotes (\") and backslashes (\\), and may span
// several lines, which is common in CM_ comments.

use std::str::FromStr;

/// Single-character punctuation tokens of the DBC grammar.
const PUNCTUATION: &[char] = &[':', ';', ',', '(', ')', '[', ']', '|', '@'];

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Token {
    Word(String),
    /// Content of a quoted string, unescaped.
    Quoted(String),
    Punct(char),
}

// Count unescaped double quotes in a string.
// A quote is considered escaped if immediately preceded by an odd number of backslashes.
pub(crate) fn count_unescaped_quotes(s: &str) -> usize {
    let mut count = 0usize;
    let mut backslashes = 0usize;
    for ch in s.chars() {
        if ch == '\\' {
            backslashes += 1;
            continue;
        }
        if ch == '"' && backslashes % 2 == 0 {
            count += 1;
        }
        backslashes = 0;
    }
    count
}

// True when every quoted segment is closed.
pub(crate) fn quotes_balanced(s: &str) -> bool {
    count_unescaped_quotes(s) % 2 == 0
}

// True when the statement is closed: balanced quotes and a final ';'.
pub(crate) fn statement_complete(s: &str) -> bool {
    quotes_balanced(s) && s.trim_end().ends_with(';')
}

// Escape a string for emission between double quotes.
pub(crate) fn escape_dbc_string(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Splits a statement into tokens.
///
/// Fails only on an unterminated quoted string.
pub(crate) fn tokenize(s: &str) -> Result<Vec<Token>, String> {
    let mut tokens: Vec<Token> = Vec::new();
    let mut chars = s.chars().peekable();

    while let Some(&ch) = chars.peek() {
        if ch.is_whitespace() {
            chars.next();
        } else if ch == '"' {
            chars.next();
            let mut content = String::new();
            let mut closed = false;
            while let Some(c) = chars.next() {
                match c {
                    '"' => {
                        closed = true;
                        break;
                    }
                    '\\' => match chars.peek() {
                        Some(&next @ ('"' | '\\')) => {
                            content.push(next);
                            chars.next();
                        }
                        _ => content.push('\\'),
                    },
                    _ => content.push(c),
                }
            }
            if !closed {
                return Err("unterminated quoted string".to_string());
            }
            tokens.push(Token::Quoted(content));
        } else if PUNCTUATION.contains(&ch) {
            chars.next();
            tokens.push(Token::Punct(ch));
        } else {
            let mut word = String::new();
            while let Some(&c) = chars.peek() {
                if c.is_whitespace() || c == '"' || PUNCTUATION.contains(&c) {
                    break;
                }
                word.push(c);
                chars.next();
            }
            tokens.push(Token::Word(word));
        }
    }

    Ok(tokens)
}

/// Sequential reader over the tokens of one statement.
pub(crate) struct Cursor<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(tokens: &'a [Token]) -> Self {
        Cursor { tokens, pos: 0 }
    }

    pub(crate) fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    pub(crate) fn next(&mut self) -> Option<&'a Token> {
        let tok = self.tokens.get(self.pos);
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    /// True when only an optional final `;` remains.
    pub(crate) fn at_end(&self) -> bool {
        matches!(self.tokens.get(self.pos..), Some([]) | Some([Token::Punct(';')]))
    }

    pub(crate) fn word(&mut self, what: &str) -> Result<&'a str, String> {
        match self.next() {
            Some(Token::Word(w)) => Ok(w.as_str()),
            other => Err(format!("expected {}, found {}", what, describe(other))),
        }
    }

    pub(crate) fn quoted(&mut self, what: &str) -> Result<&'a str, String> {
        match self.next() {
            Some(Token::Quoted(q)) => Ok(q.as_str()),
            other => Err(format!("expected quoted {}, found {}", what, describe(other))),
        }
    }

    pub(crate) fn number<T: FromStr>(&mut self, what: &str) -> Result<T, String> {
        let word: &str = self.word(what)?;
        word.parse::<T>()
            .map_err(|_| format!("invalid {} '{}'", what, word))
    }

    pub(crate) fn expect(&mut self, punct: char) -> Result<(), String> {
        match self.next() {
            Some(Token::Punct(p)) if *p == punct => Ok(()),
            other => Err(format!("expected '{}', found {}", punct, describe(other))),
        }
    }

    /// Consumes `punct` if it is the next token.
    pub(crate) fn eat(&mut self, punct: char) -> bool {
        if matches!(self.peek(), Some(Token::Punct(p)) if *p == punct) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Reads `<int> "<text>"` pairs until the end of the statement.
    pub(crate) fn choices(&mut self) -> Result<Vec<(i64, String)>, String> {
        let mut out: Vec<(i64, String)> = Vec::new();
        while !self.at_end() {
            let value: i64 = self.number("choice value")?;
            let text: &str = self.quoted("choice description")?;
            out.push((value, text.to_string()));
        }
        Ok(out)
    }
}

fn describe(tok: Option<&Token>) -> String {
    match tok {
        Some(Token::Word(w)) => format!("'{}'", w),
        Some(Token::Quoted(q)) => format!("\"{}\"", q),
        Some(Token::Punct(p)) => format!("'{}'", p),
        None => "end of statement".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_unescaped_quotes() {
        assert_eq!(count_unescaped_quotes("\"a\""), 2);
        assert_eq!(count_unescaped_quotes("\\\"a\\\""), 0);
        assert!(quotes_balanced("before \"x\" after"));
        assert!(!quotes_balanced("before \"x without end"));
    }

    #[test]
    fn test_statement_complete() {
        assert!(statement_complete("CM_ BO_ 1 \"done\";"));
        assert!(!statement_complete("CM_ BO_ 1 \"semi; inside"));
        assert!(!statement_complete("CM_ BO_ 1 \"closed\""));
        assert!(statement_complete("VAL_ 1 S 0 \"x\" ;  "));
    }

    #[test]
    fn test_tokenize_signal_line() {
        let tokens = tokenize("SG_ Speed m1 : 8|16@1- (0.1,-40) [-40|6513.5] \"km/h\" A,B").unwrap();
        let words: Vec<String> = tokens
            .iter()
            .map(|t| match t {
                Token::Word(w) => w.clone(),
                Token::Quoted(q) => format!("<{}>", q),
                Token::Punct(p) => p.to_string(),
            })
            .collect();
        assert_eq!(
            words,
            vec![
                "SG_", "Speed", "m1", ":", "8", "|", "16", "@", "1-", "(", "0.1", ",", "-40", ")",
                "[", "-40", "|", "6513.5", "]", "<km/h>", "A", ",", "B"
            ]
        );
    }

    #[test]
    fn test_tokenize_escapes_and_multiline() {
        let tokens = tokenize("CM_ \"say \\\"hi\\\"\nC:\\\\tmp\\x\";").unwrap();
        assert_eq!(tokens[1], Token::Quoted("say \"hi\"\nC:\\tmp\\x".to_string()));
        assert_eq!(tokens[2], Token::Punct(';'));
        assert!(tokenize("CM_ \"open").is_err());
    }

    #[test]
    fn test_escape_round_trip() {
        let text = "a \"quoted\" C:\\dir";
        let line = format!("\"{}\"", escape_dbc_string(text));
        assert_eq!(tokenize(&line).unwrap(), vec![Token::Quoted(text.to_string())]);
    }

    #[test]
    fn test_cursor_choices() {
        let tokens = tokenize("2 \"Error\" 1 \"On\" 0 \"Off\" ;").unwrap();
        let mut cur = Cursor::new(&tokens);
        let choices = cur.choices().unwrap();
        assert_eq!(choices.len(), 3);
        assert_eq!(choices[0], (2, "Error".to_string()));
        assert!(cur.at_end());
    }
}
