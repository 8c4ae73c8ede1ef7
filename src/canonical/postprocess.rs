//! Text rules applied to the rendered output.
//!
//! 1. `"  "` becomes `" "` (one left-to-right, non-overlapping pass).
//! 2. `" ;"` becomes `";"`.
//! 3. `\r\n` becomes `\n`.
//! 4. Runs of three or more `\n` become `\n\n`.
//! 5. The text ends with exactly one `\n`.
//!
//! Rules 1 and 2 are plain text substitutions and also touch quoted strings, unless
//! [`PostProcessOptions::preserve_quoted_spaces`] is set.

use std::sync::LazyLock;

use regex::Regex;

static BLANK_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PostProcessOptions {
    /// Leave text between double quotes out of rules 1 and 2.
    pub preserve_quoted_spaces: bool,
}

fn squeeze(segment: &str) -> String {
    segment.replace("  ", " ").replace(" ;", ";")
}

/// Applies `f` to every part of `text` outside double-quoted strings.
fn outside_quotes(text: &str, f: impl Fn(&str) -> String) -> String {
    let mut out = String::with_capacity(text.len());
    let mut start: usize = 0;
    let mut in_quotes = false;
    let mut escaped = false;

    for (i, ch) in text.char_indices() {
        if in_quotes {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                out.push_str(&text[start..=i]);
                start = i + 1;
                in_quotes = false;
            }
        } else if ch == '"' {
            out.push_str(&f(&text[start..i]));
            start = i;
            in_quotes = true;
        }
    }

    let rest: &str = &text[start..];
    if in_quotes {
        out.push_str(rest);
    } else {
        out.push_str(&f(rest));
    }
    out
}

pub fn postprocess(text: &str, options: &PostProcessOptions) -> String {
    let squeezed: String = if options.preserve_quoted_spaces {
        outside_quotes(text, squeeze)
    } else {
        squeeze(text)
    };

    let unix: String = squeezed.replace("\r\n", "\n");
    let collapsed = BLANK_RUN.replace_all(&unix, "\n\n");

    let mut out: String = collapsed.trim_end_matches('\n').to_string();
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(text: &str) -> String {
        postprocess(text, &PostProcessOptions::default())
    }

    #[test]
    fn test_spaces_and_semicolons() {
        assert_eq!(run("VAL_ 1 S 1 \"On\" 0 \"Off\" ;"), "VAL_ 1 S 1 \"On\" 0 \"Off\";\n");
        assert_eq!(run("BA_DEF_  \"X\" INT 0 1;"), "BA_DEF_ \"X\" INT 0 1;\n");
        // single pass: three spaces leave two
        assert_eq!(run("a   b"), "a  b\n");
        // plain substitution also reaches quoted text
        assert_eq!(run("CM_ \"a  b ;\";"), "CM_ \"a b;\";\n");
    }

    #[test]
    fn test_newlines() {
        let text = "VERSION \"\"\r\n\r\n\r\n\r\n\r\nBU_: A\r\n\r\n\r\n";
        assert_eq!(run(text), "VERSION \"\"\n\nBU_: A\n");
        assert_eq!(run("x"), "x\n");
        assert_eq!(run(""), "\n");
    }

    #[test]
    fn test_preserve_quoted_spaces() {
        let options = PostProcessOptions {
            preserve_quoted_spaces: true,
        };
        let text = "CM_  SG_ 1 S \"a  b ;\" ;\r\nCM_ \"say \\\"x  y\\\"\"  ;";
        assert_eq!(
            postprocess(text, &options),
            "CM_ SG_ 1 S \"a  b ;\";\nCM_ \"say \\\"x  y\\\"\";\n"
        );
    }
}
