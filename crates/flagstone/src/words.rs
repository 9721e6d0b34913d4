//! Shell-word splitting for flag strings.
//!
//! CPPFLAGS and LINKFLAGS are flat shell-composed strings; the external build
//! engine hands them to a shell. Splitting them faithfully means honoring
//! quotes and escapes, and keeping a backtick substitution together as one
//! word. The backticks themselves are preserved: substitution happens in
//! [`crate::subst`], not here.

use crate::error::{FragmentError, Result};

/// Split a flag string into shell words.
///
/// Rules:
/// - unquoted whitespace separates words;
/// - `'...'` is literal; `"..."` is literal except `\"` and `\\`;
/// - a backslash escapes the next character outside quotes;
/// - `` `...` `` is kept verbatim, backticks included, as part of one word;
/// - quotes are stripped, the way a shell strips them after tokenizing.
pub fn split(input: &str) -> Result<Vec<String>> {
    let chars: Vec<char> = input.chars().collect();
    let mut words = Vec::new();
    let mut word = String::new();
    let mut has_word = false;

    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        match c {
            ' ' | '\t' | '\n' | '\r' => {
                if has_word {
                    words.push(std::mem::take(&mut word));
                    has_word = false;
                }
                i += 1;
            }
            '\'' => {
                has_word = true;
                i += 1;
                loop {
                    if i >= chars.len() {
                        return Err(FragmentError::UnterminatedQuote('\''));
                    }
                    if chars[i] == '\'' {
                        i += 1;
                        break;
                    }
                    word.push(chars[i]);
                    i += 1;
                }
            }
            '"' => {
                has_word = true;
                i += 1;
                loop {
                    if i >= chars.len() {
                        return Err(FragmentError::UnterminatedQuote('"'));
                    }
                    match chars[i] {
                        '"' => {
                            i += 1;
                            break;
                        }
                        '\\' if i + 1 < chars.len()
                            && (chars[i + 1] == '"' || chars[i + 1] == '\\') =>
                        {
                            word.push(chars[i + 1]);
                            i += 2;
                        }
                        other => {
                            word.push(other);
                            i += 1;
                        }
                    }
                }
            }
            '`' => {
                has_word = true;
                let mut body = String::new();
                i += 1;
                loop {
                    if i >= chars.len() {
                        return Err(FragmentError::UnterminatedSubstitution(body));
                    }
                    if chars[i] == '`' {
                        i += 1;
                        break;
                    }
                    body.push(chars[i]);
                    i += 1;
                }
                word.push('`');
                word.push_str(&body);
                word.push('`');
            }
            '\\' if i + 1 < chars.len() => {
                has_word = true;
                word.push(chars[i + 1]);
                i += 2;
            }
            other => {
                has_word = true;
                word.push(other);
                i += 1;
            }
        }
    }

    if has_word {
        words.push(word);
    }

    Ok(words)
}
