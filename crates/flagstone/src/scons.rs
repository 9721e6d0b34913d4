//! Reading build variables from SCons `custom.py` fragments.
//!
//! SCons projects keep per-checkout settings in a small Python file of plain
//! assignments. The subset accepted here covers what those files actually
//! contain: `NAME = 'string'` and `NAME = ['item', ...]`, with `#` comments
//! and list bodies spanning multiple lines. The name, `=`, and the value's
//! opening token must share a line, as Python itself requires. Arbitrary
//! Python is rejected.

use crate::error::{FragmentError, Result};
use crate::vars::BuildVars;
use std::path::{Path, PathBuf};

struct Assignment {
    line: usize,
    name: String,
    value: Value,
}

enum Value {
    Str(String),
    List(Vec<String>),
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
    line: usize,
}

impl Parser {
    fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            pos: 0,
            line: 1,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.get(self.pos).copied()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    fn err(&self, message: impl Into<String>) -> FragmentError {
        FragmentError::SconsSyntax {
            line: self.line,
            message: message.into(),
        }
    }

    /// Skip spaces and tabs without crossing a line boundary.
    fn skip_inline(&mut self) {
        while matches!(self.peek(), Some(' ' | '\t')) {
            self.bump();
        }
    }

    /// Skip whitespace and `#` comments.
    fn skip_trivia(&mut self) {
        while let Some(c) = self.peek() {
            if c == '#' {
                while let Some(c) = self.peek() {
                    if c == '\n' {
                        break;
                    }
                    self.bump();
                }
            } else if c.is_whitespace() {
                self.bump();
            } else {
                break;
            }
        }
    }

    fn parse(mut self) -> Result<Vec<Assignment>> {
        let mut assignments = Vec::new();
        loop {
            self.skip_trivia();
            if self.peek().is_none() {
                return Ok(assignments);
            }
            let line = self.line;
            let name = self.parse_ident()?;
            self.skip_inline();
            if self.peek() != Some('=') {
                return Err(self.err("expected `=` after variable name"));
            }
            self.bump();
            let value = self.parse_value()?;
            assignments.push(Assignment { line, name, value });
        }
    }

    fn parse_ident(&mut self) -> Result<String> {
        let mut name = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                name.push(c);
                self.bump();
            } else {
                break;
            }
        }
        if name.is_empty() {
            return Err(self.err("expected a variable name"));
        }
        Ok(name)
    }

    fn parse_value(&mut self) -> Result<Value> {
        self.skip_inline();
        match self.peek() {
            Some('\'' | '"') => Ok(Value::Str(self.parse_string()?)),
            Some('[') => Ok(Value::List(self.parse_list()?)),
            _ => Err(self.err("expected a quoted string or a list")),
        }
    }

    /// A single-line Python string literal. Recognized escapes produce their
    /// character; unknown escapes keep the backslash.
    fn parse_string(&mut self) -> Result<String> {
        let quote = match self.bump() {
            Some(c @ ('\'' | '"')) => c,
            _ => return Err(self.err("expected a quoted string")),
        };
        let mut out = String::new();
        loop {
            match self.bump() {
                None => return Err(self.err("unterminated string literal")),
                Some(c) if c == quote => return Ok(out),
                Some('\n') => return Err(self.err("unterminated string literal")),
                Some('\\') => match self.bump() {
                    None => return Err(self.err("unterminated string literal")),
                    Some(esc @ ('\\' | '\'' | '"')) => out.push(esc),
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some(other) => {
                        out.push('\\');
                        out.push(other);
                    }
                },
                Some(c) => out.push(c),
            }
        }
    }

    fn parse_list(&mut self) -> Result<Vec<String>> {
        self.bump();
        let mut items = Vec::new();
        loop {
            self.skip_trivia();
            match self.peek() {
                Some(']') => {
                    self.bump();
                    return Ok(items);
                }
                Some('\'' | '"') => {
                    items.push(self.parse_string()?);
                    self.skip_trivia();
                    match self.peek() {
                        Some(',') => {
                            self.bump();
                        }
                        Some(']') => {
                            self.bump();
                            return Ok(items);
                        }
                        _ => return Err(self.err("expected `,` or `]` in list")),
                    }
                }
                Some(_) => return Err(self.err("expected a quoted string in list")),
                None => return Err(self.err("unterminated list")),
            }
        }
    }
}

fn expect_string(line: usize, name: &str, value: Value) -> Result<String> {
    match value {
        Value::Str(s) => Ok(s),
        Value::List(_) => Err(FragmentError::SconsSyntax {
            line,
            message: format!("{name} takes a quoted string, not a list"),
        }),
    }
}

fn expect_list(line: usize, name: &str, value: Value) -> Result<Vec<String>> {
    match value {
        Value::List(items) => Ok(items),
        Value::Str(_) => Err(FragmentError::SconsSyntax {
            line,
            message: format!("{name} takes a list of quoted strings"),
        }),
    }
}

impl BuildVars {
    /// Parse a record from SCons `custom.py` text.
    ///
    /// Only the five record variables are accepted; assigning anything else
    /// is an error. Later assignments to the same variable overwrite earlier
    /// ones, matching how Python would execute the file.
    pub fn from_scons_str(input: &str) -> Result<BuildVars> {
        let mut vars = BuildVars::default();
        for Assignment { line, name, value } in Parser::new(input).parse()? {
            match name.as_str() {
                "CPPFLAGS" => vars.cppflags = expect_string(line, &name, value)?,
                "LINKFLAGS" => vars.linkflags = expect_string(line, &name, value)?,
                "CPPDEFINES" => vars.cppdefines = expect_list(line, &name, value)?,
                "CPPPATH" => {
                    let items = expect_list(line, &name, value)?;
                    vars.cpppath = items.into_iter().map(PathBuf::from).collect();
                }
                "LIBPATH" => {
                    let items = expect_list(line, &name, value)?;
                    vars.libpath = items.into_iter().map(PathBuf::from).collect();
                }
                _ => return Err(FragmentError::SconsUnknownVariable { line, name }),
            }
        }
        Ok(vars)
    }

    /// Load a record from a SCons `custom.py` file.
    pub fn from_scons_file(path: &Path) -> Result<BuildVars> {
        let content = std::fs::read_to_string(path)?;
        Self::from_scons_str(&content)
    }
}
