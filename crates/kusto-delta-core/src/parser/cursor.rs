use crate::schema::EntityName;
use crate::{DeltaError, Result};

/// A character cursor over a control script. Scanning primitives only;
/// command structure lives in the factories.
pub(super) struct Cursor<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub(super) fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    pub(super) fn offset(&self) -> usize {
        self.pos
    }

    pub(super) fn is_eof(&mut self) -> bool {
        self.skip_trivia();
        self.pos >= self.src.len()
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek_char(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek_char()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    /// Skips whitespace and `//` line comments.
    pub(super) fn skip_trivia(&mut self) {
        loop {
            match self.peek_char() {
                Some(ch) if ch.is_whitespace() => {
                    self.bump();
                }
                Some('/') if self.rest().starts_with("//") => {
                    while let Some(ch) = self.bump() {
                        if ch == '\n' {
                            break;
                        }
                    }
                }
                _ => return,
            }
        }
    }

    pub(super) fn eat(&mut self, expected: char) -> bool {
        self.skip_trivia();
        if self.peek_char() == Some(expected) {
            self.bump();
            true
        } else {
            false
        }
    }

    pub(super) fn expect(&mut self, expected: char) -> Result<()> {
        if self.eat(expected) {
            Ok(())
        } else {
            Err(DeltaError::parse(format!(
                "expected `{}` at `{}`",
                expected,
                self.current_line()
            )))
        }
    }

    /// `[A-Za-z_][A-Za-z0-9_-]*`; the dash admits compound verbs such as
    /// `create-merge`.
    pub(super) fn read_word(&mut self) -> Result<&'a str> {
        self.skip_trivia();
        let rest = self.rest();
        let mut len = 0;
        for ch in rest.chars() {
            let valid = if len == 0 {
                ch.is_ascii_alphabetic() || ch == '_'
            } else {
                ch.is_ascii_alphanumeric() || ch == '_' || ch == '-'
            };
            if !valid {
                break;
            }
            len += ch.len_utf8();
        }
        if len == 0 {
            return Err(DeltaError::parse(format!(
                "expected identifier at `{}`",
                self.current_line()
            )));
        }
        self.pos += len;
        Ok(&rest[..len])
    }

    pub(super) fn peek_word(&mut self) -> Option<&'a str> {
        self.skip_trivia();
        let mut probe = Cursor {
            src: self.src,
            pos: self.pos,
        };
        probe.read_word().ok()
    }

    /// Consumes `keyword` if it is the next word.
    pub(super) fn try_keyword(&mut self, keyword: &str) -> bool {
        if self.peek_word() == Some(keyword) {
            self.read_word().expect("peeked word reads");
            true
        } else {
            false
        }
    }

    pub(super) fn peek_is_quote(&mut self) -> bool {
        self.skip_trivia();
        matches!(self.peek_char(), Some('\'') | Some('"'))
    }

    /// A bare word or a `['...']` / `["..."]` bracket-quoted name.
    pub(super) fn read_entity_name(&mut self) -> Result<EntityName> {
        self.skip_trivia();
        if self.peek_char() == Some('[') {
            self.bump();
            let name = self.read_string_literal()?;
            self.expect(']')?;
            return Ok(EntityName::new(name));
        }
        Ok(EntityName::new(self.read_word()?))
    }

    /// A single- or double-quoted string with backslash escapes.
    pub(super) fn read_string_literal(&mut self) -> Result<String> {
        self.skip_trivia();
        let quote = match self.peek_char() {
            Some(ch @ ('\'' | '"')) => ch,
            _ => {
                return Err(DeltaError::parse(format!(
                    "expected string literal at `{}`",
                    self.current_line()
                )))
            }
        };
        self.bump();
        let mut out = String::new();
        loop {
            match self.bump() {
                None => return Err(DeltaError::parse("unterminated string literal")),
                Some(ch) if ch == quote => return Ok(out),
                Some('\\') => match self.bump() {
                    Some('n') => out.push('\n'),
                    Some('r') => out.push('\r'),
                    Some('t') => out.push('\t'),
                    Some(ch @ ('\\' | '\'' | '"')) => out.push(ch),
                    Some(ch) => {
                        return Err(DeltaError::parse(format!("unknown escape `\\{ch}`")))
                    }
                    None => return Err(DeltaError::parse("unterminated string literal")),
                },
                Some(ch) => out.push(ch),
            }
        }
    }

    /// The raw inside of a ```` ``` ```` block, trimmed.
    pub(super) fn read_backtick_block(&mut self) -> Result<&'a str> {
        self.skip_trivia();
        if !self.rest().starts_with("```") {
            return Err(DeltaError::parse(format!(
                "expected ``` block at `{}`",
                self.current_line()
            )));
        }
        self.pos += 3;
        let rest = self.rest();
        let end = rest
            .find("```")
            .ok_or_else(|| DeltaError::parse("unterminated ``` block"))?;
        let inner = &rest[..end];
        self.pos += end + 3;
        Ok(inner.trim())
    }

    /// Balanced `(`...`)` capture, string-aware; the trimmed inside.
    pub(super) fn read_parenthesized(&mut self) -> Result<String> {
        self.read_balanced('(', ')')
    }

    /// Balanced `{`...`}` capture, string-aware; the trimmed inside.
    pub(super) fn read_braced(&mut self) -> Result<String> {
        self.read_balanced('{', '}')
    }

    fn read_balanced(&mut self, open: char, close: char) -> Result<String> {
        self.expect(open)?;
        let start = self.pos;
        let mut depth = 1usize;
        loop {
            match self.peek_char() {
                None => {
                    return Err(DeltaError::parse(format!(
                        "unbalanced `{open}`...`{close}` block"
                    )))
                }
                Some('\'' | '"') => {
                    // Skip string contents so quoted delimiters don't count
                    self.read_string_literal()?;
                }
                Some(ch) => {
                    if ch == open {
                        depth += 1;
                    } else if ch == close {
                        depth -= 1;
                        if depth == 0 {
                            let inner = &self.src[start..self.pos];
                            self.bump();
                            return Ok(inner.trim().to_string());
                        }
                    }
                    self.bump();
                }
            }
        }
    }

    /// Raw text up to (not including) `stop`, consumed and trimmed.
    pub(super) fn read_until(&mut self, stop: char) -> Result<&'a str> {
        self.skip_trivia();
        let rest = self.rest();
        let end = rest.find(stop).ok_or_else(|| {
            DeltaError::parse(format!("expected `{stop}` at `{}`", self.current_line()))
        })?;
        self.pos += end;
        Ok(rest[..end].trim())
    }

    /// A scalar value: characters up to whitespace, `,`, or EOF.
    pub(super) fn read_scalar(&mut self) -> &'a str {
        self.skip_trivia();
        let rest = self.rest();
        let mut len = 0;
        for ch in rest.chars() {
            if ch.is_whitespace() || ch == ',' {
                break;
            }
            len += ch.len_utf8();
        }
        self.pos += len;
        &rest[..len]
    }

    /// The rest of the current line, for error messages.
    pub(super) fn current_line(&self) -> &'a str {
        let rest = self.rest();
        let line = rest.lines().next().unwrap_or("");
        if line.is_empty() {
            "<end of script>"
        } else {
            line.trim()
        }
    }

    /// The source text of the command that starts at `start`: everything
    /// up to the next line that begins a new command, or EOF.
    pub(super) fn command_text(&self, start: usize) -> &'a str {
        let text = &self.src[start..];
        let mut end = text.len();
        let mut offset = 0;
        for line in text.split_inclusive('\n') {
            if offset > 0 && line.trim_start().starts_with('.') {
                end = offset;
                break;
            }
            offset += line.len();
        }
        text[..end].trim()
    }
}
