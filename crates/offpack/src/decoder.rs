//! Recursive-descent decoder for the offpack text format.

use crate::types::CallableRef;
use crate::types::Error;
use crate::types::Result;
use crate::types::Style;
use crate::types::Value;
use crate::types::MAX_DEPTH;

/// Decodes a single value from its textual wire form.
///
/// The whole input must be consumed; trailing bytes are an error.
pub fn decode(text: &str) -> Result<Value> {
    let mut dec = Decoder::new(text);
    let value = dec.value()?;
    dec.finish()?;
    Ok(value)
}

/// Cursor over the textual form.
pub struct Decoder<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Decoder<'a> {
    pub fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Decodes the next value.
    pub fn value(&mut self) -> Result<Value> {
        self.read_value(0)
    }

    /// Asserts that nothing but whitespace remains.
    pub fn finish(&mut self) -> Result<()> {
        self.skip_ws();
        if self.pos < self.src.len() {
            return Err(Error::TrailingData(self.pos));
        }
        Ok(())
    }

    fn read_value(&mut self, depth: usize) -> Result<Value> {
        if depth > MAX_DEPTH {
            return Err(Error::DepthLimitExceeded);
        }
        self.skip_ws();
        match self.peek().ok_or(Error::UnexpectedEnd)? {
            b'n' => self.read_keyword("null", Value::Unit),
            b't' => self.read_keyword("true", Value::Bool(true)),
            b'f' => self.read_keyword("false", Value::Bool(false)),
            b'"' => {
                let s = self.read_string()?;
                Ok(revive(s))
            }
            b'[' => self.read_list(depth),
            b'{' => self.read_map(depth),
            b'-' | b'0'..=b'9' => self.read_number(),
            _ => Err(Error::Unexpected(self.pos)),
        }
    }

    fn read_keyword(&mut self, word: &str, value: Value) -> Result<Value> {
        if self.src[self.pos..].starts_with(word) {
            self.pos += word.len();
            Ok(value)
        } else {
            Err(Error::Unexpected(self.pos))
        }
    }

    fn read_list(&mut self, depth: usize) -> Result<Value> {
        self.expect(b'[')?;
        let mut items = Vec::new();
        self.skip_ws();
        if self.peek() == Some(b']') {
            self.pos += 1;
            return Ok(Value::List(items));
        }
        loop {
            items.push(self.read_value(depth + 1)?);
            self.skip_ws();
            match self.next().ok_or(Error::UnexpectedEnd)? {
                b',' => continue,
                b']' => return Ok(Value::List(items)),
                _ => return Err(Error::Unexpected(self.pos - 1)),
            }
        }
    }

    fn read_map(&mut self, depth: usize) -> Result<Value> {
        self.expect(b'{')?;
        let mut entries = Vec::new();
        self.skip_ws();
        if self.peek() == Some(b'}') {
            self.pos += 1;
            return Ok(Value::Map(entries));
        }
        loop {
            self.skip_ws();
            // Keys are plain strings; they never revive into callables.
            let key = self.read_string()?;
            self.skip_ws();
            self.expect(b':')?;
            let value = self.read_value(depth + 1)?;
            entries.push((key, value));
            self.skip_ws();
            match self.next().ok_or(Error::UnexpectedEnd)? {
                b',' => continue,
                b'}' => return Ok(Value::Map(entries)),
                _ => return Err(Error::Unexpected(self.pos - 1)),
            }
        }
    }

    fn read_string(&mut self) -> Result<String> {
        self.expect(b'"')?;
        let mut out = String::new();
        loop {
            let rest = &self.src[self.pos..];
            let mut chars = rest.char_indices();
            let (_, c) = chars.next().ok_or(Error::UnexpectedEnd)?;
            self.pos += c.len_utf8();
            match c {
                '"' => return Ok(out),
                '\\' => out.push(self.read_escape()?),
                c => out.push(c),
            }
        }
    }

    fn read_escape(&mut self) -> Result<char> {
        let at = self.pos - 1;
        let c = self.next().ok_or(Error::UnexpectedEnd)?;
        match c {
            b'"' => Ok('"'),
            b'\\' => Ok('\\'),
            b'/' => Ok('/'),
            b'n' => Ok('\n'),
            b'r' => Ok('\r'),
            b't' => Ok('\t'),
            b'u' => {
                let hex = self
                    .src
                    .get(self.pos..self.pos + 4)
                    .ok_or(Error::UnexpectedEnd)?;
                let code = u32::from_str_radix(hex, 16).map_err(|_| Error::InvalidEscape(at))?;
                self.pos += 4;
                char::from_u32(code).ok_or(Error::InvalidEscape(at))
            }
            _ => Err(Error::InvalidEscape(at)),
        }
    }

    fn read_number(&mut self) -> Result<Value> {
        let start = self.pos;
        if self.peek() == Some(b'-') {
            self.pos += 1;
        }
        let mut float = false;
        while let Some(b) = self.peek() {
            match b {
                b'0'..=b'9' => self.pos += 1,
                b'.' | b'e' | b'E' | b'+' | b'-' => {
                    float = true;
                    self.pos += 1;
                }
                _ => break,
            }
        }
        let lexeme = &self.src[start..self.pos];
        if float {
            let v: f64 = lexeme.parse().map_err(|_| Error::InvalidNumber(start))?;
            if !v.is_finite() {
                return Err(Error::InvalidNumber(start));
            }
            Ok(Value::Float(v))
        } else {
            let v: i64 = lexeme.parse().map_err(|_| Error::InvalidNumber(start))?;
            Ok(Value::Int(v))
        }
    }

    fn skip_ws(&mut self) {
        while let Some(b) = self.peek() {
            if b == b' ' || b == b'\t' || b == b'\n' || b == b'\r' {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn peek(&self) -> Option<u8> {
        self.src.as_bytes().get(self.pos).copied()
    }

    fn next(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.pos += 1;
        Some(b)
    }

    fn expect(&mut self, b: u8) -> Result<()> {
        match self.next() {
            Some(found) if found == b => Ok(()),
            Some(_) => Err(Error::Unexpected(self.pos - 1)),
            None => Err(Error::UnexpectedEnd),
        }
    }
}

/// Revives a decoded string into a callable reference when it carries a
/// well-formed style tag with a non-empty key.
///
/// Everything else passes through unchanged, including strings shorter than
/// a tag prefix and bare prefixes with no key. Pass-through is the default,
/// not a contract.
fn revive(s: String) -> Value {
    for style in [Style::Named, Style::Lambda] {
        if let Some(key) = s.strip_prefix(style.tag()) {
            if !key.is_empty() {
                return Value::Callable(CallableRef { style, key: key.to_string() });
            }
        }
    }
    Value::Str(s)
}
