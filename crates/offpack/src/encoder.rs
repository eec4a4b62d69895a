//! Textual encoder for offpack values.

use crate::types::Error;
use crate::types::Result;
use crate::types::Value;
use crate::types::MAX_DEPTH;

/// Encodes a single value into its textual wire form.
pub fn encode(value: &Value) -> Result<String> {
    let mut enc = Encoder::new();
    enc.value(value)?;
    Ok(enc.into_text())
}

/// A growable buffer that encodes values into the offpack text format.
pub struct Encoder {
    buf: String,
}

impl Encoder {
    pub fn new() -> Self {
        Self { buf: String::new() }
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self { buf: String::with_capacity(cap) }
    }

    pub fn as_text(&self) -> &str {
        &self.buf
    }

    pub fn into_text(self) -> String {
        self.buf
    }

    /// Encodes one value, walking the structure recursively.
    ///
    /// Callable references are written as tagged strings in place, so they
    /// are handled at any depth, not just at the root.
    pub fn value(&mut self, value: &Value) -> Result<&mut Self> {
        self.write_value(value, 0)?;
        Ok(self)
    }

    fn write_value(&mut self, value: &Value, depth: usize) -> Result<()> {
        if depth > MAX_DEPTH {
            return Err(Error::DepthLimitExceeded);
        }
        match value {
            Value::Unit => self.buf.push_str("null"),
            Value::Bool(true) => self.buf.push_str("true"),
            Value::Bool(false) => self.buf.push_str("false"),
            Value::Int(v) => {
                self.buf.push_str(&v.to_string());
            }
            Value::Float(v) => {
                if v.is_finite() {
                    // {:?} keeps the fraction point on integral floats, so
                    // floats survive the round trip as floats.
                    self.buf.push_str(&format!("{:?}", v));
                } else {
                    // No structural representation; dropped.
                    self.buf.push_str("null");
                }
            }
            Value::Str(s) => self.write_string(s),
            Value::Callable(c) => self.write_string(&c.tagged()),
            Value::List(items) => {
                self.buf.push('[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        self.buf.push(',');
                    }
                    self.write_value(item, depth + 1)?;
                }
                self.buf.push(']');
            }
            Value::Map(entries) => {
                self.buf.push('{');
                for (i, (key, item)) in entries.iter().enumerate() {
                    if i > 0 {
                        self.buf.push(',');
                    }
                    self.write_string(key);
                    self.buf.push(':');
                    self.write_value(item, depth + 1)?;
                }
                self.buf.push('}');
            }
        }
        Ok(())
    }

    fn write_string(&mut self, s: &str) {
        self.buf.push('"');
        for c in s.chars() {
            match c {
                '"' => self.buf.push_str("\\\""),
                '\\' => self.buf.push_str("\\\\"),
                '\n' => self.buf.push_str("\\n"),
                '\r' => self.buf.push_str("\\r"),
                '\t' => self.buf.push_str("\\t"),
                c if (c as u32) < 0x20 => {
                    self.buf.push_str(&format!("\\u{:04x}", c as u32));
                }
                c => self.buf.push(c),
            }
        }
        self.buf.push('"');
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}
