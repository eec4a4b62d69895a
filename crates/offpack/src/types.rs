//! Core types for the offpack textual format.

/// Maximum nesting depth accepted by both the encoder and the decoder.
///
/// An owned `Value` tree cannot be cyclic, so unbounded depth is the
/// structural analog of a cyclic graph: both are refused before anything
/// crosses the boundary.
pub const MAX_DEPTH: usize = 64;

/// Declaration style of a callable reference.
///
/// The style is carried as a leading tag in the textual form because the
/// two styles are rebuilt differently on the receiving side: named entries
/// are looked up in the catalog, lambda entries are consumed from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Style {
    Named,
    Lambda,
}

impl Style {
    /// The textual prefix carried by this style.
    pub const fn tag(self) -> &'static str {
        match self {
            Style::Named => "named://",
            Style::Lambda => "lambda://",
        }
    }
}

/// Reference to a task function in a closed catalog.
///
/// This is what travels across the boundary in place of live code: a
/// declaration style plus the catalog key the receiving side resolves.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CallableRef {
    pub style: Style,
    pub key: String,
}

impl CallableRef {
    pub fn named(key: impl Into<String>) -> Self {
        Self { style: Style::Named, key: key.into() }
    }

    pub fn lambda(key: impl Into<String>) -> Self {
        Self { style: Style::Lambda, key: key.into() }
    }

    /// The tagged string form, e.g. `named://double`.
    pub fn tagged(&self) -> String {
        format!("{}{}", self.style.tag(), self.key)
    }
}

impl std::fmt::Display for CallableRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.style.tag(), self.key)
    }
}

/// A dynamic value crossing the isolation boundary.
///
/// This is the lingua franca on both sides: parameters go out as a `Value`,
/// results come back as one. Callable references are first-class so that
/// they can be embedded anywhere inside a parameter structure.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Unit,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
    Map(Vec<(String, Value)>),
    Callable(CallableRef),
}

impl Value {
    pub fn is_callable(&self) -> bool {
        matches!(self, Value::Callable(_))
    }

    pub fn str(s: impl Into<String>) -> Self {
        Value::Str(s.into())
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self { Value::Bool(v) }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self { Value::Int(v) }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self { Value::Float(v) }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self { Value::Str(v.to_string()) }
}

impl From<CallableRef> for Value {
    fn from(v: CallableRef) -> Self { Value::Callable(v) }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Input ended mid-value.
    UnexpectedEnd,
    /// An unexpected byte at the given position.
    Unexpected(usize),
    /// A malformed escape sequence inside a string literal.
    InvalidEscape(usize),
    /// A numeric literal that fits no representable number.
    InvalidNumber(usize),
    /// Bytes remained after the top-level value.
    TrailingData(usize),
    /// Nesting exceeded [`MAX_DEPTH`].
    DepthLimitExceeded,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;
