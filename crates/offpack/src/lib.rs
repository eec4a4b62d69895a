//! # offpack
//!
//! The textual wire format for offloaded tasks.
//!
//! ## Architecture
//!
//! offpack is the serialization layer of the offcore workspace. It turns a
//! dynamic [`Value`] tree into an opaque textual encoding that can cross an
//! isolation boundary which accepts only data, and turns that text back into
//! the same tree on the other side.
//!
//! Callables never travel as source text. A [`CallableRef`] addresses an
//! entry in a closed catalog of compiled task functions, and is encoded as a
//! tagged string (`named://key` or `lambda://key`). The tag matters: the two
//! declaration styles take different reconstruction paths on the receiving
//! side. References may appear anywhere inside a structure, not just at the
//! top level.
//!
//! ## Lossy cases
//!
//! Non-finite floats have no representation in the text form and are dropped
//! (encoded as `null`). Structures nested beyond [`MAX_DEPTH`] fail to
//! encode rather than recurse unboundedly.

pub mod types;
pub mod encoder;
pub mod decoder;

pub use types::Result;
pub use types::Error;
pub use types::Value;
pub use types::CallableRef;
pub use types::Style;
pub use types::MAX_DEPTH;

pub use encoder::Encoder;
pub use encoder::encode;

pub use decoder::Decoder;
pub use decoder::decode;
