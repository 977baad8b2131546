pub mod array;
pub mod codec;
pub mod envelope;
pub mod error;
pub mod infer;
pub mod types;
pub mod value;

// Re-export key types at crate root for convenience.
pub use array::NdArray;
pub use codec::{ArrayCodec, CodecOptions, decode_hook, encode_hook, from_str, to_string};
pub use envelope::{DATA_KEY, MARKER_KEY};
pub use error::{CodecError, CodecResult};
pub use types::{ArrayData, DataType, Scalar};
pub use value::{Object, Value};
