#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod erased;
mod error;
mod formats;
mod traits;
mod unwrap;

pub use erased::ErasedValue;
pub use error::CodecError;
pub use formats::{JsonCoder, RonCoder};
pub use traits::{DataCoder, DataDecoder, DataEncoder};
pub use unwrap::DeserializerUnwrapper;
