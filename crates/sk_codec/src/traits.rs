use core::marker::PhantomData;

use serde_core::Serialize;
use serde_core::de::{DeserializeOwned, DeserializeSeed};

use crate::{CodecError, DeserializerUnwrapper};

/// A format that decodes values from bytes.
pub trait DataDecoder {
    /// Decodes the value produced by `seed` from `bytes`.
    ///
    /// Trailing input after the value is an error.
    fn decode_seed<'de, S: DeserializeSeed<'de>>(
        &self,
        seed: S,
        bytes: &'de [u8],
    ) -> Result<S::Value, CodecError>;

    /// Decodes a `T` from `bytes`.
    #[inline]
    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, CodecError> {
        self.decode_seed(PhantomData::<T>, bytes)
    }

    /// Hands the live deserializer of `bytes` to `f`.
    ///
    /// ```
    /// use std::collections::BTreeMap;
    ///
    /// use sk_codec::{DataDecoder, JsonCoder};
    ///
    /// let pairs = JsonCoder::default()
    ///     .decode_with(br#"{"a":"b"}"#, |de| {
    ///         erased_serde::deserialize::<BTreeMap<String, String>>(de)
    ///     })
    ///     .unwrap();
    ///
    /// assert_eq!(pairs["a"], "b");
    /// ```
    #[inline]
    fn decode_with<'de, R, F>(&self, bytes: &'de [u8], f: F) -> Result<R, CodecError>
    where
        F: FnOnce(&mut dyn erased_serde::Deserializer<'de>) -> Result<R, erased_serde::Error>,
    {
        self.decode_seed(DeserializerUnwrapper::new(f), bytes)
    }
}

/// A format that encodes values to bytes.
pub trait DataEncoder {
    fn encode<T: ?Sized + Serialize>(&self, value: &T) -> Result<Vec<u8>, CodecError>;
}

/// A format that both decodes and encodes.
pub trait DataCoder: DataDecoder + DataEncoder {}

impl<T: DataDecoder + DataEncoder> DataCoder for T {}
