use serde_core::Serialize;
use serde_core::de::DeserializeSeed;

use crate::{CodecError, DataDecoder, DataEncoder};

const FORMAT: &str = "JSON";

/// JSON through `serde_json`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonCoder {
    /// Indent encoded output.
    pub pretty: bool,
}

impl JsonCoder {
    #[inline]
    pub const fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl DataDecoder for JsonCoder {
    fn decode_seed<'de, S: DeserializeSeed<'de>>(
        &self,
        seed: S,
        bytes: &'de [u8],
    ) -> Result<S::Value, CodecError> {
        log::trace!("decoding {} bytes of {FORMAT}", bytes.len());

        let mut deserializer = serde_json::Deserializer::from_slice(bytes);
        let value = seed
            .deserialize(&mut deserializer)
            .map_err(CodecError::decode(FORMAT))?;
        deserializer.end().map_err(CodecError::decode(FORMAT))?;
        Ok(value)
    }
}

impl DataEncoder for JsonCoder {
    fn encode<T: ?Sized + Serialize>(&self, value: &T) -> Result<Vec<u8>, CodecError> {
        let bytes = if self.pretty {
            serde_json::to_vec_pretty(value)
        } else {
            serde_json::to_vec(value)
        };
        bytes.map_err(CodecError::encode(FORMAT))
    }
}
