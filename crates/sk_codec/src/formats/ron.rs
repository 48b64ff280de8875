use ron::ser::PrettyConfig;
use serde_core::Serialize;
use serde_core::de::DeserializeSeed;

use crate::{CodecError, DataDecoder, DataEncoder};

const FORMAT: &str = "RON";

/// Rusty Object Notation through `ron`.
///
/// ```
/// use serde::Deserialize;
/// use sk_codec::{DataDecoder, RonCoder};
///
/// #[derive(Deserialize)]
/// struct Window {
///     title: String,
///     size: (u32, u32),
/// }
///
/// let window: Window = RonCoder::default()
///     .decode(br#"(title: "main", size: (800, 600))"#)
///     .unwrap();
///
/// assert_eq!(window.title, "main");
/// assert_eq!(window.size, (800, 600));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RonCoder {
    /// Indent encoded output.
    pub pretty: bool,
}

impl RonCoder {
    #[inline]
    pub const fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl DataDecoder for RonCoder {
    fn decode_seed<'de, S: DeserializeSeed<'de>>(
        &self,
        seed: S,
        bytes: &'de [u8],
    ) -> Result<S::Value, CodecError> {
        log::trace!("decoding {} bytes of {FORMAT}", bytes.len());

        let text = core::str::from_utf8(bytes).map_err(CodecError::decode(FORMAT))?;
        let mut deserializer =
            ron::Deserializer::from_str(text).map_err(CodecError::decode(FORMAT))?;
        let value = seed
            .deserialize(&mut deserializer)
            .map_err(CodecError::decode(FORMAT))?;
        deserializer.end().map_err(CodecError::decode(FORMAT))?;
        Ok(value)
    }
}

impl DataEncoder for RonCoder {
    fn encode<T: ?Sized + Serialize>(&self, value: &T) -> Result<Vec<u8>, CodecError> {
        let text = if self.pretty {
            ron::ser::to_string_pretty(value, PrettyConfig::default())
        } else {
            ron::to_string(value)
        };
        text.map(String::into_bytes)
            .map_err(CodecError::encode(FORMAT))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use serde::{Deserialize, Serialize};

    use super::RonCoder;
    use crate::{CodecError, DataDecoder, DataEncoder};

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    enum Shape {
        Circle { radius: f32 },
        Square(f32),
    }

    #[test]
    fn enums_keep_their_variant_names() {
        let coder = RonCoder::default();
        let bytes = coder.encode(&Shape::Circle { radius: 1.5 }).unwrap();
        assert_eq!(bytes, b"Circle(radius:1.5)");

        let shape: Shape = coder.decode(b"Square(2.0)").unwrap();
        assert_eq!(shape, Shape::Square(2.0));
    }

    #[test]
    fn maps_decode() {
        let map: BTreeMap<String, u8> = RonCoder::default()
            .decode(br#"{"a": 1, "b": 2}"#)
            .unwrap();
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn invalid_utf8_is_a_decode_error() {
        let err = RonCoder::default().decode::<u8>(&[0xff, 0xfe]).unwrap_err();
        assert_eq!(err.format(), "RON");
        assert!(matches!(err, CodecError::Decode { .. }));
    }
}
