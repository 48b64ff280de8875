use serde_core::de::{DeserializeSeed, Deserializer, Error};

/// Unwraps the deserializer of a format mid-decode.
///
/// Decoding a `DeserializerUnwrapper` calls its closure with the format's live
/// deserializer, erased to `&mut dyn erased_serde::Deserializer`. Whatever the
/// closure returns is the decoded value.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
///
/// use sk_codec::{DataDecoder, DeserializerUnwrapper, JsonCoder};
///
/// let unwrapper = DeserializerUnwrapper::new(|de| {
///     let map: BTreeMap<String, u8> = erased_serde::deserialize(de)?;
///     Ok(map.len())
/// });
///
/// let len = JsonCoder::default().decode_seed(unwrapper, b"{}").unwrap();
/// assert_eq!(len, 0);
/// ```
pub struct DeserializerUnwrapper<F> {
    f: F,
}

impl<F> DeserializerUnwrapper<F> {
    #[inline]
    pub fn new<'de, R>(f: F) -> Self
    where
        F: FnOnce(&mut dyn erased_serde::Deserializer<'de>) -> Result<R, erased_serde::Error>,
    {
        Self { f }
    }
}

impl<'de, F, R> DeserializeSeed<'de> for DeserializerUnwrapper<F>
where
    F: FnOnce(&mut dyn erased_serde::Deserializer<'de>) -> Result<R, erased_serde::Error>,
{
    type Value = R;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<R, D::Error> {
        let mut erased = <dyn erased_serde::Deserializer>::erase(deserializer);
        (self.f)(&mut erased).map_err(D::Error::custom)
    }
}
