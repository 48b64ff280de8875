use serde_core::{Serialize, Serializer};

/// A value of any [`Serialize`] type behind one concrete type.
///
/// Lets heterogeneous values share a collection and go through any
/// [`DataEncoder`](crate::DataEncoder).
///
/// ```
/// use sk_codec::{DataEncoder, ErasedValue, JsonCoder};
///
/// let values = vec![
///     ErasedValue::new(1_u8),
///     ErasedValue::new("two"),
///     ErasedValue::new([3.5_f32]),
/// ];
///
/// let bytes = JsonCoder::default().encode(&values).unwrap();
/// assert_eq!(bytes, br#"[1,"two",[3.5]]"#);
/// ```
pub struct ErasedValue<'a>(Box<dyn erased_serde::Serialize + 'a>);

impl<'a> ErasedValue<'a> {
    #[inline]
    pub fn new<T: Serialize + 'a>(value: T) -> Self {
        Self(Box::new(value))
    }
}

impl Serialize for ErasedValue<'_> {
    #[inline]
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        erased_serde::serialize(&*self.0, serializer)
    }
}

impl core::fmt::Debug for ErasedValue<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("ErasedValue(..)")
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::ErasedValue;
    use crate::{DataEncoder, JsonCoder, RonCoder};

    #[test]
    fn encodes_like_the_wrapped_value() {
        let map = BTreeMap::from([("hello", "world")]);
        let erased = ErasedValue::new(&map);

        let coder = JsonCoder::default();
        assert_eq!(coder.encode(&erased).unwrap(), coder.encode(&map).unwrap());
        assert_eq!(coder.encode(&erased).unwrap(), br#"{"hello":"world"}"#);
    }

    #[test]
    fn mixes_types_in_one_collection() {
        let values = [ErasedValue::new(Some(1_u8)), ErasedValue::new(())];
        assert_eq!(RonCoder::default().encode(&values).unwrap(), b"(Some(1),())");
    }
}
