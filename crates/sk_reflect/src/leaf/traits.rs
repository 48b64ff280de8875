use alloc::string::String;

use serde_core::Serialize;
use serde_core::de::DeserializeOwned;

/// Low sentinel of [`String`] leaves.
pub(crate) const LOW_STR: &str = "0";
/// High sentinel of [`String`] leaves.
pub(crate) const HIGH_STR: &str = "1";

/// A type that traversals treat as atomic.
///
/// A leaf supplies two distinguishable instances of itself, a *low* and a
/// *high* sentinel, plus a predicate recognizing the low one. Discovery
/// materializes one of the two for every leaf it meets; resolution looks for
/// the single leaf that is not low.
///
/// # Base types
///
/// Base types are opaque everywhere. Other leaves are opaque only while
/// they are the target of a resolution (see [`FieldAccessor`]); otherwise the
/// traversal keeps decomposing them through their own serde implementation.
///
/// All serde data model scalars are implemented here as base types:
///
/// | type | low | high |
/// |---|---|---|
/// | `bool` | `false` | `true` |
/// | integers | `0` | `1` |
/// | `f32` `f64` | `0.0` | `1.0` |
/// | `char` | `'0'` | `'1'` |
/// | `String` | `"0"` | `"1"` |
/// | `Option<T>` | `Some(low)` | `Some(high)` |
///
/// # Custom leaves
///
/// A custom leaf must serialize as a *named* serde container (newtype struct,
/// struct, tuple struct, unit struct or enum) and be registered in a
/// [`LeafRegistry`], which identifies it by that name and layout.
///
/// A type that serializes as a bare string or number, such as a date written
/// as `"2024-01-01"` or a `#[serde(transparent)]` wrapper, cannot be a custom
/// leaf: traversals only see the scalar. Registering it fails and
/// [`LeafRegistry::descriptor_of`] rejects it with [`ReflectError::AnonymousLeaf`].
/// Wrap it in a newtype struct instead, or address the scalar field directly.
///
/// ```
/// use serde::{Deserialize, Serialize};
/// use sk_reflect::{LeafRegistry, ReflectionLeaf};
///
/// #[derive(Serialize, Deserialize, PartialEq)]
/// struct Timestamp(u64);
///
/// impl ReflectionLeaf for Timestamp {
///     fn sentinels() -> (Self, Self) {
///         (Timestamp(1_000), Timestamp(2_000))
///     }
///
///     fn is_low(&self) -> bool {
///         self.0 == 1_000
///     }
///
///     fn is_base_type() -> bool {
///         true
///     }
/// }
///
/// let mut registry = LeafRegistry::new();
/// assert!(registry.register::<Timestamp>().unwrap());
/// assert_eq!(registry.get("Timestamp").unwrap().type_path(), core::any::type_name::<Timestamp>());
/// ```
///
/// [`FieldAccessor`]: crate::FieldAccessor
/// [`LeafRegistry`]: crate::LeafRegistry
/// [`LeafRegistry::descriptor_of`]: crate::LeafRegistry::descriptor_of
/// [`ReflectError::AnonymousLeaf`]: crate::ReflectError::AnonymousLeaf
pub trait ReflectionLeaf: Serialize + DeserializeOwned + 'static {
    /// Returns the `(low, high)` sentinel pair.
    fn sentinels() -> (Self, Self);

    /// Returns `true` if `self` is the low sentinel.
    fn is_low(&self) -> bool;

    /// Returns `true` if the type is opaque to every traversal.
    #[inline]
    fn is_base_type() -> bool {
        false
    }

    /// Returns `true` for the data model scalars implemented by this crate.
    #[doc(hidden)]
    #[inline]
    fn is_scalar() -> bool {
        false
    }
}

macro_rules! impl_numeric_leaf {
    ($($ty:ty => $low:literal, $high:literal;)*) => {
        $(
            impl ReflectionLeaf for $ty {
                #[inline]
                fn sentinels() -> (Self, Self) {
                    ($low, $high)
                }

                #[inline]
                fn is_low(&self) -> bool {
                    *self == $low
                }

                #[inline]
                fn is_base_type() -> bool {
                    true
                }

                #[inline]
                fn is_scalar() -> bool {
                    true
                }
            }
        )*
    };
}

impl_numeric_leaf! {
    i8 => 0, 1;
    i16 => 0, 1;
    i32 => 0, 1;
    i64 => 0, 1;
    i128 => 0, 1;
    isize => 0, 1;
    u8 => 0, 1;
    u16 => 0, 1;
    u32 => 0, 1;
    u64 => 0, 1;
    u128 => 0, 1;
    usize => 0, 1;
    f32 => 0.0, 1.0;
    f64 => 0.0, 1.0;
    char => '0', '1';
}

impl ReflectionLeaf for bool {
    #[inline]
    fn sentinels() -> (Self, Self) {
        (false, true)
    }

    #[inline]
    fn is_low(&self) -> bool {
        !*self
    }

    #[inline]
    fn is_base_type() -> bool {
        true
    }

    #[inline]
    fn is_scalar() -> bool {
        true
    }
}

impl ReflectionLeaf for String {
    #[inline]
    fn sentinels() -> (Self, Self) {
        (String::from(LOW_STR), String::from(HIGH_STR))
    }

    #[inline]
    fn is_low(&self) -> bool {
        self == LOW_STR
    }

    #[inline]
    fn is_base_type() -> bool {
        true
    }

    #[inline]
    fn is_scalar() -> bool {
        true
    }
}

/// `None` counts as low: an absent value never diverges.
impl<T: ReflectionLeaf> ReflectionLeaf for Option<T> {
    #[inline]
    fn sentinels() -> (Self, Self) {
        let (low, high) = T::sentinels();
        (Some(low), Some(high))
    }

    #[inline]
    fn is_low(&self) -> bool {
        self.as_ref().is_none_or(T::is_low)
    }

    #[inline]
    fn is_base_type() -> bool {
        T::is_base_type()
    }

    #[inline]
    fn is_scalar() -> bool {
        T::is_scalar()
    }
}
