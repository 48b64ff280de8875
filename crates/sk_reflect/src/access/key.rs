//! Provide a single-layer container key.

use alloc::borrow::Cow;
use alloc::string::{String, ToString};
use core::fmt;

/// How a [`StructuralKey::Named`] may be read back as an index.
///
/// Converting a name to an index is a policy decision, so it never happens implicitly:
/// [`StructuralKey::int_value`] always uses [`IndexPolicy::Unsupported`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum IndexPolicy {
    /// Names never convert to indices.
    #[default]
    Unsupported,
    /// Names made only of ASCII digits convert to the index they spell.
    Decimal,
}

/// A **singular** address component inside a nested structured value.
///
/// - `Named`: a struct field, an enum variant or a map key.
/// - `Indexed`: an element of a sequence or a tuple-like value.
///
/// A key never owns the data it addresses.
///
/// # Examples
///
/// ```
/// use sk_reflect::access::{IndexPolicy, StructuralKey};
///
/// let name = StructuralKey::from("city");
/// assert_eq!(name.string_value(), "city");
/// assert_eq!(name.int_value(), None);
///
/// let index = StructuralKey::from(3usize);
/// assert_eq!(index.string_value(), "3");
/// assert_eq!(index.int_value(), Some(3));
///
/// let numeric = StructuralKey::from("7");
/// assert_eq!(numeric.int_value(), None);
/// assert_eq!(numeric.int_value_with(IndexPolicy::Decimal), Some(7));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StructuralKey {
    Named(String),
    Indexed(usize),
}

impl StructuralKey {
    /// Returns the name, or the decimal form of the index.
    pub fn string_value(&self) -> Cow<'_, str> {
        match self {
            Self::Named(name) => Cow::Borrowed(name),
            Self::Indexed(index) => Cow::Owned(index.to_string()),
        }
    }

    /// Returns the index, `None` for names.
    #[inline]
    pub fn int_value(&self) -> Option<usize> {
        self.int_value_with(IndexPolicy::Unsupported)
    }

    /// Returns the index, converting names according to `policy`.
    pub fn int_value_with(&self, policy: IndexPolicy) -> Option<usize> {
        match (self, policy) {
            (Self::Indexed(index), _) => Some(*index),
            (Self::Named(_), IndexPolicy::Unsupported) => None,
            (Self::Named(name), IndexPolicy::Decimal) => {
                if !name.is_empty() && name.bytes().all(|b| b.is_ascii_digit()) {
                    name.parse().ok()
                } else {
                    None
                }
            }
        }
    }

    #[inline]
    pub const fn is_named(&self) -> bool {
        matches!(self, Self::Named(_))
    }
}

impl fmt::Display for StructuralKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => f.write_str(name),
            Self::Indexed(index) => write!(f, "{index}"),
        }
    }
}

impl From<&str> for StructuralKey {
    #[inline]
    fn from(value: &str) -> Self {
        Self::Named(String::from(value))
    }
}

impl From<String> for StructuralKey {
    #[inline]
    fn from(value: String) -> Self {
        Self::Named(value)
    }
}

impl From<usize> for StructuralKey {
    #[inline]
    fn from(value: usize) -> Self {
        Self::Indexed(value)
    }
}
