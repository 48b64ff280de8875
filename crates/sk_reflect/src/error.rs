use alloc::string::{String, ToString};
use core::fmt::Display;

use crate::access::StructuralPath;

/// A enumeration of all error outcomes of discovery, resolution and leaf registration.
///
/// The type doubles as the error of the synthetic deserializer and serializer,
/// so failures raised by a traversed type's own serde code surface as [`Custom`].
///
/// A resolution pass that finds no diverging leaf is **not** an error,
/// see [`resolve`](crate::resolve()).
///
/// [`Custom`]: ReflectError::Custom
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ReflectError {
    /// The traversed type asked for a capability the synthetic visitors cannot emulate,
    /// e.g. `deserialize_any` or raw bytes.
    #[error("unsupported shape at `{path}`: the type requested `{capability}`")]
    UnsupportedShape {
        path: StructuralPath,
        capability: &'static str,
    },
    /// More than one leaf diverged from its low sentinel in a single resolution pass.
    #[error("multiple diverging leaves: `{first}` and `{second}`")]
    MultipleDivergence {
        first: StructuralPath,
        second: StructuralPath,
    },
    /// A leaf type does not serialize as a named serde container and cannot be identified.
    #[error("leaf type `{type_path}` does not serialize as a named container")]
    AnonymousLeaf { type_path: &'static str },
    /// A named leaf type was used as an accessor target without being registered.
    #[error("leaf type `{type_path}` (serde name `{name}`) is not registered")]
    UnregisteredLeaf {
        type_path: &'static str,
        name: &'static str,
    },
    /// Two different leaf types share one serde container name.
    #[error("serde name `{name}` is used by both `{existing}` and `{incoming}`")]
    DuplicateLeafName {
        name: &'static str,
        existing: &'static str,
        incoming: &'static str,
    },
    /// A message raised by the traversed type's own serde code.
    #[error("{0}")]
    Custom(String),
}

impl ReflectError {
    #[inline]
    pub(crate) fn unsupported(path: &StructuralPath, capability: &'static str) -> Self {
        Self::UnsupportedShape {
            path: path.clone(),
            capability,
        }
    }
}

impl serde_core::de::Error for ReflectError {
    #[inline]
    fn custom<T: Display>(msg: T) -> Self {
        Self::Custom(msg.to_string())
    }
}

impl serde_core::ser::Error for ReflectError {
    #[inline]
    fn custom<T: Display>(msg: T) -> Self {
        Self::Custom(msg.to_string())
    }
}

impl From<serde_json::Error> for ReflectError {
    #[inline]
    fn from(value: serde_json::Error) -> Self {
        Self::Custom(value.to_string())
    }
}
