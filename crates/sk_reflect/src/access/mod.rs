//! Provide structural addressing for serialized values.
//!
//! A traversal never sees real field storage, only the keys a type's serde
//! implementation hands to its containers. Those keys are collected as:
//!
//! - [`StructuralKey`]: one container key, a field/variant/map-key name or an element index.
//! - [`StructuralPath`]: the keys from the root value down to a leaf.
//!
//! Both discovery and resolution report locations as [`StructuralPath`], so the
//! results of the two passes can be compared directly.
//!
//! # Syntax
//!
//! - Named: `.Name`, e.g. `.address.city`
//! - Indexed: `[Number]`, e.g. `.tags[0]`
//!
//! ```
//! use sk_reflect::access::{StructuralKey, StructuralPath};
//!
//! let path: StructuralPath = ".address.city".parse().unwrap();
//! assert_eq!(path.keys(), [StructuralKey::from("address"), StructuralKey::from("city")]);
//! ```

// -----------------------------------------------------------------------------
// Modules

mod key;
mod path;

// -----------------------------------------------------------------------------
// Exports

pub use key::{IndexPolicy, StructuralKey};
pub use path::{ParseError, StructuralPath};
