#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// Compilation config

/// Some macros used for compilation control.
pub(crate) mod cfg {
    /// Expands its body only in debug builds with the `debug` feature enabled.
    #[cfg(all(debug_assertions, feature = "debug"))]
    macro_rules! debug {
        ($($tt:tt)*) => { $($tt)* };
    }

    #[cfg(not(all(debug_assertions, feature = "debug")))]
    macro_rules! debug {
        ($($tt:tt)*) => {};
    }

    pub(crate) use debug;
}

// -----------------------------------------------------------------------------
// no_std support

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod error;
mod property;

pub mod access;
pub mod discover;
pub mod leaf;
pub mod resolve;

// -----------------------------------------------------------------------------
// Top-Level exports

#[doc(hidden)]
pub mod __macro_exports {
    #[cfg(feature = "auto_register")]
    pub use inventory;
}

pub use discover::{Discovery, Signal, discover};
pub use error::ReflectError;
pub use leaf::{LeafRegistry, ReflectionLeaf};
pub use property::{ReflectedProperty, TypeDescriptor};
pub use resolve::{FieldAccessor, property_path, reflect_property, resolve};
