use core::fmt;

use crate::access::StructuralPath;

/// The declared type of a discovered leaf.
///
/// Data model kinds are identified by the serde method a type calls to read or
/// write itself; registered leaf types are identified by their serde container name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeDescriptor {
    Bool,
    I8,
    I16,
    I32,
    I64,
    I128,
    U8,
    U16,
    U32,
    U64,
    U128,
    F32,
    F64,
    Char,
    String,
    Unit,
    /// A unit variant of an enum that is not a registered leaf.
    Variant { name: &'static str },
    /// A registered [`ReflectionLeaf`](crate::ReflectionLeaf) type.
    Leaf {
        name: &'static str,
        type_path: &'static str,
    },
}

impl TypeDescriptor {
    /// Returns `true` for registered leaf types.
    #[inline]
    pub const fn is_registered_leaf(&self) -> bool {
        matches!(self, Self::Leaf { .. })
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Bool => "bool",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::I128 => "i128",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::U128 => "u128",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::Char => "char",
            Self::String => "String",
            Self::Unit => "()",
            Self::Variant { name } => name,
            Self::Leaf { type_path, .. } => type_path,
        };
        f.write_str(name)
    }
}

/// One leaf discovered by a discovery pass.
///
/// Properties are produced in depth-first order, following the field order of
/// the type's own serde implementation.
///
/// # Examples
///
/// ```
/// use serde::Deserialize;
/// use sk_reflect::{LeafRegistry, Signal, TypeDescriptor, discover};
///
/// #[derive(Deserialize)]
/// struct Person {
///     name: String,
///     age: Option<i64>,
/// }
///
/// let registry = LeafRegistry::new();
/// let properties = discover::<Person>(&registry, Signal::Low).unwrap();
///
/// assert_eq!(properties[1].path.to_strings(), ["age"]);
/// assert_eq!(properties[1].ty, TypeDescriptor::I64);
/// assert!(properties[1].optional);
/// assert_eq!(properties[1].to_string(), ".age: Option<i64>");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReflectedProperty {
    pub path: StructuralPath,
    pub ty: TypeDescriptor,
    pub optional: bool,
}

impl ReflectedProperty {
    #[inline]
    pub const fn new(path: StructuralPath, ty: TypeDescriptor, optional: bool) -> Self {
        Self { path, ty, optional }
    }
}

impl fmt::Display for ReflectedProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.optional {
            write!(f, "{}: Option<{}>", self.path, self.ty)
        } else {
            write!(f, "{}: {}", self.path, self.ty)
        }
    }
}
