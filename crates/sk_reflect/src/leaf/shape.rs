use alloc::vec::Vec;

use serde_core::Serialize;
use serde_core::ser::{self, Impossible, Serializer};

use crate::ReflectError;
use crate::property::TypeDescriptor;

// -----------------------------------------------------------------------------
// LeafShape

/// The serde layout of a named leaf, recorded from its sentinels.
///
/// Serde names carry no module path, so two unrelated types may share one.
/// Traversals compare the layout a container announces with this shape before
/// treating it as the registered leaf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeafShape {
    /// A unit struct.
    Unit,
    /// A newtype struct.
    Newtype,
    /// A tuple struct of `len` fields.
    Tuple { len: usize },
    /// A struct, with every field its sentinel serialized or skipped.
    Struct { fields: Vec<&'static str> },
    /// An enum, with the variants its sentinels use.
    Enum { variants: Vec<&'static str> },
}

impl LeafShape {
    /// Returns `true` if a struct declaring `fields` may be this leaf.
    pub fn fits_fields(&self, fields: &[&str]) -> bool {
        match self {
            LeafShape::Struct { fields: own } => own.iter().all(|field| fields.contains(field)),
            _ => false,
        }
    }

    /// Returns `true` if a struct serializing `len` fields may be this leaf.
    pub fn fits_struct_len(&self, len: usize) -> bool {
        matches!(self, LeafShape::Struct { fields } if len <= fields.len())
    }

    /// Returns `true` if an enum declaring `variants` may be this leaf.
    pub fn fits_variants(&self, variants: &[&str]) -> bool {
        match self {
            LeafShape::Enum { variants: own } => {
                own.iter().all(|variant| variants.contains(variant))
            }
            _ => false,
        }
    }

    /// Folds the variants used by another sentinel into `self`.
    pub(crate) fn merge(&mut self, other: LeafShape) {
        if let (LeafShape::Enum { variants }, LeafShape::Enum { variants: more }) = (self, other) {
            for variant in more {
                if !variants.contains(&variant) {
                    variants.push(variant);
                }
            }
        }
    }
}

// -----------------------------------------------------------------------------
// ShapeSerializer

/// How a leaf value presents itself to serde.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Sampled {
    /// A data model scalar.
    Scalar(TypeDescriptor),
    /// A named container.
    Named(&'static str, LeafShape),
}

/// A serializer that records the name and layout of a leaf value.
///
/// `Option` is transparent; anonymous containers are rejected.
pub(crate) struct ShapeSerializer {
    pub type_path: &'static str,
}

impl ShapeSerializer {
    #[inline]
    fn anonymous(&self) -> ReflectError {
        ReflectError::AnonymousLeaf {
            type_path: self.type_path,
        }
    }
}

/// Returns the serde name and shape of `value`.
pub(crate) fn sample<T: Serialize>(value: &T) -> Result<Sampled, ReflectError> {
    value.serialize(ShapeSerializer {
        type_path: core::any::type_name::<T>(),
    })
}

macro_rules! sample_scalar {
    ($($method:ident($ty:ty) => $kind:ident;)*) => {
        $(
            #[inline]
            fn $method(self, _: $ty) -> Result<Sampled, ReflectError> {
                Ok(Sampled::Scalar(TypeDescriptor::$kind))
            }
        )*
    };
}

impl Serializer for ShapeSerializer {
    type Ok = Sampled;
    type Error = ReflectError;
    type SerializeSeq = Impossible<Sampled, ReflectError>;
    type SerializeTuple = Impossible<Sampled, ReflectError>;
    type SerializeTupleStruct = NamedShape;
    type SerializeTupleVariant = NamedShape;
    type SerializeMap = Impossible<Sampled, ReflectError>;
    type SerializeStruct = NamedShape;
    type SerializeStructVariant = NamedShape;

    sample_scalar! {
        serialize_bool(bool) => Bool;
        serialize_i8(i8) => I8;
        serialize_i16(i16) => I16;
        serialize_i32(i32) => I32;
        serialize_i64(i64) => I64;
        serialize_i128(i128) => I128;
        serialize_u8(u8) => U8;
        serialize_u16(u16) => U16;
        serialize_u32(u32) => U32;
        serialize_u64(u64) => U64;
        serialize_u128(u128) => U128;
        serialize_f32(f32) => F32;
        serialize_f64(f64) => F64;
        serialize_char(char) => Char;
        serialize_str(&str) => String;
    }

    fn serialize_bytes(self, _: &[u8]) -> Result<Sampled, ReflectError> {
        Err(self.anonymous())
    }

    fn serialize_none(self) -> Result<Sampled, ReflectError> {
        Err(self.anonymous())
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<Sampled, ReflectError> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Sampled, ReflectError> {
        Ok(Sampled::Scalar(TypeDescriptor::Unit))
    }

    fn serialize_unit_struct(self, name: &'static str) -> Result<Sampled, ReflectError> {
        Ok(Sampled::Named(name, LeafShape::Unit))
    }

    fn serialize_unit_variant(
        self,
        name: &'static str,
        _: u32,
        variant: &'static str,
    ) -> Result<Sampled, ReflectError> {
        Ok(NamedShape::variant(name, variant).into_sampled())
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        name: &'static str,
        _: &T,
    ) -> Result<Sampled, ReflectError> {
        Ok(Sampled::Named(name, LeafShape::Newtype))
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        name: &'static str,
        _: u32,
        variant: &'static str,
        _: &T,
    ) -> Result<Sampled, ReflectError> {
        Ok(NamedShape::variant(name, variant).into_sampled())
    }

    fn serialize_seq(self, _: Option<usize>) -> Result<Self::SerializeSeq, ReflectError> {
        Err(self.anonymous())
    }

    fn serialize_tuple(self, _: usize) -> Result<Self::SerializeTuple, ReflectError> {
        Err(self.anonymous())
    }

    fn serialize_tuple_struct(
        self,
        name: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleStruct, ReflectError> {
        Ok(NamedShape {
            name,
            shape: LeafShape::Tuple { len },
        })
    }

    fn serialize_tuple_variant(
        self,
        name: &'static str,
        _: u32,
        variant: &'static str,
        _: usize,
    ) -> Result<Self::SerializeTupleVariant, ReflectError> {
        Ok(NamedShape::variant(name, variant))
    }

    fn serialize_map(self, _: Option<usize>) -> Result<Self::SerializeMap, ReflectError> {
        Err(self.anonymous())
    }

    fn serialize_struct(
        self,
        name: &'static str,
        len: usize,
    ) -> Result<Self::SerializeStruct, ReflectError> {
        Ok(NamedShape {
            name,
            shape: LeafShape::Struct {
                fields: Vec::with_capacity(len),
            },
        })
    }

    fn serialize_struct_variant(
        self,
        name: &'static str,
        _: u32,
        variant: &'static str,
        _: usize,
    ) -> Result<Self::SerializeStructVariant, ReflectError> {
        Ok(NamedShape::variant(name, variant))
    }
}

/// Collects the layout of a named container, skipping its values.
pub(crate) struct NamedShape {
    name: &'static str,
    shape: LeafShape,
}

impl NamedShape {
    #[inline]
    fn variant(name: &'static str, variant: &'static str) -> Self {
        Self {
            name,
            shape: LeafShape::Enum {
                variants: alloc::vec![variant],
            },
        }
    }

    fn field(&mut self, key: &'static str) {
        if let LeafShape::Struct { fields } = &mut self.shape {
            fields.push(key);
        }
    }

    #[inline]
    fn into_sampled(self) -> Sampled {
        Sampled::Named(self.name, self.shape)
    }
}

macro_rules! impl_indexed_shape {
    ($($trait:ident;)*) => {
        $(
            impl ser::$trait for NamedShape {
                type Ok = Sampled;
                type Error = ReflectError;

                #[inline]
                fn serialize_field<T: ?Sized + Serialize>(&mut self, _: &T) -> Result<(), ReflectError> {
                    Ok(())
                }

                #[inline]
                fn end(self) -> Result<Sampled, ReflectError> {
                    Ok(self.into_sampled())
                }
            }
        )*
    };
}

macro_rules! impl_keyed_shape {
    ($($trait:ident;)*) => {
        $(
            impl ser::$trait for NamedShape {
                type Ok = Sampled;
                type Error = ReflectError;

                #[inline]
                fn serialize_field<T: ?Sized + Serialize>(
                    &mut self,
                    key: &'static str,
                    _: &T,
                ) -> Result<(), ReflectError> {
                    self.field(key);
                    Ok(())
                }

                #[inline]
                fn skip_field(&mut self, key: &'static str) -> Result<(), ReflectError> {
                    self.field(key);
                    Ok(())
                }

                #[inline]
                fn end(self) -> Result<Sampled, ReflectError> {
                    Ok(self.into_sampled())
                }
            }
        )*
    };
}

impl_indexed_shape! {
    SerializeTupleStruct;
    SerializeTupleVariant;
}

impl_keyed_shape! {
    SerializeStruct;
    SerializeStructVariant;
}
