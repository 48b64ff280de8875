use alloc::string::String;

use serde_core::de::{Deserializer, Visitor};
use serde_json::Value;

use super::DiscoveryContext;
use super::access::{ElementAccess, FieldAccess, FirstVariant, NoEntries};
use crate::ReflectError;
use crate::access::StructuralPath;
use crate::cfg;
use crate::leaf::{LeafMeta, LeafShape, ReflectionLeaf};
use crate::property::TypeDescriptor;

/// A synthetic [`Deserializer`] positioned at one structural path.
///
/// It answers every request of the deserialized type with sentinels and records
/// each leaf in its [`DiscoveryContext`].
///
/// - Structs yield each declared field.
/// - Sequences yield exactly one element, fixed-size tuples yield `len`.
/// - Maps yield no entries.
/// - `Option` is always present and marks the next leaf as optional.
/// - Enums that are not registered leaves take their first variant.
///
/// Self-describing requests (`deserialize_any`, identifiers in value position)
/// and raw bytes fail with [`ReflectError::UnsupportedShape`].
pub struct DiscoveryDeserializer<'a, 'r> {
    ctx: &'a mut DiscoveryContext<'r>,
    path: StructuralPath,
}

impl<'a, 'r> DiscoveryDeserializer<'a, 'r> {
    #[inline]
    pub fn new(ctx: &'a mut DiscoveryContext<'r>, path: StructuralPath) -> Self {
        Self { ctx, path }
    }

    #[inline]
    pub fn path(&self) -> &StructuralPath {
        &self.path
    }

    /// Records `meta` as a leaf and returns its sentinel tree.
    fn replay(self, meta: &LeafMeta) -> Value {
        let sentinel = meta.sentinel(self.ctx.signal()).clone();
        self.ctx.record(self.path, meta.descriptor());
        sentinel
    }

    #[inline]
    fn unsupported(&self, capability: &'static str) -> ReflectError {
        ReflectError::unsupported(&self.path, capability)
    }
}

macro_rules! discover_scalar {
    ($($method:ident: $ty:ty => $kind:ident, $visit:ident;)*) => {
        $(
            fn $method<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, ReflectError> {
                let (low, high) = <$ty as ReflectionLeaf>::sentinels();
                let sentinel = self.ctx.signal().pick(low, high);
                self.ctx.record(self.path, TypeDescriptor::$kind);
                visitor.$visit(sentinel)
            }
        )*
    };
}

impl<'de> Deserializer<'de> for DiscoveryDeserializer<'_, '_> {
    type Error = ReflectError;

    discover_scalar! {
        deserialize_bool: bool => Bool, visit_bool;
        deserialize_i8: i8 => I8, visit_i8;
        deserialize_i16: i16 => I16, visit_i16;
        deserialize_i32: i32 => I32, visit_i32;
        deserialize_i64: i64 => I64, visit_i64;
        deserialize_i128: i128 => I128, visit_i128;
        deserialize_u8: u8 => U8, visit_u8;
        deserialize_u16: u16 => U16, visit_u16;
        deserialize_u32: u32 => U32, visit_u32;
        deserialize_u64: u64 => U64, visit_u64;
        deserialize_u128: u128 => U128, visit_u128;
        deserialize_f32: f32 => F32, visit_f32;
        deserialize_f64: f64 => F64, visit_f64;
        deserialize_char: char => Char, visit_char;
        deserialize_str: String => String, visit_string;
        deserialize_string: String => String, visit_string;
    }

    fn deserialize_any<V: Visitor<'de>>(self, _: V) -> Result<V::Value, ReflectError> {
        Err(self.unsupported("deserialize_any"))
    }

    fn deserialize_bytes<V: Visitor<'de>>(self, _: V) -> Result<V::Value, ReflectError> {
        Err(self.unsupported("deserialize_bytes"))
    }

    fn deserialize_byte_buf<V: Visitor<'de>>(self, _: V) -> Result<V::Value, ReflectError> {
        Err(self.unsupported("deserialize_byte_buf"))
    }

    fn deserialize_identifier<V: Visitor<'de>>(self, _: V) -> Result<V::Value, ReflectError> {
        Err(self.unsupported("deserialize_identifier"))
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, ReflectError> {
        self.ctx.mark_optional();
        visitor.visit_some(self)
    }

    fn deserialize_unit<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, ReflectError> {
        self.ctx.record(self.path, TypeDescriptor::Unit);
        visitor.visit_unit()
    }

    fn deserialize_unit_struct<V: Visitor<'de>>(
        self,
        name: &'static str,
        visitor: V,
    ) -> Result<V::Value, ReflectError> {
        if let Some(meta) = self.ctx.replayable(name, |shape| *shape == LeafShape::Unit) {
            return Ok(self.replay(meta).deserialize_unit_struct(name, visitor)?);
        }
        self.ctx.record(self.path, TypeDescriptor::Unit);
        visitor.visit_unit()
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        name: &'static str,
        visitor: V,
    ) -> Result<V::Value, ReflectError> {
        if let Some(meta) = self.ctx.replayable(name, |shape| *shape == LeafShape::Newtype) {
            return Ok(self.replay(meta).deserialize_newtype_struct(name, visitor)?);
        }
        // Transparent: the optional flag belongs to the wrapped value.
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, ReflectError> {
        self.ctx.take_optional();
        cfg::debug! {
            log::trace!("entering sequence at `{}`", self.path);
        }
        visitor.visit_seq(ElementAccess::new(self.ctx, self.path, 1))
    }

    fn deserialize_tuple<V: Visitor<'de>>(
        self,
        len: usize,
        visitor: V,
    ) -> Result<V::Value, ReflectError> {
        self.ctx.take_optional();
        visitor.visit_seq(ElementAccess::new(self.ctx, self.path, len))
    }

    fn deserialize_tuple_struct<V: Visitor<'de>>(
        self,
        name: &'static str,
        len: usize,
        visitor: V,
    ) -> Result<V::Value, ReflectError> {
        if let Some(meta) = self.ctx.replayable(name, |shape| *shape == LeafShape::Tuple { len }) {
            return Ok(self.replay(meta).deserialize_tuple_struct(name, len, visitor)?);
        }
        self.deserialize_tuple(len, visitor)
    }

    fn deserialize_map<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, ReflectError> {
        self.ctx.take_optional();
        visitor.visit_map(NoEntries)
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, ReflectError> {
        if let Some(meta) = self.ctx.replayable(name, |shape| shape.fits_fields(fields)) {
            return Ok(self.replay(meta).deserialize_struct(name, fields, visitor)?);
        }
        self.ctx.take_optional();
        cfg::debug! {
            log::trace!("entering struct `{name}` at `{}`", self.path);
        }
        visitor.visit_map(FieldAccess::new(self.ctx, self.path, fields))
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        name: &'static str,
        variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, ReflectError> {
        if let Some(meta) = self.ctx.replayable(name, |shape| shape.fits_variants(variants)) {
            return Ok(self.replay(meta).deserialize_enum(name, variants, visitor)?);
        }
        let Some(&variant) = variants.first() else {
            return Err(self.unsupported("an enum without variants"));
        };
        cfg::debug! {
            log::trace!("entering enum `{name}::{variant}` at `{}`", self.path);
        }
        visitor.visit_enum(FirstVariant::new(self.ctx, self.path, name, variant))
    }

    fn deserialize_ignored_any<V: Visitor<'de>>(
        self,
        visitor: V,
    ) -> Result<V::Value, ReflectError> {
        // Nothing is recorded, so the flag of an `Option<IgnoredAny>` ends here.
        self.ctx.take_optional();
        visitor.visit_unit()
    }
}
