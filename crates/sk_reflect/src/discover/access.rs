use core::slice;

use serde_core::de::value::BorrowedStrDeserializer;
use serde_core::de::{self, DeserializeSeed, Error as _, MapAccess, SeqAccess, Visitor};

use super::{DiscoveryContext, DiscoveryDeserializer};
use crate::ReflectError;
use crate::access::StructuralPath;
use crate::property::TypeDescriptor;

// -----------------------------------------------------------------------------
// Keyed mode

/// Yields every declared field of a struct, in declaration order.
pub(super) struct FieldAccess<'a, 'r> {
    ctx: &'a mut DiscoveryContext<'r>,
    path: StructuralPath,
    fields: slice::Iter<'static, &'static str>,
    pending: Option<&'static str>,
}

impl<'a, 'r> FieldAccess<'a, 'r> {
    #[inline]
    pub fn new(
        ctx: &'a mut DiscoveryContext<'r>,
        path: StructuralPath,
        fields: &'static [&'static str],
    ) -> Self {
        Self {
            ctx,
            path,
            fields: fields.iter(),
            pending: None,
        }
    }
}

impl<'de> MapAccess<'de> for FieldAccess<'_, '_> {
    type Error = ReflectError;

    fn next_key_seed<K: DeserializeSeed<'de>>(
        &mut self,
        seed: K,
    ) -> Result<Option<K::Value>, ReflectError> {
        let Some(&field) = self.fields.next() else {
            return Ok(None);
        };
        self.pending = Some(field);
        seed.deserialize(BorrowedStrDeserializer::new(field))
            .map(Some)
    }

    fn next_value_seed<V: DeserializeSeed<'de>>(
        &mut self,
        seed: V,
    ) -> Result<V::Value, ReflectError> {
        let Some(field) = self.pending.take() else {
            return Err(ReflectError::custom("value requested before its key"));
        };
        seed.deserialize(DiscoveryDeserializer::new(self.ctx, self.path.child(field)))
    }

    #[inline]
    fn size_hint(&self) -> Option<usize> {
        Some(self.fields.len())
    }
}

/// A map without entries.
pub(super) struct NoEntries;

impl<'de> MapAccess<'de> for NoEntries {
    type Error = ReflectError;

    #[inline]
    fn next_key_seed<K: DeserializeSeed<'de>>(
        &mut self,
        _: K,
    ) -> Result<Option<K::Value>, ReflectError> {
        Ok(None)
    }

    #[inline]
    fn next_value_seed<V: DeserializeSeed<'de>>(&mut self, _: V) -> Result<V::Value, ReflectError> {
        Err(ReflectError::custom("map has no entries"))
    }

    #[inline]
    fn size_hint(&self) -> Option<usize> {
        Some(0)
    }
}

// -----------------------------------------------------------------------------
// Indexed mode

/// Yields `len` elements at consecutive indices.
pub(super) struct ElementAccess<'a, 'r> {
    ctx: &'a mut DiscoveryContext<'r>,
    path: StructuralPath,
    index: usize,
    len: usize,
}

impl<'a, 'r> ElementAccess<'a, 'r> {
    #[inline]
    pub fn new(ctx: &'a mut DiscoveryContext<'r>, path: StructuralPath, len: usize) -> Self {
        Self {
            ctx,
            path,
            index: 0,
            len,
        }
    }
}

impl<'de> SeqAccess<'de> for ElementAccess<'_, '_> {
    type Error = ReflectError;

    fn next_element_seed<T: DeserializeSeed<'de>>(
        &mut self,
        seed: T,
    ) -> Result<Option<T::Value>, ReflectError> {
        if self.index >= self.len {
            return Ok(None);
        }
        let path = self.path.child(self.index);
        self.index += 1;
        seed.deserialize(DiscoveryDeserializer::new(self.ctx, path))
            .map(Some)
    }

    #[inline]
    fn size_hint(&self) -> Option<usize> {
        Some(self.len - self.index)
    }
}

// -----------------------------------------------------------------------------
// Enums

/// Selects the first declared variant of an unregistered enum.
pub(super) struct FirstVariant<'a, 'r> {
    ctx: &'a mut DiscoveryContext<'r>,
    path: StructuralPath,
    enum_name: &'static str,
    variant: &'static str,
}

impl<'a, 'r> FirstVariant<'a, 'r> {
    #[inline]
    pub fn new(
        ctx: &'a mut DiscoveryContext<'r>,
        path: StructuralPath,
        enum_name: &'static str,
        variant: &'static str,
    ) -> Self {
        Self {
            ctx,
            path,
            enum_name,
            variant,
        }
    }

    /// Path of the variant's payload. Consumes the optional flag.
    fn payload_path(&mut self) -> StructuralPath {
        self.ctx.take_optional();
        self.path.child(self.variant)
    }
}

impl<'de, 'a, 'r> de::EnumAccess<'de> for FirstVariant<'a, 'r> {
    type Error = ReflectError;
    type Variant = Self;

    fn variant_seed<V: DeserializeSeed<'de>>(
        self,
        seed: V,
    ) -> Result<(V::Value, Self), ReflectError> {
        let variant = seed.deserialize(BorrowedStrDeserializer::<ReflectError>::new(self.variant))?;
        Ok((variant, self))
    }
}

impl<'de> de::VariantAccess<'de> for FirstVariant<'_, '_> {
    type Error = ReflectError;

    fn unit_variant(self) -> Result<(), ReflectError> {
        self.ctx.record(
            self.path,
            TypeDescriptor::Variant {
                name: self.enum_name,
            },
        );
        Ok(())
    }

    fn newtype_variant_seed<T: DeserializeSeed<'de>>(
        mut self,
        seed: T,
    ) -> Result<T::Value, ReflectError> {
        let path = self.payload_path();
        seed.deserialize(DiscoveryDeserializer::new(self.ctx, path))
    }

    fn tuple_variant<V: Visitor<'de>>(
        mut self,
        len: usize,
        visitor: V,
    ) -> Result<V::Value, ReflectError> {
        let path = self.payload_path();
        visitor.visit_seq(ElementAccess::new(self.ctx, path, len))
    }

    fn struct_variant<V: Visitor<'de>>(
        mut self,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, ReflectError> {
        let path = self.payload_path();
        visitor.visit_map(FieldAccess::new(self.ctx, path, fields))
    }
}
