use serde_core::Serialize;
use serde_core::ser::Serializer;
use serde_json::Value;
use serde_json::value::Serializer as ValueSerializer;

use super::ResolutionContext;
use super::compound::{Compound, Traverse};
use crate::ReflectError;
use crate::access::StructuralPath;
use crate::cfg;
use crate::leaf::{LOW_STR, LeafMeta, LeafRegistry, LeafShape, ReflectionLeaf};
use crate::property::TypeDescriptor;

/// How a named container is treated.
enum Class<'r> {
    Target(&'r LeafMeta),
    Opaque,
    Composite,
}

/// A synthetic [`Serializer`] positioned at one structural path.
///
/// It walks a value the way a data format would and records in its
/// [`ResolutionContext`] the path of every leaf of the target type that is not
/// its low sentinel.
///
/// - Struct fields and enum variants become named keys.
/// - Sequence and tuple elements become indexed keys.
/// - Map keys become named keys through their string form.
/// - `Some` and newtype structs are transparent.
/// - `None` and `()` are discarded.
///
/// # Examples
///
/// ```
/// use serde::Serialize;
/// use sk_reflect::access::StructuralPath;
/// use sk_reflect::resolve::{ResolutionContext, ResolutionSerializer};
/// use sk_reflect::{LeafRegistry, TypeDescriptor};
///
/// #[derive(Serialize)]
/// struct Sample {
///     label: String,
///     readings: Vec<i64>,
/// }
///
/// let registry = LeafRegistry::new();
/// let mut ctx = ResolutionContext::new(&registry, TypeDescriptor::I64);
///
/// let sample = Sample {
///     label: "anything".into(),
///     readings: vec![0, 0, 7],
/// };
/// sample
///     .serialize(ResolutionSerializer::new(&mut ctx, StructuralPath::root()))
///     .unwrap();
///
/// assert_eq!(ctx.into_found().unwrap().to_string(), ".readings[2]");
/// ```
pub struct ResolutionSerializer<'a, 'r> {
    ctx: &'a mut ResolutionContext<'r>,
    path: StructuralPath,
}

impl<'a, 'r> ResolutionSerializer<'a, 'r> {
    #[inline]
    pub fn new(ctx: &'a mut ResolutionContext<'r>, path: StructuralPath) -> Self {
        Self { ctx, path }
    }

    /// Containers whose layout fails `fits` only share a name with the leaf.
    fn classify(&self, name: &str, fits: impl FnOnce(&LeafShape) -> bool) -> Class<'r> {
        let registry: &'r LeafRegistry = self.ctx.registry;
        match registry.get(name).filter(|meta| fits(meta.shape())) {
            Some(meta) if meta.descriptor() == self.ctx.target => Class::Target(meta),
            Some(meta) if meta.is_base() => Class::Opaque,
            _ => Class::Composite,
        }
    }

    fn scalar(self, kind: TypeDescriptor, is_low: bool) -> Result<(), ReflectError> {
        if kind == self.ctx.target && !is_low {
            self.ctx.diverge(self.path)
        } else {
            Ok(())
        }
    }

    /// Compares the serialized form of the target leaf with its low sentinel.
    fn capture(
        self,
        meta: &LeafMeta,
        value: Result<Value, serde_json::Error>,
    ) -> Result<(), ReflectError> {
        if meta.is_low(&value?)? {
            Ok(())
        } else {
            self.ctx.diverge(self.path)
        }
    }

    fn compound<S>(
        self,
        class: Class<'r>,
        sink: impl FnOnce() -> Result<S, serde_json::Error>,
    ) -> Result<Compound<'a, 'r, S>, ReflectError> {
        Ok(match class {
            Class::Target(meta) => Compound::Capture {
                ctx: self.ctx,
                path: self.path,
                meta,
                sink: sink()?,
            },
            Class::Opaque => Compound::Ignore,
            Class::Composite => Compound::Traverse(Traverse::new(self.ctx, self.path)),
        })
    }
}

/// Any variant of an enum leaf may show up, not only the ones its sentinels use.
#[inline]
fn is_enum(shape: &LeafShape) -> bool {
    matches!(shape, LeafShape::Enum { .. })
}

macro_rules! resolve_scalar {
    ($($method:ident($ty:ty) => $kind:ident;)*) => {
        $(
            #[inline]
            fn $method(self, v: $ty) -> Result<(), ReflectError> {
                self.scalar(TypeDescriptor::$kind, <$ty as ReflectionLeaf>::is_low(&v))
            }
        )*
    };
}

impl<'a, 'r> Serializer for ResolutionSerializer<'a, 'r> {
    type Ok = ();
    type Error = ReflectError;
    type SerializeSeq = Traverse<'a, 'r>;
    type SerializeTuple = Traverse<'a, 'r>;
    type SerializeTupleStruct = Compound<'a, 'r, <ValueSerializer as Serializer>::SerializeTupleStruct>;
    type SerializeTupleVariant = Compound<'a, 'r, <ValueSerializer as Serializer>::SerializeTupleVariant>;
    type SerializeMap = Traverse<'a, 'r>;
    type SerializeStruct = Compound<'a, 'r, <ValueSerializer as Serializer>::SerializeStruct>;
    type SerializeStructVariant = Compound<'a, 'r, <ValueSerializer as Serializer>::SerializeStructVariant>;

    resolve_scalar! {
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
    }

    #[inline]
    fn serialize_str(self, v: &str) -> Result<(), ReflectError> {
        self.scalar(TypeDescriptor::String, v == LOW_STR)
    }

    fn serialize_bytes(self, _: &[u8]) -> Result<(), ReflectError> {
        Err(ReflectError::unsupported(&self.path, "serialize_bytes"))
    }

    #[inline]
    fn serialize_none(self) -> Result<(), ReflectError> {
        Ok(())
    }

    #[inline]
    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<(), ReflectError> {
        value.serialize(self)
    }

    #[inline]
    fn serialize_unit(self) -> Result<(), ReflectError> {
        Ok(())
    }

    fn serialize_unit_struct(self, name: &'static str) -> Result<(), ReflectError> {
        match self.classify(name, |shape| *shape == LeafShape::Unit) {
            Class::Target(meta) => self.capture(meta, ValueSerializer.serialize_unit_struct(name)),
            Class::Opaque | Class::Composite => Ok(()),
        }
    }

    fn serialize_unit_variant(
        self,
        name: &'static str,
        variant_index: u32,
        variant: &'static str,
    ) -> Result<(), ReflectError> {
        match self.classify(name, is_enum) {
            Class::Target(meta) => {
                self.capture(meta, ValueSerializer.serialize_unit_variant(name, variant_index, variant))
            }
            Class::Opaque | Class::Composite => Ok(()),
        }
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        name: &'static str,
        value: &T,
    ) -> Result<(), ReflectError> {
        match self.classify(name, |shape| *shape == LeafShape::Newtype) {
            Class::Target(meta) => self.capture(meta, ValueSerializer.serialize_newtype_struct(name, value)),
            Class::Opaque => Ok(()),
            Class::Composite => value.serialize(self),
        }
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        name: &'static str,
        variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<(), ReflectError> {
        match self.classify(name, is_enum) {
            Class::Target(meta) => self.capture(
                meta,
                ValueSerializer.serialize_newtype_variant(name, variant_index, variant, value),
            ),
            Class::Opaque => Ok(()),
            Class::Composite => {
                let path = self.path.child(variant);
                value.serialize(ResolutionSerializer::new(self.ctx, path))
            }
        }
    }

    fn serialize_seq(self, _: Option<usize>) -> Result<Traverse<'a, 'r>, ReflectError> {
        cfg::debug! {
            log::trace!("entering sequence at `{}`", self.path);
        }
        Ok(Traverse::new(self.ctx, self.path))
    }

    #[inline]
    fn serialize_tuple(self, _: usize) -> Result<Traverse<'a, 'r>, ReflectError> {
        Ok(Traverse::new(self.ctx, self.path))
    }

    fn serialize_tuple_struct(
        self,
        name: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleStruct, ReflectError> {
        let class = self.classify(name, |shape| *shape == LeafShape::Tuple { len });
        self.compound(class, || ValueSerializer.serialize_tuple_struct(name, len))
    }

    fn serialize_tuple_variant(
        self,
        name: &'static str,
        variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleVariant, ReflectError> {
        let class = self.classify(name, is_enum);
        let path = match class {
            Class::Target(_) => self.path,
            _ => self.path.child(variant),
        };
        ResolutionSerializer::new(self.ctx, path).compound(class, || {
            ValueSerializer.serialize_tuple_variant(name, variant_index, variant, len)
        })
    }

    fn serialize_map(self, _: Option<usize>) -> Result<Traverse<'a, 'r>, ReflectError> {
        cfg::debug! {
            log::trace!("entering map at `{}`", self.path);
        }
        Ok(Traverse::new(self.ctx, self.path))
    }

    fn serialize_struct(
        self,
        name: &'static str,
        len: usize,
    ) -> Result<Self::SerializeStruct, ReflectError> {
        cfg::debug! {
            log::trace!("entering struct `{name}` at `{}`", self.path);
        }
        let class = self.classify(name, |shape| shape.fits_struct_len(len));
        self.compound(class, || ValueSerializer.serialize_struct(name, len))
    }

    fn serialize_struct_variant(
        self,
        name: &'static str,
        variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<Self::SerializeStructVariant, ReflectError> {
        let class = self.classify(name, is_enum);
        let path = match class {
            Class::Target(_) => self.path,
            _ => self.path.child(variant),
        };
        ResolutionSerializer::new(self.ctx, path).compound(class, || {
            ValueSerializer.serialize_struct_variant(name, variant_index, variant, len)
        })
    }
}
