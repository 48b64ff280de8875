use alloc::string::ToString;

use serde_core::Serialize;
use serde_core::ser::{self, Error as _};
use serde_json::Value;

use super::{ResolutionContext, ResolutionSerializer};
use crate::ReflectError;
use crate::access::{StructuralKey, StructuralPath};
use crate::leaf::LeafMeta;

// -----------------------------------------------------------------------------
// Traverse

/// Walks the elements or entries of a container that is not a leaf.
///
/// Returned by [`ResolutionSerializer`] for sequences, tuples and maps.
pub struct Traverse<'a, 'r> {
    ctx: &'a mut ResolutionContext<'r>,
    path: StructuralPath,
    index: usize,
    key: Option<StructuralKey>,
}

impl<'a, 'r> Traverse<'a, 'r> {
    #[inline]
    pub(crate) fn new(ctx: &'a mut ResolutionContext<'r>, path: StructuralPath) -> Self {
        Self {
            ctx,
            path,
            index: 0,
            key: None,
        }
    }

    fn visit<T: ?Sized + Serialize>(
        &mut self,
        key: impl Into<StructuralKey>,
        value: &T,
    ) -> Result<(), ReflectError> {
        value.serialize(ResolutionSerializer::new(self.ctx, self.path.child(key)))
    }

    fn element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), ReflectError> {
        let index = self.index;
        self.index += 1;
        self.visit(index, value)
    }
}

/// Map keys become named keys. Only scalar keys are supported.
fn map_key<T: ?Sized + Serialize>(path: &StructuralPath, key: &T) -> Result<StructuralKey, ReflectError> {
    match serde_json::to_value(key)? {
        Value::String(name) => Ok(StructuralKey::Named(name)),
        Value::Number(number) => Ok(StructuralKey::Named(number.to_string())),
        Value::Bool(flag) => Ok(StructuralKey::Named(flag.to_string())),
        _ => Err(ReflectError::unsupported(path, "a non-scalar map key")),
    }
}

impl ser::SerializeSeq for Traverse<'_, '_> {
    type Ok = ();
    type Error = ReflectError;

    #[inline]
    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), ReflectError> {
        self.element(value)
    }

    #[inline]
    fn end(self) -> Result<(), ReflectError> {
        Ok(())
    }
}

impl ser::SerializeTuple for Traverse<'_, '_> {
    type Ok = ();
    type Error = ReflectError;

    #[inline]
    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), ReflectError> {
        self.element(value)
    }

    #[inline]
    fn end(self) -> Result<(), ReflectError> {
        Ok(())
    }
}

impl ser::SerializeMap for Traverse<'_, '_> {
    type Ok = ();
    type Error = ReflectError;

    fn serialize_key<T: ?Sized + Serialize>(&mut self, key: &T) -> Result<(), ReflectError> {
        self.key = Some(map_key(&self.path, key)?);
        Ok(())
    }

    fn serialize_value<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), ReflectError> {
        let Some(key) = self.key.take() else {
            return Err(ReflectError::custom("map value serialized before its key"));
        };
        self.visit(key, value)
    }

    #[inline]
    fn end(self) -> Result<(), ReflectError> {
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Compound

/// A named container met during resolution.
///
/// Returned by [`ResolutionSerializer`] for structs, tuple structs and their
/// enum variants.
pub enum Compound<'a, 'r, S> {
    /// Not a leaf: keep walking.
    Traverse(Traverse<'a, 'r>),
    /// The target leaf: rebuild its serialized form, then compare.
    Capture {
        ctx: &'a mut ResolutionContext<'r>,
        path: StructuralPath,
        meta: &'r LeafMeta,
        sink: S,
    },
    /// A base leaf of another type.
    Ignore,
}

impl<S> Compound<'_, '_, S> {
    fn finish(self, end: impl FnOnce(S) -> Result<Value, serde_json::Error>) -> Result<(), ReflectError> {
        match self {
            Compound::Capture {
                ctx,
                path,
                meta,
                sink,
            } => {
                if meta.is_low(&end(sink)?)? {
                    Ok(())
                } else {
                    ctx.diverge(path)
                }
            }
            Compound::Traverse(_) | Compound::Ignore => Ok(()),
        }
    }
}

macro_rules! impl_indexed_compound {
    ($($trait:ident;)*) => {
        $(
            impl<S> ser::$trait for Compound<'_, '_, S>
            where
                S: ser::$trait<Ok = Value, Error = serde_json::Error>,
            {
                type Ok = ();
                type Error = ReflectError;

                fn serialize_field<T: ?Sized + Serialize>(
                    &mut self,
                    value: &T,
                ) -> Result<(), ReflectError> {
                    match self {
                        Compound::Traverse(traverse) => traverse.element(value),
                        Compound::Capture { sink, .. } => Ok(sink.serialize_field(value)?),
                        Compound::Ignore => Ok(()),
                    }
                }

                #[inline]
                fn end(self) -> Result<(), ReflectError> {
                    self.finish(S::end)
                }
            }
        )*
    };
}

macro_rules! impl_keyed_compound {
    ($($trait:ident;)*) => {
        $(
            impl<S> ser::$trait for Compound<'_, '_, S>
            where
                S: ser::$trait<Ok = Value, Error = serde_json::Error>,
            {
                type Ok = ();
                type Error = ReflectError;

                fn serialize_field<T: ?Sized + Serialize>(
                    &mut self,
                    key: &'static str,
                    value: &T,
                ) -> Result<(), ReflectError> {
                    match self {
                        Compound::Traverse(traverse) => traverse.visit(key, value),
                        Compound::Capture { sink, .. } => Ok(sink.serialize_field(key, value)?),
                        Compound::Ignore => Ok(()),
                    }
                }

                fn skip_field(&mut self, key: &'static str) -> Result<(), ReflectError> {
                    match self {
                        Compound::Capture { sink, .. } => Ok(sink.skip_field(key)?),
                        _ => Ok(()),
                    }
                }

                #[inline]
                fn end(self) -> Result<(), ReflectError> {
                    self.finish(S::end)
                }
            }
        )*
    };
}

impl_indexed_compound! {
    SerializeTupleStruct;
    SerializeTupleVariant;
}

impl_keyed_compound! {
    SerializeStruct;
    SerializeStructVariant;
}
