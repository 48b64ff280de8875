//! Path resolution.
//!
//! A root value is built out of low sentinels, one field is raised to its high
//! sentinel through a [`FieldAccessor`], and a [`ResolutionSerializer`] walks
//! the root's own [`Serialize`] implementation looking for the single leaf
//! that is no longer low.

mod compound;
mod serializer;

use alloc::vec::Vec;
use core::fmt;

use serde_core::Serialize;
use serde_core::de::DeserializeOwned;

use crate::access::StructuralPath;
use crate::discover::Discovery;
use crate::leaf::{LeafRegistry, ReflectionLeaf};
use crate::{ReflectError, ReflectedProperty, TypeDescriptor};

pub use compound::{Compound, Traverse};
pub use serializer::ResolutionSerializer;

// -----------------------------------------------------------------------------
// FieldAccessor

/// Addresses one field of type `V` inside a `Root`.
///
/// # Examples
///
/// ```
/// use sk_reflect::FieldAccessor;
///
/// struct Person {
///     age: Option<i64>,
/// }
///
/// let age = FieldAccessor::new(|person: &mut Person| &mut person.age);
///
/// let mut person = Person { age: None };
/// *age.get_mut(&mut person) = Some(42);
/// assert_eq!(person.age, Some(42));
/// ```
pub struct FieldAccessor<Root, V> {
    access: fn(&mut Root) -> &mut V,
}

impl<Root, V> FieldAccessor<Root, V> {
    #[inline]
    pub const fn new(access: fn(&mut Root) -> &mut V) -> Self {
        Self { access }
    }

    #[inline]
    pub fn get_mut<'a>(&self, root: &'a mut Root) -> &'a mut V {
        (self.access)(root)
    }
}

impl<Root, V> Clone for FieldAccessor<Root, V> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<Root, V> Copy for FieldAccessor<Root, V> {}

impl<Root, V> fmt::Debug for FieldAccessor<Root, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldAccessor")
            .field("root", &core::any::type_name::<Root>())
            .field("field", &core::any::type_name::<V>())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// ResolutionContext

/// Scratch state of one resolution pass.
pub struct ResolutionContext<'r> {
    registry: &'r LeafRegistry,
    target: TypeDescriptor,
    found: Option<StructuralPath>,
}

impl<'r> ResolutionContext<'r> {
    #[inline]
    pub fn new(registry: &'r LeafRegistry, target: TypeDescriptor) -> Self {
        Self {
            registry,
            target,
            found: None,
        }
    }

    #[inline]
    pub fn target(&self) -> TypeDescriptor {
        self.target
    }

    #[inline]
    pub fn found(&self) -> Option<&StructuralPath> {
        self.found.as_ref()
    }

    #[inline]
    pub fn into_found(self) -> Option<StructuralPath> {
        self.found
    }

    /// Records `path` as the diverging leaf. The path is written at most once.
    pub(crate) fn diverge(&mut self, path: StructuralPath) -> Result<(), ReflectError> {
        log::trace!("`{path}` diverges from its low sentinel");
        match &self.found {
            Some(first) => Err(ReflectError::MultipleDivergence {
                first: first.clone(),
                second: path,
            }),
            None => {
                self.found = Some(path);
                Ok(())
            }
        }
    }
}

// -----------------------------------------------------------------------------
// Entry points

fn resolve_as<Root: Serialize>(
    registry: &LeafRegistry,
    target: TypeDescriptor,
    root: &Root,
) -> Result<Option<StructuralPath>, ReflectError> {
    let type_path = core::any::type_name::<Root>();
    log::debug!("resolving a `{target}` leaf in `{type_path}`");

    let mut ctx = ResolutionContext::new(registry, target);
    root.serialize(ResolutionSerializer::new(&mut ctx, StructuralPath::root()))?;
    let found = ctx.into_found();

    match &found {
        Some(path) => log::debug!("resolved `{path}` in `{type_path}`"),
        None => log::debug!("no diverging `{target}` leaf in `{type_path}`"),
    }
    Ok(found)
}

/// Returns the path of the only leaf of type `V` in `root` that is not its low sentinel.
///
/// Returns `Ok(None)` if every such leaf is low, including when the accessed
/// field is never serialized.
///
/// # Errors
///
/// - [`ReflectError::MultipleDivergence`] if more than one leaf diverges.
/// - [`ReflectError::UnregisteredLeaf`] if `V` is a named type missing from `registry`.
/// - [`ReflectError::UnsupportedShape`] if `root` serializes raw bytes or composite map keys.
pub fn resolve<Root: Serialize, V: ReflectionLeaf>(
    registry: &LeafRegistry,
    root: &Root,
    _accessor: &FieldAccessor<Root, V>,
) -> Result<Option<StructuralPath>, ReflectError> {
    resolve_as(registry, registry.descriptor_of::<V>()?, root)
}

/// Materializes a low `Root`, raises the accessed field and resolves it.
fn locate<Root, V>(
    registry: &LeafRegistry,
    accessor: &FieldAccessor<Root, V>,
) -> Result<(Option<StructuralPath>, Vec<ReflectedProperty>), ReflectError>
where
    Root: Serialize + DeserializeOwned,
    V: ReflectionLeaf,
{
    let target = registry.descriptor_of::<V>()?;
    let (mut root, properties) = Discovery::new(registry)
        .target_descriptor(target)
        .materialize::<Root>()?;

    let (_, high) = V::sentinels();
    *accessor.get_mut(&mut root) = high;

    let path = resolve_as(registry, target, &root)?;
    Ok((path, properties))
}

/// Returns the structural path of the field addressed by `accessor`.
///
/// # Examples
///
/// ```
/// use serde::{Deserialize, Serialize};
/// use sk_reflect::{FieldAccessor, LeafRegistry, property_path};
///
/// #[derive(Serialize, Deserialize)]
/// struct Address {
///     city: String,
///     zip: String,
/// }
///
/// #[derive(Serialize, Deserialize)]
/// struct Person {
///     name: String,
///     addresses: Vec<Address>,
/// }
///
/// let registry = LeafRegistry::new();
/// let zip = FieldAccessor::new(|p: &mut Person| &mut p.addresses[0].zip);
///
/// let path = property_path(&registry, &zip).unwrap().unwrap();
/// assert_eq!(path.to_strings(), ["addresses", "0", "zip"]);
/// ```
pub fn property_path<Root, V>(
    registry: &LeafRegistry,
    accessor: &FieldAccessor<Root, V>,
) -> Result<Option<StructuralPath>, ReflectError>
where
    Root: Serialize + DeserializeOwned,
    V: ReflectionLeaf,
{
    locate(registry, accessor).map(|(path, _)| path)
}

/// Returns the discovered property behind the field addressed by `accessor`.
pub fn reflect_property<Root, V>(
    registry: &LeafRegistry,
    accessor: &FieldAccessor<Root, V>,
) -> Result<Option<ReflectedProperty>, ReflectError>
where
    Root: Serialize + DeserializeOwned,
    V: ReflectionLeaf,
{
    let (path, properties) = locate(registry, accessor)?;
    Ok(path.and_then(|path| properties.into_iter().find(|property| property.path == path)))
}

#[cfg(test)]
mod tests;
