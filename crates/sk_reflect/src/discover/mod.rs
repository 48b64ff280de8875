//! Shape discovery.
//!
//! A [`DiscoveryDeserializer`] stands in for a real data format and feeds a
//! type's own [`Deserialize`] implementation with sentinel values. Every leaf the
//! implementation asks for is recorded as a [`ReflectedProperty`].
//!
//! [`Deserialize`]: serde_core::Deserialize

mod access;
mod deserializer;

use alloc::vec::Vec;

use serde_core::Deserialize;
use serde_core::de::DeserializeOwned;

use crate::access::StructuralPath;
use crate::leaf::{LeafMeta, LeafRegistry, LeafShape, ReflectionLeaf};
use crate::{ReflectError, ReflectedProperty, TypeDescriptor};

pub use deserializer::DiscoveryDeserializer;

// -----------------------------------------------------------------------------
// Signal

/// Which sentinel of each leaf a discovery pass materializes.
///
/// The signal never affects the discovered properties, only the value built.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Signal {
    #[default]
    Low,
    High,
}

impl Signal {
    /// Returns `low` or `high` according to `self`.
    #[inline]
    pub fn pick<T>(self, low: T, high: T) -> T {
        match self {
            Signal::Low => low,
            Signal::High => high,
        }
    }
}

// -----------------------------------------------------------------------------
// DiscoveryContext

/// Scratch state of one discovery pass.
pub struct DiscoveryContext<'r> {
    registry: &'r LeafRegistry,
    signal: Signal,
    target: Option<TypeDescriptor>,
    properties: Vec<ReflectedProperty>,
    next_is_optional: bool,
}

impl<'r> DiscoveryContext<'r> {
    pub fn new(registry: &'r LeafRegistry, signal: Signal, target: Option<TypeDescriptor>) -> Self {
        Self {
            registry,
            signal,
            target,
            properties: Vec::new(),
            next_is_optional: false,
        }
    }

    #[inline]
    pub fn signal(&self) -> Signal {
        self.signal
    }

    #[inline]
    pub fn properties(&self) -> &[ReflectedProperty] {
        &self.properties
    }

    #[inline]
    pub fn into_properties(self) -> Vec<ReflectedProperty> {
        self.properties
    }

    /// Returns and clears the optional flag.
    #[inline]
    pub(crate) fn take_optional(&mut self) -> bool {
        core::mem::take(&mut self.next_is_optional)
    }

    #[inline]
    pub(crate) fn mark_optional(&mut self) {
        self.next_is_optional = true;
    }

    pub(crate) fn record(&mut self, path: StructuralPath, ty: TypeDescriptor) {
        let property = ReflectedProperty::new(path, ty, self.take_optional());
        log::trace!("discovered `{property}`");
        self.properties.push(property);
    }

    /// Returns the registered leaf named `name` if it must be treated as opaque.
    ///
    /// A container whose layout fails `fits` only shares the name and is decomposed.
    pub(crate) fn replayable(
        &self,
        name: &str,
        fits: impl FnOnce(&LeafShape) -> bool,
    ) -> Option<&'r LeafMeta> {
        let registry: &'r LeafRegistry = self.registry;
        registry
            .get(name)
            .filter(|meta| meta.is_base() || Some(meta.descriptor()) == self.target)
            .filter(|meta| fits(meta.shape()))
    }
}

// -----------------------------------------------------------------------------
// Discovery

/// Configures and runs a discovery pass.
///
/// # Examples
///
/// ```
/// use serde::Deserialize;
/// use sk_reflect::{Discovery, LeafRegistry, Signal};
///
/// #[derive(Deserialize)]
/// struct Address {
///     city: String,
/// }
///
/// #[derive(Deserialize)]
/// struct Person {
///     address: Address,
///     scores: Vec<u32>,
/// }
///
/// let registry = LeafRegistry::new();
/// let (person, properties) = Discovery::new(&registry)
///     .signal(Signal::High)
///     .materialize::<Person>()
///     .unwrap();
///
/// assert_eq!(person.address.city, "1");
/// assert_eq!(person.scores, [1]);
///
/// let paths: Vec<String> = properties.iter().map(|p| p.path.to_string()).collect();
/// assert_eq!(paths, [".address.city", ".scores[0]"]);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Discovery<'r> {
    registry: &'r LeafRegistry,
    signal: Signal,
    target: Option<TypeDescriptor>,
}

impl<'r> Discovery<'r> {
    #[inline]
    pub fn new(registry: &'r LeafRegistry) -> Self {
        Self {
            registry,
            signal: Signal::Low,
            target: None,
        }
    }

    #[inline]
    pub fn signal(mut self, signal: Signal) -> Self {
        self.signal = signal;
        self
    }

    /// Treats the registered leaf `V` as opaque even if it is not a base type.
    pub fn target<V: ReflectionLeaf>(mut self) -> Result<Self, ReflectError> {
        self.target = Some(self.registry.descriptor_of::<V>()?);
        Ok(self)
    }

    #[inline]
    pub(crate) fn target_descriptor(mut self, target: TypeDescriptor) -> Self {
        self.target = Some(target);
        self
    }

    /// Builds a `T` out of sentinels and returns it with every property met.
    pub fn materialize<T: DeserializeOwned>(
        self,
    ) -> Result<(T, Vec<ReflectedProperty>), ReflectError> {
        let type_path = core::any::type_name::<T>();
        log::debug!("discovering `{type_path}` with {:?} sentinels", self.signal);

        let mut ctx = DiscoveryContext::new(self.registry, self.signal, self.target);
        let value = T::deserialize(DiscoveryDeserializer::new(&mut ctx, StructuralPath::root()))?;
        let properties = ctx.into_properties();

        log::debug!(
            "discovered {} properties of `{type_path}`",
            properties.len()
        );
        Ok((value, properties))
    }

    /// Returns every property of `T`, discarding the materialized value.
    #[inline]
    pub fn run<T: DeserializeOwned>(self) -> Result<Vec<ReflectedProperty>, ReflectError> {
        self.materialize::<T>().map(|(_, properties)| properties)
    }
}

/// Returns every leaf reachable from `T`, depth-first.
///
/// Equivalent to `Discovery::new(registry).signal(signal).run::<T>()`.
#[inline]
pub fn discover<T: DeserializeOwned>(
    registry: &LeafRegistry,
    signal: Signal,
) -> Result<Vec<ReflectedProperty>, ReflectError> {
    Discovery::new(registry).signal(signal).run::<T>()
}

#[cfg(test)]
mod tests;
