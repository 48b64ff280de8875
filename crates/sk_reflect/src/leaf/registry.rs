use core::any::TypeId;

use foldhash::fast::FixedState;
use serde_core::Deserialize;
use serde_json::Value;

use super::ReflectionLeaf;
use super::shape::{LeafShape, Sampled, sample};
use crate::ReflectError;
use crate::discover::Signal;
use crate::property::TypeDescriptor;

type HashMap<K, V> = hashbrown::HashMap<K, V, FixedState>;

// -----------------------------------------------------------------------------
// LeafMeta

/// Runtime information about one registered [`ReflectionLeaf`] type.
///
/// Sentinels are stored in serialized form, so a traversal can replay them into
/// any visitor without knowing the concrete type. The low-sentinel predicate is
/// kept as a function pointer that rebuilds the concrete type first.
///
/// The [`LeafShape`] tells the leaf apart from other types with the same serde name.
#[derive(Clone)]
pub struct LeafMeta {
    type_id: TypeId,
    type_path: &'static str,
    name: &'static str,
    shape: LeafShape,
    base: bool,
    low: Value,
    high: Value,
    is_low: fn(&Value) -> Result<bool, serde_json::Error>,
}

impl LeafMeta {
    /// Builds the meta of `T`, reading its serde name and shape off the sentinels.
    ///
    /// Returns [`ReflectError::AnonymousLeaf`] if `T` does not serialize as a named container.
    pub fn of<T: ReflectionLeaf>() -> Result<Self, ReflectError> {
        let type_path = core::any::type_name::<T>();
        let (low, high) = T::sentinels();

        let Sampled::Named(name, mut shape) = sample(&low)? else {
            return Err(ReflectError::AnonymousLeaf { type_path });
        };
        if let Sampled::Named(_, other) = sample(&high)? {
            shape.merge(other);
        }

        Ok(Self {
            type_id: TypeId::of::<T>(),
            type_path,
            name,
            shape,
            base: T::is_base_type(),
            low: serde_json::to_value(&low)?,
            high: serde_json::to_value(&high)?,
            is_low: |value| T::deserialize(value).map(|leaf| leaf.is_low()),
        })
    }

    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    #[inline]
    pub fn type_path(&self) -> &'static str {
        self.type_path
    }

    /// The serde container name used to recognize the type.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn shape(&self) -> &LeafShape {
        &self.shape
    }

    #[inline]
    pub fn is_base(&self) -> bool {
        self.base
    }

    #[inline]
    pub fn descriptor(&self) -> TypeDescriptor {
        TypeDescriptor::Leaf {
            name: self.name,
            type_path: self.type_path,
        }
    }

    /// Returns the serialized sentinel selected by `signal`.
    #[inline]
    pub fn sentinel(&self, signal: Signal) -> &Value {
        match signal {
            Signal::Low => &self.low,
            Signal::High => &self.high,
        }
    }

    /// Rebuilds the leaf from `value` and checks it against the low sentinel.
    pub fn is_low(&self, value: &Value) -> Result<bool, ReflectError> {
        Ok((self.is_low)(value)?)
    }
}

impl core::fmt::Debug for LeafMeta {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LeafMeta")
            .field("type_path", &self.type_path)
            .field("name", &self.name)
            .field("shape", &self.shape)
            .field("base", &self.base)
            .field("low", &self.low)
            .field("high", &self.high)
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// LeafRegistry

/// A registry of custom [`ReflectionLeaf`] types.
///
/// Data model scalars (`bool`, numbers, `char`, `String`) are always leaves and
/// never need registering. Every other leaf type must be registered before a
/// traversal can recognize it; unregistered named containers are decomposed
/// through their own serde implementation.
///
/// Entries are keyed by serde container name, the only identity a type exposes
/// to a serializer or deserializer. A container whose layout differs from the
/// registered [`LeafShape`] is not the leaf, whatever its name.
///
/// # Examples
///
/// ```
/// use serde::{Deserialize, Serialize};
/// use sk_reflect::{LeafRegistry, ReflectionLeaf, ReflectError, TypeDescriptor};
///
/// #[derive(Serialize, Deserialize)]
/// struct Email(String);
///
/// impl ReflectionLeaf for Email {
///     fn sentinels() -> (Self, Self) {
///         (Email("lo@example.com".into()), Email("hi@example.com".into()))
///     }
///
///     fn is_low(&self) -> bool {
///         self.0 == "lo@example.com"
///     }
/// }
///
/// let mut registry = LeafRegistry::new();
/// assert!(registry.register::<Email>().unwrap());
/// // Registering twice does nothing.
/// assert!(!registry.register::<Email>().unwrap());
///
/// assert!(registry.contains::<Email>());
/// assert!(matches!(
///     registry.descriptor_of::<Email>(),
///     Ok(TypeDescriptor::Leaf { name: "Email", .. }),
/// ));
/// assert_eq!(registry.descriptor_of::<Option<u8>>(), Ok(TypeDescriptor::U8));
///
/// #[derive(Serialize, Deserialize)]
/// struct Other(u8);
///
/// impl ReflectionLeaf for Other {
///     fn sentinels() -> (Self, Self) {
///         (Other(0), Other(1))
///     }
///
///     fn is_low(&self) -> bool {
///         self.0 == 0
///     }
/// }
///
/// assert!(matches!(
///     registry.descriptor_of::<Other>(),
///     Err(ReflectError::UnregisteredLeaf { name: "Other", .. }),
/// ));
/// ```
#[derive(Debug, Clone)]
pub struct LeafRegistry {
    leaves: HashMap<&'static str, LeafMeta>,
    type_id_to_name: HashMap<TypeId, &'static str>,
}

impl Default for LeafRegistry {
    /// See [`LeafRegistry::new`] .
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl LeafRegistry {
    /// Create a empty [`LeafRegistry`].
    #[inline]
    pub const fn new() -> Self {
        Self {
            leaves: HashMap::with_hasher(FixedState::with_seed(0)),
            type_id_to_name: HashMap::with_hasher(FixedState::with_seed(0)),
        }
    }

    /// Attempts to register `T` if it has not yet been registered already.
    ///
    /// Returns `true` if a new entry was inserted.
    pub fn register<T: ReflectionLeaf>(&mut self) -> Result<bool, ReflectError> {
        if self.type_id_to_name.contains_key(&TypeId::of::<T>()) {
            return Ok(false);
        }
        self.insert(LeafMeta::of::<T>()?)
    }

    /// Inserts a prepared [`LeafMeta`].
    ///
    /// - If the type already exists, the function will do nothing and return `false`.
    /// - If another type already uses the same serde name, returns [`ReflectError::DuplicateLeafName`].
    pub fn insert(&mut self, meta: LeafMeta) -> Result<bool, ReflectError> {
        if let Some(existing) = self.leaves.get(meta.name) {
            if existing.type_id == meta.type_id {
                return Ok(false);
            }
            return Err(ReflectError::DuplicateLeafName {
                name: meta.name,
                existing: existing.type_path,
                incoming: meta.type_path,
            });
        }

        log::debug!("registered leaf `{}` as `{}`", meta.type_path, meta.name);
        self.type_id_to_name.insert(meta.type_id, meta.name);
        self.leaves.insert(meta.name, meta);
        Ok(true)
    }

    /// Automatically registers all leaf types declared via [`impl_auto_register!`].
    ///
    /// Repeated calls are cheap and will not insert duplicates.
    ///
    /// ## Return Value
    ///
    /// Returns `Ok(true)` if automatic registration ran. Without the `auto_register`
    /// feature this does nothing and returns `Ok(false)`.
    ///
    /// [`impl_auto_register!`]: crate::impl_auto_register
    #[cfg_attr(not(feature = "auto_register"), inline(always))]
    pub fn auto_register(&mut self) -> Result<bool, ReflectError> {
        #[cfg(feature = "auto_register")]
        {
            for registration in inventory::iter::<LeafRegistration> {
                (registration.0)(self)?;
            }
            Ok(true)
        }

        #[cfg(not(feature = "auto_register"))]
        {
            Ok(false)
        }
    }

    /// Returns the leaf registered under the serde name `name`.
    #[inline]
    pub fn get(&self, name: &str) -> Option<&LeafMeta> {
        self.leaves.get(name)
    }

    #[inline]
    pub fn get_by_type_id(&self, type_id: TypeId) -> Option<&LeafMeta> {
        self.type_id_to_name
            .get(&type_id)
            .and_then(|name| self.leaves.get(name))
    }

    #[inline]
    pub fn contains<T: 'static>(&self) -> bool {
        self.type_id_to_name.contains_key(&TypeId::of::<T>())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LeafMeta> {
        self.leaves.values()
    }

    /// Returns the descriptor traversals will report for `V`.
    ///
    /// `Option` is transparent. A named `V` must be registered.
    ///
    /// # Errors
    ///
    /// - [`ReflectError::UnregisteredLeaf`] if `V` is a named container missing from `self`.
    /// - [`ReflectError::AnonymousLeaf`] if `V` is a custom leaf that serializes as a bare
    ///   scalar, which traversals cannot tell apart from the scalar itself.
    pub fn descriptor_of<V: ReflectionLeaf>(&self) -> Result<TypeDescriptor, ReflectError> {
        let type_path = core::any::type_name::<V>();
        let (low, _) = V::sentinels();

        match sample(&low)? {
            Sampled::Scalar(kind) if V::is_scalar() => Ok(kind),
            Sampled::Scalar(_) => Err(ReflectError::AnonymousLeaf { type_path }),
            Sampled::Named(name, _) => self
                .get(name)
                .map(LeafMeta::descriptor)
                .ok_or(ReflectError::UnregisteredLeaf { type_path, name }),
        }
    }
}

// -----------------------------------------------------------------------------
// auto_register

/// A static leaf registration collected by [`LeafRegistry::auto_register`].
///
/// Created by [`impl_auto_register!`](crate::impl_auto_register).
#[cfg(feature = "auto_register")]
pub struct LeafRegistration(fn(&mut LeafRegistry) -> Result<bool, ReflectError>);

#[cfg(feature = "auto_register")]
impl LeafRegistration {
    #[inline]
    pub const fn of<T: ReflectionLeaf>() -> Self {
        Self(LeafRegistry::register::<T>)
    }
}

#[cfg(feature = "auto_register")]
inventory::collect!(LeafRegistration);

/// Submits a [`ReflectionLeaf`] type for [`LeafRegistry::auto_register`].
///
/// Expands to nothing without the `auto_register` feature.
///
/// ```
/// use serde::{Deserialize, Serialize};
/// use sk_reflect::{LeafRegistry, ReflectionLeaf, impl_auto_register};
///
/// #[derive(Serialize, Deserialize)]
/// struct Celsius(f32);
///
/// impl ReflectionLeaf for Celsius {
///     fn sentinels() -> (Self, Self) {
///         (Celsius(0.0), Celsius(1.0))
///     }
///
///     fn is_low(&self) -> bool {
///         self.0 == 0.0
///     }
/// }
///
/// impl_auto_register!(Celsius);
///
/// let mut registry = LeafRegistry::new();
/// if registry.auto_register().unwrap() {
///     assert!(registry.contains::<Celsius>());
/// }
/// ```
#[cfg(feature = "auto_register")]
#[macro_export]
macro_rules! impl_auto_register {
    ($ty:ty) => {
        $crate::__macro_exports::inventory::submit! {
            $crate::leaf::LeafRegistration::of::<$ty>()
        }
    };
}

/// Submits a [`ReflectionLeaf`] type for [`LeafRegistry::auto_register`].
///
/// Expands to nothing without the `auto_register` feature.
#[cfg(not(feature = "auto_register"))]
#[macro_export]
macro_rules! impl_auto_register {
    ($ty:ty) => {};
}
