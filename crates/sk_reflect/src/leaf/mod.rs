//! Leaf types and their registry.
//!
//! A leaf is a value traversals never look into. Every serde data model scalar
//! is a leaf out of the box; custom leaves implement [`ReflectionLeaf`] and are
//! registered in a [`LeafRegistry`] under their serde container name.

mod registry;
mod shape;
mod traits;

pub(crate) use traits::LOW_STR;

pub use registry::{LeafMeta, LeafRegistry};
pub use shape::LeafShape;
pub use traits::ReflectionLeaf;

#[cfg(feature = "auto_register")]
pub use registry::LeafRegistration;

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    use super::{LeafMeta, LeafRegistry, LeafShape, ReflectionLeaf};
    use crate::discover::Signal;
    use crate::{ReflectError, TypeDescriptor};

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Money {
        cents: i64,
        currency: char,
    }

    impl ReflectionLeaf for Money {
        fn sentinels() -> (Self, Self) {
            (
                Money { cents: 0, currency: 'L' },
                Money { cents: 0, currency: 'H' },
            )
        }

        fn is_low(&self) -> bool {
            self.currency == 'L'
        }
    }

    mod shadow {
        use serde::{Deserialize, Serialize};

        use crate::ReflectionLeaf;

        #[derive(Serialize, Deserialize)]
        pub struct Money(pub u8);

        impl ReflectionLeaf for Money {
            fn sentinels() -> (Self, Self) {
                (Money(0), Money(1))
            }

            fn is_low(&self) -> bool {
                self.0 == 0
            }
        }
    }

    #[derive(Serialize, Deserialize)]
    #[serde(transparent)]
    struct IsoDate(alloc::string::String);

    impl ReflectionLeaf for IsoDate {
        fn sentinels() -> (Self, Self) {
            (IsoDate("1970-01-01".into()), IsoDate("1970-01-02".into()))
        }

        fn is_low(&self) -> bool {
            self.0 == "1970-01-01"
        }
    }

    crate::impl_auto_register!(Money);

    #[cfg(feature = "auto_register")]
    #[test]
    fn auto_register_collects_submissions() {
        let mut registry = LeafRegistry::new();
        assert_eq!(registry.auto_register(), Ok(true));
        assert_eq!(registry.auto_register(), Ok(true));
        assert!(registry.contains::<Money>());
    }

    #[test]
    fn meta_keeps_serialized_sentinels() {
        let meta = LeafMeta::of::<Money>().unwrap();
        assert_eq!(meta.name(), "Money");
        assert_eq!(
            meta.shape(),
            &LeafShape::Struct {
                fields: alloc::vec!["cents", "currency"],
            }
        );
        assert!(!meta.is_base());
        assert_eq!(meta.sentinel(Signal::Low)["currency"], "L");
        assert_eq!(meta.sentinel(Signal::High)["currency"], "H");

        assert!(meta.is_low(meta.sentinel(Signal::Low)).unwrap());
        assert!(!meta.is_low(meta.sentinel(Signal::High)).unwrap());
    }

    #[test]
    fn register_is_idempotent() {
        let mut registry = LeafRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.register::<Money>(), Ok(true));
        assert_eq!(registry.register::<Money>(), Ok(false));
        assert_eq!(registry.len(), 1);

        let meta = registry.get_by_type_id(core::any::TypeId::of::<Money>()).unwrap();
        assert_eq!(
            meta.descriptor(),
            TypeDescriptor::Leaf {
                name: "Money",
                type_path: core::any::type_name::<Money>(),
            }
        );
    }

    #[test]
    fn serde_names_must_be_unique() {
        let mut registry = LeafRegistry::new();
        registry.register::<Money>().unwrap();

        let err = registry.register::<shadow::Money>().unwrap_err();
        assert!(matches!(err, ReflectError::DuplicateLeafName { name: "Money", .. }));
        assert!(!registry.contains::<shadow::Money>());
    }

    #[test]
    fn scalar_descriptors_need_no_registration() {
        let registry = LeafRegistry::default();
        assert_eq!(registry.descriptor_of::<bool>(), Ok(TypeDescriptor::Bool));
        assert_eq!(
            registry.descriptor_of::<alloc::string::String>(),
            Ok(TypeDescriptor::String)
        );
        assert_eq!(
            registry.descriptor_of::<Option<f32>>(),
            Ok(TypeDescriptor::F32)
        );
        assert!(matches!(
            registry.descriptor_of::<Money>(),
            Err(ReflectError::UnregisteredLeaf { name: "Money", .. })
        ));
    }

    #[test]
    fn bare_scalar_leaves_are_rejected() {
        let type_path = core::any::type_name::<IsoDate>();
        let mut registry = LeafRegistry::new();
        assert_eq!(
            registry.register::<IsoDate>(),
            Err(ReflectError::AnonymousLeaf { type_path })
        );
        assert_eq!(
            registry.descriptor_of::<IsoDate>(),
            Err(ReflectError::AnonymousLeaf { type_path })
        );
        assert_eq!(
            registry.descriptor_of::<Option<IsoDate>>(),
            Err(ReflectError::AnonymousLeaf {
                type_path: core::any::type_name::<Option<IsoDate>>(),
            })
        );
    }
}
