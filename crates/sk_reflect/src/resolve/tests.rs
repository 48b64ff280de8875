use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::vec;
use alloc::vec::Vec;

use serde::{Deserialize, Serialize, Serializer};

use super::{
    FieldAccessor, ResolutionContext, ResolutionSerializer, Traverse, property_path, reflect_property,
    resolve,
};
use crate::access::StructuralPath;
use crate::leaf::{LeafRegistry, ReflectionLeaf};
use crate::{ReflectError, TypeDescriptor};

fn path(keys: &[&str]) -> StructuralPath {
    keys.iter().copied().collect()
}

#[derive(Serialize, Deserialize)]
struct Person {
    name: String,
    age: Option<i64>,
}

#[derive(Serialize, Deserialize)]
struct Address {
    city: String,
}

#[derive(Serialize, Deserialize)]
struct Customer {
    address: Address,
    tags: Vec<String>,
    #[serde(skip_serializing)]
    note: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct Timestamp(u64);

impl ReflectionLeaf for Timestamp {
    fn sentinels() -> (Self, Self) {
        (Timestamp(1_000), Timestamp(2_000))
    }

    fn is_low(&self) -> bool {
        self.0 == 1_000
    }

    fn is_base_type() -> bool {
        true
    }
}

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

mod time {
    use serde::{Deserialize, Serialize};

    use crate::ReflectionLeaf;

    #[derive(Serialize, Deserialize)]
    pub struct Date(pub u64);

    impl ReflectionLeaf for Date {
        fn sentinels() -> (Self, Self) {
            (Date(0), Date(1))
        }

        fn is_low(&self) -> bool {
            self.0 == 0
        }

        fn is_base_type() -> bool {
            true
        }
    }
}

mod calendar {
    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize)]
    pub struct Date {
        pub year: u16,
        pub month: u8,
    }
}

#[test]
fn resolves_the_single_high_leaf() {
    let registry = LeafRegistry::new();
    let age = FieldAccessor::new(|p: &mut Person| &mut p.age);

    let person = Person {
        name: String::from("x"),
        age: Some(1),
    };
    assert_eq!(resolve(&registry, &person, &age), Ok(Some(path(&["age"]))));

    let person = Person {
        name: String::from("x"),
        age: None,
    };
    assert_eq!(resolve(&registry, &person, &age), Ok(None));
}

#[test]
fn property_path_is_deterministic() {
    let registry = LeafRegistry::new();
    let name = FieldAccessor::new(|p: &mut Person| &mut p.name);

    let first = property_path(&registry, &name).unwrap();
    let second = property_path(&registry, &name).unwrap();
    assert_eq!(first, Some(path(&["name"])));
    assert_eq!(first, second);
}

#[test]
fn nested_and_indexed_paths() {
    let registry = LeafRegistry::new();

    let city = FieldAccessor::new(|c: &mut Customer| &mut c.address.city);
    assert_eq!(
        property_path(&registry, &city),
        Ok(Some(path(&["address", "city"])))
    );

    let tag = FieldAccessor::new(|c: &mut Customer| &mut c.tags[0]);
    let found = property_path(&registry, &tag).unwrap().unwrap();
    assert_eq!(found.to_strings(), ["tags", "0"]);
    assert_eq!(found.to_string(), ".tags[0]");
}

#[test]
fn unserialized_fields_have_no_path() {
    let registry = LeafRegistry::new();
    let note = FieldAccessor::new(|c: &mut Customer| &mut c.note);
    assert_eq!(property_path(&registry, &note), Ok(None));
}

#[test]
fn second_divergence_is_fatal() {
    #[derive(Serialize, Deserialize)]
    struct Pair {
        left: i64,
        right: i64,
    }

    let registry = LeafRegistry::new();
    let left = FieldAccessor::new(|p: &mut Pair| &mut p.left);
    let err = resolve(&registry, &Pair { left: 1, right: 1 }, &left).unwrap_err();
    assert_eq!(
        err,
        ReflectError::MultipleDivergence {
            first: path(&["left"]),
            second: path(&["right"]),
        }
    );
}

#[test]
fn map_keys_become_names() {
    #[derive(Serialize, Deserialize)]
    struct Board {
        scores: BTreeMap<String, u32>,
        flags: BTreeMap<u8, bool>,
    }

    let registry = LeafRegistry::new();
    let board = Board {
        scores: BTreeMap::from([(String::from("alpha"), 0), (String::from("beta"), 1)]),
        flags: BTreeMap::from([(3, false)]),
    };
    let any_u32 = FieldAccessor::new(|b: &mut Board| b.scores.get_mut("beta").unwrap());
    assert_eq!(
        resolve(&registry, &board, &any_u32),
        Ok(Some(path(&["scores", "beta"])))
    );

    let board = Board {
        scores: BTreeMap::new(),
        flags: BTreeMap::from([(3, true)]),
    };
    let any_bool = FieldAccessor::new(|b: &mut Board| b.flags.get_mut(&3).unwrap());
    assert_eq!(
        resolve(&registry, &board, &any_bool),
        Ok(Some(path(&["flags", "3"])))
    );
}

#[test]
fn enum_variants_are_named() {
    #[derive(Serialize, Deserialize)]
    enum Payment {
        Cash,
        Card { number: String },
        Voucher(String, u8),
    }

    #[derive(Serialize, Deserialize)]
    struct Order {
        payments: Vec<Payment>,
        memo: String,
    }

    let order = Order {
        payments: vec![
            Payment::Cash,
            Payment::Voucher(String::from("0"), 0),
            Payment::Card {
                number: String::from("1"),
            },
        ],
        memo: String::from("0"),
    };

    let registry = LeafRegistry::new();
    let memo = FieldAccessor::new(|o: &mut Order| &mut o.memo);
    assert_eq!(
        resolve(&registry, &order, &memo),
        Ok(Some(".payments[2].Card.number".parse::<StructuralPath>().unwrap()))
    );
}

#[test]
fn base_leaves_of_other_types_are_opaque() {
    #[derive(Serialize, Deserialize)]
    struct Event {
        at: Timestamp,
        until: Timestamp,
        count: u64,
    }

    let mut registry = LeafRegistry::new();
    registry.register::<Timestamp>().unwrap();

    let until = FieldAccessor::new(|e: &mut Event| &mut e.until);
    assert_eq!(property_path(&registry, &until), Ok(Some(path(&["until"]))));

    // The `u64` inside each `Timestamp` is never compared.
    let count = FieldAccessor::new(|e: &mut Event| &mut e.count);
    assert_eq!(property_path(&registry, &count), Ok(Some(path(&["count"]))));
}

#[test]
fn composite_leaves_are_compared_whole() {
    #[derive(Serialize, Deserialize)]
    struct Item {
        price: Money,
        discount: Option<Money>,
        stock: i64,
    }

    let mut registry = LeafRegistry::new();
    registry.register::<Money>().unwrap();

    let discount = FieldAccessor::new(|i: &mut Item| &mut i.discount);
    assert_eq!(
        property_path(&registry, &discount),
        Ok(Some(path(&["discount"])))
    );

    let property = reflect_property(&registry, &discount).unwrap().unwrap();
    assert!(property.optional);
    assert!(property.ty.is_registered_leaf());

    // `Money` is decomposed when it is not the target.
    let stock = FieldAccessor::new(|i: &mut Item| &mut i.stock);
    assert_eq!(property_path(&registry, &stock), Ok(Some(path(&["stock"]))));
}

#[test]
fn reflect_property_matches_discovery() {
    let registry = LeafRegistry::new();
    let age = FieldAccessor::new(|p: &mut Person| &mut p.age);

    let property = reflect_property(&registry, &age).unwrap().unwrap();
    assert_eq!(property.path, path(&["age"]));
    assert_eq!(property.ty, TypeDescriptor::I64);
    assert!(property.optional);
}

#[test]
fn unregistered_targets_are_rejected() {
    #[derive(Serialize, Deserialize)]
    struct Wallet {
        balance: Money,
    }

    let registry = LeafRegistry::new();
    let balance = FieldAccessor::new(|w: &mut Wallet| &mut w.balance);
    assert!(matches!(
        property_path(&registry, &balance),
        Err(ReflectError::UnregisteredLeaf { name: "Money", .. })
    ));
}

#[test]
fn raw_bytes_are_unsupported() {
    struct Blob(Vec<u8>);

    impl Serialize for Blob {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.serialize_bytes(&self.0)
        }
    }

    #[derive(Serialize)]
    struct Upload {
        size: u32,
        data: Blob,
    }

    let registry = LeafRegistry::new();
    let upload = Upload {
        size: 0,
        data: Blob(vec![1, 2]),
    };
    let size = FieldAccessor::new(|u: &mut Upload| &mut u.size);
    assert_eq!(
        resolve(&registry, &upload, &size),
        Err(ReflectError::UnsupportedShape {
            path: path(&["data"]),
            capability: "serialize_bytes",
        })
    );
}

#[test]
fn same_name_with_another_layout_is_traversed() {
    #[derive(Serialize, Deserialize)]
    struct Event {
        when: calendar::Date,
        logged: time::Date,
    }

    let mut registry = LeafRegistry::new();
    registry.register::<time::Date>().unwrap();

    let month = FieldAccessor::new(|e: &mut Event| &mut e.when.month);
    assert_eq!(
        property_path(&registry, &month),
        Ok(Some(path(&["when", "month"])))
    );

    let event = Event {
        when: calendar::Date { year: 0, month: 3 },
        logged: time::Date(9),
    };
    assert_eq!(
        resolve(&registry, &event, &month),
        Ok(Some(path(&["when", "month"])))
    );

    let logged = FieldAccessor::new(|e: &mut Event| &mut e.logged);
    assert_eq!(property_path(&registry, &logged), Ok(Some(path(&["logged"]))));
}

#[test]
fn serializer_drives_any_serialize_impl() {
    let registry = LeafRegistry::new();
    let mut ctx = ResolutionContext::new(&registry, TypeDescriptor::I64);

    let person = Person {
        name: String::from("1"),
        age: Some(5),
    };
    person
        .serialize(ResolutionSerializer::new(&mut ctx, StructuralPath::root()))
        .unwrap();
    assert_eq!(ctx.found(), Some(&path(&["age"])));

    let mut ctx = ResolutionContext::new(&registry, TypeDescriptor::U8);
    let mut traverse: Traverse<'_, '_> =
        ResolutionSerializer::new(&mut ctx, path(&["bytes"])).serialize_seq(None).unwrap();
    serde::ser::SerializeSeq::serialize_element(&mut traverse, &0_u8).unwrap();
    serde::ser::SerializeSeq::serialize_element(&mut traverse, &4_u8).unwrap();
    serde::ser::SerializeSeq::end(traverse).unwrap();
    assert_eq!(ctx.into_found().map(|p| p.to_string()), Some(String::from(".bytes[1]")));
}
