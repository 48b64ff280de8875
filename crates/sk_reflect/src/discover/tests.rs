#![allow(dead_code, reason = "fields are materialized, not read")]

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use super::{Discovery, Signal, discover};
use crate::access::StructuralPath;
use crate::leaf::{LeafRegistry, ReflectionLeaf};
use crate::{ReflectError, ReflectedProperty, TypeDescriptor};

fn summary(properties: &[ReflectedProperty]) -> Vec<String> {
    properties.iter().map(ToString::to_string).collect()
}

#[derive(Debug, Deserialize)]
struct Person {
    name: String,
    age: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct Address {
    city: String,
}

#[derive(Debug, Deserialize)]
struct Customer {
    address: Address,
    tags: Vec<String>,
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
struct Label(String);

impl ReflectionLeaf for Label {
    fn sentinels() -> (Self, Self) {
        (Label("low".into()), Label("high".into()))
    }

    fn is_low(&self) -> bool {
        self.0 == "low"
    }
}

mod time {
    use serde::{Deserialize, Serialize};

    use crate::ReflectionLeaf;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
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
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    pub struct Date {
        pub year: u16,
        pub month: u8,
    }
}

#[test]
fn person_fields_in_declaration_order() {
    let registry = LeafRegistry::new();
    let properties = discover::<Person>(&registry, Signal::Low).unwrap();

    assert_eq!(
        properties,
        [
            ReflectedProperty::new(StructuralPath::from_iter(["name"]), TypeDescriptor::String, false),
            ReflectedProperty::new(StructuralPath::from_iter(["age"]), TypeDescriptor::I64, true),
        ]
    );
}

#[test]
fn signal_only_changes_the_value() {
    let registry = LeafRegistry::new();
    let (low, low_props) = Discovery::new(&registry).materialize::<Person>().unwrap();
    let (high, high_props) = Discovery::new(&registry)
        .signal(Signal::High)
        .materialize::<Person>()
        .unwrap();

    assert_eq!(low_props, high_props);
    assert_eq!((low.name.as_str(), low.age), ("0", Some(0)));
    assert_eq!((high.name.as_str(), high.age), ("1", Some(1)));
}

#[test]
fn nested_structs_and_sequences() {
    let registry = LeafRegistry::new();
    let properties = discover::<Customer>(&registry, Signal::Low).unwrap();

    assert_eq!(summary(&properties), [".address.city: String", ".tags[0]: String"]);
    assert_eq!(properties[1].path.to_strings(), ["tags", "0"]);
}

#[test]
fn tuples_yield_every_element() {
    #[derive(Deserialize)]
    struct Shape {
        origin: (i32, i32),
        rgb: [u8; 3],
    }

    let registry = LeafRegistry::new();
    let properties = discover::<Shape>(&registry, Signal::High).unwrap();
    assert_eq!(
        summary(&properties),
        [
            ".origin[0]: i32",
            ".origin[1]: i32",
            ".rgb[0]: u8",
            ".rgb[1]: u8",
            ".rgb[2]: u8",
        ]
    );
}

#[test]
fn maps_have_no_declared_entries() {
    #[derive(Deserialize)]
    struct Config {
        env: BTreeMap<String, String>,
        port: u16,
    }

    let registry = LeafRegistry::new();
    let (config, properties) = Discovery::new(&registry).materialize::<Config>().unwrap();
    assert!(config.env.is_empty());
    assert_eq!(summary(&properties), [".port: u16"]);
}

#[test]
fn root_scalar_has_an_empty_path() {
    let registry = LeafRegistry::new();
    let properties = discover::<Option<u32>>(&registry, Signal::Low).unwrap();
    assert_eq!(properties.len(), 1);
    assert!(properties[0].path.is_root());
    assert!(properties[0].optional);
}

#[test]
fn skipped_fields_are_invisible() {
    #[derive(Deserialize)]
    struct Session {
        id: u64,
        #[serde(skip)]
        cache: Vec<u8>,
    }

    let registry = LeafRegistry::new();
    let properties = discover::<Session>(&registry, Signal::Low).unwrap();
    assert_eq!(summary(&properties), [".id: u64"]);
}

#[test]
fn enums_take_their_first_variant() {
    #[derive(Debug, Deserialize, PartialEq)]
    enum Status {
        Active,
        Retired,
    }

    #[derive(Debug, Deserialize)]
    enum Area {
        Circle { radius: f64 },
        Square(f32),
    }

    #[derive(Debug, Deserialize)]
    struct Plot {
        status: Option<Status>,
        area: Area,
        flag: bool,
    }

    let registry = LeafRegistry::new();
    let (plot, properties) = Discovery::new(&registry).materialize::<Plot>().unwrap();

    assert_eq!(plot.status, Some(Status::Active));
    assert!(matches!(plot.area, Area::Circle { .. }));
    assert_eq!(
        summary(&properties),
        [
            ".status: Option<Status>",
            ".area.Circle.radius: f64",
            ".flag: bool",
        ]
    );
    assert_eq!(properties[0].ty, TypeDescriptor::Variant { name: "Status" });
}

#[test]
fn optional_flag_is_consumed_by_composites() {
    #[derive(Deserialize)]
    struct Inner {
        value: u8,
    }

    #[derive(Deserialize)]
    struct Outer {
        inner: Option<Inner>,
        after: u8,
    }

    let registry = LeafRegistry::new();
    let properties = discover::<Outer>(&registry, Signal::Low).unwrap();
    assert_eq!(summary(&properties), [".inner.value: u8", ".after: u8"]);
}

#[test]
fn newtypes_are_transparent() {
    #[derive(Deserialize)]
    struct Meters(f64);

    #[derive(Deserialize)]
    struct Track {
        length: Option<Meters>,
    }

    let registry = LeafRegistry::new();
    let properties = discover::<Track>(&registry, Signal::Low).unwrap();
    assert_eq!(summary(&properties), [".length: Option<f64>"]);
}

#[test]
fn registered_leaves_are_replayed() {
    #[derive(Deserialize)]
    struct Event {
        at: Timestamp,
        until: Option<Timestamp>,
    }

    let mut registry = LeafRegistry::new();
    registry.register::<Timestamp>().unwrap();

    let (event, properties) = Discovery::new(&registry)
        .signal(Signal::High)
        .materialize::<Event>()
        .unwrap();

    assert_eq!(event.at, Timestamp(2_000));
    assert_eq!(event.until, Some(Timestamp(2_000)));
    assert_eq!(properties.len(), 2);
    assert!(properties[0].ty.is_registered_leaf());
    assert!(properties[1].optional);
}

#[test]
fn non_base_leaves_are_opaque_only_as_target() {
    #[derive(Deserialize)]
    struct Post {
        title: Label,
    }

    let mut registry = LeafRegistry::new();
    registry.register::<Label>().unwrap();

    let properties = discover::<Post>(&registry, Signal::Low).unwrap();
    assert_eq!(properties[0].ty, TypeDescriptor::String);

    let (post, properties) = Discovery::new(&registry)
        .target::<Label>()
        .unwrap()
        .materialize::<Post>()
        .unwrap();
    assert_eq!(post.title, Label("low".into()));
    assert!(properties[0].ty.is_registered_leaf());
}

#[test]
fn self_describing_types_are_unsupported() {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Loose {
        Number(u32),
        Text(String),
    }

    #[derive(Deserialize)]
    struct Holder {
        loose: Loose,
    }

    let registry = LeafRegistry::new();
    let err = discover::<Holder>(&registry, Signal::Low).unwrap_err();
    assert_eq!(
        err,
        ReflectError::UnsupportedShape {
            path: StructuralPath::from_iter(["loose"]),
            capability: "deserialize_any",
        }
    );
}

#[test]
fn errors_from_the_type_surface_as_custom() {
    let registry = LeafRegistry::new();
    let err = discover::<NonZeroU32>(&registry, Signal::Low).unwrap_err();
    assert!(matches!(err, ReflectError::Custom(_)));
    assert!(discover::<NonZeroU32>(&registry, Signal::High).is_ok());
}

#[test]
fn ignored_values_consume_the_optional_flag() {
    #[derive(Deserialize)]
    struct Sparse {
        skip: Option<serde::de::IgnoredAny>,
        after: u8,
    }

    let registry = LeafRegistry::new();
    let properties = discover::<Sparse>(&registry, Signal::Low).unwrap();
    assert_eq!(summary(&properties), [".after: u8"]);
}

#[test]
fn same_name_with_another_layout_is_decomposed() {
    #[derive(Deserialize)]
    struct Event {
        when: calendar::Date,
        logged: time::Date,
    }

    let mut registry = LeafRegistry::new();
    registry.register::<time::Date>().unwrap();

    let (event, properties) = Discovery::new(&registry)
        .signal(Signal::High)
        .materialize::<Event>()
        .unwrap();

    assert_eq!((event.when.year, event.when.month), (1, 1));
    assert_eq!(event.logged, time::Date(1));

    let paths: Vec<String> = properties.iter().map(|p| p.path.to_string()).collect();
    assert_eq!(paths, [".when.year", ".when.month", ".logged"]);
    assert_eq!(properties[0].ty, TypeDescriptor::U16);
    assert!(properties[2].ty.is_registered_leaf());
}
