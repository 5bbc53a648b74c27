//! Property-based tests for `NamedValueBag` using proptest.
//!
//! These check invariants that must hold for any sequence of insertions, not
//! just the fixed scenarios in `scenario_tests.rs`.

use std::collections::HashSet;

use named_value_bag::{NamedValueBag, RejectingConverter, SerializationError, TypeTag, Value};
use proptest::prelude::*;

struct Subject;

fn new_bag() -> NamedValueBag<'static> {
    NamedValueBag::new(TypeTag::named::<Subject>(), &RejectingConverter).unwrap()
}

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

fn arb_name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,10}"
}

fn arb_integer() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i8>().prop_map(Value::from),
        any::<u8>().prop_map(Value::from),
        any::<i16>().prop_map(Value::from),
        any::<u16>().prop_map(Value::from),
        any::<i32>().prop_map(Value::from),
        any::<u32>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        any::<u64>().prop_map(Value::from),
    ]
}

fn arb_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        1 => any::<bool>().prop_map(Value::from),
        1 => any::<char>().prop_map(Value::from),
        3 => arb_integer(),
        1 => (-1.0e30f32..1.0e30f32).prop_map(Value::from),
        1 => (-1.0e300f64..1.0e300f64).prop_map(Value::from),
        2 => "[ -~]{0,20}".prop_map(Value::from),
    ]
}

/// Members with pairwise distinct names.
fn arb_members() -> impl Strategy<Value = Vec<(String, Value)>> {
    prop::collection::vec((arb_name(), arb_value()), 0..24).prop_map(|pairs| {
        let mut seen = HashSet::new();
        pairs
            .into_iter()
            .filter(|(name, _)| seen.insert(name.clone()))
            .collect()
    })
}

fn populate(members: &[(String, Value)]) -> NamedValueBag<'static> {
    let mut bag = new_bag();
    for (name, value) in members {
        bag.add(name.clone(), value.clone()).unwrap();
    }
    bag
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn len_and_order_match_insertions(members in arb_members()) {
        let bag = populate(&members);

        prop_assert_eq!(bag.len(), members.len());
        let listed: Vec<(String, Value)> = bag
            .iter()
            .map(|e| (e.name().to_string(), e.value().clone()))
            .collect();
        prop_assert_eq!(listed, members);
    }

    #[test]
    fn declared_type_is_value_type(members in arb_members()) {
        let bag = populate(&members);
        for entry in &bag {
            prop_assert_eq!(entry.object_type(), &entry.value().type_tag());
        }
    }

    #[test]
    fn enumeration_is_restartable(members in arb_members()) {
        let bag = populate(&members);
        let first: Vec<_> = bag.iter().cloned().collect();
        let second: Vec<_> = bag.iter().cloned().collect();
        prop_assert_eq!(first.len(), bag.len());
        prop_assert_eq!(first, second);
    }

    #[test]
    fn duplicate_insert_changes_nothing(
        members in arb_members().prop_filter("need a member", |m| !m.is_empty()),
        pick in any::<prop::sample::Index>(),
        replacement in arb_value(),
    ) {
        let mut bag = populate(&members);
        let before: Vec<_> = bag.iter().cloned().collect();
        let (name, _) = &members[pick.index(members.len())];

        let err = bag.add(name.clone(), replacement).unwrap_err();
        prop_assert_eq!(err, SerializationError::DuplicateMember { name: name.clone() });
        let after: Vec<_> = bag.iter().cloned().collect();
        prop_assert_eq!(before, after);
    }

    #[test]
    fn unknown_name_is_not_found(members in arb_members(), missing in arb_name()) {
        prop_assume!(!members.iter().any(|(name, _)| *name == missing));
        let bag = populate(&members);

        let err = bag.get(&missing, &TypeTag::Any).unwrap_err();
        prop_assert_eq!(err, SerializationError::MemberNotFound { name: missing.clone() });
        prop_assert_eq!(bag.len(), members.len());
    }

    #[test]
    fn every_member_reads_back_as_stored(members in arb_members()) {
        let bag = populate(&members);
        for (name, value) in &members {
            prop_assert_eq!(&bag.get(name, &value.type_tag()).unwrap(), value);
        }
    }

    #[test]
    fn i32_roundtrip(n in any::<i32>()) {
        let mut bag = new_bag();
        bag.add("n", n).unwrap();
        prop_assert_eq!(bag.get_i32("n").unwrap(), n);
    }

    #[test]
    fn u64_roundtrip(n in any::<u64>()) {
        let mut bag = new_bag();
        bag.add("n", n).unwrap();
        prop_assert_eq!(bag.get_u64("n").unwrap(), n);
    }

    #[test]
    fn char_roundtrip(c in any::<char>()) {
        let mut bag = new_bag();
        bag.add("c", c).unwrap();
        prop_assert_eq!(bag.get_char("c").unwrap(), c);
    }

    #[test]
    fn string_roundtrip(s in ".{0,40}") {
        let mut bag = new_bag();
        bag.add("s", s.clone()).unwrap();
        prop_assert_eq!(bag.get_string("s").unwrap(), s);
    }

    #[test]
    fn f64_roundtrip(x in any::<f64>().prop_filter("NaN never equals itself", |x| !x.is_nan())) {
        let mut bag = new_bag();
        bag.add("x", x).unwrap();
        prop_assert_eq!(bag.get_f64("x").unwrap(), x);
    }
}
