//! `Serializable` / `Deserializable` plumbing and the streaming context.

use named_value_bag::{
    collect, collect_nested, ContextStates, Deserializable, NamedValueBag, ObjectValue,
    RejectingConverter, Result, Serializable, SerializationError, StreamingContext, TypeTag,
    Value,
};

#[derive(Debug, PartialEq)]
struct Point {
    x: i32,
    y: i32,
}

impl Serializable for Point {
    fn get_object_data(&self, bag: &mut NamedValueBag<'_>, _ctx: &StreamingContext) -> Result<()> {
        bag.add("x", self.x)?;
        bag.add("y", self.y)?;
        Ok(())
    }
}

impl Deserializable for Point {
    fn from_object_data(bag: &NamedValueBag<'_>, _ctx: &StreamingContext) -> Result<Self> {
        Ok(Self {
            x: bag.get_i32("x")?,
            y: bag.get_i32("y")?,
        })
    }
}

/// Records the context it was handed.
struct ContextEcho;

impl Serializable for ContextEcho {
    fn get_object_data(&self, bag: &mut NamedValueBag<'_>, ctx: &StreamingContext) -> Result<()> {
        bag.add("context", ctx.context.clone())?;
        Ok(())
    }
}

/// Lists the same member twice.
struct Careless;

impl Serializable for Careless {
    fn get_object_data(&self, bag: &mut NamedValueBag<'_>, _ctx: &StreamingContext) -> Result<()> {
        bag.add("id", 1u32)?;
        bag.add("id", 2u32)?;
        Ok(())
    }
}

struct Segment {
    from: Point,
    to: Point,
}

impl Serializable for Segment {
    fn get_object_data(&self, bag: &mut NamedValueBag<'_>, ctx: &StreamingContext) -> Result<()> {
        bag.add("from", collect_nested(&self.from, &RejectingConverter, ctx)?)?;
        bag.add("to", collect_nested(&self.to, &RejectingConverter, ctx)?)?;
        Ok(())
    }
}

// ============================================================================
// 1. StreamingContext
// ============================================================================

#[test]
fn default_context_targets_everything() {
    let ctx = StreamingContext::default();
    assert_eq!(ctx.state, ContextStates::ALL);
    assert_eq!(ctx.context, None);
}

#[test]
fn context_is_passed_through_untouched() {
    let ctx = StreamingContext::new(ContextStates::FILE).with_context("backup-2026");
    let bag = collect(&ContextEcho, &RejectingConverter, &ctx).unwrap();

    assert_eq!(bag.get_string("context").unwrap(), "backup-2026");
    assert_eq!(ctx.state, ContextStates::FILE);
}

#[test]
fn context_states_combine_as_flags() {
    let state = ContextStates::CROSS_PROCESS | ContextStates::CROSS_MACHINE;

    assert!(state.contains(ContextStates::CROSS_PROCESS));
    assert!(state.contains(ContextStates::CROSS_MACHINE));
    assert!(!state.contains(ContextStates::FILE));
    assert_eq!(state & ContextStates::CROSS_MACHINE, ContextStates::CROSS_MACHINE);
    assert!(ContextStates::ALL.contains(state | ContextStates::CLONE));
    assert_eq!(ContextStates::from_bits(0xff), ContextStates::ALL);

    let ctx = StreamingContext::new(state);
    let bag = collect(&ContextEcho, &RejectingConverter, &ctx).unwrap();
    assert_eq!(bag.len(), 1);
    assert_eq!(ctx.state.bits(), 0b11);
}

// ============================================================================
// 2. Collect / rebuild
// ============================================================================

#[test]
fn point_roundtrips_through_bag() {
    let ctx = StreamingContext::new(ContextStates::PERSISTENCE);
    let bag = collect(&Point { x: -3, y: 9 }, &RejectingConverter, &ctx).unwrap();

    assert_eq!(bag.subject_type(), &TypeTag::named::<Point>());
    assert_eq!(
        Point::from_object_data(&bag, &ctx).unwrap(),
        Point { x: -3, y: 9 }
    );
}

#[test]
fn collection_errors_surface_from_collect() {
    let err = collect(&Careless, &RejectingConverter, &StreamingContext::default()).unwrap_err();
    assert_eq!(
        err,
        SerializationError::DuplicateMember {
            name: "id".to_string()
        }
    );
}

#[test]
fn rebuild_fails_on_missing_member() {
    let ctx = StreamingContext::default();
    let mut bag = NamedValueBag::new(TypeTag::named::<Point>(), &RejectingConverter).unwrap();
    bag.add("x", 1i32).unwrap();

    let err = Point::from_object_data(&bag, &ctx).unwrap_err();
    assert_eq!(err.to_string(), "Member 'y' was not found.");
}

// ============================================================================
// 3. Nested objects
// ============================================================================

#[test]
fn nested_objects_keep_their_own_fields() {
    let segment = Segment {
        from: Point { x: 0, y: 0 },
        to: Point { x: 4, y: 2 },
    };
    let bag = collect(&segment, &RejectingConverter, &StreamingContext::default()).unwrap();

    let to = bag.get("to", &TypeTag::named::<Point>()).unwrap();
    match to {
        Value::Object(ObjectValue { fields, .. }) => assert_eq!(
            fields,
            vec![
                ("x".to_string(), Value::I32(4)),
                ("y".to_string(), Value::I32(2)),
            ]
        ),
        other => panic!("expected an object, got {:?}", other),
    }
}
