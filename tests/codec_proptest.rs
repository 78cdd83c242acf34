//! Property tests for the compact codec and the address grammar.

use archivist::domain::asset::{AssetType, ParsedAddress};
use archivist::domain::data::{Data, Point, Quantity, Unit};
use archivist::domain::math::round_float;
use archivist::domain::time_unit::{MIN_TIME_FRAME, TimeUnit};
use proptest::prelude::*;

fn magnitude() -> impl Strategy<Value = f64> {
    -1.0e6..1.0e6f64
}

fn precision() -> impl Strategy<Value = i8> {
    0i8..=6
}

fn full_unit() -> impl Strategy<Value = Unit> {
    (
        prop::array::uniform7(magnitude()),
        2i64..10_000,
    )
        .prop_map(|(m, count)| Unit {
            open: m[0],
            high: m[1],
            low: m[2],
            close: m[3],
            average: m[4],
            median: m[5],
            absolute_sum: m[6].abs(),
            count,
            time: TimeUnit::default(),
        })
}

fn full_quantity() -> impl Strategy<Value = Quantity> {
    (
        prop::array::uniform6(0.0..1.0e6f64),
        0i64..5_000,
        0i64..5_000,
    )
        .prop_filter("single observations use the short form", |(_, p, m)| p + m != 1)
        .prop_map(|(m, plus_count, minus_count)| Quantity {
            plus: m[0],
            minus: m[1],
            plus_average: m[2],
            minus_average: m[3],
            plus_median: m[4],
            minus_median: m[5],
            plus_count,
            minus_count,
            time: TimeUnit::default(),
        })
}

fn set_id() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z0-9]{1,6}", 1..4)
}

fn asset_type_name() -> impl Strategy<Value = String> {
    prop::sample::select(AssetType::ALL.to_vec()).prop_map(|a| a.as_str().to_string())
}

fn arguments() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[0-9]{1,3}|[a-z]{1,4}", 0..3)
}

fn address() -> impl Strategy<Value = ParsedAddress> {
    let leaf = (set_id(), asset_type_name(), arguments()).prop_map(|(set_id, asset_type, arguments)| {
        ParsedAddress {
            set_id,
            asset_type,
            dependencies: Vec::new(),
            arguments,
        }
    });
    // Three recursion levels on top of the leaf give four levels of nesting.
    leaf.prop_recursive(3, 24, 3, |inner| {
        (
            set_id(),
            asset_type_name(),
            prop::collection::vec(inner, 1..4),
            arguments(),
        )
            .prop_map(|(set_id, asset_type, deps, arguments)| ParsedAddress {
                set_id,
                asset_type,
                dependencies: deps.iter().map(|d| d.build()).collect(),
                arguments,
            })
    })
}

proptest! {
    #[test]
    fn unit_round_trip(unit in full_unit(), p in precision()) {
        let parsed = Unit::parse(&unit.serialize(p)).unwrap();
        let p = p as u32;
        prop_assert_eq!(parsed.open, round_float(unit.open, p));
        prop_assert_eq!(parsed.high, round_float(unit.high, p));
        prop_assert_eq!(parsed.low, round_float(unit.low, p));
        prop_assert_eq!(parsed.close, round_float(unit.close, p));
        prop_assert_eq!(parsed.average, round_float(unit.average, p));
        prop_assert_eq!(parsed.median, round_float(unit.median, p));
        prop_assert_eq!(parsed.absolute_sum, round_float(unit.absolute_sum, p));
        prop_assert_eq!(parsed.count, unit.count);
    }

    #[test]
    fn single_unit_round_trip(value in magnitude(), p in precision()) {
        prop_assume!(value != 0.0);
        let rounded = round_float(value, p as u32);
        let parsed = Unit::parse(&Unit::new(value).serialize(p)).unwrap();
        prop_assert_eq!(parsed.count, 1);
        prop_assert_eq!(parsed.open, rounded);
        prop_assert_eq!(parsed.close, rounded);
        prop_assert_eq!(parsed.median, rounded);
    }

    #[test]
    fn values_rounding_to_zero_keep_their_count(value in -0.0049..0.0049f64, p in 0i8..=2) {
        prop_assume!(value != 0.0);
        let unit = Unit::parse(&Unit::new(value).serialize(p)).unwrap();
        prop_assert_eq!(unit.count, 1);
        let qty = Quantity::parse(&Quantity::new(value).serialize(p)).unwrap();
        prop_assert_eq!(qty.plus_count + qty.minus_count, 1);
    }

    #[test]
    fn quantity_round_trip(qty in full_quantity(), p in precision()) {
        let parsed = Quantity::parse(&qty.serialize(p)).unwrap();
        let p = p as u32;
        prop_assert_eq!(parsed.plus, round_float(qty.plus, p));
        prop_assert_eq!(parsed.minus, round_float(qty.minus, p));
        prop_assert_eq!(parsed.plus_average, round_float(qty.plus_average, p));
        prop_assert_eq!(parsed.minus_average, round_float(qty.minus_average, p));
        prop_assert_eq!(parsed.plus_median, round_float(qty.plus_median, p));
        prop_assert_eq!(parsed.minus_median, round_float(qty.minus_median, p));
        prop_assert_eq!(parsed.plus_count, qty.plus_count);
        prop_assert_eq!(parsed.minus_count, qty.minus_count);
    }

    #[test]
    fn signed_quantity_lands_on_one_side(value in magnitude(), p in precision()) {
        prop_assume!(value != 0.0);
        let rounded = round_float(value, p as u32);
        let parsed = Quantity::parse(&Quantity::new(value).serialize(p)).unwrap();
        prop_assert_eq!(parsed.plus_count + parsed.minus_count, 1);
        prop_assert_eq!(parsed.net(), rounded);
    }

    #[test]
    fn point_round_trip(value in magnitude(), p in precision()) {
        let parsed = Point::parse(&Point::new(value).serialize(p)).unwrap();
        prop_assert_eq!(parsed.value, round_float(value, p as u32));
    }

    #[test]
    fn aggregating_one_unit_is_identity(unit in full_unit()) {
        let unit = Unit { high: unit.open.max(unit.close), low: unit.open.min(unit.close), ..unit };
        prop_assume!(unit.open != 0.0);
        let coarse = MIN_TIME_FRAME * 60;
        let again = Unit::aggregate(&[unit], coarse, unit.time);
        prop_assert_eq!(again.open, unit.open);
        prop_assert_eq!(again.high, unit.high);
        prop_assert_eq!(again.low, unit.low);
        prop_assert_eq!(again.close, unit.close);
        prop_assert_eq!(again.count, unit.count);
        prop_assert_eq!(again.median, unit.close);
    }

    #[test]
    fn address_round_trip(address in address()) {
        let built = address.build();
        let parsed = built.parse().unwrap();
        prop_assert_eq!(&parsed, &address);
        prop_assert_eq!(parsed.build(), built);
    }
}
