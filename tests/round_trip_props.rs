//! Purpose: Property coverage for array round trips and plain JSON pass-through.
//! Invariants: decode(encode(A)) == A for finite float64 arrays, including empty ones.
//! Invariants: decode(encode(A)) == A for non-empty int64, uint64, bool and string arrays.
//! Invariants: decode(encode(V)) == V for JSON values that never use the marker key.
//! Notes: Empty arrays always decode as float64, and a zero-length axis hides the
//! extents after it, so only the last axis may be zero.

use ndtag::{ArrayData, NdArray, Value, from_str, to_string};
use proptest::prelude::*;

/// Shapes of up to three axes where only the last extent may be zero.
fn shape_with_empty() -> impl Strategy<Value = Vec<usize>> {
    (prop::collection::vec(1usize..4, 0..3), prop::option::of(0usize..4)).prop_map(
        |(mut shape, last)| {
            shape.extend(last);
            shape
        },
    )
}

fn nonempty_shape() -> impl Strategy<Value = Vec<usize>> {
    prop::collection::vec(1usize..4, 0..4)
}

fn array_of<T, S>(
    shape: impl Strategy<Value = Vec<usize>>,
    element: S,
) -> impl Strategy<Value = NdArray>
where
    S: Strategy<Value = T> + Clone,
    T: std::fmt::Debug,
    Vec<T>: Into<ArrayData>,
{
    shape.prop_flat_map(move |shape| {
        let total: usize = shape.iter().product();
        prop::collection::vec(element.clone(), total)
            .prop_map(move |data| NdArray::from_shape_vec(shape.clone(), data).unwrap())
    })
}

fn plain_json() -> impl Strategy<Value = serde_json::Value> {
    let leaf = prop_oneof![
        Just(serde_json::Value::Null),
        any::<bool>().prop_map(serde_json::Value::Bool),
        any::<i64>().prop_map(serde_json::Value::from),
        "[a-z0-9 ]{0,8}".prop_map(serde_json::Value::String),
    ];
    leaf.prop_recursive(4, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(serde_json::Value::Array),
            prop::collection::vec(("[a-z]{1,6}", inner), 0..4).prop_map(|entries| {
                serde_json::Value::Object(entries.into_iter().collect())
            }),
        ]
    })
}

fn round_trip(a: &NdArray) -> NdArray {
    from_str(&to_string(&Value::from(a.clone())).unwrap())
        .unwrap()
        .into_array()
        .unwrap()
}

proptest! {
    #[test]
    fn float_arrays_round_trip(a in array_of(shape_with_empty(), -1.0e12f64..1.0e12)) {
        let back = round_trip(&a);
        prop_assert_eq!(back.shape(), a.shape());
        prop_assert_eq!(back, a);
    }

    #[test]
    fn int_arrays_round_trip(a in array_of(nonempty_shape(), any::<i64>())) {
        prop_assert_eq!(round_trip(&a), a);
    }

    #[test]
    fn large_unsigned_arrays_round_trip(
        a in array_of(nonempty_shape(), (1u64 << 63)..=u64::MAX)
    ) {
        prop_assert_eq!(round_trip(&a), a);
    }

    #[test]
    fn bool_arrays_round_trip(a in array_of(nonempty_shape(), any::<bool>())) {
        prop_assert_eq!(round_trip(&a), a);
    }

    #[test]
    fn string_arrays_round_trip(a in array_of(nonempty_shape(), "[a-z ]{0,6}")) {
        prop_assert_eq!(round_trip(&a), a);
    }

    #[test]
    fn plain_json_passes_through(raw in plain_json()) {
        let v = Value::from(raw);
        let back = from_str(&to_string(&v).unwrap()).unwrap();
        prop_assert_eq!(back, v);
    }
}
