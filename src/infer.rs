//! Shape and element-type inference for the nested list form.
//!
//! Shape comes from nesting depth; every list at a given depth must have the
//! same length. Element type is the narrowest of `bool`, `int64`, `uint64`,
//! `float64` that holds every leaf, or `str` when every leaf is a string.
//! An empty list is `float64`.

use crate::array::{NdArray, element_count};
use crate::error::{CodecError, CodecResult};
use crate::types::ArrayData;
use crate::value::Value;

/// Classified leaf of the nested list form.
#[derive(Debug, Clone, Copy)]
enum Leaf<'a> {
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Str(&'a str),
    Null,
}

/// Build an array from the `data` field of an envelope.
pub fn infer_array(data: &Value, allow_nan: bool) -> CodecResult<NdArray> {
    let shape = probe_shape(data);
    // The probed shape is only a guess until every list has been checked.
    element_count(&shape).map_err(|e| CodecError::MalformedEnvelope(e.to_string()))?;
    let mut leaves = Vec::new();
    collect_leaves(data, 0, &shape, &mut leaves)?;
    let buffer = infer_data(&leaves, allow_nan)?;
    NdArray::from_shape_vec(shape, buffer)
        .map_err(|e| CodecError::MalformedEnvelope(e.to_string()))
}

/// Follow the first element of each list down to a leaf.
fn probe_shape(data: &Value) -> Vec<usize> {
    let mut shape = Vec::new();
    let mut cur = data;
    while let Value::List(items) = cur {
        shape.push(items.len());
        match items.first() {
            Some(first) => cur = first,
            None => break,
        }
    }
    shape
}

fn collect_leaves<'a>(
    value: &'a Value,
    depth: usize,
    shape: &[usize],
    out: &mut Vec<Leaf<'a>>,
) -> CodecResult<()> {
    if depth == shape.len() {
        out.push(classify(value)?);
        return Ok(());
    }
    match value {
        Value::List(items) if items.len() == shape[depth] => {
            for item in items {
                collect_leaves(item, depth + 1, shape, out)?;
            }
            Ok(())
        }
        Value::List(items) => Err(CodecError::MalformedEnvelope(format!(
            "ragged data: expected {} elements at depth {depth}, got {}",
            shape[depth],
            items.len()
        ))),
        _ => Err(CodecError::MalformedEnvelope(format!(
            "ragged data: expected a list at depth {depth}, got a scalar"
        ))),
    }
}

fn classify(value: &Value) -> CodecResult<Leaf<'_>> {
    match value {
        Value::Bool(b) => Ok(Leaf::Bool(*b)),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Leaf::Int(i))
            } else if let Some(u) = n.as_u64() {
                Ok(Leaf::UInt(u))
            } else {
                n.as_f64().map(Leaf::Float).ok_or_else(|| {
                    CodecError::MalformedEnvelope(format!("unrepresentable number {n}"))
                })
            }
        }
        Value::String(s) => Ok(Leaf::Str(s)),
        Value::Null => Ok(Leaf::Null),
        Value::List(_) => Err(CodecError::MalformedEnvelope(
            "ragged data: list found below the inferred depth".into(),
        )),
        Value::Object(_) => Err(CodecError::MalformedEnvelope(
            "objects cannot be array elements".into(),
        )),
        Value::Array(_) => Err(CodecError::MalformedEnvelope(
            "nested envelopes cannot be array elements".into(),
        )),
    }
}

fn infer_data(leaves: &[Leaf<'_>], allow_nan: bool) -> CodecResult<ArrayData> {
    if leaves.is_empty() {
        return Ok(ArrayData::VFloat64(Vec::new()));
    }

    let mut strings = 0usize;
    let mut has_null = false;
    let mut has_float = false;
    let mut has_int = false;
    let mut has_negative = false;
    let mut has_big = false;
    for leaf in leaves {
        match leaf {
            Leaf::Bool(_) => {}
            Leaf::Int(i) => {
                has_int = true;
                has_negative |= *i < 0;
            }
            Leaf::UInt(_) => {
                has_int = true;
                has_big = true;
            }
            Leaf::Float(_) => has_float = true,
            Leaf::Str(_) => strings += 1,
            Leaf::Null => has_null = true,
        }
    }

    if strings > 0 {
        if strings != leaves.len() {
            return Err(CodecError::MalformedEnvelope(
                "strings mixed with non-string elements".into(),
            ));
        }
        let v = leaves
            .iter()
            .filter_map(|l| match l {
                Leaf::Str(s) => Some(s.to_string()),
                _ => None,
            })
            .collect();
        return Ok(ArrayData::VString(v));
    }

    if has_null && !allow_nan {
        return Err(CodecError::MalformedEnvelope(
            "null elements are not allowed".into(),
        ));
    }

    if has_float || has_null || (has_big && has_negative) {
        return Ok(ArrayData::VFloat64(
            leaves.iter().map(leaf_to_f64).collect(),
        ));
    }

    if has_big {
        return Ok(ArrayData::VUInt64(
            leaves
                .iter()
                .map(|l| match l {
                    Leaf::Bool(b) => u64::from(*b),
                    Leaf::Int(i) => *i as u64,
                    Leaf::UInt(u) => *u,
                    _ => 0,
                })
                .collect(),
        ));
    }

    if has_int {
        return Ok(ArrayData::VInt64(
            leaves
                .iter()
                .map(|l| match l {
                    Leaf::Bool(b) => i64::from(*b),
                    Leaf::Int(i) => *i,
                    _ => 0,
                })
                .collect(),
        ));
    }

    Ok(ArrayData::VBool(
        leaves
            .iter()
            .map(|l| matches!(l, Leaf::Bool(true)))
            .collect(),
    ))
}

fn leaf_to_f64(leaf: &Leaf<'_>) -> f64 {
    match leaf {
        Leaf::Bool(true) => 1.0,
        Leaf::Bool(false) => 0.0,
        Leaf::Int(i) => *i as f64,
        Leaf::UInt(u) => *u as f64,
        Leaf::Float(f) => *f,
        Leaf::Null | Leaf::Str(_) => f64::NAN,
    }
}
