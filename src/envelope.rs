//! The tagged envelope: `{"__numpy_array__": true, "data": <nested list>}`.
//!
//! Any object that carries the marker key is read as an envelope. An
//! application object that happens to use the marker key as a field name is
//! indistinguishable from one and will be reinterpreted as an array.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::array::NdArray;
use crate::codec::ArrayCodec;
use crate::error::CodecResult;
use crate::value::Value;

/// Reserved field name identifying an envelope.
pub const MARKER_KEY: &str = "__numpy_array__";

/// Field holding the nested list form.
pub const DATA_KEY: &str = "data";

/// Assemble an envelope object. The marker comes first.
pub fn build_envelope(
    marker_key: &str,
    data_key: &str,
    nested: serde_json::Value,
) -> serde_json::Value {
    let mut map = serde_json::Map::with_capacity(2);
    map.insert(marker_key.to_string(), serde_json::Value::Bool(true));
    map.insert(data_key.to_string(), nested);
    serde_json::Value::Object(map)
}

/// Whether a raw JSON value is an envelope under the default marker key.
pub fn is_envelope(value: &serde_json::Value) -> bool {
    value
        .as_object()
        .is_some_and(|o| o.contains_key(MARKER_KEY))
}

/// Encode with the default marker, as used by the serde impls below.
fn default_envelope(array: &NdArray) -> CodecResult<serde_json::Value> {
    ArrayCodec::default().encode_array(array)
}

// Serde: an NdArray field inside any serializable struct is written as an
// envelope and read back from one.
impl Serialize for NdArray {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        default_envelope(self)
            .map_err(serde::ser::Error::custom)?
            .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for NdArray {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = serde_json::Value::deserialize(deserializer)?;
        if !is_envelope(&raw) {
            return Err(serde::de::Error::custom(format!(
                "expected an object with `{MARKER_KEY}`"
            )));
        }
        match ArrayCodec::default()
            .from_json_value(raw)
            .map_err(serde::de::Error::custom)?
        {
            Value::Array(a) => Ok(a),
            _ => Err(serde::de::Error::custom("envelope did not decode to an array")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Weights {
        name: String,
        values: NdArray,
    }

    #[test]
    fn envelope_has_marker_then_data() {
        let env = build_envelope(MARKER_KEY, DATA_KEY, json!([1, 2]));
        let keys: Vec<_> = env.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec![MARKER_KEY, DATA_KEY]);
        assert!(is_envelope(&env));
        assert!(!is_envelope(&json!({"data": [1]})));
    }

    #[test]
    fn derived_struct_round_trips() {
        let w = Weights {
            name: "layer0".into(),
            values: NdArray::from_shape_vec(vec![2, 2], vec![1.0f64, 2.0, 3.0, 4.0]).unwrap(),
        };
        let text = serde_json::to_string(&w).unwrap();
        assert_eq!(
            text,
            r#"{"name":"layer0","values":{"__numpy_array__":true,"data":[[1.0,2.0],[3.0,4.0]]}}"#
        );
        let back: Weights = serde_json::from_str(&text).unwrap();
        assert_eq!(back, w);
    }

    #[test]
    fn plain_list_is_not_an_ndarray() {
        let err = serde_json::from_str::<NdArray>("[1, 2]").unwrap_err();
        assert!(err.to_string().contains(MARKER_KEY));
    }
}
