use std::io::{Read, Write};

use serde::{Deserialize, Serialize};

use crate::array::NdArray;
use crate::envelope::{DATA_KEY, MARKER_KEY, build_envelope};
use crate::error::{CodecError, CodecResult};
use crate::infer::infer_array;
use crate::value::{Object, Value};

// ---------------------------------------------------------------------------
// CodecOptions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecOptions {
    /// Field name that marks an object as an envelope.
    pub marker_key: String,
    /// Field name holding the nested list form.
    pub data_key: String,
    /// Write non-finite floats as `null` and read `null` numeric elements
    /// back as NaN.
    pub allow_nan: bool,
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            marker_key: MARKER_KEY.to_string(),
            data_key: DATA_KEY.to_string(),
            allow_nan: false,
        }
    }
}

// ---------------------------------------------------------------------------
// ArrayCodec
// ---------------------------------------------------------------------------

/// Converts between [`Value`] trees and JSON, writing arrays as tagged
/// envelopes and rebuilding them on read.
#[derive(Debug, Clone, Default)]
pub struct ArrayCodec {
    options: CodecOptions,
}

impl ArrayCodec {
    pub fn new(options: CodecOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CodecOptions {
        &self.options
    }

    /// Encode a value. Arrays anywhere in the tree become envelopes; every
    /// other variant takes the plain JSON path.
    pub fn encode_hook(&self, value: &Value) -> CodecResult<serde_json::Value> {
        match value {
            Value::Array(a) => self.encode_array(a),
            Value::Null => Ok(serde_json::Value::Null),
            Value::Bool(b) => Ok(serde_json::Value::Bool(*b)),
            Value::Number(n) => Ok(serde_json::Value::Number(n.clone())),
            Value::String(s) => Ok(serde_json::Value::String(s.clone())),
            Value::List(items) => items
                .iter()
                .map(|item| self.encode_hook(item))
                .collect::<CodecResult<Vec<_>>>()
                .map(serde_json::Value::Array),
            Value::Object(o) => {
                let mut map = serde_json::Map::with_capacity(o.len());
                for (k, v) in o {
                    map.insert(k.clone(), self.encode_hook(v)?);
                }
                Ok(serde_json::Value::Object(map))
            }
        }
    }

    /// Build the envelope for a single array.
    pub fn encode_array(&self, array: &NdArray) -> CodecResult<serde_json::Value> {
        let nested = array.to_nested(self.options.allow_nan)?;
        tracing::trace!(shape = ?array.shape(), dtype = %array.dtype(), "encoded array envelope");
        Ok(build_envelope(
            &self.options.marker_key,
            &self.options.data_key,
            nested,
        ))
    }

    /// Decode one object whose children are already decoded. Objects without
    /// the marker key come back unchanged.
    pub fn decode_hook(&self, object: Object) -> CodecResult<Value> {
        if !object.contains_key(&self.options.marker_key) {
            return Ok(Value::Object(object));
        }
        let Some(data) = object.get(&self.options.data_key) else {
            tracing::debug!(data_key = %self.options.data_key, "envelope without data field");
            return Err(CodecError::MalformedEnvelope(format!(
                "missing `{}` field",
                self.options.data_key
            )));
        };
        let array = infer_array(data, self.options.allow_nan).inspect_err(|e| {
            tracing::debug!(error = %e, "rejected array envelope");
        })?;
        tracing::debug!(shape = ?array.shape(), dtype = %array.dtype(), "decoded array envelope");
        Ok(Value::Array(array))
    }

    /// Walk a parsed JSON tree, applying [`ArrayCodec::decode_hook`] to every
    /// object, innermost first.
    pub fn from_json_value(&self, raw: serde_json::Value) -> CodecResult<Value> {
        match raw {
            serde_json::Value::Array(items) => items
                .into_iter()
                .map(|item| self.from_json_value(item))
                .collect::<CodecResult<Vec<_>>>()
                .map(Value::List),
            serde_json::Value::Object(map) => {
                let mut object = Object::with_capacity(map.len());
                for (k, v) in map {
                    object.insert(k, self.from_json_value(v)?);
                }
                self.decode_hook(object)
            }
            scalar => Ok(Value::from(scalar)),
        }
    }

    pub fn to_json_value(&self, value: &Value) -> CodecResult<serde_json::Value> {
        self.encode_hook(value)
    }

    pub fn to_string(&self, value: &Value) -> CodecResult<String> {
        Ok(serde_json::to_string(&self.encode_hook(value)?)?)
    }

    pub fn to_string_pretty(&self, value: &Value) -> CodecResult<String> {
        Ok(serde_json::to_string_pretty(&self.encode_hook(value)?)?)
    }

    pub fn to_vec(&self, value: &Value) -> CodecResult<Vec<u8>> {
        Ok(serde_json::to_vec(&self.encode_hook(value)?)?)
    }

    pub fn to_writer<W: Write>(&self, writer: W, value: &Value) -> CodecResult<()> {
        serde_json::to_writer(writer, &self.encode_hook(value)?)?;
        Ok(())
    }

    pub fn from_str(&self, s: &str) -> CodecResult<Value> {
        self.from_json_value(serde_json::from_str(s)?)
    }

    pub fn from_slice(&self, bytes: &[u8]) -> CodecResult<Value> {
        self.from_json_value(serde_json::from_slice(bytes)?)
    }

    pub fn from_reader<R: Read>(&self, reader: R) -> CodecResult<Value> {
        self.from_json_value(serde_json::from_reader(reader)?)
    }
}

// ---------------------------------------------------------------------------
// Default-option shortcuts
// ---------------------------------------------------------------------------

pub fn encode_hook(value: &Value) -> CodecResult<serde_json::Value> {
    ArrayCodec::default().encode_hook(value)
}

pub fn decode_hook(object: Object) -> CodecResult<Value> {
    ArrayCodec::default().decode_hook(object)
}

pub fn to_string(value: &Value) -> CodecResult<String> {
    ArrayCodec::default().to_string(value)
}

pub fn from_str(s: &str) -> CodecResult<Value> {
    ArrayCodec::default().from_str(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DataType, Scalar};
    use serde_json::json;

    #[test]
    fn options_fill_missing_fields_from_defaults() {
        let opts: CodecOptions = serde_json::from_value(json!({"allow_nan": true})).unwrap();
        assert_eq!(opts.marker_key, MARKER_KEY);
        assert_eq!(opts.data_key, DATA_KEY);
        assert!(opts.allow_nan);
    }

    #[test]
    fn custom_keys_are_used_both_ways() {
        let codec = ArrayCodec::new(CodecOptions {
            marker_key: "__ndarray__".into(),
            data_key: "values".into(),
            allow_nan: false,
        });
        let v = Value::from(NdArray::from_vec(vec![1i64, 2]));
        let encoded = codec.encode_hook(&v).unwrap();
        assert_eq!(encoded, json!({"__ndarray__": true, "values": [1, 2]}));
        assert_eq!(codec.from_json_value(encoded).unwrap(), v);

        // The default marker means nothing to this codec.
        let plain = codec
            .from_json_value(json!({"__numpy_array__": true, "data": [1]}))
            .unwrap();
        assert!(!plain.is_array());
    }

    #[test]
    fn allow_nan_round_trips_non_finite() {
        let codec = ArrayCodec::new(CodecOptions {
            allow_nan: true,
            ..Default::default()
        });
        let v = Value::from(NdArray::from_vec(vec![1.0f64, f64::NAN]));
        let text = codec.to_string(&v).unwrap();
        assert_eq!(text, r#"{"__numpy_array__":true,"data":[1.0,null]}"#);
        let back = codec.from_str(&text).unwrap().into_array().unwrap();
        let data = back.to_f64_vec().unwrap();
        assert_eq!(data[0], 1.0);
        assert!(data[1].is_nan());

        assert!(matches!(
            ArrayCodec::default().to_string(&v),
            Err(CodecError::UnsupportedType(_))
        ));
    }

    #[test]
    fn marker_presence_alone_triggers_decoding() {
        let v = from_str(r#"{"__numpy_array__": false, "data": [1, 2]}"#).unwrap();
        assert_eq!(v, Value::from(NdArray::from_vec(vec![1i64, 2])));
    }

    #[test]
    fn zero_dimensional_arrays_encode_as_bare_scalar() {
        let v = Value::from(NdArray::scalar(Scalar::Float64(2.5)));
        assert_eq!(
            encode_hook(&v).unwrap(),
            json!({"__numpy_array__": true, "data": 2.5})
        );
        let back = from_str(&to_string(&v).unwrap()).unwrap().into_array().unwrap();
        assert_eq!(back.ndim(), 0);
        assert_eq!(back.dtype(), DataType::Float64);
    }

    #[test]
    fn reader_and_writer_paths() {
        let v = Value::from(NdArray::from_vec(vec![true, false]));
        let mut buf = Vec::new();
        ArrayCodec::default().to_writer(&mut buf, &v).unwrap();
        assert_eq!(buf, ArrayCodec::default().to_vec(&v).unwrap());
        let back = ArrayCodec::default().from_reader(buf.as_slice()).unwrap();
        assert_eq!(back, v);
    }

    #[test]
    fn invalid_json_surfaces_as_json_error() {
        assert!(matches!(from_str("{not json"), Err(CodecError::Json(_))));
    }
}
