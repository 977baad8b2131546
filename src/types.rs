use half::f16;
use num_complex::Complex;

use crate::error::{CodecError, CodecResult};

// ---------------------------------------------------------------------------
// DataType
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float16,
    Float32,
    Float64,
    Complex64,
    Complex128,
    String,
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DataType::Bool => "bool",
            DataType::Int8 => "int8",
            DataType::Int16 => "int16",
            DataType::Int32 => "int32",
            DataType::Int64 => "int64",
            DataType::UInt8 => "uint8",
            DataType::UInt16 => "uint16",
            DataType::UInt32 => "uint32",
            DataType::UInt64 => "uint64",
            DataType::Float16 => "float16",
            DataType::Float32 => "float32",
            DataType::Float64 => "float64",
            DataType::Complex64 => "complex64",
            DataType::Complex128 => "complex128",
            DataType::String => "str",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Scalar
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Bool(bool),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    UInt8(u8),
    UInt16(u16),
    UInt32(u32),
    UInt64(u64),
    Float16(f16),
    Float32(f32),
    Float64(f64),
    Complex64(Complex<f32>),
    Complex128(Complex<f64>),
    String(String),
}

impl Scalar {
    /// Return the [`DataType`] that this value belongs to.
    pub fn data_type(&self) -> DataType {
        match self {
            Scalar::Bool(_) => DataType::Bool,
            Scalar::Int8(_) => DataType::Int8,
            Scalar::Int16(_) => DataType::Int16,
            Scalar::Int32(_) => DataType::Int32,
            Scalar::Int64(_) => DataType::Int64,
            Scalar::UInt8(_) => DataType::UInt8,
            Scalar::UInt16(_) => DataType::UInt16,
            Scalar::UInt32(_) => DataType::UInt32,
            Scalar::UInt64(_) => DataType::UInt64,
            Scalar::Float16(_) => DataType::Float16,
            Scalar::Float32(_) => DataType::Float32,
            Scalar::Float64(_) => DataType::Float64,
            Scalar::Complex64(_) => DataType::Complex64,
            Scalar::Complex128(_) => DataType::Complex128,
            Scalar::String(_) => DataType::String,
        }
    }

    /// Convert to the JSON scalar used in the nested list form.
    ///
    /// Floats of every width widen to `f64`. Non-finite floats become `null`
    /// when `allow_nan` is set and are rejected otherwise. Complex values have
    /// no JSON form.
    pub fn to_json(&self, allow_nan: bool) -> CodecResult<serde_json::Value> {
        use serde_json::Value;
        match self {
            Scalar::Bool(b) => Ok(Value::Bool(*b)),
            Scalar::Int8(v) => Ok(Value::from(*v)),
            Scalar::Int16(v) => Ok(Value::from(*v)),
            Scalar::Int32(v) => Ok(Value::from(*v)),
            Scalar::Int64(v) => Ok(Value::from(*v)),
            Scalar::UInt8(v) => Ok(Value::from(*v)),
            Scalar::UInt16(v) => Ok(Value::from(*v)),
            Scalar::UInt32(v) => Ok(Value::from(*v)),
            Scalar::UInt64(v) => Ok(Value::from(*v)),
            Scalar::Float16(v) => float_to_json(v.to_f64(), allow_nan),
            Scalar::Float32(v) => float_to_json(*v as f64, allow_nan),
            Scalar::Float64(v) => float_to_json(*v, allow_nan),
            Scalar::Complex64(_) | Scalar::Complex128(_) => Err(CodecError::UnsupportedType(
                format!("{} is not JSON serializable", self.data_type()),
            )),
            Scalar::String(s) => Ok(Value::String(s.clone())),
        }
    }
}

fn float_to_json(v: f64, allow_nan: bool) -> CodecResult<serde_json::Value> {
    match serde_json::Number::from_f64(v) {
        Some(n) => Ok(serde_json::Value::Number(n)),
        None if allow_nan => Ok(serde_json::Value::Null),
        None => Err(CodecError::UnsupportedType(format!(
            "out of range float value {v} is not JSON compliant"
        ))),
    }
}

/// Default zero/false/empty scalar for a data type.
pub fn default_scalar(dtype: DataType) -> Scalar {
    match dtype {
        DataType::Bool => Scalar::Bool(false),
        DataType::Int8 => Scalar::Int8(0),
        DataType::Int16 => Scalar::Int16(0),
        DataType::Int32 => Scalar::Int32(0),
        DataType::Int64 => Scalar::Int64(0),
        DataType::UInt8 => Scalar::UInt8(0),
        DataType::UInt16 => Scalar::UInt16(0),
        DataType::UInt32 => Scalar::UInt32(0),
        DataType::UInt64 => Scalar::UInt64(0),
        DataType::Float16 => Scalar::Float16(f16::ZERO),
        DataType::Float32 => Scalar::Float32(0.0),
        DataType::Float64 => Scalar::Float64(0.0),
        DataType::Complex64 => Scalar::Complex64(Complex::new(0.0f32, 0.0)),
        DataType::Complex128 => Scalar::Complex128(Complex::new(0.0f64, 0.0)),
        DataType::String => Scalar::String(std::string::String::new()),
    }
}

// ---------------------------------------------------------------------------
// ArrayData  (typed flat buffer)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum ArrayData {
    VBool(Vec<bool>),
    VInt8(Vec<i8>),
    VInt16(Vec<i16>),
    VInt32(Vec<i32>),
    VInt64(Vec<i64>),
    VUInt8(Vec<u8>),
    VUInt16(Vec<u16>),
    VUInt32(Vec<u32>),
    VUInt64(Vec<u64>),
    VFloat16(Vec<f16>),
    VFloat32(Vec<f32>),
    VFloat64(Vec<f64>),
    VComplex64(Vec<Complex<f32>>),
    VComplex128(Vec<Complex<f64>>),
    VString(Vec<String>),
}

impl ArrayData {
    /// Number of elements in the buffer.
    pub fn len(&self) -> usize {
        match self {
            ArrayData::VBool(v) => v.len(),
            ArrayData::VInt8(v) => v.len(),
            ArrayData::VInt16(v) => v.len(),
            ArrayData::VInt32(v) => v.len(),
            ArrayData::VInt64(v) => v.len(),
            ArrayData::VUInt8(v) => v.len(),
            ArrayData::VUInt16(v) => v.len(),
            ArrayData::VUInt32(v) => v.len(),
            ArrayData::VUInt64(v) => v.len(),
            ArrayData::VFloat16(v) => v.len(),
            ArrayData::VFloat32(v) => v.len(),
            ArrayData::VFloat64(v) => v.len(),
            ArrayData::VComplex64(v) => v.len(),
            ArrayData::VComplex128(v) => v.len(),
            ArrayData::VString(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn data_type(&self) -> DataType {
        match self {
            ArrayData::VBool(_) => DataType::Bool,
            ArrayData::VInt8(_) => DataType::Int8,
            ArrayData::VInt16(_) => DataType::Int16,
            ArrayData::VInt32(_) => DataType::Int32,
            ArrayData::VInt64(_) => DataType::Int64,
            ArrayData::VUInt8(_) => DataType::UInt8,
            ArrayData::VUInt16(_) => DataType::UInt16,
            ArrayData::VUInt32(_) => DataType::UInt32,
            ArrayData::VUInt64(_) => DataType::UInt64,
            ArrayData::VFloat16(_) => DataType::Float16,
            ArrayData::VFloat32(_) => DataType::Float32,
            ArrayData::VFloat64(_) => DataType::Float64,
            ArrayData::VComplex64(_) => DataType::Complex64,
            ArrayData::VComplex128(_) => DataType::Complex128,
            ArrayData::VString(_) => DataType::String,
        }
    }

    /// Element at flat position `i`, wrapped as a [`Scalar`].
    pub fn get(&self, i: usize) -> Option<Scalar> {
        match self {
            ArrayData::VBool(v) => v.get(i).map(|x| Scalar::Bool(*x)),
            ArrayData::VInt8(v) => v.get(i).map(|x| Scalar::Int8(*x)),
            ArrayData::VInt16(v) => v.get(i).map(|x| Scalar::Int16(*x)),
            ArrayData::VInt32(v) => v.get(i).map(|x| Scalar::Int32(*x)),
            ArrayData::VInt64(v) => v.get(i).map(|x| Scalar::Int64(*x)),
            ArrayData::VUInt8(v) => v.get(i).map(|x| Scalar::UInt8(*x)),
            ArrayData::VUInt16(v) => v.get(i).map(|x| Scalar::UInt16(*x)),
            ArrayData::VUInt32(v) => v.get(i).map(|x| Scalar::UInt32(*x)),
            ArrayData::VUInt64(v) => v.get(i).map(|x| Scalar::UInt64(*x)),
            ArrayData::VFloat16(v) => v.get(i).map(|x| Scalar::Float16(*x)),
            ArrayData::VFloat32(v) => v.get(i).map(|x| Scalar::Float32(*x)),
            ArrayData::VFloat64(v) => v.get(i).map(|x| Scalar::Float64(*x)),
            ArrayData::VComplex64(v) => v.get(i).map(|x| Scalar::Complex64(*x)),
            ArrayData::VComplex128(v) => v.get(i).map(|x| Scalar::Complex128(*x)),
            ArrayData::VString(v) => v.get(i).map(|x| Scalar::String(x.clone())),
        }
    }

    /// Lossily convert the entire buffer to `Vec<f64>`.
    pub fn to_f64_vec(&self) -> CodecResult<Vec<f64>> {
        match self {
            ArrayData::VBool(v) => Ok(v.iter().map(|b| if *b { 1.0 } else { 0.0 }).collect()),
            ArrayData::VInt8(v) => Ok(v.iter().map(|x| *x as f64).collect()),
            ArrayData::VInt16(v) => Ok(v.iter().map(|x| *x as f64).collect()),
            ArrayData::VInt32(v) => Ok(v.iter().map(|x| *x as f64).collect()),
            ArrayData::VInt64(v) => Ok(v.iter().map(|x| *x as f64).collect()),
            ArrayData::VUInt8(v) => Ok(v.iter().map(|x| *x as f64).collect()),
            ArrayData::VUInt16(v) => Ok(v.iter().map(|x| *x as f64).collect()),
            ArrayData::VUInt32(v) => Ok(v.iter().map(|x| *x as f64).collect()),
            ArrayData::VUInt64(v) => Ok(v.iter().map(|x| *x as f64).collect()),
            ArrayData::VFloat16(v) => Ok(v.iter().map(|x| x.to_f64()).collect()),
            ArrayData::VFloat32(v) => Ok(v.iter().map(|x| *x as f64).collect()),
            ArrayData::VFloat64(v) => Ok(v.clone()),
            ArrayData::VComplex64(v) => Ok(v.iter().map(|c| c.re as f64).collect()),
            ArrayData::VComplex128(v) => Ok(v.iter().map(|c| c.re).collect()),
            ArrayData::VString(_) => Err(CodecError::TypeConversion(
                "Cannot convert String to f64".into(),
            )),
        }
    }
}

macro_rules! impl_from_vec {
    ($($t:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<Vec<$t>> for ArrayData {
                fn from(v: Vec<$t>) -> Self {
                    ArrayData::$variant(v)
                }
            }
        )*
    };
}

impl_from_vec! {
    bool => VBool,
    i8 => VInt8,
    i16 => VInt16,
    i32 => VInt32,
    i64 => VInt64,
    u8 => VUInt8,
    u16 => VUInt16,
    u32 => VUInt32,
    u64 => VUInt64,
    f16 => VFloat16,
    f32 => VFloat32,
    f64 => VFloat64,
    Complex<f32> => VComplex64,
    Complex<f64> => VComplex128,
    String => VString,
}

/// Create a buffer of `total` copies of a scalar value.
pub fn fill_data(value: &Scalar, total: usize) -> ArrayData {
    match value {
        Scalar::Bool(b) => ArrayData::VBool(vec![*b; total]),
        Scalar::Int8(v) => ArrayData::VInt8(vec![*v; total]),
        Scalar::Int16(v) => ArrayData::VInt16(vec![*v; total]),
        Scalar::Int32(v) => ArrayData::VInt32(vec![*v; total]),
        Scalar::Int64(v) => ArrayData::VInt64(vec![*v; total]),
        Scalar::UInt8(v) => ArrayData::VUInt8(vec![*v; total]),
        Scalar::UInt16(v) => ArrayData::VUInt16(vec![*v; total]),
        Scalar::UInt32(v) => ArrayData::VUInt32(vec![*v; total]),
        Scalar::UInt64(v) => ArrayData::VUInt64(vec![*v; total]),
        Scalar::Float16(v) => ArrayData::VFloat16(vec![*v; total]),
        Scalar::Float32(v) => ArrayData::VFloat32(vec![*v; total]),
        Scalar::Float64(v) => ArrayData::VFloat64(vec![*v; total]),
        Scalar::Complex64(v) => ArrayData::VComplex64(vec![*v; total]),
        Scalar::Complex128(v) => ArrayData::VComplex128(vec![*v; total]),
        Scalar::String(s) => ArrayData::VString(vec![s.clone(); total]),
    }
}
