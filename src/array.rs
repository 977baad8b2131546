use crate::error::{CodecError, CodecResult};
use crate::types::{ArrayData, DataType, Scalar, default_scalar, fill_data};

// ---------------------------------------------------------------------------
// NdArray
// ---------------------------------------------------------------------------

/// A rectangular n-dimensional array stored as a flat row-major buffer.
///
/// `shape` may be empty, in which case the array is 0-dimensional and holds
/// exactly one element.
#[derive(Debug, Clone, PartialEq)]
pub struct NdArray {
    shape: Vec<usize>,
    data: ArrayData,
}

impl NdArray {
    /// Build an array from a shape and a row-major buffer.
    pub fn from_shape_vec(shape: Vec<usize>, data: impl Into<ArrayData>) -> CodecResult<Self> {
        let data = data.into();
        let expected = element_count(&shape)?;
        if expected != data.len() {
            return Err(CodecError::Shape(format!(
                "shape {shape:?} needs {expected} elements, got {}",
                data.len()
            )));
        }
        Ok(Self { shape, data })
    }

    /// Build a 1-dimensional array.
    pub fn from_vec(data: impl Into<ArrayData>) -> Self {
        let data = data.into();
        Self {
            shape: vec![data.len()],
            data,
        }
    }

    /// Build a 0-dimensional array holding a single value.
    pub fn scalar(value: Scalar) -> Self {
        Self {
            shape: Vec::new(),
            data: fill_data(&value, 1),
        }
    }

    /// Array of the given shape filled with zero/false/empty values.
    pub fn zeros(dtype: DataType, shape: Vec<usize>) -> CodecResult<Self> {
        let total = element_count(&shape)?;
        Ok(Self {
            data: fill_data(&default_scalar(dtype), total),
            shape,
        })
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Total number of elements.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn dtype(&self) -> DataType {
        self.data.data_type()
    }

    pub fn data(&self) -> &ArrayData {
        &self.data
    }

    pub fn into_data(self) -> ArrayData {
        self.data
    }

    /// Element at the given multi-dimensional index, or `None` when out of
    /// bounds or of the wrong dimensionality.
    pub fn get(&self, indices: &[usize]) -> Option<Scalar> {
        if indices.len() != self.shape.len()
            || indices.iter().zip(self.shape.iter()).any(|(i, s)| i >= s)
        {
            return None;
        }
        self.data.get(linear_index(&self.shape, indices))
    }

    pub fn to_f64_vec(&self) -> CodecResult<Vec<f64>> {
        self.data.to_f64_vec()
    }

    /// Reinterpret the buffer under a new shape with the same element count.
    pub fn reshape(self, shape: Vec<usize>) -> CodecResult<Self> {
        Self::from_shape_vec(shape, self.data)
    }

    /// Nested list form: one JSON array per dimension, scalars at the leaves.
    ///
    /// A zero-length axis yields an empty list, so the extents of any axes
    /// after it are not representable.
    pub fn to_nested(&self, allow_nan: bool) -> CodecResult<serde_json::Value> {
        let s = strides(&self.shape);
        self.nest(0, 0, &s, allow_nan)
    }

    fn nest(
        &self,
        axis: usize,
        offset: usize,
        strides: &[usize],
        allow_nan: bool,
    ) -> CodecResult<serde_json::Value> {
        if axis == self.shape.len() {
            let scalar = self.data.get(offset).ok_or_else(|| {
                CodecError::Shape(format!("offset {offset} outside buffer of {}", self.len()))
            })?;
            return scalar.to_json(allow_nan);
        }
        let mut items = Vec::with_capacity(self.shape[axis]);
        for i in 0..self.shape[axis] {
            items.push(self.nest(axis + 1, offset + i * strides[axis], strides, allow_nan)?);
        }
        Ok(serde_json::Value::Array(items))
    }
}

impl<T> From<Vec<T>> for NdArray
where
    Vec<T>: Into<ArrayData>,
{
    fn from(v: Vec<T>) -> Self {
        NdArray::from_vec(v)
    }
}

// ---------------------------------------------------------------------------
// Index math
// ---------------------------------------------------------------------------

/// Product of the extents, or a shape error when it does not fit in `usize`.
pub fn element_count(shape: &[usize]) -> CodecResult<usize> {
    shape
        .iter()
        .try_fold(1usize, |acc, &dim| acc.checked_mul(dim))
        .ok_or_else(|| CodecError::Shape(format!("shape {shape:?} overflows usize")))
}

/// Row-major strides: last dimension varies fastest. Strides past a
/// zero-length axis are never used for indexing, so they saturate.
pub fn strides(shape: &[usize]) -> Vec<usize> {
    let mut s: Vec<usize> = shape
        .iter()
        .rev()
        .scan(1usize, |state, &dim| {
            let stride = *state;
            *state = state.saturating_mul(dim);
            Some(stride)
        })
        .collect();
    s.reverse();
    s
}

/// Convert multi-dimensional indices to a flat linear index.
pub fn linear_index(shape: &[usize], indices: &[usize]) -> usize {
    let s = strides(shape);
    indices.iter().zip(s.iter()).map(|(i, s)| i * s).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn strides_are_row_major() {
        assert_eq!(strides(&[2, 3, 4]), vec![12, 4, 1]);
        assert_eq!(strides(&[]), Vec::<usize>::new());
    }

    #[test]
    fn linear_index_matches_strides() {
        assert_eq!(linear_index(&[2, 3], &[1, 2]), 5);
        assert_eq!(linear_index(&[], &[]), 0);
    }

    #[test]
    fn overflowing_shapes_are_rejected() {
        let err = NdArray::from_shape_vec(vec![1usize << 63, 2], Vec::<f64>::new()).unwrap_err();
        assert!(matches!(err, CodecError::Shape(_)), "{err}");
        assert!(NdArray::zeros(DataType::Bool, vec![usize::MAX, 2]).is_err());
        assert_eq!(element_count(&[]).unwrap(), 1);
        assert_eq!(element_count(&[3, 0, 4]).unwrap(), 0);
    }

    #[test]
    fn from_shape_vec_rejects_wrong_count() {
        let err = NdArray::from_shape_vec(vec![2, 2], vec![1.0f64, 2.0, 3.0]).unwrap_err();
        assert!(matches!(err, CodecError::Shape(_)));
    }

    #[test]
    fn get_uses_row_major_layout() {
        let a = NdArray::from_shape_vec(vec![2, 3], vec![0i64, 1, 2, 3, 4, 5]).unwrap();
        assert_eq!(a.get(&[1, 0]), Some(Scalar::Int64(3)));
        assert_eq!(a.get(&[0, 2]), Some(Scalar::Int64(2)));
        assert_eq!(a.get(&[2, 0]), None);
        assert_eq!(a.get(&[0]), None);
    }

    #[test]
    fn nested_form_of_matrix() {
        let a = NdArray::from_shape_vec(vec![2, 2], vec![1.0f64, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(a.to_nested(false).unwrap(), json!([[1.0, 2.0], [3.0, 4.0]]));
    }

    #[test]
    fn nested_form_of_scalar_and_empty() {
        assert_eq!(
            NdArray::scalar(Scalar::Int32(7)).to_nested(false).unwrap(),
            json!(7)
        );
        assert_eq!(
            NdArray::zeros(DataType::Float64, vec![2, 0])
                .unwrap()
                .to_nested(false)
                .unwrap(),
            json!([[], []])
        );
        assert_eq!(
            NdArray::zeros(DataType::Complex64, vec![0])
                .unwrap()
                .to_nested(false)
                .unwrap(),
            json!([])
        );
    }

    #[test]
    fn reshape_keeps_buffer() {
        let a = NdArray::from_vec(vec![1u8, 2, 3, 4, 5, 6]);
        let b = a.reshape(vec![3, 2]).unwrap();
        assert_eq!(b.shape(), &[3, 2]);
        assert_eq!(b.get(&[2, 1]), Some(Scalar::UInt8(6)));
    }
}
