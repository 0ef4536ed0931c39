//! Raw enum codes crossing the ABI. Numbering follows ONNX.

// ---------- Type kinds (ONNXType) ----------

pub const TYPE_KIND_UNKNOWN: i32 = 0;
pub const TYPE_KIND_TENSOR: i32 = 1;
pub const TYPE_KIND_SEQUENCE: i32 = 2;
pub const TYPE_KIND_MAP: i32 = 3;
pub const TYPE_KIND_OPAQUE: i32 = 4;
pub const TYPE_KIND_SPARSE_TENSOR: i32 = 5;
pub const TYPE_KIND_OPTIONAL: i32 = 6;

// ---------- Tensor element types (TensorProto.DataType) ----------

pub const ELEMENT_UNDEFINED: i32 = 0;
pub const ELEMENT_FLOAT: i32 = 1;
pub const ELEMENT_UINT8: i32 = 2;
pub const ELEMENT_INT8: i32 = 3;
pub const ELEMENT_UINT16: i32 = 4;
pub const ELEMENT_INT16: i32 = 5;
pub const ELEMENT_INT32: i32 = 6;
pub const ELEMENT_INT64: i32 = 7;
pub const ELEMENT_STRING: i32 = 8;
pub const ELEMENT_BOOL: i32 = 9;
pub const ELEMENT_FLOAT16: i32 = 10;
pub const ELEMENT_DOUBLE: i32 = 11;
pub const ELEMENT_UINT32: i32 = 12;
pub const ELEMENT_UINT64: i32 = 13;
pub const ELEMENT_COMPLEX64: i32 = 14;
pub const ELEMENT_COMPLEX128: i32 = 15;
pub const ELEMENT_BFLOAT16: i32 = 16;

/// Dimension value the engine reports for a dynamic axis.
pub const DIM_DYNAMIC: i64 = -1;
