use core::ffi::c_char;
use core::marker::{PhantomData, PhantomPinned};

/// Bump this when you break the ABI. Host checks it at load time.
pub const ORTINFO_ABI_VERSION: u32 = 1;

pub const ENGINE_ENTRY_SYMBOL: &str = "ortinfo_engine_entry_v1";

pub const ERR_OK: i32 = 0;
pub const ERR_FAIL: i32 = 1;

// ---------- Opaque engine resources ----------

/// Engine-owned model. Only ever seen behind a pointer.
#[repr(C)]
pub struct OrtModel {
    _data: [u8; 0],
    _marker: PhantomData<(*mut u8, PhantomPinned)>,
}

/// Engine-owned type description of one feature (or a nested element of one).
#[repr(C)]
pub struct OrtTypeInfo {
    _data: [u8; 0],
    _marker: PhantomData<(*mut u8, PhantomPinned)>,
}

#[repr(C)]
pub struct EngineInfo {
    pub abi_version: u32,
    pub id: *const c_char,     // "onnxruntime"
    pub semver: *const c_char, // "1.17.0"
}

// ---------- Function pointer types (C ABI) ----------
//
// Every fallible call returns ERR_OK on success. String outputs are (ptr, len)
// pairs into engine-owned buffers that stay valid only until the next engine call.

pub type CountFn = unsafe extern "C" fn(model: *const OrtModel, out: *mut usize) -> i32;

pub type StringAtFn = unsafe extern "C" fn(
    model: *const OrtModel,
    index: usize,
    out: *mut *const c_char,
    out_len: *mut usize,
) -> i32;

/// Caller owns the returned type-info and frees it with `TypeInfoApi::release_type_info`.
pub type TypeInfoAtFn =
    unsafe extern "C" fn(model: *const OrtModel, index: usize, out: *mut *mut OrtTypeInfo) -> i32;

pub type MetadataAtFn = unsafe extern "C" fn(
    model: *const OrtModel,
    index: usize,
    key: *mut *const c_char,
    key_len: *mut usize,
    value: *mut *const c_char,
    value_len: *mut usize,
) -> i32;

pub type ModelStringFn =
    unsafe extern "C" fn(model: *const OrtModel, out: *mut *const c_char, out_len: *mut usize) -> i32;

pub type ModelVersionFn = unsafe extern "C" fn(model: *const OrtModel, out: *mut i64) -> i32;

/// Deep copy at the engine level. Caller owns `out`.
pub type CloneModelFn =
    unsafe extern "C" fn(model: *const OrtModel, out: *mut *mut OrtModel) -> i32;

pub type ReleaseModelFn = unsafe extern "C" fn(model: *mut OrtModel);

pub type EnsureNoFloat16Fn = unsafe extern "C" fn(model: *mut OrtModel) -> i32;

pub type TypeKindFn = unsafe extern "C" fn(info: *const OrtTypeInfo, out: *mut i32) -> i32;

/// Empty output (len 0) means "no denotation".
pub type TypeDenotationFn = unsafe extern "C" fn(
    info: *const OrtTypeInfo,
    out: *mut *const c_char,
    out_len: *mut usize,
) -> i32;

pub type ElementTypeFn = unsafe extern "C" fn(info: *const OrtTypeInfo, out: *mut i32) -> i32;

pub type DimCountFn = unsafe extern "C" fn(info: *const OrtTypeInfo, out: *mut usize) -> i32;

/// Fills `len` dimension values; `DIM_DYNAMIC` marks a dynamic axis.
pub type DimsFn = unsafe extern "C" fn(info: *const OrtTypeInfo, out: *mut i64, len: usize) -> i32;

/// Fills `len` NUL-terminated names; an empty name means the axis has no symbol.
pub type SymbolicDimsFn =
    unsafe extern "C" fn(info: *const OrtTypeInfo, out: *mut *const c_char, len: usize) -> i32;

/// Caller owns the returned nested type-info.
pub type NestedTypeInfoFn =
    unsafe extern "C" fn(info: *const OrtTypeInfo, out: *mut *mut OrtTypeInfo) -> i32;

pub type ReleaseTypeInfoFn = unsafe extern "C" fn(info: *mut OrtTypeInfo);

// ---------- VTables ----------

#[repr(C)]
pub struct ModelApi {
    pub input_count: CountFn,
    pub input_name: StringAtFn,
    pub input_description: StringAtFn,
    pub input_type_info: TypeInfoAtFn,

    pub output_count: CountFn,
    pub output_name: StringAtFn,
    pub output_description: StringAtFn,
    pub output_type_info: TypeInfoAtFn,

    pub metadata_count: CountFn,
    pub metadata_at: MetadataAtFn,

    pub author: ModelStringFn,
    pub name: ModelStringFn,
    pub domain: ModelStringFn,
    pub description: ModelStringFn,
    pub version: ModelVersionFn,

    // Lifecycle
    pub clone_model: CloneModelFn,
    pub release_model: ReleaseModelFn,
    pub ensure_no_float16: EnsureNoFloat16Fn,
}

#[repr(C)]
pub struct TypeInfoApi {
    pub kind: TypeKindFn,
    pub denotation: TypeDenotationFn,

    // Tensor
    pub tensor_element_type: ElementTypeFn,
    pub tensor_dim_count: DimCountFn,
    pub tensor_dims: DimsFn,
    pub tensor_symbolic_dims: SymbolicDimsFn,

    // Map / sequence
    pub map_key_type: ElementTypeFn,
    pub map_value_type: NestedTypeInfoFn,
    pub sequence_element_type: NestedTypeInfoFn,

    pub release_type_info: ReleaseTypeInfoFn,
}

#[repr(C)]
pub struct EngineApi {
    pub info: EngineInfo,
    pub model: ModelApi,
    pub type_info: TypeInfoApi,
}

// SAFETY: the table is immutable once published and `info` points at static,
// NUL-terminated strings owned by the adapter for the process lifetime.
unsafe impl Sync for EngineApi {}
unsafe impl Send for EngineApi {}

/// Adapter must export `ortinfo_engine_entry_v1` returning a pointer to a static `EngineApi`.
pub type EngineEntryFn = unsafe extern "C" fn() -> *const EngineApi;
