//! In-process mock engine implementing the full `EngineApi` table.
//!
//! Models and type-infos are boxed Rust structs cast to the opaque ABI types.
//! Every model built from one `MockSpec` shares a `Counters` block so tests can
//! check release and call accounting, and a `FailPoint` makes one call fail.

#![allow(dead_code)]

use std::ffi::{CString, c_char};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use ortinfo_abi::*;
use ortinfo_core::{Engine, ModelHandle};

// ---------- Mock model description ----------

#[derive(Debug, Clone)]
pub enum MockType {
    Tensor {
        element: i32,
        dims: Vec<i64>,
        symbols: Vec<String>,
        denotation: String,
    },
    Sequence(Box<MockType>),
    Map {
        key: i32,
        value: Box<MockType>,
    },
    /// Any other kind code (opaque, sparse, garbage...).
    Kind(i32),
}

impl MockType {
    pub fn tensor(element: i32, dims: &[i64]) -> Self {
        MockType::Tensor {
            element,
            dims: dims.to_vec(),
            symbols: Vec::new(),
            denotation: String::new(),
        }
    }

    pub fn with_symbols(mut self, names: &[&str]) -> Self {
        if let MockType::Tensor { symbols, .. } = &mut self {
            *symbols = names.iter().map(|s| s.to_string()).collect();
        }
        self
    }

    pub fn with_denotation(mut self, d: &str) -> Self {
        if let MockType::Tensor { denotation, .. } = &mut self {
            *denotation = d.to_string();
        }
        self
    }
}

/// Names and strings are raw bytes so tests can hand out invalid UTF-8.
#[derive(Debug, Clone)]
pub struct MockFeature {
    pub name: Vec<u8>,
    pub description: String,
    pub ty: MockType,
}

pub fn feature(name: &str, ty: MockType) -> MockFeature {
    MockFeature {
        name: name.as_bytes().to_vec(),
        description: format!("{name} feature"),
        ty,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailPoint {
    InputCount,
    InputName(usize),
    InputDescription(usize),
    InputTypeInfo(usize),
    OutputCount,
    OutputName(usize),
    OutputDescription(usize),
    OutputTypeInfo(usize),
    MetadataCount,
    MetadataAt(usize),
    Author,
    Name,
    Domain,
    Description,
    Version,
    Clone,
    EnsureNoFloat16,
    TensorDims,
    TypeKind,
    /// `sequence_element_type` / `map_value_type` report failure.
    NestedTypeInfo,
    /// Nested type-info calls succeed but hand back null.
    NestedReturnsNull,
    /// Successful clone call that hands back null.
    CloneReturnsNull,
    /// Counts and ranks reported as `usize::MAX / 2`.
    HugeRank,
    HugeInputCount,
    HugeMetadataCount,
}

pub const HUGE: usize = usize::MAX / 2;

#[derive(Debug, Clone)]
pub struct MockSpec {
    pub inputs: Vec<MockFeature>,
    pub outputs: Vec<MockFeature>,
    pub metadata: Vec<(Vec<u8>, Vec<u8>)>,
    pub author: String,
    pub name: String,
    pub domain: String,
    pub description: String,
    pub version: i64,
    pub fail: Option<FailPoint>,
}

impl Default for MockSpec {
    fn default() -> Self {
        Self {
            inputs: Vec::new(),
            outputs: Vec::new(),
            metadata: Vec::new(),
            author: "ortinfo tests".into(),
            name: "mock-model".into(),
            domain: "ai.onnx".into(),
            description: "a model served by the mock engine".into(),
            version: 1,
            fail: None,
        }
    }
}

impl MockSpec {
    pub fn fail_at(mut self, point: FailPoint) -> Self {
        self.fail = Some(point);
        self
    }

    pub fn meta(self, key: &str, value: &str) -> Self {
        self.meta_bytes(key.as_bytes(), value.as_bytes())
    }

    pub fn meta_bytes(mut self, key: &[u8], value: &[u8]) -> Self {
        self.metadata.push((key.to_vec(), value.to_vec()));
        self
    }
}

/// The image-classifier model from the reference scenario.
pub fn scenario_spec() -> MockSpec {
    MockSpec {
        inputs: vec![
            feature("x", MockType::tensor(ELEMENT_FLOAT, &[1, 3, 224, 224])),
            feature("mask", MockType::tensor(ELEMENT_BOOL, &[1, 224, 224])),
        ],
        outputs: vec![feature("y", MockType::tensor(ELEMENT_FLOAT, &[1, 1000]))],
        metadata: vec![("x.denotation".into(), "IMAGE".into())],
        version: 42,
        ..Default::default()
    }
}

// ---------- Accounting ----------

#[derive(Debug, Default)]
pub struct Counters {
    pub models_created: AtomicUsize,
    pub models_released: AtomicUsize,
    pub type_infos_created: AtomicUsize,
    pub type_infos_released: AtomicUsize,
    /// Model-level accessor calls (not lifecycle).
    pub model_calls: AtomicUsize,
    pub float16_checks: AtomicUsize,
    /// Second release of an already released object.
    pub double_releases: AtomicUsize,
    /// Accessor calls on an already released object.
    pub late_calls: AtomicUsize,
}

impl Counters {
    pub fn models_live(&self) -> usize {
        self.models_created.load(Ordering::SeqCst) - self.models_released.load(Ordering::SeqCst)
    }

    pub fn type_infos_live(&self) -> usize {
        self.type_infos_created.load(Ordering::SeqCst)
            - self.type_infos_released.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> usize {
        self.model_calls.load(Ordering::SeqCst)
    }

    /// Double releases plus calls on released objects; zero for correct ownership.
    pub fn misuse(&self) -> usize {
        self.double_releases.load(Ordering::SeqCst) + self.late_calls.load(Ordering::SeqCst)
    }
}

// ---------- Native objects ----------

struct MockModel {
    spec: Arc<MockSpec>,
    counters: Arc<Counters>,
    released: AtomicBool,
}

struct MockTypeInfo {
    ty: MockType,
    fail: Option<FailPoint>,
    counters: Arc<Counters>,
    symbols: Vec<CString>,
    released: AtomicBool,
}

fn new_model(spec: Arc<MockSpec>, counters: Arc<Counters>) -> *mut OrtModel {
    counters.models_created.fetch_add(1, Ordering::SeqCst);
    Box::into_raw(Box::new(MockModel {
        spec,
        counters,
        released: AtomicBool::new(false),
    })) as *mut OrtModel
}

fn new_type_info(ty: &MockType, fail: Option<FailPoint>, counters: &Arc<Counters>) -> *mut OrtTypeInfo {
    counters.type_infos_created.fetch_add(1, Ordering::SeqCst);
    let symbols = match ty {
        MockType::Tensor { symbols, .. } => symbols
            .iter()
            .filter_map(|s| CString::new(s.as_str()).ok())
            .collect(),
        _ => Vec::new(),
    };
    Box::into_raw(Box::new(MockTypeInfo {
        ty: ty.clone(),
        fail,
        counters: counters.clone(),
        symbols,
        released: AtomicBool::new(false),
    })) as *mut OrtTypeInfo
}

// Nothing below panics: a panic cannot unwind out of an `extern "C"` fn, so
// misuse is counted in `Counters` and the call fails instead.

unsafe fn model<'a>(p: *const OrtModel) -> &'a MockModel {
    unsafe { &*(p as *const MockModel) }
}

unsafe fn type_info<'a>(p: *const OrtTypeInfo) -> &'a MockTypeInfo {
    unsafe { &*(p as *const MockTypeInfo) }
}

fn live(t: &MockTypeInfo) -> Option<&MockTypeInfo> {
    if t.released.load(Ordering::SeqCst) {
        t.counters.late_calls.fetch_add(1, Ordering::SeqCst);
        None
    } else {
        Some(t)
    }
}

impl MockModel {
    fn alive(&self) -> bool {
        let released = self.released.load(Ordering::SeqCst);
        if released {
            self.counters.late_calls.fetch_add(1, Ordering::SeqCst);
        }
        !released
    }

    fn call(&self, point: FailPoint) -> bool {
        self.counters.model_calls.fetch_add(1, Ordering::SeqCst);
        self.alive() && self.spec.fail != Some(point)
    }

    fn reported(&self, real: usize, huge: FailPoint) -> usize {
        if self.spec.fail == Some(huge) { HUGE } else { real }
    }
}

unsafe fn write_str(s: &[u8], out: *mut *const c_char, out_len: *mut usize) {
    unsafe {
        *out = s.as_ptr() as *const c_char;
        *out_len = s.len();
    }
}

// ---------- ModelApi ----------

unsafe extern "C" fn input_count(m: *const OrtModel, out: *mut usize) -> i32 {
    let m = unsafe { model(m) };
    if !m.call(FailPoint::InputCount) {
        return ERR_FAIL;
    }
    unsafe { *out = m.reported(m.spec.inputs.len(), FailPoint::HugeInputCount) };
    ERR_OK
}

unsafe extern "C" fn output_count(m: *const OrtModel, out: *mut usize) -> i32 {
    let m = unsafe { model(m) };
    if !m.call(FailPoint::OutputCount) {
        return ERR_FAIL;
    }
    unsafe { *out = m.spec.outputs.len() };
    ERR_OK
}

unsafe extern "C" fn input_name(m: *const OrtModel, i: usize, out: *mut *const c_char, len: *mut usize) -> i32 {
    let m = unsafe { model(m) };
    if !m.call(FailPoint::InputName(i)) {
        return ERR_FAIL;
    }
    let Some(f) = m.spec.inputs.get(i) else { return ERR_FAIL };
    unsafe { write_str(&f.name, out, len) };
    ERR_OK
}

unsafe extern "C" fn output_name(m: *const OrtModel, i: usize, out: *mut *const c_char, len: *mut usize) -> i32 {
    let m = unsafe { model(m) };
    if !m.call(FailPoint::OutputName(i)) {
        return ERR_FAIL;
    }
    let Some(f) = m.spec.outputs.get(i) else { return ERR_FAIL };
    unsafe { write_str(&f.name, out, len) };
    ERR_OK
}

unsafe extern "C" fn input_description(m: *const OrtModel, i: usize, out: *mut *const c_char, len: *mut usize) -> i32 {
    let m = unsafe { model(m) };
    if !m.call(FailPoint::InputDescription(i)) {
        return ERR_FAIL;
    }
    let Some(f) = m.spec.inputs.get(i) else { return ERR_FAIL };
    unsafe { write_str(f.description.as_bytes(), out, len) };
    ERR_OK
}

unsafe extern "C" fn output_description(m: *const OrtModel, i: usize, out: *mut *const c_char, len: *mut usize) -> i32 {
    let m = unsafe { model(m) };
    if !m.call(FailPoint::OutputDescription(i)) {
        return ERR_FAIL;
    }
    let Some(f) = m.spec.outputs.get(i) else { return ERR_FAIL };
    unsafe { write_str(f.description.as_bytes(), out, len) };
    ERR_OK
}

unsafe extern "C" fn input_type_info(m: *const OrtModel, i: usize, out: *mut *mut OrtTypeInfo) -> i32 {
    let m = unsafe { model(m) };
    if !m.call(FailPoint::InputTypeInfo(i)) {
        return ERR_FAIL;
    }
    let Some(f) = m.spec.inputs.get(i) else { return ERR_FAIL };
    unsafe { *out = new_type_info(&f.ty, m.spec.fail, &m.counters) };
    ERR_OK
}

unsafe extern "C" fn output_type_info(m: *const OrtModel, i: usize, out: *mut *mut OrtTypeInfo) -> i32 {
    let m = unsafe { model(m) };
    if !m.call(FailPoint::OutputTypeInfo(i)) {
        return ERR_FAIL;
    }
    let Some(f) = m.spec.outputs.get(i) else { return ERR_FAIL };
    unsafe { *out = new_type_info(&f.ty, m.spec.fail, &m.counters) };
    ERR_OK
}

unsafe extern "C" fn metadata_count(m: *const OrtModel, out: *mut usize) -> i32 {
    let m = unsafe { model(m) };
    if !m.call(FailPoint::MetadataCount) {
        return ERR_FAIL;
    }
    unsafe { *out = m.reported(m.spec.metadata.len(), FailPoint::HugeMetadataCount) };
    ERR_OK
}

unsafe extern "C" fn metadata_at(
    m: *const OrtModel,
    i: usize,
    key: *mut *const c_char,
    key_len: *mut usize,
    value: *mut *const c_char,
    value_len: *mut usize,
) -> i32 {
    let m = unsafe { model(m) };
    if !m.call(FailPoint::MetadataAt(i)) {
        return ERR_FAIL;
    }
    let Some((k, v)) = m.spec.metadata.get(i) else { return ERR_FAIL };
    unsafe {
        write_str(k, key, key_len);
        write_str(v, value, value_len);
    }
    ERR_OK
}

macro_rules! model_string {
    ($fn_name:ident, $field:ident, $point:expr) => {
        unsafe extern "C" fn $fn_name(m: *const OrtModel, out: *mut *const c_char, len: *mut usize) -> i32 {
            let m = unsafe { model(m) };
            if !m.call($point) {
                return ERR_FAIL;
            }
            unsafe { write_str(m.spec.$field.as_bytes(), out, len) };
            ERR_OK
        }
    };
}

model_string!(author, author, FailPoint::Author);
model_string!(name, name, FailPoint::Name);
model_string!(domain, domain, FailPoint::Domain);
model_string!(description, description, FailPoint::Description);

unsafe extern "C" fn version(m: *const OrtModel, out: *mut i64) -> i32 {
    let m = unsafe { model(m) };
    if !m.call(FailPoint::Version) {
        return ERR_FAIL;
    }
    unsafe { *out = m.spec.version };
    ERR_OK
}

unsafe extern "C" fn clone_model(m: *const OrtModel, out: *mut *mut OrtModel) -> i32 {
    let m = unsafe { model(m) };
    if !m.alive() {
        return ERR_FAIL;
    }
    match m.spec.fail {
        Some(FailPoint::Clone) => ERR_FAIL,
        Some(FailPoint::CloneReturnsNull) => {
            unsafe { *out = std::ptr::null_mut() };
            ERR_OK
        }
        _ => {
            unsafe { *out = new_model(m.spec.clone(), m.counters.clone()) };
            ERR_OK
        }
    }
}

// Released objects are marked, not freed, so a second release or a late
// accessor call is recorded instead of touching freed memory.
unsafe extern "C" fn release_model(m: *mut OrtModel) {
    let m = unsafe { model(m) };
    if m.released.swap(true, Ordering::SeqCst) {
        m.counters.double_releases.fetch_add(1, Ordering::SeqCst);
    } else {
        m.counters.models_released.fetch_add(1, Ordering::SeqCst);
    }
}

unsafe extern "C" fn ensure_no_float16(m: *mut OrtModel) -> i32 {
    let m = unsafe { model(m) };
    if !m.alive() {
        return ERR_FAIL;
    }
    m.counters.float16_checks.fetch_add(1, Ordering::SeqCst);
    if m.spec.fail == Some(FailPoint::EnsureNoFloat16) {
        ERR_FAIL
    } else {
        ERR_OK
    }
}

// ---------- TypeInfoApi ----------

unsafe extern "C" fn type_kind(t: *const OrtTypeInfo, out: *mut i32) -> i32 {
    let Some(t) = live(unsafe { type_info(t) }) else { return ERR_FAIL };
    if t.fail == Some(FailPoint::TypeKind) {
        return ERR_FAIL;
    }
    let kind = match &t.ty {
        MockType::Tensor { .. } => TYPE_KIND_TENSOR,
        MockType::Sequence(_) => TYPE_KIND_SEQUENCE,
        MockType::Map { .. } => TYPE_KIND_MAP,
        MockType::Kind(k) => *k,
    };
    unsafe { *out = kind };
    ERR_OK
}

unsafe extern "C" fn type_denotation(t: *const OrtTypeInfo, out: *mut *const c_char, len: *mut usize) -> i32 {
    let Some(t) = live(unsafe { type_info(t) }) else { return ERR_FAIL };
    let d = match &t.ty {
        MockType::Tensor { denotation, .. } => denotation.as_str(),
        _ => "",
    };
    unsafe { write_str(d.as_bytes(), out, len) };
    ERR_OK
}

unsafe extern "C" fn tensor_element_type(t: *const OrtTypeInfo, out: *mut i32) -> i32 {
    let Some(t) = live(unsafe { type_info(t) }) else { return ERR_FAIL };
    let MockType::Tensor { element, .. } = &t.ty else { return ERR_FAIL };
    unsafe { *out = *element };
    ERR_OK
}

unsafe extern "C" fn tensor_dim_count(t: *const OrtTypeInfo, out: *mut usize) -> i32 {
    let Some(t) = live(unsafe { type_info(t) }) else { return ERR_FAIL };
    let MockType::Tensor { dims, .. } = &t.ty else { return ERR_FAIL };
    let rank = if t.fail == Some(FailPoint::HugeRank) { HUGE } else { dims.len() };
    unsafe { *out = rank };
    ERR_OK
}

unsafe extern "C" fn tensor_dims(t: *const OrtTypeInfo, out: *mut i64, len: usize) -> i32 {
    let Some(t) = live(unsafe { type_info(t) }) else { return ERR_FAIL };
    if t.fail == Some(FailPoint::TensorDims) {
        return ERR_FAIL;
    }
    let MockType::Tensor { dims, .. } = &t.ty else { return ERR_FAIL };
    if len != dims.len() {
        return ERR_FAIL;
    }
    unsafe { std::ptr::copy_nonoverlapping(dims.as_ptr(), out, len) };
    ERR_OK
}

unsafe extern "C" fn tensor_symbolic_dims(t: *const OrtTypeInfo, out: *mut *const c_char, len: usize) -> i32 {
    let Some(t) = live(unsafe { type_info(t) }) else { return ERR_FAIL };
    let MockType::Tensor { dims, .. } = &t.ty else { return ERR_FAIL };
    if len != dims.len() {
        return ERR_FAIL;
    }
    for i in 0..len {
        let p = t
            .symbols
            .get(i)
            .map(|s| s.as_ptr())
            .unwrap_or(c"".as_ptr());
        unsafe { *out.add(i) = p };
    }
    ERR_OK
}

unsafe extern "C" fn map_key_type(t: *const OrtTypeInfo, out: *mut i32) -> i32 {
    let Some(t) = live(unsafe { type_info(t) }) else { return ERR_FAIL };
    let MockType::Map { key, .. } = &t.ty else { return ERR_FAIL };
    unsafe { *out = *key };
    ERR_OK
}

unsafe extern "C" fn map_value_type(t: *const OrtTypeInfo, out: *mut *mut OrtTypeInfo) -> i32 {
    let Some(t) = live(unsafe { type_info(t) }) else { return ERR_FAIL };
    let MockType::Map { value, .. } = &t.ty else { return ERR_FAIL };
    unsafe { nested_out(t, value, out) }
}

unsafe extern "C" fn sequence_element_type(t: *const OrtTypeInfo, out: *mut *mut OrtTypeInfo) -> i32 {
    let Some(t) = live(unsafe { type_info(t) }) else { return ERR_FAIL };
    let MockType::Sequence(element) = &t.ty else { return ERR_FAIL };
    unsafe { nested_out(t, element, out) }
}

unsafe fn nested_out(parent: &MockTypeInfo, ty: &MockType, out: *mut *mut OrtTypeInfo) -> i32 {
    match parent.fail {
        Some(FailPoint::NestedTypeInfo) => ERR_FAIL,
        Some(FailPoint::NestedReturnsNull) => {
            unsafe { *out = std::ptr::null_mut() };
            ERR_OK
        }
        _ => {
            unsafe { *out = new_type_info(ty, parent.fail, &parent.counters) };
            ERR_OK
        }
    }
}

unsafe extern "C" fn release_type_info(t: *mut OrtTypeInfo) {
    let t = unsafe { type_info(t) };
    if t.released.swap(true, Ordering::SeqCst) {
        t.counters.double_releases.fetch_add(1, Ordering::SeqCst);
    } else {
        t.counters.type_infos_released.fetch_add(1, Ordering::SeqCst);
    }
}

// ---------- Table ----------

pub static MOCK_API: EngineApi = EngineApi {
    info: EngineInfo {
        abi_version: ORTINFO_ABI_VERSION,
        id: c"mock".as_ptr(),
        semver: c"0.0.1".as_ptr(),
    },
    model: ModelApi {
        input_count,
        input_name,
        input_description,
        input_type_info,
        output_count,
        output_name,
        output_description,
        output_type_info,
        metadata_count,
        metadata_at,
        author,
        name,
        domain,
        description,
        version,
        clone_model,
        release_model,
        ensure_no_float16,
    },
    type_info: TypeInfoApi {
        kind: type_kind,
        denotation: type_denotation,
        tensor_element_type,
        tensor_dim_count,
        tensor_dims,
        tensor_symbolic_dims,
        map_key_type,
        map_value_type,
        sequence_element_type,
        release_type_info,
    },
};

pub fn engine() -> Engine {
    Engine::new(&MOCK_API)
}

/// Raw engine model plus its counters; the caller owns the pointer.
pub fn raw_model(spec: MockSpec) -> (*mut OrtModel, Arc<Counters>) {
    let counters = Arc::new(Counters::default());
    (new_model(Arc::new(spec), counters.clone()), counters)
}

/// Raw model already wrapped in a `ModelHandle`.
pub fn handle(spec: MockSpec) -> (ModelHandle, Arc<Counters>) {
    let (raw, counters) = raw_model(spec);
    let h = unsafe { ModelHandle::from_raw(engine(), raw) }.expect("non-null mock model");
    (h, counters)
}

/// Release a raw model the test took back via `detach`.
pub fn release_raw(raw: *mut OrtModel) {
    unsafe { release_model(raw) };
}
