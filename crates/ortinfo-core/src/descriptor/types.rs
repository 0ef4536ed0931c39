use std::fmt;

use ortinfo_abi::*;
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TensorElementType {
    Float,
    UInt8,
    Int8,
    UInt16,
    Int16,
    Int32,
    Int64,
    String,
    Bool,
    Float16,
    Double,
    UInt32,
    UInt64,
    BFloat16,
}

impl TensorElementType {
    /// Complex types are known but unsupported; `Undefined` and unknown codes are malformed.
    pub fn from_code(code: i32) -> Result<Self> {
        use TensorElementType::*;
        Ok(match code {
            ELEMENT_FLOAT => Float,
            ELEMENT_UINT8 => UInt8,
            ELEMENT_INT8 => Int8,
            ELEMENT_UINT16 => UInt16,
            ELEMENT_INT16 => Int16,
            ELEMENT_INT32 => Int32,
            ELEMENT_INT64 => Int64,
            ELEMENT_STRING => String,
            ELEMENT_BOOL => Bool,
            ELEMENT_FLOAT16 => Float16,
            ELEMENT_DOUBLE => Double,
            ELEMENT_UINT32 => UInt32,
            ELEMENT_UINT64 => UInt64,
            ELEMENT_BFLOAT16 => BFloat16,
            ELEMENT_COMPLEX64 | ELEMENT_COMPLEX128 => {
                return Err(ModelError::UnsupportedFeatureType(format!(
                    "complex tensor element type ({code})"
                )));
            }
            other => {
                return Err(ModelError::MalformedTypeInfo(format!(
                    "tensor element type code {other}"
                )));
            }
        })
    }
}

/// One tensor axis: a concrete extent, or a dynamic axis with its symbolic name if the engine has one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dimension {
    Fixed(i64),
    Unbound { symbol: Option<String> },
}

impl Dimension {
    pub fn from_raw(value: i64, symbol: Option<String>) -> Result<Self> {
        match value {
            DIM_DYNAMIC => Ok(Dimension::Unbound {
                symbol: symbol.filter(|s| !s.is_empty()),
            }),
            v if v >= 0 => Ok(Dimension::Fixed(v)),
            v => Err(ModelError::MalformedTypeInfo(format!(
                "dimension value {v}"
            ))),
        }
    }

    #[inline]
    pub fn is_fixed(&self) -> bool {
        matches!(self, Dimension::Fixed(_))
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dimension::Fixed(n) => write!(f, "{n}"),
            Dimension::Unbound { symbol: Some(s) } => f.write_str(s),
            Dimension::Unbound { symbol: None } => f.write_str("?"),
        }
    }
}

/// Structural shape of a feature. Nested kinds come from nested engine type-infos.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureKind {
    Tensor {
        element_type: TensorElementType,
        shape: Vec<Dimension>,
    },
    Sequence {
        element: Box<FeatureKind>,
    },
    Map {
        key: TensorElementType,
        value: Box<FeatureKind>,
    },
}

impl FeatureKind {
    pub fn kind_name(&self) -> &'static str {
        match self {
            FeatureKind::Tensor { .. } => "tensor",
            FeatureKind::Sequence { .. } => "sequence",
            FeatureKind::Map { .. } => "map",
        }
    }
}

/// ONNX type-denotation vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Denotation {
    Tensor,
    Image,
    Audio,
    Text,
}

impl Denotation {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "TENSOR" => Some(Denotation::Tensor),
            "IMAGE" => Some(Denotation::Image),
            "AUDIO" => Some(Denotation::Audio),
            "TEXT" => Some(Denotation::Text),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Denotation::Tensor => "TENSOR",
            Denotation::Image => "IMAGE",
            Denotation::Audio => "AUDIO",
            Denotation::Text => "TEXT",
        }
    }
}

impl fmt::Display for Denotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical description of one model input or output.
///
/// Built once during conversion; only readable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureDescriptor {
    name: String,
    description: String,
    kind: FeatureKind,
    denotation: Option<Denotation>,
    image: Option<super::ImageProperties>,
}

impl FeatureDescriptor {
    pub(crate) fn new(
        name: String,
        description: String,
        kind: FeatureKind,
        denotation: Option<Denotation>,
        image: Option<super::ImageProperties>,
    ) -> Self {
        Self {
            name,
            description,
            kind,
            denotation,
            image,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[inline]
    pub fn kind(&self) -> &FeatureKind {
        &self.kind
    }

    #[inline]
    pub fn denotation(&self) -> Option<Denotation> {
        self.denotation
    }

    #[inline]
    pub fn image(&self) -> Option<&super::ImageProperties> {
        self.image.as_ref()
    }

    /// Element type for tensor features.
    pub fn element_type(&self) -> Option<TensorElementType> {
        match &self.kind {
            FeatureKind::Tensor { element_type, .. } => Some(*element_type),
            _ => None,
        }
    }

    /// Shape for tensor features.
    pub fn shape(&self) -> Option<&[Dimension]> {
        match &self.kind {
            FeatureKind::Tensor { shape, .. } => Some(shape),
            _ => None,
        }
    }
}
