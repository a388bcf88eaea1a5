//! Fitted Column Encoder

use crate::TransformError;
use feature_engine::{AssembledRecord, ColumnKind};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Encoded representation of one record. Built per request and dropped after inference.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    values: Vec<f64>,
}

impl FeatureVector {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// One fitted transform, as stored in the artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColumnTransform {
    /// Indicator per fitted category
    OneHot {
        column: String,
        categories: Vec<String>,
    },
    /// `(x - mean) / scale`
    Scale { column: String, mean: f64, scale: f64 },
    /// Token counts against a fitted vocabulary
    BagOfWords {
        column: String,
        vocabulary: Vec<String>,
    },
}

impl ColumnTransform {
    pub fn column(&self) -> &str {
        match self {
            ColumnTransform::OneHot { column, .. }
            | ColumnTransform::Scale { column, .. }
            | ColumnTransform::BagOfWords { column, .. } => column,
        }
    }

    /// Number of output features
    pub fn width(&self) -> usize {
        match self {
            ColumnTransform::OneHot { categories, .. } => categories.len(),
            ColumnTransform::Scale { .. } => 1,
            ColumnTransform::BagOfWords { vocabulary, .. } => vocabulary.len(),
        }
    }

    /// Column kind this transform consumes
    pub fn input_kind(&self) -> ColumnKind {
        match self {
            ColumnTransform::OneHot { .. } => ColumnKind::Categorical,
            ColumnTransform::Scale { .. } => ColumnKind::Numeric,
            ColumnTransform::BagOfWords { .. } => ColumnKind::Text,
        }
    }
}

#[derive(Debug, Clone)]
enum ColumnEncoder {
    OneHot {
        column: String,
        index: HashMap<String, usize>,
        width: usize,
    },
    Scale {
        column: String,
        mean: f64,
        scale: f64,
    },
    BagOfWords {
        column: String,
        index: HashMap<String, usize>,
        width: usize,
    },
}

fn build_index(column: &str, labels: &[String]) -> Result<HashMap<String, usize>, String> {
    let mut index = HashMap::with_capacity(labels.len());
    for (position, label) in labels.iter().enumerate() {
        if index.insert(label.clone(), position).is_some() {
            return Err(format!("column {:?} lists {:?} twice", column, label));
        }
    }
    Ok(index)
}

impl TryFrom<&ColumnTransform> for ColumnEncoder {
    type Error = String;

    fn try_from(transform: &ColumnTransform) -> Result<Self, Self::Error> {
        match transform {
            ColumnTransform::OneHot { column, categories } => Ok(ColumnEncoder::OneHot {
                column: column.clone(),
                index: build_index(column, categories)?,
                width: categories.len(),
            }),
            ColumnTransform::Scale {
                column,
                mean,
                scale,
            } => {
                if !mean.is_finite() || !scale.is_finite() {
                    return Err(format!("column {:?} has non-finite scaling", column));
                }
                // Constant training columns are stored with zero scale
                let scale = if *scale == 0.0 { 1.0 } else { *scale };
                Ok(ColumnEncoder::Scale {
                    column: column.clone(),
                    mean: *mean,
                    scale,
                })
            }
            ColumnTransform::BagOfWords { column, vocabulary } => Ok(ColumnEncoder::BagOfWords {
                column: column.clone(),
                index: build_index(column, vocabulary)?,
                width: vocabulary.len(),
            }),
        }
    }
}

/// Lower-cased tokens of at least two word characters (alphanumeric or `_`)
fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|token| token.chars().count() >= 2)
        .map(|token| token.to_lowercase())
}

/// Fitted encoder: column transforms applied in order and concatenated
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "Vec<ColumnTransform>", into = "Vec<ColumnTransform>")]
pub struct FittedEncoder {
    transforms: Vec<ColumnTransform>,
    encoders: Vec<ColumnEncoder>,
    width: usize,
}

impl TryFrom<Vec<ColumnTransform>> for FittedEncoder {
    type Error = String;

    fn try_from(transforms: Vec<ColumnTransform>) -> Result<Self, Self::Error> {
        let encoders = transforms
            .iter()
            .map(ColumnEncoder::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        let width = transforms.iter().map(ColumnTransform::width).sum();
        Ok(Self {
            transforms,
            encoders,
            width,
        })
    }
}

impl From<FittedEncoder> for Vec<ColumnTransform> {
    fn from(encoder: FittedEncoder) -> Self {
        encoder.transforms
    }
}

impl FittedEncoder {
    pub fn new(transforms: Vec<ColumnTransform>) -> Result<Self, String> {
        Self::try_from(transforms)
    }

    pub fn transforms(&self) -> &[ColumnTransform] {
        &self.transforms
    }

    /// Total number of encoded features
    pub fn output_width(&self) -> usize {
        self.width
    }

    /// Encode one record
    pub fn transform(&self, record: &AssembledRecord) -> Result<FeatureVector, TransformError> {
        let mut values = Vec::with_capacity(self.width);

        for encoder in &self.encoders {
            match encoder {
                ColumnEncoder::OneHot {
                    column,
                    index,
                    width,
                } => {
                    let label = lookup(record, column)?.as_str().ok_or_else(|| {
                        TransformError::TypeMismatch {
                            column: column.clone(),
                            expected: "categorical",
                        }
                    })?;
                    let position =
                        index
                            .get(label)
                            .copied()
                            .ok_or_else(|| TransformError::UnknownCategory {
                                column: column.clone(),
                                value: label.to_string(),
                            })?;
                    let start = values.len();
                    values.resize(start + width, 0.0);
                    values[start + position] = 1.0;
                }
                ColumnEncoder::Scale {
                    column,
                    mean,
                    scale,
                } => {
                    let value = lookup(record, column)?.as_f64().ok_or_else(|| {
                        TransformError::TypeMismatch {
                            column: column.clone(),
                            expected: "numeric",
                        }
                    })?;
                    values.push((value - mean) / scale);
                }
                ColumnEncoder::BagOfWords {
                    column,
                    index,
                    width,
                } => {
                    let text = lookup(record, column)?.as_str().ok_or_else(|| {
                        TransformError::TypeMismatch {
                            column: column.clone(),
                            expected: "text",
                        }
                    })?;
                    let start = values.len();
                    values.resize(start + width, 0.0);
                    for token in tokenize(text) {
                        if let Some(position) = index.get(&token) {
                            values[start + position] += 1.0;
                        }
                    }
                }
            }
        }

        Ok(FeatureVector::new(values))
    }
}

fn lookup<'a>(
    record: &'a AssembledRecord,
    column: &str,
) -> Result<&'a feature_engine::FieldValue, TransformError> {
    record
        .get(column)
        .ok_or_else(|| TransformError::MissingColumn(column.to_string()))
}
