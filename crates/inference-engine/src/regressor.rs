//! Fitted Regressors

use crate::onnx::OnnxRegressor;
use crate::{InferenceError, PipelineLoadError};
use serde::{Deserialize, Serialize};

/// Regressor as stored in the artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RegressorSpec {
    /// `intercept + coefficients · x`
    Linear {
        intercept: f64,
        coefficients: Vec<f64>,
    },
    /// Decision-tree ensemble (boosted or bagged)
    TreeEnsemble {
        n_features: usize,
        #[serde(default)]
        base_score: f64,
        aggregation: Aggregation,
        trees: Vec<Tree>,
    },
    /// Serialized ONNX graph taking `[1, n_features]` f32 input
    Onnx { n_features: usize, model: Vec<u8> },
}

/// How per-tree outputs are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    /// Gradient boosting: learning rate is already folded into leaf values
    Sum,
    /// Random forest
    Mean,
}

/// Tree node. Child indices always point forward in the node list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

/// Single decision tree; node 0 is the root
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tree {
    nodes: Vec<TreeNode>,
}

impl Tree {
    pub fn new(nodes: Vec<TreeNode>) -> Self {
        Self { nodes }
    }

    fn validate(&self, n_features: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }
        for (position, node) in self.nodes.iter().enumerate() {
            match node {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if *feature >= n_features {
                        return Err(format!(
                            "node {} splits on feature {} of {}",
                            position, feature, n_features
                        ));
                    }
                    if !threshold.is_finite() {
                        return Err(format!("node {} has non-finite threshold", position));
                    }
                    for child in [*left, *right] {
                        if child <= position || child >= self.nodes.len() {
                            return Err(format!(
                                "node {} has invalid child index {}",
                                position, child
                            ));
                        }
                    }
                }
                TreeNode::Leaf { value } => {
                    if !value.is_finite() {
                        return Err(format!("leaf {} has non-finite value", position));
                    }
                }
            }
        }
        Ok(())
    }

    /// Walk from the root; `x <= threshold` goes left.
    /// Requires a validated tree and `features.len() == n_features`.
    fn evaluate(&self, features: &[f64]) -> f64 {
        let mut position = 0;
        loop {
            match &self.nodes[position] {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    position = if features[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
                TreeNode::Leaf { value } => return *value,
            }
        }
    }
}

/// Runnable regressor
#[derive(Debug)]
pub enum Regressor {
    Linear {
        intercept: f64,
        coefficients: Vec<f64>,
    },
    TreeEnsemble {
        n_features: usize,
        base_score: f64,
        aggregation: Aggregation,
        trees: Vec<Tree>,
    },
    Onnx(OnnxRegressor),
}

impl Regressor {
    /// Validate a stored regressor and make it runnable
    pub fn from_spec(spec: RegressorSpec) -> Result<Self, PipelineLoadError> {
        match spec {
            RegressorSpec::Linear {
                intercept,
                coefficients,
            } => {
                if !intercept.is_finite() || coefficients.iter().any(|c| !c.is_finite()) {
                    return Err(PipelineLoadError::Invalid(
                        "linear regressor has non-finite parameters".to_string(),
                    ));
                }
                Ok(Regressor::Linear {
                    intercept,
                    coefficients,
                })
            }
            RegressorSpec::TreeEnsemble {
                n_features,
                base_score,
                aggregation,
                trees,
            } => {
                if trees.is_empty() {
                    return Err(PipelineLoadError::Invalid(
                        "tree ensemble has no trees".to_string(),
                    ));
                }
                for (index, tree) in trees.iter().enumerate() {
                    tree.validate(n_features).map_err(|reason| {
                        PipelineLoadError::Invalid(format!("tree {}: {}", index, reason))
                    })?;
                }
                Ok(Regressor::TreeEnsemble {
                    n_features,
                    base_score,
                    aggregation,
                    trees,
                })
            }
            RegressorSpec::Onnx { n_features, model } => {
                let regressor = OnnxRegressor::from_bytes(&model, n_features)
                    .map_err(|e| PipelineLoadError::ModelLoadError(e.to_string()))?;
                Ok(Regressor::Onnx(regressor))
            }
        }
    }

    /// Number of input features expected
    pub fn n_features(&self) -> usize {
        match self {
            Regressor::Linear { coefficients, .. } => coefficients.len(),
            Regressor::TreeEnsemble { n_features, .. } => *n_features,
            Regressor::Onnx(model) => model.n_features(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Regressor::Linear { .. } => "linear",
            Regressor::TreeEnsemble { .. } => "tree_ensemble",
            Regressor::Onnx(_) => "onnx",
        }
    }

    /// Predict a single scalar
    pub fn predict(&self, features: &[f64]) -> Result<f64, InferenceError> {
        let expected = self.n_features();
        if features.len() != expected {
            return Err(InferenceError::InvalidInputShape {
                expected,
                actual: features.len(),
            });
        }

        match self {
            Regressor::Linear {
                intercept,
                coefficients,
            } => {
                let dot: f64 = coefficients
                    .iter()
                    .zip(features.iter())
                    .map(|(c, x)| c * x)
                    .sum();
                Ok(dot + intercept)
            }
            Regressor::TreeEnsemble {
                base_score,
                aggregation,
                trees,
                ..
            } => {
                let total: f64 = trees.iter().map(|tree| tree.evaluate(features)).sum();
                let combined = match aggregation {
                    Aggregation::Sum => total,
                    Aggregation::Mean => total / trees.len() as f64,
                };
                Ok(base_score + combined)
            }
            Regressor::Onnx(model) => model.predict(features),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stump(feature: usize, threshold: f64, low: f64, high: f64) -> Tree {
        Tree::new(vec![
            TreeNode::Split {
                feature,
                threshold,
                left: 1,
                right: 2,
            },
            TreeNode::Leaf { value: low },
            TreeNode::Leaf { value: high },
        ])
    }

    #[test]
    fn test_linear_prediction() {
        let regressor = Regressor::from_spec(RegressorSpec::Linear {
            intercept: 1.0,
            coefficients: vec![2.0, 0.5],
        })
        .unwrap();
        assert_eq!(regressor.predict(&[1.0, 4.0]).unwrap(), 5.0);
    }

    #[test]
    fn test_shape_mismatch() {
        let regressor = Regressor::from_spec(RegressorSpec::Linear {
            intercept: 0.0,
            coefficients: vec![1.0; 3],
        })
        .unwrap();
        assert_eq!(
            regressor.predict(&[1.0]).unwrap_err(),
            InferenceError::InvalidInputShape {
                expected: 3,
                actual: 1
            }
        );
    }

    #[test]
    fn test_boosted_ensemble_sums() {
        let regressor = Regressor::from_spec(RegressorSpec::TreeEnsemble {
            n_features: 2,
            base_score: 3.0,
            aggregation: Aggregation::Sum,
            trees: vec![stump(0, 0.5, -1.0, 2.0), stump(1, 10.0, 0.25, 0.5)],
        })
        .unwrap();
        assert_eq!(regressor.predict(&[1.0, 10.0]).unwrap(), 5.25);
        assert_eq!(regressor.predict(&[0.5, 11.0]).unwrap(), 2.5);
    }

    #[test]
    fn test_forest_averages() {
        let regressor = Regressor::from_spec(RegressorSpec::TreeEnsemble {
            n_features: 1,
            base_score: 0.0,
            aggregation: Aggregation::Mean,
            trees: vec![stump(0, 1.0, 2.0, 8.0), stump(0, 3.0, 4.0, 6.0)],
        })
        .unwrap();
        assert_eq!(regressor.predict(&[2.0]).unwrap(), 6.0);
    }

    #[test]
    fn test_backward_child_rejected() {
        let looping = Tree::new(vec![
            TreeNode::Split {
                feature: 0,
                threshold: 0.0,
                left: 0,
                right: 1,
            },
            TreeNode::Leaf { value: 1.0 },
        ]);
        let result = Regressor::from_spec(RegressorSpec::TreeEnsemble {
            n_features: 1,
            base_score: 0.0,
            aggregation: Aggregation::Sum,
            trees: vec![looping],
        });
        assert!(matches!(result, Err(PipelineLoadError::Invalid(_))));
    }

    #[test]
    fn test_feature_out_of_range_rejected() {
        let result = Regressor::from_spec(RegressorSpec::TreeEnsemble {
            n_features: 1,
            base_score: 0.0,
            aggregation: Aggregation::Sum,
            trees: vec![stump(3, 0.0, 1.0, 2.0)],
        });
        assert!(matches!(result, Err(PipelineLoadError::Invalid(_))));
    }

    #[test]
    fn test_invalid_onnx_bytes() {
        let result = Regressor::from_spec(RegressorSpec::Onnx {
            n_features: 4,
            model: vec![0xde, 0xad, 0xbe, 0xef],
        });
        assert!(matches!(result, Err(PipelineLoadError::ModelLoadError(_))));
    }

    #[test]
    fn test_spec_json_shape() {
        let json = r#"{
            "kind": "tree_ensemble",
            "n_features": 1,
            "aggregation": "sum",
            "trees": [[
                {"kind": "split", "feature": 0, "threshold": 0.5, "left": 1, "right": 2},
                {"kind": "leaf", "value": 1.0},
                {"kind": "leaf", "value": 3.0}
            ]]
        }"#;
        let spec: RegressorSpec = serde_json::from_str(json).unwrap();
        let regressor = Regressor::from_spec(spec).unwrap();
        assert_eq!(regressor.kind(), "tree_ensemble");
        assert_eq!(regressor.predict(&[0.9]).unwrap(), 3.0);
    }
}
