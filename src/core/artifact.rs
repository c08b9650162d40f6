//! The serialized classifier: a column preprocessor followed by an estimator.
//!
//! Artifacts are JSON documents exported by the training side. The
//! preprocessor turns a [`FeatureRow`] into a dense vector (standardized
//! numeric columns first, then one one-hot block per categorical column) and
//! the estimator maps that vector to the probability of default.

use crate::core::{FeatureRow, FeatureValue};
use crate::utils::error::{Result, ScoringError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub model_type: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub trained_at: Option<String>,
    pub preprocessor: Preprocessor,
    pub estimator: Estimator,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Preprocessor {
    #[serde(default)]
    pub numeric: Vec<NumericColumn>,
    #[serde(default)]
    pub categorical: Vec<CategoricalColumn>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumericColumn {
    pub column: String,
    #[serde(default)]
    pub mean: f64,
    #[serde(default = "default_scale")]
    pub scale: f64,
}

fn default_scale() -> f64 {
    1.0
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandleUnknown {
    #[default]
    Ignore,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoricalColumn {
    pub column: String,
    pub categories: Vec<String>,
    #[serde(default)]
    pub handle_unknown: HandleUnknown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Estimator {
    LogisticRegression {
        coefficients: Vec<f64>,
        intercept: f64,
    },
    GradientBoosting {
        learning_rate: f64,
        #[serde(default)]
        init: f64,
        trees: Vec<Tree>,
    },
    RandomForest {
        trees: Vec<Tree>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tree {
    pub nodes: Vec<Node>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
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

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

impl Preprocessor {
    /// Width of the transformed feature vector.
    pub fn width(&self) -> usize {
        self.numeric.len()
            + self
                .categorical
                .iter()
                .map(|c| c.categories.len())
                .sum::<usize>()
    }

    pub fn knows_column(&self, column: &str) -> bool {
        self.numeric.iter().any(|c| c.column == column)
            || self.categorical.iter().any(|c| c.column == column)
    }

    pub fn transform(&self, row: &FeatureRow) -> Result<Vec<f64>> {
        let mut out = Vec::with_capacity(self.width());

        for feature in &self.numeric {
            let raw = match row.get(&feature.column) {
                Some(FeatureValue::Number(n)) => *n,
                Some(FeatureValue::Text(s)) => s.trim().parse::<f64>().map_err(|_| {
                    ScoringError::InferenceError {
                        message: format!(
                            "column '{}' must be numeric, got '{}'",
                            feature.column, s
                        ),
                    }
                })?,
                None => return Err(missing_column(&feature.column)),
            };
            let scale = if feature.scale == 0.0 { 1.0 } else { feature.scale };
            out.push((raw - feature.mean) / scale);
        }

        for feature in &self.categorical {
            let value = match row.get(&feature.column) {
                Some(value) => value.to_string(),
                None => return Err(missing_column(&feature.column)),
            };
            let hit = feature.categories.iter().position(|c| *c == value);
            if hit.is_none() && feature.handle_unknown == HandleUnknown::Error {
                return Err(ScoringError::InferenceError {
                    message: format!(
                        "found unknown category '{}' in column '{}'",
                        value, feature.column
                    ),
                });
            }
            out.extend((0..feature.categories.len()).map(|i| if Some(i) == hit { 1.0 } else { 0.0 }));
        }

        Ok(out)
    }
}

fn missing_column(column: &str) -> ScoringError {
    ScoringError::InferenceError {
        message: format!("columns are missing: {{'{}'}}", column),
    }
}

impl Tree {
    /// 從根節點走到葉節點
    pub fn evaluate(&self, x: &[f64]) -> f64 {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                Node::Leaf { value } => return *value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if x[*feature] <= *threshold { *left } else { *right };
                }
            }
        }
    }

    fn validate(&self, width: usize) -> std::result::Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }
        for (i, node) in self.nodes.iter().enumerate() {
            match node {
                Node::Leaf { value } if !value.is_finite() => {
                    return Err(format!("node {} has a non-finite leaf value", i));
                }
                Node::Leaf { .. } => {}
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if *feature >= width {
                        return Err(format!(
                            "node {} splits on feature {} but only {} features exist",
                            i, feature, width
                        ));
                    }
                    if threshold.is_nan() {
                        return Err(format!("node {} has a NaN threshold", i));
                    }
                    // 子節點必須在後面，避免迴圈
                    for child in [left, right] {
                        if *child <= i || *child >= self.nodes.len() {
                            return Err(format!("node {} points to invalid child {}", i, child));
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

impl Estimator {
    pub fn kind(&self) -> &'static str {
        match self {
            Estimator::LogisticRegression { .. } => "logistic_regression",
            Estimator::GradientBoosting { .. } => "gradient_boosting",
            Estimator::RandomForest { .. } => "random_forest",
        }
    }

    /// Probability of class 1 (default).
    pub fn positive_probability(&self, x: &[f64]) -> f64 {
        match self {
            Estimator::LogisticRegression {
                coefficients,
                intercept,
            } => {
                let z: f64 = coefficients.iter().zip(x).map(|(w, v)| w * v).sum();
                sigmoid(z + intercept)
            }
            Estimator::GradientBoosting {
                learning_rate,
                init,
                trees,
            } => {
                let raw: f64 = trees.iter().map(|t| t.evaluate(x)).sum();
                sigmoid(init + learning_rate * raw)
            }
            Estimator::RandomForest { trees } => {
                let total: f64 = trees.iter().map(|t| t.evaluate(x)).sum();
                (total / trees.len() as f64).clamp(0.0, 1.0)
            }
        }
    }

    fn validate(&self, width: usize) -> std::result::Result<(), String> {
        match self {
            Estimator::LogisticRegression {
                coefficients,
                intercept,
            } => {
                if coefficients.len() != width {
                    return Err(format!(
                        "expected {} coefficients for the transformed features, found {}",
                        width,
                        coefficients.len()
                    ));
                }
                if !intercept.is_finite() || coefficients.iter().any(|c| !c.is_finite()) {
                    return Err("coefficients must be finite".to_string());
                }
            }
            Estimator::GradientBoosting {
                learning_rate,
                init,
                trees,
            } => {
                if !learning_rate.is_finite() || !init.is_finite() {
                    return Err("learning_rate and init must be finite".to_string());
                }
                if trees.is_empty() {
                    return Err("gradient boosting model has no trees".to_string());
                }
                for (i, tree) in trees.iter().enumerate() {
                    tree.validate(width).map_err(|e| format!("tree {}: {}", i, e))?;
                }
            }
            Estimator::RandomForest { trees } => {
                if trees.is_empty() {
                    return Err("random forest has no trees".to_string());
                }
                for (i, tree) in trees.iter().enumerate() {
                    tree.validate(width).map_err(|e| format!("tree {}: {}", i, e))?;
                }
            }
        }
        Ok(())
    }
}

impl ModelArtifact {
    pub fn from_slice(path: &str, bytes: &[u8]) -> Result<Self> {
        let artifact: ModelArtifact = serde_json::from_slice(bytes)
            .map_err(|e| ScoringError::artifact(path, format!("invalid model JSON: {}", e)))?;
        artifact.validate().map_err(|e| ScoringError::artifact(path, e))?;
        Ok(artifact)
    }

    /// Structural checks run once at load time.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.preprocessor.width() == 0 {
            return Err("preprocessor declares no columns".to_string());
        }
        for feature in &self.preprocessor.numeric {
            if !feature.mean.is_finite() || !feature.scale.is_finite() {
                return Err(format!("column '{}' has non-finite scaling", feature.column));
            }
        }
        for feature in &self.preprocessor.categorical {
            if feature.categories.is_empty() {
                return Err(format!("column '{}' has no categories", feature.column));
            }
        }
        self.estimator.validate(self.preprocessor.width())
    }

    /// `[p(good), p(bad)]`, always summing to 1.
    pub fn predict_proba(&self, row: &FeatureRow) -> Result<[f64; 2]> {
        let x = self.preprocessor.transform(row)?;
        let p1 = self.estimator.positive_probability(&x);
        if !p1.is_finite() {
            return Err(ScoringError::InferenceError {
                message: "model produced a non-finite probability".to_string(),
            });
        }
        Ok([1.0 - p1, p1])
    }

    /// Argmax over [`predict_proba`](Self::predict_proba); ties go to class 0.
    pub fn predict(&self, row: &FeatureRow) -> Result<u8> {
        let [p0, p1] = self.predict_proba(row)?;
        Ok(if p1 > p0 { 1 } else { 0 })
    }
}
