use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::{SimError, SimResult};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A dataset offered on one algorithm's page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlgorithmDataset {
    pub id:          &'static str,
    pub name:        &'static str,
    pub description: &'static str,
    pub features:    usize,
    pub samples:     usize,
    /// Image datasets describe their input shape instead of a feature count.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shape:       Option<&'static str>,
}

/// Control type and bounds of one tunable parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ParamKind {
    Range { min: f64, max: f64, step: f64, default: f64 },
    Choice { options: &'static [&'static str], default: &'static str },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParamSpec {
    pub key:   &'static str,
    pub label: &'static str,
    #[serde(flatten)]
    pub kind:  ParamKind,
}

/// A resolved parameter value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    Number(f64),
    Choice(&'static str),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlgorithmInfo {
    pub id:              &'static str,
    pub name:            &'static str,
    pub category:        &'static str,
    pub complexity:      &'static str,
    pub default_dataset: &'static str,
    pub datasets:        &'static [AlgorithmDataset],
    pub params:          &'static [ParamSpec],
}

// ---------------------------------------------------------------------------
// Parameter resolution
// ---------------------------------------------------------------------------

impl ParamSpec {
    pub fn default_value(&self) -> ParamValue {
        match self.kind {
            ParamKind::Range { default, .. } => ParamValue::Number(default),
            ParamKind::Choice { default, .. } => ParamValue::Choice(default),
        }
    }

    /// Parses `raw` against this parameter's bounds or options. `None` gives
    /// the default. Choices match case-insensitively.
    pub fn resolve(&self, raw: Option<&str>) -> SimResult<ParamValue> {
        let raw = match raw.map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => raw,
            None => return Ok(self.default_value()),
        };
        match self.kind {
            ParamKind::Range { min, max, .. } => {
                let v: f64 = raw
                    .parse()
                    .map_err(|_| SimError::invalid(format!("{}: '{}' is not a number", self.key, raw)))?;
                if !(min..=max).contains(&v) {
                    return Err(SimError::invalid(format!(
                        "{} must be in [{}, {}], got {}",
                        self.key, min, max, v
                    )));
                }
                Ok(ParamValue::Number(v))
            }
            ParamKind::Choice { options, .. } => options
                .iter()
                .find(|o| o.eq_ignore_ascii_case(raw))
                .map(|o| ParamValue::Choice(*o))
                .ok_or_else(|| {
                    SimError::invalid(format!("{}: '{}' is not one of {}", self.key, raw, options.join(", ")))
                }),
        }
    }
}

impl AlgorithmInfo {
    pub fn dataset(&self, id: &str) -> Option<&AlgorithmDataset> {
        self.datasets.iter().find(|d| d.id == id)
    }

    pub fn defaults(&self) -> BTreeMap<&'static str, ParamValue> {
        self.params.iter().map(|p| (p.key, p.default_value())).collect()
    }

    /// Resolves every parameter through `lookup`, falling back to defaults
    /// for keys it does not supply. Unknown keys are ignored.
    pub fn resolve<'a, F>(&self, lookup: F) -> SimResult<BTreeMap<&'static str, ParamValue>>
    where
        F: Fn(&str) -> Option<&'a str>,
    {
        self.params
            .iter()
            .map(|p| p.resolve(lookup(p.key)).map(|v| (p.key, v)))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

const fn ds(
    id: &'static str,
    name: &'static str,
    description: &'static str,
    features: usize,
    samples: usize,
) -> AlgorithmDataset {
    AlgorithmDataset { id, name, description, features, samples, shape: None }
}

const fn range(key: &'static str, label: &'static str, min: f64, max: f64, step: f64, default: f64) -> ParamSpec {
    ParamSpec { key, label, kind: ParamKind::Range { min, max, step, default } }
}

const fn choice(
    key: &'static str,
    label: &'static str,
    options: &'static [&'static str],
    default: &'static str,
) -> ParamSpec {
    ParamSpec { key, label, kind: ParamKind::Choice { options, default } }
}

const IRIS: AlgorithmDataset = ds("iris", "Iris", "Iris flower classification", 4, 150);
const BREAST_CANCER: AlgorithmDataset =
    ds("breast_cancer", "Breast Cancer", "Cancer diagnosis classification", 30, 569);
const MOONS: AlgorithmDataset = ds("moons", "Moons", "Two interleaving half circles", 2, 1000);

static ALGORITHMS: [AlgorithmInfo; 6] = [
    AlgorithmInfo {
        id:              "linear-regression",
        name:            "Linear Regression",
        category:        "Regression",
        complexity:      "Low",
        default_dataset: "boston",
        datasets: &[
            ds("boston", "Boston Housing", "Predict house prices in Boston", 13, 506),
            ds("california", "California Housing", "House prices in California districts", 8, 20640),
            ds("diabetes", "Diabetes", "Progression of diabetes", 10, 442),
        ],
        params: &[
            range("learning_rate", "Learning Rate", 0.001, 1.0, 0.001, 0.01),
            range("epochs", "Epochs", 10.0, 500.0, 10.0, 100.0),
            range("regularization", "Regularization", 0.0, 1.0, 0.01, 0.0),
        ],
    },
    AlgorithmInfo {
        id:              "logistic-regression",
        name:            "Logistic Regression",
        category:        "Classification",
        complexity:      "Low",
        default_dataset: "iris",
        datasets: &[IRIS, BREAST_CANCER, MOONS],
        params: &[
            range("learning_rate", "Learning Rate", 0.001, 1.0, 0.001, 0.01),
            range("epochs", "Epochs", 10.0, 500.0, 10.0, 100.0),
            range("regularization", "Regularization", 0.0, 2.0, 0.1, 0.1),
            choice("penalty", "Penalty", &["l1", "l2", "elasticnet", "none"], "l2"),
        ],
    },
    AlgorithmInfo {
        id:              "decision-tree",
        name:            "Decision Tree",
        category:        "Classification/Regression",
        complexity:      "Medium",
        default_dataset: "titanic",
        datasets: &[
            ds("titanic", "Titanic", "Survival prediction dataset", 10, 891),
            IRIS,
            ds("wine", "Wine", "Wine classification dataset", 13, 178),
        ],
        params: &[
            range("max_depth", "Max Depth", 1.0, 20.0, 1.0, 3.0),
            range("min_samples_split", "Min Samples Split", 2.0, 20.0, 1.0, 2.0),
            choice("criterion", "Criterion", &["gini", "entropy"], "gini"),
        ],
    },
    AlgorithmInfo {
        id:              "k-nn",
        name:            "k-Nearest Neighbors",
        category:        "Classification/Regression",
        complexity:      "Low",
        default_dataset: "iris",
        datasets: &[
            IRIS,
            BREAST_CANCER,
            ds("digits", "Digits", "Handwritten digits", 64, 1797),
        ],
        params: &[
            range("n_neighbors", "Number of Neighbors", 1.0, 20.0, 1.0, 5.0),
            choice("weights", "Weights", &["uniform", "distance"], "uniform"),
            choice("metric", "Distance Metric", &["euclidean", "manhattan", "minkowski"], "euclidean"),
        ],
    },
    AlgorithmInfo {
        id:              "svm",
        name:            "Support Vector Machine",
        category:        "Classification",
        complexity:      "Medium",
        default_dataset: "moons",
        datasets: &[MOONS, BREAST_CANCER, IRIS],
        params: &[
            range("c", "C (Regularization)", 0.01, 10.0, 0.01, 1.0),
            choice("kernel", "Kernel", &["linear", "rbf", "poly", "sigmoid"], "rbf"),
            range("gamma", "Gamma", 0.001, 1.0, 0.001, 0.1),
        ],
    },
    AlgorithmInfo {
        id:              "neural-network",
        name:            "Neural Network",
        category:        "Classification/Regression",
        complexity:      "High",
        default_dataset: "mnist",
        datasets: &[
            AlgorithmDataset {
                shape: Some("28x28 images"),
                ..ds("mnist", "MNIST", "Handwritten digit recognition", 784, 70000)
            },
            AlgorithmDataset {
                shape: Some("28x28 images"),
                ..ds("fashion_mnist", "Fashion MNIST", "Clothing item classification", 784, 70000)
            },
            AlgorithmDataset {
                shape: Some("32x32 color images"),
                ..ds("cifar10", "CIFAR-10", "Object recognition in images", 3072, 60000)
            },
        ],
        params: &[
            range("learning_rate", "Learning Rate", 0.0001, 0.1, 0.0001, 0.001),
            range("epochs", "Epochs", 5.0, 100.0, 1.0, 50.0),
            range("hidden_layers", "Hidden Layers", 1.0, 5.0, 1.0, 2.0),
            range("neurons_per_layer", "Neurons per Layer", 4.0, 128.0, 4.0, 16.0),
            range("batch_size", "Batch Size", 8.0, 128.0, 8.0, 32.0),
            choice("activation", "Activation Function", &["relu", "sigmoid", "tanh", "leaky_relu"], "relu"),
            choice("optimizer", "Optimizer", &["sgd", "adam", "rmsprop", "adagrad"], "adam"),
        ],
    },
];

/// Every algorithm page, in menu order.
pub fn algorithms() -> &'static [AlgorithmInfo] {
    &ALGORITHMS
}

/// # Errors
/// `InvalidArgument` for an id that is not in the catalog.
pub fn find_algorithm(id: &str) -> SimResult<&'static AlgorithmInfo> {
    ALGORITHMS
        .iter()
        .find(|a| a.id == id)
        .ok_or_else(|| SimError::invalid(format!("unknown algorithm '{}'", id)))
}
