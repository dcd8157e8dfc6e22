use serde::{Serialize, Deserialize};

/// Ceiling used for any dataset id that is not in the catalog.
pub const DEFAULT_CEILING: f64 = 0.95;

/// Sample count assumed for datasets the playground knows nothing about.
pub const DEFAULT_SAMPLE_COUNT: usize = 1000;

/// What kind of learning problem a dataset poses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    ImageClassification,
    TabularClassification,
    Regression,
}

impl TaskKind {
    pub fn label(self) -> &'static str {
        match self {
            TaskKind::ImageClassification   => "Image Classification",
            TaskKind::TabularClassification => "Tabular Classification",
            TaskKind::Regression            => "Regression",
        }
    }
}

/// One entry of the built-in dataset picker.
///
/// `ceiling` is the accuracy the simulated curve saturates towards; harder
/// datasets get lower ceilings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetInfo {
    pub id:          &'static str,
    pub name:        &'static str,
    pub description: &'static str,
    pub samples:     usize,
    pub features:    usize,
    /// Width of the output head: class count, or 1 for regression.
    pub outputs:     usize,
    pub kind:        TaskKind,
    pub ceiling:     f64,
}

static CATALOG: [DatasetInfo; 4] = [
    DatasetInfo {
        id:          "mnist",
        name:        "MNIST",
        description: "Handwritten digit recognition dataset with 70,000 examples",
        samples:     70_000,
        features:    784,
        outputs:     10,
        kind:        TaskKind::ImageClassification,
        ceiling:     0.98,
    },
    DatasetInfo {
        id:          "iris",
        name:        "Iris",
        description: "Classic dataset of flower measurements for species classification",
        samples:     150,
        features:    4,
        outputs:     3,
        kind:        TaskKind::TabularClassification,
        ceiling:     0.99,
    },
    DatasetInfo {
        id:          "boston",
        name:        "Boston Housing",
        description: "Housing price regression dataset with 506 examples",
        samples:     506,
        features:    13,
        outputs:     1,
        kind:        TaskKind::Regression,
        ceiling:     0.92,
    },
    DatasetInfo {
        id:          "cifar",
        name:        "CIFAR-10",
        description: "Image classification with 10 classes and 60,000 examples",
        samples:     60_000,
        features:    3072,
        outputs:     10,
        kind:        TaskKind::ImageClassification,
        ceiling:     0.85,
    },
];

/// Every dataset offered by the picker, in display order.
pub fn all() -> &'static [DatasetInfo] {
    &CATALOG
}

/// Looks up a catalog entry by exact id.
pub fn find(id: &str) -> Option<&'static DatasetInfo> {
    CATALOG.iter().find(|d| d.id == id)
}

/// Maximum achievable accuracy for `dataset_id`.
///
/// Unknown and empty ids are not an error; they fall back to
/// [`DEFAULT_CEILING`].
pub fn ceiling_for(dataset_id: &str) -> f64 {
    find(dataset_id).map(|d| d.ceiling).unwrap_or(DEFAULT_CEILING)
}

/// Number of rows in `dataset_id`.
///
/// Covers a couple of uploaded-dataset ids (`titanic`, `credit_risk`) that are
/// not in the picker but still need split statistics.
pub fn sample_count(dataset_id: &str) -> usize {
    match dataset_id {
        "titanic"     => 891,
        "credit_risk" => 1000,
        other => find(other).map(|d| d.samples).unwrap_or(DEFAULT_SAMPLE_COUNT),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ceilings_match_table() {
        assert_eq!(ceiling_for("mnist"), 0.98);
        assert_eq!(ceiling_for("iris"), 0.99);
        assert_eq!(ceiling_for("boston"), 0.92);
        assert_eq!(ceiling_for("cifar"), 0.85);
    }

    #[test]
    fn unknown_and_empty_ids_use_default_ceiling() {
        assert_eq!(ceiling_for("xyz"), DEFAULT_CEILING);
        assert_eq!(ceiling_for(""), DEFAULT_CEILING);
        // Lookup is exact; no case folding.
        assert_eq!(ceiling_for("MNIST"), DEFAULT_CEILING);
    }

    #[test]
    fn every_ceiling_is_in_unit_interval() {
        for d in all() {
            assert!(d.ceiling > 0.0 && d.ceiling <= 1.0, "{} ceiling out of range", d.id);
        }
    }

    #[test]
    fn sample_counts_cover_extra_ids() {
        assert_eq!(sample_count("mnist"), 70_000);
        assert_eq!(sample_count("titanic"), 891);
        assert_eq!(sample_count("credit_risk"), 1000);
        assert_eq!(sample_count("nope"), DEFAULT_SAMPLE_COUNT);
    }
}
