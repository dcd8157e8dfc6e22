use rand::Rng;
use serde::Serialize;

use crate::error::{SimError, SimResult};

/// Starting point of the force plot when the caller does not pick one.
pub const DEFAULT_BASE_VALUE: f64 = 0.5;

const FEATURE_COUNT: usize = 5;

/// Simulated SHAP attribution of a single input feature.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureAttribution {
    pub feature: String,
    /// Magnitude in [0, 1).
    pub importance: f64,
    /// Signed push on the prediction, in [-1, 1).
    pub contribution: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    Base,
    Positive,
    Negative,
    Prediction,
}

/// One bar of the waterfall (force) plot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaterfallStep {
    pub feature: String,
    /// The contribution for feature bars, the absolute level otherwise.
    pub value: f64,
    /// Running total after this bar.
    pub cumulative: f64,
    /// Running total before this bar; only feature bars have one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous: Option<f64>,
    pub kind: StepKind,
}

/// Draws mock per-feature attributions for `model_type`.
///
/// Linear regression reports four features plus its bias term; every other
/// model reports five plain features.
pub fn shap_values<R: Rng>(model_type: &str, rng: &mut R) -> Vec<FeatureAttribution> {
    feature_names(model_type)
        .into_iter()
        .map(|feature| FeatureAttribution {
            feature,
            importance: rng.gen_range(-1.0_f64..1.0).abs(),
            contribution: rng.gen_range(-1.0..1.0),
        })
        .collect()
}

fn feature_names(model_type: &str) -> Vec<String> {
    let mut names: Vec<String> = (1..=FEATURE_COUNT).map(|i| format!("Feature {}", i)).collect();
    if model_type == "linear-regression" {
        if let Some(last) = names.last_mut() {
            *last = "Bias".to_owned();
        }
    }
    names
}

/// Lays out the force plot: the base value, one bar per attribution carrying
/// the running total, then the final prediction.
///
/// # Errors
/// `InvalidArgument` if `base` is not finite.
pub fn waterfall(base: f64, values: &[FeatureAttribution]) -> SimResult<Vec<WaterfallStep>> {
    if !base.is_finite() {
        return Err(SimError::invalid(format!("base value must be finite, got {}", base)));
    }

    let mut steps = Vec::with_capacity(values.len() + 2);
    steps.push(WaterfallStep {
        feature:    "Base Value".to_owned(),
        value:      base,
        cumulative: base,
        previous:   None,
        kind:       StepKind::Base,
    });

    let mut running = base;
    for attr in values {
        let previous = running;
        running += attr.contribution;
        steps.push(WaterfallStep {
            feature:    attr.feature.clone(),
            value:      attr.contribution,
            cumulative: running,
            previous:   Some(previous),
            kind:       if attr.contribution >= 0.0 { StepKind::Positive } else { StepKind::Negative },
        });
    }

    steps.push(WaterfallStep {
        feature:    "Prediction".to_owned(),
        value:      running,
        cumulative: running,
        previous:   None,
        kind:       StepKind::Prediction,
    });
    Ok(steps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn attr(feature: &str, contribution: f64) -> FeatureAttribution {
        FeatureAttribution { feature: feature.to_owned(), importance: contribution.abs(), contribution }
    }

    #[test]
    fn linear_regression_reports_bias_term() {
        let mut rng = StdRng::seed_from_u64(11);
        let names: Vec<String> = shap_values("linear-regression", &mut rng)
            .into_iter()
            .map(|a| a.feature)
            .collect();
        assert_eq!(names, vec!["Feature 1", "Feature 2", "Feature 3", "Feature 4", "Bias"]);

        let other = shap_values("neural-network", &mut rng);
        assert_eq!(other.len(), 5);
        assert_eq!(other[4].feature, "Feature 5");
    }

    #[test]
    fn attributions_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(12);
        for _ in 0..200 {
            for a in shap_values("svm", &mut rng) {
                assert!((0.0..1.0).contains(&a.importance), "{:?}", a);
                assert!((-1.0..1.0).contains(&a.contribution), "{:?}", a);
            }
        }
    }

    #[test]
    fn waterfall_accumulates_contributions() {
        let values = [attr("a", 0.25), attr("b", -0.5), attr("c", 0.0)];
        let steps = waterfall(0.5, &values).unwrap();

        assert_eq!(steps.len(), 5);
        assert_eq!(steps[0].kind, StepKind::Base);
        assert_eq!(steps[0].cumulative, 0.5);

        assert_eq!(steps[1].previous, Some(0.5));
        assert_eq!(steps[1].cumulative, 0.75);
        assert_eq!(steps[1].kind, StepKind::Positive);

        assert_eq!(steps[2].previous, Some(0.75));
        assert_eq!(steps[2].cumulative, 0.25);
        assert_eq!(steps[2].kind, StepKind::Negative);

        // Zero counts as a positive push.
        assert_eq!(steps[3].kind, StepKind::Positive);

        let last = &steps[4];
        assert_eq!(last.kind, StepKind::Prediction);
        assert_eq!(last.value, 0.25);
        assert_eq!(last.cumulative, 0.25);
    }

    #[test]
    fn empty_attributions_predict_the_base() {
        let steps = waterfall(0.3, &[]).unwrap();
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[1].value, 0.3);
    }

    #[test]
    fn non_finite_base_is_rejected() {
        assert!(matches!(waterfall(f64::NAN, &[]), Err(SimError::InvalidArgument(_))));
    }
}
