use playrithm::model::hyperparams::{
    BATCH_SIZE_RANGE, EPOCHS_RANGE, HIDDEN_LAYERS_RANGE, LEARNING_RATE_RANGE, NEURONS_RANGE,
    REGULARIZATION_RANGE,
};
use playrithm::model::{ActivationKind, OptimizerKind};

use crate::routes::{json_response, HttpResponse};
use crate::state::SharedState;

/// `GET /hyperparams/defaults`: configured defaults plus the slider bounds
/// the form should enforce.
pub fn handle_defaults(state: &SharedState) -> HttpResponse {
    let activations: Vec<&str> = ActivationKind::ALL.iter().map(|a| a.as_str()).collect();
    let optimizers: Vec<&str> = OptimizerKind::ALL.iter().map(|o| o.as_str()).collect();
    json_response(200, &serde_json::json!({
        "defaults": state.config.defaults,
        "ranges": {
            "learning_rate": LEARNING_RATE_RANGE,
            "epochs": EPOCHS_RANGE,
            "batch_size": BATCH_SIZE_RANGE,
            "hidden_layers": HIDDEN_LAYERS_RANGE,
            "neurons_per_layer": NEURONS_RANGE,
            "regularization": REGULARIZATION_RANGE,
        },
        "optimizers": optimizers,
        "activations": activations,
    }))
}
