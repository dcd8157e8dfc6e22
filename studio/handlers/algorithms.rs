use playrithm::{algorithm_comparison, SimError};
use playrithm::metrics::comparison::best_by_accuracy;
use playrithm::model::algorithms::{algorithms, find_algorithm};

use crate::routes::{error_response, json_response, HttpResponse};
use crate::util::form::FormFields;

/// `GET /algorithms`
pub fn handle_get() -> HttpResponse {
    let results = algorithm_comparison();
    json_response(200, &serde_json::json!({
        "results": results,
        "best": best_by_accuracy(results).map(|r| r.name),
    }))
}

/// `GET /algorithms/catalog`: every algorithm page with its datasets and
/// parameter controls.
pub fn handle_catalog() -> HttpResponse {
    json_response(200, &serde_json::json!({ "algorithms": algorithms() }))
}

/// `GET /algorithms/params?id=k-nn&n_neighbors=7`
///
/// Resolves the query against the algorithm's controls; missing values
/// take their defaults. An unknown `dataset` is rejected.
pub fn handle_params(query: &FormFields) -> HttpResponse {
    let result = find_algorithm(query.get("id").unwrap_or_default()).and_then(|algo| {
        let dataset_id = query.get("dataset").unwrap_or(algo.default_dataset);
        let dataset = algo.dataset(dataset_id).ok_or_else(|| {
            SimError::InvalidArgument(format!(
                "dataset '{}' is not offered for {}",
                dataset_id, algo.name
            ))
        })?;
        let params = algo.resolve(|key| query.get(key))?;
        Ok(serde_json::json!({
            "algorithm": algo.id,
            "dataset": dataset,
            "params": params,
        }))
    });
    match result {
        Ok(body) => json_response(200, &body),
        Err(e) => error_response(&e),
    }
}
