use rand::rngs::StdRng;
use rand::SeedableRng;

use playrithm::metrics::explain::{shap_values, waterfall, DEFAULT_BASE_VALUE};
use playrithm::SimResult;

use crate::routes::{error_response, json_response, HttpResponse};
use crate::util::form::FormFields;

/// `GET /explain?model=linear-regression&base=0.5&seed=7`
///
/// Mock SHAP attributions plus the force-plot layout built from them.
/// Passing `seed` makes the draw repeatable.
pub fn handle(query: &FormFields) -> HttpResponse {
    match explain(query) {
        Ok(body) => json_response(200, &body),
        Err(e) => error_response(&e),
    }
}

fn explain(query: &FormFields) -> SimResult<serde_json::Value> {
    let model = query.get("model").unwrap_or("neural-network");
    let base: f64 = query.parse_opt("base")?.unwrap_or(DEFAULT_BASE_VALUE);
    let mut rng = match query.parse_opt::<u64>("seed")? {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let values = shap_values(model, &mut rng);
    let steps = waterfall(base, &values)?;
    Ok(serde_json::json!({
        "model": model,
        "base_value": base,
        "features": values,
        "waterfall": steps,
    }))
}
