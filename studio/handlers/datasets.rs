use serde::Serialize;

use playrithm::dataset::{catalog, DatasetInfo, DatasetSplit, DEFAULT_TRAIN_RATIO};

use crate::routes::{error_response, json_response, HttpResponse};
use crate::util::form::FormFields;

#[derive(Serialize)]
struct DatasetEntry<'a> {
    #[serde(flatten)]
    info: &'a DatasetInfo,
    kind_label: &'static str,
    split: DatasetSplit,
}

/// `GET /datasets`: the picker's catalog with the default 80/20 split.
pub fn handle_list() -> HttpResponse {
    let mut entries = Vec::with_capacity(catalog::all().len());
    for info in catalog::all() {
        match DatasetSplit::new(info.id, DEFAULT_TRAIN_RATIO) {
            Ok(split) => entries.push(DatasetEntry { info, kind_label: info.kind.label(), split }),
            Err(e) => return error_response(&e),
        }
    }
    json_response(200, &entries)
}

/// `GET /datasets/split?id=<id>&ratio=<0..1>`
pub fn handle_split(query: &FormFields) -> HttpResponse {
    let id = query.get("id").unwrap_or("");
    let ratio = match query.parse_opt::<f64>("ratio") {
        Ok(r) => r.unwrap_or(DEFAULT_TRAIN_RATIO),
        Err(e) => return error_response(&e),
    };
    match DatasetSplit::new(id, ratio) {
        Ok(split) => {
            let (train_pct, test_pct) = split.percentages();
            json_response(200, &serde_json::json!({
                "id": id,
                "split": split,
                "train_percent": train_pct,
                "test_percent": test_pct,
            }))
        }
        Err(e) => error_response(&e),
    }
}
