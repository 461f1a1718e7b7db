use wasm_bindgen::prelude::*;

fn to_js(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Plan a JSON job; returns the page plan as JSON.
#[wasm_bindgen]
pub fn plan_pages(json: &str) -> Result<String, JsValue> {
    let plan = crate::plan_json(json).map_err(to_js)?;
    serde_json::to_string(&plan).map_err(to_js)
}

/// Validate a JSON merge job; returns the merge report as JSON.
#[wasm_bindgen]
pub fn validate_merges(json: &str) -> Result<String, JsValue> {
    let report = crate::validate_merges_json(json).map_err(to_js)?;
    serde_json::to_string(&report).map_err(to_js)
}
