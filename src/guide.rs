//! Catalogue operations exposed to the page's own scripts.
//!
//! Filtering, search and comparison are not implemented yet; every call is
//! logged and kept in the instance's history so callers can be wired up
//! ahead of the real logic.

use log::info;
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

/// One recorded call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum GuideRequest {
    Filter { category: String },
    Search { query: String },
    Compare { first: String, second: String },
}

impl GuideRequest {
    pub fn describe(&self) -> String {
        match self {
            GuideRequest::Filter { category } => format!("Фильтрация по категории: {}", category),
            GuideRequest::Search { query } => format!("Поиск: {}", query),
            GuideRequest::Compare { first, second } => format!("Сравнение: {} vs {}", first, second),
        }
    }
}

#[wasm_bindgen]
#[derive(Debug, Default)]
pub struct PcGuide {
    history: Vec<GuideRequest>,
}

#[wasm_bindgen]
impl PcGuide {
    #[wasm_bindgen(constructor)]
    pub fn new() -> PcGuide {
        PcGuide {
            history: Vec::new(),
        }
    }

    #[wasm_bindgen(js_name = filterComponents)]
    pub fn filter_components(&mut self, category: &str) {
        self.record(GuideRequest::Filter {
            category: category.to_string(),
        });
    }

    #[wasm_bindgen(js_name = searchComponents)]
    pub fn search_components(&mut self, query: &str) {
        self.record(GuideRequest::Search {
            query: query.to_string(),
        });
    }

    #[wasm_bindgen(js_name = compareComponents)]
    pub fn compare_components(&mut self, first: &str, second: &str) {
        self.record(GuideRequest::Compare {
            first: first.to_string(),
            second: second.to_string(),
        });
    }

    /// Recorded calls as an array of plain objects
    #[wasm_bindgen(js_name = history)]
    pub fn history_js(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.history)
            .map_err(|e| JsValue::from_str(&format!("Failed to serialize history: {:?}", e)))
    }

    #[wasm_bindgen(js_name = historyJson)]
    pub fn history_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.history)
            .map_err(|e| JsValue::from_str(&format!("Failed to serialize history: {}", e)))
    }
}

impl PcGuide {
    pub fn history(&self) -> &[GuideRequest] {
        &self.history
    }

    fn record(&mut self, request: GuideRequest) {
        info!("{}", request.describe());
        self.history.push(request);
    }
}
