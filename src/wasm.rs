//! WASM bindings for texdocx
//!
//! Exposes the filter to JavaScript hosts that already hold Pandoc JSON,
//! e.g. a pandoc-wasm build running in the browser.

use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use crate::config::FilterOptions;

/// Filter result handed back to JavaScript
#[derive(Serialize, Deserialize)]
pub struct FilterResultJs {
    /// The filtered Pandoc JSON
    pub output: String,
    /// Whether filtering succeeded
    pub success: bool,
    /// Error message if filtering failed
    pub error: Option<String>,
    /// Warnings collected while filtering
    pub warnings: Vec<String>,
}

impl FilterResultJs {
    fn failure(message: String) -> Self {
        Self {
            output: String::new(),
            success: false,
            error: Some(message),
            warnings: vec![],
        }
    }
}

/// Safely serialize a value to JsValue, returning an error object on failure.
fn to_js_value<T: Serialize>(value: &T) -> JsValue {
    serde_wasm_bindgen::to_value(value).unwrap_or_else(|e| {
        let error_obj = FilterResultJs::failure(format!("Serialization error: {}", e));
        serde_wasm_bindgen::to_value(&error_obj).unwrap_or(JsValue::NULL)
    })
}

/// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Filter a Pandoc JSON document
///
/// # Arguments
/// * `input` - Pandoc JSON, as produced by `pandoc -t json`
/// * `options` - `FilterOptions` fields; missing or `undefined` keeps defaults
///
/// # Returns
/// `{ output, success, error, warnings }`
#[wasm_bindgen(js_name = "filterDocument")]
pub fn filter_document(input: &str, options: JsValue) -> JsValue {
    let options: FilterOptions = if options.is_undefined() || options.is_null() {
        FilterOptions::default()
    } else {
        match serde_wasm_bindgen::from_value(options) {
            Ok(options) => options,
            Err(e) => {
                return to_js_value(&FilterResultJs::failure(format!(
                    "Invalid options: {}",
                    e
                )))
            }
        }
    };

    let result = crate::filter_json(input, options).and_then(|output| {
        let json = output.to_json()?;
        Ok((json, output.warnings))
    });
    let js_result = match result {
        Ok((output, warnings)) => FilterResultJs {
            output,
            success: true,
            error: None,
            warnings: warnings.iter().map(|w| w.to_string()).collect(),
        },
        Err(e) => FilterResultJs::failure(e.to_string()),
    };
    to_js_value(&js_result)
}

/// Default options as a JavaScript object
#[wasm_bindgen(js_name = "defaultOptions")]
pub fn default_options() -> JsValue {
    to_js_value(&FilterOptions::default())
}
