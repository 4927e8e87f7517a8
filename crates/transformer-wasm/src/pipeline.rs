//! Pipeline WASM bindings.
//!
//! Exposes the operator catalog and the execution engine to JavaScript.
//!
//! # Example
//!
//! ```typescript
//! import { categories, list_operators, run_pipeline } from '@transformer/wasm';
//!
//! for (const { id, label } of categories()) {
//!   const ops = list_operators(id);
//! }
//!
//! const results = run_pipeline(image, [
//!   { operator: 'gaussian_blur', params: { kernel_size: 7 } },
//!   { operator: 'canny', enabled: false },
//! ]);
//! for (const r of results) {
//!   show(r.image, r.caption, r.ok ? null : r.error);
//! }
//! ```

use crate::types::JsImage;
use serde::Serialize;
use transformer_core::{registry, Category, Invocation, OperatorResult, ParamSpec};
use wasm_bindgen::prelude::*;

/// Category listing entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryInfo {
    pub id: &'static str,
    pub label: &'static str,
}

/// Operator listing entry, including its parameter schema.
#[derive(Debug, Clone, Serialize)]
pub struct OperatorInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub caption: &'static str,
    pub category: Category,
    pub params: &'static [ParamSpec],
}

/// Outcome of one invocation, as seen from JavaScript.
///
/// A failed invocation still carries an image: the original input, so the
/// caller can show something next to the error message.
#[wasm_bindgen]
#[derive(Debug, Clone)]
pub struct JsOperatorResult {
    operator: String,
    caption: String,
    error: Option<String>,
    warnings: Vec<String>,
    image: JsImage,
}

#[wasm_bindgen]
impl JsOperatorResult {
    #[wasm_bindgen(getter)]
    pub fn operator(&self) -> String {
        self.operator.clone()
    }

    /// Caption such as "After Gaussian Blur"; empty for unknown operators.
    #[wasm_bindgen(getter)]
    pub fn caption(&self) -> String {
        self.caption.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn ok(&self) -> bool {
        self.error.is_none()
    }

    /// Error message, if the invocation failed.
    #[wasm_bindgen(getter)]
    pub fn error(&self) -> Option<String> {
        self.error.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn warnings(&self) -> Vec<String> {
        self.warnings.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn image(&self) -> JsImage {
        self.image.clone()
    }
}

impl JsOperatorResult {
    fn from_result(result: OperatorResult, original: &JsImage) -> Self {
        match result {
            Ok(rendered) => Self {
                operator: rendered.operator,
                caption: rendered.caption.to_string(),
                error: None,
                warnings: rendered.warnings,
                image: JsImage::from_image(rendered.image),
            },
            Err(err) => {
                let caption = registry()
                    .lookup(err.operator())
                    .map(|entry| entry.caption)
                    .unwrap_or_default();
                Self {
                    operator: err.operator().to_string(),
                    caption: caption.to_string(),
                    error: Some(err.to_string()),
                    warnings: Vec::new(),
                    image: original.clone(),
                }
            }
        }
    }
}

/// List categories in display order as `{ id, label }` objects.
#[wasm_bindgen]
pub fn categories() -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(&category_infos()).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// List the operators of one category, with their parameter schemas.
///
/// # Errors
///
/// Returns an error if `category` is not a known category id.
#[wasm_bindgen]
pub fn list_operators(category: &str) -> Result<JsValue, JsValue> {
    let infos = operator_infos(category).map_err(|e| JsValue::from_str(&e))?;
    serde_wasm_bindgen::to_value(&infos).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Apply each enabled invocation to `image` independently.
///
/// `invocations` is an array of `{ operator, enabled?, params? }` objects.
/// Returns one `JsOperatorResult` per enabled invocation, in order.
///
/// # Errors
///
/// Returns an error only if `invocations` cannot be deserialized; operator
/// failures are reported per result.
#[wasm_bindgen]
pub fn run_pipeline(image: &JsImage, invocations: JsValue) -> Result<js_sys::Array, JsValue> {
    let invocations: Vec<Invocation> = serde_wasm_bindgen::from_value(invocations)
        .map_err(|e| JsValue::from_str(&format!("Invalid invocations: {}", e)))?;

    Ok(run_invocations(image, &invocations)
        .into_iter()
        .map(JsValue::from)
        .collect())
}

pub(crate) fn category_infos() -> Vec<CategoryInfo> {
    Category::ALL
        .iter()
        .map(|c| CategoryInfo {
            id: c.id(),
            label: c.label(),
        })
        .collect()
}

pub(crate) fn operator_infos(category: &str) -> Result<Vec<OperatorInfo>, String> {
    let category =
        Category::from_id(category).ok_or_else(|| format!("unknown category '{}'", category))?;
    Ok(registry()
        .list_by_category(category)
        .into_iter()
        .map(|entry| OperatorInfo {
            id: entry.id,
            name: entry.name,
            caption: entry.caption,
            category: entry.category,
            params: entry.params,
        })
        .collect())
}

pub(crate) fn run_invocations(image: &JsImage, invocations: &[Invocation]) -> Vec<JsOperatorResult> {
    transformer_core::run(image.as_image(), invocations)
        .into_iter()
        .map(|result| JsOperatorResult::from_result(result, image))
        .collect()
}
