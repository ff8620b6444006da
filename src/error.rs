use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Error, Debug)]
pub enum SiteError {
    #[error("browser global `{0}` is not available")]
    MissingGlobal(&'static str),

    #[error("element `{0}` not found")]
    MissingElement(String),

    #[error("element `{selector}` is not a {expected}")]
    WrongElementType {
        selector: String,
        expected: &'static str,
    },

    #[error("DOM call failed: {0}")]
    Dom(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<JsValue> for SiteError {
    fn from(value: JsValue) -> Self {
        SiteError::Dom(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
    }
}

pub type Result<T> = std::result::Result<T, SiteError>;
