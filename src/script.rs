//! Page-context JavaScript for hosts that run the selector inside a live tab
//! (a browser extension, a webview's `eval`, a CDP session).

use serde::Serialize;
use thiserror::Error;

use crate::config::SelectorOptions;
use crate::popup::{Popup, RunError};

/// Async arrow function taking `(desiredSections, options)`.
pub const SELECT_SECTIONS_SCRIPT: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/scripts/select_sections.js"
));

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error(transparent)]
    Refused(#[from] RunError),
    #[error("failed to encode script arguments: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ScriptOptions<'a> {
    container: &'a str,
    checkbox: &'a str,
    delay_ms: u64,
}

/// Renders a self-invoking expression that selects `codes` in the page it is
/// evaluated in. Arguments are embedded as JSON so codes cannot break out of
/// the string literal.
pub fn injection_script(codes: &[String], options: &SelectorOptions) -> Result<String, ScriptError> {
    let args = serde_json::to_string(codes)?;
    let opts = serde_json::to_string(&ScriptOptions {
        container: &options.container,
        checkbox: &options.checkbox,
        delay_ms: options.delay_ms,
    })?;
    Ok(format!(
        "({})({}, {});",
        SELECT_SECTIONS_SCRIPT.trim_end(),
        args,
        opts
    ))
}

/// Script for the popup's current codes. Refuses an empty list the same way
/// the run trigger does, so nothing gets injected.
pub fn popup_script(popup: &Popup) -> Result<String, ScriptError> {
    let codes = popup.runnable_codes()?;
    injection_script(&codes, popup.selector())
}
