//! JavaScript evaluated in the rendered page

/// Reports whether the document and its images have finished loading
pub const READY_STATE_SCRIPT: &str = r#"
    (function() {
        return {
            readyState: document.readyState,
            imagesLoaded: Array.from(document.images).every(img => img.complete),
            bodyExists: document.body !== null
        };
    })()
"#;

/// Function declaration that sets one attribute on the element it is bound to
///
/// Name and value are embedded as JSON string literals, so quotes and
/// backslashes in either cannot break out of the call.
#[must_use]
pub fn set_attribute_fn(name: &str, value: &str) -> String {
    let name = serde_json::Value::from(name);
    let value = serde_json::Value::from(value);
    format!("function() {{ this.setAttribute({name}, {value}); }}")
}
