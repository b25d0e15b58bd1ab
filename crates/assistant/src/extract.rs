//! JSON function-call extraction from free-text model output.
//!
//! The instruction prompt tells the model to request lookups as a JSON
//! object with exactly two top-level keys, `function_name` and `args`,
//! optionally wrapped in prose. Extraction takes the greedy span from the
//! FIRST `{` to the LAST `}` in the text. Embedded braces inside the JSON
//! are therefore tolerated, but two disjoint JSON-like fragments merge into
//! one parse attempt that fails cleanly. This greedy single-match policy is
//! part of the wire contract; a stricter scanner would change which
//! responses count as calls.

use marquee_core::function::FunctionCall;

/// Scan `text` for an embedded function call.
///
/// Returns `None` for plain conversational replies: no `{…}` span, invalid
/// JSON, or an object missing either required key. `None` is not an error
/// condition.
///
/// Detection is by key *presence* only. Ill-typed values degrade rather
/// than demote the object to prose: a non-string `function_name` is
/// stringified (and then fails name resolution at dispatch), and a
/// non-mapping `args` counts as an empty mapping, consistent with the
/// permissive-argument policy.
pub fn extract_function_call(text: &str) -> Option<FunctionCall> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }

    // '{' and '}' are single-byte, so the slice bounds are char-safe.
    let span = text[start..=end].trim();

    let value: serde_json::Value = serde_json::from_str(span).ok()?;
    let object = value.as_object()?;

    let name = object.get("function_name")?;
    let args = object.get("args")?;

    let function_name = match name.as_str() {
        Some(s) => s.to_string(),
        None => name.to_string(),
    };

    Some(FunctionCall {
        function_name,
        args: args.as_object().cloned().unwrap_or_default(),
    })
}
