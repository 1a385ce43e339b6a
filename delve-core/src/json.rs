use serde_json::{Deserializer, Value};

use crate::DelveError;

/// Collects every complete JSON value embedded in `text`, scanning left to
/// right. At each `{` or `[` a strict parse is attempted from exactly that
/// position; on success the scan resumes past the parsed value, on failure it
/// advances one character. Prose, markdown fences and broken fragments
/// between values are skipped.
pub fn extract_json_values(text: &str) -> Vec<Value> {
    let mut values = Vec::new();
    let mut pos = 0;

    while let Some(start) = next_json_position(text, pos) {
        let mut stream = Deserializer::from_str(&text[start..]).into_iter::<Value>();
        match stream.next() {
            Some(Ok(value)) => {
                pos = start + stream.byte_offset();
                values.push(value);
            }
            // '{' and '[' are ASCII, so start + 1 is a char boundary.
            _ => pos = start + 1,
        }
    }

    values
}

/// Returns the embedded JSON value whose re-serialized form is longest: the
/// main structured payload rather than incidental small fragments that may
/// appear earlier in free-text model output.
pub fn extract_largest_json(text: &str) -> Result<Value, DelveError> {
    extract_json_values(text)
        .into_iter()
        .max_by_key(|value| value.to_string().len())
        .ok_or(DelveError::NoJsonFound)
}

fn next_json_position(text: &str, pos: usize) -> Option<usize> {
    text.get(pos..)?
        .find(['{', '['])
        .map(|offset| pos + offset)
}
