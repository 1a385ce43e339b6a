/// Strips reasoning-trace markup from model output before structured parsing:
/// everything up to and including the final `</think>` tag is dropped. Traces
/// may arrive without the opening tag, so only the closing tag is anchored.
pub fn strip_reasoning_markup(text: &str) -> String {
    match text.rfind("</think>") {
        Some(index) => text[index + "</think>".len()..].to_string(),
        None => text.to_string(),
    }
}
