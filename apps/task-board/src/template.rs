//! `{{name}}` placeholder substitution for row templates.

/// Replaces every `{{name}}` in `text` with `lookup(name)`. Names without a
/// value render as an empty string. Unterminated or empty placeholders are
/// copied through unchanged.
pub fn render(text: &str, mut lookup: impl FnMut(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(open) = rest.find("{{") {
        let (before, tail) = rest.split_at(open);
        out.push_str(before);
        let body = &tail[2..];
        match body.find("}}") {
            Some(close) if close > 0 && !body[..close].contains('}') => {
                let name = &body[..close];
                if let Some(value) = lookup(name) {
                    out.push_str(&value);
                }
                rest = &body[close + 2..];
            }
            _ => {
                out.push_str("{{");
                rest = body;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Placeholder names used in `text`, in order of appearance.
pub fn placeholders(text: &str) -> Vec<&str> {
    let mut names = Vec::new();
    let mut rest = text;
    while let Some(open) = rest.find("{{") {
        let body = &rest[open + 2..];
        match body.find("}}") {
            Some(close) if close > 0 && !body[..close].contains('}') => {
                names.push(&body[..close]);
                rest = &body[close + 2..];
            }
            _ => rest = body,
        }
    }
    names
}
