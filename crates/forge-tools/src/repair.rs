//! Deterministic repair pass for raw model-provided tool-call JSON
//! (§4.5 "tolerant of unescaped newlines and common malformations").
//!
//! Models occasionally emit arguments with literal newlines/tabs inside
//! string values, or a trailing comma before a closing brace/bracket —
//! both of which a strict JSON parser rejects. This walks the raw text
//! once, tracking string-literal state, and escapes/elides just those
//! two malformations without attempting a general-purpose JSON5 parse.

/// Escape unescaped control characters inside string literals and drop
/// trailing commas before `}`/`]`. Idempotent: repairing already-valid
/// JSON returns it unchanged.
pub fn repair_json(raw: &str) -> String {
    let chars: Vec<char> = raw.chars().collect();
    let mut out = String::with_capacity(raw.len());
    let mut in_string = false;
    let mut escaped = false;

    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if in_string {
            if escaped {
                out.push(c);
                escaped = false;
            } else {
                match c {
                    '\\' => {
                        out.push(c);
                        escaped = true;
                    }
                    '"' => {
                        in_string = false;
                        out.push(c);
                    }
                    '\n' => out.push_str("\\n"),
                    '\r' => out.push_str("\\r"),
                    '\t' => out.push_str("\\t"),
                    _ => out.push(c),
                }
            }
        } else {
            match c {
                '"' => {
                    in_string = true;
                    out.push(c);
                }
                ',' => {
                    let mut j = i + 1;
                    while j < chars.len() && chars[j].is_whitespace() {
                        j += 1;
                    }
                    if j < chars.len() && (chars[j] == '}' || chars[j] == ']') {
                        // trailing comma — drop it
                    } else {
                        out.push(c);
                    }
                }
                _ => out.push(c),
            }
        }
        i += 1;
    }
    out
}

/// Parse raw tool-call argument text, falling back to [`repair_json`]
/// once if strict parsing fails (§4.5 validation).
pub fn parse_tolerant(raw: &str) -> Result<serde_json::Value, serde_json::Error> {
    match serde_json::from_str(raw) {
        Ok(value) => Ok(value),
        Err(_) => serde_json::from_str(&repair_json(raw)),
    }
}

#[cfg(test)]
#[path = "repair.test.rs"]
mod tests;
