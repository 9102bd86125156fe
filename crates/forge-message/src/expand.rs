//! Bounded inline expansion of pinned `context_items` (§4.2, §4.3
//! "Expansion is bounded").

use async_trait::async_trait;

use forge_context::estimate_tokens_str;
use forge_protocol::ContextItem;

/// Per-item ceiling on an expanded context item's token cost. Chosen
/// so a handful of pinned files can't alone blow the assembled
/// request's budget; truncated items are marked rather than dropped
/// so the model still sees which file it asked about.
pub const MAX_EXPANSION_TOKENS_PER_ITEM: u32 = 4_000;

/// Seam to the workspace: this crate reads only the thread store (C1),
/// per the component dependency ordering (§2), so reading the actual
/// file content is left to whatever the caller wires in (normally a
/// thin adapter over C8).
#[async_trait]
pub trait ContextExpander: Send + Sync {
    async fn expand(&self, item: &ContextItem) -> Result<String, String>;
}

/// Result of expanding one context item: either its (possibly
/// truncated) content, or an inline error marker substituted in its
/// place (§4.2 "non-fatal").
pub struct ExpandedItem {
    pub path: String,
    pub text: String,
    pub truncated: bool,
    pub missing: bool,
}

fn truncate_to_budget(content: &str, max_tokens: u32) -> (String, bool) {
    if estimate_tokens_str(content) <= max_tokens {
        return (content.to_string(), false);
    }
    let max_chars = (max_tokens as usize) * 4;
    let mut end = max_chars.min(content.len());
    while end > 0 && !content.is_char_boundary(end) {
        end -= 1;
    }
    (format!("{}\n[... truncated, {} tokens omitted ...]", &content[..end], estimate_tokens_str(content) - max_tokens), true)
}

/// Expand every pinned context item via `expander`, bounding each to
/// [`MAX_EXPANSION_TOKENS_PER_ITEM`]. Missing items become an inline
/// error marker instead of failing the assembly.
pub async fn expand_all(items: &[ContextItem], expander: &dyn ContextExpander) -> Vec<ExpandedItem> {
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        match expander.expand(item).await {
            Ok(content) => {
                let (text, truncated) = truncate_to_budget(&content, MAX_EXPANSION_TOKENS_PER_ITEM);
                out.push(ExpandedItem { path: item.path.clone(), text, truncated, missing: false });
            }
            Err(reason) => {
                out.push(ExpandedItem {
                    path: item.path.clone(),
                    text: format!("[error: could not read {}: {reason}]", item.path),
                    truncated: false,
                    missing: true,
                });
            }
        }
    }
    out
}

/// Render expanded items into the block injected inline with the
/// latest user message (§4.2).
pub fn render_expanded_items(items: &[ExpandedItem]) -> String {
    let mut out = String::new();
    for item in items {
        out.push_str(&format!("--- {} ---\n{}\n", item.path, item.text));
    }
    out
}

#[cfg(test)]
#[path = "expand.test.rs"]
mod tests;
