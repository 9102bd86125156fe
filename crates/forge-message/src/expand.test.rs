use super::*;

struct StubExpander {
    content: std::collections::HashMap<String, Result<String, String>>,
}

#[async_trait::async_trait]
impl ContextExpander for StubExpander {
    async fn expand(&self, item: &ContextItem) -> Result<String, String> {
        self.content.get(&item.path).cloned().unwrap_or_else(|| Err("no stub registered".to_string()))
    }
}

fn item(path: &str) -> ContextItem {
    ContextItem { id: format!("c_{path}"), path: path.to_string() }
}

#[tokio::test]
async fn small_files_are_expanded_untouched() {
    let mut content = std::collections::HashMap::new();
    content.insert("a.rs".to_string(), Ok("fn main() {}".to_string()));
    let expander = StubExpander { content };

    let expanded = expand_all(&[item("a.rs")], &expander).await;
    assert_eq!(expanded.len(), 1);
    assert!(!expanded[0].truncated);
    assert!(!expanded[0].missing);
    assert_eq!(expanded[0].text, "fn main() {}");
}

#[tokio::test]
async fn oversized_files_are_truncated_with_a_marker() {
    let big = "x".repeat((MAX_EXPANSION_TOKENS_PER_ITEM as usize + 100) * 4);
    let mut content = std::collections::HashMap::new();
    content.insert("big.log".to_string(), Ok(big));
    let expander = StubExpander { content };

    let expanded = expand_all(&[item("big.log")], &expander).await;
    assert!(expanded[0].truncated);
    assert!(expanded[0].text.contains("truncated"));
}

#[tokio::test]
async fn unreadable_files_become_an_inline_error_marker() {
    let mut content = std::collections::HashMap::new();
    content.insert("gone.rs".to_string(), Err("not found".to_string()));
    let expander = StubExpander { content };

    let expanded = expand_all(&[item("gone.rs")], &expander).await;
    assert!(expanded[0].missing);
    assert!(expanded[0].text.contains("error"));
}

#[test]
fn rendered_block_includes_each_items_path_header() {
    let items = vec![
        ExpandedItem { path: "a.rs".to_string(), text: "one".to_string(), truncated: false, missing: false },
        ExpandedItem { path: "b.rs".to_string(), text: "two".to_string(), truncated: false, missing: false },
    ];
    let rendered = render_expanded_items(&items);
    assert!(rendered.contains("--- a.rs ---"));
    assert!(rendered.contains("--- b.rs ---"));
}
