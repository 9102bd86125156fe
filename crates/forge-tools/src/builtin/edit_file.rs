//! `edit_file` (§4.5, grounded in the teacher's anchored-replace
//! `Edit`): replaces one occurrence (or all, with `replace_all`) of an
//! exact `old_string` anchor with `new_string`. Errors if the anchor is
//! missing, or ambiguous without `replace_all`.

use async_trait::async_trait;
use forge_protocol::ApprovalClass;
use forge_protocol::ChangeType;
use forge_protocol::ConcurrencyClass;
use forge_protocol::MutationKind;
use forge_protocol::ToolDescriptor;
use serde_json::json;
use serde_json::Value;
use similar::ChangeTag;
use similar::TextDiff;
use snafu::ResultExt;

use crate::error::HandlerFailedSnafu;
use crate::error::Result;
use crate::error::WorkspaceSnafu;
use crate::tool::FileMutation;
use crate::tool::ToolCallContext;
use crate::tool::ToolHandler;
use crate::tool::ToolOutcome;
use crate::tool::ToolPreview;

fn diff_stat(before: &str, after: &str) -> (u32, u32) {
    let diff = TextDiff::from_lines(before, after);
    let mut added = 0u32;
    let mut removed = 0u32;
    for change in diff.iter_all_changes() {
        match change.tag() {
            ChangeTag::Insert => added += 1,
            ChangeTag::Delete => removed += 1,
            ChangeTag::Equal => {}
        }
    }
    (added, removed)
}

pub struct EditFileTool {
    descriptor: ToolDescriptor,
}

impl EditFileTool {
    pub fn new() -> Self {
        Self {
            descriptor: ToolDescriptor {
                name: "edit_file".to_string(),
                description: "Replace an exact anchor string (`old_string`) with `new_string` in a file. Fails if the anchor is absent, or appears more than once without `replace_all`.".to_string(),
                parameters_schema: json!({
                    "type": "object",
                    "properties": {
                        "path": { "type": "string" },
                        "old_string": { "type": "string" },
                        "new_string": { "type": "string" },
                        "replace_all": { "type": "boolean" },
                    },
                    "required": ["path", "old_string", "new_string"],
                }),
                approval_class: ApprovalClass::Edits,
                mutation_kind: MutationKind::Mutating,
                concurrency_class: ConcurrencyClass::TargetExclusive,
            },
        }
    }
}

impl Default for EditFileTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ToolHandler for EditFileTool {
    fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    fn target_path(&self, params: &Value) -> Option<String> {
        params.get("path").and_then(Value::as_str).map(String::from)
    }

    async fn preview(&self, params: &Value, ctx: &ToolCallContext<'_>) -> Result<Option<ToolPreview>> {
        let path = params["path"].as_str().unwrap_or_default();
        let old_string = params["old_string"].as_str().unwrap_or_default();
        let new_string = params["new_string"].as_str().unwrap_or_default();
        let replace_all = params.get("replace_all").and_then(Value::as_bool).unwrap_or(false);

        let content = ctx.workspace.read_text(path).await.context(WorkspaceSnafu)?;
        let occurrences = content.matches(old_string).count();
        if occurrences == 0 || (occurrences > 1 && !replace_all) {
            // Surfaced as a normal execution failure once the call actually
            // runs; the preview just declines to render a diff for it.
            return Ok(None);
        }
        let new_content = if replace_all {
            content.replace(old_string, new_string)
        } else {
            content.replacen(old_string, new_string, 1)
        };
        let (added, removed) = diff_stat(&content, &new_content);
        Ok(Some(ToolPreview {
            change_type: ChangeType::Modify,
            new_content: Some(new_content),
            lines_added: added,
            lines_removed: removed,
        }))
    }

    async fn execute(&self, params: Value, ctx: &ToolCallContext<'_>) -> Result<ToolOutcome> {
        let path = params["path"].as_str().unwrap_or_default();
        let old_string = params["old_string"].as_str().unwrap_or_default();
        let new_string = params["new_string"].as_str().unwrap_or_default();
        let replace_all = params.get("replace_all").and_then(Value::as_bool).unwrap_or(false);

        let content = ctx.workspace.read_text(path).await.context(WorkspaceSnafu)?;
        let occurrences = content.matches(old_string).count();

        if occurrences == 0 {
            return HandlerFailedSnafu {
                name: self.descriptor.name.clone(),
                message: format!("anchor not found in {path}"),
            }
            .fail();
        }
        if occurrences > 1 && !replace_all {
            return HandlerFailedSnafu {
                name: self.descriptor.name.clone(),
                message: format!("anchor is ambiguous in {path}: {occurrences} occurrences, pass replace_all to replace them all"),
            }
            .fail();
        }

        let new_content = if replace_all {
            content.replace(old_string, new_string)
        } else {
            content.replacen(old_string, new_string, 1)
        };

        ctx.workspace.write_text(path, &new_content).await.context(WorkspaceSnafu)?;
        let (added, removed) = diff_stat(&content, &new_content);

        let mutation = FileMutation {
            path: path.to_string(),
            change_type: ChangeType::Modify,
            new_content: Some(new_content),
        };
        Ok(ToolOutcome::text(format!("replaced {occurrences} occurrence(s) in {path}: +{added} -{removed} lines"))
            .with_mutation(mutation))
    }
}

#[cfg(test)]
#[path = "edit_file.test.rs"]
mod tests;
