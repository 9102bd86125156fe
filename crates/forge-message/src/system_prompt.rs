//! Builds the single `system` message at position 0 of an assembled
//! request (§4.2): static prompt + active role prompt + workspace
//! metadata + optional handoff block, concatenated in that order.

/// Workspace facts surfaced to the model, assembled by the caller from
/// C8 — this crate has no filesystem access of its own (§2 leaves-
/// first ordering: C2 reads only C1).
#[derive(Debug, Clone, Default)]
pub struct WorkspaceMetadata {
    pub root_paths: Vec<String>,
    pub git_status_summary: String,
}

impl WorkspaceMetadata {
    fn render(&self) -> String {
        let mut out = String::new();
        if !self.root_paths.is_empty() {
            out.push_str(&format!("Workspace roots: {}\n", self.root_paths.join(", ")));
        }
        if !self.git_status_summary.is_empty() {
            out.push_str(&format!("Git status: {}\n", self.git_status_summary));
        }
        out
    }
}

/// The resolved static prompt for a template id plus the active role's
/// prompt, looked up by the caller (template/role storage is outside
/// this crate's scope).
pub struct SystemPromptParts<'a> {
    pub static_prompt: &'a str,
    pub role_prompt: &'a str,
}

/// Build the system message content (§4.2 "exactly one `system`
/// message at position 0").
pub fn build_system_prompt(parts: &SystemPromptParts<'_>, workspace: &WorkspaceMetadata, handoff_block: Option<&str>) -> String {
    let mut sections = Vec::new();
    if !parts.static_prompt.is_empty() {
        sections.push(parts.static_prompt.to_string());
    }
    if !parts.role_prompt.is_empty() {
        sections.push(parts.role_prompt.to_string());
    }
    let rendered_workspace = workspace.render();
    if !rendered_workspace.is_empty() {
        sections.push(rendered_workspace);
    }
    if let Some(handoff) = handoff_block {
        if !handoff.is_empty() {
            sections.push(handoff.to_string());
        }
    }
    sections.join("\n\n")
}

#[cfg(test)]
#[path = "system_prompt.test.rs"]
mod tests;
