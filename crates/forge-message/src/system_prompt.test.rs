use super::*;

#[test]
fn concatenates_all_present_sections_in_order() {
    let parts = SystemPromptParts { static_prompt: "You are an engineer.", role_prompt: "Act as a reviewer." };
    let workspace = WorkspaceMetadata {
        root_paths: vec!["/repo".to_string()],
        git_status_summary: "clean".to_string(),
    };
    let rendered = build_system_prompt(&parts, &workspace, Some("Resume: finish the migration."));

    let static_pos = rendered.find("You are an engineer.").unwrap();
    let role_pos = rendered.find("Act as a reviewer.").unwrap();
    let workspace_pos = rendered.find("Workspace roots: /repo").unwrap();
    let handoff_pos = rendered.find("Resume: finish the migration.").unwrap();
    assert!(static_pos < role_pos && role_pos < workspace_pos && workspace_pos < handoff_pos);
}

#[test]
fn omits_sections_that_are_empty_or_absent() {
    let parts = SystemPromptParts { static_prompt: "Base prompt.", role_prompt: "" };
    let workspace = WorkspaceMetadata::default();
    let rendered = build_system_prompt(&parts, &workspace, None);
    assert_eq!(rendered, "Base prompt.");
}
