//! Static tool registry (§4.5, §9 "static registry keyed by name").

use std::collections::HashMap;

use forge_protocol::ToolDescriptor;

use crate::error::NotFoundSnafu;
use crate::error::Result;
use crate::tool::BoxedTool;

/// Name-keyed registry of every tool the dispatcher may call.
#[derive(Default, Clone)]
pub struct ToolRegistry {
    tools: HashMap<String, BoxedTool>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, tool: BoxedTool) {
        self.tools.insert(tool.descriptor().name.clone(), tool);
    }

    pub fn get(&self, name: &str) -> Result<BoxedTool> {
        self.tools.get(name).cloned().ok_or_else(|| NotFoundSnafu { name: name.to_string() }.build())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn descriptors(&self) -> Vec<ToolDescriptor> {
        let mut descriptors: Vec<ToolDescriptor> = self.tools.values().map(|t| t.descriptor().clone()).collect();
        descriptors.sort_by(|a, b| a.name.cmp(&b.name));
        descriptors
    }
}

#[cfg(test)]
#[path = "registry.test.rs"]
mod tests;
