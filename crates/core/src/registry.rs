// Tool definition registry

use crate::error::{RegistryError, RegistryResult};
use crate::handlers;
use crate::types::{ToolDefinition, ToolPatch};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Thread-safe store of tool definitions keyed by name
pub struct ToolRegistry {
    tools: RwLock<HashMap<String, ToolDefinition>>,
}

impl ToolRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            tools: RwLock::new(HashMap::new()),
        }
    }

    /// Create a registry seeded with the built-in tools
    pub fn with_builtin_tools() -> Self {
        let registry = Self::new();
        {
            let mut tools = registry.write();
            for def in handlers::builtin_definitions() {
                tools.insert(def.name.clone(), def);
            }
        }
        registry
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, ToolDefinition>> {
        self.tools.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, ToolDefinition>> {
        self.tools.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a new tool definition.
    ///
    /// Checks run in order: name present, name unused, description present,
    /// input schema present. The first failing check is reported.
    pub fn register(&self, mut def: ToolDefinition) -> RegistryResult<ToolDefinition> {
        if def.name.trim().is_empty() {
            return Err(RegistryError::MissingField("name"));
        }

        let mut tools = self.write();
        if tools.contains_key(&def.name) {
            return Err(RegistryError::DuplicateName(def.name));
        }
        if def.description.trim().is_empty() {
            return Err(RegistryError::MissingField("description"));
        }
        if def.input_schema.is_none() {
            return Err(RegistryError::MissingField("input_schema"));
        }

        let now = Utc::now();
        def.created_at = now;
        def.updated_at = now;
        tools.insert(def.name.clone(), def.clone());

        tracing::info!("Registered tool {}", def.name);
        Ok(def)
    }

    /// Get a tool by name
    pub fn find(&self, name: &str) -> Option<ToolDefinition> {
        self.read().get(name).cloned()
    }

    /// Snapshot of all definitions, ordered by name
    pub fn list(&self) -> Vec<ToolDefinition> {
        let mut tools: Vec<_> = self.read().values().cloned().collect();
        tools.sort_by(|a, b| a.name.cmp(&b.name));
        tools
    }

    /// Definitions carrying the given capability tag
    pub fn by_capability(&self, tag: &str) -> Vec<ToolDefinition> {
        let mut tools: Vec<_> = self
            .read()
            .values()
            .filter(|t| t.has_capability(tag))
            .cloned()
            .collect();
        tools.sort_by(|a, b| a.name.cmp(&b.name));
        tools
    }

    /// Apply a partial update
    pub fn update(&self, name: &str, patch: ToolPatch) -> RegistryResult<ToolDefinition> {
        let mut tools = self.write();
        let existing = tools
            .get_mut(name)
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))?;

        let mut changed = false;
        if let Some(description) = patch.description.filter(|d| !d.trim().is_empty()) {
            existing.description = description;
            changed = true;
        }
        if let Some(schema) = patch.input_schema {
            existing.input_schema = Some(schema);
            changed = true;
        }
        if let Some(capabilities) = patch.capabilities {
            existing.capabilities = capabilities;
            changed = true;
        }
        if let Some(metadata) = patch.metadata {
            existing.metadata = metadata;
            changed = true;
        }
        if changed {
            existing.updated_at = Utc::now();
            tracing::info!("Updated tool {}", name);
        }

        Ok(existing.clone())
    }

    /// Remove a tool. Returns whether it existed.
    pub fn remove(&self, name: &str) -> bool {
        let removed = self.write().remove(name).is_some();
        if removed {
            tracing::info!("Removed tool {}", name);
        }
        removed
    }

    pub fn exists(&self, name: &str) -> bool {
        self.read().contains_key(name)
    }

    pub fn count(&self) -> usize {
        self.read().len()
    }

    /// Registered tool names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.read().keys().cloned().collect();
        names.sort();
        names
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
