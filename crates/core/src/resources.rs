// Resource store: named, typed content items keyed by URI

use crate::error::{RegistryError, RegistryResult};
use crate::types::{Resource, ResourcePatch};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::{BTreeMap, HashMap};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Aggregate view over the resource store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceStats {
    pub total_resources: usize,
    pub mime_type_distribution: BTreeMap<String, usize>,
    pub available_uris: Vec<String>,
}

/// Thread-safe resource store
pub struct ResourceStore {
    resources: RwLock<HashMap<String, Resource>>,
}

impl ResourceStore {
    pub fn new() -> Self {
        Self {
            resources: RwLock::new(HashMap::new()),
        }
    }

    /// Store seeded with the demonstration resources
    pub fn with_sample_resources() -> Self {
        let store = Self::new();
        {
            let mut resources = store.write();
            for resource in sample_resources() {
                resources.insert(resource.uri.clone(), resource);
            }
        }
        store
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Resource>> {
        self.resources.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Resource>> {
        self.resources.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Create a resource.
    ///
    /// Checks run in order: uri present, uri unused, name present, mime
    /// type present, content present.
    pub fn create(&self, mut resource: Resource) -> RegistryResult<Resource> {
        if resource.uri.trim().is_empty() {
            return Err(RegistryError::MissingField("uri"));
        }

        let mut resources = self.write();
        if resources.contains_key(&resource.uri) {
            return Err(RegistryError::DuplicateName(resource.uri));
        }
        if resource.name.trim().is_empty() {
            return Err(RegistryError::MissingField("name"));
        }
        if resource.mime_type.trim().is_empty() {
            return Err(RegistryError::MissingField("mime_type"));
        }
        if resource.content.is_none() {
            return Err(RegistryError::MissingField("content"));
        }

        let now = Utc::now();
        resource.created_at = now;
        resource.updated_at = now;
        resources.insert(resource.uri.clone(), resource.clone());

        tracing::info!("Created resource {}", resource.uri);
        Ok(resource)
    }

    pub fn get(&self, uri: &str) -> Option<Resource> {
        self.read().get(uri).cloned()
    }

    /// Snapshot of all resources, ordered by URI
    pub fn list(&self) -> Vec<Resource> {
        let mut resources: Vec<_> = self.read().values().cloned().collect();
        resources.sort_by(|a, b| a.uri.cmp(&b.uri));
        resources
    }

    /// Apply a partial update; blank name and mime type are ignored
    pub fn update(&self, uri: &str, patch: ResourcePatch) -> RegistryResult<Resource> {
        let mut resources = self.write();
        let existing = resources
            .get_mut(uri)
            .ok_or_else(|| RegistryError::NotFound(uri.to_string()))?;

        let mut changed = false;
        if let Some(name) = patch.name.filter(|n| !n.trim().is_empty()) {
            existing.name = name;
            changed = true;
        }
        if let Some(description) = patch.description {
            existing.description = Some(description);
            changed = true;
        }
        if let Some(mime_type) = patch.mime_type.filter(|m| !m.trim().is_empty()) {
            existing.mime_type = mime_type;
            changed = true;
        }
        if let Some(content) = patch.content {
            existing.content = Some(content);
            changed = true;
        }
        if let Some(metadata) = patch.metadata {
            existing.metadata = metadata;
            changed = true;
        }
        if changed {
            existing.updated_at = Utc::now();
            tracing::info!("Updated resource {}", uri);
        }

        Ok(existing.clone())
    }

    pub fn delete(&self, uri: &str) -> bool {
        let removed = self.write().remove(uri).is_some();
        if removed {
            tracing::info!("Deleted resource {}", uri);
        }
        removed
    }

    pub fn exists(&self, uri: &str) -> bool {
        self.read().contains_key(uri)
    }

    pub fn count(&self) -> usize {
        self.read().len()
    }

    /// Case-insensitive substring match on the resource name
    pub fn search_by_name(&self, pattern: &str) -> Vec<Resource> {
        let pattern = pattern.to_lowercase();
        self.list()
            .into_iter()
            .filter(|r| r.name.to_lowercase().contains(&pattern))
            .collect()
    }

    pub fn by_mime_type(&self, mime_type: &str) -> Vec<Resource> {
        self.list()
            .into_iter()
            .filter(|r| r.mime_type == mime_type)
            .collect()
    }

    pub fn stats(&self) -> ResourceStats {
        let resources = self.list();
        let mut mime_type_distribution = BTreeMap::new();
        for resource in &resources {
            *mime_type_distribution
                .entry(resource.mime_type.clone())
                .or_insert(0) += 1;
        }

        ResourceStats {
            total_resources: resources.len(),
            mime_type_distribution,
            available_uris: resources.into_iter().map(|r| r.uri).collect(),
        }
    }
}

impl Default for ResourceStore {
    fn default() -> Self {
        Self::new()
    }
}

fn sample_resources() -> Vec<Resource> {
    let readme = Resource::new(
        "mcp://resources/documents/readme",
        "README Document",
        "Main project document",
        "text/plain",
        json!(
            "This is an MCP (Model Context Protocol) server.\n\
             It exposes Resources and Tools with fixed values for demonstration.\n\
             \nFeatures:\n\
             - Resource management\n\
             - Tool execution\n\
             - Complete REST API"
        ),
    )
    .with_metadata("author", "MCP Server")
    .with_metadata("version", "1.0")
    .with_metadata("language", "en");

    let users = Resource::new(
        "mcp://resources/data/users",
        "Users Data",
        "List of system users",
        "application/json",
        json!({
            "users": [
                {"id": 1, "name": "João Silva", "email": "joao@example.com", "active": true},
                {"id": 2, "name": "Maria Santos", "email": "maria@example.com", "active": true},
                {"id": 3, "name": "Pedro Costa", "email": "pedro@example.com", "active": false}
            ],
            "total": 3,
            "active_count": 2
        }),
    )
    .with_metadata("source", "database")
    .with_metadata("last_updated", "2024-01-15");

    let config = Resource::new(
        "mcp://resources/config/system",
        "System Configuration",
        "System configuration settings",
        "application/json",
        json!({
            "server": {"port": 8080, "host": "localhost", "ssl_enabled": false},
            "database": {"type": "memory", "url": "memory://local", "driver": "in-process"},
            "features": {"logging_enabled": true, "metrics_enabled": true, "debug_mode": false}
        }),
    )
    .with_metadata("environment", "development")
    .with_metadata("config_version", "1.2.0");

    vec![readme, users, config]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_resource(uri: &str) -> Resource {
        Resource::new(uri, "Test Doc", "A test resource", "text/plain", json!("hello"))
    }

    #[test]
    fn test_create_and_get() {
        let store = ResourceStore::new();
        let created = store.create(create_test_resource("mcp://test/a")).unwrap();

        assert_eq!(store.get("mcp://test/a"), Some(created));
        assert!(store.exists("mcp://test/a"));
        assert_eq!(store.count(), 1);
    }

    #[test]
    fn test_create_validation() {
        let store = ResourceStore::new();
        store.create(create_test_resource("mcp://test/a")).unwrap();

        assert_eq!(
            store.create(create_test_resource(" ")),
            Err(RegistryError::MissingField("uri"))
        );
        assert_eq!(
            store.create(create_test_resource("mcp://test/a")),
            Err(RegistryError::DuplicateName("mcp://test/a".to_string()))
        );

        let mut no_name = create_test_resource("mcp://test/b");
        no_name.name = String::new();
        assert_eq!(store.create(no_name), Err(RegistryError::MissingField("name")));

        let mut no_mime = create_test_resource("mcp://test/b");
        no_mime.mime_type = String::new();
        assert_eq!(store.create(no_mime), Err(RegistryError::MissingField("mime_type")));

        let mut no_content = create_test_resource("mcp://test/b");
        no_content.content = None;
        assert_eq!(store.create(no_content), Err(RegistryError::MissingField("content")));

        assert_eq!(store.count(), 1);
    }

    #[test]
    fn test_partial_update() {
        let store = ResourceStore::new();
        store.create(create_test_resource("mcp://test/a")).unwrap();

        let updated = store
            .update(
                "mcp://test/a",
                ResourcePatch {
                    name: Some("".to_string()),
                    content: Some(json!("changed")),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.name, "Test Doc");
        assert_eq!(updated.content, Some(json!("changed")));
        assert_eq!(
            store.update("mcp://missing", ResourcePatch::default()),
            Err(RegistryError::NotFound("mcp://missing".to_string()))
        );
    }

    #[test]
    fn test_search_and_filter() {
        let store = ResourceStore::with_sample_resources();

        let found = store.search_by_name("users");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].uri, "mcp://resources/data/users");

        assert_eq!(store.by_mime_type("application/json").len(), 2);
        assert_eq!(store.by_mime_type("text/plain").len(), 1);
        assert!(store.by_mime_type("image/png").is_empty());
    }

    #[test]
    fn test_delete() {
        let store = ResourceStore::with_sample_resources();
        assert!(store.delete("mcp://resources/data/users"));
        assert!(!store.delete("mcp://resources/data/users"));
        assert_eq!(store.count(), 2);
    }

    #[test]
    fn test_stats() {
        let store = ResourceStore::with_sample_resources();
        let stats = store.stats();

        assert_eq!(stats.total_resources, 3);
        assert_eq!(stats.mime_type_distribution.get("application/json"), Some(&2));
        assert_eq!(stats.mime_type_distribution.get("text/plain"), Some(&1));
        assert_eq!(stats.available_uris.len(), 3);
    }
}
