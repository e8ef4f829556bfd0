use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use toolhub_core::{Dispatcher, ResourceStore};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub app: AppInfo,
}

/// Branding shown by the home, info and branding endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppInfo {
    pub name: String,
    pub description: String,
    pub version: String,
    pub author: String,
    pub company: String,
    pub website: String,
    pub copyright: String,
    pub logo_url: String,
    pub terms_url: String,
    pub privacy_url: String,
    pub support: SupportInfo,
    pub theme: ThemeInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SupportInfo {
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeInfo {
    pub primary_color: String,
    pub secondary_color: String,
}

impl Default for AppInfo {
    fn default() -> Self {
        Self {
            name: "Toolhub".to_string(),
            description: "Demonstration server for resources and tools".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            author: "Toolhub Team".to_string(),
            company: "Toolhub Contributors".to_string(),
            website: "https://github.com/toolhub-dev/toolhub".to_string(),
            copyright: "© Toolhub Contributors".to_string(),
            logo_url: "/static/logo.svg".to_string(),
            terms_url: "https://github.com/toolhub-dev/toolhub/blob/main/TERMS.md".to_string(),
            privacy_url: "https://github.com/toolhub-dev/toolhub/blob/main/PRIVACY.md".to_string(),
            support: SupportInfo::default(),
            theme: ThemeInfo::default(),
        }
    }
}

impl Default for SupportInfo {
    fn default() -> Self {
        Self {
            email: "support@toolhub.dev".to_string(),
            phone: "+1 555 0100".to_string(),
        }
    }
}

impl Default for ThemeInfo {
    fn default() -> Self {
        Self {
            primary_color: "#1f6feb".to_string(),
            secondary_color: "#6e7781".to_string(),
        }
    }
}

impl ServerConfig {
    pub fn load(config_path: &Path) -> Result<Self> {
        // Load config file if it exists, otherwise use defaults
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)
                .context("Failed to read configuration file")?;
            toml::from_str(&content).context("Failed to parse configuration file")
        } else {
            tracing::info!("Configuration file not found, using defaults");
            Ok(Self::default())
        }
    }
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub resources: Arc<ResourceStore>,
    pub app: Arc<AppInfo>,
}

impl AppState {
    pub fn new(config: &ServerConfig) -> Self {
        let dispatcher = Arc::new(Dispatcher::with_builtin_tools());
        let resources = Arc::new(ResourceStore::with_sample_resources());

        tracing::info!(
            "Loaded {} tools and {} resources",
            dispatcher.tools().count(),
            resources.count()
        );

        Self {
            dispatcher,
            resources,
            app: Arc::new(config.app.clone()),
        }
    }
}
