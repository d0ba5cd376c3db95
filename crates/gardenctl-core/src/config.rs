use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{GardenctlError, GardenctlResult};

/// Top-level `<home>/config` file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GardenConfig {
    #[serde(default)]
    pub garden_clusters: Vec<GardenClusterMeta>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GardenClusterMeta {
    pub name: String,
    /// Path to the garden kubeconfig; `~` and `$VAR` are expanded on use.
    #[serde(rename = "kubeConfig")]
    pub kubeconfig: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dashboard_url: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub access_restrictions: Vec<AccessRestriction>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessRestriction {
    pub key: String,
    #[serde(default)]
    pub notify_if: bool,
    #[serde(default)]
    pub msg: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<AccessRestrictionOption>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessRestrictionOption {
    pub key: String,
    #[serde(default)]
    pub notify_if: bool,
    #[serde(default)]
    pub msg: String,
}

impl GardenConfig {
    pub fn from_file(path: &Path) -> GardenctlResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| GardenctlError::Config(format!("Cannot read {}: {e}", path.display())))?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> GardenctlResult<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
            .map_err(|e| GardenctlError::Config(format!("Invalid YAML: {e}")))
    }

    pub fn garden(&self, name: &str) -> GardenctlResult<&GardenClusterMeta> {
        self.garden_clusters
            .iter()
            .find(|g| g.name == name)
            .ok_or_else(|| GardenctlError::UnknownGarden(name.to_string()))
    }

    /// The garden a fresh target stack starts on.
    pub fn default_garden(&self) -> Option<&GardenClusterMeta> {
        self.garden_clusters.first()
    }

    pub fn garden_names(&self) -> Vec<String> {
        self.garden_clusters.iter().map(|g| g.name.clone()).collect()
    }
}

impl GardenClusterMeta {
    pub fn kubeconfig_path(&self) -> GardenctlResult<PathBuf> {
        let expanded = shellexpand::full(&self.kubeconfig).map_err(|e| {
            GardenctlError::Config(format!(
                "Cannot expand kubeConfig of garden '{}': {e}",
                self.name
            ))
        })?;
        Ok(PathBuf::from(expanded.as_ref()))
    }
}
