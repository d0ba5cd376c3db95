use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::config::GardenConfig;
use crate::error::{GardenctlError, GardenctlResult};
use crate::target::{Target, TargetStack};

pub const KUBECONFIG_FILE_NAME: &str = "kubeconfig.yaml";

/// Fetches raw kubeconfig bytes for a targeted seed or shoot.
#[async_trait]
pub trait KubeconfigFetcher: Send + Sync {
    async fn fetch_kubeconfig(&self, target: &Target) -> GardenctlResult<Vec<u8>>;
}

/// Cached kubeconfig location for a seed or shoot target, `None` for anything
/// served by the garden kubeconfig itself.
pub fn cache_path(cache_root: &Path, target: &Target) -> Option<PathBuf> {
    let path = match target {
        Target::GardenSeed { garden, seed, .. } => {
            cache_root.join(garden).join("seeds").join(seed)
        }
        Target::GardenSeedShoot {
            garden, seed, shoot, ..
        } => cache_root.join(garden).join("seeds").join(seed).join(shoot),
        Target::GardenProjectShoot {
            garden,
            project,
            shoot,
            ..
        } => cache_root
            .join(garden)
            .join("projects")
            .join(project)
            .join(shoot),
        Target::Unset | Target::Garden { .. } | Target::GardenProject { .. } => return None,
    };
    Some(path.join(KUBECONFIG_FILE_NAME))
}

/// Kubeconfig to use for `target`. A targeted namespace never changes the file.
pub fn kubeconfig_path_for(
    config: &GardenConfig,
    cache_root: &Path,
    target: &Target,
) -> GardenctlResult<PathBuf> {
    let garden = target.garden().ok_or_else(|| {
        GardenctlError::IllegalStackShape("no garden is targeted".into())
    })?;

    match cache_path(cache_root, target) {
        Some(path) => Ok(path),
        None => config.garden(garden)?.kubeconfig_path(),
    }
}

/// Derives the kubeconfig path from the shape of `stack`.
pub fn derive_kubeconfig_path(
    config: &GardenConfig,
    cache_root: &Path,
    stack: &TargetStack,
) -> GardenctlResult<PathBuf> {
    kubeconfig_path_for(config, cache_root, &stack.target()?)
}
