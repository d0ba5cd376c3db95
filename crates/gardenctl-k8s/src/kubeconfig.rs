use std::path::Path;

use kube::config::Kubeconfig;

use gardenctl_core::error::{GardenctlError, GardenctlResult};
use gardenctl_core::kubeconfig::{cache_path, KubeconfigFetcher};
use gardenctl_core::target::Target;

pub const DEFAULT_NAMESPACE: &str = "default";

/// Writes raw kubeconfig bytes to `path`, creating the cache directories.
pub fn write_kubeconfig(path: &Path, raw: &[u8]) -> GardenctlResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| GardenctlError::io(parent, e))?;
    }
    std::fs::write(path, raw).map_err(|e| GardenctlError::io(path, e))?;
    tracing::info!(path = %path.display(), "Cached kubeconfig");
    Ok(())
}

/// Fetches the kubeconfig of a seed or shoot target into the cache tree.
///
/// Returns `None` for targets that use the garden kubeconfig.
pub async fn cache_kubeconfig(
    fetcher: &dyn KubeconfigFetcher,
    cache_root: &Path,
    target: &Target,
) -> GardenctlResult<Option<std::path::PathBuf>> {
    let Some(path) = cache_path(cache_root, target) else {
        return Ok(None);
    };
    let raw = fetcher.fetch_kubeconfig(target).await?;
    write_kubeconfig(&path, &raw)?;
    Ok(Some(path))
}

fn read(path: &Path) -> GardenctlResult<Kubeconfig> {
    Kubeconfig::read_from(path).map_err(|e| {
        GardenctlError::Config(format!("Cannot read kubeconfig {}: {e}", path.display()))
    })
}

/// Sets the namespace of the current context in the kubeconfig at `path`.
pub fn set_context_namespace(path: &Path, namespace: &str) -> GardenctlResult<()> {
    let mut kubeconfig = read(path)?;

    let current = kubeconfig.current_context.clone();
    let named = match current {
        Some(ref name) => kubeconfig.contexts.iter_mut().find(|c| &c.name == name),
        None if kubeconfig.contexts.len() == 1 => kubeconfig.contexts.first_mut(),
        None => None,
    }
    .ok_or_else(|| {
        GardenctlError::Config(format!(
            "Kubeconfig {} has no current context",
            path.display()
        ))
    })?;
    let context_name = named.name.clone();
    let context = named.context.as_mut().ok_or_else(|| {
        GardenctlError::Config(format!(
            "Context '{context_name}' in {} is empty",
            path.display()
        ))
    })?;
    context.namespace = Some(namespace.to_string());

    let yaml = serde_yaml::to_string(&kubeconfig)
        .map_err(|e| GardenctlError::Other(anyhow::anyhow!("Serialize kubeconfig: {e}")))?;
    std::fs::write(path, yaml).map_err(|e| GardenctlError::io(path, e))?;
    tracing::info!(path = %path.display(), %namespace, "Set context namespace");
    Ok(())
}

pub fn reset_context_namespace(path: &Path) -> GardenctlResult<()> {
    set_context_namespace(path, DEFAULT_NAMESPACE)
}

/// Namespace of the current context, if one is set.
pub fn context_namespace(path: &Path) -> GardenctlResult<Option<String>> {
    let kubeconfig = read(path)?;
    let Some(current) = kubeconfig.current_context.as_deref() else {
        return Ok(None);
    };
    Ok(kubeconfig
        .contexts
        .iter()
        .find(|c| c.name == current)
        .and_then(|c| c.context.as_ref())
        .and_then(|c| c.namespace.clone()))
}
