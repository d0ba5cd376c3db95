use async_trait::async_trait;
use kube::api::ListParams;
use kube::Client;

use gardenctl_core::error::{GardenctlError, GardenctlResult};
use gardenctl_core::resolve::{ClusterLister, ShootRef, ShootScope};
use gardenctl_core::target::TargetKind;

use crate::gardener;

/// Lists gardens from configuration and everything else from the garden cluster.
pub struct GardenLister {
    client: Client,
    gardens: Vec<String>,
}

impl GardenLister {
    pub fn new(client: Client, gardens: Vec<String>) -> Self {
        Self { client, gardens }
    }
}

fn list_failed(what: &str, e: kube::Error) -> GardenctlError {
    GardenctlError::Cluster(anyhow::anyhow!("{what} list failed: {e}"))
}

#[async_trait]
impl ClusterLister for GardenLister {
    fn list_gardens(&self) -> Vec<String> {
        self.gardens.clone()
    }

    async fn list_seeds(&self) -> GardenctlResult<Vec<String>> {
        let seeds = gardener::seeds(&self.client)
            .list(&ListParams::default())
            .await
            .map_err(|e| list_failed("Seed", e))?;
        Ok(seeds.items.iter().filter_map(gardener::name_of).collect())
    }

    async fn list_projects(&self) -> GardenctlResult<Vec<String>> {
        let projects = gardener::projects(&self.client)
            .list(&ListParams::default())
            .await
            .map_err(|e| list_failed("Project", e))?;
        Ok(projects.items.iter().filter_map(gardener::name_of).collect())
    }

    async fn project_namespace(&self, project: &str) -> GardenctlResult<String> {
        let obj = gardener::projects(&self.client)
            .get_opt(project)
            .await
            .map_err(|e| GardenctlError::Cluster(anyhow::anyhow!("Project get failed: {e}")))?
            .ok_or_else(|| GardenctlError::NoMatch {
                kind: TargetKind::Project,
                pattern: project.to_string(),
            })?;
        gardener::project_namespace(&obj)
            .map(str::to_string)
            .ok_or_else(|| {
                GardenctlError::Cluster(anyhow::anyhow!("Project '{project}' has no namespace"))
            })
    }

    async fn project_for_namespace(&self, namespace: &str) -> GardenctlResult<Option<String>> {
        let projects = gardener::projects(&self.client)
            .list(&ListParams::default())
            .await
            .map_err(|e| list_failed("Project", e))?;
        Ok(projects
            .items
            .iter()
            .find(|p| gardener::project_namespace(p) == Some(namespace))
            .and_then(gardener::name_of))
    }

    async fn list_shoots(&self, scope: &ShootScope) -> GardenctlResult<Vec<ShootRef>> {
        let namespace = match scope {
            ShootScope::Namespace(ns) => Some(ns.as_str()),
            ShootScope::All | ShootScope::Seed(_) => None,
        };
        let shoots = gardener::shoots(&self.client, namespace)
            .list(&ListParams::default())
            .await
            .map_err(|e| list_failed("Shoot", e))?;

        let refs: Vec<ShootRef> = shoots
            .items
            .iter()
            .filter_map(gardener::shoot_ref)
            .filter(|s| match scope {
                ShootScope::Seed(seed) => s.seed.as_deref() == Some(seed.as_str()),
                ShootScope::All | ShootScope::Namespace(_) => true,
            })
            .collect();
        tracing::debug!(?scope, shoots = refs.len(), "Listed shoots");
        Ok(refs)
    }
}
