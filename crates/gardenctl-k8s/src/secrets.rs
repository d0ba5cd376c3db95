use async_trait::async_trait;
use k8s_openapi::api::core::v1::Secret;
use kube::api::Api;
use kube::Client;

use gardenctl_core::error::{GardenctlError, GardenctlResult};
use gardenctl_core::kubeconfig::KubeconfigFetcher;
use gardenctl_core::resolve::{ClusterLister, ShootScope};
use gardenctl_core::target::{Target, TargetKind};

use crate::gardener;
use crate::lister::GardenLister;

const KUBECONFIG_KEY: &str = "kubeconfig";

/// Reads seed and shoot kubeconfigs out of secrets in the garden cluster.
pub struct GardenKubeconfigFetcher {
    client: Client,
    lister: GardenLister,
}

impl GardenKubeconfigFetcher {
    pub fn new(client: Client) -> Self {
        let lister = GardenLister::new(client.clone(), Vec::new());
        Self { client, lister }
    }

    async fn secret_kubeconfig(&self, namespace: &str, name: &str) -> GardenctlResult<Vec<u8>> {
        let secrets: Api<Secret> = Api::namespaced(self.client.clone(), namespace);
        let secret = secrets.get(name).await.map_err(|e| {
            GardenctlError::Cluster(anyhow::anyhow!(
                "Cannot read secret {namespace}/{name}: {e}"
            ))
        })?;
        tracing::debug!(%namespace, %name, "Fetched kubeconfig secret");
        kubeconfig_from_secret(&secret)
    }

    async fn seed_kubeconfig(&self, seed: &str) -> GardenctlResult<Vec<u8>> {
        let obj = gardener::seeds(&self.client).get(seed).await.map_err(|e| {
            GardenctlError::Cluster(anyhow::anyhow!("Cannot read seed '{seed}': {e}"))
        })?;
        let (namespace, name) = gardener::seed_secret_ref(&obj).ok_or_else(|| {
            GardenctlError::Cluster(anyhow::anyhow!("Seed '{seed}' has no secretRef"))
        })?;
        self.secret_kubeconfig(&namespace, &name).await
    }

    async fn shoot_namespace_on_seed(&self, seed: &str, shoot: &str) -> GardenctlResult<String> {
        self.lister
            .list_shoots(&ShootScope::Seed(seed.to_string()))
            .await?
            .into_iter()
            .find(|s| s.name == shoot)
            .map(|s| s.namespace)
            .ok_or_else(|| GardenctlError::NoMatch {
                kind: TargetKind::Shoot,
                pattern: shoot.to_string(),
            })
    }
}

#[async_trait]
impl KubeconfigFetcher for GardenKubeconfigFetcher {
    async fn fetch_kubeconfig(&self, target: &Target) -> GardenctlResult<Vec<u8>> {
        match target {
            Target::GardenSeed { seed, .. } => self.seed_kubeconfig(seed).await,
            Target::GardenProjectShoot { project, shoot, .. } => {
                let namespace = self.lister.project_namespace(project).await?;
                self.secret_kubeconfig(&namespace, &shoot_secret_name(shoot))
                    .await
            }
            Target::GardenSeedShoot { seed, shoot, .. } => {
                let namespace = self.shoot_namespace_on_seed(seed, shoot).await?;
                self.secret_kubeconfig(&namespace, &shoot_secret_name(shoot))
                    .await
            }
            Target::Unset | Target::Garden { .. } | Target::GardenProject { .. } => {
                Err(GardenctlError::InvalidTarget(
                    "only seeds and shoots have their own kubeconfig".into(),
                ))
            }
        }
    }
}

pub fn shoot_secret_name(shoot: &str) -> String {
    format!("{shoot}.kubeconfig")
}

pub fn kubeconfig_from_secret(secret: &Secret) -> GardenctlResult<Vec<u8>> {
    let name = secret.metadata.name.as_deref().unwrap_or("unknown");
    secret
        .data
        .as_ref()
        .and_then(|data| data.get(KUBECONFIG_KEY))
        .map(|bytes| bytes.0.clone())
        .filter(|bytes| !bytes.is_empty())
        .ok_or_else(|| {
            GardenctlError::Cluster(anyhow::anyhow!(
                "Secret '{name}' has no '{KUBECONFIG_KEY}' entry"
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
    use k8s_openapi::ByteString;
    use std::collections::BTreeMap;

    fn secret(data: Option<BTreeMap<String, ByteString>>) -> Secret {
        Secret {
            metadata: ObjectMeta {
                name: Some("t.kubeconfig".into()),
                ..Default::default()
            },
            data,
            ..Default::default()
        }
    }

    #[test]
    fn extracts_kubeconfig_entry() {
        let data = BTreeMap::from([(
            "kubeconfig".to_string(),
            ByteString(b"apiVersion: v1\n".to_vec()),
        )]);
        assert_eq!(
            kubeconfig_from_secret(&secret(Some(data))).unwrap(),
            b"apiVersion: v1\n".to_vec()
        );
    }

    #[test]
    fn missing_entry_is_an_error() {
        assert!(kubeconfig_from_secret(&secret(None)).is_err());
        let data = BTreeMap::from([("token".to_string(), ByteString(b"x".to_vec()))]);
        assert!(kubeconfig_from_secret(&secret(Some(data))).is_err());
    }

    #[test]
    fn shoot_secret_naming() {
        assert_eq!(shoot_secret_name("eu-prod-1"), "eu-prod-1.kubeconfig");
    }
}
