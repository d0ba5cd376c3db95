use std::collections::BTreeMap;

use kube::api::DynamicObject;
use kube::Client;

use gardenctl_core::error::{GardenctlError, GardenctlResult};
use gardenctl_core::target::TargetKind;

use crate::gardener;

/// Fetches a project, seed or shoot from the garden cluster.
pub async fn get_object(
    client: &Client,
    kind: TargetKind,
    name: &str,
    namespace: Option<&str>,
) -> GardenctlResult<DynamicObject> {
    let api = match kind {
        TargetKind::Project => gardener::projects(client),
        TargetKind::Seed => gardener::seeds(client),
        TargetKind::Shoot => {
            let namespace = namespace.ok_or_else(|| {
                GardenctlError::InvalidTarget(format!("shoot '{name}' needs a namespace"))
            })?;
            gardener::shoots(client, Some(namespace))
        }
        TargetKind::Garden | TargetKind::Namespace => {
            return Err(GardenctlError::InvalidTarget(format!(
                "{kind} is not a garden cluster object"
            )))
        }
    };

    api.get_opt(name)
        .await
        .map_err(|e| GardenctlError::Cluster(anyhow::anyhow!("Cannot read {kind} '{name}': {e}")))?
        .ok_or_else(|| GardenctlError::NoMatch {
            kind,
            pattern: name.to_string(),
        })
}

/// Labels and annotations that decide which access restrictions apply to a shoot.
#[derive(Debug, Default)]
pub struct ShootAccess {
    pub match_labels: BTreeMap<String, String>,
    pub annotations: BTreeMap<String, String>,
}

pub async fn shoot_access(
    client: &Client,
    namespace: &str,
    shoot: &str,
) -> GardenctlResult<ShootAccess> {
    let obj = get_object(client, TargetKind::Shoot, shoot, Some(namespace)).await?;
    Ok(ShootAccess {
        match_labels: gardener::seed_selector_labels(&obj),
        annotations: obj.metadata.annotations.clone().unwrap_or_default(),
    })
}
