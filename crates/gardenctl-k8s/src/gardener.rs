//! Gardener `core.gardener.cloud/v1beta1` objects, accessed as dynamic objects.

use std::collections::BTreeMap;

use kube::api::{Api, ApiResource, DynamicObject, GroupVersionKind};
use kube::Client;

use gardenctl_core::resolve::ShootRef;

pub const GROUP: &str = "core.gardener.cloud";
pub const VERSION: &str = "v1beta1";

pub fn api_resource(kind: &str) -> ApiResource {
    ApiResource::from_gvk(&GroupVersionKind::gvk(GROUP, VERSION, kind))
}

pub fn projects(client: &Client) -> Api<DynamicObject> {
    Api::all_with(client.clone(), &api_resource("Project"))
}

pub fn seeds(client: &Client) -> Api<DynamicObject> {
    Api::all_with(client.clone(), &api_resource("Seed"))
}

pub fn shoots(client: &Client, namespace: Option<&str>) -> Api<DynamicObject> {
    let ar = api_resource("Shoot");
    match namespace {
        Some(ns) => Api::namespaced_with(client.clone(), ns, &ar),
        None => Api::all_with(client.clone(), &ar),
    }
}

pub fn spec_str<'a>(obj: &'a DynamicObject, field: &str) -> Option<&'a str> {
    obj.data.get("spec")?.get(field)?.as_str()
}

/// `spec.namespace` of a project.
pub fn project_namespace(project: &DynamicObject) -> Option<&str> {
    spec_str(project, "namespace")
}

pub fn shoot_ref(shoot: &DynamicObject) -> Option<ShootRef> {
    Some(ShootRef {
        name: shoot.metadata.name.clone()?,
        namespace: shoot.metadata.namespace.clone()?,
        seed: spec_str(shoot, "seedName").map(str::to_string),
    })
}

/// `spec.secretRef` of a seed as (namespace, name).
pub fn seed_secret_ref(seed: &DynamicObject) -> Option<(String, String)> {
    let secret_ref = seed.data.get("spec")?.get("secretRef")?;
    Some((
        secret_ref.get("namespace")?.as_str()?.to_string(),
        secret_ref.get("name")?.as_str()?.to_string(),
    ))
}

/// `spec.seedSelector.matchLabels` of a shoot.
pub fn seed_selector_labels(shoot: &DynamicObject) -> BTreeMap<String, String> {
    shoot
        .data
        .get("spec")
        .and_then(|spec| spec.get("seedSelector"))
        .and_then(|selector| selector.get("matchLabels"))
        .and_then(|labels| labels.as_object())
        .map(|labels| {
            labels
                .iter()
                .filter_map(|(k, v)| Some((k.clone(), v.as_str()?.to_string())))
                .collect()
        })
        .unwrap_or_default()
}

pub fn name_of(obj: &DynamicObject) -> Option<String> {
    obj.metadata.name.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: serde_json::Value) -> DynamicObject {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn plural_names_follow_gardener_resources() {
        assert_eq!(api_resource("Shoot").plural, "shoots");
        assert_eq!(api_resource("Project").plural, "projects");
        assert_eq!(api_resource("Seed").api_version, "core.gardener.cloud/v1beta1");
    }

    #[test]
    fn reads_shoot_fields() {
        let shoot = object(json!({
            "apiVersion": "core.gardener.cloud/v1beta1",
            "kind": "Shoot",
            "metadata": { "name": "eu-prod-1", "namespace": "garden-core" },
            "spec": {
                "seedName": "aws-eu1",
                "seedSelector": { "matchLabels": { "seed.gardener.cloud/eu-access": "true" } }
            }
        }));
        let shoot_ref = shoot_ref(&shoot).unwrap();
        assert_eq!(shoot_ref.name, "eu-prod-1");
        assert_eq!(shoot_ref.namespace, "garden-core");
        assert_eq!(shoot_ref.seed.as_deref(), Some("aws-eu1"));
        assert_eq!(
            seed_selector_labels(&shoot).get("seed.gardener.cloud/eu-access"),
            Some(&"true".to_string())
        );
    }

    #[test]
    fn reads_project_and_seed_fields() {
        let project = object(json!({
            "apiVersion": "core.gardener.cloud/v1beta1",
            "kind": "Project",
            "metadata": { "name": "core" },
            "spec": { "namespace": "garden-core" }
        }));
        assert_eq!(project_namespace(&project), Some("garden-core"));

        let seed = object(json!({
            "apiVersion": "core.gardener.cloud/v1beta1",
            "kind": "Seed",
            "metadata": { "name": "aws-eu1" },
            "spec": { "secretRef": { "name": "seed-aws-eu1", "namespace": "garden" } }
        }));
        assert_eq!(
            seed_secret_ref(&seed),
            Some(("garden".to_string(), "seed-aws-eu1".to_string()))
        );

        let bare = object(json!({
            "apiVersion": "core.gardener.cloud/v1beta1",
            "kind": "Seed",
            "metadata": { "name": "managed" },
            "spec": {}
        }));
        assert_eq!(seed_secret_ref(&bare), None);
        assert!(seed_selector_labels(&bare).is_empty());
    }
}
