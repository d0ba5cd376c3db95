use std::path::Path;

use kube::Client;

pub async fn create_client(kubeconfig_path: &Path) -> anyhow::Result<Client> {
    let kubeconfig = kube::config::Kubeconfig::read_from(kubeconfig_path)?;
    let kube_config = kube::Config::from_custom_kubeconfig(
        kubeconfig,
        &kube::config::KubeConfigOptions::default(),
    )
    .await?;
    tracing::debug!(
        path = %kubeconfig_path.display(),
        cluster = %kube_config.cluster_url,
        "Created Kubernetes client"
    );
    Ok(Client::try_from(kube_config)?)
}
