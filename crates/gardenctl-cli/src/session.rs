use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use kube::Client;

use gardenctl_core::config::GardenConfig;
use gardenctl_core::error::{GardenctlError, GardenctlResult};
use gardenctl_core::kubeconfig::kubeconfig_path_for;
use gardenctl_core::store::{read_target, write_target};
use gardenctl_core::target::{Target, TargetKind, TargetStack};
use gardenctl_k8s::client::create_client;
use gardenctl_k8s::lister::GardenLister;
use gardenctl_k8s::secrets::GardenKubeconfigFetcher;

const HOME_DIR_NAME: &str = ".garden";
const CONFIG_FILE_NAME: &str = "config";
const TARGET_FILE_NAME: &str = "target";
const CACHE_DIR_NAME: &str = "cache";

/// Files gardenctl keeps under its home directory.
#[derive(Debug, Clone)]
pub struct Paths {
    pub home: PathBuf,
    pub config_file: PathBuf,
    pub target_file: PathBuf,
    pub cache_dir: PathBuf,
}

impl Paths {
    pub fn new(home: impl Into<PathBuf>) -> Self {
        let home = home.into();
        Self {
            config_file: home.join(CONFIG_FILE_NAME),
            target_file: home.join(TARGET_FILE_NAME),
            cache_dir: home.join(CACHE_DIR_NAME),
            home,
        }
    }

    /// Uses `explicit` if given, otherwise `~/.garden`.
    pub fn resolve(explicit: Option<PathBuf>) -> anyhow::Result<Self> {
        let home = match explicit {
            Some(home) => home,
            None => dirs::home_dir()
                .context("could not determine home directory")?
                .join(HOME_DIR_NAME),
        };
        Ok(Self::new(home))
    }
}

/// Per-invocation state handed to every command.
pub struct Session {
    pub paths: Paths,
    pub config: GardenConfig,
    config_found: bool,
    clients: HashMap<PathBuf, Client>,
}

impl Session {
    pub fn new(paths: Paths, config: GardenConfig) -> Self {
        Self {
            paths,
            config,
            config_found: true,
            clients: HashMap::new(),
        }
    }

    /// Loads the config file under `paths.home`.
    ///
    /// A missing file yields an empty config; anything that needs a garden fails later with
    /// `GardenctlError::Config`.
    pub fn load(paths: Paths) -> GardenctlResult<Self> {
        let config_found = paths.config_file.exists();
        let config = if config_found {
            GardenConfig::from_file(&paths.config_file)?
        } else {
            tracing::warn!(path = %paths.config_file.display(), "No garden configuration found");
            GardenConfig::default()
        };
        tracing::debug!(
            home = %paths.home.display(),
            gardens = config.garden_clusters.len(),
            "Loaded session"
        );
        Ok(Self {
            config_found,
            ..Self::new(paths, config)
        })
    }

    /// The garden config, or `Config` if no config file exists.
    pub fn garden_config(&self) -> GardenctlResult<&GardenConfig> {
        if !self.config_found {
            return Err(GardenctlError::Config(format!(
                "no garden configuration at {}",
                self.paths.config_file.display()
            )));
        }
        Ok(&self.config)
    }

    /// Reads the target stack, seeding it with the default garden on first run.
    pub fn read_target(&self) -> GardenctlResult<TargetStack> {
        let path = &self.paths.target_file;
        if !path.exists() {
            if let Some(garden) = self.config.default_garden() {
                let mut stack = TargetStack::new();
                stack.push(TargetKind::Garden, garden.name.clone())?;
                write_target(path, &stack)?;
                tracing::info!(garden = %garden.name, "Seeded target with default garden");
                return Ok(stack);
            }
        }
        read_target(path)
    }

    pub fn write_target(&self, stack: &TargetStack) -> GardenctlResult<()> {
        write_target(&self.paths.target_file, stack)
    }

    pub fn kubeconfig_path(&self, target: &Target) -> GardenctlResult<PathBuf> {
        kubeconfig_path_for(self.garden_config()?, &self.paths.cache_dir, target)
    }

    /// Client for the cluster behind `kubeconfig`, created once per session.
    pub async fn client(&mut self, kubeconfig: &Path) -> GardenctlResult<Client> {
        if let Some(client) = self.clients.get(kubeconfig) {
            return Ok(client.clone());
        }
        let client = create_client(kubeconfig)
            .await
            .map_err(GardenctlError::Cluster)?;
        self.clients.insert(kubeconfig.to_path_buf(), client.clone());
        Ok(client)
    }

    pub async fn garden_client(&mut self, target: &Target) -> GardenctlResult<Client> {
        let garden = target.garden().ok_or_else(|| {
            GardenctlError::InvalidTarget("no garden is targeted".into())
        })?;
        let path = self.garden_config()?.garden(garden)?.kubeconfig_path()?;
        self.client(&path).await
    }

    pub async fn lister(&mut self, target: &Target) -> GardenctlResult<GardenLister> {
        let client = self.garden_client(target).await?;
        Ok(GardenLister::new(client, self.config.garden_names()))
    }

    pub async fn fetcher(&mut self, target: &Target) -> GardenctlResult<GardenKubeconfigFetcher> {
        let client = self.garden_client(target).await?;
        Ok(GardenKubeconfigFetcher::new(client))
    }
}
