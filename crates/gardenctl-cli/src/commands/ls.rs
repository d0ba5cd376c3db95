use clap::{Args, ValueEnum};
use serde::Serialize;

use gardenctl_core::resolve::{shoot_scope, ClusterLister};

use crate::session::Session;

#[derive(Clone, Copy, ValueEnum)]
pub enum Listing {
    Gardens,
    Projects,
    Seeds,
    Shoots,
}

#[derive(Args)]
pub struct LsArgs {
    /// What to list
    pub what: Listing,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GardenItem {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    dashboard_url: Option<String>,
}

#[derive(Serialize)]
struct ShootItem {
    name: String,
    namespace: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<String>,
}

#[derive(Default, Serialize)]
struct Output {
    #[serde(skip_serializing_if = "Option::is_none")]
    gardens: Option<Vec<GardenItem>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    projects: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    seeds: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    shoots: Option<Vec<ShootItem>>,
}

pub async fn execute(args: LsArgs, session: &mut Session) -> anyhow::Result<()> {
    let mut output = Output::default();

    match args.what {
        Listing::Gardens => {
            output.gardens = Some(
                session
                    .config
                    .garden_clusters
                    .iter()
                    .map(|g| GardenItem {
                        name: g.name.clone(),
                        dashboard_url: g.dashboard_url.clone(),
                    })
                    .collect(),
            );
        }
        Listing::Projects => {
            let target = session.read_target()?.target()?;
            let lister = session.lister(&target).await?;
            output.projects = Some(lister.list_projects().await?);
        }
        Listing::Seeds => {
            let target = session.read_target()?.target()?;
            let lister = session.lister(&target).await?;
            output.seeds = Some(lister.list_seeds().await?);
        }
        Listing::Shoots => {
            let target = session.read_target()?.target()?;
            let lister = session.lister(&target).await?;
            let scope = shoot_scope(&lister, &target).await?;
            let shoots = lister
                .list_shoots(&scope)
                .await?
                .into_iter()
                .map(|s| ShootItem {
                    name: s.name,
                    namespace: s.namespace,
                    seed: s.seed,
                })
                .collect();
            output.shoots = Some(shoots);
        }
    }

    print!("{}", serde_yaml::to_string(&output)?);
    Ok(())
}
