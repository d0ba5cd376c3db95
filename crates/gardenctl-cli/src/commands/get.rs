use anyhow::Context;
use clap::{Args, ValueEnum};

use gardenctl_core::error::GardenctlError;
use gardenctl_core::resolve::resolve_shoot;
use gardenctl_core::target::TargetKind;
use gardenctl_k8s::objects::get_object;

use crate::session::Session;

#[derive(Clone, Copy, ValueEnum)]
pub enum GetWhat {
    Target,
    Kubeconfig,
    Project,
    Seed,
    Shoot,
}

#[derive(Args)]
pub struct GetArgs {
    /// What to show
    pub what: GetWhat,
    /// Object name (defaults to the targeted one)
    pub name: Option<String>,
}

pub async fn execute(args: GetArgs, session: &mut Session) -> anyhow::Result<()> {
    let stack = session.read_target()?;
    let target = stack.target()?;

    let (kind, targeted) = match args.what {
        GetWhat::Target => {
            print!("{}", serde_yaml::to_string(&stack)?);
            return Ok(());
        }
        GetWhat::Kubeconfig => {
            let path = session.kubeconfig_path(&target)?;
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("cannot read kubeconfig {}", path.display()))?;
            print!("{raw}");
            return Ok(());
        }
        GetWhat::Project => (TargetKind::Project, target.project()),
        GetWhat::Seed => (TargetKind::Seed, target.seed()),
        GetWhat::Shoot => (TargetKind::Shoot, target.shoot()),
    };

    let name = args
        .name
        .clone()
        .or_else(|| targeted.map(str::to_string))
        .ok_or(GardenctlError::NotTargeted(kind))?;

    let client = session.garden_client(&target).await?;
    let object = match kind {
        TargetKind::Shoot => {
            let lister = session.lister(&target).await?;
            let shoot = resolve_shoot(&lister, &target, &name).await?;
            get_object(&client, kind, &shoot.name, Some(&shoot.namespace)).await?
        }
        _ => get_object(&client, kind, &name, None).await?,
    };

    print!("{}", serde_yaml::to_string(&object)?);
    Ok(())
}
