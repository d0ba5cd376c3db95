use clap::Args;

use gardenctl_core::access::restriction_messages;
use gardenctl_core::error::GardenctlError;
use gardenctl_core::event::{EventSink, StdoutEventSink, TargetEvent};
use gardenctl_core::resolve::{match_names, resolve_name, resolve_shoot, single_match, ClusterLister};
use gardenctl_core::target::{Target, TargetKind};
use gardenctl_k8s::kubeconfig::{cache_kubeconfig, set_context_namespace};
use gardenctl_k8s::objects::shoot_access;

use crate::commands::drop::reset_dropped_namespace;
use crate::session::Session;

#[derive(Args)]
pub struct TargetArgs {
    /// What to target: garden, project, seed, shoot or namespace
    pub kind: TargetKind,
    /// Name to target; `*` at the start and/or end matches several names
    pub name: String,
}

pub async fn execute(args: TargetArgs, session: &mut Session) -> anyhow::Result<()> {
    let mut stack = session.read_target()?;
    let current = stack.target()?;
    let mut events = Vec::new();
    let mut shoot_namespace = None;

    match args.kind {
        TargetKind::Garden => {
            let gardens = session.garden_config()?.garden_names();
            let matches = match_names(&args.name, gardens.iter().map(String::as_str));
            let garden = single_match(TargetKind::Garden, &args.name, matches)?;
            events.extend(stack.push(TargetKind::Garden, garden)?);
        }
        TargetKind::Project | TargetKind::Seed => {
            let lister = session.lister(&current).await?;
            let name = resolve_name(&lister, &current, args.kind, &args.name).await?;
            events.extend(stack.push(args.kind, name)?);
        }
        TargetKind::Shoot => {
            let lister = session.lister(&current).await?;
            let shoot = resolve_shoot(&lister, &current, &args.name).await?;
            if current.project().is_none() && current.seed().is_none() {
                let project = lister
                    .project_for_namespace(&shoot.namespace)
                    .await?
                    .ok_or_else(|| {
                        GardenctlError::InvalidTarget(format!(
                            "namespace '{}' of shoot '{}' belongs to no project",
                            shoot.namespace, shoot.name
                        ))
                    })?;
                events.extend(stack.push(TargetKind::Project, project)?);
            }
            events.extend(stack.push(TargetKind::Shoot, shoot.name.clone())?);
            shoot_namespace = Some(shoot.namespace);
        }
        TargetKind::Namespace => {
            events.extend(stack.push(TargetKind::Namespace, args.name.clone())?);
        }
    }

    let target = stack.target()?;
    tracing::info!(cluster = ?target.cluster_kind(), depth = stack.len(), "Updated target");
    apply_side_effects(session, &target, args.kind).await?;
    if args.kind != TargetKind::Namespace {
        reset_dropped_namespace(session, &current, &events);
    }
    if let Some(namespace) = shoot_namespace {
        warn_access_restrictions(session, &target, &namespace).await;
    }

    session.write_target(&stack)?;
    emit(&events);
    Ok(())
}

/// Caches seed and shoot kubeconfigs and applies a targeted namespace.
async fn apply_side_effects(
    session: &mut Session,
    target: &Target,
    kind: TargetKind,
) -> anyhow::Result<()> {
    match kind {
        TargetKind::Seed | TargetKind::Shoot => {
            let fetcher = session.fetcher(target).await?;
            cache_kubeconfig(&fetcher, &session.paths.cache_dir, target).await?;
        }
        TargetKind::Namespace => {
            let path = session.kubeconfig_path(target)?;
            if let Some(namespace) = target.namespace() {
                set_context_namespace(&path, namespace)?;
            }
        }
        TargetKind::Garden | TargetKind::Project => {}
    }
    Ok(())
}

async fn warn_access_restrictions(session: &mut Session, target: &Target, namespace: &str) {
    let Some(shoot) = target.shoot() else {
        return;
    };
    let Some(garden) = target
        .garden()
        .and_then(|g| session.config.garden(g).ok())
        .cloned()
    else {
        return;
    };
    if garden.access_restrictions.is_empty() {
        return;
    }

    let access = match session.garden_client(target).await {
        Ok(client) => shoot_access(&client, namespace, shoot).await,
        Err(e) => Err(e),
    };
    match access {
        Ok(access) => {
            for msg in restriction_messages(
                &garden.access_restrictions,
                &access.match_labels,
                &access.annotations,
            ) {
                eprintln!("Access restriction: {msg}");
            }
        }
        Err(e) => tracing::warn!(%shoot, error = %e, "Cannot check access restrictions"),
    }
}

pub(crate) fn emit(events: &[TargetEvent]) {
    let sink = StdoutEventSink;
    for event in events {
        sink.emit(event);
    }
}
