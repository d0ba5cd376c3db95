use clap::Args;

use gardenctl_core::event::TargetEvent;
use gardenctl_core::target::{Target, TargetKind};
use gardenctl_k8s::kubeconfig::reset_context_namespace;

use crate::commands::target::emit;
use crate::session::Session;

#[derive(Args)]
pub struct DropArgs {
    /// Drop everything up to and including this kind (default: the last target)
    pub kind: Option<TargetKind>,
}

pub async fn execute(args: DropArgs, session: &mut Session) -> anyhow::Result<()> {
    let mut stack = session.read_target()?;
    let before = stack.target()?;

    let events = match args.kind {
        Some(kind) => stack.pop_kind(kind)?,
        None => vec![stack.pop()?],
    };

    reset_dropped_namespace(session, &before, &events);
    session.write_target(&stack)?;
    emit(&events);
    Ok(())
}

/// Resets the kubeconfig namespace of `before` if `events` dropped a namespace.
///
/// Failures only log a warning.
pub(crate) fn reset_dropped_namespace(session: &Session, before: &Target, events: &[TargetEvent]) {
    let dropped = events
        .iter()
        .any(|e| matches!(e, TargetEvent::Dropped { kind: TargetKind::Namespace, .. }));
    if !dropped {
        return;
    }
    // The namespace was applied to the kubeconfig in use before the drop.
    if let Err(e) = session
        .kubeconfig_path(before)
        .and_then(|path| reset_context_namespace(&path))
    {
        tracing::warn!(error = %e, "Cannot reset kubeconfig namespace");
    }
}
