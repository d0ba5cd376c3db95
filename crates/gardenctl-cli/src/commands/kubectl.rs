use clap::Args;
use tokio::process::Command;

use crate::session::Session;

/// kubectl ran but exited unsuccessfully; gardenctl exits with the same code.
#[derive(Debug, thiserror::Error)]
#[error("kubectl exited with status {0}")]
pub struct KubectlExit(pub i32);

impl KubectlExit {
    /// Process exit code, falling back to 1 when the status does not fit.
    pub fn code(&self) -> u8 {
        u8::try_from(self.0).ok().filter(|c| *c != 0).unwrap_or(1)
    }
}

#[derive(Args)]
pub struct KubectlArgs {
    /// Arguments passed through to kubectl
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

pub async fn execute(args: KubectlArgs, session: &mut Session) -> anyhow::Result<()> {
    let target = session.read_target()?.target()?;
    let kubeconfig = session.kubeconfig_path(&target)?;
    let argv = kubectl_args(args.args, target.namespace());

    tracing::info!(kubeconfig = %kubeconfig.display(), args = ?argv, "Running kubectl");
    let status = Command::new("kubectl")
        .args(&argv)
        .env("KUBECONFIG", &kubeconfig)
        .status()
        .await
        .map_err(|e| anyhow::anyhow!("failed to execute kubectl: {e}"))?;

    if !status.success() {
        return Err(KubectlExit(status.code().unwrap_or(1)).into());
    }
    Ok(())
}

/// Adds `--namespace` for a targeted namespace unless the caller chose one.
fn kubectl_args(mut args: Vec<String>, namespace: Option<&str>) -> Vec<String> {
    let chooses_namespace = args.iter().any(|a| {
        a == "-n"
            || a == "-A"
            || a == "--all-namespaces"
            || a.starts_with("--namespace")
            || (a.starts_with("-n") && a.len() > 2 && !a.starts_with("--"))
    });
    if let Some(ns) = namespace {
        if !chooses_namespace {
            args.push(format!("--namespace={ns}"));
        }
    }
    args
}
