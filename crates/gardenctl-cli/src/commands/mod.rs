use clap::Subcommand;

pub mod drop;
pub mod get;
pub mod kubectl;
pub mod ls;
pub mod target;

#[derive(Subcommand)]
pub enum Commands {
    /// Target a garden, project, seed, shoot or namespace
    Target(target::TargetArgs),
    /// Drop the last target, or everything up to and including a kind
    Drop(drop::DropArgs),
    /// List gardens, projects, seeds or shoots
    Ls(ls::LsArgs),
    /// Show the target, its kubeconfig, or a garden cluster object
    Get(get::GetArgs),
    /// Run kubectl against the targeted cluster
    Kubectl(kubectl::KubectlArgs),
}
