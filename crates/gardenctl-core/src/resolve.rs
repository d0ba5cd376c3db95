use async_trait::async_trait;

use crate::error::{GardenctlError, GardenctlResult};
use crate::target::{Target, TargetKind};

/// Which shoots a listing should cover.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShootScope {
    All,
    /// Shoots living in a project namespace.
    Namespace(String),
    /// Shoots scheduled onto a seed.
    Seed(String),
}

/// A shoot as seen from the garden cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShootRef {
    pub name: String,
    pub namespace: String,
    pub seed: Option<String>,
}

/// Read access to the objects a target name can refer to.
#[async_trait]
pub trait ClusterLister: Send + Sync {
    fn list_gardens(&self) -> Vec<String>;

    async fn list_seeds(&self) -> GardenctlResult<Vec<String>>;

    async fn list_projects(&self) -> GardenctlResult<Vec<String>>;

    /// Namespace backing a project, e.g. `garden-dev` for project `dev`.
    async fn project_namespace(&self, project: &str) -> GardenctlResult<String>;

    /// Project owning a namespace, if any.
    async fn project_for_namespace(&self, namespace: &str) -> GardenctlResult<Option<String>>;

    async fn list_shoots(&self, scope: &ShootScope) -> GardenctlResult<Vec<ShootRef>>;
}

/// Names matching `pattern`, in the order they were given.
///
/// Without `*` the pattern must equal the name. `*x*` matches names containing
/// `x`, `x*` matches the prefix and `*x` the suffix.
pub fn match_names<'a, I>(pattern: &str, names: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let matcher: Box<dyn Fn(&str) -> bool + '_> = if !pattern.contains('*') {
        Box::new(|name: &str| name == pattern)
    } else if pattern.len() >= 2 && pattern.starts_with('*') && pattern.ends_with('*') {
        let needle = &pattern[1..pattern.len() - 1];
        Box::new(move |name: &str| name.contains(needle))
    } else if pattern == "*" {
        Box::new(|_: &str| true)
    } else if let Some(prefix) = pattern.strip_suffix('*') {
        Box::new(move |name: &str| name.starts_with(prefix))
    } else if let Some(suffix) = pattern.strip_prefix('*') {
        Box::new(move |name: &str| name.ends_with(suffix))
    } else {
        Box::new(|name: &str| name == pattern)
    };

    names
        .into_iter()
        .filter(|name| matcher(name))
        .map(str::to_string)
        .collect()
}

/// Shoot listing scope implied by what is currently targeted.
pub async fn shoot_scope(
    lister: &dyn ClusterLister,
    target: &Target,
) -> GardenctlResult<ShootScope> {
    if let Some(project) = target.project() {
        return Ok(ShootScope::Namespace(lister.project_namespace(project).await?));
    }
    if let Some(seed) = target.seed() {
        return Ok(ShootScope::Seed(seed.to_string()));
    }
    Ok(ShootScope::All)
}

/// All names of `kind` matching `pattern` under `target`.
pub async fn resolve_names(
    lister: &dyn ClusterLister,
    target: &Target,
    kind: TargetKind,
    pattern: &str,
) -> GardenctlResult<Vec<String>> {
    let names = match kind {
        TargetKind::Garden => lister.list_gardens(),
        TargetKind::Seed => lister.list_seeds().await?,
        TargetKind::Project => lister.list_projects().await?,
        TargetKind::Shoot => {
            let scope = shoot_scope(lister, target).await?;
            lister
                .list_shoots(&scope)
                .await?
                .into_iter()
                .map(|s| s.name)
                .collect()
        }
        TargetKind::Namespace => {
            return Err(GardenctlError::InvalidTarget(
                "namespaces are targeted by exact name".into(),
            ))
        }
    };

    let matches = match_names(pattern, names.iter().map(String::as_str));
    tracing::debug!(%kind, pattern, candidates = names.len(), matches = matches.len(), "Resolved name");
    Ok(matches)
}

/// Reduces a match list to one name, or reports why it cannot.
pub fn single_match(
    kind: TargetKind,
    pattern: &str,
    mut matches: Vec<String>,
) -> GardenctlResult<String> {
    match matches.len() {
        0 => Err(GardenctlError::NoMatch {
            kind,
            pattern: pattern.to_string(),
        }),
        1 => Ok(matches.remove(0)),
        _ => Err(GardenctlError::AmbiguousMatch {
            kind,
            pattern: pattern.to_string(),
            candidates: matches,
        }),
    }
}

/// Resolves `pattern` to exactly one name of `kind`.
pub async fn resolve_name(
    lister: &dyn ClusterLister,
    target: &Target,
    kind: TargetKind,
    pattern: &str,
) -> GardenctlResult<String> {
    let matches = resolve_names(lister, target, kind, pattern).await?;
    single_match(kind, pattern, matches)
}

/// Resolves `pattern` to exactly one shoot within the scope of `target`.
///
/// Shoot names are only unique per namespace, so ambiguous candidates are
/// reported as `namespace/name`.
pub async fn resolve_shoot(
    lister: &dyn ClusterLister,
    target: &Target,
    pattern: &str,
) -> GardenctlResult<ShootRef> {
    let scope = shoot_scope(lister, target).await?;
    let mut matches: Vec<ShootRef> = lister
        .list_shoots(&scope)
        .await?
        .into_iter()
        .filter(|s| !match_names(pattern, [s.name.as_str()]).is_empty())
        .collect();

    match matches.len() {
        0 => Err(GardenctlError::NoMatch {
            kind: TargetKind::Shoot,
            pattern: pattern.to_string(),
        }),
        1 => Ok(matches.remove(0)),
        _ => Err(GardenctlError::AmbiguousMatch {
            kind: TargetKind::Shoot,
            pattern: pattern.to_string(),
            candidates: matches
                .iter()
                .map(|s| format!("{}/{}", s.namespace, s.name))
                .collect(),
        }),
    }
}
