use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{GardenctlError, GardenctlResult};
use crate::event::TargetEvent;

/// Deepest possible stack: garden, project or seed, shoot, namespace.
pub const MAX_DEPTH: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    Garden,
    Project,
    Seed,
    Shoot,
    Namespace,
}

impl TargetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Garden => "garden",
            Self::Project => "project",
            Self::Seed => "seed",
            Self::Shoot => "shoot",
            Self::Namespace => "namespace",
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetKind {
    type Err = GardenctlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "garden" | "gardens" => Ok(Self::Garden),
            "project" | "projects" => Ok(Self::Project),
            "seed" | "seeds" => Ok(Self::Seed),
            "shoot" | "shoots" => Ok(Self::Shoot),
            "namespace" | "ns" => Ok(Self::Namespace),
            other => Err(GardenctlError::InvalidTarget(format!(
                "unknown kind '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetEntry {
    pub kind: TargetKind,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
}

impl TargetEntry {
    pub fn new(kind: TargetKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }
}

impl fmt::Display for TargetEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.name)
    }
}

/// What the stack points at, with the positional rules already checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Unset,
    Garden {
        garden: String,
        namespace: Option<String>,
    },
    GardenProject {
        garden: String,
        project: String,
        namespace: Option<String>,
    },
    GardenProjectShoot {
        garden: String,
        project: String,
        shoot: String,
        namespace: Option<String>,
    },
    GardenSeed {
        garden: String,
        seed: String,
        namespace: Option<String>,
    },
    GardenSeedShoot {
        garden: String,
        seed: String,
        shoot: String,
        namespace: Option<String>,
    },
}

impl Target {
    pub fn garden(&self) -> Option<&str> {
        match self {
            Self::Unset => None,
            Self::Garden { garden, .. }
            | Self::GardenProject { garden, .. }
            | Self::GardenProjectShoot { garden, .. }
            | Self::GardenSeed { garden, .. }
            | Self::GardenSeedShoot { garden, .. } => Some(garden),
        }
    }

    pub fn project(&self) -> Option<&str> {
        match self {
            Self::GardenProject { project, .. } | Self::GardenProjectShoot { project, .. } => {
                Some(project)
            }
            _ => None,
        }
    }

    pub fn seed(&self) -> Option<&str> {
        match self {
            Self::GardenSeed { seed, .. } | Self::GardenSeedShoot { seed, .. } => Some(seed),
            _ => None,
        }
    }

    pub fn shoot(&self) -> Option<&str> {
        match self {
            Self::GardenProjectShoot { shoot, .. } | Self::GardenSeedShoot { shoot, .. } => {
                Some(shoot)
            }
            _ => None,
        }
    }

    pub fn namespace(&self) -> Option<&str> {
        match self {
            Self::Unset => None,
            Self::Garden { namespace, .. }
            | Self::GardenProject { namespace, .. }
            | Self::GardenProjectShoot { namespace, .. }
            | Self::GardenSeed { namespace, .. }
            | Self::GardenSeedShoot { namespace, .. } => namespace.as_deref(),
        }
    }

    /// Kind of the deepest cluster-level entry, ignoring a namespace.
    pub fn cluster_kind(&self) -> Option<TargetKind> {
        match self {
            Self::Unset => None,
            Self::Garden { .. } => Some(TargetKind::Garden),
            Self::GardenProject { .. } => Some(TargetKind::Project),
            Self::GardenSeed { .. } => Some(TargetKind::Seed),
            Self::GardenProjectShoot { .. } | Self::GardenSeedShoot { .. } => {
                Some(TargetKind::Shoot)
            }
        }
    }
}

/// Ordered garden → project|seed → shoot → namespace cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetStack {
    #[serde(default, rename = "target")]
    entries: Vec<TargetEntry>,
}

impl TargetStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a stack from raw entries, rejecting anything that breaks the positional rules.
    pub fn from_entries(entries: Vec<TargetEntry>) -> GardenctlResult<Self> {
        let stack = Self { entries };
        stack.validate()?;
        Ok(stack)
    }

    pub fn entries(&self) -> &[TargetEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&TargetEntry> {
        self.entries.last()
    }

    pub fn find(&self, kind: TargetKind) -> Option<&TargetEntry> {
        self.entries.iter().find(|e| e.kind == kind)
    }

    /// Checks every positional invariant of the stack.
    pub fn validate(&self) -> GardenctlResult<()> {
        self.target().map(|_| ())
    }

    /// Collapses the stack into its typed shape.
    pub fn target(&self) -> GardenctlResult<Target> {
        if self.entries.len() > MAX_DEPTH {
            return Err(GardenctlError::IllegalStackShape(format!(
                "{} entries exceed the maximum depth of {MAX_DEPTH}",
                self.entries.len()
            )));
        }

        let (clusters, namespace) = match self.entries.split_last() {
            Some((last, rest)) if last.kind == TargetKind::Namespace => {
                (rest, Some(last.name.clone()))
            }
            _ => (self.entries.as_slice(), None),
        };

        let illegal = || {
            let kinds: Vec<&str> = self.entries.iter().map(|e| e.kind.as_str()).collect();
            GardenctlError::IllegalStackShape(format!("[{}]", kinds.join(", ")))
        };

        use TargetKind::*;
        let target = match clusters {
            [] if namespace.is_some() => return Err(illegal()),
            [] => Target::Unset,
            [g] if g.kind == Garden => Target::Garden {
                garden: g.name.clone(),
                namespace,
            },
            [g, p] if g.kind == Garden && p.kind == Project => Target::GardenProject {
                garden: g.name.clone(),
                project: p.name.clone(),
                namespace,
            },
            [g, s] if g.kind == Garden && s.kind == Seed => Target::GardenSeed {
                garden: g.name.clone(),
                seed: s.name.clone(),
                namespace,
            },
            [g, p, s] if g.kind == Garden && p.kind == Project && s.kind == Shoot => {
                Target::GardenProjectShoot {
                    garden: g.name.clone(),
                    project: p.name.clone(),
                    shoot: s.name.clone(),
                    namespace,
                }
            }
            [g, p, s] if g.kind == Garden && p.kind == Seed && s.kind == Shoot => {
                Target::GardenSeedShoot {
                    garden: g.name.clone(),
                    seed: p.name.clone(),
                    shoot: s.name.clone(),
                    namespace,
                }
            }
            _ => return Err(illegal()),
        };
        Ok(target)
    }

    /// Targets `name` as `kind`, truncating whatever was targeted at that position or below.
    ///
    /// Returns a `Dropped` event per truncated entry, top first, followed by the `Targeted` event.
    pub fn push(
        &mut self,
        kind: TargetKind,
        name: impl Into<String>,
    ) -> GardenctlResult<Vec<TargetEvent>> {
        let name = name.into();
        if name.is_empty() {
            return Err(GardenctlError::InvalidTarget(format!("{kind} name is empty")));
        }

        let keep = match kind {
            TargetKind::Garden => 0,
            TargetKind::Project | TargetKind::Seed => {
                if self.is_empty() {
                    return Err(GardenctlError::InvalidTarget(format!(
                        "target a garden before targeting a {kind}"
                    )));
                }
                1
            }
            TargetKind::Shoot => match self.entries.get(1).map(|e| e.kind) {
                Some(TargetKind::Project | TargetKind::Seed) => 2,
                _ => {
                    return Err(GardenctlError::InvalidTarget(
                        "target a project or seed before targeting a shoot".into(),
                    ))
                }
            },
            TargetKind::Namespace => match self.last().map(|e| e.kind) {
                None => {
                    return Err(GardenctlError::InvalidTarget(
                        "target a garden before targeting a namespace".into(),
                    ))
                }
                Some(TargetKind::Namespace) => self.len() - 1,
                Some(_) => self.len(),
            },
        };

        if keep + 1 > MAX_DEPTH {
            return Err(GardenctlError::InvalidTarget(format!(
                "targeting {kind} {name} would exceed the maximum depth of {MAX_DEPTH}"
            )));
        }

        let mut events: Vec<TargetEvent> = self
            .entries
            .drain(keep..)
            .rev()
            .map(|entry| TargetEvent::Dropped {
                kind: entry.kind,
                name: entry.name,
            })
            .collect();
        self.entries.push(TargetEntry::new(kind, name.clone()));
        tracing::debug!(%kind, %name, depth = self.len(), truncated = events.len(), "Pushed target");
        events.push(TargetEvent::Targeted { kind, name });
        Ok(events)
    }

    /// Removes the last entry.
    pub fn pop(&mut self) -> GardenctlResult<TargetEvent> {
        let entry = self.entries.pop().ok_or(GardenctlError::EmptyStack)?;
        tracing::debug!(kind = %entry.kind, name = %entry.name, "Dropped target");
        Ok(TargetEvent::Dropped {
            kind: entry.kind,
            name: entry.name,
        })
    }

    /// Pops from the top until an entry of `kind` has been removed.
    ///
    /// Leaves the stack untouched when nothing of that kind is targeted.
    pub fn pop_kind(&mut self, kind: TargetKind) -> GardenctlResult<Vec<TargetEvent>> {
        if self.is_empty() {
            return Err(GardenctlError::EmptyStack);
        }
        if self.find(kind).is_none() {
            return Err(GardenctlError::NotTargeted(kind));
        }

        let mut events = Vec::new();
        loop {
            let event = self.pop()?;
            let done = event.kind() == kind;
            events.push(event);
            if done {
                return Ok(events);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stack(entries: &[(TargetKind, &str)]) -> TargetStack {
        TargetStack::from_entries(
            entries
                .iter()
                .map(|(k, n)| TargetEntry::new(*k, *n))
                .collect(),
        )
        .unwrap()
    }

    fn kinds(stack: &TargetStack) -> Vec<TargetKind> {
        stack.entries().iter().map(|e| e.kind).collect()
    }

    use TargetKind::*;

    #[test]
    fn push_requires_garden_first() {
        let mut s = TargetStack::new();
        for kind in [Project, Seed, Shoot, Namespace] {
            let err = s.push(kind, "x").unwrap_err();
            assert!(matches!(err, GardenctlError::InvalidTarget(_)), "{kind}");
        }
        assert!(s.is_empty());
        s.push(Garden, "g").unwrap();
        assert_eq!(kinds(&s), vec![Garden]);
    }

    #[test]
    fn shoot_requires_project_or_seed() {
        let mut s = stack(&[(Garden, "g")]);
        assert!(matches!(
            s.push(Shoot, "t"),
            Err(GardenctlError::InvalidTarget(_))
        ));

        let mut s = stack(&[(Garden, "g"), (Namespace, "n")]);
        assert!(s.push(Shoot, "t").is_err());
        assert_eq!(s.len(), 2);
    }

    #[test]
    fn switching_branch_truncates_to_garden() {
        let mut s = stack(&[(Garden, "g"), (Seed, "x")]);
        s.push(Project, "y").unwrap();
        assert_eq!(s, stack(&[(Garden, "g"), (Project, "y")]));

        let mut s = stack(&[(Garden, "g"), (Project, "p"), (Shoot, "t"), (Namespace, "n")]);
        s.push(Seed, "s").unwrap();
        assert_eq!(s, stack(&[(Garden, "g"), (Seed, "s")]));
    }

    #[test]
    fn push_reports_truncated_entries() {
        let mut s = stack(&[(Garden, "g"), (Namespace, "n")]);
        let events = s.push(Project, "p").unwrap();
        let rendered: Vec<String> = events.iter().map(|e| e.to_string()).collect();
        assert_eq!(rendered, vec!["Dropped namespace n", "Targeted project p"]);

        let mut s = stack(&[(Garden, "g"), (Seed, "s"), (Shoot, "t"), (Namespace, "n")]);
        let events = s.push(Garden, "h").unwrap();
        let rendered: Vec<String> = events.iter().map(|e| e.to_string()).collect();
        assert_eq!(
            rendered,
            vec![
                "Dropped namespace n",
                "Dropped shoot t",
                "Dropped seed s",
                "Dropped garden g",
                "Targeted garden h"
            ]
        );

        let mut s = stack(&[(Garden, "g")]);
        assert_eq!(
            s.push(Project, "p").unwrap(),
            vec![TargetEvent::Targeted {
                kind: Project,
                name: "p".into()
            }]
        );
    }

    #[test]
    fn retargeting_garden_resets_stack() {
        let mut s = stack(&[(Garden, "g"), (Project, "p"), (Shoot, "t")]);
        s.push(Garden, "other").unwrap();
        assert_eq!(s, stack(&[(Garden, "other")]));
    }

    #[test]
    fn retargeting_shoot_replaces_shoot_and_namespace() {
        let mut s = stack(&[(Garden, "g"), (Seed, "s"), (Shoot, "a"), (Namespace, "n")]);
        s.push(Shoot, "b").unwrap();
        assert_eq!(s, stack(&[(Garden, "g"), (Seed, "s"), (Shoot, "b")]));
    }

    #[test]
    fn namespace_is_replaced_in_place() {
        let mut s = stack(&[(Garden, "g"), (Project, "p"), (Shoot, "t"), (Namespace, "a")]);
        s.push(Namespace, "b").unwrap();
        assert_eq!(s.len(), MAX_DEPTH);
        assert_eq!(s.last(), Some(&TargetEntry::new(Namespace, "b")));
    }

    #[test]
    fn namespace_can_follow_garden_or_project() {
        let mut s = stack(&[(Garden, "g")]);
        s.push(Namespace, "kube-system").unwrap();
        assert_eq!(
            s.target().unwrap(),
            Target::Garden {
                garden: "g".into(),
                namespace: Some("kube-system".into())
            }
        );

        s.push(Project, "p").unwrap();
        s.push(Namespace, "garden-p").unwrap();
        assert_eq!(kinds(&s), vec![Garden, Project, Namespace]);
        s.push(Shoot, "t").unwrap();
        assert_eq!(kinds(&s), vec![Garden, Project, Shoot]);
    }

    #[test]
    fn push_rejects_empty_name() {
        let mut s = TargetStack::new();
        assert!(s.push(Garden, "").is_err());
    }

    #[test]
    fn push_sequences_keep_invariants() {
        let ops = [
            (Garden, "g"),
            (Namespace, "n1"),
            (Seed, "s"),
            (Shoot, "t"),
            (Namespace, "n2"),
            (Namespace, "n3"),
            (Project, "p"),
            (Shoot, "u"),
            (Namespace, "n4"),
            (Shoot, "v"),
            (Garden, "h"),
        ];
        let mut s = TargetStack::new();
        for (kind, name) in ops {
            s.push(kind, name).unwrap();
            assert!(s.len() <= MAX_DEPTH);
            s.validate().unwrap();
        }
        while !s.is_empty() {
            s.pop().unwrap();
            s.validate().unwrap();
        }
    }

    #[test]
    fn pop_removes_last_entry() {
        let mut s = stack(&[(Garden, "g"), (Seed, "s"), (Shoot, "t")]);
        let event = s.pop().unwrap();
        assert_eq!(event.to_string(), "Dropped shoot t");
        assert_eq!(s, stack(&[(Garden, "g"), (Seed, "s")]));
    }

    #[test]
    fn pop_on_empty_stack_fails() {
        let mut s = TargetStack::new();
        assert!(matches!(s.pop(), Err(GardenctlError::EmptyStack)));
        assert!(matches!(
            s.pop_kind(Project),
            Err(GardenctlError::EmptyStack)
        ));
    }

    #[test]
    fn pop_kind_unwinds_until_kind_removed() {
        let mut s = stack(&[(Garden, "g"), (Project, "p"), (Shoot, "t"), (Namespace, "n")]);
        let events = s.pop_kind(Project).unwrap();
        let rendered: Vec<String> = events.iter().map(|e| e.to_string()).collect();
        assert_eq!(
            rendered,
            vec!["Dropped namespace n", "Dropped shoot t", "Dropped project p"]
        );
        assert_eq!(s, stack(&[(Garden, "g")]));
    }

    #[test]
    fn pop_kind_namespace_only_drops_namespace() {
        let mut s = stack(&[(Garden, "g"), (Seed, "s"), (Shoot, "t"), (Namespace, "n")]);
        let events = s.pop_kind(Namespace).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(s, stack(&[(Garden, "g"), (Seed, "s"), (Shoot, "t")]));
    }

    #[test]
    fn pop_kind_not_targeted_leaves_stack() {
        let mut s = stack(&[(Garden, "g"), (Seed, "s"), (Shoot, "t")]);
        let err = s.pop_kind(Project).unwrap_err();
        assert!(matches!(err, GardenctlError::NotTargeted(Project)));
        assert_eq!(s.len(), 3);
    }

    #[test]
    fn target_shapes() {
        assert_eq!(TargetStack::new().target().unwrap(), Target::Unset);

        let t = stack(&[(Garden, "g"), (Seed, "s"), (Shoot, "t"), (Namespace, "n")])
            .target()
            .unwrap();
        assert_eq!(t.garden(), Some("g"));
        assert_eq!(t.seed(), Some("s"));
        assert_eq!(t.project(), None);
        assert_eq!(t.shoot(), Some("t"));
        assert_eq!(t.namespace(), Some("n"));
        assert_eq!(t.cluster_kind(), Some(Shoot));
    }

    #[test]
    fn illegal_shapes_are_rejected() {
        let bad: &[&[(TargetKind, &str)]] = &[
            &[(Namespace, "n")],
            &[(Project, "p")],
            &[(Garden, "g"), (Shoot, "t")],
            &[(Garden, "g"), (Project, "p"), (Seed, "s")],
            &[(Garden, "g"), (Namespace, "n"), (Shoot, "t")],
            &[(Garden, "g"), (Garden, "h")],
            &[
                (Garden, "g"),
                (Project, "p"),
                (Shoot, "t"),
                (Namespace, "n"),
                (Namespace, "m"),
            ],
        ];
        for entries in bad {
            let entries = entries
                .iter()
                .map(|(k, n)| TargetEntry::new(*k, *n))
                .collect();
            assert!(matches!(
                TargetStack::from_entries(entries),
                Err(GardenctlError::IllegalStackShape(_))
            ));
        }
    }

    #[test]
    fn kind_parsing_accepts_plurals() {
        assert_eq!("shoots".parse::<TargetKind>().unwrap(), Shoot);
        assert_eq!("ns".parse::<TargetKind>().unwrap(), Namespace);
        assert!("cluster".parse::<TargetKind>().is_err());
    }
}
