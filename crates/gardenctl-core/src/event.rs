use std::fmt;

use crate::target::TargetKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetEvent {
    Targeted { kind: TargetKind, name: String },
    Dropped { kind: TargetKind, name: String },
}

impl TargetEvent {
    pub fn kind(&self) -> TargetKind {
        match self {
            Self::Targeted { kind, .. } | Self::Dropped { kind, .. } => *kind,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Targeted { name, .. } | Self::Dropped { name, .. } => name,
        }
    }
}

impl fmt::Display for TargetEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Targeted { kind, name } => write!(f, "Targeted {kind} {name}"),
            Self::Dropped { kind, name } => write!(f, "Dropped {kind} {name}"),
        }
    }
}

/// Sink for target stack events.
pub trait EventSink {
    fn emit(&self, event: &TargetEvent);
}

/// Prints each event as a line on stdout.
pub struct StdoutEventSink;

impl EventSink for StdoutEventSink {
    fn emit(&self, event: &TargetEvent) {
        tracing::debug!(kind = %event.kind(), name = %event.name(), "Target event");
        println!("{event}");
    }
}
