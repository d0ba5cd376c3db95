pub mod access;
pub mod config;
pub mod error;
pub mod event;
pub mod kubeconfig;
pub mod resolve;
pub mod store;
pub mod target;

pub use error::{GardenctlError, GardenctlResult};
pub use target::{Target, TargetEntry, TargetKind, TargetStack};
