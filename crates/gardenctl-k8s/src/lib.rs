pub mod client;
pub mod gardener;
pub mod kubeconfig;
pub mod lister;
pub mod objects;
pub mod secrets;
