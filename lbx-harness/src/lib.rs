pub mod cleanup;
pub mod config;
pub mod errors;
pub mod lifecycle;
pub mod poller;
pub mod verify;

pub use cleanup::CleanupContext;
pub use config::{HarnessConfig, WaitSettings};
pub use errors::*;
pub use lifecycle::LbHarness;
pub use poller::{StatusTarget, WaitKind, WaitMachine, WaitVerdict};
pub use verify::{ExpectedStatusTree, TreeLevel, verify_status_tree};
