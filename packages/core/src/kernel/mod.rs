//! Kernel module - ports, substrate adapters and the composition root.

pub mod deps;
pub mod storage;
pub mod telemetry;
pub mod test_dependencies;
pub mod traits;

pub use deps::CoreDeps;
pub use storage::{FileStore, MemoryStore};
pub use telemetry::init_tracing;
pub use test_dependencies::TestDependencies;
pub use traits::*;
