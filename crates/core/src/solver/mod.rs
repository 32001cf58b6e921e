//! Fire-spread transition kernels
//!
//! This module provides the pluggable "grid transition kernel" behind every
//! tile's propagation grid. The core abstraction is the `TransitionKernel`
//! trait, with a sequential reference implementation and a rayon-parallel one.
//!
//! # Feature Flags
//!
//! - `parallel` (default): Enables the rayon band kernel. Disable with
//!   `--no-default-features` to run the sequential kernel everywhere.
//!
//! # Example
//!
//! ```rust
//! use tree_fire_core::solver::{create_kernel, KernelBackend};
//!
//! let kernel = create_kernel(KernelBackend::Parallel);
//! assert!(!kernel.name().is_empty());
//! ```

mod cell;
mod cpu;
pub mod noise;
#[cfg(feature = "parallel")]
mod parallel;
pub mod params;
#[allow(clippy::module_name_repetitions)]
mod r#trait;

// Re-exports
pub use cell::{CellState, StepMarker};
pub use cpu::SequentialKernel;
#[cfg(feature = "parallel")]
pub use parallel::ParallelKernel;
pub use params::SpreadParams;
pub use r#trait::TransitionKernel;

use serde::{Deserialize, Serialize};

#[cfg(not(feature = "parallel"))]
use tracing::info;

/// Kernel tiling factor; grid resolutions must be a multiple of this
pub const KERNEL_TILE: usize = 8;

/// Requested kernel backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum KernelBackend {
    /// Single-threaded reference kernel
    Sequential,
    /// Rayon band-parallel kernel
    #[default]
    Parallel,
}

/// Create a transition kernel for the requested backend
///
/// Falls back to the sequential kernel when the `parallel` feature is disabled.
pub fn create_kernel(backend: KernelBackend) -> Box<dyn TransitionKernel> {
    match backend {
        KernelBackend::Sequential => Box::new(SequentialKernel),
        #[cfg(feature = "parallel")]
        KernelBackend::Parallel => Box::new(ParallelKernel),
        #[cfg(not(feature = "parallel"))]
        KernelBackend::Parallel => {
            info!("Parallel feature disabled, using sequential kernel");
            Box::new(SequentialKernel)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_sequential_kernel() {
        let kernel = create_kernel(KernelBackend::Sequential);
        assert_eq!(kernel.name(), "sequential");
        assert!(!kernel.is_parallel());
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_create_parallel_kernel() {
        let kernel = create_kernel(KernelBackend::Parallel);
        assert_eq!(kernel.name(), "parallel");
        assert!(kernel.is_parallel());
    }
}
