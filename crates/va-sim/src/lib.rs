//! # va-sim
//!
//! Deterministic stand-in for the chat-completions endpoint.
//!
//! [`ScriptedBackend`] answers each stage with a scripted outcome and records
//! every request it receives, so tests can check stage ordering, request
//! contents and fail-fast behavior without a network. A seeded
//! [`FaultInjector`] can layer random failures and latency on top; the same
//! seed always produces the same fault sequence.
//!
//! ## Usage
//!
//! ```rust
//! use va_core::ArtifactKind;
//! use va_sim::{Outcome, ScriptedBackend};
//!
//! let backend = ScriptedBackend::new()
//!     .with(ArtifactKind::Styling, Outcome::Status(500));
//! ```
//!
//! ## Reproducibility
//!
//! ```bash
//! SIM_SEED=12345 cargo test -p va-generator
//! ```

pub mod backend;
pub mod fault;
pub mod random;

pub use backend::{Outcome, RecordedCall, ScriptedBackend};
pub use fault::{FaultConfig, FaultInjector, FaultStats, InjectedFault};
pub use random::DeterministicRng;

/// Get the simulation seed from `SIM_SEED` or generate one.
///
/// The seed is logged so a failing run can be replayed.
#[must_use]
pub fn get_or_generate_seed() -> u64 {
    match std::env::var("SIM_SEED").ok().and_then(|s| s.parse().ok()) {
        Some(seed) => {
            tracing::info!(seed, "SIM_SEED from environment");
            seed
        }
        None => {
            let seed = rand::random::<u64>() | 1;
            tracing::info!(seed, "SIM_SEED randomly generated");
            seed
        }
    }
}
