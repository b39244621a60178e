//! Deterministic fault injection for completion calls.
//!
//! Simulates what a hosted endpoint does to a client:
//! - error statuses (5xx, 429)
//! - dropped connections
//! - bodies without the expected content path
//! - latency

use std::time::Duration;

use crate::random::DeterministicRng;

/// Statuses an overloaded endpoint tends to return.
const FAULT_STATUSES: [u16; 4] = [500, 502, 503, 429];

/// Configuration for fault injection.
#[derive(Debug, Clone)]
pub struct FaultConfig {
    /// Probability a call gets an error status (0.0 to 1.0)
    pub status_probability: f64,
    /// Probability a call fails at the transport level
    pub network_probability: f64,
    /// Probability a call returns a body without message content
    pub malformed_probability: f64,
    /// Probability a call is delayed
    pub latency_probability: f64,
    /// Maximum injected delay
    pub latency_ms_max: u64,
    /// Whether fault injection is enabled
    pub enabled: bool,
}

impl Default for FaultConfig {
    fn default() -> Self {
        Self {
            status_probability: 0.05,
            network_probability: 0.02,
            malformed_probability: 0.02,
            latency_probability: 0.1,
            latency_ms_max: 50,
            enabled: true,
        }
    }
}

impl FaultConfig {
    /// No faults.
    #[must_use]
    pub fn none() -> Self {
        Self {
            status_probability: 0.0,
            network_probability: 0.0,
            malformed_probability: 0.0,
            latency_probability: 0.0,
            latency_ms_max: 0,
            enabled: false,
        }
    }

    /// Roughly one call in three fails.
    #[must_use]
    pub fn aggressive() -> Self {
        Self {
            status_probability: 0.15,
            network_probability: 0.1,
            malformed_probability: 0.1,
            latency_probability: 0.3,
            latency_ms_max: 100,
            enabled: true,
        }
    }
}

/// A fault chosen for one call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectedFault {
    Status(u16),
    NetworkDown,
    Malformed,
}

/// Seeded fault injector. The same seed yields the same fault sequence.
pub struct FaultInjector {
    rng: DeterministicRng,
    config: FaultConfig,
    stats: FaultStats,
}

impl FaultInjector {
    pub fn new(rng: DeterministicRng, config: FaultConfig) -> Self {
        debug_assert!(
            (0.0..=1.0).contains(&config.status_probability)
                && (0.0..=1.0).contains(&config.network_probability)
                && (0.0..=1.0).contains(&config.malformed_probability)
                && (0.0..=1.0).contains(&config.latency_probability),
            "Fault probabilities must be in [0.0, 1.0]"
        );

        Self {
            rng,
            config,
            stats: FaultStats::default(),
        }
    }

    /// Decide whether the next call fails, and how.
    ///
    /// Network faults are checked first, then statuses, then malformed bodies.
    pub fn next_fault(&mut self) -> Option<InjectedFault> {
        if !self.config.enabled {
            return None;
        }

        let fault = if self.rng.gen_bool(self.config.network_probability) {
            Some(InjectedFault::NetworkDown)
        } else if self.rng.gen_bool(self.config.status_probability) {
            let status = self.rng.choose(&FAULT_STATUSES).copied().unwrap_or(500);
            Some(InjectedFault::Status(status))
        } else if self.rng.gen_bool(self.config.malformed_probability) {
            Some(InjectedFault::Malformed)
        } else {
            None
        };

        if fault.is_some() {
            self.stats.faults_count += 1;
        }
        fault
    }

    /// Delay to apply before answering, if any.
    pub fn maybe_latency(&mut self) -> Option<Duration> {
        if !self.config.enabled || self.config.latency_ms_max == 0 {
            return None;
        }

        if self.rng.gen_bool(self.config.latency_probability) {
            self.stats.delays_count += 1;
            Some(Duration::from_millis(
                self.rng.gen_range(1..=self.config.latency_ms_max),
            ))
        } else {
            None
        }
    }

    #[must_use]
    pub fn stats(&self) -> FaultStats {
        self.stats
    }
}

/// Counts of injected faults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FaultStats {
    pub faults_count: u64,
    pub delays_count: u64,
}
