pub mod cache;
pub mod cards;
pub mod equity;
pub mod gameplay;
pub mod solver;

/// Pot sizes, stack sizes, and bet amounts in big blinds.
pub type Chips = f32;
/// Expected values, regrets, and payoffs.
pub type Utility = f32;
/// Strategy weights, equities, and frequencies.
pub type Probability = f32;
/// Convergence thresholds and distance measures.
pub type Energy = f32;

/// Default iteration budget for a single solve.
pub const CFR_ITERATIONS: usize = 1_000;
/// Exploitability is polled every this many iterations.
pub const CFR_CHECKPOINT: usize = 100;
/// Pot-normalized exploitability below which a solve stops early.
pub const CONVERGENCE_THRESHOLD: Energy = 0.005;
/// Monte Carlo trials per matchup when the solver prices a hand against a range.
pub const EQUITY_SAMPLES: usize = 400;
/// Bounded capacity of the in-memory equity tier.
pub const EQUITY_CACHE_SIZE: usize = 10_000;
/// Bounded capacity of the in-memory solution tier.
pub const SOLUTION_CACHE_SIZE: usize = 1_000;
/// Most-recently-modified disk entries eagerly warmed into memory at startup.
pub const CACHE_WARM_LIMIT: usize = 1_000;
/// Envelope version stamped into every disk-cache file.
pub const FORMAT_VERSION: u32 = 1;
/// Attempts before a transient solve failure is propagated.
pub const RETRY_ATTEMPTS: usize = 3;
/// Fixed delay between solve attempts in milliseconds.
pub const RETRY_DELAY_MS: u64 = 100;

/// Random instance generation for testing and Monte Carlo sampling.
pub trait Arbitrary {
    /// Generate a uniformly random instance.
    fn random() -> Self;
}
