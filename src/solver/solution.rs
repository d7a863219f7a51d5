use crate::gameplay::range::Range;
use crate::gameplay::spot::Spot;
use crate::gameplay::strategy::Strategy;
use crate::Energy;
use serde::Deserialize;
use serde::Serialize;
use std::collections::BTreeMap;

/// The finished product of one solve: per-player, per-hand average
/// strategies plus convergence diagnostics.
///
/// Immutable once produced. Its cache key is derived from the inputs
/// (spot and ranges), never from these outputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    spot: Spot,
    ranges: BTreeMap<String, Range>,
    strategies: BTreeMap<String, BTreeMap<String, Strategy>>,
    exploitability: Energy,
    iterations: usize,
    seconds: f64,
    converged: bool,
    metadata: BTreeMap<String, String>,
}

impl Solution {
    pub fn new(
        spot: Spot,
        ranges: BTreeMap<String, Range>,
        strategies: BTreeMap<String, BTreeMap<String, Strategy>>,
        exploitability: Energy,
        iterations: usize,
        seconds: f64,
        converged: bool,
    ) -> Self {
        Self {
            spot,
            ranges,
            strategies,
            exploitability,
            iterations,
            seconds,
            converged,
            metadata: BTreeMap::from([("engine".to_string(), "cfr".to_string())]),
        }
    }

    pub fn spot(&self) -> &Spot {
        &self.spot
    }
    pub fn ranges(&self) -> &BTreeMap<String, Range> {
        &self.ranges
    }
    pub fn strategies(&self) -> &BTreeMap<String, BTreeMap<String, Strategy>> {
        &self.strategies
    }
    pub fn strategy(&self, player: &str, hand: &str) -> Option<&Strategy> {
        self.strategies.get(player)?.get(hand)
    }
    pub fn exploitability(&self) -> Energy {
        self.exploitability
    }
    pub fn iterations(&self) -> usize {
        self.iterations
    }
    pub fn seconds(&self) -> f64 {
        self.seconds
    }
    pub fn converged(&self) -> bool {
        self.converged
    }
    pub fn metadata(&self) -> &BTreeMap<String, String> {
        &self.metadata
    }
}

impl std::fmt::Display for Solution {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(
            f,
            "{} iterations in {:.2}s, exploitability {:.4}{}",
            self.iterations,
            self.seconds,
            self.exploitability,
            if self.converged { " (converged)" } else { "" },
        )?;
        for (player, hands) in &self.strategies {
            for (hand, strategy) in hands {
                writeln!(f, "  {:<4} {:<6} {}", player, hand, strategy)?;
            }
        }
        Ok(())
    }
}
