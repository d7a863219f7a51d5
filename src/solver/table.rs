use super::memory::Memory;
use crate::gameplay::action::Action;
use crate::Probability;
use crate::Utility;
use std::collections::BTreeMap;

/// Per-solve arena of regret and policy accumulators.
///
/// Each (player, hand) pair claims a stable integer row exactly once;
/// after that the iteration loop indexes flat arrays directly and never
/// hashes a hand label again. Discarded when the solve returns.
#[derive(Debug, Default)]
pub struct Table {
    index: BTreeMap<(usize, String), usize>,
    rows: Vec<[Memory; Action::COUNT]>,
}

impl Table {
    /// assign-once arena index for a (player, hand) pair
    pub fn claim(&mut self, player: usize, hand: &str) -> usize {
        let key = (player, hand.to_string());
        match self.index.get(&key) {
            Some(&row) => row,
            None => {
                let row = self.rows.len();
                self.rows.push([Memory::default(); Action::COUNT]);
                self.index.insert(key, row);
                row
            }
        }
    }

    pub fn add_regret(&mut self, row: usize, action: Action, value: Utility) {
        self.rows[row][usize::from(action)].add_regret(value);
    }
    pub fn add_policy(&mut self, row: usize, action: Action, value: Probability) {
        self.rows[row][usize::from(action)].add_policy(value);
    }

    /// Regret matching: next-iteration weights proportional to positive
    /// cumulative regret, uniform when nothing is positive.
    pub fn matching(&self, row: usize, choices: &[Action]) -> Vec<Probability> {
        let regrets = choices
            .iter()
            .map(|&a| self.rows[row][usize::from(a)].regret().max(0.))
            .collect::<Vec<Utility>>();
        let total = regrets.iter().sum::<Utility>();
        match total > 0. {
            true => regrets.into_iter().map(|r| r / total).collect(),
            false => vec![1. / choices.len() as Probability; choices.len()],
        }
    }

    /// Normalized policy sums: the time-average strategy, which is the
    /// convergent object in CFR. None when the row never accumulated mass.
    pub fn average(&self, row: usize, choices: &[Action]) -> Option<Vec<Probability>> {
        let sums = choices
            .iter()
            .map(|&a| self.rows[row][usize::from(a)].policy())
            .collect::<Vec<Probability>>();
        let total = sums.iter().sum::<Probability>();
        (total > 0.).then(|| sums.into_iter().map(|s| s / total).collect())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
