use super::action::Action;
use crate::Probability;
use crate::Utility;
use serde::Deserialize;
use serde::Serialize;
use std::collections::BTreeMap;

/// A probability distribution over actions for one (player, hand) pair.
///
/// Normalized on construction; collecting an all-zero weight vector
/// yields an empty strategy, which callers should replace with a
/// sensible default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Strategy {
    weights: BTreeMap<Action, Probability>,
    ev: Option<Utility>,
}

impl Strategy {
    /// all mass on a single action
    pub fn pure(action: Action) -> Self {
        Self {
            weights: BTreeMap::from([(action, 1.0)]),
            ev: None,
        }
    }
    pub fn with_ev(mut self, ev: Utility) -> Self {
        self.ev = Some(ev);
        self
    }
    /// 0.0 for actions outside the support
    pub fn density(&self, action: Action) -> Probability {
        self.weights.get(&action).copied().unwrap_or(0.)
    }
    pub fn ev(&self) -> Option<Utility> {
        self.ev
    }
    pub fn weights(&self) -> &BTreeMap<Action, Probability> {
        &self.weights
    }
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

/// normalizing constructor; zero or negative weights are dropped
impl FromIterator<(Action, Probability)> for Strategy {
    fn from_iter<I: IntoIterator<Item = (Action, Probability)>>(iter: I) -> Self {
        let weights = iter
            .into_iter()
            .filter(|(_, w)| *w > 0.)
            .collect::<BTreeMap<Action, Probability>>();
        let total = weights.values().sum::<Probability>();
        Self {
            weights: weights
                .into_iter()
                .map(|(a, w)| (a, w / total))
                .collect(),
            ev: None,
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for (action, weight) in &self.weights {
            write!(f, "{} {:.3} ", action, weight)?;
        }
        Ok(())
    }
}
