use crate::Probability;
use serde::Deserialize;
use serde::Serialize;
use std::collections::BTreeMap;

/// A normalized distribution over hand labels.
///
/// Weights are renormalized to sum to one after every mutation, so a
/// Range is always a valid probability distribution (or empty). The
/// Display form is canonical and insertion-order independent, which is
/// what makes ranges safe to hash into cache keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Range {
    weights: BTreeMap<String, Probability>,
}

impl Range {
    pub fn new() -> Self {
        Self::default()
    }
    /// upsert a label, then renormalize
    pub fn add(&mut self, label: &str, weight: Probability) {
        self.weights.insert(label.to_string(), weight.max(0.));
        self.renormalize();
    }
    /// delete a label if present, then renormalize; absent labels are a no-op
    pub fn remove(&mut self, label: &str) {
        self.weights.remove(label);
        self.renormalize();
    }
    /// 0.0 for unknown labels
    pub fn frequency(&self, label: &str) -> Probability {
        self.weights.get(label).copied().unwrap_or(0.)
    }
    pub fn weights(&self) -> &BTreeMap<String, Probability> {
        &self.weights
    }
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    fn renormalize(&mut self) {
        let total = self.weights.values().sum::<Probability>();
        if total > 0. {
            for weight in self.weights.values_mut() {
                *weight /= total;
            }
        }
    }
}

impl<const N: usize> From<[(&str, Probability); N]> for Range {
    fn from(entries: [(&str, Probability); N]) -> Self {
        let mut range = Self::new();
        for (label, weight) in entries {
            range.weights.insert(label.to_string(), weight.max(0.));
        }
        range.renormalize();
        range
    }
}

/// str isomorphism, canonical form
///
/// Labels sharing a weight collapse into one sorted group; groups are
/// keyed by the fixed-precision weight. "AA,KK:0.400000 QQ:0.200000"
impl std::fmt::Display for Range {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let mut groups = BTreeMap::<String, Vec<&str>>::new();
        for (label, weight) in &self.weights {
            groups
                .entry(format!("{:.6}", weight))
                .or_default()
                .push(label);
        }
        let parts = groups
            .iter()
            .map(|(weight, labels)| format!("{}:{}", labels.join(","), weight))
            .collect::<Vec<String>>();
        write!(f, "{}", parts.join(" "))
    }
}

impl TryFrom<&str> for Range {
    type Error = String;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        let mut range = Self::new();
        for part in s.split([' ', ';']).filter(|p| !p.is_empty()) {
            let (labels, weight) = match part.rsplit_once(':') {
                Some((labels, weight)) => {
                    let weight = weight
                        .parse::<Probability>()
                        .map_err(|_| format!("invalid weight in range str: {:?}", part))?;
                    (labels, weight)
                }
                None => (part, 1.0),
            };
            for label in labels.split(',').filter(|l| !l.is_empty()) {
                range.weights.insert(label.to_string(), weight.max(0.));
            }
        }
        range.renormalize();
        Ok(range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weights_always_sum_to_one() {
        let mut range = Range::new();
        range.add("AA", 1.0);
        range.add("KK", 3.0);
        range.add("QQ", 2.0);
        range.remove("KK");
        range.remove("not in range");
        let total = range.weights().values().sum::<Probability>();
        assert!((total - 1.0).abs() < 1e-6);
        assert_eq!(range.len(), 2);
    }

    #[test]
    fn unknown_labels_have_zero_frequency() {
        let range = Range::from([("AA", 1.0)]);
        assert_eq!(range.frequency("KK"), 0.);
        assert_eq!(range.frequency("AA"), 1.);
    }

    #[test]
    fn display_is_insertion_order_independent() {
        let mut forward = Range::new();
        forward.add("AA", 0.5);
        forward.add("KK", 0.5);
        forward.add("QQ", 1.0);
        let mut backward = Range::new();
        backward.add("QQ", 1.0);
        backward.add("KK", 0.5);
        backward.add("AA", 0.5);
        assert_eq!(forward.to_string(), backward.to_string());
    }

    #[test]
    fn display_groups_equal_weights() {
        let range = Range::from([("KK", 1.0), ("AA", 1.0), ("QQ", 2.0)]);
        assert_eq!(range.to_string(), "AA,KK:0.250000 QQ:0.500000");
    }

    #[test]
    fn canonical_form_round_trips() {
        let range = Range::from([("AA", 0.6), ("KK", 0.3), ("QQ", 0.1)]);
        let reparsed = Range::try_from(range.to_string().as_str()).unwrap();
        for (label, weight) in range.weights() {
            assert!((reparsed.frequency(label) - weight).abs() < 1e-4);
        }
    }

    #[test]
    fn removal_of_last_label_leaves_empty() {
        let mut range = Range::from([("AA", 1.0)]);
        range.remove("AA");
        assert!(range.is_empty());
    }
}
