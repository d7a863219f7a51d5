use super::evaluator::Evaluator;
use super::hand::Hand;
use super::ranking::Ranking;

/// A hand's strength as a single comparable score.
///
/// Categories occupy fixed, non-overlapping bands of width BAND; within a
/// band, ties break on the category's defining rank. Kickers beyond that
/// rank are deliberately not consulted, so two ace-high hands with
/// different side cards score equal. Cheap, and close enough for
/// Monte Carlo estimation.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, PartialOrd, Ord)]
pub struct Strength(u32);

impl Strength {
    /// wider than any rank value, so bands never overlap
    const BAND: u32 = 16;
}

impl From<Ranking> for Strength {
    fn from(ranking: Ranking) -> Self {
        Self(ranking.band() * Self::BAND + u8::from(ranking.primary()) as u32)
    }
}

impl From<Hand> for Strength {
    fn from(hand: Hand) -> Self {
        Self::from(Evaluator::from(hand).ranking())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strength(s: &str) -> Strength {
        Strength::from(Hand::try_from(s).unwrap())
    }

    #[test]
    fn bands_dominate_ranks() {
        // worst one-pair beats best high card
        assert!(strength("2s 2h 4d 5c 7s") > strength("As Kh Qd Jc 9s"));
        // full house beats flush
        assert!(strength("2s 2h 2d 3c 3s") > strength("As Ks Qs Js 9s"));
    }

    #[test]
    fn ranks_break_ties_within_band() {
        assert!(strength("As Ah Kd Qc Js") > strength("Ks Kh Ad Qc Js"));
    }

    #[test]
    fn kickers_are_not_consulted() {
        assert_eq!(strength("As Kh Qd Jc 9s"), strength("As Kh Qd Jc 8s"));
    }
}
