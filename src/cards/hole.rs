use super::card::Card;
use super::hand::Hand;
use super::rank::Rank;
use super::suit::Suit;

/// Exactly two hole cards.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, PartialOrd, Ord)]
pub struct Hole(Hand);

impl Hole {
    /// Expand a hand label into its concrete two-card combos.
    ///
    /// "AsAh" names one combo; "AA" a pair class (6 combos); "AKs" suited
    /// (4); "AKo" offsuit (12); "AK" both (16). Unrecognized labels expand
    /// to nothing, mirroring the dead-hand treatment in equity estimation.
    pub fn expand(label: &str) -> Vec<Self> {
        let chars = label.chars().collect::<Vec<char>>();
        match chars.len() {
            2 => match (Rank::try_from(chars[0]), Rank::try_from(chars[1])) {
                (Ok(hi), Ok(lo)) if hi == lo => Self::paired(hi),
                (Ok(hi), Ok(lo)) => std::iter::empty()
                    .chain(Self::suited(hi, lo))
                    .chain(Self::offsuit(hi, lo))
                    .collect(),
                _ => vec![],
            },
            3 => match (
                Rank::try_from(chars[0]),
                Rank::try_from(chars[1]),
                chars[2].to_ascii_lowercase(),
            ) {
                (Ok(hi), Ok(lo), 's') if hi != lo => Self::suited(hi, lo),
                (Ok(hi), Ok(lo), 'o') if hi != lo => Self::offsuit(hi, lo),
                _ => vec![],
            },
            4 => Hand::try_from(label)
                .ok()
                .filter(|hand| hand.size() == 2)
                .map(Self)
                .into_iter()
                .collect(),
            _ => vec![],
        }
    }

    fn paired(rank: Rank) -> Vec<Self> {
        let suits = Suit::all();
        let mut combos = Vec::new();
        for i in 0..suits.len() {
            for j in i + 1..suits.len() {
                let a = Card::from((rank, suits[i]));
                let b = Card::from((rank, suits[j]));
                combos.push(Self::from((a, b)));
            }
        }
        combos
    }
    fn suited(hi: Rank, lo: Rank) -> Vec<Self> {
        Suit::all()
            .iter()
            .map(|&s| Self::from((Card::from((hi, s)), Card::from((lo, s)))))
            .collect()
    }
    fn offsuit(hi: Rank, lo: Rank) -> Vec<Self> {
        let mut combos = Vec::new();
        for &a in Suit::all() {
            for &b in Suit::all() {
                if a != b {
                    combos.push(Self::from((Card::from((hi, a)), Card::from((lo, b)))));
                }
            }
        }
        combos
    }
}

impl From<(Card, Card)> for Hole {
    fn from(cards: (Card, Card)) -> Self {
        assert!(cards.0 != cards.1);
        Self(Hand::union(Hand::from(cards.0), Hand::from(cards.1)))
    }
}
impl From<Hole> for Hand {
    fn from(hole: Hole) -> Self {
        hole.0
    }
}

impl TryFrom<&str> for Hole {
    type Error = String;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        let hand = Hand::try_from(s)?;
        match hand.size() {
            2 => Ok(Self(hand)),
            n => Err(format!("hole wants 2 cards, got {}: {:?}", n, s)),
        }
    }
}

impl std::fmt::Display for Hole {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
