use super::card::Card;
use super::hand::Hand;

/// The cards still available to be dealt.
///
/// Thin wrapper over Hand with random selection via ::draw().
#[derive(Debug, Clone, Copy)]
pub struct Deck(Hand);

impl Deck {
    pub fn new() -> Self {
        Self(Hand::from((1u64 << 52) - 1))
    }
    /// everything except the committed cards
    pub fn without(committed: Hand) -> Self {
        Self(committed.complement())
    }
    pub fn size(&self) -> usize {
        self.0.size()
    }
    /// remove and return a uniformly random remaining card
    pub fn draw<R: rand::Rng>(&mut self, rng: &mut R) -> Card {
        assert!(self.0.size() > 0);
        let i = rng.random_range(0..self.0.size());
        let mut bits = u64::from(self.0);
        for _ in 0..i {
            bits &= bits - 1;
        }
        let card = Card::from(bits.trailing_zeros() as u8);
        self.0.remove(card);
        card
    }
}

impl From<Hand> for Deck {
    fn from(hand: Hand) -> Self {
        Self(hand)
    }
}
impl From<Deck> for Hand {
    fn from(deck: Deck) -> Self {
        deck.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_deck_holds_fifty_two() {
        assert_eq!(Deck::new().size(), 52);
    }

    #[test]
    fn draw_exhausts_without_repeats() {
        let mut rng = rand::rng();
        let mut deck = Deck::new();
        let mut seen = Hand::empty();
        for _ in 0..52 {
            let card = deck.draw(&mut rng);
            assert!(!seen.contains(card));
            seen = Hand::add(seen, Hand::from(card));
        }
        assert_eq!(deck.size(), 0);
    }

    #[test]
    fn committed_cards_never_drawn() {
        let mut rng = rand::rng();
        let committed = Hand::try_from("AsKsQs").unwrap();
        let mut deck = Deck::without(committed);
        assert_eq!(deck.size(), 49);
        for _ in 0..49 {
            assert!(!committed.contains(deck.draw(&mut rng)));
        }
    }
}
