use super::action::Action;
use super::ply::Ply;
use crate::cards::card::Card;
use crate::cards::hand::Hand;
use crate::cards::street::Street;
use crate::Chips;
use anyhow::ensure;
use anyhow::Result;
use serde::Deserialize;
use serde::Serialize;

/// An immutable snapshot of the spot being solved.
///
/// Constructed fresh per request and validated once at the boundary;
/// everything downstream may assume internal consistency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spot {
    street: Street,
    pot: Chips,
    stack: Chips,
    board: Vec<Card>,
    position: String,
    players: usize,
    to_call: Chips,
    history: Vec<Ply>,
}

impl Spot {
    pub fn new(
        street: Street,
        pot: Chips,
        stack: Chips,
        board: Vec<Card>,
        position: &str,
        players: usize,
        to_call: Chips,
    ) -> Result<Self> {
        ensure!(pot >= 0., "pot must be non-negative, got {}", pot);
        ensure!(stack >= 0., "stack must be non-negative, got {}", stack);
        ensure!(to_call >= 0., "to_call must be non-negative, got {}", to_call);
        ensure!(players >= 2, "need at least 2 players, got {}", players);
        ensure!(
            board.len() == street.n_observed(),
            "{} board cards inconsistent with {}",
            board.len(),
            street
        );
        Ok(Self {
            street,
            pot,
            stack,
            board,
            position: position.to_string(),
            players,
            to_call,
            history: Vec::new(),
        })
    }

    pub fn record(mut self, ply: Ply) -> Self {
        self.history.push(ply);
        self
    }

    pub fn street(&self) -> Street {
        self.street
    }
    pub fn pot(&self) -> Chips {
        self.pot
    }
    pub fn stack(&self) -> Chips {
        self.stack
    }
    pub fn board(&self) -> &[Card] {
        &self.board
    }
    pub fn position(&self) -> &str {
        &self.position
    }
    pub fn players(&self) -> usize {
        self.players
    }
    pub fn to_call(&self) -> Chips {
        self.to_call
    }
    pub fn history(&self) -> &[Ply] {
        &self.history
    }

    /// the board as a bitset, for simulation
    pub fn table(&self) -> Hand {
        self.board
            .iter()
            .copied()
            .map(Hand::from)
            .fold(Hand::empty(), Hand::union)
    }

    /// Legal actions, derived deterministically from the snapshot.
    ///
    /// Folding is always allowed. Facing no bet we may check, otherwise
    /// call. With no bet to face and chips behind we may bet; facing a
    /// bet we may raise only with more than the call behind.
    pub fn choices(&self) -> Vec<Action> {
        let mut choices = vec![Action::Fold];
        if self.to_call == 0. {
            choices.push(Action::Check);
        } else {
            choices.push(Action::Call);
        }
        if self.to_call == 0. && self.stack > 0. {
            choices.push(Action::Bet);
        } else if self.stack > self.to_call {
            choices.push(Action::Raise);
        }
        choices
    }
}

impl std::fmt::Display for Spot {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{} pot {} stack {} to_call {} board [{}]",
            self.street,
            self.pot,
            self.stack,
            self.to_call,
            self.table(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spot(pot: Chips, stack: Chips, to_call: Chips) -> Spot {
        Spot::new(Street::Pref, pot, stack, vec![], "BTN", 2, to_call).unwrap()
    }

    #[test]
    fn facing_a_bet_we_call_or_raise() {
        assert_eq!(
            spot(1.5, 100., 1.).choices(),
            vec![Action::Fold, Action::Call, Action::Raise]
        );
    }

    #[test]
    fn unopened_we_check_or_bet() {
        assert_eq!(
            spot(2., 100., 0.).choices(),
            vec![Action::Fold, Action::Check, Action::Bet]
        );
    }

    #[test]
    fn no_chips_behind_kills_aggression() {
        assert_eq!(spot(2., 0., 0.).choices(), vec![Action::Fold, Action::Check]);
        assert_eq!(spot(2., 1., 1.).choices(), vec![Action::Fold, Action::Call]);
    }

    #[test]
    fn board_must_match_street() {
        let flop = vec![
            Card::try_from("As").unwrap(),
            Card::try_from("Kd").unwrap(),
            Card::try_from("7c").unwrap(),
        ];
        assert!(Spot::new(Street::Flop, 10., 90., flop.clone(), "BB", 2, 0.).is_ok());
        assert!(Spot::new(Street::Turn, 10., 90., flop.clone(), "BB", 2, 0.).is_err());
        assert!(Spot::new(Street::Pref, 10., 90., flop, "BB", 2, 0.).is_err());
    }

    #[test]
    fn rejects_negative_amounts_and_lone_players() {
        assert!(Spot::new(Street::Pref, -1., 100., vec![], "BB", 2, 0.).is_err());
        assert!(Spot::new(Street::Pref, 1., 100., vec![], "BB", 1, 0.).is_err());
    }

    #[test]
    fn history_is_ordered() {
        let spot = spot(1.5, 100., 1.)
            .record(Ply::from(("SB", Action::Raise, 3.)))
            .record(Ply::from(("BB", Action::Call, 3.)));
        assert_eq!(spot.history().len(), 2);
        assert_eq!(spot.history()[0].action, Action::Raise);
    }
}
