use serde::Deserialize;
use serde::Serialize;

/// A betting decision, abstracted away from its size.
///
/// Sizes live on the history records and in the solver's payoff model;
/// keeping the enum fieldless lets it serve as a map key for strategies
/// and as a flat index into regret rows.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Action {
    Fold = 0,
    Check = 1,
    Call = 2,
    Bet = 3,
    Raise = 4,
    AllIn = 5,
}

impl Action {
    pub const COUNT: usize = 6;
    pub const fn all() -> &'static [Self] {
        &[
            Self::Fold,
            Self::Check,
            Self::Call,
            Self::Bet,
            Self::Raise,
            Self::AllIn,
        ]
    }
}

/// usize injection: row offset in regret tables
impl From<Action> for usize {
    fn from(a: Action) -> usize {
        a as usize
    }
}

/// str isomorphism
impl TryFrom<&str> for Action {
    type Error = String;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s.to_ascii_lowercase().as_str() {
            "fold" => Ok(Self::Fold),
            "check" => Ok(Self::Check),
            "call" => Ok(Self::Call),
            "bet" => Ok(Self::Bet),
            "raise" => Ok(Self::Raise),
            "allin" | "all-in" | "all_in" => Ok(Self::AllIn),
            _ => Err(format!("invalid action str: {:?}", s)),
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Fold => write!(f, "FOLD"),
            Self::Check => write!(f, "CHECK"),
            Self::Call => write!(f, "CALL"),
            Self::Bet => write!(f, "BET"),
            Self::Raise => write!(f, "RAISE"),
            Self::AllIn => write!(f, "ALLIN"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bijective_str() {
        for action in Action::all() {
            assert_eq!(
                Action::try_from(action.to_string().as_str()),
                Ok(*action)
            );
        }
    }

    #[test]
    fn indexes_are_dense() {
        for (i, action) in Action::all().iter().enumerate() {
            assert_eq!(usize::from(*action), i);
        }
    }
}
