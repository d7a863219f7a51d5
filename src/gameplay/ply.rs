use super::action::Action;
use crate::Chips;
use serde::Deserialize;
use serde::Serialize;

/// One entry in a spot's action history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ply {
    pub position: String,
    pub action: Action,
    pub amount: Chips,
}

impl From<(&str, Action, Chips)> for Ply {
    fn from((position, action, amount): (&str, Action, Chips)) -> Self {
        Self {
            position: position.to_string(),
            action,
            amount,
        }
    }
}

impl std::fmt::Display for Ply {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{} {} {}", self.position, self.action, self.amount)
    }
}
