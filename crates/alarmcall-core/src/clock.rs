//! Turn counter and turn budget for a single game.
//!
//! The clock is the single source of truth for how far a game has progressed.
//! It counts completed turns with checked arithmetic and knows when the turn
//! budget is spent.

/// Errors that can occur during clock operations.
#[derive(Debug, thiserror::Error)]
pub enum ClockError {
    /// Turn counter would overflow.
    #[error("turn counter overflow: cannot advance beyond u64::MAX")]
    TurnOverflow,

    /// The turn budget is zero.
    #[error("invalid turn budget: {reason}")]
    InvalidBudget {
        /// Explanation of what is wrong with the budget.
        reason: String,
    },
}

/// Counts the turns of one game against a fixed budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnClock {
    /// Turns started so far (0 before the first turn).
    turn: u64,

    /// Turn budget for the game.
    max_turns: u64,
}

impl TurnClock {
    /// Create a clock at turn 0 with the given budget.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidBudget`] if `max_turns` is 0.
    pub fn new(max_turns: u64) -> Result<Self, ClockError> {
        if max_turns == 0 {
            return Err(ClockError::InvalidBudget {
                reason: "max_turns must be at least 1".to_owned(),
            });
        }
        Ok(Self { turn: 0, max_turns })
    }

    /// Start the next turn. Returns the new (1-based) turn number.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::TurnOverflow`] if the counter would exceed
    /// `u64::MAX`.
    pub fn advance(&mut self) -> Result<u64, ClockError> {
        self.turn = self.turn.checked_add(1).ok_or(ClockError::TurnOverflow)?;
        Ok(self.turn)
    }

    /// Return the current turn number.
    pub const fn turn(&self) -> u64 {
        self.turn
    }

    /// Return the turn budget.
    pub const fn max_turns(&self) -> u64 {
        self.max_turns
    }

    /// Whether every turn of the budget has been started.
    pub const fn is_exhausted(&self) -> bool {
        self.turn >= self.max_turns
    }

    /// Go back to turn 0, keeping the budget.
    pub const fn reset(&mut self) {
        self.turn = 0;
    }

    /// Allow `turns` more turns from the current one, keeping the turn
    /// counter.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidBudget`] if `turns` is 0 and
    /// [`ClockError::TurnOverflow`] if the new budget exceeds `u64::MAX`.
    pub fn extend_budget(&mut self, turns: u64) -> Result<(), ClockError> {
        if turns == 0 {
            return Err(ClockError::InvalidBudget {
                reason: "max_turns must be at least 1".to_owned(),
            });
        }
        self.max_turns = self
            .turn
            .checked_add(turns)
            .ok_or(ClockError::TurnOverflow)?;
        Ok(())
    }
}
