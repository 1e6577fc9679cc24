use rand::Rng;

pub const MIN_TARGET: u32 = 1;
pub const MAX_TARGET: u32 = 100;
pub const MAX_ATTEMPTS: u32 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessOutcome {
    Correct,
    TooLow,
    TooHigh,
}

#[derive(Debug, Clone)]
pub struct NumGuess {
    target: u32,
    guesses: Vec<u32>,
}

impl NumGuess {
    pub fn new() -> Self {
        let target = rand::rng().random_range(MIN_TARGET..=MAX_TARGET);
        Self::with_target(target)
    }

    pub fn with_target(target: u32) -> Self {
        Self {
            target,
            guesses: Vec::new(),
        }
    }

    pub fn target(&self) -> u32 {
        self.target
    }

    pub fn attempts(&self) -> u32 {
        self.guesses.len() as u32
    }

    pub fn remaining(&self) -> u32 {
        MAX_ATTEMPTS.saturating_sub(self.attempts())
    }

    pub fn guesses(&self) -> &[u32] {
        &self.guesses
    }

    /// Record a guess. `None` when no attempts remain.
    pub fn guess(&mut self, value: u32) -> Option<GuessOutcome> {
        if self.remaining() == 0 {
            return None;
        }
        self.guesses.push(value);
        Some(match value.cmp(&self.target) {
            std::cmp::Ordering::Equal => GuessOutcome::Correct,
            std::cmp::Ordering::Less => GuessOutcome::TooLow,
            std::cmp::Ordering::Greater => GuessOutcome::TooHigh,
        })
    }

    /// Binary search over the interval the previous feedback leaves open.
    pub fn ai_move(&self) -> u32 {
        if self.guesses.is_empty() {
            return 50;
        }
        let mut min = MIN_TARGET;
        let mut max = MAX_TARGET;
        for &g in &self.guesses {
            if g < self.target {
                min = min.max(g + 1);
            } else if g > self.target {
                max = max.min(g.saturating_sub(1));
            }
        }
        min.midpoint(max)
    }
}

impl Default for NumGuess {
    fn default() -> Self {
        Self::new()
    }
}
