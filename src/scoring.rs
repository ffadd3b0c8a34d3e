//! Best-score records and par labels
//!
//! Each player keeps one record across sessions, indexed by hole number.

use serde::{Deserialize, Serialize};

/// A player's best score and the par it was played against, per hole
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedState {
    pub scores: Vec<Option<u32>>,
    pub pars: Vec<Option<u32>>,
}

impl PersistedState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a finished hole. The par is always refreshed; the score is kept
    /// only when it beats the stored one. Returns true if the score was written.
    pub fn record(&mut self, hole: usize, par: u32, score: u32) -> bool {
        if self.pars.len() <= hole {
            self.pars.resize(hole + 1, None);
        }
        if self.scores.len() <= hole {
            self.scores.resize(hole + 1, None);
        }
        self.pars[hole] = Some(par);

        let improved = self.scores[hole].is_none_or(|best| score < best);
        if improved {
            self.scores[hole] = Some(score);
        }
        improved
    }

    pub fn best_score(&self, hole: usize) -> Option<u32> {
        self.scores.get(hole).copied().flatten()
    }

    pub fn par(&self, hole: usize) -> Option<u32> {
        self.pars.get(hole).copied().flatten()
    }

    /// Number of holes with a recorded score
    pub fn holes_played(&self) -> usize {
        self.scores.iter().flatten().count()
    }

    /// Sum of best score minus par over every hole with both recorded
    pub fn strokes_to_par(&self) -> i64 {
        self.scores
            .iter()
            .zip(&self.pars)
            .filter_map(|(score, par)| Some(i64::from((*score)?) - i64::from((*par)?)))
            .sum()
    }

    /// Label for the best score on `hole`, if both score and par are known
    pub fn label(&self, hole: usize) -> Option<String> {
        let score = self.best_score(hole)?;
        let par = self.par(hole)?;
        Some(to_par_name(saturating_i32(par), saturating_i32(score)))
    }
}

/// Clamp a stored count into the range `to_par_name` takes
pub fn saturating_i32(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

/// Golf name for `shots` taken on a hole of `par`
pub fn to_par_name(par: i32, shots: i32) -> String {
    let diff = i64::from(shots) - i64::from(par);
    match diff {
        -4 => "Condor!".to_string(),
        -3 => "Albatross!".to_string(),
        -2 => "Eagle!".to_string(),
        -1 => "Birdie!".to_string(),
        0 => "Par".to_string(),
        1 => "Bogey".to_string(),
        2 => "Double Bogey".to_string(),
        3 => "Triple Bogey".to_string(),
        d if d > 0 => format!("{} over par", d),
        d => format!("{} under par", -d),
    }
}
