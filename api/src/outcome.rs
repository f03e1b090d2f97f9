use serde::{Deserialize, Serialize};

/// Which of the two teams the user was cheering for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    #[default]
    Home,
    Away,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Side::Home => Side::Away,
            Side::Away => Side::Home,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Side::Home => "HOME",
            Side::Away => "AWAY",
        }
    }
}

/// How an attended game ended, relative to the user's side.
///
/// Serialized as its upper-case label. Labels this version does not know
/// deserialize as `Scheduled`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Outcome {
    Win,
    Lose,
    Draw,
    #[default]
    Scheduled,
}

impl Outcome {
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Win => "WIN",
            Outcome::Lose => "LOSE",
            Outcome::Draw => "DRAW",
            Outcome::Scheduled => "SCHEDULED",
        }
    }

    pub fn from_label(label: &str) -> Self {
        match label {
            "WIN" => Outcome::Win,
            "LOSE" => Outcome::Lose,
            "DRAW" => Outcome::Draw,
            _ => Outcome::Scheduled,
        }
    }

    /// The same game seen from the other side.
    pub fn flip(self) -> Self {
        match self {
            Outcome::Win => Outcome::Lose,
            Outcome::Lose => Outcome::Win,
            other => other,
        }
    }
}

impl From<String> for Outcome {
    fn from(label: String) -> Self {
        Outcome::from_label(&label)
    }
}

impl From<Outcome> for String {
    fn from(outcome: Outcome) -> Self {
        outcome.label().to_string()
    }
}

/// Derive the outcome label for `side` from a pair of scores.
///
/// Either score missing means the game has not been played yet.
pub fn compute_outcome(side: Side, away_score: Option<i32>, home_score: Option<i32>) -> Outcome {
    let (Some(away), Some(home)) = (away_score, home_score) else {
        return Outcome::Scheduled;
    };

    let (mine, theirs) = match side {
        Side::Home => (home, away),
        Side::Away => (away, home),
    };

    match mine.cmp(&theirs) {
        std::cmp::Ordering::Greater => Outcome::Win,
        std::cmp::Ordering::Less => Outcome::Lose,
        std::cmp::Ordering::Equal => Outcome::Draw,
    }
}

/// Same as [`compute_outcome`], for raw form text. Empty or non-numeric text
/// counts as a missing score.
pub fn compute_outcome_from_text(side: Side, away_score: &str, home_score: &str) -> Outcome {
    compute_outcome(side, parse_score_text(away_score), parse_score_text(home_score))
}

pub(crate) fn parse_score_text(text: &str) -> Option<i32> {
    text.trim().parse::<i32>().ok()
}
