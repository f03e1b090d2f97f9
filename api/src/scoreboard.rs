use crate::outcome::Side;
use std::fmt;

const SCORE_SEPARATOR: char = ':';
const MATCHUP_SEPARATOR: &str = " vs ";

/// A played game's score, as stored in records: `"away:home"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Score {
    pub away: i32,
    pub home: i32,
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{SCORE_SEPARATOR}{}", self.away, self.home)
    }
}

/// The two team names of a record, as stored: `"Away vs Home"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matchup {
    pub away: String,
    pub home: String,
}

impl Matchup {
    pub fn new(away: impl Into<String>, home: impl Into<String>) -> Self {
        Self { away: away.into(), home: home.into() }
    }

    /// Stand-in names for malformed legacy data.
    pub fn placeholder() -> Self {
        Self::new("Away", "Home")
    }

    pub fn name_for(&self, side: Side) -> &str {
        match side {
            Side::Home => &self.home,
            Side::Away => &self.away,
        }
    }
}

impl fmt::Display for Matchup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{MATCHUP_SEPARATOR}{}", self.away, self.home)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    Score(String),
    Matchup(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Score(raw) => write!(f, "unparseable score: {raw:?}"),
            ParseError::Matchup(raw) => write!(f, "unparseable matchup: {raw:?}"),
        }
    }
}

impl std::error::Error for ParseError {}

/// Parse `"<away>:<home>"`. Exactly one separator, both sides integers.
pub fn parse_score(score: &str) -> Result<Score, ParseError> {
    let fail = || ParseError::Score(score.to_string());

    let mut parts = score.split(SCORE_SEPARATOR);
    let (Some(away), Some(home), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(fail());
    };

    let away = away.trim().parse::<i32>().map_err(|_| fail())?;
    let home = home.trim().parse::<i32>().map_err(|_| fail())?;
    Ok(Score { away, home })
}

pub fn try_parse_matchup(matchup: &str) -> Result<Matchup, ParseError> {
    let parts: Vec<&str> = matchup.split(MATCHUP_SEPARATOR).collect();
    match parts.as_slice() {
        [away, home] => Ok(Matchup::new(*away, *home)),
        _ => Err(ParseError::Matchup(matchup.to_string())),
    }
}

/// Lenient matchup parse for display; malformed input yields
/// [`Matchup::placeholder`].
pub fn parse_matchup(matchup: &str) -> Matchup {
    try_parse_matchup(matchup).unwrap_or_else(|_| Matchup::placeholder())
}
