use thiserror::Error;

use crate::campaign::input::RawInfluencer;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RosterError {
    #[error("roster must keep at least one influencer")]
    LastRow,
    #[error("no influencer at position {index} (roster has {len})")]
    OutOfBounds { index: usize, len: usize },
}

/// Editable list of influencer rows backing a form. Never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Roster {
    rows: Vec<RawInfluencer>,
    added: usize,
}

impl Roster {
    pub fn new(rows: Vec<RawInfluencer>) -> Self {
        if rows.is_empty() {
            return Self::default();
        }
        let added = rows.len();
        Self { rows, added }
    }

    pub fn rows(&self) -> &[RawInfluencer] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn add(&mut self) -> &RawInfluencer {
        self.added += 1;
        self.rows.push(template_influencer(self.added));
        &self.rows[self.rows.len() - 1]
    }

    pub fn remove(&mut self, index: usize) -> Result<RawInfluencer, RosterError> {
        if index >= self.rows.len() {
            return Err(RosterError::OutOfBounds {
                index,
                len: self.rows.len(),
            });
        }
        if self.rows.len() == 1 {
            return Err(RosterError::LastRow);
        }
        self.added = self.added.saturating_sub(1);
        Ok(self.rows.remove(index))
    }

    pub fn into_rows(self) -> Vec<RawInfluencer> {
        self.rows
    }
}

impl Default for Roster {
    fn default() -> Self {
        Self::new(default_influencers())
    }
}

/// Row appended by "add influencer"; `number` is its 1-based label.
pub fn template_influencer(number: usize) -> RawInfluencer {
    RawInfluencer {
        name: format!("New KOL #{number}"),
        followers: 100_000,
        reach_rate: 5.0,
        engagement_rate: 5.0,
        deliverables: "Reels".to_string(),
        cost: 5_000.0,
        size: "Micro".to_string(),
        target: "Newcomers".to_string(),
    }
}

pub fn default_influencers() -> Vec<RawInfluencer> {
    vec![
        raw(
            "Isabela Martin",
            1_000_000,
            7.0,
            "Reels",
            10_000.0,
            "Macro",
            "Newcomers & Investors",
        ),
        raw(
            "Lucas Williams",
            800_000,
            6.0,
            "Reels",
            7_500.0,
            "Mid",
            "Newcomers & Investors",
        ),
        raw(
            "Gustavo Anderson",
            300_000,
            9.0,
            "Reels + Stories",
            7_000.0,
            "Micro",
            "Newcomers",
        ),
        raw(
            "Manuela Dubois",
            200_000,
            10.0,
            "Reels + Stories",
            5_500.0,
            "Micro",
            "Investors",
        ),
    ]
}

// Default rows use the same value for reach and engagement rate.
fn raw(
    name: &str,
    followers: i64,
    rate: f64,
    deliverables: &str,
    cost: f64,
    size: &str,
    target: &str,
) -> RawInfluencer {
    RawInfluencer {
        name: name.to_string(),
        followers,
        reach_rate: rate,
        engagement_rate: rate,
        deliverables: deliverables.to_string(),
        cost,
        size: size.to_string(),
        target: target.to_string(),
    }
}
