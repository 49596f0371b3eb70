//! Roll-call ballot tallying.
//!
//! Turns legislative roll-call votes into rating records. For every member
//! and every bill subject the rating is the share of that member's votes on
//! bills tagged with the subject that were "yea".
//!
//! A ballot document looks like:
//!
//! ```json
//! {
//!   "subjects": ["Taxation", "Health"],
//!   "votes": {
//!     "Aye": [{"id": "A000001", "state": "CA", "party": "D"}],
//!     "No":  [{"id": "B000002", "state": "TX", "party": "R"}]
//!   }
//! }
//! ```

use crate::error::Result;
use crate::parser::read_to_string;
use crate::types::RatingRecord;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use tracing::{debug, info};

/// Vote positions counted as "yea"
pub const YEA_POSITIONS: [&str; 3] = ["Aye", "Yea", "Yay"];

/// One member's entry in a ballot
#[derive(Debug, Clone, Deserialize)]
pub struct Voter {
    pub id: String,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub party: Option<String>,
}

/// A single roll call together with the subjects of the bill voted on
#[derive(Debug, Clone, Deserialize)]
pub struct Ballot {
    pub subjects: Vec<String>,
    /// Position name ("Aye", "No", "Not Voting", ...) -> voters
    pub votes: HashMap<String, Vec<Voter>>,
}

impl Ballot {
    /// A ballot without any yea position was never actually voted on
    pub fn was_voted_on(&self) -> bool {
        YEA_POSITIONS
            .iter()
            .any(|position| self.votes.contains_key(*position))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct SubjectCount {
    yea: u32,
    total: u32,
}

/// Running per-member, per-subject vote counts
#[derive(Debug, Default)]
pub struct VoteTally {
    counts: BTreeMap<String, BTreeMap<String, SubjectCount>>,
    ballots_counted: usize,
    ballots_skipped: usize,
}

impl VoteTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add every vote of a ballot to the tally.
    ///
    /// Returns `false` (and counts nothing) for ballots that were not voted on.
    pub fn record_ballot(&mut self, ballot: &Ballot) -> bool {
        if !ballot.was_voted_on() {
            self.ballots_skipped += 1;
            return false;
        }

        for (position, voters) in &ballot.votes {
            let is_yea = YEA_POSITIONS.contains(&position.as_str());
            for voter in voters {
                let member = self.counts.entry(voter.id.clone()).or_default();
                for subject in &ballot.subjects {
                    let count = member.entry(subject.clone()).or_default();
                    count.total += 1;
                    if is_yea {
                        count.yea += 1;
                    }
                }
            }
        }

        self.ballots_counted += 1;
        true
    }

    /// (ballots counted, ballots skipped)
    pub fn ballot_counts(&self) -> (usize, usize) {
        (self.ballots_counted, self.ballots_skipped)
    }

    /// One record per (member, subject) with the yea share as rating,
    /// ordered by member then subject.
    pub fn into_records(self) -> Vec<RatingRecord> {
        self.counts
            .into_iter()
            .flat_map(|(member, subjects)| {
                subjects.into_iter().map(move |(subject, count)| {
                    RatingRecord::new(
                        member.clone(),
                        subject,
                        count.yea as f64 / count.total as f64,
                    )
                })
            })
            .collect()
    }
}

/// Parse a single ballot document
pub fn parse_ballot(path: &Path) -> Result<Ballot> {
    let content = read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Tally every ballot file into rating records
pub fn parse_ballots<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<RatingRecord>> {
    let mut tally = VoteTally::new();

    for path in paths {
        let path = path.as_ref();
        let ballot = parse_ballot(path)?;
        if !tally.record_ballot(&ballot) {
            debug!("Skipping ballot {} (not voted on)", path.display());
        }
    }

    let (counted, skipped) = tally.ballot_counts();
    let records = tally.into_records();
    info!(
        "Tallied {} ballots ({} skipped) into {} records",
        counted,
        skipped,
        records.len()
    );
    Ok(records)
}
