// Copyright 2021-2026 Andrew Conway.
// This file is part of ConcreteSTV.
// ConcreteSTV is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// ConcreteSTV is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with ConcreteSTV.  If not, see <https://www.gnu.org/licenses/>.


//! Ranked ballots, and the set of them cast in an election.
//!
//! Besides JSON, a simple text format is understood. Each line is a distinct preference list
//! with the number of people who voted that way, colon separated, e.g. `12:A:C:B`.
//! A line without a leading number counts once. A line `choices:A:B:C:D` declares choices
//! that might not appear on any ballot. Blank lines and lines starting with `#` are ignored.

use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;
use serde::{Serialize,Deserialize};
use crate::choice::{Choice, ChoiceSet};
use crate::counting::RankingSource;
use crate::errors::{Result, TieBreakError};

/// A ranked ballot.
#[derive(Clone,Debug,Serialize,Deserialize,PartialEq,Eq)]
pub struct Ballot {
    /// Choices, in preference order
    pub votes : Vec<Choice>,
    /// Number of people who voted in this way.
    pub count : usize,
}

impl Ballot {
    pub fn new(votes:Vec<Choice>,count:usize) -> Self { Ballot{votes,count} }

    /// The choice ranked at `depth`, where 1 is the first preference.
    pub fn at_depth(&self,depth:usize) -> Option<&Choice> {
        if depth==0 { None } else { self.votes.get(depth-1) }
    }

    /// A ballot must rank at least one choice, each with a non-empty name, and none more than once.
    pub fn validate(&self) -> std::result::Result<(),String> {
        if self.votes.is_empty() { return Err("Ballot with no choices".to_string()); }
        for (i,c) in self.votes.iter().enumerate() {
            if c.name().is_empty() { return Err("Empty choice name".to_string()); }
            if self.votes[..i].contains(c) { return Err(format!("Choice {} ranked more than once",c)); }
        }
        Ok(())
    }

    /// The most preferred choice that is in `restrict`, if any. None means the ballot is exhausted.
    pub fn first_in(&self,restrict:&ChoiceSet) -> Option<&Choice> {
        self.votes.iter().find(|c|restrict.contains(*c))
    }
}

/// A utility for building up a ballot list and merging identical preference lists.
#[derive(Default)]
pub struct UniqueBallotBuilder {
    ballots : BTreeMap<Vec<Choice>,usize>,
}

impl UniqueBallotBuilder {
    pub fn add_vote(&mut self,vote:Ballot) {
        *self.ballots.entry(vote.votes).or_insert(0)+=vote.count;
    }
    pub fn to_ballots(self) -> Vec<Ballot> {
        self.ballots.into_iter().map(|(votes,count)|Ballot{votes,count}).collect()
    }
}

/// All the ballots cast in an election.
#[derive(Clone,Debug,Serialize,Deserialize,Default,PartialEq)]
pub struct BallotSet {
    /// Every choice in the election, whether or not anyone voted for it.
    #[serde(default)]
    pub choices : ChoiceSet,
    pub ballots : Vec<Ballot>,
}

impl BallotSet {
    /// Make from a list of ballots. The choices are those mentioned on some ballot.
    pub fn new(ballots:Vec<Ballot>) -> Self {
        let mut res = BallotSet{ choices: ChoiceSet::new(), ballots };
        res.include_ballot_choices();
        res
    }

    /// Make sure every choice that appears on a ballot is in `choices`.
    pub fn include_ballot_choices(&mut self) {
        for ballot in &self.ballots {
            for c in &ballot.votes {
                if !self.choices.contains(c) { self.choices.insert(c.clone()); }
            }
        }
    }

    /// Check every ballot, as [Ballot::validate]. Ballots are numbered from 1.
    pub fn validate(&self) -> Result<()> {
        for (i,ballot) in self.ballots.iter().enumerate() {
            ballot.validate().map_err(|message|TieBreakError::InvalidBallot{ballot:i+1,message})?;
        }
        Ok(())
    }

    /// Parse the text format described at the top of this module.
    /// ```
    /// use votecount::ballot::BallotSet;
    /// use votecount::counting::RankingSource;
    /// let set = BallotSet::parse_text("# test\n3:A:B\nB:A\nchoices:A:B:C\n").unwrap();
    /// assert_eq!(set.votes_cast(),4);
    /// assert_eq!(set.choices.len(),3);
    /// assert_eq!(set.max_depth(),2);
    /// ```
    pub fn parse_text(text:&str) -> Result<Self> {
        let mut choices = ChoiceSet::new();
        let mut builder = UniqueBallotBuilder::default();
        for (line_index,line) in text.lines().enumerate() {
            let line_number = line_index+1;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') { continue; }
            let mut fields : Vec<&str> = line.split(':').map(|f|f.trim()).collect();
            if fields[0]=="choices" {
                for name in &fields[1..] {
                    if name.is_empty() { return Err(TieBreakError::Parse{line:line_number,message:"Empty choice name".to_string()}); }
                    choices.insert(Choice::from(*name));
                }
                continue;
            }
            let count = match fields[0].parse::<usize>() {
                Ok(n) => { fields.remove(0); n }
                Err(_) => 1,
            };
            let ballot = Ballot{ votes: fields.into_iter().map(Choice::from).collect(), count };
            ballot.validate().map_err(|message|TieBreakError::Parse{line:line_number,message})?;
            builder.add_vote(ballot);
        }
        let mut res = BallotSet{ choices, ballots: builder.to_ballots() };
        res.include_ballot_choices();
        Ok(res)
    }

    /// Read from a file, as JSON if the name ends in .json, otherwise the text format.
    pub fn load<P:AsRef<Path>>(path:P) -> Result<Self> {
        let path = path.as_ref();
        if path.extension().is_some_and(|e|e=="json") {
            let file = File::open(path).map_err(|e|TieBreakError::io(path,e))?;
            let mut res : BallotSet = serde_json::from_reader(file)?;
            res.validate()?;
            res.include_ballot_choices();
            Ok(res)
        } else {
            let text = std::fs::read_to_string(path).map_err(|e|TieBreakError::io(path,e))?;
            Self::parse_text(&text)
        }
    }

    pub fn print_summary(&self) {
        println!("{} ballots cast, {} unique preference lists, {} choices",self.votes_cast(),self.ballots.len(),self.choices.len());
        println!("Deepest ranking : {}",self.max_depth());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::choice::{choice_list, choice_set};

    #[test]
    fn identical_lines_are_merged() {
        let set = BallotSet::parse_text("2:A:B\n3:A:B\nB\n").unwrap();
        assert_eq!(set.ballots.len(),2);
        assert_eq!(set.votes_cast(),6);
        let ab = set.ballots.iter().find(|b|b.votes==choice_list(["A","B"])).unwrap();
        assert_eq!(ab.count,5);
    }

    #[test]
    fn repeated_choice_is_rejected() {
        match BallotSet::parse_text("1:A:B\n1:A:A\n") {
            Err(TieBreakError::Parse{line,..}) => assert_eq!(line,2),
            other => panic!("Expected parse error, got {:?}",other),
        }
    }

    #[test]
    fn empty_choice_is_rejected() {
        assert!(BallotSet::parse_text("4:A::B\n").is_err());
        assert!(BallotSet::parse_text("4\n").is_err());
    }

    #[test]
    fn depth_and_first_in() {
        let ballot = Ballot::new(choice_list(["C","A","B"]),1);
        assert_eq!(ballot.at_depth(0),None);
        assert_eq!(ballot.at_depth(1).map(|c|c.name()),Some("C"));
        assert_eq!(ballot.at_depth(4),None);
        assert_eq!(ballot.first_in(&choice_set(["A","B"])).map(|c|c.name()),Some("A"));
        assert_eq!(ballot.first_in(&choice_set(["D"])),None);
    }

    #[test]
    fn json_gets_choices_from_ballots() {
        let mut set : BallotSet = serde_json::from_str(r#"{"ballots":[{"votes":["X","Y"],"count":2}]}"#).unwrap();
        set.include_ballot_choices();
        assert_eq!(set.choices,choice_set(["X","Y"]));
    }

    #[test]
    fn json_ballots_are_checked_like_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ballots.json");
        std::fs::write(&path,r#"{"ballots":[{"votes":["B"],"count":2},{"votes":["A","A","A"],"count":1}]}"#).unwrap();
        match BallotSet::load(&path) {
            Err(TieBreakError::InvalidBallot{ballot,message}) => { assert_eq!(ballot,2); assert!(message.contains("more than once")); }
            other => panic!("Expected invalid ballot, got {:?}",other),
        }
        std::fs::write(&path,r#"{"ballots":[{"votes":["A",""],"count":1}]}"#).unwrap();
        assert!(matches!(BallotSet::load(&path),Err(TieBreakError::InvalidBallot{..})));
        std::fs::write(&path,r#"{"ballots":[{"votes":["A","C"],"count":1},{"votes":["B"],"count":2}]}"#).unwrap();
        let set = BallotSet::load(&path).unwrap();
        let approval = set.approval(&choice_set(["A","B"]));
        assert_eq!((approval["A"],approval["B"]),(1,2));
    }
}
