// Copyright 2026 Andrew Conway.
// This file is part of ConcreteSTV.
// ConcreteSTV is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// ConcreteSTV is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with ConcreteSTV.  If not, see <https://www.gnu.org/licenses/>.


//! The counting methods tie breakers consult.
//!
//! An election method that scales vote values or keeps its own notion of the ballots
//! implements [RankingSource] itself; a plain [BallotSet] counts every ballot at face value.

use crate::ballot::{Ballot, BallotSet};
use crate::choice::ChoiceSet;
use crate::rank_count::{RawCount, Tally};

pub trait RankingSource {
    type Tally : Tally;
    /// Every choice in the election, not just the active ones.
    fn choices(&self) -> &ChoiceSet;
    fn ballots(&self) -> &[Ballot];
    /// The weight a ballot carries, typically its count possibly scaled by a vote value.
    fn ballot_weight(&self,ballot:&Ballot) -> Self::Tally;
    /// Number of ballots cast. This seeds the pseudo-random precedence order.
    fn votes_cast(&self) -> usize { self.ballots().iter().map(|b|b.count).sum() }
    /// The largest number of choices ranked on any ballot.
    fn max_depth(&self) -> usize { self.ballots().iter().map(|b|b.votes.len()).max().unwrap_or(0) }
    /// Each choice in `restrict` gets the weight of every ballot on which it appears at all.
    fn approval(&self,restrict:&ChoiceSet) -> RawCount<Self::Tally>;
    /// Each choice in `restrict` gets the weight of every ballot on which it is the top choice among `restrict`.
    fn top_count(&self,restrict:&ChoiceSet) -> RawCount<Self::Tally>;
    /// Borda count with the ballots truncated to choices in `restrict`.
    fn borda(&self,restrict:&ChoiceSet) -> RawCount<Self::Tally>;
}

/// Every choice in restrict, starting at zero.
fn zeroed<T:Tally>(restrict:&ChoiceSet) -> RawCount<T> {
    restrict.iter().map(|c|(c.clone(),T::zero())).collect()
}

impl RankingSource for BallotSet {
    type Tally = usize;

    fn choices(&self) -> &ChoiceSet { &self.choices }
    fn ballots(&self) -> &[Ballot] { &self.ballots }
    fn ballot_weight(&self, ballot: &Ballot) -> usize { ballot.count }

    fn approval(&self, restrict: &ChoiceSet) -> RawCount<usize> {
        let mut res = zeroed(restrict);
        for ballot in &self.ballots {
            for c in &ballot.votes {
                if let Some(total) = res.get_mut(c) { *total+=ballot.count; }
            }
        }
        res
    }

    fn top_count(&self, restrict: &ChoiceSet) -> RawCount<usize> {
        let mut res = zeroed(restrict);
        for ballot in &self.ballots {
            if let Some(top) = ballot.first_in(restrict) {
                if let Some(total) = res.get_mut(top) { *total+=ballot.count; }
            }
        }
        res
    }

    /// On a ballot ranking n of the restricted choices, the first gets n points, the second n-1, and so on.
    /// Unranked choices get nothing.
    fn borda(&self, restrict: &ChoiceSet) -> RawCount<usize> {
        let mut res = zeroed(restrict);
        for ballot in &self.ballots {
            let ranked : Vec<_> = ballot.votes.iter().filter(|c|restrict.contains(*c)).collect();
            let n = ranked.len();
            for (position,c) in ranked.into_iter().enumerate() {
                if let Some(total) = res.get_mut(c) { *total+=(n-position)*ballot.count; }
            }
        }
        res
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ballot::BallotSet;
    use crate::choice::choice_set;

    fn sample() -> BallotSet {
        BallotSet::parse_text("5:A:B:C\n3:B:C\n2:C\nchoices:D\n").unwrap()
    }

    #[test]
    fn approval_counts_every_mention() {
        let count = sample().approval(&choice_set(["A","B","C","D"]));
        assert_eq!(count["A"],5);
        assert_eq!(count["B"],8);
        assert_eq!(count["C"],10);
        assert_eq!(count["D"],0);
    }

    #[test]
    fn top_count_skips_unrestricted_choices() {
        let set = sample();
        let all = set.top_count(&choice_set(["A","B","C"]));
        assert_eq!((all["A"],all["B"],all["C"]),(5,3,2));
        let without_a = set.top_count(&choice_set(["B","C"]));
        assert_eq!((without_a["B"],without_a["C"]),(8,2));
        assert!(!without_a.contains_key("A"));
    }

    #[test]
    fn borda_depends_on_restriction() {
        let set = sample();
        let all = set.borda(&choice_set(["A","B","C"]));
        // A: 5*3. B: 5*2+3*2. C: 5*1+3*1+2*1.
        assert_eq!((all["A"],all["B"],all["C"]),(15,16,10));
        let bc = set.borda(&choice_set(["B","C"]));
        assert_eq!((bc["B"],bc["C"]),(16,8+2));
    }

    #[test]
    fn defaults_from_ballots() {
        let set = sample();
        assert_eq!(RankingSource::votes_cast(&set),10);
        assert_eq!(RankingSource::max_depth(&set),3);
        assert_eq!(set.choices().len(),4);
    }
}
