// Copyright 2026 Andrew Conway.
// This file is part of ConcreteSTV.
// ConcreteSTV is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// ConcreteSTV is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with ConcreteSTV.  If not, see <https://www.gnu.org/licenses/>.


//! Turn a set of vote totals into ordered rank groups.
//!
//! Equal totals are tied. Equality is exact, which is why a [Tally] must be `Ord`; use integers
//! or exact rationals for scaled vote values rather than floating point.

use std::collections::BTreeMap;
use std::fmt::{Debug, Display};
use std::ops::AddAssign;
use num::{ToPrimitive, Zero};
use serde::Serialize;
use crate::choice::Choice;
use crate::errors::{Result, TieBreakError};

/// Something that can be used as a vote total.
pub trait Tally : Clone+Ord+Display+Debug+AddAssign+Zero {}
impl <T:Clone+Ord+Display+Debug+AddAssign+Zero> Tally for T {}

/// Vote totals for each choice under one counting method.
pub type RawCount<T> = BTreeMap<Choice,T>;

/// The result of ranking some vote totals. Rank 1 is the most votes.
#[derive(Clone,Debug,Serialize)]
pub struct RankResult<T> {
    raw : RawCount<T>,
    ordered : BTreeMap<Choice,usize>,
    by_rank : BTreeMap<usize,Vec<Choice>>,
    top : Vec<Choice>,
    bottom : Vec<Choice>,
    tie : bool,
}

/// Who is in first place.
#[derive(Clone,Debug,PartialEq,Eq,Serialize)]
pub enum Leader {
    Winner(Choice),
    /// More than one choice shares first place. Sorted by name.
    Tie(Vec<Choice>),
}

impl Leader {
    pub fn winner(&self) -> Option<&Choice> {
        match self {
            Leader::Winner(c) => Some(c),
            Leader::Tie(_) => None,
        }
    }
    pub fn is_tie(&self) -> bool { matches!(self,Leader::Tie(_)) }
}

/// Rank a set of vote totals. The totals are copied, not consumed.
/// ```
/// use votecount::choice::Choice;
/// use votecount::rank_count::{rank, RawCount};
/// let raw : RawCount<usize> = [(Choice::from("A"),10),(Choice::from("B"),10),(Choice::from("C"),5)].into_iter().collect();
/// let ranked = rank(&raw).unwrap();
/// assert!(ranked.is_tie());
/// assert_eq!(ranked.top().to_vec(),vec![Choice::from("A"),Choice::from("B")]);
/// assert_eq!(ranked.bottom().to_vec(),vec![Choice::from("C")]);
/// assert_eq!(ranked.rank_of("C"),Some(2));
/// ```
pub fn rank<T:Tally>(raw:&RawCount<T>) -> Result<RankResult<T>> {
    if raw.is_empty() { return Err(TieBreakError::EmptyRawCount); }
    let bound = raw.len();
    let mut working : Vec<(&Choice,&T)> = raw.iter().collect();
    let mut ordered : BTreeMap<Choice,usize> = BTreeMap::new();
    let mut by_rank : BTreeMap<usize,Vec<Choice>> = BTreeMap::new();
    let mut position : usize = 0;
    while let Some(max) = working.iter().map(|(_,v)|*v).max().cloned() {
        position+=1;
        if position>bound { return Err(TieBreakError::RankLoopExceeded{choices:bound}); }
        let (at_max,rest) : (Vec<_>,Vec<_>) = working.into_iter().partition(|(_,v)|**v==max);
        // raw iterates in name order, so each group comes out sorted.
        let group : Vec<Choice> = at_max.into_iter().map(|(c,_)|c.clone()).collect();
        for c in &group { ordered.insert(c.clone(),position); }
        by_rank.insert(position,group);
        working=rest;
    }
    let top = by_rank.values().next().cloned().unwrap_or_default();
    let bottom = by_rank.values().next_back().cloned().unwrap_or_default();
    let tie = top.len()>1;
    Ok(RankResult{ raw: raw.clone(), ordered, by_rank, top, bottom, tie })
}

impl <T:Tally> RankResult<T> {
    pub fn raw_count(&self) -> &RawCount<T> { &self.raw }
    /// rank position of each choice.
    pub fn ordered(&self) -> &BTreeMap<Choice,usize> { &self.ordered }
    /// choices at each rank position, each group sorted by name.
    pub fn by_rank(&self) -> &BTreeMap<usize,Vec<Choice>> { &self.by_rank }
    pub fn top(&self) -> &[Choice] { &self.top }
    pub fn bottom(&self) -> &[Choice] { &self.bottom }
    /// true iff more than one choice is at rank 1.
    pub fn is_tie(&self) -> bool { self.tie }
    pub fn num_ranks(&self) -> usize { self.by_rank.len() }
    pub fn rank_of(&self,choice:&str) -> Option<usize> { self.ordered.get(choice).copied() }
    pub fn votes_for(&self,choice:&str) -> Option<&T> { self.raw.get(choice) }

    /// Sum of all the vote totals.
    pub fn total_votes(&self) -> T {
        let mut total = T::zero();
        for v in self.raw.values() { total+=v.clone(); }
        total
    }

    pub fn leader(&self) -> Leader {
        if self.top.len()==1 { Leader::Winner(self.top[0].clone()) } else { Leader::Tie(self.top.clone()) }
    }

    /// All choices, best first. Tied choices come out in name order.
    pub fn ordered_list(&self) -> Vec<Choice> {
        self.by_rank.values().flat_map(|g|g.iter().cloned()).collect()
    }

    /// A markdown table of rank, choice and votes, sorted by rank then choice.
    pub fn rank_table(&self) -> String {
        let mut res = String::from("| Rank | Choice | Votes |\n|------|--------|-------|\n");
        for (rank,group) in &self.by_rank {
            for choice in group {
                let votes = self.raw.get(choice).map(|v|v.to_string()).unwrap_or_default();
                res.push_str(&format!("| {} | {} | {} |\n",rank,choice,votes));
            }
        }
        res
    }
}

impl <T:Tally+ToPrimitive> RankResult<T> {
    /// Like [RankResult::rank_table] with an extra column giving each choice's share of the total.
    pub fn rank_table_with_percent(&self) -> String {
        let total = self.total_votes().to_f64().unwrap_or(0.0);
        let mut res = String::from("| Rank | Choice | Votes | Percent |\n|------|--------|-------|---------|\n");
        for (rank,group) in &self.by_rank {
            for choice in group {
                if let Some(votes) = self.raw.get(choice) {
                    let percent = if total>0.0 { 100.0*votes.to_f64().unwrap_or(0.0)/total } else { 0.0 };
                    res.push_str(&format!("| {} | {} | {} | {:.2}% |\n",rank,choice,votes,percent));
                }
            }
        }
        res
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num::rational::Ratio;

    fn raw(values:&[(&str,usize)]) -> RawCount<usize> {
        values.iter().map(|(c,v)|(Choice::from(*c),*v)).collect()
    }

    #[test]
    fn groups_are_contiguous_and_cover_everything() {
        let count = raw(&[("A",3),("B",7),("C",3),("D",0),("E",7),("F",1)]);
        let ranked = rank(&count).unwrap();
        assert_eq!(ranked.num_ranks(),4);
        let ranks : Vec<usize> = ranked.by_rank().keys().copied().collect();
        assert_eq!(ranks,vec![1,2,3,4]);
        let mut seen : Vec<Choice> = ranked.ordered_list();
        assert_eq!(seen.len(),count.len());
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(),count.len());
        for (choice,rank) in ranked.ordered() {
            assert!(ranked.by_rank()[rank].contains(choice));
        }
        assert_eq!(ranked.top(),&[Choice::from("B"),Choice::from("E")]);
        assert_eq!(ranked.bottom(),&[Choice::from("D")]);
    }

    #[test]
    fn generated_counts_are_partitioned() {
        let mut rng = crate::random_util::AuditableRng::from_seed_u64(2026);
        for _ in 0..50 {
            let n = 1+rng.below(12) as usize;
            let count : RawCount<usize> = (0..n).map(|i|(Choice::new(format!("C{}",i)),rng.below(5) as usize)).collect();
            let ranked = rank(&count).unwrap();
            let ranks : Vec<usize> = ranked.by_rank().keys().copied().collect();
            assert_eq!(ranks,(1..=ranked.num_ranks()).collect::<Vec<_>>());
            let listed = ranked.ordered_list();
            assert_eq!(listed.len(),n);
            for choice in count.keys() {
                assert_eq!(listed.iter().filter(|c|*c==choice).count(),1);
                let rank = ranked.rank_of(choice.name()).unwrap();
                assert!(ranked.by_rank()[&rank].contains(choice));
            }
            let mut previous : Option<usize> = None;
            for group in ranked.by_rank().values() {
                let votes = count[&group[0]];
                assert!(group.iter().all(|c|count[c]==votes));
                assert!(group.windows(2).all(|w|w[0]<w[1]));
                if let Some(p) = previous { assert!(votes<p); }
                previous=Some(votes);
            }
            assert_eq!(ranked.is_tie(),ranked.top().len()>1);
        }
    }

    #[test]
    fn single_choice_is_not_a_tie() {
        let ranked = rank(&raw(&[("A",10)])).unwrap();
        assert!(!ranked.is_tie());
        assert_eq!(ranked.rank_of("A"),Some(1));
        assert_eq!(ranked.leader(),Leader::Winner(Choice::from("A")));
        assert_eq!(ranked.top(),ranked.bottom());
    }

    #[test]
    fn empty_count_is_an_error() {
        assert!(matches!(rank(&raw(&[])),Err(TieBreakError::EmptyRawCount)));
    }

    #[test]
    fn leader_reports_ties() {
        let ranked = rank(&raw(&[("B",4),("A",4),("C",1)])).unwrap();
        assert_eq!(ranked.leader(),Leader::Tie(vec![Choice::from("A"),Choice::from("B")]));
        assert_eq!(ranked.total_votes(),9);
    }

    #[test]
    fn table_is_sorted_by_rank_then_name() {
        let ranked = rank(&raw(&[("Zed",2),("Amy",5),("Bob",2)])).unwrap();
        let table = ranked.rank_table();
        let lines : Vec<&str> = table.lines().collect();
        assert_eq!(lines[0],"| Rank | Choice | Votes |");
        assert_eq!(lines[2],"| 1 | Amy | 5 |");
        assert_eq!(lines[3],"| 2 | Bob | 2 |");
        assert_eq!(lines[4],"| 2 | Zed | 2 |");
        assert_eq!(lines.len(),5);
        assert!(ranked.rank_table_with_percent().contains("| 1 | Amy | 5 | 55.56% |"));
    }

    #[test]
    fn fractional_totals_compare_exactly() {
        let count : RawCount<Ratio<u64>> = [
            (Choice::from("A"),Ratio::new(1,3)),
            (Choice::from("B"),Ratio::new(2,6)),
            (Choice::from("C"),Ratio::new(1,4)),
        ].into_iter().collect();
        let ranked = rank(&count).unwrap();
        assert!(ranked.is_tie());
        assert_eq!(ranked.bottom(),&[Choice::from("C")]);
        assert_eq!(ranked.total_votes(),Ratio::new(11,12));
    }
}
