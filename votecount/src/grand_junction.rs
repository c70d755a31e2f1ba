// Copyright 2026 Andrew Conway.
// This file is part of ConcreteSTV.
// ConcreteSTV is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// ConcreteSTV is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with ConcreteSTV.  If not, see <https://www.gnu.org/licenses/>.


//! The Grand Junction (Bucklin style) protocol.
//!
//! Every choice starts on zero. In round r, every ballot adds its weight to its r-th preference
//! if that choice is still being tracked. Then everyone strictly behind the leader is dropped.
//! This stops when one choice is left, or when the deepest ballot has been used up.

use num::Zero;
use serde::Serialize;
use crate::choice::{join_choices, Choice, ChoiceSet};
use crate::counting::RankingSource;
use crate::errors::{Result, TieBreakError};
use crate::rank_count::RawCount;
use crate::tie_resolution::{TieBreakMethod, TieBreakResult, TieBreakTrace, TieBreaker};

/// The state of the count at the end of one round.
#[derive(Clone,Debug,Serialize)]
pub struct GrandJunctionRound<T> {
    /// 1 for first preferences.
    pub round : usize,
    /// running totals for the choices still tracked at the start of the round.
    pub totals : RawCount<T>,
    /// tracked choices dropped this round.
    pub dropped : Vec<Choice>,
}

#[derive(Clone,Debug,Serialize)]
pub struct GrandJunction<T> {
    /// None if rounds ran out first.
    pub winner : Option<Choice>,
    /// Those still tracked at the end, sorted by name. Just the winner if there is one.
    pub remaining : Vec<Choice>,
    pub rounds : Vec<GrandJunctionRound<T>>,
}

impl <T:Clone+Ord+std::fmt::Display> GrandJunction<T> {
    /// One line per round, for audit logs.
    pub fn round_log(&self) -> Vec<String> {
        self.rounds.iter().map(|r|{
            let totals = r.totals.iter().map(|(c,v)|format!("{}: {}",c,v)).collect::<Vec<_>>().join(", ");
            if r.dropped.is_empty() { format!("Round {} : {}",r.round,totals) }
            else { format!("Round {} : {} ; dropped {}",r.round,totals,join_choices(&r.dropped)) }
        }).collect()
    }
}

/// Run the protocol on `tied`.
pub fn grand_junction<S:RankingSource+?Sized>(source:&S,tied:&[Choice]) -> GrandJunction<S::Tally> {
    let mut current : RawCount<S::Tally> = tied.iter().map(|c|(c.clone(),S::Tally::zero())).collect();
    let mut rounds = vec![];
    if current.len()>1 {
        for round in 1..=source.max_depth() {
            for ballot in source.ballots() {
                if let Some(pick) = ballot.at_depth(round) {
                    if let Some(total) = current.get_mut(pick) { *total+=source.ballot_weight(ballot); }
                }
            }
            let totals = current.clone();
            if let Some(max) = current.values().max().cloned() { current.retain(|_,v|*v>=max); }
            let dropped = totals.keys().filter(|c|!current.contains_key(*c)).cloned().collect();
            rounds.push(GrandJunctionRound{ round, totals, dropped });
            if current.len()==1 { break; }
        }
    }
    let remaining : Vec<Choice> = current.into_keys().collect();
    let winner = if remaining.len()==1 { Some(remaining[0].clone()) } else { None };
    GrandJunction{ winner, remaining, rounds }
}

/// Use the protocol as a counting method in its own right over all the active choices.
pub fn grand_junction_winner<S:RankingSource+?Sized>(source:&S,active:&ChoiceSet) -> GrandJunction<S::Tally> {
    let active : Vec<Choice> = active.iter().cloned().collect();
    grand_junction(source,&active)
}

impl <'a,S:RankingSource+?Sized> TieBreaker<'a,S> {
    /// Break a tie with the Grand Junction protocol, falling back to precedence if it runs out of rounds and that is enabled.
    pub fn grand_junction(&self,tied:&[Choice]) -> Result<TieBreakResult> {
        if tied.is_empty() { return Err(TieBreakError::EmptyTie); }
        let gj = grand_junction(self.source(),tied);
        let mut trace = TieBreakTrace::new(TieBreakMethod::GrandJunction,tied);
        trace.verbose = gj.round_log();
        match &gj.winner {
            Some(winner) => {
                trace.terse = format!("Tie broken by Grand Junction: {}\nwinner: {}",join_choices(tied),winner);
                log::info!("{}",trace.terse);
            }
            None => {
                trace.terse = format!("Grand Junction could not break tie: {}\nstill tied: {}",join_choices(tied),join_choices(&gj.remaining));
                if self.config().fallback_precedence {
                    let by_precedence = self.precedence_resolve(&gj.remaining)?;
                    trace.terse.push('\n');
                    trace.terse.push_str(&by_precedence.trace.terse);
                    log::debug!("{}",trace);
                    return Ok(TieBreakResult{ outcome: by_precedence.outcome, trace });
                }
                log::warn!("{}",trace.terse);
            }
        }
        log::debug!("{}",trace);
        Ok(TieBreakResult::from_survivors(gj.remaining,trace))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ballot::BallotSet;
    use crate::choice::{choice_list, choice_set};

    #[test]
    fn later_rounds_decide() {
        // A and B tie on first preferences; A has more second preferences.
        let set = BallotSet::parse_text("3:A:C\n3:B:A\n2:C:B\n").unwrap();
        let gj = grand_junction(&set,&choice_list(["A","B"]));
        assert_eq!(gj.winner,Some(Choice::from("A")));
        assert_eq!(gj.remaining,choice_list(["A"]));
        assert_eq!(gj.rounds.len(),2);
        assert!(gj.rounds[0].dropped.is_empty());
        assert_eq!(gj.rounds[1].totals["A"],6);
        assert_eq!(gj.rounds[1].totals["B"],5);
        assert_eq!(gj.rounds[1].dropped,choice_list(["B"]));
        assert_eq!(gj.round_log()[1],"Round 2 : A: 6, B: 5 ; dropped B");
    }

    #[test]
    fn standalone_count_over_active() {
        let set = BallotSet::parse_text("4:A:B\n3:B:A\n2:C:B\n").unwrap();
        let gj = grand_junction_winner(&set,&choice_set(["A","B","C"]));
        assert_eq!(gj.winner,Some(Choice::from("A")));
        assert_eq!(gj.rounds.len(),1);
        assert_eq!(gj.rounds[0].dropped,choice_list(["B","C"]));
    }

    #[test]
    fn single_choice_wins_without_rounds() {
        let set = BallotSet::parse_text("1:A\n").unwrap();
        let gj = grand_junction(&set,&choice_list(["B"]));
        assert_eq!(gj.winner,Some(Choice::from("B")));
        assert!(gj.rounds.is_empty());
    }
}
