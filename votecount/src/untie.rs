// Copyright 2026 Andrew Conway.
// This file is part of ConcreteSTV.
// ConcreteSTV is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// ConcreteSTV is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with ConcreteSTV.  If not, see <https://www.gnu.org/licenses/>.


//! Put a whole list of choices into a strict order, strongest first.
//!
//! This needs a resolver of last resort, so precedence must either be the primary method or be
//! enabled as a fallback.

use crate::choice::{Choice, ChoiceSet};
use crate::counting::RankingSource;
use crate::errors::{Result, TieBreakError};
use crate::rank_count::{rank, RankResult};
use crate::tie_resolution::{TieBreakMethod, TieBreaker};

impl <'a,S:RankingSource+?Sized> TieBreaker<'a,S> {
    /// Order `choices` by `primary`, splitting each tied group by `secondary`, then by precedence.
    ///
    /// Ranking methods are restricted to `choices` themselves (except [TieBreakMethod::BordaAll]).
    pub fn untie_list(&self,primary:TieBreakMethod,secondary:TieBreakMethod,choices:&[Choice]) -> Result<Vec<Choice>> {
        if primary==TieBreakMethod::Precedence { return self.precedence_sort(choices); }
        if !self.config().fallback_precedence { return Err(TieBreakError::UntieNeedsPrecedence); }
        if !primary.is_ranking() { return Err(TieBreakError::NotARankingMethod(primary)); }
        if secondary!=TieBreakMethod::Precedence && !secondary.is_ranking() { return Err(TieBreakError::NotARankingMethod(secondary)); }
        if choices.is_empty() { return Ok(vec![]); }
        let restrict : ChoiceSet = choices.iter().cloned().collect();
        let ranked = self.rank_within(primary,&restrict)?;
        let mut ordered = Vec::with_capacity(choices.len());
        for group in ranked.by_rank().values() {
            if group.len()==1 { ordered.push(group[0].clone()); }
            else if secondary==TieBreakMethod::Precedence { ordered.extend(self.precedence_sort(group)?); }
            else {
                let group_set : ChoiceSet = group.iter().cloned().collect();
                let sub_ranked = self.rank_within(secondary,&group_set)?;
                for sub_group in sub_ranked.by_rank().values() {
                    if sub_group.len()==1 { ordered.push(sub_group[0].clone()); }
                    else { ordered.extend(self.precedence_sort(sub_group)?); }
                }
            }
        }
        log::debug!("Untied by {} then {} : {}",primary,secondary,crate::choice::join_choices(&ordered));
        Ok(ordered)
    }

    /// Rank just the choices in `restrict`, even if the method counts others.
    fn rank_within(&self,method:TieBreakMethod,restrict:&ChoiceSet) -> Result<RankResult<S::Tally>> {
        let mut counts = self.ranking(method,restrict,restrict)?;
        counts.retain(|c,_|restrict.contains(c));
        rank(&counts)
    }

    /// [TieBreaker::untie_list] over every active choice.
    pub fn untie_active(&self,primary:TieBreakMethod,secondary:TieBreakMethod,active:&ChoiceSet) -> Result<Vec<Choice>> {
        let choices : Vec<Choice> = active.iter().cloned().collect();
        self.untie_list(primary,secondary,&choices)
    }
}
