// Copyright 2021-2026 Andrew Conway.
// This file is part of ConcreteSTV.
// ConcreteSTV is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// ConcreteSTV is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with ConcreteSTV.  If not, see <https://www.gnu.org/licenses/>.


//! Breaking ties between choices.
//!
//! A tie is broken by one of several strategies ([TieBreakMethod]). Most of them rank the tied
//! choices by some count and keep those with the most votes. That may itself be a tie, in which
//! case the precedence order may optionally be used to pick one.

use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::str::FromStr;
use num::Zero;
use serde::{Serialize,Deserialize};
use crate::choice::{join_choices, Choice, ChoiceSet};
use crate::config::TieBreakConfig;
use crate::counting::RankingSource;
use crate::errors::{Result, TieBreakError};
use crate::precedence::{Precedence, PrecedenceOrder};
use crate::rank_count::{rank, RawCount};

#[derive(Debug,Clone,Copy,PartialEq,Eq,Hash,Default,Serialize,Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TieBreakMethod {
    /// Most approval votes among the tied choices.
    Approval,
    /// Most first preferences among the tied choices.
    TopCount,
    /// Highest Borda score with ballots truncated to the active choices.
    Borda,
    /// Highest Borda score over every choice in the election. May differ from [TieBreakMethod::Borda].
    BordaAll,
    /// Accumulate preferences one depth at a time, dropping anyone behind the leader.
    GrandJunction,
    /// The precedence order. Always produces a winner.
    Precedence,
    /// Select none of the tied choices (e.g. eliminate them all).
    All,
    /// Leave the tie as it is.
    #[default]
    None,
}

impl TieBreakMethod {
    /// Methods that work by ranking the choices by some count.
    pub fn is_ranking(self) -> bool {
        matches!(self,TieBreakMethod::Approval | TieBreakMethod::TopCount | TieBreakMethod::Borda | TieBreakMethod::BordaAll)
    }
}

impl FromStr for TieBreakMethod {
    type Err = TieBreakError;

    /// Case insensitive.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "approval" => Ok(TieBreakMethod::Approval),
            "topcount" => Ok(TieBreakMethod::TopCount),
            "borda" => Ok(TieBreakMethod::Borda),
            "borda_all" => Ok(TieBreakMethod::BordaAll),
            "grandjunction" => Ok(TieBreakMethod::GrandJunction),
            "precedence" => Ok(TieBreakMethod::Precedence),
            "all" => Ok(TieBreakMethod::All),
            "none" => Ok(TieBreakMethod::None),
            _ => Err(TieBreakError::UnknownMethod(s.to_string())),
        }
    }
}

impl Display for TieBreakMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TieBreakMethod::Approval => "approval",
            TieBreakMethod::TopCount => "topcount",
            TieBreakMethod::Borda => "borda",
            TieBreakMethod::BordaAll => "borda_all",
            TieBreakMethod::GrandJunction => "grandjunction",
            TieBreakMethod::Precedence => "precedence",
            TieBreakMethod::All => "all",
            TieBreakMethod::None => "none",
        };
        f.write_str(s)
    }
}

impl TryFrom<String> for TieBreakMethod {
    type Error = TieBreakError;
    fn try_from(value: String) -> std::result::Result<Self, Self::Error> { value.parse() }
}

impl From<TieBreakMethod> for String {
    fn from(value: TieBreakMethod) -> Self { value.to_string() }
}

/// What a tie breaker decided.
#[derive(Clone,Debug,PartialEq,Eq,Serialize)]
pub enum TieBreakOutcome {
    Resolved(Choice),
    /// These are still tied. Never empty.
    Unresolved(Vec<Choice>),
    /// None of the tied choices were selected, as asked for by [TieBreakMethod::All].
    NoneSelected,
}

/// A record of how a tie was broken, for audit logs.
#[derive(Clone,Debug,Default,PartialEq,Eq,Serialize)]
pub struct TieBreakTrace {
    pub method : TieBreakMethod,
    pub tied : Vec<Choice>,
    /// one line summary.
    pub terse : String,
    /// rank tables or round by round counts that led to the decision.
    pub verbose : Vec<String>,
}

impl TieBreakTrace {
    pub fn new(method:TieBreakMethod,tied:&[Choice]) -> Self {
        TieBreakTrace{ method, tied: tied.to_vec(), terse: String::new(), verbose: vec![] }
    }
}

impl Display for TieBreakTrace {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f,"{}",self.terse)?;
        for v in &self.verbose { writeln!(f,"{}",v)?; }
        Ok(())
    }
}

#[derive(Clone,Debug,PartialEq,Eq,Serialize)]
pub struct TieBreakResult {
    pub outcome : TieBreakOutcome,
    pub trace : TieBreakTrace,
}

impl TieBreakResult {
    /// Make a result from a non-empty list of survivors.
    pub(crate) fn from_survivors(mut survivors:Vec<Choice>,trace:TieBreakTrace) -> Self {
        let outcome = if survivors.len()==1 { TieBreakOutcome::Resolved(survivors.remove(0)) } else { TieBreakOutcome::Unresolved(survivors) };
        TieBreakResult{ outcome, trace }
    }

    pub fn winner(&self) -> Option<&Choice> {
        match &self.outcome {
            TieBreakOutcome::Resolved(c) => Some(c),
            _ => None,
        }
    }

    pub fn is_resolved(&self) -> bool { self.winner().is_some() }

    /// The selected choices: the winner alone, everyone still tied, or nobody.
    pub fn choices(&self) -> Vec<Choice> {
        match &self.outcome {
            TieBreakOutcome::Resolved(c) => vec![c.clone()],
            TieBreakOutcome::Unresolved(tied) => tied.clone(),
            TieBreakOutcome::NoneSelected => vec![],
        }
    }
}

/// Breaks ties for one election run, consulting the counts provided by `source`.
///
/// Holds the precedence order for the run once it has been loaded or generated.
pub struct TieBreaker<'a,S:RankingSource+?Sized> {
    source : &'a S,
    config : TieBreakConfig,
    precedence : Precedence,
}

impl <'a,S:RankingSource+?Sized> TieBreaker<'a,S> {
    pub fn new(source:&'a S,config:TieBreakConfig) -> Self {
        let precedence = Precedence::new(config.precedence_file.clone());
        TieBreaker{ source, config, precedence }
    }

    pub fn source(&self) -> &'a S { self.source }
    pub fn config(&self) -> &TieBreakConfig { &self.config }

    pub fn set_method(&mut self,method:TieBreakMethod) {
        self.config.method=method;
        self.precedence.invalidate();
    }

    pub fn set_fallback_precedence(&mut self,fallback:bool) {
        self.config.fallback_precedence=fallback;
        self.precedence.invalidate();
    }

    pub fn set_precedence_file(&mut self,file:Option<PathBuf>) {
        self.config.precedence_file=file.clone();
        self.precedence.set_file(file);
    }

    /// Where to write the precedence order if one has to be generated.
    pub fn set_generated_precedence_path(&mut self,path:PathBuf) {
        self.precedence.set_generated_path(path);
    }

    pub fn precedence(&self) -> &Precedence { &self.precedence }

    /// The precedence order for this run, loading or generating it if necessary.
    pub fn precedence_order(&self) -> Result<&PrecedenceOrder> { self.precedence.order(self.source) }

    /// Reorder choices most favoured first by precedence.
    pub fn precedence_sort(&self,choices:&[Choice]) -> Result<Vec<Choice>> {
        self.precedence_order()?.sort(choices)
    }

    /// Break a tie by precedence. Always resolves.
    pub fn precedence_resolve(&self,tied:&[Choice]) -> Result<TieBreakResult> {
        if tied.is_empty() { return Err(TieBreakError::EmptyTie); }
        let winner = self.precedence_order()?.resolve(tied)?;
        let mut trace = TieBreakTrace::new(TieBreakMethod::Precedence,tied);
        trace.terse = format!("Tie Breaker precedence: {}\nwinner: {}",join_choices(tied),winner);
        log::info!("{}",trace.terse);
        Ok(TieBreakResult{ outcome: TieBreakOutcome::Resolved(winner), trace })
    }

    /// The counts a ranking method uses. `restrict` is the set being ranked, `active` the choices still in the count.
    pub fn ranking(&self,method:TieBreakMethod,active:&ChoiceSet,restrict:&ChoiceSet) -> Result<RawCount<S::Tally>> {
        match method {
            TieBreakMethod::Approval => Ok(self.source.approval(restrict)),
            TieBreakMethod::TopCount => Ok(self.source.top_count(restrict)),
            TieBreakMethod::Borda => Ok(self.source.borda(active)),
            TieBreakMethod::BordaAll => Ok(self.source.borda(self.source.choices())),
            _ => Err(TieBreakError::NotARankingMethod(method)),
        }
    }

    /// Break a tie between `tied` using `method`, returning the decision and how it was made.
    pub fn break_tie_with(&self,method:TieBreakMethod,active:&ChoiceSet,tied:&[Choice]) -> Result<TieBreakResult> {
        if tied.is_empty() { return Err(TieBreakError::EmptyTie); }
        let mut trace = TieBreakTrace::new(method,tied);
        match method {
            TieBreakMethod::None => {
                trace.terse = format!("Tie Breaker none: {}",join_choices(tied));
                return Ok(TieBreakResult{ outcome: TieBreakOutcome::Unresolved(tied.to_vec()), trace });
            }
            TieBreakMethod::All => {
                trace.terse = format!("Tie Breaker all: {}\nnone selected",join_choices(tied));
                return Ok(TieBreakResult{ outcome: TieBreakOutcome::NoneSelected, trace });
            }
            TieBreakMethod::GrandJunction => return self.grand_junction(tied),
            TieBreakMethod::Precedence => return self.precedence_resolve(tied),
            _ => {}
        }
        let restrict : ChoiceSet = tied.iter().cloned().collect();
        let counts = self.ranking(method,active,&restrict)?;
        // choices missing from the counts (e.g. not active for borda) have no votes.
        let scores : Vec<S::Tally> = tied.iter().map(|c|counts.get(c).cloned().unwrap_or_else(Zero::zero)).collect();
        let highest : Vec<Choice> = match scores.iter().max() {
            Some(best) => tied.iter().zip(&scores).filter(|(_,s)|*s==best).map(|(c,_)|c.clone()).collect(),
            None => vec![],
        };
        trace.terse = format!("Tie Breaker {}: {}\nwinner(s): {}",method,join_choices(tied),join_choices(&highest));
        match rank(&counts) {
            Ok(ranked) => trace.verbose.push(ranked.rank_table()),
            Err(e) => trace.verbose.push(format!("No ranking available : {}",e)),
        }
        log::debug!("{}",trace);
        if highest.len()>1 && self.config.fallback_precedence {
            let by_precedence = self.precedence_resolve(&highest)?;
            trace.terse.push('\n');
            trace.terse.push_str(&by_precedence.trace.terse);
            return Ok(TieBreakResult{ outcome: by_precedence.outcome, trace });
        }
        if highest.len()>1 { log::warn!("Tie between {} not broken by {}",join_choices(&highest),method); }
        Ok(TieBreakResult::from_survivors(highest,trace))
    }

    /// Break a tie between `tied` using `method`. Returns the selected choices: nobody for
    /// [TieBreakMethod::All], everyone for [TieBreakMethod::None], otherwise one winner or those still tied.
    pub fn break_tie(&self,method:TieBreakMethod,active:&ChoiceSet,tied:&[Choice]) -> Result<Vec<Choice>> {
        Ok(self.break_tie_with(method,active,tied)?.choices())
    }

    /// Break a tie using the configured method.
    pub fn resolve(&self,active:&ChoiceSet,tied:&[Choice]) -> Result<TieBreakResult> {
        self.break_tie_with(self.config.method,active,tied)
    }
}
