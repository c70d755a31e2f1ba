// Copyright 2026 Andrew Conway.
// This file is part of ConcreteSTV.
// ConcreteSTV is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// ConcreteSTV is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with ConcreteSTV.  If not, see <https://www.gnu.org/licenses/>.

//! Everything that can go wrong while counting or breaking ties.
//! None of these are recoverable by retrying; a mis-resolved tie is worse than no answer.

use std::path::PathBuf;
use thiserror::Error;
use crate::choice::Choice;
use crate::tie_resolution::TieBreakMethod;

#[derive(Error, Debug)]
pub enum TieBreakError {
    // Invalid configuration.
    #[error("Undefined tie break method {0}")]
    UnknownMethod(String),
    #[error("Tie break method {0} does not produce a ranking")]
    NotARankingMethod(TieBreakMethod),
    #[error("Fallback to precedence must be enabled, or the primary method must be precedence, to untie a list")]
    UntieNeedsPrecedence,
    // Missing data.
    #[error("Cannot rank an empty set of vote totals")]
    EmptyRawCount,
    #[error("Asked to break a tie between no choices")]
    EmptyTie,
    #[error("Choice {choice} is missing from precedence file {file}")]
    ChoiceMissingFromPrecedence{ choice: Choice, file: String },
    #[error("Choice {0} appears more than once in the precedence order")]
    DuplicateInPrecedence(Choice),
    #[error("Choice {0} is not in the precedence order")]
    UnknownChoice(Choice),
    #[error("Cannot assign distinct precedence draws to {0} choices")]
    TooManyChoicesForPrecedence(usize),
    // Internal invariant violations. Should never happen.
    #[error("Ranking {choices} choices took more than {choices} iterations")]
    RankLoopExceeded{ choices: usize },
    // Reading and writing files.
    #[error("Could not access {path} : {source}")]
    Io{ path: PathBuf, #[source] source: std::io::Error },
    #[error("Line {line} : {message}")]
    Parse{ line: usize, message: String },
    #[error("Ballot {ballot} : {message}")]
    InvalidBallot{ ballot: usize, message: String },
    #[error("Invalid JSON : {0}")]
    Json(#[from] serde_json::Error),
}

impl TieBreakError {
    /// Convenience for wrapping an io error with the file it came from.
    pub fn io(path:impl Into<PathBuf>,source:std::io::Error) -> Self { TieBreakError::Io { path: path.into(), source } }

    /// True for the errors that indicate the caller asked for something nonsensical rather than the data being bad.
    pub fn is_configuration_error(&self) -> bool {
        matches!(self,TieBreakError::UnknownMethod(_) | TieBreakError::NotARankingMethod(_) | TieBreakError::UntieNeedsPrecedence)
    }
}

pub type Result<T> = std::result::Result<T,TieBreakError>;
