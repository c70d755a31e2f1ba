// Copyright 2026 Andrew Conway.
// This file is part of ConcreteSTV.
// ConcreteSTV is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// ConcreteSTV is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with ConcreteSTV.  If not, see <https://www.gnu.org/licenses/>.

//! How ties are to be broken in a particular election.

use std::fs::File;
use std::path::{Path, PathBuf};
use serde::{Serialize,Deserialize};
use crate::errors::{Result, TieBreakError};
use crate::tie_resolution::TieBreakMethod;

#[derive(Clone,Debug,Default,PartialEq,Eq,Serialize,Deserialize)]
#[serde(default)]
pub struct TieBreakConfig {
    /// The strategy used when the counting method hits a tie.
    pub method : TieBreakMethod,
    /// If a strategy leaves a tie, resolve it by precedence.
    pub fallback_precedence : bool,
    /// Load the precedence order from here. If None, one is generated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precedence_file : Option<PathBuf>,
}

impl TieBreakConfig {
    pub fn new(method:TieBreakMethod,fallback_precedence:bool) -> Self {
        TieBreakConfig{ method, fallback_precedence, precedence_file: None }
    }

    /// Read from a JSON file such as `{"method":"borda","fallback_precedence":true}`.
    /// ```
    /// use votecount::config::TieBreakConfig;
    /// use votecount::tie_resolution::TieBreakMethod;
    /// let config : TieBreakConfig = serde_json::from_str(r#"{"method":"Grandjunction"}"#).unwrap();
    /// assert_eq!(config.method,TieBreakMethod::GrandJunction);
    /// assert!(!config.fallback_precedence);
    /// ```
    pub fn load<P:AsRef<Path>>(path:P) -> Result<Self> {
        let file = File::open(path.as_ref()).map_err(|e|TieBreakError::io(path.as_ref(),e))?;
        Ok(serde_json::from_reader(file)?)
    }
}
