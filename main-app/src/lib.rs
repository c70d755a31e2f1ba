// Copyright 2021-2026 Andrew Conway.
// This file is part of ConcreteSTV.
// ConcreteSTV is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// ConcreteSTV is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with ConcreteSTV.  If not, see <https://www.gnu.org/licenses/>.

//! Helpers for the command line program.

use std::path::{Path, PathBuf};
use votecount::choice::Choice;
use votecount::config::TieBreakConfig;
use votecount::tie_resolution::TieBreakMethod;

/// Utility that is helpful for parsing in clap a comma separated list of choices.
/// ```
/// let list = main_app::try_parse_choice_list(" A, B ,C").unwrap();
/// assert_eq!(list.len(),3);
/// assert_eq!(list[1].name(),"B");
/// assert!(main_app::try_parse_choice_list("A,,B").is_err());
/// ```
pub fn try_parse_choice_list(s:&str) -> Result<Vec<Choice>,String> {
    s.split(',').map(|s|{
        let s = s.trim();
        if s.is_empty() { Err("Empty choice name in list".to_string()) } else { Ok(Choice::from(s)) }
    }).collect()
}

/// Command line overrides for a [TieBreakConfig].
#[derive(Default,Debug,Clone)]
pub struct ConfigOverrides {
    pub method : Option<TieBreakMethod>,
    /// only ever turns fallback on.
    pub fallback_precedence : bool,
    pub precedence_file : Option<PathBuf>,
}

/// Load the config file if given (otherwise the default), and apply command line overrides.
pub fn tie_break_config(file:Option<&Path>,overrides:&ConfigOverrides) -> anyhow::Result<TieBreakConfig> {
    let mut config = match file {
        Some(path) => TieBreakConfig::load(path)?,
        None => TieBreakConfig::default(),
    };
    if let Some(method) = overrides.method { config.method=method; }
    if overrides.fallback_precedence { config.fallback_precedence=true; }
    if let Some(path) = &overrides.precedence_file { config.precedence_file=Some(path.clone()); }
    log::debug!("Using tie break config {}",serde_json::to_string(&config)?);
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_replace_file_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path,r#"{"method":"borda","fallback_precedence":true}"#).unwrap();
        let from_file = tie_break_config(Some(&path),&ConfigOverrides::default()).unwrap();
        assert_eq!(from_file.method,TieBreakMethod::Borda);
        assert!(from_file.fallback_precedence);
        let overrides = ConfigOverrides{ method: Some(TieBreakMethod::TopCount), fallback_precedence: false, precedence_file: Some(PathBuf::from("order.txt")) };
        let combined = tie_break_config(Some(&path),&overrides).unwrap();
        assert_eq!(combined.method,TieBreakMethod::TopCount);
        assert!(combined.fallback_precedence);
        assert_eq!(combined.precedence_file,Some(PathBuf::from("order.txt")));
    }

    #[test]
    fn no_file_gives_default() {
        let config = tie_break_config(None,&ConfigOverrides::default()).unwrap();
        assert_eq!(config.method,TieBreakMethod::None);
        assert!(!config.fallback_precedence);
        assert!(config.precedence_file.is_none());
    }
}
