// Copyright 2026 Andrew Conway.
// This file is part of ConcreteSTV.
// ConcreteSTV is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// ConcreteSTV is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with ConcreteSTV.  If not, see <https://www.gnu.org/licenses/>.


//! The precedence order, the tie breaker of last resort.
//!
//! This is a total order over every choice in the election. It is either read from a file
//! (one choice per line, most favoured first) or generated pseudo-randomly, seeded by the number
//! of ballots cast, so that anyone with the same ballots can regenerate it and check it.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::collections::btree_map::Entry;
use std::path::{Path, PathBuf};
use once_cell::unsync::OnceCell;
use sha2::{Digest, Sha256};
use crate::choice::{Choice, ChoiceSet};
use crate::counting::RankingSource;
use crate::errors::{Result, TieBreakError};
use crate::random_util::AuditableRng;

/// Each choice draws a number below this when generating a precedence order.
pub const PRECEDENCE_DRAW_RANGE : u64 = 1_000_000;

/// Where a generated order is written if nowhere else is specified.
///
/// The name is made from the number of votes cast and a SHA-256 digest of the choice names, the
/// two things the generated order depends on, so elections with different orders never share a file.
/// ```
/// use votecount::choice::choice_set;
/// use votecount::precedence::default_precedence_path;
/// let abc = default_precedence_path(&choice_set(["A","B","C"]),6);
/// assert_eq!(abc,default_precedence_path(&choice_set(["C","B","A"]),6));
/// assert_ne!(abc,default_precedence_path(&choice_set(["A","B","C"]),7));
/// assert_ne!(abc,default_precedence_path(&choice_set(["A","B","D"]),6));
/// ```
pub fn default_precedence_path(universe:&ChoiceSet,votes_cast:usize) -> PathBuf {
    let mut hasher = Sha256::new();
    for c in universe {
        hasher.update(c.name().as_bytes());
        hasher.update(b"\n");
    }
    let digest = hex::encode(hasher.finalize());
    std::env::temp_dir().join(format!("precedence_{}_{}.txt",votes_cast,&digest[..16]))
}

/// A total order over choices, most favoured first.
#[derive(Clone,Debug,PartialEq,Eq)]
pub struct PrecedenceOrder {
    order : Vec<Choice>,
    position : HashMap<Choice,usize>,
}

impl PrecedenceOrder {
    pub fn new(order:Vec<Choice>) -> Result<Self> {
        let mut position = HashMap::with_capacity(order.len());
        for (i,c) in order.iter().enumerate() {
            if position.insert(c.clone(),i).is_some() { return Err(TieBreakError::DuplicateInPrecedence(c.clone())); }
        }
        Ok(PrecedenceOrder{order,position})
    }

    /// Parse one choice per line. Surrounding whitespace and blank lines are ignored.
    pub fn parse(text:&str) -> Result<Self> {
        Self::new(text.lines().map(|l|l.trim()).filter(|l|!l.is_empty()).map(Choice::from).collect())
    }

    /// Read from a file, checking that every choice in `universe` is present.
    pub fn load<P:AsRef<Path>>(path:P,universe:&ChoiceSet) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e|TieBreakError::io(path,e))?;
        let res = Self::parse(&text)?;
        res.validate_covers(universe,&path.to_string_lossy())?;
        Ok(res)
    }

    /// Write one choice per line, with a trailing newline.
    pub fn save<P:AsRef<Path>>(&self,path:P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() { std::fs::create_dir_all(parent).map_err(|e|TieBreakError::io(parent,e))?; }
        }
        std::fs::write(path,self.to_text()).map_err(|e|TieBreakError::io(path,e))
    }

    pub fn to_text(&self) -> String {
        let mut res = String::new();
        for c in &self.order { res.push_str(c.name()); res.push('\n'); }
        res
    }

    /// Draw the order pseudo-randomly, seeded only by `votes_cast`.
    ///
    /// Choices are visited in name order. Each draws a number below [PRECEDENCE_DRAW_RANGE];
    /// a choice whose number was already drawn goes back to the front of the queue and draws again.
    /// The order is the choices sorted by the number drawn, lowest first.
    pub fn from_seed(universe:&ChoiceSet,votes_cast:usize) -> Result<Self> {
        if universe.len() as u64>PRECEDENCE_DRAW_RANGE { return Err(TieBreakError::TooManyChoicesForPrecedence(universe.len())); }
        let mut rng = AuditableRng::from_seed_u64(votes_cast as u64);
        let mut pending : VecDeque<&Choice> = universe.iter().collect();
        let mut drawn : BTreeMap<u64,Choice> = BTreeMap::new();
        while let Some(choice) = pending.pop_front() {
            match drawn.entry(rng.below(PRECEDENCE_DRAW_RANGE)) {
                Entry::Vacant(entry) => { entry.insert(choice.clone()); }
                Entry::Occupied(_) => pending.push_front(choice),
            }
        }
        log::debug!("Drew precedence for {} choices using {} random words",universe.len(),rng.words_consumed());
        Self::new(drawn.into_values().collect())
    }

    /// Generate as in [PrecedenceOrder::from_seed] and save it to `out_path`.
    pub fn generate<P:AsRef<Path>>(universe:&ChoiceSet,votes_cast:usize,out_path:P) -> Result<Self> {
        let res = Self::from_seed(universe,votes_cast)?;
        res.save(out_path.as_ref())?;
        log::info!("Randomized precedence order written to {}\n{}",out_path.as_ref().display(),res.to_text());
        Ok(res)
    }

    /// Check every choice in universe is in the order.
    pub fn validate_covers(&self,universe:&ChoiceSet,source_name:&str) -> Result<()> {
        match universe.iter().find(|c|!self.position.contains_key(*c)) {
            Some(missing) => Err(TieBreakError::ChoiceMissingFromPrecedence{ choice: missing.clone(), file: source_name.to_string() }),
            None => Ok(()),
        }
    }

    /// 0 is the most favoured.
    pub fn position(&self,choice:&str) -> Option<usize> { self.position.get(choice).copied() }
    pub fn len(&self) -> usize { self.order.len() }
    pub fn is_empty(&self) -> bool { self.order.is_empty() }
    pub fn iter(&self) -> impl Iterator<Item=&Choice> { self.order.iter() }
    pub fn as_slice(&self) -> &[Choice] { &self.order }

    fn position_or_error(&self,choice:&Choice) -> Result<usize> {
        self.position(choice.name()).ok_or_else(||TieBreakError::UnknownChoice(choice.clone()))
    }

    /// Reorder `choices` most favoured first.
    pub fn sort(&self,choices:&[Choice]) -> Result<Vec<Choice>> {
        let mut keyed = choices.iter().map(|c|->Result<(usize,Choice)> { Ok((self.position_or_error(c)?,c.clone())) }).collect::<Result<Vec<_>>>()?;
        keyed.sort_by_key(|(position,_)|*position);
        Ok(keyed.into_iter().map(|(_,c)|c).collect())
    }

    /// The most favoured of `tied`. Always a unique answer.
    pub fn resolve(&self,tied:&[Choice]) -> Result<Choice> {
        let mut best : Option<(usize,&Choice)> = None;
        for c in tied {
            let position = self.position_or_error(c)?;
            if best.is_none_or(|(best_position,_)|position<best_position) { best=Some((position,c)); }
        }
        best.map(|(_,c)|c.clone()).ok_or(TieBreakError::EmptyTie)
    }
}

/// The precedence order for one election run, loaded or generated on first use and then remembered.
///
/// Each run should have its own; the remembered order is dropped by [Precedence::invalidate]
/// whenever where it comes from changes.
#[derive(Debug)]
pub struct Precedence {
    /// A file to load the order from. If None, the order is generated.
    file : Option<PathBuf>,
    /// Where a generated order is written. If None, [default_precedence_path].
    generated_path : Option<PathBuf>,
    cache : OnceCell<PrecedenceOrder>,
}

impl Default for Precedence {
    fn default() -> Self { Precedence::new(None) }
}

impl Precedence {
    pub fn new(file:Option<PathBuf>) -> Self {
        Precedence{ file, generated_path: None, cache: OnceCell::new() }
    }

    pub fn file(&self) -> Option<&Path> { self.file.as_deref() }
    /// Where a generated order would be written for this source.
    pub fn generated_path<S:RankingSource+?Sized>(&self,source:&S) -> PathBuf {
        match &self.generated_path {
            Some(path) => path.clone(),
            None => default_precedence_path(source.choices(),source.votes_cast()),
        }
    }

    pub fn set_file(&mut self,file:Option<PathBuf>) {
        self.file=file;
        self.invalidate();
    }

    pub fn set_generated_path(&mut self,path:PathBuf) {
        self.generated_path=Some(path);
        self.invalidate();
    }

    /// Forget any remembered order.
    pub fn invalidate(&mut self) {
        if self.cache.take().is_some() { log::debug!("Precedence order invalidated"); }
    }

    pub fn is_cached(&self) -> bool { self.cache.get().is_some() }

    /// Get the order, loading or generating it if not already done.
    pub fn order<S:RankingSource+?Sized>(&self,source:&S) -> Result<&PrecedenceOrder> {
        self.cache.get_or_try_init(||{
            match &self.file {
                Some(file) => PrecedenceOrder::load(file,source.choices()),
                None => PrecedenceOrder::generate(source.choices(),source.votes_cast(),self.generated_path(source)),
            }
        })
    }
}
