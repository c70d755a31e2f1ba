// Copyright 2026 Andrew Conway.
// This file is part of ConcreteSTV.
// ConcreteSTV is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// ConcreteSTV is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with ConcreteSTV.  If not, see <https://www.gnu.org/licenses/>.

//! The options being voted on.

use serde::{Serialize,Deserialize};
use std::borrow::Borrow;
use std::collections::BTreeSet;
use std::fmt;

/// a candidate or option, referred to by name. No other structure is assumed.
#[derive(Clone,PartialEq,Eq,PartialOrd,Ord,Hash,Serialize,Deserialize)]
#[serde(transparent)]
pub struct Choice(pub String);

impl Choice {
    pub fn new(name:impl Into<String>) -> Self { Choice(name.into()) }
    pub fn name(&self) -> &str { &self.0 }
}

// type alias really, don't want long display
impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { write!(f, "{}", self.0) }
}
impl fmt::Debug for Choice {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { write!(f, "{}", self.0) }
}

impl From<&str> for Choice {
    fn from(name: &str) -> Self { Choice(name.to_string()) }
}
impl From<String> for Choice {
    fn from(name: String) -> Self { Choice(name) }
}

/// lets maps keyed by Choice be looked up by &str.
impl Borrow<str> for Choice {
    fn borrow(&self) -> &str { &self.0 }
}

/// A set of choices, such as those still active in a count. Iterates in name order.
pub type ChoiceSet = BTreeSet<Choice>;

/// Make a set of choices from names.
/// ```
/// use votecount::choice::choice_set;
/// let set = choice_set(["C","A","B","A"]);
/// assert_eq!(set.len(),3);
/// assert_eq!(set.iter().next().unwrap().name(),"A");
/// ```
pub fn choice_set<I,S>(names:I) -> ChoiceSet where I:IntoIterator<Item=S>, S:Into<String> {
    names.into_iter().map(|s|Choice(s.into())).collect()
}

/// Make a list of choices from names, preserving order.
pub fn choice_list<I,S>(names:I) -> Vec<Choice> where I:IntoIterator<Item=S>, S:Into<String> {
    names.into_iter().map(|s|Choice(s.into())).collect()
}

/// Human readable comma separated list, used in traces.
pub fn join_choices<'a>(choices:impl IntoIterator<Item=&'a Choice>) -> String {
    choices.into_iter().map(|c|c.name()).collect::<Vec<_>>().join(", ")
}
