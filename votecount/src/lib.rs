// Copyright 2021-2026 Andrew Conway.
// This file is part of ConcreteSTV.
// ConcreteSTV is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// ConcreteSTV is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with ConcreteSTV.  If not, see <https://www.gnu.org/licenses/>.

//! Rank counting and tie resolution for ranked choice elections.
//!
//! Raw vote totals are turned into rank groups by [rank_count], and ties between
//! choices are broken by one of the strategies in [tie_resolution], with a reproducible
//! pseudo-random [precedence] order as the resolver of last resort.


pub mod errors;
pub mod choice;
pub mod ballot;
pub mod counting;
pub mod rank_count;
pub mod random_util;
pub mod precedence;
pub mod config;
pub mod tie_resolution;
pub mod grand_junction;
pub mod untie;
