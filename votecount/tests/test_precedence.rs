// Copyright 2026 Andrew Conway.
// This file is part of ConcreteSTV.
// ConcreteSTV is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// ConcreteSTV is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with ConcreteSTV.  If not, see <https://www.gnu.org/licenses/>.


//! Loading, saving and generating precedence orders.


#[cfg(test)]
mod tests {
    use votecount::ballot::BallotSet;
    use votecount::choice::{choice_list, choice_set, Choice};
    use votecount::config::TieBreakConfig;
    use votecount::errors::TieBreakError;
    use votecount::precedence::PrecedenceOrder;
    use votecount::tie_resolution::{TieBreakMethod, TieBreaker};

    #[test]
    fn round_trip() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("precedence.txt");
        let universe = choice_set(["A","B","C"]);
        PrecedenceOrder::new(choice_list(["A","B","C"]))?.save(&path)?;
        assert_eq!(std::fs::read_to_string(&path)?,"A\nB\nC\n");
        let loaded = PrecedenceOrder::load(&path,&universe)?;
        assert_eq!(loaded.sort(&choice_list(["C","A","B"]))?,choice_list(["A","B","C"]));
        assert_eq!(loaded.resolve(&choice_list(["C","B"]))?,Choice::from("B"));
        Ok(())
    }

    #[test]
    fn incidental_whitespace_is_ignored() -> anyhow::Result<()> {
        let order = PrecedenceOrder::parse("  Smith \r\n\nJones\t\n")?;
        assert_eq!(order.as_slice(),&choice_list(["Smith","Jones"])[..]);
        assert_eq!(order.position("Jones"),Some(1));
        Ok(())
    }

    #[test]
    fn missing_choice_is_an_error() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("short.txt");
        std::fs::write(&path,"A\nB\n")?;
        match PrecedenceOrder::load(&path,&choice_set(["A","B","C"])) {
            Err(TieBreakError::ChoiceMissingFromPrecedence{choice,..}) => assert_eq!(choice,Choice::from("C")),
            other => panic!("Expected missing choice, got {:?}",other),
        }
        Ok(())
    }

    #[test]
    fn duplicates_and_unknowns_are_errors() {
        assert!(matches!(PrecedenceOrder::parse("A\nB\nA\n"),Err(TieBreakError::DuplicateInPrecedence(_))));
        let order = PrecedenceOrder::new(choice_list(["A","B"])).unwrap();
        assert!(matches!(order.sort(&choice_list(["A","Z"])),Err(TieBreakError::UnknownChoice(_))));
        assert!(matches!(order.resolve(&[]),Err(TieBreakError::EmptyTie)));
    }

    #[test]
    fn generation_is_deterministic() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let universe = choice_set(["Alice","Bob","Carol","Dave","Eve","Frank","Grace"]);
        let first = PrecedenceOrder::generate(&universe,1234,dir.path().join("first.txt"))?;
        let second = PrecedenceOrder::generate(&universe,1234,dir.path().join("second.txt"))?;
        assert_eq!(first,second);
        assert_eq!(std::fs::read(dir.path().join("first.txt"))?,std::fs::read(dir.path().join("second.txt"))?);
        assert_eq!(first.len(),universe.len());
        let mut sorted : Vec<Choice> = first.iter().cloned().collect();
        sorted.sort();
        assert_eq!(sorted,universe.iter().cloned().collect::<Vec<_>>());
        // and it reads back the same.
        assert_eq!(PrecedenceOrder::load(dir.path().join("first.txt"),&universe)?,first);
        Ok(())
    }

    #[test]
    fn seed_matters() {
        let universe : votecount::choice::ChoiceSet = (0..30).map(|i|Choice::new(format!("C{}",i))).collect();
        let a = PrecedenceOrder::from_seed(&universe,10).unwrap();
        let b = PrecedenceOrder::from_seed(&universe,11).unwrap();
        assert_ne!(a,b);
    }

    #[test]
    fn cache_is_invalidated_by_changes() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let ballots = BallotSet::parse_text("3:A:B\n2:B:C\n1:C\n")?;
        let mut tie_breaker = TieBreaker::new(&ballots,TieBreakConfig::new(TieBreakMethod::Precedence,false));
        let generated = dir.path().join("generated.txt");
        tie_breaker.set_generated_precedence_path(generated.clone());
        assert!(!tie_breaker.precedence().is_cached());
        let order = tie_breaker.precedence_order()?.clone();
        assert!(tie_breaker.precedence().is_cached());
        assert!(generated.exists());
        assert_eq!(order,PrecedenceOrder::from_seed(&ballots.choices,6)?);
        // same again, from the cache.
        assert_eq!(tie_breaker.precedence_order()?,&order);
        tie_breaker.set_method(TieBreakMethod::Borda);
        assert!(!tie_breaker.precedence().is_cached());
        let explicit = dir.path().join("explicit.txt");
        std::fs::write(&explicit,"C\nB\nA\n")?;
        tie_breaker.set_precedence_file(Some(explicit));
        assert_eq!(tie_breaker.precedence_order()?.as_slice(),&choice_list(["C","B","A"])[..]);
        tie_breaker.set_precedence_file(Some(dir.path().join("does_not_exist.txt")));
        assert!(matches!(tie_breaker.precedence_order(),Err(TieBreakError::Io{..})));
        Ok(())
    }

    #[test]
    fn separate_elections_keep_separate_files() -> anyhow::Result<()> {
        let first = BallotSet::parse_text("3:Ant:Bee\n2:Bee:Cat\n1:Cat\n")?;
        let second = BallotSet::parse_text("4:Xi:Yu\n3:Yu:Zed\n2:Zed\n")?;
        let run_a = TieBreaker::new(&first,TieBreakConfig::new(TieBreakMethod::Precedence,false));
        let run_b = TieBreaker::new(&second,TieBreakConfig::new(TieBreakMethod::Precedence,false));
        let path_a = run_a.precedence().generated_path(&first);
        let path_b = run_b.precedence().generated_path(&second);
        assert_ne!(path_a,path_b);
        let order_a = run_a.precedence_order()?.clone();
        let order_b = run_b.precedence_order()?.clone();
        // b generating must not clobber the record of a.
        assert_eq!(std::fs::read_to_string(&path_a)?,order_a.to_text());
        assert_eq!(std::fs::read_to_string(&path_b)?,order_b.to_text());
        std::fs::remove_file(&path_a)?;
        std::fs::remove_file(&path_b)?;
        Ok(())
    }
}
