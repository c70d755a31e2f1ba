// Copyright 2021-2026 Andrew Conway.
// This file is part of ConcreteSTV.
// ConcreteSTV is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// ConcreteSTV is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with ConcreteSTV.  If not, see <https://www.gnu.org/licenses/>.


use clap::{Parser, Subcommand};
use std::path::PathBuf;
use anyhow::anyhow;
use votecount::ballot::BallotSet;
use votecount::choice::{join_choices, Choice, ChoiceSet};
use votecount::counting::RankingSource;
use votecount::grand_junction::grand_junction_winner;
use votecount::precedence::{default_precedence_path, PrecedenceOrder};
use votecount::rank_count::{rank, Leader};
use votecount::tie_resolution::{TieBreakMethod, TieBreaker};
use main_app::{tie_break_config, try_parse_choice_list, ConfigOverrides};

#[derive(Parser)]
#[command(version = "0.2", author = "Andrew Conway", name="votecount")]
/// Rank choices and resolve ties in ranked choice elections.
///
/// Ballot files are either .json or lines like `3:A:B:C` meaning 3 ballots preferring A, then B, then C.
struct Opts {
    /// A JSON file with the tie break settings, e.g. {"method":"borda","fallback_precedence":true}.
    /// Command line options override it.
    #[arg(long,global=true)]
    config : Option<PathBuf>,

    /// Print the rank tables and traces behind each decision. RUST_LOG overrides this.
    #[arg(long,global=true)]
    verbose : bool,

    #[command(subcommand)]
    command : Command,
}

#[derive(Subcommand)]
enum Command {
    /// Rank the choices by a count and print the rank table.
    Rank {
        /// The ballot file.
        ballots : PathBuf,
        /// approval, topcount, borda, borda_all or grandjunction.
        #[arg(short,long,default_value="topcount")]
        method : TieBreakMethod,
        /// Comma separated list of the choices still active. Defaults to all of them.
        #[arg(long)]
        active : Option<String>,
        /// Include a column with each choice's share of the total.
        #[arg(long)]
        percent : bool,
    },
    /// Break a tie between the listed choices.
    Tiebreak {
        ballots : PathBuf,
        /// The tie break method. If not given, the one in the config file (or none).
        #[arg(short,long)]
        method : Option<TieBreakMethod>,
        /// Resolve any remaining tie by precedence.
        #[arg(long)]
        fallback : bool,
        /// A file listing every choice, one per line, most favoured first. If not given, one is generated.
        #[arg(long)]
        precedence : Option<PathBuf>,
        #[arg(long)]
        active : Option<String>,
        /// Print the result as JSON.
        #[arg(long)]
        json : bool,
        /// The tied choices.
        #[arg(required=true)]
        tied : Vec<Choice>,
    },
    /// Put choices into a strict order.
    Untie {
        ballots : PathBuf,
        #[arg(long)]
        primary : TieBreakMethod,
        /// Used to split groups the primary method leaves tied.
        #[arg(long,default_value="precedence")]
        secondary : TieBreakMethod,
        #[arg(long)]
        precedence : Option<PathBuf>,
        /// The choices to order. Defaults to all of them.
        choices : Vec<Choice>,
    },
    /// Generate the pseudo-random precedence order for a ballot file, save it, and print it.
    Precedence {
        ballots : PathBuf,
        /// Where to save it. Defaults to a file in the temporary directory named from the votes cast and the choices.
        #[arg(short,long)]
        out : Option<PathBuf>,
    },
}

fn active_choices(set:&BallotSet,active:&Option<String>) -> anyhow::Result<ChoiceSet> {
    match active {
        None => Ok(set.choices.clone()),
        Some(list) => {
            let list = try_parse_choice_list(list).map_err(|e|anyhow!(e))?;
            if let Some(unknown) = list.iter().find(|c|!set.choices.contains(*c)) { return Err(anyhow!("Choice {} is not in the ballot file",unknown)); }
            Ok(list.into_iter().collect())
        }
    }
}

fn main() -> anyhow::Result<()> {
    let opt : Opts = Opts::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(if opt.verbose { "debug" } else { "warn" })).init();

    match &opt.command {
        Command::Rank { ballots, method, active, percent } => {
            let set = BallotSet::load(ballots)?;
            if opt.verbose { set.print_summary(); }
            let active = active_choices(&set,active)?;
            if *method==TieBreakMethod::GrandJunction {
                let gj = grand_junction_winner(&set,&active);
                for line in gj.round_log() { println!("{}",line); }
                match &gj.winner {
                    Some(winner) => println!("Winner: {}",winner),
                    None => println!("Still tied: {}",join_choices(&gj.remaining)),
                }
                return Ok(());
            }
            let tie_breaker = TieBreaker::new(&set,Default::default());
            let ranked = rank(&tie_breaker.ranking(*method,&active,&active)?)?;
            print!("{}",if *percent { ranked.rank_table_with_percent() } else { ranked.rank_table() });
            match ranked.leader() {
                Leader::Winner(winner) => println!("Winner: {}",winner),
                Leader::Tie(tied) => println!("Tied for first: {}",join_choices(&tied)),
            }
        }
        Command::Tiebreak { ballots, method, fallback, precedence, active, json, tied } => {
            let set = BallotSet::load(ballots)?;
            if let Some(unknown) = tied.iter().find(|c|!set.choices.contains(*c)) { return Err(anyhow!("Choice {} is not in the ballot file",unknown)); }
            let active = active_choices(&set,active)?;
            let config = tie_break_config(opt.config.as_deref(),&ConfigOverrides{ method: *method, fallback_precedence: *fallback, precedence_file: precedence.clone() })?;
            let tie_breaker = TieBreaker::new(&set,config);
            let result = tie_breaker.resolve(&active,tied)?;
            if *json { println!("{}",serde_json::to_string_pretty(&result)?); }
            else {
                if opt.verbose { print!("{}",result.trace); } else { println!("{}",result.trace.terse); }
                let chosen = result.choices();
                if chosen.is_empty() { println!("Selected: none"); } else { println!("Selected: {}",join_choices(&chosen)); }
            }
        }
        Command::Untie { ballots, primary, secondary, precedence, choices } => {
            let set = BallotSet::load(ballots)?;
            let config = tie_break_config(opt.config.as_deref(),&ConfigOverrides{ method: None, fallback_precedence: true, precedence_file: precedence.clone() })?;
            let tie_breaker = TieBreaker::new(&set,config);
            let ordered = if choices.is_empty() { tie_breaker.untie_active(*primary,*secondary,set.choices())? } else { tie_breaker.untie_list(*primary,*secondary,choices)? };
            for (index,choice) in ordered.iter().enumerate() { println!("{}\t{}",index+1,choice); }
        }
        Command::Precedence { ballots, out } => {
            let set = BallotSet::load(ballots)?;
            let out = out.clone().unwrap_or_else(||default_precedence_path(set.choices(),set.votes_cast()));
            let order = PrecedenceOrder::generate(set.choices(),set.votes_cast(),&out)?;
            print!("{}",order.to_text());
            eprintln!("Saved to {}",out.display());
        }
    }
    Ok(())
}
