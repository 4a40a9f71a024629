use clap::{Arg, Command};
use color_eyre::eyre::Result;
use std::path::PathBuf;

use wordsim::{construct_dfa, export_dot, read_description_file, simulate};

fn main() -> Result<()> {
    let args = Command::new("wordsim")
        .version("1.0")
        .about("A finite automata simulator which checks whether a word is accepted by an automaton described in a six line textual format")
        .arg(
            Arg::new("input")
                .short('i')
                .long("input")
                .help("The automaton description file: states, alphabet, start state, accept states, transitions and the word to recognize, one line each")
                .value_name("DESCRIPTION FILE")
                .value_parser(clap::value_parser!(PathBuf))
                .required(true),
        )
        .arg(
            Arg::new("word")
                .short('w')
                .long("word")
                .help("Simulate this word instead of the one on line 6 of the description")
                .value_name("WORD")
                .value_parser(clap::value_parser!(String))
                .num_args(1),
        )
        .arg(
            Arg::new("to-dfa")
                .short('d')
                .long("to-dfa")
                .help("Convert the automaton to a DFA with Subset Construction before simulating")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("classify")
                .short('c')
                .long("classify")
                .help("Report whether the described automaton is deterministic")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("save-dot")
                .short('s')
                .long("save-dot")
                .help("Save the simulated automaton as a Graphviz dot file with the given file stem")
                .value_name("FILE STEM")
                .value_parser(clap::value_parser!(String))
                .num_args(1),
        )
        .arg(
            Arg::new("save-json")
                .short('j')
                .long("save-json")
                .help("Save the simulated automaton descriptor as json")
                .value_name("JSON FILE")
                .value_parser(clap::value_parser!(String))
                .num_args(1),
        )
        .get_matches();

    let input_path = args.get_one::<PathBuf>("input").unwrap();

    let description = read_description_file(input_path.to_string_lossy().to_string())?;

    let (automaton, description_word) = description.into_parts();

    let word = match args.get_one::<String>("word") {
        Some(word) => word.clone(),
        None => description_word,
    };

    if args.get_flag("classify") {
        if automaton.is_deterministic() {
            println!("The automaton is deterministic");
        } else {
            println!("The automaton is nondeterministic");
        }
    }

    let automaton = if args.get_flag("to-dfa") {
        construct_dfa(&automaton)
    } else {
        automaton
    };

    if let Some(stem) = args.get_one::<String>("save-dot") {
        export_dot(&automaton, stem)?;
        println!("Automaton saved as {}.dot", stem);
    }

    if let Some(json_file) = args.get_one::<String>("save-json") {
        automaton.save_automaton(json_file)?;
        println!("Automaton saved as {}", json_file);
    }

    let run = simulate(&automaton, &word);

    for step in run.get_trace() {
        println!(
            "{}_{} {}",
            step.get_consumed(),
            step.get_remaining(),
            step.get_configuration().join("")
        );
    }

    if run.is_accepted() {
        println!("Accepted");
    } else {
        println!("Rejected");
    }

    Ok(())
}
