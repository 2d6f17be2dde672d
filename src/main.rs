pub mod grammar;

use std::{fs, io::BufRead};

pub use grammar::Grammar;
use grammar::PredictiveParser;

fn print_help() {
    println!("Usage: ll1-parser-helper outputs [options] [grammar file]");
    println!("outputs:");
    println!("  prod: Productions");
    println!("  ff: First and follow sets");
    println!("  ll1: LL(1) parsing table");
    println!("options:");
    println!("  -h: Print this help");
    println!("  -l: Print in LaTeX format");
    println!("  -j: Print in JSON format");
    println!("  -p <tokens>: Parse a whitespace-separated token string");
}

fn main() {
    let args = std::env::args().skip(1).collect::<Vec<String>>();

    let mut outputs: Vec<&str> = Vec::new();
    let mut i: usize = 0;
    while i < args.len() && ["prod", "ff", "ll1"].contains(&args[i].as_str()) {
        outputs.push(args[i].as_str());
        i += 1;
    }

    enum OutputFormat {
        Plain,
        LaTeX,
        Json,
    }
    let mut output_format = OutputFormat::Plain;
    let mut parse_input: Option<&str> = None;

    while i < args.len() && ["-h", "--help", "-l", "-j", "-p"].contains(&args[i].as_str()) {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_help();
                return;
            }
            "-l" => output_format = OutputFormat::LaTeX,
            "-j" => output_format = OutputFormat::Json,
            "-p" => {
                i += 1;
                if i == args.len() {
                    print_help();
                    return;
                }
                parse_input = Some(args[i].as_str());
            }
            _ => {}
        }
        i += 1;
    }

    if i + 1 < args.len() || (outputs.is_empty() && parse_input.is_none()) {
        print_help();
        return;
    }

    let input: String = if i == args.len() {
        std::io::stdin()
            .lock()
            .lines()
            .map(|l| l.unwrap())
            .collect::<Vec<String>>()
            .join("\n")
    } else {
        fs::read_to_string(args[i].as_str()).expect("Failed to read file")
    };

    let mut g = match Grammar::parse(&input) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };
    g.calculate_first_follow();

    for output in outputs {
        if output == "prod" {
            let t = g.to_production_output_vec();
            println!(
                "{}",
                match output_format {
                    OutputFormat::Plain => t.to_plaintext(),
                    OutputFormat::LaTeX => t.to_latex(),
                    OutputFormat::Json => t.to_json(),
                }
            );
        }
        if output == "ff" {
            let t = g.to_first_follow_output_vec();
            println!(
                "{}",
                match output_format {
                    OutputFormat::Plain => t.to_plaintext(),
                    OutputFormat::LaTeX => t.to_latex(),
                    OutputFormat::Json => t.to_json(),
                }
            );
        }
        if output == "ll1" {
            let table = g.build_ll1_table();
            let t = g.ll1_table_output(&table);
            println!(
                "{}",
                match output_format {
                    OutputFormat::Plain => t.to_plaintext(),
                    OutputFormat::LaTeX => t.to_latex(),
                    OutputFormat::Json => t.to_json(),
                }
            );
        }
    }

    if let Some(text) = parse_input {
        let table = g.build_ll1_table();
        if !table.is_ll1() {
            eprintln!(
                "warning: grammar is not LL(1) ({} conflicts), parsing with first-registered entries",
                table.conflicts().len()
            );
        }

        let parser = PredictiveParser::new(&g, table);
        let tokens: Vec<&str> = text.split_whitespace().collect();
        match parser.parse(&tokens) {
            Ok(tree) => match output_format {
                OutputFormat::Json => println!("{}", g.tree_output(&tree).to_json()),
                _ => print!("{}", g.tree_to_plaintext(&tree)),
            },
            Err(e) => {
                eprintln!("parse error: {}", e);
                std::process::exit(1);
            }
        }
    }
}
