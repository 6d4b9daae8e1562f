//! PLX CLI

use plxc::commands::{explain, lex_file, LexArgs};

fn print_usage() {
    eprintln!("Usage: plx <command> [options]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  lex <file>      Print the token stream of a PLX source file");
    eprintln!("  explain <code>  Describe an error code (e.g. E0004)");
    eprintln!();
    eprintln!("Set PLX_LOG (e.g. PLX_LOG=plx_lexer=trace) for lexer tracing.");
}

fn main() {
    plxc::init_tracing();
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    match args[1].as_str() {
        "lex" => {
            let lex_args = match LexArgs::parse(&args[2..]) {
                Ok(lex_args) => lex_args,
                Err(msg) => {
                    eprintln!("error: {msg}");
                    eprintln!();
                    eprintln!("{}", LexArgs::USAGE);
                    std::process::exit(1);
                }
            };
            if !lex_file(&lex_args) {
                std::process::exit(1);
            }
        }
        "explain" | "--explain" => {
            let Some(code) = args.get(2) else {
                eprintln!("Usage: plx explain <ERROR_CODE>");
                std::process::exit(1);
            };
            match explain(code) {
                Ok(text) => println!("{text}"),
                Err(msg) => {
                    eprintln!("error: {msg}");
                    std::process::exit(1);
                }
            }
        }
        "help" | "--help" | "-h" => print_usage(),
        other => {
            eprintln!("error: unknown command '{other}'");
            print_usage();
            std::process::exit(1);
        }
    }
}
