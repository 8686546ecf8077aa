use std::path::PathBuf;

use crate::compile::{self, EmitOptions};
use crate::repl;

pub fn run_cli<I>(args: I) -> i32
where
    I: IntoIterator<Item = String>,
{
    let mut input: Option<PathBuf> = None;
    let mut emit = EmitOptions::default();

    for arg in args {
        match arg.as_str() {
            "--emit-tokens" => emit.tokens = true,
            "--emit-ast" => emit.ast = true,
            "-h" | "--help" => {
                print_usage();
                return 0;
            }
            _ if arg.starts_with('-') => {
                eprintln!("unknown argument: {}", arg);
                return 1;
            }
            _ => {
                if input.is_some() {
                    eprintln!("expected a single input file");
                    return 1;
                }
                input = Some(PathBuf::from(arg));
            }
        }
    }

    match input {
        Some(path) => match compile::run_file(&path, emit) {
            Ok(true) => 0,
            Ok(false) => 1,
            Err(err) => {
                eprintln!("error: {err:#}");
                1
            }
        },
        None => match repl::run() {
            Ok(()) => 0,
            Err(err) => {
                eprintln!("error: {err:#}");
                1
            }
        },
    }
}

fn print_usage() {
    eprintln!("usage: slate <input.sl> [--emit-tokens] [--emit-ast]");
    eprintln!("   or: slate              start the repl");
}
