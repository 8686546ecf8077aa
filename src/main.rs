// Purpose: Provide the binary entry for the slate compiler front end.
// Inputs/Outputs: Reads process args and returns the CLI dispatcher's exit code.
// Invariants: Main must not bypass centralized CLI argument/diagnostic handling.
// Gotchas: Keep behavior aligned with the library surface used by tests.

fn main() {
    let code = slate::cli::run_cli(std::env::args().skip(1));
    std::process::exit(code);
}
