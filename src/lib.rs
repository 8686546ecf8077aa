// Purpose: Define the crate-level module surface for the compiler front end.
// Inputs/Outputs: Re-exports internal modules for the binary and for tests.
// Invariants: Public module boundaries should remain stable for internal callers.
// Gotchas: Keep module wiring consistent with src/main.rs.

pub mod cli;
pub mod compile;
pub mod frontend;
pub mod repl;
pub mod sema;
