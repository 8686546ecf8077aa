// Purpose: Frontend module hub that wires source handling, lexer and parser together.
// Inputs/Outputs: Exposes frontend components used by the compile pipeline and tests.
// Invariants: Public frontend API should remain a thin composition over specialized modules.
// Gotchas: Keep exports minimal to avoid leaking unstable parser-internal contracts.

pub mod ast;
pub mod cursor;
pub mod diagnostic;
pub mod lexer;
pub mod parser;
pub mod source;
pub mod suggest;
pub mod token;
