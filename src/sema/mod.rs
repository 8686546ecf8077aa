// Purpose: Semantic analysis entry point over a parsed module.
// Inputs/Outputs: Consumes declarations, returns accumulated semantic diagnostics.
// Invariants: Passes must run to completion; they never abort on the first error.
// Gotchas: Control-flow analysis and type checking are independent and both always run.

pub mod check;
pub mod control;
pub mod scope;
pub mod types;

use crate::frontend::ast::Decl;
use crate::frontend::diagnostic::Diagnostics;

/// Run the semantic passes over a module: control-flow termination
/// analysis, then the type checker.
pub fn analyze(decls: &[Decl]) -> Diagnostics {
    let mut diags = Diagnostics::default();
    control::run(decls, &mut diags);
    check::run(decls, &mut diags);
    diags
}
