//! End-to-end tests over the public front-end surface: source in,
//! declarations and diagnostics out.

use slate::compile::check_source;
use slate::frontend::diagnostic::DiagnosticKind;
use slate::frontend::source::SourceFile;

fn messages(src: &str) -> Vec<String> {
    let (_, diags) = check_source(&SourceFile::from_literal(src));
    diags.items.into_iter().map(|d| d.message).collect()
}

#[test]
fn a_complete_program_checks_cleanly() {
    let src = r#"
        import std;
        namespace demo;

        alias byte = u8;

        struct color {
            r: byte;
            g: byte;
            b: byte;

            func luma() : u64 {
                return 0;
            }
        }

        func max(a: u64, b: u64) : u64 {
            if a > b {
                return a;
            }
            return b;
        }

        func main(argc: u64, argv: **u8) : u64 {
            let width: u64 = 640;
            let height = 480;
            let bigger = max(width, height);
            let ptr: *u8 = argv[argc - 1];
            if bigger == width || argc != 0 {
                return bigger << 1;
            }
            return bigger;
        }
    "#;
    let msgs = messages(src);
    assert!(msgs.is_empty(), "unexpected diagnostics: {msgs:?}");
}

#[test]
fn every_pipeline_stage_reports_through_one_list() {
    // One lexical error, then a clean parse, then semantic errors from
    // both analysis passes.
    let src = r#"
        func f(flag: bool) : u64 {
            let x: u32 = @ true;
            if flag {
                return 1;
            }
        }
    "#;
    let (decls, diags) = check_source(&SourceFile::from_literal(src));
    assert!(decls.is_some());

    let kinds: Vec<DiagnosticKind> = diags.items.iter().map(|d| d.kind).collect();
    assert!(kinds.contains(&DiagnosticKind::Lexical));
    assert!(kinds.contains(&DiagnosticKind::Semantic));

    let msgs: Vec<&str> = diags.items.iter().map(|d| d.message.as_str()).collect();
    assert!(msgs.contains(&"unexpected character"));
    assert!(msgs.contains(&"types cannot be assigned"));
    assert!(msgs.contains(&"not all control paths return a value"));
}

#[test]
fn syntax_errors_stop_after_one_diagnostic() {
    let src = "func broken(a: u64 { return a; } func also_broken( { }";
    let (decls, diags) = check_source(&SourceFile::from_literal(src));
    assert!(decls.is_none());
    assert_eq!(diags.len(), 1);
    assert_eq!(diags.items[0].kind, DiagnosticKind::Syntactic);
}

#[test]
fn diagnostics_carry_positions_inside_the_input() {
    let src = "func f() : u64 {\n    let a = 1;\n    let a = 2;\n    return a;\n}\n";
    let (_, diags) = check_source(&SourceFile::from_literal(src));
    assert_eq!(diags.len(), 1);
    let pos = diags.items[0].pos.expect("semantic diagnostics have positions");
    assert_eq!((pos.line, pos.column), (3, 5));
}

#[test]
fn member_functions_parse_but_are_not_control_checked() {
    // Termination analysis runs over free functions; member functions are
    // carried in the struct declaration.
    let src = r#"
        struct holder {
            value: u64;

            func get() : u64 {
            }
        }
    "#;
    let msgs = messages(src);
    assert!(msgs.is_empty(), "unexpected diagnostics: {msgs:?}");
}

#[test]
fn fragments_must_be_declarations() {
    let msgs = messages("1 + 2");
    assert_eq!(msgs, vec!["expected declaration"]);
}
