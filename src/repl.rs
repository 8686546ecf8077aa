use std::path::PathBuf;

use anyhow::Result;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::compile::{self, EmitOptions};
use crate::frontend::source::SourceFile;

/// Line-oriented REPL. Each submitted line is compiled as a complete
/// source fragment; diagnostics go to stderr.
pub fn run() -> Result<()> {
    let mut editor = DefaultEditor::new()?;

    let history_path = history_path();
    if let Some(parent) = history_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    let _ = editor.load_history(&history_path);

    loop {
        match editor.readline("slate> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let _ = editor.add_history_entry(line);

                let source = SourceFile::from_literal(line);
                match compile::run_source(&source, EmitOptions::default()) {
                    Ok(true) => println!("ok"),
                    Ok(false) => {}
                    Err(err) => eprintln!("error: {err:#}"),
                }
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(err) => return Err(err.into()),
        }
    }

    let _ = editor.save_history(&history_path);
    Ok(())
}

fn history_path() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("slate").join("repl_history"))
        .unwrap_or_else(|| PathBuf::from(".slate_history"))
}
