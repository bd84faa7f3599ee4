//! A thin REPL over `ml_eval`'s driver (spec §6's external "UI shell"
//! collaborator). One expression per line by default; `trace <expr>`
//! and `load <file> <entry>` mirror the driver's four entry points.
//!
//! Grounded on `rustyline`'s own documented `DefaultEditor` read loop
//! (no teacher/pack example repo carries a full REPL binary to imitate
//! more specifically) and on this workspace's own `ml_eval::driver` for
//! what each line actually does.

use std::fs;

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use ml_ir::{QualifiedName, SharedInterner};

const PROMPT: &str = "> ";
const HISTORY_FILE: &str = ".ml_cli_history";

fn main() {
    tracing_subscriber::fmt::init();
    let interner = SharedInterner::new();
    let mut editor = match DefaultEditor::new() {
        Ok(editor) => editor,
        Err(err) => {
            println!("failed to initialize line editor: {err}");
            return;
        }
    };
    let _ = editor.load_history(HISTORY_FILE);

    let mut pending = String::new();
    loop {
        let prompt = if pending.is_empty() { PROMPT } else { "| " };
        match editor.readline(prompt) {
            Ok(line) => {
                if pending.is_empty() {
                    let _ = editor.add_history_entry(line.as_str());
                } else {
                    pending.push('\n');
                }
                pending.push_str(&line);
                if is_balanced(&pending) {
                    let input = std::mem::take(&mut pending);
                    run_line(input.trim(), &interner);
                }
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(err) => {
                println!("readline error: {err}");
                break;
            }
        }
    }
    let _ = editor.save_history(HISTORY_FILE);
}

fn run_line(line: &str, interner: &SharedInterner) {
    if line.is_empty() {
        return;
    }
    if let Some(expr) = line.strip_prefix("trace ") {
        let (result, roots) = ml_eval::trace(expr, interner);
        print_result(&result, interner);
        for root in &roots {
            print!("{}", root.render(interner));
        }
        return;
    }
    if let Some(rest) = line.strip_prefix("load ") {
        run_load(rest, interner);
        return;
    }
    let result = ml_eval::eval(line, interner);
    print_result(&result, interner);
}

fn run_load(rest: &str, interner: &SharedInterner) {
    let mut parts = rest.splitn(2, char::is_whitespace);
    let (Some(path), Some(entry_name)) = (parts.next(), parts.next().map(str::trim)) else {
        println!("usage: load <file> <entry>");
        return;
    };
    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(err) => {
            println!("could not read {path}: {err}");
            return;
        }
    };
    let entry = QualifiedName {
        module: None,
        name: interner.intern(entry_name),
    };
    let result = ml_eval::eval_module(&source, entry, interner);
    print_result(&result, interner);
}

fn print_result(result: &Result<ml_eval::Value, ml_eval::Error>, interner: &SharedInterner) {
    match result {
        Ok(value) => println!("{}", value.display(interner)),
        Err(err) => println!("{}", err.display(interner)),
    }
}

/// Whether every paren/bracket/brace opened in `input` has been closed —
/// the REPL's only multi-line heuristic, deliberately not layout-aware.
fn is_balanced(input: &str) -> bool {
    let mut depth: i32 = 0;
    for c in input.chars() {
        match c {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth -= 1,
            _ => {}
        }
    }
    depth <= 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn balanced_single_line_is_ready() {
        assert!(is_balanced("1 + 2"));
    }

    #[test]
    fn unbalanced_open_paren_awaits_more_input() {
        assert!(!is_balanced("(1 + 2"));
    }

    #[test]
    fn closed_parens_are_ready_again() {
        assert!(is_balanced("(1 + 2)\n+ 3"));
    }
}
