//! The Ember compiler CLI.
//!
//! Reads one source file (or standard input) and emits either the tree
//! dump (`--dump-tree`) or rendered diagnostics. Exit 0 on a clean run, 1 if
//! any diagnostic was raised, 2 on an argument or I/O failure.

use std::io::Read as _;
use std::path::PathBuf;
use std::process;

use clap::Parser;

use ember_common::{DiagnosticSink, LineIndex};

#[derive(Parser)]
#[command(name = "emberc", version, about = "The Ember compiler front end")]
struct Cli {
    /// Source file to compile. Reads standard input if omitted.
    file: Option<PathBuf>,

    /// Print the parse tree instead of running semantic analysis.
    #[arg(long = "dump-tree")]
    dump_tree: bool,
}

fn main() {
    let cli = Cli::parse();

    let (file_name, source) = match read_source(cli.file.as_deref()) {
        Ok(pair) => pair,
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(2);
        }
    };

    process::exit(run(&file_name, &source, cli.dump_tree));
}

fn read_source(path: Option<&std::path::Path>) -> Result<(String, String), String> {
    match path {
        Some(p) => {
            let source = std::fs::read_to_string(p)
                .map_err(|e| format!("failed to read '{}': {e}", p.display()))?;
            Ok((p.display().to_string(), source))
        }
        None => {
            let mut source = String::new();
            std::io::stdin()
                .read_to_string(&mut source)
                .map_err(|e| format!("failed to read standard input: {e}"))?;
            Ok(("<stdin>".to_string(), source))
        }
    }
}

/// Run the full pipeline and return the process exit code.
fn run(file_name: &str, source: &str, dump_tree: bool) -> i32 {
    let lexer = ember_lexer::Lexer::new(source.as_bytes());
    let (tokens, lex_diags) = lexer.tokenize();

    let parsed = ember_parser::parse(tokens);

    let mut diags = DiagnosticSink::new();
    for d in lex_diags.iter() {
        diags.push(d.offset, d.message.clone());
    }
    for d in parsed.diagnostics.iter() {
        diags.push(d.offset, d.message.clone());
    }

    if dump_tree {
        print!("{}", ember_parser::dump_tree(&parsed.store, parsed.root));
        return if diags.is_empty() { 0 } else { 1 };
    }

    let analysis = ember_typeck::analyze(&parsed.store, parsed.root, &mut diags);
    let _ = analysis;

    if diags.is_empty() {
        return 0;
    }

    let index = LineIndex::new(source);
    for d in diags.iter() {
        eprint!("{}", d.render(file_name, source, &index));
    }
    1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_source_exits_zero() {
        let code = run("t.ember", "fun f() -> s32 { return 1; }", false);
        assert_eq!(code, 0);
    }

    #[test]
    fn unresolved_name_exits_one() {
        let code = run("t.ember", "fun f() { let a = nope; }", false);
        assert_eq!(code, 1);
    }

    #[test]
    fn dump_tree_prints_the_parse_tree() {
        let code = run("t.ember", "let x: s32 = 1;", true);
        assert_eq!(code, 0);
    }

    #[test]
    fn malformed_input_still_exits_one_not_two() {
        let code = run("t.ember", "fun f() { let x = ; }", false);
        assert_eq!(code, 1);
    }
}
