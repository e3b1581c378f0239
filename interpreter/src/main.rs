use std::fs;
use std::path::PathBuf;
use std::process;

use clap::Parser;

use alang_core::{Reporter, Scanner};
use interpreter::ast::AstVisitor;
use interpreter::dump::dump;
use interpreter::interpreter::Interpreter;
use interpreter::resolver::{Enter, RefResolver};
use interpreter::symbol::SymTable;

/// Runs an alang program, printing each stage of the pipeline along the way:
/// the raw source, the token stream, the syntax tree before and after
/// resolution, the program's output, and its final value.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path of the program to run.
    #[arg(default_value = "program.a")]
    path: PathBuf,
}

fn main() {
    let args = Args::parse();

    let source = fs::read_to_string(&args.path).unwrap_or_else(|err| {
        eprintln!("cannot read '{}': {}", args.path.display(), err);
        process::exit(1);
    });

    let reporter = Reporter::stdout();

    println!("source:");
    println!("{}", source);

    println!("tokens:");
    let mut scanner = Scanner::new(&source, reporter.clone());
    loop {
        let token = scanner.next();
        if token.is_eof() {
            break;
        }
        println!("{:?}", token);
    }
    println!();

    let scanner = Scanner::new(&source, reporter.clone());
    let mut parser = interpreter::parser::Parser::new(scanner, reporter.clone());
    let program = parser.parse_program();

    println!("before resolution:");
    println!("{}", dump(&program));

    let mut sym_table = SymTable::new();
    Enter::new(&mut sym_table, reporter.clone()).visit_program(&program);
    RefResolver::new(&sym_table, reporter.clone()).visit_program(&program);

    println!("after resolution:");
    println!("{}", dump(&program));

    println!("running {}:", args.path.display());
    let result = Interpreter::new(reporter).interpret(&program);

    println!();
    println!("program returned: {}", result);
}
