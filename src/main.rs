use std::env;
use std::fs;
use std::io::{self, Read};
use std::process;

use tacl::ir::IrGenerator;
use tacl::lexer::tokenize;
use tacl::parser::Parser;

pub const VERSION: &str = "0.1.0";

#[derive(Clone, Copy, PartialEq)]
enum Stage {
    Tokens,
    Ast,
    Ir,
}

fn print_help() {
    println!(
        r#"tacl - a tiny imperative language front end v{}

Lowers source text to linear three-address code.

USAGE:
    tacl <file.tacl>        Compile a program and print its IR
    tacl -e "code"          Compile statements directly (wrapped in a function)
    tacl -                  Read source from stdin
    tacl                    Start the REPL (interactive mode)
    tacl [OPTIONS]

OPTIONS:
    -h, --help          Print this help message
    -v, --version       Print version information
    -i, --repl          Start the REPL (interactive mode)
    -e <code>           Compile code directly
    --tokens            Print the token stream instead of IR
    --ast               Print the parsed AST instead of IR
    --ir                Print the IR (default)

EXAMPLE:
    tacl -e "int x; x = 1; return x;"
    echo "function main() {{ return 1 + 2 * 3; }}" | tacl -

LANGUAGE:
    - Programs are a sequence of function definitions: function name() {{ ... }}
    - Types: int, bool
    - Statements: declaration, assignment, if/else, while, do-while, for, return
    - Operators: || && == != < > <= >= + - * / and unary ! -
    - Comments: // to end of line
"#,
        VERSION
    );
}

fn run_source(source: &str, stage: Stage) {
    let tokens = match tokenize(source) {
        Ok(tokens) => tokens,
        Err(e) => {
            eprintln!("Lex error: {}", e);
            process::exit(1);
        }
    };

    if stage == Stage::Tokens {
        for token in &tokens {
            println!(
                "{:?} '{}' (line {}, column {})",
                token.kind, token.lexeme, token.line, token.column
            );
        }
        return;
    }

    let mut parser = Parser::new(tokens);
    let program = match parser.parse_program() {
        Ok(program) => program,
        Err(e) => {
            eprintln!("Parse error: {}", e);
            process::exit(1);
        }
    };

    if stage == Stage::Ast {
        println!("{:#?}", program);
        return;
    }

    for instr in IrGenerator::new().generate(&program) {
        println!("{}", instr);
    }
}

fn run_file(filename: &str, stage: Stage) {
    let source = match fs::read_to_string(filename) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error reading file '{}': {}", filename, e);
            process::exit(1);
        }
    };
    run_source(&source, stage);
}

fn run_statements(code: &str, stage: Stage) {
    // Bare statements are compiled inside a synthetic function
    let wrapped = format!("function main() {{ {} }}", code);
    run_source(&wrapped, stage);
}

fn run_stdin(stage: Stage) {
    let mut source = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut source) {
        eprintln!("Error reading stdin: {}", e);
        process::exit(1);
    }

    if source.contains("function") {
        run_source(&source, stage);
    } else {
        run_statements(&source, stage);
    }
}

fn main() {
    let args: Vec<String> = env::args().collect();

    // Stage flags can appear anywhere; the last one wins.
    let mut stage = Stage::Ir;
    for arg in &args[1..] {
        match arg.as_str() {
            "--tokens" => stage = Stage::Tokens,
            "--ast" => stage = Stage::Ast,
            "--ir" => stage = Stage::Ir,
            _ => {}
        }
    }
    let args: Vec<String> = args
        .into_iter()
        .filter(|a| !matches!(a.as_str(), "--tokens" | "--ast" | "--ir"))
        .collect();

    // No arguments - start the REPL
    if args.len() < 2 {
        tacl::repl::run_repl();
        return;
    }

    match args[1].as_str() {
        "-h" | "--help" => {
            print_help();
        }
        "-v" | "--version" => {
            println!("tacl {}", VERSION);
        }
        "-i" | "--repl" => {
            tacl::repl::run_repl();
        }
        "-e" => {
            if args.len() < 3 {
                eprintln!("Error: -e requires a code argument");
                eprintln!("Usage: tacl -e \"int x; x = 1; return x;\"");
                process::exit(1);
            }
            run_statements(&args[2], stage);
        }
        "-" => {
            run_stdin(stage);
        }
        filename => {
            run_file(filename, stage);
        }
    }
}
