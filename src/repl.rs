use crate::ir::IrGenerator;
use crate::lexer::tokenize;
use crate::parser::Parser;
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RlResult};
use std::fs;

#[derive(Clone, Copy, PartialEq)]
enum Mode {
    Tokens,
    Ast,
    Ir,
}

pub fn run_repl() {
    println!("tacl REPL");
    println!("Type statements or whole functions; the IR is printed back.");
    println!("Type .help for commands, .exit to quit.\n");

    if let Err(e) = repl_loop() {
        eprintln!("REPL error: {}", e);
    }
}

fn repl_loop() -> RlResult<()> {
    let mut rl = DefaultEditor::new()?;
    let mut mode = Mode::Ir;
    let mut input_buffer = String::new();
    let mut brace_depth: i32 = 0;
    let mut in_multiline = false;

    let history_path = history_path();
    if let Some(ref path) = history_path {
        let _ = rl.load_history(path);
    }

    loop {
        let prompt = if in_multiline { "...> " } else { "tacl> " };

        match rl.readline(prompt) {
            Ok(line) => {
                let trimmed = line.trim();

                // Dot commands, only outside multi-line input
                if !in_multiline && trimmed.starts_with('.') {
                    rl.add_history_entry(&line)?;
                    if handle_command(trimmed, &mut mode) {
                        break;
                    }
                    continue;
                }

                // Track brace depth so function bodies can span lines
                for c in line.chars() {
                    match c {
                        '{' => brace_depth += 1,
                        '}' => brace_depth = brace_depth.saturating_sub(1),
                        _ => {}
                    }
                }

                input_buffer.push_str(&line);
                input_buffer.push('\n');

                if brace_depth > 0 {
                    in_multiline = true;
                    continue;
                }

                in_multiline = false;
                let input = input_buffer.trim();
                if !input.is_empty() {
                    rl.add_history_entry(input)?;
                    compile_input(input, mode);
                }

                input_buffer.clear();
                brace_depth = 0;
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl-C: drop the current input
                println!("^C");
                input_buffer.clear();
                brace_depth = 0;
                in_multiline = false;
            }
            Err(ReadlineError::Eof) => {
                println!("Goodbye!");
                break;
            }
            Err(err) => {
                eprintln!("Error: {:?}", err);
                break;
            }
        }
    }

    if let Some(ref path) = history_path {
        let _ = rl.save_history(path);
    }

    Ok(())
}

fn history_path() -> Option<String> {
    dirs::home_dir().map(|mut path| {
        path.push(".tacl_history");
        path.to_string_lossy().to_string()
    })
}

/// Handle a REPL command. Returns true if the REPL should exit.
fn handle_command(cmd: &str, mode: &mut Mode) -> bool {
    let parts: Vec<&str> = cmd.splitn(2, ' ').collect();
    let command = parts[0];
    let arg = parts.get(1).map(|s| s.trim());

    match command {
        ".exit" | ".quit" | ".q" => {
            println!("Goodbye!");
            return true;
        }
        ".help" | ".h" => {
            print_repl_help();
        }
        ".mode" => match arg {
            Some("tokens") => {
                *mode = Mode::Tokens;
                println!("Printing tokens.");
            }
            Some("ast") => {
                *mode = Mode::Ast;
                println!("Printing the AST.");
            }
            Some("ir") => {
                *mode = Mode::Ir;
                println!("Printing IR.");
            }
            Some(other) => {
                eprintln!("Unknown mode '{}'. Use tokens, ast or ir.", other);
            }
            None => {
                let current = match mode {
                    Mode::Tokens => "tokens",
                    Mode::Ast => "ast",
                    Mode::Ir => "ir",
                };
                println!("Current mode: {}", current);
            }
        },
        ".load" => {
            if let Some(filename) = arg {
                match fs::read_to_string(filename) {
                    Ok(source) => compile_input(&source, *mode),
                    Err(e) => eprintln!("Error reading file '{}': {}", filename, e),
                }
            } else {
                eprintln!("Usage: .load <filename>");
            }
        }
        _ => {
            eprintln!("Unknown command: {}", command);
            eprintln!("Type .help for available commands.");
        }
    }

    false
}

fn compile_input(input: &str, mode: Mode) {
    // Bare statements get wrapped in a synthetic function so that a line
    // like `x = 1;` compiles on its own.
    let source = if input.trim_start().starts_with("function") {
        input.to_string()
    } else {
        format!("function repl() {{ {} }}", input)
    };

    let tokens = match tokenize(&source) {
        Ok(tokens) => tokens,
        Err(e) => {
            eprintln!("Lex error: {}", e);
            return;
        }
    };

    if mode == Mode::Tokens {
        for token in &tokens {
            println!(
                "{:?} '{}' (line {}, column {})",
                token.kind, token.lexeme, token.line, token.column
            );
        }
        return;
    }

    let mut parser = Parser::new(tokens);
    match parser.parse_program() {
        Ok(program) => {
            if mode == Mode::Ast {
                println!("{:#?}", program);
            } else {
                for instr in IrGenerator::new().generate(&program) {
                    println!("{}", instr);
                }
            }
        }
        Err(e) => {
            eprintln!("Parse error: {}", e);
        }
    }
}

fn print_repl_help() {
    println!(
        r#"
REPL Commands:
    .help, .h          Show this help message
    .exit, .quit, .q   Exit the REPL
    .mode [tokens|ast|ir]
                       Show or set what gets printed (default: ir)
    .load <file>       Compile a source file

Navigation:
    Up/Down arrows     Navigate command history
    Ctrl-C             Cancel current input
    Ctrl-D             Exit REPL

Examples:
    int x = 5;                         Declare and initialize
    while (x < 10) {{ x = x + 1; }}     Lower a loop
    function f() {{ return 1 + 2; }}    Whole function definitions work too

Tips:
    - Multi-line input: open braces are auto-detected
    - Bare statements are wrapped in a synthetic function
    - History is saved to ~/.tacl_history
"#
    );
}
