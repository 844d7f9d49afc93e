pub mod ast;
pub mod ir;
pub mod lexer;
pub mod parser;
pub mod repl;
pub mod symtab;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    #[error("lex error: {0}")]
    Lex(#[from] lexer::LexError),
    #[error("parse error: {0}")]
    Parse(#[from] parser::ParseError),
}

/// Runs the whole front end: source text in, three-address code out.
pub fn compile(source: &str) -> Result<Vec<ir::Instr>, CompileError> {
    let program = parse(source)?;
    Ok(ir::IrGenerator::new().generate(&program))
}

/// Lexes and parses, stopping before lowering.
pub fn parse(source: &str) -> Result<ast::Program, CompileError> {
    let tokens = lexer::tokenize(source)?;
    let mut parser = parser::Parser::new(tokens);
    Ok(parser.parse_program()?)
}
