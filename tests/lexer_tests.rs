use tacl::lexer::{tokenize, TokenKind};

fn kinds(source: &str) -> Vec<TokenKind> {
    tokenize(source)
        .expect("lex should succeed")
        .into_iter()
        .map(|t| t.kind)
        .collect()
}

#[test]
fn lexes_declaration_with_initializer() {
    assert_eq!(
        kinds("int x = 42;"),
        vec![
            TokenKind::IntType,
            TokenKind::Identifier,
            TokenKind::Assign,
            TokenKind::IntLiteral,
            TokenKind::Semicolon,
        ]
    );
}

#[test]
fn multi_character_operators_win_over_prefixes() {
    assert_eq!(
        kinds("<= == >= != < > ="),
        vec![
            TokenKind::LessEqual,
            TokenKind::Equal,
            TokenKind::GreaterEqual,
            TokenKind::NotEqual,
            TokenKind::Less,
            TokenKind::Greater,
            TokenKind::Assign,
        ]
    );
    // No space between them either
    assert_eq!(kinds("a<=b"), vec![
        TokenKind::Identifier,
        TokenKind::LessEqual,
        TokenKind::Identifier,
    ]);
}

#[test]
fn keywords_are_retagged_identifiers() {
    assert_eq!(
        kinds("function forward if ifx do down"),
        vec![
            TokenKind::Function,
            TokenKind::Identifier,
            TokenKind::If,
            TokenKind::Identifier,
            TokenKind::Do,
            TokenKind::Identifier,
        ]
    );
}

#[test]
fn comments_and_whitespace_are_discarded() {
    let tokens = tokenize("x = 1; // trailing comment\n// whole line\ny = 2;")
        .expect("lex should succeed");
    let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Identifier,
            TokenKind::Assign,
            TokenKind::IntLiteral,
            TokenKind::Semicolon,
            TokenKind::Identifier,
            TokenKind::Assign,
            TokenKind::IntLiteral,
            TokenKind::Semicolon,
        ]
    );
}

#[test]
fn tracks_line_and_column() {
    let tokens = tokenize("int x;\n  x = 10;").expect("lex should succeed");
    // `int` at 1:1, `x` at 1:5, `;` at 1:6
    assert_eq!((tokens[0].line, tokens[0].column), (1, 1));
    assert_eq!((tokens[1].line, tokens[1].column), (1, 5));
    assert_eq!((tokens[2].line, tokens[2].column), (1, 6));
    // second line restarts the column after the indent
    assert_eq!((tokens[3].line, tokens[3].column), (2, 3));
    assert_eq!(tokens[3].lexeme, "x");
}

#[test]
fn lexemes_carry_source_text() {
    let tokens = tokenize("count = count + 12").expect("lex should succeed");
    assert_eq!(tokens[0].lexeme, "count");
    assert_eq!(tokens[1].lexeme, "=");
    assert_eq!(tokens[4].lexeme, "12");
}

#[test]
fn unrecognized_characters_become_unknown_tokens() {
    let tokens = tokenize("x = 1 @ 2;").expect("lexing is total");
    let at = tokens.iter().find(|t| t.kind == TokenKind::Unknown).unwrap();
    assert_eq!(at.lexeme, "@");
    assert_eq!((at.line, at.column), (1, 7));
    // exactly one position is consumed
    assert_eq!(tokens.len(), 6);
}

#[test]
fn relexing_surviving_lexemes_preserves_kinds() {
    let source = "function f() { // comment\n  int x = 1;\n  x = x + 2;\n}";
    let tokens = tokenize(source).expect("lex should succeed");
    let flattened = tokens
        .iter()
        .map(|t| t.lexeme.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    let relexed = tokenize(&flattened).expect("lex should succeed");
    let original: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
    let roundtrip: Vec<TokenKind> = relexed.iter().map(|t| t.kind).collect();
    assert_eq!(original, roundtrip);
}

#[test]
fn empty_source_yields_no_tokens() {
    assert!(tokenize("").expect("lex should succeed").is_empty());
    assert!(tokenize("  \n\t // only a comment").expect("lex should succeed").is_empty());
}
