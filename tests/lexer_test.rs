use proptest::prelude::*;

use friston::lexer::{
    formatter::{BasicFormatter, TokenFormatter},
    scan, LexicalErrorKind, TokenKind, INDENT_WIDTH,
};

fn check(input: &str, expected: &str, test_name: &str) {
    let lexed = scan(input);
    let formatter = BasicFormatter;
    let mut buffer = String::new();
    for error in lexed.errors.iter() {
        buffer.push_str(&formatter.format_lexical_error(error));
        buffer.push('\n');
    }
    for token in lexed.tokens.iter() {
        buffer.push_str(&formatter.format(token));
        buffer.push('\n');
    }

    assert_eq!(buffer, expected, "Failed the test {test_name}");
}

fn kinds(input: &str) -> Vec<TokenKind> {
    scan(input).tokens.iter().map(|token| token.kind).collect()
}

#[test]
fn smoke_test() {
    check("", "{EOF, , nil, 1}\n", "smoke");
}

#[test]
fn basic_listing() {
    let expected = "\
{LET, let, nil, 1}
{IDENTIFIER, x, x, 1}
{EQUAL, =, nil, 1}
{NUMBER, 1.5, 1.5, 1}
{PLUS, +, nil, 1}
{STRING, \"hi\", hi, 1}
{NEWLINE, , nil, 1}
{EOF, , nil, 2}
";
    check("let x = 1.5 + \"hi\"\n", expected, "basic_listing");
}

#[test]
fn two_character_operators() {
    use TokenKind::*;
    assert_eq!(
        kinds("a++ b-- != == <= >= ! < > ="),
        vec![
            Ident,
            PlusPlus,
            Ident,
            MinusMinus,
            BangEqual,
            EqualEqual,
            LessThanEqual,
            GreaterThanEqual,
            Bang,
            LessThan,
            GreaterThan,
            Equal,
            Newline,
            Eof
        ]
    );
}

#[test]
fn indented_block() {
    use TokenKind::*;
    assert_eq!(
        kinds("if x then\n    y\nz\n"),
        vec![
            KeywordIf,
            Ident,
            KeywordThen,
            Indent,
            Ident,
            Newline,
            Dedent,
            Ident,
            Newline,
            Eof
        ]
    );
}

#[test]
fn end_of_input_closes_blocks() {
    use TokenKind::*;
    assert_eq!(
        kinds("while a then\n    while b then\n        c"),
        vec![
            KeywordWhile,
            Ident,
            KeywordThen,
            Indent,
            KeywordWhile,
            Ident,
            KeywordThen,
            Indent,
            Ident,
            Newline,
            Dedent,
            Dedent,
            Eof
        ]
    );
}

#[test]
fn keywords_that_continue_suppress_newline() {
    use TokenKind::*;
    assert_eq!(
        kinds("a and\nb\n"),
        vec![Ident, KeywordAnd, Ident, Newline, Eof]
    );
    assert_eq!(
        kinds("return\nnil\n"),
        vec![KeywordReturn, Newline, KeywordNil, Newline, Eof]
    );
}

#[test]
fn blank_and_comment_lines_keep_depth() {
    use TokenKind::*;
    assert_eq!(
        kinds("if x then\n    a\n\n// note\n    b\n"),
        vec![
            KeywordIf,
            Ident,
            KeywordThen,
            Indent,
            Ident,
            Newline,
            Ident,
            Newline,
            Dedent,
            Eof
        ]
    );
}

#[test]
fn comment_leaves_newline() {
    use TokenKind::*;
    assert_eq!(
        kinds("x // trailing\ny"),
        vec![Ident, Newline, Ident, Newline, Eof]
    );
}

#[test]
fn continuation_joins_lines() {
    use TokenKind::*;
    let lexed = scan("a + ~\n    b\n");
    assert!(!lexed.had_error());
    let kinds: Vec<_> = lexed.tokens.iter().map(|token| token.kind).collect();
    assert_eq!(kinds, vec![Ident, Plus, Ident, Newline, Eof]);
    assert_eq!(lexed.tokens[2].line, 2);
}

#[test]
fn stray_tilde_is_reported() {
    check(
        "a ~ b",
        "[Line 1] Error: Unexpected character '~'.\n\
         {IDENTIFIER, a, a, 1}\n\
         {IDENTIFIER, b, b, 1}\n\
         {NEWLINE, , nil, 1}\n\
         {EOF, , nil, 1}\n",
        "stray_tilde",
    );
}

#[test]
fn unterminated_string() {
    let lexed = scan("let s = \"open\nstill open");
    assert_eq!(lexed.errors.len(), 1);
    assert_eq!(lexed.errors[0].kind, LexicalErrorKind::UnclosedString);
    assert_eq!(lexed.errors[0].line, 2);
}

#[test]
fn misaligned_indent() {
    let lexed = scan("a\n   b\n");
    assert_eq!(lexed.errors.len(), 1);
    assert_eq!(lexed.errors[0].kind, LexicalErrorKind::MisalignedIndent);
    assert_eq!(lexed.errors[0].line, 2);
    assert_eq!(
        lexed.errors[0].kind.to_string(),
        "Indents must be four spaces"
    );
}

#[test]
fn identifiers_may_contain_digits() {
    check(
        "x2_y",
        "{IDENTIFIER, x2_y, x2_y, 1}\n{NEWLINE, , nil, 1}\n{EOF, , nil, 1}\n",
        "identifiers",
    );
}

// Property-based tests

fn symbol_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("(".to_string()),
        Just(")".to_string()),
        Just("{".to_string()),
        Just("}".to_string()),
        Just(",".to_string()),
        Just(".".to_string()),
        Just(":".to_string()),
        Just("-".to_string()),
        Just("--".to_string()),
        Just("+".to_string()),
        Just("++".to_string()),
        Just(";".to_string()),
        Just("*".to_string()),
        Just("!".to_string()),
        Just("!=".to_string()),
        Just("=".to_string()),
        Just("==".to_string()),
        Just("<".to_string()),
        Just("<=".to_string()),
        Just(">".to_string()),
        Just(">=".to_string()),
        Just("/".to_string()),
    ]
}

fn numeric_literal_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[0-9]+".prop_map(|s| s),          // Integer literals
        "[0-9]+\\.[0-9]+".prop_map(|s| s)  // Decimal literals
    ]
}

fn string_literal_strategy() -> impl Strategy<Value = String> {
    "[^\"]*".prop_map(|s: String| format!("\"{}\"", s))
}

fn identifier_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z_][a-zA-Z0-9_]*".prop_map(|s: String| s)
}

fn keyword_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("and".to_string()),
        Just("class".to_string()),
        Just("else".to_string()),
        Just("false".to_string()),
        Just("for".to_string()),
        Just("func".to_string()),
        Just("if".to_string()),
        Just("nil".to_string()),
        Just("or".to_string()),
        Just("return".to_string()),
        Just("then".to_string()),
        Just("this".to_string()),
        Just("true".to_string()),
        Just("let".to_string()),
        Just("while".to_string()),
    ]
}

fn token_sequence_strategy() -> impl Strategy<Value = Vec<String>> {
    const MIN_TOKEN_COUNT: usize = 1;
    const MAX_TOKEN_COUNT: usize = 100;
    prop::collection::vec(
        prop_oneof![
            symbol_strategy(),
            numeric_literal_strategy(),
            string_literal_strategy(),
            identifier_strategy(),
            keyword_strategy(),
        ],
        MIN_TOKEN_COUNT..MAX_TOKEN_COUNT,
    )
}

fn non_literal_sequence_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![symbol_strategy(), identifier_strategy(), keyword_strategy()],
        1..50,
    )
    .prop_map(|tokens| tokens.join(" "))
}

/// Depths for consecutive lines, each at most one deeper than the last.
fn nesting_strategy() -> impl Strategy<Value = Vec<usize>> {
    prop::collection::vec(0..4usize, 1..40).prop_map(|steps| {
        let mut depth = 0;
        steps
            .into_iter()
            .map(|step| {
                depth = if step == 3 { depth + 1 } else { depth.min(step) };
                depth
            })
            .collect()
    })
}

fn is_layout(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Newline | TokenKind::Indent | TokenKind::Dedent | TokenKind::Eof
    )
}

proptest! {
    #[test]
    fn lexer_handles_valid_tokens(input in token_sequence_strategy()) {
        let expected_num_tokens = input.len();
        let lexed = scan(&input.join(" "));
        prop_assert!(!lexed.had_error());
        let num_tokens = lexed.tokens.iter().filter(|token| !is_layout(token.kind)).count();
        prop_assert_eq!(num_tokens, expected_num_tokens);
        prop_assert_eq!(lexed.tokens.last().map(|token| token.kind), Some(TokenKind::Eof));
    }

    #[test]
    fn dedents_balance_indents(depths in nesting_strategy()) {
        let source: String = depths
            .iter()
            .map(|depth| format!("{}x\n", " ".repeat(depth * INDENT_WIDTH)))
            .collect();
        let lexed = scan(&source);
        prop_assert!(!lexed.had_error());

        let mut depth = 0i64;
        for token in lexed.tokens.iter() {
            match token.kind {
                TokenKind::Indent => depth += 1,
                TokenKind::Dedent => depth -= 1,
                _ => {}
            }
            prop_assert!(depth >= 0);
        }
        prop_assert_eq!(depth, 0);
    }

    #[test]
    fn misaligned_indent_is_reported(spaces in 1..40usize) {
        prop_assume!(spaces % INDENT_WIDTH != 0);
        let source = format!("a\n{}b\n", " ".repeat(spaces));
        let lexed = scan(&source);
        prop_assert_eq!(lexed.errors.len(), 1);
        prop_assert_eq!(lexed.errors[0].kind.clone(), LexicalErrorKind::MisalignedIndent);
        prop_assert!(lexed
            .tokens
            .iter()
            .all(|token| !matches!(token.kind, TokenKind::Indent | TokenKind::Dedent)));
    }

    #[test]
    fn lexemes_relex_to_same_kind(input in non_literal_sequence_strategy()) {
        let lexed = scan(&input);
        prop_assert!(!lexed.had_error());
        for token in lexed.tokens.iter().filter(|token| !is_layout(token.kind)) {
            let relexed = scan(&token.lexeme);
            prop_assert_eq!(relexed.tokens[0].kind, token.kind);
        }
    }
}
