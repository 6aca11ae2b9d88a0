use yarrow::{
    YarrowError,
    diagnostics::{Diagnostic, DiagnosticKind},
    lexer::{Keyword, Lexer, Token, TokenKind},
    runtime::Evaluator,
    shunting::{self, ShuntingYard},
    value::Value,
};

fn lex(source: &str) -> Vec<Token> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token();
        if token.kind == TokenKind::Eof {
            break;
        }
        tokens.push(token);
    }
    tokens
}

fn postfix_text(source: &str) -> Vec<String> {
    shunting::reorder(source)
        .expect("conversion should succeed")
        .iter()
        .map(|token| token.text(source).to_string())
        .collect()
}

fn eval(source: &str) -> Vec<f64> {
    let mut evaluator = Evaluator::with_output(Vec::new());
    evaluator
        .eval_source(source)
        .expect("evaluation should succeed")
}

fn eval_with_output(source: &str) -> (Vec<f64>, String) {
    let mut evaluator = Evaluator::with_output(Vec::new());
    let stack = evaluator
        .eval_source(source)
        .expect("evaluation should succeed");
    let output = String::from_utf8(evaluator.into_output()).expect("output is UTF-8");
    (stack, output)
}

fn eval_error(source: &str) -> Diagnostic {
    let mut evaluator = Evaluator::with_output(Vec::new());
    match evaluator.eval_source(source) {
        Ok(stack) => panic!("expected error, received stack {stack:?}"),
        Err(YarrowError::Diagnostic(diag)) => diag,
        Err(other) => panic!("expected diagnostic, received {other}"),
    }
}

#[test]
fn lexes_digit_run_as_one_number() {
    let tokens = lex("12345");
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, TokenKind::Number);
    assert_eq!(tokens[0].span.start, 0);
    assert_eq!(tokens[0].span.end, 5);
    assert_eq!(tokens[0].text("12345"), "12345");
}

#[test]
fn digits_glued_to_letters_are_one_identifier() {
    let tokens = lex("8_something");
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, TokenKind::Identifier);
    assert_eq!(tokens[0].text("8_something"), "8_something");
}

#[test]
fn apostrophe_and_ampersand_continue_identifiers() {
    let tokens = lex("it's&co");
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, TokenKind::Identifier);
}

#[test]
fn multibyte_identifier_round_trips_exactly() {
    let source = "José";
    let tokens = lex(source);
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, TokenKind::Identifier);
    assert_eq!(tokens[0].text(source), "José");
}

#[test]
fn byte_order_mark_is_outside_every_span() {
    let source = "\u{feff}42";
    let tokens = lex(source);
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, TokenKind::Number);
    assert_eq!(tokens[0].span.start, 3);
    assert_eq!(tokens[0].text(source), "42");
}

#[test]
fn keywords_and_boolean_literals_are_classified() {
    let tokens = lex("let total yes no");
    let kinds: Vec<_> = tokens.iter().map(|t| t.kind.clone()).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Keyword(Keyword::Let),
            TokenKind::Identifier,
            TokenKind::Bool,
            TokenKind::Bool,
        ]
    );
}

#[test]
fn comments_are_skipped_between_tokens() {
    let tokens = lex("1 # the answer\n2");
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[0].kind, TokenKind::Number);
    assert_eq!(tokens[1].kind, TokenKind::Number);
}

#[test]
fn two_character_operators_need_exact_lookahead() {
    let source = "== >= <= != ?= ! ?";
    let kinds: Vec<_> = lex(source).iter().map(|t| t.kind.clone()).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::EqualEqual,
            TokenKind::GreaterEqual,
            TokenKind::LessEqual,
            TokenKind::BangEqual,
            TokenKind::QuestionEqual,
            TokenKind::Unknown,
            TokenKind::Unknown,
        ]
    );
}

#[test]
fn unterminated_string_is_a_token_not_a_failure() {
    let tokens = lex("\"half open");
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, TokenKind::Unknown);
}

#[test]
fn lexer_is_idempotent_at_end_of_input() {
    let mut lexer = Lexer::new("7");
    assert_eq!(lexer.next_token().kind, TokenKind::Number);
    let first = lexer.next_token();
    let second = lexer.next_token();
    assert_eq!(first.kind, TokenKind::Eof);
    assert_eq!(second.kind, TokenKind::Eof);
    assert_eq!(first.span, second.span);
}

#[test]
fn malformed_utf8_fails_before_any_token() {
    let err = Lexer::from_bytes(&[0x32, 0xff, 0xfe]).err().expect("should fail");
    assert_eq!(err.kind, DiagnosticKind::Lexer);
}

#[test]
fn operands_precede_their_operator() {
    assert_eq!(postfix_text("2 + 2"), vec!["2", "2", "+"]);
}

#[test]
fn precedence_orders_the_classic_example() {
    assert_eq!(
        postfix_text("3 + 4 * 2 / (1 - 5) ^ 2"),
        vec!["3", "4", "2", "*", "1", "5", "-", "2", "^", "/", "+"]
    );
}

#[test]
fn exponentiation_is_right_associative() {
    assert_eq!(postfix_text("2 ^ 3 ^ 2"), vec!["2", "3", "2", "^", "^"]);
}

#[test]
fn statement_separator_drains_pending_operators() {
    assert_eq!(postfix_text("1 + 2; 3"), vec!["1", "2", "+", ";", "3"]);
}

#[test]
fn unmatched_closing_paren_is_a_converter_error() {
    let err = shunting::reorder("2 + 2)").err().expect("should fail");
    assert_eq!(err.kind, DiagnosticKind::Converter);
    assert!(err.message.contains("unmatched closing parenthesis"));
}

#[test]
fn converter_is_terminal_after_the_paren_failure() {
    let mut converter = ShuntingYard::new(Lexer::new(")"));
    assert!(converter.next_token().is_err());
    assert!(matches!(converter.next_token(), Ok(None)));
}

#[test]
fn evaluates_basic_arithmetic() {
    assert_eq!(eval("2 + 2"), vec![4.0]);
    assert_eq!(eval("16 / 8"), vec![2.0]);
    assert_eq!(eval("8 / 16"), vec![0.5]);
}

#[test]
fn evaluates_the_classic_precedence_example() {
    assert_eq!(eval("3 + 4 * 2 / (1 - 5) ^ 2"), vec![3.5]);
}

#[test]
fn duplicate_doubles_the_top_of_stack() {
    assert_eq!(eval("2 d +"), vec![4.0]);
    assert_eq!(eval("3 dup *"), vec![9.0]);
}

#[test]
fn statements_share_one_value_stack() {
    assert_eq!(eval("2 ^ 10; 1 + 1"), vec![1024.0, 2.0]);
}

#[test]
fn print_pops_and_writes_one_value_per_line() {
    let (stack, output) = eval_with_output("2 2 + ; 4 p");
    assert_eq!(stack, vec![4.0]);
    assert_eq!(output, "4\n");
}

#[test]
fn division_by_zero_is_a_typed_error() {
    let err = eval_error("2 / (2 - 2)");
    assert_eq!(err.kind, DiagnosticKind::Runtime);
    assert!(err.message.contains("division by zero"));
}

#[test]
fn unknown_word_is_rejected_with_its_span() {
    let err = eval_error("2 + flower");
    assert_eq!(err.kind, DiagnosticKind::Runtime);
    assert!(err.message.contains("unknown word"));
    assert!(err.span.is_some());
}

#[test]
fn string_literals_have_no_place_on_the_value_stack() {
    let err = eval_error("\"hello\" p");
    assert_eq!(err.kind, DiagnosticKind::Runtime);
}

#[test]
fn invalid_token_surfaces_as_a_lexer_diagnostic() {
    let err = eval_error("2 ~ 2");
    assert_eq!(err.kind, DiagnosticKind::Lexer);
}

#[test]
fn untrusted_postfix_underflow_is_a_typed_error() {
    let mut evaluator = Evaluator::with_output(Vec::new());
    match evaluator.evaluate(&[Value::Add]) {
        Err(YarrowError::Diagnostic(diag)) => {
            assert_eq!(diag.kind, DiagnosticKind::Runtime);
            assert!(diag.message.contains("stack underflow"));
        }
        other => panic!("expected stack underflow, received {other:?}"),
    }
}
