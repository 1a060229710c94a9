//! FILENAME: parser/src/tests.rs
//! PURPOSE: Consolidated unit tests for the parser crate.

use crate::ast::{Axis, BinaryOperator, Expression, UnaryOperator, Value};
use crate::lexer::Lexer;
use crate::parser::parse;
use crate::token::Token;

fn int(n: i64) -> Expression {
    Expression::Literal(Value::Integer(n))
}

fn boxed_int(n: i64) -> Option<Box<Expression>> {
    Some(Box::new(int(n)))
}

// ========================================
// LEXER TESTS
// ========================================

#[test]
fn lexer_tokenizes_table_symbols() {
    let mut lexer = Lexer::new("$d[$r, $c]");
    assert_eq!(lexer.next_token(), Token::Data);
    assert_eq!(lexer.next_token(), Token::LBracket);
    assert_eq!(lexer.next_token(), Token::CurrentRow);
    assert_eq!(lexer.next_token(), Token::Comma);
    assert_eq!(lexer.next_token(), Token::CurrentCol);
    assert_eq!(lexer.next_token(), Token::RBracket);
    assert_eq!(lexer.next_token(), Token::EOF);
}

#[test]
fn lexer_rejects_unknown_dollar_symbol() {
    let mut lexer = Lexer::new("$x");
    assert_eq!(lexer.next_token(), Token::Illegal('$'));
}

#[test]
fn lexer_distinguishes_integers_and_floats() {
    let mut lexer = Lexer::new("12 3.5 .25");
    assert_eq!(lexer.next_token(), Token::Integer(12));
    assert_eq!(lexer.next_token(), Token::Number(3.5));
    assert_eq!(lexer.next_token(), Token::Number(0.25));
    assert_eq!(lexer.next_token(), Token::EOF);
}

#[test]
fn lexer_reads_both_quote_styles() {
    let mut lexer = Lexer::new("'A' \"Price\" 'it''s'");
    assert_eq!(lexer.next_token(), Token::String("A".to_string()));
    assert_eq!(lexer.next_token(), Token::String("Price".to_string()));
    assert_eq!(lexer.next_token(), Token::String("it's".to_string()));
}

#[test]
fn lexer_tokenizes_functions() {
    let mut lexer = Lexer::new("sum($d[0:3, 0])");

    assert_eq!(lexer.next_token(), Token::Identifier("SUM".to_string()));
    assert_eq!(lexer.next_token(), Token::LParen);
    assert_eq!(lexer.next_token(), Token::Data);
    assert_eq!(lexer.next_token(), Token::LBracket);
    assert_eq!(lexer.next_token(), Token::Integer(0));
    assert_eq!(lexer.next_token(), Token::Colon);
    assert_eq!(lexer.next_token(), Token::Integer(3));
    assert_eq!(lexer.next_token(), Token::Comma);
    assert_eq!(lexer.next_token(), Token::Integer(0));
    assert_eq!(lexer.next_token(), Token::RBracket);
    assert_eq!(lexer.next_token(), Token::RParen);
    assert_eq!(lexer.next_token(), Token::EOF);
}

#[test]
fn lexer_tokenizes_comparison_operators() {
    let mut lexer = Lexer::new("< > <= >= <> =");

    assert_eq!(lexer.next_token(), Token::LessThan);
    assert_eq!(lexer.next_token(), Token::GreaterThan);
    assert_eq!(lexer.next_token(), Token::LessEqual);
    assert_eq!(lexer.next_token(), Token::GreaterEqual);
    assert_eq!(lexer.next_token(), Token::NotEqual);
    assert_eq!(lexer.next_token(), Token::Equals);
    assert_eq!(lexer.next_token(), Token::EOF);
}

// ========================================
// PARSER TESTS - LITERALS
// ========================================

#[test]
fn parser_parses_integer_literal() {
    assert_eq!(parse("42").unwrap(), int(42));
}

#[test]
fn parser_accepts_leading_equals() {
    assert_eq!(parse("=42").unwrap(), int(42));
}

#[test]
fn parser_parses_decimal_number() {
    assert_eq!(
        parse("3.14159").unwrap(),
        Expression::Literal(Value::Number(3.14159))
    );
}

#[test]
fn parser_parses_boolean() {
    assert_eq!(
        parse("TRUE").unwrap(),
        Expression::Literal(Value::Boolean(true))
    );
}

// ========================================
// PARSER TESTS - REFERENCES
// ========================================

#[test]
fn parser_parses_absolute_cell_reference() {
    let result = parse("$d[0,1]").unwrap();
    assert_eq!(result, Expression::cell(int(0), int(1)));
    assert!(result.is_cell_reference());
}

#[test]
fn parser_parses_relative_cell_reference() {
    let result = parse("$d[$r, $c]").unwrap();
    assert_eq!(
        result,
        Expression::cell(Expression::CurrentRow, Expression::CurrentColumn)
    );
}

#[test]
fn parser_parses_column_name_reference() {
    let result = parse("$d[2, 'A']").unwrap();
    assert_eq!(
        result,
        Expression::cell(int(2), Expression::Literal(Value::String("A".to_string())))
    );
}

#[test]
fn parser_parses_parenthesized_column_offset() {
    let result = parse("$d[$r,($c-2)]").unwrap();
    assert_eq!(
        result,
        Expression::cell(
            Expression::CurrentRow,
            Expression::BinaryOp {
                left: Box::new(Expression::CurrentColumn),
                op: BinaryOperator::Subtract,
                right: Box::new(int(2)),
            }
        )
    );
}

#[test]
fn parser_parses_closed_row_slice() {
    let result = parse("$d[0:3, $c]").unwrap();
    assert_eq!(
        result,
        Expression::Reference {
            row: Axis::Slice {
                start: boxed_int(0),
                stop: boxed_int(3),
            },
            col: Axis::Index(Box::new(Expression::CurrentColumn)),
        }
    );
    assert!(!result.is_cell_reference());
}

#[test]
fn parser_parses_open_slices() {
    let result = parse("$d[:-1, 1:]").unwrap();
    assert_eq!(
        result,
        Expression::Reference {
            row: Axis::Slice {
                start: None,
                stop: Some(Box::new(Expression::UnaryOp {
                    op: UnaryOperator::Negate,
                    operand: Box::new(int(1)),
                })),
            },
            col: Axis::Slice {
                start: boxed_int(1),
                stop: None,
            },
        }
    );
}

#[test]
fn parser_parses_full_slice() {
    let result = parse("$d[:, 0]").unwrap();
    assert_eq!(
        result,
        Expression::Reference {
            row: Axis::Slice {
                start: None,
                stop: None,
            },
            col: Axis::Index(Box::new(int(0))),
        }
    );
}

#[test]
fn parser_parses_slice_to_current_row() {
    let result = parse("$d[:$r, $c]").unwrap();
    assert_eq!(
        result,
        Expression::Reference {
            row: Axis::Slice {
                start: None,
                stop: Some(Box::new(Expression::CurrentRow)),
            },
            col: Axis::Index(Box::new(Expression::CurrentColumn)),
        }
    );
}

// ========================================
// PARSER TESTS - OPERATORS & FUNCTIONS
// ========================================

#[test]
fn parser_parses_sum_of_two_cells() {
    let result = parse("$d[0,0]+$d[0,1]").unwrap();
    assert_eq!(
        result,
        Expression::BinaryOp {
            left: Box::new(Expression::cell(int(0), int(0))),
            op: BinaryOperator::Add,
            right: Box::new(Expression::cell(int(0), int(1))),
        }
    );
}

#[test]
fn parser_respects_precedence() {
    // 1 + 2 * 3 => 1 + (2 * 3)
    let result = parse("1 + 2 * 3").unwrap();
    assert_eq!(
        result,
        Expression::BinaryOp {
            left: Box::new(int(1)),
            op: BinaryOperator::Add,
            right: Box::new(Expression::BinaryOp {
                left: Box::new(int(2)),
                op: BinaryOperator::Multiply,
                right: Box::new(int(3)),
            }),
        }
    );
}

#[test]
fn parser_power_is_right_associative() {
    let result = parse("2^3^2").unwrap();
    assert_eq!(
        result,
        Expression::binary(
            int(2),
            BinaryOperator::Power,
            Expression::binary(int(3), BinaryOperator::Power, int(2))
        )
    );
}

#[test]
fn parser_subtraction_is_left_associative() {
    let result = parse("8 - 3 - 1").unwrap();
    assert_eq!(
        result,
        Expression::binary(
            Expression::binary(int(8), BinaryOperator::Subtract, int(3)),
            BinaryOperator::Subtract,
            int(1)
        )
    );
}

#[test]
fn parser_negation_binds_looser_than_power() {
    assert_eq!(
        parse("-2^2").unwrap(),
        Expression::negate(Expression::binary(int(2), BinaryOperator::Power, int(2)))
    );
    assert_eq!(
        parse("-2*3").unwrap(),
        Expression::binary(Expression::negate(int(2)), BinaryOperator::Multiply, int(3))
    );
}

#[test]
fn parser_comparison_is_loosest() {
    assert_eq!(
        parse("1 + 1 >= 2").unwrap(),
        Expression::binary(
            Expression::binary(int(1), BinaryOperator::Add, int(1)),
            BinaryOperator::GreaterEqual,
            int(2)
        )
    );
}

#[test]
fn parser_parses_function_call_with_range() {
    let result = parse("sum($d[$r,0:2])").unwrap();
    assert_eq!(
        result,
        Expression::FunctionCall {
            name: "SUM".to_string(),
            args: vec![Expression::Reference {
                row: Axis::Index(Box::new(Expression::CurrentRow)),
                col: Axis::Slice {
                    start: boxed_int(0),
                    stop: boxed_int(2),
                },
            }],
        }
    );
}

#[test]
fn parser_parses_multiple_arguments() {
    let result = parse("IF($d[0,0] > 1, 1, 0)").unwrap();
    match result {
        Expression::FunctionCall { name, args } => {
            assert_eq!(name, "IF");
            assert_eq!(args.len(), 3);
        }
        other => panic!("Expected function call, got {:?}", other),
    }
}

#[test]
fn parser_parses_empty_argument_list() {
    let result = parse("COUNT()").unwrap();
    assert_eq!(
        result,
        Expression::FunctionCall {
            name: "COUNT".to_string(),
            args: vec![],
        }
    );
}

// ========================================
// PARSER TESTS - ERRORS
// ========================================

#[test]
fn parser_rejects_empty_input() {
    assert!(parse("").is_err());
    assert!(parse("=").is_err());
}

#[test]
fn parser_rejects_unclosed_reference() {
    assert!(parse("$d[0, 1").is_err());
}

#[test]
fn parser_rejects_single_axis_reference() {
    assert!(parse("$d[0]").is_err());
}

#[test]
fn parser_rejects_bare_identifier() {
    let err = parse("A1").unwrap_err();
    assert!(err.message.contains("A1"));
}

#[test]
fn parser_rejects_trailing_tokens() {
    assert!(parse("1 2").is_err());
}

#[test]
fn parser_rejects_illegal_character() {
    let err = parse("1 # 2").unwrap_err();
    assert!(err.to_string().starts_with("Parse error"));
}

#[test]
fn parser_reports_error_offset() {
    let err = parse("1 + # 2").unwrap_err();
    assert_eq!(err.offset, 4);

    let err = parse("sum(1, 2").unwrap_err();
    assert_eq!(err.offset, 8);
    assert!(err.message.contains("end of input"));
}

#[test]
fn lexer_tokenize_records_offsets() {
    let offsets: Vec<usize> = Lexer::new("=$d[0, 'x']")
        .tokenize()
        .iter()
        .map(|spanned| spanned.offset)
        .collect();
    assert_eq!(offsets, vec![0, 1, 3, 4, 5, 7, 10, 11]);
}
