//! AST builder module for creating synthetic Java nodes
//!
//! This module provides factory functions for nodes that don't originate
//! from source files, chiefly the try/catch wrapper placed around rewritten
//! method bodies.

use crate::java_ast::{CatchClause, Expression, FailureHandlingBlock, Statement};

/// Create a name expression: `name`
pub fn name(name: &str) -> Expression {
    Expression::Name(name.to_owned())
}

/// Create a string literal expression, escaping `value` for Java source
pub fn string_literal(value: &str) -> Expression {
    Expression::StringLiteral(escape_java_string(value))
}

/// Create an object creation expression: `new type_name(arg1, arg2, ...)`
pub fn new_instance(type_name: &str, arguments: Vec<Expression>) -> Expression {
    Expression::New {
        type_name: type_name.to_owned(),
        arguments,
    }
}

/// Create a throw statement: `throw expr;`
pub fn throw(expr: Expression) -> Statement {
    Statement::Throw(expr)
}

/// Create a catch clause: `catch (Type variable) { body }`
pub fn catch_clause(exception_type: &str, variable: &str, body: Vec<Statement>) -> CatchClause {
    CatchClause {
        types: vec![exception_type.to_owned()],
        variable: variable.to_owned(),
        body,
    }
}

/// Create a try statement without a finally block
pub fn try_catch(body: Vec<Statement>, catches: Vec<CatchClause>) -> Statement {
    Statement::Try(FailureHandlingBlock {
        body,
        catches,
        finally: None,
    })
}

/// Escape a string so it can be placed between double quotes
pub fn escape_java_string(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            '\u{8}' => escaped.push_str("\\b"),
            '\u{c}' => escaped.push_str("\\f"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_literal_escaping() {
        assert_eq!(
            string_literal(r#"say "hi"\now"#),
            Expression::StringLiteral(r#"say \"hi\"\\now"#.to_owned())
        );
        assert_eq!(
            string_literal("two\nlines"),
            Expression::StringLiteral("two\\nlines".to_owned())
        );
    }

    #[test]
    fn test_new_instance() {
        let expr = new_instance("RuntimeException", vec![string_literal("m"), name("e")]);
        match expr {
            Expression::New {
                type_name,
                arguments,
            } => {
                assert_eq!(type_name, "RuntimeException");
                assert_eq!(arguments.len(), 2);
                assert_eq!(arguments[1], Expression::Name("e".to_owned()));
            }
            _ => panic!("Expected New expression"),
        }
    }

    #[test]
    fn test_try_catch() {
        let stmt = try_catch(
            vec![Statement::Verbatim("run();".to_owned())],
            vec![catch_clause("Exception", "e", vec![throw(name("e"))])],
        );
        match stmt {
            Statement::Try(block) => {
                assert_eq!(block.body.len(), 1);
                assert_eq!(block.catches[0].types, vec!["Exception".to_owned()]);
                assert_eq!(block.catches[0].variable, "e");
                assert!(block.finally.is_none());
            }
            _ => panic!("Expected Try statement"),
        }
    }
}
