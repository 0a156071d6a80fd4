use std::mem;

use crate::{
    ast_builder,
    error::UnsupportedDelegatingConstructor,
    java_ast::{Constructor, Procedure, Statement},
    transformations::TransformOptions,
};

/// Exception type caught by the generated handler
pub const CAUGHT_EXCEPTION: &str = "Exception";
/// Name bound to the caught exception
pub const CATCH_VARIABLE: &str = "e";

/// `try { <body> } catch (Exception e) { throw new <Unchecked>("<message>", e); }`
fn failure_handler(body: Vec<Statement>, options: &TransformOptions) -> Statement {
    let rethrow = ast_builder::throw(ast_builder::new_instance(
        &options.unchecked_exception,
        vec![
            ast_builder::string_literal(&options.message),
            ast_builder::name(CATCH_VARIABLE),
        ],
    ));
    ast_builder::try_catch(
        body,
        vec![ast_builder::catch_clause(
            CAUGHT_EXCEPTION,
            CATCH_VARIABLE,
            vec![rethrow],
        )],
    )
}

/// Replace the method body with a single handler protecting the original statements.
///
/// Methods without a body are left alone.
pub fn wrap_procedure(procedure: &mut Procedure, options: &TransformOptions) {
    if procedure.modifiers.is_native() {
        return;
    }
    if let Some(body) = &mut procedure.body {
        let original = mem::take(body);
        body.push(failure_handler(original, options));
    }
}

/// Wrap a constructor body the same way as a method body.
///
/// A leading `this(...)`/`super(...)` call must stay the first statement, so
/// a constructor consisting of only that call is left as is, and one that
/// runs further statements after it is rejected. Bodies without statements
/// are not wrapped.
pub fn wrap_constructor(
    constructor: &mut Constructor,
    options: &TransformOptions,
) -> Result<(), UnsupportedDelegatingConstructor> {
    let Some(first) = constructor.body.iter().position(|stmt| !stmt.is_comment()) else {
        return Ok(());
    };

    if matches!(constructor.body[first], Statement::DelegatingCall(_)) {
        let has_followers = constructor.body[first + 1..]
            .iter()
            .any(|stmt| !stmt.is_comment());
        if has_followers {
            return Err(UnsupportedDelegatingConstructor {
                constructor: constructor.name.clone(),
            });
        }
        return Ok(());
    }

    let original = mem::take(&mut constructor.body);
    constructor.body.push(failure_handler(original, options));
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        java_ast::{Expression, Member},
        parser::parse,
    };

    fn members(source: &str) -> Vec<Member> {
        parse(source)
            .expect("should parse")
            .types()
            .next()
            .map(|decl| decl.members.clone())
            .expect("one type")
    }

    fn constructor(source: &str) -> Constructor {
        members(source)
            .into_iter()
            .find_map(|member| match member {
                Member::Constructor(constructor) => Some(constructor),
                _ => None,
            })
            .expect("a constructor")
    }

    fn procedure(source: &str) -> Procedure {
        members(source)
            .into_iter()
            .find_map(|member| match member {
                Member::Procedure(procedure) => Some(procedure),
                _ => None,
            })
            .expect("a method")
    }

    #[test]
    fn test_wraps_whole_method_body() {
        let mut method =
            procedure("class A {\n    void m() throws Exception {\n        a();\n        b();\n    }\n}\n");
        let original = method.body.clone().expect("body");
        wrap_procedure(&mut method, &TransformOptions::default());

        let body = method.body.expect("body");
        assert_eq!(body.len(), 1);
        let Statement::Try(block) = &body[0] else {
            panic!("expected a try statement");
        };
        assert_eq!(block.body, original);
        assert_eq!(block.catches.len(), 1);
        assert_eq!(block.catches[0].types, vec![CAUGHT_EXCEPTION.to_owned()]);
        assert_eq!(block.catches[0].variable, CATCH_VARIABLE);
        assert_eq!(
            block.catches[0].body,
            vec![Statement::Throw(Expression::New {
                type_name: "RuntimeException".to_owned(),
                arguments: vec![
                    Expression::StringLiteral("wrapped checked exception".to_owned()),
                    Expression::Name("e".to_owned()),
                ],
            })]
        );
        assert!(block.finally.is_none());
    }

    #[test]
    fn test_uses_configured_exception_and_message() {
        let mut method = procedure("class A {\n    void m() throws Exception {\n        a();\n    }\n}\n");
        let options = TransformOptions {
            unchecked_exception: "java.io.UncheckedIOException".to_owned(),
            message: "it said \"no\"".to_owned(),
            ..TransformOptions::default()
        };
        wrap_procedure(&mut method, &options);
        let body = method.body.expect("body");
        let Statement::Try(block) = &body[0] else {
            panic!("expected a try statement");
        };
        assert_eq!(
            block.catches[0].body[0],
            Statement::Throw(Expression::New {
                type_name: "java.io.UncheckedIOException".to_owned(),
                arguments: vec![
                    Expression::StringLiteral("it said \\\"no\\\"".to_owned()),
                    Expression::Name("e".to_owned()),
                ],
            })
        );
    }

    #[test]
    fn test_bodiless_method_is_skipped() {
        let mut method = procedure("abstract class A {\n    abstract void m() throws Exception;\n}\n");
        wrap_procedure(&mut method, &TransformOptions::default());
        assert!(method.body.is_none());
    }

    #[test]
    fn test_constructor_body_is_wrapped() {
        let mut ctor =
            constructor("class A {\n    A() throws Exception {\n        init();\n    }\n}\n");
        wrap_constructor(&mut ctor, &TransformOptions::default()).expect("should wrap");
        assert_eq!(ctor.body.len(), 1);
        assert!(matches!(ctor.body[0], Statement::Try(_)));
    }

    #[test]
    fn test_lone_delegating_call_is_not_wrapped() {
        let mut ctor = constructor(
            "class A {\n    A() throws Exception {\n        // delegate\n        this(1);\n    }\n    A(int x) {}\n}\n",
        );
        let original = ctor.body.clone();
        wrap_constructor(&mut ctor, &TransformOptions::default()).expect("should succeed");
        assert_eq!(ctor.body, original);
    }

    #[test]
    fn test_delegating_call_with_followers_is_rejected() {
        let mut ctor = constructor(
            "class A extends B {\n    A() throws Exception {\n        super(1);\n        init();\n    }\n}\n",
        );
        let err = wrap_constructor(&mut ctor, &TransformOptions::default())
            .expect_err("should be rejected");
        assert_eq!(err.constructor, "A");
    }

    #[test]
    fn test_empty_constructor_is_not_wrapped() {
        let mut ctor = constructor("class A {\n    A() throws Exception {\n    }\n}\n");
        wrap_constructor(&mut ctor, &TransformOptions::default()).expect("should succeed");
        assert!(ctor.body.is_empty());
    }
}
