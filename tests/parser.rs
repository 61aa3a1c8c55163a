#[cfg(test)]
mod parser_tests {
    use grai::error::GraiError;
    use grai::expr::{Expr, LiteralValue};
    use grai::parser::Parser;
    use grai::scanner::Scanner;
    use grai::stmt::Stmt;
    use grai::token::{Token, TokenType};

    fn scan(source: &str) -> Vec<Token<'_>> {
        Scanner::new(source.as_bytes())
            .collect::<Result<Vec<_>, _>>()
            .expect("source should scan cleanly")
    }

    fn parse_ok(source: &str) -> Vec<Stmt<'_>> {
        let tokens = scan(source);
        let (statements, errors) = Parser::new(&tokens).parse();

        assert!(errors.is_empty(), "unexpected parse errors: {:?}", errors);

        statements
    }

    #[test]
    fn test_multiplication_binds_tighter_than_addition() {
        let tokens = scan("1 + 2 * 3;");
        let (statements, errors) = Parser::new(&tokens).parse();

        assert!(errors.is_empty());
        assert_eq!(statements.len(), 1);

        let Stmt::Expression(Expr::Binary {
            left,
            operator,
            right,
        }) = &statements[0]
        else {
            panic!("expected binary expression statement");
        };

        assert_eq!(operator.token_type, TokenType::PLUS);
        assert!(matches!(
            **left,
            Expr::Literal(LiteralValue::Number(n)) if n == 1.0
        ));
        assert!(matches!(
            **right,
            Expr::Binary { ref operator, .. } if operator.token_type == TokenType::STAR
        ));
    }

    #[test]
    fn test_grouping_overrides_precedence() {
        let statements = parse_ok("(1 + 2) * 3;");

        let Stmt::Expression(Expr::Binary { left, operator, .. }) = &statements[0] else {
            panic!("expected binary expression statement");
        };

        assert_eq!(operator.token_type, TokenType::STAR);
        assert!(matches!(**left, Expr::Grouping(_)));
    }

    #[test]
    fn test_modulo_parses_as_factor() {
        let statements = parse_ok("1 + 7 % 4;");

        let Stmt::Expression(Expr::Binary { right, .. }) = &statements[0] else {
            panic!("expected binary expression statement");
        };

        assert!(matches!(
            **right,
            Expr::Binary { ref operator, .. } if operator.token_type == TokenType::PERCENT
        ));
    }

    #[test]
    fn test_for_desugars_into_while() {
        let statements = parse_ok("pentru (var i = 0; i < 3; i = i + 1) afiseaza i;");

        assert_eq!(statements.len(), 1);

        // Block[var, While(cond, Block[print, increment])]
        let Stmt::Block(outer) = &statements[0] else {
            panic!("expected the initializer wrapper block");
        };

        assert_eq!(outer.len(), 2);
        assert!(matches!(outer[0], Stmt::Var { .. }));

        let Stmt::While { condition, body } = &outer[1] else {
            panic!("expected the desugared while loop");
        };

        assert!(matches!(
            *condition,
            Expr::Binary { ref operator, .. } if operator.token_type == TokenType::LESS
        ));

        let Stmt::Block(inner) = &**body else {
            panic!("expected the increment wrapper block");
        };

        assert_eq!(inner.len(), 2);
        assert!(matches!(inner[0], Stmt::Print(_)));
        assert!(matches!(inner[1], Stmt::Expression(Expr::Assign { .. })));
    }

    #[test]
    fn test_for_without_clauses() {
        // `pentru (;;)` becomes a bare while over a true literal.
        let statements = parse_ok("pentru (;;) returneaza;");

        let Stmt::While { condition, .. } = &statements[0] else {
            panic!("expected a while statement");
        };

        assert!(matches!(condition, Expr::Literal(LiteralValue::True)));
    }

    #[test]
    fn test_class_declaration_with_superclass() {
        let statements = parse_ok("clasa Caine mosteneste Animal { latra() { afiseaza 1; } }");

        let Stmt::Class(decl) = &statements[0] else {
            panic!("expected a class declaration");
        };

        assert_eq!(decl.name.lexeme, "Caine");
        assert!(matches!(
            decl.superclass,
            Some(Expr::Variable { ref name, .. }) if name.lexeme == "Animal"
        ));
        assert_eq!(decl.methods.len(), 1);
        assert_eq!(decl.methods[0].name.lexeme, "latra");
    }

    #[test]
    fn test_property_chain_and_super() {
        let statements = parse_ok("a.b.c = super.metoda();");

        let Stmt::Expression(Expr::Set { object, name, .. }) = &statements[0] else {
            panic!("expected a property set");
        };

        assert_eq!(name.lexeme, "c");
        assert!(matches!(**object, Expr::Get { .. }));
    }

    #[test]
    fn test_panic_mode_collects_multiple_errors() {
        let source = "var = 1;\nafiseaza;\nvar ok = 2;";
        let tokens = scan(source);
        let (statements, errors) = Parser::new(&tokens).parse();

        // Two independent diagnostics, and the healthy declaration after the
        // second recovery point still parses.
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|e| matches!(e, GraiError::Parse { .. })));

        assert_eq!(statements.len(), 1);
        assert!(matches!(
            statements[0],
            Stmt::Var { ref name, .. } if name.lexeme == "ok"
        ));
    }

    #[test]
    fn test_invalid_assignment_target_is_not_fatal() {
        let tokens = scan("1 = 2;\nvar ok = 3;");
        let (statements, errors) = Parser::new(&tokens).parse();

        assert_eq!(errors.len(), 1);
        match &errors[0] {
            GraiError::Parse { message, line } => {
                assert_eq!(*line, 1);
                assert!(message.contains("Invalid assignment target"));
            }
            other => panic!("expected parse error, got {:?}", other),
        }

        // Parsing continued past the bad target without resynchronising.
        assert_eq!(statements.len(), 2);
    }

    #[test]
    fn test_argument_cap_is_reported_not_fatal() {
        let args = (0..=255).map(|i| i.to_string()).collect::<Vec<_>>();
        let source = format!("f({});", args.join(", "));

        let tokens = scan(&source);
        let (statements, errors) = Parser::new(&tokens).parse();

        assert_eq!(errors.len(), 1);
        assert!(errors[0]
            .to_string()
            .contains("Cannot have more than 255 arguments"));

        // The call expression itself still parsed.
        assert_eq!(statements.len(), 1);
        assert!(matches!(
            statements[0],
            Stmt::Expression(Expr::Call { ref arguments, .. }) if arguments.len() == 256
        ));
    }

    #[test]
    fn test_parsing_is_idempotent() {
        let source = "fun f(a) { returneaza a + 1; } var x = f(1);";

        let tokens = scan(source);
        let (first, first_errors) = Parser::new(&tokens).parse();
        let (second, second_errors) = Parser::new(&tokens).parse();

        assert!(first_errors.is_empty() && second_errors.is_empty());
        assert_eq!(format!("{:?}", first), format!("{:?}", second));
    }
}
