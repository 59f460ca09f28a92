use exprcalc::{
    evaluate_expression, format_number, Arity, DuplicatePolicy, Engine, EngineConfig, Error,
    Operator, Token,
};
use std::sync::Arc;
use std::thread;

macro_rules! fuzzy_eq {
    ($lhs:expr, $rhs:expr) => {
        assert!(
            ($lhs - $rhs).abs() < 1.0e-10,
            "{} is not close to {}",
            $lhs,
            $rhs
        )
    };
}

fn engine_with_max() -> Engine {
    let mut engine = Engine::new();
    engine
        .add_function("max", Arity::Variadic, |args| {
            args.iter().copied().fold(f64::NEG_INFINITY, f64::max)
        })
        .unwrap();
    engine
}

#[test]
fn test_left_to_right_evaluation() {
    assert_eq!(evaluate_expression("1+2-3").unwrap(), 0.0);
    assert_eq!(evaluate_expression("7-2-1").unwrap(), 4.0);
    assert_eq!(evaluate_expression("100/10/5").unwrap(), 2.0);
    assert_eq!(evaluate_expression("2*3/4").unwrap(), 1.5);
}

#[test]
fn test_standard_precedence() {
    fuzzy_eq!(
        evaluate_expression("3 + 4 * 2 / ( 1 - 5 ) ^ 2 ^ 3").unwrap(),
        3.0001220703125
    );
    assert_eq!(evaluate_expression("2^2^3").unwrap(), 256.0);
    assert_eq!(evaluate_expression("(2^2)^3").unwrap(), 64.0);
    assert_eq!(evaluate_expression("2+3*4").unwrap(), 14.0);
    assert_eq!(evaluate_expression("(2+3)*4").unwrap(), 20.0);
    assert_eq!(evaluate_expression("5 + ((1 + 2) * 4) - 3").unwrap(), 14.0);
}

#[test]
fn test_modulo() {
    assert_eq!(evaluate_expression("7%3").unwrap(), 1.0);
    assert_eq!(evaluate_expression("-7%3").unwrap(), -1.0);
    assert_eq!(evaluate_expression("7 mod 3").unwrap(), 1.0);
    // '%' binds looser than '*'
    assert_eq!(evaluate_expression("5%3*2").unwrap(), 5.0);
    assert_eq!(evaluate_expression("1+5%3").unwrap(), 3.0);
    assert_eq!(evaluate_expression("5%0"), Err(Error::DivisionByZero));
}

#[test]
fn test_unary_minus_contexts() {
    assert_eq!(
        evaluate_expression("1^-2").unwrap(),
        evaluate_expression("1^(-2)").unwrap()
    );
    assert_eq!(evaluate_expression("2^-2").unwrap(), 0.25);
    assert_eq!(evaluate_expression("-5*(-5+1)").unwrap(), 20.0);
    assert_eq!(evaluate_expression("-(-5)").unwrap(), 5.0);
    assert_eq!(evaluate_expression("-(2)^2").unwrap(), -4.0);
    assert_eq!(evaluate_expression("-sqrt(4)+1").unwrap(), -1.0);
    assert_eq!(evaluate_expression("log(2,-8+16)").unwrap().round(), 3.0);
}

#[test]
fn test_negated_power_operand() {
    assert_eq!(
        evaluate_expression("2^-(1+1)").unwrap(),
        evaluate_expression("2^(-(1+1))").unwrap()
    );
    assert_eq!(evaluate_expression("2^-(1+1)").unwrap(), 0.25);
    assert_eq!(evaluate_expression("2^-sqrt(4)").unwrap(), 0.25);
    assert_eq!(evaluate_expression("2^-(2)").unwrap(), 0.25);
    assert_eq!(evaluate_expression("2^-(1)*8").unwrap(), 4.0);
    assert_eq!(evaluate_expression("2^-(2^-(-1))").unwrap(), 0.25);
    assert_eq!(evaluate_expression("log(2, 2^-(3))").unwrap().round(), -3.0);
    assert!(matches!(
        evaluate_expression("2^-(1"),
        Err(Error::MisplacedParenthesis(_))
    ));
}

#[test]
fn test_implicit_multiplication() {
    assert_eq!(evaluate_expression("5sqrt(4)").unwrap(), 10.0);
    assert_eq!(evaluate_expression("5(6)").unwrap(), 30.0);
    assert_eq!(evaluate_expression("(5)(6)").unwrap(), 30.0);
    assert_eq!(evaluate_expression("2(3)(4)").unwrap(), 24.0);
    assert_eq!(evaluate_expression("2(1+1)^3").unwrap(), 16.0);
}

#[test]
fn test_builtin_functions() {
    assert_eq!(evaluate_expression("sqrt(16)").unwrap(), 4.0);
    assert_eq!(evaluate_expression("SQRT(16)").unwrap(), 4.0);
    fuzzy_eq!(evaluate_expression("log(3, 9)").unwrap(), 2.0);
    fuzzy_eq!(evaluate_expression("log(10, 1000) * 2").unwrap(), 6.0);
    fuzzy_eq!(evaluate_expression("sqrt(log(2, 256) * 2)").unwrap(), 4.0);
}

#[test]
fn test_variadic_function() {
    let engine = engine_with_max();
    assert_eq!(engine.evaluate("1 + max(2, 4, 3) + 10").unwrap(), 15.0);
    assert_eq!(engine.evaluate("max(7)").unwrap(), 7.0);
    assert_eq!(engine.evaluate("max(1, max(2, 9), 3)").unwrap(), 9.0);
    assert_eq!(engine.evaluate("2max(1, 2)").unwrap(), 4.0);
    assert_eq!(engine.evaluate("max(1+1, 2*3, 10/5)").unwrap(), 6.0);
    assert_eq!(
        engine.to_postfix("1 + max(2, 4, 3) + 10").unwrap().to_string(),
        "1 2 4 3 #3 max + 10 +"
    );
    assert!(matches!(
        engine.evaluate("max()"),
        Err(Error::ArityMismatch { .. })
    ));
}

#[test]
fn test_zero_arity_function() {
    let mut engine = Engine::new();
    engine
        .add_function("pi", Arity::Fixed(0), |_| std::f64::consts::PI)
        .unwrap();
    fuzzy_eq!(engine.evaluate("2pi()").unwrap(), 2.0 * std::f64::consts::PI);
    assert!(matches!(
        engine.evaluate("pi(1)"),
        Err(Error::ArityMismatch { .. })
    ));
}

#[test]
fn test_formatted_results() {
    let cases = [
        ("250*14.3", "3575"),
        ("3^6 / 117", "6.23077"),
        ("(2.16 - 48.34)^-1", "-0.02165"),
        ("(59 - 15 + 3*6)/21", "2.95238"),
        ("-(-5)", "5"),
    ];
    for (expression, expected) in cases {
        let result = evaluate_expression(expression).unwrap();
        assert_eq!(format_number(result, 5), expected, "{}", expression);
    }
}

#[test]
fn test_errors() {
    assert_eq!(evaluate_expression("1/0"), Err(Error::DivisionByZero));
    assert_eq!(evaluate_expression("1/(2-2)"), Err(Error::DivisionByZero));
    assert!(matches!(
        evaluate_expression(")5("),
        Err(Error::MisplacedParenthesis(_))
    ));
    assert!(matches!(
        evaluate_expression(",5"),
        Err(Error::MisplacedParenthesis(_))
    ));
    assert!(matches!(
        evaluate_expression("(1+2"),
        Err(Error::MisplacedParenthesis(_))
    ));
    assert!(matches!(
        evaluate_expression(""),
        Err(Error::InvalidExpression(_))
    ));
    assert!(matches!(
        evaluate_expression("1++2"),
        Err(Error::InvalidExpression(_))
    ));
    assert!(matches!(
        evaluate_expression("(2)3"),
        Err(Error::InvalidExpression(_))
    ));
    assert!(matches!(
        evaluate_expression("1.2.3 + 5"),
        Err(Error::InvalidNumberFormat { .. })
    ));
    assert_eq!(
        evaluate_expression("1 & 2"),
        Err(Error::InvalidToken {
            token: '&',
            position: 1,
        })
    );
    assert!(matches!(
        evaluate_expression("1+"),
        Err(Error::ArityMismatch { .. })
    ));
    assert!(matches!(
        evaluate_expression("log(8)"),
        Err(Error::ArityMismatch { .. })
    ));
}

#[test]
fn test_registry_errors() {
    let mut engine = Engine::new();
    assert!(matches!(
        engine.add_function("123", Arity::Fixed(1), |args| args[0]),
        Err(Error::InvalidFunctionName(_))
    ));
    assert!(matches!(
        engine.add_function("mod", Arity::Fixed(2), |args| args[0]),
        Err(Error::OperatorCollision(_))
    ));
    assert_eq!(
        engine.add_function("sqrt", Arity::Fixed(1), |args| args[0]),
        Err(Error::DuplicateFunction("sqrt".to_string()))
    );
    assert_eq!(
        engine.remove_function("cube"),
        Err(Error::UnknownFunction("cube".to_string()))
    );
}

#[test]
fn test_remove_then_add() {
    let mut engine = Engine::new();
    engine.remove_function("sqrt").unwrap();
    assert!(!engine.has_function("sqrt"));
    assert!(engine.evaluate("sqrt(4)").is_err());

    engine
        .add_function("sqrt", Arity::Fixed(1), |args| args[0].cbrt())
        .unwrap();
    assert_eq!(engine.evaluate("sqrt(27)").unwrap(), 3.0);

    engine
        .replace_function("sqrt", Arity::Fixed(1), f64_sqrt)
        .unwrap();
    assert_eq!(engine.evaluate("sqrt(49)").unwrap(), 7.0);
}

fn f64_sqrt(args: &[f64]) -> f64 {
    args[0].sqrt()
}

#[test]
fn test_overwrite_with_notice() {
    let mut engine = Engine::with_config(EngineConfig {
        duplicate_policy: DuplicatePolicy::Overwrite,
        ..Default::default()
    });
    engine
        .add_function("twice", Arity::Fixed(1), |args| args[0] * 2.0)
        .unwrap();
    engine
        .add_function("twice", Arity::Fixed(1), |args| args[0] * 3.0)
        .unwrap();
    assert_eq!(engine.evaluate("twice(2)").unwrap(), 6.0);
}

#[test]
fn test_tokens_keep_source_order() {
    let engine = Engine::new();
    let tokens = engine.tokenize("2 * (3 - 1) ^ 2").unwrap();
    let without_parens: Vec<String> = tokens
        .iter()
        .filter_map(|token| match token {
            Token::Number(n) => Some(n.to_string()),
            Token::Operator(op) => Some(op.to_string()),
            _ => None,
        })
        .collect();
    assert_eq!(without_parens, vec!["2", "*", "3", "-", "1", "^", "2"]);

    let implicit = engine.tokenize("2(3)").unwrap();
    assert_eq!(implicit[1], Token::Operator(Operator::Multiply));
}

#[test]
fn test_concurrent_evaluation() {
    let engine = Arc::new(engine_with_max());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                let expression = format!("max({}, 2) * 10 + {}", i, i);
                engine.evaluate(&expression).unwrap()
            })
        })
        .collect();

    let results: Vec<f64> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(results, vec![20.0, 21.0, 22.0, 33.0]);
}

#[test]
fn test_batch_evaluation() {
    let engine = engine_with_max();
    let expressions: Vec<String> = (1..=50).map(|i| format!("{}^2 - max({}, 1)", i, i)).collect();
    let refs: Vec<&str> = expressions.iter().map(String::as_str).collect();
    let results = engine.evaluate_batch(&refs);
    for (i, result) in results.into_iter().enumerate() {
        let n = (i + 1) as f64;
        assert_eq!(result.unwrap(), n * n - n);
    }
}
