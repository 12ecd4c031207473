// tests/lisp_tests.rs

use std::fs;

use parsnip::lisp::{self, Expr};
use parsnip::{FailureKind, Number, SourceContext};

#[test]
fn test_parse_simple_s_expression() {
    let items = lisp::parse("(+ 1 2)").unwrap();
    assert_eq!(items.len(), 1);

    if let Expr::List(inner, _) = &items[0] {
        assert_eq!(inner.len(), 3);
        assert!(matches!(&inner[0], Expr::Symbol(s, _) if s == "+"));
        assert!(matches!(inner[1], Expr::Number(Number::Integer(1), _)));
        assert!(matches!(inner[2], Expr::Number(Number::Integer(2), _)));
    } else {
        panic!("Expected a list, got {:?}", items[0]);
    }
}

#[test]
fn test_parse_string_literal() {
    let items = lisp::parse(r#"(set! (list "name") "a\tb")"#).unwrap();
    assert_eq!(items[0].pretty(), r#"(set! (list "name") "a\tb")"#);
}

#[test]
fn test_parse_with_comments() {
    let source = "; this is a comment\n (+ 1 2) ; another comment";
    let items = lisp::parse(source).unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].pretty(), "(+ 1 2)");
}

#[test]
fn test_parse_empty_input() {
    assert!(lisp::parse("").unwrap().is_empty());
    assert!(lisp::parse("  ; only a comment").unwrap().is_empty());
}

#[test]
fn test_parse_demo_file() {
    let source = fs::read_to_string("demos/sample.lisp").unwrap();
    let items = lisp::parse(&source).unwrap();
    let rendered: Vec<String> = items.iter().map(Expr::pretty).collect();
    assert_eq!(
        rendered,
        [
            "(define (square x) (* x x))",
            "(define greeting \"hello, world\\n\")",
            "(map square '(1 2 3.5 -4))",
            "(if true nil false)",
        ]
    );
}

#[test]
fn test_deep_nesting() {
    let depth = 100;
    let source = format!("{}x{}", "(".repeat(depth), ")".repeat(depth));
    let items = lisp::parse(&source).unwrap();
    let mut current = &items[0];
    let mut seen = 0;
    while let Expr::List(inner, _) = current {
        seen += 1;
        current = &inner[0];
    }
    assert_eq!(seen, depth);
}

#[test]
fn test_malformed_number_is_diagnosed() {
    let source = "(list 1 2.)";
    let failure = lisp::parse(source).unwrap_err();
    let error = SourceContext::from_file("bad.lisp", source).report(&failure);
    assert!(matches!(error.kind, FailureKind::MalformedNumber { .. }));
    assert_eq!(error.column, 11);
}

#[test]
fn test_serialized_form_names_variants() {
    let items = lisp::parse("'x").unwrap();
    let json = serde_json::to_value(&items[0]).unwrap();
    assert!(json.get("Quote").is_some());
}
