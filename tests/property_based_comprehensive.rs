//! Property-based tests for the formula compiler, the fitting engine and the
//! benchmark parser
//!
//! Core properties:
//! 1. Compilation never panics, whatever the input
//! 2. Canonical infix form recompiles to the same program
//! 3. Evaluation is deterministic
//! 4. Exact linear data is recovered by the solver
//! 5. Benchmark lines survive format -> parse
//! 6. Report number formatting stays parseable

use benchls::bench_parse::parse_line;
use benchls::expr::{compile, compile_list, Binding, SymbolTable};
use benchls::fit::{estimate, r_squared, Sample};
use benchls::report::{format_exp, format_general};
use proptest::prelude::*;

fn symbols() -> SymbolTable {
    SymbolTable::new(["M", "N"])
}

/// Well-formed formulas over M and N
fn formula() -> impl Strategy<Value = String> {
    let leaf = prop_oneof![
        Just("M".to_string()),
        Just("N".to_string()),
        (0u32..1000).prop_map(|n| n.to_string()),
        (0u32..100, 0u32..100).prop_map(|(a, b)| format!("{}.{}", a, b)),
    ];
    leaf.prop_recursive(4, 32, 2, |inner| {
        prop_oneof![
            (
                inner.clone(),
                inner.clone(),
                prop::sample::select(vec!["+", "-", "*", "/"])
            )
                .prop_map(|(a, b, op)| format!("{} {} {}", a, op, b)),
            inner.clone().prop_map(|a| format!("({})", a)),
            inner.clone().prop_map(|a| format!("-{}", a)),
            inner.clone().prop_map(|a| format!("math.Sqrt({})", a)),
            (inner.clone(), inner).prop_map(|(a, b)| format!("math.Pow({}, {})", a, b)),
        ]
    })
}

fn same_value(a: f64, b: f64) -> bool {
    a.to_bits() == b.to_bits() || (a.is_nan() && b.is_nan())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_compile_never_panics(source in ".{0,40}") {
        // Property: arbitrary text yields Ok or a typed error, never a panic
        let _ = compile(&source, &symbols());
        let _ = compile_list(&source, &symbols());
    }

    #[test]
    fn prop_compile_grammar_alphabet_never_panics(source in "[-+*/(),. MNY0-9a-z.]{0,40}") {
        let _ = compile(&source, &symbols().with_response());
        let _ = compile_list(&source, &symbols());
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_canonical_form_round_trips(
        source in formula(),
        m in 0.5f64..100.0,
        n in 0.5f64..100.0,
    ) {
        let program = compile(&source, &symbols()).unwrap();
        let recompiled = compile(&program.canonical(), &symbols()).unwrap();
        prop_assert_eq!(recompiled.instructions(), program.instructions());

        let binding: Binding = [("M", m), ("N", n)].into_iter().collect();
        let a = program.evaluate(&binding).unwrap();
        let b = recompiled.evaluate(&binding).unwrap();
        prop_assert!(same_value(a, b), "{} vs {}", a, b);
    }

    #[test]
    fn prop_evaluation_is_deterministic(
        source in formula(),
        m in -100.0f64..100.0,
        n in -100.0f64..100.0,
    ) {
        let program = compile(&source, &symbols()).unwrap();
        let binding: Binding = [("M", m), ("N", n)].into_iter().collect();
        let first = program.evaluate(&binding).unwrap();
        let second = program.evaluate(&binding).unwrap();
        prop_assert!(same_value(first, second));
    }

    #[test]
    fn prop_list_elements_match_single_compiles(
        terms in prop::collection::vec(formula(), 1..4),
    ) {
        let list = terms.join(", ");
        let programs = compile_list(&list, &symbols()).unwrap();
        prop_assert_eq!(programs.len(), terms.len());
        for (program, term) in programs.iter().zip(&terms) {
            prop_assert_eq!(program.source(), term.as_str());
            let single = compile(term, &symbols()).unwrap();
            prop_assert_eq!(program.instructions(), single.instructions());
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_exact_line_is_recovered(
        slope in -1000.0f64..1000.0,
        intercept in -1000.0f64..1000.0,
        points in 3usize..30,
    ) {
        let mut sample = Sample::new(2);
        for i in 0..points {
            let x = i as f64;
            sample.push_row(&[x, 1.0], slope * x + intercept).unwrap();
        }

        let model = estimate(&sample).unwrap();
        let scale = slope.abs().max(intercept.abs()).max(1.0);
        prop_assert!((model.coefficients()[0] - slope).abs() <= 1e-8 * scale);
        prop_assert!((model.coefficients()[1] - intercept).abs() <= 1e-8 * scale);

        let r2 = r_squared(&model, &sample);
        prop_assert!(r2.is_nan() || r2 <= 1.0 + 1e-12);
    }

    #[test]
    fn prop_duplicated_column_has_no_model(
        values in prop::collection::vec(-100.0f64..100.0, 3..20),
        factor in prop::sample::select(vec![-1.0f64, 0.5, 2.0, 4.0]),
    ) {
        let mut sample = Sample::new(2);
        for &x in &values {
            sample.push_row(&[x, factor * x], x).unwrap();
        }
        prop_assert!(estimate(&sample).is_none());
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_benchmark_line_round_trips(
        name in "Benchmark[A-Za-z]{1,10}[0-9]{1,4}-[1-8]",
        iterations in 1u64..10_000_000,
        ns in 0.0f64..1e10,
        bytes in 0u64..1_000_000,
        allocs in 0u64..1000,
    ) {
        let line = format!(
            "{}\t{}\t{} ns/op\t{} B/op\t{} allocs/op",
            name, iterations, ns, bytes, allocs
        );
        let bench = parse_line(&line).unwrap();
        prop_assert_eq!(bench.name, name);
        prop_assert_eq!(bench.iterations, iterations);
        prop_assert_eq!(bench.ns_per_op, Some(ns));
        prop_assert_eq!(bench.mb_per_s, None);
        prop_assert_eq!(bench.alloced_bytes_per_op, Some(bytes));
        prop_assert_eq!(bench.allocs_per_op, Some(allocs));
    }

    #[test]
    fn prop_format_exp_is_parseable(value in -1e300f64..1e300, precision in 0usize..12) {
        let text = format_exp(value, precision);
        let parsed: f64 = text.parse().unwrap();
        let tolerance = 10f64.powi(-(precision as i32)) * value.abs();
        prop_assert!((parsed - value).abs() <= tolerance, "{} -> {}", value, text);

        let exponent = text.split_once('e').unwrap().1;
        prop_assert!(exponent.starts_with('+') || exponent.starts_with('-'));
        prop_assert!(exponent.len() >= 3);
    }

    #[test]
    fn prop_format_general_round_trips(value in prop::num::f64::NORMAL) {
        let parsed: f64 = format_general(value).parse().unwrap();
        prop_assert_eq!(parsed, value);
    }
}
