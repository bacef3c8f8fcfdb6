//! Property-based tests for GL String parsing and liftover
//!
//! Strategies build GL Strings bottom-up from the operator grammar so every
//! generated string is valid, then check parse/serialize and liftover
//! invariants against a small synthetic history.

use ferro_gl::history::{self, AlleleHistoryIndex};
use ferro_gl::liftover::{liftover_with_config, GenotypePolicy, LiftoverConfig};
use ferro_gl::{liftover, parse_gl, serialize};
use proptest::prelude::*;
use proptest::test_runner::Config as ProptestConfig;

// =============================================================================
// Base strategies
// =============================================================================

/// Alleles present in the synthetic history, with their fate at 3.25.0
const STABLE: &[&str] = &["A*01:01:01:01", "A*01:02", "B*07:02:01", "B*08:01:01"];
const RENAMED: &[(&str, &str)] = &[("A*24:03:01", "A*24:03:01:01"), ("C*07:01", "C*07:01:01")];
const RETIRED: &[&str] = &["A*02:01:01", "B*15:01"];

fn history_index() -> AlleleHistoryIndex {
    let mut data = String::from("HLA_ID\t3250\t3200\n");
    let mut id = 0;
    let mut row = |new: &str, old: &str| {
        id += 1;
        data.push_str(&format!("HLA{:05}\t{}\t{}\n", id, new, old));
    };
    for name in STABLE {
        row(name, name);
    }
    for (old, new) in RENAMED {
        row(new, old);
    }
    for name in RETIRED {
        row("", name);
    }
    history::parse(data.as_bytes()).expect("synthetic history")
}

fn known_allele() -> impl Strategy<Value = String> {
    let names: Vec<&'static str> = STABLE
        .iter()
        .copied()
        .chain(RENAMED.iter().map(|(old, _)| *old))
        .chain(RETIRED.iter().copied())
        .collect();
    prop::sample::select(names).prop_map(str::to_string)
}

/// Any syntactically valid allele, mostly unknown to the history
fn any_allele() -> impl Strategy<Value = String> {
    (
        prop_oneof![Just("A"), Just("B"), Just("C"), Just("DRB1"), Just("DQB1")],
        prop::collection::vec(1..200u32, 1..=4),
        prop::option::of(prop_oneof![Just('G'), Just('N'), Just('L')]),
    )
        .prop_map(|(gene, fields, suffix)| {
            let fields: Vec<String> = fields.iter().map(|f| format!("{:02}", f)).collect();
            let mut name = format!("{}*{}", gene, fields.join(":"));
            if let Some(s) = suffix {
                name.push(s);
            }
            name
        })
}

fn namespaced(allele: impl Strategy<Value = String>) -> impl Strategy<Value = String> {
    (allele, any::<bool>()).prop_map(|(a, ns)| if ns { format!("HLA-{}", a) } else { a })
}

fn join(parts: Vec<String>, op: char) -> String {
    parts.join(&op.to_string())
}

/// Build a GL String from leaves, descending through every operator level
fn gl_string(leaf: BoxedStrategy<String>) -> impl Strategy<Value = String> {
    let allele_list = prop::collection::vec(leaf, 1..=3).prop_map(|v| join(v, '/'));
    let haplotype = prop::collection::vec(allele_list, 1..=2).prop_map(|v| join(v, '~'));
    let genotype = prop_oneof![
        haplotype.clone(),
        (haplotype.clone(), haplotype).prop_map(|(a, b)| format!("{}+{}", a, b)),
    ];
    let multilocus = prop::collection::vec(genotype, 1..=3).prop_map(|v| join(v, '^'));
    prop::collection::vec(multilocus, 1..=2).prop_map(|v| join(v, '|'))
}

fn known_gl_string() -> impl Strategy<Value = String> {
    gl_string(namespaced(known_allele()).boxed())
}

fn any_gl_string() -> impl Strategy<Value = String> {
    gl_string(namespaced(any_allele()).boxed())
}

fn retired(name: &str) -> bool {
    let allele = name.strip_prefix("HLA-").unwrap_or(name);
    RETIRED.contains(&allele)
}

// =============================================================================
// Parsing properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Serializing a parsed GL String gives back the input
    #[test]
    fn prop_parse_serialize_roundtrip(text in any_gl_string()) {
        let node = parse_gl(&text).unwrap();
        prop_assert_eq!(serialize(&node), text);
    }

    /// Every token in the input appears as a locus, in order
    #[test]
    fn prop_loci_follow_token_order(text in any_gl_string()) {
        let node = parse_gl(&text).unwrap();
        let names: Vec<&str> = node.loci().iter().map(|l| l.name()).collect();
        let tokens: Vec<&str> = text.split(['/', '~', '+', '^', '|']).collect();
        prop_assert_eq!(names, tokens);
    }

    /// Arbitrary input never panics the parser
    #[test]
    fn prop_parser_total(text in "[A-Z0-9*:/~+^|\\- ]{0,40}") {
        let _ = parse_gl(&text);
    }
}

// =============================================================================
// Liftover properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Lifting between equal versions changes nothing
    #[test]
    fn prop_same_version_identity(text in known_gl_string()) {
        let index = history_index();
        let result = liftover(&text, "3.20.0", "3.20.0", &index).unwrap();
        prop_assert_eq!(result.target_text(), Some(text));
        prop_assert!(result.events.is_empty());
    }

    /// Retired alleles never appear in the output
    #[test]
    fn prop_no_retired_in_output(text in known_gl_string(), degenerate in any::<bool>()) {
        let index = history_index();
        let policy = if degenerate { GenotypePolicy::Degenerate } else { GenotypePolicy::AllOrNothing };
        let config = LiftoverConfig::new().with_genotype(policy);
        let result = liftover_with_config(&text, "3.20.0", "3.25.0", &index, config).unwrap();

        if let Some(target) = &result.target {
            for locus in target.loci() {
                prop_assert!(!retired(locus.name()), "{} survived in {}", locus, target);
            }
        }
        prop_assert_eq!(result.target.is_none(), result.is_empty());
    }

    /// Surviving loci keep their relative source order
    #[test]
    fn prop_order_preserved(text in known_gl_string()) {
        let index = history_index();
        let result = liftover_with_config(
            &text,
            "3.20.0",
            "3.25.0",
            &index,
            LiftoverConfig::new().with_genotype(GenotypePolicy::Degenerate),
        )
        .unwrap();

        let expected: Vec<String> = parse_gl(&text)
            .unwrap()
            .loci()
            .iter()
            .filter(|l| !retired(l.name()))
            .map(|l| {
                let renamed = RENAMED
                    .iter()
                    .find(|(old, _)| *old == l.allele())
                    .map_or(l.allele(), |(_, new)| *new);
                l.renamed(renamed).name().to_string()
            })
            .collect();
        let actual: Vec<String> = result
            .target
            .as_ref()
            .map(|t| t.loci().iter().map(|l| l.name().to_string()).collect())
            .unwrap_or_default();
        prop_assert_eq!(actual, expected);
    }

    /// The lifted text always parses again
    #[test]
    fn prop_target_reparses(text in known_gl_string()) {
        let index = history_index();
        let result = liftover(&text, "3.20.0", "3.25.0", &index).unwrap();
        if let Some(target) = result.target_text() {
            let reparsed = parse_gl(&target).unwrap();
            prop_assert_eq!(Some(reparsed.resource()), result.target_resource());
        }
    }
}
