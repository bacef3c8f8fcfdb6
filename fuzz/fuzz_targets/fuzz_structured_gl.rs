//! Structured fuzz target for parsing and liftover
//!
//! Uses the arbitrary crate to build GL-String-like inputs from a small
//! allele vocabulary, then lifts them against a fixed history. The liftover
//! must never panic and its output must always parse.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use std::sync::OnceLock;

use ferro_gl::history::{self, AlleleHistoryIndex};
use ferro_gl::liftover::{liftover_with_config, DuplicatePolicy, GenotypePolicy, LiftoverConfig};

const HISTORY: &str = "HLA_ID\t3250\t3200\n\
HLA00001\tA*01:01:01:01\tA*01:01:01:01\n\
HLA00002\tA*01:02\tA*01:02\n\
HLA00053\tA*24:03:01:01\tA*24:03:01\n\
HLA00010\t\tA*02:01:01\n\
HLA00132\tB*07:02:01\tB*07:02:01\n";

const ALLELES: &[&str] = &[
    "A*01:01:01:01",
    "A*01:02",
    "A*24:03:01",
    "A*02:01:01",
    "B*07:02:01",
    "B*99:99",
];

const OPERATORS: &[char] = &['/', '~', '+', '^', '|'];

#[derive(Debug, Arbitrary)]
struct GlInput {
    tokens: Vec<(u8, bool, u8)>,
    collapse: bool,
    degenerate: bool,
}

fn index() -> &'static AlleleHistoryIndex {
    static INDEX: OnceLock<AlleleHistoryIndex> = OnceLock::new();
    INDEX.get_or_init(|| history::parse(HISTORY.as_bytes()).expect("fuzz history"))
}

fn build(input: &GlInput) -> String {
    let mut text = String::new();
    for (i, (allele, namespaced, op)) in input.tokens.iter().take(32).enumerate() {
        if i > 0 {
            text.push(OPERATORS[*op as usize % OPERATORS.len()]);
        }
        if *namespaced {
            text.push_str("HLA-");
        }
        text.push_str(ALLELES[*allele as usize % ALLELES.len()]);
    }
    text
}

fuzz_target!(|input: GlInput| {
    let text = build(&input);
    let mut config = LiftoverConfig::new();
    if input.collapse {
        config = config.with_duplicates(DuplicatePolicy::Collapse);
    }
    if input.degenerate {
        config = config.with_genotype(GenotypePolicy::Degenerate);
    }

    // Genotypes with more than two members are rejected; that is fine
    let Ok(result) = liftover_with_config(&text, "3.20.0", "3.25.0", index(), config) else {
        return;
    };
    if let Some(target) = result.target_text() {
        assert!(ferro_gl::parse_gl(&target).is_ok(), "{} -> {}", text, target);
    }
});
