use cmssw_profiling_digest::aggregator::{
    clean_stack, group_samples, CategoryTotals, GroupingConfig, Matcher, Resolver, Rule,
    UnclassifiedPolicy,
};
use cmssw_profiling_digest::parser::{parse_samples, Sample};
use cmssw_profiling_digest::utils::config::BOUNDARY_SUFFIXES;
use cmssw_profiling_digest::utils::{ClassificationError, GroupError};
use pretty_assertions::assert_eq;

fn frames(names: &[&str]) -> Vec<String> {
    names.iter().map(|f| f.to_string()).collect()
}

#[test]
fn test_clean_stack_never_duplicates() {
    let raw = frames(&["a", "b", "a", "c", "b", "d"]);
    let cleaned = clean_stack(&raw, BOUNDARY_SUFFIXES);

    assert_eq!(cleaned, frames(&["a", "b", "c", "d"]));
    assert!(cleaned.len() <= raw.len());
}

#[test]
fn test_clean_stack_stops_at_each_boundary() {
    for boundary in [
        "edm::Worker::doEvent",
        "edm::Worker::beginRun",
        "edm::Factory::makeModule",
        "edm::EventProcessor::init",
    ] {
        let cleaned = clean_stack(&frames(&["x", boundary, "after"]), BOUNDARY_SUFFIXES);
        assert_eq!(cleaned, frames(&["x", boundary]));
    }
}

#[test]
fn test_no_producer_is_flagged_not_defaulted() {
    let dump = "## 1 1.0 '+10'\n#1 A::foo()\n#2 B::doEvent()\n";
    let samples = parse_samples(dump).unwrap();

    let config = GroupingConfig::default();
    let cleaned = clean_stack(&samples[0].frames, &config.boundaries);
    assert_eq!(cleaned, frames(&["A::foo", "B::doEvent"]));

    assert!(matches!(
        config.classify(&cleaned),
        Err(ClassificationError::NoProducer { .. })
    ));

    let err = group_samples(
        samples.into_iter().map(Ok),
        &config,
        UnclassifiedPolicy::Abort,
        "cpu.txt",
    )
    .unwrap_err();
    assert!(matches!(err, GroupError::Classification { stack_index: 0, .. }));
}

#[test]
fn test_producer_end_to_end() {
    let dump = "## 1 1.0 '+5.0'\n#1 X::produce(int)\n#2 Y::doEvent()\n";
    let samples = parse_samples(dump).unwrap();
    assert_eq!(samples[0].frames, frames(&["X::produce", "Y::doEvent"]));

    let outcome = group_samples(
        samples.into_iter().map(Ok),
        &GroupingConfig::default(),
        UnclassifiedPolicy::Abort,
        "cpu.txt",
    )
    .unwrap();

    assert_eq!(outcome.totals.to_lines(), vec!["X::produce;5.00"]);
}

#[test]
fn test_input_module_totals() {
    let samples = vec![
        Sample::new(frames(&["TBranch::GetEntry"]), 3.5),
        Sample::new(frames(&["main", "TBasket::ReadBasketBuffers"]), 1.5),
    ];

    let outcome = group_samples(
        samples.into_iter().map(Ok),
        &GroupingConfig::default(),
        UnclassifiedPolicy::Abort,
        "mem.txt",
    )
    .unwrap();

    assert_eq!(outcome.totals.to_lines(), vec!["InputModule;5.00"]);
}

#[test]
fn test_totals_independent_of_sample_order() {
    let pairs = [("a", 0.1), ("b", 2.5), ("a", 0.2), ("c", 1.0), ("b", 0.5), ("a", 0.3)];

    let mut forward = CategoryTotals::new();
    for (category, value) in pairs.iter() {
        forward.add(category, *value);
    }

    let mut backward = CategoryTotals::new();
    for (category, value) in pairs.iter().rev() {
        backward.add(category, *value);
    }

    for category in ["a", "b", "c"] {
        let f = forward.get(category).unwrap();
        let b = backward.get(category).unwrap();
        assert!((f - b).abs() < 1e-9, "{} differs: {} vs {}", category, f, b);
    }
}

#[test]
fn test_output_sorted_descending() {
    let mut totals = CategoryTotals::new();
    totals.add("A", 1.0);
    totals.add("B", 5.0);
    totals.add("C", 3.0);

    assert_eq!(totals.to_lines(), vec!["B;5.00", "C;3.00", "A;1.00"]);
}

#[test]
fn test_custom_rules_take_priority_in_order() {
    let config = GroupingConfig {
        rules: vec![
            Rule::new(
                "allocations",
                Matcher::AnyFrame(frames(&["malloc"])),
                Resolver::Fixed("Allocations".to_string()),
            ),
            Rule::new(
                "module-produce",
                Matcher::LastEndsWith("doEvent".to_string()),
                Resolver::FirstContaining("::produce".to_string()),
            ),
        ],
        ..Default::default()
    };

    let stack = frames(&["malloc", "A::foo", "B::doEvent"]);
    assert_eq!(config.classify(&stack).unwrap(), "Allocations");
}
