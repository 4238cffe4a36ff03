//! Comparison, cross-validation, and reports on synthetic populations.

use std::collections::HashSet;

use personality_knot_bench::reports::{PAIRS_FILE, SUMMARY_FILE};
use personality_knot_bench::validation::k_fold_split;
use personality_knot_bench::{
    ComparisonReport, CrossValidator, EngineConfig, GroundTruthConfig, GroundTruthGenerator,
    MatchingComparator, PopulationGenerator, ReportMetadata, ReportWriter, SignificanceBackend,
    SimilarityValidation, ThresholdGrid,
};
use personality_knot_core::{FusionStrategy, MatchingConfig, TraitProfile};

fn population(seed: u64, count: usize) -> Vec<TraitProfile> {
    PopulationGenerator::new(seed, count).generate_profiles().unwrap()
}

#[test]
fn test_five_folds_partition_hundred_profiles() {
    let folds = k_fold_split(100, 5, 42);
    assert_eq!(folds.len(), 5);
    assert!(folds.iter().all(|f| f.len() == 20));

    let mut seen = HashSet::new();
    for fold in &folds {
        for idx in fold {
            assert!(seen.insert(*idx), "index {} in two folds", idx);
        }
    }
    assert_eq!(seen, (0..100).collect::<HashSet<_>>());
}

#[test]
fn test_cross_validation_run() {
    let config = EngineConfig::quick();
    let profiles = population(config.population.seed, 30);
    let gt = GroundTruthGenerator::new(config.ground_truth.clone())
        .generate(&profiles)
        .unwrap();

    let result = CrossValidator::from_config(&config).unwrap().run(&profiles, &gt);
    assert_eq!(result.k, 3);
    assert_eq!(result.folds.len() + result.skipped_folds.len(), 3);
    // 10 profiles per fold, 45 within-fold pairs each
    assert!(result.folds.iter().all(|f| f.profiles == 10 && f.pairs == 45));
    assert!((0.0..=1.0).contains(&result.integrated_accuracy.mean));
    assert!(result.quantum_accuracy.std >= 0.0);
}

#[test]
fn test_ground_truth_reproducible() {
    let profiles = population(9, 15);
    let config = GroundTruthConfig {
        seed: 123,
        ..Default::default()
    };
    let first = GroundTruthGenerator::new(config.clone()).generate(&profiles).unwrap();
    let second = GroundTruthGenerator::new(config).generate(&profiles).unwrap();
    assert_eq!(first.labels(), second.labels());

    let other = GroundTruthGenerator::new(GroundTruthConfig {
        seed: 124,
        ..Default::default()
    })
    .generate(&profiles)
    .unwrap();
    assert_ne!(first.labels(), other.labels());
}

#[test]
fn test_significance_degrades_without_backend() {
    let profiles = population(4, 12);
    let gt = GroundTruthGenerator::new(GroundTruthConfig::default())
        .generate(&profiles)
        .unwrap();
    let result = MatchingComparator::new(
        MatchingConfig::default(),
        ThresholdGrid::default(),
        SignificanceBackend::Unavailable,
    )
    .compare(&profiles, &gt);

    assert_eq!(result.total_pairs, 66);
    assert!(result.significance.p_value.is_none());
    assert!(result.significance.t_statistic.is_none());
    assert!(!result.significance.is_significant);
    assert!((0.0..=1.0).contains(&result.integrated_accuracy()));
}

#[test]
fn test_end_to_end_compare_and_report() {
    let profiles = population(42, 20);
    let gt = GroundTruthGenerator::new(GroundTruthConfig::default())
        .generate(&profiles)
        .unwrap();
    let config = MatchingConfig::polynomial().with_fusion(FusionStrategy::from_key("two_stage").unwrap());
    let result = MatchingComparator::new(config.clone(), ThresholdGrid::default(), SignificanceBackend::StudentT)
        .compare(&profiles, &gt);
    assert_eq!(result.total_pairs, 190);

    let similarity = SimilarityValidation::run(&profiles, SignificanceBackend::StudentT);
    let report = ComparisonReport::new(&result, &config, ReportMetadata::new(42, true)).with_similarity(similarity);
    assert_eq!(report.checks.len(), 4);

    let dir = tempfile::tempdir().unwrap();
    let writer = ReportWriter::new(dir.path()).unwrap();
    let paths = writer.write_comparison(&result, &report).unwrap();
    assert_eq!(paths.pairs, dir.path().join(PAIRS_FILE));
    assert_eq!(paths.summary, dir.path().join(SUMMARY_FILE));

    let lines = std::fs::read_to_string(&paths.pairs).unwrap();
    assert_eq!(lines.lines().count(), 190);
    let first: serde_json::Value = serde_json::from_str(lines.lines().next().unwrap()).unwrap();
    for key in ["id_a", "id_b", "quantum", "topological", "fused", "is_compatible", "integrated_correct"] {
        assert!(first.get(key).is_some(), "missing {}", key);
    }

    let summary: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&paths.summary).unwrap()).unwrap();
    assert_eq!(summary["settings"]["fusion"], "two_stage");
    assert_eq!(summary["settings"]["topological_mode"], "polynomial");
    assert!(summary["similarity"]["total_pairs"].as_u64() == Some(190));
}
