//! Knot generation and topological comparison.

use personality_knot_core::knot::MAX_CROSSINGS;
use personality_knot_core::{
    KnotFingerprint, KnotGenerator, KnotType, TopologicalCalculator, TopologicalWeights, TraitProfile,
};

use super::helpers::{block_profile, near_neutral, wave_profile};

#[test]
fn test_generation_total_and_bounded() {
    let gen = KnotGenerator::default();
    let mut profiles: Vec<TraitProfile> = (0..40).map(|s| wave_profile(&format!("w{}", s), s)).collect();
    profiles.push(TraitProfile::new("empty"));
    profiles.push(TraitProfile::uniform("zeros", 0.0));

    for p in &profiles {
        let knot = gen.generate_knot(p);
        assert!(knot.crossing_number() <= MAX_CROSSINGS);
        assert!((0.0..=1.0).contains(&knot.complexity));
        assert_eq!(knot.braid.strands, 12);
        assert_eq!(knot.id, p.id());
        assert_eq!(gen.generate_knot(p), knot, "generation must be deterministic");
    }
}

#[test]
fn test_neutral_profile_is_unknot() {
    let knot = KnotGenerator::default().generate_knot(&TraitProfile::uniform("n", 0.5));
    assert_eq!(knot.crossing_number(), 0);
    assert_eq!(knot.knot_type, KnotType::Unknot);
}

#[test]
fn test_higher_threshold_never_adds_crossings() {
    let loose = KnotGenerator::new(0.1);
    let strict = KnotGenerator::new(0.6);
    for s in 0..20 {
        let p = wave_profile("w", s);
        assert!(strict.generate_knot(&p).crossing_number() <= loose.generate_knot(&p).crossing_number());
    }
}

#[test]
fn test_topological_reflexivity_over_many_knots() {
    let gen = KnotGenerator::default();
    let calcs = [
        TopologicalCalculator::baseline(),
        TopologicalCalculator::polynomial(TopologicalWeights::default()),
        TopologicalCalculator::polynomial(TopologicalWeights::new(0.2, 0.5, 0.1, 0.0)),
    ];
    for s in 0..30 {
        let k = KnotFingerprint::from(&gen.generate_knot(&wave_profile("w", s)));
        for calc in &calcs {
            let score = calc.compatibility(&k, &k);
            assert!((score - 1.0).abs() < 1e-12, "self-compatibility was {}", score);
        }
    }
}

#[test]
fn test_unknot_versus_saturated_knot_is_low() {
    let gen = KnotGenerator::default();
    let a = KnotFingerprint::from(&gen.generate_knot(&near_neutral("n", 0.0)));
    let b = KnotFingerprint::from(&gen.generate_knot(&block_profile("b", 1)));
    let score = TopologicalCalculator::baseline().compatibility(&a, &b);
    assert!(score < 0.2, "score {}", score);
}

#[test]
fn test_external_fingerprint_json() {
    let json = r#"{"knot_type": "trefoil", "complexity": 0.045, "crossing_number": 3}"#;
    let external: KnotFingerprint = serde_json::from_str(json).unwrap();
    assert!(external.jones.is_none());
    assert!(external.writhe.is_none());
    let poly = TopologicalCalculator::polynomial(TopologicalWeights::default());
    assert!((poly.compatibility(&external, &external) - 1.0).abs() < 1e-12);
}
