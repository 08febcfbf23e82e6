//! Property tests for round advancement, damage and normalization.

use std::collections::BTreeSet;

use proptest::prelude::*;
use tracker::RoundState;

#[derive(Debug, Clone)]
enum Op {
    Add(u8, u64),
    Dmg(u8, u64),
    Afflict(u8, u64),
    Effect(u64),
    Del(u8),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..5u8, 0..30u64).prop_map(|(i, hp)| Op::Add(i, hp)),
        (0..5u8, 0..15u64).prop_map(|(i, d)| Op::Dmg(i, d)),
        (0..5u8, 0..10u64).prop_map(|(i, r)| Op::Afflict(i, r)),
        (0..10u64).prop_map(Op::Effect),
        (0..5u8).prop_map(Op::Del),
    ]
}

fn name(i: u8) -> String {
    format!("e{i}")
}

/// Apply ops, skipping the ones the snapshot rejects.
fn build(ops: &[Op]) -> RoundState {
    let mut rs = RoundState::new();
    for op in ops {
        let next = match op {
            Op::Add(i, hp) => rs.add_entity(&name(*i), *hp).ok(),
            Op::Dmg(i, d) => rs.damage_entity(&name(*i), *d).ok().map(|(rs, _)| rs),
            Op::Afflict(i, r) => rs.afflict_entity(&name(*i), *r, "hex").ok(),
            Op::Effect(r) => Some(rs.add_effect(*r, "storm")),
            Op::Del(i) => rs.delete_entity(&name(*i)).ok(),
        };
        if let Some(next) = next {
            rs = next;
        }
    }
    rs
}

fn surviving(rs: &RoundState) -> BTreeSet<(String, u64)> {
    rs.entities
        .values()
        .flat_map(|e| e.afflictions.iter())
        .chain(rs.scheduled_effects())
        .map(|e| (e.description.clone(), e.end_round - rs.round))
        .collect()
}

proptest! {
    #[test]
    fn damage_either_kills_or_stays_below_hp(ops in prop::collection::vec(op_strategy(), 0..30), i in 0..5u8, d in 0..40u64) {
        let rs = build(&ops);
        if let Ok((next, died)) = rs.damage_entity(&name(i), d) {
            match next.entities.get(&name(i)) {
                Some(e) => {
                    prop_assert!(!died);
                    prop_assert!(e.damage < e.hp);
                }
                None => prop_assert!(died),
            }
        }
    }

    #[test]
    fn stepping_is_additive(ops in prop::collection::vec(op_strategy(), 0..30), a in 0..8u64, b in 0..8u64) {
        let rs = build(&ops);
        let (split, _) = rs.step(a);
        let (split, _) = split.step(b);
        let (whole, _) = rs.step(a + b);
        prop_assert_eq!(split, whole);
    }

    #[test]
    fn step_messages_match_removed_effects(ops in prop::collection::vec(op_strategy(), 0..30), n in 0..8u64) {
        let rs = build(&ops);
        let before = rs.entities.values().map(|e| e.afflictions.len()).sum::<usize>()
            + rs.scheduled_effects().count();
        let (next, messages) = rs.step(n);
        let after = next.entities.values().map(|e| e.afflictions.len()).sum::<usize>()
            + next.scheduled_effects().count();
        prop_assert_eq!(before - after, messages.len());
        prop_assert_eq!(next.round, rs.round + n);
        for (&key, effects) in &next.effects {
            prop_assert!(effects.iter().all(|e| e.end_round == key && e.end_round > next.round));
        }
    }

    #[test]
    fn normalize_preserves_relative_timing(
        ops in prop::collection::vec(op_strategy(), 0..30),
        warmup in 0..20u64,
        n in 0..10u64,
    ) {
        let (rs, _) = build(&ops).step(warmup);
        let normalized = rs.normalize();
        prop_assert_eq!(surviving(&rs), surviving(&normalized));

        let (plain, mut plain_msgs) = rs.step(n);
        let (based, mut based_msgs) = normalized.step(n);
        plain_msgs.sort();
        based_msgs.sort();
        prop_assert_eq!(plain_msgs, based_msgs);
        prop_assert_eq!(surviving(&plain), surviving(&based));
        prop_assert_eq!(
            plain.entities.keys().collect::<Vec<_>>(),
            based.entities.keys().collect::<Vec<_>>()
        );
    }

    #[test]
    fn mutating_a_clone_leaves_original_alone(ops in prop::collection::vec(op_strategy(), 1..30)) {
        let original = build(&ops);
        let rendered = original.to_string();
        let mut copy = original.clone();
        for entity in copy.entities.values_mut() {
            entity.damage += 1;
            entity.afflictions.clear();
        }
        copy.effects.clear();
        copy.round += 1;
        prop_assert_eq!(original.to_string(), rendered);
    }
}
