//! Property-based tests for timestamp ordering and log convergence.

use std::cmp::Ordering;

use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use woweb::Edit;
use woweb::LogManager;
use woweb::Timestamp;
use woweb::sim::Cluster;

// =============================================================================
// Test helpers
// =============================================================================

const NAMES: [&str; 4] = ["p0", "p1", "p2", "p3"];

/// Pairs of equal-length timestamps.
fn timestamp_pair() -> impl Strategy<Value = (Timestamp, Timestamp)> {
    return (1usize..6).prop_flat_map(|len| {
        (
            prop::collection::vec(0u64..4, len),
            prop::collection::vec(0u64..4, len),
        )
            .prop_map(|(a, b)| (Timestamp::from_counters(&a), Timestamp::from_counters(&b)))
    });
}

/// Triples of equal-length timestamps.
fn timestamp_triple() -> impl Strategy<Value = (Timestamp, Timestamp, Timestamp)> {
    return (1usize..5).prop_flat_map(|len| {
        (
            prop::collection::vec(0u64..3, len),
            prop::collection::vec(0u64..3, len),
            prop::collection::vec(0u64..3, len),
        )
            .prop_map(|(a, b, c)| {
                (
                    Timestamp::from_counters(&a),
                    Timestamp::from_counters(&b),
                    Timestamp::from_counters(&c),
                )
            })
    });
}

fn arbitrary_edit() -> impl Strategy<Value = Edit> {
    return prop_oneof![
        (0u8..4).prop_map(|n| Edit::create(format!("author {}", n))),
        (0u64..8, "[a-z]{0,6}").prop_map(|(node, text)| Edit::update(node, text)),
        (0u64..8, 0usize..8).prop_map(|(node, to)| Edit::move_to(node, to)),
        (0u64..8).prop_map(Edit::remove),
    ];
}

/// One step of a simulated session.
#[derive(Clone, Debug)]
enum Action {
    /// Participant makes an edit.
    Local { who: usize, edit: Edit },
    /// Participant receives one pending message, picked by index.
    Deliver { who: usize, pick: usize },
}

fn arbitrary_action(participants: usize) -> impl Strategy<Value = Action> {
    return prop_oneof![
        (0..participants, arbitrary_edit()).prop_map(|(who, edit)| Action::Local { who, edit }),
        (0..participants, 0usize..16).prop_map(|(who, pick)| Action::Deliver { who, pick }),
    ];
}

fn session() -> impl Strategy<Value = (usize, Vec<Action>)> {
    return (1usize..=4).prop_flat_map(|participants| {
        (
            Just(participants),
            prop::collection::vec(arbitrary_action(participants), 1..40),
        )
    });
}

/// Run a session and return the cluster, before the final flush.
fn run(participants: usize, actions: &[Action]) -> Cluster {
    let mut cluster = Cluster::new(&NAMES[..participants]).expect("valid names");
    for action in actions {
        match action {
            Action::Local { who, edit } => {
                cluster.local(NAMES[*who], edit.clone()).expect("known participant");
            }
            Action::Deliver { who, pick } => {
                let pending = cluster.pending(NAMES[*who]).expect("known participant").len();
                if pending > 0 {
                    cluster.deliver(NAMES[*who], pick % pending).expect("known participant");
                }
            }
        }
    }
    return cluster;
}

// =============================================================================
// Timestamp properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Distinct timestamps are always strictly ordered one way or the other.
    #[test]
    fn compare_is_total((a, b) in timestamp_pair()) {
        let ord = a.cmp(&b);
        if a == b {
            prop_assert_eq!(ord, Ordering::Equal);
        } else {
            prop_assert!((a < b) != (a > b));
            prop_assert_ne!(ord, Ordering::Equal);
        }
        prop_assert_eq!(b.cmp(&a), ord.reverse());
    }

    #[test]
    fn compare_is_transitive((a, b, c) in timestamp_triple()) {
        if a <= b && b <= c {
            prop_assert!(a <= c);
        }
    }

    /// Whenever causality decides, the total order agrees with it.
    #[test]
    fn compare_extends_causal_order((a, b) in timestamp_pair()) {
        if a.happens_before(&b) {
            prop_assert!(a < b);
        }
        if a.concurrent_with(&b) {
            prop_assert!(!a.happens_before(&b) && !b.happens_before(&a));
        }
    }

    #[test]
    fn merge_laws((a, b, c) in timestamp_triple()) {
        prop_assert_eq!(a.merge(&a), a.clone());
        prop_assert_eq!(a.merge(&b), b.merge(&a));
        prop_assert_eq!(a.merge(&b).merge(&c), a.merge(&b.merge(&c)));
        let m = a.merge(&b);
        prop_assert!(m.dominates(&a) && m.dominates(&b));
    }

    #[test]
    fn increment_only_touches_owned_slot((a, _b) in timestamp_pair(), slot in 0usize..6) {
        let slot = slot % a.len();
        let next = a.increment(slot);
        prop_assert!(a.happens_before(&next));
        for i in 0..a.len() {
            let expected = if i == slot { a.get(i).unwrap() + 1 } else { a.get(i).unwrap() };
            prop_assert_eq!(next.get(i), Some(expected));
        }
    }
}

// =============================================================================
// Log properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// After any partial delivery schedule every manager holds a sorted log
    /// whose fold equals its live document.
    #[test]
    fn live_document_matches_replay((participants, actions) in session()) {
        let cluster = run(participants, &actions);
        for name in &NAMES[..participants] {
            let m = cluster.manager(name).unwrap();
            prop_assert!(m.is_sorted());
            prop_assert_eq!(m.document(), m.replay());
        }
    }

    /// Once everything is delivered every participant holds the same log and
    /// the same document.
    #[test]
    fn full_delivery_converges((participants, actions) in session()) {
        let mut cluster = run(participants, &actions);
        cluster.flush().unwrap();
        prop_assert!(cluster.converged());

        let first: Vec<_> = cluster.manager(NAMES[0]).unwrap().entries().cloned().collect();
        for name in &NAMES[1..participants] {
            let other: Vec<_> = cluster.manager(name).unwrap().entries().cloned().collect();
            prop_assert_eq!(&first, &other);
        }
    }

    /// A fixed set of entries yields the same document in any arrival order.
    #[test]
    fn arrival_order_does_not_matter(
        (participants, actions) in session(),
        seed_a in any::<u64>(),
        seed_b in any::<u64>(),
    ) {
        let mut cluster = run(participants, &actions);
        cluster.flush().unwrap();
        let entries: Vec<_> = cluster.manager(NAMES[0]).unwrap().entries().cloned().collect();

        let replay_shuffled = |seed: u64| {
            let mut shuffled = entries.clone();
            shuffled.shuffle(&mut StdRng::seed_from_u64(seed));
            // An observer slot that never edits
            let mut observer: LogManager = LogManager::with_participants(participants, 0).unwrap();
            for entry in shuffled {
                observer.apply_external(entry.edit, entry.timestamp).unwrap();
            }
            return observer;
        };

        let a = replay_shuffled(seed_a);
        let b = replay_shuffled(seed_b);
        prop_assert_eq!(a.document(), b.document());
        prop_assert_eq!(a.document().to_string(), b.document().to_string());
        prop_assert_eq!(a.document(), cluster.document(NAMES[0]).unwrap());
        prop_assert_eq!(a.document(), a.replay());
    }
}
