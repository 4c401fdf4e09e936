//! Property-based tests for the coordinator
//!
//! Drives a session through random skip/goto/completion sequences and checks
//! the position against a simple model after every step.

mod common;

use common::Harness;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Skip,
    Goto(usize),
    Finish,
}

fn op(max_number: usize) -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::Skip),
        (0..=max_number + 1).prop_map(Op::Goto),
        Just(Op::Finish),
    ]
}

fn scenario() -> impl Strategy<Value = (usize, Vec<Op>)> {
    (1usize..12).prop_flat_map(|len| (Just(len), prop::collection::vec(op(len), 1..25)))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// Property: position stays in bounds and matches the requested moves
    #[test]
    fn position_follows_requests((len, ops) in scenario()) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        runtime.block_on(async move {
            let h = Harness::new(len);
            h.coordinator.play(None).await.unwrap();

            let mut expected = 0usize;
            let mut plays = 1usize;

            for op in ops {
                let moved = match &op {
                    Op::Skip => h.coordinator.skip().await.is_ok().then(|| (expected + 1) % len),
                    Op::Goto(number) => h
                        .coordinator
                        .goto(*number)
                        .await
                        .is_ok()
                        .then(|| number - 1),
                    Op::Finish => h.transport.finish_current(None).then(|| (expected + 1) % len),
                };

                if let Some(position) = moved {
                    expected = position;
                    plays += 1;
                }

                let snapshot = h.wait_for_plays(plays).await;
                assert!(snapshot.position < len);
                assert_eq!(snapshot.position, expected, "after {:?}", op);
                assert!(!snapshot.manual_skip_pending);
            }
        });
    }
}
