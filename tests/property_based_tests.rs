mod mocks;

use mocks::*;
use proptest::prelude::*;
use stackset_core::orchestration::{run_to_completion, DriverOptions};
use stackset_core::{DeleteHandler, ResourceModel};
use std::sync::Arc;

/// In-progress polls each grouping reports before completing
fn polls_strategy() -> impl Strategy<Value = Vec<usize>> {
    prop::collection::vec(0usize..4, 0..6)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// Property: any mix of slow groupings drains to SUCCESS with one parent delete,
    /// the pending list never grows, and the parent delete follows every instance call
    #[test]
    fn slow_groupings_always_drain_before_parent_delete(polls in polls_strategy()) {
        let journal = new_journal();
        let groups = groupings(polls.len());
        let model = groups
            .iter()
            .cloned()
            .fold(ResourceModel::new("prop-set:1"), |m, g| m.with_stack_instances(g));
        let deleter = groups
            .iter()
            .zip(&polls)
            .fold(MockDeleter::new(journal.clone()), |d, (g, n)| d.in_progress_for(g, *n));
        let handler = DeleteHandler::new(
            Arc::new(MockInvoker::new(journal.clone())),
            Arc::new(deleter),
            fast_config(),
        );
        let options = DriverOptions { max_invocations: 64, honor_callback_delay: false };

        let outcome =
            tokio_test::block_on(run_to_completion(&handler, &model, None, &options)).unwrap();

        prop_assert!(outcome.event.is_success());
        prop_assert_eq!(outcome.invocations as usize, polls.iter().sum::<usize>() + 1);
        prop_assert!(outcome.pending_history.windows(2).all(|w| w[0] >= w[1]));
        prop_assert_eq!(count(&journal, is_parent_delete), 1);

        for (group, n) in groups.iter().zip(&polls) {
            prop_assert_eq!(fresh_deletes_for(&journal, &group.target_key()), 1);
            prop_assert_eq!(deletes_for(&journal, &group.target_key()), n + 1);
        }

        let entries = journal.lock().unwrap().clone();
        let parent_at = entries.iter().position(is_parent_delete).unwrap();
        let last_instance_call = entries
            .iter()
            .rposition(|e| matches!(e, JournalEntry::DeleteInstances { .. }));
        if let Some(last) = last_instance_call {
            prop_assert!(last < parent_at);
        }
    }
}
