//! Orchestration tests for the Pipeline

#[cfg(test)]
mod tests {
    use crate::{Pipeline, PipelineConfig, PipelineError, VerdictPolicy};
    use rootcause_domain::traits::{AppendOutcome, ResultStore};
    use rootcause_domain::{ClassifiedRow, TicketRow};
    use rootcause_llm::MockProvider;
    use std::collections::HashSet;

    /// In-memory store that records every append
    #[derive(Default)]
    struct MemoryStore {
        rows: Vec<ClassifiedRow>,
        appends: Vec<usize>,
        fail_on_append: Option<usize>,
        fail_reads: bool,
        problems: Vec<String>,
    }

    impl ResultStore for MemoryStore {
        type Error = String;

        fn classified_numbers(&self) -> Result<HashSet<String>, Self::Error> {
            if self.fail_reads {
                return Err("no such column: evident_root_cause".to_string());
            }
            Ok(self.rows.iter().map(|r| r.number().to_string()).collect())
        }

        fn schema_problems(&self) -> Result<Vec<String>, Self::Error> {
            Ok(self.problems.clone())
        }

        fn append_minibatch(&mut self, rows: &[ClassifiedRow]) -> Result<AppendOutcome, Self::Error> {
            if self.fail_on_append == Some(self.appends.len() + 1) {
                return Err("disk full".to_string());
            }
            self.appends.push(rows.len());
            self.rows.extend_from_slice(rows);
            Ok(AppendOutcome {
                written: rows.len(),
                skipped: 0,
            })
        }
    }

    fn rows(n: usize) -> Vec<TicketRow> {
        (0..n)
            .map(|i| {
                TicketRow::new(
                    format!("INC{:04}", i),
                    format!("[T{}]\nissue {}", i, i),
                    "resolved",
                )
            })
            .collect()
    }

    fn pipeline(
        provider: MockProvider,
        store: MemoryStore,
        batch_size: usize,
        minibatch_size: usize,
    ) -> Pipeline<MockProvider, MemoryStore> {
        Pipeline::new(
            provider,
            store,
            "Classify the root cause.",
            PipelineConfig::with_sizes(batch_size, minibatch_size),
        )
    }

    #[test]
    fn test_minibatch_slicing_appends() {
        let provider = MockProvider::new("Yes");
        let mut pipeline = pipeline(provider.clone(), MemoryStore::default(), 100, 10);

        let mut progress = Vec::new();
        let report = pipeline
            .process(rows(23), |mb| progress.push((mb.index, mb.start, mb.end)))
            .unwrap();

        assert_eq!(pipeline.store().appends, vec![10, 10, 3]);
        assert_eq!(progress, vec![(1, 0, 10), (2, 10, 20), (3, 20, 23)]);
        assert_eq!(report.minibatches, 3);
        assert_eq!(report.written, 23);
        assert_eq!(provider.call_count(), 23);
    }

    #[test]
    fn test_rows_persisted_in_batch_order_with_verdicts() {
        let mut provider = MockProvider::new("No");
        provider.add_response("INC0001", "Yes - expired certificate");
        let mut pipeline = pipeline(provider, MemoryStore::default(), 10, 2);

        pipeline.process(rows(3), |_| {}).unwrap();

        let stored = &pipeline.store().rows;
        let numbers: Vec<&str> = stored.iter().map(|r| r.number()).collect();
        assert_eq!(numbers, vec!["INC0000", "INC0001", "INC0002"]);
        assert_eq!(stored[1].evident_root_cause, "Yes - expired certificate");
        assert_eq!(stored[2].evident_root_cause, "No");
        assert_eq!(stored[0].row, rows(1)[0]);
    }

    #[test]
    fn test_requests_carry_system_message_and_temperature() {
        let provider = MockProvider::new("Yes");
        let mut pipeline = pipeline(provider.clone(), MemoryStore::default(), 10, 10);

        pipeline.process(rows(2), |_| {}).unwrap();

        for request in provider.requests() {
            assert_eq!(request.system_content(), Some("Classify the root cause."));
            assert!((request.temperature - 0.2).abs() < f32::EPSILON);
        }
        let first = &provider.requests()[0];
        assert!(first.user_content().unwrap().starts_with("Ticket Number: INC0000\n"));
    }

    #[test]
    fn test_precondition_checked_before_any_request() {
        let dir = tempfile::TempDir::new().unwrap();
        let source = crate::TicketSource::new(dir.path().join("never-read.json"));
        let provider = MockProvider::new("Yes");
        let mut pipeline = pipeline(provider.clone(), MemoryStore::default(), 5, 10);

        let result = pipeline.run(&source, |_| {});

        assert!(matches!(result, Err(PipelineError::Configuration(_))));
        assert_eq!(provider.call_count(), 0);
        assert!(pipeline.store().appends.is_empty());
    }

    #[test]
    fn test_classification_error_aborts_without_partial_commit() {
        let mut provider = MockProvider::new("Yes");
        provider.add_error("INC0013");
        let mut pipeline = pipeline(provider.clone(), MemoryStore::default(), 100, 10);

        let mut committed = 0;
        let result = pipeline.process(rows(30), |_| committed += 1);

        assert!(matches!(
            result,
            Err(PipelineError::Classification { ref number, .. }) if number == "INC0013"
        ));
        assert_eq!(committed, 1);
        assert_eq!(pipeline.store().appends, vec![10]);
        // Tickets 10..=13 were requested; nothing after the failure
        assert_eq!(provider.call_count(), 14);
    }

    #[test]
    fn test_store_write_error_aborts() {
        let store = MemoryStore {
            fail_on_append: Some(2),
            ..MemoryStore::default()
        };
        let provider = MockProvider::new("Yes");
        let mut pipeline = pipeline(provider.clone(), store, 100, 5);

        let result = pipeline.process(rows(15), |_| {});

        assert!(matches!(result, Err(PipelineError::StoreWrite(ref m)) if m == "disk full"));
        assert_eq!(pipeline.store().appends, vec![5]);
        assert_eq!(provider.call_count(), 10);
    }

    #[test]
    fn test_empty_and_repeated_numbers_are_classified() {
        let mut odd = rows(4);
        odd[1].number = String::new();
        odd[3].number = odd[0].number.clone();
        let provider = MockProvider::new("Yes");
        let mut pipeline = pipeline(provider.clone(), MemoryStore::default(), 10, 2);

        let report = pipeline.process(odd, |_| {}).unwrap();

        assert_eq!(report.written, 4);
        assert_eq!(provider.call_count(), 4);
        let numbers: Vec<&str> = pipeline.store().rows.iter().map(|r| r.number()).collect();
        assert_eq!(numbers, vec!["INC0000", "", "INC0002", "INC0000"]);
    }

    #[test]
    fn test_repeated_numbers_keep_their_own_verdicts() {
        let mut repeated = rows(2);
        repeated[1].number = repeated[0].number.clone();
        let mut provider = MockProvider::new("No");
        provider.add_response("issue 1", "Yes - second copy");
        let mut pipeline = pipeline(provider, MemoryStore::default(), 10, 2);

        pipeline.process(repeated, |_| {}).unwrap();

        let verdicts: Vec<&str> = pipeline
            .store()
            .rows
            .iter()
            .map(|r| r.evident_root_cause.as_str())
            .collect();
        assert_eq!(verdicts, vec!["No", "Yes - second copy"]);
    }

    #[test]
    fn test_schema_checked_before_selection() {
        let store = MemoryStore {
            fail_reads: true,
            problems: vec!["column 'evident_root_cause' is missing".to_string()],
            ..MemoryStore::default()
        };
        let source = crate::TicketSource::new("/nonexistent/tickets.json");
        let provider = MockProvider::new("Yes");
        let mut pipeline = pipeline(provider.clone(), store, 10, 2);

        let result = pipeline.run(&source, |_| {});

        match result {
            Err(PipelineError::SchemaMismatch(message)) => {
                assert!(message.contains("evident_root_cause"))
            }
            other => panic!("Expected SchemaMismatch, got {:?}", other),
        }
        assert_eq!(provider.call_count(), 0);
    }

    #[test]
    fn test_store_schema_mismatch_before_any_request() {
        let store = MemoryStore {
            problems: vec!["column 'number' is missing".to_string()],
            ..MemoryStore::default()
        };
        let provider = MockProvider::new("Yes");
        let mut pipeline = pipeline(provider.clone(), store, 10, 2);

        let result = pipeline.process(rows(4), |_| {});

        match result {
            Err(PipelineError::SchemaMismatch(message)) => assert!(message.contains("'number'")),
            other => panic!("Expected SchemaMismatch, got {:?}", other),
        }
        assert_eq!(provider.call_count(), 0);
    }

    #[test]
    fn test_empty_batch_is_a_no_op() {
        let provider = MockProvider::new("Yes");
        let mut pipeline = pipeline(provider.clone(), MemoryStore::default(), 10, 2);

        let report = pipeline.process(Vec::new(), |_| panic!("no minibatch expected")).unwrap();

        assert_eq!(report.minibatches, 0);
        assert_eq!(provider.call_count(), 0);
    }

    #[test]
    fn test_reject_policy_blocks_unclear_verdict() {
        let mut provider = MockProvider::new("Yes");
        provider.add_response("INC0003", "Perhaps a network issue");
        let mut pipeline = Pipeline::new(
            provider,
            MemoryStore::default(),
            "sys",
            PipelineConfig {
                verdict_policy: VerdictPolicy::Reject,
                ..PipelineConfig::with_sizes(10, 2)
            },
        );

        let result = pipeline.process(rows(6), |_| {});

        assert!(matches!(
            result,
            Err(PipelineError::VerdictRejected { ref number, .. }) if number == "INC0003"
        ));
        assert_eq!(pipeline.store().appends, vec![2]);
    }

    #[test]
    fn test_warn_policy_stores_unclear_verdict() {
        let provider = MockProvider::new("Perhaps");
        let mut pipeline = Pipeline::new(
            provider,
            MemoryStore::default(),
            "sys",
            PipelineConfig {
                verdict_policy: VerdictPolicy::Warn,
                ..PipelineConfig::with_sizes(10, 2)
            },
        );

        pipeline.process(rows(3), |_| {}).unwrap();
        assert!(pipeline
            .store()
            .rows
            .iter()
            .all(|r| r.evident_root_cause == "Perhaps"));
    }
}
