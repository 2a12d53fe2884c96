use super::*;

#[test]
fn unknown_ticket_is_not_found() {
    let store = ResultStore::new();
    assert_eq!(store.poll(7), None);
    assert_eq!(store.status(7), PollStatus::Unknown);
}

#[test]
fn pending_ticket_is_not_consumed() {
    let store = ResultStore::new();
    store.mark_pending(0);

    assert_eq!(store.poll(0), None);
    assert_eq!(store.status(0), PollStatus::Pending);
    assert_eq!(store.len(), 1);
}

#[test]
fn ready_result_is_read_exactly_once() {
    let store = ResultStore::new();
    store.mark_pending(3);
    store.deposit(3, Completed::records("<game></game>".to_string(), 1));

    assert_eq!(store.status(3), PollStatus::Ready);
    assert_eq!(store.poll(3).as_deref(), Some("<game></game>"));
    assert_eq!(store.poll(3), None);
    assert_eq!(store.status(3), PollStatus::Unknown);
    assert!(store.is_empty());
}

#[test]
fn take_returns_outcome() {
    let store = ResultStore::new();
    store.deposit(1, Completed::failed(FailureKind::UnsupportedFormat, "bad ext"));

    let completed = store.take(1).unwrap();
    assert_eq!(completed.payload, "");
    assert!(completed.is_failure());
    assert_eq!(
        completed.outcome,
        JobOutcome::Failed {
            kind: FailureKind::UnsupportedFormat,
            message: "bad ext".to_string()
        }
    );
}

#[test]
fn empty_record_list_is_not_found_outcome() {
    let completed = Completed::records(String::new(), 0);
    assert_eq!(completed.outcome, JobOutcome::NotFound);
    assert!(!completed.is_failure());
}
