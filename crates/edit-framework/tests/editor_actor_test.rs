use async_trait::async_trait;
use edit_framework::{
    BatchFailure, BatchResource, Change, EditorActor, FrameworkError, Phase, SessionError,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

// --- Scripted resource ---

#[derive(Debug, thiserror::Error)]
enum CountError {
    #[error("value {0} is above the limit")]
    TooLarge(u32),
    #[error("backend unavailable")]
    Unavailable,
}

/// Records every batch; can hold commits open or fail them.
#[derive(Default)]
struct Script {
    batches: Mutex<Vec<Vec<Change<u32, u32>>>>,
    fail_applied: Mutex<Option<Vec<u32>>>,
    hold: AtomicBool,
    release: Notify,
    hang: AtomicBool,
}

impl Script {
    fn batches(&self) -> Vec<Vec<Change<u32, u32>>> {
        self.batches.lock().unwrap().clone()
    }

    fn fail_next(&self, applied: Vec<u32>) {
        *self.fail_applied.lock().unwrap() = Some(applied);
    }
}

struct Counts;

#[async_trait]
impl BatchResource for Counts {
    type Id = u32;
    type Value = u32;
    type Context = Arc<Script>;
    type Error = CountError;

    fn validate(_id: &u32, value: &u32) -> Result<(), CountError> {
        if *value > 1000 {
            return Err(CountError::TooLarge(*value));
        }
        Ok(())
    }

    async fn commit(
        batch: Vec<Change<u32, u32>>,
        ctx: &Arc<Script>,
    ) -> Result<(), BatchFailure<u32, CountError>> {
        ctx.batches.lock().unwrap().push(batch);
        if ctx.hang.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        if ctx.hold.load(Ordering::SeqCst) {
            ctx.release.notified().await;
        }
        let failure = ctx.fail_applied.lock().unwrap().take();
        match failure {
            Some(applied) => Err(BatchFailure::new(CountError::Unavailable).with_applied(applied)),
            None => Ok(()),
        }
    }
}

fn start(
    script: &Arc<Script>,
    timeout: Duration,
) -> (
    edit_framework::EditorClient<Counts>,
    tokio::task::JoinHandle<()>,
) {
    let (actor, client) = EditorActor::<Counts>::new(16, timeout);
    let handle = tokio::spawn(actor.run(script.clone()));
    (client, handle)
}

// --- Tests ---

#[tokio::test]
async fn test_commit_sends_single_ordered_batch() {
    let script = Arc::new(Script::default());
    let (client, handle) = start(&script, Duration::from_secs(5));

    client
        .refresh_baseline(vec![(3, 0), (5, 9), (7, 0)])
        .await
        .unwrap();
    client.set_value(7, 2).await.unwrap();
    client.set_value(3, 5).await.unwrap();

    let report = client.commit().await.unwrap();
    assert_eq!(report.committed, 2);

    let batches = script.batches();
    assert_eq!(batches.len(), 1, "exactly one write call");
    assert_eq!(batches[0], vec![Change::new(3, 5), Change::new(7, 2)]);

    let view = client.snapshot().await.unwrap();
    assert_eq!(view.phase, Phase::Clean);
    assert!(view.pending.is_empty());
    assert_eq!(view.displayed, view.baseline);
    assert_eq!(view.baseline.get(&3), Some(&5));

    drop(client);
    handle.await.unwrap();
}

#[tokio::test]
async fn test_commit_with_nothing_pending_is_noop() {
    let script = Arc::new(Script::default());
    let (client, _handle) = start(&script, Duration::from_secs(5));

    client.refresh_baseline(vec![(1, 1)]).await.unwrap();
    let report = client.commit().await.unwrap();

    assert_eq!(report.seq, None);
    assert_eq!(report.committed, 0);
    assert!(script.batches().is_empty());
}

#[tokio::test]
async fn test_failed_commit_preserves_edits() {
    let script = Arc::new(Script::default());
    let (client, _handle) = start(&script, Duration::from_secs(5));

    client.refresh_baseline(vec![(3, 0), (7, 0)]).await.unwrap();
    client.set_value(3, 5).await.unwrap();
    client.set_value(7, 2).await.unwrap();
    let before = client.snapshot().await.unwrap();

    script.fail_next(vec![]);
    let result = client.commit().await;
    assert!(matches!(result, Err(FrameworkError::ResourceError(_))));

    let after = client.snapshot().await.unwrap();
    assert_eq!(after.pending, before.pending);
    assert_eq!(after.displayed, before.displayed);
    assert_eq!(after.phase, Phase::Dirty);

    // retry succeeds with the same batch
    client.commit().await.unwrap();
    assert_eq!(script.batches()[1], script.batches()[0]);
}

#[tokio::test]
async fn test_partial_failure_keeps_only_unapplied_pending() {
    let script = Arc::new(Script::default());
    let (client, _handle) = start(&script, Duration::from_secs(5));

    client.refresh_baseline(vec![(3, 0), (7, 0)]).await.unwrap();
    client.set_value(3, 5).await.unwrap();
    client.set_value(7, 2).await.unwrap();

    script.fail_next(vec![3]);
    assert!(client.commit().await.is_err());

    let view = client.snapshot().await.unwrap();
    assert_eq!(view.baseline.get(&3), Some(&5));
    assert!(!view.pending.contains_key(&3));
    assert_eq!(view.pending.get(&7), Some(&2));
}

#[tokio::test]
async fn test_edits_continue_while_committing() {
    let script = Arc::new(Script::default());
    script.hold.store(true, Ordering::SeqCst);
    let (client, _handle) = start(&script, Duration::from_secs(5));

    client.refresh_baseline(vec![(1, 10), (2, 20)]).await.unwrap();
    client.set_value(1, 11).await.unwrap();

    let committer = client.clone();
    let commit = tokio::spawn(async move { committer.commit().await });

    // wait until the batch reached the backend
    while script.batches().is_empty() {
        tokio::task::yield_now().await;
    }
    assert_eq!(client.snapshot().await.unwrap().phase, Phase::Committing);

    // inputs stay interactive, the commit affordance does not
    assert_eq!(client.set_value(2, 21).await.unwrap(), Phase::Committing);
    client.set_value(1, 12).await.unwrap();
    let second = client.commit().await;
    assert!(matches!(
        second,
        Err(FrameworkError::Session(SessionError::CommitInFlight))
    ));

    script.release.notify_one();
    let report = commit.await.unwrap().unwrap();
    assert_eq!(report.committed, 1);

    let view = client.snapshot().await.unwrap();
    assert_eq!(view.phase, Phase::Dirty);
    assert_eq!(view.baseline.get(&1), Some(&11));
    assert_eq!(view.pending.get(&1), Some(&12));
    assert_eq!(view.pending.get(&2), Some(&21));
    assert_eq!(script.batches().len(), 1);
}

#[tokio::test]
async fn test_revert_during_commit_stays_pending_against_new_baseline() {
    let script = Arc::new(Script::default());
    script.hold.store(true, Ordering::SeqCst);
    let (client, _handle) = start(&script, Duration::from_secs(5));

    client.refresh_baseline(vec![(5, 9)]).await.unwrap();
    client.set_value(5, 12).await.unwrap();

    let committer = client.clone();
    let commit = tokio::spawn(async move { committer.commit().await });
    while script.batches().is_empty() {
        tokio::task::yield_now().await;
    }

    // back to the old server value while 12 is being written
    client.set_value(5, 9).await.unwrap();

    script.release.notify_one();
    assert_eq!(commit.await.unwrap().unwrap().committed, 1);

    let view = client.snapshot().await.unwrap();
    assert_eq!(view.phase, Phase::Dirty);
    assert_eq!(view.baseline.get(&5), Some(&12));
    assert_eq!(view.displayed.get(&5), Some(&9));
    assert_eq!(view.pending.get(&5), Some(&9));

    // the revert goes out in the next batch
    script.hold.store(false, Ordering::SeqCst);
    client.commit().await.unwrap();
    assert_eq!(script.batches()[1], vec![Change::new(5, 9)]);
}

#[tokio::test]
async fn test_refresh_does_not_clobber_pending() {
    let script = Arc::new(Script::default());
    let (client, _handle) = start(&script, Duration::from_secs(5));

    client.refresh_baseline(vec![(5, 3)]).await.unwrap();
    client.set_value(5, 12).await.unwrap();

    let phase = client.refresh_baseline(vec![(5, 9)]).await.unwrap();
    assert_eq!(phase, Phase::Dirty);

    let view = client.snapshot().await.unwrap();
    assert_eq!(view.displayed.get(&5), Some(&12));
    assert_eq!(view.pending.get(&5), Some(&12));
}

#[tokio::test]
async fn test_rejected_value_never_reaches_ledger() {
    let script = Arc::new(Script::default());
    let (client, _handle) = start(&script, Duration::from_secs(5));

    client.refresh_baseline(vec![(1, 1)]).await.unwrap();
    let result = client.set_value(1, 5000).await;

    match result {
        Err(FrameworkError::Rejected { id, reason }) => {
            assert_eq!(id, "1");
            assert!(reason.to_string().contains("5000"));
        }
        other => panic!("expected rejection, got {other:?}"),
    }
    assert!(!client.snapshot().await.unwrap().has_pending());
}

#[tokio::test(start_paused = true)]
async fn test_commit_times_out_and_keeps_edits() {
    let script = Arc::new(Script::default());
    script.hang.store(true, Ordering::SeqCst);
    let timeout = Duration::from_millis(500);
    let (client, _handle) = start(&script, timeout);

    client.refresh_baseline(vec![(1, 1)]).await.unwrap();
    client.set_value(1, 2).await.unwrap();

    let result = client.commit().await;
    assert!(matches!(result, Err(FrameworkError::CommitTimeout(d)) if d == timeout));

    let view = client.snapshot().await.unwrap();
    assert_eq!(view.phase, Phase::Dirty);
    assert_eq!(view.pending.get(&1), Some(&2));
}

#[tokio::test]
async fn test_views_are_published() {
    let script = Arc::new(Script::default());
    let (client, _handle) = start(&script, Duration::from_secs(5));
    let mut views = client.subscribe();

    client.refresh_baseline(vec![(1, 1)]).await.unwrap();
    client.set_value(1, 4).await.unwrap();

    views.changed().await.unwrap();
    let view = views.borrow_and_update().clone();
    assert!(view.can_commit());
    assert_eq!(view.displayed.get(&1), Some(&4));
}

#[tokio::test]
async fn test_shutdown_waits_for_in_flight_commit() {
    let script = Arc::new(Script::default());
    script.hold.store(true, Ordering::SeqCst);
    let (client, handle) = start(&script, Duration::from_secs(5));

    client.refresh_baseline(vec![(1, 1)]).await.unwrap();
    client.set_value(1, 2).await.unwrap();

    let committer = client.clone();
    let commit = tokio::spawn(async move { committer.commit().await });
    while script.batches().is_empty() {
        tokio::task::yield_now().await;
    }

    drop(client);
    script.release.notify_one();

    assert_eq!(commit.await.unwrap().unwrap().committed, 1);
    handle.await.unwrap();
}
