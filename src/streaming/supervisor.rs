//! Joint-lifetime supervision for a session's task pair.
//!
//! Every session runs exactly two tasks: one ingesting inbound messages and
//! one producing outbound results. The instant either finishes — normal
//! completion, transport closure, or error — the other is aborted and
//! awaited. This is join-on-first-completion, not supervision-with-restart:
//! nothing is ever restarted.

use tokio::task::JoinHandle;

/// Which side of a linked pair finished first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FirstDone {
    Left,
    Right,
}

/// Race two tasks; abort and await the survivor once either finishes.
///
/// Abort is cooperative: an in-flight `spawn_blocking` call owned by the
/// aborted task runs to completion on the blocking pool, but its result is
/// dropped. By the time this returns, neither task is running.
pub async fn run_linked<L, R>(left: JoinHandle<L>, right: JoinHandle<R>) -> FirstDone {
    let mut left = left;
    let mut right = right;

    let first = tokio::select! {
        _ = &mut left => FirstDone::Left,
        _ = &mut right => FirstDone::Right,
    };

    match first {
        FirstDone::Left => {
            right.abort();
            let _ = right.await;
        }
        FirstDone::Right => {
            left.abort();
            let _ = left.await;
        }
    }

    first
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_left_finishing_cancels_right() {
        let survived = Arc::new(AtomicBool::new(false));
        let flag = survived.clone();

        let left = tokio::spawn(async {});
        let right = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            flag.store(true, Ordering::SeqCst);
        });

        let first = run_linked(left, right).await;
        assert_eq!(first, FirstDone::Left);

        // The right task was aborted mid-sleep; give it time to prove it
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(!survived.load(Ordering::SeqCst), "aborted task kept running");
    }

    #[tokio::test]
    async fn test_right_finishing_cancels_left() {
        let survived = Arc::new(AtomicBool::new(false));
        let flag = survived.clone();

        let left = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            flag.store(true, Ordering::SeqCst);
        });
        let right = tokio::spawn(async {
            tokio::time::sleep(Duration::from_millis(1)).await;
        });

        let first = run_linked(left, right).await;
        assert_eq!(first, FirstDone::Right);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(!survived.load(Ordering::SeqCst), "aborted task kept running");
    }

    #[tokio::test]
    async fn test_panicking_task_counts_as_finished() {
        let left = tokio::spawn(async {
            panic!("boom");
        });
        let right = tokio::spawn(async {
            std::future::pending::<()>().await;
        });

        // The panic terminates the left task; the pair must still unwind
        let first = run_linked(left, right).await;
        assert_eq!(first, FirstDone::Left);
    }

    #[tokio::test]
    async fn test_returns_promptly_after_first_completion() {
        let start = std::time::Instant::now();

        let left = tokio::spawn(async {
            tokio::time::sleep(Duration::from_millis(10)).await;
        });
        let right = tokio::spawn(async {
            // Would run for a long time if not cancelled
            tokio::time::sleep(Duration::from_secs(30)).await;
        });

        run_linked(left, right).await;
        assert!(
            start.elapsed() < Duration::from_secs(1),
            "supervisor waited for the cancelled task's full sleep"
        );
    }
}
