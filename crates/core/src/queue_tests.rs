use super::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::time::{sleep, Duration};

/// Tracks how many writes are in flight and the highest count seen
#[derive(Clone, Default)]
struct InFlight {
    current: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
}

impl InFlight {
    fn enter(&self) {
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
    }

    fn exit(&self) {
        self.current.fetch_sub(1, Ordering::SeqCst);
    }

    fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

#[tokio::test]
async fn serial_queue_never_overlaps_writes() {
    let in_flight = InFlight::default();
    let tracker = in_flight.clone();
    let queue = WriteQueue::new(1, DEFAULT_DEPTH, move |_: u32| {
        let tracker = tracker.clone();
        async move {
            tracker.enter();
            sleep(Duration::from_millis(15)).await;
            tracker.exit();
            Ok(())
        }
    });

    let a = queue.submit(1).await.unwrap();
    let b = queue.submit(2).await.unwrap();
    let c = queue.submit(3).await.unwrap();
    a.wait().await.unwrap();
    b.wait().await.unwrap();
    c.wait().await.unwrap();

    assert_eq!(in_flight.peak(), 1);
}

#[tokio::test]
async fn concurrency_two_caps_in_flight_writes() {
    let in_flight = InFlight::default();
    let tracker = in_flight.clone();
    let queue = WriteQueue::new(2, DEFAULT_DEPTH, move |delay_ms: u64| {
        let tracker = tracker.clone();
        async move {
            tracker.enter();
            sleep(Duration::from_millis(delay_ms)).await;
            tracker.exit();
            Ok(())
        }
    });

    let mut pending = Vec::new();
    for delay in [30, 10, 20, 5] {
        pending.push(queue.submit(delay).await.unwrap());
    }
    for p in pending {
        p.wait().await.unwrap();
    }

    assert!(in_flight.peak() <= 2, "peak was {}", in_flight.peak());
    assert_eq!(in_flight.peak(), 2);
}

#[tokio::test]
async fn items_start_in_submission_order() {
    let starts = Arc::new(Mutex::new(Vec::new()));
    let recorder = starts.clone();
    let queue = WriteQueue::new(2, DEFAULT_DEPTH, move |id: u32| {
        let recorder = recorder.clone();
        async move {
            recorder.lock().unwrap().push(id);
            sleep(Duration::from_millis(5)).await;
            Ok(())
        }
    });

    let mut pending = Vec::new();
    for id in [10, 20, 30, 40] {
        pending.push(queue.submit(id).await.unwrap());
    }
    for p in pending {
        p.wait().await.unwrap();
    }

    assert_eq!(*starts.lock().unwrap(), vec![10, 20, 30, 40]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn starts_stay_ordered_across_worker_threads() {
    let starts = Arc::new(Mutex::new(Vec::new()));
    let recorder = starts.clone();
    let queue = WriteQueue::new(8, DEFAULT_DEPTH, move |id: u32| {
        let recorder = recorder.clone();
        async move {
            recorder.lock().unwrap().push(id);
            sleep(Duration::from_millis(3)).await;
            Ok(())
        }
    });

    let mut pending = Vec::new();
    for id in 0..16 {
        pending.push(queue.submit(id).await.unwrap());
    }
    for p in pending {
        p.wait().await.unwrap();
    }

    let recorded = starts.lock().unwrap().clone();
    assert_eq!(recorded, (0..16).collect::<Vec<u32>>());
}

#[tokio::test]
async fn one_failing_item_does_not_halt_the_queue() {
    let queue = WriteQueue::new(1, DEFAULT_DEPTH, move |id: u32| async move {
        if id == 2 {
            Err(StoreError::Other(format!("write {} failed", id)))
        } else {
            Ok(())
        }
    });

    let first = queue.submit(1).await.unwrap();
    let second = queue.submit(2).await.unwrap();
    let third = queue.submit(3).await.unwrap();

    assert!(first.wait().await.is_ok());
    match second.wait().await {
        Err(StoreError::Other(message)) => assert_eq!(message, "write 2 failed"),
        other => panic!("expected write failure, got {:?}", other),
    }
    assert!(third.wait().await.is_ok());
}

#[tokio::test]
async fn push_waits_for_completion() {
    let completed = Arc::new(AtomicUsize::new(0));
    let counter = completed.clone();
    let queue = WriteQueue::new(1, DEFAULT_DEPTH, move |_: u32| {
        let counter = counter.clone();
        async move {
            sleep(Duration::from_millis(10)).await;
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    });

    queue.push(1).await.unwrap();
    assert_eq!(completed.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn zero_concurrency_is_coerced_to_one() {
    let in_flight = InFlight::default();
    let tracker = in_flight.clone();
    let queue = WriteQueue::new(0, DEFAULT_DEPTH, move |_: u32| {
        let tracker = tracker.clone();
        async move {
            tracker.enter();
            sleep(Duration::from_millis(5)).await;
            tracker.exit();
            Ok(())
        }
    });

    let a = queue.submit(1).await.unwrap();
    let b = queue.submit(2).await.unwrap();
    a.wait().await.unwrap();
    b.wait().await.unwrap();

    assert_eq!(in_flight.peak(), 1);
}
