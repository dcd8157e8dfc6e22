use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;

use playrithm::{
    sample_metrics, start_run, start_run_with_rng, MetricSample, RunOutcome, TrainingRunConfig,
    TrainingSession,
};

fn config(dataset: &str, epochs: usize, interval_ms: u64) -> TrainingRunConfig {
    TrainingRunConfig::new(dataset, epochs, 0.01).with_tick_interval(Duration::from_millis(interval_ms))
}

#[test]
fn full_run_emits_every_epoch_then_completes_once() {
    let (tx, rx) = mpsc::channel();
    let completions = Arc::new(AtomicUsize::new(0));
    let c = completions.clone();

    let handle = start_run(
        config("iris", 12, 1),
        move |s: MetricSample| tx.send(s).unwrap(),
        move || {
            c.fetch_add(1, Ordering::SeqCst);
        },
    )
    .unwrap();

    assert_eq!(handle.join().unwrap(), RunOutcome::Completed { epochs: 12 });
    let samples: Vec<MetricSample> = rx.iter().collect();
    let epochs: Vec<usize> = samples.iter().map(|s| s.epoch).collect();
    assert_eq!(epochs, (1..=12).collect::<Vec<_>>());
    assert_eq!(completions.load(Ordering::SeqCst), 1);

    for s in &samples {
        assert_eq!(s.total_epochs, 12);
        assert!(s.accuracy <= 0.99);
        assert!(s.loss >= 0.01);
        assert_eq!(s.has_validation(), s.epoch == 5 || s.epoch == 10 || s.epoch == 12);
    }
}

#[test]
fn cancel_before_first_tick_emits_nothing() {
    let samples = Arc::new(AtomicUsize::new(0));
    let completions = Arc::new(AtomicUsize::new(0));
    let (s, c) = (samples.clone(), completions.clone());

    let handle = start_run(
        config("mnist", 10, 200),
        move |_| {
            s.fetch_add(1, Ordering::SeqCst);
        },
        move || {
            c.fetch_add(1, Ordering::SeqCst);
        },
    )
    .unwrap();
    handle.cancel();

    assert_eq!(handle.join().unwrap(), RunOutcome::Cancelled { epochs_emitted: 0 });
    assert_eq!(samples.load(Ordering::SeqCst), 0);
    assert_eq!(completions.load(Ordering::SeqCst), 0);
}

#[test]
fn cancel_mid_run_keeps_delivered_samples_and_skips_completion() {
    let k = 4;
    let (sample_tx, sample_rx) = mpsc::channel();
    let (go_tx, go_rx) = mpsc::channel::<()>();
    let completions = Arc::new(AtomicUsize::new(0));
    let c = completions.clone();

    // Each callback blocks until the test lets it go, so the cancel lands at
    // a known point.
    let handle = start_run(
        config("boston", 20, 1),
        move |s: MetricSample| {
            sample_tx.send(s.epoch).unwrap();
            let _ = go_rx.recv();
        },
        move || {
            c.fetch_add(1, Ordering::SeqCst);
        },
    )
    .unwrap();

    for i in 1..=k {
        assert_eq!(sample_rx.recv().unwrap(), i);
        if i == k {
            handle.cancel();
        }
        go_tx.send(()).unwrap();
    }

    assert_eq!(handle.join().unwrap(), RunOutcome::Cancelled { epochs_emitted: k });
    assert_eq!(sample_rx.try_iter().count(), 0);
    assert_eq!(completions.load(Ordering::SeqCst), 0);
}

#[test]
fn cancel_through_token_from_inside_callback() {
    let emitted = Arc::new(Mutex::new(Vec::new()));
    let token_slot: Arc<Mutex<Option<playrithm::CancelToken>>> = Arc::new(Mutex::new(None));
    let (e, slot) = (emitted.clone(), token_slot.clone());

    let handle = start_run(
        config("cifar", 50, 20),
        move |s: MetricSample| {
            e.lock().unwrap().push(s.epoch);
            if s.epoch == 3 {
                if let Some(token) = slot.lock().unwrap().as_ref() {
                    token.cancel();
                }
            }
        },
        || panic!("cancelled run must not complete"),
    )
    .unwrap();
    *token_slot.lock().unwrap() = Some(handle.cancel_token());

    assert_eq!(handle.join().unwrap(), RunOutcome::Cancelled { epochs_emitted: 3 });
    assert_eq!(*emitted.lock().unwrap(), vec![1, 2, 3]);
}

#[test]
fn session_replacement_is_last_writer_wins() {
    let log: Arc<Mutex<Vec<(char, usize)>>> = Arc::new(Mutex::new(Vec::new()));
    let first_completed = Arc::new(AtomicUsize::new(0));
    let second_completed = Arc::new(AtomicUsize::new(0));

    let mut session = TrainingSession::new();

    let (l, fc) = (log.clone(), first_completed.clone());
    session
        .start(
            config("mnist", 1000, 5),
            move |s| l.lock().unwrap().push(('a', s.epoch)),
            move || {
                fc.fetch_add(1, Ordering::SeqCst);
            },
        )
        .unwrap();
    thread::sleep(Duration::from_millis(60));
    assert!(session.is_running());

    let (l, sc) = (log.clone(), second_completed.clone());
    session
        .start(
            config("iris", 3, 1),
            move |s| l.lock().unwrap().push(('b', s.epoch)),
            move || {
                sc.fetch_add(1, Ordering::SeqCst);
            },
        )
        .unwrap();
    assert_eq!(session.wait().unwrap(), Some(RunOutcome::Completed { epochs: 3 }));

    let log = log.lock().unwrap();
    let first_b = log.iter().position(|(run, _)| *run == 'b').unwrap();
    assert!(log[..first_b].iter().all(|(run, _)| *run == 'a'));
    assert_eq!(
        log[first_b..].iter().map(|(run, e)| (*run, *e)).collect::<Vec<_>>(),
        vec![('b', 1), ('b', 2), ('b', 3)]
    );
    // The first run's epochs are still contiguous from 1.
    for (i, (_, epoch)) in log[..first_b].iter().enumerate() {
        assert_eq!(*epoch, i + 1);
    }
    assert_eq!(first_completed.load(Ordering::SeqCst), 0);
    assert_eq!(second_completed.load(Ordering::SeqCst), 1);
}

#[test]
fn seeded_runs_are_reproducible() {
    let collect = |seed: u64| {
        let (tx, rx) = mpsc::channel();
        let handle = start_run(
            config("xyz", 10, 0).with_seed(seed),
            move |s: MetricSample| tx.send(s).unwrap(),
            || {},
        )
        .unwrap();
        handle.join().unwrap();
        rx.iter().collect::<Vec<MetricSample>>()
    };

    let a = collect(2024);
    let b = collect(2024);
    assert_eq!(a, b);
    assert!(a.iter().all(|s| s.accuracy <= 0.95));
    assert_ne!(a, collect(2025));
}

#[test]
fn session_cancelled_from_its_own_callback_stops_without_deadlock() {
    let k = 3;
    let session = Arc::new(Mutex::new(TrainingSession::new()));
    let (sample_tx, sample_rx) = mpsc::channel();
    let (outcome_tx, outcome_rx) = mpsc::channel();
    let completions = Arc::new(AtomicUsize::new(0));
    let (inner, c) = (session.clone(), completions.clone());

    session
        .lock()
        .unwrap()
        .start(
            config("mnist", 50, 1),
            move |s: MetricSample| {
                sample_tx.send(s.epoch).unwrap();
                if s.epoch == k {
                    // The run cannot join itself, so there is no outcome to report.
                    outcome_tx.send(inner.lock().unwrap().cancel()).unwrap();
                }
            },
            move || {
                c.fetch_add(1, Ordering::SeqCst);
            },
        )
        .unwrap();

    // The sender lives in the run's callback, so this ends when the loop exits.
    let epochs: Vec<usize> = sample_rx.iter().collect();
    assert_eq!(epochs, vec![1, 2, 3]);
    assert_eq!(outcome_rx.recv().unwrap(), None);
    assert_eq!(completions.load(Ordering::SeqCst), 0);

    let session = session.lock().unwrap();
    assert!(!session.is_running());
    assert_eq!(session.active_run_id(), None);
}

#[test]
fn caller_supplied_rng_drives_the_samples() {
    let total = 8;
    let (tx, rx) = mpsc::channel();
    let handle = start_run_with_rng(
        config("boston", total, 0),
        StdRng::seed_from_u64(42),
        move |s: MetricSample| tx.send(s).unwrap(),
        || {},
    )
    .unwrap();
    assert_eq!(handle.join().unwrap(), RunOutcome::Completed { epochs: total });

    let mut rng = StdRng::seed_from_u64(42);
    let expected: Vec<MetricSample> = (1..=total)
        .map(|epoch| sample_metrics(epoch, total, "boston", &mut rng).unwrap())
        .collect();
    assert_eq!(rx.iter().collect::<Vec<_>>(), expected);
}
