use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use signals::{Callback, Delivery, SignalError, SignalRegistry};

const WAIT: Duration = Duration::from_millis(150);

/// Слушатель, записывающий значение общего счётчика в момент вызова.
fn stamp(
    sequence: &Arc<AtomicUsize>,
    seen: &Arc<Mutex<Vec<(&'static str, usize)>>>,
    tag: &'static str,
) -> Callback<()> {
    let sequence = sequence.clone();
    let seen = seen.clone();
    Callback::new(move |_, _| {
        let n = sequence.fetch_add(1, Ordering::SeqCst);
        seen.lock().unwrap().push((tag, n));
    })
}

fn position(
    seen: &[(&'static str, usize)],
    tag: &str,
) -> usize {
    seen.iter()
        .find(|(t, _)| *t == tag)
        .map(|(_, n)| *n)
        .unwrap_or_else(|| panic!("{tag} was not called"))
}

/// Тест проверяет порядок фаз: :before → основной сигнал → :after.
#[tokio::test(start_paused = true)]
async fn test_before_main_after_order() -> Result<(), SignalError> {
    let registry = SignalRegistry::<()>::new()?;
    let sequence = Arc::new(AtomicUsize::new(0));
    let seen = Arc::new(Mutex::new(Vec::new()));

    registry.subscribe("dynamic:event:after", stamp(&sequence, &seen, "after"), None)?;
    registry.subscribe("dynamic:event", stamp(&sequence, &seen, "main"), None)?;
    registry.subscribe("dynamic:event:before", stamp(&sequence, &seen, "before"), None)?;

    registry.broadcast("dynamic:event", None);
    tokio::time::sleep(WAIT).await;

    let seen = seen.lock().unwrap().clone();
    assert_eq!(seen.len(), 3);
    assert!(position(&seen, "before") < position(&seen, "main"));
    assert!(position(&seen, "main") < position(&seen, "after"));
    Ok(())
}

/// Тест проверяет, что все слушатели :before и основной фазы завершаются до
/// начала :after, даже когда их несколько.
#[tokio::test(start_paused = true)]
async fn test_after_waits_for_every_listener() -> Result<(), SignalError> {
    let registry = SignalRegistry::<()>::new()?;
    let sequence = Arc::new(AtomicUsize::new(0));
    let seen = Arc::new(Mutex::new(Vec::new()));

    registry.subscribe(
        "s:before",
        vec![
            stamp(&sequence, &seen, "b1"),
            stamp(&sequence, &seen, "b2"),
        ],
        None,
    )?;
    registry.subscribe(
        "s",
        vec![
            stamp(&sequence, &seen, "m1"),
            stamp(&sequence, &seen, "m2"),
            stamp(&sequence, &seen, "m3"),
        ],
        None,
    )?;
    registry.subscribe(
        "s:after",
        vec![stamp(&sequence, &seen, "a1"), stamp(&sequence, &seen, "a2")],
        None,
    )?;

    registry.broadcast("s", None);
    tokio::time::sleep(WAIT).await;

    let tags: Vec<_> = seen.lock().unwrap().iter().map(|(t, _)| *t).collect();
    assert_eq!(tags, vec!["b1", "b2", "m1", "m2", "m3", "a1", "a2"]);
    Ok(())
}

/// Тест проверяет, что фазовые слушатели без основного сигнала не
/// вызываются: broadcast для ненаблюдаемого сигнала ничего не делает.
#[tokio::test(start_paused = true)]
async fn test_phases_without_main_signal_are_ignored() -> Result<(), SignalError> {
    let registry = SignalRegistry::<()>::new()?;
    let sequence = Arc::new(AtomicUsize::new(0));
    let seen = Arc::new(Mutex::new(Vec::new()));
    registry.subscribe("lonely:before", stamp(&sequence, &seen, "before"), None)?;

    registry.broadcast("lonely", None);
    tokio::time::sleep(WAIT).await;

    assert!(seen.lock().unwrap().is_empty());
    assert!(!registry.is_observable("lonely"));
    Ok(())
}

/// Тест проверяет шаг троттлинга: соседние слушатели разнесены на `step`.
#[tokio::test(start_paused = true)]
async fn test_throttle_step_spacing() -> Result<(), SignalError> {
    let step = Duration::from_millis(25);
    let registry = SignalRegistry::<()>::with_delivery(Delivery::throttled(step))?;
    let times = Arc::new(Mutex::new(Vec::new()));
    let start = tokio::time::Instant::now();

    for _ in 0..3 {
        let times = times.clone();
        registry.listen("s", move |_, _| {
            times.lock().unwrap().push(start.elapsed());
        });
    }

    registry.broadcast("s", None);
    tokio::time::sleep(registry.delivery().settle_time(3)).await;

    let times = times.lock().unwrap().clone();
    assert_eq!(times.len(), 3);
    assert!(times[1] - times[0] >= step);
    assert!(times[2] - times[1] >= step);
    Ok(())
}

/// Тест фиксирует повторный вход: слушатель, добавленный во время доставки,
/// ждёт следующего broadcast, а :after текущей доставки вызывается один раз.
#[tokio::test(start_paused = true)]
async fn test_reentrant_subscribe_during_dispatch() -> Result<(), SignalError> {
    let registry = SignalRegistry::<()>::new()?;
    let late_hits = Arc::new(AtomicUsize::new(0));
    let after_hits = Arc::new(AtomicUsize::new(0));

    let inner = registry.clone();
    let late_hits_cb = late_hits.clone();
    registry.listen("s", move |_, _| {
        let late_hits = late_hits_cb.clone();
        inner.listen("s", move |_, _| {
            late_hits.fetch_add(1, Ordering::SeqCst);
        });
    });
    let after_hits_cb = after_hits.clone();
    registry.listen("s:after", move |_, _| {
        after_hits_cb.fetch_add(1, Ordering::SeqCst);
    });

    registry.broadcast("s", None);
    tokio::time::sleep(WAIT).await;

    assert_eq!(registry.listener_count("s"), 2);
    assert_eq!(late_hits.load(Ordering::SeqCst), 0);
    assert_eq!(after_hits.load(Ordering::SeqCst), 1);

    registry.broadcast("s", None);
    tokio::time::sleep(WAIT).await;

    assert_eq!(registry.listener_count("s"), 3);
    assert_eq!(late_hits.load(Ordering::SeqCst), 1);
    assert_eq!(after_hits.load(Ordering::SeqCst), 2);
    Ok(())
}

/// Тест проверяет, что слушатель, подписанный сразу после broadcast, не
/// попадает в уже запланированную доставку и не опережает :after.
#[tokio::test(start_paused = true)]
async fn test_listener_added_after_broadcast_waits() -> Result<(), SignalError> {
    let registry = SignalRegistry::<()>::new()?;
    let sequence = Arc::new(AtomicUsize::new(0));
    let seen = Arc::new(Mutex::new(Vec::new()));

    registry.subscribe("s:before", stamp(&sequence, &seen, "before"), None)?;
    registry.subscribe("s", stamp(&sequence, &seen, "main1"), None)?;
    registry.subscribe("s:after", stamp(&sequence, &seen, "after"), None)?;

    registry.broadcast("s", None);
    registry.subscribe("s", stamp(&sequence, &seen, "main2"), None)?;
    tokio::time::sleep(WAIT).await;

    let tags: Vec<_> = seen.lock().unwrap().iter().map(|(t, _)| *t).collect();
    assert_eq!(tags, vec!["before", "main1", "after"]);

    seen.lock().unwrap().clear();
    registry.broadcast("s", None);
    tokio::time::sleep(WAIT).await;

    let tags: Vec<_> = seen.lock().unwrap().iter().map(|(t, _)| *t).collect();
    assert_eq!(tags, vec!["before", "main1", "main2", "after"]);
    Ok(())
}

/// Тест фиксирует ограничение: паника слушателя останавливает оставшихся
/// слушателей и фазу :after этой доставки, но не сам реестр.
#[tokio::test(start_paused = true)]
async fn test_panicking_listener_stops_sequence() -> Result<(), SignalError> {
    let registry = SignalRegistry::<()>::new()?;
    let hits = Arc::new(AtomicUsize::new(0));

    let bomb = registry.listen("s", |_, _| panic!("listener failure"));
    for tag in ["s", "s:after"] {
        let hits = hits.clone();
        registry.listen(tag, move |_, _| {
            hits.fetch_add(1, Ordering::SeqCst);
        });
    }

    registry.broadcast("s", None);
    tokio::time::sleep(WAIT).await;
    assert_eq!(hits.load(Ordering::SeqCst), 0);

    // После отписки проблемного слушателя доставка снова работает.
    registry.unsubscribe("s", &bomb);
    registry.broadcast("s", None);
    tokio::time::sleep(WAIT).await;
    assert_eq!(hits.load(Ordering::SeqCst), 2);
    Ok(())
}
