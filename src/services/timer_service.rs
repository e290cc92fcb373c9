use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{self, Instant};

const TICK_PERIOD: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    Tick { remaining: u32 },
    Expired,
}

/// Pure countdown: one decrement per `tick`, expiry reported exactly once.
#[derive(Debug, Clone)]
pub struct Countdown {
    remaining: u32,
    expired: bool,
}

impl Countdown {
    pub fn new(seconds: u32) -> Self {
        Self {
            remaining: seconds,
            expired: false,
        }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_expired(&self) -> bool {
        self.expired
    }

    /// Returns `None` once expiry has already been reported.
    pub fn tick(&mut self) -> Option<TimerEvent> {
        if self.expired {
            return None;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.expired = true;
            Some(TimerEvent::Expired)
        } else {
            Some(TimerEvent::Tick {
                remaining: self.remaining,
            })
        }
    }
}

/// Owns the task driving a countdown. Dropping the handle stops the task.
#[derive(Debug)]
pub struct TimerHandle {
    task: JoinHandle<()>,
}

impl TimerHandle {
    pub fn cancel(self) {
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Spawns a task emitting one event per second until the countdown expires.
pub fn spawn_countdown<F, Fut>(seconds: u32, mut on_event: F) -> TimerHandle
where
    F: FnMut(TimerEvent) -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    let task = tokio::spawn(async move {
        let mut countdown = Countdown::new(seconds);
        let mut interval = time::interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
        loop {
            interval.tick().await;
            let Some(event) = countdown.tick() else {
                break;
            };
            on_event(event).await;
            if event == TimerEvent::Expired {
                tracing::debug!("Countdown of {}s expired", seconds);
                break;
            }
        }
    });
    TimerHandle { task }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn counts_down_and_expires_once() {
        let mut countdown = Countdown::new(3);
        assert_eq!(countdown.tick(), Some(TimerEvent::Tick { remaining: 2 }));
        assert_eq!(countdown.tick(), Some(TimerEvent::Tick { remaining: 1 }));
        assert_eq!(countdown.tick(), Some(TimerEvent::Expired));
        assert!(countdown.is_expired());
        assert_eq!(countdown.tick(), None);
        assert_eq!(countdown.tick(), None);
        assert_eq!(countdown.remaining(), 0);
    }

    #[test]
    fn zero_duration_expires_on_first_tick() {
        let mut countdown = Countdown::new(0);
        assert_eq!(countdown.tick(), Some(TimerEvent::Expired));
        assert_eq!(countdown.tick(), None);
    }

    fn recorder() -> (Arc<Mutex<Vec<TimerEvent>>>, impl FnMut(TimerEvent) -> std::future::Ready<()>) {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        let on_event = move |event| {
            sink.lock().unwrap().push(event);
            std::future::ready(())
        };
        (events, on_event)
    }

    #[tokio::test(start_paused = true)]
    async fn spawned_countdown_ticks_every_second_then_stops() {
        let (events, on_event) = recorder();
        let handle = spawn_countdown(3, on_event);

        time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(*events.lock().unwrap(), vec![TimerEvent::Tick { remaining: 2 }]);

        time::sleep(Duration::from_secs(10)).await;
        assert_eq!(
            *events.lock().unwrap(),
            vec![
                TimerEvent::Tick { remaining: 2 },
                TimerEvent::Tick { remaining: 1 },
                TimerEvent::Expired,
            ]
        );
        assert!(handle.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_countdown_stops_ticking() {
        let (events, on_event) = recorder();
        let handle = spawn_countdown(60, on_event);

        time::sleep(Duration::from_millis(2500)).await;
        handle.cancel();
        time::sleep(Duration::from_secs(120)).await;

        assert_eq!(events.lock().unwrap().len(), 2);
    }
}
