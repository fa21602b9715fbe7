//! Delayed hand-off of callbacks to the main context.
//!
//! Jobs are released in deadline order. Jobs with the same deadline keep
//! the order they were scheduled in, and a job with a later deadline never
//! holds back one with an earlier deadline.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};
use tracing::debug;

use super::main_context::{MainContext, MainJob};

/// Far enough ahead that the idle timer branch never fires.
const IDLE_PARK: Duration = Duration::from_secs(86_400);

struct Pending {
    deadline: Instant,
    seq: u64,
    job: MainJob,
}

impl PartialEq for Pending {
    fn eq(&self, other: &Self) -> bool {
        self.deadline == other.deadline && self.seq == other.seq
    }
}

impl Eq for Pending {}

impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pending {
    // Reversed so the max-heap pops the earliest deadline first.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .deadline
            .cmp(&self.deadline)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Handle used to schedule jobs for delayed delivery.
#[derive(Debug, Clone)]
pub struct DeliveryScheduler {
    tx: mpsc::UnboundedSender<(Instant, MainJob)>,
}

impl DeliveryScheduler {
    /// Spawn the scheduler loop, forwarding due jobs to `main`.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn spawn(main: MainContext) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(run(rx, main));
        Self { tx }
    }

    /// Release `job` to the main context at `deadline`.
    pub fn schedule_at(&self, deadline: Instant, job: MainJob) -> bool {
        self.tx.send((deadline, job)).is_ok()
    }
}

async fn run(mut rx: mpsc::UnboundedReceiver<(Instant, MainJob)>, main: MainContext) {
    let mut queue: BinaryHeap<Pending> = BinaryHeap::new();
    let mut seq: u64 = 0;
    let mut closed = false;

    loop {
        let next = queue.peek().map(|pending| pending.deadline);
        if closed && next.is_none() {
            break;
        }
        let wake_at = next.unwrap_or_else(|| Instant::now() + IDLE_PARK);

        tokio::select! {
            biased;

            msg = rx.recv(), if !closed => match msg {
                Some((deadline, job)) => {
                    queue.push(Pending { deadline, seq, job });
                    seq += 1;
                }
                None => closed = true,
            },
            _ = sleep_until(wake_at), if next.is_some() => {
                let now = Instant::now();
                while queue.peek().is_some_and(|pending| pending.deadline <= now) {
                    if let Some(pending) = queue.pop() {
                        if !main.post(pending.job) {
                            debug!("main context gone, dropping scheduled delivery");
                        }
                    }
                }
            }
        }
    }

    debug!("delivery scheduler stopped");
}
