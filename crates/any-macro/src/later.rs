//! Deferred event posting.

use crate::HostEvent;

use std::{sync::mpsc, thread, time::Duration};

use tracing::warn;

/// Posts an event at the end of the event queue, optionally after a delay.
///
/// A zero delay sends immediately (the channel is the queue, so the event
/// still runs after everything already enqueued). A non-zero delay spawns a
/// sleeper thread whose only job is to re-enter the event loop through the
/// channel; it shares no state with the loop.
pub(crate) fn run_later(tx: mpsc::Sender<HostEvent>, event: HostEvent, delay: Duration) {
    if delay.is_zero() {
        if tx.send(event).is_err() {
            warn!("Event queue closed, dropping deferred event");
        }
        return;
    }

    thread::spawn(move || {
        thread::sleep(delay);
        if tx.send(event).is_err() {
            warn!("Event queue closed, dropping deferred event");
        }
    });
}
