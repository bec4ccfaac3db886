//! Process shutdown: SIGINT/SIGTERM and end of input both stop the motors.
//!
//! Termination requests are turned into `Event::Shutdown` on the event channel,
//! so the (0, 0) write is dispatched in order behind any pending commands and
//! the engine task exits the process only after it has been issued.

use embassy_sync::{blocking_mutex::raw::RawMutex, channel::Sender};
use futures_lite::future::block_on;
use jove_core::utils::{Event, EVENT_CHANNEL};
use tracing::info;

/// Queue a shutdown behind whatever is already pending.
pub fn request_shutdown<M: RawMutex, const N: usize>(sender: Sender<'_, M, Event, N>) {
    block_on(sender.send(Event::Shutdown));
}

/// Route SIGINT and SIGTERM to a shutdown event.
pub fn install_signal_handler() -> Result<(), ctrlc::Error> {
    ctrlc::set_handler(|| {
        info!("termination signal received, requesting shutdown");
        request_shutdown(EVENT_CHANNEL.sender());
    })
}
