//! Event dispatcher for the engine core.
//!
//! The dispatcher owns every component and delivers one event at a time, to
//! completion, in arrival order. Actuator commands published by the engine are
//! routed back in-process and applied to the multiplexer before the next
//! inbound event is taken; everything else goes to the outbound transport.

use alloc::vec::Vec;

use embassy_sync::{blocking_mutex::raw::RawMutex, channel::Receiver};
use heapless::Deque;

use crate::utils::{
    config::TrainConfig,
    connection::topics::{Event, Publication},
    controllers::{
        actuator::{ActuatorCommand, ActuatorMultiplexer, MotorDriver},
        engine::Engine,
    },
};

/// Outbound side of the publish/subscribe transport.
///
/// Sends are best-effort: the core neither waits for delivery nor retries.
pub trait Publish {
    fn publish(
        &mut self,
        publication: Publication,
    );
}

impl Publish for Vec<Publication> {
    fn publish(
        &mut self,
        publication: Publication,
    ) {
        self.push(publication);
    }
}

impl<P: Publish + ?Sized> Publish for &mut P {
    fn publish(
        &mut self,
        publication: Publication,
    ) {
        (**self).publish(publication);
    }
}

/// Actuator commands a single handler may leave for in-process delivery.
const INTERNAL_CAPACITY: usize = 4;

/// Splits engine publications between the internal queue and the transport.
struct Router<'a, P> {
    outbound: &'a mut P,
    internal: &'a mut Deque<ActuatorCommand, INTERNAL_CAPACITY>,
}

impl<P: Publish> Publish for Router<'_, P> {
    fn publish(
        &mut self,
        publication: Publication,
    ) {
        match publication {
            Publication::Actuator(command) => {
                if let Err(dropped) = self.internal.push_back(command) {
                    tracing::error!(?dropped, "internal actuator queue full");
                }
            }
            other => self.outbound.publish(other),
        }
    }
}

pub struct Dispatcher<D, P> {
    engine: Engine,
    actuator: ActuatorMultiplexer<D>,
    outbound: P,
    internal: Deque<ActuatorCommand, INTERNAL_CAPACITY>,
}

impl<D, P> Dispatcher<D, P>
where
    D: MotorDriver,
    P: Publish,
{
    pub fn new(
        engine: Engine,
        driver: D,
        outbound: P,
    ) -> Self {
        Self {
            engine,
            actuator: ActuatorMultiplexer::new(driver),
            outbound,
            internal: Deque::new(),
        }
    }

    pub fn from_config(
        config: &TrainConfig,
        driver: D,
        outbound: P,
    ) -> Self {
        Self::new(Engine::from_config(config), driver, outbound)
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn actuator(&self) -> &ActuatorMultiplexer<D> {
        &self.actuator
    }

    pub fn outbound(&self) -> &P {
        &self.outbound
    }

    pub fn outbound_mut(&mut self) -> &mut P {
        &mut self.outbound
    }

    /// Handle one event to completion.
    ///
    /// A failed physical write is returned as-is; it is not retried.
    #[tracing::instrument(level = "debug", skip_all, fields(topic = %event.topic()))]
    pub fn dispatch(
        &mut self,
        event: Event,
    ) -> Result<(), D::Error> {
        let mut router = Router {
            outbound: &mut self.outbound,
            internal: &mut self.internal,
        };

        match event {
            Event::Power(power) => self.engine.on_power(power, &mut router),
            Event::Calibration(calibration) => self.engine.on_calibration(calibration, &mut router),
            Event::AllFeedback => self.engine.on_all_feedback(&mut router),
            Event::Actuator(command) => {
                self.actuator.on_actuator_command(command)?;
            }
            Event::Shutdown => self.actuator.on_shutdown()?,
        }

        while let Some(command) = self.internal.pop_front() {
            self.actuator.on_actuator_command(command)?;
        }
        Ok(())
    }

    /// Receive and dispatch events until a shutdown has been handled.
    pub async fn run<M: RawMutex, const N: usize>(
        &mut self,
        events: Receiver<'_, M, Event, N>,
    ) -> Result<(), D::Error> {
        loop {
            let event = events.receive().await;
            let shutdown = matches!(event, Event::Shutdown);
            self.dispatch(event)?;
            if shutdown {
                tracing::info!("dispatcher stopped after shutdown");
                return Ok(());
            }
        }
    }
}
