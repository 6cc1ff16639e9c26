use std::sync::Arc;

use super::{Error, Msg};

/// Outbound side of a transport.
///
/// Shared between the panel, its controls and the LED reset tasks,
/// which run on the scheduler thread.
pub trait Sink: Send + Sync + 'static {
    fn send(&self, msg: Msg) -> Result<(), Error>;
}

pub type SinkArc = Arc<dyn Sink>;

/// Inbound messages handler, called on the transport delivery context.
pub type Handler = Box<dyn FnMut(&[u8]) + Send + 'static>;

pub trait Transport: Send + 'static {
    fn sink(&self) -> SinkArc;

    fn on_message(&mut self, handler: Handler) -> Result<(), Error>;

    fn close_input(&mut self);
    fn close_output(&mut self);
    fn close_device(&mut self);
}
