use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
};

use super::{
    protocol::Family, ButtonControl, Error, FaderControl, Layout, Scheduler, Settings,
    VPotControl,
};
use crate::midi::{Msg, SinkArc, Transport};

/// A panel shared between the transport delivery context and the application.
///
/// Listeners run with the lock held: they must not lock their own panel.
pub type SharedPanel = Arc<Mutex<Panel>>;

#[derive(Debug)]
struct Bank<T> {
    controls: Vec<T>,
    by_id: HashMap<u8, usize>,
}

impl<T> Bank<T> {
    fn new() -> Self {
        Self {
            controls: Vec::new(),
            by_id: HashMap::new(),
        }
    }

    fn push(&mut self, id: u8, control: T) {
        self.by_id.insert(id, self.controls.len());
        self.controls.push(control);
    }

    fn get(&self, idx: usize) -> Option<&T> {
        self.controls.get(idx)
    }

    fn get_mut(&mut self, idx: usize) -> Option<&mut T> {
        self.controls.get_mut(idx)
    }

    fn by_id_mut(&mut self, id: u8) -> Option<&mut T> {
        let idx = *self.by_id.get(&id)?;
        self.controls.get_mut(idx)
    }

    fn len(&self) -> usize {
        self.controls.len()
    }
}

/// An MCU control surface.
///
/// Dispatches inbound messages to the controls by message class and wire id.
/// Applications address the controls by their logical index in the `Layout`.
pub struct Panel {
    name: Arc<str>,
    vpots: Bank<VPotControl>,
    buttons: Bank<ButtonControl>,
    faders: Bank<FaderControl>,
    sink: SinkArc,
    transport: Option<Box<dyn Transport>>,
    is_closed: bool,
}

impl Panel {
    pub fn new(layout: &Layout, settings: &Settings, sink: SinkArc) -> Result<Self, Error> {
        layout.validate()?;

        let scheduler = Scheduler::new(settings.led_reset_delay);

        let mut vpots = Bank::new();
        for spec in layout.vpots() {
            vpots.push(
                spec.id,
                VPotControl::new(spec.led, sink.clone(), scheduler.clone()),
            );
        }

        let mut buttons = Bank::new();
        for spec in layout.buttons() {
            buttons.push(spec.id, ButtonControl::new(spec.led, sink.clone()));
        }

        let fader_decode = settings.fader_decode.unwrap_or_else(|| layout.fader_decode());
        let mut faders = Bank::new();
        for &id in layout.faders() {
            faders.push(id, FaderControl::new(fader_decode));
        }

        log::debug!(
            "Panel {}: {} V-Pots, {} buttons, {} faders ({fader_decode})",
            layout.name(),
            vpots.len(),
            buttons.len(),
            faders.len(),
        );

        Ok(Self {
            name: layout.name().clone(),
            vpots,
            buttons,
            faders,
            sink,
            transport: None,
            is_closed: false,
        })
    }

    pub fn connect(
        layout: &Layout,
        settings: &Settings,
        mut transport: impl Transport,
    ) -> Result<SharedPanel, Error> {
        let panel = Arc::new(Mutex::new(Self::new(layout, settings, transport.sink())?));

        let weak_panel = Arc::downgrade(&panel);
        transport.on_message(Box::new(move |buf: &[u8]| {
            if let Some(panel) = weak_panel.upgrade() {
                panel
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .receive(buf);
            }
        }))?;

        panel
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .transport = Some(Box::new(transport));

        log::info!("Panel {} connected", layout.name());

        Ok(panel)
    }

    pub fn name(&self) -> &Arc<str> {
        &self.name
    }

    pub fn receive(&mut self, buf: &[u8]) {
        if self.is_closed {
            return;
        }

        match Msg::try_from_bytes(buf) {
            Ok(msg) => self.dispatch(msg),
            Err(err) => log::debug!("Panel {}: ignoring inbound msg: {err}", self.name),
        }
    }

    pub fn dispatch(&mut self, msg: Msg) {
        let family = match Family::from_tag(msg.tag()) {
            Some(family) => family,
            None => return,
        };

        let (id, data) = (msg.data1(), msg.data2());
        let is_known = match family {
            Family::VPot => self.vpot_by_id_mut(id).map(|vpot| vpot.update(data)),
            Family::Button => self.button_by_id_mut(id).map(|button| button.update(data)),
            Family::Fader => self.fader_by_id_mut(id).map(|fader| fader.update(data)),
        }
        .is_some();

        if !is_known {
            log::debug!(
                "Panel {}: no {family} with wire id {id:#04x}, ignoring {}",
                self.name,
                msg.display(),
            );
        }
    }

    pub fn vpot(&self, idx: usize) -> Option<&VPotControl> {
        self.vpots.get(idx)
    }

    pub fn vpot_mut(&mut self, idx: usize) -> Option<&mut VPotControl> {
        self.vpots.get_mut(idx)
    }

    pub fn button(&self, idx: usize) -> Option<&ButtonControl> {
        self.buttons.get(idx)
    }

    pub fn button_mut(&mut self, idx: usize) -> Option<&mut ButtonControl> {
        self.buttons.get_mut(idx)
    }

    pub fn fader(&self, idx: usize) -> Option<&FaderControl> {
        self.faders.get(idx)
    }

    pub fn fader_mut(&mut self, idx: usize) -> Option<&mut FaderControl> {
        self.faders.get_mut(idx)
    }

    pub(crate) fn vpot_by_id_mut(&mut self, id: u8) -> Option<&mut VPotControl> {
        self.vpots.by_id_mut(id)
    }

    pub(crate) fn button_by_id_mut(&mut self, id: u8) -> Option<&mut ButtonControl> {
        self.buttons.by_id_mut(id)
    }

    pub(crate) fn fader_by_id_mut(&mut self, id: u8) -> Option<&mut FaderControl> {
        self.faders.by_id_mut(id)
    }

    pub fn num_vpots(&self) -> usize {
        self.vpots.len()
    }

    pub fn num_buttons(&self) -> usize {
        self.buttons.len()
    }

    pub fn num_faders(&self) -> usize {
        self.faders.len()
    }

    pub fn send(&self, status: u8, data1: u8, data2: u8) -> Result<(), Error> {
        if self.is_closed {
            return Err(Error::Closed);
        }

        self.sink.send(Msg::try_new(status, data1, data2)?)?;

        Ok(())
    }

    pub fn reset_leds(&mut self) {
        for button in self.buttons.controls.iter_mut() {
            button.reset();
        }

        for vpot in self.vpots.controls.iter_mut() {
            vpot.display();
        }
    }

    pub fn is_closed(&self) -> bool {
        self.is_closed
    }

    /// Cancels pending LED resets and closes the transport.
    ///
    /// Closing a connected `SharedPanel` from within its lock can deadlock
    /// with the transport delivery context: use `Panel::close_shared`.
    pub fn close(&mut self) {
        if let Some(mut transport) = self.shutdown() {
            close_transport(transport.as_mut());
        }
    }

    pub fn close_shared(panel: &SharedPanel) {
        let transport = panel
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .shutdown();

        if let Some(mut transport) = transport {
            close_transport(transport.as_mut());
        }
    }

    fn shutdown(&mut self) -> Option<Box<dyn Transport>> {
        if self.is_closed {
            return None;
        }

        self.is_closed = true;
        for vpot in self.vpots.controls.iter_mut() {
            vpot.cancel_reset();
        }

        log::info!("Panel {} closed", self.name);

        self.transport.take()
    }
}

fn close_transport(transport: &mut dyn Transport) {
    transport.close_input();
    transport.close_output();
    transport.close_device();
}

impl Drop for Panel {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for Panel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Panel")
            .field("name", &self.name)
            .field("vpots", &self.vpots.len())
            .field("buttons", &self.buttons.len())
            .field("faders", &self.faders.len())
            .field("is_closed", &self.is_closed)
            .finish()
    }
}
