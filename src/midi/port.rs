use std::sync::{Arc, Mutex};

use super::{Error, Handler, Msg, Sink, SinkArc, Transport};

enum Input {
    Connected(midir::MidiInputConnection<()>),
    Disconnected((midir::MidiInput, midir::MidiInputPort)),
    Closed(midir::MidiInput),
    None,
}

impl Default for Input {
    fn default() -> Self {
        Self::None
    }
}

/// Output connection, shared with the controls.
pub struct MidirSink(Mutex<Option<midir::MidiOutputConnection>>);

impl Sink for MidirSink {
    fn send(&self, msg: Msg) -> Result<(), Error> {
        let mut conn = self.0.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        match conn.as_mut() {
            Some(conn) => {
                conn.send(&msg).map_err(|err| {
                    log::error!("Failed to send MIDI msg {}: {err}", msg.display());
                    err
                })?;
            }
            None => {
                log::warn!("Attempt to send a msg, but MIDI Out is not connected");
                return Err(Error::NotConnected);
            }
        }

        Ok(())
    }
}

/// A `Transport` backed by a `midir` in / out port pair.
pub struct MidirTransport {
    port_name: Arc<str>,
    input: Input,
    sink: Arc<MidirSink>,
    output_client: Option<midir::MidiOutput>,
}

impl MidirTransport {
    /// Connects to the first in / out ports whose names start with `port_name`.
    pub fn connect(client_name: &str, port_name: &str) -> Result<Self, Error> {
        let midi_input = midir::MidiInput::new(client_name)?;
        let (in_port, port_name) = find_port(&midi_input, port_name)?;

        let midi_output = midir::MidiOutput::new(client_name)?;
        let (out_port, _) = find_port(&midi_output, &port_name)?;
        let client_port_name = format!("{client_name} Out");
        let conn = midi_output
            .connect(&out_port, &client_port_name)
            .map_err(|_| {
                let err = Error::Connection(port_name.clone());
                log::error!("{err}");
                err
            })?;

        log::debug!("Connected MIDI Out to {port_name}");

        Ok(Self {
            port_name,
            input: Input::Disconnected((midi_input, in_port)),
            sink: Arc::new(MidirSink(Mutex::new(Some(conn)))),
            output_client: None,
        })
    }

    /// Lists the port names available for both directions.
    pub fn list(client_name: &str) -> Result<Vec<Arc<str>>, Error> {
        let midi_input = midir::MidiInput::new(client_name)?;
        let midi_output = midir::MidiOutput::new(client_name)?;

        let mut outputs = Vec::new();
        for port in midi_output.ports().iter() {
            outputs.push(midi_output.port_name(port)?);
        }

        let mut list = Vec::new();
        for port in midi_input.ports().iter() {
            let name = midi_input.port_name(port)?;
            if !name.starts_with(client_name) && outputs.contains(&name) {
                list.push(name.into());
            }
        }

        Ok(list)
    }

    /// Full name of the connected port.
    pub fn port_name(&self) -> &Arc<str> {
        &self.port_name
    }
}

fn find_port<IO: midir::MidiIO>(
    io: &IO,
    port_name: &str,
) -> Result<(IO::Port, Arc<str>), Error> {
    for port in io.ports().iter() {
        let name = io.port_name(port)?;
        if name.starts_with(port_name) {
            return Ok((port.clone(), name.into()));
        }
    }

    Err(Error::PortNotFound(port_name.into()))
}

impl Transport for MidirTransport {
    fn sink(&self) -> SinkArc {
        self.sink.clone()
    }

    fn on_message(&mut self, mut handler: Handler) -> Result<(), Error> {
        match std::mem::take(&mut self.input) {
            Input::Disconnected((midi_input, port)) => {
                let client_port_name = format!("{} In", self.port_name);
                match midi_input.connect(
                    &port,
                    &client_port_name,
                    move |_ts, buf, _| handler(buf),
                    (),
                ) {
                    Ok(conn) => {
                        log::debug!("Connected MIDI In to {}", self.port_name);
                        self.input = Input::Connected(conn);
                    }
                    Err(err) => {
                        self.input = Input::Disconnected((err.into_inner(), port));
                        let err = Error::Connection(self.port_name.clone());
                        log::error!("{err}");
                        return Err(err);
                    }
                }
            }
            other => {
                self.input = other;
                return Err(Error::NotConnected);
            }
        }

        Ok(())
    }

    fn close_input(&mut self) {
        self.input = match std::mem::take(&mut self.input) {
            Input::Connected(conn) => {
                let (midi_input, ()) = conn.close();
                Input::Closed(midi_input)
            }
            Input::Disconnected((midi_input, _)) => Input::Closed(midi_input),
            other => other,
        };
    }

    fn close_output(&mut self) {
        let mut conn = self
            .sink
            .0
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if let Some(conn) = conn.take() {
            self.output_client = Some(conn.close());
        }
    }

    fn close_device(&mut self) {
        // Dropping the clients releases the underlying MIDI device.
        self.input = Input::None;
        self.output_client = None;
        log::debug!("Released MIDI device {}", self.port_name);
    }
}
