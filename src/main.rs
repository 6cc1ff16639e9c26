use anyhow::Context;
use clap::Parser;
use crossbeam_channel as channel;
use std::{sync::Arc, time::Duration};

use mcu_controls::{
    mcu::{layout::XTouchMini, Buildable, Family, FaderDecode, Panel, Settings, LAYOUTS},
    midi::MidirTransport,
    IntControl, Listener, SharedPanel,
};

const CLIENT_NAME: &str = "MCU Monitor";

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum FaderDecodeArg {
    Absolute,
    SignRemap,
}

impl From<FaderDecodeArg> for FaderDecode {
    fn from(arg: FaderDecodeArg) -> Self {
        match arg {
            FaderDecodeArg::Absolute => FaderDecode::Absolute,
            FaderDecodeArg::SignRemap => FaderDecode::SignRemap,
        }
    }
}

/// Logs the changes of the controls of an MCU surface.
#[derive(Debug, Parser)]
#[command(name = "mcu-monitor", version)]
struct Args {
    /// MIDI port name, or a prefix of it.
    #[arg(short, long)]
    port: Option<String>,

    /// Surface layout.
    #[arg(short, long, default_value = XTouchMini::NAME)]
    layout: String,

    /// Report V-Pots as relative steps.
    #[arg(long)]
    relative: bool,

    /// Make buttons toggle on each press.
    #[arg(long)]
    toggle: bool,

    /// Overrides the fader decode strategy of the layout.
    #[arg(long, value_enum)]
    fader_decode: Option<FaderDecodeArg>,

    /// Delay before relative V-Pot rings revert to rest (ms).
    #[arg(long, default_value_t = 200)]
    led_reset_ms: u64,

    /// List MIDI ports and layouts, then exit.
    #[arg(long)]
    list: bool,

    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug)]
enum Event {
    Control {
        family: Family,
        idx: usize,
        value: i32,
    },
    Quit,
}

fn main() {
    let args = Args::parse();

    let level = match args.verbose {
        0 => log::LevelFilter::Info,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new().filter_level(level).init();

    match run(args) {
        Ok(()) => log::info!("Exiting"),
        Err(err) => {
            log::error!("Error: {err}");
            for cause in err.chain().skip(1) {
                log::error!("\t{cause}");
            }
        }
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    if args.list {
        println!("MIDI ports:");
        for name in MidirTransport::list(CLIENT_NAME)? {
            println!("\t{name}");
        }

        println!("Layouts:");
        for name in LAYOUTS.list() {
            println!("\t{name}");
        }

        return Ok(());
    }

    let port = args
        .port
        .as_deref()
        .context("No MIDI port selected, use --list to find one")?;
    let layout = LAYOUTS.build(&args.layout)?;
    let settings = Settings {
        led_reset_delay: Duration::from_millis(args.led_reset_ms),
        fader_decode: args.fader_decode.map(FaderDecode::from),
    };

    let transport = MidirTransport::connect(CLIENT_NAME, port)
        .with_context(|| format!("Couldn't connect to {port}"))?;
    let port_name = transport.port_name().clone();
    let panel = Panel::connect(&layout, &settings, transport)?;

    let (event_tx, event_rx) = channel::unbounded();
    register_listeners(&panel, &event_tx, &args);

    std::thread::spawn(move || {
        let mut line = String::new();
        let _ = std::io::stdin().read_line(&mut line);
        let _ = event_tx.send(Event::Quit);
    });

    log::info!("Monitoring {port_name}, press Enter to quit");

    for event in event_rx.iter() {
        match event {
            Event::Control { family, idx, value } => log::info!("{family} #{idx}: {value}"),
            Event::Quit => break,
        }
    }

    Panel::close_shared(&panel);

    Ok(())
}

fn listener(event_tx: &channel::Sender<Event>, family: Family, idx: usize) -> Listener {
    let event_tx = event_tx.clone();
    Arc::new(move |value: i32| {
        let _ = event_tx.send(Event::Control { family, idx, value });
    })
}

fn register_listeners(panel: &SharedPanel, event_tx: &channel::Sender<Event>, args: &Args) {
    let mut panel = panel.lock().unwrap();

    for idx in 0..panel.num_vpots() {
        if let Some(vpot) = panel.vpot_mut(idx) {
            vpot.set_absolute(!args.relative);
            vpot.add_listener(listener(event_tx, Family::VPot, idx));
        }
    }

    for idx in 0..panel.num_buttons() {
        if let Some(button) = panel.button_mut(idx) {
            button.set_toggle(args.toggle);
            button.add_listener(listener(event_tx, Family::Button, idx));
        }
    }

    for idx in 0..panel.num_faders() {
        if let Some(fader) = panel.fader_mut(idx) {
            fader.add_listener(listener(event_tx, Family::Fader, idx));
        }
    }
}
