//! Bridge Context and Channel Dispatch
//!
//! [`Bridge`] owns all state shared between channel handlers: the radio, the
//! settings model, the handshake, the message slot and the connection flag.
//! Writes are routed through a fixed table mapping each [`WriteChannel`] to
//! its handler. Every handler runs to completion; the caller serializes
//! access (one `RefCell` inside one blocking mutex in the BLE adapter).

use ::core::fmt::Write;

use defmt::{debug, info, warn};

use crate::commands::configurator::{self, RadioSettings};
use crate::commands::{parser, Command, Directive, DirectiveKey, Outcome};
use crate::core::config::BridgeConfig;
use crate::core::protocol::{status_text, NotifyChannel, NotifyText, WriteChannel};
use crate::core::transport::Transport;
use crate::radio::{Modulation, Radio};
use crate::session::connection::ConnectionState;
use crate::session::exchange::MessageExchange;
use crate::session::handshake::HandshakeSession;

/// Channel write handler
pub type WriteHandler<R> = fn(&mut Bridge<R>, &[u8], u64, &mut dyn Transport);

/// Dispatch table entry
pub struct Route<R: Radio> {
    pub channel: WriteChannel,
    /// Drop writes on this channel until the handshake completed, when the
    /// configuration asks for it
    pub gated: bool,
    pub handler: WriteHandler<R>,
}

/// Owned context passed to every handler
pub struct Bridge<R: Radio> {
    radio: R,
    settings: RadioSettings,
    handshake: HandshakeSession,
    exchange: MessageExchange,
    connection: ConnectionState,
    config: BridgeConfig,
}

impl<R: Radio> Bridge<R> {
    const ROUTES: [Route<R>; 3] = [
        Route {
            channel: WriteChannel::Config,
            gated: true,
            handler: Self::on_config_write,
        },
        Route {
            channel: WriteChannel::Handshake,
            gated: false,
            handler: Self::on_handshake_write,
        },
        Route {
            channel: WriteChannel::Message,
            gated: true,
            handler: Self::on_message_write,
        },
    ];

    /// Create the bridge. The settings model starts from the configured
    /// defaults; call [`Bridge::start`] to push them to the radio.
    pub fn new(radio: R, config: BridgeConfig) -> Self {
        Self {
            radio,
            settings: RadioSettings::new(config.initial_frequency_mhz, config.initial_modulation),
            handshake: HandshakeSession::new(),
            exchange: MessageExchange::new(),
            connection: ConnectionState::new(),
            config,
        }
    }

    /// Apply the startup frequency and modulation through the regular
    /// configurator path. Returns the number of rejected directives.
    pub fn start(&mut self) -> usize {
        let modulation = match self.config.initial_modulation {
            Modulation::Ook => "OOK",
            Modulation::Fsk => "FSK",
        };

        let mut frequency = heapless::String::<24>::new();
        // Shortest round-trip form of a validated f32 fits in 24 bytes.
        let _ = write!(frequency, "{}", self.config.initial_frequency_mhz);

        // Declared after `frequency`: the command borrows it until dropped.
        let mut command = Command::default();
        let _ = command.directives.push(Directive {
            key: DirectiveKey::Freq,
            value: &frequency,
        });
        let _ = command.directives.push(Directive {
            key: DirectiveKey::Mod,
            value: modulation,
        });

        let reports = configurator::apply(&command, &mut self.radio, &mut self.settings);
        let rejected = reports
            .iter()
            .filter(|report| matches!(report.outcome, Outcome::Rejected(_)))
            .count();

        info!("BRIDGE: Radio defaults applied, {} rejected", rejected);
        rejected
    }

    /// Route a characteristic write to its handler
    pub fn dispatch(&mut self, channel: WriteChannel, data: &[u8], uptime_ms: u64, transport: &mut dyn Transport) {
        let routes = Self::ROUTES;
        let Some(route) = routes.iter().find(|route| route.channel == channel) else {
            return;
        };

        if route.gated && self.config.require_handshake && !self.handshake.is_completed() {
            warn!("BRIDGE: Dropping {} write before handshake", channel);
            return;
        }

        (route.handler)(self, data, uptime_ms, transport);
    }

    /// Config write: parse, apply, then report every outcome on the log
    /// channel, followed by a summary of skipped segments
    pub fn on_config_write(&mut self, data: &[u8], _uptime_ms: u64, transport: &mut dyn Transport) {
        if data.is_empty() {
            return;
        }

        let Some(command) = parser::parse_bytes(data) else {
            notify_log(transport, "CONFIG: write is not UTF-8, dropped");
            return;
        };

        let reports = configurator::apply(&command, &mut self.radio, &mut self.settings);
        for report in reports.iter() {
            notify_log(transport, &report.to_text());
        }

        let mut line = NotifyText::new();
        if command.ignored > 0 {
            let _ = write!(line, "CONFIG: {} segments ignored", command.ignored);
            notify_log(transport, &line);
        }
        if command.overflow > 0 {
            line.clear();
            let _ = write!(line, "CONFIG: {} directives over limit dropped", command.overflow);
            notify_log(transport, &line);
        }
    }

    /// Handshake write: answer every non-empty payload
    pub fn on_handshake_write(&mut self, data: &[u8], _uptime_ms: u64, transport: &mut dyn Transport) {
        let Some(response) = self.handshake.on_handshake_received(data) else {
            return;
        };

        if let Err(e) = transport.notify(NotifyChannel::HandshakeResponse, response.as_bytes()) {
            warn!("HANDSHAKE: Response not delivered: {:?}", e);
        }
    }

    /// Message write: store it and acknowledge immediately
    pub fn on_message_write(&mut self, data: &[u8], uptime_ms: u64, transport: &mut dyn Transport) {
        let Some(ack) = self.exchange.on_message_received(data, uptime_ms) else {
            return;
        };

        self.send_ack(&ack, transport);
    }

    /// Periodic tick: status line plus a retry of an undelivered ack.
    /// Does nothing while no peer is attached.
    pub fn on_tick(&mut self, uptime_ms: u64, transport: &mut dyn Transport) {
        if !self.connection.is_connected() {
            return;
        }

        let status = status_text(uptime_ms);
        if let Err(e) = transport.notify(NotifyChannel::Log, status.as_bytes()) {
            debug!("BRIDGE: Status line not delivered: {:?}", e);
        }

        if let Some(ack) = self.exchange.pending_ack(uptime_ms) {
            self.send_ack(&ack, transport);
        }
    }

    pub fn on_connect(&mut self, transport: &mut dyn Transport) {
        self.connection.on_connect(transport);
    }

    pub fn on_disconnect(&mut self, transport: &mut dyn Transport) {
        self.connection.on_disconnect(transport);
        self.exchange.discard_pending_ack();

        if self.config.reset_handshake_on_disconnect {
            self.handshake.reset();
        }
    }

    fn send_ack(&mut self, ack: &str, transport: &mut dyn Transport) {
        match transport.notify(NotifyChannel::MessageAck, ack.as_bytes()) {
            Ok(()) => {
                info!("MESSAGE: Sent {=str}", ack);
                self.exchange.mark_acknowledged();
            }
            Err(e) => debug!("MESSAGE: Ack not delivered yet: {:?}", e),
        }
    }

    pub fn settings(&self) -> &RadioSettings {
        &self.settings
    }

    pub fn handshake(&self) -> &HandshakeSession {
        &self.handshake
    }

    pub fn exchange(&self) -> &MessageExchange {
        &self.exchange
    }

    pub fn connection(&self) -> &ConnectionState {
        &self.connection
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn radio(&self) -> &R {
        &self.radio
    }
}

/// Push one line on the log channel; delivery failures are only traced
fn notify_log(transport: &mut dyn Transport, line: &str) {
    if let Err(e) = transport.notify(NotifyChannel::Log, line.as_bytes()) {
        debug!("CONFIG: Log line not delivered: {:?}", e);
    }
}
