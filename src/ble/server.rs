//! Bridge GATT Server
//!
//! Registers the bridge service with the SoftDevice and translates raw
//! attribute writes into [`BridgeEvent`]s keyed by logical channel.
//!
//! | UUID suffix | Channel                     | Properties    |
//! |-------------|-----------------------------|---------------|
//! | `..def1`    | config write                | write         |
//! | `..def2`    | log notify                  | notify        |
//! | `..def3`    | message write / ack notify  | write, notify |
//! | `..def4`    | handshake write             | write         |
//! | `..def5`    | handshake response notify   | notify        |

use ::core::cell::Cell;

use defmt::{debug, info, warn, Format};
use heapless::Vec;
use nrf_softdevice::ble::gatt_server::builder::ServiceBuilder;
use nrf_softdevice::ble::gatt_server::characteristic::{Attribute, Metadata, Properties};
use nrf_softdevice::ble::gatt_server::{self, CharacteristicHandles, RegisterError, WriteOp};
use nrf_softdevice::ble::{Connection, Uuid};
use nrf_softdevice::Softdevice;

use crate::core::protocol::{uuids, NotifyChannel, WriteChannel, MAX_WRITE_LEN};

/// CCCD bit enabling notifications
const CCCD_NOTIFY: u8 = 0x01;

/// GATT server events delivered to the connection loop
#[derive(Debug, Format)]
pub enum BridgeEvent {
    /// Peer wrote one of the inbound channels
    Write {
        channel: WriteChannel,
        data: Vec<u8, MAX_WRITE_LEN>,
    },
    /// Peer changed its notification subscription
    Subscription { channel: NotifyChannel, enabled: bool },
}

/// Attribute handles of a notify channel
#[derive(Debug, Clone, Copy, Format)]
struct NotifyHandles {
    value: u16,
    cccd: u16,
}

/// Bridge GATT server
pub struct BridgeServer {
    writes: [(u16, WriteChannel); 3],
    /// Indexed by [`NotifyChannel::index`]
    notifies: [NotifyHandles; 3],
    subscriptions: [Cell<bool>; 3],
}

impl BridgeServer {
    /// Register the bridge service and its characteristics
    pub fn new(sd: &mut Softdevice) -> Result<Self, RegisterError> {
        info!("BLE: Registering bridge service");

        let mut sb = ServiceBuilder::new(sd, Uuid::new_128(&uuids::SERVICE))?;

        let config = add_characteristic(&mut sb, &uuids::CONFIG, Properties::new().write())?;
        let log = add_characteristic(&mut sb, &uuids::LOG, Properties::new().notify())?;
        let message = add_characteristic(&mut sb, &uuids::MESSAGE, Properties::new().write().notify())?;
        let handshake_rx = add_characteristic(&mut sb, &uuids::HANDSHAKE_RX, Properties::new().write())?;
        let handshake_tx = add_characteristic(&mut sb, &uuids::HANDSHAKE_TX, Properties::new().notify())?;

        let _service = sb.build();

        let server = Self {
            writes: [
                (config.value_handle, WriteChannel::Config),
                (handshake_rx.value_handle, WriteChannel::Handshake),
                (message.value_handle, WriteChannel::Message),
            ],
            notifies: [
                NotifyHandles {
                    value: log.value_handle,
                    cccd: log.cccd_handle,
                },
                NotifyHandles {
                    value: handshake_tx.value_handle,
                    cccd: handshake_tx.cccd_handle,
                },
                NotifyHandles {
                    value: message.value_handle,
                    cccd: message.cccd_handle,
                },
            ],
            subscriptions: [Cell::new(false), Cell::new(false), Cell::new(false)],
        };

        debug!("BLE: Write handles {}, notify handles {}", server.writes, server.notifies);
        Ok(server)
    }

    /// Value handle notifications for `channel` are sent on
    pub fn value_handle(&self, channel: NotifyChannel) -> u16 {
        self.notifies[channel.index()].value
    }

    /// Whether the peer enabled notifications on `channel`
    pub fn is_subscribed(&self, channel: NotifyChannel) -> bool {
        self.subscriptions[channel.index()].get()
    }

    /// Forget all subscriptions; a new peer starts unsubscribed
    pub fn clear_subscriptions(&self) {
        for subscription in self.subscriptions.iter() {
            subscription.set(false);
        }
    }

    fn write_channel(&self, handle: u16) -> Option<WriteChannel> {
        self.writes
            .iter()
            .find(|(value_handle, _)| *value_handle == handle)
            .map(|&(_, channel)| channel)
    }

    fn cccd_channel(&self, handle: u16) -> Option<NotifyChannel> {
        NotifyChannel::ALL
            .iter()
            .copied()
            .find(|channel| self.notifies[channel.index()].cccd == handle)
    }
}

fn add_characteristic(
    sb: &mut ServiceBuilder<'_>,
    uuid: &[u8; 16],
    properties: Properties,
) -> Result<CharacteristicHandles, RegisterError> {
    let empty: &[u8] = &[];
    let attr = Attribute::new(empty).variable_len(MAX_WRITE_LEN as u16);
    let md = Metadata::new(properties);
    Ok(sb.add_characteristic(Uuid::new_128(uuid), attr, md)?.build())
}

impl gatt_server::Server for BridgeServer {
    type Event = BridgeEvent;

    fn on_write(
        &self,
        _conn: &Connection,
        handle: u16,
        _op: WriteOp,
        offset: usize,
        data: &[u8],
    ) -> Option<Self::Event> {
        if let Some(channel) = self.cccd_channel(handle) {
            let enabled = data.first().is_some_and(|flags| flags & CCCD_NOTIFY != 0);
            self.subscriptions[channel.index()].set(enabled);
            return Some(BridgeEvent::Subscription { channel, enabled });
        }

        let channel = self.write_channel(handle)?;

        if offset != 0 {
            warn!("BLE: Ignoring partial write on {} at offset {}", channel, offset);
            return None;
        }

        let mut payload = Vec::new();
        if payload.extend_from_slice(data).is_err() {
            warn!("BLE: {} write of {} bytes exceeds {}", channel, data.len(), MAX_WRITE_LEN);
            return None;
        }

        Some(BridgeEvent::Write {
            channel,
            data: payload,
        })
    }
}
