//! Connection Serve Loop
//!
//! Advertises, accepts one peer at a time and runs the GATT server next to
//! the status ticker until the peer goes away. The bridge lives in a single
//! blocking mutex; every access borrows it for one synchronous handler and
//! never across an `.await`.

use ::core::cell::RefCell;

use defmt::{debug, error, info};
use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_time::{Duration, Instant, Ticker, Timer};
use nrf_softdevice::ble::gatt_server;
use nrf_softdevice::ble::peripheral::{self, ConnectableAdvertisement};
use nrf_softdevice::ble::Connection;
use nrf_softdevice::Softdevice;

use crate::ble::advertising;
use crate::ble::server::{BridgeEvent, BridgeServer};
use crate::ble::transport::{GattTransport, ADVERTISE};
use crate::core::config::BridgeConfig;
use crate::radio::Radio;
use crate::session::bridge::Bridge;

/// The bridge behind the single mutual-exclusion domain
pub type SharedBridge<R> = Mutex<NoopRawMutex, RefCell<Bridge<R>>>;

/// Run `f` with exclusive access to the bridge
pub fn with_bridge<R: Radio, T>(bridge: &SharedBridge<R>, f: impl FnOnce(&mut Bridge<R>) -> T) -> T {
    bridge.lock(|cell| f(&mut cell.borrow_mut()))
}

fn uptime_ms() -> u64 {
    Instant::now().as_millis()
}

/// Advertise and serve peers forever
pub async fn run<R: Radio>(
    sd: &'static Softdevice,
    server: &BridgeServer,
    bridge: &SharedBridge<R>,
    config: &BridgeConfig,
    name: &str,
) -> ! {
    let adv_data = advertising::advertisement(name);
    let scan_data = advertising::scan_response();
    let adv_config = advertising::peripheral_config(config);

    ADVERTISE.signal(());

    loop {
        ADVERTISE.wait().await;
        info!("BLE: Advertising as {=str}", name);

        let adv = ConnectableAdvertisement::ScannableUndirected {
            adv_data: &adv_data,
            scan_data: &scan_data,
        };

        let conn = match peripheral::advertise_connectable(sd, adv, &adv_config).await {
            Ok(conn) => conn,
            Err(e) => {
                error!("BLE: Advertising failed: {:?}", defmt::Debug2Format(&e));
                Timer::after(Duration::from_secs(1)).await;
                ADVERTISE.signal(());
                continue;
            }
        };

        serve_connection(&conn, server, bridge, config.tick_period).await;
    }
}

/// Serve one peer until it disconnects
pub async fn serve_connection<R: Radio>(
    conn: &Connection,
    server: &BridgeServer,
    bridge: &SharedBridge<R>,
    tick_period: Duration,
) {
    info!("BLE: Peer {:?} connected", defmt::Debug2Format(&conn.peer_address()));
    with_bridge(bridge, |b| b.on_connect(&mut GattTransport::new(server, conn)));

    let gatt = gatt_server::run(conn, server, |event| match event {
        BridgeEvent::Write { channel, data } => {
            debug!("BLE: {} write, {} bytes", channel, data.len());
            let mut transport = GattTransport::new(server, conn);
            with_bridge(bridge, |b| b.dispatch(channel, &data, uptime_ms(), &mut transport));
        }
        BridgeEvent::Subscription { channel, enabled } => {
            info!("BLE: Notifications on {} {}", channel, if enabled { "enabled" } else { "disabled" });
        }
    });

    match select(gatt, status_ticker(conn, server, bridge, tick_period)).await {
        Either::First(e) => info!("BLE: Connection closed: {:?}", defmt::Debug2Format(&e)),
        Either::Second(never) => match never {},
    }

    with_bridge(bridge, |b| b.on_disconnect(&mut GattTransport::new(server, conn)));
}

async fn status_ticker<R: Radio>(
    conn: &Connection,
    server: &BridgeServer,
    bridge: &SharedBridge<R>,
    period: Duration,
) -> ! {
    let mut ticker = Ticker::every(period);
    loop {
        ticker.next().await;
        let mut transport = GattTransport::new(server, conn);
        with_bridge(bridge, |b| b.on_tick(uptime_ms(), &mut transport));
    }
}
