#![no_std]
#![no_main]

use core::cell::RefCell;

use defmt::*;
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_nrf::gpio::{Level, Output, OutputDrive};
use embassy_nrf::interrupt::{self, InterruptExt};
use embassy_nrf::{bind_interrupts, config::Config, peripherals, spim};
use embassy_sync::blocking_mutex::Mutex;
use nrf_softdevice::{raw, Config as SdConfig, Softdevice};
use panic_probe as _;

use subghz_ble_bridge::ble::server::BridgeServer;
use subghz_ble_bridge::ble::session;
use subghz_ble_bridge::core::config::BridgeConfig;
use subghz_ble_bridge::core::protocol::ATT_MTU;
use subghz_ble_bridge::radio::cc1101::Cc1101;
use subghz_ble_bridge::radio::RadioError;
use subghz_ble_bridge::session::bridge::Bridge;

bind_interrupts!(struct Irqs {
    TWISPI0 => spim::InterruptHandler<peripherals::TWISPI0>;
});

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Starting sub-GHz BLE bridge");

    let config = BridgeConfig::default();
    unwrap!(config.validate());

    // Configure nRF peripherals
    let mut nrf_config = Config::default();
    // Configure interrupt priorities to avoid SoftDevice reserved levels (0, 1, 4)
    nrf_config.gpiote_interrupt_priority = interrupt::Priority::P2;
    nrf_config.time_interrupt_priority = interrupt::Priority::P2;

    let p = embassy_nrf::init(nrf_config);
    interrupt::TWISPI0.set_priority(interrupt::Priority::P3);

    info!("Embassy initialized, configuring SoftDevice...");

    let sd_config = SdConfig {
        clock: Some(raw::nrf_clock_lf_cfg_t {
            source: raw::NRF_CLOCK_LF_SRC_RC as u8,
            rc_ctiv: 16,
            rc_temp_ctiv: 2,
            accuracy: raw::NRF_CLOCK_LF_ACCURACY_500_PPM as u8,
        }),
        conn_gap: Some(raw::ble_gap_conn_cfg_t {
            conn_count: 1,
            event_length: 24,
        }),
        conn_gatt: Some(raw::ble_gatt_conn_cfg_t { att_mtu: ATT_MTU as u16 }),
        gatts_attr_tab_size: Some(raw::ble_gatts_cfg_attr_tab_size_t {
            attr_tab_size: raw::BLE_GATTS_ATTR_TAB_SIZE_DEFAULT,
        }),
        gap_role_count: Some(raw::ble_gap_cfg_role_count_t {
            adv_set_count: 1,
            periph_role_count: 1,
            central_role_count: 0,
            central_sec_count: 0,
            _bitfield_1: raw::ble_gap_cfg_role_count_t::new_bitfield_1(0),
        }),
        // One vendor-specific base covers the service and all characteristics
        common_vs_uuid: Some(raw::ble_common_cfg_vs_uuid_t { vs_uuid_count: 1 }),
        ..Default::default()
    };

    let sd = Softdevice::enable(&sd_config);
    info!("SoftDevice enabled successfully!");

    let server = BridgeServer::new(sd).unwrap_or_else(|_| {
        defmt::panic!("Failed to register bridge service");
    });
    let sd: &'static Softdevice = sd;

    unwrap!(spawner.spawn(softdevice_task(sd)));

    // CC1101 on SPIM0: SCK=P0.00, CS=P0.01, MISO=P0.02, MOSI=P0.04, 4MHz mode 0
    let mut spi_config = spim::Config::default();
    spi_config.frequency = spim::Frequency::M4;
    spi_config.mode = spim::Mode {
        polarity: spim::Polarity::IdleLow,
        phase: spim::Phase::CaptureOnFirstTransition,
    };
    let mut spi = spim::Spim::new(p.TWISPI0, Irqs, p.P0_00, p.P0_02, p.P0_04, spi_config);
    let mut cs = Output::new(p.P0_01, Level::High, OutputDrive::Standard);

    let bus = move |buf: &mut [u8]| -> Result<(), RadioError> {
        cs.set_low();
        let result = spi.blocking_transfer_in_place(buf);
        cs.set_high();
        result.map_err(|_| RadioError::Spi)
    };

    let mut radio = Cc1101::new(bus);
    match radio.begin() {
        Ok(version) => info!("RADIO: CC1101 ready (version 0x{:02X})", version),
        // Keep serving BLE; configuration commands will report the radio errors
        Err(e) => error!("RADIO: CC1101 initialization failed, code {}", e.code()),
    }

    let mut bridge = Bridge::new(radio, config.clone());
    let rejected = bridge.start();
    if rejected > 0 {
        warn!("RADIO: {} startup settings rejected", rejected);
    }
    let bridge: session::SharedBridge<_> = Mutex::new(RefCell::new(bridge));

    let addr = nrf_softdevice::ble::get_address(sd);
    let name = unwrap!(config.device_name(&addr.bytes()));
    info!("BLE device name: {=str}", name.as_str());

    info!("System initialized, entering BLE loop");
    session::run(sd, &server, &bridge, &config, &name).await
}

#[embassy_executor::task]
async fn softdevice_task(sd: &'static Softdevice) -> ! {
    sd.run().await
}
