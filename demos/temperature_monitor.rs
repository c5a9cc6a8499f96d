//! RP2350 Temperature Monitor
//!
//! Wires the board's I2C1 controller to the BME280 driver through the
//! hexagonal ports and logs one compensated reading every few seconds.
//! This is the consumer loop: anything that forwards readings elsewhere
//! sits where the `info!` call is.
//!
//! Build for the Pico 2 with the `rp2350` feature enabled.

#![cfg_attr(all(target_arch = "arm", target_os = "none"), no_std)]
#![cfg_attr(all(target_arch = "arm", target_os = "none"), no_main)]

#[cfg(all(target_arch = "arm", target_os = "none"))]
mod monitor {
    use bme280_core::{
        Bme280Driver, StaticBusProvider, TemperatureReading, TemperatureSensorPort,
        BME280_BUS_CONFIG,
    };
    use defmt::{info, warn};
    use embassy_executor::Spawner;
    use embassy_rp::i2c::{self, I2c};
    use embassy_time::{Delay, Duration, Instant, Timer};
    use {defmt_rtt as _, panic_probe as _};

    /// How often to read the sensor (seconds)
    const READ_INTERVAL_SECS: u64 = 5;

    #[embassy_executor::main]
    async fn main(_spawner: Spawner) {
        info!("=== BME280 Temperature Monitor ===");

        let p = embassy_rp::init(Default::default());

        // I2C1 on GP14 (SDA) / GP15 (SCL), clocked per the sensor binding.
        let mut config = i2c::Config::default();
        config.frequency = BME280_BUS_CONFIG.frequency_hz;
        let i2c = I2c::new_blocking(p.I2C1, p.PIN_15, p.PIN_14, config);

        let provider = StaticBusProvider::new("I2C1", i2c);
        let mut sensor = Bme280Driver::new(provider, Delay);

        if let Err(e) = sensor.initialize() {
            warn!("BME280 binding failed: {:?}", e);
            loop {
                Timer::after(Duration::from_secs(3600)).await;
            }
        }
        info!("BME280 bound on {}", BME280_BUS_CONFIG.controller);

        loop {
            match sensor.read_temperature() {
                Ok(celsius) => {
                    let reading =
                        TemperatureReading::new(Instant::now().as_micros() as i64, celsius);
                    info!(
                        "temperature: {} C (t={} us)",
                        reading.celsius, reading.timestamp_us
                    );
                }
                Err(e) => warn!("sensor read failed: {:?}", e),
            }
            Timer::after(Duration::from_secs(READ_INTERVAL_SECS)).await;
        }
    }
}

#[cfg(not(all(target_arch = "arm", target_os = "none")))]
fn main() {}
