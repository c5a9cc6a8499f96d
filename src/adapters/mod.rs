//! Adapters - concrete implementations of ports
//!
//! Adapters connect the domain to the outside world by implementing
//! the port traits. Each adapter knows how to work with a specific
//! technology or hardware.
//!
//! # Available Adapters
//!
//! - **bme280**: BME280 sensor driver state machine over any `BusPort`
//! - **i2c_bus**: embedded-hal I2C controller bound as a `BusPort`

pub mod bme280;
pub mod i2c_bus;

pub use bme280::{Bme280Driver, DriverState, BME280_BUS_CONFIG};
pub use i2c_bus::{I2cBus, StaticBusProvider};
