//! BME280 Temperature Sensing Core
//!
//! This library provides a hexagonal architecture for reading calibrated
//! temperatures from a Bosch BME280 environmental sensor over a
//! register-addressed I2C bus.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     Domain Layer                                 │
//! │  - TemperatureReading entity                                     │
//! │  - CalibrationData + compensation formula                        │
//! │  - RawTemperatureSample assembly                                 │
//! └─────────────────────────────────────────────────────────────────┘
//!                               │
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     Ports (Traits)                               │
//! │  - BusPort: register-addressed bus transport                     │
//! │  - BusProviderPort: platform device enumeration                  │
//! │  - TemperatureSensorPort: consumer-facing sensor contract        │
//! └─────────────────────────────────────────────────────────────────┘
//!                               │
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     Adapters                                     │
//! │  - Bme280Driver: sensor state machine over any BusPort           │
//! │  - I2cBus: embedded-hal I2C transport binding                    │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Key Benefits
//!
//! - **Testable** - Ports allow mocking the bus, so the identify/calibrate/
//!   configure sequence and the compensation math run under host tests
//! - **Portable** - The driver only needs a `BusPort`; any `embedded-hal`
//!   I2C controller plugs in through the `I2cBus` adapter
//! - **Explicit lifecycle** - "not yet configured" is a typed state, not a
//!   hidden flag

#![no_std]

#[cfg(test)]
extern crate std;

/// Domain layer - pure business logic
pub mod domain;

/// Ports - traits defining boundaries
pub mod ports;

/// Adapters - concrete implementations
pub mod adapters;

// Re-export key domain types
pub use domain::{CalibrationData, RawTemperatureSample, TemperatureReading};

// Re-export key port traits
pub use ports::{BusConfig, BusError, BusPort, BusProviderPort, SensorError, TemperatureSensorPort};

// Re-export adapters
pub use adapters::{Bme280Driver, DriverState, I2cBus, StaticBusProvider, BME280_BUS_CONFIG};
