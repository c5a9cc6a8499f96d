//! I2C bus adapter
//!
//! This adapter implements the `BusPort` trait over any blocking
//! `embedded-hal` I2C controller, and provides the dependency-injected
//! stand-in for the platform's device enumeration.

use embedded_hal::i2c::{ErrorKind, I2c};

use crate::ports::bus::{BusConfig, BusError, BusPort, BusProviderPort};

/// Register-addressed transport over an `embedded-hal` I2C controller.
///
/// Owns the controller and the device's fixed 7-bit address; every
/// transaction targets that address.
pub struct I2cBus<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C: I2c> I2cBus<I2C> {
    /// Bind a controller to one device address
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// The bound 7-bit device address
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Release the underlying I2C controller
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C: I2c> BusPort for I2cBus<I2C> {
    fn write_read(&mut self, bytes: &[u8], buffer: &mut [u8]) -> Result<(), BusError> {
        self.i2c
            .write_read(self.address, bytes, buffer)
            .map_err(map_error)
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), BusError> {
        self.i2c.write(self.address, bytes).map_err(map_error)
    }
}

fn map_error<E: embedded_hal::i2c::Error>(err: E) -> BusError {
    match err.kind() {
        ErrorKind::NoAcknowledge(_) => BusError::NoAcknowledge,
        _ => BusError::Fault,
    }
}

/// Provider that owns one pre-constructed controller.
///
/// Platforms without runtime device enumeration build their peripherals
/// up front; this provider hands the controller out when the requested
/// binding names it, and reports "no such device" otherwise. Consumers
/// receive the constructed handle through the port instead of reaching
/// into process-wide state.
pub struct StaticBusProvider<I2C> {
    controller: &'static str,
    i2c: Option<I2C>,
}

impl<I2C: I2c> StaticBusProvider<I2C> {
    /// Register a controller under its platform name (e.g. "I2C1")
    pub fn new(controller: &'static str, i2c: I2C) -> Self {
        Self {
            controller,
            i2c: Some(i2c),
        }
    }
}

impl<I2C: I2c> BusProviderPort for StaticBusProvider<I2C> {
    type Bus = I2cBus<I2C>;

    fn open(&mut self, config: &BusConfig) -> Option<I2cBus<I2C>> {
        if config.controller != self.controller {
            return None;
        }
        let i2c = self.i2c.take()?;
        Some(I2cBus::new(i2c, config.address))
    }
}
