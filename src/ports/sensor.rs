//! Sensor port - the consumer-facing temperature contract
//!
//! This trait is everything an upstream consumer (e.g. a forwarding task)
//! needs: bind the device once, then read temperatures in a loop. Callers
//! see a typed failure per call; no partial or garbage value is ever
//! returned on an error path.

use crate::ports::bus::BusError;

/// Error type for sensor operations
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    /// Enumeration returned no bus device matching the sensor's binding
    DeviceNotFound,
    /// The chip identification register returned an unexpected value
    SignatureMismatch,
    /// Transport-level read/write failure
    Bus(BusError),
}

impl From<BusError> for SensorError {
    fn from(err: BusError) -> Self {
        SensorError::Bus(err)
    }
}

/// Port for reading calibrated temperatures
///
/// # Example Implementation
///
/// ```ignore
/// impl<P: BusProviderPort, D: DelayNs> TemperatureSensorPort for Bme280Driver<P, D> {
///     fn initialize(&mut self) -> Result<(), SensorError> {
///         // resolve and bind the bus; no register traffic
///     }
///
///     fn read_temperature(&mut self) -> Result<f32, SensorError> {
///         // lazy setup on first call, then three register reads
///         // and the compensation formula
///     }
/// }
/// ```
pub trait TemperatureSensorPort {
    /// Locate and bind the bus transport for the sensor's address.
    ///
    /// Pure resource acquisition; does not touch sensor registers.
    fn initialize(&mut self) -> Result<(), SensorError>;

    /// Read one compensated temperature in degrees Celsius.
    ///
    /// Every call re-reads the bus; failures propagate unmodified and the
    /// caller decides whether to retry the whole call.
    fn read_temperature(&mut self) -> Result<f32, SensorError>;
}
