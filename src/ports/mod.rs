//! Ports (interfaces) defining the boundaries of the application
//!
//! Ports are traits that define how the domain interacts with external
//! systems. They allow the domain to remain independent of specific
//! implementations.
//!
//! # Hexagonal Architecture
//!
//! In hexagonal architecture, ports define the "holes" in the hexagon where
//! adapters plug in:
//!
//! - **BusPort**: How registers are accessed (I2C controller, mock)
//! - **BusProviderPort**: How the platform resolves a bus binding
//! - **TemperatureSensorPort**: How consumers read temperatures

pub mod bus;
pub mod sensor;

pub use bus::{BusConfig, BusError, BusPort, BusProviderPort};
pub use sensor::{SensorError, TemperatureSensorPort};
