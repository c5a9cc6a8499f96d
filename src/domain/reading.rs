//! Temperature reading domain entity

/// A compensated temperature reading at a point in time.
///
/// This is what consumers (forwarding tasks, data loggers) pass around;
/// it has no knowledge of how the value was obtained.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TemperatureReading {
    /// Timestamp in microseconds since boot
    pub timestamp_us: i64,
    /// Temperature in degrees Celsius
    pub celsius: f32,
}

impl TemperatureReading {
    /// Create a new reading
    pub const fn new(timestamp_us: i64, celsius: f32) -> Self {
        Self {
            timestamp_us,
            celsius,
        }
    }
}
