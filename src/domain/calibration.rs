//! Temperature calibration domain service
//!
//! This module holds the factory-trimmed compensation coefficients read
//! from the sensor's non-volatile registers and the formula that turns a
//! raw 20-bit ADC count into degrees Celsius.

/// Factory calibration coefficients for temperature compensation.
///
/// Read once from the sensor during setup and treated as read-only for
/// the rest of the session. The three words share one wire format; they
/// differ only in how the bits are interpreted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CalibrationData {
    /// Temperature coefficient 1 (unsigned, typical ~27000-28000)
    pub t1: u16,
    /// Temperature coefficient 2 (signed)
    pub t2: i16,
    /// Temperature coefficient 3 (signed)
    pub t3: i16,
}

impl CalibrationData {
    /// Create calibration data from already-interpreted coefficients
    pub const fn new(t1: u16, t2: i16, t3: i16) -> Self {
        Self { t1, t2, t3 }
    }

    /// Build calibration data from the three raw 16-bit register words.
    ///
    /// All three arrive as identical unsigned wire words; t2 and t3 are
    /// reinterpreted as two's-complement signed values.
    pub const fn from_words(t1: u16, t2: u16, t3: u16) -> Self {
        Self {
            t1,
            t2: t2 as i16,
            t3: t3 as i16,
        }
    }

    /// Convert a raw 20-bit temperature sample to degrees Celsius.
    ///
    /// Intermediate arithmetic is double precision; callers narrow to
    /// `f32` at the edge. Deterministic: identical inputs produce a
    /// bit-identical result.
    ///
    /// TODO: the datasheet squares the bracketed expression in the second
    /// term; verify against a reference device before switching to the
    /// squared form here.
    pub fn raw_to_celsius(&self, raw: u32) -> f64 {
        let raw = raw as f64;
        let t1 = self.t1 as f64;

        let var1 = (raw / 16384.0 - t1 / 1024.0) * self.t2 as f64;
        let var2 = (raw / 131072.0 - t1 / 8192.0) * self.t3 as f64;

        (var1 + var2) / 5120.0
    }
}
