//! BME280 temperature sensor driver
//!
//! Implements [`TemperatureSensorPort`] on top of any [`BusPort`]
//! transport. The driver owns the setup lifecycle: probe the chip
//! identification register, load the factory calibration, switch the
//! device into normal acquisition mode, then serve reads. Setup runs
//! lazily on the first read and re-runs after a fault.

use embedded_hal::delay::DelayNs;

use crate::domain::{CalibrationData, RawTemperatureSample};
use crate::ports::bus::{BusConfig, BusError, BusPort, BusProviderPort};
use crate::ports::sensor::{SensorError, TemperatureSensorPort};

/// BME280 register map.
///
/// All addresses are 8-bit; 16-bit registers transmit their low byte
/// first.
#[derive(Clone, Copy)]
#[repr(u8)]
pub enum Bme280Register {
    /// Compensation word dig_T1 (0x88/0x89, unsigned)
    CalibT1 = 0x88,
    /// Compensation word dig_T2 (0x8A/0x8B, signed)
    CalibT2 = 0x8A,
    /// Compensation word dig_T3 (0x8C/0x8D, signed)
    CalibT3 = 0x8C,
    /// Chip identification number, reads 0x60
    ChipId = 0xD0,
    /// ctrl_meas: acquisition options (oversampling + power mode)
    CtrlMeas = 0xF4,
    /// Raw temperature bits 19:12
    TempMsb = 0xFA,
    /// Raw temperature bits 11:4
    TempLsb = 0xFB,
    /// Raw temperature bits 3:0, upper nibble
    TempXlsb = 0xFC,
}

/// Chip identification number of the BME280 family
pub const BME280_CHIP_ID: u8 = 0x60;

/// Default binding: controller "I2C1", address 0x77, 400 kHz fast mode
pub const BME280_BUS_CONFIG: BusConfig = BusConfig::new("I2C1", 0x77, 400_000);

/// ctrl_meas value: temperature x1, pressure x16 oversampling, normal mode
const CTRL_MEAS_NORMAL: u8 = 0x3F;

/// Wait after the ctrl_meas write before samples are guaranteed valid
const SETTLE_DELAY_US: u32 = 1_000;

/// Driver lifecycle.
///
/// Setup walks `Identifying -> Calibrating -> Configuring`; success lands
/// in `Ready`, which carries the loaded calibration so compensation has a
/// typed precondition. Any setup failure lands in `Faulted`; the next
/// read re-attempts the whole sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DriverState {
    /// No register traffic has happened yet
    Uninitialized,
    /// Probing the chip identification register
    Identifying,
    /// Loading calibration coefficients
    Calibrating,
    /// Writing the acquisition mode
    Configuring,
    /// Configured and serving reads
    Ready(CalibrationData),
    /// Setup failed; re-attempted on the next read
    Faulted,
}

/// BME280 driver instance.
///
/// Owns the bus provider, the bound transport (one exclusive owner per
/// device), and the lifecycle state. Generic over the provider and a
/// delay source so the whole state machine runs under host tests.
pub struct Bme280Driver<P, D>
where
    P: BusProviderPort,
    D: DelayNs,
{
    provider: P,
    delay: D,
    config: BusConfig,
    bus: Option<P::Bus>,
    state: DriverState,
}

impl<P, D> Bme280Driver<P, D>
where
    P: BusProviderPort,
    D: DelayNs,
{
    /// Create a driver with the default BME280 binding.
    ///
    /// The bus is not resolved until [`initialize`](Self::initialize).
    pub fn new(provider: P, delay: D) -> Self {
        Self::with_bus_config(provider, delay, BME280_BUS_CONFIG)
    }

    /// Create a driver with a custom bus binding
    pub fn with_bus_config(provider: P, delay: D, config: BusConfig) -> Self {
        Self {
            provider,
            delay,
            config,
            bus: None,
            state: DriverState::Uninitialized,
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> DriverState {
        self.state
    }

    /// Whether setup has completed
    pub fn is_ready(&self) -> bool {
        matches!(self.state, DriverState::Ready(_))
    }

    /// Loaded calibration coefficients, once the driver is `Ready`
    pub fn calibration(&self) -> Option<CalibrationData> {
        match self.state {
            DriverState::Ready(calibration) => Some(calibration),
            _ => None,
        }
    }

    /// Release the bound transport, consuming the driver
    pub fn release(self) -> Option<P::Bus> {
        self.bus
    }

    /// Locate and bind the bus transport for the sensor's address.
    ///
    /// Pure resource acquisition; no register traffic. Idempotent once a
    /// transport is bound.
    pub fn initialize(&mut self) -> Result<(), SensorError> {
        if self.bus.is_some() {
            return Ok(());
        }
        match self.provider.open(&self.config) {
            Some(bus) => {
                self.bus = Some(bus);
                Ok(())
            }
            None => Err(SensorError::DeviceNotFound),
        }
    }

    /// Read one compensated temperature in degrees Celsius.
    ///
    /// Runs setup first if the driver is not `Ready`. Every call issues
    /// three fresh register reads; nothing is cached.
    pub fn read_temperature(&mut self) -> Result<f32, SensorError> {
        let calibration = self.ensure_ready()?;

        let bus = self.bus.as_mut().ok_or(SensorError::DeviceNotFound)?;
        let msb = read_u8(bus, Bme280Register::TempMsb)?;
        let lsb = read_u8(bus, Bme280Register::TempLsb)?;
        let xlsb = read_u8(bus, Bme280Register::TempXlsb)?;

        let raw = RawTemperatureSample::from_bytes(msb, lsb, xlsb);
        Ok(calibration.raw_to_celsius(raw.value()) as f32)
    }

    /// Run the identify/calibrate/configure sequence unless already done.
    ///
    /// A failure anywhere leaves the driver `Faulted` and aborts the
    /// remaining steps; the error propagates unmodified.
    fn ensure_ready(&mut self) -> Result<CalibrationData, SensorError> {
        if let DriverState::Ready(calibration) = self.state {
            return Ok(calibration);
        }
        match self.run_setup() {
            Ok(calibration) => {
                self.state = DriverState::Ready(calibration);
                Ok(calibration)
            }
            Err(err) => {
                self.state = DriverState::Faulted;
                Err(err)
            }
        }
    }

    fn run_setup(&mut self) -> Result<CalibrationData, SensorError> {
        let bus = self.bus.as_mut().ok_or(SensorError::DeviceNotFound)?;

        // The chip-id probe is the only register access allowed before
        // the driver is configured.
        self.state = DriverState::Identifying;
        let id = read_u8(bus, Bme280Register::ChipId)?;
        if id != BME280_CHIP_ID {
            return Err(SensorError::SignatureMismatch);
        }

        self.state = DriverState::Calibrating;
        let t1 = read_u16_le(bus, Bme280Register::CalibT1)?;
        let t2 = read_u16_le(bus, Bme280Register::CalibT2)?;
        let t3 = read_u16_le(bus, Bme280Register::CalibT3)?;
        let calibration = CalibrationData::from_words(t1, t2, t3);

        self.state = DriverState::Configuring;
        bus.write(&[Bme280Register::CtrlMeas as u8, CTRL_MEAS_NORMAL])?;

        // The device needs a moment after the mode write before its data
        // registers hold a valid conversion.
        self.delay.delay_us(SETTLE_DELAY_US);

        Ok(calibration)
    }
}

impl<P, D> TemperatureSensorPort for Bme280Driver<P, D>
where
    P: BusProviderPort,
    D: DelayNs,
{
    fn initialize(&mut self) -> Result<(), SensorError> {
        Bme280Driver::initialize(self)
    }

    fn read_temperature(&mut self) -> Result<f32, SensorError> {
        Bme280Driver::read_temperature(self)
    }
}

/// One-byte register read: write the register address, read one byte
fn read_u8<B: BusPort>(bus: &mut B, register: Bme280Register) -> Result<u8, BusError> {
    let mut buffer = [0u8; 1];
    bus.write_read(&[register as u8], &mut buffer)?;
    Ok(buffer[0])
}

/// Two-byte register read. The device transmits the low byte first, so
/// the value is `(buffer[1] << 8) | buffer[0]`.
fn read_u16_le<B: BusPort>(bus: &mut B, register: Bme280Register) -> Result<u16, BusError> {
    let mut buffer = [0u8; 2];
    bus.write_read(&[register as u8], &mut buffer)?;
    Ok(((buffer[1] as u16) << 8) | buffer[0] as u16)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::vec;
    use std::vec::Vec;

    #[derive(Clone, Debug, PartialEq)]
    enum BusCall {
        WriteRead { register: u8, len: usize },
        Write { bytes: Vec<u8> },
    }

    /// Transport that replays a script of read responses and records
    /// every transaction it sees.
    struct ScriptedBus {
        script: VecDeque<Result<Vec<u8>, BusError>>,
        write_response: Result<(), BusError>,
        calls: Vec<BusCall>,
    }

    impl ScriptedBus {
        fn new(script: Vec<Result<Vec<u8>, BusError>>) -> Self {
            Self {
                script: script.into(),
                write_response: Ok(()),
                calls: Vec::new(),
            }
        }

        fn with_failing_writes(mut self, err: BusError) -> Self {
            self.write_response = Err(err);
            self
        }
    }

    impl BusPort for ScriptedBus {
        fn write_read(&mut self, bytes: &[u8], buffer: &mut [u8]) -> Result<(), BusError> {
            self.calls.push(BusCall::WriteRead {
                register: bytes[0],
                len: buffer.len(),
            });
            let response = self.script.pop_front().expect("unscripted bus read")?;
            buffer.copy_from_slice(&response);
            Ok(())
        }

        fn write(&mut self, bytes: &[u8]) -> Result<(), BusError> {
            self.calls.push(BusCall::Write {
                bytes: bytes.to_vec(),
            });
            self.write_response
        }
    }

    /// Provider holding one pre-built transport for controller "I2C1"
    struct SingleBus {
        bus: Option<ScriptedBus>,
    }

    impl SingleBus {
        fn new(bus: ScriptedBus) -> Self {
            Self { bus: Some(bus) }
        }

        fn absent() -> Self {
            Self { bus: None }
        }
    }

    impl BusProviderPort for SingleBus {
        type Bus = ScriptedBus;

        fn open(&mut self, config: &BusConfig) -> Option<ScriptedBus> {
            if config.controller != "I2C1" {
                return None;
            }
            self.bus.take()
        }
    }

    struct NoopDelay;

    impl DelayNs for NoopDelay {
        fn delay_ns(&mut self, _ns: u32) {}
    }

    // Wire bytes for {t1: 27504, t2: 26435, t3: -1000}, low byte first.
    fn setup_script() -> Vec<Result<Vec<u8>, BusError>> {
        vec![
            Ok(vec![BME280_CHIP_ID]),
            Ok(vec![0x70, 0x6B]),
            Ok(vec![0x43, 0x67]),
            Ok(vec![0x18, 0xFC]),
        ]
    }

    // MSB/LSB/XLSB fragments of raw sample 519888 (0x7EED0).
    fn sample_script() -> Vec<Result<Vec<u8>, BusError>> {
        vec![Ok(vec![0x7E]), Ok(vec![0xED]), Ok(vec![0x00])]
    }

    fn bound_driver(bus: ScriptedBus) -> Bme280Driver<SingleBus, NoopDelay> {
        let mut driver = Bme280Driver::new(SingleBus::new(bus), NoopDelay);
        driver.initialize().unwrap();
        driver
    }

    #[test]
    fn initialize_does_no_register_traffic() {
        let driver = bound_driver(ScriptedBus::new(vec![]));
        assert_eq!(driver.state(), DriverState::Uninitialized);
        let bus = driver.release().unwrap();
        assert!(bus.calls.is_empty());
    }

    #[test]
    fn initialize_is_idempotent_once_bound() {
        let mut driver = bound_driver(ScriptedBus::new(vec![]));
        // The provider has nothing left to hand out; a second call must
        // not go back to it.
        assert_eq!(driver.initialize(), Ok(()));
    }

    #[test]
    fn missing_device_reports_not_found() {
        let mut driver = Bme280Driver::new(SingleBus::absent(), NoopDelay);
        assert_eq!(driver.initialize(), Err(SensorError::DeviceNotFound));
        assert_eq!(driver.read_temperature(), Err(SensorError::DeviceNotFound));
    }

    #[test]
    fn first_read_runs_full_setup_then_samples() {
        let mut script = setup_script();
        script.extend(sample_script());
        let mut driver = bound_driver(ScriptedBus::new(script));

        let celsius = driver.read_temperature().unwrap();
        assert!((celsius - 25.036).abs() < 0.01);
        assert!(driver.is_ready());
        assert_eq!(
            driver.calibration(),
            Some(CalibrationData::new(27504, 26435, -1000))
        );

        let bus = driver.release().unwrap();
        assert_eq!(
            bus.calls,
            vec![
                BusCall::WriteRead { register: 0xD0, len: 1 },
                BusCall::WriteRead { register: 0x88, len: 2 },
                BusCall::WriteRead { register: 0x8A, len: 2 },
                BusCall::WriteRead { register: 0x8C, len: 2 },
                BusCall::Write { bytes: vec![0xF4, 0x3F] },
                BusCall::WriteRead { register: 0xFA, len: 1 },
                BusCall::WriteRead { register: 0xFB, len: 1 },
                BusCall::WriteRead { register: 0xFC, len: 1 },
            ]
        );
    }

    #[test]
    fn signature_mismatch_stops_after_one_transaction() {
        let mut driver = bound_driver(ScriptedBus::new(vec![Ok(vec![0x58])]));

        assert_eq!(
            driver.read_temperature(),
            Err(SensorError::SignatureMismatch)
        );
        assert_eq!(driver.state(), DriverState::Faulted);

        let bus = driver.release().unwrap();
        assert_eq!(
            bus.calls,
            vec![BusCall::WriteRead { register: 0xD0, len: 1 }]
        );
    }

    #[test]
    fn calibration_fault_short_circuits_setup() {
        let script = vec![
            Ok(vec![BME280_CHIP_ID]),
            Ok(vec![0x70, 0x6B]),
            Err(BusError::NoAcknowledge),
        ];
        let mut driver = bound_driver(ScriptedBus::new(script));

        assert_eq!(
            driver.read_temperature(),
            Err(SensorError::Bus(BusError::NoAcknowledge))
        );
        assert_eq!(driver.state(), DriverState::Faulted);

        let bus = driver.release().unwrap();
        // Chip id + two calibration attempts; no third word, no control
        // write, no sample reads.
        assert_eq!(bus.calls.len(), 3);
        assert!(!bus
            .calls
            .iter()
            .any(|call| matches!(call, BusCall::Write { .. })));
    }

    #[test]
    fn control_write_fault_surfaces() {
        let bus = ScriptedBus::new(setup_script()).with_failing_writes(BusError::Fault);
        let mut driver = bound_driver(bus);

        assert_eq!(
            driver.read_temperature(),
            Err(SensorError::Bus(BusError::Fault))
        );
        assert_eq!(driver.state(), DriverState::Faulted);

        let bus = driver.release().unwrap();
        assert_eq!(bus.calls.len(), 5);
    }

    #[test]
    fn faulted_driver_retries_setup_on_next_read() {
        let mut script = vec![Err(BusError::Timeout)];
        script.extend(setup_script());
        script.extend(sample_script());
        let mut driver = bound_driver(ScriptedBus::new(script));

        assert_eq!(
            driver.read_temperature(),
            Err(SensorError::Bus(BusError::Timeout))
        );
        assert_eq!(driver.state(), DriverState::Faulted);

        let celsius = driver.read_temperature().unwrap();
        assert!((celsius - 25.036).abs() < 0.01);
        assert!(driver.is_ready());
    }

    #[test]
    fn sample_fault_keeps_the_device_configured() {
        let mut script = setup_script();
        script.push(Err(BusError::Fault));
        let mut driver = bound_driver(ScriptedBus::new(script));

        assert_eq!(
            driver.read_temperature(),
            Err(SensorError::Bus(BusError::Fault))
        );
        // Setup succeeded; a failed sample read does not demote the
        // driver back to unconfigured.
        assert!(driver.is_ready());
    }

    #[test]
    fn second_read_reuses_setup_and_rereads_the_bus() {
        let mut script = setup_script();
        script.extend(sample_script());
        script.extend(sample_script());
        let mut driver = bound_driver(ScriptedBus::new(script));

        driver.read_temperature().unwrap();
        driver.read_temperature().unwrap();

        let bus = driver.release().unwrap();
        // 5 setup transactions + 3 sample reads per call.
        assert_eq!(bus.calls.len(), 11);
    }

    #[test]
    fn sixteen_bit_reads_are_low_byte_first() {
        let mut script = Vec::with_capacity(1 << 16);
        for hi in 0..=0xFFu16 {
            for lo in 0..=0xFFu16 {
                script.push(Ok(vec![lo as u8, hi as u8]));
            }
        }
        let mut bus = ScriptedBus::new(script);
        for hi in 0..=0xFFu16 {
            for lo in 0..=0xFFu16 {
                let value = read_u16_le(&mut bus, Bme280Register::CalibT1).unwrap();
                assert_eq!(value, (hi << 8) | lo);
            }
        }
    }
}
