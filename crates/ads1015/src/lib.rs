//! Provides a driver for a TI ADS1015 4-channel 12-bit ADC via the `embedded-hal` ecosystem.
//!
//! Single-shot conversions only: every read writes the configuration
//! register, confirms the chip latched it, waits out one conversion interval
//! and then fetches the result. Nothing is retried; each bus transaction is
//! attempted exactly once and any failure is returned to the caller.

#![cfg_attr(not(test), no_std)]
#![forbid(unsafe_code)]

use core::fmt;

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

mod config;

pub use config::{DataRate, Gain};

use config::{build_config, reg, MUX_SINGLE, OS_SINGLE};

/// Fixed 7-bit bus address (ADDR pin tied to ground).
const ADDRESS: u8 = 0x48;

/// Errors reported by the driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error<E> {
    /// The underlying bus transaction failed.
    I2c(E),
    /// The chip's configuration register did not read back as written.
    ConfigReadback,
    /// Channel index outside the range accepted by the operation.
    InvalidChannel(u8),
    /// Output slice shorter than the requested channel list.
    BufferTooSmall,
}

impl<E> From<E> for Error<E> {
    fn from(e: E) -> Self {
        Self::I2c(e)
    }
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::I2c(e) => write!(f, "i2c transaction failed: {e:?}"),
            Self::ConfigReadback => write!(f, "configuration readback mismatch"),
            Self::InvalidChannel(channel) => write!(f, "invalid channel {channel}"),
            Self::BufferTooSmall => write!(f, "output buffer too small"),
        }
    }
}

impl<E: fmt::Debug> core::error::Error for Error<E> {}

/// ADS1015 driver.
///
/// The handle owns the bus and delay it is given and blocks the caller for
/// the duration of every call. It holds no lock: if several logical callers
/// share one handle, serializing them is their responsibility.
pub struct Ads1015<I2C, D> {
    i2c: I2C,
    delay: D,
    data_rate: DataRate,
    wait_us: u32,
    latched: u16,
    // Gains for channels 1..=3. Channel 0 always converts at the default.
    gains: [Gain; 3],
}

/// Resolves a channel index to its mux code, rejecting anything out of range
/// before it can reach the bus.
fn mux_for<E>(channel: u8) -> Result<u16, Error<E>> {
    MUX_SINGLE
        .get(usize::from(channel))
        .copied()
        .ok_or(Error::InvalidChannel(channel))
}

impl<I2C, D, E> Ads1015<I2C, D>
where
    I2C: I2c<Error = E>,
    D: DelayNs,
{
    /// Creates a driver from an I2C peripheral and a delay source.
    ///
    /// No bus traffic happens here; call [`begin`](Self::begin) once before
    /// reading.
    pub fn new(i2c: I2C, delay: D) -> Self {
        let data_rate = DataRate::default();

        Self {
            i2c,
            delay,
            data_rate,
            wait_us: data_rate.conversion_wait_us(),
            latched: 0,
            gains: [Gain::default(); 3],
        }
    }

    /// Latches the sample rate and probes the chip with one configure cycle
    /// on channel 0 at the default gain.
    ///
    /// A failure here means the chip is absent or the bus is broken; nothing
    /// is left latched and the handle may simply retry.
    pub fn begin(&mut self, rate: DataRate) -> Result<(), Error<E>> {
        self.data_rate = rate;
        self.wait_us = rate.conversion_wait_us();

        self.configure(MUX_SINGLE[0], Gain::default())
    }

    /// Stores the gain applied when `channel` is read through
    /// [`read_data`](Self::read_data).
    ///
    /// Only channels 1..=3 carry a configurable gain; channel 0 always
    /// converts at the default ±4.096 V range.
    pub fn set_gain(&mut self, channel: u8, gain: Gain) -> Result<(), Error<E>> {
        match channel {
            1..=3 => {
                self.gains[usize::from(channel) - 1] = gain;
                Ok(())
            }
            _ => Err(Error::InvalidChannel(channel)),
        }
    }

    /// Runs one single-shot conversion on `channel` at `gain` and returns
    /// the 12-bit result.
    pub fn read_single(&mut self, channel: u8, gain: Gain) -> Result<u16, Error<E>> {
        let mux = mux_for(channel)?;

        self.configure(mux, gain)?;
        self.delay.delay_us(self.wait_us);

        let raw = self.read_register(reg::CONVERT)?;

        // The result sits in the top 12 bits of the register.
        Ok(raw >> 4)
    }

    /// Converts every channel in `channels` into `samples`, in order, using
    /// each channel's stored gain. Duplicate entries are read independently.
    ///
    /// The batch fails atomically: on `Err` the contents of `samples` are
    /// not valid output.
    pub fn read_data(&mut self, channels: &[u8], samples: &mut [u16]) -> Result<(), Error<E>> {
        if samples.len() < channels.len() {
            return Err(Error::BufferTooSmall);
        }

        // Validate the whole list up front so a bad index costs no bus traffic.
        for &channel in channels {
            mux_for::<E>(channel)?;
        }

        for (slot, &channel) in samples.iter_mut().zip(channels) {
            *slot = self.read_single(channel, self.gain_for(channel))?;
        }

        Ok(())
    }

    /// Configuration word most recently confirmed by readback.
    pub fn latched_config(&self) -> u16 {
        self.latched
    }

    /// Gives back the bus and delay.
    pub fn release(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }

    fn gain_for(&self, channel: u8) -> Gain {
        match channel {
            1..=3 => self.gains[usize::from(channel) - 1],
            _ => Gain::default(),
        }
    }

    /// Writes a configuration word and confirms the chip latched it.
    ///
    /// The comparison masks the one-shot trigger bit out of both sides: it
    /// self-clears as soon as the conversion starts. Any other difference
    /// means the chip never saw the write, and the word is not recorded.
    fn configure(&mut self, mux: u16, gain: Gain) -> Result<(), Error<E>> {
        let word = build_config(mux, gain, self.data_rate);

        self.write_register(reg::CONFIG, word)?;

        let readback = self.read_register(reg::CONFIG)?;
        if readback & !OS_SINGLE != word & !OS_SINGLE {
            return Err(Error::ConfigReadback);
        }

        self.latched = word;

        Ok(())
    }

    fn write_register(&mut self, reg: u8, value: u16) -> Result<(), Error<E>> {
        let [hi, lo] = value.to_be_bytes();
        self.i2c.write(ADDRESS, &[reg, hi, lo])?;

        Ok(())
    }

    fn read_register(&mut self, reg: u8) -> Result<u16, Error<E>> {
        let mut buf = [0u8; 2];
        self.i2c.write_read(ADDRESS, &[reg], &mut buf)?;

        Ok(u16::from_be_bytes(buf))
    }
}
