#![cfg_attr(not(test), no_std)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Blocking, `no_std` driver for the Cirque Pinnacle capacitive touch ASIC
//! used on TM0XX0XX (GlidePoint) trackpad modules.
//!
//! The Pinnacle exposes a small directly addressable register file over SPI
//! (the Register Access Protocol, RAP) and a second, 16-bit addressed tuning
//! space reachable only through a staged request/poll protocol (Extended
//! Register Access, ERA). This crate covers both, plus the data conditioning
//! the raw counts need before a host can use them:
//!
//! - RAP single- and multi-register reads/writes with the chip's command
//!   framing and filler bytes
//! - ERA reads/writes with a bounded completion poll and automatic
//!   feed suspend/restore around every access
//! - Absolute packet decode (12-bit X/Y, 6-bit Z, button flags) with the
//!   z-idle packet test, hover rejection against a per-zone Z map, and
//!   clipping/scaling to a caller-chosen resolution
//! - The vendor reference bring-up sequence, including the ADC attenuation
//!   and edge sensitivity tuning needed for curved overlays
//!
//! Built on the blocking `embedded-hal` 1.0 traits; the driver owns the SPI
//! bus, the chip-select and data-ready pins, and a delay source.
//!
//! ```no_run
//! use cirque_pinnacle::{Config, Pinnacle};
//! use embedded_hal::delay::DelayNs;
//! use embedded_hal::digital::{InputPin, OutputPin};
//! use embedded_hal::spi::SpiBus;
//!
//! fn example<SPI, CS, DR, D, E>(spi: SPI, cs: CS, dr: DR, delay: D) -> Result<(), cirque_pinnacle::Error<E>>
//! where
//!   SPI: SpiBus<u8, Error = E>,
//!   CS: OutputPin,
//!   DR: InputPin,
//!   D: DelayNs,
//! {
//!   let mut touchpad = Pinnacle::new(spi, cs, dr, delay, Config::default());
//!   touchpad.initialize()?;
//!
//!   loop {
//!     if touchpad.data_ready()? {
//!       let mut sample = touchpad.read_absolute()?;
//!       sample.clip();
//!       touchpad.check_hover(&mut sample)?;
//!       sample.scale(1920, 1080);
//!     }
//!   }
//! }
//! ```

mod config;
mod defs;
mod era;
mod init;
mod rw;
mod sample;
#[cfg(test)]
mod testing;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::spi::SpiBus;

pub use config::*;
use defs::*;
pub use defs::{MAX_SPI_CLOCK_HZ, SPI_MODE};
pub use sample::*;

/// Errors that can occur while interacting with the sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub enum Error<E> {
  /// SPI bus transaction failed with the underlying driver error.
  Bus(E),
  /// A chip-select or data-ready pin operation failed.
  Pin,
  /// An extended register operation did not complete within the configured
  /// poll bound. The whole ERA operation may be retried from the start; a
  /// partial retry risks desynchronizing the staged address.
  DeviceTimeout,
  /// A hover lookup used a zone index outside the map. Coordinates must be
  /// clipped before hover classification.
  OutOfRange,
}

/// Driver for the Cirque Pinnacle touch sensor.
///
/// The driver owns the SPI bus, the chip-select and data-ready pins, and a
/// delay source. All operations are synchronous and run to completion on the
/// caller's thread; the sensor's staging registers and feed-enable bit are
/// shared hardware state, so access from multiple threads needs external
/// mutual exclusion.
///
/// Create an instance with [`Pinnacle::new`], then call
/// [`Pinnacle::initialize`] to push the staged [`Config`] to the device.
pub struct Pinnacle<SPI, CS, DR, D> {
  spi: SPI,
  cs: CS,
  dr: DR,
  delay: D,
  config: Config,
}

impl<SPI, E, CS, DR, D> Pinnacle<SPI, CS, DR, D>
where
  SPI: SpiBus<u8, Error = E>,
  CS: OutputPin,
  DR: InputPin,
  D: DelayNs,
{
  /// Create a new driver instance with the provided peripherals and
  /// configuration template.
  ///
  /// The SPI peripheral must be configured for [`SPI_MODE`] at no more than
  /// [`MAX_SPI_CLOCK_HZ`], and the chip-select pin should start deasserted
  /// (high). Nothing is transmitted until [`Pinnacle::initialize`] or another
  /// operation is called.
  pub fn new(spi: SPI, cs: CS, dr: DR, delay: D, config: Config) -> Self {
    Self { spi, cs, dr, delay, config }
  }

  /// Whether the sensor has latched a new sample (DR pin asserted).
  pub fn data_ready(&mut self) -> Result<bool, Error<E>> {
    self.dr.is_high().map_err(|_| Error::Pin)
  }

  /// Clear the SW_CC and SW_DR flags in Status1, acknowledging the current
  /// sample or command completion.
  ///
  /// The chip needs a short settle time after a flag clear before the next
  /// transaction; the mandatory delay is part of this call.
  pub fn clear_flags(&mut self) -> Result<(), Error<E>> {
    self.rap_write(Reg::Status1, 0x00)?;
    self.delay.delay_us(CLEAR_FLAGS_SETTLE_US);
    Ok(())
  }

  /// Enable or disable the continuous reporting feed.
  ///
  /// Read-modify-write of FeedConfig1 touching only the enable bit; all
  /// other configuration bits are preserved.
  pub fn set_feed_enabled(&mut self, enabled: bool) -> Result<(), Error<E>> {
    let current = self.rap_read_reg(Reg::FeedConfig1)?;
    let value = if enabled { current | FEED_ENABLE } else { current & !FEED_ENABLE };
    self.rap_write(Reg::FeedConfig1, value)
  }

  /// Release the owned peripherals.
  pub fn release(self) -> (SPI, CS, DR, D) {
    (self.spi, self.cs, self.dr, self.delay)
  }
}
