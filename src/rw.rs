use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::spi::SpiBus;

use crate::defs::{Reg, FILLER, READ_MASK, WRITE_MASK};
use crate::{Error, Pinnacle};

impl<SPI, E, CS, DR, D> Pinnacle<SPI, CS, DR, D>
where
  SPI: SpiBus<u8, Error = E>,
  CS: OutputPin,
  DR: InputPin,
  D: DelayNs,
{
  /// Read `buf.len()` registers starting at `reg`, auto-incrementing per
  /// byte.
  ///
  /// The read command byte is followed by two filler bytes before register
  /// contents start clocking out; each further filler clocked in returns the
  /// next register. One chip-select bracket covers the whole exchange.
  pub(crate) fn rap_read(&mut self, reg: Reg, buf: &mut [u8]) -> Result<(), Error<E>> {
    let mut header = [READ_MASK | u8::from(reg), FILLER, FILLER];
    buf.fill(FILLER);

    self.select()?;
    let result = self
      .spi
      .transfer_in_place(&mut header)
      .and_then(|_| self.spi.transfer_in_place(buf))
      .and_then(|_| self.spi.flush())
      .map_err(Error::Bus);
    self.deselect()?;
    result
  }

  /// Write a single byte to `reg`.
  pub(crate) fn rap_write(&mut self, reg: Reg, value: u8) -> Result<(), Error<E>> {
    let mut frame = [WRITE_MASK | u8::from(reg), value];

    self.select()?;
    let result = self
      .spi
      .transfer_in_place(&mut frame)
      .and_then(|_| self.spi.flush())
      .map_err(Error::Bus);
    self.deselect()?;
    result
  }

  pub(crate) fn rap_read_reg(&mut self, reg: Reg) -> Result<u8, Error<E>> {
    let mut buf = [0u8; 1];
    self.rap_read(reg, &mut buf)?;
    Ok(buf[0])
  }

  fn select(&mut self) -> Result<(), Error<E>> {
    self.cs.set_low().map_err(|_| Error::Pin)
  }

  // Deasserted even when the exchange failed, so a bus error never leaves
  // the chip selected.
  fn deselect(&mut self) -> Result<(), Error<E>> {
    self.cs.set_high().map_err(|_| Error::Pin)
  }
}
