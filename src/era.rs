use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::spi::SpiBus;

use crate::defs::{Reg, ERA_READ_TRIGGER, ERA_WRITE_TRIGGER, FEED_ENABLE};
use crate::{Error, Pinnacle};

impl<SPI, E, CS, DR, D> Pinnacle<SPI, CS, DR, D>
where
  SPI: SpiBus<u8, Error = E>,
  CS: OutputPin,
  DR: InputPin,
  D: DelayNs,
{
  /// Read `buf.len()` bytes from the extended register space starting at
  /// `address`.
  ///
  /// Unlike the direct register space's burst read, an extended read runs
  /// one full trigger/poll/fetch/acknowledge cycle per byte; the
  /// chip advances the staged address by one after each completed read.
  /// The feed is suspended for the duration and restored on return.
  pub fn era_read(&mut self, address: u16, buf: &mut [u8]) -> Result<(), Error<E>> {
    self.with_feed_paused(|touchpad| {
      touchpad.rap_write(Reg::EraAddrHigh, (address >> 8) as u8)?;
      touchpad.rap_write(Reg::EraAddrLow, (address & 0xFF) as u8)?;

      for byte in buf.iter_mut() {
        touchpad.rap_write(Reg::EraControl, ERA_READ_TRIGGER)?;
        touchpad.wait_era_complete()?;
        *byte = touchpad.rap_read_reg(Reg::EraValue)?;
        touchpad.clear_flags()?;
      }

      Ok(())
    })
  }

  /// Write one byte to the extended register space at `address`.
  ///
  /// The data byte must be staged before the write trigger is issued; the
  /// hardware latches it from the staging register when the trigger lands.
  /// The feed is suspended for the duration and restored on return.
  pub fn era_write(&mut self, address: u16, data: u8) -> Result<(), Error<E>> {
    self.with_feed_paused(|touchpad| {
      touchpad.rap_write(Reg::EraValue, data)?;
      touchpad.rap_write(Reg::EraAddrHigh, (address >> 8) as u8)?;
      touchpad.rap_write(Reg::EraAddrLow, (address & 0xFF) as u8)?;
      touchpad.rap_write(Reg::EraControl, ERA_WRITE_TRIGGER)?;
      touchpad.wait_era_complete()?;
      touchpad.clear_flags()
    })
  }

  /// Poll EraControl until the chip reports completion (0x00), bounded by
  /// [`Config::era_poll_limit`](crate::Config::era_poll_limit) attempts.
  fn wait_era_complete(&mut self) -> Result<(), Error<E>> {
    for _ in 0..self.config.era_poll_limit {
      if self.rap_read_reg(Reg::EraControl)? == 0x00 {
        return Ok(());
      }
    }
    Err(Error::DeviceTimeout)
  }

  /// Run `op` with the feed disabled, restoring the saved FeedConfig1 value
  /// on every exit path.
  ///
  /// Extended register access and continuous reporting cannot interleave on
  /// this hardware. When both `op` and the restore write fail, the error
  /// from `op` wins.
  fn with_feed_paused<T>(
    &mut self,
    op: impl FnOnce(&mut Self) -> Result<T, Error<E>>,
  ) -> Result<T, Error<E>> {
    let saved = self.rap_read_reg(Reg::FeedConfig1)?;
    self.rap_write(Reg::FeedConfig1, saved & !FEED_ENABLE)?;

    let result = op(self);
    let restored = if saved & FEED_ENABLE != 0 {
      self.rap_write(Reg::FeedConfig1, saved)
    } else {
      Ok(())
    };

    let value = result?;
    restored?;
    Ok(value)
  }
}
