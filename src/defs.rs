/******************************************************************************
 * Refer to the Cirque GlidePoint documentation for more information:         *
 * - https://www.cirque.com/glidepoint-circle-trackpads                       *
 * ========================================================================== *
 *                 Pinnacle (TM0XX0XX) - Registers & Memory Map               *
 ******************************************************************************/

use embedded_hal::spi::{Mode, MODE_1};

/// SPI mode the Pinnacle expects (CPOL = 0, CPHA = 1).
pub const SPI_MODE: Mode = MODE_1;

/// Maximum SPI clock the Pinnacle supports.
pub const MAX_SPI_CLOCK_HZ: u32 = 10_000_000;

// RAP command framing
pub(crate) const READ_MASK: u8 = 0xA0;
pub(crate) const WRITE_MASK: u8 = 0x80;
pub(crate) const FILLER: u8 = 0xFC;

#[allow(dead_code)]
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Reg {
  FirmwareId = 0x00,
  FirmwareVersion = 0x01,
  Status1 = 0x02,
  SysConfig1 = 0x03,
  FeedConfig1 = 0x04,
  FeedConfig2 = 0x05,
  FeedConfig3 = 0x06,
  CalConfig1 = 0x07,
  Ps2AuxControl = 0x08,
  SampleRate = 0x09,
  ZIdle = 0x0A,
  ZScaler = 0x0B,
  SleepInterval = 0x0C,
  SleepTimer = 0x0D,

  // Absolute packet data (0x12..0x17)
  PacketByte0 = 0x12,
  PacketByte1 = 0x13,
  PacketByte2 = 0x14,
  PacketByte3 = 0x15,
  PacketByte4 = 0x16,
  PacketByte5 = 0x17,

  // Extended register access (0x1B..0x1E)
  EraValue = 0x1B,
  EraAddrHigh = 0x1C,
  EraAddrLow = 0x1D,
  EraControl = 0x1E,
}

impl From<Reg> for u8 {
  #[inline]
  fn from(r: Reg) -> Self {
    r as u8
  }
}

// FeedConfig1 bits
pub(crate) const FEED_ENABLE: u8 = 0x01;

// EraControl trigger codes; the register reads back 0x00 once the
// requested operation has completed.
pub(crate) const ERA_WRITE_TRIGGER: u8 = 0x02;
pub(crate) const ERA_READ_TRIGGER: u8 = 0x05;

// Extended register addresses (16-bit space, ERA only)
pub(crate) const ERA_ADC_ATTENUATION: u16 = 0x0187;
pub(crate) const ERA_X_WIDE_Z_MIN: u16 = 0x0149;
pub(crate) const ERA_Y_WIDE_Z_MIN: u16 = 0x0168;

// Wide-Z minimums written by the edge sensitivity tuning sequence
pub(crate) const X_WIDE_Z_MIN_VALUE: u8 = 0x04;
pub(crate) const Y_WIDE_Z_MIN_VALUE: u8 = 0x03;

// Minimum settle time the chip needs after a flag clear before the next
// transaction may start.
pub(crate) const CLEAR_FLAGS_SETTLE_US: u32 = 50;
