use crate::sample::{X_MAX, Y_MAX};

/// Zone edge length in sensor counts for hover map lookups.
pub const ZONE_SCALE: u16 = 256;

/// Hover map columns, covering the full X count range.
pub const ZONE_COLS: usize = (X_MAX as usize + 1) / ZONE_SCALE as usize;
/// Hover map rows, covering the full Y count range.
pub const ZONE_ROWS: usize = (Y_MAX as usize + 1) / ZONE_SCALE as usize;

/// ADC attenuation codes, the top two bits of extended register 0x0187.
///
/// Attenuation divides the finger signal fed back into the ADC. Thin flat
/// overlays want the maximum `X4`; thick or curved overlays need less.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, defmt::Format)]
pub enum AdcAttenuation {
  X1 = 0x00,
  X2 = 0x40,
  X3 = 0x80,
  X4 = 0xC0,
}

/// Per-zone maximum Z value still considered hovering.
///
/// Immutable configuration data: loaded once, indexed by `position /
/// ZONE_SCALE` after clipping, never mutated at runtime. The table covers
/// the sensor's full count range, so any clipped coordinate maps to a valid
/// zone. Values want experimentation against the actual overlay.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ZoneHoverMap {
  thresholds: [[u8; ZONE_COLS]; ZONE_ROWS],
}

impl ZoneHoverMap {
  pub const fn new(thresholds: [[u8; ZONE_COLS]; ZONE_ROWS]) -> Self {
    Self { thresholds }
  }

  /// Threshold for a zone, or `None` when the index is out of bounds.
  pub fn threshold(&self, zone_x: u16, zone_y: u16) -> Option<u8> {
    self
      .thresholds
      .get(usize::from(zone_y))?
      .get(usize::from(zone_x))
      .copied()
  }
}

impl Default for ZoneHoverMap {
  /// Reference table for the Cirque curved overlay: sensitivity bulges in
  /// the middle of the pad, so thresholds peak there and fall to zero at
  /// the rim.
  fn default() -> Self {
    Self::new([
      [0, 0, 0, 0, 0, 0, 0, 0],
      [0, 2, 3, 5, 5, 3, 2, 0],
      [0, 3, 5, 15, 15, 5, 3, 0],
      [0, 3, 5, 15, 15, 5, 3, 0],
      [0, 2, 3, 5, 5, 3, 2, 0],
      [0, 0, 0, 0, 0, 0, 0, 0],
    ])
  }
}

/// Staged device configuration, transmitted by
/// [`Pinnacle::initialize`](crate::Pinnacle::initialize).
///
/// Defaults mirror the vendor reference bring-up: absolute output mode with
/// the feed enabled, all-default system config, and a z-idle count of 5
/// instead of the power-on 30.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
  /// SysConfig1 (0x03).
  pub sys_config: u8,
  /// FeedConfig1 (0x04). Bit 0 is the feed enable, bit 1 selects absolute
  /// mode.
  pub feed_config1: u8,
  /// FeedConfig2 (0x05).
  pub feed_config2: u8,
  /// Number of z-idle packets sent after lift-off (0x0A).
  pub z_idle_count: u8,
  pub adc_attenuation: AdcAttenuation,
  /// Attempts before an extended register poll fails with
  /// [`Error::DeviceTimeout`](crate::Error::DeviceTimeout).
  pub era_poll_limit: u16,
  pub zone_map: ZoneHoverMap,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      sys_config: 0x00,
      feed_config1: 0x03,
      feed_config2: 0x1F,
      z_idle_count: 5,
      adc_attenuation: AdcAttenuation::X1,
      era_poll_limit: 1000,
      zone_map: ZoneHoverMap::default(),
    }
  }
}
