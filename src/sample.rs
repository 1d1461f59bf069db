use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::spi::SpiBus;

use crate::config::ZONE_SCALE;
use crate::defs::Reg;
use crate::{Error, Pinnacle};

/// Highest X count the sensor can report (12-bit field).
pub const X_MAX: u16 = 2047;
/// Highest Y count the sensor can report (12-bit field).
pub const Y_MAX: u16 = 1535;

// Reachable window of the sensor. Values outside it only appear as noise
// artifacts and are clipped away.
pub const X_LOWER: u16 = 127;
pub const X_UPPER: u16 = 1919;
pub const Y_LOWER: u16 = 63;
pub const Y_UPPER: u16 = 1471;

pub const X_RANGE: u16 = X_UPPER - X_LOWER;
pub const Y_RANGE: u16 = Y_UPPER - Y_LOWER;

/// One absolute-mode position report.
///
/// `touch_down` is the chip's crude presence heuristic (`x_pos != 0`); the
/// canonical no-touch signal is the all-zero z-idle packet tested by
/// [`AbsoluteSample::is_idle`]. The two are intentionally distinct and used
/// at different call sites.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub struct AbsoluteSample {
  /// X position, 12 bits.
  pub x_pos: u16,
  /// Y position, 12 bits.
  pub y_pos: u16,
  /// Z (pressure) value, 6 bits. Decreases toward 0 as the finger lifts.
  pub z_pos: u8,
  /// Button states, low 6 bits.
  pub button_flags: u8,
  pub touch_down: bool,
  pub hovering: bool,
}

impl AbsoluteSample {
  /// Decode a raw packet from registers 0x12..=0x17. Pure; no driver state
  /// involved.
  pub(crate) fn decode(raw: &[u8; 6]) -> Self {
    let x_pos = u16::from(raw[2]) | ((u16::from(raw[4]) & 0x0F) << 8);
    let y_pos = u16::from(raw[3]) | ((u16::from(raw[4]) & 0xF0) << 4);

    Self {
      x_pos,
      y_pos,
      z_pos: raw[5] & 0x3F,
      button_flags: raw[0] & 0x3F,
      touch_down: x_pos != 0,
      hovering: false,
    }
  }

  /// Whether this is a z-idle packet: all-zero x/y/z, signifying no touch.
  pub fn is_idle(&self) -> bool {
    self.x_pos == 0 && self.y_pos == 0 && self.z_pos == 0
  }

  /// Clamp the coordinates into the sensor's reachable window.
  pub fn clip(&mut self) {
    self.x_pos = self.x_pos.clamp(X_LOWER, X_UPPER);
    self.y_pos = self.y_pos.clamp(Y_LOWER, Y_UPPER);
  }

  /// Rescale the coordinates to `(x_res, y_res)`.
  ///
  /// Clips first, rebases to zero, then multiplies by the target resolution
  /// and divides by the native range per axis. The truncating division is
  /// part of the contract; consumers depend on this exact scaling law.
  pub fn scale(&mut self, x_res: u16, y_res: u16) {
    self.clip();

    let x = u32::from(self.x_pos - X_LOWER);
    let y = u32::from(self.y_pos - Y_LOWER);

    self.x_pos = (x * u32::from(x_res) / u32::from(X_RANGE)) as u16;
    self.y_pos = (y * u32::from(y_res) / u32::from(Y_RANGE)) as u16;
  }
}

impl<SPI, E, CS, DR, D> Pinnacle<SPI, CS, DR, D>
where
  SPI: SpiBus<u8, Error = E>,
  CS: OutputPin,
  DR: InputPin,
  D: DelayNs,
{
  /// Read one absolute packet and acknowledge it to the device so the next
  /// sample can be latched.
  pub fn read_absolute(&mut self) -> Result<AbsoluteSample, Error<E>> {
    let mut raw = [0u8; 6];
    self.rap_read(Reg::PacketByte0, &mut raw)?;
    self.clear_flags()?;
    Ok(AbsoluteSample::decode(&raw))
  }

  /// Classify whether the finger is hovering rather than contacting the
  /// overlay, against the per-zone Z threshold map.
  ///
  /// A curved overlay leaves the sensing field projecting past the surface
  /// near the perimeter, so a finger can register without touching; any Z at
  /// or below the zone's threshold is treated as hovering. Clip the sample
  /// first: a zone index outside the map returns [`Error::OutOfRange`].
  pub fn check_hover(&mut self, sample: &mut AbsoluteSample) -> Result<(), Error<E>> {
    let zone_x = sample.x_pos / ZONE_SCALE;
    let zone_y = sample.y_pos / ZONE_SCALE;
    let threshold = self
      .config
      .zone_map
      .threshold(zone_x, zone_y)
      .ok_or(Error::OutOfRange)?;

    sample.hovering = !(sample.z_pos > threshold);
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use embedded_hal_mock::eh1::delay::{self, NoopDelay};
  use embedded_hal_mock::eh1::digital;
  use embedded_hal_mock::eh1::spi;

  use super::*;
  use crate::config::{ZoneHoverMap, ZONE_COLS, ZONE_ROWS};
  use crate::testing::{cs_brackets, rap_read, rap_write};
  use crate::Config;

  fn idle_touchpad(config: Config) -> Pinnacle<spi::Mock<u8>, digital::Mock, digital::Mock, NoopDelay> {
    let mut bus = spi::Mock::new(&[]);
    let mut cs = digital::Mock::new(&[]);
    let mut dr = digital::Mock::new(&[]);
    bus.done();
    cs.done();
    dr.done();
    Pinnacle::new(bus, cs, dr, NoopDelay::new(), config)
  }

  #[test]
  fn decode_unpacks_packet_fields() {
    let raw = [0x00, 0x00, 0x12, 0x34, 0x05, 0x1F];
    let sample = AbsoluteSample::decode(&raw);

    assert_eq!(sample.button_flags, 0x00);
    assert_eq!(sample.x_pos, 0x534);
    assert_eq!(sample.y_pos, 0x12);
    assert_eq!(sample.z_pos, 0x1F);
    assert!(sample.touch_down);
  }

  #[test]
  fn decode_is_pure() {
    let raw = [0x3F, 0xFF, 0xAA, 0xBB, 0xCD, 0x7F];
    assert_eq!(AbsoluteSample::decode(&raw), AbsoluteSample::decode(&raw));
  }

  #[test]
  fn decode_masks_to_field_widths() {
    let raw = [0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF];
    let sample = AbsoluteSample::decode(&raw);

    assert_eq!(sample.x_pos, 0xFFF);
    assert_eq!(sample.y_pos, 0xFFF);
    assert_eq!(sample.z_pos, 0x3F);
    assert_eq!(sample.button_flags, 0x3F);
  }

  #[test]
  fn idle_packet_is_all_zero_triple() {
    let idle = AbsoluteSample::decode(&[0, 0, 0, 0, 0, 0]);
    assert!(idle.is_idle());
    assert!(!idle.touch_down);

    // Nonzero y alone defeats the idle test but not the presence heuristic;
    // the two predicates must stay distinct.
    let noisy = AbsoluteSample { y_pos: 7, ..idle };
    assert!(!noisy.is_idle());
    assert!(!noisy.touch_down);
  }

  #[test]
  fn clip_is_idempotent_and_bounded() {
    for (x, y) in [(0, 0), (X_LOWER, Y_LOWER), (1000, 900), (X_MAX, Y_MAX), (0xFFF, 0xFFF)] {
      let mut sample = AbsoluteSample { x_pos: x, y_pos: y, ..Default::default() };
      sample.clip();
      let once = sample;
      sample.clip();
      assert_eq!(sample, once);
      assert!((X_LOWER..=X_UPPER).contains(&sample.x_pos));
      assert!((Y_LOWER..=Y_UPPER).contains(&sample.y_pos));
    }
  }

  #[test]
  fn scale_never_exceeds_target_resolution() {
    for (x, y) in [(0, 0), (X_LOWER, Y_LOWER), (1023, 767), (X_UPPER, Y_UPPER), (0xFFF, 0xFFF)] {
      let mut sample = AbsoluteSample { x_pos: x, y_pos: y, ..Default::default() };
      sample.scale(1920, 1080);
      assert!(sample.x_pos <= 1920);
      assert!(sample.y_pos <= 1080);
    }
  }

  #[test]
  fn scale_truncates() {
    let mut sample = AbsoluteSample { x_pos: 1000, y_pos: 700, ..Default::default() };
    sample.scale(1920, 1080);
    // (1000 - 127) * 1920 / 1792 = 935.35.. and (700 - 63) * 1080 / 1408 =
    // 488.6.., both floored
    assert_eq!(sample.x_pos, 935);
    assert_eq!(sample.y_pos, 488);
  }

  #[test]
  fn read_absolute_fetches_and_acknowledges() {
    let mut expectations = rap_read(0x12, vec![0x00, 0x00, 0x12, 0x34, 0x05, 0x1F]);
    expectations.extend(rap_write(0x02, 0x00));
    let mut bus = spi::Mock::new(&expectations);
    let mut cs = digital::Mock::new(&cs_brackets(2));
    let mut dr = digital::Mock::new(&[]);
    // The flag clear acknowledging the sample must settle for 50 us
    let mut settle = delay::CheckedDelay::new(&[delay::Transaction::delay_us(50)]);

    let mut touchpad = Pinnacle::new(bus.clone(), cs.clone(), dr.clone(), settle.clone(), Config::default());
    let sample = touchpad.read_absolute().unwrap();
    assert_eq!(sample.x_pos, 0x534);
    assert!(sample.touch_down);

    bus.done();
    cs.done();
    dr.done();
    settle.done();
  }

  #[test]
  fn hover_compares_z_against_zone_threshold() {
    let mut thresholds = [[0u8; ZONE_COLS]; ZONE_ROWS];
    thresholds[0][0] = 10;
    let config = Config { zone_map: ZoneHoverMap::new(thresholds), ..Config::default() };
    let mut touchpad = idle_touchpad(config);

    let mut sample = AbsoluteSample { x_pos: 10, y_pos: 10, z_pos: 5, ..Default::default() };
    touchpad.check_hover(&mut sample).unwrap();
    assert!(sample.hovering);

    sample.z_pos = 15;
    touchpad.check_hover(&mut sample).unwrap();
    assert!(!sample.hovering);
  }

  #[test]
  fn hover_rejects_unclipped_zone() {
    let mut touchpad = idle_touchpad(Config::default());

    // 0xFFF / 256 = 15, past the 8-column map; only reachable without clip
    let mut sample = AbsoluteSample { x_pos: 0xFFF, y_pos: 0, z_pos: 1, ..Default::default() };
    assert_eq!(touchpad.check_hover(&mut sample), Err(crate::Error::OutOfRange));

    sample.clip();
    touchpad.check_hover(&mut sample).unwrap();
  }
}
