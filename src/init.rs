use defmt::{debug, info};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::spi::SpiBus;

use crate::config::AdcAttenuation;
use crate::defs::{
  Reg, ERA_ADC_ATTENUATION, ERA_X_WIDE_Z_MIN, ERA_Y_WIDE_Z_MIN, X_WIDE_Z_MIN_VALUE,
  Y_WIDE_Z_MIN_VALUE,
};
use crate::{Error, Pinnacle};

impl<SPI, E, CS, DR, D> Pinnacle<SPI, CS, DR, D>
where
  SPI: SpiBus<u8, Error = E>,
  CS: OutputPin,
  DR: InputPin,
  D: DelayNs,
{
  /// Bring the sensor to the staged [`Config`](crate::Config).
  ///
  /// Clears stale flags, writes the base configuration registers, then runs
  /// the attenuation and edge tuning sequences. The order is fixed: tuning
  /// goes through extended register access, which needs the feed to be
  /// controllable, which needs the base config written first. Any failure
  /// aborts bring-up.
  pub fn initialize(&mut self) -> Result<(), Error<E>> {
    self.clear_flags()?;

    self.rap_write(Reg::SysConfig1, self.config.sys_config)?;
    self.rap_write(Reg::FeedConfig2, self.config.feed_config2)?;
    self.rap_write(Reg::FeedConfig1, self.config.feed_config1)?;
    self.rap_write(Reg::ZIdle, self.config.z_idle_count)?;

    self.set_adc_attenuation(self.config.adc_attenuation)?;
    self.tune_edge_sensitivity()?;

    info!("pinnacle initialized");
    Ok(())
  }

  /// Adjust the feedback in the ADC, attenuating the finger signal.
  ///
  /// Power-on default is maximal attenuation for thin flat overlays; thick
  /// or curved overlays need a lower setting. The top two bits of the
  /// attenuation register hold the code, everything else is preserved.
  pub fn set_adc_attenuation(&mut self, gain: AdcAttenuation) -> Result<(), Error<E>> {
    let mut value = [0u8; 1];
    self.era_read(ERA_ADC_ATTENUATION, &mut value)?;
    self.era_write(ERA_ADC_ATTENUATION, (value[0] & 0x3F) | gain as u8)?;

    // Read-back is diagnostic only, not correctness-gating
    self.era_read(ERA_ADC_ATTENUATION, &mut value)?;
    debug!("adc attenuation set to {:#X}", value[0] & 0xC0);
    Ok(())
  }

  /// Raise the per-axis wide-Z minimums to improve finger detection near
  /// the edges of a curved overlay.
  pub fn tune_edge_sensitivity(&mut self) -> Result<(), Error<E>> {
    let mut value = [0u8; 1];

    self.era_read(ERA_X_WIDE_Z_MIN, &mut value)?;
    debug!("x-axis wide-z min was {:#X}", value[0]);
    self.era_write(ERA_X_WIDE_Z_MIN, X_WIDE_Z_MIN_VALUE)?;

    self.era_read(ERA_Y_WIDE_Z_MIN, &mut value)?;
    debug!("y-axis wide-z min was {:#X}", value[0]);
    self.era_write(ERA_Y_WIDE_Z_MIN, Y_WIDE_Z_MIN_VALUE)?;

    Ok(())
  }
}
