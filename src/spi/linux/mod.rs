mod ioctl;
mod spidev;

pub use self::spidev::{
	Spidev,
	open_spidev,
	open_spidev_path,
};

/// Bus settings applied when opening a spidev device.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct SpiConfig {
	/// chip select line `Y` in `/dev/spidevX.Y`
	pub channel: u8,
	pub speed_hz: u32,
	pub bits_per_word: u8,
	/// delay after each transfer before chip select is released
	pub delay_usecs: u16,
	/// SPI mode 0-3 (CPOL << 1 | CPHA)
	pub mode: u8,
}

impl Default for SpiConfig {
	fn default() -> Self {
		SpiConfig {
			channel: 0,
			speed_hz: 500_000,
			bits_per_word: 8,
			delay_usecs: 0,
			mode: 0,
		}
	}
}
