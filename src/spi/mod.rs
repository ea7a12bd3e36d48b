/// Full-duplex SPI bus access, as needed by the 25XX256 EEPROM driver.
///
/// The driver only needs two primitives from a bus:
/// - exchange N bytes (transmit and receive at the same time)
/// - exchange a single byte (for one-byte instructions)
///
/// Bus configuration (mode, clock, word size, chip select) happens when
/// opening the transport; the driver never touches it.
///
/// The 25XX256 needs SPI mode 0 or 3; we use mode 0 (clock idle low).

mod hardware;
mod host;
mod linux;

pub use self::hardware::{
	DEFAULT_MAX_TRANSFER,
	SpiBus,
	reliable_sleep,
};

pub use self::host::{
	Host,
	HOST_ENV,
};

// OS-specific. for now linux only.
pub use self::linux::{
	SpiConfig,
	Spidev,
	open_spidev,
	open_spidev_path,
};
