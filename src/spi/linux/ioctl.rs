/* see linux/spi/spidev.h */

use libc::c_ulong;

const IOC_WRITE: c_ulong = 1;
const SPI_IOC_MAGIC: c_ulong = b'k' as c_ulong;

const fn iow(nr: c_ulong, size: usize) -> c_ulong {
	(IOC_WRITE << 30) | ((size as c_ulong) << 16) | (SPI_IOC_MAGIC << 8) | nr
}

pub const SPI_IOC_WR_MODE: c_ulong = iow(1, 1);
pub const SPI_IOC_WR_BITS_PER_WORD: c_ulong = iow(3, 1);
pub const SPI_IOC_WR_MAX_SPEED_HZ: c_ulong = iow(4, 4);

/// `struct spi_ioc_transfer`; layout is the same on 32 and 64 bit.
#[repr(C)]
#[derive(Clone, Copy, Default, Debug)]
pub struct SpiIocTransfer {
	pub tx_buf: u64,
	pub rx_buf: u64,
	pub len: u32,
	pub speed_hz: u32,
	pub delay_usecs: u16,
	pub bits_per_word: u8,
	pub cs_change: u8,
	pub tx_nbits: u8,
	pub rx_nbits: u8,
	pub word_delay_usecs: u8,
	pub pad: u8,
}

pub const fn spi_ioc_message(n: usize) -> c_ulong {
	iow(0, n * std::mem::size_of::<SpiIocTransfer>())
}
