use std::fs;
use std::io;
use std::os::unix::io::{
	AsRawFd,
	RawFd,
};

use libc::{
	c_ulong,
	c_void,
	ioctl,
};

use super::SpiConfig;
use super::ioctl::{
	SPI_IOC_WR_BITS_PER_WORD,
	SPI_IOC_WR_MAX_SPEED_HZ,
	SPI_IOC_WR_MODE,
	SpiIocTransfer,
	spi_ioc_message,
};
use crate::eeprom::MAX_READ_CHUNK;
use crate::spi::{
	DEFAULT_MAX_TRANSFER,
	Host,
	SpiBus,
};

const BUF_SIZE_SYSFS: &str = "/sys/module/spidev/parameters/bufsiz";

fn kernel_buf_size() -> usize {
	match fs::read_to_string(BUF_SIZE_SYSFS) {
		Ok(s) => match s.trim().parse() {
			Ok(size) => size,
			Err(e) => {
				warn!("Couldn't parse {} ({:?}): {}", BUF_SIZE_SYSFS, s.trim(), e);
				DEFAULT_MAX_TRANSFER
			},
		},
		Err(e) => {
			debug!("Couldn't read {}: {}, assuming {} bytes", BUF_SIZE_SYSFS, e, DEFAULT_MAX_TRANSFER);
			DEFAULT_MAX_TRANSFER
		},
	}
}

fn check_transfer_len(len: usize, max_transfer: usize) -> io::Result<()> {
	if len > max_transfer {
		return Err(io::Error::new(
			io::ErrorKind::InvalidInput,
			format!("SPI transfer of {} bytes exceeds spidev buffer of {} bytes", len, max_transfer),
		));
	}
	Ok(())
}

unsafe fn write_setting<T>(fd: RawFd, request: c_ulong, value: &T) -> io::Result<()> {
	if ioctl(fd, request as _, value as *const T as *const c_void) < 0 {
		return Err(io::Error::last_os_error());
	}
	Ok(())
}

/// Linux `/dev/spidevX.Y` bus
#[derive(Debug)]
pub struct Spidev {
	file: fs::File,
	path: String,
	config: SpiConfig,
	max_transfer: usize,
}

impl Spidev {
	pub fn path(&self) -> &str {
		&self.path
	}

	pub fn config(&self) -> &SpiConfig {
		&self.config
	}

	fn configure(&self) -> io::Result<()> {
		let fd = self.file.as_raw_fd();
		unsafe {
			write_setting(fd, SPI_IOC_WR_MODE, &self.config.mode)?;
			write_setting(fd, SPI_IOC_WR_BITS_PER_WORD, &self.config.bits_per_word)?;
			write_setting(fd, SPI_IOC_WR_MAX_SPEED_HZ, &self.config.speed_hz)?;
		}
		Ok(())
	}
}

impl SpiBus for Spidev {
	fn exchange_bytes(&mut self, buf: &mut [u8]) -> io::Result<()> {
		check_transfer_len(buf.len(), self.max_transfer)?;
		if buf.is_empty() {
			return Ok(());
		}

		// spidev copies tx into its own buffer before clocking, so rx may overlap
		let transfer = SpiIocTransfer {
			tx_buf: buf.as_ptr() as usize as u64,
			rx_buf: buf.as_mut_ptr() as usize as u64,
			len: buf.len() as u32,
			speed_hz: self.config.speed_hz,
			delay_usecs: self.config.delay_usecs,
			bits_per_word: self.config.bits_per_word,
			..SpiIocTransfer::default()
		};
		let res = unsafe {
			ioctl(
				self.file.as_raw_fd(),
				spi_ioc_message(1) as _,
				&transfer as *const SpiIocTransfer as *const c_void,
			)
		};
		if res < 0 {
			return Err(io::Error::last_os_error());
		}
		Ok(())
	}

	fn max_transfer(&self) -> usize {
		self.max_transfer
	}
}

// TODO: exclusive open / file locking?
pub fn open_spidev(host: Host, config: &SpiConfig) -> crate::AResult<Spidev> {
	let path = host.spidev_path(config.channel);
	open_spidev_path(path, config)
}

pub fn open_spidev_path(path: String, config: &SpiConfig) -> crate::AResult<Spidev> {
	let max_transfer = kernel_buf_size();
	if max_transfer < MAX_READ_CHUNK + 3 {
		warn!("spidev buffer size {} is below {} bytes, reads will use smaller chunks", max_transfer, MAX_READ_CHUNK + 3);
	}

	let spidev = with_context!(("couldn't open SPI device {}", path), {
		let file = fs::OpenOptions::new()
			.read(true)
			.write(true)
			.open(&path)?;

		let spidev = Spidev {
			file,
			path: path.clone(),
			config: *config,
			max_transfer,
		};
		spidev.configure()?;
		Ok(spidev)
	})?;

	info!(
		"Opened {} (mode {}, {} kHz, {} bits per word)",
		spidev.path, config.mode, config.speed_hz / 1000, config.bits_per_word,
	);

	Ok(spidev)
}
