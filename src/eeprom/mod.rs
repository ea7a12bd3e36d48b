//! Driver for Microchip 25AA256 / 25LC256, a 256-kbit SPI EEPROM (32768 x 8bit)
//!
//! Instructions (all framed by chip select):
//! - READ:  0x03, 16-bit address, then data is clocked out as long as CLK runs;
//!   the address counter rolls over from 0x7fff to 0x0000
//! - WRITE: 0x02, 16-bit address, 1-64 data bytes; must stay within one
//!   64-byte page (the address wraps inside the page otherwise)
//! - WREN:  0x06, sets the write enable latch; needed before every WRITE
//! - WRDI:  0x04, clears the write enable latch
//! - RDSR:  0x05, status register is clocked out afterwards
//!
//! After a WRITE the chip runs an internal write cycle (max 5 ms) and ignores
//! everything but RDSR.

use std::cmp;
use std::io;
use std::time::Duration;

mod error;
mod frame;
#[cfg(test)]
mod test_bus;

pub use self::error::Error;

use self::frame::{
	Frame,
	HEADER_LEN,
};

use crate::spi::SpiBus;

#[allow(dead_code)]
mod consts {
	pub const WRITE_OPCODE: u8 = 0x02; // write data; clears WEL when CS gets disabled
	pub const READ_OPCODE:  u8 = 0x03; // read data
	pub const WRDI_OPCODE:  u8 = 0x04; // write disable (clears WEL)
	pub const RDSR_OPCODE:  u8 = 0x05; // read status register
	pub const WREN_OPCODE:  u8 = 0x06; // write enable (sets WEL)

	// clocked out while reading
	pub const READ_PLACEHOLDER: u8 = 0x00;
}

use self::consts::*;

pub const CAPACITY: usize = 32768;
pub const PAGE_SIZE: usize = 64;
/// linux spidev default buffer (4096) minus instruction and address
pub const MAX_READ_CHUNK: usize = 4093;
/// "Twc": internal write cycle time
pub const WRITE_CYCLE_TIME: Duration = Duration::from_millis(5);

/// Status register bits
pub const STATUS_WIP: u8 = 0x01; // write in progress
pub const STATUS_WEL: u8 = 0x02; // write enable latch

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Whence {
	Start,
	Current,
	/// offsets count backwards from the end
	End,
}

pub struct Eeprom<B: SpiBus> {
	cursor: u16,
	bus: B,
}

impl<B: SpiBus> Eeprom<B> {
	/// The bus needs to be fully configured already.
	pub fn new(bus: B) -> Self {
		Eeprom {
			cursor: 0,
			bus,
		}
	}

	pub fn position(&self) -> u16 {
		self.cursor
	}

	pub fn into_inner(self) -> B {
		self.bus
	}

	// READ payload that fits into one exchange on this bus
	fn read_chunk_size(&self) -> usize {
		let size = cmp::min(MAX_READ_CHUNK, self.bus.max_transfer().saturating_sub(HEADER_LEN));
		// a bus too small for any payload fails on the first exchange
		cmp::max(size, 1)
	}

	fn advance(&mut self, len: usize) {
		self.cursor = ((self.cursor as usize + len) % CAPACITY) as u16;
	}

	/// Move the cursor; the new address must be in `1..CAPACITY`.
	///
	/// `Whence::End` counts backwards: `seek(1, Whence::End)` selects the
	/// last byte.
	pub fn seek(&mut self, offset: i64, whence: Whence) -> Result<u16, Error> {
		let target = match whence {
			Whence::Start => Some(offset),
			Whence::Current => (self.cursor as i64).checked_add(offset),
			Whence::End => (CAPACITY as i64).checked_sub(offset),
		};
		match target {
			// address 0 is only reachable by wrapping around
			Some(t) if t > 0 && t < CAPACITY as i64 => {
				self.cursor = t as u16;
				Ok(self.cursor)
			},
			_ => Err(Error::InvalidOffset { offset, whence }),
		}
	}

	/// Read `buf.len()` bytes starting at the cursor, wrapping around at the
	/// end of the chip. On failure the error reports how many bytes made it
	/// into `buf`.
	pub fn read(&mut self, buf: &mut [u8]) -> Result<usize, Error> {
		debug!("EEPROM read {} bytes @0x{:04x}", buf.len(), self.cursor);
		let mut processed = 0;
		let chunk_size = self.read_chunk_size();
		for chunk in buf.chunks_mut(chunk_size) {
			self.read_chunk(chunk).map_err(|cause| Error::Transport { processed, cause })?;
			processed += chunk.len();
		}
		Ok(processed)
	}

	fn read_chunk(&mut self, target: &mut [u8]) -> io::Result<()> {
		let mut frame = Frame::read(self.cursor, target.len());
		trace!("READ @0x{:04x}: {} bytes", self.cursor, target.len());
		self.bus.exchange_bytes(frame.as_mut_bytes())?;
		target.copy_from_slice(frame.payload());
		self.advance(target.len());
		Ok(())
	}

	pub fn read_at(&mut self, buf: &mut [u8], offset: i64) -> Result<usize, Error> {
		self.seek(offset, Whence::Start)?;
		self.read(buf)
	}

	/// Write `buf` starting at the cursor, one page-aligned WRITE per chunk,
	/// wrapping around at the end of the chip. On failure the error reports
	/// how many bytes were written completely.
	pub fn write(&mut self, buf: &[u8]) -> Result<usize, Error> {
		debug!("EEPROM write {} bytes @0x{:04x}", buf.len(), self.cursor);
		let mut processed = 0;
		while processed < buf.len() {
			let page_remaining = PAGE_SIZE - (self.cursor as usize % PAGE_SIZE);
			let len = cmp::min(page_remaining, buf.len() - processed);
			self.write_chunk(&buf[processed..processed + len]).map_err(|cause| Error::Transport { processed, cause })?;
			processed += len;
		}
		Ok(processed)
	}

	fn write_chunk(&mut self, data: &[u8]) -> io::Result<()> {
		let mut frame = Frame::write(self.cursor, data);
		trace!("WRITE @0x{:04x}: {} bytes", self.cursor, data.len());
		self.bus.exchange_byte(WREN_OPCODE)?;
		self.bus.exchange_bytes(frame.as_mut_bytes())?;
		self.bus.exchange_byte(WRDI_OPCODE)?;
		self.bus.settle(WRITE_CYCLE_TIME);
		self.advance(data.len());
		Ok(())
	}

	pub fn write_at(&mut self, buf: &[u8], offset: i64) -> Result<usize, Error> {
		self.seek(offset, Whence::Start)?;
		self.write(buf)
	}

	/// RDSR; see `STATUS_*` for the bits
	pub fn read_status(&mut self) -> Result<u8, Error> {
		let mut frame = [RDSR_OPCODE, READ_PLACEHOLDER];
		self.bus.exchange_bytes(&mut frame).map_err(|cause| Error::Transport { processed: 0, cause })?;
		trace!("RDSR: 0x{:02x}", frame[1]);
		Ok(frame[1])
	}
}

impl<B: SpiBus> io::Read for Eeprom<B> {
	fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
		Eeprom::read(self, buf).or_else(Error::into_io_result)
	}
}

impl<B: SpiBus> io::Write for Eeprom<B> {
	fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
		Eeprom::write(self, buf).or_else(Error::into_io_result)
	}

	fn flush(&mut self) -> io::Result<()> {
		Ok(())
	}
}

impl<B: SpiBus> io::Seek for Eeprom<B> {
	// std counts `SeekFrom::End` forwards (usually with a negative offset)
	fn seek(&mut self, pos: io::SeekFrom) -> io::Result<u64> {
		let (offset, whence) = match pos {
			io::SeekFrom::Start(n) => {
				if n > i64::max_value() as u64 {
					return Err(io::Error::new(io::ErrorKind::InvalidInput, "seek offset too large"));
				}
				(n as i64, Whence::Start)
			},
			io::SeekFrom::Current(n) => (n, Whence::Current),
			io::SeekFrom::End(n) => match n.checked_neg() {
				Some(n) => (n, Whence::End),
				None => return Err(io::Error::new(io::ErrorKind::InvalidInput, "seek offset too large")),
			},
		};
		Ok(Eeprom::seek(self, offset, whence)? as u64)
	}
}
