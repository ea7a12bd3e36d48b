use std::io;

use failure::Fail;

use super::Whence;

#[derive(Debug, Fail)]
pub enum Error {
	#[fail(display = "Invalid EEPROM offset {} ({:?})", offset, whence)]
	InvalidOffset {
		offset: i64,
		whence: Whence,
	},
	#[fail(display = "SPI transfer failed after {} bytes: {}", processed, cause)]
	Transport {
		processed: usize,
		#[cause]
		cause: io::Error,
	},
}

impl Error {
	/// bytes committed to / read from the chip before the failure
	pub fn processed(&self) -> usize {
		match self {
			Error::InvalidOffset { .. } => 0,
			Error::Transport { processed, .. } => *processed,
		}
	}

	// `io::Read` / `io::Write` semantics: report partial progress first, the
	// error on the next call
	pub(super) fn into_io_result(self) -> io::Result<usize> {
		match self.processed() {
			0 => Err(self.into()),
			n => Ok(n),
		}
	}
}

impl From<Error> for io::Error {
	fn from(e: Error) -> Self {
		match e {
			Error::InvalidOffset { .. } => io::Error::new(io::ErrorKind::InvalidInput, e.to_string()),
			Error::Transport { cause, .. } => cause,
		}
	}
}
