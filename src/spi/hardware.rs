use std::io;
use std::thread;
use std::time::{
	Duration,
	Instant,
};

/// linux spidev default buffer size
pub const DEFAULT_MAX_TRANSFER: usize = 4096;

pub fn reliable_sleep(mut duration: Duration) {
	loop {
		let now = Instant::now();
		thread::sleep(duration);
		let elapsed = now.elapsed();
		if elapsed >= duration {
			return;
		}
		duration -= elapsed;
	}
}

pub trait SpiBus {
	// transmit `buf`, replacing it with the bytes received at the same time
	fn exchange_bytes(&mut self, buf: &mut [u8]) -> io::Result<()>;

	fn exchange_byte(&mut self, data: u8) -> io::Result<u8> {
		let mut buf = [data];
		self.exchange_bytes(&mut buf)?;
		Ok(buf[0])
	}

	// block (at least) `duration` without touching the bus
	fn settle(&mut self, duration: Duration) {
		reliable_sleep(duration);
	}

	/// Largest buffer a single `exchange_bytes` call accepts
	fn max_transfer(&self) -> usize {
		DEFAULT_MAX_TRANSFER
	}
}

impl<'a, B: ?Sized + SpiBus> SpiBus for &'a mut B {
	fn exchange_bytes(&mut self, buf: &mut [u8]) -> io::Result<()> {
		B::exchange_bytes(*self, buf)
	}

	fn exchange_byte(&mut self, data: u8) -> io::Result<u8> {
		B::exchange_byte(*self, data)
	}

	fn settle(&mut self, duration: Duration) {
		B::settle(*self, duration)
	}

	fn max_transfer(&self) -> usize {
		B::max_transfer(&**self)
	}
}
