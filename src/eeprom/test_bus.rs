//! Simulated 25XX256 behind a recording `SpiBus`

use std::io;
use std::time::Duration;

use super::consts::*;
use super::{
	CAPACITY,
	PAGE_SIZE,
};
use crate::spi::{
	DEFAULT_MAX_TRANSFER,
	SpiBus,
};

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Event {
	Exchange(Vec<u8>),
	Settle(Duration),
}

pub struct SimulatedChip {
	pub memory: Vec<u8>,
	pub events: Vec<Event>,
	write_enable_latch: bool,
	// set by a WRITE frame until the bus settles
	write_in_progress: bool,
	exchanges: usize,
	fail_on_exchange: Option<usize>,
	max_transfer: usize,
}

impl SimulatedChip {
	pub fn new() -> Self {
		SimulatedChip {
			memory: vec![0xff; CAPACITY],
			events: Vec::new(),
			write_enable_latch: false,
			write_in_progress: false,
			exchanges: 0,
			fail_on_exchange: None,
			max_transfer: DEFAULT_MAX_TRANSFER,
		}
	}

	pub fn with_pattern() -> Self {
		let mut chip = Self::new();
		for (address, b) in chip.memory.iter_mut().enumerate() {
			*b = (address ^ (address >> 8)) as u8;
		}
		chip
	}

	/// fail the `index`-th exchange (counting from 0, single byte ones included)
	pub fn fail_on_exchange(&mut self, index: usize) {
		self.fail_on_exchange = Some(index);
	}

	/// reject exchanges longer than `max_transfer`, like spidev does
	pub fn limit_transfer(&mut self, max_transfer: usize) {
		self.max_transfer = max_transfer;
	}

	/// (instruction, address, payload length) of all READ and WRITE frames
	pub fn frames(&self) -> Vec<(u8, usize, usize)> {
		self.events.iter().filter_map(|event| match event {
			Event::Exchange(tx) if tx.len() >= 3 && (tx[0] == READ_OPCODE || tx[0] == WRITE_OPCODE) => {
				Some((tx[0], (tx[1] as usize) << 8 | tx[2] as usize, tx.len() - 3))
			},
			_ => None,
		}).collect()
	}

	fn address(buf: &[u8]) -> usize {
		assert!(buf.len() >= 3, "frame too short for an address: {:?}", buf);
		assert_eq!(buf[1] & 0x80, 0, "address beyond 32 KiB");
		(buf[1] as usize) << 8 | buf[2] as usize
	}
}

impl SpiBus for SimulatedChip {
	fn exchange_bytes(&mut self, buf: &mut [u8]) -> io::Result<()> {
		let index = self.exchanges;
		self.exchanges += 1;
		if self.fail_on_exchange == Some(index) {
			return Err(io::Error::new(io::ErrorKind::Other, "injected bus fault"));
		}
		if buf.len() > self.max_transfer {
			return Err(io::Error::new(io::ErrorKind::InvalidInput, "transfer exceeds bus buffer"));
		}
		self.events.push(Event::Exchange(buf.to_vec()));

		let instruction = buf[0];
		// the chip only answers RDSR while the write cycle runs; WRDI is ignored
		assert!(
			!self.write_in_progress || instruction == WRDI_OPCODE || instruction == RDSR_OPCODE,
			"instruction 0x{:02x} during write cycle", instruction,
		);

		match instruction {
			READ_OPCODE => {
				let address = Self::address(buf);
				for (i, b) in buf.iter_mut().enumerate() {
					*b = if i < 3 { 0xff } else { self.memory[(address + i - 3) % CAPACITY] };
				}
			},
			WRITE_OPCODE => {
				assert!(self.write_enable_latch, "WRITE without WREN");
				let address = Self::address(buf);
				let data = &buf[3..];
				assert!(address % PAGE_SIZE + data.len() <= PAGE_SIZE, "WRITE crossing page boundary at 0x{:04x}+{}", address, data.len());
				self.memory[address..address + data.len()].copy_from_slice(data);
				self.write_enable_latch = false;
				self.write_in_progress = true;
				for b in buf.iter_mut() {
					*b = 0xff;
				}
			},
			WREN_OPCODE => {
				self.write_enable_latch = true;
				buf[0] = 0xff;
			},
			WRDI_OPCODE => {
				self.write_enable_latch = false;
				buf[0] = 0xff;
			},
			RDSR_OPCODE => {
				let status = (self.write_enable_latch as u8) << 1 | self.write_in_progress as u8;
				buf[0] = 0xff;
				for b in buf[1..].iter_mut() {
					*b = status;
				}
			},
			_ => panic!("unknown instruction 0x{:02x}", instruction),
		}
		Ok(())
	}

	fn settle(&mut self, duration: Duration) {
		self.events.push(Event::Settle(duration));
		self.write_in_progress = false;
	}

	fn max_transfer(&self) -> usize {
		self.max_transfer
	}
}
