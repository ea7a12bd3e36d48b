use super::consts::*;

/// instruction byte + 16-bit big-endian address
pub const HEADER_LEN: usize = 3;

/// A complete read or write transaction as clocked out on the bus; after the
/// exchange it holds the bytes clocked in.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Frame(Vec<u8>);

impl Frame {
	fn with_header(instruction: u8, address: u16, payload_len: usize) -> Self {
		let mut buf = Vec::with_capacity(HEADER_LEN + payload_len);
		buf.push(instruction);
		buf.push((address >> 8) as u8);
		buf.push(address as u8);
		Frame(buf)
	}

	/// READ followed by `len` placeholder bytes the chip clocks data into
	pub fn read(address: u16, len: usize) -> Self {
		let mut frame = Self::with_header(READ_OPCODE, address, len);
		frame.0.resize(HEADER_LEN + len, READ_PLACEHOLDER);
		frame
	}

	pub fn write(address: u16, data: &[u8]) -> Self {
		let mut frame = Self::with_header(WRITE_OPCODE, address, data.len());
		frame.0.extend_from_slice(data);
		frame
	}

	pub fn payload(&self) -> &[u8] {
		&self.0[HEADER_LEN..]
	}

	pub fn as_mut_bytes(&mut self) -> &mut [u8] {
		&mut self.0
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn read_frame_layout() {
		let frame = Frame::read(0x7ffb, 4);
		assert_eq!(frame.0, vec![0x03, 0x7f, 0xfb, 0x00, 0x00, 0x00, 0x00]);
		assert_eq!(frame.payload().len(), 4);
	}

	#[test]
	fn write_frame_layout() {
		let frame = Frame::write(0x0140, b"abc");
		assert_eq!(frame.0, vec![0x02, 0x01, 0x40, b'a', b'b', b'c']);
		assert_eq!(frame.payload(), b"abc");
	}

	#[test]
	fn empty_payload() {
		let mut frame = Frame::read(0, 0);
		assert_eq!(frame.as_mut_bytes().len(), HEADER_LEN);
		assert!(frame.payload().is_empty());
	}
}
