#[macro_use]
extern crate clap;
#[macro_use]
extern crate failure;
#[macro_use]
extern crate log;

use eeprom_25xx256::*;

use std::io::{
	self,
	Read,
};
use std::process::exit;

use eeprom_25xx256::eeprom::CAPACITY;

fn read_image() -> AResult<Vec<u8>> {
	let mut image = Vec::with_capacity(CAPACITY);
	with_stdin_context(io::stdin().take(CAPACITY as u64 + 1).read_to_end(&mut image))?;
	ensure!(image.len() <= CAPACITY, "Image on stdin is larger than the EEPROM ({} bytes)", CAPACITY);
	if image.len() < CAPACITY {
		warn!("Short image: {} of {} bytes, leaving the rest of the EEPROM untouched", image.len(), CAPACITY);
	}
	Ok(image)
}

fn with_stdin_context<T>(r: io::Result<T>) -> AResult<T> {
	r.map_err(|e| {
		let e = failure::Error::from(e);
		let msg = format!("couldn't read image from stdin: {}", e);
		e.context(msg).into()
	})
}

fn main_app() -> AResult<()> {
	let matches = clap_app!(@app (app_from_crate!())
		(about: "Write an image from stdin to the 25XX256 EEPROM, starting at address 0")
		(@arg host: --host +takes_value "host board profile (RPi, RPi2, BBB, generic); default from $EMBD_HOST")
		(@arg device: --device +takes_value "spidev device path (overrides host profile)")
		(@arg channel: --channel +takes_value "SPI chip select channel (default: 0)")
		(@arg speed: --speed +takes_value "SPI clock in Hz (default: 500000)")
	).get_matches();

	let image = read_image()?;

	let mut ee = cli::open_eeprom(&matches)?;
	if let Err(e) = ee.write(&image) {
		error!("Write failed after {} bytes", e.processed());
		return Err(e.into());
	}

	info!("Wrote {} bytes", image.len());

	Ok(())
}

fn main() {
	env_logger::from_env(env_logger::Env::default().default_filter_or("info")).init();

	if let Err(e) = main_app() {
		error!("Error: {}", e);
		exit(1);
	}
}
