#[macro_use]
extern crate clap;
#[macro_use]
extern crate log;

use eeprom_25xx256::*;

use std::io::{
	self,
	Write,
};
use std::process::exit;

fn main_app() -> AResult<()> {
	let matches = clap_app!(@app (app_from_crate!())
		(about: "Dump the full 25XX256 EEPROM image to stdout")
		(@arg host: --host +takes_value "host board profile (RPi, RPi2, BBB, generic); default from $EMBD_HOST")
		(@arg device: --device +takes_value "spidev device path (overrides host profile)")
		(@arg channel: --channel +takes_value "SPI chip select channel (default: 0)")
		(@arg speed: --speed +takes_value "SPI clock in Hz (default: 500000)")
	).get_matches();

	let mut ee = cli::open_eeprom(&matches)?;

	let mut image = vec![0u8; eeprom::CAPACITY];
	if let Err(e) = ee.read(&mut image) {
		error!("Read failed after {} bytes", e.processed());
		return Err(e.into());
	}

	let stdout = io::stdout();
	let mut out = stdout.lock();
	out.write_all(&image)?;
	out.flush()?;

	info!("Dumped {} bytes", image.len());

	Ok(())
}

fn main() {
	env_logger::from_env(env_logger::Env::default().default_filter_or("info")).init();

	if let Err(e) = main_app() {
		error!("Error: {}", e);
		exit(1);
	}
}
