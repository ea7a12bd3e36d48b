//! Shared command line handling for the `eeprom-*` programs

use crate::eeprom::Eeprom;
use crate::spi::{
	self,
	Host,
	SpiConfig,
	Spidev,
};

pub fn get_param<T>(matches: &clap::ArgMatches, name: &str) -> crate::AResult<Option<T>>
where
	T: std::str::FromStr,
	failure::Error: From<<T as std::str::FromStr>::Err>,
{
	let param = match matches.value_of(name) {
		Some(p) => p,
		None => return Ok(None),
	};
	param.parse::<T>().map(Some).map_err(|e| {
		let e = failure::Error::from(e);
		let msg = format!("invalid parameter {}: {}", name, e);
		e.context(msg).into()
	})
}

pub fn spi_config(matches: &clap::ArgMatches) -> crate::AResult<SpiConfig> {
	let mut config = SpiConfig::default();
	if let Some(channel) = get_param(matches, "channel")? {
		config.channel = channel;
	}
	if let Some(speed) = get_param(matches, "speed")? {
		config.speed_hz = speed;
	}
	Ok(config)
}

/// Open the EEPROM selected by `--host`/`--device`/`--channel`/`--speed`
/// (falling back to `EMBD_HOST` and the default bus settings).
pub fn open_eeprom(matches: &clap::ArgMatches) -> crate::AResult<Eeprom<Spidev>> {
	let config = spi_config(matches)?;
	let bus = match matches.value_of("device") {
		Some(path) => spi::open_spidev_path(path.into(), &config)?,
		None => {
			let host = match get_param::<Host>(matches, "host")? {
				Some(host) => host,
				None => Host::detect(),
			};
			info!("Using host profile {}", host);
			spi::open_spidev(host, &config)?
		},
	};
	Ok(Eeprom::new(bus))
}
