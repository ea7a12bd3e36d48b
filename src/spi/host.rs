use std::env;
use std::fmt;
use std::str;

/// Environment variable selecting the host board profile.
pub const HOST_ENV: &str = "EMBD_HOST";

/// Host board profile; decides which spidev bus the EEPROM is wired to.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Host {
	RaspberryPi,
	RaspberryPi2,
	BeagleBoneBlack,
	Generic,
}

impl Host {
	/// Detect the host profile from `EMBD_HOST`; unknown or missing values
	/// fall back to `Host::Generic`.
	pub fn detect() -> Self {
		let value = env::var(HOST_ENV).ok();
		let host = Self::from_env_value(value.as_ref().map(String::as_str));
		debug!("{}={:?}: using host profile {}", HOST_ENV, value, host);
		host
	}

	pub fn from_env_value(value: Option<&str>) -> Self {
		match value {
			None => Host::Generic,
			Some(v) => v.parse::<Host>().unwrap_or_else(|e| {
				warn!("Ignoring {}: {}", HOST_ENV, e);
				Host::Generic
			}),
		}
	}

	/// bus number `X` in `/dev/spidevX.Y`
	pub fn spidev_bus(&self) -> u8 {
		match self {
			Host::RaspberryPi | Host::RaspberryPi2 => 0,
			Host::BeagleBoneBlack => 1,
			Host::Generic => 0,
		}
	}

	pub fn spidev_path(&self, channel: u8) -> String {
		format!("/dev/spidev{}.{}", self.spidev_bus(), channel)
	}
}

impl fmt::Display for Host {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		let name = match self {
			Host::RaspberryPi => "RPi",
			Host::RaspberryPi2 => "RPi2",
			Host::BeagleBoneBlack => "BBB",
			Host::Generic => "generic",
		};
		f.write_str(name)
	}
}

impl str::FromStr for Host {
	type Err = ::failure::Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"RPi" => Ok(Host::RaspberryPi),
			"RPi2" => Ok(Host::RaspberryPi2),
			"BBB" => Ok(Host::BeagleBoneBlack),
			"generic" => Ok(Host::Generic),
			_ => bail!("Unknown host profile {:?} (expected RPi, RPi2, BBB or generic)", s),
		}
	}
}

#[cfg(test)]
mod test {
	use super::Host;

	#[test]
	fn parse_host() {
		assert_eq!("RPi".parse::<Host>().unwrap(), Host::RaspberryPi);
		assert_eq!("RPi2".parse::<Host>().unwrap(), Host::RaspberryPi2);
		assert_eq!("BBB".parse::<Host>().unwrap(), Host::BeagleBoneBlack);
		assert_eq!("generic".parse::<Host>().unwrap(), Host::Generic);
		assert!("rpi".parse::<Host>().is_err());
		assert!("".parse::<Host>().is_err());
	}

	#[test]
	fn display_roundtrips_parse() {
		for host in [Host::RaspberryPi, Host::RaspberryPi2, Host::BeagleBoneBlack, Host::Generic].iter() {
			assert_eq!(host.to_string().parse::<Host>().unwrap(), *host);
		}
	}

	#[test]
	fn env_value_fallback() {
		assert_eq!(Host::from_env_value(None), Host::Generic);
		assert_eq!(Host::from_env_value(Some("BBB")), Host::BeagleBoneBlack);
		assert_eq!(Host::from_env_value(Some("C.H.I.P")), Host::Generic);
	}

	#[test]
	fn spidev_paths() {
		assert_eq!(Host::RaspberryPi.spidev_path(0), "/dev/spidev0.0");
		assert_eq!(Host::RaspberryPi2.spidev_path(1), "/dev/spidev0.1");
		assert_eq!(Host::BeagleBoneBlack.spidev_path(0), "/dev/spidev1.0");
		assert_eq!(Host::Generic.spidev_path(0), "/dev/spidev0.0");
	}
}
