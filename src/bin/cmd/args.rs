// Copyright 2026 The Parityfleet Contributors
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Command-line surface: `<directoryHost> <directoryPort> <nodePort>
//! [dataFile]` plus the ambient flags every node needs (log level, log
//! file, scanner count, advertise host). Turns `std::env::args` into plain
//! values; `parityfleet_config::build` does the actual validation.

use std::path::PathBuf;
use std::process::exit;
use std::str::FromStr;

use clap::{App, Arg};

use parityfleet_util::LogLevel;

/// Already-parsed, not-yet-validated command line input.
pub struct Args {
	pub directory_host: String,
	pub directory_port: u16,
	pub node_port: u16,
	pub advertise_host: String,
	pub data_file: Option<PathBuf>,
	pub scanners: usize,
	pub log_level: LogLevel,
	pub log_file: Option<String>,
}

/// Parses `std::env::args`, exiting with a usage diagnostic on malformed
/// input (clap's own behavior for missing/invalid arguments).
pub fn parse() -> Args {
	let matches = App::new("parityfleetd")
		.about("A peer-to-peer redundant byte-storage node")
		.arg(Arg::with_name("directory_host").required(true).index(1))
		.arg(Arg::with_name("directory_port").required(true).index(2))
		.arg(Arg::with_name("node_port").required(true).index(3))
		.arg(Arg::with_name("data_file").index(4))
		.arg(
			Arg::with_name("log_level")
				.short("l")
				.long("log-level")
				.takes_value(true)
				.default_value("info"),
		)
		.arg(Arg::with_name("log_file").long("log-file").takes_value(true))
		.arg(
			Arg::with_name("scanners")
				.long("scanners")
				.takes_value(true)
				.default_value("2"),
		)
		.arg(
			Arg::with_name("advertise_host")
				.long("advertise-host")
				.takes_value(true)
				.default_value("127.0.0.1"),
		)
		.get_matches();

	let directory_port = parse_port(matches.value_of("directory_port").unwrap());
	let node_port = parse_port(matches.value_of("node_port").unwrap());
	let scanners: usize = matches.value_of("scanners").unwrap().parse().unwrap_or_else(|_| {
		eprintln!("invalid --scanners value");
		exit(1);
	});
	let log_level = LogLevel::from_str(matches.value_of("log_level").unwrap()).unwrap_or_else(|e| {
		eprintln!("{}", e);
		exit(1);
	});

	Args {
		directory_host: matches.value_of("directory_host").unwrap().to_string(),
		directory_port,
		node_port,
		advertise_host: matches.value_of("advertise_host").unwrap().to_string(),
		data_file: matches.value_of("data_file").map(PathBuf::from),
		scanners,
		log_level,
		log_file: matches.value_of("log_file").map(|s| s.to_string()),
	}
}

fn parse_port(raw: &str) -> u16 {
	raw.parse().unwrap_or_else(|_| {
		eprintln!("invalid port value '{}'", raw);
		exit(1);
	})
}
