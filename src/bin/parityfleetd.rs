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

//! Entry point for a parityfleet node: parses the command line, wires the
//! lifecycle in `cmd::node`, and exits with a diagnostic on fatal startup
//! failure (spec.md §6.5).

#[macro_use]
extern crate log;

mod cmd;

use std::process::exit;

fn main() {
	let args = cmd::args::parse();

	let logging = parityfleet_util::LoggingConfig {
		log_to_stdout: true,
		stdout_log_level: args.log_level,
		log_to_file: args.log_file.is_some(),
		file_log_level: args.log_level,
		log_file_path: args
			.log_file
			.clone()
			.unwrap_or_else(|| "parityfleet.log".to_string()),
	};
	parityfleet_util::init(&logging);

	let raw = parityfleet_config::RawArgs {
		directory_host: args.directory_host,
		directory_port: args.directory_port,
		node_port: args.node_port,
		advertise_host: args.advertise_host,
		data_file: args.data_file,
		scanner_count: args.scanners,
		logging,
	};
	let config = match parityfleet_config::build(raw) {
		Ok(c) => c,
		Err(e) => {
			eprintln!("configuration error: {}", e);
			exit(1);
		}
	};

	if let Err(e) = cmd::node::run(config) {
		eprintln!("fatal error: {}", e);
		exit(1);
	}
}
