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

//! Logging wrapper used throughout the workspace. Initializes `log4rs`
//! behind the standard `log` facade and installs a panic hook that sends
//! panics through the logger instead of letting them vanish on a detached
//! worker thread.

use std::{panic, thread};

use backtrace::Backtrace;
use log::LevelFilter;
use log4rs::append::console::ConsoleAppender;
use log4rs::append::file::FileAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
use log4rs::filter::{threshold::ThresholdFilter, Filter, Response};
use parking_lot::Mutex;

use crate::types::{LogLevel, LoggingConfig};

lazy_static! {
	/// Guards against double initialization, which log4rs treats as an error.
	static ref WAS_INIT: Mutex<bool> = Mutex::new(false);
}

const LOGGING_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S%.3f)} {h({l})} {M} - {m}{n}";

fn convert_log_level(level: LogLevel) -> LevelFilter {
	match level {
		LogLevel::Error => LevelFilter::Error,
		LogLevel::Warning => LevelFilter::Warn,
		LogLevel::Info => LevelFilter::Info,
		LogLevel::Debug => LevelFilter::Debug,
		LogLevel::Trace => LevelFilter::Trace,
	}
}

/// Only passes through log records coming from one of our own crates, so a
/// noisy dependency can't flood the node's log file.
#[derive(Debug)]
struct OwnCratesFilter;

impl Filter for OwnCratesFilter {
	fn filter(&self, record: &log::Record<'_>) -> Response {
		match record.module_path() {
			Some(path) if path.starts_with("parityfleet") => Response::Neutral,
			_ => Response::Reject,
		}
	}
}

/// Initializes the process-wide logger from the given configuration. Safe to
/// call more than once; only the first call takes effect.
pub fn init(config: &LoggingConfig) {
	let mut was_init = WAS_INIT.lock();
	if *was_init {
		return;
	}

	let stdout_level = convert_log_level(config.stdout_log_level);
	let file_level = convert_log_level(config.file_log_level);
	let root_level = stdout_level.max(file_level);

	let mut root = Root::builder();
	let mut appenders = vec![];

	if config.log_to_stdout {
		let appender = ConsoleAppender::builder()
			.encoder(Box::new(PatternEncoder::new(LOGGING_PATTERN)))
			.build();
		appenders.push(
			Appender::builder()
				.filter(Box::new(ThresholdFilter::new(stdout_level)))
				.filter(Box::new(OwnCratesFilter))
				.build("stdout", Box::new(appender)),
		);
		root = root.appender("stdout");
	}

	if config.log_to_file {
		if let Ok(appender) = FileAppender::builder()
			.append(true)
			.encoder(Box::new(PatternEncoder::new(LOGGING_PATTERN)))
			.build(&config.log_file_path)
		{
			appenders.push(
				Appender::builder()
					.filter(Box::new(ThresholdFilter::new(file_level)))
					.filter(Box::new(OwnCratesFilter))
					.build("file", Box::new(appender)),
			);
			root = root.appender("file");
		}
	}

	if let Ok(log_config) = Config::builder()
		.appenders(appenders)
		.build(root.build(root_level))
	{
		let _ = log4rs::init_config(log_config);
	}

	send_panics_to_log();
	*was_init = true;
}

/// Minimal stdout-only logger for tests.
pub fn init_test() {
	let mut config = LoggingConfig::default();
	config.stdout_log_level = LogLevel::Debug;
	config.log_to_file = false;
	init(&config);
}

fn send_panics_to_log() {
	panic::set_hook(Box::new(|info| {
		let backtrace = Backtrace::new();
		let thread = thread::current();
		let thread_name = thread.name().unwrap_or("unnamed");

		let payload = match info.payload().downcast_ref::<&str>() {
			Some(s) => (*s).to_string(),
			None => match info.payload().downcast_ref::<String>() {
				Some(s) => s.clone(),
				None => "unknown panic payload".to_string(),
			},
		};

		match info.location() {
			Some(loc) => error!(
				"thread '{}' panicked at '{}': {}:{}\n{:?}",
				thread_name,
				payload,
				loc.file(),
				loc.line(),
				backtrace
			),
			None => error!("thread '{}' panicked at '{}'\n{:?}", thread_name, payload, backtrace),
		}
	}));
}
