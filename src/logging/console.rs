use anyhow::Result;
use std::path::Path;
pub use log::LevelFilter;

/// Logs to the terminal and, when `log_path` is provided, to a file truncated on every run.
pub fn init(level: LevelFilter, log_path: Option<&Path>, ignore: &[&'static str]) -> Result<()> {
	use simplelog::*;
	let cfg = {
		let mut builder = ConfigBuilder::new();
		builder
			.set_max_level(log::LevelFilter::Error)
			.set_time_format_custom(format_description!(
				"[year].[month].[day]-[hour].[minute].[second]"
			))
			// [ERROR]
			// [ WARN]
			// [ INFO]
			.set_level_padding(LevelPadding::Left)
			// `bitbucket-server` lines are told apart from `updater` lines by their target
			.set_target_level(log::LevelFilter::Error)
			.set_location_level(log::LevelFilter::Off);
		for str in ignore.iter() {
			builder.add_filter_ignore_str(str);
		}
		builder.build()
	};
	let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
		level,
		cfg.clone(),
		TerminalMode::Stderr,
		ColorChoice::Auto,
	)];
	if let Some(log_path) = log_path {
		if let Some(parent) = log_path.parent() {
			std::fs::create_dir_all(parent)?;
		}
		let file = std::fs::OpenOptions::new()
			.create(true)
			.write(true)
			.truncate(true)
			.open(log_path)?;
		loggers.push(WriteLogger::new(LevelFilter::Trace, cfg, file));
	}
	CombinedLogger::init(loggers)?;
	if let Some(log_path) = log_path {
		log::info!("Writing log to {}", log_path.display());
	}
	log::debug!("Executing: {:?}", std::env::args().collect::<Vec<_>>());
	Ok(())
}
