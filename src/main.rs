use clap::{value_parser, Arg, Command};
use log::{error, info};
use simplelog::{
    format_description, ColorChoice, CombinedLogger, ConfigBuilder, LevelFilter, TermLogger,
    TerminalMode, WriteLogger,
};
use std::fs::File;
use std::path::Path;
use std::process::ExitCode;

use run_pasd_bus::application;
use run_pasd_bus::constants::FILE_PARAMETERS_APP;
use run_pasd_bus::utility::get_parameter;

fn main() -> ExitCode {
    // Parse the command line arguments
    let matches = Command::new("power bus simulator")
        .about("Simulator of the power distribution bus of an antenna station.")
        .arg(
            Arg::new("topology")
                .short('t')
                .long("topology")
                .help("Topology file to override the configuration file.")
                .value_parser(value_parser!(String)),
        )
        .arg(
            Arg::new("boxes")
                .short('b')
                .long("boxes")
                .help("Number of distribution boxes. Default is 0, which means no override.")
                .default_value("0")
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new("level")
                .short('l')
                .long("log-level")
                .help("Log level: 0 (Off), 1 (Error), 2 (Warn), 3 (Info), 4 (Debug), 5 (Trace)")
                .default_value("3")
                .value_parser(value_parser!(u32)),
        )
        .get_matches();

    let topology_file = matches.get_one::<String>("topology").map(String::as_str);
    let number_of_boxes = matches.get_one::<usize>("boxes").copied().unwrap_or(0);

    // Check the log filter
    let log_filter = get_log_filter(matches.get_one::<u32>("level"));

    // Initiate the logger. The standard output carries the acknowledgements,
    // so the terminal logger writes to the standard error only.
    let config_file = Path::new(FILE_PARAMETERS_APP);
    let log_file = get_parameter::<String>(config_file, "log_file")
        .unwrap_or_else(|_| String::from("application.log"));
    initiate_logger(log_filter, &log_file);
    info!("Log level: {log_filter}.");

    // Run the application
    match application::run(config_file, topology_file, number_of_boxes) {
        Ok(()) => ExitCode::SUCCESS,
        Err(bus_error) => {
            error!("Failed to run the power bus simulator: {bus_error}.");
            ExitCode::FAILURE
        }
    }
}

/// Get the log filter.
///
/// # Arguments
/// * `log_level` - Log level.
///
/// # Returns
/// Log filter.
fn get_log_filter(log_level: Option<&u32>) -> LevelFilter {
    match log_level {
        Some(level) => match level {
            0 => LevelFilter::Off,
            1 => LevelFilter::Error,
            2 => LevelFilter::Warn,
            3 => LevelFilter::Info,
            4 => LevelFilter::Debug,
            5 => LevelFilter::Trace,
            _ => LevelFilter::Info,
        },
        None => LevelFilter::Info,
    }
}

/// Initiate the logger.
///
/// # Arguments
/// * `level` - Log level.
/// * `filepath` - Log file path.
fn initiate_logger(level: LevelFilter, filepath: &str) {
    let config = ConfigBuilder::new()
        .set_time_format_custom(format_description!(
            "[year]/[month]/[day] [hour]:[minute]:[second].[subsecond]"
        ))
        .build();

    // Log to the standard error
    let logger_terminal = TermLogger::new(
        level,
        config.clone(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    );

    // Log to the file
    match File::create(filepath) {
        Ok(file) => {
            let _ = CombinedLogger::init(vec![
                logger_terminal,
                WriteLogger::new(level, config, file),
            ]);
        }
        Err(error) => {
            eprintln!("Failed to create the log file: {error}.");
            let _ = CombinedLogger::init(vec![logger_terminal]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_log_filter() {
        assert_eq!(get_log_filter(Some(&0)), LevelFilter::Off);
        assert_eq!(get_log_filter(Some(&1)), LevelFilter::Error);
        assert_eq!(get_log_filter(Some(&2)), LevelFilter::Warn);
        assert_eq!(get_log_filter(Some(&3)), LevelFilter::Info);
        assert_eq!(get_log_filter(Some(&4)), LevelFilter::Debug);
        assert_eq!(get_log_filter(Some(&5)), LevelFilter::Trace);

        assert_eq!(get_log_filter(Some(&6)), LevelFilter::Info);

        assert_eq!(get_log_filter(None), LevelFilter::Info);
    }
}
