// This file is part of run_pasd_bus.
//
// Developed for the Vera Rubin Observatory Systems.
// This product includes software developed by the LSST Project
// (https://www.lsst.org).
// See the COPYRIGHT file at the top-level directory of this distribution
// for details of code ownership.
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use log::{error, info};
use serde_json::Value;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use crate::command::command_bus::create_bus_command_schema;
use crate::command::command_schema::CommandSchema;
use crate::constants::TERMINATOR;
use crate::enums::CommandStatus;
use crate::errors::BusResult;
use crate::power::bus::Bus;
use crate::utility::{acknowledge_command, get_parameter};

/// Run the application. The commands are read from the standard input, one
/// JSON message per line, and the acknowledgements are written to the
/// standard output.
///
/// # Arguments
/// * `config_file` - Configuration file of the application.
/// * `topology_file` - Topology file to override the configuration file.
/// * `number_of_boxes` - Number of boxes. If the value is 0, it is read from
/// the configuration file.
///
/// # Returns
/// Configuration error if the bus can not be created.
pub fn run(
    config_file: &Path,
    topology_file: Option<&str>,
    number_of_boxes: usize,
) -> BusResult<()> {
    let (final_topology_file, final_number_of_boxes, digit) =
        get_final_settings(config_file, topology_file, number_of_boxes)?;

    let mut bus = create_bus(&final_topology_file, final_number_of_boxes)?;
    info!(
        "Run the power bus simulator with {final_number_of_boxes} boxes and the topology {:?}.",
        final_topology_file
    );

    let command_schema = create_bus_command_schema(digit);

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    match serve(&command_schema, &mut bus, stdin.lock(), &mut stdout) {
        Ok(number) => info!("Stopped the power bus simulator after {number} commands."),
        Err(error) => error!("Stopped the power bus simulator: {error}."),
    }

    Ok(())
}

/// Create the bus with the topology.
///
/// # Arguments
/// * `topology_file` - Topology file.
/// * `number_of_boxes` - Number of boxes.
///
/// # Returns
/// Bus or the configuration error.
pub fn create_bus(topology_file: &Path, number_of_boxes: usize) -> BusResult<Bus> {
    let mut bus = Bus::new(number_of_boxes);
    bus.reload_topology_from_file(topology_file)?;

    Ok(bus)
}

/// Serve the commands until the end of the input.
///
/// # Arguments
/// * `command_schema` - Command schema.
/// * `bus` - Bus to execute the commands.
/// * `reader` - Reader of the command messages.
/// * `writer` - Writer of the acknowledgements.
///
/// # Returns
/// Number of the executed commands or the I/O error.
pub fn serve<R: BufRead, W: Write>(
    command_schema: &CommandSchema,
    bus: &mut Bus,
    reader: R,
    writer: &mut W,
) -> io::Result<usize> {
    let mut number = 0;
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let acknowledgement = match serde_json::from_str::<Value>(&line) {
            Ok(message) => command_schema.execute(&message, bus),
            Err(parse_error) => {
                error!("Failed to decode the message {line}: {parse_error}.");
                acknowledge_command(CommandStatus::Fail, -1)
            }
        };

        writer.write_all(acknowledgement.to_string().as_bytes())?;
        writer.write_all(TERMINATOR)?;
        writer.flush()?;

        number += 1;
    }

    Ok(number)
}

/// Get the final settings.
///
/// # Arguments
/// * `config_file` - Configuration file.
/// * `topology_file` - Topology file. If the value is None, the file is read
/// from the configuration file.
/// * `number_of_boxes` - Number of boxes. If the value is 0, the number is
/// read from the configuration file.
///
/// # Returns
/// Tuple of the final topology file, number of boxes and telemetry digit.
fn get_final_settings(
    config_file: &Path,
    topology_file: Option<&str>,
    number_of_boxes: usize,
) -> BusResult<(PathBuf, usize, i32)> {
    let final_topology_file = match topology_file {
        Some(filepath) => PathBuf::from(filepath),
        None => PathBuf::from(get_parameter::<String>(config_file, "topology_file")?),
    };

    let final_number_of_boxes = if number_of_boxes == 0 {
        get_parameter(config_file, "number_of_boxes")?
    } else {
        number_of_boxes
    };

    let digit = get_parameter(config_file, "digit")?;

    Ok((final_topology_file, final_number_of_boxes, digit))
}
