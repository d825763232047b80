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

use serde_json::{json, Value};
use std::path::Path;
use std::str::FromStr;

use crate::command::command_schema::{
    get_bool, get_id, get_str, Command, CommandError, CommandOutput, CommandSchema,
};
use crate::enums::{Forcing, UnitType};
use crate::power::bus::Bus;
use crate::telemetry::telemetry_bus::TelemetryBus;
use crate::telemetry::telemetry_default::TelemetryDefault;

/// Create the command schema with all the bus commands.
///
/// # Arguments
/// * `digit` - Default number of digits after the decimal point in the
/// telemetry.
///
/// # Returns
/// Command schema.
pub fn create_bus_command_schema(digit: i32) -> CommandSchema {
    let mut command_schema = CommandSchema::new();

    command_schema.add_command(Box::new(CommandReloadTopology));
    command_schema.add_command(Box::new(CommandTurnBoxOn));
    command_schema.add_command(Box::new(CommandTurnBoxOff));
    command_schema.add_command(Box::new(CommandTurnLeafOn));
    command_schema.add_command(Box::new(CommandTurnLeafOff));
    command_schema.add_command(Box::new(CommandSimulateForcing));
    command_schema.add_command(Box::new(CommandSimulateBreakerTrip));
    command_schema.add_command(Box::new(CommandResetBreaker));
    command_schema.add_command(Box::new(CommandSetServiceLed));
    command_schema.add_command(Box::new(CommandInitialize));
    command_schema.add_command(Box::new(CommandGetLeafInfo));
    command_schema.add_command(Box::new(CommandGetTelemetry { digit }));

    command_schema
}

/// Get the unit type and id of a box or leaf from the message.
fn get_unit(message: &Value) -> Result<(UnitType, usize), CommandError> {
    let unit_type = UnitType::from_str(get_str(message, "unit")?)
        .map_err(|_| CommandError::InvalidMessage(String::from("unit should be box or leaf")))?;

    Ok((unit_type, get_id(message, "unitId")?))
}

/// Command to reload the topology from the YAML text or the file.
pub struct CommandReloadTopology;
impl Command for CommandReloadTopology {
    fn name(&self) -> &str {
        "cmd_reloadTopology"
    }

    fn execute(&self, message: &Value, bus: &mut Bus) -> Result<CommandOutput, CommandError> {
        if let Some(filepath) = message["file"].as_str() {
            bus.reload_topology_from_file(Path::new(filepath))?;
        } else {
            bus.reload_topology(get_str(message, "source")?)?;
        }

        Ok(CommandOutput::Done)
    }
}

/// Command to turn on the box.
pub struct CommandTurnBoxOn;
impl Command for CommandTurnBoxOn {
    fn name(&self) -> &str {
        "cmd_turnBoxOn"
    }

    fn execute(&self, message: &Value, bus: &mut Bus) -> Result<CommandOutput, CommandError> {
        let stay_on_when_offline = get_bool(message, "stayOnWhenOffline", Some(true))?;

        Ok(CommandOutput::Result(bus.turn_box_on(
            get_id(message, "boxId")?,
            stay_on_when_offline,
        )?))
    }
}

/// Command to turn off the box.
pub struct CommandTurnBoxOff;
impl Command for CommandTurnBoxOff {
    fn name(&self) -> &str {
        "cmd_turnBoxOff"
    }

    fn execute(&self, message: &Value, bus: &mut Bus) -> Result<CommandOutput, CommandError> {
        Ok(CommandOutput::Result(
            bus.turn_box_off(get_id(message, "boxId")?)?,
        ))
    }
}

/// Command to turn on the leaf and its box.
pub struct CommandTurnLeafOn;
impl Command for CommandTurnLeafOn {
    fn name(&self) -> &str {
        "cmd_turnLeafOn"
    }

    fn execute(&self, message: &Value, bus: &mut Bus) -> Result<CommandOutput, CommandError> {
        let stay_on_when_offline = get_bool(message, "stayOnWhenOffline", Some(true))?;

        Ok(CommandOutput::Result(bus.turn_leaf_on(
            get_id(message, "leafId")?,
            stay_on_when_offline,
        )?))
    }
}

/// Command to turn off the leaf.
pub struct CommandTurnLeafOff;
impl Command for CommandTurnLeafOff {
    fn name(&self) -> &str {
        "cmd_turnLeafOff"
    }

    fn execute(&self, message: &Value, bus: &mut Bus) -> Result<CommandOutput, CommandError> {
        Ok(CommandOutput::Result(
            bus.turn_leaf_off(get_id(message, "leafId")?)?,
        ))
    }
}

/// Command to simulate the forcing of a box or leaf.
pub struct CommandSimulateForcing;
impl Command for CommandSimulateForcing {
    fn name(&self) -> &str {
        "cmd_simulateForcing"
    }

    fn execute(&self, message: &Value, bus: &mut Bus) -> Result<CommandOutput, CommandError> {
        let forcing = Forcing::from_str(get_str(message, "forcing")?).map_err(|_| {
            CommandError::InvalidMessage(String::from("forcing should be on, off or unforced"))
        })?;

        let result = match get_unit(message)? {
            (UnitType::Box, id) => bus.simulate_box_forcing(id, forcing)?,
            (UnitType::Leaf, id) => bus.simulate_leaf_forcing(id, forcing)?,
        };

        Ok(CommandOutput::Result(result))
    }
}

/// Command to simulate the breaker trip of a box or leaf.
pub struct CommandSimulateBreakerTrip;
impl Command for CommandSimulateBreakerTrip {
    fn name(&self) -> &str {
        "cmd_simulateBreakerTrip"
    }

    fn execute(&self, message: &Value, bus: &mut Bus) -> Result<CommandOutput, CommandError> {
        let result = match get_unit(message)? {
            (UnitType::Box, id) => bus.simulate_box_breaker_trip(id)?,
            (UnitType::Leaf, id) => bus.simulate_leaf_breaker_trip(id)?,
        };

        Ok(CommandOutput::Result(result))
    }
}

/// Command to reset the breaker of a box or leaf.
pub struct CommandResetBreaker;
impl Command for CommandResetBreaker {
    fn name(&self) -> &str {
        "cmd_resetBreaker"
    }

    fn execute(&self, message: &Value, bus: &mut Bus) -> Result<CommandOutput, CommandError> {
        let result = match get_unit(message)? {
            (UnitType::Box, id) => bus.reset_box_breaker(id)?,
            (UnitType::Leaf, id) => bus.reset_leaf_breaker(id)?,
        };

        Ok(CommandOutput::Result(result))
    }
}

/// Command to switch the service LED. The hub is addressed if there is no
/// box id.
pub struct CommandSetServiceLed;
impl Command for CommandSetServiceLed {
    fn name(&self) -> &str {
        "cmd_setServiceLed"
    }

    fn execute(&self, message: &Value, bus: &mut Bus) -> Result<CommandOutput, CommandError> {
        let status = get_bool(message, "status", None)?;
        if message["boxId"].is_null() {
            bus.set_hub_service_led_on(status);
        } else {
            bus.set_box_service_led_on(get_id(message, "boxId")?, status)?;
        }

        Ok(CommandOutput::Done)
    }
}

/// Command to initialize the hub or a box. The hub is addressed if there is
/// no box id.
pub struct CommandInitialize;
impl Command for CommandInitialize {
    fn name(&self) -> &str {
        "cmd_initialize"
    }

    fn execute(&self, message: &Value, bus: &mut Bus) -> Result<CommandOutput, CommandError> {
        let result = if message["boxId"].is_null() {
            bus.initialize_hub()
        } else {
            bus.initialize_box(get_id(message, "boxId")?)?
        };

        Ok(CommandOutput::Result(result))
    }
}

/// Command to get the information of a leaf.
pub struct CommandGetLeafInfo;
impl Command for CommandGetLeafInfo {
    fn name(&self) -> &str {
        "cmd_getLeafInfo"
    }

    fn execute(&self, message: &Value, bus: &mut Bus) -> Result<CommandOutput, CommandError> {
        let info = bus.leaf_info(get_id(message, "leafId")?)?;

        Ok(CommandOutput::Value(json!({
            "leafId": info.leaf_id,
            "boxId": info.box_id,
            "boxPort": info.box_port,
            "online": info.online,
            "desiredOnWhenOnline": info.desired_on_when_online,
            "desiredOnWhenOffline": info.desired_on_when_offline,
            "forcing": info.forcing.as_ref(),
            "breakerTripped": info.breaker_tripped,
            "powerSensed": info.power_sensed,
        })))
    }
}

/// Command to get the telemetry messages of the bus. The message can
/// override the configured digit.
pub struct CommandGetTelemetry {
    pub digit: i32,
}
impl Command for CommandGetTelemetry {
    fn name(&self) -> &str {
        "cmd_getTelemetry"
    }

    fn execute(&self, message: &Value, bus: &mut Bus) -> Result<CommandOutput, CommandError> {
        let digit = match &message["digit"] {
            Value::Null => self.digit,
            value => value
                .as_i64()
                .and_then(|digit| i32::try_from(digit).ok())
                .ok_or_else(|| {
                    CommandError::InvalidMessage(String::from("digit should be an integer"))
                })?,
        };

        Ok(CommandOutput::Value(Value::from(
            TelemetryBus::new(bus).get_messages(digit),
        )))
    }
}
