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

use log::error;
use serde_json::Value;
use thiserror::Error;

use crate::enums::{CommandResult, CommandStatus};
use crate::errors::BusError;
use crate::power::bus::Bus;
use crate::utility::{acknowledge_command, get_message_name, get_message_sequence_id};

/// Error of the command execution.
#[derive(Debug, Error, PartialEq)]
pub enum CommandError {
    /// Field of the message is missing or has a wrong type.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
    /// Bus rejected the operation.
    #[error(transparent)]
    Bus(#[from] BusError),
}

/// Output of a command.
#[derive(Debug, PartialEq)]
pub enum CommandOutput {
    // Result of a command on the ports.
    Result(CommandResult),
    // Queried value.
    Value(Value),
    // Nothing to report.
    Done,
}

pub trait Command {
    /// Get the name of the command.
    ///
    /// # Returns
    /// Command name.
    fn name(&self) -> &str;

    /// Execute the command.
    ///
    /// # Arguments
    /// * `message` - Command message to execute.
    /// * `bus` - Bus to execute the command.
    ///
    /// # Returns
    /// Command output or the error.
    fn execute(&self, message: &Value, bus: &mut Bus) -> Result<CommandOutput, CommandError>;
}

pub struct CommandSchema {
    // List of commands.
    pub commands: Vec<Box<dyn Command + Send>>,
}

impl CommandSchema {
    /// Create a new command schema.
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    /// Add a command to the schema.
    pub fn add_command(&mut self, command: Box<dyn Command + Send>) {
        self.commands.push(command);
    }

    /// Execute a command.
    ///
    /// # Arguments
    /// * `message` - Command message to execute.
    /// * `bus` - Bus to execute the command.
    ///
    /// # Returns
    /// Acknowledgement of the command.
    pub fn execute(&self, message: &Value, bus: &mut Bus) -> Value {
        let name = get_message_name(message);
        let sequence_id = get_message_sequence_id(message);

        let Some(command) = self.commands.iter().find(|cmd| cmd.name() == name) else {
            error!("Unknown command: {message}");

            return acknowledge_command(CommandStatus::Fail, sequence_id);
        };

        match command.execute(message, bus) {
            Ok(output) => {
                let mut acknowledgement = acknowledge_command(CommandStatus::Success, sequence_id);
                match output {
                    CommandOutput::Result(result) => {
                        acknowledgement["result"] = Value::from(result.as_ref());
                    }
                    CommandOutput::Value(value) => {
                        acknowledgement["value"] = value;
                    }
                    CommandOutput::Done => {}
                }

                acknowledgement
            }
            Err(command_error) => {
                error!("Command execution failed: {message}: {command_error}.");

                let mut acknowledgement = acknowledge_command(CommandStatus::Fail, sequence_id);
                acknowledgement["error"] = Value::from(command_error.to_string());

                acknowledgement
            }
        }
    }

    /// Get the number of commands.
    ///
    /// # Returns
    /// Number of commands.
    pub fn number_of_commands(&self) -> usize {
        self.commands.len()
    }
}

impl Default for CommandSchema {
    fn default() -> Self {
        Self::new()
    }
}

/// Get the 1-based id from the message.
///
/// # Arguments
/// * `message` - Command message.
/// * `key` - Key of the id.
///
/// # Returns
/// Id or the invalid message error.
pub fn get_id(message: &Value, key: &str) -> Result<usize, CommandError> {
    message[key]
        .as_u64()
        .map(|id| id as usize)
        .ok_or_else(|| CommandError::InvalidMessage(format!("{key} should be an unsigned integer")))
}

/// Get the boolean from the message.
///
/// # Arguments
/// * `message` - Command message.
/// * `key` - Key of the boolean.
/// * `default` - Default value if the key does not exist.
///
/// # Returns
/// Boolean or the invalid message error.
pub fn get_bool(message: &Value, key: &str, default: Option<bool>) -> Result<bool, CommandError> {
    match (&message[key], default) {
        (Value::Bool(value), _) => Ok(*value),
        (Value::Null, Some(value)) => Ok(value),
        _ => Err(CommandError::InvalidMessage(format!(
            "{key} should be a boolean"
        ))),
    }
}

/// Get the string from the message.
///
/// # Arguments
/// * `message` - Command message.
/// * `key` - Key of the string.
///
/// # Returns
/// String or the invalid message error.
pub fn get_str<'a>(message: &'a Value, key: &str) -> Result<&'a str, CommandError> {
    message[key]
        .as_str()
        .ok_or_else(|| CommandError::InvalidMessage(format!("{key} should be a string")))
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    struct CommandTest;
    impl Command for CommandTest {
        fn name(&self) -> &str {
            "cmd_test"
        }

        fn execute(&self, message: &Value, _bus: &mut Bus) -> Result<CommandOutput, CommandError> {
            match get_id(message, "value")? {
                1 => Ok(CommandOutput::Result(CommandResult::NoOp)),
                2 => Ok(CommandOutput::Value(json!([1, 2]))),
                3 => Err(BusError::address("leaf", 3).into()),
                _ => Ok(CommandOutput::Done),
            }
        }
    }

    fn create_command_schema() -> CommandSchema {
        let mut command_schema = CommandSchema::new();
        command_schema.add_command(Box::new(CommandTest));

        command_schema
    }

    #[test]
    fn test_add_command() {
        let command_schema = create_command_schema();

        assert_eq!(command_schema.number_of_commands(), 1);
    }

    #[test]
    fn test_execute() {
        let command_schema = create_command_schema();
        let mut bus = Bus::new(1);

        assert_eq!(
            command_schema.execute(
                &json!({"id": "cmd_test", "value": 1, "sequence_id": 1}),
                &mut bus
            ),
            json!({"id": "success", "sequence_id": 1, "result": "noop"})
        );
        assert_eq!(
            command_schema.execute(
                &json!({"id": "cmd_test", "value": 2, "sequence_id": 2}),
                &mut bus
            ),
            json!({"id": "success", "sequence_id": 2, "value": [1, 2]})
        );
        assert_eq!(
            command_schema.execute(&json!({"id": "cmd_test", "value": 4}), &mut bus),
            json!({"id": "success", "sequence_id": -1})
        );
    }

    #[test]
    fn test_execute_fail() {
        let command_schema = create_command_schema();
        let mut bus = Bus::new(1);

        let acknowledgement = command_schema.execute(
            &json!({"id": "cmd_test", "value": 3, "sequence_id": 3}),
            &mut bus,
        );
        assert_eq!(acknowledgement["id"], "fail");
        assert_eq!(
            acknowledgement["error"],
            "address error: leaf 3 is not addressable"
        );

        let acknowledgement =
            command_schema.execute(&json!({"id": "cmd_test", "sequence_id": 4}), &mut bus);
        assert_eq!(acknowledgement["id"], "fail");

        assert_eq!(
            command_schema.execute(&json!({"id": "cmd_unknown", "sequence_id": 5}), &mut bus),
            json!({"id": "fail", "sequence_id": 5})
        );
    }

    #[test]
    fn test_get_fields() {
        let message = json!({"leafId": 3, "status": true, "forcing": "on"});

        assert_eq!(get_id(&message, "leafId").unwrap(), 3);
        assert!(get_id(&message, "boxId").is_err());
        assert!(get_id(&json!({"leafId": -1}), "leafId").is_err());

        assert!(get_bool(&message, "status", None).unwrap());
        assert!(!get_bool(&message, "missing", Some(false)).unwrap());
        assert!(get_bool(&message, "missing", None).is_err());
        assert!(get_bool(&message, "leafId", Some(true)).is_err());

        assert_eq!(get_str(&message, "forcing").unwrap(), "on");
        assert!(get_str(&message, "leafId").is_err());
    }
}
