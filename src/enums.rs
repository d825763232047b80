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

use strum_macros::{AsRefStr, EnumString, FromRepr, VariantNames};

/// Result of a command applied to a port.
#[derive(FromRepr, Debug, PartialEq, Eq, Clone, Copy, Hash, AsRefStr, VariantNames)]
#[strum(serialize_all = "lowercase")]
#[repr(u8)]
pub enum CommandResult {
    Applied = 1,
    Refused = 2,
    NoOp = 3,
}

impl CommandResult {
    /// The command changed the state or not.
    ///
    /// # Returns
    /// True if the state is changed. Otherwise, false.
    pub fn is_applied(&self) -> bool {
        *self == CommandResult::Applied
    }

    /// The command is refused or not.
    ///
    /// # Returns
    /// True if the command is refused. Otherwise, false.
    pub fn is_refused(&self) -> bool {
        *self == CommandResult::Refused
    }

    /// Build the result from a change flag for the idempotent setters.
    ///
    /// # Arguments
    /// * `is_changed` - The state is changed or not.
    ///
    /// # Returns
    /// Applied if changed. Otherwise, NoOp.
    pub fn from_change(is_changed: bool) -> Self {
        if is_changed {
            CommandResult::Applied
        } else {
            CommandResult::NoOp
        }
    }
}

/// Local override of a port's power.
#[derive(
    FromRepr, Debug, Default, PartialEq, Eq, Clone, Copy, Hash, AsRefStr, EnumString, VariantNames,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[repr(u8)]
pub enum Forcing {
    On = 1,
    Off = 2,
    #[default]
    Unforced = 3,
}

/// State of a port derived from its raw flags.
#[derive(FromRepr, Debug, PartialEq, Eq, Clone, Copy, AsRefStr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum PortState {
    Off = 1,
    On = 2,
    ForcedOn = 3,
    ForcedOff = 4,
    Tripped = 5,
}

/// Status of a distribution device.
#[derive(FromRepr, Debug, Default, PartialEq, Eq, Clone, Copy, AsRefStr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum DeviceStatus {
    #[default]
    Uninitialised = 1,
    Ok = 2,
}

/// Tier of a distribution device.
#[derive(FromRepr, Debug, PartialEq, Eq, Clone, Copy, Hash, AsRefStr)]
#[strum(serialize_all = "lowercase")]
#[repr(u8)]
pub enum DeviceType {
    Hub = 1,
    Box = 2,
}

/// Unit addressed by a bus command.
#[derive(Debug, PartialEq, Eq, Clone, Copy, AsRefStr, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum UnitType {
    Box,
    Leaf,
}

/// Command status.
#[derive(Debug, VariantNames, AsRefStr)]
pub enum CommandStatus {
    Success,
    Fail,
}
