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

use crate::enums::{CommandResult, Forcing, PortState};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Port {
    // Something is plugged into the port or not. Set by the configuration
    // only.
    connected: bool,
    // Breaker of the port is tripped or not.
    breaker_tripped: bool,
    // Local override of the power in the field.
    forcing: Forcing,
    // Desired power when the control system is in contact.
    desired_on_when_online: bool,
    // Desired power when the contact is lost.
    desired_on_when_offline: bool,
}

impl Port {
    /// Create a new port. It is disconnected, unforced and off.
    ///
    /// # Returns
    /// New port.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the port to be connected or not. A port that loses its connection
    /// drops the desired power, so nothing unplugged is left commanded on.
    /// Forcing and breaker are kept.
    ///
    /// # Arguments
    /// * `connected` - Something is plugged into the port or not.
    pub fn set_connected(&mut self, connected: bool) {
        if self.connected && !connected {
            self.desired_on_when_online = false;
            self.desired_on_when_offline = false;
        }

        self.connected = connected;
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn is_breaker_tripped(&self) -> bool {
        self.breaker_tripped
    }

    pub fn forcing(&self) -> Forcing {
        self.forcing
    }

    pub fn desired_on_when_online(&self) -> bool {
        self.desired_on_when_online
    }

    pub fn desired_on_when_offline(&self) -> bool {
        self.desired_on_when_offline
    }

    /// Power is sensed at the port or not.
    ///
    /// # Notes
    /// A tripped breaker outranks the forcing, which outranks the desired
    /// power when online.
    ///
    /// # Returns
    /// True if the power is sensed. Otherwise, false.
    pub fn power_sensed(&self) -> bool {
        if self.breaker_tripped {
            return false;
        }

        match self.forcing {
            Forcing::On => true,
            Forcing::Off => false,
            Forcing::Unforced => self.desired_on_when_online,
        }
    }

    /// Get the state of the port.
    ///
    /// # Returns
    /// State derived from the breaker, forcing and desired power.
    pub fn state(&self) -> PortState {
        if self.breaker_tripped {
            return PortState::Tripped;
        }

        match self.forcing {
            Forcing::On => PortState::ForcedOn,
            Forcing::Off => PortState::ForcedOff,
            Forcing::Unforced => {
                if self.desired_on_when_online {
                    PortState::On
                } else {
                    PortState::Off
                }
            }
        }
    }

    /// Turn on the port.
    ///
    /// # Arguments
    /// * `stay_on_when_offline` - Keep the power on when the contact with the
    /// control system is lost or not.
    ///
    /// # Returns
    /// Refused if the port is disconnected or forced off. NoOp if the desired
    /// power is already the same. Otherwise, Applied.
    pub fn turn_on(&mut self, stay_on_when_offline: bool) -> CommandResult {
        if !self.connected || self.forcing == Forcing::Off {
            return CommandResult::Refused;
        }

        if self.desired_on_when_online
            && (self.desired_on_when_offline == stay_on_when_offline)
        {
            return CommandResult::NoOp;
        }

        self.desired_on_when_online = true;
        self.desired_on_when_offline = stay_on_when_offline;

        CommandResult::Applied
    }

    /// Turn off the port.
    ///
    /// # Returns
    /// Refused if the port is forced on. NoOp if the port is already off.
    /// Otherwise, Applied.
    pub fn turn_off(&mut self) -> CommandResult {
        if self.forcing == Forcing::On {
            return CommandResult::Refused;
        }

        if !self.desired_on_when_online && !self.desired_on_when_offline {
            return CommandResult::NoOp;
        }

        self.desired_on_when_online = false;
        self.desired_on_when_offline = false;

        CommandResult::Applied
    }

    /// Simulate the local forcing of the port.
    ///
    /// # Arguments
    /// * `forcing` - New forcing.
    ///
    /// # Returns
    /// Applied if the forcing is changed. Otherwise, NoOp.
    pub fn simulate_forcing(&mut self, forcing: Forcing) -> CommandResult {
        let is_changed = self.forcing != forcing;
        self.forcing = forcing;

        CommandResult::from_change(is_changed)
    }

    /// Simulate the breaker trip.
    ///
    /// # Returns
    /// Applied if the breaker was not tripped. Otherwise, NoOp.
    pub fn simulate_breaker_trip(&mut self) -> CommandResult {
        let is_changed = !self.breaker_tripped;
        self.breaker_tripped = true;

        CommandResult::from_change(is_changed)
    }

    /// Reset the breaker.
    ///
    /// # Returns
    /// Applied if the breaker was tripped. Otherwise, NoOp.
    pub fn reset_breaker(&mut self) -> CommandResult {
        let is_changed = self.breaker_tripped;
        self.breaker_tripped = false;

        CommandResult::from_change(is_changed)
    }
}
