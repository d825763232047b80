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

use crate::constants::NUM_HUB_PORT;
use crate::enums::DeviceType;
use crate::mock::mock_constants::{
    MOCK_FIRMWARE_VERSION, MOCK_HUB_CONTROLLER_TEMPERATURE, MOCK_HUB_HUMIDITY,
    MOCK_HUB_PCB_TEMPERATURE, MOCK_HUB_PSU48V_CURRENT, MOCK_HUB_PSU48V_TEMPERATURE,
    MOCK_HUB_PSU48V_VOLTAGE,
};
use crate::power::distribution_device::{DeviceState, DistributionDevice};

#[derive(Clone, Debug, PartialEq)]
pub struct HubTelemetry {
    pub firmware_version: String,
    // 48 V power supplies in volt.
    pub psu48v_voltages: [f64; 2],
    // Total current of the 48 V power supplies in ampere.
    pub psu48v_current: f64,
    // Temperatures in degree Celsius.
    pub psu48v_temperatures: [f64; 2],
    pub pcb_temperature: f64,
    pub controller_temperature: f64,
    // Relative humidity in percent.
    pub humidity: f64,
}

/// Top-tier distribution device with one port per distribution box.
#[derive(Clone, Debug, PartialEq)]
pub struct Hub {
    state: DeviceState,
}

impl Hub {
    /// Create a new hub with all ports disconnected.
    pub fn new() -> Self {
        Self {
            state: DeviceState::new(NUM_HUB_PORT),
        }
    }
}

impl Default for Hub {
    fn default() -> Self {
        Self::new()
    }
}

impl DistributionDevice for Hub {
    const PORT_COUNT: usize = NUM_HUB_PORT;
    const DEVICE_TYPE: DeviceType = DeviceType::Hub;

    type Telemetry = HubTelemetry;

    fn device_state(&self) -> &DeviceState {
        &self.state
    }

    fn device_state_mut(&mut self) -> &mut DeviceState {
        &mut self.state
    }

    fn telemetry(&self) -> HubTelemetry {
        HubTelemetry {
            firmware_version: String::from(MOCK_FIRMWARE_VERSION),
            psu48v_voltages: MOCK_HUB_PSU48V_VOLTAGE,
            psu48v_current: MOCK_HUB_PSU48V_CURRENT,
            psu48v_temperatures: MOCK_HUB_PSU48V_TEMPERATURE,
            pcb_temperature: MOCK_HUB_PCB_TEMPERATURE,
            controller_temperature: MOCK_HUB_CONTROLLER_TEMPERATURE,
            humidity: MOCK_HUB_HUMIDITY,
        }
    }
}
