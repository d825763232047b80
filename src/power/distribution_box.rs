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

use crate::constants::NUM_BOX_PORT;
use crate::enums::DeviceType;
use crate::errors::BusResult;
use crate::mock::mock_constants::{
    MOCK_BOX_AMBIENT_TEMPERATURE, MOCK_BOX_INPUT_VOLTAGE, MOCK_BOX_PCB_TEMPERATURE,
    MOCK_BOX_PORT_CURRENT_DRAW, MOCK_BOX_PSU_OUTPUT_VOLTAGE, MOCK_BOX_PSU_TEMPERATURE,
    MOCK_FIRMWARE_VERSION,
};
use crate::power::distribution_device::{DeviceState, DistributionDevice};

#[derive(Clone, Debug, PartialEq)]
pub struct BoxTelemetry {
    pub firmware_version: String,
    // Voltages in volt.
    pub input_voltage: f64,
    pub power_supply_output_voltage: f64,
    // Temperatures in degree Celsius.
    pub power_supply_temperature: f64,
    pub pcb_temperature: f64,
    pub ambient_temperature: f64,
    // Current draw of each port in milliampere.
    pub ports_current_draw: Vec<f64>,
}

/// Mid-tier distribution device plugged into a hub port, with one port per
/// leaf device.
#[derive(Clone, Debug, PartialEq)]
pub struct DistributionBox {
    state: DeviceState,
}

impl DistributionBox {
    /// Create a new distribution box with all ports disconnected.
    pub fn new() -> Self {
        Self {
            state: DeviceState::new(NUM_BOX_PORT),
        }
    }

    /// Get the nominal current draw of the port.
    ///
    /// # Arguments
    /// * `port_number` - 1-based port number.
    ///
    /// # Returns
    /// Current draw in milliampere. It is 0 if the port is disconnected.
    pub fn port_current_draw(&self, port_number: usize) -> BusResult<f64> {
        Ok(Self::current_draw(self.is_port_connected(port_number)?))
    }

    pub fn ports_current_draw(&self) -> Vec<f64> {
        self.ports_connected()
            .into_iter()
            .map(Self::current_draw)
            .collect()
    }

    fn current_draw(connected: bool) -> f64 {
        if connected {
            MOCK_BOX_PORT_CURRENT_DRAW
        } else {
            0.0
        }
    }
}

impl Default for DistributionBox {
    fn default() -> Self {
        Self::new()
    }
}

impl DistributionDevice for DistributionBox {
    const PORT_COUNT: usize = NUM_BOX_PORT;
    const DEVICE_TYPE: DeviceType = DeviceType::Box;

    type Telemetry = BoxTelemetry;

    fn device_state(&self) -> &DeviceState {
        &self.state
    }

    fn device_state_mut(&mut self) -> &mut DeviceState {
        &mut self.state
    }

    fn telemetry(&self) -> BoxTelemetry {
        BoxTelemetry {
            firmware_version: String::from(MOCK_FIRMWARE_VERSION),
            input_voltage: MOCK_BOX_INPUT_VOLTAGE,
            power_supply_output_voltage: MOCK_BOX_PSU_OUTPUT_VOLTAGE,
            power_supply_temperature: MOCK_BOX_PSU_TEMPERATURE,
            pcb_temperature: MOCK_BOX_PCB_TEMPERATURE,
            ambient_temperature: MOCK_BOX_AMBIENT_TEMPERATURE,
            ports_current_draw: self.ports_current_draw(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::errors::BusError;

    fn create_distribution_box() -> DistributionBox {
        let mut connected = vec![false; NUM_BOX_PORT];
        connected[0] = true;
        connected[4] = true;

        let mut distribution_box = DistributionBox::new();
        distribution_box.configure(&connected).unwrap();

        distribution_box
    }

    #[test]
    fn test_new() {
        let distribution_box = DistributionBox::new();

        assert_eq!(distribution_box.ports_connected(), vec![false; NUM_BOX_PORT]);
        assert_eq!(
            distribution_box.ports_current_draw(),
            vec![0.0; NUM_BOX_PORT]
        );
    }

    #[test]
    fn test_port_current_draw() {
        let distribution_box = create_distribution_box();

        assert_relative_eq!(
            distribution_box.port_current_draw(1).unwrap(),
            MOCK_BOX_PORT_CURRENT_DRAW
        );
        assert_relative_eq!(distribution_box.port_current_draw(2).unwrap(), 0.0);
        assert_relative_eq!(
            distribution_box.port_current_draw(5).unwrap(),
            MOCK_BOX_PORT_CURRENT_DRAW
        );

        assert_eq!(
            distribution_box.port_current_draw(13).unwrap_err(),
            BusError::address("box port", 13)
        );
    }

    #[test]
    fn test_telemetry() {
        let distribution_box = create_distribution_box();

        let telemetry = distribution_box.telemetry();

        assert_relative_eq!(telemetry.input_voltage, 48.0);
        assert_relative_eq!(telemetry.power_supply_output_voltage, 5.1);
        assert_eq!(telemetry.ports_current_draw.len(), NUM_BOX_PORT);
        assert_relative_eq!(telemetry.ports_current_draw[4], MOCK_BOX_PORT_CURRENT_DRAW);

        assert_eq!(telemetry, distribution_box.telemetry());
    }
}
