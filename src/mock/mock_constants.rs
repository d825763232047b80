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

// Firmware version reported by the simulated devices.
pub const MOCK_FIRMWARE_VERSION: &str = "1.2.3-simulated";

// Hub power supplies in volt and ampere.
pub const MOCK_HUB_PSU48V_VOLTAGE: [f64; 2] = [48.0, 48.1];
pub const MOCK_HUB_PSU48V_CURRENT: f64 = 20.5;

// Temperature in Celsius
pub const MOCK_HUB_PSU48V_TEMPERATURE: [f64; 2] = [41.2, 41.6];
pub const MOCK_HUB_PCB_TEMPERATURE: f64 = 38.0;
pub const MOCK_HUB_CONTROLLER_TEMPERATURE: f64 = 37.4;

// Relative humidity in percent.
pub const MOCK_HUB_HUMIDITY: f64 = 46.0;

// Box power supply in volt.
pub const MOCK_BOX_INPUT_VOLTAGE: f64 = 48.0;
pub const MOCK_BOX_PSU_OUTPUT_VOLTAGE: f64 = 5.1;

// Temperature in Celsius
pub const MOCK_BOX_PSU_TEMPERATURE: f64 = 42.1;
pub const MOCK_BOX_PCB_TEMPERATURE: f64 = 39.3;
pub const MOCK_BOX_AMBIENT_TEMPERATURE: f64 = 33.3;

// Nominal current draw of a connected box port in milliampere.
pub const MOCK_BOX_PORT_CURRENT_DRAW: f64 = 421.0;
