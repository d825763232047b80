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

use crate::enums::{DeviceStatus, Forcing};
use crate::power::bus::Bus;
use crate::power::distribution_box::BoxTelemetry;
use crate::power::distribution_device::DistributionDevice;
use crate::power::hub::HubTelemetry;
use crate::telemetry::telemetry_default::TelemetryDefault;

/// Snapshot of the ports of a device.
#[derive(Clone, Debug, PartialEq)]
pub struct PortsSnapshot {
    pub connected: Vec<bool>,
    pub power_sensed: Vec<bool>,
    pub forcing: Vec<Forcing>,
    pub breaker_tripped: Vec<bool>,
    pub desired_on_when_online: Vec<bool>,
    pub desired_on_when_offline: Vec<bool>,
}

impl PortsSnapshot {
    /// Take the snapshot of the device.
    ///
    /// # Arguments
    /// * `device` - Distribution device.
    ///
    /// # Returns
    /// Snapshot in the order of the port number.
    pub fn new<T: DistributionDevice>(device: &T) -> Self {
        Self {
            connected: device.ports_connected(),
            power_sensed: device.ports_power_sensed(),
            forcing: device.ports_forcing(),
            breaker_tripped: device.ports_breaker_tripped(),
            desired_on_when_online: device.ports_desired_on_when_online(),
            desired_on_when_offline: device.ports_desired_on_when_offline(),
        }
    }

    fn to_value(&self) -> Value {
        let forcing: Vec<&str> = self.forcing.iter().map(|forcing| forcing.as_ref()).collect();

        json!({
            "connected": self.connected,
            "powerSensed": self.power_sensed,
            "forcing": forcing,
            "breakerTripped": self.breaker_tripped,
            "desiredOnWhenOnline": self.desired_on_when_online,
            "desiredOnWhenOffline": self.desired_on_when_offline,
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TelemetryBox {
    pub box_id: usize,
    pub hub_port: usize,
    pub status: DeviceStatus,
    pub service_led_on: bool,
    pub telemetry: BoxTelemetry,
    pub ports: PortsSnapshot,
}

/// Telemetry of the whole bus for the monitoring poller.
#[derive(Clone, Debug, PartialEq)]
pub struct TelemetryBus {
    pub hub_status: DeviceStatus,
    pub hub_service_led_on: bool,
    pub hub: HubTelemetry,
    pub hub_ports: PortsSnapshot,
    // Boxes in the topology in the order of the box id.
    pub boxes: Vec<TelemetryBox>,
    pub leaves_online: Vec<bool>,
}

impl TelemetryDefault for TelemetryBus {
    fn get_messages(&self, digit: i32) -> Vec<Value> {
        let mut messages = vec![
            self.get_message_hub_status(digit),
            self.get_message_hub_ports(),
        ];
        messages.extend(
            self.boxes
                .iter()
                .map(|telemetry_box| self.get_message_box_status(telemetry_box, digit)),
        );
        messages.push(self.get_message_leaves_online());

        messages
    }
}

impl TelemetryBus {
    /// Take the snapshot of the bus.
    ///
    /// # Arguments
    /// * `bus` - Bus.
    ///
    /// # Returns
    /// New telemetry object.
    pub fn new(bus: &Bus) -> Self {
        let hub = bus.hub();

        let boxes = bus
            .topology()
            .box_hub_port
            .iter()
            .filter_map(|(box_id, hub_port)| {
                let distribution_box = bus.distribution_box(*box_id).ok()?;

                // A box port only senses the power when the box has it.
                let mut ports = PortsSnapshot::new(distribution_box);
                if !bus.box_power_sensed(*box_id).unwrap_or(false) {
                    ports.power_sensed.fill(false);
                }

                Some(TelemetryBox {
                    box_id: *box_id,
                    hub_port: *hub_port,
                    status: distribution_box.status(),
                    service_led_on: distribution_box.service_led_on(),
                    telemetry: distribution_box.telemetry(),
                    ports,
                })
            })
            .collect();

        Self {
            hub_status: hub.status(),
            hub_service_led_on: hub.service_led_on(),
            hub: hub.telemetry(),
            hub_ports: PortsSnapshot::new(hub),
            boxes,
            leaves_online: bus.leaves_online(),
        }
    }

    /// Get the message of the hub status.
    ///
    /// # Arguments
    /// * `digit` - The number of digits after the decimal point.
    ///
    /// # Returns
    /// The message of the hub status.
    fn get_message_hub_status(&self, digit: i32) -> Value {
        json!({
            "id": "hubStatus",
            "status": self.hub_status.as_ref(),
            "serviceLed": self.hub_service_led_on,
            "firmwareVersion": self.hub.firmware_version,
            "psu48vVoltages": self.round_vector(&self.hub.psu48v_voltages, digit),
            "psu48vCurrent": self.round(self.hub.psu48v_current, digit),
            "psu48vTemperatures": self.round_vector(&self.hub.psu48v_temperatures, digit),
            "pcbTemperature": self.round(self.hub.pcb_temperature, digit),
            "controllerTemperature": self.round(self.hub.controller_temperature, digit),
            "humidity": self.round(self.hub.humidity, digit),
        })
    }

    fn get_message_hub_ports(&self) -> Value {
        let mut message = self.hub_ports.to_value();
        message["id"] = json!("hubPorts");

        message
    }

    /// Get the message of the box status.
    ///
    /// # Arguments
    /// * `telemetry_box` - Telemetry of the box.
    /// * `digit` - The number of digits after the decimal point.
    ///
    /// # Returns
    /// The message of the box status.
    fn get_message_box_status(&self, telemetry_box: &TelemetryBox, digit: i32) -> Value {
        let telemetry = &telemetry_box.telemetry;

        json!({
            "id": "boxStatus",
            "boxId": telemetry_box.box_id,
            "hubPort": telemetry_box.hub_port,
            "status": telemetry_box.status.as_ref(),
            "serviceLed": telemetry_box.service_led_on,
            "firmwareVersion": telemetry.firmware_version,
            "inputVoltage": self.round(telemetry.input_voltage, digit),
            "powerSupplyOutputVoltage": self.round(telemetry.power_supply_output_voltage, digit),
            "powerSupplyTemperature": self.round(telemetry.power_supply_temperature, digit),
            "pcbTemperature": self.round(telemetry.pcb_temperature, digit),
            "ambientTemperature": self.round(telemetry.ambient_temperature, digit),
            "portsCurrentDraw": self.round_vector(&telemetry.ports_current_draw, digit),
            "ports": telemetry_box.ports.to_value(),
        })
    }

    fn get_message_leaves_online(&self) -> Value {
        json!({
            "id": "leavesOnline",
            "online": self.leaves_online,
        })
    }
}
