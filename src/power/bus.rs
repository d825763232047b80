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

use log::{debug, error, info, warn};
use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::constants::NUM_LEAF;
use crate::enums::{CommandResult, Forcing};
use crate::errors::{BusError, BusResult};
use crate::power::distribution_box::DistributionBox;
use crate::power::distribution_device::DistributionDevice;
use crate::power::hub::Hub;
use crate::power::port::Port;
use crate::topology::{Topology, TopologyDocument};

/// Bus shared by the concurrent callers. Every operation, including the
/// reload of topology, holds the single lock of the whole bus.
pub type SharedBus = Arc<Mutex<Bus>>;

/// Information of a leaf device.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LeafInfo {
    pub leaf_id: usize,
    pub box_id: usize,
    pub box_port: usize,
    // The box that owns the leaf is powered or not.
    pub online: bool,
    pub desired_on_when_online: bool,
    pub desired_on_when_offline: bool,
    pub forcing: Forcing,
    pub breaker_tripped: bool,
    pub power_sensed: bool,
}

pub struct Bus {
    // Hub that powers the boxes.
    hub: Hub,
    // Distribution boxes. The index is the 0-based box id.
    boxes: Vec<DistributionBox>,
    // Address maps of the boxes and leaves.
    topology: Topology,
}

impl Bus {
    /// Create a new bus without any topology. Every port is disconnected.
    ///
    /// # Arguments
    /// * `number_of_boxes` - Number of distribution boxes.
    ///
    /// # Returns
    /// New bus.
    pub fn new(number_of_boxes: usize) -> Self {
        Self {
            hub: Hub::new(),
            boxes: vec![DistributionBox::new(); number_of_boxes],
            topology: Topology::default(),
        }
    }

    /// Wrap the bus to be shared by the concurrent callers.
    pub fn into_shared(self) -> SharedBus {
        Arc::new(Mutex::new(self))
    }

    pub fn number_of_boxes(&self) -> usize {
        self.boxes.len()
    }

    pub fn hub(&self) -> &Hub {
        &self.hub
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    /// Get the distribution box.
    ///
    /// # Arguments
    /// * `box_id` - 1-based box id.
    ///
    /// # Returns
    /// Distribution box or the address error.
    pub fn distribution_box(&self, box_id: usize) -> BusResult<&DistributionBox> {
        let index = self.box_index(box_id)?;
        Ok(&self.boxes[index])
    }

    fn distribution_box_mut(&mut self, box_id: usize) -> BusResult<&mut DistributionBox> {
        let index = self.box_index(box_id)?;
        Ok(&mut self.boxes[index])
    }

    fn box_index(&self, box_id: usize) -> BusResult<usize> {
        if (box_id == 0) || (box_id > self.boxes.len()) {
            return Err(BusError::address("box", box_id));
        }

        Ok(box_id - 1)
    }

    /// Reload the topology from the YAML document.
    ///
    /// # Arguments
    /// * `source` - YAML text of the topology document.
    ///
    /// # Returns
    /// Configuration error if the document is malformed. The previous
    /// topology is kept in this case.
    pub fn reload_topology(&mut self, source: &str) -> BusResult<()> {
        let document = TopologyDocument::parse(source).inspect_err(|error| {
            error!("Failed to parse the topology: {error}.");
        })?;

        self.apply_topology(&document)
    }

    /// Reload the topology from the file.
    ///
    /// # Arguments
    /// * `filepath` - Path to the topology file.
    ///
    /// # Returns
    /// Configuration error if the file is missing or malformed. The previous
    /// topology is kept in this case.
    pub fn reload_topology_from_file(&mut self, filepath: &Path) -> BusResult<()> {
        let document = TopologyDocument::read_file(filepath).inspect_err(|error| {
            error!("Failed to read the topology file {:?}: {error}.", filepath);
        })?;

        self.apply_topology(&document)
    }

    /// Apply the topology document. The connectivity of all ports and the
    /// address maps are replaced together or not at all.
    ///
    /// # Arguments
    /// * `document` - Topology document.
    ///
    /// # Returns
    /// Configuration error if the document is not valid.
    pub fn apply_topology(&mut self, document: &TopologyDocument) -> BusResult<()> {
        let topology =
            Topology::from_document(document, self.boxes.len()).inspect_err(|error| {
                error!("Rejected the topology: {error}.");
            })?;

        let mut hub = self.hub.clone();
        hub.configure(&topology.hub_ports_connected())?;

        let mut boxes = self.boxes.clone();
        for (index, distribution_box) in boxes.iter_mut().enumerate() {
            distribution_box.configure(&topology.box_ports_connected(index + 1))?;
        }

        self.hub = hub;
        self.boxes = boxes;
        self.topology = topology;

        info!(
            "Reloaded the topology with {} boxes and {} leaves.",
            self.topology.box_hub_port.len(),
            self.topology.leaf_address.len()
        );

        Ok(())
    }

    /// Override the connectivity of the box ports until the next reload of
    /// topology.
    ///
    /// # Arguments
    /// * `box_id` - 1-based box id.
    /// * `port_connected` - Port is connected or not in the order of the port
    /// number.
    ///
    /// # Returns
    /// Address error for the unknown box. Configuration error for the wrong
    /// length.
    pub fn configure_box(&mut self, box_id: usize, port_connected: &[bool]) -> BusResult<()> {
        self.distribution_box_mut(box_id)?.configure(port_connected)
    }

    /// Resolve the box id to the hub port.
    ///
    /// # Arguments
    /// * `box_id` - 1-based box id.
    ///
    /// # Returns
    /// 1-based hub port or the address error.
    pub fn box_hub_port(&self, box_id: usize) -> BusResult<usize> {
        self.box_index(box_id)?;

        self.topology
            .box_hub_port
            .get(&box_id)
            .copied()
            .ok_or(BusError::address("box", box_id))
    }

    /// Resolve the leaf id to the box and box port.
    ///
    /// # Arguments
    /// * `leaf_id` - 1-based leaf id.
    ///
    /// # Returns
    /// Tuple of the 1-based box id and box port, or the address error.
    pub fn leaf_address(&self, leaf_id: usize) -> BusResult<(usize, usize)> {
        if (leaf_id == 0) || (leaf_id > NUM_LEAF) {
            return Err(BusError::address("leaf", leaf_id));
        }

        self.topology
            .leaf_address
            .get(&leaf_id)
            .copied()
            .ok_or(BusError::address("leaf", leaf_id))
    }

    /// Get the hub port that powers the box.
    pub fn box_port(&self, box_id: usize) -> BusResult<&Port> {
        self.hub.port(self.box_hub_port(box_id)?)
    }

    /// Get the box port that powers the leaf.
    pub fn leaf_port(&self, leaf_id: usize) -> BusResult<&Port> {
        let (box_id, box_port) = self.leaf_address(leaf_id)?;
        self.distribution_box(box_id)?.port(box_port)
    }

    /// Turn on the box.
    ///
    /// # Arguments
    /// * `box_id` - 1-based box id.
    /// * `stay_on_when_offline` - Keep the power on when the contact is lost
    /// or not.
    ///
    /// # Returns
    /// Result of the hub port.
    pub fn turn_box_on(
        &mut self,
        box_id: usize,
        stay_on_when_offline: bool,
    ) -> BusResult<CommandResult> {
        let hub_port = self.box_hub_port(box_id)?;
        let result = self.hub.turn_port_on(hub_port, stay_on_when_offline)?;
        log_result("turn on", "box", box_id, result);

        Ok(result)
    }

    /// Turn off the box.
    ///
    /// # Arguments
    /// * `box_id` - 1-based box id.
    ///
    /// # Returns
    /// Result of the hub port.
    pub fn turn_box_off(&mut self, box_id: usize) -> BusResult<CommandResult> {
        let hub_port = self.box_hub_port(box_id)?;
        let result = self.hub.turn_port_off(hub_port)?;
        log_result("turn off", "box", box_id, result);

        Ok(result)
    }

    pub fn simulate_box_forcing(
        &mut self,
        box_id: usize,
        forcing: Forcing,
    ) -> BusResult<CommandResult> {
        let hub_port = self.box_hub_port(box_id)?;
        let result = self.hub.simulate_port_forcing(hub_port, forcing)?;
        log_result("force", "box", box_id, result);

        Ok(result)
    }

    pub fn simulate_box_breaker_trip(&mut self, box_id: usize) -> BusResult<CommandResult> {
        let hub_port = self.box_hub_port(box_id)?;
        let result = self.hub.simulate_port_breaker_trip(hub_port)?;
        log_result("trip breaker", "box", box_id, result);

        Ok(result)
    }

    pub fn reset_box_breaker(&mut self, box_id: usize) -> BusResult<CommandResult> {
        let hub_port = self.box_hub_port(box_id)?;
        let result = self.hub.reset_port_breaker(hub_port)?;
        log_result("reset breaker", "box", box_id, result);

        Ok(result)
    }

    pub fn box_power_sensed(&self, box_id: usize) -> BusResult<bool> {
        Ok(self.box_port(box_id)?.power_sensed())
    }

    pub fn box_forcing(&self, box_id: usize) -> BusResult<Forcing> {
        Ok(self.box_port(box_id)?.forcing())
    }

    pub fn is_box_breaker_tripped(&self, box_id: usize) -> BusResult<bool> {
        Ok(self.box_port(box_id)?.is_breaker_tripped())
    }

    /// Turn on the leaf. The owning box is turned on first.
    ///
    /// # Arguments
    /// * `leaf_id` - 1-based leaf id.
    /// * `stay_on_when_offline` - Keep the power on when the contact is lost
    /// or not.
    ///
    /// # Returns
    /// Refused if the box port is disconnected or the box can not be turned
    /// on. Otherwise, the result of the box port. A box port refused after
    /// the box is turned on leaves the box on.
    pub fn turn_leaf_on(
        &mut self,
        leaf_id: usize,
        stay_on_when_offline: bool,
    ) -> BusResult<CommandResult> {
        let (box_id, box_port) = self.leaf_address(leaf_id)?;

        // Nothing is touched for a disconnected leaf, including the box.
        if !self.distribution_box(box_id)?.is_port_connected(box_port)? {
            log_result("turn on", "leaf", leaf_id, CommandResult::Refused);
            return Ok(CommandResult::Refused);
        }

        if self
            .turn_box_on(box_id, stay_on_when_offline)?
            .is_refused()
        {
            log_result("turn on", "leaf", leaf_id, CommandResult::Refused);
            return Ok(CommandResult::Refused);
        }

        let result = self
            .distribution_box_mut(box_id)?
            .turn_port_on(box_port, stay_on_when_offline)?;
        log_result("turn on", "leaf", leaf_id, result);

        Ok(result)
    }

    /// Turn off the leaf. The owning box is turned off as well when this was
    /// the last leaf that wanted the power.
    ///
    /// # Arguments
    /// * `leaf_id` - 1-based leaf id.
    ///
    /// # Returns
    /// Result of the box port.
    pub fn turn_leaf_off(&mut self, leaf_id: usize) -> BusResult<CommandResult> {
        let (box_id, box_port) = self.leaf_address(leaf_id)?;

        let distribution_box = self.distribution_box_mut(box_id)?;
        let result = distribution_box.turn_port_off(box_port)?;
        let is_last_leaf = result.is_applied() && !distribution_box.any_port_desired_on();

        log_result("turn off", "leaf", leaf_id, result);

        if is_last_leaf {
            info!("No leaf of box {box_id} wants the power. Turn off the box.");
            self.turn_box_off(box_id)?;
        }

        Ok(result)
    }

    pub fn simulate_leaf_forcing(
        &mut self,
        leaf_id: usize,
        forcing: Forcing,
    ) -> BusResult<CommandResult> {
        let (box_id, box_port) = self.leaf_address(leaf_id)?;
        let result = self
            .distribution_box_mut(box_id)?
            .simulate_port_forcing(box_port, forcing)?;
        log_result("force", "leaf", leaf_id, result);

        Ok(result)
    }

    pub fn simulate_leaf_breaker_trip(&mut self, leaf_id: usize) -> BusResult<CommandResult> {
        let (box_id, box_port) = self.leaf_address(leaf_id)?;
        let result = self
            .distribution_box_mut(box_id)?
            .simulate_port_breaker_trip(box_port)?;
        log_result("trip breaker", "leaf", leaf_id, result);

        Ok(result)
    }

    pub fn reset_leaf_breaker(&mut self, leaf_id: usize) -> BusResult<CommandResult> {
        let (box_id, box_port) = self.leaf_address(leaf_id)?;
        let result = self
            .distribution_box_mut(box_id)?
            .reset_port_breaker(box_port)?;
        log_result("reset breaker", "leaf", leaf_id, result);

        Ok(result)
    }

    /// Power is sensed at the leaf or not.
    ///
    /// # Notes
    /// The leaf can only have the power when its box has the power.
    ///
    /// # Arguments
    /// * `leaf_id` - 1-based leaf id.
    ///
    /// # Returns
    /// True if both the box port and the hub port of its box sense the power.
    pub fn leaf_power_sensed(&self, leaf_id: usize) -> BusResult<bool> {
        let (box_id, _) = self.leaf_address(leaf_id)?;
        Ok(self.leaf_port(leaf_id)?.power_sensed() && self.box_power_sensed(box_id)?)
    }

    /// The leaf is online or not.
    ///
    /// # Notes
    /// Online means the leaf is reachable: its box has the power. This is not
    /// the same as the leaf being powered.
    ///
    /// # Arguments
    /// * `leaf_id` - 1-based leaf id.
    ///
    /// # Returns
    /// True if the hub port of the owning box senses the power.
    pub fn leaf_online(&self, leaf_id: usize) -> BusResult<bool> {
        let (box_id, _) = self.leaf_address(leaf_id)?;
        self.box_power_sensed(box_id)
    }

    pub fn leaf_forcing(&self, leaf_id: usize) -> BusResult<Forcing> {
        Ok(self.leaf_port(leaf_id)?.forcing())
    }

    pub fn is_leaf_breaker_tripped(&self, leaf_id: usize) -> BusResult<bool> {
        Ok(self.leaf_port(leaf_id)?.is_breaker_tripped())
    }

    /// Get the information of the leaf.
    ///
    /// # Arguments
    /// * `leaf_id` - 1-based leaf id.
    ///
    /// # Returns
    /// Leaf information or the address error.
    pub fn leaf_info(&self, leaf_id: usize) -> BusResult<LeafInfo> {
        let (box_id, box_port) = self.leaf_address(leaf_id)?;
        let port = self.leaf_port(leaf_id)?;

        Ok(LeafInfo {
            leaf_id,
            box_id,
            box_port,
            online: self.leaf_online(leaf_id)?,
            desired_on_when_online: port.desired_on_when_online(),
            desired_on_when_offline: port.desired_on_when_offline(),
            forcing: port.forcing(),
            breaker_tripped: port.is_breaker_tripped(),
            power_sensed: self.leaf_power_sensed(leaf_id)?,
        })
    }

    /// Get the online status of all leaves.
    ///
    /// # Returns
    /// Online status in the order of the leaf id. The leaf not in the topology
    /// is offline.
    pub fn leaves_online(&self) -> Vec<bool> {
        (1..=NUM_LEAF)
            .map(|leaf_id| self.leaf_online(leaf_id).unwrap_or(false))
            .collect()
    }

    /// Get the power sensed of all boxes.
    ///
    /// # Returns
    /// Power sensed in the order of the box id. The box not in the topology
    /// has no power.
    pub fn boxes_power_sensed(&self) -> Vec<bool> {
        (1..=self.boxes.len())
            .map(|box_id| self.box_power_sensed(box_id).unwrap_or(false))
            .collect()
    }

    pub fn set_hub_service_led_on(&mut self, service_led_on: bool) {
        self.hub.set_service_led_on(service_led_on);
    }

    pub fn set_box_service_led_on(&mut self, box_id: usize, service_led_on: bool) -> BusResult<()> {
        self.distribution_box_mut(box_id)?
            .set_service_led_on(service_led_on);

        Ok(())
    }

    pub fn initialize_hub(&mut self) -> CommandResult {
        self.hub.initialize()
    }

    pub fn initialize_box(&mut self, box_id: usize) -> BusResult<CommandResult> {
        Ok(self.distribution_box_mut(box_id)?.initialize())
    }
}

/// Log the result of a command.
fn log_result(action: &str, target: &str, id: usize, result: CommandResult) {
    match result {
        CommandResult::Applied => debug!("{action} {target} {id}: applied."),
        CommandResult::Refused => warn!("{action} {target} {id}: refused."),
        CommandResult::NoOp => debug!("{action} {target} {id}: no change."),
    }
}
