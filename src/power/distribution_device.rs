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

use crate::enums::{CommandResult, DeviceStatus, DeviceType, Forcing};
use crate::errors::{BusError, BusResult};
use crate::power::port::Port;

/// State shared by every distribution device: the ports, the service LED and
/// the status.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeviceState {
    // Ports of the device. The index is the 0-based port number.
    pub ports: Vec<Port>,
    // Service LED is on or not.
    pub service_led_on: bool,
    // Status of the device.
    pub status: DeviceStatus,
}

impl DeviceState {
    /// Create a new device state.
    ///
    /// # Arguments
    /// * `port_count` - Number of ports.
    ///
    /// # Returns
    /// New device state with all ports disconnected and off.
    pub fn new(port_count: usize) -> Self {
        Self {
            ports: vec![Port::new(); port_count],
            service_led_on: false,
            status: DeviceStatus::default(),
        }
    }
}

/// Device that switches the power of a fixed number of ports. The ports are
/// addressed by the 1-based port number.
pub trait DistributionDevice {
    /// Number of ports of the device.
    const PORT_COUNT: usize;
    /// Tier of the device.
    const DEVICE_TYPE: DeviceType;

    /// Environmental telemetry of the device.
    type Telemetry;

    fn device_state(&self) -> &DeviceState;

    fn device_state_mut(&mut self) -> &mut DeviceState;

    /// Get the environmental telemetry. The values are simulated and stable.
    ///
    /// # Returns
    /// Telemetry.
    fn telemetry(&self) -> Self::Telemetry;

    /// Configure which ports have something plugged in.
    ///
    /// # Arguments
    /// * `port_connected` - Port is connected or not in the order of the port
    /// number.
    ///
    /// # Returns
    /// Configuration error if the length is not the number of ports.
    fn configure(&mut self, port_connected: &[bool]) -> BusResult<()> {
        if port_connected.len() != Self::PORT_COUNT {
            return Err(BusError::configuration(format!(
                "{} expects {} connectivity values but got {}",
                Self::DEVICE_TYPE.as_ref(),
                Self::PORT_COUNT,
                port_connected.len()
            )));
        }

        self.device_state_mut()
            .ports
            .iter_mut()
            .zip(port_connected)
            .for_each(|(port, connected)| port.set_connected(*connected));

        Ok(())
    }

    /// Get the port.
    ///
    /// # Arguments
    /// * `port_number` - 1-based port number.
    ///
    /// # Returns
    /// Port or the address error.
    fn port(&self, port_number: usize) -> BusResult<&Port> {
        let index = port_index::<Self>(port_number)?;
        Ok(&self.device_state().ports[index])
    }

    /// Get the mutable port.
    ///
    /// # Arguments
    /// * `port_number` - 1-based port number.
    ///
    /// # Returns
    /// Mutable port or the address error.
    fn port_mut(&mut self, port_number: usize) -> BusResult<&mut Port> {
        let index = port_index::<Self>(port_number)?;
        Ok(&mut self.device_state_mut().ports[index])
    }

    fn turn_port_on(
        &mut self,
        port_number: usize,
        stay_on_when_offline: bool,
    ) -> BusResult<CommandResult> {
        Ok(self.port_mut(port_number)?.turn_on(stay_on_when_offline))
    }

    fn turn_port_off(&mut self, port_number: usize) -> BusResult<CommandResult> {
        Ok(self.port_mut(port_number)?.turn_off())
    }

    fn simulate_port_forcing(
        &mut self,
        port_number: usize,
        forcing: Forcing,
    ) -> BusResult<CommandResult> {
        Ok(self.port_mut(port_number)?.simulate_forcing(forcing))
    }

    fn simulate_port_breaker_trip(&mut self, port_number: usize) -> BusResult<CommandResult> {
        Ok(self.port_mut(port_number)?.simulate_breaker_trip())
    }

    fn reset_port_breaker(&mut self, port_number: usize) -> BusResult<CommandResult> {
        Ok(self.port_mut(port_number)?.reset_breaker())
    }

    fn is_port_connected(&self, port_number: usize) -> BusResult<bool> {
        Ok(self.port(port_number)?.is_connected())
    }

    fn port_power_sensed(&self, port_number: usize) -> BusResult<bool> {
        Ok(self.port(port_number)?.power_sensed())
    }

    fn port_forcing(&self, port_number: usize) -> BusResult<Forcing> {
        Ok(self.port(port_number)?.forcing())
    }

    fn is_port_breaker_tripped(&self, port_number: usize) -> BusResult<bool> {
        Ok(self.port(port_number)?.is_breaker_tripped())
    }

    fn service_led_on(&self) -> bool {
        self.device_state().service_led_on
    }

    fn set_service_led_on(&mut self, service_led_on: bool) {
        self.device_state_mut().service_led_on = service_led_on;
    }

    fn status(&self) -> DeviceStatus {
        self.device_state().status
    }

    /// Initialize the device.
    ///
    /// # Returns
    /// Applied if the device was uninitialised. Otherwise, NoOp.
    fn initialize(&mut self) -> CommandResult {
        let state = self.device_state_mut();
        let is_changed = state.status != DeviceStatus::Ok;
        state.status = DeviceStatus::Ok;

        CommandResult::from_change(is_changed)
    }

    /// Any port wants the power when online or not.
    ///
    /// # Returns
    /// True if at least one port has the desired power on when online.
    fn any_port_desired_on(&self) -> bool {
        self.device_state()
            .ports
            .iter()
            .any(|port| port.desired_on_when_online())
    }

    fn ports_connected(&self) -> Vec<bool> {
        collect_ports(self, Port::is_connected)
    }

    fn ports_power_sensed(&self) -> Vec<bool> {
        collect_ports(self, Port::power_sensed)
    }

    fn ports_forcing(&self) -> Vec<Forcing> {
        collect_ports(self, Port::forcing)
    }

    fn ports_breaker_tripped(&self) -> Vec<bool> {
        collect_ports(self, Port::is_breaker_tripped)
    }

    fn ports_desired_on_when_online(&self) -> Vec<bool> {
        collect_ports(self, Port::desired_on_when_online)
    }

    fn ports_desired_on_when_offline(&self) -> Vec<bool> {
        collect_ports(self, Port::desired_on_when_offline)
    }
}

/// Convert the 1-based port number to the index of ports.
///
/// # Arguments
/// * `port_number` - 1-based port number.
///
/// # Returns
/// 0-based index or the address error.
fn port_index<T: DistributionDevice + ?Sized>(port_number: usize) -> BusResult<usize> {
    if (port_number == 0) || (port_number > T::PORT_COUNT) {
        return Err(BusError::address(
            match T::DEVICE_TYPE {
                DeviceType::Hub => "hub port",
                DeviceType::Box => "box port",
            },
            port_number,
        ));
    }

    Ok(port_number - 1)
}

/// Collect a snapshot over all ports in the order of the port number.
fn collect_ports<T, V, F>(device: &T, field: F) -> Vec<V>
where
    T: DistributionDevice + ?Sized,
    F: Fn(&Port) -> V,
{
    device.device_state().ports.iter().map(field).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const NUM_TEST_PORT: usize = 3;

    struct DeviceTest {
        state: DeviceState,
    }

    impl DistributionDevice for DeviceTest {
        const PORT_COUNT: usize = NUM_TEST_PORT;
        const DEVICE_TYPE: DeviceType = DeviceType::Box;

        type Telemetry = ();

        fn device_state(&self) -> &DeviceState {
            &self.state
        }

        fn device_state_mut(&mut self) -> &mut DeviceState {
            &mut self.state
        }

        fn telemetry(&self) -> Self::Telemetry {}
    }

    fn create_device() -> DeviceTest {
        DeviceTest {
            state: DeviceState::new(NUM_TEST_PORT),
        }
    }

    #[test]
    fn test_configure() {
        let mut device = create_device();

        assert!(device.configure(&[true, false, true]).is_ok());
        assert_eq!(device.ports_connected(), vec![true, false, true]);

        // Wrong length keeps the previous configuration.
        assert!(matches!(
            device.configure(&[false, false]),
            Err(BusError::Configuration(_))
        ));
        assert_eq!(device.ports_connected(), vec![true, false, true]);
    }

    #[test]
    fn test_port_address() {
        let mut device = create_device();

        assert!(device.port(1).is_ok());
        assert!(device.port(NUM_TEST_PORT).is_ok());

        assert_eq!(
            device.port(0).unwrap_err(),
            BusError::address("box port", 0)
        );
        assert_eq!(
            device.turn_port_on(NUM_TEST_PORT + 1, true).unwrap_err(),
            BusError::address("box port", NUM_TEST_PORT + 1)
        );
    }

    #[test]
    fn test_port_passthrough() {
        let mut device = create_device();
        device.configure(&[true, true, false]).unwrap();

        assert_eq!(device.turn_port_on(1, true).unwrap(), CommandResult::Applied);
        assert_eq!(device.turn_port_on(3, true).unwrap(), CommandResult::Refused);
        assert!(device.port_power_sensed(1).unwrap());

        assert_eq!(
            device.simulate_port_forcing(2, Forcing::On).unwrap(),
            CommandResult::Applied
        );
        assert_eq!(device.port_forcing(2).unwrap(), Forcing::On);

        assert_eq!(
            device.simulate_port_breaker_trip(1).unwrap(),
            CommandResult::Applied
        );
        assert!(device.is_port_breaker_tripped(1).unwrap());
        assert!(!device.port_power_sensed(1).unwrap());

        assert_eq!(device.reset_port_breaker(1).unwrap(), CommandResult::Applied);
        assert_eq!(device.turn_port_off(1).unwrap(), CommandResult::Applied);

        assert_eq!(device.ports_power_sensed(), vec![false, true, false]);
        assert_eq!(
            device.ports_forcing(),
            vec![Forcing::Unforced, Forcing::On, Forcing::Unforced]
        );
        assert_eq!(device.ports_breaker_tripped(), vec![false; NUM_TEST_PORT]);
    }

    #[test]
    fn test_any_port_desired_on() {
        let mut device = create_device();
        device.configure(&[true; NUM_TEST_PORT]).unwrap();

        assert!(!device.any_port_desired_on());

        device.turn_port_on(2, false).unwrap();

        assert!(device.any_port_desired_on());
        assert_eq!(
            device.ports_desired_on_when_online(),
            vec![false, true, false]
        );
        assert_eq!(device.ports_desired_on_when_offline(), vec![false; 3]);
    }

    #[test]
    fn test_service_led() {
        let mut device = create_device();

        assert!(!device.service_led_on());

        device.set_service_led_on(true);
        assert!(device.service_led_on());
    }

    #[test]
    fn test_initialize() {
        let mut device = create_device();

        assert_eq!(device.status(), DeviceStatus::Uninitialised);

        assert_eq!(device.initialize(), CommandResult::Applied);
        assert_eq!(device.status(), DeviceStatus::Ok);

        assert_eq!(device.initialize(), CommandResult::NoOp);
    }
}
