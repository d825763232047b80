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

use thiserror::Error;

/// Error of the bus operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BusError {
    /// Malformed topology or a connectivity vector of the wrong length.
    #[error("configuration error: {0}")]
    Configuration(String),
    /// Port or device id outside the declared range.
    #[error("address error: {target} {id} is not addressable")]
    Address { target: &'static str, id: usize },
}

impl BusError {
    /// Create the configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        BusError::Configuration(message.into())
    }

    /// Create the address error.
    pub fn address(target: &'static str, id: usize) -> Self {
        BusError::Address { target, id }
    }
}

impl From<config::ConfigError> for BusError {
    fn from(error: config::ConfigError) -> Self {
        BusError::Configuration(error.to_string())
    }
}

impl From<serde_yaml::Error> for BusError {
    fn from(error: serde_yaml::Error) -> Self {
        BusError::Configuration(error.to_string())
    }
}

impl From<serde_json::Error> for BusError {
    fn from(error: serde_json::Error) -> Self {
        BusError::Configuration(error.to_string())
    }
}

pub type BusResult<T> = Result<T, BusError>;
