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

//! # Power Bus Simulator
//!
//! This library is the behavioral model of the power distribution bus of an
//! antenna station: one hub powers the distribution boxes and each box powers
//! its leaf devices.
pub mod application;
pub mod command;
pub mod constants;
pub mod enums;
pub mod errors;
pub mod mock;
pub mod power;
pub mod telemetry;
pub mod topology;
pub mod utility;
