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

pub const NUM_HUB_PORT: usize = 28;
pub const NUM_BOX_PORT: usize = 12;

// Declared id ranges of the bus.
pub const NUM_BOX: usize = 24;
pub const NUM_LEAF: usize = 256;

pub const FILE_PARAMETERS_APP: &str = "config/parameters_app.yaml";
pub const FILE_TOPOLOGY: &str = "config/topology.yaml";

pub const TERMINATOR: &[u8; 2] = b"\r\n";
