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

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::ffi::OsStr;
use std::fs;
use std::path::Path;

use crate::constants::{NUM_BOX_PORT, NUM_HUB_PORT, NUM_LEAF};
use crate::errors::{BusError, BusResult};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct BoxEntry {
    // 1-based box id.
    pub box_id: usize,
    // 1-based hub port that powers the box.
    pub hub_port: usize,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LeafEntry {
    // 1-based leaf id.
    pub leaf_id: usize,
    // 1-based box id that owns the leaf.
    pub box_id: usize,
    // 1-based box port that powers the leaf.
    pub box_port: usize,
}

/// Declarative topology document.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct TopologyDocument {
    #[serde(default)]
    pub boxes: Vec<BoxEntry>,
    #[serde(default)]
    pub leaves: Vec<LeafEntry>,
}

impl TopologyDocument {
    /// Parse the YAML document. Ids must be plain integers, and unknown keys
    /// are rejected.
    ///
    /// # Arguments
    /// * `source` - YAML text.
    ///
    /// # Returns
    /// Document or the configuration error.
    pub fn parse(source: &str) -> BusResult<Self> {
        // Empty document has no box and no leaf.
        if source.trim().is_empty() {
            return Ok(Self::default());
        }

        Ok(serde_yaml::from_str(source)?)
    }

    /// Read the document from the file. The JSON file is picked by the
    /// extension, and anything else is read as YAML.
    ///
    /// # Arguments
    /// * `filepath` - Path to the topology file.
    ///
    /// # Returns
    /// Document or the configuration error.
    pub fn read_file(filepath: &Path) -> BusResult<Self> {
        let source = fs::read_to_string(filepath).map_err(|error| {
            BusError::configuration(format!(
                "failed to read the topology file {}: {error}",
                filepath.display()
            ))
        })?;

        match filepath.extension().and_then(OsStr::to_str) {
            Some("json") => Ok(serde_json::from_str(&source)?),
            _ => Self::parse(&source),
        }
    }
}

/// Validated address maps of the bus.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Topology {
    // Box id to hub port.
    pub box_hub_port: BTreeMap<usize, usize>,
    // Leaf id to (box id, box port).
    pub leaf_address: BTreeMap<usize, (usize, usize)>,
}

impl Topology {
    /// Validate the document and build the address maps.
    ///
    /// # Arguments
    /// * `document` - Topology document.
    /// * `number_of_boxes` - Number of boxes on the bus.
    ///
    /// # Returns
    /// Topology or the configuration error.
    pub fn from_document(document: &TopologyDocument, number_of_boxes: usize) -> BusResult<Self> {
        let mut topology = Self::default();

        let mut used_hub_ports = HashSet::new();
        for entry in &document.boxes {
            check_range("box id", entry.box_id, number_of_boxes)?;
            check_range("hub port", entry.hub_port, NUM_HUB_PORT)?;

            if !used_hub_ports.insert(entry.hub_port) {
                return Err(BusError::configuration(format!(
                    "hub port {} is assigned to more than one box",
                    entry.hub_port
                )));
            }

            if topology
                .box_hub_port
                .insert(entry.box_id, entry.hub_port)
                .is_some()
            {
                return Err(BusError::configuration(format!(
                    "box {} is declared more than once",
                    entry.box_id
                )));
            }
        }

        let mut used_box_ports = HashSet::new();
        for entry in &document.leaves {
            check_range("leaf id", entry.leaf_id, NUM_LEAF)?;
            check_range("box port", entry.box_port, NUM_BOX_PORT)?;

            if !topology.box_hub_port.contains_key(&entry.box_id) {
                return Err(BusError::configuration(format!(
                    "leaf {} refers to the undeclared box {}",
                    entry.leaf_id, entry.box_id
                )));
            }

            let address = (entry.box_id, entry.box_port);
            if !used_box_ports.insert(address) {
                return Err(BusError::configuration(format!(
                    "port {} of box {} is assigned to more than one leaf",
                    entry.box_port, entry.box_id
                )));
            }

            if topology
                .leaf_address
                .insert(entry.leaf_id, address)
                .is_some()
            {
                return Err(BusError::configuration(format!(
                    "leaf {} is declared more than once",
                    entry.leaf_id
                )));
            }
        }

        Ok(topology)
    }

    /// Get the connectivity of the hub ports. A hub port is connected if a
    /// box is plugged in.
    ///
    /// # Returns
    /// Connectivity in the order of the hub port number.
    pub fn hub_ports_connected(&self) -> Vec<bool> {
        let mut connected = vec![false; NUM_HUB_PORT];
        self.box_hub_port
            .values()
            .for_each(|hub_port| connected[hub_port - 1] = true);

        connected
    }

    /// Get the connectivity of the box ports. A box port is connected if a
    /// leaf is plugged in.
    ///
    /// # Arguments
    /// * `box_id` - 1-based box id.
    ///
    /// # Returns
    /// Connectivity in the order of the box port number.
    pub fn box_ports_connected(&self, box_id: usize) -> Vec<bool> {
        let mut connected = vec![false; NUM_BOX_PORT];
        self.leaf_address
            .values()
            .filter(|(owner, _)| *owner == box_id)
            .for_each(|(_, box_port)| connected[box_port - 1] = true);

        connected
    }
}

/// Check the 1-based id is in the range of [1, maximum].
fn check_range(name: &str, id: usize, maximum: usize) -> BusResult<()> {
    if (id == 0) || (id > maximum) {
        return Err(BusError::configuration(format!(
            "{name} {id} is outside the range of 1..={maximum}"
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Write;
    use tempfile::Builder;

    use crate::constants::{FILE_TOPOLOGY, NUM_BOX};

    const SOURCE: &str = "
boxes:
  - box_id: 1
    hub_port: 3
  - box_id: 2
    hub_port: 1
leaves:
  - leaf_id: 1
    box_id: 1
    box_port: 1
  - leaf_id: 2
    box_id: 1
    box_port: 12
  - leaf_id: 5
    box_id: 2
    box_port: 4
";

    fn create_topology(source: &str) -> BusResult<Topology> {
        Topology::from_document(&TopologyDocument::parse(source)?, NUM_BOX)
    }

    #[test]
    fn test_parse() {
        let document = TopologyDocument::parse(SOURCE).unwrap();

        assert_eq!(document.boxes.len(), 2);
        assert_eq!(
            document.leaves[2],
            LeafEntry {
                leaf_id: 5,
                box_id: 2,
                box_port: 4
            }
        );

        assert_eq!(
            TopologyDocument::parse("").unwrap(),
            TopologyDocument::default()
        );
    }

    #[test]
    fn test_parse_malformed() {
        assert!(matches!(
            TopologyDocument::parse("boxes: [1, 2"),
            Err(BusError::Configuration(_))
        ));
        assert!(matches!(
            TopologyDocument::parse("boxes:\n  - box_id: x\n    hub_port: 1\n"),
            Err(BusError::Configuration(_))
        ));
        assert!(matches!(
            TopologyDocument::parse("boxes:\n  - box_id: 1\n"),
            Err(BusError::Configuration(_))
        ));
    }

    #[test]
    fn test_parse_non_integer_id() {
        let sources = [
            "boxes:\n  - box_id: 1.6\n    hub_port: 1\n",
            "boxes:\n  - box_id: true\n    hub_port: 1\n",
            "boxes:\n  - box_id: \"1\"\n    hub_port: 1\n",
            "boxes:\n  - box_id: -1\n    hub_port: 1\n",
            "boxes:\n  - box_id: 1\n    hub_port: 1\nleaves:\n  - leaf_id: 2.0\n    box_id: 1\n    box_port: 1\n",
        ];

        for source in sources {
            assert!(
                matches!(
                    TopologyDocument::parse(source),
                    Err(BusError::Configuration(_))
                ),
                "{source}"
            );
        }
    }

    #[test]
    fn test_parse_unknown_key() {
        let sources = [
            "boxes:\n  - box_id: 1\n    hub_port: 1\n    extra: 5\n",
            "boxes:\n  - box_id: 1\n    hub_port: 1\nleaves:\n  - leaf_id: 1\n    box_id: 1\n    box_port: 1\n    port: 2\n",
            "leafs: []\n",
        ];

        for source in sources {
            assert!(
                matches!(
                    TopologyDocument::parse(source),
                    Err(BusError::Configuration(_))
                ),
                "{source}"
            );
        }
    }

    #[test]
    fn test_read_file() {
        let document = TopologyDocument::read_file(Path::new(FILE_TOPOLOGY)).unwrap();

        assert_eq!(document.boxes.len(), NUM_BOX);
        assert_eq!(document.leaves.len(), NUM_LEAF);

        assert!(TopologyDocument::read_file(Path::new("config/no_such_file.yaml")).is_err());
    }

    #[test]
    fn test_read_file_json() {
        let mut file = Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"{{"boxes": [{{"box_id": 2, "hub_port": 7}}], "leaves": []}}"#
        )
        .unwrap();

        let document = TopologyDocument::read_file(file.path()).unwrap();

        assert_eq!(
            document.boxes,
            vec![BoxEntry {
                box_id: 2,
                hub_port: 7
            }]
        );
        assert!(document.leaves.is_empty());
    }

    #[test]
    fn test_read_file_json_non_integer_id() {
        let mut file = Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"boxes": [{{"box_id": "2", "hub_port": 7}}]}}"#).unwrap();

        assert!(matches!(
            TopologyDocument::read_file(file.path()),
            Err(BusError::Configuration(_))
        ));
    }

    #[test]
    fn test_from_document() {
        let topology = create_topology(SOURCE).unwrap();

        assert_eq!(topology.box_hub_port[&1], 3);
        assert_eq!(topology.box_hub_port[&2], 1);
        assert_eq!(topology.leaf_address[&2], (1, 12));
        assert_eq!(topology.leaf_address[&5], (2, 4));
        assert!(!topology.leaf_address.contains_key(&3));
    }

    #[test]
    fn test_from_document_out_of_range() {
        let sources = [
            "boxes:\n  - box_id: 0\n    hub_port: 1\n",
            "boxes:\n  - box_id: 25\n    hub_port: 1\n",
            "boxes:\n  - box_id: 1\n    hub_port: 29\n",
            "boxes:\n  - box_id: 1\n    hub_port: 1\nleaves:\n  - leaf_id: 257\n    box_id: 1\n    box_port: 1\n",
            "boxes:\n  - box_id: 1\n    hub_port: 1\nleaves:\n  - leaf_id: 1\n    box_id: 1\n    box_port: 13\n",
        ];

        for source in sources {
            assert!(
                matches!(create_topology(source), Err(BusError::Configuration(_))),
                "{source}"
            );
        }
    }

    #[test]
    fn test_from_document_conflict() {
        let sources = [
            // Duplicated box
            "boxes:\n  - box_id: 1\n    hub_port: 1\n  - box_id: 1\n    hub_port: 2\n",
            // Shared hub port
            "boxes:\n  - box_id: 1\n    hub_port: 1\n  - box_id: 2\n    hub_port: 1\n",
            // Undeclared box
            "boxes:\n  - box_id: 1\n    hub_port: 1\nleaves:\n  - leaf_id: 1\n    box_id: 2\n    box_port: 1\n",
            // Shared box port
            "boxes:\n  - box_id: 1\n    hub_port: 1\nleaves:\n  - leaf_id: 1\n    box_id: 1\n    box_port: 1\n  - leaf_id: 2\n    box_id: 1\n    box_port: 1\n",
            // Duplicated leaf
            "boxes:\n  - box_id: 1\n    hub_port: 1\nleaves:\n  - leaf_id: 1\n    box_id: 1\n    box_port: 1\n  - leaf_id: 1\n    box_id: 1\n    box_port: 2\n",
        ];

        for source in sources {
            assert!(
                matches!(create_topology(source), Err(BusError::Configuration(_))),
                "{source}"
            );
        }
    }

    #[test]
    fn test_ports_connected() {
        let topology = create_topology(SOURCE).unwrap();

        let hub_ports = topology.hub_ports_connected();
        assert_eq!(hub_ports.len(), NUM_HUB_PORT);
        assert!(hub_ports[0]);
        assert!(!hub_ports[1]);
        assert!(hub_ports[2]);
        assert_eq!(hub_ports.iter().filter(|connected| **connected).count(), 2);

        let box_ports = topology.box_ports_connected(1);
        assert_eq!(box_ports.len(), NUM_BOX_PORT);
        assert!(box_ports[0]);
        assert!(box_ports[11]);
        assert_eq!(box_ports.iter().filter(|connected| **connected).count(), 2);

        assert_eq!(topology.box_ports_connected(3), vec![false; NUM_BOX_PORT]);
    }
}
