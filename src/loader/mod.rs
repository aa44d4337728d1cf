//! The graph loader: turns the three external data sources into a
//! [`Graph`] of immutable [`Node`] topology.

mod collectors;
mod delegated;
mod relationships;

use std::collections::HashMap;
use std::path::Path;

use crate::graph::{Graph, ASN};
use crate::node::{Neighbour, Node};
use crate::shared::{BgpSimError, Relationship};

pub use collectors::{all_detector_asns, parse_collectors};
pub use delegated::parse_delegated_dir;
pub use relationships::{parse_relationships, RawNeighbours};

/// Build the AS graph from the three pinned external inputs.
///
/// Nodes (and neighbour entries) whose ASN is not in the RIR delegated
/// summaries are dropped; surviving nodes are marked as detectors when
/// their ASN appears in the collector list.
pub fn build(
    relations_path: &Path,
    delegated_dir: &Path,
    collectors_path: &Path,
) -> Result<Graph, BgpSimError> {
    let raw = parse_relationships(relations_path)?;
    let allocated = parse_delegated_dir(delegated_dir)?;
    let detectors = parse_collectors(collectors_path)?;

    let mut graph = Graph::new();

    for (asn, neighbours) in raw {
        if !allocated.contains(&asn) {
            continue;
        }

        let mut table: HashMap<ASN, Neighbour> = HashMap::new();
        for neighbour_asn in neighbours.c2p {
            if allocated.contains(&neighbour_asn) {
                table.insert(
                    neighbour_asn,
                    Neighbour {
                        relationship: Relationship::CustomerToProvider,
                        local_pref: 0,
                    },
                );
            }
        }
        for neighbour_asn in neighbours.p2p {
            if allocated.contains(&neighbour_asn) {
                table.insert(
                    neighbour_asn,
                    Neighbour {
                        relationship: Relationship::PeerToPeer,
                        local_pref: 0,
                    },
                );
            }
        }
        for neighbour_asn in neighbours.p2c {
            if allocated.contains(&neighbour_asn) {
                table.insert(
                    neighbour_asn,
                    Neighbour {
                        relationship: Relationship::ProviderToCustomer,
                        local_pref: 0,
                    },
                );
            }
        }

        let mut node = Node::new(asn, table);
        node.set_detector(detectors.contains_key(&asn));
        graph.insert(node);
    }

    log::debug!(
        "graph loaded: {} ASNs ({} allocated, {} detectors)",
        graph.len(),
        allocated.len(),
        detectors.len()
    );

    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Write;

    struct Fixture {
        relations: std::path::PathBuf,
        delegated_dir: std::path::PathBuf,
        collectors: std::path::PathBuf,
    }

    impl Drop for Fixture {
        fn drop(&mut self) {
            fs::remove_file(&self.relations).ok();
            fs::remove_dir_all(&self.delegated_dir).ok();
            fs::remove_file(&self.collectors).ok();
        }
    }

    fn write(path: &Path, contents: &str) {
        let mut f = fs::File::create(path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
    }

    fn build_fixture(relations: &str, delegated: &str, collectors: &str) -> Fixture {
        let tag = format!("{}-{:?}", std::process::id(), std::thread::current().id());
        let relations_path = std::env::temp_dir().join(format!("hijacksim-rel-{tag}.txt"));
        let delegated_dir = std::env::temp_dir().join(format!("hijacksim-del-{tag}"));
        let collectors_path = std::env::temp_dir().join(format!("hijacksim-col-{tag}.txt"));

        write(&relations_path, relations);
        fs::create_dir_all(&delegated_dir).unwrap();
        write(&delegated_dir.join("delegated.txt"), delegated);
        write(&collectors_path, collectors);

        Fixture {
            relations: relations_path,
            delegated_dir,
            collectors: collectors_path,
        }
    }

    #[test]
    fn drops_non_allocated_asns_and_marks_detectors() {
        let fixture = build_fixture(
            "1|2|0|src\n2|3|-1|src\n3|4|0|src\n",
            "ripencc|FR|asn|1|3|20220101|allocated\n",
            "rrc00 | 2\n",
        );

        let graph = build(&fixture.relations, &fixture.delegated_dir, &fixture.collectors).unwrap();

        assert_eq!(graph.len(), 3);
        assert!(graph.get(&4).is_none());
        assert!(graph.get(&2).unwrap().neighbours.contains_key(&3));
        assert!(graph.get(&2).unwrap().neighbours.contains_key(&1));
        assert!(graph.get(&2).unwrap().is_detector);
        assert!(!graph.get(&1).unwrap().is_detector);
    }
}
