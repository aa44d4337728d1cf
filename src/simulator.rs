//! The propagation driver: seeds one ASN's announcement and drives it
//! breadth-first across the graph until the queue drains or a detector
//! accepts it.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::graph::{Graph, ASN};
use crate::node::RibEntry;
use crate::shared::BgpSimError;

/// Drives one graph through zero or more propagation runs.
///
/// Holds the graph, the current traffic-principle/hijack-mode settings, and
/// the touched-ASN set accumulated across calls to [`Simulator::simulate`].
pub struct Simulator {
    graph: Graph,
    valley_free: bool,
    hijack_mode: bool,
    touched: HashSet<ASN>,
    detector_hit: Option<ASN>,
}

impl Simulator {
    pub fn new(graph: Graph) -> Self {
        Simulator {
            graph,
            valley_free: false,
            hijack_mode: false,
            touched: HashSet::new(),
            detector_hit: None,
        }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Broadcast the traffic principle to every node in the graph.
    pub fn set_valley_free(&mut self, use_valley_free: bool) {
        self.valley_free = use_valley_free;
        for node in self.graph.iter_mut() {
            node.set_traffic_principle(use_valley_free);
        }
    }

    /// Broadcast a RIB checkpoint (`true`) or restore (`false`) to every
    /// node and record the simulator's own mode for `reset` to consult.
    pub fn set_to_hijack(&mut self, continue_with_hijack: bool) {
        self.hijack_mode = continue_with_hijack;
        for node in self.graph.iter_mut() {
            node.set_rib(continue_with_hijack);
        }
    }

    pub fn is_hijack_mode(&self) -> bool {
        self.hijack_mode
    }

    /// Seed `source_asn`'s announcement and propagate to completion.
    ///
    /// Returns [`BgpSimError::UnknownAsn`] if `source_asn` is not in the
    /// graph. Otherwise total: per-message rejections are silent.
    pub fn simulate(&mut self, source_asn: ASN) -> Result<(), BgpSimError> {
        if !self.graph.contains(&source_asn) {
            return Err(BgpSimError::UnknownAsn(source_asn));
        }

        let mut queue: VecDeque<(ASN, Vec<ASN>)> = VecDeque::new();

        self.touched.insert(source_asn);
        let (path, recipients) = self.graph.get(&source_asn).unwrap().prepare_publish();
        for recipient in recipients {
            queue.push_back((recipient, path.clone()));
        }

        while let Some((receiver_asn, path)) = queue.pop_front() {
            let Some(receiver) = self.graph.get_mut(&receiver_asn) else {
                continue;
            };

            self.touched.insert(receiver_asn);
            let accepted = receiver.update_selected_path(&path);
            log::trace!(
                "AS{receiver_asn}: dequeued {path:?}, accepted={accepted}"
            );

            if accepted {
                let (new_path, recipients) = receiver.prepare_publish();
                for recipient in recipients {
                    queue.push_back((recipient, new_path.clone()));
                }
            }

            if self.graph.get(&receiver_asn).unwrap().is_detector {
                log::debug!("detector hit at AS{receiver_asn}");
                self.detector_hit = Some(receiver_asn);
                break;
            }
        }

        Ok(())
    }

    /// Return the graph to a runnable state: restore touched nodes from
    /// backup in hijack mode, otherwise fully reset them. Clears the
    /// detector hit, the touched set, and (implicitly) the queue.
    pub fn reset(&mut self) {
        let hijack_mode = self.hijack_mode;
        for asn in self.touched.drain() {
            if let Some(node) = self.graph.get_mut(&asn) {
                if hijack_mode {
                    node.reset_from_backup();
                } else {
                    node.reset();
                }
            }
        }
        self.detector_hit = None;
    }

    pub fn is_caught(&self) -> bool {
        self.detector_hit.is_some()
    }

    pub fn detector_asn(&self) -> Option<ASN> {
        self.detector_hit
    }

    pub fn used_nodes(&self) -> HashSet<ASN> {
        self.touched.clone()
    }

    pub fn selected_paths(&self) -> HashMap<ASN, Vec<ASN>> {
        self.touched
            .iter()
            .filter_map(|asn| {
                self.graph
                    .get(asn)
                    .and_then(|n| n.selected_path().map(|p| (*asn, p.to_vec())))
            })
            .collect()
    }

    pub fn alternative_paths(&self) -> HashMap<ASN, Vec<RibEntry>> {
        self.touched
            .iter()
            .filter_map(|asn| {
                self.graph
                    .get(asn)
                    .map(|n| (*asn, n.alternative_paths().into_iter().cloned().collect()))
            })
            .collect()
    }
}
