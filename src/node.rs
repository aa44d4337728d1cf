use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use crate::graph::ASN;
use crate::shared::Relationship;

/// A neighbour's commercial relationship and tie-break preference.
#[derive(Debug, Clone, Copy)]
pub struct Neighbour {
    pub relationship: Relationship,
    pub local_pref: u32,
}

/// The two outbound recipient groups derived from `neighbours`.
#[derive(Debug, Clone)]
pub struct ExportGroups {
    pub all: HashSet<ASN>,
    pub customers: HashSet<ASN>,
}

impl ExportGroups {
    fn from_neighbours(neighbours: &HashMap<ASN, Neighbour>) -> Self {
        let all = neighbours.keys().copied().collect();
        let customers = neighbours
            .iter()
            .filter(|(_, n)| n.relationship == Relationship::ProviderToCustomer)
            .map(|(&asn, _)| asn)
            .collect();
        ExportGroups { all, customers }
    }
}

/// One alternative route, as held in `adj_rib_in` or installed as `loc_rib`.
///
/// Path is oldest-first (origin first, most recent hop last); `source_asn`
/// is always `path.last()`.
#[derive(Debug, Clone)]
pub struct RibEntry {
    pub local_pref: u32,
    pub path_len: u32,
    pub source_asn: ASN,
    pub path: Vec<ASN>,
}

impl RibEntry {
    fn new(path: Vec<ASN>, local_pref: u32) -> Self {
        let source_asn = *path.last().expect("path must have at least one hop");
        RibEntry {
            local_pref,
            path_len: path.len() as u32,
            source_asn,
            path,
        }
    }
}

// Ordering makes `BinaryHeap::pop` return the best route: highest
// local_pref, then shortest path, then lowest source ASN.
impl Ord for RibEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.local_pref
            .cmp(&other.local_pref)
            .then_with(|| other.path_len.cmp(&self.path_len))
            .then_with(|| other.source_asn.cmp(&self.source_asn))
    }
}

impl PartialOrd for RibEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for RibEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for RibEntry {}

/// One AS in the graph: its neighbour table, RIBs, and export policy.
#[derive(Debug, Clone)]
pub struct Node {
    pub asn: ASN,
    pub neighbours: HashMap<ASN, Neighbour>,
    pub export_policy: Option<HashMap<ASN, HashSet<ASN>>>,
    /// Reserved for per-neighbour inbound filtering; the core never reads it.
    pub import_policy: Option<()>,
    pub is_detector: bool,
    pub uses_valley_free: bool,
    pub export_groups: ExportGroups,

    adj_rib_in: BinaryHeap<RibEntry>,
    loc_rib: Option<RibEntry>,
    adj_rib_in_backup: Option<Vec<RibEntry>>,
    loc_rib_backup: Option<RibEntry>,
}

impl Node {
    pub fn new(asn: ASN, neighbours: HashMap<ASN, Neighbour>) -> Self {
        let export_groups = ExportGroups::from_neighbours(&neighbours);
        Node {
            asn,
            neighbours,
            export_policy: None,
            import_policy: None,
            is_detector: false,
            uses_valley_free: false,
            export_groups,
            adj_rib_in: BinaryHeap::new(),
            loc_rib: None,
            adj_rib_in_backup: None,
            loc_rib_backup: None,
        }
    }

    pub fn with_export_policy(mut self, export_policy: HashMap<ASN, HashSet<ASN>>) -> Self {
        self.export_policy = Some(export_policy);
        self
    }

    /// Receive an announcement. Returns `false` if it is rejected as a loop
    /// or as originating from a non-neighbour, `true` if it was installed
    /// (first route, or a new best route).
    pub fn update_selected_path(&mut self, path: &[ASN]) -> bool {
        if path.contains(&self.asn) {
            log::trace!("AS{}: rejecting looped path {:?}", self.asn, path);
            return false;
        }

        let source_asn = *path.last().expect("announcement path is never empty");

        let local_pref = match self.neighbours.get(&source_asn) {
            Some(n) => n.local_pref,
            None => {
                log::trace!(
                    "AS{}: rejecting path from non-neighbour AS{}",
                    self.asn,
                    source_asn
                );
                return false;
            }
        };

        if self.loc_rib.is_none() {
            self.loc_rib = Some(RibEntry::new(path.to_vec(), local_pref));
            return true;
        }

        self.remove_old_path(source_asn);

        let current = self.loc_rib.as_ref().unwrap();
        if current.source_asn != source_asn {
            let displaced = self.loc_rib.take().unwrap();
            self.adj_rib_in.push(displaced);
        }

        self.adj_rib_in.push(RibEntry::new(path.to_vec(), local_pref));
        self.loc_rib = self.adj_rib_in.pop();
        true
    }

    /// A neighbour may hold at most one outstanding route in our Adj-RIB-In.
    fn remove_old_path(&mut self, source_asn: ASN) {
        if !self.adj_rib_in.iter().any(|e| e.source_asn == source_asn) {
            return;
        }
        let kept: Vec<RibEntry> = self
            .adj_rib_in
            .drain()
            .filter(|e| e.source_asn != source_asn)
            .collect();
        self.adj_rib_in = BinaryHeap::from(kept);
    }

    /// The announcement this node sends outbound, and who receives it.
    pub fn prepare_publish(&self) -> (Vec<ASN>, HashSet<ASN>) {
        let Some(loc_rib) = &self.loc_rib else {
            return (vec![self.asn], self.export_groups.all.clone());
        };

        let mut path = loc_rib.path.clone();
        path.push(self.asn);

        if let Some(policy) = &self.export_policy {
            if let Some(recipients) = policy.get(&loc_rib.source_asn) {
                return (path, recipients.clone());
            }
        }

        if !self.uses_valley_free {
            return (path, self.export_groups.all.clone());
        }

        let learned_from_customer = self
            .neighbours
            .get(&loc_rib.source_asn)
            .map(|n| n.relationship == Relationship::ProviderToCustomer)
            .unwrap_or(false);

        if learned_from_customer {
            (path, self.export_groups.all.clone())
        } else {
            (path, self.export_groups.customers.clone())
        }
    }

    /// Checkpoint (`continue_with_hijack = true`) or restore the RIB.
    ///
    /// The checkpoint keeps only a prefix of `adj_rib_in` in whatever order
    /// the heap's backing storage currently holds it (not best-N, not
    /// insertion time). This bounds backup size on dense nodes.
    pub fn set_rib(&mut self, continue_with_hijack: bool) {
        if continue_with_hijack {
            self.adj_rib_in_backup =
                Some(self.adj_rib_in.iter().take(10).cloned().collect());
            self.loc_rib_backup = self.loc_rib.clone();
        } else {
            self.adj_rib_in = BinaryHeap::from(self.adj_rib_in_backup.take().unwrap_or_default());
            self.loc_rib = self.loc_rib_backup.take();
        }
    }

    /// Restore live RIBs from the backup copies without clearing the backup.
    pub fn reset_from_backup(&mut self) {
        self.adj_rib_in = BinaryHeap::from(self.adj_rib_in_backup.clone().unwrap_or_default());
        self.loc_rib = self.loc_rib_backup.clone();
    }

    pub fn reset(&mut self) {
        self.adj_rib_in = BinaryHeap::new();
        self.adj_rib_in_backup = None;
        self.loc_rib = None;
        self.loc_rib_backup = None;
    }

    pub fn set_traffic_principle(&mut self, use_valley_free: bool) {
        self.uses_valley_free = use_valley_free;
    }

    pub fn set_detector(&mut self, is_detector: bool) {
        self.is_detector = is_detector;
    }

    pub fn selected_path(&self) -> Option<&[ASN]> {
        self.loc_rib.as_ref().map(|e| e.path.as_slice())
    }

    pub fn selected_local_pref(&self) -> Option<u32> {
        self.loc_rib.as_ref().map(|e| e.local_pref)
    }

    pub fn selected_path_len(&self) -> Option<u32> {
        self.loc_rib.as_ref().map(|e| e.path_len)
    }

    pub fn selected_source_asn(&self) -> Option<ASN> {
        self.loc_rib.as_ref().map(|e| e.source_asn)
    }

    pub fn alternative_paths(&self) -> Vec<&RibEntry> {
        self.adj_rib_in.iter().collect()
    }
}
