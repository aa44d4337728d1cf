use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use crate::graph::ASN;
use crate::shared::{BgpSimError, CollectorSource};

/// Parse `collectors.txt`: one line per collector, `name | asn asn …`.
///
/// The collector source is inferred from the name: a `rrc` substring means
/// RIPE RIS, `pch.net` means PCH, otherwise RouteViews.
pub fn parse_collectors(path: &Path) -> Result<HashMap<ASN, CollectorSource>, BgpSimError> {
    let contents = fs::read_to_string(path).map_err(|source| BgpSimError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut detectors = HashMap::new();

    for line in contents.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let Some((name, peers)) = line.split_once('|') else {
            continue;
        };
        let name = name.trim();
        let source = classify(name);

        for peer in peers.trim().split_whitespace() {
            if let Ok(asn) = peer.parse::<ASN>() {
                detectors.insert(asn, source);
            }
        }
    }

    log::debug!(
        "parsed {} detector ASNs from collector list {:?}",
        detectors.len(),
        path
    );

    Ok(detectors)
}

fn classify(collector_name: &str) -> CollectorSource {
    if collector_name.contains("rrc") {
        CollectorSource::RipeRis
    } else if collector_name.contains("pch.net") {
        CollectorSource::Pch
    } else {
        CollectorSource::RouteViews
    }
}

/// Every ASN in the union of all collectors' peer lists, ignoring source.
pub fn all_detector_asns(detectors: &HashMap<ASN, CollectorSource>) -> HashSet<ASN> {
    detectors.keys().copied().collect()
}
