use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::graph::ASN;
use crate::shared::BgpSimError;

/// The three relationship lists CAIDA distinguishes for one ASN. The format
/// reserves a fourth slot per-node that the core never assigns meaning to.
/// There is nothing to carry, so it is simply absent here.
#[derive(Debug, Clone, Default)]
pub struct RawNeighbours {
    pub c2p: Vec<ASN>,
    pub p2p: Vec<ASN>,
    pub p2c: Vec<ASN>,
}

/// Parse the CAIDA `asn_a|asn_b|code|source` relationships file.
///
/// `code = 0` is Peer-to-Peer; `code = -1` makes `asn_a` the provider of
/// `asn_b`. Any other code is accepted (both ASNs are still registered so
/// they appear in the graph) but contributes no relationship, matching the
/// source reader. Comment lines (`#`) are skipped.
pub fn parse_relationships(path: &Path) -> Result<HashMap<ASN, RawNeighbours>, BgpSimError> {
    let contents = fs::read_to_string(path).map_err(|source| BgpSimError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut relationships: HashMap<ASN, RawNeighbours> = HashMap::new();

    for (line_no, line) in contents.lines().enumerate() {
        if line.contains('#') {
            continue;
        }
        if line.trim().is_empty() {
            continue;
        }

        parse_line(path, line_no + 1, line, &mut relationships)?;
    }

    log::debug!(
        "parsed {} ASNs from relationships file {:?}",
        relationships.len(),
        path
    );

    Ok(relationships)
}

fn parse_line(
    path: &Path,
    line_no: usize,
    line: &str,
    relationships: &mut HashMap<ASN, RawNeighbours>,
) -> Result<(), BgpSimError> {
    let fmt_err = |reason: &str| BgpSimError::InputFormat {
        path: path.to_path_buf(),
        line: line_no,
        reason: reason.to_string(),
    };

    let fields: Vec<&str> = line.split('|').collect();
    if fields.len() != 4 {
        return Err(fmt_err("expected exactly 4 `|`-separated fields"));
    }

    let is_digits = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());
    if !is_digits(fields[0]) {
        return Err(fmt_err("first field (asn_a) is not numeric"));
    }
    if !is_digits(fields[1]) {
        return Err(fmt_err("second field (asn_b) is not numeric"));
    }
    if !is_digits(fields[2].trim_start_matches('-')) {
        return Err(fmt_err("third field (code) is not numeric"));
    }

    let asn_a: ASN = fields[0].parse().map_err(|_| fmt_err("asn_a overflow"))?;
    let asn_b: ASN = fields[1].parse().map_err(|_| fmt_err("asn_b overflow"))?;
    let code: i64 = fields[2].parse().map_err(|_| fmt_err("code overflow"))?;

    relationships.entry(asn_a).or_default();
    relationships.entry(asn_b).or_default();

    match code {
        0 => {
            relationships.get_mut(&asn_a).unwrap().p2p.push(asn_b);
            relationships.get_mut(&asn_b).unwrap().p2p.push(asn_a);
        }
        -1 => {
            relationships.get_mut(&asn_a).unwrap().p2c.push(asn_b);
            relationships.get_mut(&asn_b).unwrap().c2p.push(asn_a);
        }
        _ => {
            log::warn!(
                "{:?}:{}: unrecognised relationship code {} between AS{} and AS{}, ignoring",
                path,
                line_no,
                code,
                asn_a,
                asn_b
            );
        }
    }

    Ok(())
}
