use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::graph::ASN;
use crate::shared::BgpSimError;

/// Parse every RIR delegated-ASN summary file in `dir` and return the set of
/// admitted ASNs.
///
/// A line is skipped if it contains `#` or `*`. Otherwise, if it has at
/// least 7 `|`-separated fields, field index 2 is `asn`, and field index 6
/// is `allocated` or `assigned`, the half-open range `[field3, field3 +
/// field4)` is admitted.
pub fn parse_delegated_dir(dir: &Path) -> Result<HashSet<ASN>, BgpSimError> {
    let mut allocated = HashSet::new();

    let entries = fs::read_dir(dir).map_err(|source| BgpSimError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    for entry in entries {
        let entry = entry.map_err(|source| BgpSimError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let contents = fs::read_to_string(&path).map_err(|source| BgpSimError::Io {
            path: path.clone(),
            source,
        })?;

        let before = allocated.len();
        for line in contents.lines() {
            parse_line(line, &mut allocated);
        }
        log::debug!(
            "admitted {} ASNs from delegated file {:?}",
            allocated.len() - before,
            path
        );
    }

    Ok(allocated)
}

fn parse_line(line: &str, allocated: &mut HashSet<ASN>) {
    if line.contains('#') || line.contains('*') {
        return;
    }

    let fields: Vec<&str> = line.split('|').collect();
    if fields.len() < 7 {
        return;
    }
    if fields[2] != "asn" {
        return;
    }
    if fields[6] != "allocated" && fields[6] != "assigned" {
        return;
    }

    let (Ok(start), Ok(count)) = (fields[3].parse::<ASN>(), fields[4].parse::<ASN>()) else {
        return;
    };

    allocated.extend(start..start + count);
}
