use std::fmt;
use std::path::PathBuf;

use crate::graph::ASN;

/// The commercial relationship a neighbour holds with respect to a node.
///
/// Named from the node's point of view: `ProviderToCustomer` means the
/// neighbour *is* our customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relationship {
    CustomerToProvider,
    PeerToPeer,
    ProviderToCustomer,
}

impl Relationship {
    /// The relationship the peer on the other end of the edge observes.
    pub fn invert(&self) -> Self {
        match self {
            Relationship::CustomerToProvider => Relationship::ProviderToCustomer,
            Relationship::ProviderToCustomer => Relationship::CustomerToProvider,
            Relationship::PeerToPeer => Relationship::PeerToPeer,
        }
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Relationship::CustomerToProvider => "C2P",
            Relationship::PeerToPeer => "P2P",
            Relationship::ProviderToCustomer => "P2C",
        };
        write!(f, "{}", s)
    }
}

/// Where a detector's route collector is operated, inferred from the
/// collector name in the peer list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectorSource {
    RipeRis,
    Pch,
    RouteViews,
}

#[derive(thiserror::Error, Debug)]
pub enum BgpSimError {
    #[error("malformed input at {path}:{line}: {reason}")]
    InputFormat {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unknown ASN {0}")]
    UnknownAsn(ASN),
}
