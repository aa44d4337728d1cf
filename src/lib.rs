pub mod graph;
pub mod loader;
pub mod node;
pub mod shared;
pub mod simulator;

pub use graph::{Graph, ASN};
pub use loader::build as build_graph;
pub use node::{ExportGroups, Neighbour, Node, RibEntry};
pub use shared::{BgpSimError, CollectorSource, Relationship};
pub use simulator::Simulator;