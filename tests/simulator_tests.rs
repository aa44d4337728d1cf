use std::collections::HashMap;

use hijacksim::{Graph, Neighbour, Node, Relationship, Simulator};

fn neighbour(relationship: Relationship, local_pref: u32) -> Neighbour {
    Neighbour {
        relationship,
        local_pref,
    }
}

#[test]
fn scenario_1_triangle_no_valley_free() {
    let _ = env_logger::try_init();

    let mut graph = Graph::new();
    graph.insert(Node::new(
        1,
        HashMap::from([
            (2, neighbour(Relationship::PeerToPeer, 0)),
            (3, neighbour(Relationship::PeerToPeer, 0)),
        ]),
    ));
    graph.insert(Node::new(
        2,
        HashMap::from([
            (1, neighbour(Relationship::PeerToPeer, 0)),
            (3, neighbour(Relationship::PeerToPeer, 0)),
        ]),
    ));
    graph.insert(Node::new(
        3,
        HashMap::from([
            (1, neighbour(Relationship::PeerToPeer, 0)),
            (2, neighbour(Relationship::PeerToPeer, 0)),
        ]),
    ));

    let mut sim = Simulator::new(graph);
    sim.simulate(1).unwrap();

    assert_eq!(sim.selected_paths()[&2], vec![1]);
    assert_eq!(sim.selected_paths()[&3], vec![1]);
    assert!(!sim.is_caught());
}

/// `1 --P2C--> 2 --P2C--> 3`: 1 is 2's provider, 2 is 3's provider.
fn linear_chain() -> Graph {
    let mut graph = Graph::new();
    graph.insert(Node::new(
        1,
        HashMap::from([(2, neighbour(Relationship::ProviderToCustomer, 0))]),
    ));
    graph.insert(Node::new(
        2,
        HashMap::from([
            (1, neighbour(Relationship::CustomerToProvider, 0)),
            (3, neighbour(Relationship::ProviderToCustomer, 0)),
        ]),
    ));
    graph.insert(Node::new(
        3,
        HashMap::from([(2, neighbour(Relationship::CustomerToProvider, 0))]),
    ));
    graph
}

#[test]
fn scenario_2_linear_chain() {
    let mut sim = Simulator::new(linear_chain());
    sim.simulate(1).unwrap();

    assert_eq!(sim.selected_paths()[&2], vec![1]);
    assert_eq!(sim.selected_paths()[&3], vec![1, 2]);
}

/// Scenario (2)'s chain plus `3 --P2P--> 4`.
fn chain_with_peer() -> Graph {
    let mut graph = linear_chain();
    graph.get_mut(&3).unwrap().neighbours.insert(4, neighbour(Relationship::PeerToPeer, 0));
    graph.get_mut(&3).unwrap().export_groups.all.insert(4);
    graph.insert(Node::new(
        4,
        HashMap::from([(3, neighbour(Relationship::PeerToPeer, 0))]),
    ));
    graph
}

#[test]
fn scenario_3_valley_free_suppresses_peer_export() {
    let mut sim = Simulator::new(chain_with_peer());
    sim.set_valley_free(true);
    sim.simulate(1).unwrap();

    assert!(!sim.used_nodes().contains(&4));
    assert!(sim.selected_paths().get(&4).is_none());
}

#[test]
fn scenario_3_without_valley_free_peer_receives_the_route() {
    let mut sim = Simulator::new(chain_with_peer());
    sim.simulate(1).unwrap();

    assert_eq!(sim.selected_paths()[&4], vec![1, 2, 3]);
}

#[test]
fn scenario_4_loop_is_rejected_and_rib_unchanged() {
    let mut node = Node::new(
        2,
        HashMap::from([(3, neighbour(Relationship::PeerToPeer, 0))]),
    );
    assert!(!node.update_selected_path(&[1, 2, 3]));
    assert!(node.selected_path().is_none());
}

#[test]
fn scenario_5_detector_short_circuit() {
    let mut graph = linear_chain();
    graph.get_mut(&3).unwrap().set_detector(true);

    let mut sim = Simulator::new(graph);
    sim.simulate(1).unwrap();

    assert!(sim.is_caught());
    assert_eq!(sim.used_nodes(), std::collections::HashSet::from([1, 2, 3]));
}

#[test]
fn scenario_6_hijack_checkpoint_and_restore() {
    let mut sim = Simulator::new(chain_with_peer());
    sim.set_valley_free(true);
    sim.simulate(1).unwrap();
    let converged = sim.selected_paths();

    assert!(!sim.used_nodes().contains(&4));

    sim.set_to_hijack(true);
    sim.simulate(4).unwrap();
    assert_ne!(sim.selected_paths()[&3], converged[&3]);

    sim.set_to_hijack(false);
    for (asn, path) in &converged {
        assert_eq!(
            &sim.graph().get(asn).unwrap().selected_path().unwrap().to_vec(),
            path
        );
    }
}
