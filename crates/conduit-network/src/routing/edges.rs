//! Scan results to routing graphs.

use conduit_graph::Graph;
use conduit_topology::Position;
use tracing::warn;

use crate::scanner::ScanResult;

/// Label of the edges built from scan links.
pub const LINK_LABEL: &str = "link";

/// Build the routing graph of a scan.
///
/// Every segment the scan reached becomes a node; every confirmed parent link
/// becomes a pair of opposite unit-weight edges.
pub fn build_graph(scan: &ScanResult) -> Graph<Position> {
    let mut graph = Graph::new();
    for &pos in &scan.found {
        graph.add_node(pos);
    }

    for (parent, child) in scan.links() {
        let (Some(from), Some(to)) = (graph.node_id(&parent), graph.node_id(&child)) else {
            warn!(%parent, %child, "Scan link references a segment the scan did not find");
            continue;
        };
        if let Err(err) = graph.add_link(LINK_LABEL, from, to, 1) {
            warn!(%parent, %child, %err, "Could not add routing edge");
        }
    }
    graph
}
