//! Round-trips the plain-data `serde` derives (opt-in via the `serde`
//! feature) through JSON, the way a media-schema embedder (§6) would
//! persist a topology alongside its own document.

#![cfg(feature = "serde")]

use temporal_topology::{AffineTransform1D, ContinuousInterval, Mapping, Ordinate, Topology};

#[test]
fn topology_round_trips_through_json() {
    let ord = |v: f64| Ordinate::from(v);
    let topology = Topology::from_mappings(vec![Mapping::affine(
        ContinuousInterval::new(ord(0.0), ord(10.0)).unwrap(),
        AffineTransform1D::new(ord(1.0), ord(2.0)).unwrap(),
    )])
    .unwrap();

    let json = serde_json::to_string(&topology).unwrap();
    let back: Topology = serde_json::from_str(&json).unwrap();

    assert_eq!(back.input_bounds(), topology.input_bounds());
    assert_eq!(
        back.project(ord(3.0)).ordinate(),
        topology.project(ord(3.0)).ordinate()
    );
}
