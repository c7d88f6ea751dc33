//! End-to-end scenarios (S1-S6) exercising `Mapping`/`Topology` the way a
//! consuming binary would drive the library as a whole, rather than a single
//! module in isolation.

use temporal_topology::{
    AffineTransform1D, BezierSegment, ControlPoint, LinearMonotonic, Mapping, Ordinate,
    ProjectionResult, Topology,
};

fn ord(v: f64) -> Ordinate {
    Ordinate::from(v)
}

#[test]
fn s1_affine_through_affine() {
    let a = Mapping::affine(
        temporal_topology::ContinuousInterval::new(ord(0.0), ord(8.0)).unwrap(),
        AffineTransform1D::new(ord(1.0), ord(1.0)).unwrap(),
    );
    let identity = Mapping::identity_infinite();

    let joined = Mapping::join(&identity, &a).unwrap();
    assert_eq!(joined.project(ord(3.0)), ProjectionResult::Ordinate(ord(4.0)));
    assert_eq!(
        joined.input_bounds(),
        temporal_topology::ContinuousInterval::new(ord(0.0), ord(8.0)).unwrap()
    );
}

#[test]
fn s2_left_meets_right_disjoint_join_is_empty() {
    let a = Mapping::affine(
        temporal_topology::ContinuousInterval::new(ord(-2.0), ord(2.0)).unwrap(),
        AffineTransform1D::new(ord(0.0), ord(1.0)).unwrap(),
    );
    let b = Mapping::affine(
        temporal_topology::ContinuousInterval::new(ord(8.0), ord(12.0)).unwrap(),
        AffineTransform1D::new(ord(0.0), ord(1.0)).unwrap(),
    );
    let joined = Mapping::join(&a, &b).unwrap();
    assert!(joined.is_empty());
}

#[test]
fn s3_linear_v_shape_projection_and_inverse() {
    let rising = Mapping::linear(
        LinearMonotonic::new(vec![
            ControlPoint::new(ord(0.0), ord(0.0)),
            ControlPoint::new(ord(5.0), ord(40.0)),
        ])
        .unwrap(),
    );
    let falling = Mapping::linear(
        LinearMonotonic::new(vec![
            ControlPoint::new(ord(5.0), ord(40.0)),
            ControlPoint::new(ord(10.0), ord(0.0)),
        ])
        .unwrap(),
    );
    let topology = Topology::from_mappings(vec![rising, falling]).unwrap();

    assert!(topology.project(ord(2.0)).ordinate().unwrap().approx_eq(ord(16.0)));
    assert_eq!(topology.project(ord(5.0)).ordinate(), Some(ord(40.0)));
    assert!(topology.project(ord(8.0)).ordinate().unwrap().approx_eq(ord(16.0)));

    let mut inverses = topology.project_inv(ord(16.0));
    inverses.sort();
    assert_eq!(inverses.len(), 2);
    assert!(inverses[0].approx_eq(ord(2.0)));
    assert!(inverses[1].approx_eq(ord(8.0)));
}

#[test]
fn s4_bezier_critical_split_yields_two_monotonic_subsegments() {
    let segment = BezierSegment::new(
        ControlPoint::new(ord(0.0), ord(0.0)),
        ControlPoint::new(ord(1.0), ord(5.0)),
        ControlPoint::new(ord(5.0), ord(5.0)),
        ControlPoint::new(ord(5.0), ord(1.0)),
    )
    .unwrap();

    let pieces = temporal_topology::hodograph::critical_split(segment);
    assert_eq!(pieces.len(), 2);
    for piece in &pieces {
        assert!(temporal_topology::hodograph::critical_points_input(*piece).is_empty());
        assert!(temporal_topology::hodograph::critical_points_output(*piece).is_empty());
    }
}

#[test]
fn s5_trim_in_output_space_with_hole_preserves_input_tiling() {
    let rising = Mapping::linear(
        LinearMonotonic::new(vec![
            ControlPoint::new(ord(0.0), ord(0.0)),
            ControlPoint::new(ord(10.0), ord(10.0)),
        ])
        .unwrap(),
    );
    let falling = Mapping::linear(
        LinearMonotonic::new(vec![
            ControlPoint::new(ord(10.0), ord(10.0)),
            ControlPoint::new(ord(20.0), ord(0.0)),
        ])
        .unwrap(),
    );
    let topology = Topology::from_mappings(vec![rising, falling]).unwrap();

    let trimmed = topology
        .trim_in_output_space(temporal_topology::ContinuousInterval::new(ord(1.0), ord(8.0)).unwrap())
        .unwrap();

    // empty[0,1) linear[1,8) empty[8,10) empty[10,12) linear[12,19) empty[19,20):
    // each source mapping's own gaps both get their own `Empty` mapping, so
    // the full input tiling survives even though the two trimmed ranges
    // don't touch each other.
    assert_eq!(trimmed.mappings().len(), 6);
    assert!(trimmed.mappings()[0].is_empty());
    assert!(!trimmed.mappings()[1].is_empty());
    assert!(trimmed.mappings()[2].is_empty());
    assert!(trimmed.mappings()[3].is_empty());
    assert!(!trimmed.mappings()[4].is_empty());
    assert!(trimmed.mappings()[5].is_empty());
    assert_eq!(trimmed.input_bounds(), topology.input_bounds());
}

#[test]
fn s6_endpoint_projection_regression() {
    let topology = Topology::identity_over(
        temporal_topology::ContinuousInterval::new(ord(0.0), ord(10.0)).unwrap(),
    );
    assert_eq!(topology.project(ord(10.0)).ordinate(), Some(ord(10.0)));
    assert_eq!(topology.project(ord(11.0)), ProjectionResult::OutOfBounds);
}

#[test]
fn join_associativity_holds_within_intersection_domain() {
    let a = Topology::from_mappings(vec![Mapping::affine(
        temporal_topology::ContinuousInterval::new(ord(0.0), ord(10.0)).unwrap(),
        AffineTransform1D::new(ord(0.0), ord(2.0)).unwrap(),
    )])
    .unwrap();
    let b = Topology::from_mappings(vec![Mapping::affine(
        temporal_topology::ContinuousInterval::new(ord(-5.0), ord(25.0)).unwrap(),
        AffineTransform1D::new(ord(1.0), ord(1.0)).unwrap(),
    )])
    .unwrap();
    let c = Topology::from_mappings(vec![Mapping::affine(
        temporal_topology::ContinuousInterval::new(ord(-5.0), ord(25.0)).unwrap(),
        AffineTransform1D::new(ord(0.0), ord(3.0)).unwrap(),
    )])
    .unwrap();

    let left = Topology::join(&Topology::join(&a, &b).unwrap(), &c).unwrap();
    let right = Topology::join(&a, &Topology::join(&b, &c).unwrap()).unwrap();

    for x in [ord(1.0), ord(3.0), ord(7.0), ord(9.9)] {
        let lv = left.project(x).ordinate();
        let rv = right.project(x).ordinate();
        assert_eq!(lv.is_some(), rv.is_some());
        if let (Some(l), Some(r)) = (lv, rv) {
            assert!(l.approx_eq(r), "join not associative at {x:?}: {l:?} != {r:?}");
        }
    }
}

#[test]
fn topology_invert_round_trips_monotonic_affine() {
    let topology = Topology::identity_over(
        temporal_topology::ContinuousInterval::new(ord(0.0), ord(10.0)).unwrap(),
    );
    let inverted = topology.invert().unwrap();
    assert_eq!(inverted.len(), 1);

    let y = topology.project(ord(4.0)).ordinate().unwrap();
    let back = inverted[0].project(y).ordinate().unwrap();
    assert!(back.approx_eq(ord(4.0)));
}
