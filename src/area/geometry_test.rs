use super::*;

#[test]
fn check_point_accepts_range_edges() {
    assert!(check_point(LatLng::new(90.0, 180.0)).is_ok());
    assert!(check_point(LatLng::new(-90.0, -180.0)).is_ok());
}

#[test]
fn check_point_rejects_out_of_range_and_nan() {
    assert!(check_point(LatLng::new(90.1, 0.0)).is_err());
    assert!(check_point(LatLng::new(0.0, -180.5)).is_err());
    assert!(check_point(LatLng::new(f64::NAN, 0.0)).is_err());
    assert!(check_point(LatLng::new(0.0, f64::INFINITY)).is_err());
}

#[test]
fn bounds_of_empty_is_none() {
    assert_eq!(bounds(&[]), None);
}

#[test]
fn bounds_covers_all_points() {
    let b = bounds(&[LatLng::new(4.0, -74.0), LatLng::new(5.0, -75.0), LatLng::new(4.5, -73.5)]).unwrap();
    assert_eq!(b, Bounds { north: 5.0, south: 4.0, east: -73.5, west: -75.0 });
}

#[test]
fn area_of_one_degree_at_equator() {
    let b = Bounds { north: 0.5, south: -0.5, east: 0.5, west: -0.5 };
    let km2 = approx_area_km2(&b);
    assert!((km2 - KM_PER_DEGREE * KM_PER_DEGREE).abs() < 1e-6);
}

#[test]
fn area_shrinks_with_latitude() {
    let equator = approx_area_km2(&Bounds { north: 1.0, south: 0.0, east: 1.0, west: 0.0 });
    let north = approx_area_km2(&Bounds { north: 61.0, south: 60.0, east: 1.0, west: 0.0 });
    assert!(north < equator * 0.6);
}

#[test]
fn degenerate_box_has_zero_area() {
    let b = Bounds { north: 4.0, south: 4.0, east: -74.0, west: -74.0 };
    assert!(approx_area_km2(&b).abs() < f64::EPSILON);
}
