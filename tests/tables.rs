use std::fmt::Debug;

use vfr_flight_planner::config::load_profile;
use vfr_flight_planner::tables::{
    Axis, ExtrapolationPolicy, LookupPoint, PerformanceTableStore, Table, TableRow,
};

fn assert_grid_points_reproduce<R>(table: &Table<R>)
where
    R: TableRow,
    R::Output: PartialEq + Debug,
{
    let policy = ExtrapolationPolicy::within_table();
    for row in table.rows() {
        let mut point = LookupPoint::new(
            row.key(Axis::Weight),
            row.key(Axis::PressureAltitude),
            row.key(Axis::Temperature),
        );
        if R::AXES.contains(&Axis::Power) {
            point = point.with_power(row.key(Axis::Power));
        }
        let value = table.interpolate(&point, &policy).expect("grid point");
        assert_eq!(value, row.output(), "{} at {point:?}", table.kind());
    }
}

#[test]
fn every_stored_row_is_reproduced_exactly() {
    let profile = load_profile("configs/aircraft/c172.yaml").expect("c172 profile");
    let store = PerformanceTableStore::from_profile(&profile).expect("store");
    assert_grid_points_reproduce(store.takeoff().expect("takeoff"));
    assert_grid_points_reproduce(store.landing().expect("landing"));
    assert_grid_points_reproduce(store.climb().expect("climb"));
    assert_grid_points_reproduce(store.cruise().expect("cruise"));
}

#[test]
fn takeoff_roll_grows_with_weight_altitude_and_temperature() {
    let profile = load_profile("configs/aircraft/c172.yaml").expect("c172 profile");
    let store = PerformanceTableStore::from_profile(&profile).expect("store");
    let table = store.takeoff().expect("takeoff");
    let policy = ExtrapolationPolicy::default();
    let roll = |w: f64, pa: f64, t: f64| {
        table
            .interpolate(&LookupPoint::new(w, pa, t), &policy)
            .expect("in range")
            .groundroll_ft
    };

    let mut previous = f64::MIN;
    for step in 0..=24 {
        let value = roll(1_700.0 + 25.0 * f64::from(step), 1_234.0, 17.0);
        assert!(value >= previous);
        previous = value;
    }
    previous = f64::MIN;
    for step in 0..=30 {
        let value = roll(2_111.0, 200.0 * f64::from(step), 17.0);
        assert!(value >= previous);
        previous = value;
    }
    previous = f64::MIN;
    for step in 0..=40 {
        let value = roll(2_111.0, 1_234.0, f64::from(step));
        assert!(value >= previous);
        previous = value;
    }
}
