use vfr_flight_planner::config::{BaggageLoad, PersonOnBoard, TankLoad, load_profile};
use vfr_flight_planner::weight_balance::Loadout;
use vfr_flight_planner::{ErrorKind, compute_weight_balance};

fn tanks(gallons: f64) -> Vec<TankLoad> {
    vec![
        TankLoad {
            fuel_tank_id: 1,
            gallons,
        },
        TankLoad {
            fuel_tank_id: 2,
            gallons,
        },
    ]
}

#[test]
fn pilot_with_full_fuel_is_in_normal_category() {
    let profile = load_profile("configs/aircraft/c172.yaml").expect("c172 profile");
    let loadout = Loadout {
        persons: vec![PersonOnBoard {
            seat_row_id: 1,
            weight_lb: 170.0,
        }],
        baggage: Vec::new(),
        fuel: tanks(19.0),
    };
    let report = compute_weight_balance(&profile, &loadout).expect("within limits");
    assert!((report.ramp.weight_lb - 1_798.0).abs() < 1e-9);
    assert!((report.ramp.cg_in - 71_834.0 / 1_798.0).abs() < 1e-9);
    assert!(report.is_within("Normal Category"));
    assert!(report.takeoff.is_none());
}

#[test]
fn heavy_cabin_is_out_of_envelope() {
    let profile = load_profile("configs/aircraft/c172.yaml").expect("c172 profile");
    let loadout = Loadout {
        persons: vec![
            PersonOnBoard {
                seat_row_id: 1,
                weight_lb: 250.0,
            },
            PersonOnBoard {
                seat_row_id: 1,
                weight_lb: 240.0,
            },
            PersonOnBoard {
                seat_row_id: 2,
                weight_lb: 282.0,
            },
        ],
        baggage: Vec::new(),
        fuel: tanks(19.0),
    };
    let err = compute_weight_balance(&profile, &loadout).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::OutOfEnvelope);
    assert!(err.to_string().contains("2400"), "{err}");
}

#[test]
fn envelope_boundary_is_inside() {
    let profile = load_profile("configs/aircraft/c172.yaml").expect("c172 profile");
    // 1500 lb exactly on the bottom edge of both envelopes
    let loadout = Loadout {
        persons: vec![PersonOnBoard {
            seat_row_id: 1,
            weight_lb: 100.0,
        }],
        baggage: Vec::new(),
        fuel: Vec::new(),
    };
    let report = compute_weight_balance(&profile, &loadout).expect("on the boundary");
    assert_eq!(report.ramp.weight_lb, 1_500.0);
    assert!(report.is_within("Normal Category"));
    assert!(report.is_within("Utility Category"));
}

#[test]
fn split_bags_count_against_one_compartment_limit() {
    let profile = load_profile("configs/aircraft/c172.yaml").expect("c172 profile");
    let loadout = Loadout {
        persons: vec![PersonOnBoard {
            seat_row_id: 1,
            weight_lb: 170.0,
        }],
        // 60 lb in Baggage B, limit 50 lb
        baggage: vec![
            BaggageLoad {
                baggage_compartment_id: 2,
                weight_lb: 30.0,
            };
            2
        ],
        fuel: tanks(19.0),
    };
    let err = compute_weight_balance(&profile, &loadout).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    let message = err.to_string();
    assert!(message.contains("Baggage B") && message.contains("60"), "{message}");
}
