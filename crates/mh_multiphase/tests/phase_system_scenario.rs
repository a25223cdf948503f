// crates/mh_multiphase/tests/phase_system_scenario.rs

//! 三相（气-液-固定床）端到端场景

use mh_multiphase::models::{Drag, HeatTransfer, MassTransfer};
use mh_multiphase::prelude::*;
use serde_json::json;
use std::sync::Arc;

fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol * b.abs().max(1.0)
}

fn three_phase_config() -> serde_json::Value {
    json!({
        "phases": [
            { "name": "gas", "rho": 1.2, "alpha": 0.2, "d": 2e-3,
              "velocity": [0.3, 0.0, 0.0], "anisothermal": true, "temperature": 320.0 },
            { "name": "liquid", "rho": 998.0, "alpha": 0.5, "anisothermal": true },
            { "name": "solid", "rho": 2500.0, "alpha": 0.3, "moving": false, "velocity": [5.0, 0.0, 0.0] }
        ],
        "blending": {
            "default": { "type": "none", "continuous_phase": "liquid" }
        },
        "drag": [
            { "pair": "gas in liquid", "type": "schiller_naumann" },
            { "pair": "liquid and solid", "type": "constant_coefficient", "coefficient": 50.0 }
        ],
        "heat_transfer": [
            { "pair": "gas in liquid", "type": "ranz_marshall" }
        ]
    })
}

fn build(config: &serde_json::Value) -> PhaseSystem {
    PhaseSystem::from_json_str(Arc::new(LineMesh::unit(5)), &config.to_string()).unwrap()
}

#[test]
fn test_phase_partitions() {
    let sys = build(&three_phase_config());
    let phases = sys.phases();

    assert_eq!(phases.names(), vec!["gas", "liquid", "solid"]);
    let moving: Vec<&str> = phases.moving_phases().map(|p| p.name()).collect();
    let stationary: Vec<&str> = phases.stationary_phases().map(|p| p.name()).collect();
    assert_eq!(moving, vec!["gas", "liquid"]);
    assert_eq!(stationary, vec!["solid"]);
    assert_eq!(phases.anisothermal().len(), 2);
    assert!(phases.multi_component().is_empty());

    // 静止相速度恒为零
    let solid = sys.phase("solid").unwrap();
    assert_eq!(solid.u().max_mag(), 0.0);
    assert_eq!(solid.phi().max_mag(), 0.0);
}

#[test]
fn test_pairs_and_model_tables() {
    let sys = build(&three_phase_config());

    // (gas in liquid), (gas and liquid), (liquid and solid)
    assert_eq!(sys.phase_pairs().len(), 3);
    assert_eq!(sys.sub_models().count::<Drag>(), 2);
    assert_eq!(sys.sub_models().count::<HeatTransfer>(), 1);
    assert_eq!(sys.sub_models().count::<MassTransfer>(), 0);

    let gas_in_liquid = PhasePairKey::ordered("gas", "liquid");
    assert!(sys.phase_pairs().contains(&gas_in_liquid));
    assert!(sys.phase_pairs().contains(&PhasePairKey::unordered("liquid", "gas")));
    assert!(!sys.phase_pairs().contains(&gas_in_liquid.swapped()));

    assert!(sys.found_blended_sub_model::<Drag>(&gas_in_liquid));
    assert!(sys.found_blended_sub_model::<Drag>(&PhasePairKey::unordered("solid", "liquid")));
    assert!(sys.found_blended_sub_model::<HeatTransfer>(&gas_in_liquid));
    assert!(!sys.found_blended_sub_model::<HeatTransfer>(&PhasePairKey::unordered("solid", "liquid")));
}

#[test]
fn test_gas_solid_not_modelled() {
    let sys = build(&three_phase_config());

    let gas_solid = PhasePairKey::unordered("gas", "solid");
    assert!(!sys.found_sub_model::<Drag>(&gas_solid));
    assert!(!sys.found_sub_model_between::<Drag>("gas", "solid"));
    assert!(!sys.phase_pairs().contains(&gas_solid));

    match sys.lookup_sub_model::<Drag>(&gas_solid) {
        Err(PhaseSystemError::ModelNotFound { category, .. }) => assert_eq!(category, "drag"),
        other => panic!("期望 ModelNotFound，实际 {:?}", other.map(|m| m.type_name())),
    }

    // 查询不改变相对表
    assert_eq!(sys.phase_pairs().len(), 3);
    assert!(sys.kd(&gas_solid).is_none());
}

#[test]
fn test_lookup_between_resolves_direction() {
    let sys = build(&three_phase_config());

    let drag = sys.lookup_sub_model_between::<Drag>("gas", "liquid").unwrap();
    assert_eq!(drag.type_name(), "schiller_naumann");
    assert!(!sys.found_sub_model_between::<Drag>("liquid", "gas"));

    // 无序模型双向可查
    let a = sys.lookup_sub_model_between::<Drag>("liquid", "solid").unwrap();
    let b = sys.lookup_sub_model_between::<Drag>("solid", "liquid").unwrap();
    assert_eq!(a.type_name(), b.type_name());
}

#[test]
fn test_blended_coefficients_follow_dispersed_model() {
    let sys = build(&three_phase_config());
    let key = PhasePairKey::ordered("gas", "liquid");

    // none 混合且连续相为 liquid：混合系数等于 gas-in-liquid 模型本身
    let blended = sys.evaluate_blended::<Drag>(&key).unwrap();
    let view = sys.pair_view(&key).unwrap();
    let pure = sys.lookup_sub_model::<Drag>(&key).unwrap().k(&view);
    for c in 0..blended.len() {
        assert!(approx_eq(blended[c], pure[c], 1e-12));
    }
    assert!(approx_eq(sys.kd(&key).unwrap()[0], pure[0], 1e-12));

    let k_ls = sys.kd(&PhasePairKey::unordered("liquid", "solid")).unwrap();
    assert!(approx_eq(k_ls[2], 50.0 * 0.5 * 0.3, 1e-12));
}

#[test]
fn test_heat_transfer_balance() {
    let sys = build(&three_phase_config());
    let eqns = sys.heat_transfer();
    assert_eq!(eqns.len(), 2);
    assert!(!eqns.contains_key("solid"));

    let mesh = sys.mesh();
    let q_gas = eqns["gas"]
        .integrate(sys.phase("gas").unwrap().temperature(), mesh)
        .unwrap();
    let q_liquid = eqns["liquid"]
        .integrate(sys.phase("liquid").unwrap().temperature(), mesh)
        .unwrap();
    assert!(q_gas < 0.0);
    assert!(approx_eq(q_gas, -q_liquid, 1e-12));
}

#[test]
fn test_stationary_phase_drag_in_momentum_matrix() {
    let mut config = three_phase_config();
    config["elimination"] = json!({ "enabled": false });
    let sys = build(&config);

    let eqns = sys.momentum_transfer();
    assert_eq!(eqns.len(), 2);
    assert!(!eqns.contains_key("solid"));

    // liquid 的隐式系数包含与 gas、solid 两个相对的曳力
    let k_gl = sys.kd(&PhasePairKey::unordered("gas", "liquid")).unwrap()[1];
    let k_ls = sys.kd(&PhasePairKey::unordered("liquid", "solid")).unwrap()[1];
    assert!(approx_eq(eqns["liquid"].diag()[1], k_gl + k_ls, 1e-12));
    // solid 速度为零，不贡献显式源
    assert!(approx_eq(eqns["liquid"].source()[1].x, k_gl * 0.3, 1e-12));
}

#[test]
fn test_dmdts_zero_without_mass_transfer() {
    let sys = build(&three_phase_config());
    let dmdts = sys.dmdts();
    assert_eq!(dmdts.n_set(), 3);
    let total: f64 = dmdts.iter().map(|(_, f)| f.max_mag()).sum();
    assert_eq!(total, 0.0);
    assert_eq!(sys.dmdt(&PhasePairKey::unordered("gas", "liquid")).max_mag(), 0.0);
}

#[test]
fn test_duplicate_phase_rejected() {
    let mut config = three_phase_config();
    config["phases"][2]["name"] = json!("gas");
    let err = PhaseSystem::from_json_str(Arc::new(LineMesh::unit(2)), &config.to_string()).unwrap_err();
    assert!(matches!(err, PhaseSystemError::DuplicatePhase { .. }));
}

#[test]
fn test_invalid_pair_spec_rejected() {
    let mut config = three_phase_config();
    config["drag"][1]["pair"] = json!("liquid with solid");
    let err = PhaseSystem::from_json_str(Arc::new(LineMesh::unit(2)), &config.to_string()).unwrap_err();
    assert!(matches!(err, PhaseSystemError::InvalidPairSpec { .. }));
}
