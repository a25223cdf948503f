// crates/mh_multiphase/tests/partial_elimination.rs

//! 曳力局部消元

use mh_multiphase::field::interpolate;
use mh_multiphase::models::drag::DRAG_COEFFICIENT_DIMENSIONS;
use glam::DVec3;
use mh_multiphase::prelude::*;
use serde_json::{json, Value};
use std::sync::Arc;

fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol * b.abs().max(1.0)
}

const N_CELLS: usize = 6;

fn build(config: &Value) -> PhaseSystem {
    PhaseSystem::from_json_str(Arc::new(LineMesh::unit(N_CELLS)), &config.to_string()).unwrap()
}

/// 两相等体积分数，常系数曳力 K = 4·α1·α2 = 1
fn two_phase_config() -> Value {
    json!({
        "phases": [
            { "name": "gas", "rho": 1.0, "alpha": 0.5, "velocity": [1.5, 0.0, 0.0] },
            { "name": "liquid", "rho": 1000.0, "alpha": 0.5, "velocity": [-0.5, 0.0, 0.0] }
        ],
        "blending": { "default": { "type": "none", "continuous_phase": "liquid" } },
        "drag": [
            { "pair": "gas and liquid", "type": "constant_coefficient", "coefficient": 4.0 }
        ]
    })
}

fn uniform_raus(sys: &PhaseSystem, value: f64) -> PhaseFieldList<VolScalarField> {
    let mut raus = PhaseFieldList::new(sys.phases().len());
    for phase in sys.phases().moving_phases() {
        raus.set(
            phase.index(),
            VolScalarField::uniform("rAU", DRAG_COEFFICIENT_DIMENSIONS.inv(), sys.mesh(), value),
        );
    }
    raus
}

fn face_coefficients(sys: &PhaseSystem, raus: &PhaseFieldList<VolScalarField>) -> PhaseFieldList<SurfaceScalarField> {
    let mut raufs = PhaseFieldList::new(sys.phases().len());
    for (index, rau) in raus.iter() {
        raufs.set(index, interpolate(rau, sys.mesh()));
    }
    raufs
}

#[test]
fn test_two_phase_closed_form() {
    let mut sys = build(&two_phase_config());
    let raus = uniform_raus(&sys, 1.0);
    let report = sys.partial_elimination(&raus).unwrap();

    // a = rAU·K = 1，ΔU = a(U1 − U2)/(1 + 2a) = 2/3
    let du = 2.0 / 3.0;
    let gas = sys.phase("gas").unwrap();
    let liquid = sys.phase("liquid").unwrap();
    for c in 0..N_CELLS {
        assert!(approx_eq(gas.u()[c].x, 1.5 - du, 1e-12));
        assert!(approx_eq(liquid.u()[c].x, -0.5 + du, 1e-12));
    }
    // 修正量大小相等、方向相反
    assert!(approx_eq(gas.u()[0].x - 1.5, -(liquid.u()[0].x + 0.5), 1e-12));

    // 通量与新速度一致
    assert!(approx_eq(gas.phi()[3], 1.5 - du, 1e-12));
    assert!(approx_eq(liquid.phi()[0], -(-0.5 + du), 1e-12));

    assert!(report.is_clean());
    assert_eq!(report.n_locations, N_CELLS + (N_CELLS + 1));
    assert!(approx_eq(report.min_determinant, 3.0, 1e-12));
}

#[test]
fn test_momentum_is_conserved_for_equal_coefficients() {
    let mut sys = build(&two_phase_config());
    let before: f64 = sys.phases().iter().map(|p| p.u()[2].x).sum();
    sys.partial_elimination(&uniform_raus(&sys, 0.37)).unwrap();
    let after: f64 = sys.phases().iter().map(|p| p.u()[2].x).sum();
    assert!(approx_eq(before, after, 1e-12));
}

#[test]
fn test_absent_phase_gives_identity() {
    let mut config = two_phase_config();
    config["drag"] = json!([{ "pair": "gas in liquid", "type": "schiller_naumann" }]);
    let mut sys = build(&config);
    {
        let phases = sys.phases_mut();
        phases.by_name_mut("gas").unwrap().alpha_mut()[0] = 0.0;
        phases.by_name_mut("liquid").unwrap().alpha_mut()[0] = 1.0;
    }
    sys.correct();

    // 残余体积分数使模型系数非零，存在阈值将其屏蔽
    let key = PhasePairKey::ordered("gas", "liquid");
    assert!(sys.kd(&key).unwrap()[0] > 0.0);

    let report = sys.partial_elimination(&uniform_raus(&sys, 1e-3)).unwrap();
    assert!(report.is_clean());
    assert!(approx_eq(report.min_determinant, 1.0, 1e-12));

    let gas = sys.phase("gas").unwrap();
    let liquid = sys.phase("liquid").unwrap();
    assert_eq!(gas.u()[0].x, 1.5);
    assert_eq!(liquid.u()[0].x, -0.5);
    // 其余单元正常耦合
    assert!(gas.u()[3].x < 1.5);
    assert!(liquid.u()[3].x > -0.5);
}

#[test]
fn test_cell_and_face_forms_agree_for_uniform_fields() {
    let mut cell = build(&two_phase_config());
    let mut face = build(&two_phase_config());
    let raus = uniform_raus(&cell, 0.8);
    let raufs = face_coefficients(&face, &raus);

    cell.partial_elimination(&raus).unwrap();
    face.partial_elimination_f(&raufs).unwrap();

    for name in ["gas", "liquid"] {
        let phi_cell = cell.phase(name).unwrap().phi();
        let phi_face = face.phase(name).unwrap().phi();
        for f in 0..phi_cell.len() {
            assert!(approx_eq(phi_cell[f], phi_face[f], 1e-12));
        }
        // 面形式不修改速度
        assert_eq!(face.phase(name).unwrap().u()[1], build(&two_phase_config()).phase(name).unwrap().u()[1]);
    }
    for f in 0..cell.phi().len() {
        assert!(approx_eq(cell.phi()[f], face.phi()[f], 1e-12));
    }
}

#[test]
fn test_stationary_phase_couples_through_rhs() {
    let config = json!({
        "phases": [
            { "name": "liquid", "rho": 1000.0, "alpha": 0.5, "velocity": [1.0, 0.0, 0.0] },
            { "name": "bed", "rho": 2500.0, "alpha": 0.5, "moving": false }
        ],
        "blending": { "default": { "type": "none", "continuous_phase": "liquid" } },
        "drag": [
            { "pair": "liquid and bed", "type": "constant_coefficient", "coefficient": 4.0 }
        ]
    });
    let mut sys = build(&config);
    let raus = uniform_raus(&sys, 1.0);
    let report = sys.partial_elimination(&raus).unwrap();

    // (1 + c)·U = U*，c = 1
    assert!(approx_eq(sys.phase("liquid").unwrap().u()[2].x, 0.5, 1e-12));
    assert_eq!(sys.phase("bed").unwrap().u().max_mag(), 0.0);
    assert!(approx_eq(report.min_determinant, 2.0, 1e-12));
}

#[test]
fn test_disabled_elimination_is_noop() {
    let mut config = two_phase_config();
    config["elimination"] = json!({ "enabled": false });
    let mut sys = build(&config);
    let raus = uniform_raus(&sys, 1.0);

    let report = sys.partial_elimination(&raus).unwrap();
    assert_eq!(report.n_locations, 0);
    let report = sys.partial_elimination_f(&face_coefficients(&sys, &raus)).unwrap();
    assert_eq!(report.n_locations, 0);

    assert_eq!(sys.phase("gas").unwrap().u()[0].x, 1.5);
    assert_eq!(sys.phase("liquid").unwrap().phi()[2], -0.5);
}

#[test]
fn test_missing_coefficient_is_error() {
    let mut sys = build(&two_phase_config());
    let mut raus = uniform_raus(&sys, 1.0);
    raus = {
        let mut partial = PhaseFieldList::new(raus.len());
        let gas = sys.phases().index_of("gas").unwrap();
        if let Some(r) = raus.get(gas) {
            partial.set(gas, r.clone());
        }
        partial
    };
    assert!(sys.partial_elimination(&raus).is_err());
    // 出错时不修改任何相
    assert_eq!(sys.phase("gas").unwrap().u()[0].x, 1.5);
}

#[test]
fn test_custom_thresholds_from_config() {
    let mut config = two_phase_config();
    config["elimination"] = json!({ "alpha_threshold": 0.6, "pivot_tolerance": 1e-10 });
    let mut sys = build(&config);
    assert!(approx_eq(sys.elimination().tolerance.alpha_threshold, 0.6, 1e-14));

    // 两相体积分数 0.5 均低于阈值：全部位置不耦合
    let report = sys.partial_elimination(&uniform_raus(&sys, 1.0)).unwrap();
    assert!(approx_eq(report.min_determinant, 1.0, 1e-14));
    assert_eq!(sys.phase("gas").unwrap().u()[0].x, 1.5);
}

#[test]
fn test_three_moving_phases_satisfy_coupled_equations() {
    let config = json!({
        "phases": [
            { "name": "gas", "rho": 1.0, "alpha": 0.2, "velocity": [2.0, 0.0, 0.0] },
            { "name": "oil", "rho": 850.0, "alpha": 0.3, "velocity": [0.5, 1.0, 0.0] },
            { "name": "water", "rho": 1000.0, "alpha": 0.5, "velocity": [-1.0, 0.0, 0.5] }
        ],
        "blending": { "default": { "type": "none", "continuous_phase": "water" } },
        "drag": [
            { "pair": "gas and oil", "type": "constant_coefficient", "coefficient": 10.0 },
            { "pair": "gas and water", "type": "constant_coefficient", "coefficient": 5.0 },
            { "pair": "oil and water", "type": "constant_coefficient", "coefficient": 2.0 }
        ]
    });
    let mut sys = build(&config);
    let names = ["gas", "oil", "water"];
    let rau_values = [1.0, 0.5, 2.0];

    let mut raus = PhaseFieldList::new(sys.phases().len());
    for (name, &r) in names.iter().zip(&rau_values) {
        let index = sys.phases().index_of(name).unwrap();
        raus.set(
            index,
            VolScalarField::uniform("rAU", DRAG_COEFFICIENT_DIMENSIONS.inv(), sys.mesh(), r),
        );
    }

    let k = |a: &str, b: &str| sys.kd(&PhasePairKey::unordered(a, b)).unwrap().clone();
    let ks = [
        [None, Some(k("gas", "oil")), Some(k("gas", "water"))],
        [Some(k("gas", "oil")), None, Some(k("oil", "water"))],
        [Some(k("gas", "water")), Some(k("oil", "water")), None],
    ];
    assert!(approx_eq(ks[0][1].as_ref().unwrap()[0], 0.6, 1e-12));

    let before: Vec<Vec<DVec3>> = names
        .iter()
        .map(|n| sys.phase(n).unwrap().u().as_slice().to_vec())
        .collect();

    let report = sys.partial_elimination(&raus).unwrap();
    assert!(report.is_clean());

    let after: Vec<Vec<DVec3>> = names
        .iter()
        .map(|n| sys.phase(n).unwrap().u().as_slice().to_vec())
        .collect();

    for c in 0..N_CELLS {
        let mut momentum_change = DVec3::ZERO;
        for i in 0..3 {
            // (1 + Σc_ij)U_i − Σc_ij U_j = U_i*
            let mut lhs = after[i][c];
            for j in 0..3 {
                if let Some(k_ij) = &ks[i][j] {
                    let c_ij = rau_values[i] * k_ij[c];
                    lhs += (after[i][c] - after[j][c]) * c_ij;
                }
            }
            assert!((lhs - before[i][c]).length() < 1e-12);
            momentum_change += (after[i][c] - before[i][c]) / rau_values[i];
        }
        // 相间曳力成对抵消
        assert!(momentum_change.length() < 1e-12);
    }
}

#[test]
fn test_singular_cell_is_left_unchanged() {
    let mut sys = build(&two_phase_config());
    // c = rAU·K = −0.5 时局部矩阵 [[0.5, 0.5], [0.5, 0.5]] 奇异
    let mut values = vec![1.0; N_CELLS];
    values[2] = -0.5;
    let mut raus = PhaseFieldList::new(sys.phases().len());
    for phase in sys.phases().moving_phases() {
        raus.set(
            phase.index(),
            VolScalarField::from_values("rAU", DRAG_COEFFICIENT_DIMENSIONS.inv(), values.clone()),
        );
    }

    let report = sys.partial_elimination(&raus).unwrap();
    assert_eq!(report.n_locations, N_CELLS + (N_CELLS + 1));
    assert_eq!(report.n_degenerate, 1);
    assert!(!report.is_clean());
    assert!(report.min_determinant.is_finite());

    let gas = sys.phase("gas").unwrap();
    let liquid = sys.phase("liquid").unwrap();
    assert_eq!(gas.u()[2].x, 1.5);
    assert_eq!(liquid.u()[2].x, -0.5);
    assert!(approx_eq(gas.u()[1].x, 1.5 - 2.0 / 3.0, 1e-12));
    for c in 0..N_CELLS {
        assert!(gas.u()[c].is_finite());
        assert!(liquid.u()[c].is_finite());
    }
}

#[test]
fn test_singular_face_is_left_unchanged() {
    let mut sys = build(&two_phase_config());
    let n_faces = sys.mesh().n_faces();
    let mut values = vec![1.0; n_faces];
    values[3] = -0.5;
    let mut raufs = PhaseFieldList::new(sys.phases().len());
    for phase in sys.phases().moving_phases() {
        raufs.set(
            phase.index(),
            SurfaceScalarField::from_values("rAUf", DRAG_COEFFICIENT_DIMENSIONS.inv(), values.clone()),
        );
    }
    let gas_phi = sys.phase("gas").unwrap().phi()[3];

    let report = sys.partial_elimination_f(&raufs).unwrap();
    assert_eq!(report.n_locations, n_faces);
    assert_eq!(report.n_degenerate, 1);

    let gas = sys.phase("gas").unwrap();
    assert_eq!(gas.phi()[3], gas_phi);
    assert!(gas.phi()[2] < gas.phi()[3]);
    assert!(sys.phi().as_slice().iter().all(|v| v.is_finite()));
}

#[test]
fn test_zero_thresholds_are_rejected() {
    for elimination in [
        json!({ "alpha_threshold": 0.0 }),
        json!({ "pivot_tolerance": 0.0 }),
    ] {
        let mut config = two_phase_config();
        config["elimination"] = elimination;
        let result = PhaseSystem::from_json_str(Arc::new(LineMesh::unit(N_CELLS)), &config.to_string());
        assert!(result.is_err_and(|e| e.is_configuration()));
    }
}
