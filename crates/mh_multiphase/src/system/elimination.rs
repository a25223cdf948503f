// crates/mh_multiphase/src/system/elimination.rs

//! 曳力局部消元
//!
//! 对每个位置（单元或面）上的运动相，求解
//!
//! ```text
//! (1 + Σ_j c_ij) U_i − Σ_{j 运动} c_ij U_j = U_i* + Σ_{j 静止} c_ij U_j
//! c_ij = rAU_i · K_ij
//! ```
//!
//! 方程规模等于运动相数，用带部分主元的稠密高斯消元直接求解。
//! 任一相体积分数不超过 `alpha_threshold` 时该相对在此位置不耦合；
//! 系数非有限或主元低于 `pivot_tolerance` 时保留原值，计入 [`EliminationReport`]。

use super::PhaseSystem;
use crate::error::PhaseSystemResult;
use crate::field::{interpolate, FieldValue, PhaseFieldList, SurfaceScalarField, VolScalarField};
use mh_foundation::{require, CouplingTolerance, MhError, PhaseIndex};

// ============================================================
// 诊断
// ============================================================

/// 一次消元的诊断信息
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EliminationReport {
    /// 求解的位置数
    pub n_locations: usize,
    /// 奇异或非有限、保留原值的位置数
    pub n_degenerate: usize,
    /// 非奇异位置上系数矩阵行列式的最小绝对值
    pub min_determinant: f64,
}

impl Default for EliminationReport {
    fn default() -> Self {
        Self {
            n_locations: 0,
            n_degenerate: 0,
            min_determinant: f64::INFINITY,
        }
    }
}

impl EliminationReport {
    /// 是否全部位置都成功求解
    pub fn is_clean(&self) -> bool {
        self.n_degenerate == 0
    }

    /// 合并另一次消元的诊断
    pub fn merge(&mut self, other: &EliminationReport) {
        self.n_locations += other.n_locations;
        self.n_degenerate += other.n_degenerate;
        self.min_determinant = self.min_determinant.min(other.min_determinant);
    }

    fn record(&mut self, det: Option<f64>) {
        self.n_locations += 1;
        match det {
            Some(d) => self.min_determinant = self.min_determinant.min(d.abs()),
            None => self.n_degenerate += 1,
        }
    }
}

// ============================================================
// 局部线性代数
// ============================================================

/// 带部分主元的高斯消元
///
/// `a` 为 n×n 行主序系数矩阵，`b` 为右端项，成功时 `b` 被解覆盖并返回行列式。
/// 系数或右端项非有限、主元未通过 [`CouplingTolerance::is_pivot_valid`]、
/// 或解非有限时返回 `None`，此时 `a` 与 `b` 的内容不再有意义。
pub fn solve_local<T: FieldValue>(
    n: usize,
    a: &mut [f64],
    b: &mut [T],
    tolerance: &CouplingTolerance,
) -> Option<f64> {
    debug_assert_eq!(a.len(), n * n);
    debug_assert_eq!(b.len(), n);

    if a.iter().any(|v| !v.is_finite()) || b.iter().any(|v| !v.is_finite()) {
        return None;
    }

    let mut det = 1.0;
    for col in 0..n {
        let pivot_row = (col..n)
            .max_by(|&r1, &r2| a[r1 * n + col].abs().total_cmp(&a[r2 * n + col].abs()))?;
        let pivot = a[pivot_row * n + col];
        if !tolerance.is_pivot_valid(pivot) {
            return None;
        }
        if pivot_row != col {
            for k in 0..n {
                a.swap(col * n + k, pivot_row * n + k);
            }
            b.swap(col, pivot_row);
            det = -det;
        }
        det *= pivot;

        for row in (col + 1)..n {
            let factor = a[row * n + col] / pivot;
            if factor == 0.0 {
                continue;
            }
            for k in col..n {
                a[row * n + k] -= factor * a[col * n + k];
            }
            let bc = b[col];
            b[row] -= bc * factor;
        }
    }

    // 回代
    for row in (0..n).rev() {
        let mut acc = b[row];
        for k in (row + 1)..n {
            acc -= b[k] * a[row * n + k];
        }
        b[row] = acc / a[row * n + row];
    }
    if !det.is_finite() || b.iter().any(|v| !v.is_finite()) {
        return None;
    }
    Some(det)
}

/// 一个方向的耦合：第 `row` 个运动相受相 `other` 的耦合系数
struct Coupling {
    row: usize,
    other: PhaseIndex,
    c: Vec<f64>,
}

/// 在所有位置上求解耦合方程，返回各运动相的新值
fn eliminate<T: FieldValue>(
    moving: &[PhaseIndex],
    couplings: &[Coupling],
    values: &[&[T]],
    n_locations: usize,
    tolerance: &CouplingTolerance,
    report: &mut EliminationReport,
) -> Vec<Vec<T>> {
    let m = moving.len();
    let slot_of = |phase: PhaseIndex| moving.iter().position(|&p| p == phase);
    let slots: Vec<Option<usize>> = couplings.iter().map(|c| slot_of(c.other)).collect();

    let mut result: Vec<Vec<T>> = moving.iter().map(|p| values[p.get()].to_vec()).collect();
    let mut a = vec![0.0; m * m];
    let mut b = vec![T::ZERO; m];

    for loc in 0..n_locations {
        a.iter_mut().for_each(|v| *v = 0.0);
        for (r, p) in moving.iter().enumerate() {
            a[r * m + r] = 1.0;
            b[r] = values[p.get()][loc];
        }
        for (cpl, slot) in couplings.iter().zip(slots.iter()) {
            let c = cpl.c[loc];
            a[cpl.row * m + cpl.row] += c;
            match slot {
                Some(s) => a[cpl.row * m + s] -= c,
                None => b[cpl.row] += values[cpl.other.get()][loc] * c,
            }
        }

        let det = solve_local(m, &mut a, &mut b, tolerance);
        match det {
            Some(_) => {
                for (r, out) in result.iter_mut().enumerate() {
                    out[loc] = b[r];
                }
            }
            None => log::trace!("局部消元在位置 {} 奇异，保留原值", loc),
        }
        report.record(det);
    }
    result
}

impl PhaseSystem {
    // ========================================================
    // 耦合系数
    // ========================================================

    /// 按存在阈值屏蔽后的相对曳力系数 (phase1, phase2, K)
    pub(super) fn drag_couplings(&self) -> Vec<(PhaseIndex, PhaseIndex, VolScalarField)> {
        let tol = self.elimination.tolerance;
        let mut couplings: Vec<_> = self
            .kds
            .iter()
            .filter_map(|(key, k)| {
                let pair = self.pairs.get(key)?;
                let (p, q) = (pair.phase1(), pair.phase2());
                let (a1, a2) = (self.phases[p].alpha(), self.phases[q].alpha());
                let values = (0..k.len())
                    .map(|i| {
                        if tol.is_present(a1[i]) && tol.is_present(a2[i]) {
                            k[i]
                        } else {
                            0.0
                        }
                    })
                    .collect();
                Some((p, q, VolScalarField::from_values(k.name(), k.dimensions(), values)))
            })
            .collect();
        couplings.sort_by_key(|(p, q, _)| (p.get(), q.get()));
        couplings
    }

    /// 相的系数，缺失时报错
    pub(super) fn require_coefficient<'a, F>(
        &self,
        coeffs: &'a PhaseFieldList<F>,
        phase: PhaseIndex,
        name: &str,
    ) -> PhaseSystemResult<&'a F> {
        let coeff = require!(
            coeffs.get(phase),
            MhError::not_found(format!("{}.{}", name, self.phases[phase].name()))
        );
        Ok(coeff)
    }

    /// 对每个方向 (i, j)，i 为运动相时由 `coeff(i, K_ij)` 生成耦合系数
    fn build_couplings(
        &self,
        mut coeff: impl FnMut(PhaseIndex, &VolScalarField) -> PhaseSystemResult<Vec<f64>>,
    ) -> PhaseSystemResult<Vec<Coupling>> {
        let moving = self.phases.moving();
        let mut couplings = Vec::new();
        for (p, q, k) in self.drag_couplings() {
            for (i, j) in [(p, q), (q, p)] {
                if let Some(row) = moving.iter().position(|&m| m == i) {
                    couplings.push(Coupling {
                        row,
                        other: j,
                        c: coeff(i, &k)?,
                    });
                }
            }
        }
        Ok(couplings)
    }

    // ========================================================
    // 单元形式
    // ========================================================

    /// 单元形式局部消元
    ///
    /// `rAUs` 为各运动相不含曳力的动量方程对角倒数。更新运动相速度，
    /// 并以面插值的 `rAU_i·K_ij` 更新运动相通量和混合通量。禁用时不做任何修改。
    pub fn partial_elimination(
        &mut self,
        raus: &PhaseFieldList<VolScalarField>,
    ) -> PhaseSystemResult<EliminationReport> {
        if !self.elimination.enabled {
            log::debug!("局部消元已禁用");
            return Ok(EliminationReport::default());
        }

        let mesh = self.mesh();
        let tol = self.elimination.tolerance;
        let moving = self.phases.moving().to_vec();
        for &i in &moving {
            self.require_coefficient(raus, i, "rAU")?;
        }

        let cell_couplings = self.build_couplings(|i, k| {
            let r = self.require_coefficient(raus, i, "rAU")?;
            MhError::check_size("rAU", k.len(), r.len())?;
            Ok((0..k.len()).map(|c| r[c] * k[c]).collect())
        })?;
        let face_couplings = self.build_couplings(|i, k| {
            let r = self.require_coefficient(raus, i, "rAU")?;
            MhError::check_size("rAU", k.len(), r.len())?;
            Ok(interpolate(&k.scaled_by(r), mesh).as_slice().to_vec())
        })?;

        let mut report = EliminationReport::default();
        let us: Vec<&[_]> = self.phases.iter().map(|p| p.u().as_slice()).collect();
        let new_us = eliminate(&moving, &cell_couplings, &us, mesh.n_cells(), &tol, &mut report);
        let phis: Vec<&[f64]> = self.phases.iter().map(|p| p.phi().as_slice()).collect();
        let new_phis = eliminate(&moving, &face_couplings, &phis, mesh.n_faces(), &tol, &mut report);

        for ((&i, u), phi) in moving.iter().zip(new_us).zip(new_phis) {
            let phase = &mut self.phases[i];
            phase.u_mut().as_mut_slice().copy_from_slice(&u);
            phase.phi_mut().as_mut_slice().copy_from_slice(&phi);
        }
        self.phi = self.calc_phi();

        self.log_report("单元", &report);
        Ok(report)
    }

    // ========================================================
    // 面形式
    // ========================================================

    /// 面形式局部消元
    ///
    /// `rAUfs` 为各运动相的面系数，耦合系数取 `rAUf_i·interpolate(K_ij)`。
    /// 只更新运动相通量和混合通量。禁用时不做任何修改。
    pub fn partial_elimination_f(
        &mut self,
        raufs: &PhaseFieldList<SurfaceScalarField>,
    ) -> PhaseSystemResult<EliminationReport> {
        if !self.elimination.enabled {
            log::debug!("局部消元已禁用");
            return Ok(EliminationReport::default());
        }

        let mesh = self.mesh();
        let tol = self.elimination.tolerance;
        let moving = self.phases.moving().to_vec();
        for &i in &moving {
            self.require_coefficient(raufs, i, "rAUf")?;
        }

        let couplings = self.build_couplings(|i, k| {
            let r = self.require_coefficient(raufs, i, "rAUf")?;
            let k_f = interpolate(k, mesh);
            MhError::check_size("rAUf", k_f.len(), r.len())?;
            Ok((0..k_f.len()).map(|f| r[f] * k_f[f]).collect())
        })?;

        let mut report = EliminationReport::default();
        let phis: Vec<&[f64]> = self.phases.iter().map(|p| p.phi().as_slice()).collect();
        let new_phis = eliminate(&moving, &couplings, &phis, mesh.n_faces(), &tol, &mut report);

        for (&i, phi) in moving.iter().zip(new_phis) {
            self.phases[i].phi_mut().as_mut_slice().copy_from_slice(&phi);
        }
        self.phi = self.calc_phi();

        self.log_report("面", &report);
        Ok(report)
    }

    fn log_report(&self, form: &str, report: &EliminationReport) {
        if !report.is_clean() {
            log::warn!(
                "{}形式局部消元: {}/{} 个位置奇异，已保留原值",
                form,
                report.n_degenerate,
                report.n_locations
            );
        }
        log::info!(
            "{}形式局部消元: {} 个位置, 最小行列式 {:.4e}",
            form,
            report.n_locations,
            report.min_determinant
        );
    }
}
