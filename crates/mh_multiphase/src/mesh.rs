// crates/mh_multiphase/src/mesh.rs

//! 有限体积网格接口
//!
//! 相系统只通过 [`FvMesh`] 访问网格：单元/面数量、面的 owner/neighbour、
//! 线性插值权重和面积矢量。网格构造、分区与并行通信由外部网格层负责。
//!
//! [`LineMesh`] 是一维等距网格实现，用于测试和命令行工具。

use glam::DVec3;

/// 有限体积网格 trait
pub trait FvMesh: Send + Sync {
    // ========== 基本信息 ==========

    /// 单元数量
    fn n_cells(&self) -> usize;

    /// 面数量（内部面 + 边界面）
    fn n_faces(&self) -> usize;

    // ========== 拓扑数据 ==========

    /// 面的 owner 单元
    fn face_owner(&self, face: usize) -> usize;

    /// 面的 neighbour 单元（边界面返回 None）
    fn face_neighbour(&self, face: usize) -> Option<usize>;

    // ========== 几何数据 ==========

    /// owner 侧线性插值权重 w，面值 = w·φ_P + (1-w)·φ_N
    fn face_weight(&self, face: usize) -> f64;

    /// 面积矢量 Sf（模长为面积，方向由 owner 指向 neighbour）
    fn face_area(&self, face: usize) -> DVec3;

    /// 单元体积
    fn cell_volume(&self, cell: usize) -> f64;

    /// 是否为边界面
    fn is_boundary_face(&self, face: usize) -> bool {
        self.face_neighbour(face).is_none()
    }
}

/// 一维等距网格（沿 x 方向）
///
/// 面 0 与面 n 为边界面，面 i (1 ≤ i < n) 的 owner 为 i-1、neighbour 为 i。
#[derive(Debug, Clone)]
pub struct LineMesh {
    n_cells: usize,
    dx: f64,
    cross_section: f64,
}

impl LineMesh {
    /// 创建网格
    ///
    /// # 参数
    /// - `n_cells`: 单元数
    /// - `length`: 总长度 [m]
    /// - `cross_section`: 横截面积 [m²]
    pub fn new(n_cells: usize, length: f64, cross_section: f64) -> Self {
        let n = n_cells.max(1);
        Self {
            n_cells: n,
            dx: length / n as f64,
            cross_section,
        }
    }

    /// 单位长度、单位截面的网格
    pub fn unit(n_cells: usize) -> Self {
        Self::new(n_cells, 1.0, 1.0)
    }

    /// 单元长度
    pub fn dx(&self) -> f64 {
        self.dx
    }
}

impl FvMesh for LineMesh {
    fn n_cells(&self) -> usize {
        self.n_cells
    }

    fn n_faces(&self) -> usize {
        self.n_cells + 1
    }

    fn face_owner(&self, face: usize) -> usize {
        face.saturating_sub(1).min(self.n_cells - 1)
    }

    fn face_neighbour(&self, face: usize) -> Option<usize> {
        if face == 0 || face >= self.n_cells {
            None
        } else {
            Some(face)
        }
    }

    fn face_weight(&self, face: usize) -> f64 {
        if self.is_boundary_face(face) {
            1.0
        } else {
            0.5
        }
    }

    fn face_area(&self, face: usize) -> DVec3 {
        // 左边界面法向指向域外
        if face == 0 {
            DVec3::new(-self.cross_section, 0.0, 0.0)
        } else {
            DVec3::new(self.cross_section, 0.0, 0.0)
        }
    }

    fn cell_volume(&self, _cell: usize) -> f64 {
        self.dx * self.cross_section
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_mesh_topology() {
        let mesh = LineMesh::unit(4);
        assert_eq!(mesh.n_cells(), 4);
        assert_eq!(mesh.n_faces(), 5);

        assert_eq!(mesh.face_owner(0), 0);
        assert_eq!(mesh.face_neighbour(0), None);

        assert_eq!(mesh.face_owner(1), 0);
        assert_eq!(mesh.face_neighbour(1), Some(1));

        assert_eq!(mesh.face_owner(3), 2);
        assert_eq!(mesh.face_neighbour(3), Some(3));

        assert_eq!(mesh.face_owner(4), 3);
        assert_eq!(mesh.face_neighbour(4), None);
    }

    #[test]
    fn test_line_mesh_geometry() {
        let mesh = LineMesh::new(10, 2.0, 0.5);
        assert!((mesh.dx() - 0.2).abs() < 1e-14);
        assert!((mesh.cell_volume(3) - 0.1).abs() < 1e-14);
        assert!((mesh.face_area(5).x - 0.5).abs() < 1e-14);
        assert!(mesh.face_area(0).x < 0.0);
        assert_eq!(mesh.face_weight(0), 1.0);
        assert_eq!(mesh.face_weight(5), 0.5);
    }
}
