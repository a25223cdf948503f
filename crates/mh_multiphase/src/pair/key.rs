// crates/mh_multiphase/src/pair/key.rs

//! 相对键
//!
//! - 有序键 `(A in B)`：A 为分散相，B 为连续相，`(A in B) != (B in A)`
//! - 无序键 `(A and B)`：`(A and B) == (B and A)`
//! - 有序键与无序键永不相等
//!
//! # 哈希
//!
//! 每个相名先做 64 位 FNV-1a，再组合：
//!
//! - 无序：`h(A) + h(B)`（回绕加法，可交换）
//! - 有序：`rotl(h(A), 29) ^ h(B) ^ ORDERED_SALT`（不可交换）
//!
//! 与相等关系一致：相等的键哈希相同。

use crate::error::{PhaseSystemError, PhaseSystemResult};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;
const ORDERED_SALT: u64 = 0x9e37_79b9_7f4a_7c15;

/// 64 位 FNV-1a
pub fn fnv1a(s: &str) -> u64 {
    s.bytes()
        .fold(FNV_OFFSET, |h, b| (h ^ u64::from(b)).wrapping_mul(FNV_PRIME))
}

/// 相对键
#[derive(Debug, Clone)]
pub struct PhasePairKey {
    first: String,
    second: String,
    ordered: bool,
}

impl PhasePairKey {
    /// 创建键
    pub fn new(first: impl Into<String>, second: impl Into<String>, ordered: bool) -> Self {
        Self {
            first: first.into(),
            second: second.into(),
            ordered,
        }
    }

    /// 有序键：`dispersed` 分散于 `continuous`
    pub fn ordered(dispersed: impl Into<String>, continuous: impl Into<String>) -> Self {
        Self::new(dispersed, continuous, true)
    }

    /// 无序键
    pub fn unordered(a: impl Into<String>, b: impl Into<String>) -> Self {
        Self::new(a, b, false)
    }

    /// 第一相名（有序时为分散相）
    pub fn first(&self) -> &str {
        &self.first
    }

    /// 第二相名（有序时为连续相）
    pub fn second(&self) -> &str {
        &self.second
    }

    /// 是否有序
    pub fn is_ordered(&self) -> bool {
        self.ordered
    }

    /// 对应的无序键（保持名称顺序）
    pub fn unordered_key(&self) -> Self {
        Self::unordered(self.first.clone(), self.second.clone())
    }

    /// 交换两相
    pub fn swapped(&self) -> Self {
        Self::new(self.second.clone(), self.first.clone(), self.ordered)
    }

    /// 是否包含该相
    pub fn contains(&self, phase: &str) -> bool {
        self.first == phase || self.second == phase
    }

    /// 另一相名
    pub fn other(&self, phase: &str) -> Option<&str> {
        if self.first == phase {
            Some(&self.second)
        } else if self.second == phase {
            Some(&self.first)
        } else {
            None
        }
    }

    /// 解析相对描述
    ///
    /// 接受 `A in B`、`A and B`，可带外层括号。
    pub fn parse(spec: &str) -> PhaseSystemResult<Self> {
        let invalid = || PhaseSystemError::InvalidPairSpec {
            spec: spec.to_string(),
        };

        let mut body = spec.trim();
        if let Some(inner) = body.strip_prefix('(') {
            body = inner.strip_suffix(')').ok_or_else(invalid)?.trim();
        }

        let words: Vec<&str> = body.split_whitespace().collect();
        let (first, op, second) = match words.as_slice() {
            [a, op, b] => (*a, *op, *b),
            _ => return Err(invalid()),
        };
        if first == second {
            return Err(invalid());
        }
        match op {
            "in" => Ok(Self::ordered(first, second)),
            "and" => Ok(Self::unordered(first, second)),
            _ => Err(invalid()),
        }
    }

    /// 组合哈希
    pub fn combined_hash(&self) -> u64 {
        let h1 = fnv1a(&self.first);
        let h2 = fnv1a(&self.second);
        if self.ordered {
            h1.rotate_left(29) ^ h2 ^ ORDERED_SALT
        } else {
            h1.wrapping_add(h2)
        }
    }
}

/// 创建相对键
pub fn make_key(a: &str, b: &str, ordered: bool) -> PhasePairKey {
    PhasePairKey::new(a, b, ordered)
}

impl PartialEq for PhasePairKey {
    fn eq(&self, other: &Self) -> bool {
        if self.ordered != other.ordered {
            return false;
        }
        let same = self.first == other.first && self.second == other.second;
        if self.ordered {
            same
        } else {
            same || (self.first == other.second && self.second == other.first)
        }
    }
}

impl Eq for PhasePairKey {}

impl Hash for PhasePairKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.combined_hash());
    }
}

impl fmt::Display for PhasePairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = if self.ordered { "in" } else { "and" };
        write!(f, "({} {} {})", self.first, op, self.second)
    }
}

impl FromStr for PhasePairKey {
    type Err = PhaseSystemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
