//! Stage 组合代数：纵向堆叠与并联选流。
//!
//! # 设计背景（Why）
//! - 组合产生的新 Stage **拥有**它的两个子 Stage：父驱动子，子不回指父，所有权天然
//!   构成无环的树形结构；
//! - 纵向组合承载分发内核——上层的向下产出回灌给下层命令端口，下层的向上产出回灌给
//!   上层事件端口，分发循环在组合深度内递归重入；
//! - 并联组合不含内部接线：它只是从两个端口类型完全一致的 Stage 中各取一条通路。
//!
//! # 模块说明（What）
//! - [`vertical`]：[`Stacked`] 与递归分发循环；
//! - [`parallel`]：[`Parallel`] 与管理合并。

pub mod parallel;
pub mod vertical;

pub use parallel::Parallel;
pub use vertical::Stacked;
