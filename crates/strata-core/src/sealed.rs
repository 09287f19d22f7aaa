//! 内部 sealed 模块用于控制外部扩展边界。
//!
//! # 设计背景（Why）
//! - 组合扩展 Trait（如 [`crate::stage::StageExt`]）依赖全量 blanket 实现，外部若能再次
//!   实现将破坏组合代数的封闭性。
//!
//! # 逻辑解析（How）
//! - 定义私有模块级 Trait `Sealed`，并对所有类型提供 blanket 实现；
//! - 需要封闭的公开 Trait 通过 `: crate::sealed::Sealed` 间接依赖该标记。
//!
//! # 契约说明（What）
//! - `Sealed` 无需调用方显式实现；任意类型默认满足该约束。

pub trait Sealed {}

impl<T: ?Sized> Sealed for T {}
