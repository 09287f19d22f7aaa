#![cfg_attr(not(feature = "std"), no_std)]
#![doc = "strata-core: 分层协议流水线引擎的核心契约。"]
#![doc = ""]
#![doc = "流水线由若干 Stage 纵向堆叠而成：命令自上而下流向线缆，事件自下而上流向应用，"]
#![doc = "管理指令经带外端口广播到每个原子 Stage。本 crate 只定义组合代数与分发内核，"]
#![doc = "传输 I/O、重试、持久化与跨线程调度均由宿主承担。"]

extern crate alloc;

mod sealed;

pub mod compose;
pub mod context;
pub mod directive;
pub mod emission;
pub mod error;
pub mod injector;
pub mod observability;
pub mod prelude;
pub mod schedule;
pub mod stage;

pub use compose::{Parallel, Stacked};
pub use context::PipelineContext;
pub use directive::Directive;
pub use emission::{Emission, EmissionItem};
pub use error::{CoreError, ErrorCause, Result, codes};
pub use injector::{CommandSink, EventSink, Injector, PipelineBuilder};
pub use observability::{
    AttributeSet, AttributeValue, KeyValue, LogRecord, LogSeverity, Logger, NopLogger,
};
pub use schedule::{DirectiveScheduler, SchedulerHandle};
pub use stage::{PipePair, Stage, StageDescriptor, StageExt};

use alloc::boxed::Box;
use core::fmt;

/// `strata-core` 中所有错误必须实现的 `no_std` 基础 Trait。
///
/// # 设计背景（Why）
/// - `std::error::Error` 在 `no_std` 环境中不可用，因此需要一个对象安全、与平台无关的
///   错误抽象来串联底层错误链。
/// - 引擎对 Stage 抛出的错误值保持透明（见 [`error`] 模块），该 Trait 是它们的最小公共接口。
///
/// # 契约说明（What）
/// - 实现者必须提供 `Debug` 与 `Display`，便于日志与可观测性收集。
/// - `source` 递归返回链路上的上游错误，语义与 `std::error::Error::source` 一致。
/// - `source` 返回引用的生命周期受限于 `self`，以防悬垂引用。
///
/// # 设计取舍与风险（Trade-offs）
/// - 未引入 `Send + Sync` 约束，避免对 `no_std` 设备强加多余负担；需要跨线程传递时
///   请使用 [`ErrorCause`] 类型别名。
pub trait Error: fmt::Debug + fmt::Display {
    /// 返回当前错误的上游来源。
    fn source(&self) -> Option<&(dyn Error + 'static)>;
}

impl<E> Error for Box<E>
where
    E: Error + ?Sized,
{
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        (**self).source()
    }
}
