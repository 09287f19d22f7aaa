use crate::directive::Directive;
use alloc::sync::Arc;
use core::fmt;
use core::time::Duration;

/// `DirectiveScheduler` 定义宿主提供的延迟重投能力。
///
/// # 设计背景（Why）
/// - 引擎内核不含定时器：周期性行为（如心跳）由 Stage 通过上下文能力向宿主申请。
///   该 Trait 是宿主时间驱动在流水线侧的最小投影，仅保留“延迟后把指令送回管理
///   端口”这一个操作。
///
/// # 契约说明（What）
/// - **输入**：`delay` 为相对延迟；`directive` 为到期后重投的指令；
/// - **后置条件**：到期后宿主应以与外部调用等价的方式调用注入器的管理入口；
///   定时器的取消与精度由宿主自行约定。
///
/// # 风险提示（Trade-offs）
/// - 接口对象安全、无返回句柄，意味着 Stage 无法撤销已登记的重投；需要撤销语义的
///   宿主可在能力实现内部做代际过滤。
pub trait DirectiveScheduler: Send + Sync + 'static {
    /// 在 `delay` 之后把 `directive` 重投回本流水线的管理端口。
    fn schedule(&self, delay: Duration, directive: Directive);
}

/// 能力仓库中的调度器句柄新类型。
///
/// # 契约说明（What）
/// - [`crate::PipelineContext`] 的能力仓库按具体类型检索，trait 对象无法直接作键；
///   本新类型承载 `Arc<dyn DirectiveScheduler>` 并作为注册与检索的键类型。
pub struct SchedulerHandle {
    scheduler: Arc<dyn DirectiveScheduler>,
}

impl SchedulerHandle {
    /// 包装宿主调度器。
    pub fn new(scheduler: Arc<dyn DirectiveScheduler>) -> Self {
        Self { scheduler }
    }

    /// 借用底层调度器。
    pub fn scheduler(&self) -> &dyn DirectiveScheduler {
        self.scheduler.as_ref()
    }
}

impl fmt::Debug for SchedulerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchedulerHandle").finish_non_exhaustive()
    }
}
