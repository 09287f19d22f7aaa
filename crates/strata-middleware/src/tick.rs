use alloc::sync::Arc;
use core::marker::PhantomData;
use core::time::Duration;

use strata_core::schedule::SchedulerHandle;
use strata_core::{
    CoreError, Directive, Emission, PipePair, PipelineContext, Stage, StageDescriptor,
};

/// 心跳指令的稳定类别标签。
pub const TICK_DIRECTIVE_KIND: &str = "strata.middleware.tick";

/// 心跳指令的载荷类型。
///
/// # 契约说明（What）
/// - 载荷本身不携带数据；周期信息由 [`TickStage`] 的配置决定；
/// - 通过 [`Tick::directive`] 构造标准指令，保证 `kind` 标签与载荷类型一致。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tick;

impl Tick {
    /// 构造标准的心跳管理指令。
    pub fn directive() -> Directive {
        Directive::new(TICK_DIRECTIVE_KIND, Tick)
    }
}

/// 心跳 Stage：数据路径恒等穿透，管理路径实现心跳自续期。
///
/// # 设计动机（Why）
/// - 周期性行为不属于分发内核：内核没有定时器，也不该有。心跳以“收到 `Tick` →
///   请求宿主延迟重投同一条 `Tick`”的方式自续期，定时能力完全由宿主经
///   [`SchedulerHandle`] 能力注入。
///
/// # 行为概览（How）
/// - `on_command` / `on_event`：单条目快速路径原样转发；
/// - `on_management`：收到 `Tick` 载荷时向调度器登记一次延迟重投，应答恒为空产出；
///   其他指令一律谢绝。
///
/// # 契约说明（What）
/// - **前置条件**：宿主应在建链前把 [`SchedulerHandle`] 注册进上下文；
/// - **降级行为**：能力缺失时 Stage 在建链阶段记一条 WARN 后保持纯透传——心跳是
///   旁路关注点，不应拖垮数据路径；
/// - **后置条件**：每收到一条 `Tick` 恰好登记一次重投，重投的指令与收到的指令共享
///   同一载荷。
#[derive(Clone, Debug)]
pub struct TickStage<Command, Event> {
    interval: Duration,
    _ports: PhantomData<fn(Command, Event)>,
}

impl<Command, Event> TickStage<Command, Event> {
    /// 以心跳周期构造 Stage。
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            _ports: PhantomData,
        }
    }

    /// 返回配置的心跳周期。
    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl<Command, Event> Stage for TickStage<Command, Event> {
    type CommandIn = Command;
    type CommandOut = Command;
    type EventIn = Event;
    type EventOut = Event;
    type Pipes = TickPipes<Command, Event>;

    fn build(&self, context: &PipelineContext) -> Self::Pipes {
        let scheduler = context.capability::<SchedulerHandle>();
        if scheduler.is_none() {
            context.logger().warn(
                "tick stage built without a scheduler capability, heartbeat stays passive",
                &[],
            );
        }
        TickPipes {
            interval: self.interval,
            scheduler,
            _ports: PhantomData,
        }
    }

    fn descriptor(&self) -> StageDescriptor {
        StageDescriptor::new(
            "strata.middleware.tick",
            "heartbeat",
            "心跳指令的周期性自续期",
        )
    }
}

/// 心跳 Stage 的运行面。
pub struct TickPipes<Command, Event> {
    interval: Duration,
    scheduler: Option<Arc<SchedulerHandle>>,
    _ports: PhantomData<fn(Command, Event)>,
}

impl<Command, Event> PipePair for TickPipes<Command, Event> {
    type CommandIn = Command;
    type CommandOut = Command;
    type EventIn = Event;
    type EventOut = Event;

    fn on_command(&mut self, command: Command) -> Result<Emission<Event, Command>, CoreError> {
        Ok(Emission::OneCommand(command))
    }

    fn on_event(&mut self, event: Event) -> Result<Emission<Event, Command>, CoreError> {
        Ok(Emission::OneEvent(event))
    }

    fn on_management(
        &mut self,
        directive: &Directive,
    ) -> Result<Emission<Event, Command>, CoreError> {
        if directive.is::<Tick>()
            && let Some(handle) = &self.scheduler
        {
            handle.scheduler().schedule(self.interval, directive.clone());
        }
        Ok(Emission::Empty)
    }
}
