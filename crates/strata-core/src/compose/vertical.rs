use crate::context::PipelineContext;
use crate::directive::Directive;
use crate::emission::{Emission, EmissionItem};
use crate::error::{CoreError, Result};
use crate::stage::{PipePair, Stage, StageDescriptor};
use alloc::vec::Vec;

/// 纵向组合：把上层 Stage 叠在下层 Stage 之上，对外表现为单一 Stage。
///
/// # 设计背景（Why）
/// - 协议栈的本质是层与层的垂直堆叠：上层的下行命令是下层的输入，下层的上行事件是
///   上层的输入。组合后内侧端口（上层的 `CommandOut` / `EventIn`）成为纯内部接线，
///   边界上只剩上层的上侧端口与下层的下侧端口。
///
/// # 契约说明（What）
/// - 类型约束：`Below: Stage<CommandIn = Above::CommandOut, EventOut = Above::EventIn>`；
/// - `build` 对两个子工厂各调用一次，共享同一 [`PipelineContext`]；
/// - 组合 Stage 拥有两个子 Stage，树形所有权、无环。
#[derive(Clone, Debug)]
pub struct Stacked<Above, Below> {
    above: Above,
    below: Below,
}

impl<Above, Below> Stacked<Above, Below> {
    /// 以“`above` 在上、`below` 在下”的次序构造纵向组合。
    pub fn new(above: Above, below: Below) -> Self {
        Self { above, below }
    }
}

impl<Above, Below> Stage for Stacked<Above, Below>
where
    Above: Stage,
    Below: Stage<CommandIn = Above::CommandOut, EventOut = Above::EventIn>,
{
    type CommandIn = Above::CommandIn;
    type CommandOut = Below::CommandOut;
    type EventIn = Below::EventIn;
    type EventOut = Above::EventOut;
    type Pipes = StackedPipes<Above::Pipes, Below::Pipes>;

    fn build(&self, context: &PipelineContext) -> Self::Pipes {
        StackedPipes {
            above: self.above.build(context),
            below: self.below.build(context),
        }
    }

    fn descriptor(&self) -> StageDescriptor {
        StageDescriptor::anonymous("stacked")
    }
}

/// 纵向组合的运行面：两个子 `PipePair` 加上递归分发循环，二者之间没有任何缓冲。
///
/// # 逻辑解析（How）
/// - 命令路径：`on_command` 先调用上层回调，再由 [`flow_down`] 路由其产出；
/// - 事件路径：`on_event` 先调用下层回调，再由 [`flow_up`] 路由其产出；
/// - 管理路径：先收集两个子回调的应答，再分别沿正常分发循环路由，上层结果拼在
///   下层结果之前。
///
/// # 失败语义（Failure）
/// - 任一子回调返回 `Err` 时立即沿调用栈上抛，已收集的兄弟条目全部丢弃，不做部分
///   交付。
pub struct StackedPipes<AbovePipes, BelowPipes> {
    above: AbovePipes,
    below: BelowPipes,
}

impl<AbovePipes, BelowPipes> PipePair for StackedPipes<AbovePipes, BelowPipes>
where
    AbovePipes: PipePair,
    BelowPipes: PipePair<CommandIn = AbovePipes::CommandOut, EventOut = AbovePipes::EventIn>,
{
    type CommandIn = AbovePipes::CommandIn;
    type CommandOut = BelowPipes::CommandOut;
    type EventIn = BelowPipes::EventIn;
    type EventOut = AbovePipes::EventOut;

    fn on_command(
        &mut self,
        command: Self::CommandIn,
    ) -> Result<Emission<Self::EventOut, Self::CommandOut>, CoreError> {
        let produced = self.above.on_command(command)?;
        flow_down(&mut self.above, &mut self.below, produced)
    }

    fn on_event(
        &mut self,
        event: Self::EventIn,
    ) -> Result<Emission<Self::EventOut, Self::CommandOut>, CoreError> {
        let produced = self.below.on_event(event)?;
        flow_up(&mut self.above, &mut self.below, produced)
    }

    fn on_management(
        &mut self,
        directive: &Directive,
    ) -> Result<Emission<Self::EventOut, Self::CommandOut>, CoreError> {
        // 先对两个子 Stage 各应用一次指令，再路由应答：扇出次序与路由次序解耦，
        // 保证每个原子 Stage 每次顶层管理注入恰好收到一次指令。
        let above_reply = self.above.on_management(directive)?;
        let below_reply = self.below.on_management(directive)?;
        let routed_above = flow_down(&mut self.above, &mut self.below, above_reply)?;
        let routed_below = flow_up(&mut self.above, &mut self.below, below_reply)?;
        Ok(routed_above.concat(routed_below))
    }
}

/// 路由上层 Stage 的产出：下行条目回灌下层命令端口，上行条目原样穿出。
///
/// # 逻辑解析（How）
/// - `Empty` 与 `OneEvent` 直接穿出，后者保持快速路径、全程零分配；
/// - `OneCommand` 回灌下层，其应答交由 [`flow_up`] 继续路由——当递归结果是唯一
///   返回值时按原样透传，端到端保住快速路径；
/// - `Many` 逐条目保序处理：每个下行条目触发的子派发在其产生位置整体并入输出，
///   不与兄弟条目交错；途中产生的上行条目**不**重入上层，直接向上穿出。
///
/// # 契约说明（What）
/// - 嵌套派发的结果在并入前经 [`Emission::append_into`] 立即物化，消除“先追加、
///   后读取”之间的别名窗口；
/// - 递归深度以组合深度为界：同一实例化的 `flow_down`/`flow_up` 互相调用，不产生
///   新的单态化实例。
fn flow_down<AbovePipes, BelowPipes>(
    above: &mut AbovePipes,
    below: &mut BelowPipes,
    produced: Emission<AbovePipes::EventOut, AbovePipes::CommandOut>,
) -> Result<Emission<AbovePipes::EventOut, BelowPipes::CommandOut>, CoreError>
where
    AbovePipes: PipePair,
    BelowPipes: PipePair<CommandIn = AbovePipes::CommandOut, EventOut = AbovePipes::EventIn>,
{
    match produced {
        Emission::Empty => Ok(Emission::Empty),
        Emission::OneEvent(event) => Ok(Emission::OneEvent(event)),
        Emission::OneCommand(command) => {
            let replies = below.on_command(command)?;
            flow_up(above, below, replies)
        }
        Emission::Many(items) => {
            let mut routed = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    EmissionItem::DownCommand(command) => {
                        let replies = below.on_command(command)?;
                        flow_up(above, below, replies)?.append_into(&mut routed);
                    }
                    EmissionItem::UpEvent(event) => {
                        routed.push(EmissionItem::UpEvent(event));
                    }
                }
            }
            Ok(Emission::from_items(routed))
        }
    }
}

/// 路由下层 Stage 的产出：上行条目回灌上层事件端口，下行条目原样穿出。
///
/// [`flow_down`] 的镜像；上层事件回调的产出再交回 [`flow_down`] 路由，由此构成
/// 有界的相互递归。
fn flow_up<AbovePipes, BelowPipes>(
    above: &mut AbovePipes,
    below: &mut BelowPipes,
    produced: Emission<BelowPipes::EventOut, BelowPipes::CommandOut>,
) -> Result<Emission<AbovePipes::EventOut, BelowPipes::CommandOut>, CoreError>
where
    AbovePipes: PipePair,
    BelowPipes: PipePair<CommandIn = AbovePipes::CommandOut, EventOut = AbovePipes::EventIn>,
{
    match produced {
        Emission::Empty => Ok(Emission::Empty),
        Emission::OneCommand(command) => Ok(Emission::OneCommand(command)),
        Emission::OneEvent(event) => {
            let replies = above.on_event(event)?;
            flow_down(above, below, replies)
        }
        Emission::Many(items) => {
            let mut routed = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    EmissionItem::UpEvent(event) => {
                        let replies = above.on_event(event)?;
                        flow_down(above, below, replies)?.append_into(&mut routed);
                    }
                    EmissionItem::DownCommand(command) => {
                        routed.push(EmissionItem::DownCommand(command));
                    }
                }
            }
            Ok(Emission::from_items(routed))
        }
    }
}
