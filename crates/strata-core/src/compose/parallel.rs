use crate::context::PipelineContext;
use crate::directive::Directive;
use crate::emission::Emission;
use crate::error::{CoreError, Result};
use crate::stage::{PipePair, Stage, StageDescriptor};

/// 并联组合：命令通路取一个 Stage，事件通路取另一个，合成单一 Stage。
///
/// # 设计背景（Why）
/// - 某些部署里两条方向的处理由不同实现承担（例如下行走加密、上行走旁路验证），
///   但对外仍应呈现为一个端口类型不变的层。并联组合从两个端口类型完全一致的
///   Stage 中各取一条通路，被弃用的半边按构造即不可达，无需任何分发。
///
/// # 契约说明（What）
/// - 两个子 Stage 的四个端口类型必须完全一致，组合结果与子 Stage 同型；
/// - `on_command` 只委托命令侧，`on_event` 只委托事件侧；
/// - `on_management` 两侧都应用，命令侧应答拼在事件侧应答之前。
#[derive(Clone, Debug)]
pub struct Parallel<CommandSide, EventSide> {
    command_side: CommandSide,
    event_side: EventSide,
}

impl<CommandSide, EventSide> Parallel<CommandSide, EventSide> {
    /// 构造并联组合：命令通路取 `command_side`，事件通路取 `event_side`。
    pub fn new(command_side: CommandSide, event_side: EventSide) -> Self {
        Self {
            command_side,
            event_side,
        }
    }
}

impl<CommandSide, EventSide> Stage for Parallel<CommandSide, EventSide>
where
    CommandSide: Stage,
    EventSide: Stage<
            CommandIn = CommandSide::CommandIn,
            CommandOut = CommandSide::CommandOut,
            EventIn = CommandSide::EventIn,
            EventOut = CommandSide::EventOut,
        >,
{
    type CommandIn = CommandSide::CommandIn;
    type CommandOut = CommandSide::CommandOut;
    type EventIn = CommandSide::EventIn;
    type EventOut = CommandSide::EventOut;
    type Pipes = ParallelPipes<CommandSide::Pipes, EventSide::Pipes>;

    fn build(&self, context: &PipelineContext) -> Self::Pipes {
        ParallelPipes {
            command_side: self.command_side.build(context),
            event_side: self.event_side.build(context),
        }
    }

    fn descriptor(&self) -> StageDescriptor {
        StageDescriptor::anonymous("parallel")
    }
}

/// 并联组合的运行面：纯委托，无内部接线。
pub struct ParallelPipes<CommandPipes, EventPipes> {
    command_side: CommandPipes,
    event_side: EventPipes,
}

impl<CommandPipes, EventPipes> PipePair for ParallelPipes<CommandPipes, EventPipes>
where
    CommandPipes: PipePair,
    EventPipes: PipePair<
            CommandIn = CommandPipes::CommandIn,
            CommandOut = CommandPipes::CommandOut,
            EventIn = CommandPipes::EventIn,
            EventOut = CommandPipes::EventOut,
        >,
{
    type CommandIn = CommandPipes::CommandIn;
    type CommandOut = CommandPipes::CommandOut;
    type EventIn = CommandPipes::EventIn;
    type EventOut = CommandPipes::EventOut;

    fn on_command(
        &mut self,
        command: Self::CommandIn,
    ) -> Result<Emission<Self::EventOut, Self::CommandOut>, CoreError> {
        self.command_side.on_command(command)
    }

    fn on_event(
        &mut self,
        event: Self::EventIn,
    ) -> Result<Emission<Self::EventOut, Self::CommandOut>, CoreError> {
        self.event_side.on_event(event)
    }

    fn on_management(
        &mut self,
        directive: &Directive,
    ) -> Result<Emission<Self::EventOut, Self::CommandOut>, CoreError> {
        let command_reply = self.command_side.on_management(directive)?;
        let event_reply = self.event_side.on_management(directive)?;
        Ok(command_reply.concat(event_reply))
    }
}
