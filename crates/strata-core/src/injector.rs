use crate::context::PipelineContext;
use crate::directive::Directive;
use crate::emission::{Emission, EmissionItem};
use crate::error::{CoreError, Result};
use crate::stage::{PipePair, Stage};
use alloc::sync::Arc;

/// 栈底命令 Sink：接收穿出流水线底部的终端命令，或承接本次注入的失败。
///
/// # 契约说明（What）
/// - 两个端口都在注入调用内同步触发；
/// - `on_command_failure` 收到的正是 Stage 构造的原始错误值，引擎不加包装；
///   Sink 自行决定如何呈现（记录、转抛、计数）。
pub trait CommandSink {
    /// 终端命令的类型。
    type Command;

    /// 接收一条穿出底部的命令。
    fn on_command(&mut self, command: Self::Command);

    /// 承接一次命令注入的失败。
    fn on_command_failure(&mut self, error: CoreError);
}

/// 栈顶事件 Sink：接收穿出流水线顶部的终端事件，或承接本次注入的失败。
///
/// 契约与 [`CommandSink`] 对称。
pub trait EventSink {
    /// 终端事件的类型。
    type Event;

    /// 接收一条穿出顶部的事件。
    fn on_event(&mut self, event: Self::Event);

    /// 承接一次事件注入的失败。
    fn on_event_failure(&mut self, error: CoreError);
}

/// 一次性建链器：根 Stage + 上下文 + 两个 Sink → [`Injector`]。
///
/// # 设计背景（Why）
/// - 建链是一次性动作：根工厂恰好被调用一次，上下文在建链前完成能力注册。把这些
///   前置步骤收敛到 Builder，注入器本身便只剩热路径操作。
///
/// # 契约说明（What）
/// - 未显式提供上下文时，`build` 会创建一个缺省 [`PipelineContext`]；
/// - `build` 消费 Builder，重复建链请再次从工厂构造 Builder。
pub struct PipelineBuilder<Root, Commands, Events> {
    root: Root,
    context: Option<Arc<PipelineContext>>,
    commands: Commands,
    events: Events,
}

impl<Root, Commands, Events> PipelineBuilder<Root, Commands, Events>
where
    Root: Stage,
    Commands: CommandSink<Command = Root::CommandOut>,
    Events: EventSink<Event = Root::EventOut>,
{
    /// 以根 Stage 与两个终端 Sink 开始建链。
    pub fn new(root: Root, commands: Commands, events: Events) -> Self {
        Self {
            root,
            context: None,
            commands,
            events,
        }
    }

    /// 指定流水线上下文（通常已注册好宿主能力）。
    pub fn with_context(mut self, context: Arc<PipelineContext>) -> Self {
        self.context = Some(context);
        self
    }

    /// 实例化根 Stage 并返回注入器。
    pub fn build(self) -> Injector<Root::Pipes, Commands, Events> {
        let context = self
            .context
            .unwrap_or_else(|| Arc::new(PipelineContext::new()));
        let pipes = self.root.build(&context);
        Injector {
            pipes,
            context,
            commands: self.commands,
            events: self.events,
        }
    }
}

/// `Injector` 是建成流水线的外部注入句柄。
///
/// # 设计背景（Why）
/// - 宿主（事件循环、传输适配层、测试夹具）通过同一句柄注入三类输入；终端产出
///   在注入调用返回前同步派发给对应 Sink，顺序与分发循环产出顺序一致。
///
/// # 失败语义（Failure）
/// - `inject_command` 失败送达**命令** Sink，`inject_event` 失败送达**事件** Sink，
///   该次注入不再派发任何条目；
/// - `management` 的失败不被捕获，原样上抛给调用方。
///
/// # 契约说明（What）
/// - 单条目产出按变体直接路由，不经过容器物化；
/// - 注入器拥有根运行面与上下文，随句柄释放一并销毁。
pub struct Injector<Pipes, Commands, Events>
where
    Pipes: PipePair,
    Commands: CommandSink<Command = Pipes::CommandOut>,
    Events: EventSink<Event = Pipes::EventOut>,
{
    pipes: Pipes,
    context: Arc<PipelineContext>,
    commands: Commands,
    events: Events,
}

impl<Pipes, Commands, Events> Injector<Pipes, Commands, Events>
where
    Pipes: PipePair,
    Commands: CommandSink<Command = Pipes::CommandOut>,
    Events: EventSink<Event = Pipes::EventOut>,
{
    /// 从顶部注入一条命令。
    pub fn inject_command(&mut self, command: Pipes::CommandIn) {
        match self.pipes.on_command(command) {
            Ok(emission) => self.deliver(emission),
            Err(error) => self.commands.on_command_failure(error),
        }
    }

    /// 从底部注入一条事件。
    pub fn inject_event(&mut self, event: Pipes::EventIn) {
        match self.pipes.on_event(event) {
            Ok(emission) => self.deliver(emission),
            Err(error) => self.events.on_event_failure(error),
        }
    }

    /// 注入一条管理指令；Stage 抛出的错误直接上抛。
    pub fn management(&mut self, directive: &Directive) -> Result<(), CoreError> {
        let emission = self.pipes.on_management(directive)?;
        self.deliver(emission);
        Ok(())
    }

    /// 访问流水线上下文。
    pub fn context(&self) -> &PipelineContext {
        &self.context
    }

    /// 借用命令 Sink，供宿主在注入间隙读取或冲刷。
    pub fn command_sink(&self) -> &Commands {
        &self.commands
    }

    /// 借用事件 Sink，供宿主在注入间隙读取或冲刷。
    pub fn event_sink(&self) -> &Events {
        &self.events
    }

    /// 按产出顺序把终端条目派发给对应 Sink。
    fn deliver(&mut self, emission: Emission<Pipes::EventOut, Pipes::CommandOut>) {
        match emission {
            Emission::Empty => {}
            Emission::OneEvent(event) => self.events.on_event(event),
            Emission::OneCommand(command) => self.commands.on_command(command),
            Emission::Many(items) => {
                for item in items {
                    match item {
                        EmissionItem::UpEvent(event) => self.events.on_event(event),
                        EmissionItem::DownCommand(command) => self.commands.on_command(command),
                    }
                }
            }
        }
    }
}
