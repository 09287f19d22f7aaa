use crate::compose::{Parallel, Stacked};
use crate::context::PipelineContext;
use crate::directive::Directive;
use crate::emission::Emission;
use crate::error::{CoreError, Result};
use crate::sealed::Sealed;
use alloc::borrow::Cow;
use alloc::format;

/// 描述 Stage 的元数据，辅助链路编排与可观测性。
///
/// # 契约说明（What）
/// - `name`：组件的稳定标识，建议使用 `vendor.component` 命名；
/// - `category`：可选分类（如 `codec`、`observability`、`heartbeat`）；
/// - `summary`：人类可读描述，便于平台 UI 展示。
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StageDescriptor {
    name: Cow<'static, str>,
    category: Cow<'static, str>,
    summary: Cow<'static, str>,
}

impl StageDescriptor {
    /// 构造新的描述对象。
    pub fn new(
        name: impl Into<Cow<'static, str>>,
        category: impl Into<Cow<'static, str>>,
        summary: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            summary: summary.into(),
        }
    }

    /// 构造匿名描述，常用于测试或快速原型。
    pub fn anonymous(role: impl Into<Cow<'static, str>>) -> Self {
        let role = role.into();
        Self {
            name: Cow::Owned(format!("anonymous.{}", role)),
            category: Cow::Borrowed("unspecified"),
            summary: Cow::Owned(format!("auto-generated descriptor for {}", role)),
        }
    }

    /// 获取名称。
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 获取类别。
    pub fn category(&self) -> &str {
        &self.category
    }

    /// 获取摘要。
    pub fn summary(&self) -> &str {
        &self.summary
    }
}

/// `PipePair` 是已实例化 Stage 的运行面：三个端口，每端口一次调用产出一段 [`Emission`]。
///
/// # 设计背景（Why）
/// - 一个协议层同时面对三类输入：上方注入的命令、下方注入的事件、带外的管理指令。
///   把三者收敛到同一类型上，组合运算才能把相邻 Stage 的产出互相回灌而不丢方向信息。
///
/// # 契约说明（What）
/// - 四个关联类型标定端口：`CommandIn`（上方命令）/ `CommandOut`（下方命令）/
///   `EventIn`（下方事件）/ `EventOut`（上方事件）；
/// - 三个操作均接收 `&mut self`：流水线是单线程协作式的，Stage 状态无需内部同步；
/// - 回调不得保留对输入值的引用超出本次调用；
/// - `on_management` 为全函数：不关心该指令的 Stage 返回空产出（“谢绝”），默认实现
///   即是如此。
///
/// # 失败语义（Failure）
/// - 返回 `Err` 将中止包裹本次注入的整个派发，由注入器决定如何呈现（见
///   [`crate::Injector`]）；管理路径的错误不被捕获，直接上抛给调用方。
///
/// # 风险提示（Trade-offs）
/// - 组合运算会在兄弟回调之间重入分发循环，但绝不会在某个回调执行期间重入该回调
///   自身；Stage 只需对“被组合重入”保持容忍，无需做重入保护。
pub trait PipePair {
    /// 上方命令端口的输入类型。
    type CommandIn;
    /// 下方命令端口的输出类型。
    type CommandOut;
    /// 下方事件端口的输入类型。
    type EventIn;
    /// 上方事件端口的输出类型。
    type EventOut;

    /// 变换一条来自上方的命令。
    fn on_command(
        &mut self,
        command: Self::CommandIn,
    ) -> Result<Emission<Self::EventOut, Self::CommandOut>, CoreError>;

    /// 变换一条来自下方的事件。
    fn on_event(
        &mut self,
        event: Self::EventIn,
    ) -> Result<Emission<Self::EventOut, Self::CommandOut>, CoreError>;

    /// 响应一条管理指令；缺省实现谢绝处理。
    fn on_management(
        &mut self,
        directive: &Directive,
    ) -> Result<Emission<Self::EventOut, Self::CommandOut>, CoreError> {
        let _ = directive;
        Ok(Emission::Empty)
    }
}

/// `Stage` 是流水线层的工厂：给定上下文，产出恰好一个 [`PipePair`]。
///
/// # 设计背景（Why）
/// - 工厂与运行面分离，配置（如最大帧长）停留在工厂，可变状态（如接收缓冲）在
///   `build` 时分配；同一工厂反复 `build` 即得到互相独立的流水线实例。
///
/// # 契约说明（What）
/// - `build` 在每条流水线上恰好被调用一次，调用发生在注入器建链阶段、进入事件
///   循环之前；
/// - 工厂可从 [`PipelineContext`] 检索能力（调度器、日志门面等）并克隆句柄交给
///   运行面持有。
///
/// # 风险提示（Trade-offs）
/// - 若 Stage 依赖昂贵的外部资源，建议在工厂外部缓存并经上下文能力注入，以降低
///   建链延迟。
pub trait Stage {
    /// 上方命令端口的输入类型。
    type CommandIn;
    /// 下方命令端口的输出类型。
    type CommandOut;
    /// 下方事件端口的输入类型。
    type EventIn;
    /// 上方事件端口的输出类型。
    type EventOut;
    /// 实例化后的运行面类型。
    type Pipes: PipePair<
            CommandIn = Self::CommandIn,
            CommandOut = Self::CommandOut,
            EventIn = Self::EventIn,
            EventOut = Self::EventOut,
        >;

    /// 实例化本层的运行面。
    fn build(&self, context: &PipelineContext) -> Self::Pipes;

    /// 返回 Stage 元数据，默认提供匿名描述。
    fn descriptor(&self) -> StageDescriptor {
        StageDescriptor::anonymous("stage")
    }
}

/// Stage 组合扩展：纵向堆叠与并联选流。
///
/// # 契约说明（What）
/// - `over`：把 `self` 叠在 `below` 之上，内侧端口成为不可见的内部接线；
/// - `paired_with`：取 `self` 的命令通路与 `event_side` 的事件通路合成单一 Stage，
///   两者四个端口类型必须完全一致。
///
/// 该 Trait 对所有 [`Stage`] 全量实现且被 sealed，外部不可另行实现。
pub trait StageExt: Stage + Sized + Sealed {
    /// 纵向组合：`self` 在上，`below` 在下。
    fn over<Below>(self, below: Below) -> Stacked<Self, Below>
    where
        Below: Stage<CommandIn = Self::CommandOut, EventOut = Self::EventIn>,
    {
        Stacked::new(self, below)
    }

    /// 并联组合：命令通路取 `self`，事件通路取 `event_side`。
    fn paired_with<EventSide>(self, event_side: EventSide) -> Parallel<Self, EventSide>
    where
        EventSide: Stage<
                CommandIn = Self::CommandIn,
                CommandOut = Self::CommandOut,
                EventIn = Self::EventIn,
                EventOut = Self::EventOut,
            >,
    {
        Parallel::new(self, event_side)
    }
}

impl<S: Stage> StageExt for S {}
