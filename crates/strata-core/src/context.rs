use crate::emission::Emission;
use crate::observability::{Logger, NopLogger};
use alloc::collections::BTreeMap;
use alloc::sync::Arc;
use core::any::{Any, TypeId};
use core::fmt;
use spin::RwLock;

/// `PipelineContext` 是单条流水线的进程内状态：能力注入点与产出助手的宿主。
///
/// # 设计背景（Why）
/// - Stage 工厂在实例化阶段需要获取宿主能力（如定时调度、日志门面），这些能力因
///   流水线而异，不应烧进 Stage 类型签名；以 `TypeId` 为键的能力仓库让 Stage 按需
///   声明、宿主按需提供。
/// - 产出助手（`single_command` 等）是 Stage 作者面向的稳定表达面：助手构造的值
///   即是分发内核识别的快速路径形态，不经过任何共享槽位。
///
/// # 逻辑解析（How）
/// - 能力仓库为 `TypeId → Arc<dyn Any + Send + Sync>` 映射，读写经 `spin::RwLock`
///   保护，宿主可在建链前后补充注册；
/// - 日志门面以 `Arc<dyn Logger>` 注入，缺省为 [`NopLogger`]。
///
/// # 契约说明（What）
/// - **生命周期**：每条流水线恰好一个 `PipelineContext`，随流水线句柄释放而销毁；
/// - **线程契约**：流水线分发是单线程协作式的；跨流水线共享同一 Context 属使用错误，
///   引擎不做检测；
/// - **能力键**：按值的具体类型检索，建议通过新类型封装避免碰撞。
///
/// # 风险提示（Trade-offs）
/// - 能力仓库按 `TypeId` 有序存储，检索为对数复杂度；能力获取发生在建链阶段而非
///   热路径，换取 `no_std` 下零额外依赖。
pub struct PipelineContext {
    logger: Arc<dyn Logger>,
    capabilities: RwLock<BTreeMap<TypeId, Arc<dyn Any + Send + Sync>>>,
}

impl PipelineContext {
    /// 构造缺省上下文：空能力仓库 + 空日志门面。
    pub fn new() -> Self {
        Self::with_logger(Arc::new(NopLogger))
    }

    /// 以指定日志门面构造上下文。
    pub fn with_logger(logger: Arc<dyn Logger>) -> Self {
        Self {
            logger,
            capabilities: RwLock::new(BTreeMap::new()),
        }
    }

    /// 借用日志门面。
    pub fn logger(&self) -> &dyn Logger {
        self.logger.as_ref()
    }

    /// 克隆日志门面句柄，供 Stage 在回调中长期持有。
    pub fn logger_handle(&self) -> Arc<dyn Logger> {
        Arc::clone(&self.logger)
    }

    /// 注册一项能力，键为值的具体类型。
    ///
    /// # 契约说明
    /// - 同类型重复注册时后者覆盖前者；
    /// - 值需满足 `Send + Sync + 'static`，以便经 `Arc` 在工厂与 Stage 间共享。
    pub fn provide<T>(&self, capability: T)
    where
        T: Any + Send + Sync,
    {
        self.capabilities
            .write()
            .insert(TypeId::of::<T>(), Arc::new(capability));
    }

    /// 按类型检索能力，返回共享句柄。
    pub fn capability<T>(&self) -> Option<Arc<T>>
    where
        T: Any + Send + Sync,
    {
        let guard = self.capabilities.read();
        let entry = guard.get(&TypeId::of::<T>())?;
        Arc::clone(entry).downcast::<T>().ok()
    }

    /// 构造单命令产出，作为回调的终结表达式使用。
    pub fn single_command<E, C>(&self, command: C) -> Emission<E, C> {
        Emission::OneCommand(command)
    }

    /// 构造单事件产出，作为回调的终结表达式使用。
    pub fn single_event<E, C>(&self, event: E) -> Emission<E, C> {
        Emission::OneEvent(event)
    }

    /// 构造空产出。
    pub fn nothing<E, C>(&self) -> Emission<E, C> {
        Emission::Empty
    }

    /// 去别名：把快速路径产出物化为独立的单条目产出。
    ///
    /// # 契约说明
    /// - 快速路径在本实现中以值承载（见 [`Emission`]），不存在共享槽位，单条目变体
    ///   本身就是独立值；因此该操作恒等返回，保留在契约面上只为与分发内核的转发
    ///   步骤一一对应。
    pub fn dealias<E, C>(&self, emission: Emission<E, C>) -> Emission<E, C> {
        emission
    }
}

impl Default for PipelineContext {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PipelineContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineContext")
            .field("capabilities", &self.capabilities.read().len())
            .finish()
    }
}
