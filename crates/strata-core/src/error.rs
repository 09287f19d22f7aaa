use crate::Error;
use alloc::borrow::Cow;
use alloc::boxed::Box;
use core::fmt;

/// `CoreError` 表示跨层共享的稳定错误域，是所有可观察错误的最终形态。
///
/// # 设计背景（Why）
/// - 分发内核对 Stage 抛出的错误保持透明：引擎自身不定义错误分类，只负责把 Stage
///   构造的错误原封不动地送达 Sink 或管理调用方。稳定错误码让日志与告警系统能够
///   执行机器可读的根因识别。
/// - 框架需兼容 `no_std + alloc` 场景，因此不依赖 `std::error::Error`，而是复用
///   crate 内部定义的轻量 [`Error`] 抽象。
///
/// # 逻辑解析（How）
/// - 结构体以 Builder 风格方法叠加底层原因，并通过 `source()` 暴露完整链路；
/// - 错误码 `code` 始终为 `'static` 字符串，承载稳定语义；`message` 面向排障人员。
///
/// # 契约说明（What）
/// - **前置条件**：调用方必须使用 [`codes`] 模块或遵循 `<域>.<语义>` 约定的自定义码值。
/// - **返回值**：构造函数返回拥有所有权的 `CoreError`，可安全跨线程移动。
/// - **后置条件**：除非显式调用 `with_cause`，错误不会包含额外上下文。
///
/// # 设计取舍与风险（Trade-offs）
/// - 采用 `Cow` 保存消息，静态文案零分配，动态描述仅一次堆分配。
#[derive(Debug)]
pub struct CoreError {
    code: &'static str,
    message: Cow<'static, str>,
    cause: Option<ErrorCause>,
}

/// `ErrorCause` 封装底层原因，保持 `Send + Sync` 以方便跨线程传递。
pub type ErrorCause = Box<dyn Error + Send + Sync + 'static>;

/// `Result` 为框架统一的返回值别名，默认错误类型为 [`CoreError`]。
///
/// # 契约说明（What）
/// - 行为与标准库 `Result` 完全一致，可直接与 `?` 运算符、模式匹配协同工作；
/// - 调用方若需返回自定义错误，可在第二个泛型参数中显式指定。
pub type Result<T, E = CoreError> = core::result::Result<T, E>;

impl CoreError {
    /// 使用稳定错误码与消息构造核心错误。
    ///
    /// # 契约说明
    /// - **参数**：`code` 必须全局唯一且稳定，遵循 `<域>.<语义>` 命名；`message` 为
    ///   面向排障人员的自然语言描述，建议避免敏感信息。
    /// - **后置条件**：返回的实例尚未附带底层原因，可通过 [`Self::with_cause`] 补充。
    pub fn new(code: &'static str, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            code,
            message: message.into(),
            cause: None,
        }
    }

    /// 附带一个底层原因，形成错误链。
    pub fn with_cause(mut self, cause: impl Error + Send + Sync + 'static) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    /// 获取稳定错误码。
    pub fn code(&self) -> &'static str {
        self.code
    }

    /// 获取人类可读的错误描述。
    pub fn message(&self) -> &str {
        &self.message
    }

    /// 获取可选的底层原因。
    pub fn cause(&self) -> Option<&ErrorCause> {
        self.cause.as_ref()
    }
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl Error for CoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.cause
            .as_ref()
            .map(|boxed| boxed.as_ref() as &(dyn Error + 'static))
    }
}

/// 框架内置的错误码常量集合，确保可观测性系统具有稳定识别符。
///
/// # 契约说明（What）
/// - 引擎自身从不构造这些错误；它们供参考 Stage 与宿主扩展使用，并保证跨版本稳定。
pub mod codes {
    /// 协议解码失败。
    pub const PROTOCOL_DECODE: &str = "protocol.decode";
    /// 协议帧预算超限。
    pub const PROTOCOL_BUDGET_EXCEEDED: &str = "protocol.budget_exceeded";
    /// Stage 内部状态违反约束。
    pub const STAGE_STATE_VIOLATION: &str = "stage.state_violation";
    /// 管理指令无法被任何 Stage 处理且调用方要求强制送达。
    pub const MANAGEMENT_UNHANDLED: &str = "management.unhandled";
    /// 运行时关闭。
    pub const RUNTIME_SHUTDOWN: &str = "runtime.shutdown";
}

const _: fn() = || {
    fn assert_error_traits<T: Error + Send + Sync + 'static>() {}

    assert_error_traits::<CoreError>();
};
