use super::attributes::AttributeSet;
use crate::Error;
use alloc::borrow::Cow;

/// 日志级别枚举，取业界结构化日志模型的交集。
///
/// # 契约说明（What）
/// - `Info` 表示常规事件，`Warn` 表示潜在风险，`Error` 表示故障，`Fatal` 代表不可恢复错误；
/// - 导出器可依据级别映射到目标系统的严重度模型。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LogSeverity {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
}

/// 单条结构化日志记录。
///
/// # 逻辑解析（How）
/// - `message` 使用 `Cow<'a, str>`，静态文案零分配；
/// - `target` 表示日志分类，便于在观测平台按组件筛选；
/// - `error` 允许携带实现 [`Error`] 的对象，用于根因追溯；
/// - `attributes` 为借用的结构化字段集合，生命周期由调用方管理。
///
/// # 契约说明（What）
/// - **前置条件**：`attributes` 必须在 [`Logger::log`] 返回前保持有效；
/// - **后置条件**：记录提交后应视为不可变对象。
#[derive(Debug)]
pub struct LogRecord<'a> {
    pub message: Cow<'a, str>,
    pub severity: LogSeverity,
    pub target: Option<Cow<'a, str>>,
    pub error: Option<&'a dyn Error>,
    pub attributes: AttributeSet<'a>,
}

impl<'a> LogRecord<'a> {
    /// 构建新的日志记录，仅持有引用、不进行复制。
    pub fn new(
        message: impl Into<Cow<'a, str>>,
        severity: LogSeverity,
        target: Option<impl Into<Cow<'a, str>>>,
        error: Option<&'a dyn Error>,
        attributes: AttributeSet<'a>,
    ) -> Self {
        Self {
            message: message.into(),
            severity,
            target: target.map(Into::into),
            error,
            attributes,
        }
    }
}

/// 日志接口的核心契约。
///
/// # 设计背景（Why）
/// - 统一引擎与 Stage 对宿主日志实现的依赖，允许对接 `tracing`、OpenTelemetry Logger
///   或自研后端；默认便捷方法内部统一构造 [`LogRecord`]，确保所有路径共享相同逻辑。
///
/// # 契约说明（What）
/// - `log` 为唯一必需方法；
/// - 实现应尽量非阻塞，必要时将日志异步写入后台线程。
///
/// # 风险提示（Trade-offs）
/// - 高频链路在 `Info` 级别可能造成日志风暴，调用方应结合级别控制或采样。
pub trait Logger: Send + Sync + 'static {
    /// 提交结构化日志。
    fn log(&self, record: &LogRecord<'_>);

    /// 输出 DEBUG 日志。
    fn debug(&self, message: &str, attributes: AttributeSet<'_>) {
        self.log(&LogRecord::new(
            message,
            LogSeverity::Debug,
            None::<Cow<'_, str>>,
            None,
            attributes,
        ));
    }

    /// 输出 INFO 日志。
    fn info(&self, message: &str, attributes: AttributeSet<'_>) {
        self.log(&LogRecord::new(
            message,
            LogSeverity::Info,
            None::<Cow<'_, str>>,
            None,
            attributes,
        ));
    }

    /// 输出 WARN 日志。
    fn warn(&self, message: &str, attributes: AttributeSet<'_>) {
        self.log(&LogRecord::new(
            message,
            LogSeverity::Warn,
            None::<Cow<'_, str>>,
            None,
            attributes,
        ));
    }

    /// 输出 ERROR 日志，可附带根因。
    fn error(&self, message: &str, error: Option<&dyn Error>, attributes: AttributeSet<'_>) {
        self.log(&LogRecord::new(
            message,
            LogSeverity::Error,
            None::<Cow<'_, str>>,
            error,
            attributes,
        ));
    }
}

/// 丢弃一切记录的空实现，作为未配置日志时的缺省门面。
#[derive(Clone, Copy, Debug, Default)]
pub struct NopLogger;

impl Logger for NopLogger {
    fn log(&self, _record: &LogRecord<'_>) {}
}
