use alloc::borrow::Cow;
use alloc::sync::Arc;
use core::any::Any;
use core::fmt;

/// `Directive` 是管理端口的消息载体：类型擦除、可低成本克隆的带外指令。
///
/// # 设计背景（Why）
/// - 管理指令要扇出到组合流水线中的每个原子 Stage，且调度器可能在延迟后重投同一条
///   指令，因此载体必须可共享、可克隆；`Arc` 满足两者且克隆仅为引用计数操作。
/// - 不同 Stage 关心的指令类型互不相同，统一的强类型枚举无法开放扩展；以 `Any`
///   作类型擦除，由各 Stage 自行下转型判定。
///
/// # 逻辑解析（How）
/// - `kind` 为低基数稳定标签，供日志与观测链路使用，无需下转型即可识别指令类别；
/// - `payload` 为 `Arc<dyn Any + Send + Sync>`，通过 [`Self::is`] 与
///   [`Self::downcast_ref`] 访问具体类型。
///
/// # 契约说明（What）
/// - **前置条件**：`kind` 建议遵循 `<组件>.<指令>` 命名并与载荷类型一一对应；
/// - **后置条件**：指令应视为不可变；克隆产生的副本与原件共享同一载荷。
///
/// # 风险提示（Trade-offs）
/// - 类型擦除牺牲了编译期穷举能力，Stage 对未知指令应返回空产出（默认“谢绝”），
///   而不是报错。
#[derive(Clone)]
pub struct Directive {
    kind: Cow<'static, str>,
    payload: Arc<dyn Any + Send + Sync>,
}

impl Directive {
    /// 以稳定标签与任意载荷构造管理指令。
    pub fn new<T>(kind: impl Into<Cow<'static, str>>, payload: T) -> Self
    where
        T: Any + Send + Sync,
    {
        Self {
            kind: kind.into(),
            payload: Arc::new(payload),
        }
    }

    /// 返回指令类别标签。
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// 判断载荷是否为指定类型。
    pub fn is<T: Any>(&self) -> bool {
        self.payload.is::<T>()
    }

    /// 尝试以指定类型访问载荷。
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.payload.downcast_ref::<T>()
    }
}

impl fmt::Debug for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // 载荷刻意不进入 Debug 输出，避免在日志中泄漏业务数据。
        f.debug_struct("Directive")
            .field("kind", &self.kind)
            .field("payload", &"<erased-payload>")
            .finish()
    }
}
