use alloc::borrow::Cow;
use alloc::string::String;

/// 观测性属性键的通用别名。
///
/// # 契约说明（What）
/// - 采用 `Cow<'a, str>` 兼顾静态常量与运行时动态生成的键名；
/// - 调用方需保证键名低基数、蛇形命名，避免与保留键冲突。
pub type AttributeKey<'a> = Cow<'a, str>;

/// 描述单个属性键值对的结构化条目。
///
/// # 设计背景（Why）
/// - 日志字段采用与业界结构化观测一致的 Key-Value 建模，避免把数值强行转成字符串
///   导致的信息损失。
///
/// # 契约说明（What）
/// - **前置条件**：调用方需保证 `key` 低基数；
/// - **后置条件**：`KeyValue` 可安全克隆，本身不提供同步原语。
#[derive(Clone, Debug, PartialEq)]
pub struct KeyValue<'a> {
    pub key: AttributeKey<'a>,
    pub value: AttributeValue<'a>,
}

impl<'a> KeyValue<'a> {
    /// 构建新的属性键值对，值类型经 [`AttributeValue::from`] 自动适配。
    pub fn new(key: impl Into<AttributeKey<'a>>, value: impl Into<AttributeValue<'a>>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// 属性集合的借用视图。
///
/// # 契约说明（What）
/// - 仅提供只读视图，不承担所有权；实现方不得缓存该引用超出调用栈范围。
pub type AttributeSet<'a> = &'a [KeyValue<'a>];

/// 日志属性值的统一枚举。
///
/// # 逻辑解析（How）
/// - `Text` 变体使用 `Cow<'a, str>`，减少多余复制；
/// - 数值类型通过 `From` 转换，`u64` 超出 `i64` 范围时执行饱和转换。
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
pub enum AttributeValue<'a> {
    Text(Cow<'a, str>),
    Bool(bool),
    I64(i64),
    F64(f64),
}

impl<'a> From<&'a str> for AttributeValue<'a> {
    fn from(value: &'a str) -> Self {
        Self::Text(Cow::Borrowed(value))
    }
}

impl From<String> for AttributeValue<'_> {
    fn from(value: String) -> Self {
        Self::Text(Cow::Owned(value))
    }
}

impl<'a> From<Cow<'a, str>> for AttributeValue<'a> {
    fn from(value: Cow<'a, str>) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for AttributeValue<'_> {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for AttributeValue<'_> {
    fn from(value: i64) -> Self {
        Self::I64(value)
    }
}

impl From<u64> for AttributeValue<'_> {
    fn from(value: u64) -> Self {
        if value > i64::MAX as u64 {
            AttributeValue::I64(i64::MAX)
        } else {
            AttributeValue::I64(value as i64)
        }
    }
}

impl From<usize> for AttributeValue<'_> {
    fn from(value: usize) -> Self {
        AttributeValue::from(value as u64)
    }
}

impl From<f64> for AttributeValue<'_> {
    fn from(value: f64) -> Self {
        Self::F64(value)
    }
}
