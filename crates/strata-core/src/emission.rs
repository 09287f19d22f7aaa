use alloc::vec::Vec;

/// Stage 单次回调产出的一个条目，以方向命名两种变体。
///
/// # 设计背景（Why）
/// - 流水线内同一条链路上同时存在两个方向的数据流：命令向线缆下行，事件向应用上行。
///   用带方向标签的枚举取代“左/右”式的泛型二元组，调用方无需记忆哪一侧对应哪个方向。
///
/// # 契约说明（What）
/// - `UpEvent(E)`：交付给上方 Stage（或栈顶事件 Sink）的事件；
/// - `DownCommand(C)`：交付给下方 Stage（或栈底命令 Sink）的命令。
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EmissionItem<E, C> {
    /// 向上交付的事件。
    UpEvent(E),
    /// 向下交付的命令。
    DownCommand(C),
}

/// Stage 单次回调的完整产出：一段保序的条目序列，单条目路径零容器分配。
///
/// # 设计背景（Why）
/// - 1:1 变换是压倒性的常见情形：一次回调恰好产出一条命令或一条事件。若强制所有
///   返回值都装入 `Vec`，热路径每次调用都要支付一次分配与一层间接。
/// - 把快速路径提升为枚举变体后，“单条目”在值层面即可被分发内核识别并直接路由，
///   不存在共享槽位被覆盖的别名窗口，因此也不需要“消费后方可复用”的使用约束。
///
/// # 逻辑解析（How）
/// - `Empty`：空产出，常见且合法；
/// - `OneEvent` / `OneCommand`：单条目快速路径，分发内核按变体直接路由；
/// - `Many`：通用形态，保序的条目向量。
///
/// # 契约说明（What）
/// - 条目顺序具有语义：组合运算必须保持产出 Stage 定义的相对顺序；
/// - [`Emission::from_items`] 会把 0/1 条目的向量规约回 `Empty` / `One*`，
///   因此等价的单条目产出在 Sink 侧的观测完全一致。
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Emission<E, C> {
    /// 本次回调没有任何产出。
    Empty,
    /// 快速路径：恰好一条向上事件。
    OneEvent(E),
    /// 快速路径：恰好一条向下命令。
    OneCommand(C),
    /// 通用形态：按顺序排列的混合条目。
    Many(Vec<EmissionItem<E, C>>),
}

impl<E, C> Emission<E, C> {
    /// 构造空产出。
    pub fn none() -> Self {
        Emission::Empty
    }

    /// 构造单事件快速路径产出。
    pub fn event(event: E) -> Self {
        Emission::OneEvent(event)
    }

    /// 构造单命令快速路径产出。
    pub fn command(command: C) -> Self {
        Emission::OneCommand(command)
    }

    /// 从条目向量构造产出，并把退化情形规约回快速路径。
    ///
    /// # 契约说明
    /// - 0 条目 → `Empty`；1 条目 → 对应的 `One*` 变体；其余保持 `Many`。
    /// - 规约保证“显式单条目列表”与“快速路径助手”在下游不可区分（快速路径等价性）。
    pub fn from_items(mut items: Vec<EmissionItem<E, C>>) -> Self {
        match items.len() {
            0 => Emission::Empty,
            1 => match items.pop() {
                Some(EmissionItem::UpEvent(event)) => Emission::OneEvent(event),
                Some(EmissionItem::DownCommand(command)) => Emission::OneCommand(command),
                None => Emission::Empty,
            },
            _ => Emission::Many(items),
        }
    }

    /// 判断是否为空产出。
    pub fn is_empty(&self) -> bool {
        match self {
            Emission::Empty => true,
            Emission::Many(items) => items.is_empty(),
            _ => false,
        }
    }

    /// 返回条目数量。
    pub fn len(&self) -> usize {
        match self {
            Emission::Empty => 0,
            Emission::OneEvent(_) | Emission::OneCommand(_) => 1,
            Emission::Many(items) => items.len(),
        }
    }

    /// 将全部条目按序追加到目标向量。
    ///
    /// # 契约说明
    /// - 分发内核在拼接嵌套派发结果时使用本方法：子产出在生成它的条目位置整体并入，
    ///   不与兄弟条目交错。
    pub fn append_into(self, out: &mut Vec<EmissionItem<E, C>>) {
        match self {
            Emission::Empty => {}
            Emission::OneEvent(event) => out.push(EmissionItem::UpEvent(event)),
            Emission::OneCommand(command) => out.push(EmissionItem::DownCommand(command)),
            Emission::Many(items) => out.extend(items),
        }
    }

    /// 按“self 在前、other 在后”的顺序拼接两段产出。
    ///
    /// # 契约说明
    /// - 任一侧为空时直接返回另一侧，保住快速路径；
    /// - 否则物化为 `Many`，顺序不变。
    pub fn concat(self, other: Emission<E, C>) -> Emission<E, C> {
        if other.is_empty() {
            return self;
        }
        if self.is_empty() {
            return other;
        }
        let mut items = Vec::with_capacity(self.len() + other.len());
        self.append_into(&mut items);
        other.append_into(&mut items);
        Emission::Many(items)
    }

    /// 消费自身并返回保序的条目向量。
    ///
    /// 热路径请直接对变体做模式匹配；本方法面向需要统一迭代的外围代码。
    pub fn into_items(self) -> Vec<EmissionItem<E, C>> {
        let mut items = Vec::with_capacity(self.len());
        self.append_into(&mut items);
        items
    }
}

impl<E, C> IntoIterator for Emission<E, C> {
    type Item = EmissionItem<E, C>;
    type IntoIter = alloc::vec::IntoIter<EmissionItem<E, C>>;

    fn into_iter(self) -> Self::IntoIter {
        self.into_items().into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    /// 验证 0/1 条目的向量被规约回快速路径变体，保证两种写法对下游不可区分。
    #[test]
    fn from_items_normalizes_degenerate_shapes() {
        let empty: Emission<&str, &str> = Emission::from_items(Vec::new());
        assert!(matches!(empty, Emission::Empty));

        let single = Emission::<&str, &str>::from_items(vec![EmissionItem::DownCommand("c")]);
        assert!(matches!(single, Emission::OneCommand("c")));

        let single = Emission::<&str, &str>::from_items(vec![EmissionItem::UpEvent("e")]);
        assert!(matches!(single, Emission::OneEvent("e")));
    }

    /// 拼接必须保持“左在前、右在后”的顺序，这是管理扇出的排序基础。
    #[test]
    fn concat_preserves_relative_order() {
        let left = Emission::<&str, &str>::command("c1");
        let right = Emission::<&str, &str>::from_items(vec![
            EmissionItem::UpEvent("e1"),
            EmissionItem::DownCommand("c2"),
        ]);

        let merged = left.concat(right).into_items();
        assert_eq!(
            merged,
            vec![
                EmissionItem::DownCommand("c1"),
                EmissionItem::UpEvent("e1"),
                EmissionItem::DownCommand("c2"),
            ]
        );
    }

    /// 空产出在拼接中是单位元，不应触发物化。
    #[test]
    fn concat_with_empty_keeps_fast_path() {
        let fast = Emission::<&str, &str>::event("e");
        let merged = fast.concat(Emission::none());
        assert!(matches!(merged, Emission::OneEvent("e")));

        let merged = Emission::<&str, &str>::none().concat(Emission::command("c"));
        assert!(matches!(merged, Emission::OneCommand("c")));
    }
}
