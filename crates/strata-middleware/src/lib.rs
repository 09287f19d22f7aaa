#![cfg_attr(not(feature = "std"), no_std)]
#![doc = "strata-middleware: 可直接装入任意流水线的通用 Stage。"]
#![doc = ""]
#![doc = "本 crate 的 Stage 对数据路径保持恒等穿透，只在带外或观测维度增加行为："]
#![doc = "`tick` 借宿主调度能力实现心跳自续期，`logging` 为双向流量记录结构化日志。"]

extern crate alloc;

pub mod logging;
pub mod tick;

pub use logging::{LoggingStage, LoggingStageConfig};
pub use tick::{TICK_DIRECTIVE_KIND, Tick, TickStage};
