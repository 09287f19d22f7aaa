//! 常用契约的一站式导入。
//!
//! Stage 作者与宿主适配层通常同时需要 Emission 词汇、Stage 契约与注入器表面，
//! `use strata_core::prelude::*;` 一次引入全部。

pub use crate::context::PipelineContext;
pub use crate::directive::Directive;
pub use crate::emission::{Emission, EmissionItem};
pub use crate::error::{CoreError, Result, codes};
pub use crate::injector::{CommandSink, EventSink, Injector, PipelineBuilder};
pub use crate::observability::{KeyValue, LogSeverity, Logger};
pub use crate::schedule::{DirectiveScheduler, SchedulerHandle};
pub use crate::stage::{PipePair, Stage, StageDescriptor, StageExt};
