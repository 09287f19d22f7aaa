use std::env;
use std::hint::black_box;
use std::time::Instant;

use strata_core::{
    CommandSink, CoreError, Emission, EventSink, PipePair, PipelineBuilder, PipelineContext,
    Stage, StageExt,
};

/// 统计型计数 Sink：只累加条目数，避免把分配噪音算进分发耗时。
#[derive(Default)]
struct CountingCommandSink {
    seen: u64,
}

impl CommandSink for CountingCommandSink {
    type Command = u64;

    fn on_command(&mut self, command: u64) {
        self.seen = self.seen.wrapping_add(command);
    }

    fn on_command_failure(&mut self, _error: CoreError) {}
}

#[derive(Default)]
struct CountingEventSink {
    seen: u64,
}

impl EventSink for CountingEventSink {
    type Event = u64;

    fn on_event(&mut self, event: u64) {
        self.seen = self.seen.wrapping_add(event);
    }

    fn on_event_failure(&mut self, _error: CoreError) {}
}

/// 恒等 Stage：单条目快速路径，基准测量的就是它在组合深度下的穿透成本。
struct Identity;

struct IdentityPipes;

impl Stage for Identity {
    type CommandIn = u64;
    type CommandOut = u64;
    type EventIn = u64;
    type EventOut = u64;
    type Pipes = IdentityPipes;

    fn build(&self, _context: &PipelineContext) -> Self::Pipes {
        IdentityPipes
    }
}

impl PipePair for IdentityPipes {
    type CommandIn = u64;
    type CommandOut = u64;
    type EventIn = u64;
    type EventOut = u64;

    fn on_command(&mut self, command: u64) -> Result<Emission<u64, u64>, CoreError> {
        Ok(Emission::OneCommand(command))
    }

    fn on_event(&mut self, event: u64) -> Result<Emission<u64, u64>, CoreError> {
        Ok(Emission::OneEvent(event))
    }
}

/// `cargo bench -- --quick` 对应的分发内核冒烟基准。
///
/// # 执行逻辑（How）
/// - 构建四层恒等堆叠，命令与事件各注入 N 次，测量端到端耗时；
/// - 快速路径全程无容器分配，耗时应随组合深度线性增长。
fn main() {
    let is_quick = env::args().skip(1).any(|arg| arg == "--quick");
    let iterations = if is_quick { 10_000_u64 } else { 1_000_000_u64 };

    let stack = Identity.over(Identity).over(Identity).over(Identity);
    let mut injector = PipelineBuilder::new(
        stack,
        CountingCommandSink::default(),
        CountingEventSink::default(),
    )
    .build();

    let started = Instant::now();
    for round in 0..iterations {
        injector.inject_command(round);
        injector.inject_event(round);
    }
    let elapsed = started.elapsed();

    println!("dispatch_iterations={iterations}");
    println!("dispatch_elapsed_ns={}", elapsed.as_nanos());

    black_box(&injector);
}
