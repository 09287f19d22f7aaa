//! 通用 Stage 与分帧 Stage 堆叠后的跨 crate 场景测试。

use std::sync::{Arc, Mutex};
use std::time::Duration;

use bytes::Bytes;
use strata_codec_frame::LengthPrefixStage;
use strata_core::schedule::{DirectiveScheduler, SchedulerHandle};
use strata_core::{
    CommandSink, CoreError, Directive, EventSink, PipelineBuilder, PipelineContext, StageExt,
};
use strata_middleware::{LoggingStage, Tick, TickStage};

#[derive(Default)]
struct RecordingCommandSink {
    frames: Vec<Bytes>,
    failures: Vec<&'static str>,
}

impl CommandSink for RecordingCommandSink {
    type Command = Bytes;

    fn on_command(&mut self, command: Bytes) {
        self.frames.push(command);
    }

    fn on_command_failure(&mut self, error: CoreError) {
        self.failures.push(error.code());
    }
}

#[derive(Default)]
struct RecordingEventSink {
    payloads: Vec<Bytes>,
    failures: Vec<&'static str>,
}

impl EventSink for RecordingEventSink {
    type Event = Bytes;

    fn on_event(&mut self, event: Bytes) {
        self.payloads.push(event);
    }

    fn on_event_failure(&mut self, error: CoreError) {
        self.failures.push(error.code());
    }
}

#[derive(Default)]
struct RecordingScheduler {
    entries: Mutex<Vec<Duration>>,
}

impl DirectiveScheduler for RecordingScheduler {
    fn schedule(&self, delay: Duration, _directive: Directive) {
        self.entries.lock().expect("记录锁不应中毒").push(delay);
    }
}

#[test]
fn full_stack_roundtrip_with_heartbeat() {
    // Why: 日志、心跳与分帧三层堆叠后，数据路径应保持分帧语义不变，
    //      管理指令应扇出到心跳层并登记重投。
    let interval = Duration::from_millis(500);
    let scheduler = Arc::new(RecordingScheduler::default());

    let context = Arc::new(PipelineContext::new());
    context.provide(SchedulerHandle::new(
        Arc::clone(&scheduler) as Arc<dyn DirectiveScheduler>
    ));

    let stack = LoggingStage::<Bytes, Bytes>::default()
        .over(TickStage::<Bytes, Bytes>::new(interval))
        .over(LengthPrefixStage::new(100));

    let mut injector = PipelineBuilder::new(
        stack,
        RecordingCommandSink::default(),
        RecordingEventSink::default(),
    )
    .with_context(context)
    .build();

    // 下行：载荷穿过两层透传后由分帧层成帧。
    injector.inject_command(Bytes::from_static(&[0x01, 0x02, 0x03]));
    assert_eq!(
        injector.command_sink().frames,
        vec![Bytes::from_static(&[0x00, 0x00, 0x00, 0x07, 0x01, 0x02, 0x03])]
    );

    // 上行：完整帧被剥出载荷并穿过两层透传到达事件 Sink。
    injector.inject_event(Bytes::from_static(&[0x00, 0x00, 0x00, 0x05, 0xAA]));
    assert_eq!(
        injector.event_sink().payloads,
        vec![Bytes::from_static(&[0xAA])]
    );

    // 带外：Tick 扇出到心跳层，登记恰好一次重投，Sink 不受影响。
    injector
        .management(&Tick::directive())
        .expect("管理注入应成功");
    assert_eq!(
        *scheduler.entries.lock().expect("记录锁不应中毒"),
        [interval]
    );
    assert!(injector.command_sink().failures.is_empty());
    assert!(injector.event_sink().failures.is_empty());
}
