use alloc::borrow::Cow;
use alloc::sync::Arc;
use core::marker::PhantomData;

use strata_core::observability::{KeyValue, LogRecord, LogSeverity, Logger};
use strata_core::{
    CoreError, Directive, Emission, PipePair, PipelineContext, Stage, StageDescriptor,
};

/// 日志字段键常量，保持跨 Stage 的命名一致性。
const ATTR_STAGE: &str = "strata.middleware.logging.stage";
const ATTR_DIRECTION: &str = "strata.middleware.logging.direction";
const ATTR_DIRECTIVE_KIND: &str = "strata.middleware.logging.directive_kind";

/// 日志 Stage 的配置，把输出差异外部化，Stage 本体保持可复用。
///
/// # 契约说明（What）
/// - `label`：低基数标识，在同一流水线内唯一，作为 `stage` 字段输出；
/// - `target`：面向日志后端的分类标签，对应 [`LogRecord::target`]；
/// - `severity`：普通读写事件的输出级别。
///
/// # 风险提示（Trade-offs）
/// - 高频链路使用 `Info` 可能造成日志风暴，请按需调低级别或在上层采样。
#[derive(Clone, Debug)]
pub struct LoggingStageConfig {
    pub label: Cow<'static, str>,
    pub target: Cow<'static, str>,
    pub severity: LogSeverity,
}

impl Default for LoggingStageConfig {
    fn default() -> Self {
        Self {
            label: Cow::Borrowed("logging"),
            target: Cow::Borrowed("strata.middleware.logging"),
            severity: LogSeverity::Info,
        }
    }
}

/// 日志 Stage：数据路径恒等穿透，每次穿越记一条结构化日志。
///
/// # 设计动机（Why）
/// - 把读写日志收敛到一个可装配的层，业务 Stage 不必各自手写重复的观测代码；
/// - 只记录方向、Stage 标识与指令类别等元数据，刻意不触碰载荷本身，避免在日志
///   中泄漏业务数据。
///
/// # 行为概览（How）
/// - `on_command` / `on_event`：先按配置级别记录一条带方向字段的日志，再以快速
///   路径原样转发；
/// - `on_management`：以 DEBUG 级别记录指令类别后谢绝（空产出），指令继续扇出到
///   其余 Stage 不受影响。
#[derive(Clone, Debug)]
pub struct LoggingStage<Command, Event> {
    config: LoggingStageConfig,
    _ports: PhantomData<fn(Command, Event)>,
}

impl<Command, Event> LoggingStage<Command, Event> {
    /// 基于给定配置构造日志 Stage。
    pub fn new(config: LoggingStageConfig) -> Self {
        Self {
            config,
            _ports: PhantomData,
        }
    }
}

impl<Command, Event> Default for LoggingStage<Command, Event> {
    fn default() -> Self {
        Self::new(LoggingStageConfig::default())
    }
}

impl<Command, Event> Stage for LoggingStage<Command, Event> {
    type CommandIn = Command;
    type CommandOut = Command;
    type EventIn = Event;
    type EventOut = Event;
    type Pipes = LoggingPipes<Command, Event>;

    fn build(&self, context: &PipelineContext) -> Self::Pipes {
        LoggingPipes {
            config: self.config.clone(),
            logger: context.logger_handle(),
            _ports: PhantomData,
        }
    }

    fn descriptor(&self) -> StageDescriptor {
        StageDescriptor::new(
            "strata.middleware.logging",
            "observability",
            "记录流水线双向流量的结构化日志",
        )
    }
}

/// 日志 Stage 的运行面，持有建链时克隆的日志门面句柄。
pub struct LoggingPipes<Command, Event> {
    config: LoggingStageConfig,
    logger: Arc<dyn Logger>,
    _ports: PhantomData<fn(Command, Event)>,
}

impl<Command, Event> LoggingPipes<Command, Event> {
    fn log_traffic(&self, direction: &'static str, message: &str) {
        let attributes = [
            KeyValue::new(ATTR_STAGE, self.config.label.as_ref()),
            KeyValue::new(ATTR_DIRECTION, direction),
        ];
        self.logger.log(&LogRecord::new(
            message,
            self.config.severity,
            Some(self.config.target.as_ref()),
            None,
            &attributes,
        ));
    }
}

impl<Command, Event> PipePair for LoggingPipes<Command, Event> {
    type CommandIn = Command;
    type CommandOut = Command;
    type EventIn = Event;
    type EventOut = Event;

    fn on_command(&mut self, command: Command) -> Result<Emission<Event, Command>, CoreError> {
        self.log_traffic("outbound", "pipeline command forwarded");
        Ok(Emission::OneCommand(command))
    }

    fn on_event(&mut self, event: Event) -> Result<Emission<Event, Command>, CoreError> {
        self.log_traffic("inbound", "pipeline event forwarded");
        Ok(Emission::OneEvent(event))
    }

    fn on_management(
        &mut self,
        directive: &Directive,
    ) -> Result<Emission<Event, Command>, CoreError> {
        let attributes = [
            KeyValue::new(ATTR_STAGE, self.config.label.as_ref()),
            KeyValue::new(ATTR_DIRECTIVE_KIND, directive.kind()),
        ];
        self.logger.log(&LogRecord::new(
            "pipeline management directive observed",
            LogSeverity::Debug,
            Some(self.config.target.as_ref()),
            None,
            &attributes,
        ));
        Ok(Emission::Empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::string::{String, ToString};
    use std::sync::Mutex;
    use std::vec::Vec;

    /// 记录型日志门面：捕获级别、消息与字段键值的快照。
    #[derive(Default)]
    struct RecordingLogger {
        records: Mutex<Vec<(LogSeverity, String, Vec<(String, String)>)>>,
    }

    impl Logger for RecordingLogger {
        fn log(&self, record: &LogRecord<'_>) {
            let attributes = record
                .attributes
                .iter()
                .map(|kv| {
                    let rendered = match &kv.value {
                        strata_core::AttributeValue::Text(text) => text.to_string(),
                        other => std::format!("{:?}", other),
                    };
                    (kv.key.to_string(), rendered)
                })
                .collect();
            self.records
                .lock()
                .expect("记录锁不应中毒")
                .push((record.severity, record.message.to_string(), attributes));
        }
    }

    fn build_pipes() -> (Arc<RecordingLogger>, LoggingPipes<String, String>) {
        let logger = Arc::new(RecordingLogger::default());
        let context = PipelineContext::with_logger(Arc::clone(&logger) as Arc<dyn Logger>);
        let pipes = LoggingStage::<String, String>::default().build(&context);
        (logger, pipes)
    }

    #[test]
    fn traffic_passes_through_and_is_recorded_with_direction() {
        // Why: 透传不得改写载荷；每次穿越恰好一条日志，方向字段区分上下行。
        let (logger, mut pipes) = build_pipes();

        let down = pipes.on_command("cmd".to_string()).expect("转发应成功");
        assert!(matches!(down, Emission::OneCommand(ref c) if c == "cmd"));

        let up = pipes.on_event("evt".to_string()).expect("转发应成功");
        assert!(matches!(up, Emission::OneEvent(ref e) if e == "evt"));

        let records = logger.records.lock().expect("记录锁不应中毒");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].0, LogSeverity::Info);
        assert!(
            records[0]
                .2
                .contains(&(ATTR_DIRECTION.to_string(), "outbound".to_string()))
        );
        assert!(
            records[1]
                .2
                .contains(&(ATTR_DIRECTION.to_string(), "inbound".to_string()))
        );
    }

    #[test]
    fn management_is_logged_and_declined() {
        // Why: 日志 Stage 只观测管理指令，不参与应答；指令类别应进入字段。
        let (logger, mut pipes) = build_pipes();

        let reply = pipes
            .on_management(&Directive::new("test.sweep", ()))
            .expect("谢绝应成功");
        assert!(reply.is_empty());

        let records = logger.records.lock().expect("记录锁不应中毒");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].0, LogSeverity::Debug);
        assert!(
            records[0]
                .2
                .contains(&(ATTR_DIRECTIVE_KIND.to_string(), "test.sweep".to_string()))
        );
    }
}
