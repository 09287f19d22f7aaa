use alloc::format;
use alloc::sync::Arc;
use alloc::vec::Vec;

use bytes::{Buf, BufMut, Bytes, BytesMut};

use strata_core::observability::{KeyValue, Logger};
use strata_core::{
    CoreError, Emission, EmissionItem, PipePair, PipelineContext, Stage, StageDescriptor, codes,
};

/// 帧长前缀的字节数；前缀记录的帧长包含前缀自身。
pub const LENGTH_PREFIX_BYTES: usize = 4;

const ATTR_FRAMED_LEN: &str = "strata.codec.frame.framed_len";
const ATTR_BUDGET: &str = "strata.codec.frame.budget";

/// 长度前缀分帧 Stage：四个端口均为字节序列的对称层。
///
/// # 设计动机（Why）
/// - 长度前缀是最常见的流式分帧手段：写侧一次前置前缀即可成帧，读侧在任意切分的
///   字节到达序列下都能重组出完整帧；
/// - 帧长记录“载荷 + 前缀”的总长度，读侧据此直接与缓冲长度比较，无需额外运算。
///
/// # 行为概览（How）
/// - `on_command`：前置 4 字节大端帧长并以单命令快速路径下发；帧长超出预算时
///   静默丢弃（空产出）并记一条 WARN 日志；
/// - `on_event`：把到达字节并入接收缓冲，循环剥帧——帧长超预算立即报错，帧长小于
///   前缀自身视为畸形流报错，数据不足则保留残段等待后续事件。
///
/// # 契约说明（What）
/// - **配置**：`max_frame_len` 约束成帧后的总长度，构造时收敛到 `u32` 可表达范围；
/// - **后置条件**：恰好一帧时走 `single_event`/`single_command` 快速路径，零帧为空
///   产出，多帧为保序列表；
/// - **读写不对称**：写侧尽力而为、读侧严格，是协议的既定行为而非疏漏——写侧丢弃
///   只影响本端输出，读侧超限意味着对端越界或流已错位，必须立即失败。
///
/// # 权衡与风险（Trade-offs）
/// - 接收缓冲随不完整帧增长，上界即 `max_frame_len`；超限在剥帧前即被拒绝，畸形
///   输入无法让缓冲无界膨胀。
#[derive(Clone, Debug)]
pub struct LengthPrefixStage {
    max_frame_len: usize,
}

impl LengthPrefixStage {
    /// 以最大帧长（含前缀）构造分帧 Stage。
    ///
    /// # 契约说明
    /// - `max_frame_len` 超出 `u32::MAX` 的部分没有意义（前缀无法表达），构造时收敛。
    pub fn new(max_frame_len: usize) -> Self {
        Self {
            max_frame_len: max_frame_len.min(u32::MAX as usize),
        }
    }

    /// 返回配置的最大帧长。
    pub fn max_frame_len(&self) -> usize {
        self.max_frame_len
    }
}

impl Stage for LengthPrefixStage {
    type CommandIn = Bytes;
    type CommandOut = Bytes;
    type EventIn = Bytes;
    type EventOut = Bytes;
    type Pipes = LengthPrefixPipes;

    fn build(&self, context: &PipelineContext) -> Self::Pipes {
        LengthPrefixPipes {
            max_frame_len: self.max_frame_len,
            inbox: BytesMut::new(),
            logger: context.logger_handle(),
        }
    }

    fn descriptor(&self) -> StageDescriptor {
        StageDescriptor::new(
            "strata.codec.frame",
            "codec",
            "4 字节大端长度前缀分帧",
        )
    }
}

/// 分帧 Stage 的运行面：接收缓冲是唯一的可变状态。
pub struct LengthPrefixPipes {
    max_frame_len: usize,
    inbox: BytesMut,
    logger: Arc<dyn Logger>,
}

impl PipePair for LengthPrefixPipes {
    type CommandIn = Bytes;
    type CommandOut = Bytes;
    type EventIn = Bytes;
    type EventOut = Bytes;

    fn on_command(&mut self, payload: Bytes) -> Result<Emission<Bytes, Bytes>, CoreError> {
        let framed_len = payload.len() + LENGTH_PREFIX_BYTES;
        if framed_len > self.max_frame_len {
            // 写侧尽力而为：超限帧静默丢弃，仅留观测痕迹。
            self.logger.warn(
                "outbound frame dropped: framed length exceeds budget",
                &[
                    KeyValue::new(ATTR_FRAMED_LEN, framed_len as u64),
                    KeyValue::new(ATTR_BUDGET, self.max_frame_len as u64),
                ],
            );
            return Ok(Emission::Empty);
        }

        let mut frame = BytesMut::with_capacity(framed_len);
        frame.put_u32(framed_len as u32);
        frame.put_slice(&payload);
        Ok(Emission::OneCommand(frame.freeze()))
    }

    fn on_event(&mut self, chunk: Bytes) -> Result<Emission<Bytes, Bytes>, CoreError> {
        self.inbox.extend_from_slice(&chunk);

        let mut decoded: Vec<Bytes> = Vec::new();
        while self.inbox.len() >= LENGTH_PREFIX_BYTES {
            let framed_len = u32::from_be_bytes([
                self.inbox[0],
                self.inbox[1],
                self.inbox[2],
                self.inbox[3],
            ]) as usize;

            // 预算校验先于完整性判断：越界帧长一经读出立即失败，不等待其余字节。
            if framed_len > self.max_frame_len {
                return Err(CoreError::new(
                    codes::PROTOCOL_BUDGET_EXCEEDED,
                    format!(
                        "inbound framed length {} exceeds budget {}",
                        framed_len, self.max_frame_len
                    ),
                ));
            }
            if framed_len < LENGTH_PREFIX_BYTES {
                // 帧长连前缀都装不下，等待再多字节也不可能完整，流已错位。
                return Err(CoreError::new(
                    codes::PROTOCOL_DECODE,
                    format!(
                        "inbound framed length {} is shorter than its own prefix",
                        framed_len
                    ),
                ));
            }
            if self.inbox.len() < framed_len {
                break;
            }

            let mut frame = self.inbox.split_to(framed_len);
            frame.advance(LENGTH_PREFIX_BYTES);
            decoded.push(frame.freeze());
        }

        let items = decoded
            .into_iter()
            .map(EmissionItem::UpEvent)
            .collect::<Vec<_>>();
        Ok(Emission::from_items(items))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn build_pipes(max_frame_len: usize) -> LengthPrefixPipes {
        let context = PipelineContext::new();
        LengthPrefixStage::new(max_frame_len).build(&context)
    }

    /// 收集一次事件产出中的全部上行帧，便于断言。
    fn decoded_frames(emission: Emission<Bytes, Bytes>) -> Vec<Bytes> {
        emission
            .into_items()
            .into_iter()
            .map(|item| match item {
                EmissionItem::UpEvent(frame) => frame,
                EmissionItem::DownCommand(_) => panic!("读路径不应产出下行命令"),
            })
            .collect()
    }

    #[test]
    fn encode_prepends_big_endian_framed_length() {
        // Why: 帧长前缀记录“载荷 + 前缀”总长，3 字节载荷应产出 7 字节帧。
        let mut pipes = build_pipes(100);
        let emission = pipes
            .on_command(Bytes::from_static(&[0x01, 0x02, 0x03]))
            .expect("编码应成功");

        match emission {
            Emission::OneCommand(frame) => {
                assert_eq!(&frame[..], &[0x00, 0x00, 0x00, 0x07, 0x01, 0x02, 0x03]);
            }
            other => panic!("应走单命令快速路径，实际为 {:?}", other),
        }
    }

    #[test]
    fn encode_drops_oversized_frame_silently() {
        // Why: 写侧尽力而为——超限帧丢弃为“空产出”，不是错误。
        let mut pipes = build_pipes(6);
        let emission = pipes
            .on_command(Bytes::from_static(&[0x01, 0x02, 0x03]))
            .expect("丢弃不应报错");
        assert!(emission.is_empty());

        // 预算内的后续帧照常成帧，丢弃不留状态。
        let emission = pipes
            .on_command(Bytes::from_static(&[0xEE]))
            .expect("编码应成功");
        assert_eq!(emission.len(), 1);
    }

    #[test]
    fn decode_retains_incomplete_tail_across_events() {
        // Why: 任意切分的到达序列下，完整帧被剥出、残段保留到下一次事件。
        let mut pipes = build_pipes(100);

        let first = pipes
            .on_event(Bytes::from_static(&[0x00, 0x00, 0x00, 0x07, 0x01, 0x02]))
            .expect("解码应成功");
        assert!(first.is_empty(), "帧未凑齐前不应有产出");

        // 第二段补齐首帧，并带来一个 6 字节帧的前 5 字节。
        let second = pipes
            .on_event(Bytes::from_static(&[0x03, 0x00, 0x00, 0x00, 0x06, 0xAA]))
            .expect("解码应成功");
        let frames = decoded_frames(second);
        assert_eq!(frames, vec![Bytes::from_static(&[0x01, 0x02, 0x03])]);

        // 残段 [00 00 00 06 AA] 仍在缓冲中，补上最后一字节即出帧。
        let third = pipes
            .on_event(Bytes::from_static(&[0xBB]))
            .expect("解码应成功");
        let frames = decoded_frames(third);
        assert_eq!(frames, vec![Bytes::from_static(&[0xAA, 0xBB])]);
    }

    #[test]
    fn decode_completes_frame_exactly_at_declared_length() {
        // Why: 帧长含前缀——声明 5 字节的帧在第 5 个字节到达的瞬间即完整。
        let mut pipes = build_pipes(100);
        let emission = pipes
            .on_event(Bytes::from_static(&[0x00, 0x00, 0x00, 0x05, 0xAA]))
            .expect("解码应成功");

        match emission {
            Emission::OneEvent(frame) => assert_eq!(&frame[..], &[0xAA]),
            other => panic!("恰好一帧应走单事件快速路径，实际为 {:?}", other),
        }
    }

    #[test]
    fn decode_emits_multiple_frames_in_arrival_order() {
        // Why: 一次事件送达多帧时，产出为保序的物化列表。
        let mut pipes = build_pipes(100);
        let emission = pipes
            .on_event(Bytes::from_static(&[
                0x00, 0x00, 0x00, 0x05, 0x01, // 帧 1
                0x00, 0x00, 0x00, 0x06, 0x02, 0x03, // 帧 2
            ]))
            .expect("解码应成功");

        let frames = decoded_frames(emission);
        assert_eq!(
            frames,
            vec![
                Bytes::from_static(&[0x01]),
                Bytes::from_static(&[0x02, 0x03]),
            ]
        );
    }

    #[test]
    fn decode_rejects_oversized_framed_length_eagerly() {
        // Why: 读侧严格——帧长一经读出即校验，预算为 10 时帧长 11 必须立即失败，
        //      即使该帧字节尚未到齐。
        let mut pipes = build_pipes(10);
        let error = pipes
            .on_event(Bytes::from_static(&[0x00, 0x00, 0x00, 0x0B, 0x01]))
            .expect_err("超限帧长应报错");
        assert_eq!(error.code(), codes::PROTOCOL_BUDGET_EXCEEDED);
    }

    #[test]
    fn decode_rejects_length_shorter_than_prefix() {
        // Why: 帧长小于前缀自身意味着流已错位，继续等待毫无意义。
        let mut pipes = build_pipes(100);
        let error = pipes
            .on_event(Bytes::from_static(&[0x00, 0x00, 0x00, 0x02]))
            .expect_err("畸形帧长应报错");
        assert_eq!(error.code(), codes::PROTOCOL_DECODE);
    }

    #[test]
    fn roundtrip_within_budget_restores_payload() {
        // Why: 预算内任意载荷 encode 后再 decode 必须还原原始字节。
        let mut pipes = build_pipes(64);
        let payload = Bytes::from(vec![0x10, 0x20, 0x30, 0x40, 0x50]);

        let encoded = pipes
            .on_command(payload.clone())
            .expect("编码应成功");
        let frame = match encoded {
            Emission::OneCommand(frame) => frame,
            other => panic!("应走单命令快速路径，实际为 {:?}", other),
        };

        let decoded = pipes.on_event(frame).expect("解码应成功");
        let frames = decoded_frames(decoded);
        assert_eq!(frames, vec![payload]);
    }
}
