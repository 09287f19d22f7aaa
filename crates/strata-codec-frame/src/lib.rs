#![cfg_attr(not(feature = "std"), no_std)]
#![doc = "strata-codec-frame: 基于 4 字节大端长度前缀的分帧 Stage。"]
#![doc = ""]
#![doc = "写路径为载荷加上帧长前缀（帧长 = 载荷 + 4），超出预算时静默丢弃；"]
#![doc = "读路径增量累积字节并循环剥帧，超出预算时报 `protocol.budget_exceeded`。"]
#![doc = "读写不对称（写侧尽力而为、读侧严格）是刻意保留的协议行为。"]

extern crate alloc;

mod frame;

pub use frame::{LENGTH_PREFIX_BYTES, LengthPrefixPipes, LengthPrefixStage};
