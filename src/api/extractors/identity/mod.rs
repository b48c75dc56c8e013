/*!
 * Request identity context + extractors
 *
 * Responsibility:
 * - validate stage が request extensions に入れた認証済み主体を handler に渡す
 * - HTTP / axum 依存は core に閉じ込め、型定義は types に分離する
 *
 * Public API:
 * - RequestIdentity
 * - Identity / MaybeIdentity
 */

mod core;
mod types;

pub use core::{Identity, MaybeIdentity};
pub use types::RequestIdentity;
