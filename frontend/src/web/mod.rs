//! 原生 Web API 封装模块
//!
//! 对浏览器原生 API 的轻量级封装，替代 gloo-* 系列 crate
//! 以减小 WASM 二进制体积；定时器例外（超时竞速用 gloo-timers）。

mod http;
pub mod route;
pub mod router;
mod storage;

pub use http::{FetchClient, HttpRequest, HttpResponse, HttpTransport};
pub use storage::StorageSlot;
