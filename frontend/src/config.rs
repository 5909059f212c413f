//! 环境配置
//!
//! API 源按构建模式二选一；令牌只存在一个 LocalStorage 槽位里，
//! 有效期取决于令牌自带的 exp 声明，而不是存储条目本身。

pub const LOCAL_API_URL: &str = "http://localhost:8080";
pub const PROD_API_URL: &str = "https://pantry-api.onrender.com";

/// 当前构建对应的 API 源
pub fn api_base() -> &'static str {
    if cfg!(debug_assertions) {
        LOCAL_API_URL
    } else {
        PROD_API_URL
    }
}

/// 令牌在 LocalStorage 中的键名
pub const TOKEN_STORAGE_KEY: &str = "login-token";

/// 整个请求（含读取响应体）的超时上限，毫秒
pub const REQUEST_TIMEOUT_MS: u32 = 5_000;
