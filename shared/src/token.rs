//! Bearer 令牌声明解析
//!
//! 令牌本身对客户端不透明，唯一需要读取的是第二段（payload）里的
//! 过期时间。解码失败一律按已过期处理（fail-closed）。

use base64::Engine;
use base64::engine::general_purpose::STANDARD_NO_PAD;
use serde::Deserialize;
use std::fmt;

/// 过期判定的安全缓冲：提前 5 分钟视为过期，避免边界竞争
pub const EXPIRY_BUFFER_MS: f64 = 5.0 * 60.0 * 1000.0;

/// 令牌 payload 中客户端关心的声明
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TokenClaims {
    /// 过期时间戳，单位秒
    pub exp: u64,
    /// 登录主体，用于界面展示
    #[serde(default)]
    pub sub: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// 不是三段式令牌，或 payload 不是合法的 base64
    Malformed,
    /// payload 解出来了，但不是预期的 JSON 结构
    Payload(String),
}

impl fmt::Display for TokenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenError::Malformed => write!(f, "令牌格式不合法"),
            TokenError::Payload(msg) => write!(f, "令牌声明解析失败: {}", msg),
        }
    }
}

impl std::error::Error for TokenError {}

/// 解析令牌第二段中的声明
///
/// 同时接受 base64url 与标准 base64 字母表（服务端实现不一），
/// 末尾的 padding 会被忽略。
pub fn decode_claims(token: &str) -> Result<TokenClaims, TokenError> {
    let payload = token.split('.').nth(1).ok_or(TokenError::Malformed)?;
    let normalized = payload
        .replace('-', "+")
        .replace('_', "/")
        .trim_end_matches('=')
        .to_string();
    let bytes = STANDARD_NO_PAD
        .decode(normalized.as_bytes())
        .map_err(|_| TokenError::Malformed)?;
    serde_json::from_slice(&bytes).map_err(|e| TokenError::Payload(e.to_string()))
}

/// 令牌在 `now_ms` 时刻是否已（视同）过期
///
/// 判定条件：`now_ms >= exp * 1000 - buffer_ms`。解码失败返回 true。
pub fn is_expired(token: &str, now_ms: f64, buffer_ms: f64) -> bool {
    match decode_claims(token) {
        Ok(claims) => now_ms >= (claims.exp as f64) * 1000.0 - buffer_ms,
        Err(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;

    fn make_token(exp: u64, sub: Option<&str>) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = match sub {
            Some(sub) => format!(r#"{{"exp":{},"sub":"{}"}}"#, exp, sub),
            None => format!(r#"{{"exp":{}}}"#, exp),
        };
        let payload = URL_SAFE_NO_PAD.encode(payload.as_bytes());
        format!("{}.{}.signature", header, payload)
    }

    #[test]
    fn decodes_exp_and_sub() {
        let claims = decode_claims(&make_token(1_700_000_000, Some("admin"))).unwrap();
        assert_eq!(claims.exp, 1_700_000_000);
        assert_eq!(claims.sub.as_deref(), Some("admin"));
    }

    #[test]
    fn missing_sub_is_allowed() {
        let claims = decode_claims(&make_token(1, None)).unwrap();
        assert_eq!(claims.sub, None);
    }

    #[test]
    fn malformed_tokens_fail_closed() {
        for token in ["", "no-dots-here", "a.!!!not-base64!!!.c", "a."] {
            assert!(is_expired(token, 0.0, 0.0), "token {:?} 应视为过期", token);
        }
        // base64 合法但不是 JSON 对象
        let payload = URL_SAFE_NO_PAD.encode(b"plain text");
        assert!(is_expired(&format!("h.{}.s", payload), 0.0, 0.0));
    }

    #[test]
    fn expiry_boundary_honors_the_buffer() {
        let exp = 2_000u64; // 过期于 2_000_000 ms
        let token = make_token(exp, None);
        let buffer = EXPIRY_BUFFER_MS;
        let threshold = 2_000_000.0 - buffer;

        assert!(!is_expired(&token, threshold - 1.0, buffer));
        // 正好到达阈值即视为过期
        assert!(is_expired(&token, threshold, buffer));
        assert!(is_expired(&token, 2_000_000.0, buffer));
    }

    #[test]
    fn accepts_standard_alphabet_with_padding() {
        use base64::engine::general_purpose::STANDARD;
        let payload = STANDARD.encode(br#"{"exp":99}"#);
        let token = format!("h.{}.s", payload);
        assert_eq!(decode_claims(&token).unwrap().exp, 99);
    }
}
