use std::fmt;

// =========================================================
// 错误状态枚举
// =========================================================

/// 错误分类
///
/// 前端对失败的全部区分：登录凭据无效、会话过期（401 被拦截）、
/// 网关失败（其余非 2xx 或空响应体）、网络层失败、解码失败、
/// 以及从未触网的表单校验失败。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// 登录请求被 401 拒绝，行内展示，不跳转
    Auth,
    /// 任一已认证请求收到 401：令牌已被清除，当前操作不可恢复
    SessionExpired,
    /// 非 2xx（401 除外）或响应体缺失
    Gateway,
    /// fetch 失败或超时
    Network,
    /// 响应体无法解码为预期类型
    Serialization,
    /// 客户端表单校验失败，不会发出请求
    #[allow(dead_code)]
    Validation,
}

impl ApiErrorKind {
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiErrorKind::Auth => "INVALID_CREDENTIALS",
            ApiErrorKind::SessionExpired => "SESSION_EXPIRED",
            ApiErrorKind::Gateway => "GATEWAY_ERROR",
            ApiErrorKind::Network => "NETWORK_ERROR",
            ApiErrorKind::Serialization => "JSON_PARSE_ERROR",
            ApiErrorKind::Validation => "VALIDATION_ERROR",
        }
    }
}

// =========================================================
// 核心错误类型
// =========================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,
}

impl ApiError {
    pub fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    // --- Convenience constructors ---

    pub fn auth(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Auth, message)
    }

    pub fn session_expired(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::SessionExpired, message)
    }

    pub fn gateway(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Gateway, message)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Network, message)
    }

    pub fn serialization(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Serialization, message)
    }

    #[allow(dead_code)]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Validation, message)
    }

    pub fn is_session_expired(&self) -> bool {
        self.kind == ApiErrorKind::SessionExpired
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind.error_code(), self.message)
    }
}

impl std::error::Error for ApiError {}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::serialization(e.to_string())
    }
}
