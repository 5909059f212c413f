//! HTTP 中间件装饰器
//!
//! 横切关注点拆成两个可独立测试的装饰器，洋葱式包在基础
//! 传输层外面：内层注入认证头，外层拦截 401。
//! 组合顺序固定为 `SessionGuard<AuthInjector<FetchClient>>`。

use std::rc::Rc;

use async_trait::async_trait;

use crate::error::{ApiError, ApiResult};
use crate::token_store::{CredentialSlot, TokenStore};
use crate::web::{HttpRequest, HttpResponse, HttpTransport, StorageSlot};

// =========================================================
// 认证注入
// =========================================================

/// 给需要认证的请求附上 `Authorization: Bearer <token>`
///
/// 令牌缺失或已过期时不拦截请求：裸发出去，让服务端用 401 拒绝，
/// 统一走会话守卫的处理路径。
pub struct AuthInjector<C, S = StorageSlot> {
    inner: C,
    store: TokenStore<S>,
}

impl<C, S> AuthInjector<C, S> {
    pub fn new(inner: C, store: TokenStore<S>) -> Self {
        Self { inner, store }
    }
}

#[async_trait(?Send)]
impl<C: HttpTransport, S: CredentialSlot> HttpTransport for AuthInjector<C, S> {
    async fn send(&self, mut req: HttpRequest) -> ApiResult<HttpResponse> {
        if req.requires_auth {
            if let Some(token) = self.store.read() {
                req = req.with_header("Authorization", &format!("Bearer {}", token));
            }
        }
        self.inner.send(req).await
    }
}

// =========================================================
// 401 会话守卫
// =========================================================

/// 拦截已认证请求的 401 响应
///
/// 命中时清空令牌槽位、触发注入的 `on_expired` 回调
/// （认证上下文翻转后由路由服务自动跳回登录页），并把错误
/// 标记为会话过期——对该请求而言不可恢复。
/// 登录请求自身的 401 原样透传，由登录表单行内展示，
/// 避免在登录页上造成重定向循环。
pub struct SessionGuard<C, S = StorageSlot> {
    inner: C,
    store: TokenStore<S>,
    on_expired: Rc<dyn Fn()>,
}

impl<C, S> SessionGuard<C, S> {
    pub fn new(inner: C, store: TokenStore<S>, on_expired: Rc<dyn Fn()>) -> Self {
        Self {
            inner,
            store,
            on_expired,
        }
    }
}

#[async_trait(?Send)]
impl<C: HttpTransport, S: CredentialSlot> HttpTransport for SessionGuard<C, S> {
    async fn send(&self, req: HttpRequest) -> ApiResult<HttpResponse> {
        let guarded = req.requires_auth;
        let resp = self.inner.send(req).await?;

        if resp.status == 401 && guarded {
            self.store.clear();
            (self.on_expired)();
            return Err(ApiError::session_expired("登录状态已失效，请重新登录"));
        }

        // 其余状态（含 4xx/5xx）原样透传，由网关层定性
        Ok(resp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token_store::tests::{MemorySlot, make_token};
    use futures::executor::block_on;
    use pantry_shared::protocol::HttpMethod;
    use std::cell::RefCell;

    /// 记录收到的请求并回放预置响应的传输层替身
    struct RecordingTransport {
        seen: Rc<RefCell<Vec<(String, Vec<(String, String)>)>>>,
        status: u16,
    }

    impl RecordingTransport {
        fn new(status: u16) -> (Self, Rc<RefCell<Vec<(String, Vec<(String, String)>)>>>) {
            let seen = Rc::new(RefCell::new(Vec::new()));
            (
                Self {
                    seen: seen.clone(),
                    status,
                },
                seen,
            )
        }
    }

    #[async_trait(?Send)]
    impl HttpTransport for RecordingTransport {
        async fn send(&self, req: HttpRequest) -> ApiResult<HttpResponse> {
            self.seen.borrow_mut().push((req.url.clone(), req.headers));
            Ok(HttpResponse {
                status: self.status,
                body: String::new(),
            })
        }
    }

    fn fixed_now() -> f64 {
        0.0
    }

    fn store_with_token(token: Option<&str>) -> TokenStore<MemorySlot> {
        TokenStore::new(MemorySlot::new(token), 0.0, fixed_now)
    }

    fn bearer_of(headers: &[(String, String)]) -> Option<String> {
        headers
            .iter()
            .find(|(k, _)| k == "Authorization")
            .map(|(_, v)| v.clone())
    }

    #[test]
    fn injector_attaches_bearer_when_token_is_valid() {
        let token = make_token(10_000_000);
        let (transport, seen) = RecordingTransport::new(200);
        let injector = AuthInjector::new(transport, store_with_token(Some(&token)));

        let req = HttpRequest::new("http://api/items", HttpMethod::Get);
        block_on(injector.send(req)).unwrap();

        let (_, headers) = &seen.borrow()[0];
        assert_eq!(bearer_of(headers), Some(format!("Bearer {}", token)));
    }

    #[test]
    fn injector_sends_unauthenticated_when_slot_is_empty() {
        let (transport, seen) = RecordingTransport::new(200);
        let injector = AuthInjector::new(transport, store_with_token(None));

        block_on(injector.send(HttpRequest::new("http://api/items", HttpMethod::Get))).unwrap();

        assert_eq!(bearer_of(&seen.borrow()[0].1), None);
    }

    #[test]
    fn injector_skips_the_login_endpoint() {
        let token = make_token(10_000_000);
        let (transport, seen) = RecordingTransport::new(200);
        let injector = AuthInjector::new(transport, store_with_token(Some(&token)));

        let req = HttpRequest::new("http://api/login", HttpMethod::Post).with_auth(false);
        block_on(injector.send(req)).unwrap();

        assert_eq!(bearer_of(&seen.borrow()[0].1), None);
    }

    #[test]
    fn guard_clears_store_and_fires_hook_on_401() {
        let token = make_token(10_000_000);
        let store = store_with_token(Some(&token));
        let fired = Rc::new(RefCell::new(0u32));
        let fired_probe = fired.clone();
        let (transport, _) = RecordingTransport::new(401);

        let guard = SessionGuard::new(
            transport,
            store.clone(),
            Rc::new(move || *fired_probe.borrow_mut() += 1),
        );

        let err = block_on(guard.send(HttpRequest::new("http://api/items", HttpMethod::Get)))
            .unwrap_err();

        assert!(err.is_session_expired());
        assert_eq!(*fired.borrow(), 1);
        assert_eq!(store.read(), None);
    }

    #[test]
    fn guard_passes_login_401_through() {
        let store = store_with_token(None);
        let fired = Rc::new(RefCell::new(0u32));
        let fired_probe = fired.clone();
        let (transport, _) = RecordingTransport::new(401);

        let guard = SessionGuard::new(
            transport,
            store,
            Rc::new(move || *fired_probe.borrow_mut() += 1),
        );

        let req = HttpRequest::new("http://api/login", HttpMethod::Post).with_auth(false);
        let resp = block_on(guard.send(req)).unwrap();

        // 登录请求的 401 不触发重定向，由调用方按"凭据无效"处理
        assert_eq!(resp.status, 401);
        assert_eq!(*fired.borrow(), 0);
    }

    #[test]
    fn guard_passes_other_errors_through() {
        let token = make_token(10_000_000);
        let store = store_with_token(Some(&token));
        let (transport, _) = RecordingTransport::new(500);

        let guard = SessionGuard::new(transport, store.clone(), Rc::new(|| {}));

        let resp = block_on(guard.send(HttpRequest::new("http://api/items", HttpMethod::Get)))
            .unwrap();

        assert_eq!(resp.status, 500);
        // 5xx 不动令牌
        assert!(store.read().is_some());
    }
}
