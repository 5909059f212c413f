//! 认证模块
//!
//! 管理登录状态，与路由系统解耦：路由服务拿到的是一个注入的
//! 守卫信号，每次求值都会同步问一遍令牌存储（过期令牌顺手清除）。

use leptos::prelude::*;

use crate::api::GroceryApi;
use crate::error::ApiResult;
use crate::token_store::TokenStore;
use crate::web::HttpTransport;
use pantry_shared::token::decode_claims;

/// 认证状态
#[derive(Clone, Default)]
pub struct AuthState {
    pub is_authenticated: bool,
    /// 令牌 sub 声明，导航栏展示用
    pub username: Option<String>,
}

/// 认证上下文：读写信号对，经 Context 在组件间共享
#[derive(Clone, Copy)]
pub struct AuthContext {
    pub state: ReadSignal<AuthState>,
    pub set_state: WriteSignal<AuthState>,
}

impl AuthContext {
    pub fn new() -> Self {
        let (state, set_state) = signal(AuthState::default());
        Self { state, set_state }
    }

    /// 路由守卫用的信号
    ///
    /// 认证标记之外还要令牌当下真实有效——会话中途过期时，
    /// 下一次导航就会被拦下，而不是等到请求挨了 401。
    pub fn guard_signal(&self, store: &TokenStore) -> Signal<bool> {
        let state = self.state;
        let store = store.clone();
        Signal::derive(move || state.get().is_authenticated && store.is_authenticated())
    }

    /// 会话过期回调（中间件持有）：只翻状态，跳转交给路由服务
    pub fn expire_hook(&self) -> impl Fn() + 'static {
        let set_state = self.set_state;
        move || set_state.set(AuthState::default())
    }
}

impl Default for AuthContext {
    fn default() -> Self {
        Self::new()
    }
}

/// 从 Context 获取认证上下文
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext should be provided")
}

/// 启动时从令牌存储恢复会话
pub fn init_auth(ctx: &AuthContext, store: &TokenStore) {
    if let Some(token) = store.read() {
        let username = decode_claims(&token).ok().and_then(|c| c.sub);
        ctx.set_state.set(AuthState {
            is_authenticated: true,
            username,
        });
    }
}

/// 交换凭据并持久化令牌
///
/// 失败时令牌槽位与认证状态都保持原样，错误交给登录表单行内展示。
pub async fn login<C: HttpTransport>(
    ctx: &AuthContext,
    store: &TokenStore,
    api: &GroceryApi<C>,
    username: &str,
    password: &str,
) -> ApiResult<()> {
    let token = api.login(username, password).await?;
    store.save(&token);

    let display_name = decode_claims(&token)
        .ok()
        .and_then(|c| c.sub)
        .unwrap_or_else(|| username.to_string());

    ctx.set_state.set(AuthState {
        is_authenticated: true,
        username: Some(display_name),
    });
    Ok(())
}

/// 注销：清槽位、翻状态；重定向由路由服务的认证监听完成
pub fn logout(ctx: &AuthContext, store: &TokenStore) {
    store.clear();
    ctx.set_state.set(AuthState::default());
}
