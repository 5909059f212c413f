//! 路由服务模块 - 核心引擎
//!
//! 封装 window.history，所有导航都走"请求 -> 守卫 -> 写历史 -> 更新信号"
//! 一条流程。认证状态以信号形式注入，与认证系统解耦；
//! 被守卫拦下的目标路径会被记住，登录成功后送回原处。

use leptos::prelude::*;
use wasm_bindgen::prelude::*;

use super::route::AppRoute;

/// 获取当前浏览器路径
fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

fn push_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.push_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 重定向用：替换而不是追加历史记录
fn replace_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 路由器服务
#[derive(Clone, Copy)]
pub struct RouterService {
    current_route: ReadSignal<AppRoute>,
    set_route: WriteSignal<AppRoute>,
    /// 注入的认证检查信号
    is_authenticated: Signal<bool>,
    /// 守卫拦截时记下的原始目标，登录成功后消费
    return_to: RwSignal<Option<AppRoute>>,
}

impl RouterService {
    fn new(is_authenticated: Signal<bool>) -> Self {
        let initial_route = AppRoute::from_path(&current_path());
        let (current_route, set_route) = signal(initial_route);

        Self {
            current_route,
            set_route,
            is_authenticated,
            return_to: RwSignal::new(None),
        }
    }

    pub fn current_route(&self) -> ReadSignal<AppRoute> {
        self.current_route
    }

    /// 导航入口：请求 -> 守卫 -> 加载
    pub fn navigate(&self, path: &str) {
        self.navigate_to_route(AppRoute::from_path(path), true);
    }

    fn navigate_to_route(&self, target_route: AppRoute, use_push: bool) {
        let is_auth = self.is_authenticated.get_untracked();

        // 目标需要认证但用户未认证：记下目标并去登录页
        if target_route.requires_auth() && !is_auth {
            web_sys::console::log_1(&"[Router] 未认证，跳转登录页".into());
            self.return_to.set(Some(target_route));
            let redirect = AppRoute::auth_failure_redirect();
            if use_push {
                push_history_state(redirect.to_path());
            } else {
                replace_history_state(redirect.to_path());
            }
            self.set_route.set(redirect);
            return;
        }

        // 已认证用户访问登录页：送回原始目标或面板
        if target_route.should_redirect_when_authenticated() && is_auth {
            let redirect = self.take_return_target();
            if use_push {
                push_history_state(redirect.to_path());
            } else {
                replace_history_state(redirect.to_path());
            }
            self.set_route.set(redirect);
            return;
        }

        if use_push {
            push_history_state(target_route.to_path());
        } else {
            replace_history_state(target_route.to_path());
        }
        self.set_route.set(target_route);
    }

    /// 取出并清空"返回原处"目标
    fn take_return_target(&self) -> AppRoute {
        self.return_to
            .try_update(|slot| slot.take())
            .flatten()
            .unwrap_or_else(AppRoute::auth_success_redirect)
    }

    /// 浏览器后退/前进也要过守卫
    fn init_popstate_listener(&self) {
        let set_route = self.set_route;
        let is_authenticated = self.is_authenticated;
        let return_to = self.return_to;

        let closure = Closure::<dyn Fn()>::new(move || {
            let target_route = AppRoute::from_path(&current_path());
            if target_route.requires_auth() && !is_authenticated.get_untracked() {
                return_to.set(Some(target_route));
                let redirect = AppRoute::auth_failure_redirect();
                replace_history_state(redirect.to_path());
                set_route.set(redirect);
            } else {
                set_route.set(target_route);
            }
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 泄漏闭包以保持监听器存活
        closure.forget();
    }

    /// 认证状态翻转时自动重定向
    fn setup_auth_redirect(&self) {
        let router = *self;

        Effect::new(move |_| {
            let is_auth = router.is_authenticated.get();
            let route = router.current_route.get_untracked();

            if is_auth {
                // 刚登录：离开登录页，优先回到被拦截的原始目标
                if route.should_redirect_when_authenticated() {
                    let redirect = router.take_return_target();
                    web_sys::console::log_1(&"[Router] 登录成功，离开登录页".into());
                    push_history_state(redirect.to_path());
                    router.set_route.set(redirect);
                }
            } else if route.requires_auth() {
                // 登出或会话失效：离开受保护页面
                web_sys::console::log_1(&"[Router] 会话结束，跳转登录页".into());
                let redirect = AppRoute::auth_failure_redirect();
                push_history_state(redirect.to_path());
                router.set_route.set(redirect);
            }
        });
    }
}

/// 提供路由服务到 Context 并初始化
fn provide_router(is_authenticated: Signal<bool>) -> RouterService {
    let router = RouterService::new(is_authenticated);

    // 初始路径也要过一次守卫（直接打开 / 时未登录应落到 /login）
    router.navigate_to_route(AppRoute::from_path(&current_path()), false);

    router.init_popstate_listener();
    router.setup_auth_redirect();

    provide_context(router);
    router
}

/// 从 Context 获取路由服务
pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure Router is provided.")
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由器根组件，应在 App 根部使用
#[component]
pub fn Router(
    /// 认证状态信号
    is_authenticated: Signal<bool>,
    /// 子组件
    children: Children,
) -> impl IntoView {
    provide_router(is_authenticated);

    children()
}

/// 路由出口：按当前路由渲染对应视图
#[component]
pub fn RouterOutlet(
    /// 路由匹配函数
    matcher: fn(AppRoute) -> AnyView,
) -> impl IntoView {
    let router = use_router();

    move || {
        let current = router.current_route().get();
        matcher(current)
    }
}
