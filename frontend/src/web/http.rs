//! HTTP 请求封装模块
//!
//! 基于 `web_sys::fetch` 的轻量级客户端，整个请求
//! （发出到读完响应体）与一个固定超时竞速。
//! 传输层抽象成 trait，中间件与网关在测试里注入替身。

use async_trait::async_trait;
use futures::future::{Either, select};
use gloo_timers::future::TimeoutFuture;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, Response};

use crate::config::REQUEST_TIMEOUT_MS;
use crate::error::{ApiError, ApiResult};
use pantry_shared::protocol::HttpMethod;

/// 一次待发送的请求
///
/// `requires_auth` 标记该请求是否应携带 bearer 令牌，
/// 由认证注入中间件消费；登录端点将其置为 false。
pub struct HttpRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
    pub requires_auth: bool,
}

impl HttpRequest {
    pub fn new(url: impl Into<String>, method: HttpMethod) -> Self {
        Self {
            url: url.into(),
            method,
            headers: Vec::new(),
            body: None,
            requires_auth: true,
        }
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.push((key.to_string(), value.to_string()));
        self
    }

    /// 设置 JSON 请求体并带上 Content-Type
    pub fn with_json_body(mut self, body: &serde_json::Value) -> Self {
        self.body = Some(body.to_string());
        self.with_header("Content-Type", "application/json")
    }

    pub fn with_auth(mut self, requires_auth: bool) -> Self {
        self.requires_auth = requires_auth;
        self
    }
}

/// 响应：状态码加已读出的文本体
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    /// 是否 2xx
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// 传输层接口
///
/// `(?Send)`：浏览器单线程环境下 JsFuture 不是 Send 的。
#[async_trait(?Send)]
pub trait HttpTransport {
    async fn send(&self, req: HttpRequest) -> ApiResult<HttpResponse>;
}

/// 生产实现：window.fetch
#[derive(Clone, Copy, Default)]
pub struct FetchClient;

impl FetchClient {
    async fn dispatch(req: HttpRequest) -> ApiResult<HttpResponse> {
        let headers = Headers::new()
            .map_err(|e| ApiError::network(format!("创建 Headers 失败: {:?}", e)))?;
        for (key, value) in &req.headers {
            headers
                .set(key, value)
                .map_err(|e| ApiError::network(format!("设置 Header 失败: {:?}", e)))?;
        }

        let opts = RequestInit::new();
        opts.set_method(req.method.as_str());
        opts.set_headers(&headers.into());
        if let Some(body) = &req.body {
            opts.set_body(&JsValue::from_str(body));
        }

        let request = Request::new_with_str_and_init(&req.url, &opts)
            .map_err(|e| ApiError::network(format!("构建请求失败: {:?}", e)))?;

        let window = web_sys::window().ok_or_else(|| ApiError::network("无法获取 window 对象"))?;

        let resp_value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|e| ApiError::network(format!("网络错误: {:?}", e)))?;

        let response: Response = resp_value
            .dyn_into()
            .map_err(|e| ApiError::network(format!("Response 类型转换失败: {:?}", e)))?;

        let status = response.status();

        let text_promise = response
            .text()
            .map_err(|e| ApiError::serialization(format!("{:?}", e)))?;
        let text = JsFuture::from(text_promise)
            .await
            .map_err(|e| ApiError::serialization(format!("{:?}", e)))?;
        let body = text.as_string().unwrap_or_default();

        Ok(HttpResponse { status, body })
    }
}

#[async_trait(?Send)]
impl HttpTransport for FetchClient {
    async fn send(&self, req: HttpRequest) -> ApiResult<HttpResponse> {
        let request = Box::pin(Self::dispatch(req));
        let timeout = Box::pin(TimeoutFuture::new(REQUEST_TIMEOUT_MS));

        match select(request, timeout).await {
            Either::Left((result, _)) => result,
            Either::Right(((), _)) => Err(ApiError::network("请求超时")),
        }
    }
}
