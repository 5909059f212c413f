//! Bearer 凭据存储
//!
//! 进程内唯一的令牌槽位。读取是过期感知的：已（视同）过期的令牌
//! 在读取时顺手清掉，调用方只会看到"有效令牌"或"没有令牌"两种情况。
//! 槽位与时钟都可注入，测试用内存槽位加固定时钟。

use crate::config::TOKEN_STORAGE_KEY;
use crate::web::StorageSlot;
use pantry_shared::token::{self, EXPIRY_BUFFER_MS};

/// 凭据槽位接口：单个值的读/写/清
pub trait CredentialSlot {
    fn get(&self) -> Option<String>;
    fn set(&self, value: &str) -> bool;
    fn clear(&self) -> bool;
}

impl CredentialSlot for StorageSlot {
    fn get(&self) -> Option<String> {
        self.read()
    }

    fn set(&self, value: &str) -> bool {
        self.write(value)
    }

    fn clear(&self) -> bool {
        StorageSlot::clear(self)
    }
}

/// 过期感知的令牌存储
///
/// 生产配置下槽位是无状态的 `StorageSlot`，整个存储可以随手克隆、
/// 塞进派生信号里；测试替换成共享内存槽位。
#[derive(Clone)]
pub struct TokenStore<S = StorageSlot> {
    slot: S,
    buffer_ms: f64,
    now_ms: fn() -> f64,
}

impl<S: CredentialSlot> TokenStore<S> {
    pub fn new(slot: S, buffer_ms: f64, now_ms: fn() -> f64) -> Self {
        Self {
            slot,
            buffer_ms,
            now_ms,
        }
    }

    /// 无条件覆盖旧值
    pub fn save(&self, token: &str) {
        self.slot.set(token);
    }

    /// 读取当前有效的令牌
    ///
    /// 过期或无法解码的令牌视为不存在，并作为副作用清空槽位。
    pub fn read(&self) -> Option<String> {
        self.read_at((self.now_ms)())
    }

    /// 过期判定与时钟解耦的读取入口
    pub fn read_at(&self, now_ms: f64) -> Option<String> {
        let stored = self.slot.get()?;
        if token::is_expired(&stored, now_ms, self.buffer_ms) {
            self.slot.clear();
            return None;
        }
        Some(stored)
    }

    pub fn clear(&self) {
        self.slot.clear();
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().is_some()
    }
}

fn browser_now_ms() -> f64 {
    js_sys::Date::now()
}

/// 生产配置：LocalStorage 槽位 + 浏览器时钟 + 5 分钟缓冲
pub fn browser_token_store() -> TokenStore {
    TokenStore::new(
        StorageSlot::new(TOKEN_STORAGE_KEY),
        EXPIRY_BUFFER_MS,
        browser_now_ms,
    )
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use base64::Engine;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// 共享内存槽位：克隆后指向同一份值，与 LocalStorage 的语义一致
    #[derive(Clone)]
    pub(crate) struct MemorySlot {
        value: Rc<RefCell<Option<String>>>,
    }

    impl MemorySlot {
        pub(crate) fn new(value: Option<&str>) -> Self {
            Self {
                value: Rc::new(RefCell::new(value.map(str::to_string))),
            }
        }
    }

    impl CredentialSlot for MemorySlot {
        fn get(&self) -> Option<String> {
            self.value.borrow().clone()
        }

        fn set(&self, value: &str) -> bool {
            *self.value.borrow_mut() = Some(value.to_string());
            true
        }

        fn clear(&self) -> bool {
            self.value.borrow_mut().take().is_some()
        }
    }

    fn fixed_now() -> f64 {
        1_000_000.0
    }

    pub(crate) fn make_token(exp: u64) -> String {
        let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"exp":{}}}"#, exp).as_bytes());
        format!("header.{}.sig", payload)
    }

    fn store_with(value: Option<&str>, buffer_ms: f64) -> TokenStore<MemorySlot> {
        TokenStore::new(MemorySlot::new(value), buffer_ms, fixed_now)
    }

    #[test]
    fn save_overwrites_and_read_returns_fresh_token() {
        let token = make_token(10_000); // 过期于 10_000_000 ms，远在 fixed_now 之后
        let store = store_with(None, 0.0);
        store.save("stale");
        store.save(&token);
        assert_eq!(store.read(), Some(token));
        assert!(store.is_authenticated());
    }

    #[test]
    fn expired_token_reads_as_absent_and_is_cleared() {
        let token = make_token(1); // 过期于 1_000 ms
        let store = store_with(Some(&token), 0.0);

        assert_eq!(store.read(), None);
        // 槽位已被清空：即便换一个会判定有效的时刻也读不到了
        assert_eq!(store.read_at(0.0), None);
    }

    #[test]
    fn undecodable_token_reads_as_absent_and_is_cleared() {
        let store = store_with(Some("garbage-not-a-jwt"), 0.0);
        assert_eq!(store.read(), None);
        assert!(!store.is_authenticated());
        assert_eq!(store.read_at(0.0), None);
    }

    #[test]
    fn buffer_shortens_the_usable_window() {
        // 过期于 1_060_000 ms；不带缓冲时在 fixed_now 还有效
        let token = make_token(1_060);
        let lenient = store_with(Some(&token), 0.0);
        assert!(lenient.read().is_some());

        // 2 分钟缓冲把有效窗口压到 940_000 ms 之前
        let strict = store_with(Some(&token), 120_000.0);
        assert_eq!(strict.read(), None);
    }

    #[test]
    fn clones_share_the_same_slot() {
        let token = make_token(10_000);
        let store = store_with(Some(&token), 0.0);
        let alias = store.clone();
        alias.clear();
        assert_eq!(store.read(), None);
    }
}
