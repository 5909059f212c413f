//! LocalStorage 封装模块
//!
//! 与其暴露整个 Storage 表面，不如绑定到单个键：
//! 整个应用只存一条凭据，槽位语义正好与之对应。

/// 绑定到固定键名的本地存储槽位
#[derive(Debug, Clone, Copy)]
pub struct StorageSlot {
    key: &'static str,
}

impl StorageSlot {
    pub const fn new(key: &'static str) -> Self {
        Self { key }
    }

    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }

    /// 读取槽位当前值；键不存在或存储不可用时返回 None
    pub fn read(&self) -> Option<String> {
        Self::storage()?.get_item(self.key).ok()?
    }

    /// 无条件覆盖写入，返回是否成功
    pub fn write(&self, value: &str) -> bool {
        Self::storage()
            .and_then(|s| s.set_item(self.key, value).ok())
            .is_some()
    }

    /// 清空槽位，返回是否成功
    pub fn clear(&self) -> bool {
        Self::storage()
            .and_then(|s| s.remove_item(self.key).ok())
            .is_some()
    }
}
