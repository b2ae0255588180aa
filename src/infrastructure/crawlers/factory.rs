// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::crawlers::site_adapter::SiteAdapter;
use crate::infrastructure::crawlers::csai::CsaiAdapter;
use crate::infrastructure::crawlers::eng::EngAdapter;
use crate::infrastructure::crawlers::jbnu::JbnuAdapter;
use crate::infrastructure::crawlers::swuniv::SwunivAdapter;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// 站点适配器注册表
///
/// 以适配器类型标签为键；公告板的 `crawler_type` 在这里解析为具体适配器。
#[derive(Clone, Default)]
pub struct AdapterRegistry {
    adapters: HashMap<&'static str, Arc<dyn SiteAdapter>>,
}

impl AdapterRegistry {
    /// 创建空注册表
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册内置的四个站点适配器
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(JbnuAdapter));
        registry.register(Arc::new(EngAdapter));
        registry.register(Arc::new(CsaiAdapter));
        registry.register(Arc::new(SwunivAdapter));
        registry
    }

    /// 注册适配器，相同标签的旧适配器会被替换
    pub fn register(&mut self, adapter: Arc<dyn SiteAdapter>) {
        let tag = adapter.crawler_type();
        debug!("Registering site adapter: {}", tag);
        self.adapters.insert(tag, adapter);
    }

    /// 按类型标签查找适配器
    pub fn get(&self, crawler_type: &str) -> Option<Arc<dyn SiteAdapter>> {
        self.adapters.get(crawler_type).cloned()
    }

    /// 已注册的类型标签（排序后）
    pub fn crawler_types(&self) -> Vec<&'static str> {
        let mut types: Vec<_> = self.adapters.keys().copied().collect();
        types.sort_unstable();
        types
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_cover_builtin_sites() {
        let registry = AdapterRegistry::with_defaults();
        assert_eq!(registry.crawler_types(), vec!["csai", "eng", "jbnu", "swuniv"]);
        assert_eq!(registry.get("eng").unwrap().base_domain(), "https://eng.jbnu.ac.kr");
        assert!(registry.get("unknown").is_none());
    }
}
