//! 算法注册表
//!
//! 注册表是一个普通的拥有型对象，由调用方显式创建和销毁，不存在全局状态。
//! 内部使用 `DashMap`，并发查找互不阻塞。

use crate::common::config::SubtleConfig;
use crate::common::identifiers::AlgorithmIdentifier;
use crate::error::{Error, Result};
use crate::systems::{AesGcm, AesKw, Hmac};
#[cfg(feature = "rsassa")]
use crate::systems::RsassaPkcs1V15;
use crate::traits::CryptoAlgorithm;
use dashmap::DashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// 算法标识符到算法实现的映射
#[derive(Default)]
pub struct AlgorithmRegistry {
    algorithms: DashMap<AlgorithmIdentifier, Arc<dyn CryptoAlgorithm>>,
}

impl AlgorithmRegistry {
    /// 创建空注册表
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册全部内置算法
    pub fn with_defaults() -> Self {
        let registry = Self::new();
        for identifier in AlgorithmIdentifier::ALL {
            if let Some(algorithm) = builtin(identifier, &SubtleConfig::default()) {
                registry.register(algorithm);
            }
        }
        registry
    }

    /// 只注册配置中启用的算法
    pub fn from_config(config: &SubtleConfig) -> Result<Self> {
        config.validate()?;
        let registry = Self::new();
        for identifier in config.enabled_identifiers()? {
            match builtin(identifier, config) {
                Some(algorithm) => {
                    registry.register(algorithm);
                }
                None => warn!(algorithm = %identifier, "algorithm enabled in config is not compiled in"),
            }
        }
        Ok(registry)
    }

    /// 注册算法；同一标识符已有实现时替换它并返回旧实现
    pub fn register(&self, algorithm: Arc<dyn CryptoAlgorithm>) -> Option<Arc<dyn CryptoAlgorithm>> {
        let identifier = algorithm.identifier();
        debug!(algorithm = %identifier, "registering algorithm");
        self.algorithms.insert(identifier, algorithm)
    }

    pub fn unregister(&self, identifier: AlgorithmIdentifier) -> Option<Arc<dyn CryptoAlgorithm>> {
        self.algorithms.remove(&identifier).map(|(_, algorithm)| algorithm)
    }

    /// 移除所有算法
    pub fn clear(&self) {
        self.algorithms.clear();
    }

    pub fn get(&self, identifier: AlgorithmIdentifier) -> Result<Arc<dyn CryptoAlgorithm>> {
        self.algorithms
            .get(&identifier)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| Error::NotSupported(format!("algorithm not registered: {}", identifier)))
    }

    /// 按 Web Crypto 名称查找，大小写不敏感
    pub fn get_by_name(&self, name: &str) -> Result<Arc<dyn CryptoAlgorithm>> {
        let identifier = AlgorithmIdentifier::from_name(name)
            .ok_or_else(|| Error::NotSupported(format!("unknown algorithm: {}", name)))?;
        self.get(identifier)
    }

    pub fn contains(&self, identifier: AlgorithmIdentifier) -> bool {
        self.algorithms.contains_key(&identifier)
    }

    /// 已注册的标识符，按固定顺序排列
    pub fn identifiers(&self) -> Vec<AlgorithmIdentifier> {
        AlgorithmIdentifier::ALL
            .into_iter()
            .filter(|identifier| self.contains(*identifier))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.algorithms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.algorithms.is_empty()
    }
}

fn builtin(identifier: AlgorithmIdentifier, config: &SubtleConfig) -> Option<Arc<dyn CryptoAlgorithm>> {
    match identifier {
        AlgorithmIdentifier::Hmac => Some(Arc::new(Hmac::new())),
        AlgorithmIdentifier::AesKw => Some(Arc::new(AesKw::new())),
        AlgorithmIdentifier::AesGcm => Some(Arc::new(AesGcm::new())),
        #[cfg(feature = "rsassa")]
        AlgorithmIdentifier::RsassaPkcs1V15 => Some(Arc::new(
            RsassaPkcs1V15::with_modulus_bounds(
                config.min_rsa_modulus_length,
                config.max_rsa_modulus_length,
            ),
        )),
        #[cfg(not(feature = "rsassa"))]
        AlgorithmIdentifier::RsassaPkcs1V15 => {
            let _ = config;
            None
        }
    }
}
