//! `SubtleEngine`：按算法参数查找注册表并分派操作的门面
//!
//! 引擎本身不做密码学运算，只负责：
//! - 通过注册表解析算法，未注册时返回 `NotSupported`
//! - 导出前检查可导出性
//! - 组合 导出+包装 与 解包+导入
//! - 为每个操作建立 tracing span，并在操作被拒绝时记录警告

#[cfg(feature = "async-engine")]
pub mod async_;

use crate::common::config::{ConfigManager, SubtleConfig};
use crate::common::jwk::JsonWebKey;
use crate::common::key::{CryptoKey, KeyData, KeyFormat, KeyOrKeyPair};
use crate::common::params::AlgorithmParameters;
use crate::common::usage::{KeyUsage, KeyUsages};
use crate::error::{Error, Result};
use crate::registry::AlgorithmRegistry;
use crate::traits::{CryptoAlgorithm, ensure_key_algorithm};
use std::sync::Arc;
use tracing::{instrument, warn};

/// 同步的 SubtleCrypto 风格门面
#[derive(Clone)]
pub struct SubtleEngine {
    registry: Arc<AlgorithmRegistry>,
    config: Arc<SubtleConfig>,
}

impl SubtleEngine {
    /// 使用全部内置算法和默认配置创建引擎
    pub fn new() -> Self {
        Self {
            registry: Arc::new(AlgorithmRegistry::with_defaults()),
            config: Arc::new(SubtleConfig::default()),
        }
    }

    /// 使用调用方提供的注册表
    pub fn with_registry(registry: Arc<AlgorithmRegistry>) -> Self {
        Self {
            registry,
            config: Arc::new(SubtleConfig::default()),
        }
    }

    /// 按配置构建注册表
    pub fn from_config(config: SubtleConfig) -> Result<Self> {
        let registry = AlgorithmRegistry::from_config(&config)?;
        Ok(Self {
            registry: Arc::new(registry),
            config: Arc::new(config),
        })
    }

    /// 使用配置管理器的当前快照
    pub fn from_config_manager(manager: &ConfigManager) -> Result<Self> {
        Self::from_config(manager.get_config().as_ref().clone())
    }

    pub fn registry(&self) -> &Arc<AlgorithmRegistry> {
        &self.registry
    }

    pub fn config(&self) -> &SubtleConfig {
        &self.config
    }

    fn algorithm_for(&self, params: &AlgorithmParameters) -> Result<Arc<dyn CryptoAlgorithm>> {
        self.registry.get(params.identifier())
    }

    #[instrument(skip_all, fields(algorithm = %params.identifier(), extractable = extractable))]
    pub fn generate_key(
        &self,
        params: &AlgorithmParameters,
        extractable: bool,
        usages: KeyUsages,
    ) -> Result<KeyOrKeyPair> {
        rejected(
            "generateKey",
            self.algorithm_for(params)
                .and_then(|algorithm| algorithm.generate_key(params, extractable, usages)),
        )
    }

    /// 导入密钥；`jwk` 格式的字节为 UTF-8 JSON
    #[instrument(skip_all, fields(algorithm = %params.identifier(), format = %format))]
    pub fn import_key(
        &self,
        format: KeyFormat,
        data: &[u8],
        params: &AlgorithmParameters,
        extractable: bool,
        usages: KeyUsages,
    ) -> Result<Arc<CryptoKey>> {
        rejected(
            "importKey",
            KeyData::from_bytes(format, data)
                .and_then(|data| self.import_key_data(data, params, extractable, usages)),
        )
    }

    #[instrument(skip_all, fields(algorithm = %params.identifier()))]
    pub fn import_jwk(
        &self,
        jwk: JsonWebKey,
        params: &AlgorithmParameters,
        extractable: bool,
        usages: KeyUsages,
    ) -> Result<Arc<CryptoKey>> {
        rejected(
            "importKey",
            self.import_key_data(KeyData::Jwk(jwk), params, extractable, usages),
        )
    }

    fn import_key_data(
        &self,
        data: KeyData,
        params: &AlgorithmParameters,
        extractable: bool,
        usages: KeyUsages,
    ) -> Result<Arc<CryptoKey>> {
        self.algorithm_for(params)?
            .import_key(data, params, extractable, usages)
    }

    /// 导出密钥；`jwk` 格式序列化为 JSON 字节
    #[instrument(skip_all, fields(algorithm = %key.algorithm_identifier(), format = %format))]
    pub fn export_key(&self, format: KeyFormat, key: &CryptoKey) -> Result<Vec<u8>> {
        rejected(
            "exportKey",
            self.export_key_data(format, key).and_then(KeyData::into_bytes),
        )
    }

    #[instrument(skip_all, fields(algorithm = %key.algorithm_identifier()))]
    pub fn export_jwk(&self, key: &CryptoKey) -> Result<JsonWebKey> {
        let result = self
            .export_key_data(KeyFormat::Jwk, key)
            .and_then(|data| match data {
                KeyData::Jwk(jwk) => Ok(jwk),
                other => Err(Error::UnsupportedFormat {
                    format: other.format().to_string(),
                    algorithm: key.algorithm_identifier().to_string(),
                }),
            });
        rejected("exportKey", result)
    }

    fn export_key_data(&self, format: KeyFormat, key: &CryptoKey) -> Result<KeyData> {
        if !key.extractable() {
            return Err(Error::InvalidAccess("key is not extractable".to_string()));
        }
        self.registry
            .get(key.algorithm_identifier())?
            .export_key(format, key)
    }

    #[instrument(skip_all, fields(algorithm = %params.identifier(), len = data.len()))]
    pub fn sign(&self, params: &AlgorithmParameters, key: &CryptoKey, data: &[u8]) -> Result<Vec<u8>> {
        rejected(
            "sign",
            self.algorithm_for(params)
                .and_then(|algorithm| algorithm.sign(params, key, data)),
        )
    }

    #[instrument(skip_all, fields(algorithm = %params.identifier(), len = data.len()))]
    pub fn verify(
        &self,
        params: &AlgorithmParameters,
        key: &CryptoKey,
        signature: &[u8],
        data: &[u8],
    ) -> Result<bool> {
        rejected(
            "verify",
            self.algorithm_for(params)
                .and_then(|algorithm| algorithm.verify(params, key, signature, data)),
        )
    }

    #[instrument(skip_all, fields(algorithm = %params.identifier(), len = data.len()))]
    pub fn encrypt(&self, params: &AlgorithmParameters, key: &CryptoKey, data: &[u8]) -> Result<Vec<u8>> {
        rejected(
            "encrypt",
            self.algorithm_for(params)
                .and_then(|algorithm| algorithm.encrypt(params, key, data)),
        )
    }

    #[instrument(skip_all, fields(algorithm = %params.identifier(), len = data.len()))]
    pub fn decrypt(&self, params: &AlgorithmParameters, key: &CryptoKey, data: &[u8]) -> Result<Vec<u8>> {
        rejected(
            "decrypt",
            self.algorithm_for(params)
                .and_then(|algorithm| algorithm.decrypt(params, key, data)),
        )
    }

    /// 导出 `key` 并用 `wrapping_key` 包装
    #[instrument(skip_all, fields(algorithm = %wrap_params.identifier(), format = %format))]
    pub fn wrap_key(
        &self,
        format: KeyFormat,
        key: &CryptoKey,
        wrapping_key: &CryptoKey,
        wrap_params: &AlgorithmParameters,
    ) -> Result<Vec<u8>> {
        let result = self.algorithm_for(wrap_params).and_then(|algorithm| {
            ensure_key_algorithm(algorithm.identifier(), wrapping_key)?;
            wrapping_key.require_usage(KeyUsage::WrapKey)?;
            let exported = self.export_key_data(format, key)?.into_bytes()?;
            algorithm.wrap_key(wrap_params, wrapping_key, &exported)
        });
        rejected("wrapKey", result)
    }

    /// 解开包装后按 `unwrapped_key_params` 导入
    #[allow(clippy::too_many_arguments)]
    #[instrument(
        skip_all,
        fields(
            algorithm = %unwrap_params.identifier(),
            unwrapped_algorithm = %unwrapped_key_params.identifier(),
            format = %format
        )
    )]
    pub fn unwrap_key(
        &self,
        format: KeyFormat,
        wrapped: &[u8],
        unwrapping_key: &CryptoKey,
        unwrap_params: &AlgorithmParameters,
        unwrapped_key_params: &AlgorithmParameters,
        extractable: bool,
        usages: KeyUsages,
    ) -> Result<Arc<CryptoKey>> {
        let result = self.algorithm_for(unwrap_params).and_then(|algorithm| {
            let unwrapped_algorithm = self.algorithm_for(unwrapped_key_params)?;
            ensure_key_algorithm(algorithm.identifier(), unwrapping_key)?;
            unwrapping_key.require_usage(KeyUsage::UnwrapKey)?;
            let bytes = algorithm.unwrap_key(unwrap_params, unwrapping_key, wrapped)?;
            let data = KeyData::from_bytes(format, &bytes)?;
            unwrapped_algorithm.import_key(data, unwrapped_key_params, extractable, usages)
        });
        rejected("unwrapKey", result)
    }
}

impl Default for SubtleEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn rejected<T>(operation: &str, result: Result<T>) -> Result<T> {
    result.inspect_err(|e| warn!(operation, error = %e, kind = e.kind().dom_name(), "operation rejected"))
}
