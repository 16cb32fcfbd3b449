//! 异步引擎
//!
//! 每个操作先获取信号量许可，再把同步操作放到 tokio 的阻塞线程池中执行，
//! 结果以 future 的形式交付。操作一旦开始就会执行完毕；丢弃 future 只会丢弃结果。
#![cfg(feature = "async-engine")]

use crate::common::config::{ConfigManager, SubtleConfig};
use crate::common::jwk::JsonWebKey;
use crate::common::key::{CryptoKey, KeyFormat, KeyOrKeyPair};
use crate::common::params::AlgorithmParameters;
use crate::common::usage::KeyUsages;
use crate::engine::SubtleEngine;
use crate::error::{Error, Result};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::debug;

/// `AsyncSubtleEngine`：以 future 交付结果的 SubtleCrypto 门面
#[derive(Clone)]
pub struct AsyncSubtleEngine {
    engine: Arc<SubtleEngine>,
    permits: Arc<Semaphore>,
}

impl AsyncSubtleEngine {
    /// 包装一个同步引擎，并发上限取自它的配置
    pub fn new(engine: SubtleEngine) -> Self {
        let max_concurrent = engine.config().max_concurrent_operations.max(1);
        Self {
            engine: Arc::new(engine),
            permits: Arc::new(Semaphore::new(max_concurrent)),
        }
    }

    pub fn from_config(config: SubtleConfig) -> Result<Self> {
        SubtleEngine::from_config(config).map(Self::new)
    }

    pub fn from_config_manager(manager: &ConfigManager) -> Result<Self> {
        SubtleEngine::from_config_manager(manager).map(Self::new)
    }

    /// 底层同步引擎
    pub fn engine(&self) -> &SubtleEngine {
        &self.engine
    }

    /// 当前空闲的许可数
    pub fn available_permits(&self) -> usize {
        self.permits.available_permits()
    }

    async fn run<T, F>(&self, operation: &'static str, task: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&SubtleEngine) -> Result<T> + Send + 'static,
    {
        let permit = Arc::clone(&self.permits)
            .acquire_owned()
            .await
            .map_err(|_| Error::operation("async engine semaphore closed"))?;
        debug!(operation, "dispatching to blocking pool");

        let engine = Arc::clone(&self.engine);
        tokio::task::spawn_blocking(move || {
            let _permit = permit;
            task(&engine)
        })
        .await?
    }

    pub async fn generate_key(
        &self,
        params: AlgorithmParameters,
        extractable: bool,
        usages: KeyUsages,
    ) -> Result<KeyOrKeyPair> {
        self.run("generateKey", move |engine| {
            engine.generate_key(&params, extractable, usages)
        })
        .await
    }

    pub async fn import_key(
        &self,
        format: KeyFormat,
        data: Vec<u8>,
        params: AlgorithmParameters,
        extractable: bool,
        usages: KeyUsages,
    ) -> Result<Arc<CryptoKey>> {
        self.run("importKey", move |engine| {
            engine.import_key(format, &data, &params, extractable, usages)
        })
        .await
    }

    pub async fn import_jwk(
        &self,
        jwk: JsonWebKey,
        params: AlgorithmParameters,
        extractable: bool,
        usages: KeyUsages,
    ) -> Result<Arc<CryptoKey>> {
        self.run("importKey", move |engine| {
            engine.import_jwk(jwk, &params, extractable, usages)
        })
        .await
    }

    pub async fn export_key(&self, format: KeyFormat, key: Arc<CryptoKey>) -> Result<Vec<u8>> {
        self.run("exportKey", move |engine| engine.export_key(format, &key))
            .await
    }

    pub async fn export_jwk(&self, key: Arc<CryptoKey>) -> Result<JsonWebKey> {
        self.run("exportKey", move |engine| engine.export_jwk(&key)).await
    }

    pub async fn sign(
        &self,
        params: AlgorithmParameters,
        key: Arc<CryptoKey>,
        data: Vec<u8>,
    ) -> Result<Vec<u8>> {
        self.run("sign", move |engine| engine.sign(&params, &key, &data))
            .await
    }

    pub async fn verify(
        &self,
        params: AlgorithmParameters,
        key: Arc<CryptoKey>,
        signature: Vec<u8>,
        data: Vec<u8>,
    ) -> Result<bool> {
        self.run("verify", move |engine| {
            engine.verify(&params, &key, &signature, &data)
        })
        .await
    }

    pub async fn encrypt(
        &self,
        params: AlgorithmParameters,
        key: Arc<CryptoKey>,
        data: Vec<u8>,
    ) -> Result<Vec<u8>> {
        self.run("encrypt", move |engine| engine.encrypt(&params, &key, &data))
            .await
    }

    pub async fn decrypt(
        &self,
        params: AlgorithmParameters,
        key: Arc<CryptoKey>,
        data: Vec<u8>,
    ) -> Result<Vec<u8>> {
        self.run("decrypt", move |engine| engine.decrypt(&params, &key, &data))
            .await
    }

    pub async fn wrap_key(
        &self,
        format: KeyFormat,
        key: Arc<CryptoKey>,
        wrapping_key: Arc<CryptoKey>,
        wrap_params: AlgorithmParameters,
    ) -> Result<Vec<u8>> {
        self.run("wrapKey", move |engine| {
            engine.wrap_key(format, &key, &wrapping_key, &wrap_params)
        })
        .await
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn unwrap_key(
        &self,
        format: KeyFormat,
        wrapped: Vec<u8>,
        unwrapping_key: Arc<CryptoKey>,
        unwrap_params: AlgorithmParameters,
        unwrapped_key_params: AlgorithmParameters,
        extractable: bool,
        usages: KeyUsages,
    ) -> Result<Arc<CryptoKey>> {
        self.run("unwrapKey", move |engine| {
            engine.unwrap_key(
                format,
                &wrapped,
                &unwrapping_key,
                &unwrap_params,
                &unwrapped_key_params,
                extractable,
                usages,
            )
        })
        .await
    }
}

impl Default for AsyncSubtleEngine {
    fn default() -> Self {
        Self::new(SubtleEngine::new())
    }
}
