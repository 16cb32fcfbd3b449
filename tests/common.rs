//!
//! 集成测试的通用辅助函数
//!
#![allow(dead_code)]

use std::sync::Arc;
use subtle_kit::prelude::*;

pub fn sign_verify() -> KeyUsages {
    KeyUsages::from_slice(&[KeyUsage::Sign, KeyUsage::Verify])
}

pub fn wrap_unwrap() -> KeyUsages {
    KeyUsages::from_slice(&[KeyUsage::WrapKey, KeyUsage::UnwrapKey])
}

pub fn encrypt_decrypt() -> KeyUsages {
    KeyUsages::from_slice(&[KeyUsage::Encrypt, KeyUsage::Decrypt])
}

/// 生成一个 HMAC 密钥
pub fn hmac_key(engine: &SubtleEngine, hash: HashAlgorithm, extractable: bool) -> Arc<CryptoKey> {
    engine
        .generate_key(&AlgorithmParameters::hmac_key(hash), extractable, sign_verify())
        .unwrap()
        .into_key()
        .unwrap()
}

/// 生成一个 AES 系列的密钥
pub fn aes_key(
    engine: &SubtleEngine,
    identifier: AlgorithmIdentifier,
    length: usize,
    extractable: bool,
    usages: KeyUsages,
) -> Arc<CryptoKey> {
    engine
        .generate_key(&AlgorithmParameters::aes_key(identifier, length), extractable, usages)
        .unwrap()
        .into_key()
        .unwrap()
}

/// 安装测试用的 tracing 订阅者，重复调用无副作用
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
