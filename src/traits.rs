use crate::common::identifiers::AlgorithmIdentifier;
use crate::common::key::{CryptoKey, KeyData, KeyFormat, KeyOrKeyPair};
use crate::common::params::AlgorithmParameters;
use crate::common::usage::KeyUsages;
use crate::error::{Error, Result};
use std::sync::Arc;

/// 密钥算法的公共特征
///
/// 每个方法都有返回 `NotSupported` 的默认实现，算法只需实现自己具备的能力。
/// 实现必须在任何密码学运算之前完成用途校验和密钥算法匹配检查。
pub trait CryptoAlgorithm: Send + Sync {
    /// 算法标识符
    fn identifier(&self) -> AlgorithmIdentifier;

    /// 生成密钥或密钥对
    fn generate_key(
        &self,
        _params: &AlgorithmParameters,
        _extractable: bool,
        _usages: KeyUsages,
    ) -> Result<KeyOrKeyPair> {
        Err(not_supported(self.identifier(), "generateKey"))
    }

    /// 导入密钥
    fn import_key(
        &self,
        _data: KeyData,
        _params: &AlgorithmParameters,
        _extractable: bool,
        _usages: KeyUsages,
    ) -> Result<Arc<CryptoKey>> {
        Err(not_supported(self.identifier(), "importKey"))
    }

    /// 导出密钥；可导出性由调用方检查
    fn export_key(&self, _format: KeyFormat, _key: &CryptoKey) -> Result<KeyData> {
        Err(not_supported(self.identifier(), "exportKey"))
    }

    fn sign(&self, _params: &AlgorithmParameters, _key: &CryptoKey, _data: &[u8]) -> Result<Vec<u8>> {
        Err(not_supported(self.identifier(), "sign"))
    }

    fn verify(
        &self,
        _params: &AlgorithmParameters,
        _key: &CryptoKey,
        _signature: &[u8],
        _data: &[u8],
    ) -> Result<bool> {
        Err(not_supported(self.identifier(), "verify"))
    }

    fn encrypt(&self, _params: &AlgorithmParameters, _key: &CryptoKey, _data: &[u8]) -> Result<Vec<u8>> {
        Err(not_supported(self.identifier(), "encrypt"))
    }

    fn decrypt(&self, _params: &AlgorithmParameters, _key: &CryptoKey, _data: &[u8]) -> Result<Vec<u8>> {
        Err(not_supported(self.identifier(), "decrypt"))
    }

    /// 用包装密钥加密已导出的密钥字节
    fn wrap_key(&self, _params: &AlgorithmParameters, _key: &CryptoKey, _data: &[u8]) -> Result<Vec<u8>> {
        Err(not_supported(self.identifier(), "wrapKey"))
    }

    /// 解开被包装的密钥字节
    fn unwrap_key(&self, _params: &AlgorithmParameters, _key: &CryptoKey, _data: &[u8]) -> Result<Vec<u8>> {
        Err(not_supported(self.identifier(), "unwrapKey"))
    }
}

fn not_supported(identifier: AlgorithmIdentifier, operation: &str) -> Error {
    Error::NotSupported(format!("{} does not support {}", identifier, operation))
}

/// 密钥的算法标识符必须与操作的算法一致
pub(crate) fn ensure_key_algorithm(identifier: AlgorithmIdentifier, key: &CryptoKey) -> Result<()> {
    if key.algorithm_identifier() != identifier {
        return Err(Error::AlgorithmMismatch {
            key: key.algorithm_identifier().name().to_string(),
            requested: identifier.name().to_string(),
        });
    }
    Ok(())
}
