//! AES-KW 密钥包装算法
use crate::common::identifiers::AlgorithmIdentifier;
use crate::common::key::{CryptoKey, KeyData, KeyFormat, KeyOrKeyPair};
use crate::common::params::AlgorithmParameters;
use crate::common::usage::{KeyUsage, KeyUsages};
use crate::error::Result;
use crate::primitives::key_wrap;
use crate::systems::aes::AesVariant;
use crate::traits::{CryptoAlgorithm, ensure_key_algorithm};
use std::sync::Arc;

/// AES-KW 算法
pub struct AesKw {
    variant: AesVariant,
}

impl AesKw {
    pub const IDENTIFIER: AlgorithmIdentifier = AlgorithmIdentifier::AesKw;

    pub fn new() -> Self {
        Self {
            variant: AesVariant {
                identifier: Self::IDENTIFIER,
                allowed_usages: KeyUsages::from_slice(&[KeyUsage::WrapKey, KeyUsage::UnwrapKey]),
                jwk_suffix: "KW",
            },
        }
    }
}

impl Default for AesKw {
    fn default() -> Self {
        Self::new()
    }
}

impl CryptoAlgorithm for AesKw {
    fn identifier(&self) -> AlgorithmIdentifier {
        Self::IDENTIFIER
    }

    fn generate_key(
        &self,
        params: &AlgorithmParameters,
        extractable: bool,
        usages: KeyUsages,
    ) -> Result<KeyOrKeyPair> {
        self.variant
            .generate(params, extractable, usages)
            .map(KeyOrKeyPair::Key)
    }

    fn import_key(
        &self,
        data: KeyData,
        params: &AlgorithmParameters,
        extractable: bool,
        usages: KeyUsages,
    ) -> Result<Arc<CryptoKey>> {
        self.variant.import(data, params, extractable, usages)
    }

    fn export_key(&self, format: KeyFormat, key: &CryptoKey) -> Result<KeyData> {
        ensure_key_algorithm(Self::IDENTIFIER, key)?;
        self.variant.export(format, key)
    }

    fn wrap_key(&self, _params: &AlgorithmParameters, key: &CryptoKey, data: &[u8]) -> Result<Vec<u8>> {
        ensure_key_algorithm(Self::IDENTIFIER, key)?;
        key.require_usage(KeyUsage::WrapKey)?;
        key_wrap::wrap(key.secret()?, data)
    }

    fn unwrap_key(&self, _params: &AlgorithmParameters, key: &CryptoKey, data: &[u8]) -> Result<Vec<u8>> {
        ensure_key_algorithm(Self::IDENTIFIER, key)?;
        key.require_usage(KeyUsage::UnwrapKey)?;
        key_wrap::unwrap(key.secret()?, data)
    }
}
