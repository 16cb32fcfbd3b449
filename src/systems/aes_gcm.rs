//! AES-GCM 认证加密算法
//!
//! 仅支持 96 位 IV 和 128 位认证标签，密文格式为 密文 ‖ 标签。
//! `wrap_key`/`unwrap_key` 与 `encrypt`/`decrypt` 相同，只是要求的用途不同。
use crate::common::identifiers::AlgorithmIdentifier;
use crate::common::key::{CryptoKey, KeyData, KeyFormat, KeyOrKeyPair};
use crate::common::params::{AesGcmParams, AlgorithmParameters};
use crate::common::usage::{KeyUsage, KeyUsages};
use crate::error::{Error, Result};
use crate::primitives::gcm;
use crate::systems::aes::AesVariant;
use crate::traits::{CryptoAlgorithm, ensure_key_algorithm};
use std::sync::Arc;

const TAG_LENGTH_BITS: usize = gcm::TAG_SIZE * 8;

/// AES-GCM 算法
pub struct AesGcm {
    variant: AesVariant,
}

impl AesGcm {
    pub const IDENTIFIER: AlgorithmIdentifier = AlgorithmIdentifier::AesGcm;

    pub fn new() -> Self {
        Self {
            variant: AesVariant {
                identifier: Self::IDENTIFIER,
                allowed_usages: KeyUsages::from_slice(&[
                    KeyUsage::Encrypt,
                    KeyUsage::Decrypt,
                    KeyUsage::WrapKey,
                    KeyUsage::UnwrapKey,
                ]),
                jwk_suffix: "GCM",
            },
        }
    }

    fn gcm_params<'a>(params: &'a AlgorithmParameters, operation: &str) -> Result<&'a AesGcmParams> {
        let params = match params {
            AlgorithmParameters::AesGcm(gcm_params) => gcm_params,
            other => return Err(other.unsupported(operation)),
        };
        if let Some(tag_length) = params.tag_length {
            if tag_length != TAG_LENGTH_BITS {
                return Err(Error::operation(format!(
                    "unsupported AES-GCM tag length: {} bits",
                    tag_length
                )));
            }
        }
        Ok(params)
    }

    fn seal(
        &self,
        params: &AlgorithmParameters,
        key: &CryptoKey,
        usage: KeyUsage,
        data: &[u8],
    ) -> Result<Vec<u8>> {
        ensure_key_algorithm(Self::IDENTIFIER, key)?;
        let gcm_params = Self::gcm_params(params, usage.name())?;
        key.require_usage(usage)?;
        let aad = gcm_params.additional_data.as_deref().unwrap_or_default();
        gcm::encrypt(key.secret()?, &gcm_params.iv, aad, data)
    }

    fn open(
        &self,
        params: &AlgorithmParameters,
        key: &CryptoKey,
        usage: KeyUsage,
        data: &[u8],
    ) -> Result<Vec<u8>> {
        ensure_key_algorithm(Self::IDENTIFIER, key)?;
        let gcm_params = Self::gcm_params(params, usage.name())?;
        key.require_usage(usage)?;
        let aad = gcm_params.additional_data.as_deref().unwrap_or_default();
        gcm::decrypt(key.secret()?, &gcm_params.iv, aad, data)
    }
}

impl Default for AesGcm {
    fn default() -> Self {
        Self::new()
    }
}

impl CryptoAlgorithm for AesGcm {
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

    fn encrypt(&self, params: &AlgorithmParameters, key: &CryptoKey, data: &[u8]) -> Result<Vec<u8>> {
        self.seal(params, key, KeyUsage::Encrypt, data)
    }

    fn decrypt(&self, params: &AlgorithmParameters, key: &CryptoKey, data: &[u8]) -> Result<Vec<u8>> {
        self.open(params, key, KeyUsage::Decrypt, data)
    }

    fn wrap_key(&self, params: &AlgorithmParameters, key: &CryptoKey, data: &[u8]) -> Result<Vec<u8>> {
        self.seal(params, key, KeyUsage::WrapKey, data)
    }

    fn unwrap_key(&self, params: &AlgorithmParameters, key: &CryptoKey, data: &[u8]) -> Result<Vec<u8>> {
        self.open(params, key, KeyUsage::UnwrapKey, data)
    }
}
