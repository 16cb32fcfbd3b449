//! AES 系列算法共享的密钥生成、导入和导出逻辑
use crate::common::identifiers::AlgorithmIdentifier;
use crate::common::jwk::JsonWebKey;
use crate::common::key::{
    CryptoKey, KeyAlgorithm, KeyData, KeyFormat, KeyMaterial, KeyType, check_non_empty_usages,
    check_usages,
};
use crate::common::params::AlgorithmParameters;
use crate::common::usage::KeyUsages;
use crate::common::utils::SecretBytes;
use crate::error::{Error, Result};
use std::sync::Arc;
use tracing::debug;

pub(crate) const VALID_LENGTHS: [usize; 3] = [128, 192, 256];

/// 一个 AES 变体的描述
pub(crate) struct AesVariant {
    pub identifier: AlgorithmIdentifier,
    pub allowed_usages: KeyUsages,
    /// JWK `alg` 的后缀，例如 `KW` 对应 `A128KW`
    pub jwk_suffix: &'static str,
}

impl AesVariant {
    fn jwk_alg(&self, length_bits: usize) -> String {
        format!("A{}{}", length_bits, self.jwk_suffix)
    }

    fn new_key(&self, bytes: SecretBytes, extractable: bool, usages: KeyUsages) -> Arc<CryptoKey> {
        let length = bytes.bit_len();
        debug!(algorithm = %self.identifier, length, extractable, "created AES key");
        CryptoKey::new(
            KeyAlgorithm::Aes {
                identifier: self.identifier,
                length,
            },
            KeyType::Secret,
            extractable,
            usages,
            KeyMaterial::Secret(bytes),
        )
    }

    fn check_usages(&self, usages: KeyUsages) -> Result<()> {
        check_usages(self.identifier, usages, self.allowed_usages)?;
        check_non_empty_usages(self.identifier, usages)
    }

    pub fn generate(
        &self,
        params: &AlgorithmParameters,
        extractable: bool,
        usages: KeyUsages,
    ) -> Result<Arc<CryptoKey>> {
        let length = match params {
            AlgorithmParameters::AesKey { identifier, length } if *identifier == self.identifier => {
                *length
            }
            other => return Err(other.unsupported("generateKey")),
        };
        self.check_usages(usages)?;

        if !VALID_LENGTHS.contains(&length) {
            return Err(Error::operation(format!("invalid AES key length: {} bits", length)));
        }
        let bytes = SecretBytes::random(length / 8)?;
        Ok(self.new_key(bytes, extractable, usages))
    }

    pub fn import(
        &self,
        data: KeyData,
        params: &AlgorithmParameters,
        extractable: bool,
        usages: KeyUsages,
    ) -> Result<Arc<CryptoKey>> {
        if params.identifier() != self.identifier {
            return Err(params.unsupported("importKey"));
        }
        self.check_usages(usages)?;

        let bytes = match data {
            KeyData::Raw(bytes) => SecretBytes::new(bytes),
            KeyData::Jwk(jwk) => jwk.check_octet_sequence("enc", extractable, usages, |len, alg| {
                let bits = len * 8;
                VALID_LENGTHS.contains(&bits) && alg.is_none_or(|alg| alg == self.jwk_alg(bits))
            })?,
            other => {
                return Err(Error::UnsupportedFormat {
                    format: other.format().to_string(),
                    algorithm: self.identifier.to_string(),
                });
            }
        };
        if !VALID_LENGTHS.contains(&bytes.bit_len()) {
            return Err(Error::data(format!(
                "invalid AES key length: {} bytes",
                bytes.len()
            )));
        }
        Ok(self.new_key(bytes, extractable, usages))
    }

    pub fn export(&self, format: KeyFormat, key: &CryptoKey) -> Result<KeyData> {
        let secret = key.secret()?;
        match format {
            KeyFormat::Raw => Ok(KeyData::Raw(secret.to_vec())),
            KeyFormat::Jwk => Ok(KeyData::Jwk(JsonWebKey::octet_sequence(
                secret,
                Some(&self.jwk_alg(secret.bit_len())),
                key.usages(),
                key.extractable(),
            ))),
            other => Err(Error::UnsupportedFormat {
                format: other.to_string(),
                algorithm: self.identifier.to_string(),
            }),
        }
    }
}
