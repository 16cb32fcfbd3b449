//! HMAC 消息认证算法
use crate::common::identifiers::{AlgorithmIdentifier, HashAlgorithm};
use crate::common::jwk::JsonWebKey;
use crate::common::key::{
    CryptoKey, KeyAlgorithm, KeyData, KeyFormat, KeyMaterial, KeyOrKeyPair, KeyType,
    check_non_empty_usages, check_usages,
};
use crate::common::params::{AlgorithmParameters, HmacKeyParams};
use crate::common::usage::{KeyUsage, KeyUsages};
use crate::common::utils::SecretBytes;
use crate::error::{Error, Result};
use crate::primitives;
use crate::traits::{CryptoAlgorithm, ensure_key_algorithm};
use std::sync::Arc;
use tracing::debug;

/// HMAC 算法
#[derive(Debug, Default, Clone, Copy)]
pub struct Hmac;

impl Hmac {
    pub const IDENTIFIER: AlgorithmIdentifier = AlgorithmIdentifier::Hmac;

    /// 生成密钥的最大长度（比特），为最大哈希块长度的 8 倍
    pub const MAX_GENERATED_LENGTH: usize = 8 * 1024;

    pub fn new() -> Self {
        Self
    }

    fn allowed_usages() -> KeyUsages {
        KeyUsages::from_slice(&[KeyUsage::Sign, KeyUsage::Verify])
    }

    fn check_usages(usages: KeyUsages) -> Result<()> {
        check_usages(Self::IDENTIFIER, usages, Self::allowed_usages())?;
        check_non_empty_usages(Self::IDENTIFIER, usages)
    }

    fn key_params(params: &AlgorithmParameters, operation: &str) -> Result<HmacKeyParams> {
        match params {
            AlgorithmParameters::HmacKey(key_params) => Ok(key_params.clone()),
            other => Err(other.unsupported(operation)),
        }
    }

    /// JWK `alg` 名称
    fn jwk_alg(hash: HashAlgorithm) -> &'static str {
        match hash {
            HashAlgorithm::Sha1 => "HS1",
            HashAlgorithm::Sha224 => "HS224",
            HashAlgorithm::Sha256 => "HS256",
            HashAlgorithm::Sha384 => "HS384",
            HashAlgorithm::Sha512 => "HS512",
        }
    }

    fn new_key(
        hash: HashAlgorithm,
        bytes: SecretBytes,
        extractable: bool,
        usages: KeyUsages,
    ) -> Arc<CryptoKey> {
        let length = bytes.bit_len();
        debug!(algorithm = %Self::IDENTIFIER, hash = %hash, length, extractable, "created HMAC key");
        CryptoKey::new(
            KeyAlgorithm::Hmac { hash, length },
            KeyType::Secret,
            extractable,
            usages,
            KeyMaterial::Secret(bytes),
        )
    }

    /// 签名/验证时确认密钥和参数的哈希一致，返回要使用的哈希
    fn operation_hash(params: &AlgorithmParameters, key: &CryptoKey, operation: &str) -> Result<HashAlgorithm> {
        ensure_key_algorithm(Self::IDENTIFIER, key)?;
        let key_hash = match key.algorithm() {
            KeyAlgorithm::Hmac { hash, .. } => *hash,
            other => {
                return Err(Error::AlgorithmMismatch {
                    key: format!("{:?}", other),
                    requested: Self::IDENTIFIER.name().to_string(),
                });
            }
        };
        match params {
            AlgorithmParameters::Identifier(AlgorithmIdentifier::Hmac) => Ok(key_hash),
            AlgorithmParameters::Hmac(hmac) if hmac.hash == key_hash => Ok(key_hash),
            AlgorithmParameters::Hmac(hmac) => Err(Error::AlgorithmMismatch {
                key: format!("{} with {}", Self::IDENTIFIER, key_hash),
                requested: format!("{} with {}", Self::IDENTIFIER, hmac.hash),
            }),
            other => Err(other.unsupported(operation)),
        }
    }
}

impl CryptoAlgorithm for Hmac {
    fn identifier(&self) -> AlgorithmIdentifier {
        Self::IDENTIFIER
    }

    fn generate_key(
        &self,
        params: &AlgorithmParameters,
        extractable: bool,
        usages: KeyUsages,
    ) -> Result<KeyOrKeyPair> {
        let params = Self::key_params(params, "generateKey")?;
        Self::check_usages(usages)?;

        let length = match params.length {
            Some(0) => return Err(Error::operation("HMAC key length must not be zero")),
            Some(length) => length,
            None => params.hash.block_size_bits(),
        };
        if length % 8 != 0 {
            return Err(Error::operation(format!(
                "HMAC key length must be a multiple of 8, got {}",
                length
            )));
        }
        if length > Self::MAX_GENERATED_LENGTH {
            return Err(Error::operation(format!(
                "HMAC key length {} exceeds the maximum of {} bits",
                length,
                Self::MAX_GENERATED_LENGTH
            )));
        }
        let bytes = SecretBytes::random(length / 8)?;
        Ok(KeyOrKeyPair::Key(Self::new_key(
            params.hash,
            bytes,
            extractable,
            usages,
        )))
    }

    fn import_key(
        &self,
        data: KeyData,
        params: &AlgorithmParameters,
        extractable: bool,
        usages: KeyUsages,
    ) -> Result<Arc<CryptoKey>> {
        let params = Self::key_params(params, "importKey")?;
        Self::check_usages(usages)?;

        let bytes = match data {
            KeyData::Raw(bytes) => SecretBytes::new(bytes),
            KeyData::Jwk(jwk) => jwk.check_octet_sequence("sig", extractable, usages, |_, alg| {
                alg.is_none_or(|alg| alg == Self::jwk_alg(params.hash))
            })?,
            other => {
                return Err(Error::UnsupportedFormat {
                    format: other.format().to_string(),
                    algorithm: Self::IDENTIFIER.to_string(),
                });
            }
        };
        if bytes.is_empty() {
            return Err(Error::data("HMAC key data must not be empty"));
        }
        if let Some(length) = params.length {
            if length != bytes.bit_len() {
                return Err(Error::data(format!(
                    "HMAC key length {} does not match key data of {} bits",
                    length,
                    bytes.bit_len()
                )));
            }
        }
        Ok(Self::new_key(params.hash, bytes, extractable, usages))
    }

    fn export_key(&self, format: KeyFormat, key: &CryptoKey) -> Result<KeyData> {
        ensure_key_algorithm(Self::IDENTIFIER, key)?;
        let secret = key.secret()?;
        match (format, key.algorithm().hash()) {
            (KeyFormat::Raw, _) => Ok(KeyData::Raw(secret.to_vec())),
            (KeyFormat::Jwk, Some(hash)) => Ok(KeyData::Jwk(JsonWebKey::octet_sequence(
                secret,
                Some(Self::jwk_alg(hash)),
                key.usages(),
                key.extractable(),
            ))),
            (other, _) => Err(Error::UnsupportedFormat {
                format: other.to_string(),
                algorithm: Self::IDENTIFIER.to_string(),
            }),
        }
    }

    fn sign(&self, params: &AlgorithmParameters, key: &CryptoKey, data: &[u8]) -> Result<Vec<u8>> {
        let hash = Self::operation_hash(params, key, "sign")?;
        key.require_usage(KeyUsage::Sign)?;
        primitives::hmac::sign(hash, key.secret()?, data)
    }

    fn verify(
        &self,
        params: &AlgorithmParameters,
        key: &CryptoKey,
        signature: &[u8],
        data: &[u8],
    ) -> Result<bool> {
        let hash = Self::operation_hash(params, key, "verify")?;
        key.require_usage(KeyUsage::Verify)?;
        primitives::hmac::verify(hash, key.secret()?, signature, data)
    }
}
