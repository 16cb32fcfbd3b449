//! RSASSA-PKCS1-v1_5 签名算法
//!
//! 生成密钥时返回密钥对：私钥只能签名，公钥只能验证且总是可导出。
//! 支持 `spki`（公钥）和 `pkcs8`（私钥）两种格式。
use crate::common::identifiers::{AlgorithmIdentifier, HashAlgorithm};
use crate::common::key::{
    CryptoKey, CryptoKeyPair, KeyAlgorithm, KeyData, KeyFormat, KeyMaterial, KeyOrKeyPair,
    KeyType, check_non_empty_usages, check_usages,
};
use crate::common::params::AlgorithmParameters;
use crate::common::usage::{KeyUsage, KeyUsages};
use crate::error::{Error, Result};
use crate::primitives;
use crate::traits::{CryptoAlgorithm, ensure_key_algorithm};
use rsa::traits::PublicKeyParts;
use rsa::{RsaPrivateKey, RsaPublicKey};
use std::sync::Arc;
use tracing::debug;

/// 默认的最小模数长度（比特）
pub const DEFAULT_MIN_MODULUS_LENGTH: usize = 1024;
/// 默认的最大模数长度（比特）
pub const DEFAULT_MAX_MODULUS_LENGTH: usize = 16384;

/// RSASSA-PKCS1-v1_5 算法
#[derive(Debug, Clone)]
pub struct RsassaPkcs1V15 {
    min_modulus_length: usize,
    max_modulus_length: usize,
}

impl RsassaPkcs1V15 {
    pub const IDENTIFIER: AlgorithmIdentifier = AlgorithmIdentifier::RsassaPkcs1V15;

    pub fn new() -> Self {
        Self::with_min_modulus_length(DEFAULT_MIN_MODULUS_LENGTH)
    }

    pub fn with_min_modulus_length(min_modulus_length: usize) -> Self {
        Self::with_modulus_bounds(min_modulus_length, DEFAULT_MAX_MODULUS_LENGTH)
    }

    /// 生成密钥时允许的模数长度范围（含两端）
    pub fn with_modulus_bounds(min_modulus_length: usize, max_modulus_length: usize) -> Self {
        Self {
            min_modulus_length,
            max_modulus_length,
        }
    }

    pub fn min_modulus_length(&self) -> usize {
        self.min_modulus_length
    }

    pub fn max_modulus_length(&self) -> usize {
        self.max_modulus_length
    }

    fn key_algorithm(public_key: &RsaPublicKey, hash: HashAlgorithm) -> KeyAlgorithm {
        KeyAlgorithm::RsaHashed {
            identifier: Self::IDENTIFIER,
            modulus_length: public_key.n().bits(),
            public_exponent: public_key.e().to_bytes_be(),
            hash,
        }
    }

    fn public_key(
        key: RsaPublicKey,
        hash: HashAlgorithm,
        usages: KeyUsages,
    ) -> Arc<CryptoKey> {
        let algorithm = Self::key_algorithm(&key, hash);
        CryptoKey::new(algorithm, KeyType::Public, true, usages, KeyMaterial::RsaPublic(key))
    }

    fn private_key(
        key: RsaPrivateKey,
        hash: HashAlgorithm,
        extractable: bool,
        usages: KeyUsages,
    ) -> Arc<CryptoKey> {
        let algorithm = Self::key_algorithm(&key.to_public_key(), hash);
        CryptoKey::new(
            algorithm,
            KeyType::Private,
            extractable,
            usages,
            KeyMaterial::RsaPrivate(key),
        )
    }

    fn key_hash(key: &CryptoKey) -> Result<HashAlgorithm> {
        key.algorithm()
            .hash()
            .ok_or_else(|| Error::operation("RSA key carries no hash algorithm"))
    }

    fn ensure_identifier_params(params: &AlgorithmParameters, operation: &str) -> Result<()> {
        match params {
            AlgorithmParameters::Identifier(Self::IDENTIFIER) => Ok(()),
            other => Err(other.unsupported(operation)),
        }
    }

    fn unsupported_format(format: KeyFormat) -> Error {
        Error::UnsupportedFormat {
            format: format.to_string(),
            algorithm: Self::IDENTIFIER.to_string(),
        }
    }
}

impl Default for RsassaPkcs1V15 {
    fn default() -> Self {
        Self::new()
    }
}

impl CryptoAlgorithm for RsassaPkcs1V15 {
    fn identifier(&self) -> AlgorithmIdentifier {
        Self::IDENTIFIER
    }

    fn generate_key(
        &self,
        params: &AlgorithmParameters,
        extractable: bool,
        usages: KeyUsages,
    ) -> Result<KeyOrKeyPair> {
        let params = match params {
            AlgorithmParameters::RsaHashedKeyGen(gen_params) => gen_params,
            other => return Err(other.unsupported("generateKey")),
        };
        check_usages(
            Self::IDENTIFIER,
            usages,
            KeyUsages::from_slice(&[KeyUsage::Sign, KeyUsage::Verify]),
        )?;
        let private_usages = usages & KeyUsage::Sign.into();
        let public_usages = usages & KeyUsage::Verify.into();
        check_non_empty_usages(Self::IDENTIFIER, private_usages)?;

        if params.modulus_length < self.min_modulus_length {
            return Err(Error::operation(format!(
                "RSA modulus length {} is below the minimum of {}",
                params.modulus_length, self.min_modulus_length
            )));
        }
        if params.modulus_length > self.max_modulus_length {
            return Err(Error::operation(format!(
                "RSA modulus length {} exceeds the maximum of {}",
                params.modulus_length, self.max_modulus_length
            )));
        }
        let private_key = primitives::rsassa::generate(params.modulus_length, &params.public_exponent)?;
        let public_key = private_key.to_public_key();
        debug!(
            algorithm = %Self::IDENTIFIER,
            modulus_length = params.modulus_length,
            hash = %params.hash,
            extractable,
            "created RSA key pair"
        );

        Ok(KeyOrKeyPair::KeyPair(CryptoKeyPair {
            public_key: Self::public_key(public_key, params.hash, public_usages),
            private_key: Self::private_key(private_key, params.hash, extractable, private_usages),
        }))
    }

    fn import_key(
        &self,
        data: KeyData,
        params: &AlgorithmParameters,
        extractable: bool,
        usages: KeyUsages,
    ) -> Result<Arc<CryptoKey>> {
        let hash = match params {
            AlgorithmParameters::RsaHashedImport(import_params) => import_params.hash,
            other => return Err(other.unsupported("importKey")),
        };
        match data {
            KeyData::Spki(der) => {
                check_usages(Self::IDENTIFIER, usages, KeyUsage::Verify.into())?;
                let key = primitives::rsassa::decode_spki(&der)?;
                debug!(algorithm = %Self::IDENTIFIER, hash = %hash, "imported RSA public key");
                Ok(Self::public_key(key, hash, usages))
            }
            KeyData::Pkcs8(der) => {
                check_usages(Self::IDENTIFIER, usages, KeyUsage::Sign.into())?;
                check_non_empty_usages(Self::IDENTIFIER, usages)?;
                let key = primitives::rsassa::decode_pkcs8(&der)?;
                debug!(algorithm = %Self::IDENTIFIER, hash = %hash, extractable, "imported RSA private key");
                Ok(Self::private_key(key, hash, extractable, usages))
            }
            other => Err(Self::unsupported_format(other.format())),
        }
    }

    fn export_key(&self, format: KeyFormat, key: &CryptoKey) -> Result<KeyData> {
        ensure_key_algorithm(Self::IDENTIFIER, key)?;
        match (format, key.material()) {
            (KeyFormat::Spki, KeyMaterial::RsaPublic(public_key)) => {
                Ok(KeyData::Spki(primitives::rsassa::encode_spki(public_key)?))
            }
            (KeyFormat::Pkcs8, KeyMaterial::RsaPrivate(private_key)) => {
                Ok(KeyData::Pkcs8(primitives::rsassa::encode_pkcs8(private_key)?))
            }
            (KeyFormat::Spki | KeyFormat::Pkcs8, _) => Err(Error::InvalidAccess(format!(
                "cannot export a {} key as {}",
                key.key_type().name(),
                format
            ))),
            (other, _) => Err(Self::unsupported_format(other)),
        }
    }

    fn sign(&self, params: &AlgorithmParameters, key: &CryptoKey, data: &[u8]) -> Result<Vec<u8>> {
        ensure_key_algorithm(Self::IDENTIFIER, key)?;
        Self::ensure_identifier_params(params, "sign")?;
        key.require_usage(KeyUsage::Sign)?;
        match key.material() {
            KeyMaterial::RsaPrivate(private_key) => {
                primitives::rsassa::sign(Self::key_hash(key)?, private_key, data)
            }
            _ => Err(Error::InvalidAccess("signing requires a private key".to_string())),
        }
    }

    fn verify(
        &self,
        params: &AlgorithmParameters,
        key: &CryptoKey,
        signature: &[u8],
        data: &[u8],
    ) -> Result<bool> {
        ensure_key_algorithm(Self::IDENTIFIER, key)?;
        Self::ensure_identifier_params(params, "verify")?;
        key.require_usage(KeyUsage::Verify)?;
        match key.material() {
            KeyMaterial::RsaPublic(public_key) => {
                primitives::rsassa::verify(Self::key_hash(key)?, public_key, signature, data)
            }
            _ => Err(Error::InvalidAccess("verification requires a public key".to_string())),
        }
    }
}
