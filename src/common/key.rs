//! 密钥对象
//!
//! `CryptoKey` 在创建后不可变，通过 `Arc` 在线程间共享，读取无需加锁。
//! 对称密钥材料在最后一个引用释放时被清零。

use crate::common::identifiers::{AlgorithmIdentifier, HashAlgorithm};
use crate::common::jwk::JsonWebKey;
use crate::common::usage::{KeyUsage, KeyUsages};
use crate::common::utils::SecretBytes;
use crate::error::{Error, Result};
use std::fmt;
use std::sync::Arc;

/// 密钥类型
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyType {
    Secret,
    Public,
    Private,
}

impl KeyType {
    pub fn name(&self) -> &'static str {
        match self {
            KeyType::Secret => "secret",
            KeyType::Public => "public",
            KeyType::Private => "private",
        }
    }
}

/// 密钥上记录的算法信息
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KeyAlgorithm {
    Aes {
        identifier: AlgorithmIdentifier,
        /// 比特
        length: usize,
    },
    Hmac {
        hash: HashAlgorithm,
        /// 比特
        length: usize,
    },
    RsaHashed {
        identifier: AlgorithmIdentifier,
        modulus_length: usize,
        public_exponent: Vec<u8>,
        hash: HashAlgorithm,
    },
}

impl KeyAlgorithm {
    pub fn identifier(&self) -> AlgorithmIdentifier {
        match self {
            KeyAlgorithm::Aes { identifier, .. } => *identifier,
            KeyAlgorithm::Hmac { .. } => AlgorithmIdentifier::Hmac,
            KeyAlgorithm::RsaHashed { identifier, .. } => *identifier,
        }
    }

    /// 密钥绑定的哈希算法（AES 密钥没有）
    pub fn hash(&self) -> Option<HashAlgorithm> {
        match self {
            KeyAlgorithm::Aes { .. } => None,
            KeyAlgorithm::Hmac { hash, .. } => Some(*hash),
            KeyAlgorithm::RsaHashed { hash, .. } => Some(*hash),
        }
    }
}

/// 密钥材料
pub(crate) enum KeyMaterial {
    Secret(SecretBytes),
    #[cfg(feature = "rsassa")]
    RsaPublic(rsa::RsaPublicKey),
    #[cfg(feature = "rsassa")]
    RsaPrivate(rsa::RsaPrivateKey),
}

/// 不可变的密钥对象
pub struct CryptoKey {
    algorithm: KeyAlgorithm,
    key_type: KeyType,
    extractable: bool,
    usages: KeyUsages,
    material: KeyMaterial,
}

impl CryptoKey {
    pub(crate) fn new(
        algorithm: KeyAlgorithm,
        key_type: KeyType,
        extractable: bool,
        usages: KeyUsages,
        material: KeyMaterial,
    ) -> Arc<Self> {
        Arc::new(Self {
            algorithm,
            key_type,
            extractable,
            usages,
            material,
        })
    }

    pub fn algorithm(&self) -> &KeyAlgorithm {
        &self.algorithm
    }

    pub fn algorithm_identifier(&self) -> AlgorithmIdentifier {
        self.algorithm.identifier()
    }

    pub fn key_type(&self) -> KeyType {
        self.key_type
    }

    pub fn extractable(&self) -> bool {
        self.extractable
    }

    pub fn usages(&self) -> KeyUsages {
        self.usages
    }

    #[cfg_attr(not(feature = "rsassa"), allow(dead_code))]
    pub(crate) fn material(&self) -> &KeyMaterial {
        &self.material
    }

    /// 对称密钥字节；非对称密钥返回 `NotSupported`
    pub(crate) fn secret(&self) -> Result<&SecretBytes> {
        match &self.material {
            KeyMaterial::Secret(bytes) => Ok(bytes),
            #[cfg(feature = "rsassa")]
            _ => Err(Error::NotSupported(format!(
                "{} key has no secret material",
                self.key_type.name()
            ))),
        }
    }

    /// 检查密钥是否具备操作所需的用途
    pub fn require_usage(&self, usage: KeyUsage) -> Result<()> {
        if self.usages.contains(usage) {
            Ok(())
        } else {
            Err(Error::InvalidAccess(format!(
                "key usages {} do not include {}",
                self.usages, usage
            )))
        }
    }
}

impl fmt::Debug for CryptoKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CryptoKey")
            .field("algorithm", &self.algorithm)
            .field("type", &self.key_type.name())
            .field("extractable", &self.extractable)
            .field("usages", &self.usages)
            .finish_non_exhaustive()
    }
}

/// 非对称密钥对
#[derive(Clone, Debug)]
pub struct CryptoKeyPair {
    pub public_key: Arc<CryptoKey>,
    pub private_key: Arc<CryptoKey>,
}

/// `generate_key` 的结果
#[derive(Clone, Debug)]
pub enum KeyOrKeyPair {
    Key(Arc<CryptoKey>),
    KeyPair(CryptoKeyPair),
}

impl KeyOrKeyPair {
    pub fn into_key(self) -> Option<Arc<CryptoKey>> {
        match self {
            KeyOrKeyPair::Key(key) => Some(key),
            KeyOrKeyPair::KeyPair(_) => None,
        }
    }

    pub fn into_key_pair(self) -> Option<CryptoKeyPair> {
        match self {
            KeyOrKeyPair::Key(_) => None,
            KeyOrKeyPair::KeyPair(pair) => Some(pair),
        }
    }
}

/// 密钥格式
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyFormat {
    Raw,
    Spki,
    Pkcs8,
    Jwk,
}

impl KeyFormat {
    pub fn name(&self) -> &'static str {
        match self {
            KeyFormat::Raw => "raw",
            KeyFormat::Spki => "spki",
            KeyFormat::Pkcs8 => "pkcs8",
            KeyFormat::Jwk => "jwk",
        }
    }
}

impl fmt::Display for KeyFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 带格式的密钥数据，用于导入与导出
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KeyData {
    Raw(Vec<u8>),
    Spki(Vec<u8>),
    Pkcs8(Vec<u8>),
    Jwk(JsonWebKey),
}

impl KeyData {
    /// 由格式和字节构造；JWK 的字节为 UTF-8 JSON
    pub fn from_bytes(format: KeyFormat, bytes: &[u8]) -> Result<Self> {
        Ok(match format {
            KeyFormat::Raw => KeyData::Raw(bytes.to_vec()),
            KeyFormat::Spki => KeyData::Spki(bytes.to_vec()),
            KeyFormat::Pkcs8 => KeyData::Pkcs8(bytes.to_vec()),
            KeyFormat::Jwk => KeyData::Jwk(JsonWebKey::from_json(bytes)?),
        })
    }

    pub fn format(&self) -> KeyFormat {
        match self {
            KeyData::Raw(_) => KeyFormat::Raw,
            KeyData::Spki(_) => KeyFormat::Spki,
            KeyData::Pkcs8(_) => KeyFormat::Pkcs8,
            KeyData::Jwk(_) => KeyFormat::Jwk,
        }
    }

    /// 转为字节；JWK 序列化为 JSON
    pub fn into_bytes(self) -> Result<Vec<u8>> {
        match self {
            KeyData::Raw(bytes) | KeyData::Spki(bytes) | KeyData::Pkcs8(bytes) => Ok(bytes),
            KeyData::Jwk(jwk) => jwk.to_json(),
        }
    }
}

/// 校验请求的用途是否为算法允许用途的子集
pub(crate) fn check_usages(
    identifier: AlgorithmIdentifier,
    usages: KeyUsages,
    allowed: KeyUsages,
) -> Result<()> {
    let invalid = usages.difference(allowed);
    if !invalid.is_empty() {
        return Err(Error::InvalidUsage {
            algorithm: identifier.name().to_string(),
            usages: invalid.to_string(),
        });
    }
    Ok(())
}

/// 对称密钥和私钥必须至少有一个用途
pub(crate) fn check_non_empty_usages(
    identifier: AlgorithmIdentifier,
    usages: KeyUsages,
) -> Result<()> {
    if usages.is_empty() {
        return Err(Error::InvalidUsage {
            algorithm: identifier.name().to_string(),
            usages: usages.to_string(),
        });
    }
    Ok(())
}
