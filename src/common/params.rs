//! 算法参数
//!
//! 每种参数形状对应一个变体，构造后不可变。算法在收到自己不接受的形状时
//! 返回 `NotSupported`。

use crate::common::identifiers::{AlgorithmIdentifier, HashAlgorithm};
use crate::error::{Error, Result};

/// HMAC 生成/导入参数
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HmacKeyParams {
    pub hash: HashAlgorithm,
    /// 密钥长度（比特）；`None` 表示使用哈希分组长度
    pub length: Option<usize>,
}

/// HMAC 签名/验证参数
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HmacParams {
    pub hash: HashAlgorithm,
}

/// AES-GCM 加解密参数
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AesGcmParams {
    pub iv: Vec<u8>,
    pub additional_data: Option<Vec<u8>>,
    /// 认证标签长度（比特）；`None` 表示 128
    pub tag_length: Option<usize>,
}

/// RSA 密钥生成参数
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RsaHashedKeyGenParams {
    pub modulus_length: usize,
    /// 大端字节序的公钥指数
    pub public_exponent: Vec<u8>,
    pub hash: HashAlgorithm,
}

impl RsaHashedKeyGenParams {
    /// 65537
    pub const F4: [u8; 3] = [0x01, 0x00, 0x01];
}

/// RSA 密钥导入参数
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RsaHashedImportParams {
    pub hash: HashAlgorithm,
}

/// 算法参数
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AlgorithmParameters {
    /// 仅有算法名称
    Identifier(AlgorithmIdentifier),
    /// AES 系列的密钥生成参数，长度以比特计
    AesKey {
        identifier: AlgorithmIdentifier,
        length: usize,
    },
    AesGcm(AesGcmParams),
    HmacKey(HmacKeyParams),
    Hmac(HmacParams),
    RsaHashedKeyGen(RsaHashedKeyGenParams),
    RsaHashedImport(RsaHashedImportParams),
}

impl AlgorithmParameters {
    /// 参数所指向的算法
    pub fn identifier(&self) -> AlgorithmIdentifier {
        match self {
            AlgorithmParameters::Identifier(id) => *id,
            AlgorithmParameters::AesKey { identifier, .. } => *identifier,
            AlgorithmParameters::AesGcm(_) => AlgorithmIdentifier::AesGcm,
            AlgorithmParameters::HmacKey(_) | AlgorithmParameters::Hmac(_) => {
                AlgorithmIdentifier::Hmac
            }
            AlgorithmParameters::RsaHashedKeyGen(_) | AlgorithmParameters::RsaHashedImport(_) => {
                AlgorithmIdentifier::RsassaPkcs1V15
            }
        }
    }

    /// 以名称构造仅含标识符的参数
    pub fn named(name: &str) -> Result<Self> {
        AlgorithmIdentifier::from_name(name)
            .map(AlgorithmParameters::Identifier)
            .ok_or_else(|| Error::NotSupported(format!("unknown algorithm: {}", name)))
    }

    pub fn hmac_key(hash: HashAlgorithm) -> Self {
        AlgorithmParameters::HmacKey(HmacKeyParams { hash, length: None })
    }

    pub fn hmac(hash: HashAlgorithm) -> Self {
        AlgorithmParameters::Hmac(HmacParams { hash })
    }

    pub fn aes_key(identifier: AlgorithmIdentifier, length: usize) -> Self {
        AlgorithmParameters::AesKey { identifier, length }
    }

    pub fn aes_gcm(iv: impl Into<Vec<u8>>) -> Self {
        AlgorithmParameters::AesGcm(AesGcmParams {
            iv: iv.into(),
            additional_data: None,
            tag_length: None,
        })
    }

    pub(crate) fn unsupported(&self, operation: &str) -> Error {
        Error::NotSupported(format!(
            "{} does not accept these parameters for {}",
            self.identifier(),
            operation
        ))
    }
}

impl From<AlgorithmIdentifier> for AlgorithmParameters {
    fn from(id: AlgorithmIdentifier) -> Self {
        AlgorithmParameters::Identifier(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameter_identifier() {
        assert_eq!(
            AlgorithmParameters::hmac_key(HashAlgorithm::Sha256).identifier(),
            AlgorithmIdentifier::Hmac
        );
        assert_eq!(
            AlgorithmParameters::aes_key(AlgorithmIdentifier::AesKw, 256).identifier(),
            AlgorithmIdentifier::AesKw
        );
        assert_eq!(
            AlgorithmParameters::aes_gcm([0u8; 12]).identifier(),
            AlgorithmIdentifier::AesGcm
        );
    }

    #[test]
    fn test_named_parameters() {
        assert_eq!(
            AlgorithmParameters::named("aes-kw").unwrap(),
            AlgorithmParameters::Identifier(AlgorithmIdentifier::AesKw)
        );
        assert!(matches!(
            AlgorithmParameters::named("ECDSA"),
            Err(Error::NotSupported(_))
        ));
    }
}
