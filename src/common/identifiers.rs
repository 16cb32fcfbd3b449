use serde::{Deserialize, Serialize};
use std::fmt;

/// 已知的算法标识符
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlgorithmIdentifier {
    Hmac,
    AesKw,
    AesGcm,
    RsassaPkcs1V15,
}

impl AlgorithmIdentifier {
    pub const ALL: [AlgorithmIdentifier; 4] = [
        AlgorithmIdentifier::Hmac,
        AlgorithmIdentifier::AesKw,
        AlgorithmIdentifier::AesGcm,
        AlgorithmIdentifier::RsassaPkcs1V15,
    ];

    /// 规范化的 Web Crypto 算法名称
    pub fn name(&self) -> &'static str {
        match self {
            AlgorithmIdentifier::Hmac => "HMAC",
            AlgorithmIdentifier::AesKw => "AES-KW",
            AlgorithmIdentifier::AesGcm => "AES-GCM",
            AlgorithmIdentifier::RsassaPkcs1V15 => "RSASSA-PKCS1-v1_5",
        }
    }

    /// 按名称查找，大小写不敏感
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|id| id.name().eq_ignore_ascii_case(name.trim()))
    }
}

impl fmt::Display for AlgorithmIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 哈希算法
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HashAlgorithm {
    Sha1,
    Sha224,
    Sha256,
    Sha384,
    Sha512,
}

impl HashAlgorithm {
    pub fn name(&self) -> &'static str {
        match self {
            HashAlgorithm::Sha1 => "SHA-1",
            HashAlgorithm::Sha224 => "SHA-224",
            HashAlgorithm::Sha256 => "SHA-256",
            HashAlgorithm::Sha384 => "SHA-384",
            HashAlgorithm::Sha512 => "SHA-512",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        [
            HashAlgorithm::Sha1,
            HashAlgorithm::Sha224,
            HashAlgorithm::Sha256,
            HashAlgorithm::Sha384,
            HashAlgorithm::Sha512,
        ]
        .into_iter()
        .find(|hash| hash.name().eq_ignore_ascii_case(name.trim()))
    }

    /// 分组长度（比特），也是 HMAC 未指定长度时的默认密钥长度
    pub fn block_size_bits(&self) -> usize {
        match self {
            HashAlgorithm::Sha1 | HashAlgorithm::Sha224 | HashAlgorithm::Sha256 => 512,
            HashAlgorithm::Sha384 | HashAlgorithm::Sha512 => 1024,
        }
    }

    /// 输出长度（字节）
    pub fn output_len(&self) -> usize {
        match self {
            HashAlgorithm::Sha1 => 20,
            HashAlgorithm::Sha224 => 28,
            HashAlgorithm::Sha256 => 32,
            HashAlgorithm::Sha384 => 48,
            HashAlgorithm::Sha512 => 64,
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
