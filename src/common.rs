//! 通用模块，包含密钥模型、算法参数、配置和共享的工具函数

pub mod config;
pub mod identifiers;
pub mod jwk;
pub mod key;
pub mod params;
pub mod usage;
pub mod utils;

pub use self::config::{ConfigManager, SubtleConfig};
pub use self::identifiers::{AlgorithmIdentifier, HashAlgorithm};
pub use self::jwk::JsonWebKey;
pub use self::key::{CryptoKey, CryptoKeyPair, KeyAlgorithm, KeyData, KeyFormat, KeyOrKeyPair, KeyType};
pub use self::params::{
    AesGcmParams, AlgorithmParameters, HmacKeyParams, HmacParams, RsaHashedImportParams,
    RsaHashedKeyGenParams,
};
pub use self::usage::{KeyUsage, KeyUsages};
pub use self::utils::SecretBytes;
