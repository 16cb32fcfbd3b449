//! # Subtle-Kit: Web Crypto keyed-algorithm dispatch
//!
//! `subtle-kit` 以 Web Crypto（SubtleCrypto）的语义实现密钥算法的分发：
//! 调用方给出算法参数、密钥和数据，库负责查找算法、校验密钥用途与算法匹配，
//! 然后才进入底层密码学原语。
//!
//! ## Core Concepts
//!
//! - **`AlgorithmRegistry`**: 算法标识符到实现的映射，由调用方显式创建。
//! - **`CryptoAlgorithm`**: 每个算法实现的公共特征，未实现的能力返回 `NotSupported`。
//! - **`CryptoKey`**: 不可变、可在线程间共享的密钥对象，带有算法、类型、可导出性与用途。
//! - **`SubtleEngine`** / **`AsyncSubtleEngine`**: 同步与异步的门面。
//!
//! ## Quick Start
//!
//! ```rust
//! use subtle_kit::prelude::*;
//!
//! fn main() -> subtle_kit::Result<()> {
//!     let engine = SubtleEngine::new();
//!     let key = engine
//!         .generate_key(
//!             &AlgorithmParameters::hmac_key(HashAlgorithm::Sha256),
//!             false,
//!             KeyUsages::from_slice(&[KeyUsage::Sign, KeyUsage::Verify]),
//!         )?
//!         .into_key()
//!         .expect("HMAC generates a single key");
//!
//!     let params = AlgorithmParameters::hmac(HashAlgorithm::Sha256);
//!     let signature = engine.sign(&params, &key, b"Hello, Subtle-Kit!")?;
//!     assert!(engine.verify(&params, &key, &signature, b"Hello, Subtle-Kit!")?);
//!     Ok(())
//! }
//! ```

pub mod common;
pub mod engine;
pub mod error;
pub(crate) mod primitives;
pub mod registry;
pub mod systems;
pub mod traits;

pub use common::{
    AlgorithmIdentifier, ConfigManager, CryptoKey, CryptoKeyPair, HashAlgorithm, JsonWebKey,
    KeyAlgorithm, KeyData, KeyFormat, KeyOrKeyPair, KeyType, KeyUsage, KeyUsages, SubtleConfig,
};
#[cfg(feature = "async-engine")]
pub use engine::async_::AsyncSubtleEngine;
pub use engine::SubtleEngine;
pub use error::{Error, ErrorKind, Result};
pub use registry::AlgorithmRegistry;
pub use traits::CryptoAlgorithm;

// --- Prelude ---
// A collection of the most commonly used traits, structs, and enums.
pub mod prelude {
    pub use crate::common::params::{
        AesGcmParams, AlgorithmParameters, HmacKeyParams, HmacParams, RsaHashedImportParams,
        RsaHashedKeyGenParams,
    };
    pub use crate::common::{
        AlgorithmIdentifier, CryptoKey, CryptoKeyPair, HashAlgorithm, JsonWebKey, KeyAlgorithm,
        KeyFormat, KeyOrKeyPair, KeyType, KeyUsage, KeyUsages,
    };
    #[cfg(feature = "async-engine")]
    pub use crate::engine::async_::AsyncSubtleEngine;
    pub use crate::engine::SubtleEngine;
    pub use crate::error::{Error, ErrorKind};
    pub use crate::registry::AlgorithmRegistry;
    pub use crate::traits::CryptoAlgorithm;
}

/// The version of the `subtle-kit` crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
