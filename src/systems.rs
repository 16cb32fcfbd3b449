//! 算法实现集合
//!
//! 每个算法标识符对应一个实现 `CryptoAlgorithm` 的类型。
pub(crate) mod aes;
pub mod aes_gcm;
pub mod aes_kw;
pub mod hmac;
#[cfg(feature = "rsassa")]
pub mod rsassa;

pub use aes_gcm::AesGcm;
pub use aes_kw::AesKw;
pub use hmac::Hmac;
#[cfg(feature = "rsassa")]
pub use rsassa::RsassaPkcs1V15;
