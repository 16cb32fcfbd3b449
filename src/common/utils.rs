use crate::error::{Error, Result};
use rand_core::{OsRng, TryRngCore};
use std::fmt;
use std::ops::Deref;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// 自动清零的字节向量，用于对称密钥等敏感数据
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SecretBytes(Vec<u8>);

impl SecretBytes {
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self(data.into())
    }

    /// 由操作系统随机源生成指定长度的密钥字节
    /// 分配失败时返回 `OperationError`
    pub fn random(len: usize) -> Result<Self> {
        let mut bytes = Vec::new();
        bytes
            .try_reserve_exact(len)
            .map_err(|e| Error::operation(format!("cannot allocate {} key bytes: {}", len, e)))?;
        bytes.resize(len, 0u8);
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| Error::operation(format!("random generation failed: {}", e)))?;
        Ok(Self(bytes))
    }

    /// 长度（比特）
    pub fn bit_len(&self) -> usize {
        self.0.len() * 8
    }
}

impl Deref for SecretBytes {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<[u8]> for SecretBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

// 不输出密钥内容
impl fmt::Debug for SecretBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretBytes({} bytes)", self.0.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_secret_bytes() {
        let a = SecretBytes::random(32).unwrap();
        let b = SecretBytes::random(32).unwrap();
        assert_eq!(a.len(), 32);
        assert_eq!(a.bit_len(), 256);
        assert_ne!(a, b);
    }

    #[test]
    fn test_random_oversized_is_operation_error() {
        assert!(matches!(
            SecretBytes::random(usize::MAX),
            Err(Error::OperationError(_))
        ));
    }

    #[test]
    fn test_debug_hides_material() {
        let secret = SecretBytes::new(b"top secret".to_vec());
        let rendered = format!("{:?}", secret);
        assert_eq!(rendered, "SecretBytes(10 bytes)");
        assert!(!rendered.contains("secret"));
    }
}
