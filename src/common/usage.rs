//! 密钥用途标志
//!
//! `KeyUsages` 是一个小型位集合，记录密钥被允许执行的操作。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitAnd, BitOr};

/// 单个密钥用途
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyUsage {
    #[serde(rename = "encrypt")]
    Encrypt,
    #[serde(rename = "decrypt")]
    Decrypt,
    #[serde(rename = "sign")]
    Sign,
    #[serde(rename = "verify")]
    Verify,
    #[serde(rename = "deriveKey")]
    DeriveKey,
    #[serde(rename = "deriveBits")]
    DeriveBits,
    #[serde(rename = "wrapKey")]
    WrapKey,
    #[serde(rename = "unwrapKey")]
    UnwrapKey,
}

impl KeyUsage {
    pub const ALL: [KeyUsage; 8] = [
        KeyUsage::Encrypt,
        KeyUsage::Decrypt,
        KeyUsage::Sign,
        KeyUsage::Verify,
        KeyUsage::DeriveKey,
        KeyUsage::DeriveBits,
        KeyUsage::WrapKey,
        KeyUsage::UnwrapKey,
    ];

    fn bit(self) -> u8 {
        match self {
            KeyUsage::Encrypt => 1 << 0,
            KeyUsage::Decrypt => 1 << 1,
            KeyUsage::Sign => 1 << 2,
            KeyUsage::Verify => 1 << 3,
            KeyUsage::DeriveKey => 1 << 4,
            KeyUsage::DeriveBits => 1 << 5,
            KeyUsage::WrapKey => 1 << 6,
            KeyUsage::UnwrapKey => 1 << 7,
        }
    }

    /// Web Crypto 中使用的名称（也是 JWK `key_ops` 的取值）
    pub fn name(self) -> &'static str {
        match self {
            KeyUsage::Encrypt => "encrypt",
            KeyUsage::Decrypt => "decrypt",
            KeyUsage::Sign => "sign",
            KeyUsage::Verify => "verify",
            KeyUsage::DeriveKey => "deriveKey",
            KeyUsage::DeriveBits => "deriveBits",
            KeyUsage::WrapKey => "wrapKey",
            KeyUsage::UnwrapKey => "unwrapKey",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|usage| usage.name() == name)
    }
}

impl fmt::Display for KeyUsage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 密钥用途集合
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct KeyUsages(u8);

impl KeyUsages {
    pub const fn empty() -> Self {
        KeyUsages(0)
    }

    pub fn from_slice(usages: &[KeyUsage]) -> Self {
        usages.iter().fold(Self::empty(), |acc, usage| acc.with(*usage))
    }

    pub fn with(self, usage: KeyUsage) -> Self {
        KeyUsages(self.0 | usage.bit())
    }

    pub fn contains(&self, usage: KeyUsage) -> bool {
        self.0 & usage.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// `self` 中的每个用途都出现在 `other` 中
    pub fn is_subset_of(&self, other: KeyUsages) -> bool {
        self.0 & !other.0 == 0
    }

    /// `self` 中不属于 `allowed` 的用途
    pub fn difference(&self, allowed: KeyUsages) -> KeyUsages {
        KeyUsages(self.0 & !allowed.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = KeyUsage> + '_ {
        KeyUsage::ALL.into_iter().filter(|usage| self.contains(*usage))
    }

    pub fn names(&self) -> Vec<String> {
        self.iter().map(|usage| usage.name().to_string()).collect()
    }
}

impl From<KeyUsage> for KeyUsages {
    fn from(usage: KeyUsage) -> Self {
        KeyUsages::empty().with(usage)
    }
}

impl FromIterator<KeyUsage> for KeyUsages {
    fn from_iter<I: IntoIterator<Item = KeyUsage>>(iter: I) -> Self {
        iter.into_iter().fold(Self::empty(), |acc, usage| acc.with(usage))
    }
}

impl BitOr for KeyUsages {
    type Output = KeyUsages;

    fn bitor(self, rhs: Self) -> Self::Output {
        KeyUsages(self.0 | rhs.0)
    }
}

impl BitOr<KeyUsage> for KeyUsages {
    type Output = KeyUsages;

    fn bitor(self, rhs: KeyUsage) -> Self::Output {
        self.with(rhs)
    }
}

impl BitAnd for KeyUsages {
    type Output = KeyUsages;

    fn bitand(self, rhs: Self) -> Self::Output {
        KeyUsages(self.0 & rhs.0)
    }
}

impl fmt::Display for KeyUsages {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().map(KeyUsage::name).collect();
        write!(f, "[{}]", names.join(", "))
    }
}
