//! JSON Web Key（仅对称密钥使用的 `oct` 类型）

use crate::common::usage::{KeyUsage, KeyUsages};
use crate::common::utils::SecretBytes;
use crate::error::{Error, Result};
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use serde::{Deserialize, Serialize};

/// JSON Web Key
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonWebKey {
    pub kty: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub k: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alg: Option<String>,
    #[serde(rename = "use", default, skip_serializing_if = "Option::is_none")]
    pub key_use: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_ops: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ext: Option<bool>,
}

impl JsonWebKey {
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|e| Error::data(format!("malformed JWK: {}", e)))
    }

    pub fn to_json(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// 由对称密钥构造 JWK
    pub(crate) fn octet_sequence(
        key: &[u8],
        alg: Option<&str>,
        usages: KeyUsages,
        extractable: bool,
    ) -> Self {
        Self {
            kty: "oct".to_string(),
            k: Some(URL_SAFE_NO_PAD.encode(key)),
            alg: alg.map(str::to_string),
            key_use: None,
            key_ops: Some(usages.names()),
            ext: Some(extractable),
        }
    }

    /// 导入对称 JWK 时的公共检查，返回解码后的密钥字节
    ///
    /// `expected_use` 是该算法允许的 `use` 取值；`alg` 的比对由调用方提供的闭包完成，
    /// 闭包收到解码后的密钥字节长度（字节）。
    pub(crate) fn check_octet_sequence<F>(
        &self,
        expected_use: &str,
        extractable: bool,
        usages: KeyUsages,
        check_alg: F,
    ) -> Result<SecretBytes>
    where
        F: FnOnce(usize, Option<&str>) -> bool,
    {
        if self.kty != "oct" {
            return Err(Error::data(format!("unexpected JWK kty: {}", self.kty)));
        }
        let encoded = self
            .k
            .as_deref()
            .ok_or_else(|| Error::data("JWK is missing the k member"))?;
        let key = SecretBytes::new(
            URL_SAFE_NO_PAD
                .decode(encoded)
                .map_err(|e| Error::data(format!("invalid base64url in k: {}", e)))?,
        );

        if let Some(key_use) = &self.key_use {
            if key_use != expected_use {
                return Err(Error::data(format!("unexpected JWK use: {}", key_use)));
            }
        }
        if let Some(ops) = &self.key_ops {
            let mut allowed = KeyUsages::empty();
            for op in ops {
                let usage = KeyUsage::from_name(op)
                    .ok_or_else(|| Error::data(format!("unknown key_ops entry: {}", op)))?;
                allowed = allowed | usage;
            }
            if !usages.is_subset_of(allowed) {
                return Err(Error::data("requested usages exceed JWK key_ops"));
            }
        }
        if self.ext == Some(false) && extractable {
            return Err(Error::data("JWK is not extractable"));
        }
        if !check_alg(key.len(), self.alg.as_deref()) {
            return Err(Error::data(format!(
                "JWK alg {:?} does not match the algorithm parameters",
                self.alg
            )));
        }
        Ok(key)
    }
}
