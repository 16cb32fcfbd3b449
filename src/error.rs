//! Defines the custom error type for the `subtle-kit` crate.
//!
//! 错误分类与 Web Crypto 的 DOMException 名称一一对应，调用方可以通过
//! [`Error::kind`] 获得稳定的分类，而不必匹配具体的错误信息。

use thiserror::Error;

/// `subtle-kit` 的结果类型
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the `subtle-kit` crate.
#[derive(Debug, Error)]
pub enum Error {
    /// 请求的密钥用途不被该算法（或该密钥类型）允许
    #[error("invalid key usages for {algorithm}: {usages}")]
    InvalidUsage { algorithm: String, usages: String },

    /// 该算法不支持此密钥格式
    #[error("unsupported key format {format} for {algorithm}")]
    UnsupportedFormat { format: String, algorithm: String },

    /// 密钥数据格式错误，或 JWK 字段与算法参数不一致
    #[error("data error: {0}")]
    DataError(String),

    /// 底层密码学操作失败
    #[error("operation failed: {0}")]
    OperationError(String),

    /// 密钥的算法（或 HMAC 的哈希）与本次操作声明的参数不一致
    #[error("key algorithm {key} does not match requested {requested}")]
    AlgorithmMismatch { key: String, requested: String },

    /// 未注册的算法，或算法不支持该操作
    #[error("not supported: {0}")]
    NotSupported(String),

    /// 密钥不可导出，或缺少本次操作所需的用途
    #[error("invalid access: {0}")]
    InvalidAccess(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "async-engine")]
    #[error("async task failed: {0}")]
    AsyncTask(#[from] tokio::task::JoinError),
}

/// 错误分类，对应 Web Crypto 抛出的异常名称
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Syntax,
    NotSupported,
    Data,
    Operation,
    InvalidAccess,
    Internal,
}

impl ErrorKind {
    /// DOMException 名称
    pub fn dom_name(&self) -> &'static str {
        match self {
            ErrorKind::Syntax => "SyntaxError",
            ErrorKind::NotSupported => "NotSupportedError",
            ErrorKind::Data => "DataError",
            ErrorKind::Operation => "OperationError",
            ErrorKind::InvalidAccess => "InvalidAccessError",
            ErrorKind::Internal => "UnknownError",
        }
    }
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidUsage { .. } => ErrorKind::Syntax,
            Error::UnsupportedFormat { .. }
            | Error::AlgorithmMismatch { .. }
            | Error::NotSupported(_) => ErrorKind::NotSupported,
            Error::DataError(_) => ErrorKind::Data,
            Error::OperationError(_) => ErrorKind::Operation,
            Error::InvalidAccess(_) => ErrorKind::InvalidAccess,
            Error::Config(_) | Error::Io(_) | Error::Json(_) => ErrorKind::Internal,
            #[cfg(feature = "async-engine")]
            Error::AsyncTask(_) => ErrorKind::Internal,
        }
    }

    pub(crate) fn data(msg: impl Into<String>) -> Self {
        Error::DataError(msg.into())
    }

    pub(crate) fn operation(msg: impl Into<String>) -> Self {
        Error::OperationError(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_mapping() {
        let err = Error::InvalidUsage {
            algorithm: "HMAC".to_string(),
            usages: "encrypt".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::Syntax);
        assert_eq!(err.kind().dom_name(), "SyntaxError");

        let err = Error::AlgorithmMismatch {
            key: "AES-KW".to_string(),
            requested: "HMAC".to_string(),
        };
        assert_eq!(err.kind().dom_name(), "NotSupportedError");
        assert_eq!(Error::data("bad").kind(), ErrorKind::Data);
        assert_eq!(Error::operation("bad").kind(), ErrorKind::Operation);
    }

    #[test]
    fn test_error_display() {
        let err = Error::UnsupportedFormat {
            format: "spki".to_string(),
            algorithm: "HMAC".to_string(),
        };
        assert_eq!(err.to_string(), "unsupported key format spki for HMAC");
    }
}
