//! 密码学原语层
//!
//! 算法实现完成全部参数、用途和密钥匹配检查后才会进入本模块。
//! 这里的函数只做运算，不关心密钥对象的元数据。

pub mod gcm;
pub mod hmac;
pub mod key_wrap;
#[cfg(feature = "rsassa")]
pub mod rsassa;


#[inline]
pub(crate) fn enter() {
    #[cfg(test)]
    probe::record();
}
