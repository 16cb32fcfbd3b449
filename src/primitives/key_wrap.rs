//! AES Key Wrap (RFC 3394)
use crate::error::{Error, Result};
use aes::cipher::{BlockDecrypt, BlockEncrypt, KeyInit, generic_array::GenericArray};
use aes::{Aes128, Aes192, Aes256};

/// 默认初始值
const DEFAULT_IV: [u8; 8] = [0xA6; 8];
const SEMIBLOCK: usize = 8;

/// 按密钥长度选择的 AES 实例
enum Kek {
    Aes128(Aes128),
    Aes192(Aes192),
    Aes256(Aes256),
}

impl Kek {
    fn new(key: &[u8]) -> Result<Self> {
        let invalid = |_| Error::operation(format!("invalid KEK length: {} bytes", key.len()));
        match key.len() {
            16 => Ok(Kek::Aes128(Aes128::new_from_slice(key).map_err(invalid)?)),
            24 => Ok(Kek::Aes192(Aes192::new_from_slice(key).map_err(invalid)?)),
            32 => Ok(Kek::Aes256(Aes256::new_from_slice(key).map_err(invalid)?)),
            len => Err(Error::operation(format!("invalid KEK length: {} bytes", len))),
        }
    }

    fn encrypt(&self, block: &mut [u8; 16]) {
        let block = GenericArray::from_mut_slice(block);
        match self {
            Kek::Aes128(cipher) => cipher.encrypt_block(block),
            Kek::Aes192(cipher) => cipher.encrypt_block(block),
            Kek::Aes256(cipher) => cipher.encrypt_block(block),
        }
    }

    fn decrypt(&self, block: &mut [u8; 16]) {
        let block = GenericArray::from_mut_slice(block);
        match self {
            Kek::Aes128(cipher) => cipher.decrypt_block(block),
            Kek::Aes192(cipher) => cipher.decrypt_block(block),
            Kek::Aes256(cipher) => cipher.decrypt_block(block),
        }
    }
}

/// 包装密钥数据；输入必须是 8 字节的整数倍且至少 16 字节
pub fn wrap(kek: &[u8], plaintext: &[u8]) -> Result<Vec<u8>> {
    super::enter();
    if plaintext.len() < 2 * SEMIBLOCK || plaintext.len() % SEMIBLOCK != 0 {
        return Err(Error::operation(format!(
            "AES-KW input must be a multiple of 8 bytes and at least 16 bytes, got {}",
            plaintext.len()
        )));
    }
    let cipher = Kek::new(kek)?;
    let n = plaintext.len() / SEMIBLOCK;

    let mut a = DEFAULT_IV;
    let mut r = plaintext.to_vec();
    let mut block = [0u8; 16];

    for j in 0..6 {
        for i in 0..n {
            let ri = &mut r[i * SEMIBLOCK..(i + 1) * SEMIBLOCK];
            block[..8].copy_from_slice(&a);
            block[8..].copy_from_slice(ri);
            cipher.encrypt(&mut block);

            let t = (n * j + i + 1) as u64;
            a.copy_from_slice(&block[..8]);
            for (byte, t_byte) in a.iter_mut().zip(t.to_be_bytes()) {
                *byte ^= t_byte;
            }
            ri.copy_from_slice(&block[8..]);
        }
    }

    let mut output = Vec::with_capacity(plaintext.len() + SEMIBLOCK);
    output.extend_from_slice(&a);
    output.extend_from_slice(&r);
    Ok(output)
}

/// 解开包装的密钥数据，完整性校验失败时返回 `OperationError`
pub fn unwrap(kek: &[u8], wrapped: &[u8]) -> Result<Vec<u8>> {
    super::enter();
    if wrapped.len() < 3 * SEMIBLOCK || wrapped.len() % SEMIBLOCK != 0 {
        return Err(Error::operation(format!(
            "AES-KW wrapped data must be a multiple of 8 bytes and at least 24 bytes, got {}",
            wrapped.len()
        )));
    }
    let cipher = Kek::new(kek)?;
    let n = wrapped.len() / SEMIBLOCK - 1;

    let mut a = [0u8; 8];
    a.copy_from_slice(&wrapped[..SEMIBLOCK]);
    let mut r = wrapped[SEMIBLOCK..].to_vec();
    let mut block = [0u8; 16];

    for j in (0..6).rev() {
        for i in (0..n).rev() {
            let t = (n * j + i + 1) as u64;
            for (byte, t_byte) in a.iter_mut().zip(t.to_be_bytes()) {
                *byte ^= t_byte;
            }
            let ri = &mut r[i * SEMIBLOCK..(i + 1) * SEMIBLOCK];
            block[..8].copy_from_slice(&a);
            block[8..].copy_from_slice(ri);
            cipher.decrypt(&mut block);

            a.copy_from_slice(&block[..8]);
            ri.copy_from_slice(&block[8..]);
        }
    }

    let diff = a
        .iter()
        .zip(DEFAULT_IV.iter())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y));
    if diff != 0 {
        return Err(Error::operation("AES-KW integrity check failed"));
    }
    Ok(r)
}
