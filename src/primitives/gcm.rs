//! AES-GCM 加解密，输出格式为 密文 ‖ 认证标签
use crate::error::{Error, Result};
use aes::Aes192;
use aes_gcm::aead::consts::U12;
use aes_gcm::aead::generic_array::GenericArray;
use aes_gcm::aead::{Aead, AeadCore, KeyInit, Payload};
use aes_gcm::{Aes128Gcm, Aes256Gcm, AesGcm};

pub const IV_SIZE: usize = 12;
pub const TAG_SIZE: usize = 16;

type Aes192Gcm = AesGcm<Aes192, U12>;

fn seal<C>(key: &[u8], iv: &[u8], aad: &[u8], plaintext: &[u8]) -> Result<Vec<u8>>
where
    C: KeyInit + Aead + AeadCore<NonceSize = U12>,
{
    let cipher = C::new_from_slice(key).map_err(|_| Error::operation("invalid AES-GCM key length"))?;
    cipher
        .encrypt(GenericArray::from_slice(iv), Payload { msg: plaintext, aad })
        .map_err(|_| Error::operation("AES-GCM encryption failed"))
}

fn open<C>(key: &[u8], iv: &[u8], aad: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>>
where
    C: KeyInit + Aead + AeadCore<NonceSize = U12>,
{
    let cipher = C::new_from_slice(key).map_err(|_| Error::operation("invalid AES-GCM key length"))?;
    cipher
        .decrypt(GenericArray::from_slice(iv), Payload { msg: ciphertext, aad })
        .map_err(|_| Error::operation("AES-GCM authentication failed"))
}

fn check_iv(iv: &[u8]) -> Result<()> {
    if iv.len() != IV_SIZE {
        return Err(Error::operation(format!(
            "AES-GCM iv must be {} bytes, got {}",
            IV_SIZE,
            iv.len()
        )));
    }
    Ok(())
}

pub fn encrypt(key: &[u8], iv: &[u8], aad: &[u8], plaintext: &[u8]) -> Result<Vec<u8>> {
    super::enter();
    check_iv(iv)?;
    match key.len() {
        16 => seal::<Aes128Gcm>(key, iv, aad, plaintext),
        24 => seal::<Aes192Gcm>(key, iv, aad, plaintext),
        32 => seal::<Aes256Gcm>(key, iv, aad, plaintext),
        len => Err(Error::operation(format!("invalid AES-GCM key length: {} bytes", len))),
    }
}

pub fn decrypt(key: &[u8], iv: &[u8], aad: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>> {
    super::enter();
    check_iv(iv)?;
    if ciphertext.len() < TAG_SIZE {
        return Err(Error::operation("AES-GCM ciphertext is shorter than the tag"));
    }
    match key.len() {
        16 => open::<Aes128Gcm>(key, iv, aad, ciphertext),
        24 => open::<Aes192Gcm>(key, iv, aad, ciphertext),
        32 => open::<Aes256Gcm>(key, iv, aad, ciphertext),
        len => Err(Error::operation(format!("invalid AES-GCM key length: {} bytes", len))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encrypt_decrypt_all_key_sizes() {
        let iv = [9u8; IV_SIZE];
        for len in [16, 24, 32] {
            let key = vec![0x5Au8; len];
            let ciphertext = encrypt(&key, &iv, b"aad", b"attack at dawn").unwrap();
            assert_eq!(ciphertext.len(), 14 + TAG_SIZE);
            let plaintext = decrypt(&key, &iv, b"aad", &ciphertext).unwrap();
            assert_eq!(plaintext, b"attack at dawn");
        }
    }

    // NIST GCM test case 2 (128-bit zero key, zero iv, one zero block)
    #[test]
    fn test_known_answer() {
        let ciphertext = encrypt(&[0u8; 16], &[0u8; 12], b"", &[0u8; 16]).unwrap();
        assert_eq!(
            hex::encode(ciphertext),
            "0388dace60b6a392f328c2b971b2fe78ab6e47d42cec13bdf53a67b21257bddf"
        );
    }

    #[test]
    fn test_wrong_aad_fails() {
        let key = [1u8; 32];
        let iv = [2u8; IV_SIZE];
        let ciphertext = encrypt(&key, &iv, b"right", b"data").unwrap();
        assert!(matches!(
            decrypt(&key, &iv, b"wrong", &ciphertext),
            Err(Error::OperationError(_))
        ));
    }

    #[test]
    fn test_invalid_iv_length() {
        assert!(matches!(
            encrypt(&[1u8; 16], &[0u8; 16], b"", b"data"),
            Err(Error::OperationError(_))
        ));
    }
}
