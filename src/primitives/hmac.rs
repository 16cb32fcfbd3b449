//! HMAC 计算与验证
use crate::common::identifiers::HashAlgorithm;
use crate::error::{Error, Result};
use hmac::{Hmac, Mac};
use sha1::Sha1;
use sha2::{Sha224, Sha256, Sha384, Sha512};

macro_rules! with_hmac {
    ($hash:expr, $key:expr, |$mac:ident| $body:expr) => {
        match $hash {
            HashAlgorithm::Sha1 => {
                let mut $mac = <Hmac<Sha1> as Mac>::new_from_slice($key).map_err(invalid_length)?;
                $body
            }
            HashAlgorithm::Sha224 => {
                let mut $mac = <Hmac<Sha224> as Mac>::new_from_slice($key).map_err(invalid_length)?;
                $body
            }
            HashAlgorithm::Sha256 => {
                let mut $mac = <Hmac<Sha256> as Mac>::new_from_slice($key).map_err(invalid_length)?;
                $body
            }
            HashAlgorithm::Sha384 => {
                let mut $mac = <Hmac<Sha384> as Mac>::new_from_slice($key).map_err(invalid_length)?;
                $body
            }
            HashAlgorithm::Sha512 => {
                let mut $mac = <Hmac<Sha512> as Mac>::new_from_slice($key).map_err(invalid_length)?;
                $body
            }
        }
    };
}

fn invalid_length(e: hmac::digest::InvalidLength) -> Error {
    Error::operation(format!("HMAC key rejected: {}", e))
}

/// 计算 HMAC
pub fn sign(hash: HashAlgorithm, key: &[u8], data: &[u8]) -> Result<Vec<u8>> {
    super::enter();
    with_hmac!(hash, key, |mac| {
        mac.update(data);
        Ok(mac.finalize().into_bytes().to_vec())
    })
}

/// 以常数时间比较签名
pub fn verify(hash: HashAlgorithm, key: &[u8], signature: &[u8], data: &[u8]) -> Result<bool> {
    super::enter();
    with_hmac!(hash, key, |mac| {
        mac.update(data);
        Ok(mac.verify_slice(signature).is_ok())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // RFC 4231 test case 2
    const KEY: &[u8] = b"Jefe";
    const DATA: &[u8] = b"what do ya want for nothing?";

    #[test]
    fn test_hmac_sha256_known_answer() {
        let mac = sign(HashAlgorithm::Sha256, KEY, DATA).unwrap();
        assert_eq!(
            hex::encode(&mac),
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
        assert!(verify(HashAlgorithm::Sha256, KEY, &mac, DATA).unwrap());
    }

    #[test]
    fn test_output_lengths() {
        for hash in [
            HashAlgorithm::Sha1,
            HashAlgorithm::Sha224,
            HashAlgorithm::Sha256,
            HashAlgorithm::Sha384,
            HashAlgorithm::Sha512,
        ] {
            let mac = sign(hash, KEY, DATA).unwrap();
            assert_eq!(mac.len(), hash.output_len());
        }
    }

    #[test]
    fn test_verify_rejects_tampered_signature() {
        let mut mac = sign(HashAlgorithm::Sha512, KEY, DATA).unwrap();
        mac[0] ^= 0x01;
        assert!(!verify(HashAlgorithm::Sha512, KEY, &mac, DATA).unwrap());
        assert!(!verify(HashAlgorithm::Sha512, KEY, &mac[..10], DATA).unwrap());
    }
}
