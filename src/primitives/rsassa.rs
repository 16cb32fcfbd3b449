//! RSASSA-PKCS1-v1_5 签名与密钥编码
use crate::common::identifiers::HashAlgorithm;
use crate::error::{Error, Result};
use rsa::pkcs1v15::{Signature, SigningKey, VerifyingKey};
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey};
use rsa::rand_core::OsRng as RsaOsRng;
use rsa::signature::{SignatureEncoding, Signer, Verifier};
use rsa::{BigUint, RsaPrivateKey, RsaPublicKey};
use sha1::Sha1;
use sha2::{Sha224, Sha256, Sha384, Sha512};

macro_rules! with_digest {
    ($hash:expr, $d:ident => $body:expr) => {
        match $hash {
            HashAlgorithm::Sha1 => {
                type $d = Sha1;
                $body
            }
            HashAlgorithm::Sha224 => {
                type $d = Sha224;
                $body
            }
            HashAlgorithm::Sha256 => {
                type $d = Sha256;
                $body
            }
            HashAlgorithm::Sha384 => {
                type $d = Sha384;
                $body
            }
            HashAlgorithm::Sha512 => {
                type $d = Sha512;
                $body
            }
        }
    };
}

/// 生成 RSA 私钥
pub fn generate(modulus_length: usize, public_exponent: &[u8]) -> Result<RsaPrivateKey> {
    super::enter();
    let exponent = BigUint::from_bytes_be(public_exponent);
    let mut rng = RsaOsRng;
    RsaPrivateKey::new_with_exp(&mut rng, modulus_length, &exponent)
        .map_err(|e| Error::operation(format!("RSA key generation failed: {}", e)))
}

pub fn sign(hash: HashAlgorithm, key: &RsaPrivateKey, data: &[u8]) -> Result<Vec<u8>> {
    super::enter();
    with_digest!(hash, D => {
        let signing_key = SigningKey::<D>::new(key.clone());
        signing_key
            .try_sign(data)
            .map(|signature| signature.to_vec())
            .map_err(|e| Error::operation(format!("RSASSA signing failed: {}", e)))
    })
}

pub fn verify(hash: HashAlgorithm, key: &RsaPublicKey, signature: &[u8], data: &[u8]) -> Result<bool> {
    super::enter();
    let signature = match Signature::try_from(signature) {
        Ok(signature) => signature,
        Err(_) => return Ok(false),
    };
    with_digest!(hash, D => {
        let verifying_key = VerifyingKey::<D>::new(key.clone());
        Ok(verifying_key.verify(data, &signature).is_ok())
    })
}

pub fn decode_spki(der: &[u8]) -> Result<RsaPublicKey> {
    RsaPublicKey::from_public_key_der(der)
        .map_err(|e| Error::data(format!("invalid SubjectPublicKeyInfo: {}", e)))
}

pub fn decode_pkcs8(der: &[u8]) -> Result<RsaPrivateKey> {
    RsaPrivateKey::from_pkcs8_der(der).map_err(|e| Error::data(format!("invalid PKCS#8: {}", e)))
}

pub fn encode_spki(key: &RsaPublicKey) -> Result<Vec<u8>> {
    key.to_public_key_der()
        .map(|document| document.as_bytes().to_vec())
        .map_err(|e| Error::operation(format!("SPKI encoding failed: {}", e)))
}

pub fn encode_pkcs8(key: &RsaPrivateKey) -> Result<Vec<u8>> {
    key.to_pkcs8_der()
        .map(|document| document.as_bytes().to_vec())
        .map_err(|e| Error::operation(format!("PKCS#8 encoding failed: {}", e)))
}
