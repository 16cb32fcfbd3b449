//!
//! 集成测试
//!
//! 通过 `SubtleEngine` 门面验证完整的流程：密钥生成、导入导出、签名验证、
//! 包装与解包，以及错误分类。
//!

mod common;

use common::{aes_key, encrypt_decrypt, hmac_key, init_tracing, sign_verify, wrap_unwrap};
use std::sync::Arc;
use std::thread;
use subtle_kit::prelude::*;
use subtle_kit::{ConfigManager, SubtleConfig};
use tempfile::tempdir;

// === 用途校验 ===

#[test]
fn test_disallowed_usages_fail_for_every_algorithm() {
    init_tracing();
    let engine = SubtleEngine::new();
    let cases = [
        (AlgorithmParameters::hmac_key(HashAlgorithm::Sha256), sign_verify(), 32),
        (AlgorithmParameters::aes_key(AlgorithmIdentifier::AesKw, 128), wrap_unwrap(), 16),
        (
            AlgorithmParameters::aes_key(AlgorithmIdentifier::AesGcm, 128),
            encrypt_decrypt() | wrap_unwrap(),
            16,
        ),
    ];

    for (params, allowed, raw_len) in cases {
        for usage in KeyUsage::ALL.into_iter().filter(|usage| !allowed.contains(*usage)) {
            let usages = allowed | usage;
            let generated = engine.generate_key(&params, true, usages);
            assert!(
                matches!(generated, Err(Error::InvalidUsage { .. })),
                "{:?} with {} should be rejected",
                params.identifier(),
                usage
            );

            let import_params = match &params {
                AlgorithmParameters::AesKey { identifier, .. } => AlgorithmParameters::from(*identifier),
                other => other.clone(),
            };
            let imported = engine.import_key(KeyFormat::Raw, &vec![7u8; raw_len], &import_params, true, usages);
            assert!(matches!(imported, Err(Error::InvalidUsage { .. })));
        }
    }
}

#[test]
fn test_invalid_usage_maps_to_syntax_error() {
    let engine = SubtleEngine::new();
    let err = engine
        .generate_key(
            &AlgorithmParameters::hmac_key(HashAlgorithm::Sha256),
            true,
            KeyUsage::Decrypt.into(),
        )
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Syntax);
    assert_eq!(err.kind().dom_name(), "SyntaxError");
}

// === 导入导出 ===

#[test]
fn test_raw_roundtrip_preserves_algorithm_and_usages() {
    let engine = SubtleEngine::new();
    let keys = [
        (
            hmac_key(&engine, HashAlgorithm::Sha1, true),
            AlgorithmParameters::hmac_key(HashAlgorithm::Sha1),
        ),
        (
            aes_key(&engine, AlgorithmIdentifier::AesKw, 192, true, wrap_unwrap()),
            AlgorithmIdentifier::AesKw.into(),
        ),
        (
            aes_key(&engine, AlgorithmIdentifier::AesGcm, 256, true, encrypt_decrypt()),
            AlgorithmIdentifier::AesGcm.into(),
        ),
    ];

    for (key, import_params) in keys {
        let raw = engine.export_key(KeyFormat::Raw, &key).unwrap();
        let imported = engine
            .import_key(KeyFormat::Raw, &raw, &import_params, true, key.usages())
            .unwrap();
        assert_eq!(imported.algorithm_identifier(), key.algorithm_identifier());
        assert_eq!(imported.algorithm(), key.algorithm());
        assert_eq!(imported.usages(), key.usages());
        assert_eq!(engine.export_key(KeyFormat::Raw, &imported).unwrap(), raw);
    }
}

#[test]
fn test_hmac_jwk_with_mismatched_alg_is_data_error() {
    let engine = SubtleEngine::new();
    let jwk = br#"{"kty":"oct","k":"AQIDBAUGBwgJCgsMDQ4PEA","alg":"HS1"}"#;
    let err = engine
        .import_key(
            KeyFormat::Jwk,
            jwk,
            &AlgorithmParameters::hmac_key(HashAlgorithm::Sha256),
            true,
            sign_verify(),
        )
        .unwrap_err();
    assert!(matches!(err, Error::DataError(_)));
    assert_eq!(err.kind().dom_name(), "DataError");
}

#[test]
fn test_export_jwk_and_import_typed() {
    let engine = SubtleEngine::new();
    let key = aes_key(&engine, AlgorithmIdentifier::AesKw, 128, true, wrap_unwrap());
    let jwk = engine.export_jwk(&key).unwrap();
    assert_eq!(jwk.alg.as_deref(), Some("A128KW"));
    assert_eq!(
        jwk.key_ops.as_deref(),
        Some(&["wrapKey".to_string(), "unwrapKey".to_string()][..])
    );

    let imported = engine
        .import_jwk(jwk, &AlgorithmIdentifier::AesKw.into(), false, KeyUsage::UnwrapKey.into())
        .unwrap();
    assert!(!imported.extractable());
    assert!(matches!(
        engine.export_key(KeyFormat::Raw, &imported),
        Err(Error::InvalidAccess(_))
    ));
}

#[test]
fn test_unsupported_format_for_secret_keys() {
    let engine = SubtleEngine::new();
    let key = hmac_key(&engine, HashAlgorithm::Sha256, true);
    let err = engine.export_key(KeyFormat::Spki, &key).unwrap_err();
    assert!(matches!(err, Error::UnsupportedFormat { .. }));
    assert_eq!(err.kind(), ErrorKind::NotSupported);
}

#[test]
fn test_huge_hmac_length_returns_operation_error() {
    let engine = SubtleEngine::new();
    let params = AlgorithmParameters::HmacKey(HmacKeyParams {
        hash: HashAlgorithm::Sha256,
        length: Some((usize::MAX / 4) & !7),
    });
    let err = engine
        .generate_key(&params, true, KeyUsage::Sign.into())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Operation);
}

// === 签名与算法匹配 ===

#[test]
fn test_hmac_known_answer_through_engine() {
    // RFC 4231 test case 2
    let engine = SubtleEngine::new();
    let key = engine
        .import_key(
            KeyFormat::Raw,
            b"Jefe",
            &AlgorithmParameters::hmac_key(HashAlgorithm::Sha256),
            false,
            sign_verify(),
        )
        .unwrap();
    let params = AlgorithmParameters::hmac(HashAlgorithm::Sha256);
    let mac = engine.sign(&params, &key, b"what do ya want for nothing?").unwrap();
    assert_eq!(
        hex::encode(&mac),
        "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
    );
    assert!(engine.verify(&params, &key, &mac, b"what do ya want for nothing?").unwrap());
}

#[test]
fn test_sign_with_wrong_family_key_is_algorithm_mismatch() {
    let engine = SubtleEngine::new();
    let kek = aes_key(&engine, AlgorithmIdentifier::AesKw, 128, false, wrap_unwrap());
    let err = engine
        .sign(&AlgorithmParameters::hmac(HashAlgorithm::Sha256), &kek, b"data")
        .unwrap_err();
    assert!(matches!(err, Error::AlgorithmMismatch { .. }));
}

#[test]
fn test_unknown_algorithm_name_is_not_supported() {
    assert!(matches!(
        AlgorithmParameters::named("PBKDF2"),
        Err(Error::NotSupported(_))
    ));
    let engine = SubtleEngine::new();
    let key = hmac_key(&engine, HashAlgorithm::Sha256, false);
    let params = AlgorithmParameters::named("hmac").unwrap();
    assert_eq!(engine.sign(&params, &key, b"x").unwrap().len(), 32);
}

// === 包装与解包 ===

#[test]
fn test_aes_kw_known_answer_through_wrap_key() {
    // RFC 3394 4.1
    let engine = SubtleEngine::new();
    let kek = engine
        .import_key(
            KeyFormat::Raw,
            &hex::decode("000102030405060708090A0B0C0D0E0F").unwrap(),
            &AlgorithmIdentifier::AesKw.into(),
            false,
            wrap_unwrap(),
        )
        .unwrap();
    let key = engine
        .import_key(
            KeyFormat::Raw,
            &hex::decode("00112233445566778899AABBCCDDEEFF").unwrap(),
            &AlgorithmIdentifier::AesGcm.into(),
            true,
            encrypt_decrypt(),
        )
        .unwrap();

    let wrapped = engine
        .wrap_key(KeyFormat::Raw, &key, &kek, &AlgorithmIdentifier::AesKw.into())
        .unwrap();
    assert_eq!(
        hex::encode_upper(&wrapped),
        "1FA68B0A8112B447AEF34BD8FB5A7B829D3E862371D2CFE5"
    );
}

#[test]
fn test_wrap_unwrap_raw_with_aes_kw() {
    let engine = SubtleEngine::new();
    let kek = aes_key(&engine, AlgorithmIdentifier::AesKw, 256, false, wrap_unwrap());
    let key = aes_key(&engine, AlgorithmIdentifier::AesGcm, 256, true, encrypt_decrypt());
    let params: AlgorithmParameters = AlgorithmIdentifier::AesKw.into();

    let wrapped = engine.wrap_key(KeyFormat::Raw, &key, &kek, &params).unwrap();
    let unwrapped = engine
        .unwrap_key(
            KeyFormat::Raw,
            &wrapped,
            &kek,
            &params,
            &AlgorithmIdentifier::AesGcm.into(),
            true,
            encrypt_decrypt(),
        )
        .unwrap();

    let gcm = AlgorithmParameters::aes_gcm([1u8; 12]);
    let ciphertext = engine.encrypt(&gcm, &key, b"payload").unwrap();
    assert_eq!(engine.decrypt(&gcm, &unwrapped, &ciphertext).unwrap(), b"payload");
}

#[test]
fn test_wrap_unwrap_jwk_with_aes_gcm() {
    let engine = SubtleEngine::new();
    let wrapping_key = aes_key(&engine, AlgorithmIdentifier::AesGcm, 128, false, wrap_unwrap());
    let key = hmac_key(&engine, HashAlgorithm::Sha384, true);
    let params = AlgorithmParameters::AesGcm(AesGcmParams {
        iv: vec![9u8; 12],
        additional_data: Some(b"wrapped hmac key".to_vec()),
        tag_length: None,
    });

    let wrapped = engine.wrap_key(KeyFormat::Jwk, &key, &wrapping_key, &params).unwrap();
    let unwrapped = engine
        .unwrap_key(
            KeyFormat::Jwk,
            &wrapped,
            &wrapping_key,
            &params,
            &AlgorithmParameters::hmac_key(HashAlgorithm::Sha384),
            false,
            KeyUsage::Verify.into(),
        )
        .unwrap();
    assert_eq!(unwrapped.algorithm(), key.algorithm());

    let signature = engine
        .sign(&AlgorithmParameters::hmac(HashAlgorithm::Sha384), &key, b"message")
        .unwrap();
    assert!(
        engine
            .verify(&AlgorithmParameters::hmac(HashAlgorithm::Sha384), &unwrapped, &signature, b"message")
            .unwrap()
    );
}

#[test]
fn test_unwrap_with_wrong_kek_is_operation_error() {
    let engine = SubtleEngine::new();
    let kek = aes_key(&engine, AlgorithmIdentifier::AesKw, 128, false, wrap_unwrap());
    let other = aes_key(&engine, AlgorithmIdentifier::AesKw, 128, false, wrap_unwrap());
    let key = hmac_key(&engine, HashAlgorithm::Sha256, true);
    let params: AlgorithmParameters = AlgorithmIdentifier::AesKw.into();

    let wrapped = engine.wrap_key(KeyFormat::Raw, &key, &kek, &params).unwrap();
    let err = engine
        .unwrap_key(
            KeyFormat::Raw,
            &wrapped,
            &other,
            &params,
            &AlgorithmParameters::hmac_key(HashAlgorithm::Sha256),
            true,
            sign_verify(),
        )
        .unwrap_err();
    assert_eq!(err.kind().dom_name(), "OperationError");
}

// === 配置与并发 ===

#[test]
fn test_engine_from_config_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("subtle.json");
    std::fs::write(&path, r#"{"enabled_algorithms":["HMAC"]}"#).unwrap();

    let manager = ConfigManager::from_file(&path).unwrap();
    let config = manager.get_config();
    assert_eq!(config.min_rsa_modulus_length, 1024);
    assert_eq!(config.max_concurrent_operations, 4);

    let engine = SubtleEngine::from_config_manager(&manager).unwrap();
    assert_eq!(
        engine.registry().identifiers(),
        vec![AlgorithmIdentifier::Hmac]
    );
    let err = engine
        .generate_key(
            &AlgorithmParameters::aes_key(AlgorithmIdentifier::AesKw, 128),
            true,
            wrap_unwrap(),
        )
        .unwrap_err();
    assert!(matches!(err, Error::NotSupported(_)));

    manager
        .update_config(SubtleConfig {
            enabled_algorithms: vec!["HMAC".to_string(), "AES-KW".to_string()],
            ..SubtleConfig::default()
        })
        .unwrap();
    let reloaded = ConfigManager::from_file(&path).unwrap();
    assert_eq!(reloaded.get_config().enabled_algorithms.len(), 2);
}

#[test]
fn test_keys_are_shared_across_threads() {
    let engine = Arc::new(SubtleEngine::new());
    let key = hmac_key(&engine, HashAlgorithm::Sha256, false);
    let params = AlgorithmParameters::hmac(HashAlgorithm::Sha256);
    let expected = engine.sign(&params, &key, b"shared").unwrap();

    thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                let signature = engine.sign(&params, &key, b"shared").unwrap();
                assert_eq!(signature, expected);
            });
        }
    });
}
