//! End-to-end tests of the verification engine over small in-memory corpora.
//!
//! Expected values are published test vectors: RFC 3394, RFC 5869, RFC 7748,
//! RFC 8032, and cases cut out of the Wycheproof corpora. A few AEAD and MAC
//! scenarios seal their own inputs through the standard provider.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing, clippy::panic)]

mod common;

use common::{case_mut, corpus, excerpt, mac, run_document, run_normal, CountingProvider};
use serde_json::{json, Value};
use vg_primitives::{AeadAlgorithm, AeadProvider, DigestAlgorithm, MacAlgorithm, StandardProvider};
use vg_validation::{AuditCollector, DecodeError, Harness, HarnessConfig, HarnessError, Variant};

fn hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

fn to_bytes(doc: &Value) -> Vec<u8> {
    serde_json::to_vec(doc).unwrap()
}

fn case(tc_id: u64, comment: &str, result: &str, fields: Value) -> Value {
    let mut case = json!({ "tcId": tc_id, "comment": comment, "result": result, "flags": [] });
    if let (Some(case), Some(fields)) = (case.as_object_mut(), fields.as_object()) {
        case.extend(fields.clone());
    }
    case
}

// ============================================================================
// Block cipher
// ============================================================================

mod block_cipher_tests {
    use super::*;

    // Wycheproof aes_cbc_pkcs5_test.json, tcId 2 and tcId 26.
    const KEY: &str = "e09eaa5a3f5e56d279d5e7a03373f6ea";
    const IV: &str = "c9ee3cd746bf208c65ca9e72a266d54f";
    const MSG: &str = "ef4eab37181f98423e53e947e7050fd0";
    const CT: &str = "d1fa697f3e2e04d64f1a0da203813ca5bc226a0b1d42287b2a5b994a66eaf14a";

    fn group(tests: Vec<Value>) -> Value {
        json!([{ "ivSize": 128, "keySize": 128, "type": "IndCpaTest", "tests": tests }])
    }

    #[test]
    fn test_valid_case_checks_both_directions() {
        let provider = StandardProvider::new().unwrap();
        let doc = corpus(
            "AES-CBC-PKCS5",
            group(vec![case(2, "message size divisible by block size", "valid", json!({ "key": KEY, "iv": IV, "msg": MSG, "ct": CT }))]),
        );
        let outcome = run_normal(&provider, &doc);
        assert!(outcome.passed);
        assert_eq!(outcome.cases, 1);
    }

    #[test]
    fn test_bad_padding_is_a_passing_invalid_case() {
        let provider = StandardProvider::new().unwrap();
        let fields = json!({
            "key": "db4f3e5e3795cc09a073fa6a81e5a6bc",
            "iv": "23468aa734f5f0f19827316ff168e94f",
            "msg": "",
            "ct": "aa62606a287476777b92d8e4c4e53028"
        });
        let doc = corpus(
            "AES-CBC-PKCS5",
            group(vec![case(26, "Using zero padding instead of PKCS #5 padding", "invalid", fields.clone())]),
        );
        assert!(run_normal(&provider, &doc).passed);

        let doc = corpus("AES-CBC-PKCS5", group(vec![case(26, "", "valid", fields)]));
        assert!(!run_normal(&provider, &doc).passed);
    }

    #[test]
    fn test_wrong_ciphertext_fails_a_valid_case() {
        let provider = StandardProvider::new().unwrap();
        let mut ct = hex::decode(CT).unwrap();
        ct[0] ^= 1;
        let doc = corpus(
            "AES-CBC-PKCS5",
            group(vec![case(3, "", "valid", json!({ "key": KEY, "iv": IV, "msg": MSG, "ct": hex(&ct) }))]),
        );
        let outcome = run_normal(&provider, &doc);
        assert!(!outcome.passed);
        assert_eq!(outcome.failures, 1);
    }
}

// ============================================================================
// AEAD
// ============================================================================

mod aead_tests {
    use super::*;
    use wycheproof::aead::TestName as Aead;

    const KEY: [u8; 16] = [0x42; 16];
    const IV: [u8; 12] = [0x24; 12];

    fn gcm_group(tag_size: usize, tests: Vec<Value>) -> Value {
        json!([{ "ivSize": 96, "keySize": 128, "tagSize": tag_size, "type": "AeadTest", "tests": tests }])
    }

    fn sealed_case(provider: &StandardProvider, tc_id: u64, result: &str, aad: &[u8], msg: &[u8]) -> Value {
        let sealed = provider.seal(AeadAlgorithm::AesGcm, &KEY, &IV, aad, 16, msg).unwrap();
        case(
            tc_id,
            "",
            result,
            json!({
                "key": hex(&KEY), "iv": hex(&IV), "aad": hex(aad), "msg": hex(msg),
                "ct": hex(&sealed.ciphertext), "tag": hex(&sealed.tag)
            }),
        )
    }

    #[test]
    fn test_valid_case_passes_streaming_and_atomic() {
        let provider = StandardProvider::new().unwrap();
        let doc = corpus("AES-GCM", gcm_group(128, vec![sealed_case(&provider, 1, "valid", b"header", b"payload bytes")]));
        assert!(run_normal(&provider, &doc).passed);
    }

    #[test]
    fn test_empty_fields_decode_and_verify() {
        let provider = StandardProvider::new().unwrap();
        let doc = corpus("AES-GCM", gcm_group(128, vec![sealed_case(&provider, 1, "valid", b"", b"")]));
        let outcome = run_normal(&provider, &doc);
        assert!(outcome.passed);
        assert_eq!(outcome.cases, 1);
    }

    #[test]
    fn test_flipped_tag_bit() {
        let provider = StandardProvider::new().unwrap();
        let mut tampered = sealed_case(&provider, 2, "invalid", b"", b"message");
        let tag = tampered["tag"].as_str().unwrap().to_string();
        let mut tag = hex::decode(tag).unwrap();
        tag[0] ^= 1;
        tampered["tag"] = json!(hex(&tag));
        let doc = corpus("AES-GCM", gcm_group(128, vec![tampered.clone()]));
        assert!(run_normal(&provider, &doc).passed);

        tampered["result"] = json!("valid");
        let doc = corpus("AES-GCM", gcm_group(128, vec![tampered]));
        assert!(!run_normal(&provider, &doc).passed);
    }

    #[test]
    fn test_invalid_tag_size_is_tolerated() {
        let provider = StandardProvider::new().unwrap();
        let fields = json!({
            "key": hex(&KEY), "iv": hex(&IV), "aad": "", "msg": "", "ct": "", "tag": "0102030405"
        });
        let doc = corpus("AES-GCM", gcm_group(40, vec![case(1, "Invalid tag size", "valid", fields.clone())]));
        assert!(run_normal(&provider, &doc).passed);

        let doc = corpus("AES-GCM", gcm_group(40, vec![case(1, "short tag", "valid", fields)]));
        assert!(!run_normal(&provider, &doc).passed);
    }

    #[test]
    fn test_acceptable_match_is_audited() {
        let provider = StandardProvider::new().unwrap();
        let mut acceptable = sealed_case(&provider, 1, "acceptable", b"", b"weak but allowed");
        acceptable["comment"] = json!("unusual IV");
        acceptable["flags"] = json!(["LongIv"]);
        let doc = corpus("AES-GCM", gcm_group(128, vec![acceptable]));

        let harness = Harness::new(HarnessConfig::new().with_audit_acceptable(true), &provider).unwrap();
        let audit = AuditCollector::new(true);
        let outcome = harness
            .run_document(std::path::Path::new("aes_gcm_test.json"), &doc, Variant::Normal, &audit)
            .unwrap();
        assert!(outcome.passed);
        let stats = audit.finish().unwrap();
        assert_eq!(stats.comments.get("unusual IV"), Some(&1));
        assert_eq!(stats.flags.get("LongIv"), Some(&1));
    }

    #[test]
    fn test_ccm_published_cases() {
        let provider = StandardProvider::new().unwrap();
        let doc = excerpt(Aead::AesCcm.json_data(), &[1, 52]);
        let outcome = run_normal(&provider, &to_bytes(&doc));
        assert!(outcome.passed);
        assert_eq!(outcome.cases, 2);
    }

    #[test]
    fn test_chacha20_poly1305_published_cases() {
        let provider = StandardProvider::new().unwrap();
        // RFC 7539 vector, a pseudorandom case, a flipped tag and an 8-byte nonce.
        let doc = excerpt(Aead::ChaCha20Poly1305.json_data(), &[1, 2, 146, 318]);
        let outcome = run_normal(&provider, &to_bytes(&doc));
        assert!(outcome.passed);
        assert_eq!(outcome.cases, 4);
        assert_eq!(outcome.skipped_groups, 0);
    }

    #[test]
    fn test_xchacha20_poly1305_published_cases() {
        let provider = StandardProvider::new().unwrap();
        let doc = excerpt(Aead::XChaCha20Poly1305.json_data(), &[1, 146, 310]);
        let outcome = run_normal(&provider, &to_bytes(&doc));
        assert!(outcome.passed);
        assert_eq!(outcome.cases, 3);
    }

    #[test]
    fn test_rejected_nonce_is_tolerated_by_comment() {
        let provider = StandardProvider::new().unwrap();
        // tcId 487 has an empty nonce, tcId 494 a 16-byte one; CCM takes 7 to 13.
        let published = excerpt(Aead::AesCcm.json_data(), &[487, 494]);
        assert!(run_normal(&provider, &to_bytes(&published)).passed);

        // A provider may reject these nonces even where a case claims success.
        let mut claimed = published.clone();
        for tc_id in [487, 494] {
            case_mut(&mut claimed, tc_id)["result"] = json!("valid");
        }
        assert!(run_normal(&provider, &to_bytes(&claimed)).passed);

        // Without the comment the rejection is a failure.
        case_mut(&mut claimed, 494)["comment"] = json!("long nonce");
        let outcome = run_normal(&provider, &to_bytes(&claimed));
        assert!(!outcome.passed);
        assert_eq!(outcome.failures, 1);
    }

    #[test]
    fn test_chacha_nonce_rejection_without_tolerated_comment() {
        let provider = StandardProvider::new().unwrap();
        // "nonce has size 8." is not among the tolerated comments.
        let mut doc = excerpt(Aead::ChaCha20Poly1305.json_data(), &[318]);
        case_mut(&mut doc, 318)["result"] = json!("valid");
        assert!(!run_normal(&provider, &to_bytes(&doc)).passed);
    }
}

// ============================================================================
// Signatures
// ============================================================================

mod signature_tests {
    use super::*;
    use wycheproof::dsa::TestName as Dsa;
    use wycheproof::ecdsa::TestName as Ecdsa;
    use wycheproof::rsa_pkcs1_verify::TestName as RsaPkcs1;

    const ED25519_PK: &str = "d75a980182b10ab7d54bfed3c964073a0ee172f3daa62325af021a68f707511a";
    const ED25519_SIG: &str = "e5564300c360ac729086e2cc806e828a84877f1eb8e5d974d873e065\
                               224901555fb8821590a33bacc61e39701cf9b46bd25bf5f0595bbe24655141438e7a100b";

    #[test]
    fn test_malformed_ecdsa_key_skips_verify() {
        let provider = CountingProvider::new();
        let groups = json!([{
            "key": { "curve": "secp256r1", "type": "EcPublicKey" },
            "keyDer": "3003020100",
            "sha": "SHA-256",
            "type": "EcdsaVerify",
            "tests": [
                case(1, "malformed public key", "invalid", json!({ "msg": "313233343030", "sig": "3006020101020101" })),
                case(2, "malformed public key", "invalid", json!({ "msg": "", "sig": "" })),
            ]
        }]);
        let outcome = run_normal(&provider, &corpus("ECDSA", groups));
        assert!(outcome.passed);
        assert_eq!(outcome.cases, 2);
        assert_eq!(provider.verifications(), 0);
    }

    #[test]
    fn test_ed25519_rfc8032() {
        let provider = CountingProvider::new();
        let mut forged = hex::decode(ED25519_SIG).unwrap();
        forged[10] ^= 0x80;
        let groups = json!([{
            "key": { "curve": "edwards25519", "pk": ED25519_PK },
            "type": "EddsaVerify",
            "tests": [
                case(1, "RFC 8032 test 1", "valid", json!({ "msg": "", "sig": ED25519_SIG })),
                case(2, "modified signature", "invalid", json!({ "msg": "", "sig": hex(&forged) })),
                case(3, "truncated signature", "invalid", json!({ "msg": "", "sig": &ED25519_SIG[..64] })),
            ]
        }]);
        let outcome = run_normal(&provider, &corpus("EDDSA", groups));
        assert!(outcome.passed);
        assert_eq!(outcome.cases, 3);
        assert!(provider.verifications() >= 2);
    }

    #[test]
    fn test_unsupported_curve_group_is_skipped() {
        let provider = CountingProvider::new();
        let groups = json!([{
            "key": { "curve": "edwards448", "pk": "00" },
            "tests": [case(1, "", "valid", json!({ "msg": "", "sig": "00" }))]
        }]);
        let outcome = run_normal(&provider, &corpus("EDDSA", groups));
        assert!(outcome.passed);
        assert_eq!(outcome.skipped_groups, 1);
        assert_eq!(outcome.cases, 0);
    }

    #[test]
    fn test_rsa_key_encodings_agree() {
        let provider = CountingProvider::new();
        // Valid, acceptable (missing NULL) and invalid (long-form length).
        let doc = excerpt(RsaPkcs1::Rsa2048Sha256.json_data(), &[1, 8, 9]);
        let outcome = run_normal(&provider, &to_bytes(&doc));
        assert!(outcome.passed);
        assert_eq!(outcome.cases, 3);
        // Components, DER and PEM are each checked for every case.
        assert_eq!(provider.verifications(), 9);
    }

    #[test]
    fn test_lenient_acceptable_signature_passes_either_way() {
        let provider = CountingProvider::new();
        let mut doc = excerpt(RsaPkcs1::Rsa2048Sha256.json_data(), &[8]);
        assert!(run_normal(&provider, &to_bytes(&doc)).passed);

        case_mut(&mut doc, 8)["result"] = json!("invalid");
        assert!(run_normal(&provider, &to_bytes(&doc)).passed);
    }

    #[test]
    fn test_dsa_key_encodings_agree() {
        let provider = CountingProvider::new();
        // Acceptable legacy encoding, valid, and a BER-encoded signature.
        let doc = excerpt(Dsa::Dsa2048_224Sha224.json_data(), &[1, 2, 3]);
        let outcome = run_normal(&provider, &to_bytes(&doc));
        assert!(outcome.passed);
        assert_eq!(outcome.cases, 3);
        assert_eq!(provider.verifications(), 9);
    }

    #[test]
    fn test_p1363_signatures() {
        let provider = CountingProvider::new();
        let doc = excerpt(Ecdsa::EcdsaSecp256r1Sha256P1363.json_data(), &[1, 2, 61]);
        let outcome = run_document(&provider, &to_bytes(&doc), Variant::P1363).unwrap();
        assert!(outcome.passed);
        assert_eq!(outcome.cases, 3);
        // tcId 2 is 66 bytes long and never reaches a key; the others go to
        // the DER, PEM and point encodings.
        assert_eq!(provider.verifications(), 6);

        let mut forged = doc;
        case_mut(&mut forged, 61)["msg"] = json!("00");
        assert!(!run_document(&provider, &to_bytes(&forged), Variant::P1363).unwrap().passed);
    }

    #[test]
    fn test_web_crypto_ecdsa_signatures() {
        let provider = CountingProvider::new();
        let doc = excerpt(Ecdsa::EcdsaSecp256r1Webcrypto.json_data(), &[1, 2]);
        let outcome = run_document(&provider, &to_bytes(&doc), Variant::WebCrypto).unwrap();
        assert!(outcome.passed);
        assert_eq!(outcome.cases, 2);
        // Only the JWK is used.
        assert_eq!(provider.verifications(), 1);
    }
}

// ============================================================================
// Key agreement, key wrap and HKDF
// ============================================================================

mod derivation_tests {
    use super::*;

    #[test]
    fn test_x25519_rfc7748() {
        let provider = StandardProvider::new().unwrap();
        let groups = json!([{
            "curve": "curve25519",
            "type": "XdhComp",
            "tests": [
                case(1, "RFC 7748", "valid", json!({
                    "public": "de9edb7d7b7dc1b4d35b61c2ece435373f8343c85b78674dadfc7e146f882b4f",
                    "private": "77076d0a7318a57d3c16c17251b26645df4c2f87ebc0992ab177fba51db92c2a",
                    "shared": "4a5d9d5ba4ce2de1728e3bf480350f25e07e21c947d19e3376f09b3c1e161742"
                })),
                case(2, "wrong shared secret", "invalid", json!({
                    "public": "de9edb7d7b7dc1b4d35b61c2ece435373f8343c85b78674dadfc7e146f882b4f",
                    "private": "77076d0a7318a57d3c16c17251b26645df4c2f87ebc0992ab177fba51db92c2a",
                    "shared": "00".repeat(32)
                })),
            ]
        }]);
        assert!(run_normal(&provider, &corpus("XDH", groups)).passed);
    }

    #[test]
    fn test_ecdh_malformed_peer_key() {
        let provider = StandardProvider::new().unwrap();
        let groups = json!([{
            "curve": "secp256r1",
            "encoding": "asn",
            "type": "EcdhTest",
            "tests": [case(1, "public key is not DER", "invalid", json!({
                "public": "3000",
                "private": "00c9afa9d845ba75166b5c215767b1d6934e50c3db36e89b127b8a622b120f6721",
                "shared": ""
            }))]
        }]);
        assert!(run_normal(&provider, &corpus("ECDH", groups)).passed);
    }

    #[test]
    fn test_ecdh_web_crypto_jwk() {
        let provider = StandardProvider::new().unwrap();
        // Wycheproof ecdh_secp256r1_webcrypto_test.json, tcIds 1, 331 and 351.
        let ec = |crv: &str, x: &str, y: &str| json!({ "kty": "EC", "crv": crv, "x": x, "y": y, "kid": "none" });
        let private = |d: &str, x: &str, y: &str| {
            json!({ "kty": "EC", "crv": "P-256", "d": d, "x": x, "y": y, "kid": "none" })
        };
        let groups = json!([{
            "curve": "P-256",
            "encoding": "webcrypto",
            "type": "EcdhWebcryptoTest",
            "tests": [
                case(1, "normal case", "valid", json!({
                    "public": ec("P-256", "YtW9M3Kvdf6FoEBxXQ9QJCjgcEaGiwv9-mHXMa_kTyY", "rDM6k6nnCoHNWpW1v40TmQ63QcjDiHK0oH0nWgFOMM8"),
                    "private": private(
                        "BhJGXImgI6sXhVsKa86_0_67U674QThke1NS4CwQw0Y",
                        "tZzHZx3Wprg24s2Tlu9WGLL_PoGS3XydNsJ8tW_5FmE",
                        "SCbZ29WuZM3YV1Bou8nmPyMepX7QMkiETAkzG5U5IFM"
                    ),
                    "shared": "53020d908b0219328b658b525f26780e3ae12bcd952bb25a93bc0895e1714285"
                })),
                case(331, "point is not on curve", "invalid", json!({
                    "public": ec("P-256", "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA", "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA"),
                    "private": private(
                        "fkqlT3FL8B34XFAmm-o6hnIfhK_nT3tB6lirzzR06I0",
                        "R_Z9415ctDKwV-ig0P9iLraYs0vJ_-UjURk2Y8xucnQ",
                        "FA-BXvYf9u0G3woVA2bqvPsY7aHO49SzDy0V1KT65Rc"
                    ),
                    "shared": ""
                })),
                case(351, "Public key uses wrong curve: secp384r1", "invalid", json!({
                    "public": ec(
                        "P-384",
                        "HxeQHnMbBvNJtunX0X1F6KK0YRWkdIW-Fhl5MtuHs5QFtclBs2_WG5733SCHjhKe",
                        "VaIncJnGAdzbN0f4CtbhZhFjeOHrziyVdEoJhhKM_uqsf5C3F4fZoc_kF81Mj2r1"
                    ),
                    "private": private(
                        "tE-WcP7bqIetjoBiJgY-d2BLJ8Nig2Mm6T7Lf8xtwpc",
                        "n1e4_HBpzkbKmlbmPYjpnU7LWEX4HnHPa8hqzIWL0pA",
                        "iGn8nuVhfbtkaK82OB8MQJaNdHlOGDpmmwGS69nXVhE"
                    ),
                    "shared": ""
                })),
            ]
        }]);
        let doc = corpus("ECDH", groups);
        let outcome = run_document(&provider, &doc, Variant::WebCrypto).unwrap();
        assert!(outcome.passed);
        assert_eq!(outcome.cases, 3);
        assert_eq!(outcome.skipped_groups, 0);
    }

    #[test]
    fn test_key_wrap_rfc3394() {
        let provider = StandardProvider::new().unwrap();
        let groups = json!([{
            "keySize": 128,
            "type": "KeywrapTest",
            "tests": [
                case(1, "RFC 3394 4.1", "valid", json!({
                    "key": "000102030405060708090a0b0c0d0e0f",
                    "msg": "00112233445566778899aabbccddeeff",
                    "ct": "1fa68b0a8112b447aef34bd8fb5a7b829d3e862371d2cfe5"
                })),
                case(2, "modified ciphertext", "invalid", json!({
                    "key": "000102030405060708090a0b0c0d0e0f",
                    "msg": "00112233445566778899aabbccddeeff",
                    "ct": "1fa68b0a8112b447aef34bd8fb5a7b829d3e862371d2cfe6"
                })),
            ]
        }]);
        let outcome = run_normal(&provider, &corpus("KW", groups));
        assert!(outcome.passed);
        assert_eq!(outcome.cases, 2);
    }

    #[test]
    fn test_hkdf_rfc5869() {
        let provider = StandardProvider::new().unwrap();
        let ikm = "0b".repeat(22);
        let groups = json!([{
            "keySize": 176,
            "type": "HkdfTest",
            "tests": [
                case(1, "RFC 5869 A.1", "valid", json!({
                    "ikm": ikm,
                    "salt": "000102030405060708090a0b0c",
                    "info": "f0f1f2f3f4f5f6f7f8f9",
                    "size": 42,
                    "okm": "3cb25f25faacd57a90434f64d0362f2a2d2d0a90cf1a5a4c5db02d56ecc4c5bf34007208d5b887185865"
                })),
                case(2, "output too long", "invalid", json!({
                    "ikm": ikm, "salt": "", "info": "", "size": 255 * 32 + 1, "okm": ""
                })),
            ]
        }]);
        assert!(run_normal(&provider, &corpus("HKDF-SHA-256", groups)).passed);
    }
}

// ============================================================================
// Aggregation and fatal errors
// ============================================================================

mod run_tests {
    use super::*;

    #[test]
    fn test_one_failure_among_many() {
        let provider = StandardProvider::new().unwrap();
        let algorithm = MacAlgorithm::Hmac(DigestAlgorithm::Sha256);
        let key = [7u8; 32];
        let tests: Vec<Value> = (0..1000u64)
            .map(|i| {
                let msg = i.to_be_bytes();
                let mut tag = mac(&provider, algorithm, &key, &msg);
                if i == 613 {
                    tag[0] ^= 1;
                }
                case(i + 1, "", "valid", json!({ "key": hex(&key), "msg": hex(&msg), "tag": hex(&tag) }))
            })
            .collect();
        let doc = corpus("HMACSHA256", json!([{ "keySize": 256, "tagSize": 256, "type": "MacTest", "tests": tests }]));

        let outcome = run_normal(&provider, &doc);
        assert!(!outcome.passed);
        assert_eq!(outcome.cases, 1000);
        assert_eq!(outcome.failures, 1);
    }

    #[test]
    fn test_unknown_algorithm_is_fatal() {
        let provider = StandardProvider::new().unwrap();
        let doc = corpus("AES-SIV-CMAC", json!([]));
        assert!(matches!(
            run_document(&provider, &doc, Variant::Normal),
            Err(HarnessError::Registry { .. })
        ));
    }

    #[test]
    fn test_malformed_documents_are_fatal() {
        let provider = StandardProvider::new().unwrap();
        assert!(matches!(
            run_document(&provider, b"{\"algorithm\": ", Variant::Normal),
            Err(HarnessError::Decode { source: DecodeError::Json(_), .. })
        ));

        let bad_hex = corpus(
            "AES-CMAC",
            json!([{ "keySize": 128, "tagSize": 128, "tests": [case(1, "", "valid", json!({ "key": "zz", "msg": "", "tag": "" }))] }]),
        );
        assert!(matches!(
            run_document(&provider, &bad_hex, Variant::Normal),
            Err(HarnessError::Decode { source: DecodeError::Group { index: 0, .. }, .. })
        ));
    }

    #[test]
    fn test_run_over_directory() {
        let provider = StandardProvider::new().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let key = [1u8; 16];
        let tag = mac(&provider, MacAlgorithm::AesCmac, &key, b"abc");
        let doc = corpus(
            "AES-CMAC",
            json!([{ "keySize": 128, "tagSize": 128, "tests": [case(1, "", "valid", json!({ "key": hex(&key), "msg": hex(b"abc"), "tag": hex(&tag) }))] }]),
        );
        std::fs::write(dir.path().join("aes_cmac_test.json"), &doc).unwrap();

        let config = HarnessConfig::new().with_vectors_dir(dir.path()).with_suites(["aes_cmac"]).with_jobs(2);
        let run = Harness::new(config, &provider).unwrap().run().unwrap();
        assert!(run.passed());
        assert_eq!(run.files.len(), 1);
        assert_eq!(run.cases(), 1);
        assert!(run.audit.is_none());
    }
}

// ============================================================================
// Discovery
// ============================================================================

mod discovery_tests {
    use super::*;

    fn touch(dir: &std::path::Path, names: &[&str]) {
        for name in names {
            std::fs::write(dir.join(name), b"{}").unwrap();
        }
    }

    #[test]
    fn test_variants_and_skips() {
        let provider = StandardProvider::new().unwrap();
        let dir = tempfile::tempdir().unwrap();
        touch(
            dir.path(),
            &[
                "ecdsa_secp256r1_sha256_test.json",
                "ecdsa_secp256r1_sha256_p1363_test.json",
                "ecdsa_secp192r1_sha256_test.json",
                "ecdsa_sect283k1_sha384_test.json",
                "ecdsa_webcrypto_test.json",
                "ecdsa_secp384r1_webcrypto_test.json",
                "ecdsa_secp256k1_sha256_bitcoin_test.json",
                "README.md",
            ],
        );
        let config = HarnessConfig::new()
            .with_vectors_dir(dir.path())
            .with_suites(["ecdsa", "ecdsa_p1363", "ecdsa_webcrypto"]);
        let files = Harness::new(config, &provider).unwrap().discover().unwrap();
        let found: Vec<(String, Variant)> = files
            .iter()
            .map(|f| (f.path.file_name().unwrap().to_string_lossy().into_owned(), f.variant))
            .collect();
        assert_eq!(
            found,
            vec![
                ("ecdsa_secp256r1_sha256_test.json".to_string(), Variant::Normal),
                ("ecdsa_secp256r1_sha256_p1363_test.json".to_string(), Variant::P1363),
                ("ecdsa_secp384r1_webcrypto_test.json".to_string(), Variant::WebCrypto),
                ("ecdsa_webcrypto_test.json".to_string(), Variant::WebCrypto),
            ]
        );
    }

    #[test]
    fn test_selected_suite_without_files_is_fatal() {
        let provider = StandardProvider::new().unwrap();
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), &["kw_test.json"]);
        let config = HarnessConfig::new().with_vectors_dir(dir.path()).with_suites(["kw", "kwp"]);
        let error = Harness::new(config, &provider).unwrap().discover().unwrap_err();
        assert!(matches!(error, HarnessError::NoVectors { ref suite, .. } if suite == "kwp"));
    }

    #[test]
    fn test_missing_directory_is_fatal() {
        let provider = StandardProvider::new().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let config = HarnessConfig::new().with_vectors_dir(dir.path().join("absent"));
        assert!(matches!(
            Harness::new(config, &provider).unwrap().run(),
            Err(HarnessError::Io { .. })
        ));
    }
}
