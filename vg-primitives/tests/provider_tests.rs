//! Cross-checks between the capabilities of the standard provider.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

use vg_primitives::{
    AeadAlgorithm, AeadProvider, CipherAlgorithm, CipherProvider, Curve, Direction,
    KeyAgreementProvider, KeyWrapAlgorithm, KeyWrapProvider, ProviderError, PublicKeyMaterial,
    StandardProvider,
};

fn streaming_seal(
    provider: &StandardProvider,
    algorithm: AeadAlgorithm,
    key: &[u8],
    nonce: &[u8],
    aad: &[u8],
    msg: &[u8],
) -> (Vec<u8>, Vec<u8>) {
    let mut ctx = provider.cipher(CipherAlgorithm::Aead(algorithm)).unwrap();
    ctx.set_iv_len(nonce.len()).unwrap();
    ctx.set_tag_len(16).unwrap();
    ctx.init(key, nonce, Direction::Encrypt).unwrap();
    ctx.update_aad(aad).unwrap();
    let mut ct = ctx.update(msg).unwrap();
    ct.extend(ctx.finalize().unwrap());
    (ct, ctx.tag().unwrap())
}

fn streaming_open(
    provider: &StandardProvider,
    algorithm: AeadAlgorithm,
    key: &[u8],
    nonce: &[u8],
    aad: &[u8],
    ct: &[u8],
    tag: &[u8],
) -> vg_primitives::Result<Vec<u8>> {
    let mut ctx = provider.cipher(CipherAlgorithm::Aead(algorithm))?;
    ctx.set_iv_len(nonce.len())?;
    ctx.set_tag(tag)?;
    ctx.init(key, nonce, Direction::Decrypt)?;
    ctx.update_aad(aad)?;
    let mut pt = ctx.update(ct)?;
    pt.extend(ctx.finalize()?);
    Ok(pt)
}

mod aead_tests {
    use super::*;
    use aes_gcm::aead::{AeadInPlace, KeyInit};
    use aes_gcm::{Aes128Gcm, Nonce};
    use proptest::prelude::*;

    #[test]
    fn test_streaming_and_atomic_agree() {
        let provider = StandardProvider::new().unwrap();
        let key = [0x5au8; 32];
        let nonce = [0x01u8; 12];
        for algorithm in [AeadAlgorithm::AesGcm, AeadAlgorithm::ChaCha20Poly1305] {
            for msg in [&b""[..], &b"a"[..], &[0xeeu8; 67][..]] {
                let (ct, tag) = streaming_seal(&provider, algorithm, &key, &nonce, b"aad", msg);
                let sealed = provider.seal(algorithm, &key, &nonce, b"aad", 16, msg).unwrap();
                assert_eq!(sealed.ciphertext, ct, "{algorithm}");
                assert_eq!(sealed.tag, tag, "{algorithm}");
                let opened = provider.open(algorithm, &key, &nonce, b"aad", 16, &ct, &tag).unwrap();
                assert_eq!(opened, msg);
                assert_eq!(streaming_open(&provider, algorithm, &key, &nonce, b"aad", &ct, &tag).unwrap(), msg);
            }
        }
    }

    #[test]
    fn test_streaming_detects_modified_aad() {
        let provider = StandardProvider::new().unwrap();
        let key = [7u8; 16];
        let nonce = [9u8; 13];
        let (ct, tag) = streaming_seal(&provider, AeadAlgorithm::AesCcm, &key, &nonce, b"header", b"payload");
        assert_eq!(
            streaming_open(&provider, AeadAlgorithm::AesCcm, &key, &nonce, b"header", &ct, &tag).unwrap(),
            b"payload"
        );
        assert!(streaming_open(&provider, AeadAlgorithm::AesCcm, &key, &nonce, b"headex", &ct, &tag).is_err());
    }

    #[test]
    fn test_xchacha_has_no_atomic_backend() {
        let provider = StandardProvider::new().unwrap();
        assert!(!provider.aead_supported(AeadAlgorithm::XChaCha20Poly1305, 32, 16));
        let (ct, tag) = streaming_seal(&provider, AeadAlgorithm::XChaCha20Poly1305, &[3u8; 32], &[4u8; 24], b"", b"x");
        assert_eq!(ct.len(), 1);
        assert_eq!(tag.len(), 16);
    }

    #[test]
    fn test_gcm_accepts_unusual_iv_lengths() {
        // Wycheproof aes_gcm tcId 259 (15-byte IV) and tcId 285 (10-byte IV).
        let provider = StandardProvider::new().unwrap();
        let cases = [
            ("34c74e28182948e03af02a01f46eb4f7", "b0a73119a97d623806b49d45ddf4c7", "fe82ba66cf2e265741f2c86c",
                "2bc3ef8e7402b4631f48e9be", "4b6f6f5be291a90b9e93a8a82ddbc8d8"),
            ("1e6c6214a6a5dd5b628c71de07788137", "40bcc315dec88bf326cc", "", "", "6f539a125a2f4fd214597e2f981efe6e"),
        ];
        for (key, iv, msg, ct, tag) in cases {
            let [key, iv, msg, ct, tag] = [key, iv, msg, ct, tag].map(|h| hex::decode(h).unwrap());
            assert_eq!(streaming_seal(&provider, AeadAlgorithm::AesGcm, &key, &iv, b"", &msg), (ct.clone(), tag.clone()));
            assert_eq!(streaming_open(&provider, AeadAlgorithm::AesGcm, &key, &iv, b"", &ct, &tag).unwrap(), msg);
        }
    }

    proptest! {
        #[test]
        fn gcm_matches_reference_for_96_bit_nonces(
            key in proptest::collection::vec(any::<u8>(), 16),
            nonce in proptest::collection::vec(any::<u8>(), 12),
            aad in proptest::collection::vec(any::<u8>(), 0..40),
            msg in proptest::collection::vec(any::<u8>(), 0..80),
        ) {
            let provider = StandardProvider::new().unwrap();
            let (ct, tag) = streaming_seal(&provider, AeadAlgorithm::AesGcm, &key, &nonce, &aad, &msg);
            let reference = Aes128Gcm::new_from_slice(&key).unwrap();
            let mut expected = msg.clone();
            let expected_tag = reference
                .encrypt_in_place_detached(Nonce::from_slice(&nonce), &aad, &mut expected)
                .unwrap();
            prop_assert_eq!(ct, expected);
            prop_assert_eq!(tag, expected_tag.to_vec());
        }

        #[test]
        fn gcm_opens_what_it_seals_for_any_iv_length(
            key in proptest::collection::vec(any::<u8>(), 32),
            iv in proptest::collection::vec(any::<u8>(), 1..80),
            msg in proptest::collection::vec(any::<u8>(), 0..70),
        ) {
            let provider = StandardProvider::new().unwrap();
            let (ct, mut tag) = streaming_seal(&provider, AeadAlgorithm::AesGcm, &key, &iv, b"hdr", &msg);
            let opened = streaming_open(&provider, AeadAlgorithm::AesGcm, &key, &iv, b"hdr", &ct, &tag);
            prop_assert_eq!(opened.unwrap(), msg);
            tag[0] ^= 1;
            let tampered = streaming_open(&provider, AeadAlgorithm::AesGcm, &key, &iv, b"hdr", &ct, &tag);
            prop_assert_eq!(tampered, Err(ProviderError::AuthenticationFailed));
        }
    }
}

mod agreement_tests {
    use super::*;
    use p256::elliptic_curve::sec1::ToEncodedPoint;

    #[test]
    fn test_p256_shared_secret_is_symmetric() {
        let provider = StandardProvider::new().unwrap();
        let alice = [0x11u8; 32];
        let bob = [0x22u8; 32];
        let point = |scalar: &[u8]| {
            p256::SecretKey::from_slice(scalar).unwrap().public_key().to_encoded_point(false).as_bytes().to_vec()
        };
        let alice_point = point(&alice);
        let bob_point = point(&bob);

        let alice_key = provider.private_key(Curve::P256, &alice).unwrap();
        let bob_key = provider.private_key(Curve::P256, &bob).unwrap();
        let bob_peer = provider.peer_public_key(Curve::P256, PublicKeyMaterial::Sec1Point(&bob_point)).unwrap();
        let alice_peer = provider.peer_public_key(Curve::P256, PublicKeyMaterial::Sec1Point(&alice_point)).unwrap();

        let shared = alice_key.compute_shared(&bob_peer).unwrap();
        assert_eq!(shared.len(), Curve::P256.field_len());
        assert_eq!(shared, bob_key.compute_shared(&alice_peer).unwrap());
    }

    #[test]
    fn test_point_off_curve_is_rejected() {
        let provider = StandardProvider::new().unwrap();
        let mut bogus = vec![0x04u8];
        bogus.extend([0x01u8; 64]);
        assert!(matches!(
            provider.peer_public_key(Curve::P256, PublicKeyMaterial::Sec1Point(&bogus)),
            Err(ProviderError::InvalidKey(_))
        ));
    }
}

mod key_wrap_tests {
    use super::*;

    #[test]
    fn test_kwp_rfc5649() {
        let provider = StandardProvider::new().unwrap();
        let kek = hex::decode("5840df6e29b02af1ab493b705bf16ea1ae8338f4dcc176a8").unwrap();
        let key = hex::decode("c37b7e6492584340bed12207808941155068f738").unwrap();
        let expected = hex::decode("138bdeaa9b8fa7fc61f97742e72248ee5ae6ae5360d1ae6a5f54f373fa543b6a").unwrap();
        let wrapped = provider.wrap(KeyWrapAlgorithm::AesKwp, &kek, &key).unwrap();
        assert_eq!(wrapped, expected);
        assert_eq!(provider.unwrap(KeyWrapAlgorithm::AesKwp, &kek, &wrapped).unwrap(), key);
    }

    #[test]
    fn test_kw_rejects_modified_ciphertext() {
        let provider = StandardProvider::new().unwrap();
        let kek = [0u8; 16];
        let mut wrapped = provider.wrap(KeyWrapAlgorithm::AesKw, &kek, &[1u8; 16]).unwrap();
        wrapped[3] ^= 1;
        assert!(provider.unwrap(KeyWrapAlgorithm::AesKw, &kek, &wrapped).is_err());
    }
}
