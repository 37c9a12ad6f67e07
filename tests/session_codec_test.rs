// Session codec behaviour through the public API
use passport::session::{InvalidReason, SessionCodec, SessionVerdict};
use passport::testing::constants::{TEST_CIPHER_KEY, TEST_UID};
use passport::testing::TestFixtures;
use passport::utils::crypto::AesGcmCipher;
use passport::utils::jwt::{analyse_jwt, HmacJwtSigner};
use std::sync::Arc;

fn codec_with_secret(secret: &str) -> SessionCodec {
    SessionCodec::new(
        Arc::new(HmacJwtSigner::new(secret.as_bytes())),
        Arc::new(AesGcmCipher::new(TEST_CIPHER_KEY.as_bytes())),
    )
}

#[test]
fn test_issue_then_decode() {
    let codec = TestFixtures::session_codec();
    let value = codec.issue(TEST_UID, 3600).unwrap();

    assert!(codec.verify(&value));
    let claims = codec.decode_claims(&value);
    assert_eq!(claims["uid"], TEST_UID);
    assert_eq!(
        claims["exp"].as_i64().unwrap() - claims["iat"].as_i64().unwrap(),
        3600
    );
    assert!(claims["jti"].is_string());
}

#[test]
fn test_cookie_value_is_opaque() {
    let codec = TestFixtures::session_codec();
    let value = codec.issue(TEST_UID, 60).unwrap();

    // Encrypted, so not readable as a JWT
    assert!(analyse_jwt(&value).is_err());
    assert!(!value.contains('='));
    assert!(!value.contains('+'));
    assert!(!value.contains('/'));
}

#[test]
fn test_each_issue_is_unique() {
    let codec = TestFixtures::session_codec();

    let first = codec.issue(TEST_UID, 60).unwrap();
    let second = codec.issue(TEST_UID, 60).unwrap();
    assert_ne!(first, second);
    assert_ne!(
        codec.decode_claims(&first)["jti"],
        codec.decode_claims(&second)["jti"]
    );
}

#[test]
fn test_expired_session_is_rejected() {
    let codec = TestFixtures::session_codec();
    let value = codec.issue(TEST_UID, 0).unwrap();

    assert!(!codec.verify(&value));
    assert!(codec.decode_claims(&value).is_empty());
    assert_eq!(
        codec.inspect(&value),
        SessionVerdict::Invalid(InvalidReason::Expired)
    );
}

#[test]
fn test_other_signing_secret_is_rejected() {
    let issuer = codec_with_secret("secret-one");
    let verifier = codec_with_secret("secret-two");
    let value = issuer.issue(TEST_UID, 60).unwrap();

    assert!(issuer.verify(&value));
    assert!(!verifier.verify(&value));
    assert_eq!(
        verifier.inspect(&value),
        SessionVerdict::Invalid(InvalidReason::BadSignature)
    );
}

#[test]
fn test_tampered_value_is_rejected() {
    let codec = TestFixtures::session_codec();
    let value = codec.issue(TEST_UID, 60).unwrap();

    let mut tampered: Vec<char> = value.chars().collect();
    let last = tampered.len() - 1;
    tampered[last] = if tampered[last] == 'A' { 'B' } else { 'A' };
    let tampered: String = tampered.into_iter().collect();

    assert!(!codec.verify(&tampered));
    assert!(codec.decode_claims(&tampered).is_empty());
}

#[test]
fn test_garbage_and_empty_values() {
    let codec = TestFixtures::session_codec();

    assert_eq!(
        codec.inspect(""),
        SessionVerdict::Invalid(InvalidReason::Empty)
    );
    assert_eq!(
        codec.inspect("not-a-session"),
        SessionVerdict::Invalid(InvalidReason::Undecryptable)
    );
    assert!(!codec.verify("not-a-session"));
}

#[test]
fn test_default_ttl_from_settings() {
    let mut settings = TestFixtures::settings();
    settings.session.ttl_seconds = 90;
    let codec = settings.build_session_codec();

    let value = codec.issue_default(TEST_UID).unwrap();
    let claims = codec.inspect(&value).claims().unwrap();
    assert_eq!(claims.uid, TEST_UID);
    assert_eq!(claims.exp - claims.iat, 90);
}
