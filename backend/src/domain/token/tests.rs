//! Regression coverage for this module.

use chrono::{Duration, Utc};
use rstest::rstest;

use super::*;

fn codec() -> TokenCodec {
    TokenCodec::new(
        &SigningSecret::from_bytes(*b"test-signing-secret-0123456789ab"),
        TokenTtl::default(),
    )
}

#[test]
fn issued_tokens_round_trip_their_subject() {
    let codec = codec();
    let user = UserId::random();

    let issued = codec.issue(&user).expect("issuing succeeds");
    let claims = codec.decode(issued.access_token()).expect("token decodes");

    assert_eq!(claims.user_id(), &user);
    assert_eq!(claims.expires_at(), issued.expires_at());
    assert_eq!(
        claims.expires_at() - claims.issued_at(),
        TokenTtl::default().as_duration()
    );
}

#[test]
fn expiry_is_anchored_to_the_issue_instant() {
    let codec = codec();
    let user = UserId::random();
    let issued_at = Utc::now() - Duration::minutes(10);

    let issued = codec
        .issue_at(&user, issued_at)
        .expect("issuing succeeds");

    // Ten minutes into a one hour lifetime: still valid.
    assert!(codec.decode(issued.access_token()).is_ok());

    let stale = codec
        .issue_at(&user, Utc::now() - Duration::hours(2))
        .expect("issuing succeeds");
    assert_eq!(
        codec.decode(stale.access_token()),
        Err(TokenError::Expired)
    );
}

#[rstest]
#[case(0)]
#[case(1)]
#[case(2)]
fn tampering_with_any_segment_invalidates_the_token(#[case] segment: usize) {
    let codec = codec();
    let issued = codec.issue(&UserId::random()).expect("issuing succeeds");

    let mut parts: Vec<String> = issued
        .access_token()
        .split('.')
        .map(ToOwned::to_owned)
        .collect();
    assert_eq!(parts.len(), 3, "JWS compact serialisation has three parts");

    let tampered_part = flip_first_char(&parts[segment]);
    parts[segment] = tampered_part;
    let tampered = parts.join(".");

    assert!(matches!(
        codec.decode(&tampered),
        Err(TokenError::Invalid { .. })
    ));
}

fn flip_first_char(part: &str) -> String {
    let mut chars = part.chars();
    let first = chars.next().expect("segment is non-empty");
    let replacement = if first == 'A' { 'B' } else { 'A' };
    std::iter::once(replacement).chain(chars).collect()
}

#[test]
fn tokens_from_another_secret_are_rejected() {
    let codec = codec();
    let other = TokenCodec::new(
        &SigningSecret::from_bytes(*b"another-signing-secret-0123456789"),
        TokenTtl::default(),
    );

    let issued = other.issue(&UserId::random()).expect("issuing succeeds");
    assert!(matches!(
        codec.decode(issued.access_token()),
        Err(TokenError::Invalid { .. })
    ));
}

#[test]
fn garbage_strings_are_invalid_not_expired() {
    let codec = codec();
    assert!(matches!(
        codec.decode("definitely-not-a-token"),
        Err(TokenError::Invalid { .. })
    ));
}

#[rstest]
#[case(0)]
#[case(-60)]
fn non_positive_lifetimes_are_rejected(#[case] secs: i64) {
    assert_eq!(TokenTtl::from_secs(secs), Err(TokenTtlError::NotPositive));
}

#[test]
fn fingerprints_identify_secrets_without_exposing_them() {
    let secret = SigningSecret::from_bytes(*b"test-signing-secret-0123456789ab");
    let fingerprint = secret.fingerprint();

    assert_eq!(fingerprint.len(), 16);
    assert!(!fingerprint.contains("test-signing"));
    // Deterministic per secret, distinct across secrets.
    assert_eq!(fingerprint, secret.fingerprint());
    assert_ne!(fingerprint, SigningSecret::generate().fingerprint());
}
