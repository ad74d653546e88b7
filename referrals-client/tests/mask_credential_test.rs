//! Unit tests for [`referrals_client::mask_credential`].

use referrals_client::mask_credential;

/// **Test: Short keys are fully masked.**
#[test]
fn mask_credential_short_returns_all_star() {
    assert_eq!(mask_credential(""), "***");
    assert_eq!(mask_credential("abc"), "***");
    assert_eq!(mask_credential("12345678"), "***");
}

/// **Test: Longer keys keep only the last 4 characters.**
#[test]
fn mask_credential_long_shows_tail() {
    assert_eq!(mask_credential("test-api-key"), "***-key");
    assert_eq!(mask_credential("osr_live_abcdefwxyz"), "***wxyz");
}
