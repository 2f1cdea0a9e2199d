mod common;

use common::{MemUserStore, TestHarness};

use deliver_auth::{verify_access_token, verify_refresh_token};
use deliver_core::ErrorKind;
use deliver_models::auth::{LoginRequest, RefreshRequest};
use deliver_session::{SidBlacklist, VersionLedger};

fn login_request(email: &str, password: &str) -> LoginRequest {
    LoginRequest {
        email: email.to_string(),
        password: password.to_string(),
        device_info: Some("integration-test".to_string()),
    }
}

fn refresh_request(token: &str) -> RefreshRequest {
    RefreshRequest {
        refresh_token: token.to_string(),
    }
}

#[tokio::test]
async fn login_issues_a_pair_bound_to_one_sid() {
    let harness = TestHarness::new(
        MemUserStore::with_user(42, "rider@deliver.test", "pass1234"),
        &["orders:read", "orders:create"],
    );

    let tokens = harness
        .service
        .login(login_request("rider@deliver.test", "pass1234"))
        .await
        .unwrap();

    let access = verify_access_token(&tokens.access_token, &harness.jwt_config).unwrap();
    let refresh = verify_refresh_token(&tokens.refresh_token, &harness.jwt_config).unwrap();

    assert_eq!(access.user_id(), Some(42));
    assert_eq!(refresh.user_id(), Some(42));
    assert_eq!(access.sid, refresh.sid);
    assert_eq!(access.sid, tokens.access_sid);
    assert_eq!(access.ver, 1);
    assert_eq!(access.authorities, vec!["orders:read", "orders:create"]);
    assert_eq!(tokens.expires_in, harness.jwt_config.access_token_expiry);

    assert_eq!(harness.sessions.live_session_count(42), 1);
}

#[tokio::test]
async fn login_normalizes_the_email() {
    let harness = TestHarness::new(
        MemUserStore::with_user(1, "rider@deliver.test", "pass1234"),
        &[],
    );

    harness
        .service
        .login(login_request("  Rider@Deliver.Test ", "pass1234"))
        .await
        .unwrap();
}

#[tokio::test]
async fn unknown_email_and_wrong_password_are_indistinguishable() {
    let harness = TestHarness::new(
        MemUserStore::with_user(1, "rider@deliver.test", "pass1234"),
        &[],
    );

    let unknown = harness
        .service
        .login(login_request("nobody@deliver.test", "pass1234"))
        .await
        .unwrap_err();
    let wrong_pass = harness
        .service
        .login(login_request("rider@deliver.test", "wrong"))
        .await
        .unwrap_err();

    assert_eq!(unknown.kind(), ErrorKind::BadCredentials);
    assert_eq!(wrong_pass.kind(), ErrorKind::BadCredentials);
    assert_eq!(unknown.message(), wrong_pass.message());
}

#[tokio::test]
async fn refresh_rotates_to_a_new_sid_and_consumes_the_old_token() {
    let harness = TestHarness::new(
        MemUserStore::with_user(42, "rider@deliver.test", "pass1234"),
        &["orders:read"],
    );

    let first = harness
        .service
        .login(login_request("rider@deliver.test", "pass1234"))
        .await
        .unwrap();

    let second = harness
        .service
        .refresh(refresh_request(&first.refresh_token))
        .await
        .unwrap();

    assert_ne!(first.access_sid, second.access_sid);
    let access = verify_access_token(&second.access_token, &harness.jwt_config).unwrap();
    assert_eq!(access.sid, second.access_sid);

    // Exactly one live session survives the rotation; the old row stays
    // behind, revoked.
    assert_eq!(harness.sessions.live_session_count(42), 1);
    assert_eq!(harness.sessions.total_row_count(), 2);

    // Replaying the consumed token gets the coarse invalid-token answer.
    let replay = harness
        .service
        .refresh(refresh_request(&first.refresh_token))
        .await
        .unwrap_err();
    assert_eq!(replay.kind(), ErrorKind::InvalidToken);

    // The new token still works.
    harness
        .service
        .refresh(refresh_request(&second.refresh_token))
        .await
        .unwrap();
}

#[tokio::test]
async fn refresh_chain_keeps_exactly_one_live_session() {
    let harness = TestHarness::new(
        MemUserStore::with_user(42, "rider@deliver.test", "pass1234"),
        &[],
    );

    let mut tokens = harness
        .service
        .login(login_request("rider@deliver.test", "pass1234"))
        .await
        .unwrap();

    let mut seen_sids = vec![tokens.access_sid.clone()];
    for _ in 0..4 {
        tokens = harness
            .service
            .refresh(refresh_request(&tokens.refresh_token))
            .await
            .unwrap();
        assert!(!seen_sids.contains(&tokens.access_sid));
        seen_sids.push(tokens.access_sid.clone());
        assert_eq!(harness.sessions.live_session_count(42), 1);
    }
    assert_eq!(harness.sessions.total_row_count(), 5);
}

#[tokio::test]
async fn access_token_is_rejected_where_a_refresh_is_expected() {
    let harness = TestHarness::new(
        MemUserStore::with_user(1, "rider@deliver.test", "pass1234"),
        &[],
    );

    let tokens = harness
        .service
        .login(login_request("rider@deliver.test", "pass1234"))
        .await
        .unwrap();

    let err = harness
        .service
        .refresh(refresh_request(&tokens.access_token))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidToken);
}

#[tokio::test]
async fn garbage_refresh_token_is_invalid() {
    let harness = TestHarness::new(
        MemUserStore::with_user(1, "rider@deliver.test", "pass1234"),
        &[],
    );

    let err = harness
        .service
        .refresh(refresh_request("not-a-jwt"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidToken);
}

#[tokio::test]
async fn logout_blacklists_the_sid_and_kills_the_refresh_session() {
    let harness = TestHarness::new(
        MemUserStore::with_user(42, "rider@deliver.test", "pass1234"),
        &[],
    );

    let tokens = harness
        .service
        .login(login_request("rider@deliver.test", "pass1234"))
        .await
        .unwrap();

    harness
        .service
        .logout(&tokens.access_sid, Some(&tokens.refresh_token))
        .await
        .unwrap();

    assert!(harness.blacklist.is_revoked(&tokens.access_sid).await);
    assert_eq!(harness.sessions.live_session_count(42), 0);

    let err = harness
        .service
        .refresh(refresh_request(&tokens.refresh_token))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidToken);
}

#[tokio::test]
async fn logout_leaves_other_sessions_alone() {
    let harness = TestHarness::new(
        MemUserStore::with_user(42, "rider@deliver.test", "pass1234"),
        &[],
    );

    let phone = harness
        .service
        .login(login_request("rider@deliver.test", "pass1234"))
        .await
        .unwrap();
    let laptop = harness
        .service
        .login(login_request("rider@deliver.test", "pass1234"))
        .await
        .unwrap();

    harness
        .service
        .logout(&phone.access_sid, Some(&phone.refresh_token))
        .await
        .unwrap();

    assert!(!harness.blacklist.is_revoked(&laptop.access_sid).await);
    harness
        .service
        .refresh(refresh_request(&laptop.refresh_token))
        .await
        .unwrap();
}

#[tokio::test]
async fn logout_tolerates_an_unparseable_refresh_token() {
    let harness = TestHarness::new(
        MemUserStore::with_user(42, "rider@deliver.test", "pass1234"),
        &[],
    );

    let tokens = harness
        .service
        .login(login_request("rider@deliver.test", "pass1234"))
        .await
        .unwrap();

    // The blacklist write still happens; the bad token is logged and
    // ignored rather than failing the logout.
    harness
        .service
        .logout(&tokens.access_sid, Some("corrupted-token"))
        .await
        .unwrap();
    assert!(harness.blacklist.is_revoked(&tokens.access_sid).await);

    // And no refresh token at all is equally fine.
    harness.service.logout("some-other-sid", None).await.unwrap();
}

#[tokio::test]
async fn logout_all_bumps_the_version_and_revokes_every_session() {
    let harness = TestHarness::new(
        MemUserStore::with_user(7, "rider@deliver.test", "pass1234"),
        &[],
    );
    harness.users.insert(8, "other@deliver.test", "pass1234");

    let phone = harness
        .service
        .login(login_request("rider@deliver.test", "pass1234"))
        .await
        .unwrap();
    harness
        .service
        .login(login_request("rider@deliver.test", "pass1234"))
        .await
        .unwrap();
    let other = harness
        .service
        .login(login_request("other@deliver.test", "pass1234"))
        .await
        .unwrap();

    harness.service.logout_all(7).await.unwrap();

    assert_eq!(harness.sessions.live_session_count(7), 0);
    assert_eq!(harness.versions.current_version(7).await.unwrap(), 2);

    // Old refresh tokens are dead.
    let err = harness
        .service
        .refresh(refresh_request(&phone.refresh_token))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidToken);

    // The other user is untouched.
    assert_eq!(harness.sessions.live_session_count(8), 1);
    assert_eq!(harness.versions.current_version(8).await.unwrap(), 1);
    harness
        .service
        .refresh(refresh_request(&other.refresh_token))
        .await
        .unwrap();

    // A new login picks up the bumped version.
    let relogin = harness
        .service
        .login(login_request("rider@deliver.test", "pass1234"))
        .await
        .unwrap();
    let access = verify_access_token(&relogin.access_token, &harness.jwt_config).unwrap();
    assert_eq!(access.ver, 2);
}
