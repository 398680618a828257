use uuid::Uuid;

use gatehouse_auth::domain::repository::{ChallengeStore, GrantStore, UserDirectory};
use gatehouse_auth::domain::types::{
    DirectoryUser, GrantPermission, ServiceGrant, UserStatus,
};
use gatehouse_auth::error::AuthServiceError;
use gatehouse_auth::infra::db::{DbChallengeStore, DbGrantStore, DbUserDirectory};
use gatehouse_auth::migrate::{self, SCHEMA_VERSION};
use gatehouse_auth::usecase::challenge::{IssueChallengeInput, IssueChallengeUseCase};
use gatehouse_auth::usecase::credential::CREDENTIAL_TTL_SECS;
use gatehouse_auth::usecase::verify::{VerifyChallengeInput, VerifyChallengeUseCase};

use crate::helpers::{
    MockMailSender, TEST_BASE_URL, TEST_ISSUER, TEST_JWT_SECRET, TEST_VERIFY_PATH, memory_db,
    now_ms, test_challenge, token_from_link,
};

async fn migrated_db() -> sea_orm::DatabaseConnection {
    let db = memory_db().await;
    migrate::ensure(&db, SCHEMA_VERSION).await.unwrap();
    db
}

fn directory_user(email: &str) -> DirectoryUser {
    DirectoryUser {
        id: Uuid::new_v4(),
        email: email.to_owned(),
        status: UserStatus::Active,
        created_at: now_ms(),
        updated_at: now_ms(),
        last_login_at: None,
    }
}

// ── User directory ───────────────────────────────────────────────────────────

#[tokio::test]
async fn user_directory_roundtrip() {
    let db = migrated_db().await;
    let directory = DbUserDirectory { db };
    let user = directory_user("alice@example.com");
    directory.create(&user).await.unwrap();

    let by_email = directory
        .find_by_email("alice@example.com")
        .await
        .unwrap()
        .expect("user should exist");
    assert_eq!(by_email.id, user.id);
    assert_eq!(by_email.status, UserStatus::Active);

    let by_id = directory.find_by_id(user.id).await.unwrap().unwrap();
    assert_eq!(by_id.email, user.email);

    assert!(directory.find_by_email("bob@example.com").await.unwrap().is_none());
}

#[tokio::test]
async fn set_status_flips_and_bumps_updated_at() {
    let db = migrated_db().await;
    let directory = DbUserDirectory { db };
    let user = directory_user("carol@example.com");
    directory.create(&user).await.unwrap();

    let later = user.updated_at + 5_000;
    assert!(
        directory
            .set_status(user.id, UserStatus::Suspended, later)
            .await
            .unwrap()
    );
    let reloaded = directory.find_by_id(user.id).await.unwrap().unwrap();
    assert_eq!(reloaded.status, UserStatus::Suspended);
    assert_eq!(reloaded.updated_at, later);

    assert!(
        !directory
            .set_status(Uuid::new_v4(), UserStatus::Active, later)
            .await
            .unwrap(),
        "unknown user should touch zero rows"
    );
}

#[tokio::test]
async fn record_login_sets_last_login_at() {
    let db = migrated_db().await;
    let directory = DbUserDirectory { db };
    let user = directory_user("dave@example.com");
    directory.create(&user).await.unwrap();

    let login_at = now_ms();
    directory.record_login(user.id, login_at).await.unwrap();
    let reloaded = directory.find_by_id(user.id).await.unwrap().unwrap();
    assert_eq!(reloaded.last_login_at, Some(login_at));
}

#[tokio::test]
async fn delete_reports_whether_a_row_went_away() {
    let db = migrated_db().await;
    let directory = DbUserDirectory { db };
    let user = directory_user("erin@example.com");
    directory.create(&user).await.unwrap();

    assert!(directory.delete(user.id).await.unwrap());
    assert!(!directory.delete(user.id).await.unwrap());
    assert!(directory.find_by_id(user.id).await.unwrap().is_none());
}

// ── Challenge store ──────────────────────────────────────────────────────────

#[tokio::test]
async fn latest_for_user_picks_the_greatest_sent_at() {
    let db = migrated_db().await;
    let directory = DbUserDirectory { db: db.clone() };
    let store = DbChallengeStore { db };
    let user = directory_user("frank@example.com");
    directory.create(&user).await.unwrap();

    let base = now_ms();
    let older = test_challenge(user.id, &[1u8; 32], base - 300_000);
    let newest = test_challenge(user.id, &[2u8; 32], base - 10_000);
    let middle = test_challenge(user.id, &[3u8; 32], base - 100_000);
    // Insert out of order; only sent_at ordering may matter.
    store.create(&older).await.unwrap();
    store.create(&newest).await.unwrap();
    store.create(&middle).await.unwrap();

    let latest = store.latest_for_user(user.id).await.unwrap().unwrap();
    assert_eq!(latest.id, newest.id);
}

#[tokio::test]
async fn complete_touches_exactly_one_row_exactly_once() {
    let db = migrated_db().await;
    let directory = DbUserDirectory { db: db.clone() };
    let store = DbChallengeStore { db };
    let user = directory_user("grace@example.com");
    directory.create(&user).await.unwrap();

    let challenge = test_challenge(user.id, &[4u8; 32], now_ms());
    store.create(&challenge).await.unwrap();

    assert!(store.complete(challenge.id).await.unwrap());
    // Second attempt finds the row already consumed.
    assert!(!store.complete(challenge.id).await.unwrap());
    // A row that never existed reports the same way.
    assert!(!store.complete(Uuid::new_v4()).await.unwrap());

    let reloaded = store.latest_for_user(user.id).await.unwrap().unwrap();
    assert!(reloaded.completed);
}

// ── Grant store ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn grant_store_roundtrip() {
    let db = migrated_db().await;
    let directory = DbUserDirectory { db: db.clone() };
    let store = DbGrantStore { db };
    let user = directory_user("heidi@example.com");
    directory.create(&user).await.unwrap();

    let grant = ServiceGrant {
        id: Uuid::new_v4(),
        user_id: user.id,
        service: "ledger".to_owned(),
        permission: GrantPermission::SuperUser,
        expires_at: Some(now_ms() + 86_400_000),
    };
    store.create(&grant).await.unwrap();

    let grants = store.list_for_user(user.id).await.unwrap();
    assert_eq!(grants.len(), 1);
    assert_eq!(grants[0].service, "ledger");
    assert_eq!(grants[0].permission, GrantPermission::SuperUser);

    assert!(!store.remove(user.id, Uuid::new_v4()).await.unwrap());
    assert!(store.remove(user.id, grant.id).await.unwrap());
    assert!(store.list_for_user(user.id).await.unwrap().is_empty());
}

// ── Full issue → verify flow over the real stores ────────────────────────────

#[tokio::test]
async fn issued_challenge_verifies_once_against_the_store() {
    let db = migrated_db().await;
    let directory = DbUserDirectory { db: db.clone() };
    let user = directory_user("ivan@example.com");
    directory.create(&user).await.unwrap();

    let mail = MockMailSender::new();
    let sent = mail.sent_handle();
    let issue = IssueChallengeUseCase {
        users: DbUserDirectory { db: db.clone() },
        challenges: DbChallengeStore { db: db.clone() },
        mail,
        debounce_secs: 180,
        base_url: TEST_BASE_URL.to_owned(),
        verify_path: TEST_VERIFY_PATH.to_owned(),
    };
    issue
        .execute(IssueChallengeInput {
            email: user.email.clone(),
            redirect: None,
        })
        .await
        .unwrap();

    // A second request inside the debounce window is refused.
    let debounced = issue
        .execute(IssueChallengeInput {
            email: user.email.clone(),
            redirect: None,
        })
        .await;
    assert!(matches!(
        debounced,
        Err(AuthServiceError::RateLimited { .. })
    ));

    let token = token_from_link(&sent.lock().unwrap()[0].1);

    let verify = VerifyChallengeUseCase {
        users: DbUserDirectory { db: db.clone() },
        challenges: DbChallengeStore { db: db.clone() },
        expiry_secs: 900,
        jwt_secret: TEST_JWT_SECRET.to_owned(),
        jwt_issuer: TEST_ISSUER.to_owned(),
    };
    let out = verify
        .execute(VerifyChallengeInput {
            email: user.email.clone(),
            token: token.clone(),
        })
        .await
        .unwrap();
    assert_eq!(out.expires_in, CREDENTIAL_TTL_SECS);

    let reloaded = DbUserDirectory { db: db.clone() }
        .find_by_id(user.id)
        .await
        .unwrap()
        .unwrap();
    assert!(reloaded.last_login_at.is_some());

    let replay = verify
        .execute(VerifyChallengeInput {
            email: user.email.clone(),
            token,
        })
        .await;
    assert!(matches!(replay, Err(AuthServiceError::AlreadyUsed)));
}
