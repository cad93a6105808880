/*
 * Responsibility
 * - the authentication/authorization decision chain:
 *   resolve → resolve_active → resolve_admin / resolve_nurse
 * - each tier is a strict refinement of the previous one; role checks can
 *   never run against an account the active check has not passed
 *
 * Notes
 * - no logging here: failures are logged once, by the error mapping
 * - no side effects beyond the single store read
 */
use async_trait::async_trait;
use axum::http::StatusCode;

use crate::error::AppError;
use crate::repos::error::RepoError;
use crate::services::auth::{Principal, verifier::TokenVerify};

/// User lookup capability consumed by the resolver.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Exact-match lookup; email comparison is case-sensitive.
    async fn find_by_email(&self, email: &str) -> Result<Option<Principal>, RepoError>;
}

/// Verify the token and load the matching user.
///
/// Verification failure detail never reaches the client: malformed, expired
/// and badly-signed tokens all collapse into the same 401, with a
/// `WWW-Authenticate: Bearer` challenge. A missing/empty `sub` and an
/// unknown user also answer 401, but without the challenge.
pub async fn resolve(
    verifier: &dyn TokenVerify,
    users: &dyn UserStore,
    token: &str,
) -> Result<Principal, AppError> {
    let claims = verifier
        .verify(token)
        .map_err(|_| AppError::authentication("토큰이 유효하지 않습니다.", true))?;

    let email = match claims.sub {
        Some(sub) if !sub.is_empty() => sub,
        _ => return Err(AppError::authentication("토큰이 유효하지 않습니다.", false)),
    };

    users
        .find_by_email(&email)
        .await?
        .ok_or_else(|| AppError::authentication("사용자를 찾을 수 없습니다.", false))
}

/// `resolve`, then reject inactive accounts.
///
/// Inactive accounts answer 400, not 403; clients assert on that status.
pub async fn resolve_active(
    verifier: &dyn TokenVerify,
    users: &dyn UserStore,
    token: &str,
) -> Result<Principal, AppError> {
    let principal = resolve(verifier, users, token).await?;

    if !principal.is_active {
        return Err(AppError::http(
            StatusCode::BAD_REQUEST,
            "비활성화된 계정입니다.",
        ));
    }

    Ok(principal)
}

/// `resolve_active`, then require the admin role.
pub async fn resolve_admin(
    verifier: &dyn TokenVerify,
    users: &dyn UserStore,
    token: &str,
) -> Result<Principal, AppError> {
    let principal = resolve_active(verifier, users, token).await?;

    if !principal.is_admin {
        return Err(AppError::permission("관리자 권한이 필요합니다."));
    }

    Ok(principal)
}

/// `resolve_active`, then require the nurse role.
pub async fn resolve_nurse(
    verifier: &dyn TokenVerify,
    users: &dyn UserStore,
    token: &str,
) -> Result<Principal, AppError> {
    let principal = resolve_active(verifier, users, token).await?;

    if !principal.is_nurse {
        return Err(AppError::permission("간호사 권한이 필요합니다."));
    }

    Ok(principal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::auth::verifier::{TokenClaims, TokenError};

    enum FakeVerifier {
        Reject,
        Accept(Option<&'static str>),
    }

    impl TokenVerify for FakeVerifier {
        fn verify(&self, _token: &str) -> Result<TokenClaims, TokenError> {
            match self {
                FakeVerifier::Reject => Err(TokenError::Jwt(
                    jsonwebtoken::errors::ErrorKind::InvalidToken.into(),
                )),
                FakeVerifier::Accept(sub) => Ok(TokenClaims {
                    sub: sub.map(str::to_owned),
                    exp: u64::MAX,
                }),
            }
        }
    }

    struct MemStore {
        users: Vec<Principal>,
        fail: bool,
    }

    impl MemStore {
        fn with(users: Vec<Principal>) -> Self {
            Self { users, fail: false }
        }

        fn failing() -> Self {
            Self {
                users: Vec::new(),
                fail: true,
            }
        }
    }

    #[async_trait]
    impl UserStore for MemStore {
        async fn find_by_email(&self, email: &str) -> Result<Option<Principal>, RepoError> {
            if self.fail {
                return Err(RepoError::Db(sqlx::Error::PoolClosed));
            }
            Ok(self.users.iter().find(|u| u.email == email).cloned())
        }
    }

    fn staff(email: &str, role: &str, is_active: bool) -> Principal {
        Principal {
            id: 1,
            email: email.to_string(),
            name: "김간호".to_string(),
            role: role.to_string(),
            phone: None,
            department: Some("내과".to_string()),
            position: None,
            employee_id: None,
            ward_id: None,
            hospital_id: None,
            is_active,
            is_admin: role == "admin",
            is_nurse: role == "nurse",
            is_verified: true,
            last_login: None,
            created_at: None,
        }
    }

    #[tokio::test]
    async fn rejected_token_answers_401_with_challenge() {
        let store = MemStore::with(vec![]);

        let err = resolve(&FakeVerifier::Reject, &store, "whatever")
            .await
            .unwrap_err();

        match err {
            AppError::Authentication { message, challenge } => {
                assert_eq!(message, "토큰이 유효하지 않습니다.");
                assert!(challenge);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_subject_answers_401_without_challenge() {
        let store = MemStore::with(vec![]);

        let err = resolve(&FakeVerifier::Accept(None), &store, "t")
            .await
            .unwrap_err();

        match err {
            AppError::Authentication { message, challenge } => {
                assert_eq!(message, "토큰이 유효하지 않습니다.");
                assert!(!challenge);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_subject_answers_401_without_challenge() {
        let store = MemStore::with(vec![]);

        let err = resolve(&FakeVerifier::Accept(Some("")), &store, "t")
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AppError::Authentication { challenge: false, .. }
        ));
    }

    #[tokio::test]
    async fn unknown_user_answers_401_without_challenge() {
        let store = MemStore::with(vec![]);

        let err = resolve(&FakeVerifier::Accept(Some("ghost@hospital.kr")), &store, "t")
            .await
            .unwrap_err();

        match err {
            AppError::Authentication { message, challenge } => {
                assert_eq!(message, "사용자를 찾을 수 없습니다.");
                assert!(!challenge);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn lookup_is_case_sensitive() {
        let store = MemStore::with(vec![staff("nurse@hospital.kr", "nurse", true)]);

        let err = resolve(&FakeVerifier::Accept(Some("NURSE@hospital.kr")), &store, "t")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Authentication { .. }));
    }

    #[tokio::test]
    async fn store_failure_maps_to_database_kind() {
        let store = MemStore::failing();

        let err = resolve(&FakeVerifier::Accept(Some("nurse@hospital.kr")), &store, "t")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Database(_)));
    }

    #[tokio::test]
    async fn resolve_returns_the_matched_principal() {
        let store = MemStore::with(vec![staff("nurse@hospital.kr", "nurse", true)]);

        let principal = resolve(&FakeVerifier::Accept(Some("nurse@hospital.kr")), &store, "t")
            .await
            .unwrap();

        assert_eq!(principal.email, "nurse@hospital.kr");
        assert!(principal.is_nurse);
    }

    #[tokio::test]
    async fn inactive_account_fails_before_any_role_check() {
        // Simultaneously inactive and admin: the active tier must win, with
        // the 400-class "inactive" error rather than a 403.
        let store = MemStore::with(vec![staff("admin@hospital.kr", "admin", false)]);
        let verifier = FakeVerifier::Accept(Some("admin@hospital.kr"));

        for err in [
            resolve_active(&verifier, &store, "t").await.unwrap_err(),
            resolve_admin(&verifier, &store, "t").await.unwrap_err(),
            resolve_nurse(&verifier, &store, "t").await.unwrap_err(),
        ] {
            match err {
                AppError::Http { status, detail, .. } => {
                    assert_eq!(status, StatusCode::BAD_REQUEST);
                    assert_eq!(detail, "비활성화된 계정입니다.");
                }
                other => panic!("unexpected error: {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn active_non_admin_is_forbidden_for_admin_tier() {
        let store = MemStore::with(vec![staff("nurse@hospital.kr", "nurse", true)]);

        let err = resolve_admin(&FakeVerifier::Accept(Some("nurse@hospital.kr")), &store, "t")
            .await
            .unwrap_err();

        match err {
            AppError::Permission(message) => assert_eq!(message, "관리자 권한이 필요합니다."),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn nurse_tier_checks_the_nurse_flag_independently() {
        let store = MemStore::with(vec![staff("admin@hospital.kr", "admin", true)]);
        let verifier = FakeVerifier::Accept(Some("admin@hospital.kr"));

        // Admin passes its own tier but is not a nurse.
        assert!(resolve_admin(&verifier, &store, "t").await.is_ok());

        let err = resolve_nurse(&verifier, &store, "t").await.unwrap_err();
        match err {
            AppError::Permission(message) => assert_eq!(message, "간호사 권한이 필요합니다."),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn resolving_twice_yields_identical_principals() {
        let store = MemStore::with(vec![staff("nurse@hospital.kr", "nurse", true)]);
        let verifier = FakeVerifier::Accept(Some("nurse@hospital.kr"));

        let first = resolve_nurse(&verifier, &store, "t").await.unwrap();
        let second = resolve_nurse(&verifier, &store, "t").await.unwrap();

        assert_eq!(first, second);
    }
}
