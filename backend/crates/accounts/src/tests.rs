//! Unit tests for the accounts crate
//!
//! Use-case flows run against an in-memory repository double that
//! mirrors the storage contract, including the unique-email rule.

use std::sync::{Arc, Mutex};

use crate::application::config::AccountsConfig;
use crate::application::token::TokenIssuer;
use crate::application::{
    ChangePasswordInput, ChangePasswordUseCase, DeleteAccountInput, DeleteAccountUseCase,
    GetProfileUseCase, LoginInput, LoginUseCase, LogoutUseCase, ProfileUpdateInput,
    RegisterInput, RegisterOutput, RegisterUseCase, UpdateProfileUseCase,
};
use crate::domain::entity::account::Account;
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::{
    AccountId, AccountPassword, DisplayName, Email, PublicId, RawPassword,
};
use crate::error::{AccountError, AccountResult};

// ============================================================================
// In-memory repository double
// ============================================================================

#[derive(Clone, Default)]
struct MemoryAccountRepository {
    accounts: Arc<Mutex<Vec<Account>>>,
}

impl AccountRepository for MemoryAccountRepository {
    async fn create(&self, account: &Account) -> AccountResult<()> {
        let mut accounts = self.accounts.lock().unwrap();

        // Mirrors the database unique index on email
        if accounts.iter().any(|a| a.email == account.email) {
            return Err(AccountError::EmailTaken);
        }

        accounts.push(account.clone());
        Ok(())
    }

    async fn find_by_public_id(&self, public_id: &PublicId) -> AccountResult<Option<Account>> {
        let accounts = self.accounts.lock().unwrap();
        Ok(accounts.iter().find(|a| a.public_id == *public_id).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> AccountResult<Option<Account>> {
        let accounts = self.accounts.lock().unwrap();
        Ok(accounts.iter().find(|a| a.email == *email).cloned())
    }

    async fn update(&self, account: &Account) -> AccountResult<()> {
        let mut accounts = self.accounts.lock().unwrap();
        match accounts
            .iter_mut()
            .find(|a| a.account_id == account.account_id)
        {
            Some(slot) => {
                *slot = account.clone();
                Ok(())
            }
            None => Err(AccountError::AccountNotFound),
        }
    }

    async fn update_password_hash(
        &self,
        account_id: &AccountId,
        password_hash: &AccountPassword,
    ) -> AccountResult<()> {
        let mut accounts = self.accounts.lock().unwrap();
        match accounts.iter_mut().find(|a| a.account_id == *account_id) {
            Some(account) => {
                account.set_password(password_hash.clone());
                Ok(())
            }
            None => Err(AccountError::AccountNotFound),
        }
    }

    async fn delete_with_dependents(&self, account_id: &AccountId) -> AccountResult<()> {
        let mut accounts = self.accounts.lock().unwrap();
        let before = accounts.len();
        accounts.retain(|a| a.account_id != *account_id);

        if accounts.len() == before {
            return Err(AccountError::AccountNotFound);
        }
        Ok(())
    }
}

// ============================================================================
// Test fixtures
// ============================================================================

struct Fixture {
    repo: Arc<MemoryAccountRepository>,
    tokens: Arc<TokenIssuer>,
    config: Arc<AccountsConfig>,
}

fn fixture() -> Fixture {
    let config = Arc::new(AccountsConfig::with_random_secret());
    let tokens = Arc::new(TokenIssuer::new(config.token_secret, config.token_ttl));

    Fixture {
        repo: Arc::new(MemoryAccountRepository::default()),
        tokens,
        config,
    }
}

fn register_input(email: &str) -> RegisterInput {
    RegisterInput {
        display_name: "Jane Doe".to_string(),
        email: email.to_string(),
        password: "secret1".to_string(),
        confirm_password: None,
    }
}

async fn register_jane(fx: &Fixture) -> RegisterOutput {
    RegisterUseCase::new(fx.repo.clone(), fx.tokens.clone(), fx.config.clone())
        .execute(register_input("jane@x.com"))
        .await
        .unwrap()
}

// ============================================================================
// Use-case flows
// ============================================================================

mod use_case_tests {
    use super::*;

    #[tokio::test]
    async fn register_then_login_succeeds() {
        let fx = fixture();
        let registered = register_jane(&fx).await;

        // The registration token is immediately usable
        let claims = fx.tokens.verify(&registered.token).unwrap();
        assert_eq!(claims.subject, registered.account.public_id);

        tokio::time::sleep(std::time::Duration::from_millis(5)).await;

        let login = LoginUseCase::new(fx.repo.clone(), fx.tokens.clone(), fx.config.clone())
            .execute(LoginInput {
                email: "jane@x.com".to_string(),
                password: "secret1".to_string(),
            })
            .await
            .unwrap();

        // A fresh, valid token for the same subject
        assert_ne!(login.token, registered.token);
        let claims = fx.tokens.verify(&login.token).unwrap();
        assert_eq!(claims.subject, registered.account.public_id);
    }

    #[tokio::test]
    async fn register_duplicate_email_is_conflict() {
        let fx = fixture();
        register_jane(&fx).await;

        // Same address with different casing
        let result = RegisterUseCase::new(fx.repo.clone(), fx.tokens.clone(), fx.config.clone())
            .execute(register_input("JANE@X.COM"))
            .await;

        assert!(matches!(result, Err(AccountError::EmailTaken)));

        // Exactly one account exists
        assert_eq!(fx.repo.accounts.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn register_rejects_malformed_input() {
        let fx = fixture();
        let use_case =
            RegisterUseCase::new(fx.repo.clone(), fx.tokens.clone(), fx.config.clone());

        let mut short_name = register_input("a@x.com");
        short_name.display_name = "J".to_string();
        assert!(matches!(
            use_case.execute(short_name).await,
            Err(AccountError::Validation(_))
        ));

        let bad_email = register_input("not-an-email");
        assert!(matches!(
            use_case.execute(bad_email).await,
            Err(AccountError::Validation(_))
        ));

        let mut short_password = register_input("b@x.com");
        short_password.password = "abc12".to_string();
        assert!(matches!(
            use_case.execute(short_password).await,
            Err(AccountError::Validation(_))
        ));

        let mut mismatch = register_input("c@x.com");
        mismatch.confirm_password = Some("different".to_string());
        assert!(matches!(
            use_case.execute(mismatch).await,
            Err(AccountError::Validation(_))
        ));

        // No side effects from rejected inputs
        assert!(fx.repo.accounts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn login_failures_are_indistinguishable() {
        let fx = fixture();
        register_jane(&fx).await;

        let use_case = LoginUseCase::new(fx.repo.clone(), fx.tokens.clone(), fx.config.clone());

        let wrong_password = use_case
            .execute(LoginInput {
                email: "jane@x.com".to_string(),
                password: "wrong-password".to_string(),
            })
            .await
            .unwrap_err();

        let unknown_email = use_case
            .execute(LoginInput {
                email: "nobody@x.com".to_string(),
                password: "secret1".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(wrong_password, AccountError::InvalidCredentials));
        assert!(matches!(unknown_email, AccountError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    }

    #[tokio::test]
    async fn login_rejects_deactivated_account() {
        let fx = fixture();
        register_jane(&fx).await;

        fx.repo.accounts.lock().unwrap()[0].deactivate();

        let result = LoginUseCase::new(fx.repo.clone(), fx.tokens.clone(), fx.config.clone())
            .execute(LoginInput {
                email: "jane@x.com".to_string(),
                password: "secret1".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AccountError::AccountDisabled)));
    }

    #[tokio::test]
    async fn login_upgrades_stale_password_hash() {
        let fx = fixture();

        // Argon2i reference vector for "password", predating the current
        // Argon2id parameters
        let stale = AccountPassword::from_phc_string(
            "$argon2i$v=19$m=4096,t=3,p=1$c29tZXNhbHQ$iWh06vD8Fy27wf9npn6FXWiCX4K6pW6Ue1Bnzz07Z8A",
        )
        .unwrap();
        assert!(stale.needs_rehash());

        let account = Account::new(
            DisplayName::new("Legacy Lynn").unwrap(),
            Email::new("legacy@x.com").unwrap(),
            stale,
        );
        fx.repo.create(&account).await.unwrap();

        LoginUseCase::new(fx.repo.clone(), fx.tokens.clone(), fx.config.clone())
            .execute(LoginInput {
                email: "legacy@x.com".to_string(),
                password: "password".to_string(),
            })
            .await
            .unwrap();

        let stored = fx.repo.accounts.lock().unwrap()[0].password_hash.clone();
        assert!(!stored.needs_rehash());
        assert!(stored.as_phc_string().starts_with("$argon2id$"));

        // The same password still authenticates against the new hash
        let raw = RawPassword::new("password".to_string()).unwrap();
        assert!(stored.verify(&raw, None));
    }

    #[tokio::test]
    async fn change_password_flips_which_password_authenticates() {
        let fx = fixture();
        let registered = register_jane(&fx).await;
        let subject = registered.account.public_id;

        let change = ChangePasswordUseCase::new(fx.repo.clone(), fx.config.clone());

        // Confirmation mismatch
        let result = change
            .execute(
                &subject,
                ChangePasswordInput {
                    current_password: "secret1".to_string(),
                    new_password: "otter-watcher-42".to_string(),
                    confirm_password: "something-else".to_string(),
                },
            )
            .await;
        assert!(matches!(result, Err(AccountError::Validation(_))));

        // Wrong current password
        let result = change
            .execute(
                &subject,
                ChangePasswordInput {
                    current_password: "not-the-password".to_string(),
                    new_password: "otter-watcher-42".to_string(),
                    confirm_password: "otter-watcher-42".to_string(),
                },
            )
            .await;
        assert!(matches!(result, Err(AccountError::InvalidCredentials)));

        // Successful change
        change
            .execute(
                &subject,
                ChangePasswordInput {
                    current_password: "secret1".to_string(),
                    new_password: "otter-watcher-42".to_string(),
                    confirm_password: "otter-watcher-42".to_string(),
                },
            )
            .await
            .unwrap();

        let login = LoginUseCase::new(fx.repo.clone(), fx.tokens.clone(), fx.config.clone());

        let old = login
            .execute(LoginInput {
                email: "jane@x.com".to_string(),
                password: "secret1".to_string(),
            })
            .await;
        assert!(matches!(old, Err(AccountError::InvalidCredentials)));

        login
            .execute(LoginInput {
                email: "jane@x.com".to_string(),
                password: "otter-watcher-42".to_string(),
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn delete_account_requires_password_and_removes_profile() {
        let fx = fixture();
        let registered = register_jane(&fx).await;
        let subject = registered.account.public_id;

        let delete = DeleteAccountUseCase::new(fx.repo.clone(), fx.config.clone());

        let result = delete
            .execute(
                &subject,
                DeleteAccountInput {
                    password: "wrong-password".to_string(),
                },
            )
            .await;
        assert!(matches!(result, Err(AccountError::InvalidCredentials)));

        delete
            .execute(
                &subject,
                DeleteAccountInput {
                    password: "secret1".to_string(),
                },
            )
            .await
            .unwrap();

        let profile = GetProfileUseCase::new(fx.repo.clone())
            .execute(&subject)
            .await;
        assert!(matches!(profile, Err(AccountError::AccountNotFound)));
    }

    #[tokio::test]
    async fn update_profile_applies_recognized_fields() {
        let fx = fixture();
        let registered = register_jane(&fx).await;
        let subject = registered.account.public_id;

        let update = UpdateProfileUseCase::new(fx.repo.clone());

        let account = update
            .execute(
                &subject,
                ProfileUpdateInput {
                    display_name: None,
                    bio: Some("Amateur birder".to_string()),
                    interests: Some(vec!["raptors".to_string(), "owls".to_string()]),
                    favorite_species: Some("Peregrine falcon".to_string()),
                },
            )
            .await
            .unwrap();

        assert_eq!(account.display_name.as_str(), "Jane Doe");
        assert_eq!(account.bio.as_deref(), Some("Amateur birder"));
        assert_eq!(account.interests.len(), 2);
        assert!(account.updated_at >= registered.account.updated_at);

        // Invalid display name is rejected without touching the record
        let result = update
            .execute(
                &subject,
                ProfileUpdateInput {
                    display_name: Some("X".to_string()),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(AccountError::Validation(_))));
    }

    #[tokio::test]
    async fn logout_always_succeeds() {
        let fx = fixture();
        let use_case = LogoutUseCase::new(fx.tokens.clone());

        assert!(use_case.execute(None).await.is_ok());
        assert!(use_case.execute(Some("garbage-token")).await.is_ok());

        let registered = register_jane(&fx).await;
        assert!(use_case.execute(Some(&registered.token)).await.is_ok());
    }
}

// ============================================================================
// HTTP surface
// ============================================================================

mod http_tests {
    use super::*;

    use axum::Router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::presentation::router::accounts_router_generic;

    fn test_router() -> Router {
        accounts_router_generic(
            MemoryAccountRepository::default(),
            AccountsConfig::with_random_secret(),
        )
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap()
    }

    async fn send(router: &Router, request: Request<Body>) -> (StatusCode, axum::http::HeaderMap, Value) {
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, headers, body)
    }

    fn register_body(email: &str) -> Value {
        json!({
            "displayName": "Jane Doe",
            "email": email,
            "password": "secret1"
        })
    }

    #[tokio::test]
    async fn register_returns_created_with_token_and_quota_headers() {
        let router = test_router();

        let (status, headers, body) =
            send(&router, json_request("POST", "/register", register_body("jane@x.com"))).await;

        assert_eq!(status, StatusCode::CREATED);
        assert!(body["token"].as_str().unwrap().contains('.'));
        assert_eq!(body["account"]["email"], "jane@x.com");
        assert!(body["account"].get("passwordHash").is_none());

        assert_eq!(headers.get("X-RateLimit-Limit").unwrap(), "3");
        assert_eq!(headers.get("X-RateLimit-Remaining").unwrap(), "2");
        assert!(headers.contains_key("X-RateLimit-Reset"));
    }

    #[tokio::test]
    async fn register_rate_limit_rejects_fourth_attempt() {
        let router = test_router();

        for i in 0..3 {
            let (status, _, _) = send(
                &router,
                json_request("POST", "/register", register_body(&format!("user{}@x.com", i))),
            )
            .await;
            assert_eq!(status, StatusCode::CREATED);
        }

        let (status, headers, _) = send(
            &router,
            json_request("POST", "/register", register_body("user4@x.com")),
        )
        .await;

        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert!(headers.contains_key(header::RETRY_AFTER));
        assert_eq!(headers.get("X-RateLimit-Remaining").unwrap(), "0");
    }

    #[tokio::test]
    async fn login_with_wrong_password_is_generic_unauthorized() {
        let router = test_router();

        send(&router, json_request("POST", "/register", register_body("jane@x.com"))).await;

        let (status, _, body) = send(
            &router,
            json_request(
                "POST",
                "/login",
                json!({"email": "jane@x.com", "password": "wrong-password"}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["detail"], "Invalid credentials");
    }

    #[tokio::test]
    async fn duplicate_registration_is_conflict() {
        let router = test_router();

        send(&router, json_request("POST", "/register", register_body("jane@x.com"))).await;

        let (status, _, _) = send(
            &router,
            json_request("POST", "/register", register_body("Jane@X.com")),
        )
        .await;

        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn profile_requires_bearer_token() {
        let router = test_router();

        let (status, headers, _) = send(
            &router,
            Request::builder()
                .method("GET")
                .uri("/profile")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(headers.get("X-Auth-Required").unwrap(), "true");
    }

    #[tokio::test]
    async fn profile_roundtrip_with_token() {
        let router = test_router();

        let (_, _, body) =
            send(&router, json_request("POST", "/register", register_body("jane@x.com"))).await;
        let token = body["token"].as_str().unwrap().to_string();

        let (status, _, profile) = send(
            &router,
            Request::builder()
                .method("GET")
                .uri("/profile")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(profile["displayName"], "Jane Doe");

        // Unknown fields in the update body are ignored
        let mut update = json_request(
            "PUT",
            "/profile",
            json!({"bio": "Birder", "adminLevel": 99}),
        );
        update.headers_mut().insert(
            header::AUTHORIZATION,
            format!("Bearer {}", token).parse().unwrap(),
        );
        let (status, _, updated) = send(&router, update).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["bio"], "Birder");
        assert!(updated.get("adminLevel").is_none());
    }

    #[tokio::test]
    async fn verify_token_endpoint() {
        let router = test_router();

        let (_, _, body) =
            send(&router, json_request("POST", "/register", register_body("jane@x.com"))).await;
        let token = body["token"].as_str().unwrap().to_string();
        let public_id = body["account"]["publicId"].as_str().unwrap().to_string();

        let (status, _, verified) = send(
            &router,
            Request::builder()
                .method("GET")
                .uri("/verify-token")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(verified["subject"], public_id.as_str());

        let (status, _, _) = send(
            &router,
            Request::builder()
                .method("GET")
                .uri("/verify-token")
                .header(header::AUTHORIZATION, "Bearer tampered.token")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn logout_succeeds_without_valid_token() {
        let router = test_router();

        let (status, _, body) = send(
            &router,
            Request::builder()
                .method("POST")
                .uri("/logout")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Logged out");
    }
}
