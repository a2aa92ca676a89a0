//! Scenario tests for the CTF crate
//!
//! The router runs against in-memory stores with a manually driven clock;
//! users are created through the auth use cases and tokens minted by the
//! shared token service.

#[cfg(test)]
mod support {
    use std::net::SocketAddr;
    use std::sync::Arc;

    use auth::application::{AuthConfig, AuthServices, SignUpInput, SignUpUseCase};
    use auth::domain::value_object::user_role::UserRole;
    use auth::infra::memory::InMemoryUserRepository;
    use axum::Router;
    use axum::body::Body;
    use axum::extract::ConnectInfo;
    use axum::http::{Method, Request, header};
    use http_body_util::BodyExt;
    use kernel::id::UserId;
    use platform::clock::{Clock, ManualClock};
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::application::{CtfConfig, CtfServices};
    use crate::domain::entities::NewChallenge;
    use crate::domain::repository::ChallengeRepository;
    use crate::domain::value_objects::{Flag, Points};
    use crate::infra::memory::InMemoryCtfRepository;
    use crate::presentation::router::ctf_router_generic;

    pub struct Harness {
        pub router: Router,
        pub users: InMemoryUserRepository,
        pub ctf: InMemoryCtfRepository,
        pub auth: AuthServices,
        pub clock: ManualClock,
    }

    impl Harness {
        pub fn new() -> Self {
            let clock = ManualClock::starting_now();
            let users = InMemoryUserRepository::new();
            let ctf = InMemoryCtfRepository::new();
            let auth =
                AuthServices::new(&AuthConfig::with_secret("test-secret"), Arc::new(clock.clone()));
            let services = CtfServices::new(CtfConfig::default(), Arc::new(clock.clone()));
            let router = ctf_router_generic(
                Arc::new(ctf.clone()),
                Arc::new(users.clone()),
                auth.clone(),
                services,
            );

            Self {
                router,
                users,
                ctf,
                auth,
                clock,
            }
        }

        /// Create a user and return (id, bearer header value)
        pub async fn user(&self, name: &str, role: UserRole) -> (UserId, String) {
            let user = SignUpUseCase::new(Arc::new(self.users.clone()), Arc::new(self.clock.clone()))
                .register(
                    SignUpInput {
                        user_name: name.to_string(),
                        email: format!("{name}@example.com"),
                        password: "secret123".to_string(),
                    },
                    role,
                )
                .await
                .unwrap();

            let token = self
                .auth
                .tokens
                .issue(user.user_id, user.user_name.as_str(), user.is_admin())
                .unwrap();
            (user.user_id, format!("Bearer {token}"))
        }

        pub async fn challenge(&self, title: &str, points: i32, flag: &str, is_active: bool) -> i64 {
            self.ctf
                .create(&NewChallenge {
                    title: title.to_string(),
                    description: format!("{title} description"),
                    category: "web".to_string(),
                    points: Points::new(points).unwrap(),
                    flag: Flag::new(flag).unwrap(),
                    hint: String::new(),
                    file_url: None,
                    is_active,
                    created_at: self.clock.now(),
                })
                .await
                .unwrap()
                .id
                .value()
        }

        pub async fn call(
            &self,
            method: Method,
            uri: &str,
            bearer: Option<&str>,
            body: Option<Value>,
            ip: &str,
        ) -> (u16, Option<String>, Value) {
            let mut builder = Request::builder().method(method).uri(uri);
            if let Some(bearer) = bearer {
                builder = builder.header(header::AUTHORIZATION, bearer);
            }
            let body = match body {
                Some(json) => {
                    builder = builder.header(header::CONTENT_TYPE, "application/json");
                    Body::from(json.to_string())
                }
                None => Body::empty(),
            };
            let mut req = builder.body(body).unwrap();
            let addr: SocketAddr = format!("{ip}:50000").parse().unwrap();
            req.extensions_mut().insert(ConnectInfo(addr));

            let response = self.router.clone().oneshot(req).await.unwrap();
            let status = response.status().as_u16();
            let retry_after = response
                .headers()
                .get(header::RETRY_AFTER)
                .map(|v| v.to_str().unwrap().to_string());
            let bytes = response.into_body().collect().await.unwrap().to_bytes();
            let json = if bytes.is_empty() {
                Value::Null
            } else {
                serde_json::from_slice(&bytes).unwrap()
            };
            (status, retry_after, json)
        }

        pub async fn get(&self, uri: &str, bearer: Option<&str>) -> (u16, Value) {
            let (status, _, body) = self.call(Method::GET, uri, bearer, None, "10.1.0.1").await;
            (status, body)
        }

        pub async fn submit(&self, id: i64, bearer: &str, flag: &str, ip: &str) -> (u16, Value) {
            let (status, _, body) = self
                .call(
                    Method::POST,
                    &format!("/challenges/{id}/submit"),
                    Some(bearer),
                    Some(serde_json::json!({ "flag": flag })),
                    ip,
                )
                .await;
            (status, body)
        }
    }
}

#[cfg(test)]
mod challenge_tests {
    use super::support::*;

    #[tokio::test]
    async fn test_list_shows_active_without_flags() {
        let h = Harness::new();
        h.challenge("Warmup", 100, "CTF{warm}", true).await;
        h.challenge("Hidden", 200, "CTF{hidden}", false).await;

        let (status, body) = h.get("/challenges", None).await;
        assert_eq!(status, 200);
        assert_eq!(body["total_challenges"], 1);
        assert_eq!(body["challenges"][0]["title"], "Warmup");
        assert_eq!(body["challenges"][0]["points"], 100);
        assert!(body["challenges"][0].get("flag").is_none());
        assert!(!body.to_string().contains("CTF{warm}"));
    }

    #[tokio::test]
    async fn test_get_challenge() {
        let h = Harness::new();
        let active = h.challenge("Warmup", 100, "CTF{warm}", true).await;
        let hidden = h.challenge("Hidden", 200, "CTF{hidden}", false).await;

        let (status, body) = h.get(&format!("/challenges/{active}"), None).await;
        assert_eq!(status, 200);
        assert_eq!(body["challenge"]["id"], active);
        assert!(body["challenge"].get("flag").is_none());

        let (status, body) = h.get(&format!("/challenges/{hidden}"), None).await;
        assert_eq!(status, 404);
        assert_eq!(body["error"], "Challenge not found");
        assert_eq!(body["code"], "CHALLENGE_NOT_FOUND");

        let (status, body) = h.get("/challenges/abc", None).await;
        assert_eq!(status, 400);
        assert_eq!(body["error"], "Invalid challenge ID");
    }
}

#[cfg(test)]
mod submission_tests {
    use std::sync::Arc;

    use auth::domain::repository::UserRepository;
    use auth::domain::value_object::user_role::UserRole;
    use kernel::id::{ChallengeId, UserId};

    use super::support::*;
    use crate::application::{SubmitFlagInput, SubmitFlagUseCase};
    use crate::domain::repository::SubmissionRepository;

    #[tokio::test]
    async fn test_wrong_then_right_then_already_solved() {
        let h = Harness::new();
        let (alice, bearer) = h.user("alice", UserRole::User).await;
        let id = h.challenge("Warmup", 100, "CTF{warm}", true).await;

        let (status, body) = h.submit(id, &bearer, "CTF{cold}", "10.2.0.1").await;
        assert_eq!(status, 200);
        assert_eq!(body["correct"], false);
        assert_eq!(body["message"], "Incorrect flag. Try again!");
        assert!(body.get("points").is_none());

        let (status, body) = h.submit(id, &bearer, "CTF{warm}", "10.2.0.1").await;
        assert_eq!(status, 200);
        assert_eq!(body["correct"], true);
        assert_eq!(body["message"], "Correct flag! Points awarded.");
        assert_eq!(body["points"], 100);

        let (status, body) = h.submit(id, &bearer, "CTF{warm}", "10.2.0.1").await;
        assert_eq!(status, 409);
        assert_eq!(body["error"], "Challenge already solved");
        assert_eq!(body["code"], "ALREADY_SOLVED");

        let user = h.users.find_by_id(alice).await.unwrap().unwrap();
        assert_eq!(user.score, 100);

        // Both attempts recorded with the client address
        assert_eq!(h.ctf.count().await.unwrap(), 2);
        let recent = h.ctf.recent(10).await.unwrap();
        assert!(recent.iter().all(|s| s.ip_address.as_deref() == Some("10.2.0.1")));
    }

    #[tokio::test]
    async fn test_submit_requires_authentication() {
        let h = Harness::new();
        let id = h.challenge("Warmup", 100, "CTF{warm}", true).await;

        let (status, _, body) = h
            .call(
                axum::http::Method::POST,
                &format!("/challenges/{id}/submit"),
                None,
                Some(serde_json::json!({ "flag": "CTF{warm}" })),
                "10.2.0.2",
            )
            .await;
        assert_eq!(status, 401);
        assert_eq!(body["error"], "Authorization header required");
    }

    #[tokio::test]
    async fn test_submit_validation() {
        let h = Harness::new();
        let (_, bearer) = h.user("alice", UserRole::User).await;
        let active = h.challenge("Warmup", 100, "CTF{warm}", true).await;
        let hidden = h.challenge("Hidden", 100, "CTF{hidden}", false).await;

        let (status, body) = h.submit(active, &bearer, "", "10.2.0.3").await;
        assert_eq!(status, 400);
        assert_eq!(body["error"], "Flag is required");

        let (status, _) = h.submit(hidden, &bearer, "CTF{hidden}", "10.2.0.3").await;
        assert_eq!(status, 404);

        let (status, _) = h.submit(999, &bearer, "CTF{x}", "10.2.0.3").await;
        assert_eq!(status, 404);

        let (status, _, body) = h
            .call(
                axum::http::Method::POST,
                "/challenges/0/submit",
                Some(&bearer),
                Some(serde_json::json!({ "flag": "CTF{x}" })),
                "10.2.0.3",
            )
            .await;
        assert_eq!(status, 400);
        assert_eq!(body["error"], "Invalid challenge ID");
    }

    #[tokio::test]
    async fn test_flag_submissions_are_rate_limited() {
        let h = Harness::new();
        let (_, bearer) = h.user("alice", UserRole::User).await;
        let id = h.challenge("Warmup", 100, "CTF{warm}", true).await;

        for _ in 0..5 {
            let (status, _) = h.submit(id, &bearer, "CTF{guess}", "10.2.0.4").await;
            assert_eq!(status, 200);
        }

        let (status, retry_after, body) = h
            .call(
                axum::http::Method::POST,
                &format!("/challenges/{id}/submit"),
                Some(&bearer),
                Some(serde_json::json!({ "flag": "CTF{warm}" })),
                "10.2.0.4",
            )
            .await;
        assert_eq!(status, 429);
        assert_eq!(retry_after.as_deref(), Some("60"));
        assert_eq!(body["retry_after"], 60);
        // The rejected attempt was never recorded
        assert_eq!(h.ctf.count().await.unwrap(), 5);

        h.clock.advance(chrono::Duration::seconds(60));
        let (status, body) = h.submit(id, &bearer, "CTF{warm}", "10.2.0.4").await;
        assert_eq!(status, 200);
        assert_eq!(body["correct"], true);
    }

    #[tokio::test]
    async fn test_score_failure_is_not_surfaced() {
        let h = Harness::new();
        let id = h.challenge("Warmup", 100, "CTF{warm}", true).await;

        // No such user in the store, so awarding points fails
        let use_case = SubmitFlagUseCase::new(
            Arc::new(h.ctf.clone()),
            Arc::new(h.users.clone()),
            Arc::new(h.clock.clone()),
        );
        let output = use_case
            .execute(SubmitFlagInput {
                user_id: UserId::new(42),
                challenge_id: ChallengeId::new(id),
                flag: "CTF{warm}".into(),
                ip_address: None,
            })
            .await
            .unwrap();

        assert!(output.correct);
        assert_eq!(output.points, Some(100));
        assert!(
            h.ctf
                .has_solved(UserId::new(42), ChallengeId::new(id))
                .await
                .unwrap()
        );
    }
}

#[cfg(test)]
mod leaderboard_tests {
    use auth::domain::repository::UserRepository;
    use auth::domain::value_object::user_role::UserRole;

    use super::support::*;

    #[tokio::test]
    async fn test_leaderboard_ranks_top_ten() {
        let h = Harness::new();
        for i in 0..12 {
            let (id, _) = h.user(&format!("player{i:02}"), UserRole::User).await;
            h.users.add_score(id, i * 10).await.unwrap();
        }

        let (status, body) = h.get("/leaderboard", None).await;
        assert_eq!(status, 200);

        let rows = body["leaderboard"].as_array().unwrap();
        assert_eq!(rows.len(), 10);
        assert_eq!(rows[0]["rank"], 1);
        assert_eq!(rows[0]["username"], "player11");
        assert_eq!(rows[0]["score"], 110);
        assert_eq!(rows[9]["rank"], 10);
        assert_eq!(rows[9]["username"], "player02");
    }
}

#[cfg(test)]
mod admin_tests {
    use auth::domain::value_object::user_role::UserRole;
    use axum::http::Method;
    use serde_json::json;

    use super::support::*;

    #[tokio::test]
    async fn test_admin_routes_need_admin() {
        let h = Harness::new();
        let (_, player) = h.user("alice", UserRole::User).await;

        for uri in ["/admin/users", "/admin/dashboard"] {
            let (status, body) = h.get(uri, Some(&player)).await;
            assert_eq!(status, 403, "{uri}");
            assert_eq!(body["error"], "Admin access required");

            let (status, _) = h.get(uri, None).await;
            assert_eq!(status, 401, "{uri}");
        }
    }

    #[tokio::test]
    async fn test_demoted_admin_loses_access() {
        let h = Harness::new();
        let (root, bearer) = h.user("root", UserRole::Admin).await;

        assert_eq!(h.get("/admin/users", Some(&bearer)).await.0, 200);

        h.users.set_role(root, UserRole::User).await;
        assert_eq!(h.get("/admin/users", Some(&bearer)).await.0, 403);
    }

    #[tokio::test]
    async fn test_challenge_lifecycle() {
        let h = Harness::new();
        let (_, admin) = h.user("root", UserRole::Admin).await;

        let (status, _, body) = h
            .call(
                Method::POST,
                "/admin/challenges",
                Some(&admin),
                Some(json!({
                    "title": "Overflow",
                    "category": "pwn",
                    "points": 300,
                    "flag": "CTF{smash}",
                    "hint": "gets()",
                })),
                "10.3.0.1",
            )
            .await;
        assert_eq!(status, 201);
        assert_eq!(body["message"], "Challenge created successfully");
        assert_eq!(body["challenge"]["is_active"], true);
        assert!(body["challenge"].get("flag").is_none());
        let id = body["challenge"]["id"].as_i64().unwrap();

        let (status, _, body) = h
            .call(
                Method::PUT,
                &format!("/admin/challenges/{id}"),
                Some(&admin),
                Some(json!({ "points": 350, "title": "" })),
                "10.3.0.1",
            )
            .await;
        assert_eq!(status, 200);
        assert_eq!(body["message"], "Challenge updated successfully");
        assert_eq!(body["challenge"]["points"], 350);
        assert_eq!(body["challenge"]["title"], "Overflow");

        let (status, body) = h.get(&format!("/challenges/{id}"), None).await;
        assert_eq!(status, 200);
        assert_eq!(body["challenge"]["points"], 350);

        let (status, _, body) = h
            .call(
                Method::DELETE,
                &format!("/admin/challenges/{id}"),
                Some(&admin),
                None,
                "10.3.0.1",
            )
            .await;
        assert_eq!(status, 200);
        assert_eq!(body["message"], "Challenge deleted successfully");

        assert_eq!(h.get(&format!("/challenges/{id}"), None).await.0, 404);

        let (status, _, _) = h
            .call(
                Method::DELETE,
                &format!("/admin/challenges/{id}"),
                Some(&admin),
                None,
                "10.3.0.1",
            )
            .await;
        assert_eq!(status, 404);
    }

    #[tokio::test]
    async fn test_create_challenge_validation() {
        let h = Harness::new();
        let (_, admin) = h.user("root", UserRole::Admin).await;

        let (status, _, body) = h
            .call(
                Method::POST,
                "/admin/challenges",
                Some(&admin),
                Some(json!({ "title": "x", "category": "web", "points": 0, "flag": "CTF{x}" })),
                "10.3.0.2",
            )
            .await;
        assert_eq!(status, 400);
        assert_eq!(body["error"], "Invalid input");
        assert_eq!(body["details"], "points must be at least 1");

        let (status, _, body) = h
            .call(
                Method::POST,
                "/admin/challenges",
                Some(&admin),
                Some(json!({ "title": "x", "points": 10 })),
                "10.3.0.2",
            )
            .await;
        assert_eq!(status, 400);
        assert_eq!(body["code"], "VALIDATION_FAILED");
    }

    #[tokio::test]
    async fn test_dashboard_and_users() {
        let h = Harness::new();
        let (_, admin) = h.user("root", UserRole::Admin).await;
        let (_, player) = h.user("alice", UserRole::User).await;
        let id = h.challenge("Warmup", 100, "CTF{warm}", true).await;
        h.challenge("Hidden", 100, "CTF{hidden}", false).await;

        h.submit(id, &player, "CTF{nope}", "10.3.0.3").await;
        h.clock.advance(chrono::Duration::seconds(1));
        h.submit(id, &player, "CTF{warm}", "10.3.0.3").await;

        let (status, body) = h.get("/admin/dashboard", Some(&admin)).await;
        assert_eq!(status, 200);
        assert_eq!(body["statistics"]["total_users"], 2);
        assert_eq!(body["statistics"]["active_challenges"], 1);
        assert_eq!(body["statistics"]["total_submissions"], 2);

        let recent = body["recent_submissions"].as_array().unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0]["is_correct"], true);
        assert_eq!(recent[0]["username"], "alice");
        assert_eq!(recent[0]["challenge_title"], "Warmup");
        assert_eq!(recent[1]["is_correct"], false);

        let (status, body) = h.get("/admin/users", Some(&admin)).await;
        assert_eq!(status, 200);
        assert_eq!(body["total_users"], 2);
        assert_eq!(body["users"][1]["username"], "alice");
        assert_eq!(body["users"][1]["score"], 100);
        assert!(body["users"][0].get("password_hash").is_none());
    }
}
