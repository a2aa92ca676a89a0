//! End-to-end tests over the assembled router

#[cfg(test)]
mod e2e {
    use std::net::SocketAddr;
    use std::sync::Arc;

    use auth::{AuthConfig, AuthServices, InMemoryUserRepository};
    use axum::Router;
    use axum::body::Body;
    use axum::extract::ConnectInfo;
    use axum::http::{Method, Request, header};
    use ctf::{CtfConfig, CtfServices, InMemoryCtfRepository};
    use http_body_util::BodyExt;
    use platform::clock::ManualClock;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::app::{build_router, seed_admin};
    use crate::config::AdminSeed;

    struct Server {
        router: Router,
        users: Arc<InMemoryUserRepository>,
        auth: AuthServices,
    }

    fn server() -> Server {
        let clock = Arc::new(ManualClock::starting_now());
        let auth = AuthServices::new(&AuthConfig::with_secret("e2e-secret"), clock.clone());
        let ctf = CtfServices::new(CtfConfig::default(), clock);
        let users = Arc::new(InMemoryUserRepository::new());
        let router = build_router(
            Arc::new(InMemoryCtfRepository::new()),
            users.clone(),
            auth.clone(),
            ctf,
            &["http://localhost:3000".to_string()],
        );
        Server {
            router,
            users,
            auth,
        }
    }

    async fn call(
        router: &Router,
        method: Method,
        uri: &str,
        bearer: Option<&str>,
        body: Option<Value>,
    ) -> (u16, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = bearer {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let mut req = builder.body(body).unwrap();
        let addr: SocketAddr = "203.0.113.5:41000".parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));

        let response = router.clone().oneshot(req).await.unwrap();
        let status = response.status().as_u16();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    async fn login(router: &Router, username: &str, password: &str) -> String {
        let (status, body) = call(
            router,
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "username": username, "password": password })),
        )
        .await;
        assert_eq!(status, 200, "{body}");
        body["token"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_welcome_and_health() {
        let s = server();

        let (status, body) = call(&s.router, Method::GET, "/", None, None).await;
        assert_eq!(status, 200);
        assert_eq!(body["message"], "Welcome to CTF Backend API");
        assert_eq!(body["version"], "1.0.0");

        let (status, body) = call(&s.router, Method::GET, "/health", None, None).await;
        assert_eq!(status, 200);
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn test_full_game_flow() {
        let s = server();
        seed_admin(
            s.users.clone(),
            &s.auth,
            &AdminSeed {
                username: "root".into(),
                email: "root@example.com".into(),
                password: "rootpass".into(),
            },
        )
        .await
        .unwrap();

        let admin = login(&s.router, "root", "rootpass").await;

        let (status, body) = call(
            &s.router,
            Method::POST,
            "/api/admin/challenges",
            Some(&admin),
            Some(json!({
                "title": "Baby RSA",
                "category": "crypto",
                "points": 150,
                "flag": "CTF{small_e}",
            })),
        )
        .await;
        assert_eq!(status, 201);
        let id = body["challenge"]["id"].as_i64().unwrap();

        let (status, _) = call(
            &s.router,
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({ "username": "alice", "email": "alice@example.com", "password": "alicepass" })),
        )
        .await;
        assert_eq!(status, 201);
        let alice = login(&s.router, "alice", "alicepass").await;

        let (status, body) = call(&s.router, Method::GET, "/api/challenges", None, None).await;
        assert_eq!(status, 200);
        assert_eq!(body["total_challenges"], 1);

        let (status, body) = call(
            &s.router,
            Method::POST,
            &format!("/api/challenges/{id}/submit"),
            Some(&alice),
            Some(json!({ "flag": "CTF{small_e}" })),
        )
        .await;
        assert_eq!(status, 200);
        assert_eq!(body["points"], 150);

        let (status, body) = call(&s.router, Method::GET, "/api/auth/profile", Some(&alice), None).await;
        assert_eq!(status, 200);
        assert_eq!(body["user"]["score"], 150);

        let (status, body) = call(&s.router, Method::GET, "/api/leaderboard", None, None).await;
        assert_eq!(status, 200);
        assert_eq!(body["leaderboard"][0]["username"], "alice");
        assert_eq!(body["leaderboard"][0]["rank"], 1);

        let (status, _) = call(&s.router, Method::GET, "/api/admin/dashboard", Some(&alice), None).await;
        assert_eq!(status, 403);
    }

    #[tokio::test]
    async fn test_seed_admin_is_idempotent() {
        let s = server();
        let seed = AdminSeed {
            username: "root".into(),
            email: "root@example.com".into(),
            password: "rootpass".into(),
        };

        seed_admin(s.users.clone(), &s.auth, &seed).await.unwrap();
        seed_admin(s.users.clone(), &s.auth, &seed).await.unwrap();

        use auth::domain::repository::UserRepository;
        assert_eq!(s.users.count().await.unwrap(), 1);
        let root = s.users.list().await.unwrap().remove(0);
        assert!(root.is_admin());
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let s = server();
        let (status, _) = call(&s.router, Method::GET, "/api/nothing-here", None, None).await;
        assert_eq!(status, 404);
    }
}
