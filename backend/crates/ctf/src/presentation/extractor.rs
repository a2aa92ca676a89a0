//! Client Address Extractor

use std::convert::Infallible;
use std::net::{IpAddr, SocketAddr};

use auth::domain::repository::UserRepository;
use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::request::Parts;
use platform::client::extract_client_ip;

use crate::domain::repository::{ChallengeRepository, SubmissionRepository};
use crate::presentation::handlers::CtfAppState;

/// Address of the client, resolved the same way as the rate-limit key
#[derive(Debug, Clone, Copy)]
pub struct ClientIp(pub Option<IpAddr>);

impl<R, U> FromRequestParts<CtfAppState<R, U>> for ClientIp
where
    R: ChallengeRepository + SubmissionRepository + Clone + Send + Sync + 'static,
    U: UserRepository + Clone + Send + Sync + 'static,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &CtfAppState<R, U>,
    ) -> Result<Self, Self::Rejection> {
        let direct_ip = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|info| info.0.ip());

        Ok(ClientIp(extract_client_ip(
            &parts.headers,
            direct_ip,
            state.trust_forwarded_for,
        )))
    }
}
