//! `ClientInfo` extractor: who is calling, for access logging.

use std::convert::Infallible;
use std::net::SocketAddr;

use axum::RequestPartsExt;
use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::request::Parts;
use axum_extra::TypedHeader;
use axum_extra::headers::UserAgent;

use docvault_service::ClientContext;
use docvault_service::context::UNKNOWN_CLIENT;

/// Origin address and user agent of the current request.
///
/// The address is taken from the first `X-Forwarded-For` entry, then the
/// peer address, then falls back to `unknown`.
#[derive(Debug, Clone)]
pub struct ClientInfo(pub ClientContext);

impl ClientInfo {
    /// Returns the inner `ClientContext`.
    pub fn context(&self) -> &ClientContext {
        &self.0
    }
}

impl<S> FromRequestParts<S> for ClientInfo
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let forwarded = parts
            .headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string);

        let ip_address = forwarded
            .or_else(|| {
                parts
                    .extensions
                    .get::<ConnectInfo<SocketAddr>>()
                    .map(|ConnectInfo(addr)| addr.ip().to_string())
            })
            .unwrap_or_else(|| UNKNOWN_CLIENT.to_string());

        let user_agent = parts
            .extract::<TypedHeader<UserAgent>>()
            .await
            .ok()
            .map(|TypedHeader(agent)| agent.as_str().to_string());

        Ok(Self(ClientContext::new(ip_address, user_agent)))
    }
}

#[cfg(test)]
mod tests {
    use axum::http::Request;

    use super::*;

    async fn extract(request: Request<()>) -> ClientContext {
        let (mut parts, _) = request.into_parts();
        let ClientInfo(client) = ClientInfo::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        client
    }

    #[tokio::test]
    async fn test_forwarded_for_wins() {
        let mut request = Request::builder()
            .header("x-forwarded-for", "203.0.113.9, 10.0.0.1")
            .header("user-agent", "Mozilla/5.0")
            .body(())
            .unwrap();
        request
            .extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([127, 0, 0, 1], 4000))));

        let client = extract(request).await;
        assert_eq!(client.ip_address, "203.0.113.9");
        assert_eq!(client.user_agent.as_deref(), Some("Mozilla/5.0"));
    }

    #[tokio::test]
    async fn test_peer_address_fallback() {
        let mut request = Request::builder().body(()).unwrap();
        request
            .extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([192, 0, 2, 4], 4000))));

        let client = extract(request).await;
        assert_eq!(client.ip_address, "192.0.2.4");
        assert_eq!(client.user_agent, None);
    }

    #[tokio::test]
    async fn test_unknown_client() {
        let client = extract(Request::builder().body(()).unwrap()).await;
        assert_eq!(client.ip_address, UNKNOWN_CLIENT);
        assert_eq!(client.user_agent_or_unknown(), UNKNOWN_CLIENT);
    }
}
