use axum::{
    extract::{FromRef, Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Redirect},
    Json,
};
use oauthcord_core::{AuthError, Identity, OAuthToken};
use oauthcord_flow::ErasedOAuthFlow;
use tower_cookies::{cookie::SameSite, Cookie, Cookies};

use crate::OAuthState;

#[derive(serde::Deserialize)]
pub struct OAuthCallbackParams {
    pub code: String,
    pub state: String,
}

pub fn state_cookie_name(provider_id: &str) -> String {
    format!("oauthcord_state_{}", provider_id)
}

/// Helper to initiate the OAuth2 login flow.
///
/// This generates the authorization URL and sets a CSRF state cookie.
pub fn initiate_oauth_login(
    flow: &dyn ErasedOAuthFlow,
    cookies: &Cookies,
    secure: bool,
) -> Redirect {
    let (url, csrf_state) = flow.initiate_login();

    let mut cookie = Cookie::new(state_cookie_name(&flow.provider_id()), csrf_state);
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookie.set_secure(secure);
    cookie.set_max_age(Some(tower_cookies::cookie::time::Duration::minutes(15)));

    cookies.add(cookie);

    Redirect::to(&url)
}

/// Validates the state against the cookie set by [`initiate_oauth_login`] and finalizes the flow.
pub async fn finalize_oauth_callback(
    flow: &dyn ErasedOAuthFlow,
    cookies: &Cookies,
    params: &OAuthCallbackParams,
    secure: bool,
) -> Result<(Identity, OAuthToken), OAuthAxumError> {
    let cookie_name = state_cookie_name(&flow.provider_id());

    let expected_state = cookies
        .get(&cookie_name)
        .map(|c| c.value().to_string())
        .ok_or(AuthError::CsrfMismatch)?;

    // Single use, whatever the outcome.
    let mut remove_cookie = Cookie::new(cookie_name, "");
    remove_cookie.set_path("/");
    remove_cookie.set_secure(secure);
    cookies.remove(remove_cookie);

    let result = flow
        .finalize_login(&params.code, &params.state, &expected_state)
        .await?;

    Ok(result)
}

pub async fn axum_login_handler<S>(
    Path(provider): Path<String>,
    State(state): State<S>,
    cookies: Cookies,
) -> Result<Redirect, OAuthAxumError>
where
    S: Clone + Send + Sync + 'static,
    OAuthState: FromRef<S>,
{
    let oauth = OAuthState::from_ref(&state);
    let flow = oauth.flow(&provider)?;

    Ok(initiate_oauth_login(flow.as_ref(), &cookies, oauth.secure_cookies))
}

pub async fn axum_callback_handler<S>(
    Path(provider): Path<String>,
    State(state): State<S>,
    Query(params): Query<OAuthCallbackParams>,
    cookies: Cookies,
) -> Result<Json<Identity>, OAuthAxumError>
where
    S: Clone + Send + Sync + 'static,
    OAuthState: FromRef<S>,
{
    let oauth = OAuthState::from_ref(&state);
    let flow = oauth.flow(&provider)?;

    let (identity, _token) =
        finalize_oauth_callback(flow.as_ref(), &cookies, &params, oauth.secure_cookies).await?;

    tracing::info!(provider = %provider, user_id = %identity.id, "user signed in");
    Ok(Json(identity))
}

/// Resolves the identity behind the request's `Authorization: Bearer` token.
pub async fn axum_me_handler<S>(
    Path(provider): Path<String>,
    State(state): State<S>,
    headers: HeaderMap,
) -> Result<Json<Identity>, OAuthAxumError>
where
    S: Clone + Send + Sync + 'static,
    OAuthState: FromRef<S>,
{
    let oauth = OAuthState::from_ref(&state);
    let flow = oauth.flow(&provider)?;
    let token = bearer_token(&headers)?;

    Ok(Json(flow.user_from_token(token).await?))
}

pub fn bearer_token(headers: &HeaderMap) -> Result<&str, OAuthAxumError> {
    let auth_header = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| OAuthAxumError::Unauthorized("Missing Authorization header".to_string()))?;

    auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| OAuthAxumError::Unauthorized("Invalid Authorization header".to_string()))
}

#[derive(Debug)]
pub enum OAuthAxumError {
    Unauthorized(String),
    Auth(AuthError),
}

impl From<AuthError> for OAuthAxumError {
    fn from(err: AuthError) -> Self {
        OAuthAxumError::Auth(err)
    }
}

impl IntoResponse for OAuthAxumError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            OAuthAxumError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            OAuthAxumError::Auth(err) => {
                let status = match &err {
                    AuthError::CsrfMismatch => StatusCode::BAD_REQUEST,
                    AuthError::UnknownProvider(_) => StatusCode::NOT_FOUND,
                    AuthError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
                    AuthError::Transport(_)
                    | AuthError::Upstream { .. }
                    | AuthError::MalformedResponse(_) => StatusCode::BAD_GATEWAY,
                };
                (status, err.to_string())
            }
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}
