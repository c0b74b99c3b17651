use crate::models::{Note, SessionUser};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ApiErrorKind {
    Unauthorized,
    Network,
    Http,
    Parse,
}

#[derive(Clone, Debug)]
pub(crate) struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl ApiError {
    fn network(e: reqwest::Error) -> Self {
        Self {
            kind: ApiErrorKind::Network,
            message: e.to_string(),
        }
    }

    fn parse(e: impl std::fmt::Display) -> Self {
        Self {
            kind: ApiErrorKind::Parse,
            message: e.to_string(),
        }
    }

    fn unauthorized() -> Self {
        Self {
            kind: ApiErrorKind::Unauthorized,
            message: "Unauthorized".to_string(),
        }
    }

    fn http(status: reqwest::StatusCode, body: String, ctx: &str) -> Self {
        // The API reports store-level failures as `{"error": "..."}`; prefer
        // that message over the raw body when it parses.
        let message = server_error_message(&body).unwrap_or(body);
        Self {
            kind: ApiErrorKind::Http,
            message: format!("{ctx} ({status}): {message}"),
        }
    }
}

pub(crate) type ApiResult<T> = Result<T, ApiError>;

/// Extract the `error` field of a failure body, if the body has that shape.
pub(crate) fn server_error_message(body: &str) -> Option<String> {
    #[derive(Deserialize)]
    struct ErrorBody {
        error: String,
    }

    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .map(|b| b.error)
        .filter(|m| !m.trim().is_empty())
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct EnvConfig {
    pub api_url: String,
}

impl EnvConfig {
    pub fn new() -> Self {
        // Deployments may inject `window.ENV.API_URL`; otherwise the API is
        // same-origin.
        if let Some(window) = web_sys::window() {
            if let Some(env) = window.get("ENV") {
                if !env.is_undefined() && env.is_object() {
                    if let Ok(api_url) = js_sys::Reflect::get(&env, &"API_URL".into()) {
                        if let Some(url_str) = api_url.as_string() {
                            return Self { api_url: url_str };
                        }
                    }
                }
            }

            if let Ok(origin) = window.location().origin() {
                if !origin.trim().is_empty() {
                    return Self { api_url: origin };
                }
            }
        }

        Self {
            api_url: "http://localhost:3000".to_string(),
        }
    }
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Update payload: everything except `title`/`body` is write-once, so only
/// the id travels alongside the editable fields.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct UpdateNoteRequest {
    pub id: String,
    pub title: String,
    pub body: String,
}

impl From<&Note> for UpdateNoteRequest {
    fn from(n: &Note) -> Self {
        Self {
            id: n.id.clone(),
            title: n.title.clone(),
            body: n.body.clone(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct DeleteNoteRequest {
    pub id: String,
}

/// A sign-in choice offered by the identity provider.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct AuthProvider {
    pub id: String,
    pub name: String,
}

/// Client for the Notes API and the identity provider endpoints.
///
/// Identity is cookie-scoped: the browser attaches the provider's session
/// cookie to same-origin requests, and the API resolves the owner from it on
/// every call. No token handling happens on this side.
#[derive(Clone)]
pub(crate) struct ApiClient {
    pub(crate) base_url: String,
}

impl ApiClient {
    pub fn new(base_url: String) -> Self {
        Self { base_url }
    }

    pub fn from_env() -> Self {
        Self::new(EnvConfig::new().api_url)
    }

    async fn request<T: serde::de::DeserializeOwned>(
        &self,
        method: reqwest::Method,
        path: &str,
        body: Option<&impl serde::Serialize>,
        ctx: &str,
    ) -> ApiResult<T> {
        let client = reqwest::Client::new();
        let url = format!("{}{}", self.base_url, path);
        let mut req = client.request(method, url);

        if let Some(b) = body {
            req = req.json(b);
        }

        let res = req.send().await.map_err(ApiError::network)?;

        if res.status().is_success() {
            res.json().await.map_err(ApiError::parse)
        } else if res.status().as_u16() == 401 {
            Err(ApiError::unauthorized())
        } else {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            Err(ApiError::http(status, body, ctx))
        }
    }

    /// Full note list for the session owner, newest first.
    pub async fn list_notes(&self) -> ApiResult<Vec<Note>> {
        self.request(
            reqwest::Method::GET,
            "/api/notes",
            None::<&()>,
            "Unable to retrieve the notes",
        )
        .await
    }

    pub async fn create_note(&self, note: &Note) -> ApiResult<Note> {
        self.request(
            reqwest::Method::POST,
            "/api/notes",
            Some(note),
            "Unable to save the note",
        )
        .await
    }

    pub async fn update_note(&self, req: &UpdateNoteRequest) -> ApiResult<Note> {
        self.request(
            reqwest::Method::PUT,
            "/api/notes",
            Some(req),
            "Unable to update the note",
        )
        .await
    }

    pub async fn delete_note(&self, req: &DeleteNoteRequest) -> ApiResult<Note> {
        self.request(
            reqwest::Method::DELETE,
            "/api/notes",
            Some(req),
            "Unable to delete the note",
        )
        .await
    }

    /// Who the identity provider says we are. `None` means signed out.
    pub async fn get_session(&self) -> ApiResult<Option<SessionUser>> {
        let data: serde_json::Value = self
            .request(
                reqwest::Method::GET,
                "/api/auth/session",
                None::<&()>,
                "Unable to resolve the session",
            )
            .await?;
        Ok(Self::parse_session_response(data))
    }

    pub async fn get_providers(&self) -> ApiResult<Vec<AuthProvider>> {
        let data: serde_json::Value = self
            .request(
                reqwest::Method::GET,
                "/api/auth/providers",
                None::<&()>,
                "Unable to list sign-in providers",
            )
            .await?;
        Ok(Self::parse_providers_response(data))
    }

    pub fn sign_in_url(&self, provider_id: &str, callback_url: &str) -> String {
        format!(
            "{}/api/auth/signin/{}?callbackUrl={}",
            self.base_url,
            provider_id,
            urlencoding::encode(callback_url)
        )
    }

    pub fn sign_out_url(&self) -> String {
        format!("{}/api/auth/signout", self.base_url)
    }

    /// The provider returns `{}` when signed out and `{user: {...}, ...}`
    /// when signed in; a user without an email is treated as signed out.
    pub(crate) fn parse_session_response(data: serde_json::Value) -> Option<SessionUser> {
        let user = data.get("user")?;

        let email = user
            .get("email")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();
        if email.trim().is_empty() {
            return None;
        }

        let name = user
            .get("name")
            .and_then(|v| v.as_str())
            .filter(|s| !s.trim().is_empty())
            .map(|s| s.to_string());

        Some(SessionUser { name, email })
    }

    /// The provider list is an object keyed by provider id. Entries missing
    /// an id or a display name are skipped.
    pub(crate) fn parse_providers_response(data: serde_json::Value) -> Vec<AuthProvider> {
        let Some(map) = data.as_object() else {
            return vec![];
        };

        let mut out: Vec<AuthProvider> = Vec::with_capacity(map.len());
        for (key, item) in map {
            let get_s = |k: &str| item.get(k).and_then(|v| v.as_str()).map(|s| s.to_string());

            let id = get_s("id").unwrap_or_else(|| key.clone());
            let name = get_s("name").unwrap_or_default();

            if !id.trim().is_empty() && !name.trim().is_empty() {
                out.push(AuthProvider { id, name });
            }
        }

        out.sort_by(|a, b| a.name.cmp(&b.name));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_request_wire_shape() {
        let n = Note {
            id: "1".to_string(),
            owner_id: "u@example.com".to_string(),
            title: "X".to_string(),
            body: "y".to_string(),
            created_at: "2026-01-01T00:00:00.000Z".to_string(),
        };
        let v = serde_json::to_value(UpdateNoteRequest::from(&n)).expect("should serialize");
        assert_eq!(v["id"], "1");
        assert_eq!(v["title"], "X");
        assert_eq!(v["body"], "y");
        // Write-once fields never travel on update.
        assert!(v.get("ownerId").is_none());
        assert!(v.get("createdAt").is_none());
    }

    #[test]
    fn test_delete_request_wire_shape() {
        let v = serde_json::to_value(DeleteNoteRequest {
            id: "1".to_string(),
        })
        .expect("should serialize");
        assert_eq!(v, serde_json::json!({ "id": "1" }));
    }

    #[test]
    fn test_server_error_message_extraction() {
        assert_eq!(
            server_error_message(r#"{"error": "Unable to save the note"}"#),
            Some("Unable to save the note".to_string())
        );
        assert_eq!(server_error_message(r#"{"error": ""}"#), None);
        assert_eq!(server_error_message("<html>oops</html>"), None);
    }

    #[test]
    fn test_parse_session_response_signed_in() {
        let data = serde_json::json!({
            "user": { "name": "Ada", "email": "ada@example.com", "image": null },
            "expires": "2026-09-01T00:00:00.000Z"
        });
        let user = ApiClient::parse_session_response(data).expect("should be signed in");
        assert_eq!(user.name.as_deref(), Some("Ada"));
        assert_eq!(user.email, "ada@example.com");
    }

    #[test]
    fn test_parse_session_response_signed_out() {
        assert_eq!(ApiClient::parse_session_response(serde_json::json!({})), None);
        // A user object without an email is not a usable owner identity.
        assert_eq!(
            ApiClient::parse_session_response(serde_json::json!({ "user": { "name": "Ada" } })),
            None
        );
    }

    #[test]
    fn test_parse_providers_response() {
        let data = serde_json::json!({
            "github": { "id": "github", "name": "GitHub", "type": "oauth" },
            "google": { "id": "google", "name": "Google", "type": "oauth" },
            "broken": { "type": "oauth" }
        });
        let providers = ApiClient::parse_providers_response(data);
        assert_eq!(
            providers,
            vec![
                AuthProvider {
                    id: "github".to_string(),
                    name: "GitHub".to_string()
                },
                AuthProvider {
                    id: "google".to_string(),
                    name: "Google".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_sign_in_url_encodes_callback() {
        let client = ApiClient::new("http://localhost:3000".to_string());
        assert_eq!(
            client.sign_in_url("github", "http://localhost:3000/"),
            "http://localhost:3000/api/auth/signin/github?callbackUrl=http%3A%2F%2Flocalhost%3A3000%2F"
        );
    }
}
