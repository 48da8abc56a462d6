//! Typed wrapper over the tutoring backend's REST endpoints.
//!
//! One [`ApiClient`] owns a cookie jar, so the login session established by
//! [`ApiClient::login`] is carried on every later call.

use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use bktutor_shared::protocol::{
    AttendedDetailResponse, AttendedListResponse, BrowseResponse, CancelRequest, ErrorBody,
    LibraryResponse, LoginRequest, MessagesResponse, MutationResponse, ProfileUpdate,
    RegisterRequest, RescheduleRequest, SendMessageResponse, SessionDetailResponse,
    SidebarResponse, StudentProfileResponse, UserProfileResponse,
};
use bktutor_shared::types::{
    AttendedSession, ConversationId, LibraryBundle, Message, Session, SessionId,
};

use crate::config::ClientConfig;
use crate::error::ApiError;

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base: String,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        Self::with_base(config.api_base())
    }

    pub fn with_base(base: impl Into<String>) -> Result<Self, ApiError> {
        let http = Client::builder().cookie_store(true).build()?;
        Ok(Self {
            http,
            base: base.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Absolute url of a backend path, also used for download links.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base, path.trim_start_matches('/'))
    }

    /// Send and map 401 and other non-2xx statuses to errors.
    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized);
        }
        if !status.is_success() {
            return Err(status_error(status, response).await);
        }
        Ok(response)
    }

    async fn request_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = self.send(request).await?;
        let body = response.text().await?;
        // Some mutations reply with an empty body.
        let body = if body.trim().is_empty() { "{}" } else { body.as_str() };
        serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn request_status_only(&self, request: RequestBuilder) -> Result<(), ApiError> {
        self.send(request).await.map(|_| ())
    }

    // -- auth ---------------------------------------------------------------

    /// `GET /auth/me`; success means the cookie session is valid.
    pub async fn me(&self) -> Result<(), ApiError> {
        self.request_status_only(self.http.get(self.endpoint("/auth/me")))
            .await
    }

    /// `POST /auth/login`. Bad credentials come back as
    /// [`ApiError::Status`] carrying the backend's reason, not as
    /// [`ApiError::Unauthorized`].
    pub async fn login(&self, email: &str, password: &str) -> Result<(), ApiError> {
        let body = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        let response = self
            .http
            .post(self.endpoint("/auth/login"))
            .json(&body)
            .send()
            .await?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(status_error(status, response).await)
        }
    }

    pub async fn logout(&self) -> Result<(), ApiError> {
        self.request_status_only(self.http.post(self.endpoint("/auth/logout")))
            .await
    }

    // -- profile ------------------------------------------------------------

    pub async fn students_profile(&self) -> Result<StudentProfileResponse, ApiError> {
        self.request_json(self.http.get(self.endpoint("/students/profile")))
            .await
    }

    pub async fn users_student_profile(&self) -> Result<UserProfileResponse, ApiError> {
        self.request_json(self.http.get(self.endpoint("/users/student/profile")))
            .await
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<(), ApiError> {
        self.request_status_only(self.http.put(self.endpoint("/students/profile")).json(update))
            .await
    }

    /// Multipart upload with the image under the `file` field.
    pub async fn upload_avatar(&self, bytes: Vec<u8>, file_name: &str) -> Result<(), ApiError> {
        let part = Part::bytes(bytes).file_name(file_name.to_string());
        let form = Form::new().part("file", part);
        self.request_status_only(
            self.http
                .post(self.endpoint("/students/profile/avatar"))
                .multipart(form),
        )
        .await
    }

    // -- sessions -----------------------------------------------------------

    pub async fn browse(&self, query: &[(&'static str, String)]) -> Result<Vec<Session>, ApiError> {
        debug!(?query, "browsing sessions");
        let response: BrowseResponse = self
            .request_json(self.http.get(self.endpoint("/sessions/browse")).query(query))
            .await?;
        Ok(response.into_sessions())
    }

    /// Unfiltered catalogue, used to offer reschedule targets.
    pub async fn browse_all(&self) -> Result<Vec<Session>, ApiError> {
        self.browse(&[]).await
    }

    pub async fn register(&self, session_ids: &[SessionId]) -> Result<(), ApiError> {
        let body = RegisterRequest {
            session_ids: session_ids.to_vec(),
        };
        self.request_status_only(self.http.post(self.endpoint("/students/register")).json(&body))
            .await
    }

    pub async fn session_detail(&self, id: &SessionId) -> Result<Session, ApiError> {
        let response: SessionDetailResponse = self
            .request_json(self.http.get(self.endpoint(&format!("/students/session/{id}"))))
            .await?;
        Ok(response.into_session())
    }

    pub async fn cancel_session(
        &self,
        id: &SessionId,
        body: &CancelRequest,
    ) -> Result<MutationResponse, ApiError> {
        self.request_json(
            self.http
                .post(self.endpoint(&format!("/students/session/{id}/cancel")))
                .json(body),
        )
        .await
    }

    pub async fn reschedule_session(
        &self,
        id: &SessionId,
        body: &RescheduleRequest,
    ) -> Result<MutationResponse, ApiError> {
        self.request_json(
            self.http
                .post(self.endpoint(&format!("/students/session/{id}/reschedule")))
                .json(body),
        )
        .await
    }

    pub async fn attended_sessions(&self) -> Result<Vec<AttendedSession>, ApiError> {
        let response: AttendedListResponse = self
            .request_json(self.http.get(self.endpoint("/sessions/attended")))
            .await?;
        Ok(response.attended)
    }

    pub async fn attended_detail(&self, id: &str) -> Result<AttendedSession, ApiError> {
        let response: AttendedDetailResponse = self
            .request_json(self.http.get(self.endpoint(&format!("/sessions/attended/{id}"))))
            .await?;
        Ok(response.into_attended())
    }

    pub async fn library_resources(&self, session_id: &SessionId) -> Result<LibraryBundle, ApiError> {
        let response: LibraryResponse = self
            .request_json(
                self.http
                    .get(self.endpoint("/library/resources"))
                    .query(&[("sessionId", session_id.as_str())]),
            )
            .await?;
        Ok(response.into())
    }

    // -- messaging ----------------------------------------------------------

    pub async fn sidebar(&self) -> Result<SidebarResponse, ApiError> {
        self.request_json(self.http.get(self.endpoint("/messaging/sidebar")))
            .await
    }

    pub async fn conversation_messages(&self, id: &ConversationId) -> Result<Vec<Message>, ApiError> {
        let response: MessagesResponse = self
            .request_json(
                self.http
                    .get(self.endpoint(&format!("/messaging/conversations/{id}/messages"))),
            )
            .await?;
        Ok(response.messages)
    }

    /// Post a message as form-encoded `content`. Returns the stored message
    /// when the backend echoes it.
    pub async fn send_message(
        &self,
        id: &ConversationId,
        content: &str,
    ) -> Result<Option<Message>, ApiError> {
        let response: SendMessageResponse = self
            .request_json(
                self.http
                    .post(self.endpoint(&format!("/messaging/conversations/{id}/messages")))
                    .form(&[("content", content)]),
            )
            .await?;
        Ok(response.message)
    }
}

async fn status_error(status: StatusCode, response: Response) -> ApiError {
    let message = response
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(|body| body.error)
        .filter(|e| !e.is_empty());
    ApiError::Status {
        status: status.as_u16(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joining() {
        let api = ApiClient::with_base("http://localhost:4000/").unwrap();
        assert_eq!(api.base(), "http://localhost:4000");
        assert_eq!(api.endpoint("/auth/me"), "http://localhost:4000/auth/me");
        assert_eq!(api.endpoint("sessions/browse"), "http://localhost:4000/sessions/browse");
    }

    #[test]
    fn test_base_from_config() {
        let api = ApiClient::new(&ClientConfig::default()).unwrap();
        assert_eq!(api.base(), "http://localhost:4000");
    }
}
