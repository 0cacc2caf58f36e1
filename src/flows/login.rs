//! Login redirect flow: a first-party form posts user credentials for a registered client and
//! is redirected back with the issued token in the query string.

// self
use crate::{
	_prelude::*,
	flows::{
		Authority, TokenRequest,
		common::{self, RedirectTarget},
	},
	obs::{self, FlowKind},
};

/// Scope requested when the login form does not name one.
pub const DEFAULT_LOGIN_SCOPE: &str = "profile";

/// Login form submission. Over HTTP, `client_id`, `redirect_uri`, `scope` and `state` come
/// from the query string and the credentials from the form body.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
	/// Registered client the token is issued to.
	#[serde(default)]
	pub client_id: Option<String>,
	/// Absolute URL or origin-relative reference to redirect to on success.
	#[serde(default)]
	pub redirect_uri: Option<String>,
	/// Resource-owner login name.
	#[serde(default)]
	pub username: Option<String>,
	/// Resource-owner password.
	#[serde(default)]
	pub password: Option<String>,
	/// Requested scope; defaults to [`DEFAULT_LOGIN_SCOPE`].
	#[serde(default)]
	pub scope: Option<String>,
	/// Opaque value echoed back to the client.
	#[serde(default)]
	pub state: Option<String>,
}
impl LoginRequest {
	/// Builds a login submission with the default scope and no state.
	pub fn new(
		client_id: impl Into<String>,
		redirect_uri: impl Into<String>,
		username: impl Into<String>,
		password: impl Into<String>,
	) -> Self {
		Self {
			client_id: Some(client_id.into()),
			redirect_uri: Some(redirect_uri.into()),
			username: Some(username.into()),
			password: Some(password.into()),
			scope: None,
			state: None,
		}
	}

	/// Overrides the requested scope.
	pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
		self.scope = Some(scope.into());

		self
	}

	/// Sets the state echoed back on redirect.
	pub fn with_state(mut self, state: impl Into<String>) -> Self {
		self.state = Some(state.into());

		self
	}
}
impl Debug for LoginRequest {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("LoginRequest")
			.field("client_id", &self.client_id)
			.field("redirect_uri", &self.redirect_uri)
			.field("username", &self.username)
			.field("password_set", &self.password.is_some())
			.field("scope", &self.scope)
			.field("state", &self.state)
			.finish()
	}
}

impl Authority {
	/// Authenticates the user on behalf of a registered client and returns the redirect
	/// target carrying `access_token`, `scope`, and (when supplied) `state`.
	pub async fn login(&self, request: &LoginRequest) -> Result<String> {
		self.login_at(request, OffsetDateTime::now_utc()).await
	}

	/// [`Authority::login`] as if the current instant were `now`.
	pub async fn login_at(&self, request: &LoginRequest, now: OffsetDateTime) -> Result<String> {
		obs::observe(FlowKind::Login, "login", async move {
			let client_id = common::required("client_id", request.client_id.as_deref())?;
			let redirect_uri = common::required("redirect_uri", request.redirect_uri.as_deref())?;
			let mut target = RedirectTarget::parse("redirect_uri", redirect_uri)?;
			let username = common::required("username", request.username.as_deref())?;
			let password = common::required("password", request.password.as_deref())?;
			let scope =
				request.scope.as_deref().filter(|s| !s.is_empty()).unwrap_or(DEFAULT_LOGIN_SCOPE);
			let client = self
				.store
				.find_client(client_id)
				.await?
				.ok_or_else(|| Error::unauthorized_client("Invalid client"))?;
			let grant = TokenRequest::password(
				client_id,
				client.client_secret.expose(),
				username,
				password,
				scope,
			);
			let envelope = self.authenticate_at(&grant, now).await?;

			target.append_pair("access_token", envelope.access_token.expose());
			target.append_pair("scope", &envelope.scope);

			if let Some(state) = request.state.as_deref().filter(|s| !s.is_empty()) {
				target.append_pair("state", state);
			}

			Ok(target.into_string())
		})
		.await
	}
}
