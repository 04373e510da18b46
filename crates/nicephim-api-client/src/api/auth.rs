use nicephim_core::constants::UNKNOWN_ERROR;
use nicephim_core::models::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, User};
use nicephim_core::ClientError;
use validator::Validate;

use crate::ApiClient;

impl ApiClient {
    /// Register an account. Returns the new user id.
    #[tracing::instrument(skip(self, request), fields(username = %request.username))]
    pub async fn register(&self, request: &RegisterRequest) -> Result<String, ClientError> {
        request.validate()?;
        let response: RegisterResponse = self.post_json("/api/auth/register", request).await?;
        if !response.success {
            return Err(ClientError::Api(
                response
                    .error
                    .or(response.message)
                    .unwrap_or_else(|| UNKNOWN_ERROR.to_string()),
            ));
        }
        response
            .user_id
            .ok_or_else(|| {
                ClientError::Decode("register response is missing `user_id`".to_string())
            })
    }

    /// Exchange credentials for the user object the session stores.
    #[tracing::instrument(skip(self, request), fields(username = %request.username))]
    pub async fn login(&self, request: &LoginRequest) -> Result<User, ClientError> {
        request.validate()?;
        let response: LoginResponse = self.post_json("/api/auth/login", request).await?;
        if !response.success {
            return Err(ClientError::Api(
                response
                    .error
                    .or(response.message)
                    .unwrap_or_else(|| UNKNOWN_ERROR.to_string()),
            ));
        }
        let user = response
            .user
            .ok_or_else(|| ClientError::Decode("login response is missing `user`".to_string()))?;
        tracing::info!(user_id = %user.id, "Logged in");
        Ok(User::from(user))
    }
}
