// ABOUTME: Google and Microsoft OAuth provider implementations
// ABOUTME: Code exchange over form POST, user info over bearer GET, normalized to one record
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 TalentGate

use super::{OAuthProvider, OAuthUserInfo, ProviderToken};
use crate::config::OAuthProviderConfig;
use crate::constants::oauth_endpoints;
use crate::errors::{AppError, AppResult};
use crate::models::OAuthProviderKind;
use serde::Deserialize;

/// Scopes requested from Google by default
pub const GOOGLE_DEFAULT_SCOPES: &[&str] = &["openid", "email", "profile"];
/// Scopes requested from Microsoft by default
pub const MICROSOFT_DEFAULT_SCOPES: &[&str] = &["openid", "email", "profile", "User.Read"];

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Google OAuth provider
pub struct GoogleOAuthProvider {
    config: OAuthProviderConfig,
    http: reqwest::Client,
    auth_url: String,
    token_url: String,
    userinfo_url: String,
}

#[derive(Debug, Deserialize)]
struct GoogleUserInfo {
    id: String,
    email: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    picture: String,
    #[serde(default)]
    verified_email: bool,
}

impl GoogleOAuthProvider {
    /// Create a provider against Google's public endpoints
    #[must_use]
    pub fn new(config: OAuthProviderConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
            auth_url: oauth_endpoints::GOOGLE_AUTH_URL.to_owned(),
            token_url: oauth_endpoints::GOOGLE_TOKEN_URL.to_owned(),
            userinfo_url: oauth_endpoints::GOOGLE_USERINFO_URL.to_owned(),
        }
    }

    /// Create a provider against custom endpoints (tests, proxies)
    #[must_use]
    pub fn with_endpoints(
        config: OAuthProviderConfig,
        auth_url: String,
        token_url: String,
        userinfo_url: String,
    ) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
            auth_url,
            token_url,
            userinfo_url,
        }
    }
}

#[async_trait::async_trait]
impl OAuthProvider for GoogleOAuthProvider {
    fn kind(&self) -> OAuthProviderKind {
        OAuthProviderKind::Google
    }

    fn auth_url(&self, state: &str) -> String {
        format!(
            "{}?client_id={}&redirect_uri={}&scope={}&response_type=code&state={}&access_type=offline&prompt=consent",
            self.auth_url,
            urlencoding::encode(&self.config.client_id),
            urlencoding::encode(&self.config.redirect_url),
            urlencoding::encode(&self.config.scopes.join(" ")),
            urlencoding::encode(state),
        )
    }

    async fn exchange_code(&self, code: &str) -> AppResult<ProviderToken> {
        let params = [
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("code", code),
            ("grant_type", "authorization_code"),
            ("redirect_uri", self.config.redirect_url.as_str()),
        ];

        let response = self
            .http
            .post(&self.token_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| {
                AppError::external_service("google", "token exchange failed").with_source(e)
            })?;

        if !response.status().is_success() {
            return Err(
                AppError::external_service("google", "authorization was not granted")
                    .with_detail("status_code", response.status().as_u16()),
            );
        }

        let token: TokenResponse = response.json().await.map_err(|e| {
            AppError::external_service("google", "malformed token response").with_source(e)
        })?;

        Ok(ProviderToken {
            access_token: token.access_token,
        })
    }

    async fn user_info(&self, access_token: &str) -> AppResult<OAuthUserInfo> {
        let response = self
            .http
            .get(&self.userinfo_url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| {
                AppError::external_service("google", "user info request failed").with_source(e)
            })?;

        if !response.status().is_success() {
            return Err(
                AppError::external_service("google", "user info was not granted")
                    .with_detail("status_code", response.status().as_u16()),
            );
        }

        let info: GoogleUserInfo = response.json().await.map_err(|e| {
            AppError::external_service("google", "malformed user info response").with_source(e)
        })?;

        Ok(OAuthUserInfo {
            provider_user_id: info.id,
            email: info.email,
            name: info.name,
            picture: info.picture,
            email_verified: info.verified_email,
        })
    }
}

/// Microsoft identity platform provider
pub struct MicrosoftOAuthProvider {
    config: OAuthProviderConfig,
    http: reqwest::Client,
    auth_url: String,
    token_url: String,
    userinfo_url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MicrosoftUserInfo {
    id: String,
    #[serde(default)]
    display_name: String,
    #[serde(default)]
    mail: Option<String>,
    #[serde(default)]
    user_principal_name: Option<String>,
}

impl MicrosoftOAuthProvider {
    /// Create a provider against Microsoft's public endpoints
    #[must_use]
    pub fn new(config: OAuthProviderConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
            auth_url: oauth_endpoints::MICROSOFT_AUTH_URL.to_owned(),
            token_url: oauth_endpoints::MICROSOFT_TOKEN_URL.to_owned(),
            userinfo_url: oauth_endpoints::MICROSOFT_USERINFO_URL.to_owned(),
        }
    }

    /// Create a provider against custom endpoints (tests, proxies)
    #[must_use]
    pub fn with_endpoints(
        config: OAuthProviderConfig,
        auth_url: String,
        token_url: String,
        userinfo_url: String,
    ) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
            auth_url,
            token_url,
            userinfo_url,
        }
    }
}

#[async_trait::async_trait]
impl OAuthProvider for MicrosoftOAuthProvider {
    fn kind(&self) -> OAuthProviderKind {
        OAuthProviderKind::Microsoft
    }

    fn auth_url(&self, state: &str) -> String {
        format!(
            "{}?client_id={}&redirect_uri={}&scope={}&response_type=code&response_mode=query&state={}",
            self.auth_url,
            urlencoding::encode(&self.config.client_id),
            urlencoding::encode(&self.config.redirect_url),
            urlencoding::encode(&self.config.scopes.join(" ")),
            urlencoding::encode(state),
        )
    }

    async fn exchange_code(&self, code: &str) -> AppResult<ProviderToken> {
        let params = [
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("code", code),
            ("grant_type", "authorization_code"),
            ("redirect_uri", self.config.redirect_url.as_str()),
        ];

        let response = self
            .http
            .post(&self.token_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| {
                AppError::external_service("microsoft", "token exchange failed").with_source(e)
            })?;

        if !response.status().is_success() {
            return Err(
                AppError::external_service("microsoft", "authorization was not granted")
                    .with_detail("status_code", response.status().as_u16()),
            );
        }

        let token: TokenResponse = response.json().await.map_err(|e| {
            AppError::external_service("microsoft", "malformed token response").with_source(e)
        })?;

        Ok(ProviderToken {
            access_token: token.access_token,
        })
    }

    async fn user_info(&self, access_token: &str) -> AppResult<OAuthUserInfo> {
        let response = self
            .http
            .get(&self.userinfo_url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| {
                AppError::external_service("microsoft", "user info request failed").with_source(e)
            })?;

        if !response.status().is_success() {
            return Err(
                AppError::external_service("microsoft", "user info was not granted")
                    .with_detail("status_code", response.status().as_u16()),
            );
        }

        let info: MicrosoftUserInfo = response.json().await.map_err(|e| {
            AppError::external_service("microsoft", "malformed user info response").with_source(e)
        })?;

        // Graph reports the address under mail for org accounts and under
        // userPrincipalName otherwise
        let email = info
            .mail
            .or(info.user_principal_name)
            .unwrap_or_default();

        Ok(OAuthUserInfo {
            provider_user_id: info.id,
            email,
            name: info.display_name,
            picture: String::new(),
            email_verified: true,
        })
    }
}
