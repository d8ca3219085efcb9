//! Redirect-based authentication
//!
//! The user logs in through the platform web page, which redirects to a
//! callback URI carrying the tokens:
//!
//! ```text
//! vscode://<extension id>/authentification?access-token=..&refresh-token=..&resource=<id>
//! ```
//!
//! [`AuthFlow::complete`] stores the tokens, loads the profile, resets the
//! storage area and opens the requested resource.

use std::sync::Arc;

use platon_api::{ACCESS_TOKEN, REFRESH_TOKEN, SecretStore, token};
use platon_meta::{Settings, User};
use reqwest::Url;

use crate::working_copy::{WorkingCopy, WorkingCopyManager};
use crate::{AuthError, Error, Result};

/// Login page URL, with the callback the platform redirects to.
pub fn login_url(settings: &Settings) -> Result<String> {
    let mut url = Url::parse(&settings.base_url)
        .and_then(|url| url.join("login"))
        .map_err(|e| Error::InvalidUrl {
            url: settings.base_url.clone(),
            reason: e.to_string(),
        })?;

    let auth = &settings.auth;
    let callback = format!(
        "{}://{}/authentification",
        auth.uri_scheme, auth.extension_id
    );
    url.query_pairs_mut()
        .append_pair("callbackUrl", &callback)
        .append_pair("callbackTitle", &auth.app_name);
    Ok(url.to_string())
}

/// Query parameters of the redirect URI
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallbackParams {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    /// Resource to open once authenticated
    pub resource: Option<String>,
}

/// Read the tokens and target resource from a redirect URI.
///
/// Empty values are treated as absent.
pub fn parse_callback(uri: &str) -> std::result::Result<CallbackParams, AuthError> {
    let url = Url::parse(uri.trim()).map_err(|e| AuthError::InvalidCallback {
        uri: uri.to_string(),
        reason: e.to_string(),
    })?;

    let mut params = CallbackParams::default();
    for (key, value) in url.query_pairs() {
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        match key.as_ref() {
            "access-token" => params.access_token = Some(value.to_string()),
            "refresh-token" => params.refresh_token = Some(value.to_string()),
            "resource" => params.resource = Some(value.to_string()),
            _ => {}
        }
    }
    Ok(params)
}

/// Result of a completed authentication
#[derive(Debug, Clone)]
pub struct AuthOutcome {
    pub user: User,
    /// Greeting shown to the user
    pub welcome: String,
    pub acquired: Option<WorkingCopy>,
}

/// Completes the authentication started by [`login_url`].
pub struct AuthFlow<'a> {
    secrets: Arc<dyn SecretStore>,
    copies: &'a WorkingCopyManager,
}

impl<'a> AuthFlow<'a> {
    pub fn new(secrets: Arc<dyn SecretStore>, copies: &'a WorkingCopyManager) -> Self {
        Self { secrets, copies }
    }

    pub async fn complete(&self, params: CallbackParams) -> Result<AuthOutcome> {
        let access = params
            .access_token
            .ok_or(AuthError::MissingToken { param: "access-token" })?;
        let refresh = params
            .refresh_token
            .ok_or(AuthError::MissingToken { param: "refresh-token" })?;

        tracing::info!("Authentication in progress...");
        self.secrets.store(ACCESS_TOKEN, &access)?;
        self.secrets.store(REFRESH_TOKEN, &refresh)?;

        let username = token::decode_username(&access).map_err(|e| AuthError::InvalidToken {
            reason: e.to_string(),
        })?;
        let user = self
            .copies
            .platform()
            .get_user(&username)
            .await
            .map_err(|source| AuthError::ProfileFetch {
                username: username.clone(),
                source,
            })?;

        let storage = self.copies.storage();
        let profile = user.clone();
        let dropped = self.copies.session().update(|state| {
            state.user = Some(profile);
            state.folders.remove_under(storage.root())
        })?;
        if dropped > 0 {
            tracing::debug!(dropped, "Forgot workspace folders of the wiped storage");
        }
        storage.wipe()?;

        let acquired = match params.resource {
            Some(id) => Some(self.copies.acquire(&id).await?),
            None => None,
        };

        let welcome = format!(
            "Authentication to PLaTOn successful. Welcome {} !",
            user.display_name()
        );
        tracing::info!(username = %user.username, "Authenticated");

        Ok(AuthOutcome {
            user,
            welcome,
            acquired,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_login_url_carries_callback() {
        let settings = Settings::default();
        let url = login_url(&settings).unwrap();

        assert_eq!(
            url,
            "https://platon-preprod.univ-eiffel.fr/login?\
             callbackUrl=vscode%3A%2F%2Fundefined_publisher.platon%2Fauthentification\
             &callbackTitle=Visual+Studio+Code"
        );
    }

    #[test]
    fn test_parse_callback() {
        let params = parse_callback(
            "vscode://undefined_publisher.platon/authentification\
             ?access-token=aaa&refresh-token=rrr&resource=abc",
        )
        .unwrap();

        assert_eq!(
            params,
            CallbackParams {
                access_token: Some("aaa".into()),
                refresh_token: Some("rrr".into()),
                resource: Some("abc".into()),
            }
        );
    }

    #[test]
    fn test_parse_callback_empty_resource_is_absent() {
        let params =
            parse_callback("vscode://x/authentification?access-token=a&refresh-token=r&resource=")
                .unwrap();
        assert_eq!(params.resource, None);
    }

    #[test]
    fn test_parse_callback_rejects_garbage() {
        assert!(matches!(
            parse_callback("not a uri"),
            Err(AuthError::InvalidCallback { .. })
        ));
    }
}
