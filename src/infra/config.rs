use std::net::SocketAddr;

use env_helpers::{get_env, get_env_default};
use secrecy::SecretString;
use url::Url;

pub const DEFAULT_LIST_PATH: &str = "/.netlify/functions/get-registrations";
pub const DEFAULT_UPDATE_PATH: &str = "/.netlify/functions/update-registration";

pub struct AppConfig {
    pub bind_addr: SocketAddr,
    /// Base URL of the registration service.
    pub gateway_url: Url,
    pub gateway_list_path: String,
    pub gateway_update_path: String,
    /// HS256 key shared with the identity provider for session tokens.
    pub session_secret: SecretString,
    /// Name of the cookie carrying the session token.
    pub session_cookie: String,
    /// Where the browser goes to sign in.
    pub login_url: Url,
    /// Where the browser goes after signing out.
    pub logout_redirect: String,
    /// Optional file for JSON logs, in addition to the console.
    pub log_file: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let bind_addr: SocketAddr = get_env_default("BIND_ADDR", "127.0.0.1:3002".parse().unwrap());
        let gateway_url: Url = get_env("GATEWAY_URL");
        let gateway_list_path: String =
            get_env_default("GATEWAY_LIST_PATH", DEFAULT_LIST_PATH.to_string());
        let gateway_update_path: String =
            get_env_default("GATEWAY_UPDATE_PATH", DEFAULT_UPDATE_PATH.to_string());
        let session_secret: SecretString =
            SecretString::new(get_env::<String>("SESSION_JWT_SECRET").into());
        let session_cookie: String = get_env_default("SESSION_COOKIE", "access_token".to_string());
        let login_url: Url = get_env("LOGIN_URL");
        let logout_redirect: String = get_env_default("LOGOUT_REDIRECT", "/".to_string());
        let log_file: Option<String> = std::env::var("LOG_FILE").ok().filter(|s| !s.is_empty());

        Self {
            bind_addr,
            gateway_url,
            gateway_list_path,
            gateway_update_path,
            session_secret,
            session_cookie,
            login_url,
            logout_redirect,
            log_file,
        }
    }
}
