//! OAuth 1.0a request signing for the Twitter API
//!
//! Implements the HMAC-SHA1 signature scheme from RFC 5849: percent-encode
//! and sort the parameters, build the signature base string from the method,
//! URL and normalized parameters, and sign it with the consumer and token
//! secrets.

use base64::Engine;
use hmac::{Hmac, Mac};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use sha1::Sha1;
use wwgraph_config::TwitterCredentials;

/// RFC 3986 unreserved characters stay literal; everything else is escaped.
const ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

fn encode(s: &str) -> String {
    utf8_percent_encode(s, ENCODE_SET).to_string()
}

/// Signs requests on behalf of one set of user-context credentials.
#[derive(Debug, Clone)]
pub struct OauthSigner {
    credentials: TwitterCredentials,
}

impl OauthSigner {
    pub fn new(credentials: TwitterCredentials) -> Self {
        Self { credentials }
    }

    /// Build the `Authorization: OAuth ...` header value for one request.
    ///
    /// `extra_params` are query or form parameters that participate in the
    /// signature base string; JSON and multipart bodies contribute none.
    pub fn authorization_header(
        &self,
        method: &str,
        url: &str,
        extra_params: &[(&str, &str)],
    ) -> String {
        let nonce = uuid::Uuid::new_v4().simple().to_string();
        let timestamp = chrono::Utc::now().timestamp().to_string();
        self.header_with(method, url, extra_params, &nonce, &timestamp)
    }

    fn header_with(
        &self,
        method: &str,
        url: &str,
        extra_params: &[(&str, &str)],
        nonce: &str,
        timestamp: &str,
    ) -> String {
        let oauth_params: Vec<(&str, &str)> = vec![
            ("oauth_consumer_key", &self.credentials.consumer_key),
            ("oauth_nonce", nonce),
            ("oauth_signature_method", "HMAC-SHA1"),
            ("oauth_timestamp", timestamp),
            ("oauth_token", &self.credentials.access_token),
            ("oauth_version", "1.0"),
        ];

        let mut all_params: Vec<(&str, &str)> = oauth_params.clone();
        all_params.extend_from_slice(extra_params);
        let signature = self.sign(method, url, &all_params);

        let mut header_params: Vec<(String, String)> = oauth_params
            .iter()
            .map(|(k, v)| (encode(k), encode(v)))
            .collect();
        header_params.push(("oauth_signature".to_string(), encode(&signature)));
        header_params.sort();

        let joined = header_params
            .iter()
            .map(|(k, v)| format!("{k}=\"{v}\""))
            .collect::<Vec<_>>()
            .join(", ");
        format!("OAuth {joined}")
    }

    /// Compute the base64 HMAC-SHA1 signature over the base string.
    fn sign(&self, method: &str, url: &str, params: &[(&str, &str)]) -> String {
        let mut encoded: Vec<(String, String)> = params
            .iter()
            .map(|(k, v)| (encode(k), encode(v)))
            .collect();
        encoded.sort();
        let parameter_string = encoded
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&");

        let base = format!(
            "{}&{}&{}",
            method.to_uppercase(),
            encode(url),
            encode(&parameter_string)
        );
        let key = format!(
            "{}&{}",
            encode(&self.credentials.consumer_secret),
            encode(&self.credentials.access_token_secret)
        );

        // HMAC accepts keys of any length
        let mut mac =
            Hmac::<Sha1>::new_from_slice(key.as_bytes()).expect("HMAC key of any length");
        mac.update(base.as_bytes());
        base64::engine::general_purpose::STANDARD.encode(mac.finalize().into_bytes())
    }
}
