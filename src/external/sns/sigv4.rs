//! AWS Signature Version 4 request signing.

use hmac::{Hmac, Mac};
use jiff::Timestamp;
use sha2::{Digest, Sha256};

use super::types::Credentials;

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "AWS4-HMAC-SHA256";

/// A request as seen by the signer
///
/// `query` must already be in canonical form (sorted, percent-encoded).
/// Header names may use any case; they are lowercased when signed.
pub struct SignableRequest<'a> {
    pub method: &'a str,
    pub path: &'a str,
    pub query: &'a str,
    pub headers: Vec<(String, String)>,
    pub payload: &'a [u8],
}

/// Where and when a request is signed
pub struct SigningScope<'a> {
    pub region: &'a str,
    pub service: &'a str,
    pub time: Timestamp,
}

impl SigningScope<'_> {
    fn amz_date(&self) -> String {
        self.time.strftime("%Y%m%dT%H%M%SZ").to_string()
    }

    fn date_stamp(&self) -> String {
        self.time.strftime("%Y%m%d").to_string()
    }

    fn credential_scope(&self) -> String {
        format!(
            "{}/{}/{}/aws4_request",
            self.date_stamp(),
            self.region,
            self.service
        )
    }
}

/// Returns the headers to add to the request: `x-amz-date`, the optional
/// `x-amz-security-token` and `authorization`
///
/// The request's own headers must include `host`.
pub fn sign(
    request: &SignableRequest<'_>,
    scope: &SigningScope<'_>,
    credentials: &Credentials,
) -> Vec<(String, String)> {
    let amz_date = scope.amz_date();

    let mut added = vec![("x-amz-date".to_string(), amz_date.clone())];
    if let Some(token) = &credentials.session_token {
        added.push(("x-amz-security-token".to_string(), token.clone()));
    }

    let mut headers: Vec<(String, String)> = request
        .headers
        .iter()
        .chain(added.iter())
        .map(|(name, value)| (name.to_ascii_lowercase(), value.trim().to_string()))
        .collect();
    headers.sort();

    let signed_headers = headers
        .iter()
        .map(|(name, _)| name.as_str())
        .collect::<Vec<_>>()
        .join(";");

    let canonical = canonical_request(request, &headers, &signed_headers);
    let string_to_sign = format!(
        "{}\n{}\n{}\n{}",
        ALGORITHM,
        amz_date,
        scope.credential_scope(),
        sha256_hex(canonical.as_bytes())
    );

    let key = signing_key(
        &credentials.secret_access_key,
        &scope.date_stamp(),
        scope.region,
        scope.service,
    );
    let signature = hex::encode(hmac(&key, string_to_sign.as_bytes()));

    added.push((
        "authorization".to_string(),
        format!(
            "{} Credential={}/{}, SignedHeaders={}, Signature={}",
            ALGORITHM,
            credentials.access_key_id,
            scope.credential_scope(),
            signed_headers,
            signature
        ),
    ));
    added
}

fn canonical_request(
    request: &SignableRequest<'_>,
    sorted_headers: &[(String, String)],
    signed_headers: &str,
) -> String {
    let canonical_headers: String = sorted_headers
        .iter()
        .map(|(name, value)| format!("{}:{}\n", name, value))
        .collect();

    format!(
        "{}\n{}\n{}\n{}\n{}\n{}",
        request.method,
        request.path,
        request.query,
        canonical_headers,
        signed_headers,
        sha256_hex(request.payload)
    )
}

pub(crate) fn signing_key(secret: &str, date_stamp: &str, region: &str, service: &str) -> Vec<u8> {
    let k_date = hmac(format!("AWS4{}", secret).as_bytes(), date_stamp.as_bytes());
    let k_region = hmac(&k_date, region.as_bytes());
    let k_service = hmac(&k_region, service.as_bytes());
    hmac(&k_service, b"aws4_request")
}

fn hmac(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = match HmacSha256::new_from_slice(key) {
        Ok(mac) => mac,
        Err(_) => unreachable!("HMAC-SHA256 accepts keys of any size"),
    };
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}

pub(crate) fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}
