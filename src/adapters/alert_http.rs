//! HTTP alarm notifier.
//!
//! Implements [`AlertSink`] by POSTing a form-encoded message to the
//! messaging gateway (`To`, `From`, `Body` fields against an
//! account-scoped URL).  Invoked only on alarm activation edges;
//! failures are logged by the caller and never retried.

use core::fmt::Write as _;

use log::info;

use crate::app::ports::AlertSink;
use crate::error::CommsError;

pub struct HttpNotifier {
    url: String,
    to: String,
    from: String,
    timeout_ms: u32,
}

impl HttpNotifier {
    pub fn new(url: &str, to: &str, from: &str, timeout_ms: u32) -> Self {
        Self {
            url: url.to_string(),
            to: to.to_string(),
            from: from.to_string(),
            timeout_ms,
        }
    }

    fn form_body(&self, message: &str) -> String {
        let mut body = String::new();
        let _ = write!(
            body,
            "To={}&From={}&Body={}",
            urlencode(&self.to),
            urlencode(&self.from),
            urlencode(message)
        );
        body
    }

    #[cfg(target_os = "espidf")]
    fn post_form(&mut self, body: &str) -> Result<u16, CommsError> {
        http_post(
            &self.url,
            "application/x-www-form-urlencoded",
            body,
            self.timeout_ms,
        )
    }

    #[cfg(not(target_os = "espidf"))]
    fn post_form(&mut self, body: &str) -> Result<u16, CommsError> {
        info!(
            "alert(sim): would POST '{body}' to {} (timeout {} ms)",
            self.url, self.timeout_ms
        );
        Ok(201)
    }
}

impl AlertSink for HttpNotifier {
    fn notify(&mut self, message: &str) -> Result<(), CommsError> {
        info!("alert: delivering notification");
        let body = self.form_body(message);
        match self.post_form(&body)? {
            status if (200..300).contains(&status) => Ok(()),
            status => Err(CommsError::RejectedStatus(status)),
        }
    }
}

/// Percent-encode everything outside the unreserved set (RFC 3986).
fn urlencode(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char);
            }
            _ => {
                let _ = write!(out, "%{byte:02X}");
            }
        }
    }
    out
}

/// Shared blocking HTTP POST over the ESP-IDF client.  Returns the
/// response status code.
#[cfg(target_os = "espidf")]
pub(crate) fn http_post(
    url: &str,
    content_type: &str,
    body: &str,
    timeout_ms: u32,
) -> Result<u16, CommsError> {
    use esp_idf_svc::sys::*;
    use std::ffi::CString;

    let c_url = CString::new(url).map_err(|_| CommsError::RequestFailed)?;
    let c_content_type = CString::new(content_type).map_err(|_| CommsError::RequestFailed)?;
    let c_header = CString::new("Content-Type").map_err(|_| CommsError::RequestFailed)?;

    let config = esp_http_client_config_t {
        url: c_url.as_ptr(),
        method: esp_http_client_method_t_HTTP_METHOD_POST,
        timeout_ms: timeout_ms as i32,
        ..Default::default()
    };

    // SAFETY: client handle is created, used and destroyed within this
    // call; the CStrings outlive every use of their pointers.
    unsafe {
        let client = esp_http_client_init(&config);
        if client.is_null() {
            return Err(CommsError::RequestFailed);
        }
        esp_http_client_set_header(client, c_header.as_ptr(), c_content_type.as_ptr());
        esp_http_client_set_post_field(client, body.as_ptr().cast(), body.len() as i32);

        let err = esp_http_client_perform(client);
        let status = esp_http_client_get_status_code(client);
        esp_http_client_cleanup(client);

        if err != ESP_OK {
            return Err(CommsError::RequestFailed);
        }
        Ok(status.clamp(0, i32::from(u16::MAX)) as u16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_body_is_percent_encoded() {
        let notifier = HttpNotifier::new("http://example.invalid", "+50377777777", "+15550001111", 5000);
        let body = notifier.form_body("Smoke alert! Level detected: 401 ppm");
        assert_eq!(
            body,
            "To=%2B50377777777&From=%2B15550001111&Body=Smoke%20alert%21%20Level%20detected%3A%20401%20ppm"
        );
    }

    #[test]
    fn unreserved_characters_pass_through() {
        assert_eq!(urlencode("abc-XYZ_0.9~"), "abc-XYZ_0.9~");
        assert_eq!(urlencode("a b"), "a%20b");
    }
}
