use url::Url;

use crate::{RequestToken, ShortenRequest, TransportError, ValidationError};

/// Raw form input as typed by the operator.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ShortenForm {
    pub url: String,
    pub name: String,
    pub email: String,
    pub contact: String,
}

impl ShortenForm {
    pub fn validate(&self) -> Result<ShortenRequest, ValidationError> {
        let url = required("url", &self.url)?;
        let name = required("name", &self.name)?;
        let email = required("email", &self.email)?;
        let contact = required("contact", &self.contact)?;

        let parsed = Url::parse(url).map_err(|_| ValidationError::InvalidUrl(url.to_string()))?;
        let web_scheme = matches!(parsed.scheme(), "http" | "https");
        if !web_scheme || parsed.host_str().is_none() {
            return Err(ValidationError::InvalidUrl(url.to_string()));
        }

        Ok(ShortenRequest {
            url: url.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            contact: contact.to_string(),
        })
    }
}

fn required<'a>(field: &'static str, value: &'a str) -> Result<&'a str, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        Err(ValidationError::MissingField(field))
    } else {
        Ok(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShortenRejected {
    InFlight,
    Invalid(ValidationError),
}

/// A validated request tagged with the token its reply must carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortenTicket {
    pub token: RequestToken,
    pub request: ShortenRequest,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ShortenSubmission {
    token: RequestToken,
    in_flight: bool,
    short_url: Option<String>,
    error: Option<String>,
}

impl ShortenSubmission {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn short_url(&self) -> Option<&str> {
        self.short_url.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn token(&self) -> RequestToken {
        self.token
    }

    pub fn begin(&mut self, form: &ShortenForm) -> Result<ShortenTicket, ShortenRejected> {
        if self.in_flight {
            return Err(ShortenRejected::InFlight);
        }
        self.short_url = None;
        match form.validate() {
            Ok(request) => {
                self.error = None;
                self.in_flight = true;
                self.token = self.token.next();
                Ok(ShortenTicket {
                    token: self.token,
                    request,
                })
            }
            Err(err) => {
                self.error = Some(err.to_string());
                Err(ShortenRejected::Invalid(err))
            }
        }
    }

    /// Applies the reply to the submission tagged `token`. Returns `false`
    /// and changes nothing unless that submission is the pending one.
    pub fn complete(
        &mut self,
        token: RequestToken,
        result: Result<String, TransportError>,
    ) -> bool {
        if !self.in_flight || token != self.token {
            return false;
        }
        self.in_flight = false;
        match result {
            Ok(short_url) => {
                self.short_url = Some(short_url);
                self.error = None;
            }
            Err(err) => {
                self.error = Some(format!("could not shorten the url: {err}"));
            }
        }
        true
    }

    /// Drops any pending submission; its reply will be ignored.
    pub fn reset(&mut self) {
        *self = Self {
            token: self.token.next(),
            ..Self::default()
        };
    }
}
