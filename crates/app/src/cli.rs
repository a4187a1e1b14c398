//! Command-line arguments.

use clap::Parser;
use courier_domain::{DomainError, DomainResult, HttpMethod, HttpRequest, RequestPayload};

#[derive(Debug, Parser)]
#[command(name = "courier", version)]
#[command(about = "Send one HTTP request and print the outcome")]
pub struct Cli {
    /// HTTP method
    #[arg(short = 'X', long, default_value = "GET")]
    pub method: HttpMethod,

    /// Request header as `Name: value` (repeatable)
    #[arg(short = 'H', long = "header", value_parser = parse_header)]
    pub headers: Vec<(String, String)>,

    /// Query parameter as `key=value` (repeatable)
    #[arg(short, long = "query", value_parser = parse_query, conflicts_with = "body")]
    pub query: Vec<(String, String)>,

    /// Request body
    #[arg(short = 'd', long)]
    pub body: Option<String>,

    /// Content type of the body
    #[arg(long, default_value = RequestPayload::CONTENT_TYPE_APPLICATION_JSON)]
    pub content_type: String,

    /// Override the configured request timeout
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Print the body as text instead of decoding it as JSON
    #[arg(long)]
    pub raw: bool,

    /// Target URL
    pub url: String,
}

impl Cli {
    /// Builds the request described by the arguments.
    pub fn to_request(&self) -> HttpRequest {
        let mut request = HttpRequest::new(self.method, self.url.clone());
        for (name, value) in &self.headers {
            request = request.with_header(name.clone(), value.clone());
        }

        if let Some(body) = &self.body {
            request = request
                .with_payload(RequestPayload::text(self.content_type.clone(), body.clone()));
        } else if !self.query.is_empty() {
            request = request.with_payload(RequestPayload::query(self.query.iter().cloned()));
        }
        request
    }
}

fn parse_header(raw: &str) -> DomainResult<(String, String)> {
    let (name, value) = raw
        .split_once(':')
        .ok_or_else(|| DomainError::InvalidHeader(format!("expected `Name: value`, got `{raw}`")))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(DomainError::InvalidHeader(format!("empty name in `{raw}`")));
    }
    Ok((name.to_string(), value.trim().to_string()))
}

fn parse_query(raw: &str) -> DomainResult<(String, String)> {
    let (key, value) = raw.split_once('=').ok_or_else(|| {
        DomainError::InvalidQueryParameter(format!("expected `key=value`, got `{raw}`"))
    })?;
    if key.is_empty() {
        return Err(DomainError::InvalidQueryParameter(format!("empty key in `{raw}`")));
    }
    Ok((key.to_string(), value.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("courier").chain(args.iter().copied()))
    }

    #[test]
    fn test_defaults_to_get() {
        let cli = parse(&["https://x/y"]).unwrap();
        let request = cli.to_request();

        assert_eq!(request.method, HttpMethod::Get);
        assert_eq!(request.target_url(), Some("https://x/y"));
        assert_eq!(request.headers, None);
        assert_eq!(request.payload, None);
    }

    #[test]
    fn test_headers_and_query() {
        let cli = parse(&[
            "-H",
            "Accept: application/json",
            "--header",
            "X-Trace:abc",
            "-q",
            "page=2",
            "--query",
            "q=a b",
            "https://x/y",
        ])
        .unwrap();
        let request = cli.to_request();

        let headers = request.headers.clone().unwrap();
        assert_eq!(headers.get("Accept").map(String::as_str), Some("application/json"));
        assert_eq!(headers.get("X-Trace").map(String::as_str), Some("abc"));
        assert_eq!(
            request.full_url().unwrap().as_str(),
            "https://x/y?page=2&q=a+b"
        );
    }

    #[test]
    fn test_body_with_method() {
        let cli = parse(&["-X", "put", "-d", r#"{"a":1}"#, "https://x/y"]).unwrap();
        let request = cli.to_request();

        assert_eq!(request.method, HttpMethod::Put);
        let body = request.body().unwrap();
        assert_eq!(body.content, r#"{"a":1}"#);
        assert_eq!(
            body.content_type,
            Some(RequestPayload::CONTENT_TYPE_APPLICATION_JSON)
        );
    }

    #[test]
    fn test_custom_content_type() {
        let cli = parse(&[
            "-X",
            "POST",
            "-d",
            "<a/>",
            "--content-type",
            "text/xml",
            "https://x/y",
        ])
        .unwrap();
        assert_eq!(cli.to_request().body().unwrap().content_type, Some("text/xml"));
    }

    #[test]
    fn test_parse_header_errors() {
        assert_eq!(
            parse_header(" : v"),
            Err(DomainError::InvalidHeader("empty name in ` : v`".to_string()))
        );
        assert_eq!(
            parse_header("X-A: b:c"),
            Ok(("X-A".to_string(), "b:c".to_string()))
        );
    }

    #[test]
    fn test_rejects_malformed_arguments() {
        assert!(parse(&[]).is_err());
        assert!(parse(&["-H", "no-colon", "https://x/y"]).is_err());
        assert!(parse(&["-q", "=v", "https://x/y"]).is_err());
        assert!(parse(&["-X", "TRACE", "https://x/y"]).is_err());
        assert!(parse(&["-q", "a=1", "-d", "{}", "https://x/y"]).is_err());
    }
}
