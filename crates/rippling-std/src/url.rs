use crate::style::Style;
use url::Url;

/// Strips any userinfo from a URL before it is shown to a user.
fn sanitize_url(url: &str) -> Option<String> {
    Url::parse(url).ok().and_then(|mut parsed_url| {
        if (parsed_url.username() != "" && parsed_url.set_username("").is_err())
            || parsed_url.set_password(None).is_err()
        {
            None
        } else {
            Some(parsed_url.to_string())
        }
    })
}

pub fn hyperlink(url: &str) -> String {
    let sanitized_url = sanitize_url(url).unwrap_or_else(|| url.to_string());
    Style::Link.paint(sanitized_url)
}
