//! Domain matching between an annotated page and candidate owner emails.
//!
//! A reply-to address only receives the notification when its domain equals
//! the page's host with any leading `www.` removed.

use url::Url;

/// Domain of the annotated page.
///
/// Uses the URL host when there is one; URIs without a host (or that do not
/// parse as absolute URLs) fall back to the leading path segment.
pub fn page_domain(uri: &str) -> Option<String> {
    let domain = match Url::parse(uri) {
        Ok(url) => match url.host_str() {
            Some(host) if !host.is_empty() => host.to_ascii_lowercase(),
            _ => leading_segment(url.path())?,
        },
        Err(_) => leading_segment(uri)?,
    };

    let domain = domain.strip_prefix("www.").unwrap_or(&domain).to_string();
    if domain.is_empty() { None } else { Some(domain) }
}

fn leading_segment(path: &str) -> Option<String> {
    let segment = path.trim().trim_start_matches('/').split('/').next()?;
    if segment.is_empty() {
        None
    } else {
        Some(segment.to_ascii_lowercase())
    }
}

/// Everything after the last `@`, or the whole string when there is none.
pub fn email_domain(email: &str) -> &str {
    email.rsplit('@').next().unwrap_or(email)
}

pub fn matches(page_domain: &str, email: &str) -> bool {
    email_domain(email.trim()).eq_ignore_ascii_case(page_domain)
}

/// The subset of `emails` whose domain matches the page at `uri`, in order.
pub fn matching_recipients(uri: &str, emails: &[String]) -> Vec<String> {
    let Some(domain) = page_domain(uri) else {
        tracing::warn!(uri, "Could not determine page domain");
        return Vec::new();
    };

    emails
        .iter()
        .filter(|email| matches(&domain, email))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_domain_strips_www() {
        assert_eq!(
            page_domain("http://www.example.com/blog/post").as_deref(),
            Some("example.com")
        );
        assert_eq!(
            page_domain("https://blog.example.com/").as_deref(),
            Some("blog.example.com")
        );
    }

    #[test]
    fn test_page_domain_lowercases_host() {
        assert_eq!(
            page_domain("HTTPS://WWW.Example.COM/Path").as_deref(),
            Some("example.com")
        );
    }

    #[test]
    fn test_page_domain_without_host_falls_back_to_path() {
        assert_eq!(page_domain("example.com/page").as_deref(), Some("example.com"));
        assert_eq!(page_domain("www.example.com").as_deref(), Some("example.com"));
        assert_eq!(page_domain("urn:example.org").as_deref(), Some("example.org"));
    }

    #[test]
    fn test_page_domain_empty() {
        assert_eq!(page_domain(""), None);
        assert_eq!(page_domain("www."), None);
    }

    #[test]
    fn test_email_domain() {
        assert_eq!(email_domain("owner@example.com"), "example.com");
        assert_eq!(email_domain("weird@name@example.com"), "example.com");
        assert_eq!(email_domain("example.com"), "example.com");
    }

    #[test]
    fn test_matches_is_exact_domain() {
        assert!(matches("example.com", "owner@example.com"));
        assert!(matches("example.com", "Owner@EXAMPLE.com"));
        assert!(!matches("example.com", "owner@mail.example.com"));
        assert!(!matches("example.com", "owner@example.org"));
    }

    #[test]
    fn test_matching_recipients_filters_in_order() {
        let emails = vec![
            "owner@example.com".to_string(),
            "spam@evil.test".to_string(),
            "editor@example.com".to_string(),
        ];
        assert_eq!(
            matching_recipients("http://www.example.com/post", &emails),
            vec!["owner@example.com", "editor@example.com"]
        );
    }

    #[test]
    fn test_matching_recipients_unknown_domain() {
        let emails = vec!["owner@example.com".to_string()];
        assert!(matching_recipients("", &emails).is_empty());
    }
}
