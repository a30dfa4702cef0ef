pub mod http_client_factory;
pub mod transport;

/// Builds the full URL of an API route.
///
/// Routes are dispatched through `index.php?route=...` unless the caller
/// already passes an `index.php` path.
pub fn build_url(base_url: &str, route: &str) -> String {
    let base = base_url.trim_end_matches('/');
    let route = route.trim_start_matches('/');

    if route.starts_with("index.php") {
        return format!("{base}/{route}");
    }

    format!("{base}/index.php?route={route}")
}

/// Shortens a secret for log output.
pub fn token_preview(token: &str) -> String {
    let preview: String = token.chars().take(10).collect();
    format!("{preview}...")
}

#[cfg(test)]
mod tests {
    use super::{build_url, token_preview};

    #[test]
    fn routes_are_dispatched_through_index() {
        assert_eq!(
            "http://shop.local:8080/index.php?route=api/sale/cart",
            build_url("http://shop.local:8080/", "api/sale/cart")
        );
        assert_eq!(
            "http://shop.local/index.php?route=api/sale/cart.add",
            build_url("http://shop.local", "/api/sale/cart.add")
        );
    }

    #[test]
    fn index_paths_are_kept_verbatim() {
        assert_eq!(
            "http://shop.local/index.php?route=api/account/login&language=en-gb",
            build_url(
                "http://shop.local//",
                "index.php?route=api/account/login&language=en-gb"
            )
        );
    }

    #[test]
    fn token_preview_never_exceeds_ten_chars() {
        assert_eq!("0123456789...", token_preview("0123456789abcdef"));
        assert_eq!("abc...", token_preview("abc"));
    }
}
