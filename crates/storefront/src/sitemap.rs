//! Static sitemap of the storefront's public routes.
//!
//! Route parameters (`:id`, `:slug`) are stripped rather than expanded, so a
//! templated route contributes its prefix only.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

/// Routes listed in the sitemap, in output order.
pub const ROUTES: &[&str] = &[
    "/",
    "/login",
    "/register",
    "/shop",
    "/about",
    "/contact",
    "/cart",
    "/checkout",
    "/my-orders",
    "/product/:id",
    "/category/:slug",
];

static PARAM_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r":\w+").expect("Invalid regex"));

/// Remove `:param` segments from a route template.
///
/// ```
/// use sabriaz_storefront::sitemap::clean_route;
///
/// assert_eq!(clean_route("/product/:id"), "/product/");
/// assert_eq!(clean_route("/shop"), "/shop");
/// ```
#[must_use]
pub fn clean_route(route: &str) -> String {
    PARAM_RE.replace_all(route, "").into_owned()
}

/// Render the sitemap XML for `domain` (scheme and host, no trailing slash
/// needed).
#[must_use]
pub fn render(domain: &str, routes: &[&str]) -> String {
    let domain = domain.trim_end_matches('/');

    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">",
    );
    for route in routes {
        xml.push_str(&format!(
            "\n  <url>\n    <loc>{domain}{}</loc>\n    <changefreq>weekly</changefreq>\n  </url>",
            clean_route(route)
        ));
    }
    xml.push_str("\n</urlset>");
    xml.trim().to_string()
}

/// Render the sitemap and write it to `path`, creating parent directories.
///
/// # Errors
///
/// Returns an I/O error if the file cannot be written.
pub fn write(path: &Path, domain: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, render(domain, ROUTES))?;
    tracing::info!(path = %path.display(), routes = ROUTES.len(), "Sitemap written");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_render_exact_format() {
        let xml = render("https://sabriaz.com/", &["/", "/product/:id"]);
        let expected = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>
<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">
  <url>
    <loc>https://sabriaz.com/</loc>
    <changefreq>weekly</changefreq>
  </url>
  <url>
    <loc>https://sabriaz.com/product/</loc>
    <changefreq>weekly</changefreq>
  </url>
</urlset>";
        assert_eq!(xml, expected);
    }

    #[test]
    fn test_all_params_stripped() {
        assert_eq!(clean_route("/category/:slug"), "/category/");
        assert_eq!(clean_route("/a/:x/b/:y"), "/a//b/");
        let xml = render("https://sabriaz.com", ROUTES);
        assert!(!xml.contains("/:"));
        assert_eq!(xml.matches("<url>").count(), ROUTES.len());
    }

    #[test]
    fn test_write_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("public").join("sitemap.xml");
        write(&path, "https://sabriaz.com").unwrap();
        let xml = std::fs::read_to_string(path).unwrap();
        assert!(xml.ends_with("</urlset>"));
        assert!(xml.contains("<loc>https://sabriaz.com/my-orders</loc>"));
    }
}
