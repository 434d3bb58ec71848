//! Integration test support for the bookstore storefront.
//!
//! [`FixtureSite`] serves a small static bookstore from a `wiremock`
//! [`MockServer`]: an entry document with header and footer components, the
//! start, cart, book and about pages, and a three-book catalog.
//!
//! ```rust,ignore
//! let site = FixtureSite::start().await;
//! let storefront = site.boot().await;
//! assert!(storefront.document().html().contains("book-list"));
//! ```

use bookstore_storefront::{Storefront, StorefrontConfig};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Entry document. Carries a dev-server injection the fetcher must strip.
pub const ENTRY_HTML: &str = r#"<!doctype html>
<html>
<head>
  <title>Bookstore</title>
  <script type="module" src="/@vite/client"></script>
</head>
<body>
  <component src="/components/header"></component>
  <main></main>
  <component src="/components/footer"></component>
</body>
</html>
"#;

/// Header component; nests the navigation component.
pub const HEADER_HTML: &str = r#"
<header>
  <a href="/">Bookstore</a>
  <a href="/shopping-cart">Cart <span class="badge">0</span></a>
  <component src="/components/nav"></component>
</header>
"#;

pub const NAV_HTML: &str = r#"<nav><a href="/about">About</a> <a href="https://example.com/blog">Blog</a></nav>"#;

pub const FOOTER_HTML: &str = "<footer>Open every day</footer>";

pub const START_HTML: &str = r#"<h1>All books</h1>
<div class="filters"></div>
<div id="book-list" class="row"></div>
"#;

pub const CART_HTML: &str = r#"<h1>Shopping cart</h1>
<table><tbody id="cart-list"></tbody></table>
<p>Total: <span id="cart-total"></span></p>
"#;

pub const BOOK_HTML: &str = r#"<section id="book-detail"></section>
<a href="/">Back to all books</a>
"#;

pub const ABOUT_HTML: &str = "<h1>About us</h1><p>An independent bookshop.</p>";

/// The fixture catalog: two Fiction books around one Drama book.
#[must_use]
pub fn catalog_json() -> serde_json::Value {
    json!([
        {
            "id": 1,
            "title": "Nils Holgerssons underbara resa",
            "author": "Selma Lagerlöf",
            "category": "Fiction",
            "price": 199,
            "description": "A boy travels across Sweden on the back of a goose.",
            "imageUrl": "/images/nils.jpg"
        },
        {
            "id": 2,
            "title": "Fröken Julie",
            "author": "August Strindberg",
            "category": "Drama",
            "price": 89,
            "description": "A midsummer night in a count's kitchen.",
            "imageUrl": "/images/julie.jpg"
        },
        {
            "id": 3,
            "title": "Gösta Berlings saga",
            "author": "Selma Lagerlöf",
            "category": "Fiction",
            "price": "149.50",
            "description": "Cavaliers at Ekeby.",
            "imageUrl": "/images/gosta.jpg"
        }
    ])
}

/// A running fixture site.
pub struct FixtureSite {
    pub server: MockServer,
}

impl FixtureSite {
    /// Start a server with every fixture resource mounted.
    pub async fn start() -> Self {
        let site = Self::empty().await;
        site.mount_html("/index.html", ENTRY_HTML).await;
        site.mount_html("/html/components/header.html", HEADER_HTML).await;
        site.mount_html("/html/components/nav.html", NAV_HTML).await;
        site.mount_html("/html/components/footer.html", FOOTER_HTML).await;
        site.mount_html("/html/pages/start.html", START_HTML).await;
        site.mount_html("/html/pages/shopping-cart.html", CART_HTML).await;
        site.mount_html("/html/pages/book.html", BOOK_HTML).await;
        site.mount_html("/html/pages/about.html", ABOUT_HTML).await;
        site.mount_catalog(catalog_json()).await;
        site
    }

    /// Start a server with nothing mounted.
    pub async fn empty() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Serve `body` as HTML at `route`.
    pub async fn mount_html(&self, route: &str, body: &str) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(body)
                    .insert_header("content-type", "text/html; charset=utf-8"),
            )
            .mount(&self.server)
            .await;
    }

    /// Serve `catalog` at the default catalog path.
    pub async fn mount_catalog(&self, catalog: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path("/json/books.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(catalog))
            .mount(&self.server)
            .await;
    }

    /// Session configuration pointing at this site.
    ///
    /// # Panics
    ///
    /// Panics if the server URI is not a valid base URL.
    #[must_use]
    pub fn config(&self) -> StorefrontConfig {
        StorefrontConfig::for_base_url(&self.server.uri())
            .expect("mock server URI is a valid base URL")
    }

    /// Boot a session against this site.
    ///
    /// # Panics
    ///
    /// Panics if the boot fails.
    pub async fn boot(&self) -> Storefront {
        Storefront::boot(self.config())
            .await
            .expect("storefront boots against the fixture site")
    }

    /// Number of requests received for `route`.
    pub async fn hits(&self, route: &str) -> usize {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|request| request.url.path() == route)
            .count()
    }
}
