//! Integration tests for the cart, the badge and the category filter.

use bookstore_core::{BookId, Price};
use bookstore_integration_tests::{FixtureSite, START_HTML, catalog_json};
use bookstore_storefront::cart::RemoveOutcome;
use bookstore_storefront::catalog::CategoryFilter;
use bookstore_storefront::dom::{DomError, Selector};
use bookstore_storefront::shell::{self, Command, Output};
use bookstore_storefront::{Storefront, StorefrontError};

fn inner(storefront: &Storefront, selector: &str) -> String {
    storefront
        .document()
        .inner_html(&Selector::parse(selector))
        .unwrap_or_else(|| panic!("{selector} is present"))
        .trim()
        .to_string()
}

#[tokio::test]
async fn test_add_updates_badge_and_cart_page() {
    let site = FixtureSite::start().await;
    let mut storefront = site.boot().await;
    assert_eq!(inner(&storefront, ".badge"), "0");

    assert_eq!(storefront.add_to_cart(BookId::new(1)).expect("add"), 1);
    assert_eq!(storefront.add_to_cart(BookId::new(1)).expect("add"), 2);
    assert_eq!(storefront.add_to_cart(BookId::new(2)).expect("add"), 1);
    assert_eq!(inner(&storefront, ".badge"), "3");

    storefront
        .handle_click(Some("/shopping-cart"))
        .await
        .expect("cart loads");
    let rows = inner(&storefront, "#cart-list");
    assert_eq!(rows.matches("<tr").count(), 2);
    assert!(rows.contains("398 SEK"));
    assert_eq!(inner(&storefront, "#cart-total"), "<b>487 SEK</b>");
}

#[tokio::test]
async fn test_remove_decrements_then_deletes() {
    let site = FixtureSite::start().await;
    let mut storefront = site.boot().await;
    storefront.add_to_cart(BookId::new(1)).expect("add");
    storefront.add_to_cart(BookId::new(1)).expect("add");
    storefront.add_to_cart(BookId::new(2)).expect("add");
    storefront.navigate("/shopping-cart").await.expect("cart loads");

    let outcome = storefront.remove_from_cart(BookId::new(1)).expect("remove");
    assert_eq!(outcome, RemoveOutcome::Decremented);
    assert_eq!(inner(&storefront, "#cart-total"), "<b>288 SEK</b>");
    assert_eq!(inner(&storefront, ".badge"), "2");

    let outcome = storefront.remove_from_cart(BookId::new(2)).expect("remove");
    assert_eq!(outcome, RemoveOutcome::Removed);
    assert_eq!(inner(&storefront, "#cart-list").matches("<tr").count(), 1);
    assert_eq!(inner(&storefront, ".badge"), "1");

    let outcome = storefront.remove_from_cart(BookId::new(2)).expect("remove");
    assert_eq!(outcome, RemoveOutcome::Missing);
    assert_eq!(storefront.cart().total(), Price::from_units(199));
}

#[tokio::test]
async fn test_remove_outside_cart_page_only_updates_badge() {
    let site = FixtureSite::start().await;
    let mut storefront = site.boot().await;
    storefront.add_to_cart(BookId::new(3)).expect("add");

    storefront.remove_from_cart(BookId::new(3)).expect("remove on start page");
    assert!(storefront.cart().is_empty());
    assert_eq!(inner(&storefront, ".badge"), "0");
}

#[tokio::test]
async fn test_add_unknown_book_is_an_error() {
    let site = FixtureSite::start().await;
    let mut storefront = site.boot().await;

    let err = storefront
        .add_to_cart(BookId::new(42))
        .expect_err("book 42 is not in the catalog");
    assert!(matches!(err, StorefrontError::BookNotFound(id) if id == BookId::new(42)));
    assert!(storefront.cart().is_empty());
    assert_eq!(inner(&storefront, ".badge"), "0");
}

#[tokio::test]
async fn test_failed_badge_render_leaves_cart_unchanged() {
    let site = FixtureSite::empty().await;
    site.mount_html("/index.html", "<body><main></main></body>").await;
    site.mount_html("/html/pages/start.html", START_HTML).await;
    site.mount_catalog(catalog_json()).await;
    let mut storefront = site.boot().await;

    let err = storefront
        .add_to_cart(BookId::new(1))
        .expect_err("the document has no badge");
    assert!(matches!(
        err,
        StorefrontError::Dom(DomError::NoMatch(ref selector)) if selector.to_string() == ".badge"
    ));
    assert!(storefront.cart().is_empty());

    let err = storefront
        .remove_from_cart(BookId::new(1))
        .expect_err("the document has no badge");
    assert!(matches!(err, StorefrontError::Dom(_)));
    assert!(storefront.cart().is_empty());
}

#[tokio::test]
async fn test_cart_survives_navigation() {
    let site = FixtureSite::start().await;
    let mut storefront = site.boot().await;

    storefront.open_book(BookId::new(3)).await.expect("detail loads");
    storefront.add_to_cart(BookId::new(3)).expect("add from detail page");
    storefront.navigate("/about").await.expect("about loads");
    storefront.navigate("/").await.expect("start loads");

    assert_eq!(storefront.cart().item_count(), 1);
    assert_eq!(inner(&storefront, ".badge"), "1");
}

#[tokio::test]
async fn test_category_filter_and_reset_on_reload() {
    let site = FixtureSite::start().await;
    let mut storefront = site.boot().await;

    let shown = storefront
        .select_category(CategoryFilter::Category("Fiction".to_string()))
        .expect("filter");
    assert_eq!(shown, 2);
    let grid = inner(&storefront, "#book-list");
    assert!(grid.contains("Gösta Berlings saga"));
    assert!(!grid.contains("Fröken Julie"));

    let shown = storefront
        .select_category(CategoryFilter::Category("Poetry".to_string()))
        .expect("filter");
    assert_eq!(shown, 0);
    assert!(inner(&storefront, "#book-list").contains("catalog-empty"));

    storefront.navigate("/").await.expect("start reloads");
    assert_eq!(storefront.catalog().selected(), &CategoryFilter::All);
    assert_eq!(
        inner(&storefront, "#book-list")
            .matches(r#"data-action="open-book""#)
            .count(),
        3
    );
}

async fn run(storefront: &mut Storefront, line: &str) -> bookstore_storefront::Result<Output> {
    let command: Command = line.parse().expect("valid command");
    shell::execute(storefront, command).await
}

#[tokio::test]
async fn test_shell_session() {
    let site = FixtureSite::start().await;
    let mut storefront = site.boot().await;

    let Output::Markup(grid) = run(&mut storefront, "filter Drama").await.expect("filter") else {
        panic!("filter prints the grid");
    };
    assert!(grid.contains("Fröken Julie"));

    let Output::Summary(summary) = run(&mut storefront, "add 2").await.expect("add") else {
        panic!("add prints the cart");
    };
    assert_eq!(summary.item_count, 1);

    let Output::Markup(main) = run(&mut storefront, "click /shopping-cart").await.expect("click") else {
        panic!("click prints the page");
    };
    assert!(main.contains("Fröken Julie"));

    let Output::Message(message) = run(&mut storefront, "click https://example.com").await.expect("click") else {
        panic!("external click prints a message");
    };
    assert!(message.contains("https://example.com"));

    let output = run(&mut storefront, "cart").await.expect("cart");
    let json: serde_json::Value =
        serde_json::from_str(&output.to_string()).expect("cart summary is JSON");
    assert_eq!(json["itemCount"], 1);
    assert_eq!(json["lines"][0]["title"], "Fröken Julie");

    assert!(run(&mut storefront, "show #missing").await.is_err());
    assert!(matches!(run(&mut storefront, "quit").await.expect("quit"), Output::Quit));
}
