//! Line-oriented command driver.
//!
//! Each input line is one interaction event fed into a [`Storefront`]
//! session. The result of a command is the markup the user asked to see, a
//! cart summary, or a short message.

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use bookstore_core::{BookId, Price};
use serde::Serialize;
use thiserror::Error;

use crate::app::Storefront;
use crate::cart::{Cart, RemoveOutcome};
use crate::catalog::CategoryFilter;
use crate::dom::{DomError, Selector};
use crate::error::Result;
use crate::router::ClickOutcome;
use crate::views::containers;

/// Errors produced while parsing a command line.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseCommandError {
    #[error("Empty command")]
    Empty,

    #[error("Unknown command '{0}'")]
    Unknown(String),

    #[error("Command '{0}' needs an argument")]
    MissingArgument(&'static str),

    #[error("Invalid book id '{input}': {source}")]
    InvalidBookId {
        input: String,
        #[source]
        source: ParseIntError,
    },
}

/// A single shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Click a link with this href.
    Click(String),
    Back,
    Forward,
    /// Open a book's detail page.
    Book(BookId),
    Add(BookId),
    Remove(BookId),
    Filter(CategoryFilter),
    /// Print the markup of one element, or the whole document.
    Show(Option<String>),
    Cart,
    Quit,
}

impl FromStr for Command {
    type Err = ParseCommandError;

    fn from_str(line: &str) -> std::result::Result<Self, Self::Err> {
        let line = line.trim();
        let (name, arg) = match line.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, Some(arg.trim()).filter(|arg| !arg.is_empty())),
            None => (line, None),
        };

        let required = |command: &'static str| arg.ok_or(ParseCommandError::MissingArgument(command));
        let book_id = |command: &'static str| {
            let input = required(command)?;
            input
                .parse::<BookId>()
                .map_err(|source| ParseCommandError::InvalidBookId {
                    input: input.to_string(),
                    source,
                })
        };

        match name {
            "" => Err(ParseCommandError::Empty),
            "click" => Ok(Self::Click(required("click")?.to_string())),
            "back" => Ok(Self::Back),
            "forward" => Ok(Self::Forward),
            "book" => Ok(Self::Book(book_id("book")?)),
            "add" => Ok(Self::Add(book_id("add")?)),
            "remove" => Ok(Self::Remove(book_id("remove")?)),
            "filter" => {
                let filter = required("filter")?;
                Ok(Self::Filter(filter.parse().unwrap_or_default()))
            }
            "show" => Ok(Self::Show(arg.map(str::to_string))),
            "cart" => Ok(Self::Cart),
            "quit" | "exit" => Ok(Self::Quit),
            other => Err(ParseCommandError::Unknown(other.to_string())),
        }
    }
}

/// One cart line as printed by the `cart` command.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSummaryLine {
    pub book_id: BookId,
    pub title: String,
    pub quantity: u32,
    pub total: Price,
}

/// Cart contents as printed by the `cart` command.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSummary {
    pub item_count: u32,
    pub total: Price,
    pub lines: Vec<CartSummaryLine>,
}

impl From<&Cart> for CartSummary {
    fn from(cart: &Cart) -> Self {
        Self {
            item_count: cart.item_count(),
            total: cart.total(),
            lines: cart
                .lines()
                .iter()
                .map(|line| CartSummaryLine {
                    book_id: line.book_id(),
                    title: line.book().title.clone(),
                    quantity: line.quantity(),
                    total: line.total(),
                })
                .collect(),
        }
    }
}

/// What a command produced.
#[derive(Debug, Clone)]
pub enum Output {
    Markup(String),
    Summary(CartSummary),
    Message(String),
    Quit,
}

impl fmt::Display for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Markup(html) | Self::Message(html) => f.write_str(html),
            Self::Summary(summary) => {
                let json = serde_json::to_string_pretty(summary).map_err(|_| fmt::Error)?;
                f.write_str(&json)
            }
            Self::Quit => Ok(()),
        }
    }
}

/// Run one command against the session.
///
/// # Errors
///
/// Returns an error if the underlying storefront operation fails, or if a
/// `show` selector matches nothing.
pub async fn execute(storefront: &mut Storefront, command: Command) -> Result<Output> {
    let output = match command {
        Command::Click(href) => match storefront.handle_click(Some(href.as_str())).await? {
            ClickOutcome::Native => Output::Message(format!("Not handled in-app: {href}")),
            ClickOutcome::SoftNavigate(_) => main_markup(storefront)?,
        },
        Command::Back => {
            if storefront.back().await? {
                main_markup(storefront)?
            } else {
                Output::Message("Already at the first page".to_string())
            }
        }
        Command::Forward => {
            if storefront.forward().await? {
                main_markup(storefront)?
            } else {
                Output::Message("Already at the last page".to_string())
            }
        }
        Command::Book(id) => {
            storefront.open_book(id).await?;
            main_markup(storefront)?
        }
        Command::Add(id) => {
            storefront.add_to_cart(id)?;
            Output::Summary(CartSummary::from(storefront.cart()))
        }
        Command::Remove(id) => {
            if storefront.remove_from_cart(id)? == RemoveOutcome::Missing {
                Output::Message(format!("Book {id} is not in the cart"))
            } else {
                Output::Summary(CartSummary::from(storefront.cart()))
            }
        }
        Command::Filter(filter) => {
            storefront.select_category(filter)?;
            markup(storefront, containers::BOOK_LIST)?
        }
        Command::Show(Some(selector)) => markup(storefront, &selector)?,
        Command::Show(None) => Output::Markup(storefront.document().html().to_string()),
        Command::Cart => Output::Summary(CartSummary::from(storefront.cart())),
        Command::Quit => Output::Quit,
    };
    Ok(output)
}

fn main_markup(storefront: &Storefront) -> Result<Output> {
    markup(storefront, containers::MAIN)
}

fn markup(storefront: &Storefront, selector: &str) -> Result<Output> {
    let selector = Selector::parse(selector);
    let html = storefront
        .document()
        .inner_html(&selector)
        .ok_or_else(|| DomError::NoMatch(selector.clone()))?;
    Ok(Output::Markup(html.trim().to_string()))
}
