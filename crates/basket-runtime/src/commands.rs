//! # Host Commands
//!
//! Line commands the `basket` host reads from stdin and applies to its
//! cart. Each mutating command publishes one snapshot.
//!
//! ## Command Set
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    basket> _                                            │
//! │                                                                         │
//! │  add <sku> <price> [qty] [name..]   Cart::add (qty default 1)           │
//! │  inc <sku> | inc #<index>           Cart::increment / increment_at      │
//! │  dec <sku> | dec #<index>           Cart::decrement / decrement_at      │
//! │  rm <sku>  | rm #<index>            Cart::remove / remove_at            │
//! │  clean                              Cart::clean                         │
//! │  show                               log items and totals               │
//! │  save                               PersistentCart::persist            │
//! │                                                                         │
//! │  Product-keyed misses are logged and ignored; bad indices are errors.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::str::FromStr;

use basket_core::Cart;
use basket_store::KeyValueStore;
use tracing::{debug, info};

use crate::catalog::CatalogProduct;
use crate::error::{RuntimeError, RuntimeResult};
use crate::persistent::PersistentCart;

/// Which cart line a command refers to.
#[derive(Debug, Clone, PartialEq)]
pub enum LineRef {
    /// By product SKU.
    Sku(String),
    /// By position, written `#<index>`.
    Index(usize),
}

impl FromStr for LineRef {
    type Err = RuntimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.strip_prefix('#') {
            Some(index) => index
                .parse()
                .map(LineRef::Index)
                .map_err(|_| RuntimeError::InvalidCommand(format!("bad index '{}'", s))),
            None => Ok(LineRef::Sku(s.to_string())),
        }
    }
}

/// A parsed host command.
#[derive(Debug, Clone, PartialEq)]
pub enum CartCommand {
    Add {
        product: CatalogProduct,
        quantity: u32,
    },
    Increment(LineRef),
    Decrement(LineRef),
    Remove(LineRef),
    Clean,
    Show,
    Save,
}

impl FromStr for CartCommand {
    type Err = RuntimeError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let verb = words
            .next()
            .ok_or_else(|| RuntimeError::InvalidCommand("empty line".into()))?;

        let command = match verb.to_lowercase().as_str() {
            "add" => parse_add(words.by_ref())?,
            "inc" | "increment" => CartCommand::Increment(line_ref(words.next(), verb)?),
            "dec" | "decrement" => CartCommand::Decrement(line_ref(words.next(), verb)?),
            "rm" | "remove" => CartCommand::Remove(line_ref(words.next(), verb)?),
            "clean" | "clear" => CartCommand::Clean,
            "show" | "ls" => CartCommand::Show,
            "save" | "persist" => CartCommand::Save,
            other => {
                return Err(RuntimeError::InvalidCommand(format!(
                    "unknown command '{}'. Valid commands: add, inc, dec, rm, clean, show, save",
                    other
                )))
            }
        };

        Ok(command)
    }
}

fn line_ref(word: Option<&str>, verb: &str) -> RuntimeResult<LineRef> {
    word.ok_or_else(|| RuntimeError::InvalidCommand(format!("'{}' needs a sku or #index", verb)))?
        .parse()
}

fn parse_add<'a>(mut words: impl Iterator<Item = &'a str>) -> RuntimeResult<CartCommand> {
    let usage = || RuntimeError::InvalidCommand("usage: add <sku> <price> [qty] [name..]".into());

    let sku = words.next().ok_or_else(usage)?;
    let price: f64 = words
        .next()
        .and_then(|p| p.parse().ok())
        .ok_or_else(usage)?;

    let mut rest: Vec<&str> = words.collect();
    let quantity = match rest.first().and_then(|q| q.parse::<u32>().ok()) {
        Some(quantity) => {
            rest.remove(0);
            quantity
        }
        None => 1,
    };
    let name = if rest.is_empty() {
        sku.to_string()
    } else {
        rest.join(" ")
    };

    Ok(CartCommand::Add {
        product: CatalogProduct::new(sku, name, price),
        quantity,
    })
}

impl CartCommand {
    /// Applies the command to `cart`.
    pub async fn execute<S>(self, cart: &PersistentCart<CatalogProduct, S>) -> RuntimeResult<()>
    where
        S: KeyValueStore + 'static,
    {
        debug!(command = ?self, "Executing cart command");

        match self {
            CartCommand::Add { product, quantity } => {
                cart.with_cart_mut(|c| c.add(product, quantity))?;
            }
            CartCommand::Increment(LineRef::Index(index)) => {
                cart.with_cart_mut(|c| c.increment_at(index))?;
            }
            CartCommand::Increment(LineRef::Sku(sku)) => {
                let product = CatalogProduct::with_sku(sku);
                if !cart.with_cart_mut(|c| c.increment(&product))? {
                    info!(sku = %product.sku, "Not in cart");
                }
            }
            CartCommand::Decrement(LineRef::Index(index)) => {
                cart.with_cart_mut(|c| c.decrement_at(index))?;
            }
            CartCommand::Decrement(LineRef::Sku(sku)) => {
                let product = CatalogProduct::with_sku(sku);
                if !cart.with_cart_mut(|c| c.decrement(&product)) {
                    info!(sku = %product.sku, "Not in cart");
                }
            }
            CartCommand::Remove(LineRef::Index(index)) => {
                cart.with_cart_mut(|c| c.remove_at(index))?;
            }
            CartCommand::Remove(LineRef::Sku(sku)) => {
                let product = CatalogProduct::with_sku(sku);
                if cart.with_cart_mut(|c| c.remove(&product)).is_none() {
                    info!(sku = %product.sku, "Not in cart");
                }
            }
            CartCommand::Clean => cart.with_cart_mut(Cart::clean),
            CartCommand::Show => cart.with_cart(log_cart),
            CartCommand::Save => {
                cart.persist().await;
            }
        }

        Ok(())
    }
}

fn log_cart(cart: &Cart<CatalogProduct>) {
    for (index, item) in cart.items().iter().enumerate() {
        info!(
            index,
            sku = %item.product.sku,
            name = %item.product.name,
            quantity = item.quantity,
            line_amount = item.line_amount(),
            "Cart line"
        );
    }
    info!(
        lines = cart.count(),
        units = cart.count_quantities(),
        amount = cart.amount(),
        "Cart totals"
    );
}
