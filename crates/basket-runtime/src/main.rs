//! # basket
//!
//! Headless host for a persistent cart. Restores the cart on start, applies
//! line commands from stdin (see [`CartCommand`]), logs every snapshot the
//! cart publishes, and persists on Ctrl-C or end of input, which it treats
//! as the host resigning active.

use basket_runtime::{
    init_tracing, open_store, BasketConfig, CartCommand, CatalogProduct, LifecycleEvent,
    LifecycleSignal, PersistentCart, RuntimeResult,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    init_tracing();

    if let Err(e) = run().await {
        error!(error = %e, "basket host failed");
        std::process::exit(1);
    }
}

async fn run() -> RuntimeResult<()> {
    let config = BasketConfig::load_or_default(None);
    info!(
        backend = %config.storage.backend,
        key = %config.storage.snapshot_key,
        "Starting basket host"
    );

    let store = open_store(&config.storage).await?;
    let signal = LifecycleSignal::new();

    let cart = PersistentCart::<CatalogProduct, _>::open_with_capacity(
        store,
        config.storage.snapshot_key.clone(),
        config.feed.capacity,
    )
    .await;
    let listener = cart.attach(&signal);

    cart.with_cart(|c| {
        info!(
            lines = c.count(),
            units = c.count_quantities(),
            amount = c.amount(),
            "Cart restored"
        );
    });

    let mut snapshots = cart.subscribe();
    let watcher = tokio::spawn(async move {
        while let Some(items) = snapshots.recv().await {
            let amount: f64 = items.iter().map(|item| item.line_amount()).sum();
            info!(lines = items.len(), amount, "Cart changed");
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => match line {
                Ok(Some(line)) if line.trim().is_empty() => {}
                Ok(Some(line)) => match line.parse::<CartCommand>() {
                    Ok(command) => {
                        if let Err(e) = command.execute(&cart).await {
                            warn!(error = %e, "Command failed");
                        }
                    }
                    Err(e) => warn!(error = %e, "Command rejected"),
                },
                Ok(None) => break,
                Err(e) => {
                    error!(error = %e, "Failed to read stdin");
                    break;
                }
            },
            interrupted = tokio::signal::ctrl_c() => {
                if let Err(e) = interrupted {
                    error!(error = %e, "Failed to listen for Ctrl-C, persisting now");
                }
                break;
            }
        }
    }

    signal.emit(LifecycleEvent::WillResignActive);
    drop(signal);
    if let Err(e) = listener.await {
        error!(error = %e, "Lifecycle listener panicked");
    }

    watcher.abort();
    info!("basket host stopped");
    Ok(())
}
