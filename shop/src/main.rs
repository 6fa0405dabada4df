//! Shop demo binary
//!
//! Walks through a whole shopping session against the in-memory repositories:
//! categories, catalog browsing, search, cart, checkout and confirmation.

use anyhow::Context;
use cartflow_shop::slices::{CartAction, OrderAction, ProductAction, cart, product};
use cartflow_shop::{
    AppAction, OrderSummary, ShippingForm, ShopConfig, ShopStore, in_memory_store, place_order,
};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const WAIT: Duration = Duration::from_secs(10);

/// Send `action` and wait until the effects it started are done
async fn settle(store: &ShopStore, action: AppAction) -> anyhow::Result<()> {
    let mut handle = store.send(action).await?;
    if handle.wait_with_timeout(WAIT).await.is_err() {
        tracing::warn!(timeout = ?WAIT, "Effects still running");
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cartflow_shop=debug,cartflow_runtime=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let metrics = PrometheusBuilder::new()
        .install_recorder()
        .context("installing the metrics recorder")?;

    let config = ShopConfig::from_env().context("loading configuration")?;
    tracing::info!(
        user_id = %config.user_id,
        catalog_size = config.catalog_size,
        latency = ?config.latency,
        "Configuration loaded"
    );

    println!("=== Cartflow Shop ===\n");

    let store = in_memory_store(&config);
    store.subscribe(|state| {
        tracing::trace!(
            products = state.products.products.len(),
            cart_items = cart::total_items(&state.cart),
            "State changed"
        );
    });

    // Home screen
    settle(&store, ProductAction::FetchCategories.into()).await?;
    settle(&store, ProductAction::FetchFeatured { limit: config.featured_limit }.into()).await?;

    let (categories, featured) = store
        .state(|s| (s.products.categories.clone(), product::featured(&s.products).to_vec()))
        .await;
    println!("Categories: {}", categories.join(", "));
    println!("Featured:");
    for item in &featured {
        println!("  {:<32} {:>9}  ★ {:.1}", item.name, item.price.to_string(), item.rating);
    }

    // Catalog, first page
    settle(&store, ProductAction::FetchProductsStart.into()).await?;
    let pagination = store.state(|s| *product::pagination(&s.products)).await;
    println!(
        "\nCatalog: {} products, page {} of {}",
        pagination.total, pagination.page, pagination.total_pages
    );

    // Search
    store.send(ProductAction::SetSearchQuery("wa".to_string()).into()).await?;
    settle(&store, ProductAction::FetchProductsStart.into()).await?;
    let found = store.state(|s| product::products(&s.products).to_vec()).await;
    println!("\nSearch \"wa\":");
    for item in &found {
        println!("  {:<32} {:>9}  ({} in stock)", item.name, item.price.to_string(), item.stock);
    }

    // Cart
    for (item, quantity) in found.iter().filter(|p| p.in_stock()).zip([2, 1]) {
        store
            .send(CartAction::AddToCart { product: item.clone(), quantity }.into())
            .await?;
    }
    let summary = store
        .state(|s| OrderSummary::from_cart(&s.cart, config.tax_rate_bps))
        .await;
    println!(
        "\nCart: {} item(s), subtotal {}, tax {}, total {}",
        summary.item_count, summary.subtotal, summary.tax, summary.total
    );

    // Checkout
    let form = ShippingForm {
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        email: "ada@example.com".to_string(),
        address: "12 Analytical Row".to_string(),
        city: "London".to_string(),
        postal_code: "N1 9GU".to_string(),
        country: "United Kingdom".to_string(),
    };
    let order = place_order(&store, &form, &config, WAIT).await?;

    println!("\nOrder confirmed: {}", order.id);
    println!(
        "  Ship to:   {}, {}",
        order.shipping_address.full_name(),
        order.shipping_address.city
    );
    println!("  Status:    {}", order.status);
    println!("  Payment:   {} ({})", order.payment_method, order.payment_status);
    println!("  Total:     {}", order.total);
    println!("  Delivery:  {}", order.estimated_delivery().format("%B %-d, %Y"));

    let history = store
        .environment()
        .orders
        .get_user_orders(&config.user_id)
        .await?;
    println!("  Orders on file for {}: {}", config.user_id, history.len());

    // Leave the confirmation screen
    store.send(OrderAction::ClearOrder.into()).await?;

    store.shutdown(store.config().default_shutdown_timeout).await?;

    println!("\n=== Store metrics ===");
    for line in metrics.render().lines().filter(|l| l.starts_with("store_")) {
        println!("{line}");
    }

    Ok(())
}
