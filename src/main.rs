use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use omnistore::application::checkout::CheckoutCoordinator;
use omnistore::application::receipt::order_summary;
use omnistore::application::session::Session;
use omnistore::config::{CheckoutConfig, HandoffConfig};
use omnistore::domain::catalog::{CatalogItem, CategoryFilter, ProductId};
use omnistore::domain::ports::{CatalogStore, NotifierRef, SalesStore, SalesStoreRef};
use omnistore::domain::sale::ledger_revenue;
use omnistore::infrastructure::deep_link::DeepLinkNotifier;
use omnistore::infrastructure::in_memory::{InMemoryCatalogStore, InMemorySalesStore};
use omnistore::interfaces::csv::product_reader::ProductReader;
use omnistore::interfaces::csv::product_writer::ProductWriter;
use omnistore::interfaces::csv::sales_writer::SalesWriter;
use std::collections::HashMap;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List catalog products, newest first
    Products {
        /// Catalog CSV file
        #[arg(long)]
        catalog: PathBuf,

        /// Category slug, or "all"
        #[arg(long, default_value = "all")]
        category: CategoryFilter,
    },
    /// Fill a cart and check it out
    Checkout {
        /// Catalog CSV file
        #[arg(long)]
        catalog: PathBuf,

        /// Customer name recorded on the sale
        #[arg(long)]
        customer: String,

        /// Product id to add; repeat to add more units
        #[arg(long = "add", required = true)]
        add: Vec<u64>,

        /// Product id to remove from the cart before checking out
        #[arg(long = "remove")]
        remove: Vec<u64>,

        /// Phone number that receives the order summary
        #[arg(long, env = "OMNISTORE_NOTIFY_TO")]
        notify_to: Option<String>,

        /// Command used to open the notification link (e.g. xdg-open)
        #[arg(long, env = "OMNISTORE_OPENER")]
        opener: Option<String>,

        #[command(flatten)]
        storage: StorageArgs,
    },
    /// Print the sales ledger as CSV, newest first
    Sales {
        #[command(flatten)]
        storage: StorageArgs,
    },
}

#[derive(clap::Args)]
struct StorageArgs {
    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long, env = "OMNISTORE_DB_PATH")]
    db_path: Option<PathBuf>,
}

impl StorageArgs {
    fn sales_store(&self) -> Result<SalesStoreRef> {
        match &self.db_path {
            #[cfg(feature = "storage-rocksdb")]
            Some(db_path) => {
                let store = omnistore::infrastructure::rocksdb::RocksDBStore::open(db_path)
                    .into_diagnostic()?;
                Ok(Arc::new(store))
            }
            #[cfg(not(feature = "storage-rocksdb"))]
            Some(db_path) => {
                tracing::warn!(
                    db_path = %db_path.display(),
                    "persistent storage requested but the 'storage-rocksdb' feature is not enabled, falling back to in-memory storage"
                );
                Ok(Arc::new(InMemorySalesStore::new()))
            }
            None => Ok(Arc::new(InMemorySalesStore::new())),
        }
    }
}

/// Loads the catalog file, skipping rows that fail validation.
async fn load_catalog(path: &Path) -> Result<InMemoryCatalogStore> {
    let file = File::open(path).into_diagnostic()?;
    let catalog = InMemoryCatalogStore::new();
    for (row, product) in ProductReader::new(file).products().enumerate() {
        match product {
            Ok(product) => catalog.insert_product(product).await.into_diagnostic()?,
            Err(e) => tracing::error!(row = row + 1, error = %e, "skipping catalog row"),
        }
    }
    Ok(catalog)
}

#[tokio::main]
async fn main() -> Result<()> {
    omnistore::telemetry::init("info");
    let cli = Cli::parse();

    match cli.command {
        Command::Products { catalog, category } => {
            let catalog = load_catalog(&catalog).await?;
            let products = catalog.list_products(category).await.into_diagnostic()?;

            let stdout = io::stdout();
            let mut writer = ProductWriter::new(stdout.lock());
            writer.write_products(&products).into_diagnostic()?;
        }
        Command::Checkout {
            catalog,
            customer,
            add,
            remove,
            notify_to,
            opener,
            storage,
        } => {
            let catalog = load_catalog(&catalog).await?;
            let by_id: HashMap<ProductId, CatalogItem> = catalog
                .list_products(CategoryFilter::All)
                .await
                .into_diagnostic()?
                .into_iter()
                .map(|p| (p.id, p))
                .collect();

            let session = Session::new();
            let cart = session.cart();
            for id in add.into_iter().map(ProductId) {
                match by_id.get(&id) {
                    Some(product) => cart.add_item(product).await,
                    None => tracing::warn!(product = %id, "unknown product, not added"),
                }
            }
            for id in remove {
                cart.remove_item(ProductId(id)).await;
            }
            tracing::info!(
                session = %session.id(),
                lines = cart.len().await,
                units = cart.unit_count().await,
                total = %cart.total().await,
                "cart ready"
            );

            let notifier: NotifierRef = Arc::new(DeepLinkNotifier::new(HandoffConfig {
                opener,
                ..HandoffConfig::default()
            }));
            let config = notify_to.map(CheckoutConfig::with_notify_to).unwrap_or_default();
            let coordinator =
                CheckoutCoordinator::new(storage.sales_store()?, config).with_notifier(notifier);

            let receipt = coordinator.checkout(cart, &customer).await.into_diagnostic()?;
            if let Some(handoff) = receipt.handoff {
                // The sale is already recorded; only keep the process alive for the relay.
                if let Err(e) = handoff.await {
                    tracing::warn!(error = %e, "notification task ended abnormally");
                }
            }

            println!("{}", order_summary(&receipt.sale));
        }
        Command::Sales { storage } => {
            let sales = storage.sales_store()?.list_sales().await.into_diagnostic()?;
            tracing::info!(
                sales = sales.len(),
                revenue = %ledger_revenue(&sales),
                "sales ledger"
            );

            let stdout = io::stdout();
            let mut writer = SalesWriter::new(stdout.lock());
            writer.write_sales(&sales).into_diagnostic()?;
        }
    }

    Ok(())
}
