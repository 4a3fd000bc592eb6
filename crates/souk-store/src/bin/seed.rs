//! Demo data seeder.
//!
//! Populates a store with a small Moroccan-market catalog so the till
//! has something to sell on a fresh install or a demo machine.
//!
//! ```text
//! Usage: seed [OPTIONS]
//!
//! Options:
//!   --db <PATH>      Database file (default: souk.db)
//!   --count <N>      Number of products to generate (default: 12)
//!   --force          Seed even if products already exist
//!   -h, --help       Print this help
//! ```

use souk_core::{new_id, Customer, Money, Product, RollingStats, Supplier};
use souk_store::{SnapshotStore, SqliteStore, StoreConfig, StoreKey};

const DEFAULT_DB: &str = "souk.db";
const DEFAULT_COUNT: usize = 12;

/// Base catalog: (name, category, price cents, cost cents, supplier slot).
const CATALOG: &[(&str, &str, i64, i64, usize)] = &[
    ("Couscous 1kg", "grocery", 2200, 1500, 0),
    ("Thé vert Gunpowder 200g", "grocery", 3500, 2400, 0),
    ("Olives vertes 500g", "grocery", 1800, 1100, 0),
    ("Harissa 140g", "grocery", 1200, 700, 0),
    ("Dattes Medjool 1kg", "grocery", 9500, 7000, 0),
    ("Eau minérale 1.5L", "beverages", 600, 350, 0),
    ("Huile d'argan 250ml", "cosmetics", 14500, 9800, 1),
    ("Savon noir 250g", "cosmetics", 2500, 1400, 1),
    ("Amlou 200g", "grocery", 6500, 4300, 1),
    ("Miel d'euphorbe 500g", "grocery", 12000, 8500, 1),
    ("Lait 1L", "dairy", 750, 520, 2),
    ("Raïb vanille 450ml", "dairy", 950, 640, 2),
];

/// Log levels: `RUST_LOG=debug` shows store internals, default INFO.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn print_usage() {
    println!("Seed a Souk database with demo data");
    println!();
    println!("Usage: seed [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --db <PATH>      Database file (default: {})", DEFAULT_DB);
    println!("  --count <N>      Number of products (default: {})", DEFAULT_COUNT);
    println!("  --force          Seed even if products already exist");
    println!("  -h, --help       Print this help");
}

fn demo_suppliers() -> Vec<Supplier> {
    vec![
        Supplier {
            id: new_id(),
            name: "Atlas Distribution".to_string(),
            phone: "0522-448-120".to_string(),
            product_type: "Épicerie générale".to_string(),
        },
        Supplier {
            id: new_id(),
            name: "Coopérative Argania".to_string(),
            phone: "0528-821-733".to_string(),
            product_type: "Produits du terroir".to_string(),
        },
        Supplier {
            id: new_id(),
            name: "Laiterie Centrale".to_string(),
            phone: "0523-317-045".to_string(),
            product_type: "Produits laitiers".to_string(),
        },
    ]
}

fn demo_products(count: usize, suppliers: &[Supplier]) -> Vec<Product> {
    (0..count)
        .map(|i| {
            let (name, category, price, cost, slot) = CATALOG[i % CATALOG.len()];
            let name = if i < CATALOG.len() {
                name.to_string()
            } else {
                format!("{} #{}", name, i / CATALOG.len() + 1)
            };
            Product {
                id: new_id(),
                name,
                barcode: format!("611{:010}", i + 1),
                price: Money::from_cents(price),
                cost: Money::from_cents(cost),
                stock: 10 + ((i as i64 * 7) % 40),
                min_stock: 5,
                category: category.to_string(),
                supplier_id: suppliers[slot % suppliers.len()].id.clone(),
                image: None,
                sales_stats: RollingStats::default(),
            }
        })
        .collect()
}

fn demo_customers() -> Vec<Customer> {
    [
        ("Fatima Zahra Alaoui", "0661-204-318"),
        ("Youssef El Amrani", "0662-775-901"),
        ("Khadija Bennani", "0663-412-587"),
        ("Omar Tazi", "0664-098-226"),
        ("Salma Idrissi", "0665-530-774"),
    ]
    .into_iter()
    .map(|(name, phone)| Customer {
        id: new_id(),
        name: name.to_string(),
        phone: phone.to_string(),
        email: String::new(),
        address: None,
        points: 0,
        points_remainder: 0,
        total_spent: Money::zero(),
        vouchers_used: 0,
        notes: None,
        last_visit: None,
        created_at: chrono::Utc::now(),
        visit_stats: RollingStats::default(),
    })
    .collect()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();
    let mut db_path = DEFAULT_DB.to_string();
    let mut count = DEFAULT_COUNT;
    let mut force = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" => {
                i += 1;
                db_path = args
                    .get(i)
                    .ok_or("--db requires a path")?
                    .clone();
            }
            "--count" => {
                i += 1;
                count = args
                    .get(i)
                    .ok_or("--count requires a number")?
                    .parse()?;
            }
            "--force" => force = true,
            "-h" | "--help" => {
                print_usage();
                return Ok(());
            }
            other => {
                eprintln!("Unknown option: {}", other);
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    println!("🌱 Seeding {} ...", db_path);

    let store = SqliteStore::new(StoreConfig::new(&db_path)).await?;

    if !force && store.get_raw(StoreKey::Products).await?.is_some() {
        println!("⚠ Database already has products; use --force to overwrite");
        store.close().await;
        return Ok(());
    }

    let suppliers = demo_suppliers();
    let products = demo_products(count, &suppliers);
    let customers = demo_customers();

    store.save_suppliers(&suppliers).await?;
    println!("   ✓ {} suppliers", suppliers.len());

    store.save_products(&products).await?;
    println!("   ✓ {} products", products.len());

    store.save_customers(&customers).await?;
    println!("   ✓ {} customers", customers.len());

    store.close().await;
    println!("✓ Done");
    Ok(())
}
