//! Shared fixtures for database integration tests.
//!
//! Tests connect to `DATABASE_URL` (or `MOSTRADOR__DATABASE__URL`) and skip
//! themselves when neither is set or the database is unreachable.

#![allow(dead_code)]

use std::env;

use mostrador_core::sales::{PaymentMethod, PaymentRequest};
use mostrador_db::migration::{Migrator, MigratorTrait};
use mostrador_db::repositories::{
    CreateCustomerInput, CreateProductInput, CreateSaleInput, CustomerRepository,
    CustomerWithAccount, ProductRepository, SaleItemInput,
};
use mostrador_shared::types::{ActorId, CustomerId, ProductId};
use rust_decimal::Decimal;
use sea_orm::{Database, DatabaseConnection};
use uuid::Uuid;

pub const ACTOR: ActorId = ActorId(1);

fn database_url() -> Option<String> {
    env::var("DATABASE_URL")
        .or_else(|_| env::var("MOSTRADOR__DATABASE__URL"))
        .ok()
}

/// Connects and migrates, or returns `None` to skip the test.
pub async fn test_db() -> Option<DatabaseConnection> {
    let Some(url) = database_url() else {
        eprintln!("Skipping test - DATABASE_URL not set");
        return None;
    };
    let db = match Database::connect(&url).await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("Skipping test - database not available: {}", e);
            return None;
        }
    };
    if let Err(e) = Migrator::up(&db, None).await {
        eprintln!("Skipping test - migration failed: {}", e);
        return None;
    }
    Some(db)
}

pub async fn create_customer(db: &DatabaseConnection, credit_limit: Decimal) -> CustomerWithAccount {
    CustomerRepository::new(db.clone())
        .create_customer(CreateCustomerInput {
            name: format!("Cliente {}", Uuid::new_v4()),
            phone: None,
            email: None,
            credit_limit,
        })
        .await
        .expect("customer should be created")
}

pub async fn create_product(db: &DatabaseConnection, price: Decimal, stock: i32) -> ProductId {
    let product = ProductRepository::new(db.clone())
        .create_product(CreateProductInput {
            sku: format!("SKU-{}", Uuid::new_v4()),
            name: "Cargador USB-C".to_string(),
            price,
            stock,
        })
        .await
        .expect("product should be created");
    ProductId::from_uuid(product.id)
}

pub fn customer_id(customer: &CustomerWithAccount) -> CustomerId {
    CustomerId::from_uuid(customer.customer.id)
}

pub fn single(method: PaymentMethod, amount: Decimal) -> PaymentRequest {
    PaymentRequest {
        method,
        amount,
        mixed: None,
    }
}

/// A one-line sale of `quantity` units, no discount or tax.
pub fn sale_input(
    customer_id: Option<CustomerId>,
    product_id: ProductId,
    quantity: i32,
    payment: PaymentRequest,
) -> CreateSaleInput {
    CreateSaleInput {
        customer_id,
        items: vec![SaleItemInput {
            product_id,
            quantity,
            discount: Decimal::ZERO,
        }],
        discount_amount: Decimal::ZERO,
        tax_rate: Decimal::ZERO,
        payment,
        notes: None,
        sale_date: None,
        actor: ACTOR,
    }
}
