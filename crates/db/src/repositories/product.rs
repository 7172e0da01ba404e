//! Product repository and stock movements.
//!
//! Stock rows are locked in ascending id order so concurrent sales touching
//! the same products cannot deadlock.

use std::collections::{BTreeMap, HashMap};

use chrono::Utc;
use mostrador_core::sales::SaleError;
use mostrador_shared::types::{Money, ProductId};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use super::sale::SaleRepoError;
use crate::entities::products;

/// Input for creating a product.
#[derive(Debug, Clone)]
pub struct CreateProductInput {
    /// Unique stock-keeping code.
    pub sku: String,
    /// Display name.
    pub name: String,
    /// Unit price.
    pub price: Decimal,
    /// Units on hand.
    pub stock: i32,
}

/// Product repository.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    db: DatabaseConnection,
}

impl ProductRepository {
    /// Creates a new product repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the price or stock is negative, or the SKU exists.
    pub async fn create_product(
        &self,
        input: CreateProductInput,
    ) -> Result<products::Model, SaleRepoError> {
        let price = Money::non_negative(input.price)?;
        let product_id = ProductId::new();
        if input.stock < 0 {
            return Err(SaleError::InvalidQuantity(product_id).into());
        }

        let now = Utc::now().into();
        let product = products::ActiveModel {
            id: Set(product_id.into_inner()),
            sku: Set(input.sku),
            name: Set(input.name),
            price: Set(price.amount()),
            stock: Set(input.stock),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;

        Ok(product)
    }

    /// Gets a product.
    ///
    /// # Errors
    ///
    /// Returns `ProductNotFound` if the product does not exist.
    pub async fn get_product(&self, product_id: ProductId) -> Result<products::Model, SaleRepoError> {
        products::Entity::find_by_id(product_id.into_inner())
            .one(&self.db)
            .await?
            .ok_or_else(|| SaleError::ProductNotFound(product_id).into())
    }

    /// Takes `quantity` units out of stock.
    ///
    /// # Errors
    ///
    /// Returns `InsufficientStock` if fewer units are on hand.
    pub async fn decrement_stock(
        &self,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<products::Model, SaleRepoError> {
        let txn = self.db.begin().await?;
        let locked = lock_products(&txn, [product_id]).await?;
        let mut updated = decrement(&txn, &locked, &BTreeMap::from([(product_id, quantity)])).await?;
        txn.commit().await?;
        updated
            .pop()
            .ok_or_else(|| SaleError::ProductNotFound(product_id).into())
    }

    /// Puts `quantity` units back into stock.
    ///
    /// # Errors
    ///
    /// Returns `ProductNotFound` if the product does not exist.
    pub async fn restore_stock(
        &self,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<products::Model, SaleRepoError> {
        let txn = self.db.begin().await?;
        let locked = lock_products(&txn, [product_id]).await?;
        let mut updated = restore(&txn, &locked, &BTreeMap::from([(product_id, quantity)])).await?;
        txn.commit().await?;
        updated
            .pop()
            .ok_or_else(|| SaleError::ProductNotFound(product_id).into())
    }
}

/// Sums quantities per product.
///
/// Every line must carry a positive quantity; a sum that does not fit an
/// `i32` is rejected as an invalid quantity.
pub(crate) fn merge_quantities<I>(lines: I) -> Result<BTreeMap<ProductId, i32>, SaleError>
where
    I: IntoIterator<Item = (ProductId, i32)>,
{
    let mut merged = BTreeMap::new();
    for (product_id, quantity) in lines {
        if quantity <= 0 {
            return Err(SaleError::InvalidQuantity(product_id));
        }
        let total: &mut i32 = merged.entry(product_id).or_insert(0);
        *total = total
            .checked_add(quantity)
            .ok_or(SaleError::InvalidQuantity(product_id))?;
    }
    Ok(merged)
}

/// Locks the given products, in id order, until the transaction ends.
pub(crate) async fn lock_products<C, I>(
    conn: &C,
    product_ids: I,
) -> Result<HashMap<Uuid, products::Model>, SaleRepoError>
where
    C: ConnectionTrait,
    I: IntoIterator<Item = ProductId>,
{
    let ids: Vec<ProductId> = product_ids.into_iter().collect();
    let rows = products::Entity::find()
        .filter(products::Column::Id.is_in(ids.iter().map(|id| id.into_inner())))
        .order_by_asc(products::Column::Id)
        .lock_exclusive()
        .all(conn)
        .await?;

    let found: HashMap<Uuid, products::Model> = rows.into_iter().map(|p| (p.id, p)).collect();
    if let Some(missing) = ids.iter().find(|id| !found.contains_key(&id.into_inner())) {
        return Err(SaleError::ProductNotFound(*missing).into());
    }
    Ok(found)
}

/// Checks that every requested quantity is on hand.
pub(crate) fn check_stock(
    locked: &HashMap<Uuid, products::Model>,
    requested: &BTreeMap<ProductId, i32>,
) -> Result<(), SaleError> {
    for (product_id, quantity) in requested {
        if *quantity <= 0 {
            return Err(SaleError::InvalidQuantity(*product_id));
        }
        let product = locked
            .get(&product_id.into_inner())
            .ok_or(SaleError::ProductNotFound(*product_id))?;
        if *quantity > product.stock {
            return Err(SaleError::InsufficientStock {
                product_id: *product_id,
                requested: *quantity,
                available: product.stock,
            });
        }
    }
    Ok(())
}

/// Decrements locked products' stock.
pub(crate) async fn decrement<C>(
    conn: &C,
    locked: &HashMap<Uuid, products::Model>,
    requested: &BTreeMap<ProductId, i32>,
) -> Result<Vec<products::Model>, SaleRepoError>
where
    C: ConnectionTrait,
{
    check_stock(locked, requested)?;
    adjust(conn, locked, requested, i32::checked_sub).await
}

/// Restores locked products' stock.
pub(crate) async fn restore<C>(
    conn: &C,
    locked: &HashMap<Uuid, products::Model>,
    requested: &BTreeMap<ProductId, i32>,
) -> Result<Vec<products::Model>, SaleRepoError>
where
    C: ConnectionTrait,
{
    if let Some((product_id, _)) = requested.iter().find(|(_, quantity)| **quantity <= 0) {
        return Err(SaleError::InvalidQuantity(*product_id).into());
    }
    adjust(conn, locked, requested, i32::checked_add).await
}

async fn adjust<C, F>(
    conn: &C,
    locked: &HashMap<Uuid, products::Model>,
    requested: &BTreeMap<ProductId, i32>,
    apply: F,
) -> Result<Vec<products::Model>, SaleRepoError>
where
    C: ConnectionTrait,
    F: Fn(i32, i32) -> Option<i32>,
{
    let now = Utc::now();
    let mut updated = Vec::with_capacity(requested.len());
    for (product_id, quantity) in requested {
        let product = locked
            .get(&product_id.into_inner())
            .cloned()
            .ok_or(SaleError::ProductNotFound(*product_id))?;
        let stock =
            apply(product.stock, *quantity).ok_or(SaleError::InvalidQuantity(*product_id))?;
        let mut active = product.into_active_model();
        active.stock = Set(stock);
        active.updated_at = Set(now.into());
        updated.push(active.update(conn).await?);
    }
    Ok(updated)
}
