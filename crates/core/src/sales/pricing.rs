//! Sale pricing: line totals, discounts and tax.

use mostrador_shared::types::{Money, ProductId, round_money};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::SaleError;

/// A requested sale line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleLineInput {
    /// Product sold.
    pub product_id: ProductId,
    /// Units sold.
    pub quantity: i32,
    /// Price per unit.
    pub unit_price: Decimal,
    /// Absolute discount on the line.
    #[serde(default)]
    pub discount: Decimal,
}

/// A priced sale line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricedLine {
    /// Product sold.
    pub product_id: ProductId,
    /// Units sold.
    pub quantity: i32,
    /// Price per unit.
    pub unit_price: Decimal,
    /// Absolute discount on the line.
    pub discount: Decimal,
    /// `quantity * unit_price - discount`.
    pub line_total: Decimal,
}

/// Sale totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricedSale {
    /// Priced lines.
    pub lines: Vec<PricedLine>,
    /// Sum of line totals.
    pub subtotal: Decimal,
    /// Sale-level discount.
    pub discount_amount: Decimal,
    /// Tax rate in percent.
    pub tax_rate: Decimal,
    /// Tax on the discounted subtotal, rounded to cents.
    pub tax_amount: Decimal,
    /// Amount charged.
    pub total_amount: Decimal,
}

/// Prices a sale.
///
/// Line discounts apply first, the sale discount applies to the subtotal and
/// tax (percent) applies to what remains.
pub fn price_sale(
    lines: &[SaleLineInput],
    sale_discount: Decimal,
    tax_rate: Decimal,
) -> Result<PricedSale, SaleError> {
    if lines.is_empty() {
        return Err(SaleError::EmptySale);
    }
    if tax_rate < Decimal::ZERO || tax_rate > Decimal::ONE_HUNDRED {
        return Err(SaleError::InvalidTaxRate(tax_rate));
    }

    let mut priced = Vec::with_capacity(lines.len());
    for line in lines {
        if line.quantity <= 0 {
            return Err(SaleError::InvalidQuantity(line.product_id));
        }
        let unit_price = Money::non_negative(line.unit_price)?.amount();
        let discount = Money::non_negative(line.discount)?.amount();
        let gross = unit_price * Decimal::from(line.quantity);
        if discount > gross {
            return Err(SaleError::DiscountExceedsAmount {
                discount,
                amount: gross,
            });
        }
        priced.push(PricedLine {
            product_id: line.product_id,
            quantity: line.quantity,
            unit_price,
            discount,
            line_total: gross - discount,
        });
    }

    let subtotal: Decimal = priced.iter().map(|l| l.line_total).sum();
    let discount_amount = Money::non_negative(sale_discount)?.amount();
    if discount_amount > subtotal {
        return Err(SaleError::DiscountExceedsAmount {
            discount: discount_amount,
            amount: subtotal,
        });
    }

    let taxable = subtotal - discount_amount;
    let tax_amount = round_money(taxable * tax_rate / Decimal::ONE_HUNDRED);

    Ok(PricedSale {
        lines: priced,
        subtotal,
        discount_amount,
        tax_rate,
        tax_amount,
        total_amount: taxable + tax_amount,
    })
}
