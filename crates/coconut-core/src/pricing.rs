//! # Pricing
//!
//! Volume discounts and customer-specific prices.
//!
//! ## Price Calculation
//! ```text
//! unit price   = customer's negotiated price for the unit type
//!                otherwise the price list entry
//! subtotal     = unit price × quantity
//! discount     = subtotal × volume tier rate   (0 when no tier covers qty)
//! total        = subtotal − discount + delivery fee
//! ```
//!
//! The delivery fee is never discounted.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{CustomerPrice, PriceList, UnitType, VolumeTier};
use crate::validation::validate_order_quantity;

/// Discount rate in basis points for `quantity`.
///
/// When tiers overlap the one with the smallest `min_qty` wins. A quantity
/// outside every tier gets no discount.
pub fn resolve_volume_discount(quantity: u32, tiers: &[VolumeTier]) -> u32 {
    tiers
        .iter()
        .filter(|t| t.covers(quantity))
        .min_by_key(|t| t.min_qty)
        .map(|t| t.discount_bps)
        .unwrap_or(0)
}

/// Price per `unit_type` for a customer.
///
/// Customer names match exactly. A negotiated price for the other unit type
/// does not apply.
pub fn unit_price_for(
    customer: Option<&str>,
    unit_type: UnitType,
    list: &PriceList,
    customer_prices: &[CustomerPrice],
) -> Money {
    customer
        .and_then(|name| {
            customer_prices
                .iter()
                .find(|p| p.customer_name == name && p.unit_type == unit_type)
        })
        .map(|p| p.custom_price)
        .unwrap_or_else(|| list.price_for(unit_type))
}

/// One line of an order to be priced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PriceRequest {
    pub quantity: u32,
    pub unit_type: UnitType,
    pub customer: Option<String>,
    pub delivery_fee: Money,
}

/// Itemised order price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PriceBreakdown {
    pub unit_price: Money,
    pub subtotal: Money,
    pub discount_bps: u32,
    pub discount: Money,
    pub delivery_fee: Money,
    pub total: Money,
}

/// Prices an order.
///
/// ## Example
/// ```rust
/// use coconut_core::defaults;
/// use coconut_core::money::Money;
/// use coconut_core::pricing::{price_order, PriceRequest};
/// use coconut_core::UnitType;
///
/// let request = PriceRequest {
///     quantity: 150,
///     unit_type: UnitType::Unit,
///     customer: None,
///     delivery_fee: Money::from_cents(500),
/// };
/// let price = price_order(
///     &request,
///     &defaults::price_list(),
///     &defaults::customer_prices(),
///     &defaults::volume_tiers(),
/// )
/// .unwrap();
///
/// // 150 × $0.50 = $75.00, 5% off = $71.25, plus $5.00 delivery
/// assert_eq!(price.total, Money::from_cents(7625));
/// ```
pub fn price_order(
    request: &PriceRequest,
    list: &PriceList,
    customer_prices: &[CustomerPrice],
    tiers: &[VolumeTier],
) -> CoreResult<PriceBreakdown> {
    validate_order_quantity(request.quantity)?;

    let unit_price = unit_price_for(
        request.customer.as_deref(),
        request.unit_type,
        list,
        customer_prices,
    );
    let too_large = || ValidationError::OutOfRange {
        field: "quantity".to_string(),
        min: 1,
        max: i64::MAX / unit_price.cents().max(1),
    };

    let subtotal = unit_price
        .checked_multiply_quantity(i64::from(request.quantity))
        .ok_or_else(too_large)?;
    let discount_bps = resolve_volume_discount(request.quantity, tiers);
    let discount = subtotal.percentage(discount_bps);
    let total = subtotal
        .cents()
        .checked_sub(discount.cents())
        .and_then(|c| c.checked_add(request.delivery_fee.cents()))
        .map(Money::from_cents)
        .ok_or_else(too_large)?;

    Ok(PriceBreakdown {
        unit_price,
        subtotal,
        discount_bps,
        discount,
        delivery_fee: request.delivery_fee,
        total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults;
    use crate::error::CoreError;

    fn request(quantity: u32, unit_type: UnitType, customer: Option<&str>) -> PriceRequest {
        PriceRequest {
            quantity,
            unit_type,
            customer: customer.map(str::to_string),
            delivery_fee: Money::zero(),
        }
    }

    fn price(req: &PriceRequest) -> PriceBreakdown {
        price_order(
            req,
            &defaults::price_list(),
            &defaults::customer_prices(),
            &defaults::volume_tiers(),
        )
        .unwrap()
    }

    #[test]
    fn test_volume_discount_tiers() {
        let tiers = defaults::volume_tiers();
        assert_eq!(resolve_volume_discount(1, &tiers), 0);
        assert_eq!(resolve_volume_discount(101, &tiers), 500);
        assert_eq!(resolve_volume_discount(500, &tiers), 1000);
        assert_eq!(resolve_volume_discount(501, &tiers), 1500);
    }

    #[test]
    fn test_quantity_beyond_tiers_has_no_discount() {
        assert_eq!(resolve_volume_discount(1_000_000, &defaults::volume_tiers()), 0);
        assert_eq!(resolve_volume_discount(10, &[]), 0);
    }

    #[test]
    fn test_customer_price_overrides_list() {
        let list = defaults::price_list();
        let custom = defaults::customer_prices();

        assert_eq!(
            unit_price_for(Some("Hilton Hotel Miami"), UnitType::Unit, &list, &custom),
            Money::from_cents(450)
        );
        // Hilton only negotiated a unit price
        assert_eq!(
            unit_price_for(Some("Hilton Hotel Miami"), UnitType::Case, &list, &custom),
            Money::from_cents(7500)
        );
        assert_eq!(
            unit_price_for(Some("Walk-in"), UnitType::Unit, &list, &custom),
            Money::from_cents(50)
        );
        assert_eq!(
            unit_price_for(None, UnitType::Case, &list, &custom),
            Money::from_cents(7500)
        );
    }

    #[test]
    fn test_price_order_without_discount() {
        let p = price(&request(4, UnitType::Case, None));
        assert_eq!(p.subtotal, Money::from_cents(30000));
        assert!(p.discount.is_zero());
        assert_eq!(p.total, Money::from_cents(30000));
    }

    #[test]
    fn test_price_order_with_tier_and_fee() {
        let mut req = request(250, UnitType::Unit, Some("Hilton Hotel Miami"));
        req.delivery_fee = Money::from_cents(750);

        let p = price(&req);
        // 250 × $4.50 = $1125.00, 10% off
        assert_eq!(p.subtotal, Money::from_cents(112_500));
        assert_eq!(p.discount_bps, 1000);
        assert_eq!(p.discount, Money::from_cents(11_250));
        assert_eq!(p.total, Money::from_cents(101_250 + 750));
    }

    #[test]
    fn test_price_order_overflow_is_an_error() {
        let huge = CustomerPrice {
            id: "cp".to_string(),
            customer_name: "Whale".to_string(),
            custom_price: Money::from_cents(1_000_000_000_000_000),
            unit_type: UnitType::Unit,
        };

        let result = price_order(
            &request(100_000, UnitType::Unit, Some("Whale")),
            &defaults::price_list(),
            &[huge],
            &[],
        );
        assert!(matches!(
            result,
            Err(CoreError::Validation(ValidationError::OutOfRange { ref field, .. })) if field == "quantity"
        ));
    }

    #[test]
    fn test_price_order_rejects_zero_quantity() {
        let result = price_order(
            &request(0, UnitType::Unit, None),
            &defaults::price_list(),
            &[],
            &[],
        );
        assert!(matches!(result, Err(CoreError::Validation(_))));
    }
}
