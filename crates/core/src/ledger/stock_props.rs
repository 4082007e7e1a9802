//! Property-based tests for stock level arithmetic.
//!
//! - Stock never goes negative
//! - Checkout followed by return of the same quantity is the identity
//! - Rejected operations leave the level untouched

use proptest::prelude::*;

use super::stock::StockLevel;
use crate::reconciliation::InventoryError;

/// An operation against a stock level.
#[derive(Debug, Clone, Copy)]
enum Op {
    Checkout(i32),
    Return(i32),
    Adjust(i32),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (-5i32..50).prop_map(Op::Checkout),
        (-5i32..50).prop_map(Op::Return),
        (-5i32..200).prop_map(Op::Adjust),
    ]
}

fn apply(stock: StockLevel, op: Op) -> Result<StockLevel, InventoryError> {
    match op {
        Op::Checkout(q) => stock.checkout(q),
        Op::Return(q) => stock.return_stock(q),
        Op::Adjust(q) => stock.adjust(q),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// *For any* sequence of operations, on-hand and checked-out stay >= 0.
    #[test]
    fn prop_stock_never_negative(
        initial in 0i32..200,
        ops in prop::collection::vec(op_strategy(), 0..40),
    ) {
        let mut stock = StockLevel::initial(initial).unwrap();
        for op in ops {
            if let Ok(next) = apply(stock, op) {
                stock = next;
            }
            prop_assert!(stock.on_hand() >= 0);
            prop_assert!(stock.checked_out() >= 0);
        }
    }

    /// *For any* successful checkout, returning the same quantity restores the level.
    #[test]
    fn prop_checkout_then_return_is_identity(
        on_hand in 0i32..1_000,
        checked_out in 0i32..1_000,
        quantity in 1i32..1_000,
    ) {
        let stock = StockLevel::new(on_hand, checked_out).unwrap();
        prop_assume!(quantity <= on_hand);

        let restored = stock.checkout(quantity).unwrap().return_stock(quantity).unwrap();
        prop_assert_eq!(restored, stock);
    }

    /// Checkouts and returns move units between the shelf and borrowers, never creating any.
    #[test]
    fn prop_total_units_conserved(
        initial in 0i32..200,
        ops in prop::collection::vec(
            prop_oneof![
                (1i32..30).prop_map(Op::Checkout),
                (1i32..30).prop_map(Op::Return),
            ],
            0..40,
        ),
    ) {
        let mut stock = StockLevel::initial(initial).unwrap();
        for op in ops {
            if let Ok(next) = apply(stock, op) {
                stock = next;
            }
            prop_assert_eq!(stock.on_hand() + stock.checked_out(), initial);
        }
    }

    /// *For any* checkout larger than on-hand, the error reports both quantities.
    #[test]
    fn prop_oversized_checkout_rejected(
        on_hand in 0i32..100,
        extra in 1i32..100,
    ) {
        let stock = StockLevel::initial(on_hand).unwrap();
        let result = stock.checkout(on_hand + extra);
        let is_insufficient = matches!(
            result,
            Err(InventoryError::InsufficientStock { requested, available })
                if requested == on_hand + extra && available == on_hand
        );
        prop_assert!(is_insufficient);
    }
}
