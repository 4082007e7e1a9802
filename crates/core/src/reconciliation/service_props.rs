//! Property-based tests for checkout and return planning.
//!
//! Simulates several borrowers of one material and checks the invariants
//! that tie stock and debts together.

use std::collections::HashMap;

use chrono::NaiveDate;
use proptest::prelude::*;

use super::service::ReconciliationService;
use crate::debt::DebtState;
use crate::ledger::StockLevel;

#[derive(Debug, Clone, Copy)]
enum Action {
    Checkout { borrower: u8, quantity: i32 },
    Return { borrower: u8, quantity: i32 },
}

fn action_strategy() -> impl Strategy<Value = Action> {
    prop_oneof![
        (0u8..3, -2i32..20).prop_map(|(borrower, quantity)| Action::Checkout { borrower, quantity }),
        (0u8..3, -2i32..20).prop_map(|(borrower, quantity)| Action::Return { borrower, quantity }),
    ]
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 6, 1).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// *For any* interleaving of borrowers:
    /// - on-hand never goes negative
    /// - checked-out equals the sum of open debt amounts
    /// - on-hand plus checked-out equals the initial stock
    #[test]
    fn prop_stock_matches_open_debts(
        initial in 0i32..60,
        actions in prop::collection::vec(action_strategy(), 0..50),
    ) {
        let mut stock = StockLevel::initial(initial).unwrap();
        let mut debts: HashMap<u8, DebtState> = HashMap::new();

        for action in actions {
            match action {
                Action::Checkout { borrower, quantity } => {
                    let debt = debts.get(&borrower).copied().unwrap_or(DebtState::NoDebt);
                    if let Ok(plan) = ReconciliationService::plan_checkout(stock, debt, quantity, today(), 7) {
                        stock = plan.stock;
                        debts.insert(borrower, plan.debt);
                    }
                }
                Action::Return { borrower, quantity } => {
                    let debt = debts.get(&borrower).copied().unwrap_or(DebtState::NoDebt);
                    if let Ok(plan) = ReconciliationService::plan_return(stock, debt, quantity) {
                        stock = plan.stock;
                        debts.insert(borrower, plan.debt);
                    }
                }
            }

            let owed: i32 = debts.values().map(DebtState::amount).sum();
            prop_assert!(stock.on_hand() >= 0);
            prop_assert_eq!(stock.checked_out(), owed);
            prop_assert_eq!(stock.on_hand() + stock.checked_out(), initial);
        }
    }

    /// Checkout then return of the same quantity restores stock and settles the debt.
    #[test]
    fn prop_checkout_return_roundtrip(on_hand in 1i32..500, pick in 1i32..500) {
        let quantity = pick.min(on_hand);
        let stock = StockLevel::initial(on_hand).unwrap();

        let out = ReconciliationService::plan_checkout(stock, DebtState::NoDebt, quantity, today(), 7).unwrap();
        let back = ReconciliationService::plan_return(out.stock, out.debt, quantity).unwrap();

        prop_assert_eq!(back.stock, stock);
        prop_assert!(back.settles());
    }
}
