//! Property-based tests for the debt state machine.

use chrono::NaiveDate;
use proptest::prelude::*;

use super::state::DebtState;
use crate::reconciliation::InventoryError;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 6, 1).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// *For any* series of checkouts, the open amount is their sum.
    #[test]
    fn prop_checkouts_accumulate(quantities in prop::collection::vec(1i32..100, 1..20)) {
        let mut state = DebtState::NoDebt;
        for q in &quantities {
            state = state.on_checkout(*q, today(), 7).unwrap();
        }
        prop_assert!(state.is_open());
        prop_assert_eq!(state.amount(), quantities.iter().sum::<i32>());
    }

    /// Returning exactly the owed amount settles the debt.
    #[test]
    fn prop_full_return_settles(amount in 1i32..1_000) {
        let state = DebtState::NoDebt
            .on_checkout(amount, today(), 7)
            .unwrap()
            .on_return(amount)
            .unwrap();
        prop_assert_eq!(state, DebtState::Settled);
    }

    /// *For any* return sequence, the owed amount never goes negative and
    /// rejected returns leave it unchanged.
    #[test]
    fn prop_amount_never_negative(
        amount in 1i32..200,
        returns in prop::collection::vec(-3i32..80, 0..20),
    ) {
        let mut state = DebtState::NoDebt.on_checkout(amount, today(), 7).unwrap();
        for q in returns {
            let before = state;
            match state.on_return(q) {
                Ok(next) => state = next,
                Err(InventoryError::InvalidTransition { .. }) => prop_assert!(!before.is_open()),
                Err(_) => prop_assert_eq!(state, before),
            }
            prop_assert!(state.amount() >= 0);
        }
    }

    /// The due date is fixed by the first checkout.
    #[test]
    fn prop_due_date_fixed_by_first_checkout(
        due_days in 0u32..60,
        later_offsets in prop::collection::vec(0u64..30, 0..10),
    ) {
        let first = DebtState::NoDebt.on_checkout(1, today(), due_days).unwrap();
        let expected = DebtState::due_date_from(today(), due_days).unwrap();

        let mut state = first;
        for offset in later_offsets {
            let day = today().checked_add_days(chrono::Days::new(offset)).unwrap();
            state = state.on_checkout(1, day, due_days).unwrap();
        }
        let due_matches = matches!(state, DebtState::Open(d) if d.due_date == expected);
        prop_assert!(due_matches);
    }
}
