use anchor_lang::prelude::*;

use crate::errors::SaleError;

/// SaleBuyer state account - per-sender purchase counters
#[account]
#[derive(InitSpace)]
pub struct SaleBuyer {
    // The address of the sender who owns this SaleBuyer account
    pub owner: Pubkey,

    // Units bought by the sender over the life of the sale
    pub lifetime_count: u64,

    // The most recent window the sender bought in
    pub window_id: u64,

    // Units bought by the sender in `window_id`
    pub window_count: u64,

    // The bump used to derive the PDA for this account
    pub bump: u8,
}

/// Counters a SaleBuyer takes on once a purchase is committed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BuyerUpdate {
    pub lifetime_count: u64,
    pub window_id: u64,
    pub window_count: u64,
}

/// Caps applied to a single purchase, 0 meaning unlimited
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PurchaseLimits {
    pub lifetime_cap: u64,
    pub window_cap: u64,
    pub one_purchase_per_window: bool,
}

impl SaleBuyer {
    /// Units bought in `window_id`; only the latest window is tracked, so
    /// any other window reads as empty
    pub fn count_in_window(&self, window_id: u64) -> u64 {
        if self.window_id == window_id {
            self.window_count
        } else {
            0
        }
    }

    /// Validates a purchase of `units` in `window_id` without touching the account.
    /// # Arguments
    /// * `units` - The number of units requested.
    /// * `window_id` - The window the purchase falls in.
    /// * `limits` - The caps to apply.
    /// # Returns
    /// * `Result<BuyerUpdate>` - The counters to store if the purchase goes through.
    pub fn check(&self, units: u64, window_id: u64, limits: PurchaseLimits) -> Result<BuyerUpdate> {
        let lifetime_count = self
            .lifetime_count
            .checked_add(units)
            .ok_or(SaleError::ArithmeticOverflow)?;

        if limits.lifetime_cap > 0 && lifetime_count > limits.lifetime_cap {
            msg!(
                "Sender lifetime limit exceeded: requested {}, available {}",
                units,
                limits.lifetime_cap.saturating_sub(self.lifetime_count)
            );
            return err!(SaleError::SenderLifetimeLimitExceeded);
        }

        let current_window_count = self.count_in_window(window_id);
        let window_count = current_window_count
            .checked_add(units)
            .ok_or(SaleError::ArithmeticOverflow)?;

        if limits.window_cap > 0 && window_count > limits.window_cap {
            msg!(
                "Window limit exceeded: requested {}, available {}, window={}",
                units,
                limits.window_cap.saturating_sub(current_window_count),
                window_id
            );
            return err!(SaleError::WindowLimitExceeded);
        }

        if limits.one_purchase_per_window && current_window_count > 0 {
            return err!(SaleError::AlreadyPurchasedThisWindow);
        }

        Ok(BuyerUpdate {
            lifetime_count,
            window_id,
            window_count,
        })
    }

    pub fn apply(&mut self, update: BuyerUpdate) {
        self.lifetime_count = update.lifetime_count;
        self.window_id = update.window_id;
        self.window_count = update.window_count;
    }

    pub fn check_and_record(
        &mut self,
        units: u64,
        window_id: u64,
        limits: PurchaseLimits,
    ) -> Result<()> {
        let update = self.check(units, window_id, limits)?;
        self.apply(update);
        Ok(())
    }
}

#[cfg(test)]
pub(crate) fn create_test_buyer(owner: Pubkey) -> SaleBuyer {
    SaleBuyer {
        owner,
        lifetime_count: 0,
        window_id: 0,
        window_count: 0,
        bump: 255,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn window_limits(window_cap: u64) -> PurchaseLimits {
        PurchaseLimits {
            window_cap,
            ..Default::default()
        }
    }

    #[test]
    fn test_window_cap_allows_exact_cap() {
        let mut buyer = create_test_buyer(Pubkey::new_unique());
        buyer.check_and_record(10, 5, window_limits(10)).unwrap();

        assert_eq!(buyer.window_count, 10);
        assert_eq!(buyer.lifetime_count, 10);
    }

    #[test]
    fn test_window_cap_rejects_one_over() {
        let mut buyer = create_test_buyer(Pubkey::new_unique());
        let err = buyer
            .check_and_record(11, 5, window_limits(10))
            .unwrap_err();

        assert_eq!(err, SaleError::WindowLimitExceeded.into());
        assert_eq!(buyer.lifetime_count, 0);
        assert_eq!(buyer.window_count, 0);
    }

    #[test]
    fn test_window_cap_accumulates_within_window() {
        let mut buyer = create_test_buyer(Pubkey::new_unique());
        buyer.check_and_record(10, 5, window_limits(10)).unwrap();

        let err = buyer.check_and_record(1, 5, window_limits(10)).unwrap_err();
        assert_eq!(err, SaleError::WindowLimitExceeded.into());
        assert_eq!(buyer.window_count, 10);
    }

    #[test]
    fn test_new_window_isolates_counts() {
        let mut buyer = create_test_buyer(Pubkey::new_unique());
        buyer.check_and_record(10, 5, window_limits(10)).unwrap();
        buyer.check_and_record(10, 6, window_limits(10)).unwrap();

        assert_eq!(buyer.window_id, 6);
        assert_eq!(buyer.window_count, 10);
        assert_eq!(buyer.lifetime_count, 20);
        assert_eq!(buyer.count_in_window(5), 0);
    }

    #[test]
    fn test_lifetime_cap_checked_before_window_cap() {
        let mut buyer = create_test_buyer(Pubkey::new_unique());
        let limits = PurchaseLimits {
            lifetime_cap: 3,
            window_cap: 2,
            one_purchase_per_window: false,
        };

        let err = buyer.check_and_record(4, 1, limits).unwrap_err();
        assert_eq!(err, SaleError::SenderLifetimeLimitExceeded.into());
    }

    #[test]
    fn test_lifetime_cap_spans_windows() {
        let mut buyer = create_test_buyer(Pubkey::new_unique());
        let limits = PurchaseLimits {
            lifetime_cap: 5,
            ..Default::default()
        };

        buyer.check_and_record(3, 1, limits).unwrap();
        buyer.check_and_record(2, 2, limits).unwrap();

        let err = buyer.check_and_record(1, 3, limits).unwrap_err();
        assert_eq!(err, SaleError::SenderLifetimeLimitExceeded.into());
        assert_eq!(buyer.lifetime_count, 5);
    }

    #[test]
    fn test_zero_caps_are_unlimited() {
        let mut buyer = create_test_buyer(Pubkey::new_unique());
        buyer
            .check_and_record(u64::MAX, 1, PurchaseLimits::default())
            .unwrap();

        let err = buyer
            .check_and_record(1, 1, PurchaseLimits::default())
            .unwrap_err();
        assert_eq!(err, SaleError::ArithmeticOverflow.into());
    }

    #[test]
    fn test_one_purchase_per_window() {
        let mut buyer = create_test_buyer(Pubkey::new_unique());
        let limits = PurchaseLimits {
            one_purchase_per_window: true,
            ..Default::default()
        };

        buyer.check_and_record(1, 9, limits).unwrap();
        let err = buyer.check_and_record(1, 9, limits).unwrap_err();
        assert_eq!(err, SaleError::AlreadyPurchasedThisWindow.into());

        buyer.check_and_record(1, 10, limits).unwrap();
        assert_eq!(buyer.lifetime_count, 2);
    }

    #[test]
    fn test_check_does_not_mutate() {
        let buyer = create_test_buyer(Pubkey::new_unique());
        let update = buyer.check(4, 7, window_limits(10)).unwrap();

        assert_eq!(
            update,
            BuyerUpdate {
                lifetime_count: 4,
                window_id: 7,
                window_count: 4,
            }
        );
        assert_eq!(buyer.lifetime_count, 0);
    }

    proptest! {
        #[test]
        fn prop_counters_never_exceed_caps(
            requests in prop::collection::vec((1u64..20, 0u64..4), 1..40),
            lifetime_cap in 0u64..60,
            window_cap in 0u64..25,
        ) {
            let mut buyer = create_test_buyer(Pubkey::new_unique());
            let limits = PurchaseLimits { lifetime_cap, window_cap, one_purchase_per_window: false };
            let mut window = 0u64;
            let mut accepted = 0u64;

            for (units, advance) in requests {
                window += advance;
                if buyer.check_and_record(units, window, limits).is_ok() {
                    accepted += units;
                }
                if lifetime_cap > 0 {
                    prop_assert!(buyer.lifetime_count <= lifetime_cap);
                }
                if window_cap > 0 {
                    prop_assert!(buyer.window_count <= window_cap);
                }
            }

            prop_assert_eq!(buyer.lifetime_count, accepted);
        }
    }
}
