use anchor_lang::prelude::*;

use crate::{constants::MAX_PAYEES, errors::SaleError, utils::pro_rata};

/// A single payee and its running release total
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq, InitSpace)]
pub struct Payee {
    pub address: Pubkey,
    pub shares: u64,
    pub released: u64,
}

/// Cost and refund of a purchase
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PaymentQuote {
    pub cost: u64,
    pub refund: u64,
}

/// PayeeLedger state account - proceeds accounting and treasury
/// Collected lamports sit on this account until payees release them
#[account]
#[derive(InitSpace, Debug)]
pub struct PayeeLedger {
    // Payees and their shares, fixed at initialization
    #[max_len(MAX_PAYEES)]
    pub payees: Vec<Payee>,

    // Sum of every payee's shares
    pub total_shares: u64,

    // Lamports kept from purchases, never decreases
    pub total_received: u64,

    // Lamports paid out to payees
    pub total_released: u64,

    // The bump used to derive the PDA for this account
    pub bump: u8,
}

impl PayeeLedger {
    pub fn new(payees: &[Pubkey], shares: &[u64], bump: u8) -> Result<Self> {
        require!(
            !payees.is_empty() && payees.len() == shares.len() && payees.len() <= MAX_PAYEES,
            SaleError::InvalidPayees
        );

        let mut entries: Vec<Payee> = Vec::with_capacity(payees.len());
        let mut total_shares: u64 = 0;

        for (address, &share) in payees.iter().zip(shares) {
            require!(share > 0, SaleError::InvalidPayees);
            require!(
                entries.iter().all(|p| p.address != *address),
                SaleError::InvalidPayees
            );

            total_shares = total_shares
                .checked_add(share)
                .ok_or(SaleError::ArithmeticOverflow)?;
            entries.push(Payee {
                address: *address,
                shares: share,
                released: 0,
            });
        }

        Ok(Self {
            payees: entries,
            total_shares,
            total_received: 0,
            total_released: 0,
            bump,
        })
    }

    /// Prices `units` at `price` and checks `sent` covers it
    pub fn quote(units: u64, price: u64, sent: u64) -> Result<PaymentQuote> {
        let cost = price
            .checked_mul(units)
            .ok_or(SaleError::ArithmeticOverflow)?;

        if sent < cost {
            msg!("Insufficient payment: sent {}, cost {}", sent, cost);
            return err!(SaleError::InsufficientPayment);
        }

        Ok(PaymentQuote {
            cost,
            refund: sent - cost,
        })
    }

    pub fn record_received(&mut self, cost: u64) -> Result<()> {
        self.total_received = self
            .total_received
            .checked_add(cost)
            .ok_or(SaleError::ArithmeticOverflow)?;
        Ok(())
    }

    fn payee_index(&self, address: &Pubkey) -> Result<usize> {
        self.payees
            .iter()
            .position(|p| p.address == *address)
            .ok_or_else(|| error!(SaleError::UnknownPayee))
    }

    /// Lamports `address` may withdraw right now
    pub fn releasable(&self, address: &Pubkey) -> Result<u64> {
        let payee = &self.payees[self.payee_index(address)?];
        let entitled = pro_rata(self.total_received, payee.shares, self.total_shares)?;

        entitled
            .checked_sub(payee.released)
            .ok_or(SaleError::ArithmeticOverflow.into())
    }

    /// Marks everything owed to `address` as released and returns the amount
    pub fn release(&mut self, address: &Pubkey) -> Result<u64> {
        let amount = self.releasable(address)?;
        require!(amount > 0, SaleError::NoPayeeOwed);

        let index = self.payee_index(address)?;
        let payee = &mut self.payees[index];
        payee.released = payee
            .released
            .checked_add(amount)
            .ok_or(SaleError::ArithmeticOverflow)?;
        self.total_released = self
            .total_released
            .checked_add(amount)
            .ok_or(SaleError::ArithmeticOverflow)?;

        Ok(amount)
    }

    pub fn released(&self, address: &Pubkey) -> Result<u64> {
        Ok(self.payees[self.payee_index(address)?].released)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

    fn two_payees() -> (Pubkey, Pubkey, PayeeLedger) {
        let p0 = Pubkey::new_unique();
        let p1 = Pubkey::new_unique();
        let ledger = PayeeLedger::new(&[p0, p1], &[1, 4], 255).unwrap();
        (p0, p1, ledger)
    }

    #[test]
    fn test_new_rejects_bad_payees() {
        let a = Pubkey::new_unique();
        let b = Pubkey::new_unique();

        for (payees, shares) in [
            (vec![], vec![]),
            (vec![a, b], vec![1]),
            (vec![a, b], vec![1, 0]),
            (vec![a, a], vec![1, 1]),
        ] {
            let err = PayeeLedger::new(&payees, &shares, 0).unwrap_err();
            assert_eq!(err, SaleError::InvalidPayees.into());
        }

        let many: Vec<Pubkey> = (0..=MAX_PAYEES).map(|_| Pubkey::new_unique()).collect();
        let shares = vec![1u64; many.len()];
        assert_eq!(
            PayeeLedger::new(&many, &shares, 0).unwrap_err(),
            SaleError::InvalidPayees.into()
        );
    }

    #[test]
    fn test_quote_refunds_overpayment() {
        let price = LAMPORTS_PER_SOL / 1_000;
        let quote = PayeeLedger::quote(5, price, LAMPORTS_PER_SOL).unwrap();

        assert_eq!(quote.cost, 5 * price);
        assert_eq!(quote.refund, LAMPORTS_PER_SOL - 5 * price);
    }

    #[test]
    fn test_quote_exact_payment_has_no_refund() {
        let quote = PayeeLedger::quote(3, 7, 21).unwrap();
        assert_eq!(quote, PaymentQuote { cost: 21, refund: 0 });
    }

    #[test]
    fn test_quote_rejects_underpayment_and_overflow() {
        assert_eq!(
            PayeeLedger::quote(3, 7, 20).unwrap_err(),
            SaleError::InsufficientPayment.into()
        );
        assert_eq!(
            PayeeLedger::quote(u64::MAX, 2, u64::MAX).unwrap_err(),
            SaleError::ArithmeticOverflow.into()
        );
    }

    #[test]
    fn test_release_splits_by_shares() {
        let (p0, p1, mut ledger) = two_payees();
        ledger.record_received(500).unwrap();

        assert_eq!(ledger.release(&p0).unwrap(), 100);
        assert_eq!(ledger.release(&p1).unwrap(), 400);
        assert_eq!(ledger.total_released, 500);
        assert_eq!(ledger.released(&p1).unwrap(), 400);
    }

    #[test]
    fn test_second_release_without_new_funds_fails() {
        let (p0, _, mut ledger) = two_payees();
        ledger.record_received(500).unwrap();
        ledger.release(&p0).unwrap();

        assert_eq!(
            ledger.release(&p0).unwrap_err(),
            SaleError::NoPayeeOwed.into()
        );

        ledger.record_received(50).unwrap();
        assert_eq!(ledger.release(&p0).unwrap(), 10);
    }

    #[test]
    fn test_release_unknown_payee() {
        let (_, _, mut ledger) = two_payees();
        ledger.record_received(500).unwrap();

        assert_eq!(
            ledger.release(&Pubkey::new_unique()).unwrap_err(),
            SaleError::UnknownPayee.into()
        );
    }

    proptest! {
        #[test]
        fn prop_released_never_exceeds_received(
            shares in prop::collection::vec(1u64..1_000, 1..6),
            receipts in prop::collection::vec(0u64..1_000_000, 1..20),
        ) {
            let payees: Vec<Pubkey> = shares.iter().map(|_| Pubkey::new_unique()).collect();
            let mut ledger = PayeeLedger::new(&payees, &shares, 0).unwrap();

            for (i, amount) in receipts.into_iter().enumerate() {
                ledger.record_received(amount).unwrap();
                let _ = ledger.release(&payees[i % payees.len()]);

                let sum: u64 = ledger.payees.iter().map(|p| p.released).sum();
                prop_assert_eq!(sum, ledger.total_released);
                prop_assert!(ledger.total_released <= ledger.total_received);
            }
        }
    }
}
