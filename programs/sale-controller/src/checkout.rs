//! Purchase orchestration, independent of account plumbing.
//!
//! A [`Checkout`] validates an order against the sale, the buyer's counters and
//! the payee ledger without mutating anything. Only once every check passes
//! does it commit the buyer's counters, the issued total and the received
//! total. A signed purchase records its nonce after that commit. The checkout
//! then hands back a [`Settlement`], and the caller runs the payment collection,
//! refund and issuance through [`Settlement::execute`]. A collaborator that
//! calls back into the sale during settlement therefore sees the committed state.

use std::ops::Range;

use anchor_lang::prelude::*;

use crate::{
    errors::SaleError,
    state::{PayeeLedger, PurchaseLimits, SaleBuyer, SaleState},
    utils::{authorize, SignatureProof},
};

/// Record of nonces already spent on signed purchases
pub trait NonceRegistry {
    fn is_consumed(&self, nonce: &[u8; 32]) -> bool;
    fn consume(&mut self, nonce: &[u8; 32], consumer: &Pubkey) -> Result<()>;
}

/// Holder of collected payments
pub trait Treasury {
    /// Takes `amount` from the buyer into the treasury
    fn collect(&mut self, amount: u64) -> Result<()>;
    /// Returns `amount` from the treasury to the buyer
    fn refund(&mut self, amount: u64) -> Result<()>;
}

/// The ledger recording ownership of issued units
pub trait AssetLedger {
    /// Issues `count` new units to `to` and returns their ids
    fn issue(&mut self, to: &Pubkey, count: u64) -> Result<Range<u64>>;
    fn total_issued_so_far(&self) -> Result<u64>;
    fn max_supply(&self) -> u64;
}

/// A purchase request
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Order {
    pub buyer: Pubkey,
    pub units: u64,
    /// Lamports the buyer sends, any excess over the cost is refunded
    pub payment: u64,
    pub window_id: u64,
}

/// The authorizer-signed terms of a signed purchase
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SignedTerms {
    pub max_permitted: u64,
    pub nonce: [u8; 32],
}

/// Interactions left to run once a purchase or reservation is committed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Settlement {
    pub recipient: Pubkey,
    pub units: u64,
    pub payment: u64,
    pub cost: u64,
    pub refund: u64,
}

pub struct Checkout<'a> {
    pub sale: &'a mut SaleState,
    pub buyer: &'a mut SaleBuyer,
    pub payees: &'a mut PayeeLedger,
}

/// A purchase that passed every check and only has to be recorded
struct Validated {
    window_id: u64,
    limits: PurchaseLimits,
    settlement: Settlement,
}

impl<'a> Checkout<'a> {
    /// Public sale purchase: sale mode, units, price, supply, rate limits, payment.
    pub fn commit_public(&mut self, order: &Order) -> Result<Settlement> {
        self.sale.ensure_public_sale_active()?;
        require!(order.units > 0, SaleError::ZeroUnits);
        self.sale.ensure_price_set()?;

        let validated = self.validate(order, None)?;
        self.commit(validated)
    }

    /// Signed sale purchase: as the public sale, plus the authorizer's
    /// signature over the terms and a fresh nonce. `max_permitted` caps the
    /// units per purchase and tightens the window cap.
    pub fn commit_signed<P, R>(
        &mut self,
        order: &Order,
        terms: &SignedTerms,
        proof: &P,
        registry: &mut R,
    ) -> Result<Settlement>
    where
        P: SignatureProof + ?Sized,
        R: NonceRegistry + ?Sized,
    {
        self.sale.ensure_signed_sale_active()?;
        require!(order.units > 0, SaleError::ZeroUnits);
        require!(
            order.units <= terms.max_permitted,
            SaleError::ExceedsPermitted
        );
        self.sale.ensure_price_set()?;
        self.sale.check_supply(order.units)?;

        authorize(
            &*self.sale,
            proof,
            &order.buyer,
            terms.max_permitted,
            &terms.nonce,
        )?;
        require!(
            !registry.is_consumed(&terms.nonce),
            SaleError::NonceAlreadyUsed
        );

        let validated = self.validate(order, Some(terms.max_permitted))?;
        let settlement = self.commit(validated)?;

        registry.consume(&terms.nonce, &order.buyer)?;
        Ok(settlement)
    }

    /// Supply, rate limits and payment for an order whose mode checks passed
    fn validate(&self, order: &Order, max_permitted: Option<u64>) -> Result<Validated> {
        self.sale.check_supply(order.units)?;

        let limits = PurchaseLimits {
            lifetime_cap: self.sale.max_per_sender,
            window_cap: self.sale.window_cap(max_permitted),
            one_purchase_per_window: self.sale.one_purchase_per_window,
        };
        self.buyer.check(order.units, order.window_id, limits)?;

        let quote = PayeeLedger::quote(order.units, self.sale.price, order.payment)?;
        self.payees
            .total_received
            .checked_add(quote.cost)
            .ok_or(SaleError::ArithmeticOverflow)?;

        Ok(Validated {
            window_id: order.window_id,
            limits,
            settlement: Settlement {
                recipient: order.buyer,
                units: order.units,
                payment: order.payment,
                cost: quote.cost,
                refund: quote.refund,
            },
        })
    }

    fn commit(&mut self, validated: Validated) -> Result<Settlement> {
        let settlement = validated.settlement;

        self.buyer
            .check_and_record(settlement.units, validated.window_id, validated.limits)?;
        self.sale.record_issue(settlement.units)?;
        self.payees.record_received(settlement.cost)?;

        Ok(settlement)
    }
}

/// Operator reservation: bypasses price, rate limits and signatures but not supply
pub fn reserve(sale: &mut SaleState, operator: &Pubkey, units: u64) -> Result<Settlement> {
    require!(units > 0, SaleError::ZeroUnits);
    sale.record_reservation(units)?;

    Ok(Settlement {
        recipient: *operator,
        units,
        payment: 0,
        cost: 0,
        refund: 0,
    })
}

impl Settlement {
    /// Runs the interactions in order: collect, refund, issue.
    /// # Returns
    /// * `Result<Range<u64>>` - The ids of the issued units.
    pub fn execute<T, L>(&self, treasury: &mut T, ledger: &mut L) -> Result<Range<u64>>
    where
        T: Treasury + ?Sized,
        L: AssetLedger + ?Sized,
    {
        self.settle_payment(treasury)?;
        self.issue(ledger)
    }

    fn settle_payment<T: Treasury + ?Sized>(&self, treasury: &mut T) -> Result<()> {
        if self.payment > 0 {
            treasury.collect(self.payment)?;
        }
        if self.refund > 0 {
            treasury.refund(self.refund)?;
        }
        Ok(())
    }

    /// Issues the units, then re-checks the ledger's supply against the ceiling
    pub fn issue<L: AssetLedger + ?Sized>(&self, ledger: &mut L) -> Result<Range<u64>> {
        let unit_ids = ledger.issue(&self.recipient, self.units)?;

        let total = ledger.total_issued_so_far()?;
        if total > ledger.max_supply() {
            msg!(
                "Asset ledger supply {} above max supply {}",
                total,
                ledger.max_supply()
            );
            return err!(SaleError::SupplyExceeded);
        }

        Ok(unit_ids)
    }
}
