use std::ops::Range;

use anchor_lang::prelude::*;
use anchor_lang::solana_program::{
    program::{invoke, invoke_signed},
    system_instruction,
};
use anchor_lang::system_program::{transfer, Transfer};
use anchor_lang::Discriminator;
use anchor_spl::token_interface::{mint_to, Mint, MintTo, TokenAccount, TokenInterface};

use crate::{
    checkout::{AssetLedger, Checkout, NonceRegistry, Order, Settlement, SignedTerms, Treasury},
    constants::{MINT_AUTHORITY_SEED, NONCE_SEED},
    errors::SaleError,
    state::{ConsumedNonce, PayeeLedger, SaleBuyer, SaleState},
    utils::{SecpError, SecpInstruction},
};

/// Accounts shared by the public and signed purchase paths
pub struct SaleManager<'a, 'info> {
    pub buyer: &'a Signer<'info>,
    pub sale_state: &'a mut Account<'info, SaleState>,
    pub sale_buyer: &'a mut Account<'info, SaleBuyer>,
    pub payee_ledger: &'a mut Account<'info, PayeeLedger>,
    pub asset_mint: &'a mut InterfaceAccount<'info, Mint>,
    pub mint_authority: &'a UncheckedAccount<'info>,
    pub buyer_token_account: &'a InterfaceAccount<'info, TokenAccount>,
    pub token_program: &'a Interface<'info, TokenInterface>,
    pub system_program: &'a Program<'info, System>,
    pub nonce_account: Option<&'a UncheckedAccount<'info>>,
    pub instructions: Option<&'a UncheckedAccount<'info>>,
}

/// What a purchase produced, for the purchase event
pub struct PurchaseReceipt {
    pub first_unit_id: u64,
    pub units: u64,
    pub cost: u64,
    pub refund: u64,
    pub window_id: u64,
}

impl<'a, 'info> SaleManager<'a, 'info> {
    /// Sets the owner of a freshly created SaleBuyer account
    #[inline(always)]
    pub fn initialize_sale_buyer(&mut self, bump: u8) -> Result<()> {
        if self.sale_buyer.owner != self.buyer.key() {
            self.sale_buyer.set_inner(SaleBuyer {
                owner: self.buyer.key(),
                lifetime_count: 0,
                window_id: 0,
                window_count: 0,
                bump,
            });

            msg!("Buyer initialized");
        }

        Ok(())
    }

    fn order(&self, units: u64, payment: u64) -> Result<Order> {
        Ok(Order {
            buyer: self.buyer.key(),
            units,
            payment,
            window_id: Clock::get()?.slot,
        })
    }

    fn checkout(&mut self) -> Checkout<'_> {
        Checkout {
            sale: &mut **self.sale_state,
            buyer: &mut **self.sale_buyer,
            payees: &mut **self.payee_ledger,
        }
    }

    /// Runs the interactions of a committed purchase and builds the receipt
    fn settle(&mut self, settlement: Settlement, window_id: u64) -> Result<PurchaseReceipt> {
        let mut treasury = LamportTreasury {
            buyer: self.buyer,
            ledger: self.payee_ledger.to_account_info(),
            system_program: self.system_program,
        };
        let mut ledger = SplAssetLedger {
            mint: &mut *self.asset_mint,
            mint_authority: self.mint_authority,
            destination: self.buyer_token_account,
            token_program: self.token_program,
            mint_authority_bump: self.sale_state.mint_authority_bump,
            max_supply: self.sale_state.max_supply,
        };
        let unit_ids = settlement.execute(&mut treasury, &mut ledger)?;

        Ok(PurchaseReceipt {
            first_unit_id: unit_ids.start,
            units: settlement.units,
            cost: settlement.cost,
            refund: settlement.refund,
            window_id,
        })
    }
}

/// Buys `units` through the public sale, paying `payment` lamports.
/// # Arguments
/// * `ctx` - The SaleManager holding the purchase accounts.
/// * `units` - The number of units to buy.
/// * `payment` - Lamports sent, any excess over the cost is refunded.
/// * `sale_buyer_bump` - The bump seed for the SaleBuyer PDA.
pub fn purchase(
    ctx: &mut SaleManager,
    units: u64,
    payment: u64,
    sale_buyer_bump: u8,
) -> Result<PurchaseReceipt> {
    ctx.initialize_sale_buyer(sale_buyer_bump)?;

    let order = ctx.order(units, payment)?;
    let settlement = ctx.checkout().commit_public(&order)?;

    ctx.settle(settlement, order.window_id)
}

/// Buys `units` through the signed sale.
/// The transaction must carry a secp256k1 precompile instruction, directly before
/// this one, with the authorizer's signature over the authorization digest.
/// # Arguments
/// * `ctx` - The SaleManager holding the purchase accounts.
/// * `units` - The number of units to buy.
/// * `payment` - Lamports sent, any excess over the cost is refunded.
/// * `terms` - The signed `max_permitted` and nonce.
/// * `sale_buyer_bump` - The bump seed for the SaleBuyer PDA.
/// * `nonce_bump` - The bump seed for the ConsumedNonce PDA.
pub fn signed_purchase(
    ctx: &mut SaleManager,
    units: u64,
    payment: u64,
    terms: SignedTerms,
    sale_buyer_bump: u8,
    nonce_bump: u8,
) -> Result<PurchaseReceipt> {
    let instructions = ctx
        .instructions
        .ok_or(SecpError::MissingOrMismatchedSecpIx)?;
    let nonce_account = ctx
        .nonce_account
        .ok_or(SecpError::MissingOrMismatchedSecpIx)?;

    ctx.initialize_sale_buyer(sale_buyer_bump)?;

    let order = ctx.order(units, payment)?;
    let proof = SecpInstruction::load_preceding(instructions.to_account_info().as_ref())?;
    let mut registry = NonceAccount {
        account: nonce_account,
        payer: ctx.buyer,
        bump: nonce_bump,
        timestamp: Clock::get()?.unix_timestamp,
    };

    let settlement = ctx
        .checkout()
        .commit_signed(&order, &terms, &proof, &mut registry)?;

    ctx.settle(settlement, order.window_id)
}

/// Treasury backed by the PayeeLedger account's lamports
pub struct LamportTreasury<'a, 'info> {
    pub buyer: &'a Signer<'info>,
    pub ledger: AccountInfo<'info>,
    pub system_program: &'a Program<'info, System>,
}

impl<'a, 'info> Treasury for LamportTreasury<'a, 'info> {
    fn collect(&mut self, amount: u64) -> Result<()> {
        transfer(
            CpiContext::new(
                self.system_program.to_account_info(),
                Transfer {
                    from: self.buyer.to_account_info(),
                    to: self.ledger.clone(),
                },
            ),
            amount,
        )
    }

    fn refund(&mut self, amount: u64) -> Result<()> {
        move_lamports(&self.ledger, &self.buyer.to_account_info(), amount)
    }
}

/// Moves lamports out of an account owned by this program
pub fn move_lamports(from: &AccountInfo, to: &AccountInfo, amount: u64) -> Result<()> {
    let from_balance = from
        .lamports()
        .checked_sub(amount)
        .ok_or(SaleError::ArithmeticOverflow)?;
    let to_balance = to
        .lamports()
        .checked_add(amount)
        .ok_or(SaleError::ArithmeticOverflow)?;

    **from.try_borrow_mut_lamports()? = from_balance;
    **to.try_borrow_mut_lamports()? = to_balance;

    Ok(())
}

/// Asset ledger backed by the 0-decimal SPL mint; unit ids follow the mint supply
pub struct SplAssetLedger<'a, 'info> {
    pub mint: &'a mut InterfaceAccount<'info, Mint>,
    pub mint_authority: &'a UncheckedAccount<'info>,
    pub destination: &'a InterfaceAccount<'info, TokenAccount>,
    pub token_program: &'a Interface<'info, TokenInterface>,
    pub mint_authority_bump: u8,
    pub max_supply: u64,
}

impl<'a, 'info> AssetLedger for SplAssetLedger<'a, 'info> {
    fn issue(&mut self, to: &Pubkey, count: u64) -> Result<Range<u64>> {
        require_keys_eq!(self.destination.owner, *to, SaleError::InvalidUser);

        let first = self.mint.supply;
        let end = first
            .checked_add(count)
            .ok_or(SaleError::ArithmeticOverflow)?;

        mint_to(
            CpiContext::new_with_signer(
                self.token_program.to_account_info(),
                MintTo {
                    mint: self.mint.to_account_info(),
                    to: self.destination.to_account_info(),
                    authority: self.mint_authority.to_account_info(),
                },
                &[&[MINT_AUTHORITY_SEED, &[self.mint_authority_bump]]],
            ),
            count,
        )?;

        self.mint.reload()?;

        Ok(first..end)
    }

    fn total_issued_so_far(&self) -> Result<u64> {
        Ok(self.mint.supply)
    }

    fn max_supply(&self) -> u64 {
        self.max_supply
    }
}

/// Nonce registry backed by ConsumedNonce PDAs; an account with data is a spent nonce
pub struct NonceAccount<'a, 'info> {
    pub account: &'a UncheckedAccount<'info>,
    pub payer: &'a Signer<'info>,
    pub bump: u8,
    pub timestamp: i64,
}

impl<'a, 'info> NonceRegistry for NonceAccount<'a, 'info> {
    fn is_consumed(&self, _nonce: &[u8; 32]) -> bool {
        !self.account.data_is_empty()
    }

    /// Creates the ConsumedNonce account for `nonce`
    fn consume(&mut self, nonce: &[u8; 32], consumer: &Pubkey) -> Result<()> {
        require!(self.account.data_is_empty(), SaleError::NonceAlreadyUsed);

        let space = 8 + ConsumedNonce::INIT_SPACE;
        let bump = [self.bump];
        let signer_seeds: &[&[u8]] = &[NONCE_SEED, nonce.as_ref(), &bump];

        // Allocate space for the nonce account
        invoke_signed(
            &system_instruction::allocate(&self.account.key(), space as u64),
            &[self.account.to_account_info()],
            &[signer_seeds],
        )?;

        // Fund the nonce account to be rent-exempt
        invoke(
            &system_instruction::transfer(
                &self.payer.key(),
                &self.account.key(),
                Rent::get()?
                    .minimum_balance(space)
                    .saturating_sub(self.account.lamports()),
            ),
            &[self.payer.to_account_info(), self.account.to_account_info()],
        )?;

        // Assign the nonce account to the program
        invoke_signed(
            &system_instruction::assign(&self.account.key(), &crate::ID),
            &[self.account.to_account_info()],
            &[signer_seeds],
        )?;

        let mut data = self.account.try_borrow_mut_data()?;
        data[0..8].copy_from_slice(ConsumedNonce::DISCRIMINATOR);

        let record = ConsumedNonce {
            nonce: *nonce,
            consumer: *consumer,
            created_at: self.timestamp,
            bump: self.bump,
        };
        record.serialize(&mut &mut data[8..])?;

        Ok(())
    }
}
