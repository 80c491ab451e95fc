use anchor_lang::prelude::*;

use super::move_lamports;
use crate::{constants::PAYEE_LEDGER_SEED, events::PaymentReleased, state::PayeeLedger};

/// Pay a payee everything it is owed; anyone may call
#[derive(Accounts)]
pub struct Release<'info> {
    /// The payee receiving its share
    #[account(mut)]
    pub payee: SystemAccount<'info>,

    /// The `PayeeLedger` account holding the proceeds
    /// # PDA Seeds
    /// - `PAYEE_LEDGER_SEED`
    #[account(
        mut,
        seeds = [PAYEE_LEDGER_SEED],
        bump = payee_ledger.bump,
    )]
    pub payee_ledger: Account<'info, PayeeLedger>,
}

impl<'info> Release<'info> {
    pub fn release(&mut self) -> Result<()> {
        let payee = self.payee.key();
        let amount = self.payee_ledger.release(&payee)?;

        move_lamports(
            &self.payee_ledger.to_account_info(),
            &self.payee.to_account_info(),
            amount,
        )?;

        emit!(PaymentReleased {
            payee,
            amount,
            total_released: self.payee_ledger.released(&payee)?,
        });

        Ok(())
    }
}
