use anchor_lang::prelude::*;
use anchor_lang::solana_program::{instruction::Instruction, sysvar::instructions};
use solana_sdk_ids::secp256k1_program;

use crate::errors::SaleError;

/// Offsets header: [sig_off(2), sig_ix(1), eth_off(2), eth_ix(1), msg_off(2), msg_len(2), msg_ix(1)]
const OFFSETS_START: usize = 1;
const OFFSETS_LEN: usize = 11;
const ETH_ADDRESS_LEN: usize = 20;
const DIGEST_LEN: usize = 32;

/// Something that proves an authorizer signed a digest
pub trait SignatureProof {
    fn verify(&self, digest: &[u8; 32], authorizer: &[u8; 20]) -> Result<()>;
}

/// The secp256k1 precompile instruction placed directly before the current one.
/// The precompile has already recovered the signer, so verifying it only means
/// checking the message and address it carries.
pub struct SecpInstruction {
    pub index: u8,
    pub instruction: Instruction,
}

impl SecpInstruction {
    /// Loads the instruction preceding the currently executing one
    /// # Arguments
    /// * `ix_sysvar` - The instructions sysvar account info.
    pub fn load_preceding(ix_sysvar: &AccountInfo) -> Result<Self> {
        let current_ix_idx = instructions::load_current_index_checked(ix_sysvar)?;

        require_gt!(current_ix_idx, 0, SecpError::MissingOrMismatchedSecpIx);

        let index = current_ix_idx - 1;
        let instruction = instructions::load_instruction_at_checked(index as usize, ix_sysvar)?;

        require_keys_eq!(
            instruction.program_id,
            secp256k1_program::id(),
            SecpError::MissingOrMismatchedSecpIx
        );

        Ok(Self {
            index: u8::try_from(index).map_err(|_| SecpError::MissingOrMismatchedSecpIx)?,
            instruction,
        })
    }

    /// Returns the (digest, eth address) pair the precompile verified.
    /// Only the inline layout is accepted: signature, address and message must
    /// all live in the precompile instruction itself.
    pub fn signed_message(&self) -> Result<([u8; 32], [u8; 20])> {
        let data = &self.instruction.data;

        require!(!data.is_empty(), SecpError::MalformedSecpIx);
        require!(data[0] == 1, SecpError::WrongSigCount);
        require!(
            data.len() >= OFFSETS_START + OFFSETS_LEN,
            SecpError::MalformedSecpIx
        );

        let rd = OFFSETS_START;
        let sig_ix = data[rd + 2];
        let eth_off = u16::from_le_bytes([data[rd + 3], data[rd + 4]]) as usize;
        let eth_ix = data[rd + 5];
        let msg_off = u16::from_le_bytes([data[rd + 6], data[rd + 7]]) as usize;
        let msg_len = u16::from_le_bytes([data[rd + 8], data[rd + 9]]) as usize;
        let msg_ix = data[rd + 10];

        require!(msg_len == DIGEST_LEN, SecpError::WrongDigestLen);
        require!(msg_off + DIGEST_LEN <= data.len(), SecpError::MalformedSecpIx);
        require!(
            eth_off + ETH_ADDRESS_LEN <= data.len(),
            SecpError::MalformedSecpIx
        );
        require!(sig_ix == self.index, SecpError::MissingOrMismatchedSecpIx);
        require!(eth_ix == self.index, SecpError::MissingOrMismatchedSecpIx);
        require!(msg_ix == self.index, SecpError::MissingOrMismatchedSecpIx);

        let mut digest = [0u8; DIGEST_LEN];
        digest.copy_from_slice(&data[msg_off..msg_off + DIGEST_LEN]);
        let mut eth_address = [0u8; ETH_ADDRESS_LEN];
        eth_address.copy_from_slice(&data[eth_off..eth_off + ETH_ADDRESS_LEN]);

        Ok((digest, eth_address))
    }
}

impl SignatureProof for SecpInstruction {
    fn verify(&self, digest: &[u8; 32], authorizer: &[u8; 20]) -> Result<()> {
        let (signed_digest, signer) = self.signed_message()?;

        if signed_digest != *digest {
            msg!("Signed digest does not match the authorization");
            return err!(SaleError::InvalidSignature);
        }
        if signer != *authorizer {
            msg!("Signature recovered to an address other than the authorizer");
            return err!(SaleError::InvalidSignature);
        }

        Ok(())
    }
}

/// Errors related to secp256k1 signature verification.
#[error_code]
pub enum SecpError {
    #[msg("Missing or mismatched secp256k1 verification instruction")]
    MissingOrMismatchedSecpIx,
    #[msg("Malformed secp256k1 instruction")]
    MalformedSecpIx,
    #[msg("Wrong signature count")]
    WrongSigCount,
    #[msg("Expected 32-byte hash")]
    WrongDigestLen,
}

#[cfg(test)]
pub(crate) fn inline_secp_instruction(index: u8, digest: [u8; 32], signer: [u8; 20]) -> SecpInstruction {
    // eth address at 12, signature (64 + recovery id) at 32, message at 97
    let mut data = vec![0u8; 129];
    data[0] = 1;
    data[1..3].copy_from_slice(&32u16.to_le_bytes());
    data[3] = index;
    data[4..6].copy_from_slice(&12u16.to_le_bytes());
    data[6] = index;
    data[7..9].copy_from_slice(&97u16.to_le_bytes());
    data[9..11].copy_from_slice(&32u16.to_le_bytes());
    data[11] = index;
    data[12..32].copy_from_slice(&signer);
    data[97..129].copy_from_slice(&digest);

    SecpInstruction {
        index,
        instruction: Instruction {
            program_id: secp256k1_program::id(),
            accounts: vec![],
            data,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIGNER: [u8; 20] = [7u8; 20];
    const DIGEST: [u8; 32] = [9u8; 32];

    #[test]
    fn test_verify_accepts_matching_signature() {
        let ix = inline_secp_instruction(0, DIGEST, SIGNER);
        assert!(ix.verify(&DIGEST, &SIGNER).is_ok());
    }

    #[test]
    fn test_verify_rejects_other_signer() {
        let ix = inline_secp_instruction(0, DIGEST, [8u8; 20]);
        assert_eq!(
            ix.verify(&DIGEST, &SIGNER).unwrap_err(),
            SaleError::InvalidSignature.into()
        );
    }

    #[test]
    fn test_verify_rejects_other_digest() {
        let ix = inline_secp_instruction(0, [1u8; 32], SIGNER);
        assert_eq!(
            ix.verify(&DIGEST, &SIGNER).unwrap_err(),
            SaleError::InvalidSignature.into()
        );
    }

    #[test]
    fn test_rejects_non_inline_offsets() {
        let mut ix = inline_secp_instruction(1, DIGEST, SIGNER);
        ix.instruction.data[11] = 0;
        assert_eq!(
            ix.signed_message().unwrap_err(),
            SecpError::MissingOrMismatchedSecpIx.into()
        );
    }

    #[test]
    fn test_rejects_malformed_data() {
        let mut ix = inline_secp_instruction(0, DIGEST, SIGNER);

        ix.instruction.data[0] = 2;
        assert_eq!(
            ix.signed_message().unwrap_err(),
            SecpError::WrongSigCount.into()
        );

        ix.instruction.data[0] = 1;
        ix.instruction.data[9..11].copy_from_slice(&31u16.to_le_bytes());
        assert_eq!(
            ix.signed_message().unwrap_err(),
            SecpError::WrongDigestLen.into()
        );

        ix.instruction.data.truncate(8);
        assert_eq!(
            ix.signed_message().unwrap_err(),
            SecpError::MalformedSecpIx.into()
        );

        ix.instruction.data.clear();
        assert_eq!(
            ix.signed_message().unwrap_err(),
            SecpError::MalformedSecpIx.into()
        );
    }

    #[test]
    fn test_rejects_offsets_past_end() {
        let mut ix = inline_secp_instruction(0, DIGEST, SIGNER);
        ix.instruction.data[7..9].copy_from_slice(&120u16.to_le_bytes());
        assert_eq!(
            ix.signed_message().unwrap_err(),
            SecpError::MalformedSecpIx.into()
        );
    }
}
