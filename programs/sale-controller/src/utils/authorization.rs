use anchor_lang::prelude::*;
use solana_keccak_hasher::hash;

use crate::{constants::AUTHORIZATION_MESSAGE_LEN, state::SaleState, utils::SignatureProof};

/// Calculates the digest an authorizer signs to admit a buyer to the signed sale.
/// # Arguments
/// * `program_id` - The sale program the authorization is bound to.
/// * `beneficiary` - The buyer allowed to purchase.
/// * `max_permitted` - The most units the buyer may take per purchase.
/// * `nonce` - A single-use 32-byte value chosen by the authorizer.
/// # Returns
/// * `[u8; 32]` - The keccak256 hash of the authorization.
pub fn authorization_digest(
    program_id: &Pubkey,
    beneficiary: &Pubkey,
    max_permitted: u64,
    nonce: &[u8; 32],
) -> [u8; 32] {
    // program_id (32) + beneficiary (32) + max_permitted (8) + nonce (32)
    let mut message = [0u8; AUTHORIZATION_MESSAGE_LEN];
    message[0..32].copy_from_slice(&program_id.to_bytes());
    message[32..64].copy_from_slice(&beneficiary.to_bytes());
    message[64..72].copy_from_slice(&max_permitted.to_be_bytes());
    message[72..104].copy_from_slice(nonce);

    hash(&message).to_bytes()
}

/// Checks that the sale's authorizer signed `(beneficiary, max_permitted, nonce)`
/// for this program. Nonce freshness is checked separately.
pub fn authorize<P: SignatureProof + ?Sized>(
    sale: &SaleState,
    proof: &P,
    beneficiary: &Pubkey,
    max_permitted: u64,
    nonce: &[u8; 32],
) -> Result<()> {
    sale.ensure_authorizer_set()?;

    let digest = authorization_digest(&crate::ID, beneficiary, max_permitted, nonce);
    proof.verify(&digest, &sale.authorizer)?;

    msg!("Authorization signature verified");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        constants::UNSET_AUTHORIZER,
        errors::SaleError,
        state::create_test_sale_state,
        utils::inline_secp_instruction,
    };

    #[test]
    fn test_digest_binds_every_field() {
        let program = crate::ID;
        let buyer = Pubkey::new_unique();
        let nonce = [3u8; 32];
        let base = authorization_digest(&program, &buyer, 5, &nonce);

        assert_eq!(base, authorization_digest(&program, &buyer, 5, &nonce));
        assert_ne!(base, authorization_digest(&Pubkey::new_unique(), &buyer, 5, &nonce));
        assert_ne!(base, authorization_digest(&program, &Pubkey::new_unique(), 5, &nonce));
        assert_ne!(base, authorization_digest(&program, &buyer, 6, &nonce));
        assert_ne!(base, authorization_digest(&program, &buyer, 5, &[4u8; 32]));
    }

    #[test]
    fn test_digest_is_keccak_of_packed_message() {
        let buyer = Pubkey::new_unique();
        let nonce = [0xabu8; 32];

        let mut message = Vec::new();
        message.extend_from_slice(crate::ID.as_ref());
        message.extend_from_slice(buyer.as_ref());
        message.extend_from_slice(&2u64.to_be_bytes());
        message.extend_from_slice(&nonce);

        assert_eq!(
            authorization_digest(&crate::ID, &buyer, 2, &nonce),
            hash(&message).to_bytes()
        );
    }

    #[test]
    fn test_authorize_with_authorizer_signature() {
        let sale = create_test_sale_state(1, 50);
        let buyer = Pubkey::new_unique();
        let nonce = [1u8; 32];
        let digest = authorization_digest(&crate::ID, &buyer, 5, &nonce);
        let proof = inline_secp_instruction(0, digest, sale.authorizer);

        assert!(authorize(&sale, &proof, &buyer, 5, &nonce).is_ok());
    }

    #[test]
    fn test_authorize_rejects_signature_for_other_buyer() {
        let sale = create_test_sale_state(1, 50);
        let nonce = [1u8; 32];
        let digest = authorization_digest(&crate::ID, &Pubkey::new_unique(), 5, &nonce);
        let proof = inline_secp_instruction(0, digest, sale.authorizer);

        let err = authorize(&sale, &proof, &Pubkey::new_unique(), 5, &nonce).unwrap_err();
        assert_eq!(err, SaleError::InvalidSignature.into());
    }

    #[test]
    fn test_authorize_rejects_raised_allowance() {
        let sale = create_test_sale_state(1, 50);
        let buyer = Pubkey::new_unique();
        let nonce = [1u8; 32];
        let digest = authorization_digest(&crate::ID, &buyer, 2, &nonce);
        let proof = inline_secp_instruction(0, digest, sale.authorizer);

        let err = authorize(&sale, &proof, &buyer, 10, &nonce).unwrap_err();
        assert_eq!(err, SaleError::InvalidSignature.into());
    }

    #[test]
    fn test_authorize_requires_authorizer() {
        let mut sale = create_test_sale_state(1, 50);
        sale.authorizer = UNSET_AUTHORIZER;
        let buyer = Pubkey::new_unique();
        let nonce = [1u8; 32];
        let digest = authorization_digest(&crate::ID, &buyer, 5, &nonce);
        let proof = inline_secp_instruction(0, digest, UNSET_AUTHORIZER);

        let err = authorize(&sale, &proof, &buyer, 5, &nonce).unwrap_err();
        assert_eq!(err, SaleError::AuthorizerNotSet.into());
    }
}
