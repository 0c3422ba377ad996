//! Permit2 signing and signature injection into swap call data.

use crate::Result;
use crate::chain::ChainClient;
use crate::error::Error;
use crate::quote::types::QuoteResponse;
use crate::types::{Bytes, Signature, U256};

/// Call data ready for submission, with the signature it carries, if any.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedPermit {
    pub call_data: Bytes,
    /// `None` when the quote did not ask for a Permit2 signature.
    pub signature: Option<Signature>,
}

/// Appends `signature` to `data` as `data ++ uint256_be(len(signature)) ++ signature`.
///
/// Always returns a new buffer; `data` is left untouched.
///
/// ```
/// use permit2_swap::swap::inject_signature;
///
/// let out = inject_signature(&[0xaa], &[0x01, 0x02]);
/// assert_eq!(out.len(), 1 + 32 + 2);
/// assert_eq!(out[32], 2);
/// assert_eq!(&out[33..], &[0x01, 0x02]);
/// ```
#[must_use]
pub fn inject_signature(data: &[u8], signature: &[u8]) -> Bytes {
    let length = U256::from(signature.len()).to_be_bytes::<32>();

    let mut out = Vec::with_capacity(data.len() + length.len() + signature.len());
    out.extend_from_slice(data);
    out.extend_from_slice(&length);
    out.extend_from_slice(signature);

    out.into()
}

/// Signs the quote's Permit2 payload, if it has one, and produces the call data to
/// submit.
///
/// Without a payload the transaction data is returned unchanged.
///
/// # Errors
///
/// Returns a [`Kind::SignatureIntegrity`](crate::error::Kind::SignatureIntegrity) error
/// if signing fails or the quote carries no transaction data.
pub async fn sign<C: ChainClient + ?Sized>(chain: &C, quote: &QuoteResponse) -> Result<SignedPermit> {
    let data = quote.transaction.data.as_ref();

    let Some(typed_data) = quote.permit_typed_data() else {
        #[cfg(feature = "tracing")]
        tracing::info!("quote has no Permit2 payload, submitting call data as is");

        let data = data.ok_or_else(|| {
            Error::signature_integrity(Some("quote has no transaction data".to_owned()))
        })?;
        return Ok(SignedPermit {
            call_data: data.clone(),
            signature: None,
        });
    };

    let signature = match chain.sign_typed_data(typed_data).await {
        Ok(signature) => signature,
        Err(e) => {
            #[cfg(feature = "tracing")]
            tracing::error!(error = %e, "failed to sign Permit2 payload");
            return Err(Error::signature_integrity(Some(e.to_string())));
        }
    };

    let Some(data) = data else {
        #[cfg(feature = "tracing")]
        tracing::error!("quote has a Permit2 payload but no transaction data");
        return Err(Error::signature_integrity(Some(
            "quote has no transaction data".to_owned(),
        )));
    };

    #[cfg(feature = "tracing")]
    tracing::info!("signed Permit2 payload from quote");

    Ok(SignedPermit {
        call_data: inject_signature(data, &signature.as_bytes()),
        signature: Some(signature),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn injection_layout_is_exact() {
        let data = [0x1f, 0xff, 0x99, 0x1f];
        let signature = [0x42_u8; 65];

        let out = inject_signature(&data, &signature);

        let mut expected = data.to_vec();
        let mut length = [0_u8; 32];
        length[31] = 65;
        expected.extend_from_slice(&length);
        expected.extend_from_slice(&signature);

        assert_eq!(out.as_ref(), expected.as_slice());
    }

    #[test]
    fn injection_is_deterministic_and_leaves_input_alone() {
        let data = Bytes::from_static(&[0xde, 0xad, 0xbe, 0xef]);
        let retained = data.clone();

        let first = inject_signature(&data, &[7_u8; 65]);
        let second = inject_signature(&data, &[7_u8; 65]);

        assert_eq!(first, second);
        assert_eq!(data, retained);
        assert_eq!(data.len(), 4);
    }

    #[test]
    fn variable_length_signature_is_prefixed_with_its_length() {
        let signature = vec![1_u8; 300];

        let out = inject_signature(&[], &signature);

        assert_eq!(&out[30..32], &[0x01, 0x2c]);
        assert_eq!(out.len(), 32 + 300);
    }
}
