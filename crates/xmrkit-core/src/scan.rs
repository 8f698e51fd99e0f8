//! Output scanning
//!
//! One transaction public key yields one derivation; every output of the
//! transaction is then checked independently, so the per-output work runs
//! on the rayon pool.

use rayon::prelude::*;
use tracing::debug;

use crate::derivation::{
    derive_public_key, derive_secret_key, derive_subaddress_public_key, generate_key_derivation,
    KeyDerivation,
};
use crate::keys::{PrivateKey, PublicKey};
use crate::subaddress::{subaddress_spend_secret_key, SubaddressIndex, SubaddressTable};

/// An output that belongs to the scanning wallet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnedOutput {
    /// Position of the output in the transaction
    pub output_index: u64,
    /// One-time output key
    pub output_key: PublicKey,
    /// Receiving subaddress, (0, 0) for the primary address
    pub subaddress: SubaddressIndex,
    /// One-time spend secret, when the spend secret was supplied
    pub one_time_secret: Option<PrivateKey>,
}

/// Check `outputs` (in transaction order) against the primary address
pub fn scan_outputs(
    outputs: &[PublicKey],
    tx_public: &PublicKey,
    view_secret: &PrivateKey,
    spend_public: &PublicKey,
    spend_secret: Option<&PrivateKey>,
) -> Vec<OwnedOutput> {
    let derivation = generate_key_derivation(tx_public, view_secret);

    let owned: Vec<OwnedOutput> = outputs
        .par_iter()
        .enumerate()
        .filter_map(|(i, output_key)| {
            let index = i as u64;
            let expected = derive_public_key(&derivation, index, spend_public);
            (expected.as_bytes() == output_key.as_bytes()).then(|| OwnedOutput {
                output_index: index,
                output_key: *output_key,
                subaddress: SubaddressIndex::PRIMARY,
                one_time_secret: spend_secret.map(|b| derive_secret_key(&derivation, index, b)),
            })
        })
        .collect();

    debug!(outputs = outputs.len(), owned = owned.len(), "scanned outputs");
    owned
}

/// Check `outputs` against every spend key in `table`
pub fn scan_outputs_with_subaddresses(
    outputs: &[PublicKey],
    tx_public: &PublicKey,
    table: &SubaddressTable,
    spend_secret: Option<&PrivateKey>,
) -> Vec<OwnedOutput> {
    let view_secret = table.view_secret();
    let derivation = generate_key_derivation(tx_public, view_secret);

    let owned: Vec<OwnedOutput> = outputs
        .par_iter()
        .enumerate()
        .filter_map(|(i, output_key)| {
            let index = i as u64;
            let receiver = derive_subaddress_public_key(output_key, &derivation, index);
            let subaddress = table.lookup(&receiver)?;
            Some(OwnedOutput {
                output_index: index,
                output_key: *output_key,
                subaddress,
                one_time_secret: spend_secret
                    .map(|b| one_time_secret(&derivation, index, b, view_secret, subaddress)),
            })
        })
        .collect();

    debug!(
        outputs = outputs.len(),
        owned = owned.len(),
        subaddresses = table.len(),
        "scanned outputs against subaddress table"
    );
    owned
}

fn one_time_secret(
    derivation: &KeyDerivation,
    output_index: u64,
    spend_secret: &PrivateKey,
    view_secret: &PrivateKey,
    subaddress: SubaddressIndex,
) -> PrivateKey {
    let base = if subaddress.is_primary() {
        *spend_secret
    } else {
        subaddress_spend_secret_key(spend_secret, view_secret, subaddress)
    };
    derive_secret_key(derivation, output_index, &base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::{AccountKeys, KeyPair};
    use crate::subaddress::subaddress_spend_public_key;

    fn wallet() -> AccountKeys {
        KeyPair::from_seed(&[0x70; 32]).account()
    }

    fn tx_secret() -> PrivateKey {
        PrivateKey::from_bytes_mod_order(&[0x71; 32])
    }

    /// Outputs to the wallet at positions 1 and 3, strangers elsewhere
    fn outputs_for(wallet: &AccountKeys, r: &PrivateKey) -> Vec<PublicKey> {
        let stranger = KeyPair::from_seed(&[0x72; 32]).account();
        let ours = generate_key_derivation(&wallet.view_public, r);
        let theirs = generate_key_derivation(&stranger.view_public, r);
        (0..5u64)
            .map(|i| {
                if i == 1 || i == 3 {
                    derive_public_key(&ours, i, &wallet.spend_public)
                } else {
                    derive_public_key(&theirs, i, &stranger.spend_public)
                }
            })
            .collect()
    }

    #[test]
    fn test_scan_finds_owned_outputs() {
        let wallet = wallet();
        let r = tx_secret();
        let outputs = outputs_for(&wallet, &r);

        let owned = scan_outputs(
            &outputs,
            &r.public_key(),
            &wallet.view_secret,
            &wallet.spend_public,
            Some(&wallet.spend_secret),
        );
        let indices: Vec<u64> = owned.iter().map(|o| o.output_index).collect();
        assert_eq!(indices, vec![1, 3]);

        for output in &owned {
            let secret = output.one_time_secret.unwrap();
            assert_eq!(secret.public_key(), output.output_key);
            assert_eq!(output.subaddress, SubaddressIndex::PRIMARY);
        }
    }

    #[test]
    fn test_view_only_scan() {
        let wallet = wallet();
        let r = tx_secret();
        let outputs = outputs_for(&wallet, &r);

        let owned = scan_outputs(&outputs, &r.public_key(), &wallet.view_secret, &wallet.spend_public, None);
        assert_eq!(owned.len(), 2);
        assert!(owned.iter().all(|o| o.one_time_secret.is_none()));
    }

    #[test]
    fn test_scan_subaddress_outputs() {
        let wallet = wallet();
        let r = tx_secret();
        let index = SubaddressIndex::new(1, 2);

        // Sending to a subaddress uses R = r*D and derivation r*C
        let d = subaddress_spend_public_key(&wallet.spend_public, &wallet.view_secret, index);
        let c = PublicKey::from_point(&d.point().mul_scalar(wallet.view_secret.as_scalar()));
        let tx_public = PublicKey::from_point(&d.point().mul_scalar(r.as_scalar()));
        let derivation = generate_key_derivation(&c, &r);

        let primary = generate_key_derivation(&wallet.view_public, &r);
        let outputs = vec![
            derive_public_key(&primary, 0, &wallet.spend_public),
            derive_public_key(&derivation, 1, &d),
        ];

        let table = SubaddressTable::generate(&wallet.spend_public, &wallet.view_secret, 0..2, 0..4);
        let owned = scan_outputs_with_subaddresses(&outputs, &tx_public, &table, Some(&wallet.spend_secret));

        assert_eq!(owned.len(), 1);
        assert_eq!(owned[0].output_index, 1);
        assert_eq!(owned[0].subaddress, index);
        assert_eq!(owned[0].one_time_secret.unwrap().public_key(), outputs[1]);
    }

    #[test]
    fn test_table_scan_sees_primary_outputs() {
        let wallet = wallet();
        let r = tx_secret();
        let outputs = outputs_for(&wallet, &r);

        let table = SubaddressTable::new(&wallet.spend_public, &wallet.view_secret);
        let owned = scan_outputs_with_subaddresses(&outputs, &r.public_key(), &table, Some(&wallet.spend_secret));
        assert_eq!(owned.len(), 2);
        assert_eq!(owned[1].output_index, 3);
        assert_eq!(owned[1].one_time_secret.unwrap().public_key(), outputs[3]);
    }
}
