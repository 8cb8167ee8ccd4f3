use chrono::{DateTime, Utc};
use secp256k1::PublicKey;
use std::fmt;

use crate::address::{EncodingError, Network, np2wkh_address, p2wkh_address};
use crate::derivation::{
    BIP43_PURPOSE, BIP49_PURPOSE, BIP84_PURPOSE, DerivationError, ExtendedKey, KEY_FAMILY_NODE,
    derive_first_key,
};
use crate::seed::CipherSeed;

#[derive(Debug)]
pub enum RecoveryError {
    Derivation(DerivationError),
    Encoding(EncodingError),
}

impl fmt::Display for RecoveryError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RecoveryError::Derivation(e) => write!(f, "derivation failed: {}", e),
            RecoveryError::Encoding(e) => write!(f, "address encoding failed: {}", e),
        }
    }
}

impl std::error::Error for RecoveryError {}

impl From<DerivationError> for RecoveryError {
    fn from(err: DerivationError) -> Self {
        RecoveryError::Derivation(err)
    }
}

impl From<EncodingError> for RecoveryError {
    fn from(err: EncodingError) -> Self {
        RecoveryError::Encoding(err)
    }
}

/// Everything the tool reports for a recovered seed. Displays as the
/// fixed four-line report.
pub struct RecoveryReport {
    pub birthday: DateTime<Utc>,
    pub internal_version: u8,
    pub node_pubkey: PublicKey,
    pub p2wkh_address: String,
    pub np2wkh_address: String,
}

impl fmt::Display for RecoveryReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(
            f,
            "Wallet Birthday: {}, Internal Version: {}",
            self.birthday, self.internal_version
        )?;
        writeln!(f, "Node pub key: {}", hex::encode(self.node_pubkey.serialize()))?;
        writeln!(f, "First p2wkh address: {}", self.p2wkh_address)?;
        write!(f, "First n2pwkh address {}", self.np2wkh_address)
    }
}

/// Recovers the node identity key and first wallet addresses from a
/// decrypted cipher seed.
///
/// Walks the master node through the three fixed paths
/// (`m/1017'/0'/6'/0/0`, `m/84'/0'/0'/0/0`, `m/49'/0'/0'/0/0`) and
/// encodes the address leaves. The first failing step aborts the whole
/// run; a partial report is never produced.
pub fn recover(seed: &CipherSeed, network: &Network) -> Result<RecoveryReport, RecoveryError> {
    let root = ExtendedKey::master(seed.entropy())?;

    let node_pubkey = derive_first_key(&root, BIP43_PURPOSE, KEY_FAMILY_NODE)?;

    let p2wkh_key = derive_first_key(&root, BIP84_PURPOSE, 0)?;
    let p2wkh = p2wkh_address(&p2wkh_key, network)?;

    let np2wkh_key = derive_first_key(&root, BIP49_PURPOSE, 0)?;
    let np2wkh = np2wkh_address(&np2wkh_key, network)?;

    Ok(RecoveryReport {
        birthday: seed.birthday_time(),
        internal_version: seed.internal_version,
        node_pubkey,
        p2wkh_address: p2wkh,
        np2wkh_address: np2wkh,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::MAINNET;
    use crate::seed::ENTROPY_SIZE;

    #[test]
    fn report_lines_have_the_fixed_order_and_shape() {
        let seed = CipherSeed::new(0, 0, [0u8; ENTROPY_SIZE]);
        let report = recover(&seed, &MAINNET).unwrap();
        let rendered = report.to_string();
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(
            lines[0],
            "Wallet Birthday: 2009-01-03 18:15:05 UTC, Internal Version: 0"
        );
        assert!(lines[1].starts_with("Node pub key: "));
        assert!(lines[2].starts_with("First p2wkh address: bc1q"));
        assert!(lines[3].starts_with("First n2pwkh address 3"));

        // 33-byte compressed key, lowercase hex
        let node_hex = lines[1].trim_start_matches("Node pub key: ");
        assert_eq!(node_hex.len(), 66);
        assert_eq!(node_hex, node_hex.to_lowercase());
    }

    #[test]
    fn recovery_is_deterministic() {
        let entropy = [0x5a; ENTROPY_SIZE];
        let first = recover(&CipherSeed::new(0, 10, entropy), &MAINNET).unwrap();
        let second = recover(&CipherSeed::new(0, 10, entropy), &MAINNET).unwrap();
        assert_eq!(first.to_string(), second.to_string());
    }

    #[test]
    fn different_entropy_changes_every_output() {
        let first = recover(&CipherSeed::new(0, 0, [0u8; ENTROPY_SIZE]), &MAINNET).unwrap();
        let second = recover(&CipherSeed::new(0, 0, [1u8; ENTROPY_SIZE]), &MAINNET).unwrap();

        assert_ne!(first.node_pubkey, second.node_pubkey);
        assert_ne!(first.p2wkh_address, second.p2wkh_address);
        assert_ne!(first.np2wkh_address, second.np2wkh_address);
    }
}
