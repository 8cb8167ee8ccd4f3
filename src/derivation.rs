use hmac::{Hmac, Mac};
use secp256k1::{PublicKey, Scalar, Secp256k1, SecretKey};
use sha2::Sha512;
use std::fmt;
use bitcoin_hashes::{Hash, hash160};

pub const HARDENED_BIT: u32 = 0x80000000;

// Seed bounds of the standard master-key derivation; the aezeed entropy
// handed to us is always 16 bytes, the lower bound.
const MIN_SEED_BYTES: usize = 16;
const MAX_SEED_BYTES: usize = 64;

/// BIP43 purpose used for node identity keys.
pub const BIP43_PURPOSE: u32 = 1017;
/// BIP49 purpose (wrapped segwit, P2SH-P2WPKH).
pub const BIP49_PURPOSE: u32 = 49;
/// BIP84 purpose (native segwit, P2WPKH).
pub const BIP84_PURPOSE: u32 = 84;
/// Coin type for Bitcoin, shared by all three paths.
pub const COIN_TYPE_BITCOIN: u32 = 0;
/// Key family holding the node identity key.
pub const KEY_FAMILY_NODE: u32 = 6;

#[derive(Debug)]
pub enum DerivationError {
    InvalidSeedLength(usize),
    InvalidChildIndex(u32),
    HardenedFromPublicOnly,
    InvalidTweak,
    HmacError,
}

impl fmt::Display for DerivationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DerivationError::InvalidSeedLength(len) => {
                write!(f, "seed must be {}-{} bytes, got {}", MIN_SEED_BYTES, MAX_SEED_BYTES, len)
            }
            DerivationError::InvalidChildIndex(index) => {
                write!(f, "child index {} exceeds the hardened range", index)
            }
            DerivationError::HardenedFromPublicOnly => {
                write!(f, "hardened derivation requires private key material")
            }
            DerivationError::InvalidTweak => write!(f, "derivation produced an out-of-range key"),
            DerivationError::HmacError => write!(f, "HMAC operation failed"),
        }
    }
}

impl std::error::Error for DerivationError {}

/// Key material carried by an extended key: the private scalar, or only
/// the public point. Hardened derivation is possible from the former
/// alone.
#[derive(Clone)]
pub enum KeyMaterial {
    Private(SecretKey),
    Public(PublicKey),
}

/// A node of the BIP32 tree: key material plus the chain code and
/// position metadata. Values are immutable; derivation returns a fresh
/// node one level deeper.
#[derive(Clone)]
pub struct ExtendedKey {
    key: KeyMaterial,
    chain_code: [u8; 32],
    depth: u8,
    parent_fingerprint: [u8; 4],
    child_number: u32,
}

impl ExtendedKey {
    /// Creates the master node from a seed.
    ///
    /// The seed must be between 16 and 64 bytes, per the standard
    /// seed-to-master bounds.
    pub fn master(seed: &[u8]) -> Result<Self, DerivationError> {
        if seed.len() < MIN_SEED_BYTES || seed.len() > MAX_SEED_BYTES {
            return Err(DerivationError::InvalidSeedLength(seed.len()));
        }

        // HMAC-SHA512 with key "Bitcoin seed"
        let mut hmac = Hmac::<Sha512>::new_from_slice(b"Bitcoin seed")
            .map_err(|_| DerivationError::HmacError)?;
        hmac.update(seed);
        let digest = hmac.finalize().into_bytes();

        let mut chain_code = [0u8; 32];
        chain_code.copy_from_slice(&digest[32..64]);

        let secret = SecretKey::from_slice(&digest[0..32])
            .map_err(|_| DerivationError::InvalidTweak)?;

        Ok(ExtendedKey {
            key: KeyMaterial::Private(secret),
            chain_code,
            depth: 0,
            parent_fingerprint: [0u8; 4],
            child_number: 0,
        })
    }

    /// Derives the child at `index`, hardened or not.
    ///
    /// `index` must be below 2^31; the hardened flag sets the high bit
    /// of the stored child number. Hardened derivation fails unless this
    /// node carries private key material.
    pub fn derive_child(&self, index: u32, hardened: bool) -> Result<Self, DerivationError> {
        if index >= HARDENED_BIT {
            return Err(DerivationError::InvalidChildIndex(index));
        }
        let child_number = if hardened { index | HARDENED_BIT } else { index };

        // 33 bytes of key material + 4 bytes of index
        let mut data = Vec::with_capacity(37);
        if hardened {
            match &self.key {
                KeyMaterial::Private(secret) => {
                    data.push(0);
                    data.extend_from_slice(&secret[..]);
                }
                KeyMaterial::Public(_) => {
                    return Err(DerivationError::HardenedFromPublicOnly);
                }
            }
        } else {
            data.extend_from_slice(&self.public_key().serialize());
        }
        data.extend_from_slice(&child_number.to_be_bytes());

        let mut hmac = Hmac::<Sha512>::new_from_slice(&self.chain_code)
            .map_err(|_| DerivationError::HmacError)?;
        hmac.update(&data);
        let digest = hmac.finalize().into_bytes();

        let mut chain_code = [0u8; 32];
        chain_code.copy_from_slice(&digest[32..64]);

        // Rejects a zero tweak or one at or beyond the curve order.
        let tweak = SecretKey::from_slice(&digest[0..32])
            .map_err(|_| DerivationError::InvalidTweak)?;
        let scalar = Scalar::from(tweak);

        let key = match &self.key {
            KeyMaterial::Private(secret) => {
                let child = secret
                    .add_tweak(&scalar)
                    .map_err(|_| DerivationError::InvalidTweak)?;
                KeyMaterial::Private(child)
            }
            KeyMaterial::Public(point) => {
                let secp = Secp256k1::new();
                let child = point
                    .add_exp_tweak(&secp, &scalar)
                    .map_err(|_| DerivationError::InvalidTweak)?;
                KeyMaterial::Public(child)
            }
        };

        Ok(ExtendedKey {
            key,
            chain_code,
            depth: self.depth + 1,
            parent_fingerprint: self.fingerprint(),
            child_number,
        })
    }

    /// The compressed public key of this node.
    pub fn public_key(&self) -> PublicKey {
        match &self.key {
            KeyMaterial::Private(secret) => {
                let secp = Secp256k1::new();
                PublicKey::from_secret_key(&secp, secret)
            }
            KeyMaterial::Public(point) => *point,
        }
    }

    /// Calculates the fingerprint of this key
    pub fn fingerprint(&self) -> [u8; 4] {
        let mut result = [0u8; 4];
        let serialized_pubkey = self.public_key().serialize();
        let hash = hash160::Hash::hash(&serialized_pubkey);
        result.copy_from_slice(&hash[0..4]);
        result
    }

    /// Returns the same node stripped of private key material.
    pub fn neuter(&self) -> Self {
        ExtendedKey {
            key: KeyMaterial::Public(self.public_key()),
            chain_code: self.chain_code,
            depth: self.depth,
            parent_fingerprint: self.parent_fingerprint,
            child_number: self.child_number,
        }
    }

    pub fn depth(&self) -> u8 {
        self.depth
    }

    pub fn parent_fingerprint(&self) -> [u8; 4] {
        self.parent_fingerprint
    }

    pub fn child_number(&self) -> u32 {
        self.child_number
    }
}

/// Derives the account-level key `m/purpose'/0'/key_family'` with three
/// hardened steps.
pub fn derive_account_key(
    root: &ExtendedKey,
    purpose: u32,
    key_family: u32,
) -> Result<ExtendedKey, DerivationError> {
    let purpose_key = root.derive_child(purpose, true)?;
    let coin_type_key = purpose_key.derive_child(COIN_TYPE_BITCOIN, true)?;
    coin_type_key.derive_child(key_family, true)
}

/// Derives the first leaf public key under an account: external branch
/// 0, then index 0, both non-hardened. The two-level suffix is shared by
/// every caller; only the account parameters vary.
pub fn derive_first_key(
    root: &ExtendedKey,
    purpose: u32,
    key_family: u32,
) -> Result<PublicKey, DerivationError> {
    let account_key = derive_account_key(root, purpose, key_family)?;
    let external_branch = account_key.derive_child(0, false)?;
    let first_child = external_branch.derive_child(0, false)?;
    Ok(first_child.public_key())
}
