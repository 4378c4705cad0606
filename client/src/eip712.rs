//! EIP-712 typed data for user decryption consent.
//!
//! ```text
//! EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)
//! UserDecryptRequestVerification(bytes publicKey,address[] contractAddresses,uint256 startTimestamp,uint256 durationDays,bytes extraData)
//! ```
//!
//! The signed digest is `keccak256(0x19 || 0x01 || domainSeparator || hashStruct(request))`.
//! Binding the contract set and the window into the struct keeps a signature from being
//! replayed for other contracts or for longer than the holder agreed to.

use serde::{Deserialize, Serialize};
use sp_core::{hashing::keccak_256, H160};

pub const EIP712_DOMAIN_TYPE: &str =
    "EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)";

pub const USER_DECRYPT_REQUEST_TYPE: &str = "UserDecryptRequestVerification(bytes publicKey,address[] contractAddresses,uint256 startTimestamp,uint256 durationDays,bytes extraData)";

pub const DEFAULT_DOMAIN_NAME: &str = "Decryption";
pub const DEFAULT_DOMAIN_VERSION: &str = "1";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Eip712Domain {
    pub name: String,
    pub version: String,
    pub chain_id: u64,
    pub verifying_contract: H160,
}

impl Eip712Domain {
    /// Domain of the service's decryption verifier contract.
    pub fn decryption(chain_id: u64, verifying_contract: H160) -> Self {
        Self {
            name: DEFAULT_DOMAIN_NAME.into(),
            version: DEFAULT_DOMAIN_VERSION.into(),
            chain_id,
            verifying_contract,
        }
    }

    pub fn separator(&self) -> [u8; 32] {
        let mut enc = Vec::with_capacity(5 * 32);
        enc.extend_from_slice(&keccak_256(EIP712_DOMAIN_TYPE.as_bytes()));
        enc.extend_from_slice(&keccak_256(self.name.as_bytes()));
        enc.extend_from_slice(&keccak_256(self.version.as_bytes()));
        enc.extend_from_slice(&word_u64(self.chain_id));
        enc.extend_from_slice(&word_address(&self.verifying_contract));
        keccak_256(&enc)
    }
}

/// Message of a user decryption consent.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDecryptRequest {
    #[serde(with = "hex_bytes")]
    pub public_key: Vec<u8>,
    pub contract_addresses: Vec<H160>,
    pub start_timestamp: u64,
    pub duration_days: u64,
    #[serde(with = "hex_bytes")]
    pub extra_data: Vec<u8>,
}

impl UserDecryptRequest {
    pub fn type_hash() -> [u8; 32] {
        keccak_256(USER_DECRYPT_REQUEST_TYPE.as_bytes())
    }

    pub fn struct_hash(&self) -> [u8; 32] {
        let mut addresses = Vec::with_capacity(self.contract_addresses.len() * 32);
        for a in &self.contract_addresses {
            addresses.extend_from_slice(&word_address(a));
        }

        let mut enc = Vec::with_capacity(6 * 32);
        enc.extend_from_slice(&Self::type_hash());
        enc.extend_from_slice(&keccak_256(&self.public_key));
        enc.extend_from_slice(&keccak_256(&addresses));
        enc.extend_from_slice(&word_u64(self.start_timestamp));
        enc.extend_from_slice(&word_u64(self.duration_days));
        enc.extend_from_slice(&keccak_256(&self.extra_data));
        keccak_256(&enc)
    }

    /// The 32 bytes a signer actually signs.
    pub fn signing_digest(&self, domain: &Eip712Domain) -> [u8; 32] {
        let mut enc = [0u8; 66];
        enc[0] = 0x19;
        enc[1] = 0x01;
        enc[2..34].copy_from_slice(&domain.separator());
        enc[34..].copy_from_slice(&self.struct_hash());
        keccak_256(&enc)
    }
}

fn word_u64(v: u64) -> [u8; 32] {
    let mut w = [0u8; 32];
    w[24..].copy_from_slice(&v.to_be_bytes());
    w
}

fn word_address(a: &H160) -> [u8; 32] {
    let mut w = [0u8; 32];
    w[12..].copy_from_slice(a.as_bytes());
    w
}

mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&format!("0x{}", hex::encode(bytes)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(d)?;
        hex::decode(s.trim_start_matches("0x")).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    fn request() -> UserDecryptRequest {
        UserDecryptRequest {
            public_key: vec![0xab; 32],
            contract_addresses: vec![H160::repeat_byte(0x11)],
            start_timestamp: 1_700_000_000,
            duration_days: 10,
            extra_data: vec![],
        }
    }

    #[test]
    fn domain_type_hash_is_the_standard_one() {
        assert_eq!(
            keccak_256(EIP712_DOMAIN_TYPE.as_bytes()),
            hex!("8b73c3c69bb8fe3d512ecc4cf759cc79239f7b179b0ffacaa9a75d522b39400f")
        );
    }

    #[test]
    fn digest_binds_domain() {
        let req = request();
        let a = Eip712Domain::decryption(1, H160::repeat_byte(0x22));
        let mut b = a.clone();
        b.chain_id = 2;
        let mut c = a.clone();
        c.verifying_contract = H160::repeat_byte(0x33);
        assert_ne!(req.signing_digest(&a), req.signing_digest(&b));
        assert_ne!(req.signing_digest(&a), req.signing_digest(&c));
    }

    #[test]
    fn digest_binds_every_message_field() {
        let domain = Eip712Domain::decryption(1, H160::repeat_byte(0x22));
        let base = request().signing_digest(&domain);

        let mut r = request();
        r.public_key[0] ^= 1;
        assert_ne!(r.signing_digest(&domain), base);

        let mut r = request();
        r.contract_addresses.push(H160::repeat_byte(0x12));
        assert_ne!(r.signing_digest(&domain), base);

        let mut r = request();
        r.start_timestamp += 1;
        assert_ne!(r.signing_digest(&domain), base);

        let mut r = request();
        r.duration_days = 11;
        assert_ne!(r.signing_digest(&domain), base);

        let mut r = request();
        r.extra_data = vec![0];
        assert_ne!(r.signing_digest(&domain), base);
    }

    #[test]
    fn contract_order_matters() {
        let domain = Eip712Domain::decryption(1, H160::repeat_byte(0x22));
        let mut a = request();
        a.contract_addresses = vec![H160::repeat_byte(1), H160::repeat_byte(2)];
        let mut b = request();
        b.contract_addresses = vec![H160::repeat_byte(2), H160::repeat_byte(1)];
        assert_ne!(a.signing_digest(&domain), b.signing_digest(&domain));
    }

    #[test]
    fn request_serializes_bytes_as_hex() {
        let json = serde_json::to_value(request()).unwrap();
        assert_eq!(json["publicKey"], format!("0x{}", "ab".repeat(32)));
        assert_eq!(json["extraData"], "0x");
        assert_eq!(json["durationDays"], 10);

        let back: UserDecryptRequest = serde_json::from_value(json).unwrap();
        assert_eq!(back, request());
    }
}
