//! Single-use keypair the service encrypts decrypted plaintexts to.

use curve25519_dalek::{constants::RISTRETTO_BASEPOINT_POINT, ristretto::RistrettoPoint, scalar::Scalar};
use rand::rngs::OsRng;

pub struct EphemeralKeypair {
    secret: Scalar,
    public: RistrettoPoint,
}

impl EphemeralKeypair {
    pub fn generate() -> Self {
        let secret = Scalar::random(&mut OsRng);
        let public = secret * RISTRETTO_BASEPOINT_POINT;
        Self { secret, public }
    }

    /// Compressed Ristretto public key.
    pub fn public_key(&self) -> [u8; 32] {
        self.public.compress().to_bytes()
    }

    pub fn public_key_hex(&self) -> String {
        hex::encode(self.public_key())
    }

    pub fn private_key_hex(&self) -> String {
        hex::encode(self.secret.to_bytes())
    }
}

impl core::fmt::Debug for EphemeralKeypair {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EphemeralKeypair")
            .field("public", &self.public_key_hex())
            .finish_non_exhaustive()
    }
}
